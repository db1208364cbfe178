//! # Ordered Collection Flows
//!
//! FAQ, team and product collections driven end to end through `POST /rpc`.
//! After every mutation the visible `orderIndex` values must be exactly
//! `0..n` in list order.

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use proptest::prelude::*;
    use serde_json::{json, Value};

    use crate::harness::{faq, order_of, product, team_member, TestSite};

    fn id_of(record: &Value) -> Value {
        record["id"].clone()
    }

    fn assert_contiguous(list: &Value) {
        let indices: Vec<u64> = order_of(list, "question").iter().map(|(_, i)| *i).collect();
        let expected: Vec<u64> = (0..indices.len() as u64).collect();
        assert_eq!(indices, expected);
    }

    // =========================================================================
    // FAQ lifecycle
    // =========================================================================

    #[tokio::test]
    async fn test_create_delete_reorder_faq_flow() {
        let site = TestSite::in_memory();

        let q1 = site.staff("faq.create", json!({"data": faq("Q1")})).await;
        let q2 = site.staff("faq.create", json!({"data": faq("Q2")})).await;
        let q3 = site.staff("faq.create", json!({"data": faq("Q3")})).await;
        assert_eq!(q1["orderIndex"], 0);
        assert_eq!(q2["orderIndex"], 1);
        assert_eq!(q3["orderIndex"], 2);

        let deleted = site.staff("faq.delete", json!({"id": id_of(&q2)})).await;
        assert_eq!(deleted, true);
        let list = site.public("faq.list", Value::Null).await;
        assert_eq!(
            order_of(&list, "question"),
            vec![("Q1".to_string(), 0), ("Q3".to_string(), 1)]
        );

        site.staff("faq.reorder", json!({"ids": [id_of(&q3), id_of(&q1)]}))
            .await;
        let list = site.public("faq.list", Value::Null).await;
        assert_eq!(
            order_of(&list, "question"),
            vec![("Q3".to_string(), 0), ("Q1".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_reorder_relabels_full_permutation() {
        let site = TestSite::in_memory();
        let a = site.staff("faq.create", json!([faq("a")])).await;
        let b = site.staff("faq.create", json!([faq("b")])).await;
        let c = site.staff("faq.create", json!([faq("c")])).await;

        site.staff("faq.reorder", json!([[id_of(&c), id_of(&a), id_of(&b)]]))
            .await;

        let list = site.public("faq.list", Value::Null).await;
        assert_eq!(
            order_of(&list, "question"),
            vec![
                ("c".to_string(), 0),
                ("a".to_string(), 1),
                ("b".to_string(), 2)
            ]
        );
    }

    #[tokio::test]
    async fn test_partial_reorder_rejected_and_nothing_dropped() {
        let site = TestSite::in_memory();
        let a = site.staff("faq.create", json!([faq("a")])).await;
        let b = site.staff("faq.create", json!([faq("b")])).await;
        site.staff("faq.create", json!([faq("c")])).await;

        let (status, kind) = site
            .failure(
                Some(crate::harness::EDITOR_TOKEN),
                "faq.reorder",
                json!({"ids": [id_of(&b), id_of(&a)]}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(kind, "BAD_REQUEST");

        let (status, _) = site
            .failure(
                Some(crate::harness::EDITOR_TOKEN),
                "faq.reorder",
                json!({"ids": [id_of(&a), id_of(&a), id_of(&b)]}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let list = site.public("faq.list", Value::Null).await;
        assert_eq!(
            order_of(&list, "question"),
            vec![
                ("a".to_string(), 0),
                ("b".to_string(), 1),
                ("c".to_string(), 2)
            ]
        );
    }

    #[tokio::test]
    async fn test_delete_closes_gap_in_middle() {
        let site = TestSite::in_memory();
        let mut ids = Vec::new();
        for q in ["a", "b", "c", "d"] {
            ids.push(id_of(&site.staff("faq.create", json!([faq(q)])).await));
        }

        site.staff("faq.delete", json!([ids[1]])).await;

        let list = site.public("faq.list", Value::Null).await;
        assert_eq!(
            order_of(&list, "question"),
            vec![
                ("a".to_string(), 0),
                ("c".to_string(), 1),
                ("d".to_string(), 2)
            ]
        );
    }

    #[tokio::test]
    async fn test_reads_are_idempotent() {
        let site = TestSite::in_memory();
        let created = site.staff("faq.create", json!([faq("Q1")])).await;

        let first = site.public("faq.list", Value::Null).await;
        let second = site.public("faq.list", Value::Null).await;
        assert_eq!(first, second);

        let got = site.public("faq.get", json!([id_of(&created)])).await;
        assert_eq!(got, created);
    }

    #[tokio::test]
    async fn test_update_keeps_position() {
        let site = TestSite::in_memory();
        site.staff("faq.create", json!([faq("first")])).await;
        let second = site.staff("faq.create", json!([faq("second")])).await;

        let updated = site
            .staff(
                "faq.update",
                json!({"id": id_of(&second), "data": faq("second, edited")}),
            )
            .await;
        assert_eq!(updated["orderIndex"], 1);
        assert_eq!(updated["question"]["en"], "second, edited");
    }

    // =========================================================================
    // Team and products
    // =========================================================================

    #[tokio::test]
    async fn test_team_collection_is_independent_of_faq() {
        let site = TestSite::in_memory();
        site.staff("faq.create", json!([faq("Q1")])).await;

        let member = site.staff("team.create", json!([team_member("Huda")])).await;
        assert_eq!(member["orderIndex"], 0);

        let team = site.public("team.list", Value::Null).await;
        assert_eq!(order_of(&team, "name"), vec![("Huda".to_string(), 0)]);
    }

    #[tokio::test]
    async fn test_hidden_products_keep_position_but_leave_public_list() {
        let site = TestSite::in_memory();
        let bbq = site.staff("product.create", json!([product("BBQ")])).await;
        let shisha = site.staff("product.create", json!([product("Shisha")])).await;

        let hidden = site
            .staff("product.setVisibility", json!({"id": id_of(&bbq), "hidden": true}))
            .await;
        assert_eq!(hidden["isHidden"], true);
        assert_eq!(hidden["orderIndex"], 0);

        let public = site.public("product.list", Value::Null).await;
        assert_eq!(order_of(&public, "name"), vec![("Shisha".to_string(), 1)]);

        let all = site.staff("product.listAll", Value::Null).await;
        assert_eq!(all.as_array().map(Vec::len), Some(2));

        let (status, kind) = site.failure(None, "product.get", json!([id_of(&bbq)])).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(kind, "NOT_FOUND");

        site.staff("product.reorder", json!([[id_of(&shisha), id_of(&bbq)]]))
            .await;
        let all = site.staff("product.listAll", Value::Null).await;
        assert_eq!(
            order_of(&all, "name"),
            vec![("Shisha".to_string(), 0), ("BBQ".to_string(), 1)]
        );
    }

    #[tokio::test]
    async fn test_content_edit_does_not_unhide_product() {
        let site = TestSite::in_memory();
        let bbq = site.staff("product.create", json!([product("BBQ")])).await;
        site.staff("product.create", json!([product("Shisha")])).await;
        site.staff("product.setVisibility", json!({"id": id_of(&bbq), "hidden": true}))
            .await;

        let edited = site
            .staff(
                "product.update",
                json!([id_of(&bbq), {"name": {"en": "BBQ Premium", "ar": "فحم"}}]),
            )
            .await;
        assert_eq!(edited["isHidden"], true);
        assert_eq!(edited["orderIndex"], 0);

        let public = site.public("product.list", Value::Null).await;
        assert_eq!(order_of(&public, "name"), vec![("Shisha".to_string(), 1)]);

        let (status, _) = site.failure(None, "product.get", json!([id_of(&bbq)])).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    // =========================================================================
    // Property: contiguity survives any mutation sequence
    // =========================================================================

    #[derive(Debug, Clone)]
    enum Op {
        Create,
        Delete(usize),
        Reorder { rotate: usize, reverse: bool },
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => Just(Op::Create),
            1 => any::<usize>().prop_map(Op::Delete),
            1 => (any::<usize>(), any::<bool>())
                .prop_map(|(rotate, reverse)| Op::Reorder { rotate, reverse }),
        ]
    }

    async fn apply(site: &TestSite, ops: &[Op]) {
        for (n, op) in ops.iter().enumerate() {
            let list = site.public("faq.list", Value::Null).await;
            let mut ids: Vec<Value> = list
                .as_array()
                .map(|records| records.iter().map(id_of).collect())
                .unwrap_or_default();

            match op {
                Op::Create => {
                    site.staff("faq.create", json!([faq(&format!("Q{n}"))])).await;
                }
                Op::Delete(i) if !ids.is_empty() => {
                    site.staff("faq.delete", json!([ids[i % ids.len()]])).await;
                }
                Op::Reorder { rotate, reverse } if !ids.is_empty() => {
                    let len = ids.len();
                    ids.rotate_left(rotate % len);
                    if *reverse {
                        ids.reverse();
                    }
                    site.staff("faq.reorder", json!([ids])).await;
                }
                _ => {}
            }

            assert_contiguous(&site.public("faq.list", Value::Null).await);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(24))]

        #[test]
        fn prop_indices_stay_contiguous(ops in proptest::collection::vec(op(), 1..20)) {
            let runtime = tokio::runtime::Runtime::new().unwrap();
            runtime.block_on(async {
                let site = TestSite::in_memory();
                apply(&site, &ops).await;
            });
        }
    }
}
