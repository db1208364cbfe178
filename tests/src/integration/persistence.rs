//! # Persistence
//!
//! The same flows against a SQLite file, reopened between steps to prove the
//! order and publication state are stored rather than cached.

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::harness::{article, faq, order_of, product, TestSite};

    #[tokio::test]
    async fn test_faq_order_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("site.db");

        let (q1, q3) = {
            let site = TestSite::sqlite(&db);
            let q1 = site.staff("faq.create", json!([faq("Q1")])).await;
            let q2 = site.staff("faq.create", json!([faq("Q2")])).await;
            let q3 = site.staff("faq.create", json!([faq("Q3")])).await;
            site.staff("faq.delete", json!([q2["id"]])).await;
            (q1, q3)
        };

        let site = TestSite::sqlite(&db);
        let list = site.public("faq.list", Value::Null).await;
        assert_eq!(
            order_of(&list, "question"),
            vec![("Q1".to_string(), 0), ("Q3".to_string(), 1)]
        );

        site.staff("faq.reorder", json!([[q3["id"], q1["id"]]])).await;
        drop(site);

        let site = TestSite::sqlite(&db);
        let list = site.public("faq.list", Value::Null).await;
        assert_eq!(
            order_of(&list, "question"),
            vec![("Q3".to_string(), 0), ("Q1".to_string(), 1)]
        );

        let next = site.staff("faq.create", json!([faq("Q4")])).await;
        assert_eq!(next["orderIndex"], 2);
    }

    #[tokio::test]
    async fn test_publication_and_visibility_survive_restart() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("site.db");

        {
            let site = TestSite::sqlite(&db);
            let a = site
                .staff("news.create", json!([article("Season Opening", &["Events"])]))
                .await;
            site.staff("news.setStatus", json!([a["id"], "published"])).await;

            let p = site.staff("product.create", json!([product("Hidden")])).await;
            site.staff("product.setVisibility", json!([p["id"], true])).await;
            site.staff("product.create", json!([product("Shown")])).await;
        }

        let site = TestSite::sqlite(&db);
        let by_slug = site.public("news.getBySlug", json!(["season-opening"])).await;
        assert_eq!(by_slug["status"], "published");
        assert_eq!(by_slug["tags"][0]["slug"], "events");

        let products = site.public("product.list", Value::Null).await;
        assert_eq!(order_of(&products, "name"), vec![("Shown".to_string(), 1)]);
    }

    #[tokio::test]
    async fn test_subsystems_share_one_database_file() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("site.db");

        let site = TestSite::sqlite(&db);
        site.staff("faq.create", json!([faq("Q1")])).await;
        site.staff("news.create", json!([article("Only One File", &[])]))
            .await;
        drop(site);

        let files: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".db"))
            .collect();
        assert_eq!(files, vec!["site.db".to_string()]);
    }
}
