//! # Access Control
//!
//! Every staff-tier method must refuse anonymous and unknown-token callers
//! with 401, and a refused mutation must leave the content untouched.

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::harness::{article, faq, product, team_member, TestSite, EDITOR_TOKEN};

    const FORGED: &str = "forged-token-9876543210";

    #[tokio::test]
    async fn test_refused_mutations_leave_store_unchanged() {
        let site = TestSite::in_memory();
        let q1 = site.staff("faq.create", json!([faq("Q1")])).await;
        let q2 = site.staff("faq.create", json!([faq("Q2")])).await;
        let before = site.public("faq.list", Value::Null).await;

        let attempts = [
            ("faq.create", json!([faq("intruder")])),
            ("faq.update", json!([q1["id"], faq("defaced")])),
            ("faq.delete", json!([q1["id"]])),
            ("faq.reorder", json!([[q2["id"], q1["id"]]])),
        ];
        for token in [None, Some(FORGED)] {
            for (method, params) in &attempts {
                let (status, kind) = site.failure(token, method, params.clone()).await;
                assert_eq!(status, StatusCode::UNAUTHORIZED, "{method}");
                assert_eq!(kind, "UNAUTHORIZED", "{method}");
            }
        }

        assert_eq!(site.public("faq.list", Value::Null).await, before);
    }

    #[tokio::test]
    async fn test_staff_reads_require_session() {
        let site = TestSite::in_memory();
        let created = site.staff("news.create", json!([article("Draft", &["Tag"])])).await;

        for (method, params) in [
            ("product.listAll", Value::Null),
            ("news.listAll", Value::Null),
            ("news.get", json!([created["id"]])),
            ("news.listTags", Value::Null),
        ] {
            let (status, _) = site.failure(None, method, params).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method}");
        }
    }

    #[tokio::test]
    async fn test_every_collection_mutation_is_staff_only() {
        let site = TestSite::in_memory();
        for (method, params) in [
            ("team.create", json!([team_member("Intruder")])),
            ("product.create", json!([product("Fake")])),
            ("news.create", json!([article("Fake", &[])])),
        ] {
            let (status, _) = site.failure(None, method, params).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{method}");
        }

        assert_eq!(site.public("team.list", Value::Null).await, json!([]));
        assert_eq!(site.public("product.list", Value::Null).await, json!([]));
        assert_eq!(site.staff("news.listAll", Value::Null).await, json!([]));
    }

    #[tokio::test]
    async fn test_upload_requires_session_and_valid_media() {
        let site = TestSite::in_memory();
        let request = json!({"data": {
            "folder": "products",
            "fileName": "bbq.webp",
            "contentType": "image/webp",
            "sizeBytes": 1024
        }});

        let (status, _) = site.failure(None, "media.requestUpload", request.clone()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let upload = site.staff("media.requestUpload", request).await;
        assert!(upload["url"].as_str().is_some_and(|u| !u.is_empty()));
        assert_eq!(upload["headers"]["Content-Type"], "image/webp");

        let video_outside_reels = json!({"data": {
            "folder": "products",
            "fileName": "clip.mp4",
            "contentType": "video/mp4",
            "sizeBytes": 1024
        }});
        let (status, kind) = site
            .failure(Some(EDITOR_TOKEN), "media.requestUpload", video_outside_reels)
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(kind, "BAD_REQUEST");
    }

    #[tokio::test]
    async fn test_public_reads_ignore_bad_tokens() {
        let site = TestSite::in_memory();
        site.staff("faq.create", json!([faq("Q1")])).await;

        let (status, body) = site.call(Some(FORGED), "faq.list", Value::Null).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["result"].as_array().map(Vec::len), Some(1));
    }
}
