//! # News Publishing Flows
//!
//! Article lifecycle through the gateway: drafts stay private, publishing
//! stamps the article once, and the public site only ever sees published
//! articles by slug.

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::{json, Value};

    use crate::harness::{article, TestSite, EDITOR_NAME, EDITOR_TOKEN};

    async fn set_status(site: &TestSite, id: &Value, status: &str) -> Value {
        site.staff("news.setStatus", json!({"id": id, "status": status}))
            .await
    }

    #[tokio::test]
    async fn test_draft_is_private_until_published() {
        let site = TestSite::in_memory();
        let draft = site
            .staff("news.create", json!({"data": article("Kiln Expansion", &["Factory"])}))
            .await;
        assert_eq!(draft["status"], "draft");
        assert_eq!(draft["slug"], "kiln-expansion");
        assert!(draft["publishedAt"].is_null());

        assert_eq!(site.public("news.list", Value::Null).await, json!([]));
        let (status, kind) = site
            .failure(None, "news.getBySlug", json!({"slug": "kiln-expansion"}))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(kind, "NOT_FOUND");

        let published = set_status(&site, &draft["id"], "published").await;
        assert_eq!(published["status"], "published");
        assert_eq!(published["publishedBy"], EDITOR_NAME);
        assert!(published["publishedAt"].is_string());

        let by_slug = site
            .public("news.getBySlug", json!(["kiln-expansion"]))
            .await;
        assert_eq!(by_slug["id"], draft["id"]);
        assert_eq!(by_slug["tags"][0]["name"], "Factory");
    }

    #[tokio::test]
    async fn test_draft_cannot_be_unpublished() {
        let site = TestSite::in_memory();
        let draft = site
            .staff("news.create", json!([article("Trade Fair", &[])]))
            .await;

        let (status, kind) = site
            .failure(
                Some(EDITOR_TOKEN),
                "news.setStatus",
                json!({"id": draft["id"], "status": "unpublished"}),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(kind, "BAD_REQUEST");

        let current = site.staff("news.get", json!([draft["id"]])).await;
        assert_eq!(current["status"], "draft");
    }

    #[tokio::test]
    async fn test_republish_keeps_first_stamp() {
        let site = TestSite::in_memory();
        let draft = site
            .staff("news.create", json!([article("New Warehouse", &[])]))
            .await;

        let first = set_status(&site, &draft["id"], "published").await;
        let hidden = set_status(&site, &draft["id"], "unpublished").await;
        assert_eq!(hidden["publishedAt"], first["publishedAt"]);
        assert_eq!(site.public("news.list", Value::Null).await, json!([]));

        let again = set_status(&site, &draft["id"], "published").await;
        assert_eq!(again["publishedAt"], first["publishedAt"]);
        assert_eq!(
            site.public("news.list", Value::Null)
                .await
                .as_array()
                .map(Vec::len),
            Some(1)
        );
    }

    #[tokio::test]
    async fn test_published_slug_survives_title_edit() {
        let site = TestSite::in_memory();
        let draft = site
            .staff("news.create", json!([article("Original Title", &[])]))
            .await;
        set_status(&site, &draft["id"], "published").await;

        let edited = site
            .staff(
                "news.update",
                json!({"id": draft["id"], "data": article("Renamed Title", &[])}),
            )
            .await;
        assert_eq!(edited["slug"], "original-title");
        assert_eq!(edited["title"]["en"], "Renamed Title");
    }

    #[tokio::test]
    async fn test_duplicate_titles_get_distinct_slugs() {
        let site = TestSite::in_memory();
        let first = site
            .staff("news.create", json!([article("Harvest Report", &[])]))
            .await;
        let second = site
            .staff("news.create", json!([article("Harvest Report", &[])]))
            .await;
        assert_eq!(first["slug"], "harvest-report");
        assert_eq!(second["slug"], "harvest-report-2");
    }

    #[tokio::test]
    async fn test_tags_are_shared_and_listed() {
        let site = TestSite::in_memory();
        site.staff("news.create", json!([article("One", &["Export", "Quality"])]))
            .await;
        site.staff("news.create", json!([article("Two", &["export"])]))
            .await;

        let tags = site.staff("news.listTags", Value::Null).await;
        let mut slugs: Vec<&str> = tags
            .as_array()
            .map(|t| t.iter().filter_map(|tag| tag["slug"].as_str()).collect())
            .unwrap_or_default();
        slugs.sort_unstable();
        assert_eq!(slugs, vec!["export", "quality"]);
    }

    #[tokio::test]
    async fn test_list_all_filters_by_status() {
        let site = TestSite::in_memory();
        let a = site.staff("news.create", json!([article("Alpha", &[])])).await;
        site.staff("news.create", json!([article("Beta", &[])])).await;
        set_status(&site, &a["id"], "published").await;

        let drafts = site.staff("news.listAll", json!({"status": "draft"})).await;
        assert_eq!(drafts.as_array().map(Vec::len), Some(1));
        assert_eq!(drafts[0]["title"]["en"], "Beta");

        let all = site.staff("news.listAll", Value::Null).await;
        assert_eq!(all.as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_delete_removes_article() {
        let site = TestSite::in_memory();
        let a = site.staff("news.create", json!([article("Gone Soon", &[])])).await;
        set_status(&site, &a["id"], "published").await;

        assert_eq!(site.staff("news.delete", json!([a["id"]])).await, true);

        let (status, _) = site.failure(None, "news.getBySlug", json!(["gone-soon"])).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) = site
            .failure(Some(EDITOR_TOKEN), "news.get", json!([a["id"]]))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cover_image_from_presigned_upload() {
        let site = TestSite::in_memory();
        let upload = site
            .staff(
                "media.requestUpload",
                json!({"data": {
                    "folder": "news",
                    "fileName": "Kiln Photo.JPG",
                    "contentType": "image/jpeg",
                    "sizeBytes": 204800
                }}),
            )
            .await;
        assert_eq!(upload["method"], "PUT");
        let key = upload["key"].as_str().unwrap_or_default().to_string();
        assert!(key.starts_with("news/"), "{key}");

        let mut input = article("Kiln Photo Story", &[]);
        input["coverImage"] = json!(key);
        let created = site.staff("news.create", json!([input])).await;
        assert_eq!(created["coverImage"], json!(key));
        assert_eq!(created["coverImageUrl"], upload["publicUrl"]);
    }
}
