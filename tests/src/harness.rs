//! Shared fixtures: a fully wired site behind the gateway router.

use std::path::Path;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use cms_04_api_gateway::{ApiGatewayService, StaffToken};
use cms_runtime::{CmsContainer, RuntimeConfig};
use serde_json::{json, Value};
use tower::ServiceExt;

/// Token accepted as the editor's session.
pub const EDITOR_TOKEN: &str = "editor-token-0123456789";

/// Display name recorded as `publishedBy`.
pub const EDITOR_NAME: &str = "Mona Saleh";

/// The assembled back end, reachable only through HTTP requests.
pub struct TestSite {
    router: Router,
    next_id: std::sync::atomic::AtomicU64,
}

impl TestSite {
    /// Site with in-memory stores.
    pub fn in_memory() -> Self {
        Self::with_config(config(None))
    }

    /// Site persisting to the given SQLite file.
    pub fn sqlite(path: &Path) -> Self {
        Self::with_config(config(Some(path)))
    }

    fn with_config(config: RuntimeConfig) -> Self {
        let container = CmsContainer::new(&config).expect("container");
        let gateway =
            ApiGatewayService::new(config.gateway, container.rpc_handlers()).expect("gateway");
        Self {
            router: gateway.router(),
            next_id: std::sync::atomic::AtomicU64::new(1),
        }
    }

    /// Raw JSON-RPC call. Returns the HTTP status and the response body.
    pub async fn call(&self, token: Option<&str>, method: &str, params: Value) -> (StatusCode, Value) {
        let id = self
            .next_id
            .fetch_add(1, std::sync::atomic::Ordering::Relaxed);
        let body = json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params});

        let mut builder = Request::builder()
            .method("POST")
            .uri("/rpc")
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = builder.body(Body::from(body.to_string())).expect("request");

        let response = self.router.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value = serde_json::from_slice(&bytes).expect("json body");
        (status, value)
    }

    /// Staff call that must succeed. Returns `result`.
    pub async fn staff(&self, method: &str, params: Value) -> Value {
        let (status, body) = self.call(Some(EDITOR_TOKEN), method, params).await;
        assert_eq!(status, StatusCode::OK, "{method} failed: {body}");
        body["result"].clone()
    }

    /// Anonymous call that must succeed. Returns `result`.
    pub async fn public(&self, method: &str, params: Value) -> Value {
        let (status, body) = self.call(None, method, params).await;
        assert_eq!(status, StatusCode::OK, "{method} failed: {body}");
        body["result"].clone()
    }

    /// Call that must fail. Returns the HTTP status and `error.data.kind`.
    pub async fn failure(&self, token: Option<&str>, method: &str, params: Value) -> (StatusCode, String) {
        let (status, body) = self.call(token, method, params).await;
        assert!(body.get("result").is_none(), "{method} unexpectedly succeeded: {body}");
        let kind = body["error"]["data"]["kind"].as_str().unwrap_or_default().to_string();
        (status, kind)
    }
}

fn config(database: Option<&Path>) -> RuntimeConfig {
    let mut config = RuntimeConfig::default();
    config.gateway.auth.staff_tokens = vec![StaffToken {
        token: EDITOR_TOKEN.to_string(),
        user_id: "editor-1".to_string(),
        display_name: EDITOR_NAME.to_string(),
    }];
    config.media.signing_secret = [7u8; 32];
    config.storage.database_path = database.map(Path::to_path_buf);
    config
}

/// FAQ payload with the given English question.
pub fn faq(question: &str) -> Value {
    json!({
        "question": {"en": question, "ar": "سؤال"},
        "answer": {"en": "Yes, we ship worldwide.", "ar": "نعم."}
    })
}

/// Team member payload.
pub fn team_member(name: &str) -> Value {
    json!({
        "name": {"en": name, "ar": "اسم"},
        "position": {"en": "Kiln Manager", "ar": "مدير"}
    })
}

/// Product payload.
pub fn product(name: &str) -> Value {
    json!({
        "name": {"en": name, "ar": "فحم"},
        "specifications": [
            {"label": {"en": "Ash", "ar": "رماد"}, "value": {"en": "< 3%", "ar": "< 3%"}}
        ]
    })
}

/// Article input with tags.
pub fn article(title: &str, tags: &[&str]) -> Value {
    json!({
        "title": {"en": title, "ar": "عنوان"},
        "summary": {"en": "Summary", "ar": "ملخص"},
        "content": {"en": "Body text", "ar": "نص"},
        "tags": tags,
    })
}

/// `(english text, orderIndex)` pairs from a list result, in list order.
pub fn order_of(list: &Value, field: &str) -> Vec<(String, u64)> {
    list.as_array()
        .map(|records| {
            records
                .iter()
                .map(|r| {
                    (
                        r[field]["en"].as_str().unwrap_or_default().to_string(),
                        r["orderIndex"].as_u64().unwrap_or(u64::MAX),
                    )
                })
                .collect()
        })
        .unwrap_or_default()
}
