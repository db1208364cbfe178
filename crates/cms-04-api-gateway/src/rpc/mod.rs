//! RPC method handlers for the JSON-RPC API.
//!
//! Each namespace module turns `(operation, params, session)` into a call on
//! its subsystem port and serializes the answer. Tier checks happen before
//! dispatch; the services repeat the session check on their own.

pub mod collections;
pub mod media;
pub mod news;

use crate::domain::error::{ApiError, ApiResult};
use crate::domain::methods::{MethodCategory, MethodInfo};
use cms_01_media_storage::MediaApi;
use cms_02_ordered_collections::{Faq, OrderedCollectionApi, ProductCatalogApi, TeamMember};
use cms_03_news_publishing::NewsApi;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use shared_types::Session;
use std::sync::Arc;
use tracing::error;

/// All RPC handlers
#[derive(Clone)]
pub struct RpcHandlers {
    pub faq: Arc<dyn OrderedCollectionApi<Faq>>,
    pub team: Arc<dyn OrderedCollectionApi<TeamMember>>,
    pub products: Arc<dyn ProductCatalogApi>,
    pub news: Arc<dyn NewsApi>,
    pub media: Arc<dyn MediaApi>,
}

impl RpcHandlers {
    /// Route a table-listed method to its namespace.
    pub async fn dispatch(
        &self,
        info: &MethodInfo,
        params: Params<'_>,
        session: Option<&Session>,
    ) -> ApiResult<Value> {
        let op = info.operation();
        match info.category {
            MethodCategory::Faq => {
                collections::dispatch::<Faq, _>(self.faq.as_ref(), op, params, session).await
            }
            MethodCategory::Team => {
                collections::dispatch::<TeamMember, _>(self.team.as_ref(), op, params, session)
                    .await
            }
            MethodCategory::Product => {
                collections::dispatch_product(self.products.as_ref(), op, params, session).await
            }
            MethodCategory::News => news::dispatch(self.news.as_ref(), op, params, session).await,
            MethodCategory::Media => {
                media::dispatch(self.media.as_ref(), op, params, session).await
            }
        }
    }
}

/// Call parameters, given either positionally (`[id, data]`) or by name
/// (`{"id": .., "data": ..}`).
#[derive(Debug, Clone, Copy)]
pub struct Params<'a>(Option<&'a Value>);

impl<'a> Params<'a> {
    pub fn new(params: Option<&'a Value>) -> Self {
        Self(params.filter(|p| !p.is_null()))
    }

    fn lookup(&self, index: usize, name: &str) -> Option<&'a Value> {
        let found = match self.0? {
            Value::Array(items) => items.get(index),
            Value::Object(fields) => fields.get(name),
            _ => None,
        };
        found.filter(|v| !v.is_null())
    }

    /// A parameter that must be present.
    pub fn required<T: DeserializeOwned>(&self, index: usize, name: &str) -> ApiResult<T> {
        let value = self.lookup(index, name).ok_or_else(|| {
            ApiError::invalid_params(format!("missing parameter '{}' at index {}", name, index))
        })?;
        serde_json::from_value(value.clone())
            .map_err(|e| ApiError::invalid_params(format!("parameter '{}': {}", name, e)))
    }

    /// A parameter that may be absent or null. A present but malformed
    /// value is still an error.
    pub fn optional<T: DeserializeOwned>(&self, index: usize, name: &str) -> ApiResult<Option<T>> {
        match self.lookup(index, name) {
            None => Ok(None),
            Some(value) => serde_json::from_value(value.clone())
                .map(Some)
                .map_err(|e| ApiError::invalid_params(format!("parameter '{}': {}", name, e))),
        }
    }
}

/// Serialize a handler result.
pub(crate) fn to_result<T: Serialize>(value: T) -> ApiResult<Value> {
    serde_json::to_value(value).map_err(|e| {
        error!(error = %e, "Failed to serialize RPC result");
        ApiError::internal()
    })
}

/// Only reachable if the method table and a namespace drift apart.
pub(crate) fn unknown_operation(namespace: &str, op: &str) -> ApiError {
    ApiError::method_not_found(&format!("{}.{}", namespace, op))
}
