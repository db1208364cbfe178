//! `faq.*`, `team.*` and `product.*` handlers.
//!
//! | Operation | Params |
//! |-----------|--------|
//! | `list` | none |
//! | `listAll` | none (products only) |
//! | `get` | `[id]` |
//! | `create` | `[data]` |
//! | `update` | `[id, data]` |
//! | `delete` | `[id]` |
//! | `reorder` | `[ids]` |
//! | `setVisibility` | `[id, hidden]` (products only) |

use super::{to_result, unknown_operation, Params};
use crate::domain::error::ApiResult;
use cms_02_ordered_collections::{
    OrderedCollectionApi, OrderedPayload, ProductCatalogApi, ProductListing,
};
use serde_json::Value;
use shared_types::{RecordId, Session};

/// Handle one operation on an ordered collection.
pub async fn dispatch<P, A>(
    api: &A,
    op: &str,
    params: Params<'_>,
    session: Option<&Session>,
) -> ApiResult<Value>
where
    P: OrderedPayload,
    A: OrderedCollectionApi<P> + ?Sized,
{
    match op {
        "list" => to_result(api.list().await?),
        "listAll" => to_result(api.list_all(session).await?),
        "get" => {
            let id: RecordId = params.required(0, "id")?;
            to_result(api.get(id).await?)
        }
        "create" => {
            let data: P = params.required(0, "data")?;
            to_result(api.create(session, data).await?)
        }
        "update" => {
            let id: RecordId = params.required(0, "id")?;
            let data: P = params.required(1, "data")?;
            to_result(api.update(session, id, data).await?)
        }
        "delete" => {
            let id: RecordId = params.required(0, "id")?;
            api.delete(session, id).await?;
            Ok(Value::Bool(true))
        }
        "reorder" => {
            let ids: Vec<RecordId> = params.required(0, "ids")?;
            api.reorder(session, ids).await?;
            Ok(Value::Bool(true))
        }
        _ => Err(unknown_operation(P::KIND.as_str(), op)),
    }
}

/// Products add visibility on top of the shared operations.
pub async fn dispatch_product(
    api: &dyn ProductCatalogApi,
    op: &str,
    params: Params<'_>,
    session: Option<&Session>,
) -> ApiResult<Value> {
    match op {
        "setVisibility" => {
            let id: RecordId = params.required(0, "id")?;
            let hidden: bool = params.required(1, "hidden")?;
            to_result(api.set_visibility(session, id, hidden).await?)
        }
        _ => dispatch::<ProductListing, dyn ProductCatalogApi>(api, op, params, session).await,
    }
}
