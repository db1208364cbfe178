//! `news.*` handlers.

use super::{to_result, unknown_operation, Params};
use crate::domain::error::ApiResult;
use cms_03_news_publishing::{ArticleInput, NewsApi, PublishStatus};
use serde_json::Value;
use shared_types::{RecordId, Session};

/// Handle one news operation.
pub async fn dispatch(
    api: &dyn NewsApi,
    op: &str,
    params: Params<'_>,
    session: Option<&Session>,
) -> ApiResult<Value> {
    match op {
        "list" => to_result(api.list_published().await?),
        "getBySlug" => {
            let slug: String = params.required(0, "slug")?;
            to_result(api.get_by_slug(&slug).await?)
        }
        "listAll" => {
            let status: Option<PublishStatus> = params.optional(0, "status")?;
            to_result(api.list_all(session, status).await?)
        }
        "get" => {
            let id: RecordId = params.required(0, "id")?;
            to_result(api.get(session, id).await?)
        }
        "create" => {
            let input: ArticleInput = params.required(0, "data")?;
            to_result(api.create(session, input).await?)
        }
        "update" => {
            let id: RecordId = params.required(0, "id")?;
            let input: ArticleInput = params.required(1, "data")?;
            to_result(api.update(session, id, input).await?)
        }
        "setStatus" => {
            let id: RecordId = params.required(0, "id")?;
            let status: PublishStatus = params.required(1, "status")?;
            to_result(api.set_status(session, id, status).await?)
        }
        "delete" => {
            let id: RecordId = params.required(0, "id")?;
            api.delete(session, id).await?;
            Ok(Value::Bool(true))
        }
        "listTags" => to_result(api.list_tags(session).await?),
        _ => Err(unknown_operation("news", op)),
    }
}
