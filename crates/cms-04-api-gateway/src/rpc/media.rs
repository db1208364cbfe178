//! `media.*` handlers.

use super::{to_result, unknown_operation, Params};
use crate::domain::error::ApiResult;
use cms_01_media_storage::{MediaApi, UploadRequest};
use serde_json::Value;
use shared_types::Session;

/// Handle one media operation.
pub async fn dispatch(
    api: &dyn MediaApi,
    op: &str,
    params: Params<'_>,
    session: Option<&Session>,
) -> ApiResult<Value> {
    match op {
        "requestUpload" => {
            let request: UploadRequest = params.required(0, "data")?;
            to_result(api.request_upload(session, request).await?)
        }
        _ => Err(unknown_operation("media", op)),
    }
}
