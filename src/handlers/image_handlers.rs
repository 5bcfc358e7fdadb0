//! HTTP handlers for the image-hosting surface.
//! Authenticates uploads before any body work and delegates storage
//! concerns to the shared object-store handle in `AppState`.

use crate::{errors::AppError, services::object_store::single_chunk, state::AppState};
use axum::{
    body::Body,
    extract::{FromRequest, Multipart, Query, Request, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use bytes::Bytes;
use chrono::Utc;
use serde::Deserialize;
use tracing::info;

/// Objects per listing page.
pub const PAGE_SIZE: usize = 100;

/// Query params accepted by the listing page.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub cursor: Option<String>,
}

/// Query params accepted by the fetch endpoint.
#[derive(Debug, Deserialize)]
pub struct FetchQuery {
    pub image: Option<String>,
}

/// Decoded upload form. Unknown form fields are ignored.
#[derive(Debug)]
struct UploadForm {
    filetype: String,
    payload: Bytes,
}

/// Upload an image via `POST /`.
///
/// The `Authorization` header must equal the configured key verbatim, with
/// no scheme prefix. The check runs before the body is touched so rejected
/// requests cost no parsing and no store traffic.
pub async fn upload_image(
    State(state): State<AppState>,
    req: Request,
) -> Result<Response, AppError> {
    let authorized = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value == state.auth_key);
    if !authorized {
        return Err(AppError::unauthorized());
    }

    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();
    if !content_type.contains("multipart/form-data") {
        return Err(AppError::bad_request("Content-Type not accepted"));
    }

    let multipart = Multipart::from_request(req, &())
        .await
        .map_err(|err| AppError::internal(err.to_string()))?;
    let form = read_upload_form(multipart).await?;

    let key = mint_key(&form.filetype);
    let size = form.payload.len() as u64;
    state.store.put(&key, single_chunk(form.payload), size).await?;

    info!("accepted upload `{}` ({} bytes)", key, size);
    Ok((StatusCode::OK, "OK").into_response())
}

/// Walk the multipart fields, keeping the first `filetype` and `image`
/// parts in whatever order the client sent them.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut filetype: Option<String> = None;
    let mut payload: Option<Bytes> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => return Err(AppError::internal(err.to_string())),
        };
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("filetype") if filetype.is_none() => {
                let value = field
                    .text()
                    .await
                    .map_err(|err| AppError::internal(err.to_string()))?;
                filetype = Some(value);
            }
            Some("image") if payload.is_none() => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|err| AppError::internal(err.to_string()))?;
                payload = Some(bytes);
            }
            _ => {}
        }
    }

    let Some(payload) = payload else {
        return Err(AppError::bad_request("no image"));
    };
    Ok(UploadForm {
        filetype: filetype.unwrap_or_default(),
        payload,
    })
}

/// Keys are `<unix-seconds>.<filetype>`. Two uploads with the same filetype
/// in the same second overwrite each other.
fn mint_key(filetype: &str) -> String {
    format!("{}.{}", Utc::now().timestamp(), filetype)
}

/// Render the paginated listing via `GET /`.
///
/// An absent or empty `cursor` starts from the beginning; otherwise the
/// value passes to the store untouched.
pub async fn list_images(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let cursor = query.cursor.filter(|cursor| !cursor.is_empty());
    let page = state.store.list(None, cursor.as_deref(), PAGE_SIZE).await?;

    let html = state.template.render(&page.items, page.next_cursor.as_deref());
    Ok(Html(html).into_response())
}

/// Stream one object's bytes via `GET /image?image=<key>`.
///
/// The response carries no Content-Type header; clients sniff the payload.
pub async fn fetch_image(
    State(state): State<AppState>,
    Query(query): Query<FetchQuery>,
) -> Result<Response, AppError> {
    let Some(key) = query.image.filter(|key| !key.is_empty()) else {
        return Err(AppError::bad_request("missing image id"));
    };

    let item = state.store.item(&key).await?;
    let stream = state.store.open(&item.key).await?;

    let mut response = Response::new(Body::from_stream(stream));
    *response.status_mut() = StatusCode::OK;
    Ok(response)
}

/// Shared fallback for unsupported methods on known routes.
pub async fn method_not_allowed() -> Response {
    (StatusCode::METHOD_NOT_ALLOWED, "method not supported").into_response()
}
