use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::catalog::{ItemImageInfo, NewItemImage};
use crate::errors::AppError;
use crate::AppState;

use super::blocking;

#[derive(Debug, Deserialize, IntoParams)]
pub struct UploadParams {
    /// Original file name, kept for downloads.
    pub filename: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ImageResponse {
    pub id: i32,
    pub item_id: i32,
    pub content_type: String,
    pub original_file_name: Option<String>,
    /// Content length in bytes
    pub size: i32,
}

impl From<ItemImageInfo> for ImageResponse {
    fn from(i: ItemImageInfo) -> Self {
        ImageResponse {
            id: i.id,
            item_id: i.item_id,
            content_type: i.content_type,
            original_file_name: i.original_file_name,
            size: i.size,
        }
    }
}

/// POST /items/{id}/images
///
/// The request body is the raw image; its `Content-Type` is stored with it.
#[utoipa::path(
    post,
    path = "/items/{id}/images",
    params(("id" = i32, Path, description = "Item id"), UploadParams),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 201, description = "Image stored", body = ImageResponse),
        (status = 400, description = "Empty body or bad metadata", body = super::ErrorResponse),
        (status = 404, description = "Item not found", body = super::ErrorResponse),
        (status = 413, description = "Image too large"),
    ),
    tag = "items"
)]
pub async fn upload_image(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    query: web::Query<UploadParams>,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, AppError> {
    let content_type = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();

    let image = NewItemImage {
        item_id: path.into_inner(),
        content_type,
        original_file_name: query.into_inner().filename,
        content: body.to_vec(),
    };
    let info = blocking(move || state.catalog.add_image(image)).await?;
    Ok(HttpResponse::Created().json(ImageResponse::from(info)))
}

/// GET /items/{id}/images
#[utoipa::path(
    get,
    path = "/items/{id}/images",
    params(("id" = i32, Path, description = "Item id")),
    responses(
        (status = 200, description = "Image metadata", body = Vec<ImageResponse>),
        (status = 404, description = "Item not found", body = super::ErrorResponse),
    ),
    tag = "items"
)]
pub async fn list_images(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let item_id = path.into_inner();
    let images = blocking(move || state.catalog.list_images(item_id)).await?;
    let body: Vec<ImageResponse> = images.into_iter().map(Into::into).collect();
    Ok(HttpResponse::Ok().json(body))
}

/// GET /images/{id}
#[utoipa::path(
    get,
    path = "/images/{id}",
    params(("id" = i32, Path, description = "Image id")),
    responses(
        (status = 200, description = "Image content", content_type = "application/octet-stream"),
        (status = 404, description = "Image not found", body = super::ErrorResponse),
    ),
    tag = "items"
)]
pub async fn download_image(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    let image = blocking(move || state.catalog.image_content(id)).await?;

    let mut resp = HttpResponse::Ok();
    resp.content_type(image.content_type);
    if let Some(name) = image.original_file_name {
        resp.insert_header(header::ContentDisposition {
            disposition: header::DispositionType::Inline,
            parameters: vec![header::DispositionParam::Filename(name)],
        });
    }
    Ok(resp.body(image.content))
}

/// DELETE /images/{id}
#[utoipa::path(
    delete,
    path = "/images/{id}",
    params(("id" = i32, Path, description = "Image id")),
    responses(
        (status = 204, description = "Image deleted"),
        (status = 404, description = "Image not found", body = super::ErrorResponse),
    ),
    tag = "items"
)]
pub async fn delete_image(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    blocking(move || state.catalog.delete_image(id)).await?;
    Ok(HttpResponse::NoContent().finish())
}
