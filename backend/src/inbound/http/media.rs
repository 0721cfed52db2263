//! Media upload endpoints. Object bytes go straight to the store via
//! signed URLs; these routes only manage asset rows and tickets.

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::ids::MediaAssetId;
use crate::domain::media::{MediaAsset, MediaType};
use crate::domain::media_service::{UploadMetadata, UploadTicket};
use crate::inbound::http::ApiResult;
use crate::inbound::http::pagination::{PageQuery, Paginated};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Upload ticket request body.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUploadRequest {
    pub filename: String,
    pub media_type: MediaType,
    pub content_type: String,
    #[serde(default)]
    pub byte_size: Option<i64>,
}

/// Post-upload metadata body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmUploadRequest {
    #[serde(default)]
    pub byte_size: Option<i64>,
    #[serde(default)]
    pub width: Option<i32>,
    #[serde(default)]
    pub height: Option<i32>,
    #[serde(default)]
    pub duration_seconds: Option<i32>,
}

impl From<ConfirmUploadRequest> for UploadMetadata {
    fn from(request: ConfirmUploadRequest) -> Self {
        Self {
            byte_size: request.byte_size,
            width: request.width,
            height: request.height,
            duration_seconds: request.duration_seconds,
        }
    }
}

/// An issued upload ticket: the asset row plus the URLs the client needs.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UploadTicketResponse {
    pub asset: MediaAsset,
    pub upload_url: String,
    pub public_url: String,
}

impl From<UploadTicket> for UploadTicketResponse {
    fn from(ticket: UploadTicket) -> Self {
        Self {
            asset: ticket.asset,
            upload_url: ticket.upload_url,
            public_url: ticket.public_url,
        }
    }
}

/// A signed download URL.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadUrlResponse {
    pub url: String,
}

/// Register an upload and receive a signed PUT URL for it.
#[utoipa::path(
    post,
    path = "/api/v1/media/uploads",
    request_body = CreateUploadRequest,
    responses(
        (status = 201, description = "Upload ticket", body = UploadTicketResponse),
        (status = 400, description = "Content type not allowed", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["media"],
    operation_id = "createUpload"
)]
#[post("/media/uploads")]
pub async fn create_upload(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateUploadRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let CreateUploadRequest {
        filename,
        media_type,
        content_type,
        byte_size,
    } = payload.into_inner();
    let ticket = state
        .media
        .create_upload_url(user_id, &filename, media_type, &content_type, byte_size)
        .await?;
    Ok(HttpResponse::Created().json(UploadTicketResponse::from(ticket)))
}

/// Report dimensions and size once the PUT finished. Owner only.
#[utoipa::path(
    post,
    path = "/api/v1/media/{id}/confirm",
    params(("id" = Uuid, Path, description = "Asset id")),
    request_body = ConfirmUploadRequest,
    responses(
        (status = 200, description = "Updated asset", body = MediaAsset),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["media"],
    operation_id = "confirmUpload"
)]
#[post("/media/{id}/confirm")]
pub async fn confirm_upload(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<MediaAssetId>,
    payload: web::Json<ConfirmUploadRequest>,
) -> ApiResult<web::Json<MediaAsset>> {
    let user_id = session.require_user_id()?;
    let asset = state
        .media
        .confirm_upload(user_id, *id, payload.into_inner().into())
        .await?;
    Ok(web::Json(asset))
}

/// A time-limited signed GET URL for an asset.
#[utoipa::path(
    get,
    path = "/api/v1/media/{id}/download-url",
    params(("id" = Uuid, Path, description = "Asset id")),
    responses(
        (status = 200, description = "Signed URL", body = DownloadUrlResponse),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["media"],
    operation_id = "downloadUrl"
)]
#[get("/media/{id}/download-url")]
pub async fn download_url(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<MediaAssetId>,
) -> ApiResult<web::Json<DownloadUrlResponse>> {
    session.require_user_id()?;
    let url = state.media.download_url(*id).await?;
    Ok(web::Json(DownloadUrlResponse { url }))
}

/// Delete an asset. Owner only.
#[utoipa::path(
    delete,
    path = "/api/v1/media/{id}",
    params(("id" = Uuid, Path, description = "Asset id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["media"],
    operation_id = "deleteAsset"
)]
#[delete("/media/{id}")]
pub async fn delete_asset(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<MediaAssetId>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    state.media.delete_asset(user_id, *id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// The caller's assets, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/media",
    params(PageQuery),
    responses(
        (status = 200, description = "Assets", body = Paginated<MediaAsset>),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["media"],
    operation_id = "listMyAssets"
)]
#[get("/media")]
pub async fn list_my_assets(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<MediaAsset>>> {
    let user_id = session.require_user_id()?;
    let page = query.to_page()?;
    Ok(web::Json(
        state.media.list_my_assets(user_id, page).await?.into(),
    ))
}
