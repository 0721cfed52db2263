//! Company page endpoints.

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::company::Company;
use crate::domain::company_service::{CreateCompanyInput, UpdateCompanyInput};
use crate::domain::ids::CompanyId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::pagination::{PageQuery, Paginated};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Company creation body. A missing slug derives from the name.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompanyRequest {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Partial company update.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCompanyRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Create a company page; the caller becomes its owner member.
#[utoipa::path(
    post,
    path = "/api/v1/companies",
    request_body = CreateCompanyRequest,
    responses(
        (status = 201, description = "Created company", body = Company),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 409, description = "Slug already taken", body = crate::domain::Error)
    ),
    tags = ["companies"],
    operation_id = "createCompany"
)]
#[post("/companies")]
pub async fn create_company(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateCompanyRequest>,
) -> ApiResult<HttpResponse> {
    let user_id = session.require_user_id()?;
    let CreateCompanyRequest {
        name,
        slug,
        description,
    } = payload.into_inner();
    let company = state
        .companies
        .create_company(
            user_id,
            CreateCompanyInput {
                name,
                slug,
                description,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(company))
}

/// A company page by id.
#[utoipa::path(
    get,
    path = "/api/v1/companies/{id}",
    params(("id" = Uuid, Path, description = "Company id")),
    responses(
        (status = 200, description = "Company", body = Company),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["companies"],
    operation_id = "getCompany",
    security([])
)]
#[get("/companies/{id}")]
pub async fn get_company(
    state: web::Data<HttpState>,
    id: web::Path<CompanyId>,
) -> ApiResult<web::Json<Company>> {
    Ok(web::Json(state.companies.get_company(*id).await?))
}

/// Company pages, name ascending.
#[utoipa::path(
    get,
    path = "/api/v1/companies",
    params(PageQuery),
    responses((status = 200, description = "Companies", body = Paginated<Company>)),
    tags = ["companies"],
    operation_id = "listCompanies",
    security([])
)]
#[get("/companies")]
pub async fn list_companies(
    state: web::Data<HttpState>,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Paginated<Company>>> {
    let page = query.to_page()?;
    Ok(web::Json(state.companies.list_companies(page).await?.into()))
}

/// Company pages the caller is a member of.
#[utoipa::path(
    get,
    path = "/api/v1/companies/mine",
    responses(
        (status = 200, description = "Member companies", body = [Company]),
        (status = 401, description = "Unauthorised", body = crate::domain::Error)
    ),
    tags = ["companies"],
    operation_id = "listMyCompanies"
)]
#[get("/companies/mine")]
pub async fn list_my_companies(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Company>>> {
    let user_id = session.require_user_id()?;
    Ok(web::Json(state.companies.list_my_companies(user_id).await?))
}

/// Update a company page. Owner or admin members only.
#[utoipa::path(
    patch,
    path = "/api/v1/companies/{id}",
    params(("id" = Uuid, Path, description = "Company id")),
    request_body = UpdateCompanyRequest,
    responses(
        (status = 200, description = "Updated company", body = Company),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 403, description = "Not a managing member", body = crate::domain::Error),
        (status = 404, description = "Not found", body = crate::domain::Error)
    ),
    tags = ["companies"],
    operation_id = "updateCompany"
)]
#[patch("/companies/{id}")]
pub async fn update_company(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<CompanyId>,
    payload: web::Json<UpdateCompanyRequest>,
) -> ApiResult<web::Json<Company>> {
    let user_id = session.require_user_id()?;
    let UpdateCompanyRequest { name, description } = payload.into_inner();
    let company = state
        .companies
        .update_company(user_id, *id, UpdateCompanyInput { name, description })
        .await?;
    Ok(web::Json(company))
}
