use std::sync::Arc;

use api_ingress::problem::{Problem, ProblemResponse};
use axum::{
    extract::{OriginalUri, Path, Query},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Json, Redirect, Response},
    Extension,
};
use chrono::Utc;
use tracing::{field::Empty, info, instrument, Span};
use uuid::Uuid;

use crate::api::rest::auth::AdminGuard;
use crate::api::rest::dto::{
    parse_language, CatalogDto, GuestResponseDto, GuestResponseListDto, LangQuery, LoginReq,
    MapQuery, ReportDto, SearchQuery, SubmitRsvpReq, VenueDto,
};
use crate::api::rest::error::map_domain_error;
use crate::domain::error::DomainError;
use crate::domain::service::Service;
use crate::domain::venue::maps_search_url;

type ApiResult<T> = Result<T, ProblemResponse>;

/// Submit an RSVP
#[utoipa::path(
    post,
    path = "/rsvp/v1/responses",
    tag = "rsvp",
    request_body = SubmitRsvpReq,
    responses(
        (status = 201, description = "Response stored", body = GuestResponseDto),
        (status = 400, description = "Missing name or unknown category", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Store unavailable, retry", body = Problem, content_type = "application/problem+json"),
    )
)]
#[instrument(name = "rsvp.api.submit", skip_all, fields(response_id = Empty))]
pub async fn submit_response(
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    Json(req): Json<SubmitRsvpReq>,
) -> ApiResult<(StatusCode, Json<GuestResponseDto>)> {
    let new = req
        .into_new_response(svc.config().default_language)
        .map_err(|e| map_domain_error(&e, uri.path()))?;

    let created = svc
        .submit(new)
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    Span::current().record("response_id", tracing::field::display(created.id));

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Dietary categories with labels in the requested language
#[utoipa::path(
    get,
    path = "/rsvp/v1/categories",
    tag = "rsvp",
    params(LangQuery),
    responses(
        (status = 200, description = "Catalog", body = CatalogDto),
        (status = 400, description = "Unsupported language", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_categories(
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<LangQuery>,
) -> ApiResult<Json<CatalogDto>> {
    let lang = parse_language(query.lang.as_deref(), svc.config().default_language)
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    Ok(Json(CatalogDto::for_language(lang)))
}

/// Check an admin credential pair
#[utoipa::path(
    post,
    path = "/rsvp/v1/admin/login",
    tag = "admin",
    request_body = LoginReq,
    responses(
        (status = 204, description = "Credentials accepted"),
        (status = 401, description = "Credenziali errate", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn admin_login(
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    Json(req): Json<LoginReq>,
) -> ApiResult<StatusCode> {
    svc.verify_admin(&req.username, &req.password)
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    info!("Admin logged in");
    Ok(StatusCode::NO_CONTENT)
}

/// All responses, newest first
#[utoipa::path(
    get,
    path = "/rsvp/v1/admin/responses",
    tag = "admin",
    params(SearchQuery),
    security(("admin_basic" = [])),
    responses(
        (status = 200, description = "Responses", body = GuestResponseListDto),
        (status = 401, description = "Credenziali errate", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Store unavailable", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn list_responses(
    _admin: AdminGuard,
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Json<GuestResponseListDto>> {
    let records = svc
        .list(query.search.as_deref())
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;

    let items: Vec<GuestResponseDto> = records.into_iter().map(Into::into).collect();
    Ok(Json(GuestResponseListDto {
        total: items.len(),
        items,
    }))
}

/// One response, text as stored
#[utoipa::path(
    get,
    path = "/rsvp/v1/admin/responses/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Response id")),
    security(("admin_basic" = [])),
    responses(
        (status = 200, description = "Response", body = GuestResponseDto),
        (status = 401, description = "Credenziali errate", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Not found", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_response(
    _admin: AdminGuard,
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<GuestResponseDto>> {
    let record = svc
        .get(id)
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    Ok(Json(record.into()))
}

/// Delete one response
#[utoipa::path(
    delete,
    path = "/rsvp/v1/admin/responses/{id}",
    tag = "admin",
    params(("id" = Uuid, Path, description = "Response id")),
    security(("admin_basic" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Credenziali errate", body = Problem, content_type = "application/problem+json"),
        (status = 404, description = "Already gone", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn delete_response(
    admin: AdminGuard,
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    svc.delete(id)
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    info!(response_id = %id, admin = %admin.username, "Response deleted by admin");
    Ok(StatusCode::NO_CONTENT)
}

/// Aggregate report as JSON
#[utoipa::path(
    get,
    path = "/rsvp/v1/admin/report",
    tag = "admin",
    security(("admin_basic" = [])),
    responses(
        (status = 200, description = "Report", body = ReportDto),
        (status = 401, description = "Credenziali errate", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn get_report(
    _admin: AdminGuard,
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Json<ReportDto>> {
    let report = svc
        .report(Utc::now())
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;
    Ok(Json(report.into()))
}

/// Aggregate report as a PDF download
#[utoipa::path(
    get,
    path = "/rsvp/v1/admin/report.pdf",
    tag = "admin",
    security(("admin_basic" = [])),
    responses(
        (status = 200, description = "PDF document", body = String, content_type = "application/pdf"),
        (status = 401, description = "Credenziali errate", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Rendering failed", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn export_report(
    _admin: AdminGuard,
    Extension(svc): Extension<Arc<Service>>,
    OriginalUri(uri): OriginalUri,
) -> ApiResult<Response> {
    let bytes = svc
        .export_report(Utc::now())
        .await
        .map_err(|e| map_domain_error(&e, uri.path()))?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        svc.config().report_filename
    );
    let disposition = HeaderValue::from_str(&disposition).map_err(|e| {
        map_domain_error(
            &DomainError::report(anyhow::anyhow!("invalid report filename: {e}")),
            uri.path(),
        )
    })?;

    let mut resp = bytes.into_response();
    let headers = resp.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(svc.report_content_type()),
    );
    headers.insert(header::CONTENT_DISPOSITION, disposition);
    Ok(resp)
}

/// Ceremony and reception venues
#[utoipa::path(
    get,
    path = "/rsvp/v1/venue",
    tag = "rsvp",
    responses((status = 200, description = "Venues", body = [VenueDto]))
)]
pub async fn list_venues(Extension(svc): Extension<Arc<Service>>) -> Json<Vec<VenueDto>> {
    Json(svc.venues().iter().map(VenueDto::from).collect())
}

/// Redirect to a map search for a place
#[utoipa::path(
    get,
    path = "/rsvp/v1/venue/map",
    tag = "rsvp",
    params(MapQuery),
    responses(
        (status = 303, description = "Redirect to the map search"),
        (status = 400, description = "Empty place", body = Problem, content_type = "application/problem+json"),
    )
)]
pub async fn open_map(
    OriginalUri(uri): OriginalUri,
    Query(query): Query<MapQuery>,
) -> ApiResult<Redirect> {
    if query.q.trim().is_empty() {
        return Err(map_domain_error(
            &DomainError::validation("q", "place cannot be empty"),
            uri.path(),
        ));
    }
    Ok(Redirect::to(&maps_search_url(query.q.trim())))
}
