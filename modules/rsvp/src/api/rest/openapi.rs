use api_ingress::problem::{Problem, ValidationError};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::rest::{dto, handlers};

#[derive(OpenApi)]
#[openapi(
    info(title = "Wedding RSVP API", description = "Guest RSVP intake and admin reporting"),
    paths(
        handlers::submit_response,
        handlers::get_categories,
        handlers::list_venues,
        handlers::open_map,
        handlers::admin_login,
        handlers::list_responses,
        handlers::get_response,
        handlers::delete_response,
        handlers::get_report,
        handlers::export_report,
    ),
    components(schemas(
        dto::SubmitRsvpReq,
        dto::GuestResponseDto,
        dto::GuestResponseListDto,
        dto::LoginReq,
        dto::CatalogDto,
        dto::CategoryGroupDto,
        dto::CategoryDto,
        dto::ReportDto,
        dto::ReportRowDto,
        dto::TokenCountDto,
        dto::VenueDto,
        Problem,
        ValidationError,
    )),
    modifiers(&AdminBasicAuth),
    tags(
        (name = "rsvp", description = "Guest facing endpoints"),
        (name = "admin", description = "Endpoints behind the admin credentials"),
    )
)]
pub struct ApiDoc;

struct AdminBasicAuth;

impl Modify for AdminBasicAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "admin_basic",
            SecurityScheme::Http(HttpBuilder::new().scheme(HttpAuthScheme::Basic).build()),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route_and_the_basic_scheme() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/rsvp/v1/responses",
            "/rsvp/v1/categories",
            "/rsvp/v1/venue",
            "/rsvp/v1/venue/map",
            "/rsvp/v1/admin/login",
            "/rsvp/v1/admin/responses",
            "/rsvp/v1/admin/responses/{id}",
            "/rsvp/v1/admin/report",
            "/rsvp/v1/admin/report.pdf",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }

        let schemes = &doc.components.as_ref().unwrap().security_schemes;
        assert!(schemes.contains_key("admin_basic"));
    }
}
