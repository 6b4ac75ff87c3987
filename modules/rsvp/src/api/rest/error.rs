use api_ingress::problem::{from_parts, ProblemResponse, ValidationError};
use axum::http::StatusCode;

use crate::domain::error::DomainError;

/// Map a domain error to an RFC 9457 problem response.
pub fn map_domain_error(e: &DomainError, instance: &str) -> ProblemResponse {
    match e {
        DomainError::EmptyName { field } => validation_problem(e, field, instance),
        DomainError::Validation { field, .. } => validation_problem(e, field, instance),
        DomainError::NotFound { id } => from_parts(
            StatusCode::NOT_FOUND,
            "RSVP_NOT_FOUND",
            "Response not found",
            format!("Response with id {id} was not found"),
            instance,
        ),
        DomainError::Unauthorized => from_parts(
            StatusCode::UNAUTHORIZED,
            "RSVP_UNAUTHORIZED",
            "Unauthorized",
            "Credenziali errate",
            instance,
        ),
        DomainError::StoreUnavailable { .. } => {
            // Details stay in the log, not in the response
            tracing::error!(error = %e, "Response store error");
            let mut problem = from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "RSVP_STORE_UNAVAILABLE",
                "Store unavailable",
                "The response store is temporarily unavailable",
                instance,
            );
            problem.0 = problem.0.retryable();
            problem
        }
        DomainError::ReportFailed { .. } => {
            tracing::error!(error = %e, "Report rendering failed");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "RSVP_REPORT_FAILED",
                "Report failed",
                "The report could not be generated",
                instance,
            )
        }
    }
}

fn validation_problem(e: &DomainError, field: &str, instance: &str) -> ProblemResponse {
    let mut problem = from_parts(
        StatusCode::BAD_REQUEST,
        "RSVP_VALIDATION",
        "Validation error",
        e.to_string(),
        instance,
    );
    problem.0 = problem.0.with_errors(vec![ValidationError {
        detail: e.to_string(),
        pointer: format!("/{field}"),
    }]);
    problem
}
