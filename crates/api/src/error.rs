//! JSON error bodies.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use cmis_core::feature_flag::FeatureFlagError;
use cmis_shared::AppError;
use serde_json::json;
use tracing::error;

/// Maps a feature flag error to its HTTP response.
///
/// Database failures are logged and reported without detail.
pub fn flag_error_response(e: FeatureFlagError) -> Response {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    match &e {
        FeatureFlagError::DependencyNotMet { flag, missing } => (
            status,
            Json(json!({
                "error": e.error_code(),
                "message": e.to_string(),
                "flag_key": flag,
                "missing": missing
            })),
        )
            .into_response(),
        FeatureFlagError::Overridden { flag, by, .. } => (
            status,
            Json(json!({
                "error": e.error_code(),
                "message": e.to_string(),
                "flag_key": flag,
                "overridden_by": by
            })),
        )
            .into_response(),
        FeatureFlagError::Database(message) => {
            error!(error = %message, "Feature flag database error");
            (
                status,
                Json(json!({
                    "error": e.error_code(),
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
        _ => (
            status,
            Json(json!({
                "error": e.error_code(),
                "message": e.to_string()
            })),
        )
            .into_response(),
    }
}

/// Maps an application error to its HTTP response.
pub fn app_error_response(e: &AppError) -> Response {
    let status =
        StatusCode::from_u16(e.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let code = e.error_code().to_lowercase();

    match e {
        AppError::Database(_) | AppError::Internal(_) | AppError::Configuration(_) => {
            error!(error = %e, "Request failed");
            (
                status,
                Json(json!({
                    "error": code,
                    "message": "An error occurred"
                })),
            )
                .into_response()
        }
        _ => (
            status,
            Json(json!({
                "error": code,
                "message": e.to_string()
            })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_dependency_error_lists_missing_flags() {
        let response = flag_error_response(FeatureFlagError::DependencyNotMet {
            flag: "paid_campaigns.google.enabled".into(),
            missing: vec!["paid_campaigns.meta.enabled".into()],
        });
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let body = body_json(response).await;
        assert_eq!(body["error"], "dependency_not_met");
        assert_eq!(body["missing"], json!(["paid_campaigns.meta.enabled"]));
    }

    #[tokio::test]
    async fn test_app_error_uses_lowercase_code() {
        let response = app_error_response(&AppError::NotFound("organization".into()));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = body_json(response).await;
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], "Not found: organization");
    }

    #[tokio::test]
    async fn test_database_error_hides_detail() {
        let response =
            flag_error_response(FeatureFlagError::Database("connection refused".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "internal_error");
        assert_eq!(body["message"], "An error occurred");
    }
}
