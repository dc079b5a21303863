//! Feature flag admin routes.
//!
//! Every route is scoped to an organization. Writes go to the
//! organization's own flag rows; system defaults are never modified here.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use cmis_core::feature_flag::{FeatureFlagError, FlagFilter, StatusFilter};
use cmis_db::TenantExt;
use cmis_db::entities::orgs;
use cmis_db::repositories::{
    OverrideInput,
    feature_flag::{ORGANIZATION_TARGET, USER_TARGET},
};
use cmis_shared::AppError;
use sea_orm::{DbErr, EntityTrait};
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use crate::AppState;
use crate::error::{app_error_response, flag_error_response};

/// Creates the feature flag routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orgs/{org_id}/feature-flags", get(list_flags))
        .route("/orgs/{org_id}/feature-flags/matrix", get(feature_matrix))
        .route("/orgs/{org_id}/feature-flags/enable-all", post(enable_all))
        .route("/orgs/{org_id}/feature-flags/disable-all", post(disable_all))
        .route("/orgs/{org_id}/feature-flags/{flag_key}", get(get_flag))
        .route(
            "/orgs/{org_id}/feature-flags/{flag_key}/toggle",
            post(toggle_flag),
        )
        .route(
            "/orgs/{org_id}/feature-flags/{flag_key}/overrides",
            post(create_override),
        )
}

// ============================================================================
// Request Types
// ============================================================================

/// Query string of the list and bulk routes.
#[derive(Debug, Default, Deserialize)]
pub struct FilterQuery {
    /// Category to keep; absent or `all` keeps every category.
    pub category: Option<String>,
    /// `all`, `enabled`, `disabled` or `experimental`.
    pub status: Option<String>,
}

impl FilterQuery {
    fn into_filter(self) -> Result<FlagFilter, FeatureFlagError> {
        let status = match self.status.as_deref() {
            None | Some("") => StatusFilter::All,
            Some(status) => status.parse()?,
        };
        Ok(FlagFilter {
            category: self.category,
            status,
        })
    }
}

/// Query string of the single-flag read.
#[derive(Debug, Default, Deserialize)]
pub struct EffectiveQuery {
    /// Resolve for this user, honouring user overrides.
    pub user_id: Option<Uuid>,
}

/// Body of the toggle route.
#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    /// Requested organization value.
    pub enabled: bool,
}

/// Body of the override route.
#[derive(Debug, Deserialize)]
pub struct OverrideRequest {
    /// Target a single user; the organization itself when absent.
    pub user_id: Option<Uuid>,
    /// Forced value.
    pub value: bool,
    /// Why the override exists.
    pub reason: Option<String>,
    /// When the override stops applying.
    pub expires_at: Option<DateTime<Utc>>,
}

// ============================================================================
// Route Handlers
// ============================================================================

/// GET `/orgs/{org_id}/feature-flags` - List flags with stats.
async fn list_flags(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> impl IntoResponse {
    if let Err(response) = check_organization(&state, org_id).await {
        return response;
    }
    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(e) => return flag_error_response(e),
    };

    match state.flags.list(org_id, &filter).await {
        Ok(list) => (StatusCode::OK, Json(list)).into_response(),
        Err(e) => flag_error_response(e),
    }
}

/// GET `/orgs/{org_id}/feature-flags/{flag_key}` - Effective value.
async fn get_flag(
    State(state): State<AppState>,
    Path((org_id, flag_key)): Path<(Uuid, String)>,
    Query(query): Query<EffectiveQuery>,
) -> impl IntoResponse {
    if let Err(response) = check_organization(&state, org_id).await {
        return response;
    }

    match state.flags.effective(&flag_key, org_id, query.user_id).await {
        Ok(enabled) => (
            StatusCode::OK,
            Json(json!({
                "flag_key": flag_key,
                "enabled": enabled
            })),
        )
            .into_response(),
        Err(e) => flag_error_response(e),
    }
}

/// POST `/orgs/{org_id}/feature-flags/{flag_key}/toggle` - Set the org value.
async fn toggle_flag(
    State(state): State<AppState>,
    Path((org_id, flag_key)): Path<(Uuid, String)>,
    Json(request): Json<ToggleRequest>,
) -> impl IntoResponse {
    if let Err(response) = check_organization(&state, org_id).await {
        return response;
    }

    match state.flags.toggle(org_id, &flag_key, request.enabled).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => {
            info!(org_id = %org_id, flag_key = %flag_key, error = %e, "Toggle refused");
            flag_error_response(e)
        }
    }
}

/// POST `/orgs/{org_id}/feature-flags/enable-all` - Enable every visible flag.
async fn enable_all(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> impl IntoResponse {
    if let Err(response) = check_organization(&state, org_id).await {
        return response;
    }
    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(e) => return flag_error_response(e),
    };

    match state.flags.enable_all(org_id, &filter).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => flag_error_response(e),
    }
}

/// POST `/orgs/{org_id}/feature-flags/disable-all` - Disable every visible flag.
async fn disable_all(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
    Query(query): Query<FilterQuery>,
) -> impl IntoResponse {
    if let Err(response) = check_organization(&state, org_id).await {
        return response;
    }
    let filter = match query.into_filter() {
        Ok(filter) => filter,
        Err(e) => return flag_error_response(e),
    };

    match state.flags.disable_all(org_id, &filter).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => flag_error_response(e),
    }
}

/// GET `/orgs/{org_id}/feature-flags/matrix` - Feature by platform matrix.
async fn feature_matrix(
    State(state): State<AppState>,
    Path(org_id): Path<Uuid>,
) -> impl IntoResponse {
    if let Err(response) = check_organization(&state, org_id).await {
        return response;
    }

    match state.flags.feature_matrix(org_id).await {
        Ok(matrix) => (StatusCode::OK, Json(json!({ "matrix": matrix }))).into_response(),
        Err(e) => flag_error_response(e),
    }
}

/// POST `/orgs/{org_id}/feature-flags/{flag_key}/overrides` - Force a value.
async fn create_override(
    State(state): State<AppState>,
    Path((org_id, flag_key)): Path<(Uuid, String)>,
    Json(request): Json<OverrideRequest>,
) -> impl IntoResponse {
    if let Err(response) = check_organization(&state, org_id).await {
        return response;
    }

    let (target_type, target_id) = match request.user_id {
        Some(user_id) => (USER_TARGET, user_id),
        None => (ORGANIZATION_TARGET, org_id),
    };
    let input = OverrideInput {
        target_type: target_type.to_string(),
        target_id,
        value: request.value,
        reason: request.reason,
        expires_at: request.expires_at,
    };

    match state.flags.set_override(&flag_key, input).await {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(e) => flag_error_response(e),
    }
}

/// Looks the organization up under its own tenant context, so row-level
/// security admits the row.
async fn find_organization(
    state: &AppState,
    org_id: Uuid,
) -> Result<Option<orgs::Model>, DbErr> {
    let tenant = state.db.with_tenant(org_id).await?;
    let org = orgs::Entity::find_by_id(org_id)
        .one(tenant.transaction())
        .await?;
    tenant.commit().await?;
    Ok(org)
}

async fn check_organization(state: &AppState, org_id: Uuid) -> Result<(), Response> {
    match find_organization(state, org_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(app_error_response(&AppError::NotFound(format!(
            "organization {org_id}"
        )))),
        Err(e) => Err(app_error_response(&AppError::Database(e.to_string()))),
    }
}
