//! Safety REST routes
//!
//! Thin axum handlers over [`SafetyApi`]. Every success body is the
//! facade envelope; lookups that miss map to 404. Presence-check failures
//! and bodies, queries or paths that fail to deserialize map to 400. Every
//! failure body is `{ "success": false, "message": ... }`.

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        FromRequest, FromRequestParts, Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use safety_core::{
    Alert, AlertStatus, Envelope, Incident, IncidentStatus, NewAlert, NewIncident, NewUser,
    SafeZone, SafetyApi, SafetyError, Statistics, User, UserPatch,
};

#[derive(Clone)]
pub struct AppState {
    pub api: SafetyApi,
}

pub enum ApiError {
    Safety(SafetyError),
    /// Body, query or path that does not deserialize
    BadRequest(String),
}

impl From<SafetyError> for ApiError {
    fn from(err: SafetyError) -> Self {
        Self::Safety(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

#[derive(Serialize)]
pub struct FailureEnvelope {
    pub success: bool,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Safety(err) if err.is_not_found() => (StatusCode::NOT_FOUND, err.to_string()),
            Self::Safety(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            Self::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
        };
        tracing::debug!(%status, "{}", message);

        (
            status,
            Json(FailureEnvelope {
                success: false,
                message,
            }),
        )
            .into_response()
    }
}

/// JSON body whose rejections render as the failure envelope.
#[derive(FromRequest)]
#[from_request(via(Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

type ApiResult<T> = Result<Json<Envelope<T>>, ApiError>;

#[derive(Deserialize)]
pub struct StatusUpdate<S> {
    pub status: S,
}

#[derive(Deserialize)]
pub struct NearbyQuery {
    pub lat: f64,
    pub lon: f64,
    /// Kilometres, defaults to 5
    pub radius: Option<f64>,
}

// ========== Users ==========

pub async fn list_users(State(state): State<AppState>) -> Json<Envelope<Vec<User>>> {
    Json(state.api.get_users().await)
}

pub async fn get_user(State(state): State<AppState>, ApiPath(id): ApiPath<u64>) -> ApiResult<User> {
    Ok(Json(state.api.get_user(id).await?))
}

pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewUser>,
) -> Result<(StatusCode, Json<Envelope<User>>), ApiError> {
    let env = state.api.create_user(req).await?;
    tracing::info!(id = env.data.id, "User registered");
    Ok((StatusCode::CREATED, Json(env)))
}

pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(patch): ApiJson<UserPatch>,
) -> ApiResult<User> {
    Ok(Json(state.api.update_user(id, patch).await?))
}

pub async fn delete_user(State(state): State<AppState>, ApiPath(id): ApiPath<u64>) -> ApiResult<User> {
    Ok(Json(state.api.delete_user(id).await?))
}

// ========== Alerts ==========

pub async fn list_alerts(State(state): State<AppState>) -> Json<Envelope<Vec<Alert>>> {
    Json(state.api.get_alerts().await)
}

pub async fn get_alert(State(state): State<AppState>, ApiPath(id): ApiPath<u64>) -> ApiResult<Alert> {
    Ok(Json(state.api.get_alert(id).await?))
}

pub async fn create_alert(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewAlert>,
) -> Result<(StatusCode, Json<Envelope<Alert>>), ApiError> {
    let env = state.api.create_alert(req).await?;
    tracing::info!(id = env.data.id, kind = ?env.data.kind, "Alert raised");
    Ok((StatusCode::CREATED, Json(env)))
}

pub async fn update_alert_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
    ApiJson(req): ApiJson<StatusUpdate<AlertStatus>>,
) -> ApiResult<Alert> {
    Ok(Json(state.api.update_alert_status(id, req.status).await?))
}

pub async fn delete_alert(State(state): State<AppState>, ApiPath(id): ApiPath<u64>) -> ApiResult<Alert> {
    Ok(Json(state.api.delete_alert(id).await?))
}

// ========== Incidents ==========

pub async fn list_incidents(State(state): State<AppState>) -> Json<Envelope<Vec<Incident>>> {
    Json(state.api.get_incidents().await)
}

pub async fn get_incident(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Incident> {
    Ok(Json(state.api.get_incident(&id).await?))
}

pub async fn create_incident(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewIncident>,
) -> Result<(StatusCode, Json<Envelope<Incident>>), ApiError> {
    let env = state.api.create_incident(req).await?;
    tracing::info!(id = %env.data.id, "Incident reported");
    Ok((StatusCode::CREATED, Json(env)))
}

pub async fn update_incident_status(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(req): ApiJson<StatusUpdate<IncidentStatus>>,
) -> ApiResult<Incident> {
    Ok(Json(state.api.update_incident_status(&id, req.status).await?))
}

pub async fn delete_incident(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Incident> {
    Ok(Json(state.api.delete_incident(&id).await?))
}

// ========== Safe zones & statistics ==========

pub async fn list_safe_zones(State(state): State<AppState>) -> Json<Envelope<Vec<SafeZone>>> {
    Json(state.api.get_safe_zones().await)
}

pub async fn nearby_safe_zones(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<NearbyQuery>,
) -> Json<Envelope<Vec<SafeZone>>> {
    Json(
        state
            .api
            .get_nearby_safe_zones(query.lat, query.lon, query.radius)
            .await,
    )
}

pub async fn statistics(State(state): State<AppState>) -> Json<Envelope<Statistics>> {
    Json(state.api.get_statistics().await)
}

// ========== Router ==========

pub fn safety_routes(state: AppState) -> Router {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route("/users/:id", get(get_user).put(update_user).delete(delete_user))
        .route("/alerts", get(list_alerts).post(create_alert))
        .route("/alerts/:id", get(get_alert).delete(delete_alert))
        .route("/alerts/:id/status", put(update_alert_status))
        .route("/incidents", get(list_incidents).post(create_incident))
        .route("/incidents/:id", get(get_incident).delete(delete_incident))
        .route("/incidents/:id/status", put(update_incident_status))
        .route("/safe-zones", get(list_safe_zones))
        .route("/safe-zones/nearby", get(nearby_safe_zones))
        .route("/statistics", get(statistics))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use safety_core::SafetyService;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        safety_routes(AppState {
            api: SafetyApi::new(Arc::new(SafetyService::with_seed_data())),
        })
    }

    async fn send(
        app: &Router,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_create_user_scenario() {
        let app = app();
        let (status, json) = send(
            &app,
            "POST",
            "/users",
            Some(serde_json::json!({"name": "X", "email": "x@x.com", "role": "tourist"})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["id"], 4);
        assert_eq!(json["data"]["status"], "active");
        assert_eq!(json["message"], "User created successfully");

        let (_, json) = send(&app, "GET", "/users", None).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_create_user_missing_email() {
        let (status, json) = send(
            &app(),
            "POST",
            "/users",
            Some(serde_json::json!({"name": "X"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Missing required field: email");
    }

    #[tokio::test]
    async fn test_user_not_found() {
        let (status, json) = send(&app(), "DELETE", "/users/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["message"], "User not found: 99");
    }

    #[tokio::test]
    async fn test_create_incident_scenario() {
        let app = app();
        let (status, json) = send(
            &app,
            "POST",
            "/incidents",
            Some(serde_json::json!({"type": "Fire", "location": "Red Fort"})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["data"]["id"], "#INC003");
        assert_eq!(json["data"]["time"], "Just now");

        let (status, json) = send(&app, "GET", "/incidents/%23INC003", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["type"], "Fire");
    }

    #[tokio::test]
    async fn test_resolve_alert() {
        let app = app();
        let (status, json) = send(
            &app,
            "PUT",
            "/alerts/1/status",
            Some(serde_json::json!({"status": "resolved"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["status"], "resolved");
        assert_eq!(json["data"]["type"], "emergency");

        let (_, json) = send(&app, "GET", "/statistics", None).await;
        assert_eq!(json["data"]["activeAlerts"], 1);
        assert_eq!(json["data"]["totalAlerts"], 2);
    }

    #[tokio::test]
    async fn test_nearby_safe_zones() {
        let (status, json) = send(
            &app(),
            "GET",
            "/safe-zones/nearby?lat=28.6139&lon=77.2090",
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<_> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|z| z["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["Central Police Station"]);
    }

    #[tokio::test]
    async fn test_alert_without_type_is_bad_request() {
        let app = app();
        let (status, json) = send(
            &app,
            "POST",
            "/alerts",
            Some(serde_json::json!({"message": "m", "location": "l"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["message"].as_str().unwrap().contains("type"));

        let (_, json) = send(&app, "GET", "/alerts", None).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_role_is_bad_request() {
        let (status, json) = send(
            &app(),
            "POST",
            "/users",
            Some(serde_json::json!({"name": "X", "email": "x@x.com", "role": "visitor"})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
        assert!(json["message"].is_string());
    }

    #[tokio::test]
    async fn test_nearby_without_lat_is_bad_request() {
        let (status, json) = send(&app(), "GET", "/safe-zones/nearby?lon=77.2", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_non_numeric_user_id_is_bad_request() {
        let (status, json) = send(&app(), "GET", "/users/abc", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_delete_alert_then_lookup() {
        let app = app();
        let (status, json) = send(&app, "DELETE", "/alerts/2", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["id"], 2);
        assert_eq!(json["message"], "Alert deleted successfully");

        let (status, json) = send(&app, "GET", "/alerts/2", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["success"], false);
    }
}
