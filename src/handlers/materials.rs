use crate::{
    entities::material::{MaterialState, Model as MaterialModel},
    errors::ServiceError,
    repositories::{MaterialPatch, NewMaterial},
    services::materials::MaterialQuantityStats,
    ApiResponse, ApiResult, AppState,
};
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "design": "steel-beam",
    "state": "GOOD",
    "quantity": 10
}))]
pub struct CreateMaterialRequest {
    /// Free-text label for the material type
    #[schema(example = "steel-beam")]
    pub design: String,
    /// Condition state; GOOD when omitted
    #[serde(default)]
    pub state: Option<MaterialState>,
    /// Unit count
    #[schema(example = 10)]
    pub quantity: i32,
}

impl From<CreateMaterialRequest> for NewMaterial {
    fn from(req: CreateMaterialRequest) -> Self {
        Self {
            design: req.design,
            state: req.state,
            quantity: req.quantity,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[schema(example = json!({
    "quantity": 4
}))]
pub struct UpdateMaterialRequest {
    #[serde(default)]
    pub design: Option<String>,
    #[serde(default)]
    pub state: Option<MaterialState>,
    #[serde(default)]
    #[schema(example = 4)]
    pub quantity: Option<i32>,
}

impl From<UpdateMaterialRequest> for MaterialPatch {
    fn from(req: UpdateMaterialRequest) -> Self {
        Self {
            design: req.design,
            state: req.state,
            quantity: req.quantity,
        }
    }
}

/// Number of material records matching a count endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({"count": 3}))]
pub struct MaterialCount {
    pub count: u64,
}

impl From<u64> for MaterialCount {
    fn from(count: u64) -> Self {
        Self { count }
    }
}

pub fn material_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_materials).post(create_material))
        .route("/count/stats", get(get_material_stats))
        .route("/count/all", get(count_all_materials))
        .route("/count/good", get(count_good_materials))
        .route("/count/damaging", get(count_damaging_materials))
        .route("/count/bad", get(count_bad_materials))
        .route(
            "/:id",
            get(get_material)
                .patch(update_material)
                .delete(delete_material),
        )
}

#[utoipa::path(
    get,
    path = "/material",
    responses(
        (status = 200, description = "Every material record, ordered by id", body = ApiResponse<Vec<MaterialModel>>),
        (status = 500, description = "Storage fault", body = crate::errors::ErrorResponse)
    ),
    tag = "materials"
)]
pub async fn list_materials(State(state): State<AppState>) -> ApiResult<Vec<MaterialModel>> {
    let materials = state.materials.find_all().await?;
    Ok(Json(ApiResponse::success(materials)))
}

#[utoipa::path(
    get,
    path = "/material/{id}",
    params(
        ("id" = i32, Path, description = "Material ID")
    ),
    responses(
        (status = 200, description = "Material fetched", body = ApiResponse<MaterialModel>),
        (status = 404, description = "Material not found", body = crate::errors::ErrorResponse)
    ),
    tag = "materials"
)]
pub async fn get_material(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> ApiResult<MaterialModel> {
    let Path(id) = id?;
    let material = state.materials.find_by_id(id).await?;
    Ok(Json(ApiResponse::success(material)))
}

#[utoipa::path(
    post,
    path = "/material",
    request_body = CreateMaterialRequest,
    responses(
        (status = 201, description = "Material created", body = ApiResponse<MaterialModel>),
        (status = 400, description = "Invalid material", body = crate::errors::ErrorResponse)
    ),
    tag = "materials"
)]
pub async fn create_material(
    State(state): State<AppState>,
    payload: Result<Json<CreateMaterialRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<MaterialModel>>), ServiceError> {
    let Json(request) = payload?;
    let material = state.materials.create_material(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(material))))
}

#[utoipa::path(
    patch,
    path = "/material/{id}",
    params(
        ("id" = i32, Path, description = "Material ID")
    ),
    request_body = UpdateMaterialRequest,
    responses(
        (status = 200, description = "Supplied fields applied", body = ApiResponse<String>),
        (status = 400, description = "Invalid patch", body = crate::errors::ErrorResponse)
    ),
    tag = "materials"
)]
pub async fn update_material(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<UpdateMaterialRequest>, JsonRejection>,
) -> ApiResult<String> {
    let Path(id) = id?;
    let Json(request) = payload?;
    state
        .materials
        .update_material_by_id(id, request.into())
        .await?;
    Ok(Json(ApiResponse::success(format!("Material {} updated", id))))
}

#[utoipa::path(
    delete,
    path = "/material/{id}",
    params(
        ("id" = i32, Path, description = "Material ID")
    ),
    responses(
        (status = 204, description = "Material deleted"),
        (status = 404, description = "Material not found", body = crate::errors::ErrorResponse)
    ),
    tag = "materials"
)]
pub async fn delete_material(
    State(state): State<AppState>,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, ServiceError> {
    let Path(id) = id?;
    state.materials.delete_by_id(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/material/count/stats",
    responses(
        (status = 200, description = "Quantity totals by state", body = ApiResponse<MaterialQuantityStats>)
    ),
    tag = "materials"
)]
pub async fn get_material_stats(State(state): State<AppState>) -> ApiResult<MaterialQuantityStats> {
    let stats = state.materials.get_total_material_quantities().await?;
    Ok(Json(ApiResponse::success(stats)))
}

#[utoipa::path(
    get,
    path = "/material/count/all",
    responses(
        (status = 200, description = "Total record count", body = ApiResponse<MaterialCount>)
    ),
    tag = "materials"
)]
pub async fn count_all_materials(State(state): State<AppState>) -> ApiResult<MaterialCount> {
    let count = state.materials.get_total_materials().await?;
    Ok(Json(ApiResponse::success(count.into())))
}

#[utoipa::path(
    get,
    path = "/material/count/good",
    responses(
        (status = 200, description = "GOOD record count", body = ApiResponse<MaterialCount>)
    ),
    tag = "materials"
)]
pub async fn count_good_materials(State(state): State<AppState>) -> ApiResult<MaterialCount> {
    let count = state.materials.get_total_good_materials().await?;
    Ok(Json(ApiResponse::success(count.into())))
}

#[utoipa::path(
    get,
    path = "/material/count/damaging",
    responses(
        (status = 200, description = "DAMAGING record count", body = ApiResponse<MaterialCount>)
    ),
    tag = "materials"
)]
pub async fn count_damaging_materials(State(state): State<AppState>) -> ApiResult<MaterialCount> {
    let count = state.materials.get_total_damaging_materials().await?;
    Ok(Json(ApiResponse::success(count.into())))
}

#[utoipa::path(
    get,
    path = "/material/count/bad",
    responses(
        (status = 200, description = "BAD record count", body = ApiResponse<MaterialCount>)
    ),
    tag = "materials"
)]
pub async fn count_bad_materials(State(state): State<AppState>) -> ApiResult<MaterialCount> {
    let count = state.materials.get_total_bad_materials().await?;
    Ok(Json(ApiResponse::success(count.into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AppConfig, repositories::InMemoryMaterialStore, services::materials::MaterialService};
    use axum::{body::Body, http::Request};
    use sea_orm::DatabaseConnection;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let state = AppState {
            db: Arc::new(DatabaseConnection::Disconnected),
            config: AppConfig::new(
                "sqlite::memory:".into(),
                "127.0.0.1".into(),
                8080,
                "development".into(),
            ),
            materials: Arc::new(MaterialService::new(Arc::new(InMemoryMaterialStore::new()))),
        };
        Router::new()
            .nest("/material", material_routes())
            .with_state(state)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn create_then_fetch() {
        let app = app();
        let (status, created) = send(
            &app,
            "POST",
            "/material",
            Some(json!({"design": "steel-beam", "quantity": 10})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["data"]["state"], "GOOD");
        let id = created["data"]["id"].as_i64().unwrap();

        let (status, fetched) = send(&app, "GET", &format!("/material/{}", id), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["data"]["design"], "steel-beam");
    }

    #[tokio::test]
    async fn unknown_state_is_a_bad_request() {
        let app = app();
        let (status, body) = send(
            &app,
            "POST",
            "/material",
            Some(json!({"design": "pipe", "state": "RUSTY", "quantity": 1})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Bad Request");
    }

    #[tokio::test]
    async fn count_routes_are_not_shadowed_by_id_route() {
        let app = app();
        let (status, body) = send(&app, "GET", "/material/count/all", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["count"], 0);
    }

    #[tokio::test]
    async fn malformed_id_gets_a_json_error_body() {
        let app = app();
        for (method, uri) in [("GET", "/material/abc"), ("DELETE", "/material/99999999999")] {
            let (status, body) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["error"], "Bad Request");
            assert!(body["message"]
                .as_str()
                .unwrap()
                .starts_with("Validation error:"));
        }
    }

    #[tokio::test]
    async fn delete_missing_is_not_found() {
        let app = app();
        let (status, body) = send(&app, "DELETE", "/material/99", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Not found: Material 99 not found");
    }
}
