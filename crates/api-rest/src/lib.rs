//! # API REST
//!
//! REST API implementation for the patient management system.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - Mapping the core error taxonomy onto HTTP status codes
//!
//! The patient service performs a full load-mutate-save cycle per
//! operation, so [`AppState`] holds it behind one async mutex: axum
//! serves requests concurrently and the store itself assumes a single
//! writer. Every handler acquires the lock for the whole cycle.

#![warn(rust_2018_idioms)]

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use utoipa::{IntoParams, OpenApi, ToSchema};
use utoipa_swagger_ui::SwaggerUi;

use pms_core::{
    CoreConfig, Gender, JsonFileStore, PatientDraft, PatientError, PatientMap, PatientPatch,
    PatientRecord, PatientService, SortField, SortOrder, Verdict,
};
use pms_predict::{
    predict_premium, Occupation, PredictError, Prediction, PremiumModel, RuleModel, UserProfile,
};

/// Application state shared across REST API handlers.
///
/// The mutex serialises every load-mutate-save sequence in-process;
/// see the crate docs for why.
#[derive(Clone)]
pub struct AppState {
    patients: Arc<Mutex<PatientService<JsonFileStore>>>,
    model: Arc<dyn PremiumModel>,
}

impl AppState {
    /// Builds the state from startup configuration and a premium model.
    pub fn new(cfg: &CoreConfig, model: Arc<dyn PremiumModel>) -> Self {
        let store = JsonFileStore::new(cfg.db_file());
        Self {
            patients: Arc::new(Mutex::new(PatientService::new(store))),
            model,
        }
    }

    /// State wired with the baseline [`RuleModel`] collaborator.
    pub fn with_rule_model(cfg: &CoreConfig) -> Self {
        Self::new(cfg, Arc::new(RuleModel))
    }
}

/// Simple message payload for informational endpoints.
#[derive(Serialize, ToSchema)]
pub struct ApiMessage {
    pub message: String,
}

/// Health check response.
#[derive(Serialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

/// Error body returned on every failure path.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub detail: String,
}

/// Wraps core and prediction errors for HTTP status mapping.
#[derive(Debug)]
pub enum ApiError {
    Patient(PatientError),
    Predict(PredictError),
}

impl From<PatientError> for ApiError {
    fn from(e: PatientError) -> Self {
        ApiError::Patient(e)
    }
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        ApiError::Predict(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            ApiError::Patient(e) => match e {
                PatientError::Validation { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
                }
                PatientError::DuplicateId(_) => (StatusCode::CONFLICT, e.to_string()),
                PatientError::NotFound(_) => (StatusCode::NOT_FOUND, e.to_string()),
                PatientError::InvalidSortField(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                PatientError::StorageCorrupt(_)
                | PatientError::FileRead(_)
                | PatientError::FileWrite(_)
                | PatientError::Serialization(_) => {
                    tracing::error!("storage failure: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "internal error".to_string(),
                    )
                }
            },
            ApiError::Predict(e) => match e {
                PredictError::Validation { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
                }
                PredictError::Unavailable(_) => {
                    tracing::error!("prediction failure: {e}");
                    (
                        StatusCode::SERVICE_UNAVAILABLE,
                        "prediction model unavailable".to_string(),
                    )
                }
            },
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

/// Query parameters for the sort endpoint.
#[derive(Debug, Deserialize, IntoParams)]
pub struct SortParams {
    /// Field to sort on: height, weight or bmi.
    pub sort_by: String,
    /// asc or desc; anything else falls back to asc.
    pub order: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        root,
        about,
        health,
        create_patient,
        view,
        view_patient,
        edit_patient,
        delete_patient,
        sort_patients,
        predict,
    ),
    components(schemas(
        ApiMessage,
        HealthRes,
        ErrorBody,
        PatientRecord,
        PatientDraft,
        PatientPatch,
        Gender,
        Verdict,
        UserProfile,
        Occupation,
        Prediction,
    ))
)]
pub struct ApiDoc;

/// Builds the application router with all routes, docs and CORS.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/about", get(about))
        .route("/health", get(health))
        .route("/create", post(create_patient))
        .route("/view", get(view))
        .route("/patient/:id", get(view_patient))
        .route("/edit/:id", put(edit_patient))
        .route("/delete/:id", delete(delete_patient))
        .route("/sort", get(sort_patients))
        .route("/predict", post(predict))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Welcome message", body = ApiMessage))
)]
/// Root endpoint: welcome message.
async fn root() -> Json<ApiMessage> {
    Json(ApiMessage {
        message: "Patient Management System API".into(),
    })
}

#[utoipa::path(
    get,
    path = "/about",
    responses((status = 200, description = "About message", body = ApiMessage))
)]
/// Short description of the service.
async fn about() -> Json<ApiMessage> {
    Json(ApiMessage {
        message: "A fully functional API to manage patient records".into(),
    })
}

#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Health check response", body = HealthRes))
)]
/// Health check endpoint used for monitoring and load balancers.
async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "PMS REST API is alive".into(),
    })
}

#[utoipa::path(
    post,
    path = "/create",
    request_body = PatientDraft,
    responses(
        (status = 201, description = "Patient created", body = PatientRecord),
        (status = 409, description = "Patient id already exists", body = ErrorBody),
        (status = 422, description = "Validation failure", body = ErrorBody)
    )
)]
/// Creates a new patient record.
///
/// The response carries the stored record including the derived
/// `bmi` and `verdict` fields.
async fn create_patient(
    State(state): State<AppState>,
    Json(draft): Json<PatientDraft>,
) -> Result<(StatusCode, Json<PatientRecord>), ApiError> {
    let patients = state.patients.lock().await;
    let record = patients.create(draft)?;
    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/view",
    responses((status = 200, description = "Full id to record mapping", body = BTreeMap<String, PatientRecord>))
)]
/// Returns the whole patient collection keyed by id.
async fn view(State(state): State<AppState>) -> Result<Json<PatientMap>, ApiError> {
    let patients = state.patients.lock().await;
    Ok(Json(patients.all()?))
}

#[utoipa::path(
    get,
    path = "/patient/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient record", body = PatientRecord),
        (status = 404, description = "No patient with this id", body = ErrorBody)
    )
)]
/// Returns a single patient record by id.
async fn view_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<PatientRecord>, ApiError> {
    let patients = state.patients.lock().await;
    Ok(Json(patients.get(&id)?))
}

#[utoipa::path(
    put,
    path = "/edit/{id}",
    params(("id" = String, Path, description = "Patient id")),
    request_body = PatientPatch,
    responses(
        (status = 200, description = "Updated patient record", body = PatientRecord),
        (status = 404, description = "No patient with this id", body = ErrorBody),
        (status = 422, description = "Validation failure", body = ErrorBody)
    )
)]
/// Applies a partial update; `bmi` and `verdict` are recomputed when
/// the patch changes height or weight.
async fn edit_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
    Json(patch): Json<PatientPatch>,
) -> Result<Json<PatientRecord>, ApiError> {
    let patients = state.patients.lock().await;
    Ok(Json(patients.update(&id, patch)?))
}

#[utoipa::path(
    delete,
    path = "/delete/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Deletion confirmation", body = ApiMessage),
        (status = 404, description = "No patient with this id", body = ErrorBody)
    )
)]
/// Removes a patient record by id.
async fn delete_patient(
    State(state): State<AppState>,
    AxumPath(id): AxumPath<String>,
) -> Result<Json<ApiMessage>, ApiError> {
    let patients = state.patients.lock().await;
    patients.delete(&id)?;
    Ok(Json(ApiMessage {
        message: format!("patient '{id}' deleted"),
    }))
}

#[utoipa::path(
    get,
    path = "/sort",
    params(SortParams),
    responses(
        (status = 200, description = "Records ordered by the requested field", body = [PatientRecord]),
        (status = 400, description = "Unsupported sort field", body = ErrorBody)
    )
)]
/// Sorts the collection by height, weight or bmi.
///
/// Ties are broken by ascending id; an unrecognised `order` defaults
/// to ascending.
async fn sort_patients(
    State(state): State<AppState>,
    Query(params): Query<SortParams>,
) -> Result<Json<Vec<PatientRecord>>, ApiError> {
    let field = SortField::parse(&params.sort_by)?;
    let order = SortOrder::parse_or_default(params.order.as_deref());

    let patients = state.patients.lock().await;
    Ok(Json(patients.sort_by(field, order)?))
}

#[utoipa::path(
    post,
    path = "/predict",
    request_body = UserProfile,
    responses(
        (status = 200, description = "Predicted premium category", body = Prediction),
        (status = 422, description = "Validation failure", body = ErrorBody),
        (status = 503, description = "Prediction model unavailable", body = ErrorBody)
    )
)]
/// Predicts the insurance premium category for a user profile.
async fn predict(
    State(state): State<AppState>,
    Json(profile): Json<UserProfile>,
) -> Result<Json<Prediction>, ApiError> {
    let prediction = predict_premium(state.model.as_ref(), &profile)?;
    Ok(Json(prediction))
}
