//! HTTP handlers for edtoy records
//!
//! Handlers parse and validate input, call the store, and wrap results in
//! the `{"educational_toys": ...}` envelope. Store error kinds map onto
//! status codes through [`ApiError`].

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, Method, StatusCode, header},
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::ListingConfig;
use crate::core::error::{ApiError, ApiResult};
use crate::core::model::{Edtoy, Runtime, validate_edtoy};
use crate::core::query::{EdtoySearch, Filters, validate_filters};
use crate::core::store::EdtoyStore;
use crate::core::validation::Validator;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn EdtoyStore>,
    pub listing: Arc<ListingConfig>,
    pub environment: String,
}

/// Request body for creating a record
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CreateEdtoyRequest {
    pub title: String,
    pub year: i32,
    pub target_age: String,
    pub genres: Option<Vec<String>>,
    pub skill_focus: Vec<String>,
    pub runtime: Runtime,
}

/// Request body for a partial update; absent fields are left unchanged
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UpdateEdtoyRequest {
    pub title: Option<String>,
    pub year: Option<i32>,
    pub target_age: Option<String>,
    pub genres: Option<Vec<String>>,
    pub skill_focus: Option<Vec<String>>,
    pub runtime: Option<Runtime>,
}

impl UpdateEdtoyRequest {
    fn apply_to(self, edtoy: &mut Edtoy) {
        if let Some(title) = self.title {
            edtoy.title = title;
        }
        if let Some(year) = self.year {
            edtoy.year = year;
        }
        if let Some(target_age) = self.target_age {
            edtoy.target_age = target_age;
        }
        if let Some(genres) = self.genres {
            edtoy.genres = genres;
        }
        if let Some(skill_focus) = self.skill_focus {
            edtoy.skill_focus = skill_focus;
        }
        if let Some(runtime) = self.runtime {
            edtoy.runtime = runtime;
        }
    }
}

fn envelope(edtoy: &Edtoy) -> Json<Value> {
    Json(json!({ "educational_toys": edtoy }))
}

fn bad_request(rejection: JsonRejection) -> ApiError {
    ApiError::BadRequest(rejection.body_text())
}

/// Parse a path id; anything but a positive integer is not found
fn read_id_param(raw: &str) -> ApiResult<i64> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::NotFound),
    }
}

fn read_string(qs: &HashMap<String, String>, key: &str, default: &str) -> String {
    match qs.get(key) {
        Some(value) if !value.is_empty() => value.clone(),
        _ => default.to_string(),
    }
}

fn read_csv(qs: &HashMap<String, String>, key: &str) -> Vec<String> {
    qs.get(key)
        .map(|value| {
            value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

fn read_int(qs: &HashMap<String, String>, key: &str, default: i64, v: &mut Validator) -> i64 {
    match qs.get(key) {
        Some(value) if !value.is_empty() => match value.parse() {
            Ok(n) => n,
            Err(_) => {
                v.add_error(key, "must be an integer value");
                default
            }
        },
        _ => default,
    }
}

/// GET /v1/healthcheck
pub async fn healthcheck(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "available",
        "system_info": {
            "environment": state.environment,
            "version": env!("CARGO_PKG_VERSION"),
        }
    }))
}

/// POST /v1/edtoys
pub async fn create_edtoy(
    State(state): State<AppState>,
    payload: Result<Json<CreateEdtoyRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, HeaderMap, Json<Value>)> {
    let Json(input) = payload.map_err(bad_request)?;

    let mut v = Validator::new();
    v.check(input.genres.is_some(), "genres", "must be provided");

    let edtoy = Edtoy {
        title: input.title,
        year: input.year,
        target_age: input.target_age,
        genres: input.genres.unwrap_or_default(),
        skill_focus: input.skill_focus,
        runtime: input.runtime,
        ..Default::default()
    };
    validate_edtoy(&mut v, &edtoy);
    v.finish()?;

    let created = state.store.insert(edtoy).await?;
    tracing::info!(id = created.id, "edtoy created");

    let mut headers = HeaderMap::new();
    let location = format!("/v1/edtoys/{}", created.id);
    if let Ok(value) = HeaderValue::from_str(&location) {
        headers.insert(header::LOCATION, value);
    }

    Ok((StatusCode::CREATED, headers, envelope(&created)))
}

/// GET /v1/edtoys/{id}
pub async fn show_edtoy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = read_id_param(&id)?;
    let edtoy = state.store.get(id).await?;
    Ok(envelope(&edtoy))
}

/// PATCH /v1/edtoys/{id}
///
/// Fetches the current record first so the update carries the version
/// the client's changes were applied to.
pub async fn update_edtoy(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateEdtoyRequest>, JsonRejection>,
) -> ApiResult<Json<Value>> {
    let id = read_id_param(&id)?;
    let mut edtoy = state.store.get(id).await?;

    let Json(input) = payload.map_err(bad_request)?;
    input.apply_to(&mut edtoy);

    let mut v = Validator::new();
    validate_edtoy(&mut v, &edtoy);
    v.finish()?;

    let updated = state.store.update(edtoy).await?;
    Ok(envelope(&updated))
}

/// DELETE /v1/edtoys/{id}
pub async fn delete_edtoy(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Value>> {
    let id = read_id_param(&id)?;
    state.store.delete(id).await?;
    tracing::info!(id, "edtoy deleted");
    Ok(Json(json!({ "message": "educational toy successfully deleted" })))
}

/// GET /v1/edtoys?title=&genres=&page=&page_size=&sort=
pub async fn list_edtoys(
    State(state): State<AppState>,
    Query(qs): Query<HashMap<String, String>>,
) -> ApiResult<Json<Value>> {
    let mut v = Validator::new();

    let search = EdtoySearch::new(read_string(&qs, "title", ""), read_csv(&qs, "genres"));
    let defaults = state.listing.default_filters();
    let filters = Filters {
        page: read_int(&qs, "page", defaults.page, &mut v),
        page_size: read_int(&qs, "page_size", defaults.page_size, &mut v),
        sort: read_string(&qs, "sort", &defaults.sort),
        sort_safelist: defaults.sort_safelist,
    };

    validate_filters(&mut v, &filters);
    v.finish()?;

    let page = state.store.get_all(&search, &filters).await?;
    Ok(Json(json!({
        "educational_toys": page.records,
        "metadata": page.metadata,
    })))
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Fallback for known routes hit with an unsupported method
pub async fn method_not_allowed(method: Method) -> ApiError {
    ApiError::MethodNotAllowed {
        method: method.to_string(),
    }
}
