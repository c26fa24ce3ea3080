use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use scanner_core::catalog::{GENRES, PROVIDERS};
use scanner_core::{retain_added_on_or_before, ScanOutcome, TitleNode};
use scanner_engine::{TitleOffers, DEFAULT_NAME_SEARCH_COUNT};
use scanner_logging::{scanner_error, scanner_info, scanner_warn};
use serde_json::{json, Value};

use crate::errors::{AppError, AppResult};
use crate::requests::{LocaleParams, NewTitlesRequest, SearchParams, TitlesRequest};
use crate::{AppState, SCAN_STATUS_HEADER};

pub(crate) async fn providers() -> Json<Value> {
    Json(json!(PROVIDERS))
}

pub(crate) async fn genres() -> Json<Value> {
    Json(json!(GENRES))
}

pub(crate) async fn search(
    State(state): State<AppState>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> AppResult<Json<Vec<TitleNode>>> {
    let Query(params) = params?;
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::bad_request("Falta el parámetro de búsqueda q"))?;
    let country = params.country.as_deref().unwrap_or(&state.country);
    let language = params.language.as_deref().unwrap_or(&state.language);

    let titles = state
        .search
        .search_by_name(query, country, language, DEFAULT_NAME_SEARCH_COUNT)
        .await?;
    Ok(Json(titles))
}

pub(crate) async fn titles(
    State(state): State<AppState>,
    body: Result<Json<TitlesRequest>, JsonRejection>,
) -> AppResult<Json<Vec<TitleNode>>> {
    let Json(request) = body?;
    let filters = request.filters(&state.country, &state.language);
    let titles = state.search.search_popular(&filters).await?;
    Ok(Json(titles))
}

pub(crate) async fn title_offers(
    State(state): State<AppState>,
    Path(id): Path<String>,
    params: Result<Query<LocaleParams>, QueryRejection>,
) -> AppResult<Json<TitleOffers>> {
    let Query(params) = params?;
    let country = params.country.as_deref().unwrap_or(&state.country);
    let language = params.language.as_deref().unwrap_or(&state.language);
    state
        .search
        .title_offers(&id, country, language)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::not_found(format!("Título no encontrado: {id}")))
}

pub(crate) async fn new_titles(
    State(state): State<AppState>,
    body: Result<Json<NewTitlesRequest>, JsonRejection>,
) -> AppResult<Response> {
    let Json(request) = body?;
    let window = request.window((state.today)())?;
    let ceiling = request.added_before()?;
    let filters = request.filters(&state.country, &state.language);

    let (mut rows, status) = match state.scanner.scan(window, &filters).await {
        ScanOutcome::Complete(rows) => (rows, "complete"),
        ScanOutcome::Partial { rows, failure } => {
            scanner_warn!("Serving {} partial rows: {}", rows.len(), failure);
            (rows, "partial")
        }
        ScanOutcome::Fatal(failure) => {
            scanner_error!("New titles request failed: {}", failure);
            return Err(failure.into());
        }
    };
    if let Some(ceiling) = ceiling {
        retain_added_on_or_before(&mut rows, ceiling);
    }
    scanner_info!("Serving {} new titles ({})", rows.len(), status);

    let mut response = Json(rows).into_response();
    response
        .headers_mut()
        .insert(SCAN_STATUS_HEADER, HeaderValue::from_static(status));
    Ok(response)
}

pub(crate) async fn connection_test(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    let body = match state
        .search
        .connection_test(&state.country, &state.language)
        .await
    {
        Ok(report) => {
            scanner_info!("Connection test found {:?}", report.titles);
            json!({ "success": true, "count": report.titles.len(), "titles": report.titles })
        }
        Err(err) => {
            scanner_warn!("Connection test failed: {}", err);
            json!({ "success": false, "error": err.user_message() })
        }
    };
    (StatusCode::OK, Json(body))
}
