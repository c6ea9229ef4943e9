use axum::extract::Query;
use axum::http::HeaderMap;
use axum::http::StatusCode;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;

const FR: &str = include_str!("../../../i18n/fr.json");
const EN: &str = include_str!("../../../i18n/en.json");

/// Serves the UI translation catalog.
///
/// Language comes from the `pma_lang` query parameter, then the
/// `x-lang` header, and falls back to French.
pub async fn traduction(
    Query(params): Query<TraductionParams>,
    headers: HeaderMap,
) -> Result<ApiSuccess<serde_json::Value>, ApiError> {
    let lang = params
        .pma_lang
        .or_else(|| {
            headers
                .get("x-lang")
                .and_then(|value| value.to_str().ok())
                .map(|value| value.to_string())
        })
        .unwrap_or_else(|| "fr".to_string());

    let catalog = match lang.as_str() {
        "en" => EN,
        _ => FR,
    };

    let value: serde_json::Value = serde_json::from_str(catalog)
        .map_err(|e| ApiError::InternalServerError(e.to_string()))?;

    Ok(ApiSuccess::new(StatusCode::OK, value))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TraductionParams {
    pma_lang: Option<String>,
}
