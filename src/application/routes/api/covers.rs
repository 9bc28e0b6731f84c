use axum::Json;
use axum::body::Body;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use tracing::warn;

use crate::application::services::{CoverResponse, ServedCover};
use crate::application::state::AppState;
use crate::domain::covers::{CoverQuery, CoverSize, ResponseFormat};
use crate::infrastructure::covers::image_proxy::DEFAULT_CONTENT_TYPE;

const X_COVER_SOURCE: HeaderName = HeaderName::from_static("x-cover-source");
const X_ISBN: HeaderName = HeaderName::from_static("x-isbn");

#[derive(Debug, Default, Deserialize)]
pub(crate) struct CoverParams {
    #[serde(default)]
    isbn: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    format: Option<String>,
}

impl From<CoverParams> for CoverQuery {
    fn from(params: CoverParams) -> Self {
        CoverQuery::new(params.isbn, params.title)
            .with_size(params.size.as_deref().map(CoverSize::from).unwrap_or_default())
            .with_format(
                params
                    .format
                    .as_deref()
                    .map(ResponseFormat::from)
                    .unwrap_or_default(),
            )
    }
}

/// `GET /api/cover`: always answers 200, with the cover, the placeholder, or
/// (with `format=json`) a description of what was resolved.
#[tracing::instrument(skip(state, params))]
pub(crate) async fn get_cover(
    State(state): State<AppState>,
    params: Result<Query<CoverParams>, QueryRejection>,
) -> Response {
    let params = match params {
        Ok(Query(params)) => params,
        Err(rejection) => {
            warn!(error = %rejection, "unreadable cover query, treating as empty");
            CoverParams::default()
        }
    };

    match state.cover_service.respond(&CoverQuery::from(params)).await {
        CoverResponse::Metadata(metadata) => Json(metadata).into_response(),
        CoverResponse::Image(served) => served.into_response(),
    }
}

impl IntoResponse for ServedCover {
    fn into_response(self) -> Response {
        let mut headers = HeaderMap::new();

        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_str(&self.content_type)
                .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE)),
        );
        if let Ok(value) = HeaderValue::from_str(&self.cache_control()) {
            headers.insert(header::CACHE_CONTROL, value);
        }
        headers.insert(X_COVER_SOURCE, HeaderValue::from_static(self.source.as_str()));

        if let Some(isbn) = &self.isbn {
            match HeaderValue::from_str(isbn) {
                Ok(value) => {
                    headers.insert(X_ISBN, value);
                }
                Err(_) => warn!(isbn, "isbn is not a valid header value, omitting"),
            }
        }

        (StatusCode::OK, headers, Body::from(self.bytes)).into_response()
    }
}
