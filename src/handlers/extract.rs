// handlers/extract.rs - Request extractors that reject with ApiError
//
// Axum's stock extractors answer malformed input with plain-text bodies.
// These wrappers route the rejection through ApiError so every failure
// carries the JSON error envelope.

use axum::extract::{FromRequest, FromRequestParts};
use chrono::NaiveDate;

use crate::error::ApiError;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// `YYYY-MM-DD` path segment.
pub fn parse_date(raw: &str) -> Result<NaiveDate, ApiError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| ApiError::bad_request("invalid date"))
}
