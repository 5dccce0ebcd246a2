/// Extractors whose rejections are rendered as envelopes
///
/// axum's own `Json` and `Path` reject with plain-text bodies. These wrappers route
/// the rejection through [`ApiError`] instead.
use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON body extractor
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameter extractor
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
