//! API middleware.

use axum::{
    extract::{OriginalUri, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};

use common::ErrorResponse;

/// Stamp the request path onto error payloads rendered without one.
///
/// Handlers and extractors fail with `AppError`, which has no access to the
/// request; its rendered response carries the payload as an extension so it
/// can be completed here.
pub async fn attach_error_path(
    OriginalUri(uri): OriginalUri,
    request: Request,
    next: Next,
) -> Response {
    let response = next.run(request).await;

    match response.extensions().get::<ErrorResponse>() {
        Some(body) if body.path.is_empty() => body.clone().with_path(uri.path()).into_response(),
        _ => response,
    }
}
