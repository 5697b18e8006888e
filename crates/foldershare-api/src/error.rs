//! Maps domain `AppError` to HTTP responses.
//!
//! The `IntoResponse` impl for `AppError` lives in `foldershare-core`
//! (behind its `axum` feature) because the orphan rule requires it to be
//! defined in the crate that owns `AppError`.

pub use foldershare_core::error::ApiErrorResponse;

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use foldershare_core::error::AppError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::validation("x"), StatusCode::BAD_REQUEST),
            (AppError::not_found("x"), StatusCode::NOT_FOUND),
            (AppError::lock("x"), StatusCode::LOCKED),
            (AppError::conflict("x"), StatusCode::CONFLICT),
            (AppError::forbidden("x"), StatusCode::FORBIDDEN),
            (AppError::storage("x"), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::internal("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(err.into_response().status(), status);
        }
    }
}
