use counsel_guard::GuardError;
use http::{Result as HttpResponse, StatusCode};

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

/// Map GuardError variants to status codes
impl<T> IntoResponseError<T> for Result<T, GuardError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            let status = match e {
                GuardError::Credential(_) => StatusCode::UNAUTHORIZED,
                GuardError::UnknownRole => StatusCode::UNAUTHORIZED,
                GuardError::Blocked => StatusCode::FORBIDDEN,
                GuardError::Utils(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, e.to_string())
        })
    }
}

/// Implementation for http::Error (used by Response::builder())
impl<T> IntoResponseError<T> for HttpResponse<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))
    }
}
