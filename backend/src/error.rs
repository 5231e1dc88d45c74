use axum::body::Body;
use axum::http::StatusCode;
use axum::response::Response;
use serde_json::json;

#[derive(Debug)]
pub enum Error {
    Storage(std::io::Error),
    Serialization(serde_json::Error),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Storage(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err)
    }
}

impl axum::response::IntoResponse for Error {
    fn into_response(self) -> Response {
        let message = match &self {
            Error::Storage(e) => {
                tracing::error!("Storage error: {}", e);
                "Failed to read data"
            }
            Error::Serialization(e) => {
                tracing::error!("Serialization error: {}", e);
                "Failed to update data"
            }
        };

        Response::builder()
            .status(StatusCode::INTERNAL_SERVER_ERROR)
            .header("Content-Type", "application/json")
            .body(Body::from(json!({ "error": message }).to_string()))
            .unwrap()
    }
}
