/// Success response envelope
///
/// Every successful endpoint returns
/// `{"statusCode": n, "data": .., "message": .., "success": true}` with the
/// HTTP status mirrored in the body. The failure-side counterpart lives in
/// [`crate::error`].
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Uniform success envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub data: T,
    pub message: String,
    pub success: bool,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK envelope
    pub fn ok(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::OK, data, message)
    }

    /// 201 Created envelope
    pub fn created(data: T, message: impl Into<String>) -> Self {
        Self::with_status(StatusCode::CREATED, data, message)
    }

    /// Envelope with an arbitrary success status
    pub fn with_status(status: StatusCode, data: T, message: impl Into<String>) -> Self {
        Self {
            status_code: status.as_u16(),
            data,
            message: message.into(),
            success: true,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_shape() {
        let body = serde_json::to_value(ApiResponse::ok(json!({"id": 1}), "Fetched")).unwrap();

        assert_eq!(body["statusCode"], 200);
        assert_eq!(body["data"]["id"], 1);
        assert_eq!(body["message"], "Fetched");
        assert_eq!(body["success"], true);
    }

    #[test]
    fn test_created_status() {
        let resp = ApiResponse::created(json!({}), "Created");
        assert_eq!(resp.status_code, 201);
        assert!(resp.success);
    }
}
