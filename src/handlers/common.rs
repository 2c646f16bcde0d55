use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;

/// Success envelope: `{ success: true, message, data }`
///
/// `data` is always present and `null` when the operation returns nothing.
#[derive(Debug)]
pub struct ApiReply<T> {
    status: StatusCode,
    message: &'static str,
    data: Option<T>,
}

impl<T: Serialize> ApiReply<T> {
    /// 200 with data
    pub fn ok(message: &'static str, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message,
            data: Some(data),
        }
    }

    /// 201 with data
    pub fn created(message: &'static str, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message,
            data: Some(data),
        }
    }
}

impl ApiReply<()> {
    /// 200 with `data: null`
    pub fn message(message: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            message,
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiReply<T> {
    fn into_response(self) -> Response {
        let body = json!({
            "success": true,
            "message": self.message,
            "data": self.data,
        });

        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body(reply: impl IntoResponse) -> (StatusCode, serde_json::Value) {
        let response = reply.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn created_carries_data() {
        let (status, json) = body(ApiReply::created("Made", json!({ "name": "x" }))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Made");
        assert_eq!(json["data"]["name"], "x");
    }

    #[tokio::test]
    async fn message_only_has_null_data() {
        let (status, json) = body(ApiReply::message("Gone")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json.get("data").is_some());
        assert!(json["data"].is_null());
    }
}
