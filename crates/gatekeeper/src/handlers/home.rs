//! Public landing handler.

use crate::models::MessageResponse;
use axum::Json;

/// Handler for GET /
///
/// Public; no authentication required.
pub async fn home() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Welcome to the Gatekeeper API".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_home_message() {
        let Json(response) = home().await;
        assert_eq!(response.message, "Welcome to the Gatekeeper API");
    }
}
