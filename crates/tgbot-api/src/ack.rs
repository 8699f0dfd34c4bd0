//! Acknowledgement returned to the webhook delivery mechanism.

use reqwest::StatusCode;
use serde_json::json;

/// `200 OK` with the body `{"status":"success"}`.
pub fn respond_success() -> (StatusCode, String) {
    (StatusCode::OK, json!({ "status": "success" }).to_string())
}
