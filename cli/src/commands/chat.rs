use serde_json::json;

use crate::util::api_request;

pub async fn run(api_url: &str, message: &str, name: Option<&str>) -> i32 {
    api_request(
        api_url,
        reqwest::Method::POST,
        "/v1/chat",
        Some(chat_body(message, name)),
    )
    .await
}

fn chat_body(message: &str, name: Option<&str>) -> serde_json::Value {
    let mut body = json!({ "message": message });
    if let Some(n) = name {
        body["name"] = json!(n);
    }
    body
}
