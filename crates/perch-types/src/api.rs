use serde::Deserialize;

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

// -- Messages --

#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub posted_by: i64,
    pub message_text: String,
    pub time_posted_epoch: i64,
}

/// Update payload. Clients may send a whole message object; only the new
/// text is read.
#[derive(Debug, Deserialize)]
pub struct UpdateMessageRequest {
    pub message_text: String,
}
