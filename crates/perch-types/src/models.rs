use serde::{Deserialize, Serialize};

/// A registered user identity. `account_id` is assigned by the store on
/// insert; zero means the account has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub account_id: i64,
    pub username: String,
    pub password: String,
}

/// A text post authored by an account. `posted_by` and `time_posted_epoch`
/// are fixed at creation; only `message_text` may change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default)]
    pub message_id: i64,
    pub posted_by: i64,
    pub message_text: String,
    pub time_posted_epoch: i64,
}
