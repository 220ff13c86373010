use perch_db::accounts::AccountStore;
use perch_db::messages::MessageStore;
use perch_types::models::Message;

use crate::error::ServiceError;

/// Longest message text accepted at creation or update.
pub const MAX_MESSAGE_LEN: usize = 254;

/// Message rules over an injected [`MessageStore`]. Author existence at
/// creation time is checked against the account table, so the service
/// also holds an [`AccountStore`].
#[derive(Clone)]
pub struct MessageService {
    messages: MessageStore,
    accounts: AccountStore,
}

impl MessageService {
    pub fn new(messages: MessageStore, accounts: AccountStore) -> Self {
        Self { messages, accounts }
    }

    /// Validate and persist a new message. The text must be non-blank and
    /// at most [`MAX_MESSAGE_LEN`] characters, and `posted_by` must match
    /// an existing account.
    pub fn create_message(
        &self,
        posted_by: i64,
        text: &str,
        time_posted_epoch: i64,
    ) -> Result<Message, ServiceError> {
        validate_text(text)?;
        if !self.accounts.exists(posted_by)? {
            return Err(ServiceError::Invalid("posted_by does not match an existing account"));
        }

        Ok(self.messages.create(posted_by, text, time_posted_epoch)?)
    }

    pub fn get_all_messages(&self) -> Result<Vec<Message>, ServiceError> {
        Ok(self.messages.get_all()?)
    }

    pub fn get_message_by_id(&self, message_id: i64) -> Result<Option<Message>, ServiceError> {
        Ok(self.messages.get_by_id(message_id)?)
    }

    /// No existence check on the account: an unknown id yields an empty
    /// list, not an error.
    pub fn get_messages_by_account(&self, account_id: i64) -> Result<Vec<Message>, ServiceError> {
        Ok(self.messages.get_by_account(account_id)?)
    }

    /// Deleting an id that never existed is a no-op returning `None`.
    pub fn delete_message(&self, message_id: i64) -> Result<Option<Message>, ServiceError> {
        Ok(self.messages.delete_by_id(message_id)?)
    }

    /// Replace a message's text. `Ok(None)` means the id did not exist;
    /// bad text is rejected before the store is touched.
    pub fn update_message(
        &self,
        message_id: i64,
        new_text: &str,
    ) -> Result<Option<Message>, ServiceError> {
        validate_text(new_text)?;
        Ok(self.messages.update_text(message_id, new_text)?)
    }
}

fn validate_text(text: &str) -> Result<(), ServiceError> {
    if text.trim().is_empty() {
        return Err(ServiceError::Invalid("message text must not be blank"));
    }
    if text.len() > MAX_MESSAGE_LEN {
        return Err(ServiceError::Invalid("message text must be at most 254 characters"));
    }
    Ok(())
}
