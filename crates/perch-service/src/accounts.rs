use perch_db::accounts::AccountStore;
use perch_types::models::Account;

use crate::error::ServiceError;

/// Registration and login rules over an injected [`AccountStore`].
///
/// Passwords are stored and compared as plain text.
#[derive(Clone)]
pub struct AccountService {
    accounts: AccountStore,
}

impl AccountService {
    pub fn new(accounts: AccountStore) -> Self {
        Self { accounts }
    }

    /// Validate and persist a new account. Usernames must be non-blank and
    /// unused; passwords must be at least 4 characters.
    ///
    /// Uniqueness is pre-checked with a lookup, but the UNIQUE constraint
    /// on `account.username` is the backstop: two racing registrations can
    /// both pass the lookup, and the losing insert still reports the
    /// conflict instead of a generic store failure.
    pub fn register(&self, username: &str, password: &str) -> Result<Account, ServiceError> {
        if username.trim().is_empty() {
            return Err(ServiceError::Invalid("username must not be blank"));
        }
        if password.len() < 4 {
            return Err(ServiceError::Invalid("password must be at least 4 characters"));
        }

        if self.accounts.find_by_username(username)?.is_some() {
            return Err(ServiceError::UsernameTaken);
        }

        match self.accounts.create(username, password) {
            Ok(account) => Ok(account),
            Err(err) if is_unique_violation(&err) => Err(ServiceError::UsernameTaken),
            Err(err) => Err(ServiceError::Store(err)),
        }
    }

    /// Exact, case-sensitive credential check. An unknown username and a
    /// wrong password produce the same failure.
    pub fn verify_login(&self, username: &str, password: &str) -> Result<Account, ServiceError> {
        match self.accounts.find_by_username(username)? {
            Some(account) if account.password == password => Ok(account),
            _ => Err(ServiceError::Unauthorized),
        }
    }

    /// Existence check consumed by the message side as a creation guard.
    pub fn account_exists(&self, account_id: i64) -> Result<bool, ServiceError> {
        Ok(self.accounts.exists(account_id)?)
    }
}

fn is_unique_violation(err: &anyhow::Error) -> bool {
    matches!(
        err.downcast_ref::<rusqlite::Error>(),
        Some(rusqlite::Error::SqliteFailure(e, _))
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
