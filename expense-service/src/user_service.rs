//! User registration and the daily reminder opt-in.

use std::sync::Arc;

use storage::{StorageError, UserProfile, UserRecord, UserRepository};
use tracing::{debug, instrument};

use crate::clock::Clock;
use crate::error::ServiceError;

#[derive(Clone)]
pub struct UserService {
    users: UserRepository,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(users: UserRepository, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }

    /// Creates the user or refreshes their profile. The reminder flag is left as it was.
    #[instrument(skip(self, profile), fields(user_id = profile.id))]
    pub async fn register(&self, profile: &UserProfile) -> Result<UserRecord, ServiceError> {
        let record = self.users.upsert(profile, self.clock.now()).await?;
        debug!(user_id = record.id, "User registered");
        Ok(record)
    }

    /// Flips the reminder opt-in and returns the new state.
    pub async fn toggle_reminders(&self, user_id: i64) -> Result<bool, ServiceError> {
        match self.users.toggle_notifications(user_id).await {
            Ok(enabled) => Ok(enabled),
            Err(StorageError::NotFound(_)) => Err(ServiceError::UnknownUser(user_id)),
            Err(e) => Err(e.into()),
        }
    }

    /// Turns the reminder opt-in on or off.
    pub async fn set_reminders(&self, user_id: i64, enabled: bool) -> Result<(), ServiceError> {
        if self.users.set_notifications(user_id, enabled).await? {
            Ok(())
        } else {
            Err(ServiceError::UnknownUser(user_id))
        }
    }

    /// Users who want the daily reminder.
    pub async fn reminder_recipients(&self) -> Result<Vec<UserRecord>, ServiceError> {
        Ok(self.users.list_with_notifications_enabled().await?)
    }
}
