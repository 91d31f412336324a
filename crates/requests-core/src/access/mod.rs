//! Ownership and role checks

use std::sync::Arc;

use helpdesk_users_core::UserStore;

use crate::{Error, Result};

/// Authorization decisions over request records.
///
/// Role flags are read from the credential store on every call; a
/// promotion or demotion is effective on the caller's next operation.
pub struct AccessControl {
    users: Arc<dyn UserStore>,
}

impl AccessControl {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// True iff the caller owns the resource. An orphaned resource
    /// (no owner) belongs to nobody.
    pub fn authorize_owner(resource_owner_id: Option<i64>, caller_id: i64) -> bool {
        resource_owner_id == Some(caller_id)
    }

    pub async fn authorize_admin(&self, caller_id: i64) -> Result<bool> {
        Ok(self.users.is_partner(caller_id).await?)
    }

    pub async fn require_admin(&self, caller_id: i64) -> Result<()> {
        if self.authorize_admin(caller_id).await? {
            Ok(())
        } else {
            Err(Error::Forbidden)
        }
    }
}
