//! Request service: orchestrates the store behind the access rules

use std::sync::Arc;

use helpdesk_users_core::{Identity, UserStore};
use tracing::info;

use crate::access::AccessControl;
use crate::store::RequestStore;
use crate::types::{RequestStatus, SupportRequest};
use crate::{Error, Result};

pub struct RequestService {
    store: Arc<dyn RequestStore>,
    access: AccessControl,
}

impl RequestService {
    pub fn new(store: Arc<dyn RequestStore>, users: Arc<dyn UserStore>) -> Self {
        Self {
            store,
            access: AccessControl::new(users),
        }
    }

    /// Create a request owned by the caller. Any authenticated user may
    /// create; title and content must be non-empty and the status, when
    /// given, must belong to the fixed set.
    pub async fn create(
        &self,
        caller: &Identity,
        title: &str,
        content: &str,
        status: Option<&str>,
    ) -> Result<SupportRequest> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(Error::Validation(
                "Title and content are required".to_string(),
            ));
        }

        let status = match status {
            Some(s) => s
                .parse::<RequestStatus>()
                .map_err(|e| Error::Validation(e.to_string()))?,
            None => RequestStatus::New,
        };

        let request = self
            .store
            .insert(Some(caller.user_id), title, content, status)
            .await?;

        info!(request_id = request.id, user_id = caller.user_id, "request created");
        Ok(request)
    }

    /// Fetch a single request. No ownership check: any authenticated
    /// caller can read any request (unlike delete, which is owner-only).
    pub async fn get(&self, id: i64) -> Result<SupportRequest> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| Error::NotFound("Request".to_string()))
    }

    /// Requests owned by the caller, newest first. An explicit
    /// `user_id` filter naming anyone but the caller is rejected.
    pub async fn list_mine(
        &self,
        caller: &Identity,
        requested_user_id: Option<i64>,
    ) -> Result<Vec<SupportRequest>> {
        if let Some(requested) = requested_user_id {
            if requested != caller.user_id {
                return Err(Error::Forbidden);
            }
        }

        self.store.list_for_owner(caller.user_id).await
    }

    /// Every request, newest first. Callable without authentication.
    pub async fn list_all(&self) -> Result<Vec<SupportRequest>> {
        self.store.list_all().await
    }

    /// Requests in a given status. Administrators only. The filter string
    /// is matched as stored; a value outside the fixed set simply matches
    /// nothing.
    pub async fn list_by_status(
        &self,
        caller: &Identity,
        status: &str,
    ) -> Result<Vec<SupportRequest>> {
        self.access.require_admin(caller.user_id).await?;
        self.store.list_by_status(status).await
    }

    /// Replace title and content. No ownership check: any authenticated
    /// caller may rewrite any request's content fields. This asymmetry
    /// with `delete` is long-standing shipped behavior; see the pinned
    /// tests before tightening it.
    pub async fn update_content(
        &self,
        id: i64,
        title: &str,
        content: &str,
    ) -> Result<SupportRequest> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() || content.is_empty() {
            return Err(Error::Validation(
                "Title and content must not be empty".to_string(),
            ));
        }

        self.store
            .update_content(id, title, content)
            .await?
            .ok_or_else(|| Error::NotFound("Request".to_string()))
    }

    /// Delete a request the caller owns.
    pub async fn delete(&self, caller: &Identity, id: i64) -> Result<()> {
        let request = self.get(id).await?;

        if !AccessControl::authorize_owner(request.user_id, caller.user_id) {
            return Err(Error::Forbidden);
        }

        self.store.delete(id).await?;
        info!(request_id = id, user_id = caller.user_id, "request deleted");
        Ok(())
    }

    /// Delete any request. Administrators only; absent ids are reported
    /// as not found, after the role check.
    pub async fn delete_as_admin(&self, caller: &Identity, id: i64) -> Result<()> {
        self.access.require_admin(caller.user_id).await?;

        if !self.store.delete(id).await? {
            return Err(Error::NotFound("Request".to_string()));
        }

        info!(request_id = id, admin_id = caller.user_id, "request deleted by admin");
        Ok(())
    }

    /// Move a request to one of the administrator-settable statuses.
    pub async fn change_status(
        &self,
        caller: &Identity,
        id: i64,
        new_status: &str,
    ) -> Result<SupportRequest> {
        let status = new_status
            .parse::<RequestStatus>()
            .ok()
            .filter(RequestStatus::is_admin_settable)
            .ok_or_else(|| {
                Error::Validation(format!(
                    "Invalid status. Allowed: {}",
                    RequestStatus::ADMIN_SETTABLE.map(|s| s.as_str()).join(", ")
                ))
            })?;

        self.access.require_admin(caller.user_id).await?;

        let updated = self
            .store
            .update_status(id, status)
            .await?
            .ok_or_else(|| Error::NotFound("Request".to_string()))?;

        info!(request_id = id, status = %status, admin_id = caller.user_id, "status changed");
        Ok(updated)
    }
}
