//! # Helpdesk Requests-Core
//!
//! Support-request records for the helpdesk service: storage, the
//! operations over it, and the ownership/role rules each operation
//! enforces. Authentication itself lives in users-core; this crate
//! consumes the resolved caller [`Identity`](helpdesk_users_core::Identity)
//! and reads role flags back through the credential store.

pub mod access;
pub mod error;
pub mod service;
pub mod store;
pub mod types;

pub use access::AccessControl;
pub use error::{Error, Result};
pub use service::RequestService;
pub use store::{RequestStore, SqliteRequestStore};
pub use types::{RequestStatus, SupportRequest};
