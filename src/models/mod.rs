//! Data models representing database entities.
//!
//! This module contains all data structures that map to database tables,
//! plus the request/response bodies built from them.

/// Credit-limited account model
pub mod account;
/// Transaction category model
pub mod operation_type;
/// Transaction record model
pub mod transaction;
