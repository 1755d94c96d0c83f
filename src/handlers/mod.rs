//! HTTP request handlers (route handlers).
//!
//! Each handler is an async function that:
//! 1. Receives HTTP request data (JSON body, URL params, etc.)
//! 2. Validates it and calls into the services
//! 3. Returns HTTP response (JSON, status code)

/// Account endpoints
pub mod accounts;
/// Service health endpoint
pub mod health;
/// Operation type lookup endpoint
pub mod operation_types;
/// Transaction endpoints
pub mod transactions;
