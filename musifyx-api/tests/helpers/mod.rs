//! Test helper modules for musifyx-api integration tests
//!
//! - TestApp: router over an in-memory database or the offline backend
//! - Request builders and JSON response extraction

#![allow(dead_code)]

pub mod test_app;

pub use test_app::{json_request, multipart_request, token_for, TestApp, SECRET};
