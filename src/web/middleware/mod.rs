//! Middleware for Web API.

pub mod access;
pub mod deadline;

pub use access::{access_gate, rejection, TOKEN_HEADER};
pub use deadline::{request_deadline, TIMEOUT_MESSAGE};
