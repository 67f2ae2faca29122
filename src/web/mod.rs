//! Web API module for Warden.
//!
//! Credential endpoints, the gated resource route and a few service
//! endpoints, all answering with the shared JSON payload.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use response::{JsonReply, Payload};
pub use router::{create_app, create_router};
pub use server::WebServer;
