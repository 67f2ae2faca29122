//! API handlers.

pub mod credentials;
pub mod resource;
pub mod state;
pub mod system;

pub use credentials::*;
pub use resource::*;
pub use state::AppState;
pub use system::*;
