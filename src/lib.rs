pub mod config;
pub mod error;
pub mod db;
pub mod service;
pub mod router;
pub mod middleware;
pub mod handlers;
pub mod types;

pub use error::PortalError;
pub use service::sessions_actor::SessionsHandle;
pub use types::role::Role;
