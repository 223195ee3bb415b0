pub mod auth;
pub mod guard;

pub use auth::{CurrentUser, RequireAdmin, bearer_token};
pub use guard::GuardOutcome;
