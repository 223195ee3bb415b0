pub mod auth_ops;
pub mod roster_seed;
pub mod sessions_actor;
