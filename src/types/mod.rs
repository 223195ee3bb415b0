pub mod api;
pub mod role;

pub use api::{
    AuthResponse, LoginRequest, SignupRequest, StudentCreate, StudentPatch, StudentRecord, UserInfo,
};
pub use role::Role;
