mod password;
mod user_service;

pub use password::{hash_password, verify_password};
pub use user_service::UserService;
