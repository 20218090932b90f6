pub mod model;
pub mod services;

pub use services::TokenService;
