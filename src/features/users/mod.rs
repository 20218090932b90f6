//! Citizen and authority accounts.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | POST | `/api/users/register` | Create a citizen or authority account |
//! | POST | `/api/users/login` | Exchange email + password for a JWT |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use models::{User, UserRole};
pub use repositories::{PgUserRepository, UserRepository};
pub use services::UserService;
