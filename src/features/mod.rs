pub mod auth;
pub mod categories;
pub mod comments;
pub mod media;
pub mod notifications;
pub mod reports;
pub mod users;
