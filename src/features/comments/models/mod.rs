mod comment;

pub use comment::{Comment, UpsertComment};
