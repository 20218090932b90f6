mod category;

pub use category::{parse_pair, Category, Subcategory};
