use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::features::categories::models::{Category, Subcategory};

/// A category with the subcategories that may be filed under it
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryTreeDto {
    pub name: Category,
    pub subcategories: Vec<Subcategory>,
}

impl CategoryTreeDto {
    pub fn build_tree() -> Vec<CategoryTreeDto> {
        Category::ALL
            .into_iter()
            .map(|category| CategoryTreeDto {
                name: category,
                subcategories: category.subcategories().to_vec(),
            })
            .collect()
    }
}
