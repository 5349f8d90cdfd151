//! Group-by dimensions of the product table.

use serde::{Deserialize, Serialize};

/// Categorical column used to partition rows before summation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Category,
    SubCategory,
    Brand,
}

impl Dimension {
    pub const ALL: [Dimension; 3] = [Dimension::Category, Dimension::SubCategory, Dimension::Brand];

    /// Header name of the source column.
    pub fn column(self) -> &'static str {
        match self {
            Dimension::Category => "category",
            Dimension::SubCategory => "sub_category",
            Dimension::Brand => "brand",
        }
    }
}

impl core::fmt::Display for Dimension {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.column())
    }
}
