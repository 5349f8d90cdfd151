use serde::{Deserialize, Serialize};

use basketdash_analytics::{Selection, ViewModel};
use basketdash_core::{QueryError, QueryResult};
use basketdash_products::LoadReport;

use crate::config;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Default, Deserialize)]
pub struct SubCategorySummaryQuery {
    pub category: Option<String>,
}

impl SubCategorySummaryQuery {
    pub fn validate(self) -> QueryResult<Option<String>> {
        non_blank("category", self.category)
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct BrandSummaryQuery {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub top_n: Option<usize>,
}

/// Brand query after boundary validation; unset fields are filled from
/// dropdown defaults by the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBrandQuery {
    pub category: Option<String>,
    pub sub_category: Option<String>,
    pub top_n: Option<usize>,
}

impl BrandSummaryQuery {
    pub fn validate(self) -> QueryResult<ValidBrandQuery> {
        let category = non_blank("category", self.category)?;
        let sub_category = non_blank("sub_category", self.sub_category)?;
        if category.is_none() && sub_category.is_some() {
            return Err(QueryError::validation("sub_category requires category"));
        }
        let top_n = self
            .top_n
            .map(config::check_top_n)
            .transpose()
            .map_err(QueryError::validation)?;
        Ok(ValidBrandQuery {
            category,
            sub_category,
            top_n,
        })
    }
}

fn non_blank(field: &str, value: Option<String>) -> QueryResult<Option<String>> {
    match value {
        Some(v) if v.trim().is_empty() => Err(QueryError::validation(format!("{field} must not be blank"))),
        other => Ok(other),
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_n: Option<usize>,
    pub summary: ViewModel,
}

impl SummaryResponse {
    pub fn categories(summary: ViewModel) -> Self {
        Self {
            title: "Category Wise Discount".to_string(),
            category: None,
            sub_category: None,
            top_n: None,
            summary,
        }
    }

    pub fn sub_categories(category: String, summary: ViewModel) -> Self {
        Self {
            title: format!("Result for {category}"),
            category: Some(category),
            sub_category: None,
            top_n: None,
            summary,
        }
    }

    pub fn brands(
        category: Option<String>,
        sub_category: Option<String>,
        top_n: usize,
        summary: ViewModel,
    ) -> Self {
        Self {
            title: format!("Top {top_n} Discount And Brand"),
            category,
            sub_category,
            top_n: Some(top_n),
            summary,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OptionsResponse {
    pub items: Vec<String>,
    /// Preselected entry (the first option), as the dropdowns default to it.
    pub default: Option<String>,
}

impl OptionsResponse {
    pub fn new(items: Vec<String>) -> Self {
        let default = items.first().cloned();
        Self { items, default }
    }
}

#[derive(Debug, Serialize)]
pub struct DatasetResponse {
    pub rows: usize,
    pub categories: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load: Option<LoadReport>,
    pub default_selection: Option<Selection>,
}
