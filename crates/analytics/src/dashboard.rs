//! Request/response facade over the product table.
//!
//! Each page of the dashboard maps to one call here. Callers re-invoke these
//! on every selection change; nothing is cached between calls.

use serde::Serialize;

use basketdash_core::{Dimension, QueryResult};
use basketdash_products::ProductTable;

use crate::aggregate::{aggregate, AggregateQuery, Filters};
use crate::view_model::{ViewModel, ViewModelBuilder};

pub const DEFAULT_BRAND_TOP_N: usize = 10;

/// Dropdown selection: a category and one of its sub-categories.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub category: String,
    pub sub_category: String,
}

#[derive(Debug, Clone)]
pub struct Dashboard {
    table: ProductTable,
    builder: ViewModelBuilder,
    brand_top_n: usize,
}

impl Dashboard {
    pub fn new(table: ProductTable) -> Self {
        Self {
            table,
            builder: ViewModelBuilder::default(),
            brand_top_n: DEFAULT_BRAND_TOP_N,
        }
    }

    pub fn with_builder(mut self, builder: ViewModelBuilder) -> Self {
        self.builder = builder;
        self
    }

    pub fn with_brand_top_n(mut self, top_n: usize) -> Self {
        self.brand_top_n = top_n;
        self
    }

    pub fn table(&self) -> &ProductTable {
        &self.table
    }

    pub fn brand_top_n(&self) -> usize {
        self.brand_top_n
    }

    /// Category dropdown options.
    pub fn categories(&self) -> Vec<String> {
        self.table.categories()
    }

    /// Sub-category dropdown options for `category`; empty when unknown.
    pub fn available_sub_categories(&self, category: &str) -> Vec<String> {
        self.table.sub_categories(category)
    }

    /// First category and its first sub-category, if the table has any rows.
    pub fn default_selection(&self) -> Option<Selection> {
        let first = self.table.rows().first()?;
        Some(Selection {
            category: first.category().to_string(),
            sub_category: first.sub_category().to_string(),
        })
    }

    /// Totals and per-category series over the whole table.
    pub fn category_summary(&self) -> ViewModel {
        self.run(AggregateQuery::new(Dimension::Category))
    }

    pub fn sub_category_summary(&self, category: &str) -> ViewModel {
        self.recover(
            Dimension::SubCategory,
            self.try_sub_category_summary(category),
        )
    }

    /// Like [`Self::sub_category_summary`], but reports unknown categories.
    pub fn try_sub_category_summary(&self, category: &str) -> QueryResult<ViewModel> {
        let filters = Filters::category(category);
        filters.validate(&self.table)?;
        Ok(self.run(AggregateQuery::new(Dimension::SubCategory).with_filters(filters)))
    }

    /// Top brands by discount within a category and sub-category.
    pub fn brand_summary(&self, category: &str, sub_category: &str, top_n: Option<usize>) -> ViewModel {
        self.recover(
            Dimension::Brand,
            self.try_brand_summary(category, sub_category, top_n),
        )
    }

    pub fn try_brand_summary(
        &self,
        category: &str,
        sub_category: &str,
        top_n: Option<usize>,
    ) -> QueryResult<ViewModel> {
        let filters = Filters::category_and_sub_category(category, sub_category);
        filters.validate(&self.table)?;
        let query = AggregateQuery::new(Dimension::Brand)
            .with_filters(filters)
            .with_top_n(top_n.unwrap_or(self.brand_top_n));
        Ok(self.run(query))
    }

    /// Zero-row view for callers that have no selection to query.
    pub fn empty_summary(&self, dimension: Dimension) -> ViewModel {
        self.builder.empty(dimension)
    }

    fn run(&self, query: AggregateQuery) -> ViewModel {
        self.builder.build(&aggregate(&self.table, &query))
    }

    /// Unknown filter values select no rows. Malformed values are logged as
    /// errors; both are answered with an empty view.
    fn recover(&self, dimension: Dimension, result: QueryResult<ViewModel>) -> ViewModel {
        result.unwrap_or_else(|err| {
            if err.is_recoverable() {
                tracing::warn!(error = %err, %dimension, "filter selects no rows; returning empty view");
            } else {
                tracing::error!(error = %err, %dimension, "rejected malformed filter; returning empty view");
            }
            self.empty_summary(dimension)
        })
    }
}
