//! Filter, group and sum over the product table.

use std::collections::HashMap;

use serde::Serialize;

use basketdash_core::{Dimension, QueryError, QueryResult};
use basketdash_products::{ProductRow, ProductTable};

/// Exact-match constraints applied before grouping (conjunctive).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub category: Option<String>,
    pub sub_category: Option<String>,
}

impl Filters {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            sub_category: None,
        }
    }

    pub fn category_and_sub_category(category: impl Into<String>, sub_category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            sub_category: Some(sub_category.into()),
        }
    }

    pub fn matches(&self, row: &ProductRow) -> bool {
        self.category.as_deref().is_none_or(|c| row.category() == c)
            && self.sub_category.as_deref().is_none_or(|s| row.sub_category() == s)
    }

    /// Check that every constrained value exists in `table`.
    ///
    /// A sub-category is looked up within the filtered category when both are set.
    pub fn validate(&self, table: &ProductTable) -> QueryResult<()> {
        if let Some(category) = self.category.as_deref() {
            if category.trim().is_empty() {
                return Err(QueryError::validation("category must not be blank"));
            }
            if !table.contains_category(category) {
                return Err(QueryError::invalid_filter(Dimension::Category, category));
            }
        }
        if let Some(sub_category) = self.sub_category.as_deref() {
            if sub_category.trim().is_empty() {
                return Err(QueryError::validation("sub_category must not be blank"));
            }
            let known = match self.category.as_deref() {
                Some(category) => table.contains_sub_category(category, sub_category),
                None => table.rows().iter().any(|r| r.sub_category() == sub_category),
            };
            if !known {
                return Err(QueryError::invalid_filter(Dimension::SubCategory, sub_category));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateQuery {
    pub group_by: Dimension,
    pub filters: Filters,
    pub top_n: Option<usize>,
}

impl AggregateQuery {
    pub fn new(group_by: Dimension) -> Self {
        Self {
            group_by,
            filters: Filters::none(),
            top_n: None,
        }
    }

    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self {
        self.top_n = Some(top_n);
        self
    }
}

/// Summed prices of one group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateRow {
    pub key: String,
    pub sale_price: f64,
    pub market_price: f64,
    pub discount: f64,
}

impl AggregateRow {
    fn empty(key: &str) -> Self {
        Self {
            key: key.to_string(),
            sale_price: 0.0,
            market_price: 0.0,
            discount: 0.0,
        }
    }

    fn add(&mut self, row: &ProductRow) {
        self.sale_price += row.sale_price();
        self.market_price += row.market_price();
        self.discount += row.discount();
    }
}

/// Totals over the filtered, ungrouped rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ScopeTotals {
    pub count: usize,
    pub sale_price: f64,
    pub market_price: f64,
    pub discount: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Aggregation {
    pub dimension: Dimension,
    pub groups: Vec<AggregateRow>,
    pub scope: ScopeTotals,
}

impl Aggregation {
    pub fn empty(dimension: Dimension) -> Self {
        Self {
            dimension,
            groups: Vec::new(),
            scope: ScopeTotals::default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.scope.count == 0
    }
}

/// Group the filtered rows of `table` and sum their prices.
///
/// Groups come out in first-encounter order. With `top_n`, they are instead
/// ordered by descending discount (ties keep first-encounter order) and cut
/// to at most `top_n`.
pub fn aggregate(table: &ProductTable, query: &AggregateQuery) -> Aggregation {
    let mut groups: Vec<AggregateRow> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut scope = ScopeTotals::default();

    for row in table.rows().iter().filter(|r| query.filters.matches(r)) {
        scope.count += 1;
        scope.sale_price += row.sale_price();
        scope.market_price += row.market_price();
        scope.discount += row.discount();

        let key = row.value(query.group_by);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push(AggregateRow::empty(key));
            groups.len() - 1
        });
        groups[slot].add(row);
    }

    if let Some(n) = query.top_n {
        // `sort_by` is stable, so equal discounts stay in encounter order.
        groups.sort_by(|a, b| b.discount.total_cmp(&a.discount));
        groups.truncate(n);
    }

    tracing::debug!(
        dimension = %query.group_by,
        rows = scope.count,
        groups = groups.len(),
        top_n = ?query.top_n,
        "aggregated product table"
    );

    Aggregation {
        dimension: query.group_by,
        groups,
        scope,
    }
}
