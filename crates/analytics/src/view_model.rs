//! Chart- and KPI-ready bundles built from an [`Aggregation`].

use serde::Serialize;

use basketdash_core::Dimension;

use crate::aggregate::Aggregation;
use crate::format::{format_currency, format_percent, format_si};

pub const DEFAULT_CURRENCY_SUFFIX: &str = "Rs.";

/// A KPI amount with its display text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Amount {
    pub value: f64,
    pub display: String,
}

/// One chart point with its compact text label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartValue {
    pub value: f64,
    pub text: String,
}

/// Parallel per-group sequences, aligned with `labels`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Series {
    pub labels: Vec<String>,
    pub sale: Vec<ChartValue>,
    pub market: Vec<ChartValue>,
    pub discount: Vec<ChartValue>,
    /// Pie slice per group: percentage of the positive discount total.
    pub discount_share: Vec<ChartValue>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewModel {
    pub dimension: Dimension,
    pub total_count: usize,
    pub total_market: Amount,
    pub total_sale: Amount,
    pub total_discount: Amount,
    pub series: Series,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewModelBuilder {
    currency_suffix: String,
}

impl Default for ViewModelBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_CURRENCY_SUFFIX)
    }
}

impl ViewModelBuilder {
    pub fn new(currency_suffix: impl Into<String>) -> Self {
        Self {
            currency_suffix: currency_suffix.into(),
        }
    }

    pub fn currency_suffix(&self) -> &str {
        &self.currency_suffix
    }

    pub fn build(&self, aggregation: &Aggregation) -> ViewModel {
        let scope = &aggregation.scope;
        let groups = &aggregation.groups;

        let chart = |value: f64| ChartValue {
            value,
            text: format_si(value),
        };

        let positive_total: f64 = groups.iter().map(|g| g.discount.max(0.0)).sum();
        let share = |discount: f64| {
            let value = if positive_total > 0.0 {
                discount.max(0.0) / positive_total * 100.0
            } else {
                0.0
            };
            ChartValue {
                value,
                text: format_percent(value),
            }
        };

        let series = Series {
            labels: groups.iter().map(|g| g.key.clone()).collect(),
            sale: groups.iter().map(|g| chart(g.sale_price)).collect(),
            market: groups.iter().map(|g| chart(g.market_price)).collect(),
            discount: groups.iter().map(|g| chart(g.discount)).collect(),
            discount_share: groups.iter().map(|g| share(g.discount)).collect(),
        };

        ViewModel {
            dimension: aggregation.dimension,
            total_count: scope.count,
            total_market: self.amount(scope.market_price),
            total_sale: self.amount(scope.sale_price),
            total_discount: self.amount(scope.market_price - scope.sale_price),
            series,
        }
    }

    /// View model for a request whose filters matched nothing.
    pub fn empty(&self, dimension: Dimension) -> ViewModel {
        self.build(&Aggregation::empty(dimension))
    }

    fn amount(&self, value: f64) -> Amount {
        Amount {
            value,
            display: format_currency(value, &self.currency_suffix),
        }
    }
}
