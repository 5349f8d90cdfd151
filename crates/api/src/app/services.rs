use basketdash_analytics::{Dashboard, ViewModelBuilder};
use basketdash_products::{load, LoadError, LoadOptions, LoadReport, ProductTable};

use crate::config::ApiConfig;

/// Everything the handlers share: the dashboard over the immutable table
/// and the report of how that table was loaded.
#[derive(Debug)]
pub struct AppServices {
    dashboard: Dashboard,
    dataset: Option<LoadReport>,
}

impl AppServices {
    /// Load the configured dataset. Any load failure is returned as-is; the
    /// caller must not serve without a table.
    pub fn load(config: &ApiConfig) -> Result<Self, LoadError> {
        let options = LoadOptions {
            missing_values: config.missing_values,
            ..LoadOptions::default()
        };
        let (table, report) = load(&config.dataset_path, &options)?;
        Ok(Self::new(table, Some(report), config))
    }

    pub fn new(table: ProductTable, dataset: Option<LoadReport>, config: &ApiConfig) -> Self {
        let dashboard = Dashboard::new(table)
            .with_builder(ViewModelBuilder::new(config.currency_suffix.clone()))
            .with_brand_top_n(config.brand_top_n);
        Self { dashboard, dataset }
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn dataset(&self) -> Option<&LoadReport> {
        self.dataset.as_ref()
    }
}
