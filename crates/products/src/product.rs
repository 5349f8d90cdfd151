use serde::{Deserialize, Serialize};

use basketdash_core::Dimension;

/// One product line of the catalog.
///
/// `discount` is derived on construction and never stored independently;
/// deserialization ignores any incoming `discount` and recomputes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ProductRecord")]
pub struct ProductRow {
    category: String,
    sub_category: String,
    brand: String,
    sale_price: f64,
    market_price: f64,
    discount: f64,
}

/// Wire shape accepted when deserializing a [`ProductRow`].
#[derive(Deserialize)]
struct ProductRecord {
    category: String,
    sub_category: String,
    brand: String,
    sale_price: f64,
    market_price: f64,
}

impl From<ProductRecord> for ProductRow {
    fn from(r: ProductRecord) -> Self {
        ProductRow::new(r.category, r.sub_category, r.brand, r.sale_price, r.market_price)
    }
}

impl ProductRow {
    pub fn new(
        category: impl Into<String>,
        sub_category: impl Into<String>,
        brand: impl Into<String>,
        sale_price: f64,
        market_price: f64,
    ) -> Self {
        Self {
            category: category.into(),
            sub_category: sub_category.into(),
            brand: brand.into(),
            sale_price,
            market_price,
            discount: market_price - sale_price,
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn sub_category(&self) -> &str {
        &self.sub_category
    }

    pub fn brand(&self) -> &str {
        &self.brand
    }

    pub fn sale_price(&self) -> f64 {
        self.sale_price
    }

    pub fn market_price(&self) -> f64 {
        self.market_price
    }

    /// `market_price - sale_price`. Negative when the product sells above market.
    pub fn discount(&self) -> f64 {
        self.discount
    }

    /// Value of the given group-by column.
    pub fn value(&self, dimension: Dimension) -> &str {
        match dimension {
            Dimension::Category => &self.category,
            Dimension::SubCategory => &self.sub_category,
            Dimension::Brand => &self.brand,
        }
    }
}

/// Immutable, ordered product table.
///
/// Row order is the source order and is what "first encounter" refers to
/// throughout the dashboard.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductTable {
    rows: Vec<ProductRow>,
}

impl ProductTable {
    pub fn from_rows(rows: Vec<ProductRow>) -> Self {
        Self { rows }
    }

    pub fn rows(&self) -> &[ProductRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct categories in first-encounter order.
    pub fn categories(&self) -> Vec<String> {
        distinct(self.rows.iter().map(ProductRow::category))
    }

    /// Distinct sub-categories of `category` in first-encounter order.
    ///
    /// Empty when the category does not exist.
    pub fn sub_categories(&self, category: &str) -> Vec<String> {
        distinct(
            self.rows
                .iter()
                .filter(|r| r.category == category)
                .map(ProductRow::sub_category),
        )
    }

    pub fn contains_category(&self, category: &str) -> bool {
        self.rows.iter().any(|r| r.category == category)
    }

    pub fn contains_sub_category(&self, category: &str, sub_category: &str) -> bool {
        self.rows
            .iter()
            .any(|r| r.category == category && r.sub_category == sub_category)
    }
}

impl FromIterator<ProductRow> for ProductTable {
    fn from_iter<I: IntoIterator<Item = ProductRow>>(iter: I) -> Self {
        Self::from_rows(iter.into_iter().collect())
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for v in values {
        // Category counts are small; a linear scan keeps order without a side map.
        if !out.iter().any(|seen| seen == v) {
            out.push(v.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> ProductTable {
        ProductTable::from_rows(vec![
            ProductRow::new("Beverages", "Tea", "Tata", 90.0, 100.0),
            ProductRow::new("Snacks", "Chips", "Lays", 20.0, 20.0),
            ProductRow::new("Beverages", "Coffee", "Bru", 150.0, 180.0),
            ProductRow::new("Beverages", "Tea", "Brooke Bond", 60.0, 55.0),
        ])
    }

    #[test]
    fn discount_is_market_minus_sale() {
        let row = ProductRow::new("A", "a", "x", 10.0, 12.5);
        assert_eq!(row.discount(), 2.5);

        // Selling above market is allowed and yields a negative discount.
        let row = ProductRow::new("A", "a", "x", 12.0, 10.0);
        assert_eq!(row.discount(), -2.0);
    }

    #[test]
    fn deserialized_discount_is_recomputed() {
        let row: ProductRow = serde_json::from_str(
            r#"{"category":"A","sub_category":"a","brand":"x","sale_price":10.0,"market_price":12.0,"discount":999.0}"#,
        )
        .unwrap();
        assert_eq!(row.discount(), row.market_price() - row.sale_price());
        assert_eq!(row, ProductRow::new("A", "a", "x", 10.0, 12.0));

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["discount"], 2.0);
    }

    #[test]
    fn categories_keep_first_encounter_order() {
        assert_eq!(table().categories(), vec!["Beverages", "Snacks"]);
    }

    #[test]
    fn sub_categories_are_scoped_to_category() {
        let t = table();
        assert_eq!(t.sub_categories("Beverages"), vec!["Tea", "Coffee"]);
        assert_eq!(t.sub_categories("Snacks"), vec!["Chips"]);
        assert!(t.sub_categories("Dairy").is_empty());
    }

    #[test]
    fn containment_checks() {
        let t = table();
        assert!(t.contains_category("Snacks"));
        assert!(!t.contains_category("snacks"));
        assert!(t.contains_sub_category("Beverages", "Coffee"));
        assert!(!t.contains_sub_category("Snacks", "Coffee"));
    }

    #[test]
    fn value_selects_dimension_column() {
        let row = ProductRow::new("Beverages", "Tea", "Tata", 1.0, 2.0);
        assert_eq!(row.value(Dimension::Category), "Beverages");
        assert_eq!(row.value(Dimension::SubCategory), "Tea");
        assert_eq!(row.value(Dimension::Brand), "Tata");
    }
}
