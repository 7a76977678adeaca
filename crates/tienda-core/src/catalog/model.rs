//! Catalog domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Feed headers that supply the well-known product fields.
///
/// Every other header is carried through as an additional column.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnMapping {
    pub sku: String,
    pub name: String,
    pub price: String,
    pub stock: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            sku: "ID_SKU".to_string(),
            name: "Producto".to_string(),
            price: "Precio_Lista".to_string(),
            stock: "Disponibilidad".to_string(),
        }
    }
}

/// A table exactly as a feed delivered it: headers and string cells.
///
/// Records may be shorter than the header row; `CatalogSnapshot::from_table`
/// pads them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CatalogTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

/// One catalog row. Every value is a string; missing cells are `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub sku: String,
    pub name: String,
    pub price_text: String,
    pub stock_text: String,
    /// Columns outside the mapping, in feed order, keyed by header.
    pub extra: Vec<(String, String)>,
}

impl Product {
    /// Every value of the row: mapped fields first, then additional columns.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        [
            self.sku.as_str(),
            self.name.as_str(),
            self.price_text.as_str(),
            self.stock_text.as_str(),
        ]
        .into_iter()
        .chain(self.extra.iter().map(|(_, value)| value.as_str()))
    }

    /// Value of an additional column by header.
    pub fn extra_value(&self, header: &str) -> Option<&str> {
        self.extra
            .iter()
            .find(|(name, _)| name == header)
            .map(|(_, value)| value.as_str())
    }

    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            "Producto sin nombre"
        } else {
            &self.name
        }
    }

    pub fn display_price(&self) -> &str {
        if self.price_text.is_empty() {
            "0"
        } else {
            &self.price_text
        }
    }

    pub fn display_stock(&self) -> &str {
        if self.stock_text.is_empty() {
            "Consultar"
        } else {
            &self.stock_text
        }
    }
}

/// Where the value for a given header lives inside a `Product`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Sku,
    Name,
    Price,
    Stock,
    Extra(usize),
}

/// Immutable point-in-time copy of the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogSnapshot {
    headers: Vec<String>,
    layout: Vec<Slot>,
    products: Vec<Product>,
    fetched_at: DateTime<Utc>,
    generation: u64,
}

impl CatalogSnapshot {
    /// Normalizes a raw table into products.
    ///
    /// A mapped header that is missing from the feed yields `""` for that
    /// field. When a header repeats, only its first occurrence feeds the
    /// mapped field; later ones are kept as additional columns. Cells past
    /// the last header are dropped.
    pub fn from_table(
        table: CatalogTable,
        mapping: &ColumnMapping,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let mut layout = Vec::with_capacity(table.headers.len());
        let mut extra_headers = Vec::new();
        for header in &table.headers {
            let slot = if *header == mapping.sku && !layout.contains(&Slot::Sku) {
                Slot::Sku
            } else if *header == mapping.name && !layout.contains(&Slot::Name) {
                Slot::Name
            } else if *header == mapping.price && !layout.contains(&Slot::Price) {
                Slot::Price
            } else if *header == mapping.stock && !layout.contains(&Slot::Stock) {
                Slot::Stock
            } else {
                extra_headers.push(header.clone());
                Slot::Extra(extra_headers.len() - 1)
            };
            layout.push(slot);
        }

        let products = table
            .records
            .into_iter()
            .map(|record| {
                let mut product = Product {
                    extra: extra_headers
                        .iter()
                        .map(|header| (header.clone(), String::new()))
                        .collect(),
                    ..Product::default()
                };
                for (slot, cell) in layout.iter().zip(record) {
                    match slot {
                        Slot::Sku => product.sku = cell,
                        Slot::Name => product.name = cell,
                        Slot::Price => product.price_text = cell,
                        Slot::Stock => product.stock_text = cell,
                        Slot::Extra(idx) => product.extra[*idx].1 = cell,
                    }
                }
                product
            })
            .collect();

        Self {
            headers: table.headers,
            layout,
            products,
            fetched_at,
            generation: 0,
        }
    }

    /// Tags the snapshot with the store's fetch counter.
    pub fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Product at a snapshot row index.
    pub fn get(&self, row: usize) -> Option<&Product> {
        self.products.get(row)
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn fetched_at(&self) -> DateTime<Utc> {
        self.fetched_at
    }

    /// Identifies the fetch this snapshot came from; row indexes are only
    /// meaningful within one generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Values of one product in feed header order.
    pub fn row_values<'a>(&self, product: &'a Product) -> Vec<&'a str> {
        self.layout
            .iter()
            .map(|slot| match slot {
                Slot::Sku => product.sku.as_str(),
                Slot::Name => product.name.as_str(),
                Slot::Price => product.price_text.as_str(),
                Slot::Stock => product.stock_text.as_str(),
                Slot::Extra(idx) => product
                    .extra
                    .get(*idx)
                    .map(|(_, value)| value.as_str())
                    .unwrap_or(""),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str], records: &[&[&str]]) -> CatalogTable {
        CatalogTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            records: records
                .iter()
                .map(|r| r.iter().map(|c| c.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn test_from_table_maps_known_columns_and_keeps_extras() {
        let snapshot = CatalogSnapshot::from_table(
            table(
                &["Rubro", "ID_SKU", "Producto", "Precio_Lista", "Disponibilidad"],
                &[&["Chapas", "007", "Chapa 10mm", "1500", "Alta"]],
            ),
            &ColumnMapping::default(),
            Utc::now(),
        );

        let product = &snapshot.products()[0];
        assert_eq!(product.sku, "007");
        assert_eq!(product.name, "Chapa 10mm");
        assert_eq!(product.price_text, "1500");
        assert_eq!(product.stock_text, "Alta");
        assert_eq!(product.extra_value("Rubro"), Some("Chapas"));
        assert_eq!(
            snapshot.row_values(product),
            vec!["Chapas", "007", "Chapa 10mm", "1500", "Alta"]
        );
    }

    #[test]
    fn test_short_rows_and_missing_columns_become_empty() {
        let snapshot = CatalogSnapshot::from_table(
            table(&["ID_SKU", "Producto", "Notas"], &[&["A1"]]),
            &ColumnMapping::default(),
            Utc::now(),
        );

        let product = snapshot.get(0).unwrap();
        assert_eq!(product.sku, "A1");
        assert_eq!(product.name, "");
        assert_eq!(product.price_text, "");
        assert_eq!(product.stock_text, "");
        assert_eq!(product.extra_value("Notas"), Some(""));
        assert_eq!(product.display_name(), "Producto sin nombre");
        assert_eq!(product.display_price(), "0");
        assert_eq!(product.display_stock(), "Consultar");
    }

    #[test]
    fn test_duplicate_header_is_kept_as_extra() {
        let snapshot = CatalogSnapshot::from_table(
            table(&["Producto", "Producto"], &[&["Malla", "Malla 6mm"]]),
            &ColumnMapping::default(),
            Utc::now(),
        );

        let product = snapshot.get(0).unwrap();
        assert_eq!(product.name, "Malla");
        assert_eq!(product.extra, vec![("Producto".to_string(), "Malla 6mm".to_string())]);
        assert_eq!(snapshot.row_values(product), vec!["Malla", "Malla 6mm"]);
    }
}
