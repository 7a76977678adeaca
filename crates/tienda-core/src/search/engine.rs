use crate::catalog::{CatalogSnapshot, Product};
use crate::search::{SearchHit, SearchOptions, SearchResult};

/// Full-row, case-insensitive substring search over a catalog snapshot.
///
/// A pure function of `(snapshot, query)`: no ranking, no tokenization,
/// results keep snapshot row order.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchEngine {
    options: SearchOptions,
}

impl SearchEngine {
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> SearchOptions {
        self.options
    }

    /// Runs `query` against `snapshot`.
    ///
    /// An empty query lists the first `browse_limit` rows. Otherwise every row
    /// with at least one value containing the query (both lowercased) is
    /// returned. The query is used as given; callers decide whether to trim.
    pub fn search<'a>(&self, snapshot: &'a CatalogSnapshot, query: &str) -> SearchResult<'a> {
        if query.is_empty() {
            let hits = snapshot
                .products()
                .iter()
                .enumerate()
                .take(self.options.browse_limit)
                .map(|(row, product)| SearchHit { row, product })
                .collect();
            return SearchResult {
                query: String::new(),
                hits,
                total_matches: snapshot.len(),
            };
        }

        let needle = query.to_lowercase();
        let hits: Vec<SearchHit<'a>> = snapshot
            .products()
            .iter()
            .enumerate()
            .filter(|(_, product)| matches_product(product, &needle))
            .map(|(row, product)| SearchHit { row, product })
            .collect();

        tracing::debug!(query, matches = hits.len(), "[SearchEngine] Query evaluated");

        SearchResult {
            query: query.to_string(),
            total_matches: hits.len(),
            hits,
        }
    }
}

/// `needle` must already be lowercased.
fn matches_product(product: &Product, needle: &str) -> bool {
    product
        .values()
        .any(|value| value.to_lowercase().contains(needle))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogTable, ColumnMapping};
    use chrono::Utc;

    fn snapshot(rows: &[[&str; 4]]) -> CatalogSnapshot {
        CatalogSnapshot::from_table(
            CatalogTable {
                headers: ["ID_SKU", "Producto", "Precio_Lista", "Rubro"]
                    .iter()
                    .map(|h| h.to_string())
                    .collect(),
                records: rows
                    .iter()
                    .map(|r| r.iter().map(|c| c.to_string()).collect())
                    .collect(),
            },
            &ColumnMapping::default(),
            Utc::now(),
        )
    }

    fn skus(result: &SearchResult<'_>) -> Vec<String> {
        result.products().map(|p| p.sku.clone()).collect()
    }

    #[test]
    fn test_query_matches_name_case_insensitively() {
        let snapshot = snapshot(&[
            ["A1", "Perfil C", "200", ""],
            ["B2", "Malla 6mm", "300", ""],
        ]);

        let result = SearchEngine::default().search(&snapshot, "malla");

        assert_eq!(skus(&result), vec!["B2"]);
        assert_eq!(result.hits[0].row, 1);
        assert_eq!(result.total_matches, 1);
    }

    #[test]
    fn test_query_matches_any_column_in_row_order() {
        let snapshot = snapshot(&[
            ["X1", "Tornillo", "10", "Ferretería"],
            ["HIERRO-1", "Barra", "50", ""],
            ["Z9", "Clavo", "5", "hierro y ferretería"],
            ["Q3", "Chapa", "hierro", ""],
        ]);

        let result = SearchEngine::default().search(&snapshot, "HIERRO");

        assert_eq!(skus(&result), vec!["HIERRO-1", "Z9", "Q3"]);
    }

    #[test]
    fn test_unicode_case_folding() {
        let snapshot = snapshot(&[["1", "ÁNGULO 2\"", "900", ""]]);
        let result = SearchEngine::default().search(&snapshot, "ángulo");
        assert_eq!(result.hits.len(), 1);
    }

    #[test]
    fn test_match_never_spans_two_columns() {
        let snapshot = snapshot(&[["AB", "CD", "1", ""]]);
        assert!(SearchEngine::default().search(&snapshot, "bc").is_empty());
    }

    #[test]
    fn test_empty_query_lists_first_rows_up_to_limit() {
        let rows: Vec<[&str; 4]> = (0..30).map(|_| ["S", "P", "1", ""]).collect();
        let snapshot = snapshot(&rows);
        let engine = SearchEngine::new(SearchOptions { browse_limit: 12 });

        let result = engine.search(&snapshot, "");

        assert_eq!(result.hits.len(), 12);
        assert_eq!(result.total_matches, 30);
        let rows: Vec<usize> = result.hits.iter().map(|h| h.row).collect();
        assert_eq!(rows, (0..12).collect::<Vec<_>>());
    }

    #[test]
    fn test_whitespace_query_is_not_trimmed() {
        let snapshot = snapshot(&[["A", "Perfil C", "1", ""], ["B", "Malla", "2", ""]]);
        let result = SearchEngine::default().search(&snapshot, " ");
        assert_eq!(skus(&result), vec!["A"]);
    }

    #[test]
    fn test_results_are_complete_and_exact() {
        let snapshot = snapshot(&[
            ["c-1", "Chapa Cincalum", "1", ""],
            ["c-2", "Caño", "2", "chapa"],
            ["c-3", "Perfil", "3", ""],
            ["c-4", "chapadur", "4", ""],
        ]);
        let engine = SearchEngine::default();
        let result = engine.search(&snapshot, "Chapa");

        for product in result.products() {
            assert!(product.values().any(|v| v.to_lowercase().contains("chapa")));
        }
        let expected: Vec<String> = snapshot
            .products()
            .iter()
            .filter(|p| p.values().any(|v| v.to_lowercase().contains("chapa")))
            .map(|p| p.sku.clone())
            .collect();
        assert_eq!(skus(&result), expected);
        assert_eq!(engine.search(&snapshot, "Chapa"), result);
    }
}
