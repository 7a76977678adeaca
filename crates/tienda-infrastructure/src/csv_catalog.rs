//! CSV decoding of catalog feeds.
//!
//! Cells are kept verbatim as strings: no type inference, no trimming, so
//! identifiers such as `"007"` and prices such as `"1.500,00"` arrive exactly
//! as published.

use csv::ReaderBuilder;
use tienda_core::catalog::CatalogTable;
use tienda_core::{Result, TiendaError};

/// Parses CSV text with a header row into a `CatalogTable`.
///
/// Rows may have fewer cells than the header (padded later with `""`).
/// Blank lines are skipped. A leading UTF-8 byte order mark is ignored.
pub fn parse_catalog_csv(text: &str) -> Result<CatalogTable> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error("header row", e))?
        .iter()
        .map(str::to_string)
        .collect();

    if headers.iter().all(|header| header.is_empty()) {
        return Err(TiendaError::feed_unavailable(
            "catalog feed has no header row",
        ));
    }

    let mut records = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        let record = result.map_err(|e| csv_error(&format!("row {}", idx + 1), e))?;
        records.push(record.iter().map(str::to_string).collect());
    }

    Ok(CatalogTable { headers, records })
}

/// Renders headers and rows as CSV text.
pub fn write_catalog_csv<'a, I>(headers: &[String], rows: I) -> Result<String>
where
    I: IntoIterator<Item = Vec<&'a str>>,
{
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer
        .write_record(headers)
        .map_err(|e| serialization_error(e.to_string()))?;
    for row in rows {
        writer
            .write_record(&row)
            .map_err(|e| serialization_error(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| serialization_error(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| serialization_error(e.to_string()))
}

fn csv_error(location: &str, err: csv::Error) -> TiendaError {
    TiendaError::feed_unavailable(format!("invalid CSV at {location}: {err}"))
}

fn serialization_error(message: String) -> TiendaError {
    TiendaError::Serialization {
        format: "CSV".to_string(),
        message,
    }
}
