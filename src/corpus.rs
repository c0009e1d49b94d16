//! Corpus I/O: tokenization and the line-delimited JSON record formats.
//!
//! Everything here is glue around the core: it turns raw catalog/listing
//! files into token lists and writes the matched output. The core never
//! touches files itself.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{JoinError, Result};
use crate::join::JoinReport;

/// Lowercase a raw string and split it into alphanumeric runs.
///
/// `"Nikon D90 (body only)"` becomes `["nikon", "d90", "body", "only"]`.
pub fn tokenize(raw: &str) -> Vec<String> {
    raw.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_owned)
        .collect()
}

/// One catalog product (base record).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Display name, carried through to the output file.
    pub product_name: String,
    /// Manufacturer, if present.
    #[serde(default)]
    pub manufacturer: String,
    /// Model string, if present.
    #[serde(default)]
    pub model: String,
}

impl Product {
    /// Tokens from every text field used for matching.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = tokenize(&self.product_name);
        tokens.extend(tokenize(&self.manufacturer));
        tokens.extend(tokenize(&self.model));
        tokens
    }
}

/// One marketplace listing (query record).
///
/// The full JSON value of the line is kept so fields the matcher does not
/// use (price, currency, ...) survive into the output untouched.
#[derive(Debug, Clone)]
pub struct Listing {
    /// Listing title used for matching.
    pub title: String,
    /// Manufacturer used for matching.
    pub manufacturer: String,
    /// The listing's complete JSON value.
    pub raw: Value,
}

impl Listing {
    /// Tokens from the fields used for matching.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = tokenize(&self.title);
        tokens.extend(tokenize(&self.manufacturer));
        tokens
    }
}

/// Read products from a file with one JSON object per line.
///
/// Blank lines are skipped; a malformed line is an error.
pub fn read_products(path: &Path) -> Result<Vec<Product>> {
    let reader = BufReader::new(File::open(path)?);
    let mut products = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        products.push(serde_json::from_str(&line)?);
    }
    Ok(products)
}

/// Read listings from a file with one JSON object per line, keeping each
/// line's full JSON value.
pub fn read_listings(path: &Path) -> Result<Vec<Listing>> {
    let reader = BufReader::new(File::open(path)?);
    let mut listings = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let raw: Value = serde_json::from_str(&line)?;
        listings.push(Listing {
            title: string_field(&raw, "title"),
            manufacturer: string_field(&raw, "manufacturer"),
            raw,
        });
    }
    Ok(listings)
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_owned()
}

/// Matched output row: one product and the listings assigned to it.
#[derive(Debug, Serialize)]
struct MatchedProduct<'a> {
    product_name: &'a str,
    listings: Vec<&'a Value>,
}

/// Write one JSON object per product with its matched listings.
///
/// With `skip_unmatched`, products whose assignment list is empty are
/// omitted from the file. The report must come from matching `listings`;
/// an assignment pointing past the listing corpus is rejected.
pub fn write_results(
    path: &Path,
    products: &[Product],
    listings: &[Listing],
    report: &JoinReport,
    skip_unmatched: bool,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for (product, assigned) in products.iter().zip(&report.assignments) {
        if skip_unmatched && assigned.is_empty() {
            continue;
        }
        let row = MatchedProduct {
            product_name: &product.product_name,
            listings: assigned
                .iter()
                .map(|&q| {
                    listings.get(q).map(|l| &l.raw).ok_or_else(|| {
                        JoinError::InvalidParameter(format!(
                            "report assigns listing {q}, but only {} listings were provided",
                            listings.len()
                        ))
                    })
                })
                .collect::<Result<Vec<_>>>()?,
        };
        serde_json::to_writer(&mut writer, &row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}
