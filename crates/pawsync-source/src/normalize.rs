//! Normalization from raw source rows to [`CanonicalProduct`].
//!
//! One normalizer per source kind. Field parsing is best-effort throughout:
//! a malformed numeric cell resolves to zero, never an error, because one
//! sloppy spreadsheet cell must not block a catalog import.

use std::sync::LazyLock;

use pawsync_core::{CanonicalProduct, ImageRef};
use regex::Regex;
use serde_json::Value;

use crate::types::SourceRow;

/// Affirmative token for the records API's `active` column.
pub const AFFIRMATIVE_EN: &str = "yes";
/// Affirmative token for the supplier sheet's 是否在售 column.
pub const AFFIRMATIVE_SHEET: &str = "是";

static MARKUP_URL: LazyLock<Regex> = LazyLock::new(|| {
    // Parenthesized URLs inside free-text image markup, e.g. "主图(https://…)".
    Regex::new(r"\((https?://[^)\s]+)\)").expect("valid markup regex")
});

/// Normalizes one records-API row.
///
/// Returns `None` when the SKU field is absent or empty — the row is skipped,
/// not an error.
#[must_use]
pub fn normalize_records_row(row: &SourceRow, fallback_supplier_id: &str) -> Option<CanonicalProduct> {
    let sku = required_text(row, "sku")?;

    let images = row
        .field("images")
        .map(attachment_images)
        .unwrap_or_default();

    Some(CanonicalProduct {
        supplier_id: supplier_or_fallback(row, "supplier_id", fallback_supplier_id),
        name: text(row, "name"),
        name_en: text(row, "name_en"),
        barcode: optional_text(row, "barcode"),
        brand: text(row, "brand"),
        description: text(row, "description"),
        ingredients: text(row, "ingredients"),
        dimensions: text(row, "dimensions"),
        weight_grams: parse_weight_grams(&text(row, "weight_grams")),
        origin: text(row, "origin"),
        msrp: parse_msrp(&text(row, "msrp")),
        case_pack: text(row, "case_pack"),
        is_active: parse_affirmative(&text(row, "active"), AFFIRMATIVE_EN),
        category: optional_text(row, "category"),
        available_good: parse_quantity(&text(row, "qty_good")),
        available_defective: parse_quantity(&text(row, "qty_defective")),
        images,
        sku,
    })
}

/// Normalizes one row of the supplier CSV sheet (Chinese column headers).
///
/// Returns `None` when the 商品编码 (SKU) cell is absent or empty.
#[must_use]
pub fn normalize_sheet_row(row: &SourceRow, fallback_supplier_id: &str) -> Option<CanonicalProduct> {
    let sku = required_text(row, "商品编码")?;

    Some(CanonicalProduct {
        supplier_id: supplier_or_fallback(row, "供应商", fallback_supplier_id),
        name: text(row, "品名"),
        name_en: text(row, "英文品名"),
        barcode: optional_text(row, "条码"),
        brand: text(row, "品牌"),
        description: text(row, "卖点"),
        ingredients: text(row, "成分"),
        dimensions: text(row, "规格"),
        weight_grams: parse_weight_grams(&text(row, "重量克")),
        origin: text(row, "产地"),
        msrp: parse_msrp(&text(row, "零售价")),
        case_pack: text(row, "箱规"),
        is_active: parse_affirmative(&text(row, "是否在售"), AFFIRMATIVE_SHEET),
        category: optional_text(row, "类目"),
        available_good: parse_quantity(&text(row, "良品库存")),
        available_defective: parse_quantity(&text(row, "次品库存")),
        images: extract_markup_images(&text(row, "图片")),
        sku,
    })
}

/// The SKU cell, or `None` for the silent-skip case.
fn required_text(row: &SourceRow, key: &str) -> Option<String> {
    let value = text(row, key);
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

fn supplier_or_fallback(row: &SourceRow, key: &str, fallback: &str) -> String {
    optional_text(row, key).unwrap_or_else(|| fallback.to_owned())
}

/// Field rendered as text. Numbers stringify; everything else is empty.
fn text(row: &SourceRow, key: &str) -> String {
    match row.field(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Field as trimmed non-empty text, preserving absence as `None`.
fn optional_text(row: &SourceRow, key: &str) -> Option<String> {
    let value = text(row, key);
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Best-effort weight parse; invalid or missing text resolves to 0.
#[must_use]
pub fn parse_weight_grams(raw: &str) -> f64 {
    raw.trim().parse::<f64>().unwrap_or(0.0)
}

/// Best-effort retail-price parse.
///
/// Strips a single leading currency symbol and thousands separators, then
/// parses; fractional values round to the nearest integer. Unparseable input
/// resolves to 0.
#[must_use]
pub fn parse_msrp(raw: &str) -> i32 {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix('$')
        .or_else(|| trimmed.strip_prefix('¥'))
        .or_else(|| trimmed.strip_prefix('￥'))
        .unwrap_or(trimmed)
        .trim_start();
    let digits: String = stripped.chars().filter(|c| *c != ',').collect();

    if let Ok(value) = digits.parse::<i32>() {
        return value;
    }
    digits.parse::<f64>().map_or(0, |value| {
        #[allow(clippy::cast_possible_truncation)]
        {
            value.round() as i32
        }
    })
}

/// On-hand quantity parse; anything unparseable is 0.
#[must_use]
pub fn parse_quantity(raw: &str) -> i32 {
    raw.trim().parse::<i32>().unwrap_or(0)
}

/// Boolean-looking cells are true only on an exact match of the affirmative
/// token; every other value (including casing variants) is false.
#[must_use]
pub fn parse_affirmative(raw: &str, token: &str) -> bool {
    raw.trim() == token
}

/// Extracts ordered image refs from free-text markup with parenthesized
/// URLs, e.g. `主图(https://cdn…/a) 细节(https://cdn…/b)`.
#[must_use]
pub fn extract_markup_images(markup: &str) -> Vec<ImageRef> {
    MARKUP_URL
        .captures_iter(markup)
        .enumerate()
        .map(|(position, captures)| ImageRef {
            url: captures[1].to_owned(),
            position: u32::try_from(position).unwrap_or(u32::MAX),
        })
        .collect()
}

/// Extracts ordered image refs from a structured attachment list: an array
/// of `{ "url": … }` objects or bare URL strings.
#[must_use]
pub fn attachment_images(value: &Value) -> Vec<ImageRef> {
    let Some(items) = value.as_array() else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item {
            Value::String(url) => Some(url.as_str()),
            Value::Object(fields) => fields.get("url").and_then(Value::as_str),
            _ => None,
        })
        .filter(|url| !url.is_empty())
        .enumerate()
        .map(|(position, url)| ImageRef {
            url: url.to_owned(),
            position: u32::try_from(position).unwrap_or(u32::MAX),
        })
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
