//! Canonical, source-independent view of one catalog row.

use serde::{Deserialize, Serialize};

/// One image attached to a product, in display order.
///
/// `position` is 0-based; position 0 is the primary image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
    pub position: u32,
}

impl ImageRef {
    /// Destination key in blob storage.
    ///
    /// The extension is fixed to `.jpg`: source URLs are typically
    /// extension-less signed links, and the actual content type is carried
    /// on the upload itself.
    #[must_use]
    pub fn storage_key(&self, supplier_id: &str, sku: &str) -> String {
        format!("{supplier_id}/{sku}/image-{}.jpg", self.position + 1)
    }

    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.position == 0
    }
}

/// Normalized, typed view of one source row.
///
/// Produced by a source-specific normalizer; rows without a SKU never become
/// a `CanonicalProduct` (they are skipped upstream). String fields default to
/// empty rather than `None` — the store schema treats them as NOT NULL text —
/// except `barcode` and `category`, where absence is meaningful.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CanonicalProduct {
    pub sku: String,
    pub supplier_id: String,
    pub name: String,
    pub name_en: String,
    pub barcode: Option<String>,
    pub brand: String,
    pub description: String,
    pub ingredients: String,
    pub dimensions: String,
    pub weight_grams: f64,
    pub origin: String,
    pub msrp: i32,
    pub case_pack: String,
    pub is_active: bool,
    pub category: Option<String>,
    pub available_good: i32,
    pub available_defective: i32,
    pub images: Vec<ImageRef>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_key_is_one_based_and_jpg() {
        let img = ImageRef {
            url: "https://cdn.example.com/signed/abc".to_string(),
            position: 0,
        };
        assert_eq!(img.storage_key("sup-1", "A1"), "sup-1/A1/image-1.jpg");

        let img = ImageRef {
            url: "https://cdn.example.com/signed/def".to_string(),
            position: 2,
        };
        assert_eq!(img.storage_key("sup-1", "A1"), "sup-1/A1/image-3.jpg");
    }

    #[test]
    fn only_position_zero_is_primary() {
        let primary = ImageRef {
            url: String::new(),
            position: 0,
        };
        let secondary = ImageRef {
            url: String::new(),
            position: 1,
        };
        assert!(primary.is_primary());
        assert!(!secondary.is_primary());
    }
}
