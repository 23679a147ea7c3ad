//! The closed audience vocabulary assigned to products by the classifier.

use serde::{Deserialize, Serialize};

/// Intended-audience category for a product.
///
/// The set is closed: classifier output that maps to none of these labels is
/// discarded, and an empty result collapses to [`AudienceTag::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudienceTag {
    Dog,
    Cat,
    Humans,
    Other,
}

impl AudienceTag {
    /// Canonical label persisted to the store and used in API payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            AudienceTag::Dog => "Dog",
            AudienceTag::Cat => "Cat",
            AudienceTag::Humans => "Humans",
            AudienceTag::Other => "Other",
        }
    }

    /// Parses a label from either vocabulary, case-insensitively for the
    /// English set. Models prompted in one language occasionally answer in
    /// the other, so both are always accepted.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let trimmed = label.trim();
        match trimmed {
            "狗" => return Some(AudienceTag::Dog),
            "猫" => return Some(AudienceTag::Cat),
            "人用" => return Some(AudienceTag::Humans),
            "其他" => return Some(AudienceTag::Other),
            _ => {}
        }
        match trimmed.to_ascii_lowercase().as_str() {
            "dog" | "dogs" => Some(AudienceTag::Dog),
            "cat" | "cats" => Some(AudienceTag::Cat),
            "humans" | "human" => Some(AudienceTag::Humans),
            "other" => Some(AudienceTag::Other),
            _ => None,
        }
    }
}

impl std::fmt::Display for AudienceTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The label set a given source's classifier prompt is written in.
///
/// The records API carries English product data; the supplier CSV sheet is
/// maintained in Chinese. Prompting in the sheet's own language measurably
/// improves label adherence for those rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudienceVocab {
    pub dog: &'static str,
    pub cat: &'static str,
    pub humans: &'static str,
    pub other: &'static str,
}

impl AudienceVocab {
    #[must_use]
    pub const fn english() -> Self {
        Self {
            dog: "Dog",
            cat: "Cat",
            humans: "Humans",
            other: "Other",
        }
    }

    #[must_use]
    pub const fn supplier_sheet() -> Self {
        Self {
            dog: "狗",
            cat: "猫",
            humans: "人用",
            other: "其他",
        }
    }

    /// Renders a tag in this vocabulary (for prompt text).
    #[must_use]
    pub const fn label(&self, tag: AudienceTag) -> &'static str {
        match tag {
            AudienceTag::Dog => self.dog,
            AudienceTag::Cat => self.cat,
            AudienceTag::Humans => self.humans,
            AudienceTag::Other => self.other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_label_parses_english_case_insensitively() {
        assert_eq!(AudienceTag::from_label("dog"), Some(AudienceTag::Dog));
        assert_eq!(AudienceTag::from_label("DOG"), Some(AudienceTag::Dog));
        assert_eq!(AudienceTag::from_label("Cats"), Some(AudienceTag::Cat));
        assert_eq!(AudienceTag::from_label("human"), Some(AudienceTag::Humans));
    }

    #[test]
    fn from_label_parses_sheet_vocabulary() {
        assert_eq!(AudienceTag::from_label("狗"), Some(AudienceTag::Dog));
        assert_eq!(AudienceTag::from_label("猫"), Some(AudienceTag::Cat));
        assert_eq!(AudienceTag::from_label("人用"), Some(AudienceTag::Humans));
        assert_eq!(AudienceTag::from_label("其他"), Some(AudienceTag::Other));
    }

    #[test]
    fn from_label_trims_whitespace() {
        assert_eq!(AudienceTag::from_label("  Dog \n"), Some(AudienceTag::Dog));
    }

    #[test]
    fn from_label_rejects_unknown() {
        assert_eq!(AudienceTag::from_label("hamster"), None);
        assert_eq!(AudienceTag::from_label(""), None);
    }

    #[test]
    fn vocab_labels_round_trip() {
        for tag in [
            AudienceTag::Dog,
            AudienceTag::Cat,
            AudienceTag::Humans,
            AudienceTag::Other,
        ] {
            assert_eq!(
                AudienceTag::from_label(AudienceVocab::english().label(tag)),
                Some(tag)
            );
            assert_eq!(
                AudienceTag::from_label(AudienceVocab::supplier_sheet().label(tag)),
                Some(tag)
            );
        }
    }
}
