//! Parsing of model output into the closed tag set.

use pawsync_core::AudienceTag;

/// Parses a completion into tags.
///
/// The contract: strip any code fences the model wrapped around its answer,
/// trim, parse as a JSON array of strings, drop empty entries and labels
/// outside the vocabulary, dedup. Returns `None` when the text is not a JSON
/// array or the surviving tag set is empty — the caller substitutes the
/// fallback tag.
#[must_use]
pub fn parse_tags(raw: &str) -> Option<Vec<AudienceTag>> {
    let stripped = strip_code_fences(raw);

    let value: serde_json::Value = serde_json::from_str(stripped.trim()).ok()?;
    let items = value.as_array()?;

    let mut tags: Vec<AudienceTag> = Vec::new();
    for item in items {
        let Some(label) = item.as_str() else { continue };
        if label.trim().is_empty() {
            continue;
        }
        if let Some(tag) = AudienceTag::from_label(label) {
            if !tags.contains(&tag) {
                tags.push(tag);
            }
        }
    }

    if tags.is_empty() {
        None
    } else {
        Some(tags)
    }
}

/// Removes a leading/trailing markdown fence (with or without a language
/// hint), leaving the inner text.
fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the language hint line ("json", "JSON", or empty).
    let rest = match rest.split_once('\n') {
        Some((_, body)) => body,
        None => rest,
    };
    rest.strip_suffix("```").unwrap_or(rest).trim()
}
