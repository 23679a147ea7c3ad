//! Prompt construction for audience classification.

use pawsync_core::{AudienceTag, AudienceVocab, CanonicalProduct};

/// Description text beyond this many characters adds nothing to the
/// classification and inflates prompt cost.
pub const DESCRIPTION_LIMIT: usize = 300;

/// Builds the classification prompt for one product.
///
/// The prompt defines the closed vocabulary in the source's own language and
/// walks through the edge cases that trip the model up in practice:
/// grooming/spa products classify by the species the description mentions,
/// accessories and apparel are for humans, and explicit dual-species
/// products get both tags.
#[must_use]
pub fn build_audience_prompt(product: &CanonicalProduct, vocab: AudienceVocab) -> String {
    let dog = vocab.label(AudienceTag::Dog);
    let cat = vocab.label(AudienceTag::Cat);
    let humans = vocab.label(AudienceTag::Humans);
    let other = vocab.label(AudienceTag::Other);

    let description = truncate_chars(&product.description, DESCRIPTION_LIMIT);
    let category = product.category.as_deref().unwrap_or("");

    format!(
        "You classify pet-shop products by intended audience.\n\
         Allowed labels, use them verbatim: \"{dog}\", \"{cat}\", \"{humans}\", \"{other}\".\n\
         Rules:\n\
         - Grooming, spa, or care products: pick the species the description mentions.\n\
         - Accessories, apparel, and items worn or used by people: \"{humans}\".\n\
         - A product explicitly for both dogs and cats gets both labels.\n\
         - If nothing fits, answer [\"{other}\"].\n\
         Examples:\n\
         - \"Oatmeal shampoo, gentle on canine skin\" -> [\"{dog}\"]\n\
         - \"Cat & dog travel water bottle\" -> [\"{dog}\", \"{cat}\"]\n\
         - \"I love my cat T-shirt, 100% cotton\" -> [\"{humans}\"]\n\
         Answer with only a JSON array of labels, nothing else.\n\
         \n\
         Product name: {name}\n\
         Category: {category}\n\
         Description: {description}",
        name = product.name,
    )
}

/// Truncates on a character boundary; byte slicing would panic mid-codepoint
/// on the CSV sheet's Chinese text.
fn truncate_chars(s: &str, limit: usize) -> &str {
    match s.char_indices().nth(limit) {
        Some((byte_index, _)) => &s[..byte_index],
        None => s,
    }
}
