//! Content filtering: everything between a raw message and its exportable
//! body text. Stages are pure functions over strings (plus the normalizer's
//! injected HTML capability) so they compose in any order and test in
//! isolation.

pub mod greeting;
pub mod hash;
pub mod normalize;
pub mod patterns;
pub mod quality;
pub mod quote;
pub mod signature;
pub mod system;

pub use greeting::strip_opening_greeting;
pub use hash::content_hash;
pub use normalize::{
    Degradation, Extraction, Html2TextConverter, HtmlConverter, TagStripper, TextNormalizer,
    normalize_paragraphs, normalize_whitespace,
};
pub use quality::{QualityVerdict, is_valid_content};
pub use quote::{QuoteState, strip_quoted_replies, transition};
pub use signature::strip_signature;
pub use system::{SystemSignal, is_system_generated, system_signal};

/// Run the full cleaning sequence over an extracted body: quoted replies,
/// then the opening greeting, then the trailing signature, then whitespace
/// normalization.
pub fn clean_content(body: &str) -> String {
    let stripped = strip_quoted_replies(body);
    let stripped = strip_opening_greeting(&stripped);
    let stripped = strip_signature(&stripped);
    normalize_whitespace(&stripped)
}
