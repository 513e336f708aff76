//! Pattern matching over recognized text regions.
//!
//! The target identifier is a token containing the literal substring `_1_`
//! (e.g. `163233702292313922_1_lWV`). Matching is two-tier: an exact rule
//! over whitespace-delimited tokens first, and a permissive rule tolerant
//! of recognition noise around the digit, applied only when the exact rule
//! finds nothing in any region.

use tracing::debug;

use crate::processors::geometry::Quad;
use crate::recognition::TextRegion;

/// The literal infix the primary rule looks for inside a token.
const TARGET_INFIX: &str = "_1_";

/// A pattern match derived from a recognized text region.
///
/// Ephemeral; exists only within one invocation's match list.
#[derive(Debug, Clone)]
pub struct TokenMatch {
    /// The matched token.
    pub token: String,
    /// The full trimmed text of the region the token was found in.
    pub full_text: String,
    /// Confidence copied from the source region.
    pub confidence: f32,
    /// Bounding quadrilateral copied from the source region.
    pub bounds: Quad,
}

/// Scans recognized text regions for tokens containing the target pattern.
///
/// The primary rule trims each region's text and takes the first
/// whitespace-delimited token containing `_1_`. If no region yields a
/// primary match, a fallback rule strips all internal whitespace and
/// accepts the looser patterns `_1_`, `_1`, `1_`, or a digit `1` flanked by
/// an underscore or space on each side, compensating for recognition noise
/// that inserts or drops separators.
///
/// The returned list is sorted by confidence descending; equal confidences
/// keep their input order (stable sort), so selection is deterministic.
/// An empty input yields an empty list.
pub fn find_matches(regions: &[TextRegion]) -> Vec<TokenMatch> {
    let mut matches: Vec<TokenMatch> = regions.iter().filter_map(primary_match).collect();

    if matches.is_empty() {
        debug!("primary pattern found nothing, trying fallback");
        matches = regions.iter().filter_map(fallback_match).collect();
    }

    matches.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

    debug!(matches = matches.len(), "pattern matching finished");
    matches
}

/// Returns the highest-confidence match, or `None` if there are none.
///
/// The input is already sorted by [`find_matches`], so this is the head of
/// the list.
pub fn pick_best(matches: &[TokenMatch]) -> Option<&TokenMatch> {
    matches.first()
}

/// Applies the primary rule to one region: the first whitespace-delimited
/// token of the trimmed text containing `_1_`.
fn primary_match(region: &TextRegion) -> Option<TokenMatch> {
    let trimmed = region.text.trim();
    let token = trimmed
        .split_whitespace()
        .find(|token| token.contains(TARGET_INFIX))?;

    Some(TokenMatch {
        token: token.to_string(),
        full_text: trimmed.to_string(),
        confidence: region.confidence,
        bounds: region.bounds,
    })
}

/// Applies the fallback rule to one region: strip all whitespace, then
/// accept the looser separator-tolerant patterns.
fn fallback_match(region: &TextRegion) -> Option<TokenMatch> {
    let trimmed = region.text.trim();
    let stripped: String = trimmed.chars().filter(|c| !c.is_whitespace()).collect();

    if !fallback_pattern_hits(&stripped) {
        return None;
    }

    Some(TokenMatch {
        token: stripped,
        full_text: trimmed.to_string(),
        confidence: region.confidence,
        bounds: region.bounds,
    })
}

/// True if the text contains any of the permissive fallback patterns:
/// `_1_`, `_1`, `1_`, or a digit `1` flanked by an underscore or space on
/// each side.
fn fallback_pattern_hits(text: &str) -> bool {
    if text.contains("_1_") || text.contains("_1") || text.contains("1_") {
        return true;
    }

    let chars: Vec<char> = text.chars().collect();
    chars.windows(3).any(|w| {
        let flank = |c: char| c == '_' || c == ' ';
        w[1] == '1' && flank(w[0]) && flank(w[2])
    })
}
