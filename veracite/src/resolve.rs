//! Reference resolution.
//!
//! Back-fills `citation_url` on claims that only carry a reference marker
//! (`"[1]"`), using the reference map collected while parsing the document.

use rustc_hash::FxHashMap;

use crate::models::Claim;

/// Resolves reference markers to URLs.
///
/// For each claim lacking a `citation_url` but holding a `citation_ref`,
/// looks the ref up verbatim, then wrapped in brackets when the model
/// reported a bare `"1"`. Claims that already carry a URL are never
/// rewritten; claims whose ref is absent from the map stay unresolved.
#[must_use]
pub fn resolve_references(
    mut claims: Vec<Claim>,
    references: &FxHashMap<String, String>,
) -> Vec<Claim> {
    if references.is_empty() {
        return claims;
    }
    for claim in &mut claims {
        if claim.citation_url.is_some() {
            continue;
        }
        let Some(reference) = claim.citation_ref.as_deref() else {
            continue;
        };
        let url = references
            .get(reference)
            .or_else(|| references.get(&format!("[{reference}]")));
        if let Some(url) = url {
            claim.citation_url = Some(url.clone());
        }
    }
    claims
}
