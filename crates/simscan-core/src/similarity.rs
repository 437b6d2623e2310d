use crate::filter::{Category, PathFilter};
use crate::fingerprint::Fingerprint;

/// Submissions are laid out so the first 9 path characters encode the
/// author; this is a structural convention of the input corpus, not
/// something the engine validates.
pub const AUTHOR_PREFIX_LEN: usize = 9;

/// A directional match within the category's distance threshold. `(a, b)`
/// and `(b, a)` are distinct pairs; the comparison iterates the full cross
/// product rather than the upper triangle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidatePair {
    pub source: String,
    pub dest: String,
    pub distance: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub text: u32,
    pub binary: u32,
}

pub fn author_prefix(path: &str) -> &[u8] {
    let bytes = path.as_bytes();
    &bytes[..bytes.len().min(AUTHOR_PREFIX_LEN)]
}

/// All-pairs comparison over the filtered fingerprint set.
///
/// The author-prefix equality check is the only skip. It also suppresses
/// self-pairs, since an entry always shares its own prefix; there is
/// deliberately no separate `i != j` guard. The threshold is picked from the
/// category of the source path and the comparison is inclusive
/// (`distance <= threshold`).
pub fn find_candidates(
    fingerprints: &[Fingerprint],
    filter: &PathFilter,
    thresholds: Thresholds,
) -> Vec<CandidatePair> {
    let mut pairs = Vec::new();
    for a in fingerprints {
        let threshold = match filter.category(&a.path) {
            Category::Text => thresholds.text,
            Category::Binary => thresholds.binary,
        };
        for b in fingerprints {
            if author_prefix(&a.path) == author_prefix(&b.path) {
                continue;
            }
            let distance = a.digest.distance(&b.digest);
            if distance <= threshold {
                pairs.push(CandidatePair {
                    source: a.path.clone(),
                    dest: b.path.clone(),
                    distance,
                });
            }
        }
    }
    pairs
}
