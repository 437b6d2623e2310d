use std::fmt;
use std::hash::Hasher as _;

use thiserror::Error;
use twox_hash::XxHash64;

const SHINGLE_LEN: usize = 8;

/// A similarity-preserving 64-bit digest. Small edits to the input produce
/// small Hamming distances between digests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digest(u64);

impl Digest {
    pub fn from_raw(bits: u64) -> Self {
        Digest(bits)
    }

    /// Hamming distance: the number of bits that differ between the two
    /// digests. Lower distance = more similar content.
    pub fn distance(&self, other: &Digest) -> u32 {
        (self.0 ^ other.0).count_ones()
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// One fingerprinted leaf entry. `path` is the logical `/`-joined identifier
/// built during recursive descent (`outer.zip:inner.zip/file.txt`), never a
/// filesystem path.
#[derive(Debug, Clone)]
pub struct Fingerprint {
    pub path: String,
    pub digest: Digest,
}

#[derive(Debug, Error)]
pub enum FingerprintError {
    #[error("input too small to fingerprint: {0} bytes")]
    InputTooSmall(usize),
}

/// The fingerprint capability consumed by the walker and dispatcher.
pub trait Fingerprinter: Send + Sync {
    fn fingerprint(&self, data: &[u8]) -> Result<Digest, FingerprintError>;
}

/// Byte-shingle simhash. Every 8-byte window of the input is hashed with
/// XxHash64 and votes each digest bit up or down; the sign of the tally
/// decides the bit. Windows shared between two inputs vote identically, so
/// content that mostly overlaps lands at a small Hamming distance.
#[derive(Debug, Default, Clone, Copy)]
pub struct SimHasher;

impl Fingerprinter for SimHasher {
    fn fingerprint(&self, data: &[u8]) -> Result<Digest, FingerprintError> {
        if data.len() < SHINGLE_LEN {
            return Err(FingerprintError::InputTooSmall(data.len()));
        }

        let mut votes = [0i64; 64];
        for window in data.windows(SHINGLE_LEN) {
            let mut hasher = XxHash64::with_seed(0);
            hasher.write(window);
            let hash = hasher.finish();
            for (bit, vote) in votes.iter_mut().enumerate() {
                if (hash >> bit) & 1 == 1 {
                    *vote += 1;
                } else {
                    *vote -= 1;
                }
            }
        }

        let mut bits = 0u64;
        for (bit, vote) in votes.iter().enumerate() {
            if *vote > 0 {
                bits |= 1 << bit;
            }
        }
        Ok(Digest(bits))
    }
}
