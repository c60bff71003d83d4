//! Content digest used as the deduplication key.

use std::fmt;

use atelier_core::DigestAlgorithm;
use sha1::Sha1;
use sha2::{Digest, Sha256};

/// Lowercase hex hash of processed image bytes. Unsalted, so identical bytes
/// always produce the same digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentDigest {
    algorithm: DigestAlgorithm,
    hex: String,
}

impl ContentDigest {
    pub fn compute(algorithm: DigestAlgorithm, data: &[u8]) -> Self {
        let hex = match algorithm {
            DigestAlgorithm::Sha1 => hex::encode(Sha1::digest(data)),
            DigestAlgorithm::Sha256 => hex::encode(Sha256::digest(data)),
        };
        Self { algorithm, hex }
    }

    pub fn algorithm(&self) -> DigestAlgorithm {
        self.algorithm
    }

    pub fn as_str(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for ContentDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(
            ContentDigest::compute(DigestAlgorithm::Sha1, b"abc").as_str(),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            ContentDigest::compute(DigestAlgorithm::Sha256, b"abc").as_str(),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn identical_bytes_identical_digest() {
        let a = ContentDigest::compute(DigestAlgorithm::Sha1, b"same bytes");
        let b = ContentDigest::compute(DigestAlgorithm::Sha1, b"same bytes");
        let c = ContentDigest::compute(DigestAlgorithm::Sha1, b"other bytes");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.as_str().len(), DigestAlgorithm::Sha1.hex_len());
    }

    #[test]
    fn digests_key_hash_sets() {
        use std::collections::HashSet;

        let set: HashSet<ContentDigest> = [
            ContentDigest::compute(DigestAlgorithm::Sha1, b"abc"),
            ContentDigest::compute(DigestAlgorithm::Sha1, b"abc"),
            ContentDigest::compute(DigestAlgorithm::Sha256, b"abc"),
        ]
        .into_iter()
        .collect();
        assert_eq!(set.len(), 2);
    }
}
