use serde::{Deserialize, Serialize};

use crate::hash::HashAlgorithm;

/// All the hash formats the identifier can recognize.
/// Salted and iterated formats are labeled but never attacked.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashKind {
    Md5,
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
    Bcrypt,
    Sha512Crypt,
    Sha256Crypt,
    Md5Crypt,
    Unknown,
}

impl HashKind {
    pub fn name(&self) -> &'static str {
        match self {
            HashKind::Md5 => "md5",
            HashKind::Sha1 => "sha1",
            HashKind::Sha224 => "sha224",
            HashKind::Sha256 => "sha256",
            HashKind::Sha384 => "sha384",
            HashKind::Sha512 => "sha512",
            HashKind::Bcrypt => "bcrypt",
            HashKind::Sha512Crypt => "sha512crypt",
            HashKind::Sha256Crypt => "sha256crypt",
            HashKind::Md5Crypt => "md5crypt",
            HashKind::Unknown => "unknown",
        }
    }

    /// Returns the crackable digest algorithm behind this format, if any.
    pub fn algorithm(&self) -> Option<HashAlgorithm> {
        match self {
            HashKind::Md5 => Some(HashAlgorithm::Md5),
            HashKind::Sha1 => Some(HashAlgorithm::Sha1),
            HashKind::Sha224 => Some(HashAlgorithm::Sha224),
            HashKind::Sha256 => Some(HashAlgorithm::Sha256),
            HashKind::Sha384 => Some(HashAlgorithm::Sha384),
            HashKind::Sha512 => Some(HashAlgorithm::Sha512),
            _ => None,
        }
    }

    /// A rough resistance label for the format itself, independent of the
    /// hashed password.
    pub fn strength_label(&self) -> &'static str {
        match self {
            HashKind::Md5 | HashKind::Sha1 => "weak (fast, unsalted)",
            HashKind::Sha224 | HashKind::Sha256 | HashKind::Sha384 | HashKind::Sha512 => {
                "moderate (fast, unsalted)"
            }
            HashKind::Bcrypt => "very strong (adaptive, salted)",
            HashKind::Sha512Crypt | HashKind::Sha256Crypt => "strong (iterated, salted)",
            HashKind::Md5Crypt => "moderate (iterated, salted)",
            HashKind::Unknown => "unknown",
        }
    }
}

/// The result of identifying a hash string. Immutable once built.
#[derive(Clone, Debug, Serialize)]
pub struct HashInfo {
    /// The input as received.
    pub raw: String,
    /// The trimmed, lowercased form compared against candidate digests.
    pub normalized: String,
    pub kind: HashKind,
    pub algorithm: Option<HashAlgorithm>,
    pub strength: &'static str,
    pub length: usize,
}

/// Classifies a hash string from its format and length signatures.
/// Prefix-based formats take precedence over length-based classification.
pub fn identify(hash: &str) -> HashInfo {
    let trimmed = hash.trim();
    let kind = classify(trimmed);

    HashInfo {
        raw: hash.to_owned(),
        normalized: trimmed.to_lowercase(),
        kind,
        algorithm: kind.algorithm(),
        strength: kind.strength_label(),
        length: trimmed.len(),
    }
}

fn classify(hash: &str) -> HashKind {
    if hash.starts_with("$2a$") || hash.starts_with("$2b$") || hash.starts_with("$2y$") {
        return HashKind::Bcrypt;
    }
    if hash.starts_with("$6$") {
        return HashKind::Sha512Crypt;
    }
    if hash.starts_with("$5$") {
        return HashKind::Sha256Crypt;
    }
    if hash.starts_with("$1$") {
        return HashKind::Md5Crypt;
    }

    if !hash.is_empty() && hash.chars().all(|c| c.is_ascii_hexdigit()) {
        return match hash.len() {
            32 => HashKind::Md5,
            40 => HashKind::Sha1,
            56 => HashKind::Sha224,
            64 => HashKind::Sha256,
            96 => HashKind::Sha384,
            128 => HashKind::Sha512,
            _ => HashKind::Unknown,
        };
    }

    HashKind::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifies_by_length() {
        // md5("test")
        let info = identify("098f6bcd4621d373cade4e832627b4f6");
        assert_eq!(info.kind, HashKind::Md5);
        assert_eq!(info.algorithm, Some(HashAlgorithm::Md5));

        // sha1("abc")
        let info = identify("a9993e364706816aba3e25717850c26c9cd0d89d");
        assert_eq!(info.kind, HashKind::Sha1);

        // sha256("abc")
        let info = identify("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
        assert_eq!(info.kind, HashKind::Sha256);

        // sha512("abc")
        let info = identify(
            "ddaf35a193617abacc417349ae20413112e6fa4e89a97ea20a9eeee64b55d39a\
             2192992a274fc1a836ba3c23a3feebbd454d4423643ce80e2a9ac94fa54ca49f",
        );
        assert_eq!(info.kind, HashKind::Sha512);
    }

    #[test]
    fn prefix_formats_take_precedence() {
        let info = identify("$2b$12$C6UzMDM.H6dfI/f/IKcEeO7route0a2dWfXbVatD5Cq7U1nOLYzS2");
        assert_eq!(info.kind, HashKind::Bcrypt);
        assert_eq!(info.algorithm, None);

        let info = identify("$6$saltsalt$qFmFH.bQmmtXzyBY0s9v7Oicd2z4XSIecDf1NiKtf9/");
        assert_eq!(info.kind, HashKind::Sha512Crypt);
        assert_eq!(info.algorithm, None);
    }

    #[test]
    fn unrecognized_input_is_unknown() {
        let info = identify("not-a-hash");
        assert_eq!(info.kind, HashKind::Unknown);
        assert_eq!(info.algorithm, None);

        // hex, but no standard digest length
        let info = identify("abcdef012345");
        assert_eq!(info.kind, HashKind::Unknown);
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        let info = identify("  098F6BCD4621D373CADE4E832627B4F6 ");
        assert_eq!(info.normalized, "098f6bcd4621d373cade4e832627b4f6");
        assert_eq!(info.kind, HashKind::Md5);
        assert_eq!(info.length, 32);
    }
}
