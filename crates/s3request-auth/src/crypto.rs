//! Message digest and HMAC primitives.
//!
//! The permitted algorithms are closed enumerations; [`DigestAlgorithm::digest`]
//! and [`MacAlgorithm::sign`] are the only places that dispatch on them. Input
//! text is always UTF-8.

use hmac::{Hmac, KeyInit, Mac};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};

type HmacSha1 = Hmac<Sha1>;
type HmacSha256 = Hmac<Sha256>;

/// Supported message digest algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DigestAlgorithm {
    /// SHA-256, used for payload and canonical request hashes.
    Sha256,
    /// MD5, used for the `Content-MD5` integrity header.
    Md5,
}

impl DigestAlgorithm {
    /// Compute the digest of `data`.
    #[must_use]
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Md5 => Md5::digest(data).to_vec(),
        }
    }

    /// Compute the digest of `data` and return it as lowercase hex.
    #[must_use]
    pub fn hex_digest(self, data: &[u8]) -> String {
        hex::encode(self.digest(data))
    }
}

/// Supported keyed-hash algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacAlgorithm {
    /// HMAC-SHA1.
    HmacSha1,
    /// HMAC-SHA256, the SigV4 signing primitive.
    HmacSha256,
}

impl MacAlgorithm {
    /// Compute the HMAC of `data` under `key` and return the raw bytes.
    #[must_use]
    pub fn sign(self, key: &[u8], data: &[u8]) -> Vec<u8> {
        match self {
            Self::HmacSha1 => {
                let mut mac =
                    HmacSha1::new_from_slice(key).expect("HMAC can accept keys of any length");
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
            Self::HmacSha256 => {
                let mut mac =
                    HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
                mac.update(data);
                mac.finalize().into_bytes().to_vec()
            }
        }
    }
}
