//! EIP-55 / EIP-1191 checksum computation and address validation.
//!
//! The canonical form of a hex address carries a checksum in its letter
//! casing: the lower-cased address body is hashed with Keccak-256 (optionally
//! salted with a decimal chain id per EIP-1191) and each hex digit is
//! upper-cased iff the digest nibble at the same position is >= 8. Validation
//! is the inverse: a mixed-case candidate is valid only if it equals its own
//! recomputed canonical form.
//!
//! Chain-salted (EIP-1191) output is not compatible with the chain-agnostic
//! (EIP-55) form: the same address usually checksums differently with and
//! without a chain id, so callers must be consistent about supplying one.

use std::fmt::Write;

use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use thiserror::Error;
use tracing::debug;

use crate::cache::{BoundedCache, CacheError, CacheStats};
use crate::hex;

/// Default capacity of each memoization cache.
pub const DEFAULT_CACHE_SIZE: usize = 8192;

/// Errors surfaced to callers of [`AddressCodec::get_address`].
#[derive(Debug, Error)]
pub enum AddressError {
    /// The candidate string is not a `0x`-prefixed 40-digit hex address.
    #[error("invalid address: {address}")]
    InvalidAddress { address: String },
}

/// Cache sizing for an [`AddressCodec`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodecConfig {
    /// Capacity of the validity (boolean) cache.
    pub validity_cache_size: usize,
    /// Capacity of the checksummed-string cache.
    pub checksum_cache_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            validity_cache_size: DEFAULT_CACHE_SIZE,
            checksum_cache_size: DEFAULT_CACHE_SIZE,
        }
    }
}

/// Address validator and checksum engine.
///
/// Owns two bounded LRU caches, one per operation family, keyed by the input
/// plus the flags that influenced the result. The caches only bound repeated
/// work; they never change observable output. Construct one per process (or
/// per test) and share it freely: all methods take `&self` and the caches are
/// internally synchronized.
pub struct AddressCodec {
    validity: BoundedCache<bool>,
    checksums: BoundedCache<String>,
}

impl AddressCodec {
    /// Creates a codec with the given cache capacities.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::InvalidCapacity`] if either capacity is zero.
    pub fn new(config: &CodecConfig) -> Result<Self, CacheError> {
        Ok(Self {
            validity: BoundedCache::new(config.validity_cache_size)?,
            checksums: BoundedCache::new(config.checksum_cache_size)?,
        })
    }

    /// Returns true iff `candidate` is a syntactically valid hex address.
    ///
    /// An entirely lower-case candidate asserts no checksum and is valid
    /// whenever it is well-formed, regardless of `strict`. A candidate with
    /// any upper-case letters is valid under `strict` only if it equals its
    /// own chain-agnostic canonical form byte-for-byte; with `strict` off,
    /// any well-formed casing passes. Never fails.
    #[must_use]
    pub fn is_address(&self, candidate: &str, strict: bool) -> bool {
        let key = format!("{candidate}.{strict}");
        if let Some(cached) = self.validity.get(&key) {
            return cached;
        }

        let result = self.classify(candidate, strict);
        self.validity.insert(key, result);
        result
    }

    /// [`is_address`](Self::is_address) with strict checking, the default.
    #[must_use]
    pub fn is_address_strict(&self, candidate: &str) -> bool {
        self.is_address(candidate, true)
    }

    fn classify(&self, candidate: &str, strict: bool) -> bool {
        if !hex::is_well_formed(candidate) {
            return false;
        }
        // All lower-case: no checksum asserted, nothing to verify.
        if !candidate.bytes().any(|b| b.is_ascii_uppercase()) {
            return true;
        }
        if !strict {
            return true;
        }
        self.checksum_address(candidate, None) == candidate
    }

    /// Computes the canonical mixed-case form of a well-formed address.
    ///
    /// With `chain_id` absent this is the chain-agnostic EIP-55 form; with a
    /// chain id the Keccak input is salted per EIP-1191. Pure function of its
    /// inputs: identical arguments always produce identical output, cache
    /// warm or cold.
    ///
    /// The input must already be well-formed (`0x` + 40 hex digits); behavior
    /// on other strings is unspecified. Callers holding arbitrary strings
    /// should go through [`get_address`](Self::get_address) instead.
    #[must_use]
    pub fn checksum_address(&self, address: &str, chain_id: Option<u64>) -> String {
        debug_assert!(
            hex::is_well_formed(address),
            "checksum_address requires a 0x-prefixed 40-digit hex address"
        );

        let key = match chain_id {
            Some(id) => format!("{address}.{id}"),
            None => format!("{address}."),
        };
        if let Some(cached) = self.checksums.get(&key) {
            return cached;
        }

        let canonical = fold_case(address, chain_id);
        self.checksums.insert(key, canonical.clone());
        canonical
    }

    /// Computes the canonical form of an address held as raw bytes.
    #[must_use]
    pub fn checksum_address_bytes(&self, address: &[u8; 20], chain_id: Option<u64>) -> String {
        self.checksum_address(&hex::format_address(address), chain_id)
    }

    /// Parses `candidate` into its canonical checksummed form.
    ///
    /// This is the parse-or-fail entry point: any well-formed candidate is
    /// accepted in any casing (no checksum verification on input) and
    /// canonicalized on output.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidAddress`] if `candidate` is not a
    /// `0x`-prefixed 40-digit hex string.
    pub fn get_address(
        &self,
        candidate: &str,
        chain_id: Option<u64>,
    ) -> Result<String, AddressError> {
        if !self.is_address(candidate, false) {
            debug!(candidate = candidate, "rejecting malformed address");
            return Err(AddressError::InvalidAddress { address: candidate.to_string() });
        }
        Ok(self.checksum_address(candidate, chain_id))
    }

    /// Traffic counters of the validity cache.
    #[must_use]
    pub fn validity_stats(&self) -> CacheStats {
        self.validity.stats()
    }

    /// Traffic counters of the checksum cache.
    #[must_use]
    pub fn checksum_stats(&self) -> CacheStats {
        self.checksums.stats()
    }
}

/// Recases the body of `address` according to the Keccak digest of its
/// lower-cased form, optionally salted with the decimal chain id.
fn fold_case(address: &str, chain_id: Option<u64>) -> String {
    let body = address[2..].to_ascii_lowercase();

    // EIP-1191 prepends the decimal chain id to the hash input; only the
    // address's own 40 digits are subject to re-casing either way.
    let digest = match chain_id {
        Some(id) => {
            let mut input = String::with_capacity(hex::BODY_LEN + 20);
            let _ = write!(&mut input, "{id}");
            input.push_str(&body);
            Keccak256::digest(input.as_bytes())
        }
        None => Keccak256::digest(body.as_bytes()),
    };

    let mut out = String::with_capacity(hex::ADDRESS_LEN);
    out.push_str("0x");
    for (i, c) in body.bytes().enumerate() {
        // Even positions read the high nibble of digest byte i/2, odd the low.
        let nibble = if i % 2 == 0 { digest[i / 2] >> 4 } else { digest[i / 2] & 0x0f };
        out.push(if nibble >= 8 { c.to_ascii_uppercase() as char } else { c as char });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn codec() -> AddressCodec {
        AddressCodec::new(&CodecConfig::default()).expect("valid config")
    }

    // Checksum test vectors published in EIP-55.
    const ALL_CAPS: [&str; 2] = [
        "0x52908400098527886E0F7030069857D2E4169EE7",
        "0x8617E340B3D01FA5F11F306F4090FD50E238070D",
    ];
    const ALL_LOWER: [&str; 2] = [
        "0xde709f2102306220921060314715629080e2fb77",
        "0x27b1fdb04752bbc536007a920d24acb045561c26",
    ];
    const MIXED: [&str; 4] = [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ];

    fn canonical_vectors() -> impl Iterator<Item = &'static str> {
        ALL_CAPS.iter().chain(&ALL_LOWER).chain(&MIXED).copied()
    }

    #[test]
    fn test_zero_cache_size_rejected() {
        let config = CodecConfig { validity_cache_size: 0, ..Default::default() };
        assert!(AddressCodec::new(&config).is_err());

        let config = CodecConfig { checksum_cache_size: 0, ..Default::default() };
        assert!(AddressCodec::new(&config).is_err());
    }

    #[test]
    fn test_checksum_matches_published_vectors() {
        let codec = codec();
        for vector in canonical_vectors() {
            let lower = format!("0x{}", vector[2..].to_lowercase());
            assert_eq!(codec.checksum_address(&lower, None), vector);
        }
    }

    #[test]
    fn test_checksum_is_idempotent() {
        let codec = codec();
        for vector in canonical_vectors() {
            let once = codec.checksum_address(vector, None);
            assert_eq!(codec.checksum_address(&once, None), once);
        }
    }

    #[test]
    fn test_checksum_ignores_input_casing() {
        let codec = codec();
        for vector in canonical_vectors() {
            let lower = format!("0x{}", vector[2..].to_lowercase());
            let upper = format!("0x{}", vector[2..].to_uppercase());
            assert_eq!(
                codec.checksum_address(&lower, None),
                codec.checksum_address(&upper, None)
            );
        }
    }

    #[test]
    fn test_all_lowercase_is_valid_in_both_modes() {
        let codec = codec();
        let lower = "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359";
        assert!(codec.is_address(lower, true));
        assert!(codec.is_address(lower, false));
    }

    #[test]
    fn test_canonical_form_passes_strict() {
        let codec = codec();
        for vector in canonical_vectors() {
            let canonical = codec.checksum_address(vector, None);
            assert!(codec.is_address_strict(&canonical), "{canonical} should pass strict");
        }
    }

    #[test]
    fn test_wrong_casing_fails_strict_but_not_lenient() {
        let codec = codec();
        // Canonical is 0xfB69...; flipping the first letter breaks the checksum.
        let miscased = "0xFB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";
        assert!(!codec.is_address(miscased, true));
        assert!(codec.is_address(miscased, false));
    }

    #[test]
    fn test_all_uppercase_body_fails_strict_when_canonical_is_mixed() {
        let codec = codec();
        let upper = format!("0x{}", &MIXED[0][2..].to_uppercase());
        assert!(!codec.is_address(&upper, true));
        assert!(codec.is_address(&upper, false));
    }

    #[test]
    fn test_malformed_inputs_rejected() {
        let codec = codec();
        assert!(!codec.is_address("not-an-address", true));
        assert!(!codec.is_address("0x123", true));
        assert!(!codec.is_address(&format!("0x{}", "g".repeat(40)), true));
        assert!(!codec.is_address("", false));
    }

    #[test]
    fn test_get_address_canonicalizes_any_casing() {
        let codec = codec();
        let canonical = "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

        let from_lower = codec
            .get_address("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359", None)
            .expect("well-formed");
        assert_eq!(from_lower, canonical);

        // Capital-X prefix parses too; output prefix is always lower-case.
        let from_shouting = codec
            .get_address("0XFB6916095CA1DF60BB79CE92CE3EA74C37C5D359", None)
            .expect("well-formed");
        assert_eq!(from_shouting, canonical);
    }

    #[test]
    fn test_get_address_rejects_malformed() {
        let codec = codec();
        let err = codec.get_address("0x123", None).expect_err("malformed");
        let AddressError::InvalidAddress { address } = err;
        assert_eq!(address, "0x123");
    }

    #[test]
    fn test_chain_id_salts_the_checksum() {
        let codec = codec();
        for vector in canonical_vectors() {
            let plain = codec.checksum_address(vector, None);
            let salted: Vec<String> =
                (1..=8).map(|id| codec.checksum_address(vector, Some(id))).collect();

            // Salting must change the output for at least one of these ids,
            // and each salted form must still be stable and case-normalizing.
            assert!(salted.iter().any(|s| *s != plain), "no chain id changed {vector}");
            for (id, form) in (1..=8).zip(&salted) {
                assert_eq!(&codec.checksum_address(form, Some(id)), form);
                assert_eq!(&form[..2], "0x");
                assert!(form[2..].eq_ignore_ascii_case(&vector[2..]));
            }
        }
    }

    #[test]
    fn test_chain_ids_do_not_cross_pollute_the_cache() {
        let codec = codec();
        let addr = "0xde709f2102306220921060314715629080e2fb77";

        let plain_cold = codec.checksum_address(addr, None);
        let salted = codec.checksum_address(addr, Some(30));
        let plain_warm = codec.checksum_address(addr, None);

        assert_eq!(plain_cold, plain_warm);
        assert_eq!(codec.checksum_address(addr, Some(30)), salted);
    }

    #[test]
    fn test_cache_transparency() {
        let cold = codec();
        let warm = codec();
        let inputs = [
            "0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359",
            "0xFB6916095CA1DF60BB79CE92CE3EA74C37C5D359",
            "not-an-address",
        ];

        // Warm one codec, then compare against cold instances per call.
        for input in inputs {
            let _ = warm.is_address(input, true);
            let _ = warm.get_address(input, None);
        }
        for input in inputs {
            assert_eq!(warm.is_address(input, true), cold.is_address(input, true));
            assert_eq!(
                warm.get_address(input, None).ok(),
                cold.get_address(input, None).ok()
            );
        }

        let stats = warm.validity_stats();
        assert!(stats.hits > 0, "second pass should hit the validity cache");
    }

    #[test]
    fn test_strict_and_lenient_results_cached_separately() {
        let codec = codec();
        let miscased = "0xFB6916095ca1df60bB79Ce92cE3Ea74c37c5d359";

        assert!(codec.is_address(miscased, false));
        assert!(!codec.is_address(miscased, true));
        // Again, now served from cache.
        assert!(codec.is_address(miscased, false));
        assert!(!codec.is_address(miscased, true));
    }

    #[test]
    fn test_checksum_from_raw_bytes() {
        let codec = codec();
        let bytes = crate::hex::parse_address_array("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359")
            .expect("well-formed");
        assert_eq!(
            codec.checksum_address_bytes(&bytes, None),
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359"
        );
    }
}
