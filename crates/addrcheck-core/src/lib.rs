//! # Addrcheck Core
//!
//! Validation and canonicalization of Ethereum hex addresses with bounded
//! in-process memoization.
//!
//! This crate provides:
//!
//! - **[`checksum`]**: The address validator and checksum engine. Computes the
//!   EIP-55 (chain-agnostic) or EIP-1191 (chain-salted) mixed-case form of an
//!   address and checks candidate strings against it.
//!
//! - **[`cache`]**: A fixed-capacity, least-recently-used memoization cache
//!   used to bound the cost of repeated validations of the same input.
//!
//! - **[`hex`]**: Character-level helpers for the `0x` + 40-hex-digit address
//!   shape: syntax scanning, digit decoding, and `[u8; 20]` conversion.
//!
//! ## Request flow
//!
//! ```text
//! Caller string
//!       │
//!       ▼
//! ┌─────────────┐
//! │ Syntax scan │ ─── malformed ──► false / InvalidAddress
//! └──────┬──────┘
//!        │ well-formed
//!        ▼
//! ┌─────────────┐
//! │ Cache check │ ─── hit ──► memoized result
//! └──────┬──────┘
//!        │ miss
//!        ▼
//! ┌──────────────────┐
//! │ Keccak-256 of    │
//! │ lowercased body  │ ──► per-nibble case fold ──► cache + return
//! └──────────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use addrcheck_core::{AddressCodec, CodecConfig};
//!
//! let codec = AddressCodec::new(&CodecConfig::default()).expect("valid config");
//!
//! let canonical = codec
//!     .get_address("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359", None)
//!     .expect("well-formed address");
//! assert_eq!(canonical, "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359");
//! assert!(codec.is_address_strict(&canonical));
//! ```
//!
//! The codec is an explicitly constructed object rather than a process-wide
//! singleton: tests and embedders create their own instances with their own
//! cache capacities. All operations are synchronous; the internal caches are
//! mutex-guarded so a shared codec is safe to use across threads.

pub mod cache;
pub mod checksum;
pub mod hex;

pub use cache::{BoundedCache, CacheError, CacheStats};
pub use checksum::{AddressCodec, AddressError, CodecConfig, DEFAULT_CACHE_SIZE};
pub use hex::{format_address, is_well_formed, parse_address_array};
