//! Wire format for navigable menu buttons.
//!
//! A callback button carries its own identity in a compact token:
//! `menu-id/row/col/payload/tag`. Row and column are lowercase hex, the tag
//! is a one-character fingerprint marker followed by four hash characters.
//! The whole token must fit the 64 byte callback budget.

mod error;
/// Staleness fingerprints embedded in every token.
pub mod fingerprint;
/// Token encoding, decoding and budget checks.
pub mod token;

pub use error::WireError;
pub use fingerprint::{DIGEST_LEN, TAG_MAX_BYTES, Tag, TagKind, hash};
pub use token::{DELIMITER, MAX_TOKEN_BYTES, RESERVED_SUFFIX_BYTES, RawToken, Token, check_budget, decode, encode, encode_prefix, split, validate_menu_id, validate_payload};
