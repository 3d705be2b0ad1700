//! Identifier generation and deterministic seeding.
//!
//! Identifiers are 24 hex digit object ids. Seeds for child datasets combine a
//! common factory seed, the parent identifier and a wrapping sequence so that
//! repeated runs with the same inputs line up while sibling datasets never
//! share a seed within a run.

use crate::error::FactoryError;
use crate::provider::{FakerProvider, Locale, ValueProvider};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU32, Ordering};

/// Sequence values wrap at this modulus
pub const SEQUENCE_MODULUS: u32 = 0x00ff_ffff;

/// Number of hex digits in an identifier
pub const OBJECT_ID_HEX_LEN: usize = 24;

/// Decimal digits of the parent id that feed into a deterministic seed
const PARENT_SEED_DIGITS: usize = 5;

/// A 12 byte object identifier, canonically rendered as 24 lowercase hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ObjectId([u8; 12]);

impl ObjectId {
    /// Parse a candidate, accepting either case
    pub fn parse(candidate: &str) -> Result<Self, FactoryError> {
        let invalid = || FactoryError::InvalidIdentifier(candidate.to_string());
        if candidate.len() != OBJECT_ID_HEX_LEN {
            return Err(invalid());
        }
        let mut bytes = [0u8; 12];
        hex::decode_to_slice(candidate, &mut bytes).map_err(|_| invalid())?;
        Ok(Self(bytes))
    }

    pub fn bytes(&self) -> &[u8; 12] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Leading decimal digits of the hex form with the letters removed.
    ///
    /// `5f0a9c...` projects to `509`, an id made only of letters projects to 0.
    pub fn numeric_projection(&self) -> u64 {
        self.to_hex()
            .chars()
            .filter(char::is_ascii_digit)
            .take(PARENT_SEED_DIGITS)
            .collect::<String>()
            .parse()
            .unwrap_or(0)
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for ObjectId {
    type Err = FactoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ObjectId {
    type Error = FactoryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<ObjectId> for String {
    fn from(id: ObjectId) -> Self {
        id.to_hex()
    }
}

/// Wrapping counter mixed into deterministic seeds.
///
/// Starts at 1; every call advances it before returning, so the first value
/// handed out is 2. A new counter always restarts the sequence.
#[derive(Debug)]
pub struct SequenceCounter {
    state: AtomicU32,
}

impl SequenceCounter {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(value: u32) -> Self {
        Self {
            state: AtomicU32::new(value % SEQUENCE_MODULUS),
        }
    }

    /// Advance the counter and return the new value
    pub fn next(&self) -> u32 {
        let advance = |v: u32| (v + 1) % SEQUENCE_MODULUS;
        let previous = self
            .state
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |v| Some(advance(v)))
            .unwrap_or_else(|v| v);
        advance(previous)
    }

    /// Current counter state, without advancing it
    pub fn current(&self) -> u32 {
        self.state.load(Ordering::Relaxed)
    }
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self::new()
    }
}

/// Produces fresh, adopted and seeded identifiers
#[derive(Debug, Default)]
pub struct IdentityGenerator {
    counter: SequenceCounter,
}

impl IdentityGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_counter(counter: SequenceCounter) -> Self {
        Self { counter }
    }

    pub fn counter(&self) -> &SequenceCounter {
        &self.counter
    }

    /// A new random identifier drawn from `provider`
    pub fn fresh_identifier(&self, provider: &mut dyn ValueProvider) -> ObjectId {
        let hex = provider.hexadecimal(OBJECT_ID_HEX_LEN);
        // A provider handing back non-hex output is a bug in that provider
        ObjectId::parse(&hex.to_lowercase()).unwrap_or_else(|_| {
            let mut bytes = [0u8; 12];
            for byte in bytes.iter_mut() {
                *byte = provider.number(0, 255) as u8;
            }
            ObjectId(bytes)
        })
    }

    /// Treat an externally meaningful value as an identifier
    pub fn adopt_identifier(&self, candidate: &str) -> Result<ObjectId, FactoryError> {
        ObjectId::parse(candidate)
    }

    pub fn next_sequence_value(&self) -> u32 {
        self.counter.next()
    }

    /// Seed for a child dataset of `parent_id`.
    ///
    /// `common_seed * 1_000_000 + numeric(parent_id) + sequence`, wrapping on
    /// overflow. Consecutive calls never repeat within one generator.
    pub fn deterministic_seed(&self, common_seed: u64, parent_id: &ObjectId) -> u64 {
        common_seed
            .wrapping_mul(1_000_000)
            .wrapping_add(parent_id.numeric_projection())
            .wrapping_add(u64::from(self.next_sequence_value()))
    }

    /// Provider seeded for a child dataset of `parent_id`
    pub fn seeded_provider(
        &self,
        common_seed: u64,
        parent_id: &ObjectId,
        locale: Locale,
    ) -> FakerProvider {
        let seed = self.deterministic_seed(common_seed, parent_id);
        tracing::debug!("Seeding child provider for {} with {}", parent_id, seed);
        FakerProvider::seeded(seed, locale)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_upper_case() {
        let id = ObjectId::parse("A1B2C3D4E5F6A1B2C3D4E5F6").unwrap();
        assert_eq!(id.to_string(), "a1b2c3d4e5f6a1b2c3d4e5f6");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(ObjectId::parse("a1b2c3").is_err());
        assert!(ObjectId::parse("a1b2c3d4e5f6a1b2c3d4e5f6a1").is_err());
    }

    #[test]
    fn test_numeric_projection() {
        let id = ObjectId::parse("5f0a9c1d2e3b4a5f6c7d8e9f").unwrap();
        assert_eq!(id.numeric_projection(), 50912);

        let letters = ObjectId::parse("abcdefabcdefabcdefabcdef").unwrap();
        assert_eq!(letters.numeric_projection(), 0);
    }

    #[test]
    fn test_counter_wraps() {
        let counter = SequenceCounter::starting_at(SEQUENCE_MODULUS - 2);
        assert_eq!(counter.next(), SEQUENCE_MODULUS - 1);
        assert_eq!(counter.next(), 0);
        assert_eq!(counter.next(), 1);
    }

    #[test]
    fn test_counter_first_value() {
        let counter = SequenceCounter::new();
        assert_eq!(counter.current(), 1);
        assert_eq!(counter.next(), 2);
        assert_eq!(counter.current(), 2);
    }

    #[test]
    fn test_seed_formula() {
        let gen = IdentityGenerator::new();
        let parent = ObjectId::parse("5f0a9c1d2e3b4a5f6c7d8e9f").unwrap();
        assert_eq!(gen.deterministic_seed(7, &parent), 7_000_000 + 50912 + 2);
        assert_eq!(gen.deterministic_seed(7, &parent), 7_000_000 + 50912 + 3);
    }
}
