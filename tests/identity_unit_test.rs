//! Tests for identifier adoption, fresh identifiers and seed derivation.

use doc_factory::error::FactoryError;
use doc_factory::identity::{IdentityGenerator, ObjectId, SequenceCounter};
use doc_factory::provider::{FakerProvider, Locale};
use std::collections::HashSet;

#[test]
fn test_adopt_valid_identifier() {
    let identity = IdentityGenerator::new();
    let id = identity
        .adopt_identifier("a1b2c3d4e5f6a1b2c3d4e5f6")
        .unwrap();
    assert_eq!(id.to_string(), "a1b2c3d4e5f6a1b2c3d4e5f6");
}

#[test]
fn test_adopt_uppercase_identifier_is_canonicalized() {
    let identity = IdentityGenerator::new();
    let upper = identity
        .adopt_identifier("A1B2C3D4E5F6A1B2C3D4E5F6")
        .unwrap();
    let lower = identity
        .adopt_identifier("a1b2c3d4e5f6a1b2c3d4e5f6")
        .unwrap();
    assert_eq!(upper, lower);
    assert_eq!(upper.to_string(), "a1b2c3d4e5f6a1b2c3d4e5f6");
}

#[test]
fn test_adopt_invalid_identifier() {
    let identity = IdentityGenerator::new();
    for candidate in ["not-a-valid-hex-id", "", "a1b2c3", "a1b2c3d4e5f6a1b2c3d4e5f6aa"] {
        match identity.adopt_identifier(candidate) {
            Err(FactoryError::InvalidIdentifier(value)) => assert_eq!(value, candidate),
            other => panic!("expected InvalidIdentifier for {:?}, got {:?}", candidate, other),
        }
    }
}

#[test]
fn test_fresh_identifiers_are_valid_and_distinct() {
    let identity = IdentityGenerator::new();
    let mut provider = FakerProvider::seeded(1, Locale::En);
    let mut seen = HashSet::new();
    for _ in 0..500 {
        let id = identity.fresh_identifier(&mut provider);
        let hex = id.to_string();
        assert_eq!(hex.len(), 24);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hex.parse::<ObjectId>().unwrap(), id);
        seen.insert(id);
    }
    assert_eq!(seen.len(), 500);
}

#[test]
fn test_fresh_identifiers_follow_seed() {
    let identity = IdentityGenerator::new();
    let mut a = FakerProvider::seeded(77, Locale::En);
    let mut b = FakerProvider::seeded(77, Locale::En);
    for _ in 0..10 {
        assert_eq!(
            identity.fresh_identifier(&mut a),
            identity.fresh_identifier(&mut b)
        );
    }
}

#[test]
fn test_consecutive_seeds_differ() {
    let identity = IdentityGenerator::new();
    let parent = identity
        .adopt_identifier("5f0a9c1d2e3b4a5f6c7d8e9f")
        .unwrap();
    let seeds: Vec<u64> = (0..100)
        .map(|_| identity.deterministic_seed(42, &parent))
        .collect();
    let distinct: HashSet<_> = seeds.iter().collect();
    assert_eq!(distinct.len(), seeds.len());
}

#[test]
fn test_separate_generators_repeat_seeds() {
    let parent: ObjectId = "5f0a9c1d2e3b4a5f6c7d8e9f".parse().unwrap();
    let first = IdentityGenerator::new().deterministic_seed(3, &parent);
    let second = IdentityGenerator::new().deterministic_seed(3, &parent);
    assert_eq!(first, second);
}

#[test]
fn test_shared_counter_continues_sequence() {
    let parent: ObjectId = "000000000000000000000000".parse().unwrap();
    let identity = IdentityGenerator::with_counter(SequenceCounter::starting_at(100));
    assert_eq!(identity.deterministic_seed(0, &parent), 101);
    assert_eq!(identity.deterministic_seed(0, &parent), 102);
    assert_eq!(identity.counter().current(), 102);
}

#[test]
fn test_seeded_providers_for_parent_diverge() {
    let identity = IdentityGenerator::new();
    let parent: ObjectId = "5f0a9c1d2e3b4a5f6c7d8e9f".parse().unwrap();
    let mut first = identity.seeded_provider(9, &parent, Locale::En);
    let mut second = identity.seeded_provider(9, &parent, Locale::En);
    let a: Vec<ObjectId> = (0..3).map(|_| identity.fresh_identifier(&mut first)).collect();
    let b: Vec<ObjectId> = (0..3).map(|_| identity.fresh_identifier(&mut second)).collect();
    assert_ne!(a, b);
}

#[test]
fn test_object_id_serde() {
    let id: ObjectId = "a1b2c3d4e5f6a1b2c3d4e5f6".parse().unwrap();
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, "\"a1b2c3d4e5f6a1b2c3d4e5f6\"");
    let back: ObjectId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
    assert!(serde_json::from_str::<ObjectId>("\"xyz\"").is_err());
}
