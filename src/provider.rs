//! Primitive fake values.
//!
//! Every random choice the factory makes goes through a [`ValueProvider`], so
//! swapping the provider swaps the locale or pins the whole output to a seed.

use chrono::{DateTime, Duration, Utc};
use fake::faker::internet::raw::FreeEmailProvider;
use fake::faker::lorem::raw::Sentence;
use fake::faker::name::raw::{FirstName, LastName};
use fake::faker::number::raw::NumberWithFormat;
use fake::locales::{EN, FR_FR};
use fake::Fake;
use rand::distr::Alphanumeric;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Layout of the phone numbers handed out before any regional rewrite
const PHONE_FORMAT: &str = "### ###-####";

/// Source of random scalar values.
pub trait ValueProvider: fmt::Debug {
    fn first_name(&mut self) -> String;

    fn last_name(&mut self) -> String;

    /// Domain part for an email address, e.g. `example.org`
    fn email_domain(&mut self) -> String;

    /// A phone number in `### ###-####` layout
    fn phone_number(&mut self) -> String;

    /// A capitalized sentence ending with a period
    fn sentence(&mut self) -> String;

    /// Integer in `min..=max`
    fn number(&mut self, min: u64, max: u64) -> u64;

    /// Float in `min..=max`
    fn float(&mut self, min: f64, max: f64) -> f64;

    /// `true` with the given probability; `false` when it is not finite
    fn chance(&mut self, probability: f64) -> bool;

    fn boolean(&mut self) -> bool {
        self.chance(0.5)
    }

    /// Index in `0..len`. `len` must be non-zero.
    fn index(&mut self, len: usize) -> usize;

    /// Mixed-case ASCII letters and digits
    fn alphanumeric(&mut self, len: usize) -> String;

    /// Lowercase hexadecimal digits
    fn hexadecimal(&mut self, len: usize) -> String;

    /// A moment within `years` years before `reference`
    fn date_past(&mut self, years: u32, reference: DateTime<Utc>) -> DateTime<Utc>;
}

/// Pick a random element from a slice
pub fn choose<'a, T>(provider: &mut dyn ValueProvider, items: &'a [T]) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    items.get(provider.index(items.len()))
}

/// Locales the default provider can draw names and text from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    En,
    FrFr,
}

impl std::str::FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "en" | "en_us" => Ok(Locale::En),
            "fr" | "fr_fr" => Ok(Locale::FrFr),
            _ => Err(format!("Unknown locale: {}. Use en or fr_fr", s)),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locale::En => write!(f, "en"),
            Locale::FrFr => write!(f, "fr_fr"),
        }
    }
}

/// Default provider backed by the `fake` crate
#[derive(Debug, Clone)]
pub struct FakerProvider<R: Rng = ChaCha8Rng> {
    rng: R,
    locale: Locale,
}

impl FakerProvider<ChaCha8Rng> {
    /// Provider seeded from the operating system
    pub fn new(locale: Locale) -> Self {
        Self::with_rng(ChaCha8Rng::from_os_rng(), locale)
    }

    /// Provider whose output is fully determined by `seed`
    pub fn seeded(seed: u64, locale: Locale) -> Self {
        Self::with_rng(ChaCha8Rng::seed_from_u64(seed), locale)
    }
}

impl Default for FakerProvider<ChaCha8Rng> {
    fn default() -> Self {
        Self::new(Locale::En)
    }
}

impl<R: Rng> FakerProvider<R> {
    pub fn with_rng(rng: R, locale: Locale) -> Self {
        Self { rng, locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }
}

impl<R: Rng + fmt::Debug> ValueProvider for FakerProvider<R> {
    fn first_name(&mut self) -> String {
        match self.locale {
            Locale::En => FirstName(EN).fake_with_rng(&mut self.rng),
            Locale::FrFr => FirstName(FR_FR).fake_with_rng(&mut self.rng),
        }
    }

    fn last_name(&mut self) -> String {
        match self.locale {
            Locale::En => LastName(EN).fake_with_rng(&mut self.rng),
            Locale::FrFr => LastName(FR_FR).fake_with_rng(&mut self.rng),
        }
    }

    fn email_domain(&mut self) -> String {
        match self.locale {
            Locale::En => FreeEmailProvider(EN).fake_with_rng(&mut self.rng),
            Locale::FrFr => FreeEmailProvider(FR_FR).fake_with_rng(&mut self.rng),
        }
    }

    fn phone_number(&mut self) -> String {
        match self.locale {
            Locale::En => NumberWithFormat(EN, PHONE_FORMAT).fake_with_rng(&mut self.rng),
            Locale::FrFr => NumberWithFormat(FR_FR, PHONE_FORMAT).fake_with_rng(&mut self.rng),
        }
    }

    fn sentence(&mut self) -> String {
        match self.locale {
            Locale::En => Sentence(EN, 3..8).fake_with_rng(&mut self.rng),
            Locale::FrFr => Sentence(FR_FR, 3..8).fake_with_rng(&mut self.rng),
        }
    }

    fn number(&mut self, min: u64, max: u64) -> u64 {
        let (lo, hi) = if min <= max { (min, max) } else { (max, min) };
        self.rng.random_range(lo..=hi)
    }

    fn float(&mut self, min: f64, max: f64) -> f64 {
        if min >= max {
            return min;
        }
        self.rng.random_range(min..=max)
    }

    fn chance(&mut self, probability: f64) -> bool {
        if !probability.is_finite() {
            return false;
        }
        self.rng.random_bool(probability.clamp(0.0, 1.0))
    }

    fn index(&mut self, len: usize) -> usize {
        self.rng.random_range(0..len.max(1))
    }

    fn alphanumeric(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| char::from(self.rng.sample(Alphanumeric)))
            .collect()
    }

    fn hexadecimal(&mut self, len: usize) -> String {
        (0..len)
            .map(|_| char::from(HEX_DIGITS[self.rng.random_range(0..HEX_DIGITS.len())]))
            .collect()
    }

    fn date_past(&mut self, years: u32, reference: DateTime<Utc>) -> DateTime<Utc> {
        let span = i64::from(years.max(1)) * 365 * 24 * 60 * 60;
        let back = self.rng.random_range(1..=span);
        reference - Duration::seconds(back)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deterministic_generation() {
        let mut a = FakerProvider::seeded(42, Locale::En);
        let mut b = FakerProvider::seeded(42, Locale::En);

        assert_eq!(a.first_name(), b.first_name());
        assert_eq!(a.sentence(), b.sentence());
        assert_eq!(a.hexadecimal(24), b.hexadecimal(24));
        assert_eq!(a.number(0, 1_000_000), b.number(0, 1_000_000));
    }

    #[test]
    fn test_hexadecimal_is_lowercase() {
        let mut p = FakerProvider::seeded(7, Locale::En);
        let hex = p.hexadecimal(24);
        assert_eq!(hex.len(), 24);
        assert!(hex.chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn test_number_inclusive_bounds() {
        let mut p = FakerProvider::seeded(1, Locale::En);
        for _ in 0..200 {
            let n = p.number(3, 5);
            assert!((3..=5).contains(&n));
        }
        assert_eq!(p.number(9, 9), 9);
    }

    #[test]
    fn test_chance_non_finite_is_false() {
        let mut p = FakerProvider::seeded(2, Locale::En);
        assert!(!p.chance(f64::NAN));
        assert!(!p.chance(f64::INFINITY));
        assert!(p.chance(2.0));
        assert!(!p.chance(-1.0));
    }

    #[test]
    fn test_phone_layout() {
        let mut p = FakerProvider::seeded(3, Locale::En);
        let phone = p.phone_number();
        assert_eq!(phone.len(), 12);
        assert_eq!(&phone[3..4], " ");
        assert_eq!(&phone[7..8], "-");
    }

    #[test]
    fn test_date_past_before_reference() {
        let mut p = FakerProvider::seeded(5, Locale::En);
        let now = Utc::now();
        let past = p.date_past(10, now);
        assert!(past < now);
        assert!(now - past <= Duration::days(3650));
    }

    #[test]
    fn test_locale_parse() {
        assert_eq!("EN".parse::<Locale>().unwrap(), Locale::En);
        assert_eq!("fr-FR".parse::<Locale>().unwrap(), Locale::FrFr);
        assert!("xx".parse::<Locale>().is_err());
    }

    #[test]
    fn test_choose_empty() {
        let mut p = FakerProvider::seeded(5, Locale::En);
        let empty: [u8; 0] = [];
        assert!(choose(&mut p, &empty).is_none());
        assert_eq!(choose(&mut p, &[7]), Some(&7));
    }
}
