//! Recitation domain types: surah numbers and reciter identifiers

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Number of surahs in the Quran
pub const SURAH_COUNT: u16 = 114;

/// Reciter identifiers known to use the Alafasy archival mirror layout
pub const ALAFASY_ALIASES: [&str; 3] = ["afasy", "mishary", "al-afasy"];

/// A validated surah number (1-114 inclusive)
///
/// Out-of-range input is rejected at construction, never clamped.
/// Rendered as a zero-padded 3-digit decimal in every URL and filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Surah(u16);

impl Surah {
    /// Validate and wrap a surah number
    pub fn new(n: u16) -> Result<Self> {
        if (1..=SURAH_COUNT).contains(&n) {
            Ok(Self(n))
        } else {
            Err(Error::InvalidInput(format!(
                "surah must be between 1 and {}, got {}",
                SURAH_COUNT, n
            )))
        }
    }

    /// The underlying number (1-114)
    pub fn get(self) -> u16 {
        self.0
    }

    /// Zero-padded 3-digit rendering ("001" ... "114")
    pub fn padded(self) -> String {
        format!("{:03}", self.0)
    }
}

impl fmt::Display for Surah {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Surah {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let n: u16 = s
            .trim()
            .parse()
            .map_err(|_| Error::InvalidInput(format!("invalid surah number: {:?}", s)))?;
        Self::new(n)
    }
}

/// An opaque reciter identifier (e.g. "afasy")
///
/// Lowercase slug: ASCII letters, digits, `-` and `_`. Non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ReciterId(String);

impl ReciterId {
    /// Validate and wrap a reciter slug
    pub fn new(slug: &str) -> Result<Self> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(Error::InvalidInput("reciter must not be empty".to_string()));
        }
        let valid = slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !valid {
            return Err(Error::InvalidInput(format!(
                "invalid reciter identifier: {:?}",
                slug
            )));
        }
        Ok(Self(slug.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this reciter maps to the Alafasy archival mirror naming convention
    pub fn is_alafasy_alias(&self) -> bool {
        ALAFASY_ALIASES.contains(&self.0.as_str())
    }
}

impl fmt::Display for ReciterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ReciterId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surah_accepts_full_range() {
        for n in 1..=SURAH_COUNT {
            assert!(Surah::new(n).is_ok(), "surah {} should be valid", n);
        }
    }

    #[test]
    fn test_surah_rejects_zero() {
        assert!(Surah::new(0).is_err());
    }

    #[test]
    fn test_surah_rejects_115() {
        assert!(Surah::new(115).is_err());
    }

    #[test]
    fn test_surah_padding_is_three_digits() {
        assert_eq!(Surah::new(1).unwrap().padded(), "001");
        assert_eq!(Surah::new(7).unwrap().padded(), "007");
        assert_eq!(Surah::new(36).unwrap().padded(), "036");
        assert_eq!(Surah::new(114).unwrap().padded(), "114");
    }

    #[test]
    fn test_surah_parses_from_string() {
        let surah: Surah = "7".parse().unwrap();
        assert_eq!(surah.get(), 7);
        assert_eq!(surah.padded(), "007");
    }

    #[test]
    fn test_surah_parse_rejects_garbage() {
        assert!("".parse::<Surah>().is_err());
        assert!("abc".parse::<Surah>().is_err());
        assert!("-3".parse::<Surah>().is_err());
        assert!("115".parse::<Surah>().is_err());
    }

    #[test]
    fn test_reciter_accepts_slugs() {
        assert!(ReciterId::new("afasy").is_ok());
        assert!(ReciterId::new("al-afasy").is_ok());
        assert!(ReciterId::new("abdul_basit").is_ok());
        assert!(ReciterId::new("reciter2").is_ok());
    }

    #[test]
    fn test_reciter_rejects_invalid() {
        assert!(ReciterId::new("").is_err());
        assert!(ReciterId::new("   ").is_err());
        assert!(ReciterId::new("Afasy").is_err());
        assert!(ReciterId::new("a fasy").is_err());
        assert!(ReciterId::new("../etc").is_err());
    }

    #[test]
    fn test_alafasy_alias_set() {
        for alias in ALAFASY_ALIASES {
            assert!(ReciterId::new(alias).unwrap().is_alafasy_alias());
        }
        assert!(!ReciterId::new("sudais").unwrap().is_alafasy_alias());
        assert!(!ReciterId::new("husary").unwrap().is_alafasy_alias());
    }
}
