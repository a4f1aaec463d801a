// src/chapa.rs
//! Identifier canonicalization.
//!
//! Every chapa that enters the roster, the door map or the distance engine
//! goes through [`normalize`], and every join goes through [`censo_key`].
//! Nothing else in the crate is allowed to pad, trim or re-prefix digits.

use std::fmt;

use serde::Serialize;

use crate::config::consts::{CENSO_KEY_LEN, CHAPA_LEN, SHORT_CHAPA_PREFIX};

/// A normalized chapa: always exactly five ASCII digits.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Chapa(String);

/// Four-digit join key derived from a [`Chapa`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CensoKey(String);

impl Chapa {
    pub fn as_str(&self) -> &str { &self.0 }

    /// Join key of this chapa (last four digits).
    pub fn censo_key(&self) -> CensoKey { censo_key(self) }
}

impl CensoKey {
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for Chapa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

impl fmt::Display for CensoKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.0) }
}

fn digits_of(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Canonicalize any numeric-looking text into a five-digit chapa.
///
/// - non-digits are dropped
/// - 4 digits get the `7` series prefix
/// - more than 5 digits keep the last 5
/// - 1–3 digits are zero-padded on the left
///
/// Returns `None` when no digit survives.
pub fn normalize<S: AsRef<str>>(raw: S) -> Option<Chapa> {
    let digits = digits_of(raw.as_ref());
    let out = match digits.len() {
        0 => return None,
        4 => join!(SHORT_CHAPA_PREFIX.to_string(), &digits),
        n if n == CHAPA_LEN => digits,
        n if n > CHAPA_LEN => s!(&digits[n - CHAPA_LEN..]),
        _ => format!("{:0>width$}", digits, width = CHAPA_LEN),
    };
    Some(Chapa(out))
}

/// Join key for a normalized chapa.
pub fn censo_key(chapa: &Chapa) -> CensoKey {
    // Chapa is always CHAPA_LEN ASCII digits.
    CensoKey(s!(&chapa.0[CHAPA_LEN - CENSO_KEY_LEN..]))
}

/// Join key for arbitrary text: last four digits, or the digits left-padded to four.
pub fn censo_key_of(raw: &str) -> Option<CensoKey> {
    let digits = digits_of(raw);
    match digits.len() {
        0 => None,
        n if n >= CENSO_KEY_LEN => Some(CensoKey(s!(&digits[n - CENSO_KEY_LEN..]))),
        _ => Some(CensoKey(format!("{:0>width$}", digits, width = CENSO_KEY_LEN))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(raw: &str) -> Option<String> {
        normalize(raw).map(|c| c.as_str().to_string())
    }

    #[test]
    fn normalize_length_rules() {
        assert_eq!(n("2683").as_deref(), Some("72683"));
        assert_eq!(n("72683").as_deref(), Some("72683"));
        assert_eq!(n("1172683").as_deref(), Some("72683"));
        assert_eq!(n("683").as_deref(), Some("00683"));
        assert_eq!(n("7").as_deref(), Some("00007"));
    }

    #[test]
    fn normalize_strips_non_digits() {
        assert_eq!(n(" #2.683 ").as_deref(), Some("72683"));
        assert_eq!(n("chapa 71990\n").as_deref(), Some("71990"));
        assert_eq!(n(""), None);
        assert_eq!(n("abc"), None);
        assert_eq!(n("   "), None);
    }

    #[test]
    fn normalize_is_idempotent() {
        for raw in ["1", "12", "123", "1234", "12345", "654321", "00042"] {
            let once = normalize(raw).unwrap();
            let twice = normalize(once.as_str()).unwrap();
            assert_eq!(once, twice, "raw={raw}");
            assert_eq!(once.as_str().len(), 5);
        }
    }

    #[test]
    fn censo_key_is_last_four_digits() {
        for raw in ["1", "123", "2683", "71990", "9912345"] {
            let c = normalize(raw).unwrap();
            assert_eq!(c.censo_key().as_str(), &c.as_str()[1..]);
        }
    }

    #[test]
    fn censo_key_collides_across_series() {
        // 72683 and 12683 share a join key
        let a = normalize("72683").unwrap();
        let b = normalize("12683").unwrap();
        assert_ne!(a, b);
        assert_eq!(a.censo_key(), b.censo_key());
    }

    #[test]
    fn censo_key_of_pads_short_input() {
        assert_eq!(censo_key_of("42").unwrap().as_str(), "0042");
        assert!(censo_key_of("--").is_none());
    }
}
