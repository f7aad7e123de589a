//! Lenient monetary parsing and comparison helpers.
//!
//! The ordering backend is not consistent about numeric encoding: prices and
//! multipliers arrive sometimes as JSON numbers, sometimes as numeric strings
//! (`"3500"`), and occasionally as null or garbage. Display code must never
//! see a parse error, so the deserializers here coerce instead of failing:
//!
//! - prices coerce to [`Decimal::ZERO`] on any unparseable input
//! - multipliers coerce to *absent*, so a bad value never forces a 1x floor
//!
//! All monetary arithmetic uses [`rust_decimal::Decimal`]; `f64` is never used
//! for money.

use rust_decimal::Decimal;
use serde::de::IgnoredAny;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Half a cent. Totals that differ by no more than this are presented as one
/// unified figure to absorb rounding noise from the backend.
#[must_use]
pub fn display_tolerance() -> Decimal {
    Decimal::new(5, 3) // 0.005
}

/// Whether two amounts are equal within the half-cent display tolerance.
#[must_use]
pub fn amounts_match(a: Decimal, b: Decimal) -> bool {
    (a - b).abs() <= display_tolerance()
}

/// Raw wire value for a numeric field: number, string, or anything else.
///
/// `Decimal`'s own deserializer already accepts numbers and numeric strings;
/// the remaining arms catch non-numeric strings and junk values.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Decimal(Decimal),
    Text(String),
    Other(IgnoredAny),
}

impl RawNumber {
    fn into_decimal(self) -> Option<Decimal> {
        match self {
            Self::Decimal(d) => Some(d),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Other(_) => None,
        }
    }
}

/// Serde module for price fields: unparseable input coerces to zero.
///
/// Use with `#[serde(with = "money::lenient_price")]`.
pub mod lenient_price {
    use super::{Decimal, Deserialize, Deserializer, RawNumber, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(RawNumber::deserialize(deserializer)
            .ok()
            .and_then(RawNumber::into_decimal)
            .unwrap_or(Decimal::ZERO))
    }

    pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::Serialize::serialize(value, serializer)
    }
}

/// Serde module for optional numeric fields (multipliers, snapshots):
/// unparseable or missing input coerces to `None`, never to a default value.
///
/// Use with `#[serde(default, with = "money::lenient_opt")]`.
pub mod lenient_opt {
    use super::{Decimal, Deserialize, Deserializer, RawNumber, Serializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<RawNumber>::deserialize(deserializer)
            .ok()
            .flatten()
            .and_then(RawNumber::into_decimal))
    }

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        super::Serialize::serialize(value, serializer)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Priced {
        #[serde(with = "lenient_price")]
        price: Decimal,
        #[serde(default, with = "lenient_opt")]
        multiplier: Option<Decimal>,
    }

    fn parse(json: &str) -> Priced {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_price_from_number() {
        assert_eq!(parse(r#"{"price": 3500}"#).price, Decimal::new(3500, 0));
    }

    #[test]
    fn test_price_from_numeric_string() {
        assert_eq!(parse(r#"{"price": "3500.50"}"#).price, Decimal::new(350_050, 2));
    }

    #[test]
    fn test_price_garbage_coerces_to_zero() {
        assert_eq!(parse(r#"{"price": "abc"}"#).price, Decimal::ZERO);
        assert_eq!(parse(r#"{"price": null}"#).price, Decimal::ZERO);
        assert_eq!(parse(r#"{"price": {"x": 1}}"#).price, Decimal::ZERO);
    }

    #[test]
    fn test_multiplier_garbage_coerces_to_absent() {
        // A bad multiplier must become absent, not 1 (and not 0).
        assert_eq!(parse(r#"{"price": 0, "multiplier": "oops"}"#).multiplier, None);
        assert_eq!(parse(r#"{"price": 0, "multiplier": null}"#).multiplier, None);
        assert_eq!(parse(r#"{"price": 0}"#).multiplier, None);
    }

    #[test]
    fn test_multiplier_from_string() {
        assert_eq!(
            parse(r#"{"price": 0, "multiplier": "2"}"#).multiplier,
            Some(Decimal::new(2, 0))
        );
    }

    #[test]
    fn test_amounts_match_tolerance() {
        let a = Decimal::new(10_000, 2); // 100.00
        assert!(amounts_match(a, Decimal::new(10_000, 2)));
        assert!(amounts_match(a, Decimal::new(1_000_004, 4))); // 100.0004
        assert!(!amounts_match(a, Decimal::new(10_001, 2))); // 100.01
    }
}
