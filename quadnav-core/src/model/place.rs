use std::fmt;

use geo::Point;
use serde::{Deserialize, Serialize};

/// Canonical place-id key.
///
/// The data files (and requests coming from UI shells) carry ids
/// inconsistently as JSON numbers or strings. Everything is normalized to a
/// string key here, at the boundary, so lookups never compare across raw
/// types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PlaceId(String);

impl PlaceId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlaceId {
    fn from(raw: &str) -> Self {
        Self(raw.to_string())
    }
}

impl From<i64> for PlaceId {
    fn from(raw: i64) -> Self {
        Self(raw.to_string())
    }
}

impl<'de> Deserialize<'de> for PlaceId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        struct IdVisitor;

        impl serde::de::Visitor<'_> for IdVisitor {
            type Value = PlaceId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or numeric place id")
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<PlaceId, E> {
                Ok(PlaceId::new(v))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<PlaceId, E> {
                Ok(PlaceId::new(v.to_string()))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<PlaceId, E> {
                Ok(PlaceId::new(v.to_string()))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<PlaceId, E> {
                // Editors occasionally emit integral ids as floats (5.0)
                if v.fract() == 0.0 && v.is_finite() {
                    Ok(PlaceId::new(format!("{}", v as i64)))
                } else {
                    Ok(PlaceId::new(v.to_string()))
                }
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// A named, fixed-coordinate campus location usable as a route endpoint.
#[derive(Debug, Clone)]
pub struct Place {
    pub id: PlaceId,
    /// Display name
    pub name: String,
    /// Coordinates in map pixels
    pub geometry: Point<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_and_string_ids_normalize_to_the_same_key() {
        let from_num: PlaceId = serde_json::from_str("5").unwrap();
        let from_str: PlaceId = serde_json::from_str("\"5\"").unwrap();
        let from_float: PlaceId = serde_json::from_str("5.0").unwrap();
        assert_eq!(from_num, from_str);
        assert_eq!(from_num, from_float);
        assert_eq!(from_num, PlaceId::from(5));
    }

    #[test]
    fn display_matches_raw_key() {
        assert_eq!(PlaceId::new("gate-1").to_string(), "gate-1");
    }
}
