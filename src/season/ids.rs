use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest finishing position a position prop may name.
pub const MAX_POSITION: u8 = 20;

/// A scalar as it arrives from storage or a form: either a JSON number or a string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Int(i64),
    Text(String),
}

/// Canonical driver identifier.
///
/// Numeric ids are kept in their decimal form and string ids are trimmed,
/// so a stored `12` and a submitted `"12"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawValue", into = "String")]
pub struct DriverId(String);

impl DriverId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<RawValue> for DriverId {
    type Error = String;

    fn try_from(raw: RawValue) -> Result<Self, Self::Error> {
        match raw {
            RawValue::Int(n) => Ok(DriverId(n.to_string())),
            RawValue::Text(s) => s.parse(),
        }
    }
}

impl FromStr for DriverId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err("driver id cannot be blank".to_string());
        }
        Ok(DriverId(trimmed.to_string()))
    }
}

impl From<i64> for DriverId {
    fn from(n: i64) -> Self {
        DriverId(n.to_string())
    }
}

impl From<DriverId> for String {
    fn from(id: DriverId) -> Self {
        id.0
    }
}

impl fmt::Display for DriverId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A finishing position between 1 and [`MAX_POSITION`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawValue", into = "u8")]
pub struct Position(u8);

impl Position {
    pub fn new(value: u8) -> Option<Self> {
        (1..=MAX_POSITION).contains(&value).then_some(Position(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// True for positions that can also be picked as a top-5 finisher.
    pub fn in_top5(self) -> bool {
        self.0 <= 5
    }
}

impl TryFrom<RawValue> for Position {
    type Error = String;

    fn try_from(raw: RawValue) -> Result<Self, Self::Error> {
        match raw {
            RawValue::Int(n) => u8::try_from(n)
                .ok()
                .and_then(Position::new)
                .ok_or_else(|| format!("position must be between 1 and {MAX_POSITION}, got {n}")),
            RawValue::Text(s) => s.parse(),
        }
    }
}

impl FromStr for Position {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        trimmed
            .parse::<u8>()
            .ok()
            .and_then(Position::new)
            .ok_or_else(|| format!("position must be between 1 and {MAX_POSITION}, got '{trimmed}'"))
    }
}

impl From<Position> for u8 {
    fn from(p: Position) -> Self {
        p.0
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Deserialize an optional id or position, treating `null` and blank strings as "no pick".
pub fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: TryFrom<RawValue, Error = String>,
{
    match Option::<RawValue>::deserialize(deserializer)? {
        None => Ok(None),
        Some(RawValue::Text(s)) if s.trim().is_empty() => Ok(None),
        Some(raw) => T::try_from(raw).map(Some).map_err(de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Holder {
        #[serde(default, deserialize_with = "blank_as_none")]
        driver: Option<DriverId>,
        #[serde(default, deserialize_with = "blank_as_none")]
        pos: Option<Position>,
    }

    #[test]
    fn test_numeric_and_string_ids_are_equal() {
        let from_num: DriverId = serde_json::from_str("12").unwrap();
        let from_str: DriverId = serde_json::from_str("\"12\"").unwrap();
        assert_eq!(from_num, from_str);
        assert_eq!(from_num, DriverId::from(12));
    }

    #[test]
    fn test_string_id_is_trimmed() {
        let id: DriverId = " 44 ".parse().unwrap();
        assert_eq!(id.as_str(), "44");
    }

    #[test]
    fn test_blank_id_rejected() {
        assert!("   ".parse::<DriverId>().is_err());
    }

    #[test]
    fn test_id_serializes_as_string() {
        let json = serde_json::to_string(&DriverId::from(7)).unwrap();
        assert_eq!(json, "\"7\"");
    }

    #[test]
    fn test_position_from_number_and_string() {
        let a: Position = serde_json::from_str("5").unwrap();
        let b: Position = serde_json::from_str("\"5\"").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.get(), 5);
        assert!(a.in_top5());
    }

    #[test]
    fn test_position_bounds() {
        assert!(Position::new(0).is_none());
        assert!(Position::new(1).is_some());
        assert!(Position::new(20).is_some());
        assert!(Position::new(21).is_none());
        assert!(serde_json::from_str::<Position>("21").is_err());
        assert!(serde_json::from_str::<Position>("-3").is_err());
        assert!("abc".parse::<Position>().is_err());
    }

    #[test]
    fn test_blank_and_null_become_none() {
        let h: Holder = serde_json::from_str(r#"{"driver": "", "pos": null}"#).unwrap();
        assert!(h.driver.is_none());
        assert!(h.pos.is_none());

        let h: Holder = serde_json::from_str("{}").unwrap();
        assert!(h.driver.is_none());
        assert!(h.pos.is_none());
    }

    #[test]
    fn test_invalid_position_in_holder_errors() {
        let err = serde_json::from_str::<Holder>(r#"{"pos": "30"}"#).unwrap_err();
        assert!(err.to_string().contains("position must be between 1 and 20"));
    }
}
