use serde::{Deserialize, Serialize};

use crate::expression::sandbox::Value;

/// Prefix that turns a string attribute into a formula.
pub const FORMULA_MARKER: &str = "expr:";

/// Largest magnitude at which every integer is exactly representable in an `f64`.
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// Marker-stripped formula text, e.g. `video.width - 100`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Formula {
    source: String,
}

impl Formula {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into().trim().to_owned(),
        }
    }

    /// Parse a raw document string; `None` unless it carries the marker.
    pub fn parse(raw: &str) -> Option<Self> {
        raw.strip_prefix(FORMULA_MARKER).map(Self::new)
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

impl std::fmt::Display for Formula {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{FORMULA_MARKER} {}", self.source)
    }
}

/// A resolvable attribute: a concrete scalar, nothing, or a formula awaiting resolution.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AttrValue {
    /// Absent or explicit `null`. Valid until a formula consumes it.
    #[default]
    Null,
    Number(f64),
    Text(String),
    Formula(Formula),
}

impl AttrValue {
    pub fn formula(source: impl Into<String>) -> Self {
        Self::Formula(Formula::new(source))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_formula(&self) -> Option<&Formula> {
        match self {
            Self::Formula(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as the sandbox sees it. `None` for null and for unresolved formulas.
    pub fn to_value(&self) -> Option<Value> {
        match self {
            Self::Number(v) => Some(Value::Number(*v)),
            Self::Text(s) => Some(Value::Text(s.clone())),
            Self::Null | Self::Formula(_) => None,
        }
    }
}

impl From<Value> for AttrValue {
    fn from(v: Value) -> Self {
        match v {
            Value::Number(n) => Self::Number(n),
            Value::Text(s) => Self::Text(s),
        }
    }
}

impl From<f64> for AttrValue {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for AttrValue {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<u32> for AttrValue {
    fn from(v: u32) -> Self {
        Self::Number(f64::from(v))
    }
}

/// Strings carrying the marker become formulas; anything else stays text.
impl From<&str> for AttrValue {
    fn from(s: &str) -> Self {
        match Formula::parse(s) {
            Some(f) => Self::Formula(f),
            None => Self::Text(s.to_owned()),
        }
    }
}

impl Serialize for AttrValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            // Whole numbers go out as integers so static documents round-trip unchanged.
            Self::Number(v) if v.fract() == 0.0 && v.abs() < MAX_EXACT_INT => {
                serializer.serialize_i64(*v as i64)
            }
            Self::Number(v) => serializer.serialize_f64(*v),
            Self::Text(s) => serializer.serialize_str(s),
            Self::Formula(f) => serializer.serialize_str(&f.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for AttrValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Num(f64),
            Str(String),
        }

        match Option::<Repr>::deserialize(deserializer)? {
            None => Ok(Self::Null),
            Some(Repr::Num(v)) => Ok(Self::Number(v)),
            Some(Repr::Str(s)) => Ok(Self::from(s.as_str())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/value.rs"]
mod tests;
