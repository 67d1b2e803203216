use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, PartialEq)]
pub enum ParameterValue {
    Integer(i64),
    Real(f64),
    Text(String),
    Flag(bool),
}

impl ParameterValue {
    /// Orders two values of compatible type. Integers and reals compare numerically;
    /// any other mix has no ordering.
    pub fn compare(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Self::Integer(left), Self::Integer(right)) => Some(left.cmp(right)),
            (Self::Text(left), Self::Text(right)) => Some(left.cmp(right)),
            (Self::Flag(left), Self::Flag(right)) => Some(left.cmp(right)),
            (left, right) => left.as_f64()?.partial_cmp(&right.as_f64()?),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(value) => Some(*value as f64),
            Self::Real(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_flag(&self) -> Option<bool> {
        match self {
            Self::Flag(value) => Some(*value),
            _ => None,
        }
    }
}

impl Display for ParameterValue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer(value) => write!(f, "{}", value),
            Self::Real(value) => write!(f, "{:?}", value),
            Self::Text(value) => f.write_str(value),
            Self::Flag(value) => write!(f, "{}", value),
        }
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    Integer,
    Real,
    Text,
    Flag,
    FilePath,
}

impl ParameterKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Real => "real",
            Self::Text => "string",
            Self::Flag => "flag",
            Self::FilePath => "file path",
        }
    }

    pub const fn default_value(self) -> ParameterValue {
        match self {
            Self::Integer => ParameterValue::Integer(0),
            Self::Real => ParameterValue::Real(0.0),
            Self::Text | Self::FilePath => ParameterValue::Text(String::new()),
            Self::Flag => ParameterValue::Flag(true),
        }
    }

    pub fn accepts(self, value: &ParameterValue) -> bool {
        matches!(
            (self, value),
            (Self::Integer, ParameterValue::Integer(_))
                | (Self::Real, ParameterValue::Real(_))
                | (Self::Text | Self::FilePath, ParameterValue::Text(_))
                | (Self::Flag, ParameterValue::Flag(_))
        )
    }

    /// Widens integers assigned to real parameters. Everything else passes through.
    pub fn coerce(self, value: ParameterValue) -> ParameterValue {
        match (self, value) {
            (Self::Real, ParameterValue::Integer(integer)) => ParameterValue::Real(integer as f64),
            (_, value) => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ParameterKind, ParameterValue};
    use std::cmp::Ordering;

    #[test]
    fn numeric_values_compare_across_integer_and_real() {
        let three = ParameterValue::from(3);
        assert_eq!(three.compare(&ParameterValue::from(3.5)), Some(Ordering::Less));
        assert_eq!(three.compare(&ParameterValue::from(3)), Some(Ordering::Equal));
        assert_eq!(three.compare(&ParameterValue::from("3")), None);
    }

    #[test]
    fn reals_render_with_fraction_digit() {
        assert_eq!(ParameterValue::from(3.0).to_string(), "3.0");
        assert_eq!(ParameterValue::from(0.25).to_string(), "0.25");
        assert_eq!(ParameterValue::from(12).to_string(), "12");
    }

    #[test]
    fn kinds_accept_matching_values_only() {
        assert!(ParameterKind::FilePath.accepts(&ParameterValue::from("in.txt")));
        assert!(!ParameterKind::Integer.accepts(&ParameterValue::from(true)));
        assert_eq!(
            ParameterKind::Real.coerce(ParameterValue::from(2)),
            ParameterValue::Real(2.0)
        );
    }
}
