//! Composable value checks attached to parameters.

use super::value::{ParameterKind, ParameterValue};
use std::cmp::Ordering;
use std::fmt::{Debug, Formatter};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    Valid,
    Invalid(String),
}

impl Validation {
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    fn from_check(passed: bool, reason: impl FnOnce() -> String) -> Self {
        if passed { Self::Valid } else { Self::Invalid(reason()) }
    }
}

type Check = dyn Fn(&ParameterValue) -> Validation + Send + Sync;

#[derive(Clone)]
pub struct Validator {
    label: String,
    check: Arc<Check>,
}

impl Validator {
    pub fn new(
        label: impl Into<String>,
        check: impl Fn(&ParameterValue) -> Validation + Send + Sync + 'static,
    ) -> Self {
        Self {
            label: label.into(),
            check: Arc::new(check),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn check(&self, value: &ParameterValue) -> Validation {
        (self.check)(value)
    }
}

impl Debug for Validator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Validator").field("label", &self.label).finish()
    }
}

fn ordering_check(
    label: &str,
    bound: ParameterValue,
    accept: fn(Ordering) -> bool,
    phrase: &'static str,
) -> Validator {
    Validator::new(format!("{} {}", label, bound), move |value| {
        match value.compare(&bound) {
            Some(ordering) => Validation::from_check(accept(ordering), || {
                format!("{} {} {}", value, phrase, bound)
            }),
            None => Validation::Invalid(format!(
                "{} cannot be compared with {}",
                value, bound
            )),
        }
    })
}

pub fn is_le(bound: impl Into<ParameterValue>) -> Validator {
    ordering_check("<=", bound.into(), Ordering::is_le, "is not less or equal than")
}

pub fn is_lt(bound: impl Into<ParameterValue>) -> Validator {
    ordering_check("<", bound.into(), Ordering::is_lt, "is not less than")
}

pub fn is_gt(bound: impl Into<ParameterValue>) -> Validator {
    ordering_check(">", bound.into(), Ordering::is_gt, "is not greater than")
}

pub fn is_ge(bound: impl Into<ParameterValue>) -> Validator {
    ordering_check(">=", bound.into(), Ordering::is_ge, "is not greater equal than")
}

pub fn is_eq(expected: impl Into<ParameterValue>) -> Validator {
    let expected = expected.into();
    Validator::new(format!("== {}", expected), move |value| {
        Validation::from_check(value.compare(&expected) == Some(Ordering::Equal), || {
            format!("{} is not equal to {}", value, expected)
        })
    })
}

pub fn is_in<V: Into<ParameterValue>>(allowed: impl IntoIterator<Item = V>) -> Validator {
    let allowed = allowed.into_iter().map(Into::into).collect::<Vec<_>>();
    let listed = allowed
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    Validator::new(format!("in [{}]", listed), move |value| {
        Validation::from_check(
            allowed
                .iter()
                .any(|candidate| value.compare(candidate) == Some(Ordering::Equal)),
            || format!("{} not one of [{}]", value, listed),
        )
    })
}

pub fn of_kind(kind: ParameterKind) -> Validator {
    Validator::new(format!("is {}", kind.as_str()), move |value| {
        Validation::from_check(kind.accepts(value), || {
            format!("type of {} is not {}", value, kind.as_str())
        })
    })
}

pub fn path_exists() -> Validator {
    Validator::new("exists", |value| match value {
        ParameterValue::Text(path) => {
            Validation::from_check(Path::new(path).exists(), || format!("{} does not exist", path))
        }
        other => Validation::Invalid(format!("type of {} is not file path", other)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reason(validation: Validation) -> String {
        match validation {
            Validation::Invalid(reason) => reason,
            Validation::Valid => panic!("validation should fail"),
        }
    }

    #[test]
    fn range_checks_report_bound_in_message() {
        assert!(is_le(8).check(&ParameterValue::from(8)).is_valid());
        assert_eq!(
            reason(is_le(8).check(&ParameterValue::from(9))),
            "9 is not less or equal than 8"
        );
        assert_eq!(
            reason(is_lt(8).check(&ParameterValue::from(8))),
            "8 is not less than 8"
        );
        assert_eq!(
            reason(is_gt(0).check(&ParameterValue::from(0))),
            "0 is not greater than 0"
        );
        assert_eq!(
            reason(is_ge(1).check(&ParameterValue::from(0))),
            "0 is not greater equal than 1"
        );
    }

    #[test]
    fn equality_and_membership_checks() {
        assert!(is_eq("max").check(&ParameterValue::from("max")).is_valid());
        assert_eq!(
            reason(is_eq(3).check(&ParameterValue::from(4))),
            "4 is not equal to 3"
        );
        assert!(is_in([0, 1, 2]).check(&ParameterValue::from(1)).is_valid());
        assert_eq!(
            reason(is_in([0, 1, 2]).check(&ParameterValue::from(7))),
            "7 not one of [0, 1, 2]"
        );
    }

    #[test]
    fn kind_check_rejects_mismatched_types() {
        assert!(of_kind(ParameterKind::Flag).check(&ParameterValue::from(false)).is_valid());
        assert_eq!(
            reason(of_kind(ParameterKind::Integer).check(&ParameterValue::from("12"))),
            "type of 12 is not integer"
        );
    }

    #[test]
    fn incomparable_bound_is_invalid_not_panicking() {
        assert_eq!(
            reason(is_le(8).check(&ParameterValue::from("eight"))),
            "eight cannot be compared with 8"
        );
    }

    #[test]
    fn path_check_looks_at_filesystem() {
        let temp = tempfile::NamedTempFile::new().expect("temp file should be created");
        let existing = temp.path().display().to_string();
        assert!(path_exists().check(&ParameterValue::from(existing.as_str())).is_valid());
        assert_eq!(
            reason(path_exists().check(&ParameterValue::from("/no/such/graph.txt"))),
            "/no/such/graph.txt does not exist"
        );
    }
}
