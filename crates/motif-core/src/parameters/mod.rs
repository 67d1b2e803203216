//! Typed command-line parameters for adapted counting programs.
//!
//! A parameter always holds an effective value (its current value, or its
//! default) that satisfies every attached validator. Assignments are checked
//! before they are committed, so a rejected value leaves the parameter as it was.

pub mod registry;
pub mod validators;
pub mod value;

pub use registry::ParameterSet;
pub use validators::{Validation, Validator};
pub use value::{ParameterKind, ParameterValue};

use crate::domain::{MotifError, MotifResult};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone)]
pub struct Parameter {
    name: String,
    alias: Option<String>,
    help: Option<String>,
    kind: ParameterKind,
    required: bool,
    default_value: Option<ParameterValue>,
    value: Option<ParameterValue>,
    validators: Vec<Validator>,
    position: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct ParameterBuilder {
    parameter: Parameter,
}

impl Parameter {
    pub fn integer(name: impl Into<String>) -> ParameterBuilder {
        ParameterBuilder::new(name, ParameterKind::Integer)
    }

    pub fn real(name: impl Into<String>) -> ParameterBuilder {
        ParameterBuilder::new(name, ParameterKind::Real)
    }

    pub fn text(name: impl Into<String>) -> ParameterBuilder {
        ParameterBuilder::new(name, ParameterKind::Text)
    }

    pub fn flag(name: impl Into<String>) -> ParameterBuilder {
        ParameterBuilder::new(name, ParameterKind::Flag)
    }

    pub fn file_path(name: impl Into<String>) -> ParameterBuilder {
        ParameterBuilder::new(name, ParameterKind::FilePath)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn kind(&self) -> ParameterKind {
        self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_flag(&self) -> bool {
        self.kind == ParameterKind::Flag
    }

    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn default_value(&self) -> Option<&ParameterValue> {
        self.default_value.as_ref()
    }

    /// `name/alias`, the way parameters are named in diagnostics.
    pub fn label(&self) -> String {
        match &self.alias {
            Some(alias) => format!("{}/{}", self.name, alias),
            None => self.name.clone(),
        }
    }

    /// Current value if one was assigned, otherwise the default.
    pub fn value(&self) -> Option<&ParameterValue> {
        self.value.as_ref().or(self.default_value.as_ref())
    }

    pub fn set_value(&mut self, value: impl Into<ParameterValue>) -> MotifResult<()> {
        let value = self.kind.coerce(value.into());
        self.check(Some(&value))?;
        self.value = Some(value);
        Ok(())
    }

    pub fn set_default_value(&mut self, value: impl Into<ParameterValue>) -> MotifResult<()> {
        let value = self.kind.coerce(value.into());
        self.check(Some(&value))?;
        self.default_value = Some(value);
        Ok(())
    }

    pub fn clear_value(&mut self) {
        self.value = None;
    }

    pub fn validate(&self) -> MotifResult<()> {
        self.check(self.value())
    }

    /// Converts textual input (a command-line `key=value`, say) into a value of this kind.
    pub fn parse_value(&self, raw: &str) -> MotifResult<ParameterValue> {
        let trimmed = raw.trim();
        let parsed = match self.kind {
            ParameterKind::Integer => trimmed.parse::<i64>().ok().map(ParameterValue::Integer),
            ParameterKind::Real => trimmed.parse::<f64>().ok().map(ParameterValue::Real),
            ParameterKind::Flag => match trimmed.to_ascii_lowercase().as_str() {
                "true" | "yes" | "on" | "1" => Some(ParameterValue::Flag(true)),
                "false" | "no" | "off" | "0" => Some(ParameterValue::Flag(false)),
                _ => None,
            },
            ParameterKind::Text | ParameterKind::FilePath => Some(ParameterValue::from(raw)),
        };
        parsed.ok_or_else(|| {
            MotifError::parameter(
                "PARAM.UNPARSABLE_VALUE",
                format!(
                    "parameter {}: '{}' is not a valid {} value",
                    self.label(),
                    raw,
                    self.kind.as_str()
                ),
            )
        })
    }

    /// Command-line tokens for the effective value.
    pub fn parameter_form(&self) -> Vec<String> {
        let Some(value) = self.value() else {
            return Vec::new();
        };
        if self.is_flag() {
            return match value {
                ParameterValue::Flag(true) => vec![format!("-{}", self.name)],
                _ => Vec::new(),
            };
        }
        match self.position {
            Some(_) => vec![value.to_string()],
            None => vec![format!("-{}", self.name), value.to_string()],
        }
    }

    fn check(&self, value: Option<&ParameterValue>) -> MotifResult<()> {
        let Some(value) = value else {
            if self.required {
                return Err(MotifError::parameter(
                    "PARAM.MISSING_VALUE",
                    format!("parameter {} is required but has no value", self.label()),
                ));
            }
            return Ok(());
        };
        for validator in &self.validators {
            if let Validation::Invalid(reason) = validator.check(value) {
                return Err(MotifError::parameter(
                    "PARAM.INVALID_VALUE",
                    format!("parameter {}: {}", self.label(), reason),
                ));
            }
        }
        Ok(())
    }
}

impl Display for Parameter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let render = |value: Option<&ParameterValue>| {
            value.map_or_else(|| "None".to_string(), ToString::to_string)
        };
        writeln!(f, "{}", self.label())?;
        writeln!(f, "\tHelp String       :{}", self.help.as_deref().unwrap_or_default())?;
        writeln!(
            f,
            "\tRequired          :{}",
            if self.required { "Mandatory" } else { "Optional" }
        )?;
        writeln!(f, "\tDefault value     :{}", render(self.default_value.as_ref()))?;
        writeln!(f, "\tCurrent value     :{}", render(self.value()))?;
        writeln!(
            f,
            "\tValidation state  :{}",
            if self.validate().is_ok() { "Valid" } else { "Invalid" }
        )?;
        write!(f, "\tIs flag           :{}", self.is_flag())
    }
}

impl ParameterBuilder {
    fn new(name: impl Into<String>, kind: ParameterKind) -> Self {
        Self {
            parameter: Parameter {
                name: name.into(),
                alias: None,
                help: None,
                kind,
                required: true,
                default_value: Some(kind.default_value()),
                value: None,
                validators: vec![validators::of_kind(kind)],
                position: None,
            },
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.parameter.alias = Some(alias.into());
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.parameter.help = Some(help.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.parameter.required = required;
        self
    }

    pub fn default_value(mut self, value: impl Into<ParameterValue>) -> Self {
        self.parameter.default_value = Some(self.parameter.kind.coerce(value.into()));
        self
    }

    pub fn without_default(mut self) -> Self {
        self.parameter.default_value = None;
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.parameter.validators.push(validator);
        self
    }

    pub fn position(mut self, position: usize) -> Self {
        self.parameter.position = Some(position);
        self
    }

    /// File paths only: the path named by the value must exist.
    pub fn must_exist(self) -> Self {
        self.validator(validators::path_exists())
    }

    /// Checks the default against every validator. Required parameters must have one.
    pub fn build(self) -> MotifResult<Parameter> {
        let parameter = self.parameter;
        if let Err(error) = parameter.validate() {
            return Err(MotifError::parameter(
                "PARAM.INVALID_DEFAULT",
                format!(
                    "parameter {} must specify a valid default value: {}",
                    parameter.label(),
                    error.message()
                ),
            ));
        }
        Ok(parameter)
    }
}
