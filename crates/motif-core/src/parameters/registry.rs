use super::{Parameter, ParameterValue};
use crate::domain::{MotifError, MotifResult};
use std::collections::HashMap;

/// Parameters of one adapter, reachable by name or alias.
///
/// Every key maps to exactly one parameter. Iteration yields each distinct
/// parameter once, in registration order.
#[derive(Debug, Clone, Default)]
pub struct ParameterSet {
    parameters: Vec<Parameter>,
    keys: HashMap<String, usize>,
}

impl ParameterSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, parameter: Parameter) -> MotifResult<()> {
        let keys = std::iter::once(parameter.name()).chain(parameter.alias());
        for key in keys {
            if let Some(slot) = self.keys.get(key) {
                return Err(MotifError::adapter(
                    "ADAPTER.DUPLICATE_PARAMETER",
                    format!(
                        "parameter {} reuses key '{}' already registered by {}",
                        parameter.label(),
                        key,
                        self.parameters[*slot].label()
                    ),
                ));
            }
        }
        if parameter.alias() == Some(parameter.name()) {
            return Err(MotifError::adapter(
                "ADAPTER.DUPLICATE_PARAMETER",
                format!("parameter {} uses its name as alias", parameter.name()),
            ));
        }

        let slot = self.parameters.len();
        self.keys.insert(parameter.name().to_string(), slot);
        if let Some(alias) = parameter.alias() {
            self.keys.insert(alias.to_string(), slot);
        }
        self.parameters.push(parameter);
        Ok(())
    }

    pub fn get(&self, key: &str) -> MotifResult<&Parameter> {
        let slot = self.slot(key)?;
        Ok(&self.parameters[slot])
    }

    pub fn get_mut(&mut self, key: &str) -> MotifResult<&mut Parameter> {
        let slot = self.slot(key)?;
        Ok(&mut self.parameters[slot])
    }

    pub fn set_value(&mut self, key: &str, value: impl Into<ParameterValue>) -> MotifResult<()> {
        self.get_mut(key)?.set_value(value)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains_key(key)
    }

    pub fn validate_all(&self) -> MotifResult<()> {
        self.parameters.iter().try_for_each(Parameter::validate)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter()
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    fn slot(&self, key: &str) -> MotifResult<usize> {
        self.keys.get(key).copied().ok_or_else(|| {
            MotifError::adapter(
                "ADAPTER.UNKNOWN_PARAMETER",
                format!("no parameter is registered under '{}'", key),
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::ParameterSet;
    use crate::domain::MotifErrorCategory;
    use crate::parameters::validators::is_le;
    use crate::parameters::{Parameter, ParameterValue};

    fn integer(name: &str, alias: &str) -> Parameter {
        Parameter::integer(name)
            .alias(alias)
            .build()
            .expect("integer parameter should build")
    }

    #[test]
    fn name_and_alias_resolve_to_same_parameter() {
        let mut set = ParameterSet::new();
        set.add(integer("s", "motif_size")).expect("first parameter should register");
        set.add(integer("r", "n_random")).expect("distinct keys should register");

        set.set_value("motif_size", 5).expect("alias should be writable");
        assert_eq!(
            set.get("s").expect("name should resolve").value(),
            Some(&ParameterValue::Integer(5))
        );
        assert_eq!(set.len(), 2);
        assert_eq!(
            set.iter().map(Parameter::name).collect::<Vec<_>>(),
            vec!["s", "r"]
        );
    }

    #[test]
    fn duplicate_alias_is_rejected() {
        let mut set = ParameterSet::new();
        set.add(integer("s", "motif_size")).expect("first parameter should register");
        let error = set
            .add(integer("k", "motif_size"))
            .expect_err("alias collision should fail");
        assert_eq!(error.category(), MotifErrorCategory::AdapterError);
        assert_eq!(error.placeholder(), "ADAPTER.DUPLICATE_PARAMETER");
        assert!(!set.contains("k"));
    }

    #[test]
    fn name_colliding_with_existing_alias_is_rejected() {
        let mut set = ParameterSet::new();
        set.add(integer("s", "motif_size")).expect("first parameter should register");
        set.add(integer("motif_size", "size"))
            .expect_err("name equal to alias should fail");
    }

    #[test]
    fn unknown_key_is_adapter_error() {
        let set = ParameterSet::new();
        let error = set.get("q").expect_err("unknown key should fail");
        assert_eq!(error.category(), MotifErrorCategory::AdapterError);
        assert_eq!(error.placeholder(), "ADAPTER.UNKNOWN_PARAMETER");
    }

    #[test]
    fn validate_all_reports_first_invalid_parameter() {
        let mut set = ParameterSet::new();
        set.add(
            Parameter::integer("s")
                .default_value(3)
                .validator(is_le(8))
                .build()
                .expect("bounded parameter should build"),
        )
        .expect("parameter should register");
        set.validate_all().expect("defaults should validate");
        set.set_value("s", 9).expect_err("out of range assignment should fail");
        set.validate_all().expect("rejected assignment leaves set valid");
    }
}
