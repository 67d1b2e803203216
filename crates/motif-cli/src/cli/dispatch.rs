use motif_core::counters::CounterKind;

#[derive(Debug, Clone, Copy)]
pub(super) struct CounterCommandSpec {
    pub(super) command: &'static str,
    pub(super) kind: CounterKind,
    pub(super) binary_patterns: &'static [&'static str],
}

pub(super) const COUNTER_COMMANDS: [CounterCommandSpec; 4] = [
    CounterCommandSpec {
        command: "mfinder",
        kind: CounterKind::Mfinder,
        binary_patterns: &["mfinder", "mfinder[0-9]*"],
    },
    CounterCommandSpec {
        command: "netmode",
        kind: CounterKind::NetMode,
        binary_patterns: &["NetMODE", "netmode"],
    },
    CounterCommandSpec {
        command: "fanmod",
        kind: CounterKind::Fanmod,
        binary_patterns: &["fanmod_cmd", "fanmod"],
    },
    CounterCommandSpec {
        command: "pgd",
        kind: CounterKind::Pgd,
        binary_patterns: &["pgd"],
    },
];

pub(super) fn counter_command_spec(command: &str) -> Option<CounterCommandSpec> {
    COUNTER_COMMANDS
        .iter()
        .copied()
        .find(|spec| spec.command.eq_ignore_ascii_case(command))
}

pub(super) fn known_counter_commands() -> String {
    COUNTER_COMMANDS
        .iter()
        .map(|spec| spec.command)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::{COUNTER_COMMANDS, counter_command_spec, known_counter_commands};
    use motif_core::counters::CounterKind;

    #[test]
    fn every_counter_kind_has_one_command() {
        for kind in CounterKind::ALL {
            let matching = COUNTER_COMMANDS
                .iter()
                .filter(|spec| spec.kind == kind)
                .count();
            assert_eq!(matching, 1, "{} should have exactly one command", kind);
            assert_eq!(
                counter_command_spec(kind.as_str()).map(|spec| spec.kind),
                Some(kind)
            );
        }
    }

    #[test]
    fn default_binary_name_is_the_first_pattern() {
        for spec in COUNTER_COMMANDS {
            assert_eq!(spec.binary_patterns[0], spec.kind.default_binary_name());
        }
    }

    #[test]
    fn lookup_ignores_case_and_lists_known_commands() {
        assert_eq!(
            counter_command_spec("NetMODE").map(|spec| spec.command),
            Some("netmode")
        );
        assert!(counter_command_spec("gtrie").is_none());
        assert_eq!(known_counter_commands(), "mfinder, netmode, fanmod, pgd");
    }
}
