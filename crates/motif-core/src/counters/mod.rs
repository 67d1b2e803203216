//! Concrete adapters for the supported counting programs.

pub mod fanmod;
pub mod mfinder;
pub mod netmode;
pub mod pgd;

use crate::domain::{MotifError, MotifResult};
use crate::parameters::Parameter;
use crate::pipeline::MotifCounter;
use crate::transform::{EdgeListTransformer, OutputTransformer};
use std::fmt::{Display, Formatter};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CounterKind {
    Mfinder,
    NetMode,
    Fanmod,
    Pgd,
}

impl CounterKind {
    pub const ALL: [Self; 4] = [Self::Mfinder, Self::NetMode, Self::Fanmod, Self::Pgd];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mfinder => "mfinder",
            Self::NetMode => "netmode",
            Self::Fanmod => "fanmod",
            Self::Pgd => "pgd",
        }
    }

    /// File name the program is usually installed under.
    pub const fn default_binary_name(self) -> &'static str {
        match self {
            Self::Mfinder => "mfinder",
            Self::NetMode => "NetMODE",
            Self::Fanmod => "fanmod_cmd",
            Self::Pgd => "pgd",
        }
    }

    pub fn from_name(name: &str) -> MotifResult<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
            .ok_or_else(|| {
                let known = Self::ALL.map(Self::as_str);
                MotifError::adapter(
                    "ADAPTER.UNKNOWN_COUNTER",
                    format!("unknown counter '{}', expected one of [{}]", name, known.join(", ")),
                )
            })
    }

    pub fn build(self, binary: impl AsRef<Path>) -> MotifResult<MotifCounter> {
        match self {
            Self::Mfinder => mfinder::mfinder_counter(binary),
            Self::NetMode => netmode::netmode_counter(binary),
            Self::Fanmod => fanmod::fanmod_counter(binary),
            Self::Pgd => pgd::pgd_counter(binary),
        }
    }

    /// Every parameter the adapter registers, input and output first.
    ///
    /// Unlike [`CounterKind::build`] this needs no installed binary.
    pub fn parameters(self) -> MotifResult<Vec<Parameter>> {
        let ((input, output), algorithm) = match self {
            Self::Mfinder => (mfinder::mfinder_io_parameters()?, mfinder::mfinder_parameters()?),
            Self::NetMode => (netmode::netmode_io_parameters()?, netmode::netmode_parameters()?),
            Self::Fanmod => (fanmod::fanmod_io_parameters()?, fanmod::fanmod_parameters()?),
            Self::Pgd => (pgd::pgd_io_parameters()?, pgd::pgd_parameters()?),
        };
        Ok([input, output].into_iter().chain(algorithm).collect())
    }

    pub const fn input_transformer(self) -> EdgeListTransformer {
        match self {
            Self::Mfinder => mfinder::mfinder_input(),
            Self::NetMode => netmode::netmode_input(),
            Self::Fanmod => fanmod::fanmod_input(),
            Self::Pgd => pgd::pgd_input(),
        }
    }

    pub fn output_transformer(self) -> Box<dyn OutputTransformer> {
        match self {
            Self::Mfinder => Box::new(mfinder::MfinderOutput),
            Self::NetMode => Box::new(netmode::NetModeOutput),
            Self::Fanmod => Box::new(fanmod::FanmodOutput),
            Self::Pgd => Box::new(pgd::PgdOutput),
        }
    }
}

/// Name of the NetMODE `adjMat.txt` grammar, which no counter runs on its own.
pub const NETMODE_ADJACENCY_GRAMMAR: &str = "netmode-adjacency";

/// Looks up an output grammar by counter name or [`NETMODE_ADJACENCY_GRAMMAR`].
pub fn output_grammar(name: &str) -> MotifResult<Box<dyn OutputTransformer>> {
    if name.eq_ignore_ascii_case(NETMODE_ADJACENCY_GRAMMAR) {
        return Ok(Box::new(netmode::NetModeAdjacencyListing));
    }
    CounterKind::from_name(name).map(CounterKind::output_transformer)
}

impl Display for CounterKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
