//! fanmod: file in, CSV report out, both named on the command line.

mod parser;

pub use parser::FanmodOutput;

use crate::common::constants::AUTO_TEMP_PATH;
use crate::domain::MotifResult;
use crate::parameters::Parameter;
use crate::parameters::validators::{is_ge, is_le};
use crate::pipeline::MotifCounter;
use crate::transform::EdgeListTransformer;
use std::path::Path;
use std::sync::Arc;

pub const PROGRAM: &str = "fanmod";

pub const fn fanmod_input() -> EdgeListTransformer {
    EdgeListTransformer::new("\t")
}

pub fn fanmod_parameters() -> MotifResult<Vec<Parameter>> {
    Ok(vec![
        Parameter::integer("s")
            .alias("motif_size")
            .help("Motif size to search")
            .default_value(3)
            .validator(is_ge(3))
            .validator(is_le(8))
            .build()?,
        Parameter::integer("r")
            .alias("n_random")
            .help("Number of random networks to generate")
            .default_value(0)
            .validator(is_ge(0))
            .build()?,
        Parameter::flag("d")
            .alias("is_directed")
            .help("Set if the graph is directed")
            .default_value(true)
            .build()?,
    ])
}

/// Input and output parameters, in that order.
pub fn fanmod_io_parameters() -> MotifResult<(Parameter, Parameter)> {
    Ok((
        Parameter::file_path("i")
            .alias("fanmod_input")
            .help("Input graph file")
            .default_value(AUTO_TEMP_PATH)
            .build()?,
        Parameter::file_path("o")
            .alias("fanmod_output")
            .help("Output CSV file")
            .default_value(AUTO_TEMP_PATH)
            .build()?,
    ))
}

pub fn fanmod_counter(binary: impl AsRef<Path>) -> MotifResult<MotifCounter> {
    let (input, output) = fanmod_io_parameters()?;
    MotifCounter::builder(PROGRAM, binary)?
        .input_parameter(input)
        .output_parameter(output)
        .parameters(fanmod_parameters()?)
        .input_transformer(Arc::new(fanmod_input()))
        .output_transformer(Arc::new(FanmodOutput))
        .build()
}

#[cfg(test)]
mod tests {
    use super::fanmod_counter;
    use crate::parameters::ParameterValue;
    use crate::pipeline::assemble_arguments;
    use tempfile::NamedTempFile;

    #[test]
    fn directed_flag_is_on_by_default() {
        let binary = NamedTempFile::new().expect("fake binary should be created");
        let counter = fanmod_counter(binary.path()).expect("counter should build");
        assert_eq!(
            counter
                .parameter("is_directed")
                .expect("flag should be registered")
                .value(),
            Some(&ParameterValue::Flag(true))
        );
        assert_eq!(
            assemble_arguments(counter.parameters(), &["i", "o"]),
            vec!["-s", "3", "-r", "0", "-d"]
        );
    }

    #[test]
    fn clearing_directed_flag_drops_it_from_command_line() {
        let binary = NamedTempFile::new().expect("fake binary should be created");
        let mut counter = fanmod_counter(binary.path()).expect("counter should build");
        counter
            .set_parameter("d", false)
            .expect("flag should accept false");
        counter
            .set_parameter("n_random", 10)
            .expect("ten random networks are valid");
        assert_eq!(
            assemble_arguments(counter.parameters(), &["i", "o"]),
            vec!["-s", "3", "-r", "10"]
        );
    }
}
