//! mfinder: reads an edge list file given as its first argument and writes
//! `<name>_OUT.txt` for the name passed with `-f`.

mod parser;

pub use parser::MfinderOutput;

use crate::common::constants::AUTO_TEMP_PATH;
use crate::domain::MotifResult;
use crate::parameters::Parameter;
use crate::parameters::validators::{is_ge, is_le};
use crate::pipeline::MotifCounter;
use crate::transform::EdgeListTransformer;
use std::path::Path;
use std::sync::Arc;

pub const PROGRAM: &str = "mfinder";
pub const RESULT_SUFFIX: &str = "_OUT.txt";

/// `source\ttarget\t1`: mfinder expects a weight column.
pub const fn mfinder_input() -> EdgeListTransformer {
    EdgeListTransformer::new("\t").with_weight("1")
}

pub fn mfinder_parameters() -> MotifResult<Vec<Parameter>> {
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
        Parameter::flag("nd")
            .alias("is_undirected")
            .help("Treat the input network as undirected")
            .default_value(false)
            .build()?,
    ])
}

/// Input and output parameters, in that order.
pub fn mfinder_io_parameters() -> MotifResult<(Parameter, Parameter)> {
    Ok((
        Parameter::file_path("mfinder_in")
            .help("Input network file")
            .position(0)
            .default_value(AUTO_TEMP_PATH)
            .build()?,
        Parameter::file_path("f")
            .alias("mfinder_out")
            .help("Output name, mfinder appends _OUT.txt")
            .default_value(AUTO_TEMP_PATH)
            .build()?,
    ))
}

pub fn mfinder_counter(binary: impl AsRef<Path>) -> MotifResult<MotifCounter> {
    let (input, output) = mfinder_io_parameters()?;
    MotifCounter::builder(PROGRAM, binary)?
        .input_parameter(input)
        .output_parameter(output)
        .parameters(mfinder_parameters()?)
        .input_transformer(Arc::new(mfinder_input()))
        .output_transformer(Arc::new(MfinderOutput))
        .result_suffix(RESULT_SUFFIX)
        .build()
}

#[cfg(test)]
mod tests {
    use super::mfinder_counter;
    use crate::pipeline::assemble_arguments;
    use tempfile::NamedTempFile;

    #[test]
    fn input_path_is_first_positional_argument() {
        let binary = NamedTempFile::new().expect("fake binary should be created");
        let mut counter = mfinder_counter(binary.path()).expect("counter should build");
        counter
            .set_parameter("mfinder_in", "net.txt")
            .expect("path should be accepted");
        counter
            .set_parameter("mfinder_out", "net")
            .expect("name should be accepted");
        counter
            .set_parameter("is_undirected", true)
            .expect("flag should be accepted");
        assert_eq!(
            assemble_arguments(counter.parameters(), &[]),
            vec!["net.txt", "-f", "net", "-s", "3", "-r", "0", "-nd"]
        );
    }
}
