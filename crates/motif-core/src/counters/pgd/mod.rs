//! pgd: reads a comma separated edge list file and prints graphlet counts.

mod parser;

pub use parser::{PgdOutput, graphlet_motif};

use crate::common::constants::{AUTO_TEMP_PATH, STREAM_SENTINEL};
use crate::domain::MotifResult;
use crate::parameters::Parameter;
use crate::parameters::validators::is_ge;
use crate::pipeline::MotifCounter;
use crate::transform::EdgeListTransformer;
use std::path::Path;
use std::sync::Arc;

pub const PROGRAM: &str = "pgd";

pub const fn pgd_input() -> EdgeListTransformer {
    EdgeListTransformer::new(", ")
}

pub fn pgd_parameters() -> MotifResult<Vec<Parameter>> {
    Ok(vec![
        Parameter::text("w")
            .alias("workers")
            .help("Number of PROCESSING UNITS (workers) for the algorithm to use")
            .default_value("max")
            .build()?,
        Parameter::integer("b")
            .alias("block_size")
            .help(
                "Size of batch (number of jobs) dynamically assigned to the processing unit, \
                 that is, 1, 64, 512, etc.",
            )
            .default_value(64)
            .validator(is_ge(0))
            .build()?,
    ])
}

/// Input and output parameters, in that order.
pub fn pgd_io_parameters() -> MotifResult<(Parameter, Parameter)> {
    Ok((
        Parameter::file_path("f")
            .alias("pgd_in")
            .help("Input file")
            .default_value(AUTO_TEMP_PATH)
            .build()?,
        Parameter::file_path("out")
            .alias("pgd_out")
            .help("Output file name")
            .default_value(STREAM_SENTINEL)
            .build()?,
    ))
}

pub fn pgd_counter(binary: impl AsRef<Path>) -> MotifResult<MotifCounter> {
    let (input, output) = pgd_io_parameters()?;
    MotifCounter::builder(PROGRAM, binary)?
        .input_parameter(input)
        .output_parameter(output)
        .parameters(pgd_parameters()?)
        .input_transformer(Arc::new(pgd_input()))
        .output_transformer(Arc::new(PgdOutput))
        .build()
}
