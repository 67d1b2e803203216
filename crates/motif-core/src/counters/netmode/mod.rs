//! NetMODE: streams its edge list on stdin and prints the z-score table on stdout.

mod parser;

pub use parser::{NetModeAdjacencyListing, NetModeOutput};

use crate::common::constants::STREAM_SENTINEL;
use crate::domain::MotifResult;
use crate::parameters::Parameter;
use crate::parameters::validators::{is_ge, is_le};
use crate::pipeline::MotifCounter;
use crate::transform::{EdgeListTransformer, HeaderLine};
use std::path::Path;
use std::sync::Arc;

pub const PROGRAM: &str = "NetMODE";

/// Tab separated pairs after a header line. NetMODE sizes its node arrays
/// from the header, and ids run from 1, so the header is the node count plus one.
pub const fn netmode_input() -> EdgeListTransformer {
    EdgeListTransformer::new("\t").with_header(HeaderLine::NodeCountPlusOne)
}

pub fn netmode_parameters() -> MotifResult<Vec<Parameter>> {
    Ok(vec![
        Parameter::integer("k")
            .alias("motif_size")
            .help("k-node subgraphs (=3,4,5 or 6)")
            .default_value(3)
            .validator(is_ge(3))
            .validator(is_le(6))
            .build()?,
        Parameter::integer("c")
            .alias("n_random")
            .help("Number of comparison graphs (An integer in [0, 2^31))")
            .default_value(0)
            .validator(is_ge(0))
            .build()?,
        Parameter::integer("t")
            .alias("n_threads")
            .help("Number of threads to use")
            .default_value(1)
            .validator(is_ge(1))
            .required(false)
            .build()?,
        Parameter::integer("e")
            .alias("edge_select_method")
            .help(
                "Bidirectional edge random method (0:fixed, 1:no regard, 2:global constant, \
                 3:local constant, 4:uniform)",
            )
            .default_value(3)
            .validator(is_ge(0))
            .validator(is_le(4))
            .required(false)
            .build()?,
        Parameter::integer("b")
            .alias("burnin")
            .help("Number of random graphs to be discarded")
            .default_value(0)
            .validator(is_ge(0))
            .required(false)
            .build()?,
    ])
}

/// Input and output parameters, in that order.
pub fn netmode_io_parameters() -> MotifResult<(Parameter, Parameter)> {
    Ok((
        Parameter::file_path("netmode_in")
            .help("NetMODE accepts input via stdin")
            .default_value(STREAM_SENTINEL)
            .required(false)
            .build()?,
        Parameter::file_path("netmode_out")
            .help("NetMODE returns output via stdout")
            .default_value(STREAM_SENTINEL)
            .required(false)
            .build()?,
    ))
}

pub fn netmode_counter(binary: impl AsRef<Path>) -> MotifResult<MotifCounter> {
    let (input, output) = netmode_io_parameters()?;
    MotifCounter::builder(PROGRAM, binary)?
        .input_parameter(input)
        .output_parameter(output)
        .parameters(netmode_parameters()?)
        .input_transformer(Arc::new(netmode_input()))
        .output_transformer(Arc::new(NetModeOutput))
        .build()
}
