pub mod errors;
pub mod graph;
pub mod table;

pub use errors::{ExitMapping, MotifError, MotifErrorCategory, MotifResult};
pub use graph::{EdgeListGraph, Graph};
pub use table::{Record, ResultTable, Scalar};
