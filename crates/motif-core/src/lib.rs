pub mod common;
pub mod counters;
pub mod domain;
pub mod parameters;
pub mod parser;
pub mod pipeline;
pub mod transform;
