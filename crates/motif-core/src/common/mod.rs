pub mod adjacency;
pub mod config;
pub mod constants;

pub use adjacency::{AdjacencyMatrix, MAX_MOTIF_SIZE};
pub use config::{InvocationSettings, StderrPolicy};
