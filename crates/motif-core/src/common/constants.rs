//! Values shared by the pipeline and the concrete counters.

/// Parameter value routing data through the child's stdin or stdout.
pub const STREAM_SENTINEL: &str = "-";

/// Parameter value asking the pipeline for a temporary file.
pub const AUTO_TEMP_PATH: &str = "";

pub const DEFAULT_TIMEOUT_SECONDS: u64 = 320;

pub const SCRATCH_DIR_PREFIX: &str = "motifcount-run-";
