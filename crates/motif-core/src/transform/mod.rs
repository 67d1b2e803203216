pub mod input;
pub mod output;

pub use input::{EdgeListTransformer, HeaderLine, InputTransformer, NodeIndex, RenderedGraph};
pub use output::OutputTransformer;
