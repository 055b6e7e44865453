//! Conversion module.
//!
//! - Output: JSON rendering and file writing
//! - Pipeline: Read, parse, render, write

pub mod output;
pub mod pipeline;

pub use output::{render, write_output, OutputFormat};
pub use pipeline::*;
