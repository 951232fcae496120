pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod plot;
pub mod report;
pub mod textgrid;

pub use error::{AnalysisError, Result};
