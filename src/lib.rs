#![allow(clippy::collapsible_if)]

pub mod config;
pub mod diagnostics;
pub mod extractor;
pub mod facts;
pub mod ir;
pub mod logging;

pub use config::{ConfigError, ExtractorConfig, SourceTypes};
pub use diagnostics::ExtractError;
pub use extractor::{ExternalScheduler, ExtractionQueue, Extractor, TypeContext};
pub use facts::{Fact, FactLog, FactSink, Label, TypeResult, TypeResults};
pub use ir::{GraphBuilder, IrGraph, IrType};

#[cfg(test)]
mod tests;
