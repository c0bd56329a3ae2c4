pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig};
pub use core::{
    etl::EtlEngine,
    sinks::{BatchSink, StreamSink},
    transformer::{RecordTransformer, TransactionStream},
};
pub use domain::model::{Numeric, OutputMode, RunSummary, SourceRow, TransactionDocument};
pub use utils::error::{EtlError, Result};
