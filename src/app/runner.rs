use crate::config::cli::LocalStorage;
use crate::core::etl::EtlEngine;
use crate::core::sinks::{BatchSink, StreamSink};
use crate::core::transformer::RecordTransformer;
use crate::domain::model::{OutputMode, RunSummary};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;

/// Runs one feed pass with the consumption mode the configuration selects.
pub fn run<C: ConfigProvider + ?Sized>(config: &C, monitor: bool) -> Result<RunSummary> {
    let transformer = RecordTransformer::from_config(config);
    tracing::debug!(
        "Mode: {:?}, chunk size: {}, sources: {:?}",
        config.output_mode(),
        config.chunk_size(),
        transformer.sources()
    );

    match config.output_mode() {
        OutputMode::Stream => {
            EtlEngine::new_with_monitoring(transformer, StreamSink::stdout(), monitor).run()
        }
        OutputMode::Batch => {
            let sink = BatchSink::new(LocalStorage::default(), config.output_path());
            EtlEngine::new_with_monitoring(transformer, sink, monitor).run()
        }
    }
}
