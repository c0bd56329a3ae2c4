use crate::core::transformer::RecordTransformer;
use crate::domain::model::RunSummary;
use crate::domain::ports::DocumentSink;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

pub struct EtlEngine<K: DocumentSink> {
    transformer: RecordTransformer,
    sink: K,
    monitor: SystemMonitor,
}

impl<K: DocumentSink> EtlEngine<K> {
    pub fn new(transformer: RecordTransformer, sink: K) -> Self {
        Self::new_with_monitoring(transformer, sink, false)
    }

    pub fn new_with_monitoring(transformer: RecordTransformer, sink: K, monitor: bool) -> Self {
        Self {
            transformer,
            sink,
            monitor: SystemMonitor::new(monitor),
        }
    }

    pub fn into_sink(self) -> K {
        self.sink
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        tracing::info!(
            "🚀 Starting transaction feed over {} source files",
            self.transformer.sources().len()
        );
        self.monitor.log_stats("Start");

        let mut stream = self.transformer.produce();
        let outcome = self.sink.consume(&mut stream)?;
        let sources = stream.into_report();

        self.monitor.log_stats("Transform");

        if !sources.files_skipped.is_empty() {
            tracing::warn!(
                "⚠️ {} of {} source files were skipped",
                sources.files_skipped.len(),
                self.transformer.sources().len()
            );
        }
        tracing::info!(
            "✅ Transaction feed completed: {} documents from {} files",
            outcome.documents,
            sources.files_read.len()
        );
        self.monitor.log_final_stats();

        Ok(RunSummary {
            documents: outcome.documents,
            output_path: outcome.output_path,
            sources,
        })
    }
}
