use crate::domain::model::{OutputMode, TransactionDocument};
use crate::utils::error::Result;

pub trait Storage {
    /// Writes `data` to `path` as a whole: either the full contents land or nothing does.
    fn write_file(&self, path: &str, data: &[u8]) -> Result<String>;
}

pub trait ConfigProvider {
    fn source_files(&self) -> &[String];
    fn required_fields(&self) -> &[String];
    fn chunk_size(&self) -> usize;
    fn delimiter(&self) -> u8;
    fn output_mode(&self) -> OutputMode;
    fn output_path(&self) -> &str;
}

/// Result of draining a document stream into a sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkOutcome {
    pub documents: usize,
    pub output_path: Option<String>,
}

/// A consumption mode for produced documents.
pub trait DocumentSink {
    fn consume<I>(&mut self, documents: I) -> Result<SinkOutcome>
    where
        I: Iterator<Item = TransactionDocument>;
}
