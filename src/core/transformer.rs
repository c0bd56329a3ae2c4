use crate::core::reader::{ChunkedCsvReader, DEFAULT_CHUNK_SIZE};
use crate::domain::model::{SkippedSource, SourceReport, SourceRow, TransactionDocument};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::EtlError;
use std::collections::VecDeque;
use std::fs::File;
use std::path::PathBuf;

/// Turns a list of delimited source files into transaction documents.
#[derive(Debug, Clone)]
pub struct RecordTransformer {
    sources: Vec<PathBuf>,
    required_fields: Vec<String>,
    chunk_size: usize,
    delimiter: u8,
}

impl RecordTransformer {
    pub fn new<P: Into<PathBuf>>(
        sources: impl IntoIterator<Item = P>,
        required_fields: Vec<String>,
        chunk_size: usize,
    ) -> Self {
        Self {
            sources: sources.into_iter().map(Into::into).collect(),
            required_fields,
            chunk_size,
            delimiter: b',',
        }
    }

    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self::new(
            config.source_files().iter(),
            config.required_fields().to_vec(),
            config.chunk_size(),
        )
        .with_delimiter(config.delimiter())
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    /// Starts a single forward pass over every source file, in list order.
    pub fn produce(&self) -> TransactionStream {
        TransactionStream {
            pending: self.sources.clone().into_iter(),
            required_fields: self.required_fields.clone(),
            chunk_size: self.chunk_size.max(1),
            delimiter: self.delimiter,
            current: None,
            buffer: VecDeque::with_capacity(self.chunk_size.max(1)),
            report: SourceReport::default(),
        }
    }
}

impl Default for RecordTransformer {
    fn default() -> Self {
        Self::new(
            Vec::<PathBuf>::new(),
            SourceRow::default_required_fields(),
            DEFAULT_CHUNK_SIZE,
        )
    }
}

/// Lazy, single-pass iterator of documents in file order then row order.
///
/// A file that is missing or cannot be read is logged and skipped; the stream
/// then moves on to the next file.
pub struct TransactionStream {
    pending: std::vec::IntoIter<PathBuf>,
    required_fields: Vec<String>,
    chunk_size: usize,
    delimiter: u8,
    current: Option<(PathBuf, ChunkedCsvReader<File>)>,
    buffer: VecDeque<SourceRow>,
    report: SourceReport,
}

impl TransactionStream {
    pub fn report(&self) -> &SourceReport {
        &self.report
    }

    pub fn into_report(self) -> SourceReport {
        self.report
    }

    fn open_next(&mut self) -> bool {
        let Some(path) = self.pending.next() else {
            return false;
        };

        tracing::info!("📂 Processing source file '{}'", path.display());
        match ChunkedCsvReader::open(&path, &self.required_fields, self.chunk_size, self.delimiter)
        {
            Ok(reader) => self.current = Some((path, reader)),
            Err(e) => self.skip(path, e),
        }
        true
    }

    fn skip(&mut self, path: PathBuf, error: EtlError) {
        match &error {
            EtlError::MissingSource { .. } => {
                tracing::warn!("⚠️ Source file '{}' was not found, skipping", path.display());
            }
            _ => {
                tracing::warn!(
                    "⚠️ Error while processing '{}': {}, skipping",
                    path.display(),
                    error
                );
            }
        }

        self.report.files_skipped.push(SkippedSource {
            path,
            reason: error.to_string(),
        });
    }
}

impl Iterator for TransactionStream {
    type Item = TransactionDocument;

    fn next(&mut self) -> Option<TransactionDocument> {
        loop {
            if let Some(row) = self.buffer.pop_front() {
                return Some(TransactionDocument::from(row));
            }

            let outcome = match self.current.as_mut() {
                Some((_, reader)) => reader.fill_chunk(&mut self.buffer),
                None => {
                    if !self.open_next() {
                        return None;
                    }
                    continue;
                }
            };

            match outcome {
                Ok(0) => {
                    if let Some((path, reader)) = self.current.take() {
                        tracing::debug!(
                            "Finished '{}' after {} rows",
                            path.display(),
                            reader.rows_read()
                        );
                        self.report.files_read.push((path, reader.rows_read()));
                    }
                }
                Ok(_) => {}
                Err(e) => {
                    if let Some((path, _)) = self.current.take() {
                        self.skip(path, e);
                    }
                }
            }
        }
    }
}
