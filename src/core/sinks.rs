use crate::domain::model::TransactionDocument;
use crate::domain::ports::{DocumentSink, SinkOutcome, Storage};
use crate::utils::error::{EtlError, Result};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::io::{self, Write};

pub const DEFAULT_OUTPUT_FILE: &str = "transactions.json";

const INDENT: &[u8] = b"    ";

/// 以四個空白縮排輸出 JSON
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::with_capacity(256);
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(INDENT));
    value.serialize(&mut serializer)?;
    Ok(out)
}

/// Writes every document to the wrapped writer as soon as it is produced.
pub struct StreamSink<W: Write> {
    out: W,
}

impl StreamSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> StreamSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DocumentSink for StreamSink<W> {
    fn consume<I>(&mut self, documents: I) -> Result<SinkOutcome>
    where
        I: Iterator<Item = TransactionDocument>,
    {
        let mut count = 0;
        for document in documents {
            let rendered = to_pretty_json(&document)?;
            self.out.write_all(&rendered)?;
            self.out.write_all(b"\n")?;
            self.out.flush()?;
            count += 1;
        }

        Ok(SinkOutcome {
            documents: count,
            output_path: None,
        })
    }
}

/// Collects every document, then writes them once as a JSON array.
pub struct BatchSink<S: Storage> {
    storage: S,
    output_path: String,
}

impl<S: Storage> BatchSink<S> {
    pub fn new(storage: S, output_path: impl Into<String>) -> Self {
        Self {
            storage,
            output_path: output_path.into(),
        }
    }
}

impl<S: Storage> DocumentSink for BatchSink<S> {
    fn consume<I>(&mut self, documents: I) -> Result<SinkOutcome>
    where
        I: Iterator<Item = TransactionDocument>,
    {
        let all: Vec<TransactionDocument> = documents.collect();
        tracing::info!("📦 Total transactions collected: {}", all.len());

        // 先完整序列化，寫檔失敗時不會留下半個檔案
        let payload = to_pretty_json(&all).map_err(|e| EtlError::OutputWriteError {
            path: self.output_path.clone(),
            message: e.to_string(),
        })?;

        tracing::debug!(
            "Writing {} bytes to '{}'",
            payload.len(),
            self.output_path
        );

        let written = self
            .storage
            .write_file(&self.output_path, &payload)
            .map_err(|e| match e {
                EtlError::OutputWriteError { .. } => e,
                other => EtlError::OutputWriteError {
                    path: self.output_path.clone(),
                    message: other.to_string(),
                },
            });

        let written = match written {
            Ok(path) => path,
            Err(e) => {
                tracing::error!("❌ {}", e);
                return Err(e);
            }
        };

        tracing::info!("💾 Saved {} transactions to '{}'", all.len(), written);
        Ok(SinkOutcome {
            documents: all.len(),
            output_path: Some(written),
        })
    }
}
