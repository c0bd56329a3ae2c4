use crate::domain::model::SourceRow;
use crate::utils::error::{EtlError, Result};
use csv::{ReaderBuilder, StringRecord};
use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

pub const DEFAULT_CHUNK_SIZE: usize = 10_000;

/// Reads a delimited source file chunk by chunk, keeping only the required columns.
///
/// At most `chunk_size` rows are held at once. Rows are parsed one chunk at a
/// time: if any row of a chunk fails to parse, the whole chunk is dropped and
/// the reader stops, leaving the caller to skip the rest of the file.
pub struct ChunkedCsvReader<R: Read> {
    source: String,
    reader: csv::Reader<R>,
    projection: Vec<usize>,
    headers: StringRecord,
    record: StringRecord,
    chunk_size: usize,
    rows_read: usize,
    finished: bool,
}

impl ChunkedCsvReader<File> {
    pub fn open(
        path: &Path,
        required_fields: &[String],
        chunk_size: usize,
        delimiter: u8,
    ) -> Result<Self> {
        let source = path.display().to_string();
        let file = File::open(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => EtlError::MissingSource {
                path: source.clone(),
            },
            _ => EtlError::SourceReadError {
                path: source.clone(),
                message: e.to_string(),
            },
        })?;

        Self::from_reader(source, file, required_fields, chunk_size, delimiter)
    }
}

impl<R: Read> ChunkedCsvReader<R> {
    pub fn from_reader(
        source: impl Into<String>,
        input: R,
        required_fields: &[String],
        chunk_size: usize,
        delimiter: u8,
    ) -> Result<Self> {
        let source = source.into();
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .from_reader(input);

        let file_headers = reader
            .headers()
            .map_err(|e| read_error(&source, e.to_string()))?
            .clone();

        // 依欄位名稱投影，檔案中的欄位順序不影響結果
        let mut projection = Vec::with_capacity(required_fields.len());
        let mut missing = Vec::new();
        for field in required_fields {
            match file_headers.iter().position(|header| header == field) {
                Some(index) => projection.push(index),
                None => missing.push(field.as_str()),
            }
        }

        if !missing.is_empty() {
            return Err(read_error(
                &source,
                format!("missing required columns: {}", missing.join(", ")),
            ));
        }

        tracing::debug!(
            "Opened '{}' with {} columns, projecting {}",
            source,
            file_headers.len(),
            projection.len()
        );

        Ok(Self {
            source,
            reader,
            projection,
            headers: StringRecord::from(required_fields.to_vec()),
            record: StringRecord::new(),
            chunk_size: chunk_size.max(1),
            rows_read: 0,
            finished: false,
        })
    }

    pub fn rows_read(&self) -> usize {
        self.rows_read
    }

    /// Clears `buffer` and refills it with the next chunk. Returns the number
    /// of rows in the chunk; zero means the file is exhausted.
    pub fn fill_chunk(&mut self, buffer: &mut VecDeque<SourceRow>) -> Result<usize> {
        buffer.clear();
        if self.finished {
            return Ok(0);
        }

        while buffer.len() < self.chunk_size {
            match self.read_row() {
                Ok(Some(row)) => buffer.push_back(row),
                Ok(None) => {
                    self.finished = true;
                    break;
                }
                Err(e) => {
                    buffer.clear();
                    self.finished = true;
                    return Err(e);
                }
            }
        }

        self.rows_read += buffer.len();
        if !buffer.is_empty() {
            tracing::debug!("Read chunk of {} rows from '{}'", buffer.len(), self.source);
        }
        Ok(buffer.len())
    }

    fn read_row(&mut self) -> Result<Option<SourceRow>> {
        let has_record = self
            .reader
            .read_record(&mut self.record)
            .map_err(|e| read_error(&self.source, e.to_string()))?;
        if !has_record {
            return Ok(None);
        }

        let projected: StringRecord = self
            .projection
            .iter()
            .map(|&index| self.record.get(index).unwrap_or(""))
            .collect();

        let row = projected.deserialize(Some(&self.headers)).map_err(|e| {
            let line = self.record.position().map(|p| p.line()).unwrap_or_default();
            read_error(&self.source, format!("line {}: {}", line, e))
        })?;

        Ok(Some(row))
    }
}

fn read_error(source: &str, message: String) -> EtlError {
    EtlError::SourceReadError {
        path: source.to_string(),
        message,
    }
}
