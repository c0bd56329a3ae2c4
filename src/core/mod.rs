pub mod etl;
pub mod reader;
pub mod sinks;
pub mod transformer;

pub use crate::domain::model::{RunSummary, SourceRow, TransactionDocument};
pub use crate::domain::ports::{ConfigProvider, DocumentSink, Storage};
pub use crate::utils::error::Result;
