use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// 文件固定使用的幣別
pub const CURRENCY: &str = "USD";

/// A numeric cell passed through as read.
///
/// Cells that parse as numbers become JSON numbers, empty cells become
/// `null`, and anything else is kept as the original text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Int(i64),
    Float(f64),
    Text(String),
    Null,
}

impl Numeric {
    /// 整數欄位：先試整數，再試浮點數
    pub fn parse_integer(raw: &str) -> Self {
        match raw.trim().parse::<i64>() {
            Ok(value) => Numeric::Int(value),
            Err(_) => Self::parse_float(raw),
        }
    }

    pub fn parse_float(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Numeric::Null;
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Numeric::Float(value),
            // NaN and infinities have no JSON form
            Ok(_) => Numeric::Null,
            Err(_) => Numeric::Text(raw.to_string()),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Numeric::Int(value) => Some(*value as f64),
            Numeric::Float(value) => Some(*value),
            Numeric::Text(_) | Numeric::Null => None,
        }
    }
}

fn integer_cell<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Numeric, D::Error> {
    String::deserialize(deserializer).map(|raw| Numeric::parse_integer(&raw))
}

fn float_cell<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Numeric, D::Error> {
    String::deserialize(deserializer).map(|raw| Numeric::parse_float(&raw))
}

/// One flat row of a source file, restricted to the columns the mapping reads.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceRow {
    pub trans_num: String,
    pub cc_num: String,
    pub trans_date_trans_time: String,
    #[serde(deserialize_with = "integer_cell")]
    pub unix_time: Numeric,
    #[serde(deserialize_with = "float_cell")]
    pub amt: Numeric,
    pub merchant: String,
    pub category: String,
    #[serde(deserialize_with = "float_cell")]
    pub merch_lat: Numeric,
    #[serde(deserialize_with = "float_cell")]
    pub merch_long: Numeric,
}

impl SourceRow {
    pub const FIELDS: [&'static str; 9] = [
        "trans_num",
        "cc_num",
        "trans_date_trans_time",
        "unix_time",
        "amt",
        "merchant",
        "category",
        "merch_lat",
        "merch_long",
    ];

    pub fn default_required_fields() -> Vec<String> {
        Self::FIELDS.iter().map(|f| f.to_string()).collect()
    }
}

/// 卡號以整數的十進位字串表示；無法解析時保留去除空白後的原文
fn card_number_text(raw: &str) -> String {
    let trimmed = raw.trim();
    match trimmed.parse::<i128>() {
        Ok(number) => number.to_string(),
        Err(_) => trimmed.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDocument {
    pub transaction_id: String,
    pub customer_id: String,
    pub transaction_details: TransactionDetails,
    pub merchant_info: MerchantInfo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDetails {
    pub timestamp_utc: String,
    pub unix_timestamp: Numeric,
    pub amount: Numeric,
    pub currency: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MerchantInfo {
    pub name: String,
    pub category: String,
    pub location: Location,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: Numeric,
    pub longitude: Numeric,
}

impl From<SourceRow> for TransactionDocument {
    fn from(row: SourceRow) -> Self {
        Self {
            transaction_id: row.trans_num,
            customer_id: card_number_text(&row.cc_num),
            transaction_details: TransactionDetails {
                timestamp_utc: row.trans_date_trans_time,
                unix_timestamp: row.unix_time,
                amount: row.amt,
                currency: CURRENCY.to_string(),
            },
            merchant_info: MerchantInfo {
                name: row.merchant,
                category: row.category,
                location: Location {
                    latitude: row.merch_lat,
                    longitude: row.merch_long,
                },
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Print each transaction as soon as it is read
    #[default]
    Stream,
    /// Collect every transaction and write one JSON array
    Batch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedSource {
    pub path: PathBuf,
    pub reason: String,
}

/// Which source files contributed documents and which were skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceReport {
    pub files_read: Vec<(PathBuf, usize)>,
    pub files_skipped: Vec<SkippedSource>,
}

impl SourceReport {
    pub fn rows_read(&self) -> usize {
        self.files_read.iter().map(|(_, rows)| rows).sum()
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub documents: usize,
    pub output_path: Option<String>,
    pub sources: SourceReport,
}
