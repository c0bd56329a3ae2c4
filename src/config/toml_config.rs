use crate::core::reader::DEFAULT_CHUNK_SIZE;
use crate::core::sinks::DEFAULT_OUTPUT_FILE;
use crate::domain::model::{OutputMode, SourceRow};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A job file describing which sources to read and how to emit the documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub job: Option<JobConfig>,
    pub source: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobConfig {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub files: Vec<String>,
    #[serde(default = "SourceRow::default_required_fields")]
    pub required_fields: Vec<String>,
    pub chunk_size: Option<usize>,
    pub delimiter: Option<char>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub mode: OutputMode,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_source_files("source.files", &self.source.files)?;
        validation::validate_required_fields("source.required_fields", &self.source.required_fields)?;

        if let Some(chunk_size) = self.source.chunk_size {
            validation::validate_positive_number("source.chunk_size", chunk_size, 1)?;
        }

        if let Some(delimiter) = self.source.delimiter {
            validation::validate_delimiter("source.delimiter", delimiter)?;
        }

        if let Some(path) = &self.output.path {
            validation::validate_path("output.path", path)?;
        }

        Ok(())
    }

    pub fn job_name(&self) -> &str {
        self.job.as_ref().map(|j| j.name.as_str()).unwrap_or("txn-feed")
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn source_files(&self) -> &[String] {
        &self.source.files
    }

    fn required_fields(&self) -> &[String] {
        &self.source.required_fields
    }

    fn chunk_size(&self) -> usize {
        self.source.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE)
    }

    fn delimiter(&self) -> u8 {
        self.source.delimiter.map(|d| d as u8).unwrap_or(b',')
    }

    fn output_mode(&self) -> OutputMode {
        self.output.mode
    }

    fn output_path(&self) -> &str {
        self.output.path.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[job]
name = "fraud-feed"
description = "Replay the fraud training set"

[source]
files = ["fraudTrain_part_01.csv", "fraudTrain_part_02.csv"]
chunk_size = 5000

[output]
mode = "batch"
path = "out/transactions.json"

[monitoring]
enabled = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.job_name(), "fraud-feed");
        assert_eq!(config.source_files().len(), 2);
        assert_eq!(config.required_fields(), SourceRow::FIELDS);
        assert_eq!(config.chunk_size(), 5000);
        assert_eq!(config.delimiter(), b',');
        assert_eq!(config.output_mode(), OutputMode::Batch);
        assert_eq!(config.output_path(), "out/transactions.json");
        assert!(config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_when_sections_are_omitted() {
        let config = TomlConfig::from_toml_str(
            r#"
[source]
files = ["a.csv"]
"#,
        )
        .unwrap();

        assert_eq!(config.job_name(), "txn-feed");
        assert_eq!(config.chunk_size(), DEFAULT_CHUNK_SIZE);
        assert_eq!(config.output_mode(), OutputMode::Stream);
        assert_eq!(config.output_path(), "transactions.json");
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("TXN_FEED_TEST_DATA_DIR", "/data/fraud");

        let toml_content = r#"
[source]
files = ["${TXN_FEED_TEST_DATA_DIR}/part_01.csv", "${TXN_FEED_TEST_UNSET}/part_02.csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.source.files[0], "/data/fraud/part_01.csv");
        assert_eq!(config.source.files[1], "${TXN_FEED_TEST_UNSET}/part_02.csv");

        std::env::remove_var("TXN_FEED_TEST_DATA_DIR");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[source]
files = ["a.csv"]
required_fields = ["trans_num", "cc_num"]
chunk_size = 0
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_mode_is_a_parse_error() {
        let err = TomlConfig::from_toml_str(
            r#"
[source]
files = ["a.csv"]

[output]
mode = "parquet"
"#,
        )
        .unwrap_err();
        assert!(matches!(err, EtlError::ConfigValidationError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[job]
name = "file-test"

[source]
files = ["a.csv"]
delimiter = "|"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.job_name(), "file-test");
        assert_eq!(config.delimiter(), b'|');
    }
}
