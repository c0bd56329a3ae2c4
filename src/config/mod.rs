pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use crate::core::reader::DEFAULT_CHUNK_SIZE;
    use crate::core::sinks::DEFAULT_OUTPUT_FILE;
    use crate::domain::model::OutputMode;
    use crate::domain::ports::ConfigProvider;
    use crate::utils::error::Result;
    use crate::utils::validation::{self, Validate};
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "txn-feed")]
    #[command(about = "Convert delimited transaction files into nested JSON documents")]
    pub struct CliConfig {
        /// Load settings from a TOML job file instead of the flags below
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(long, value_enum, default_value_t = OutputMode::Stream)]
        pub mode: OutputMode,

        #[arg(
            long = "files",
            value_delimiter = ',',
            default_values = [
                "fraudTrain_part_01.csv",
                "fraudTrain_part_02.csv",
                "fraudTrain_part_03.csv",
                "fraudTrain_part_04.csv",
            ]
        )]
        pub source_files: Vec<String>,

        #[arg(
            long,
            value_delimiter = ',',
            default_values = [
                "trans_num",
                "cc_num",
                "trans_date_trans_time",
                "unix_time",
                "amt",
                "merchant",
                "category",
                "merch_lat",
                "merch_long",
            ]
        )]
        pub required_fields: Vec<String>,

        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        pub chunk_size: usize,

        #[arg(long, default_value_t = ',')]
        pub delimiter: char,

        /// Output file for batch mode
        #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
        pub output: String,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,

        #[arg(long, help = "Log memory and CPU usage per phase")]
        pub monitor: bool,
    }

    impl ConfigProvider for CliConfig {
        fn source_files(&self) -> &[String] {
            &self.source_files
        }

        fn required_fields(&self) -> &[String] {
            &self.required_fields
        }

        fn chunk_size(&self) -> usize {
            self.chunk_size
        }

        fn delimiter(&self) -> u8 {
            self.delimiter as u8
        }

        fn output_mode(&self) -> OutputMode {
            self.mode
        }

        fn output_path(&self) -> &str {
            &self.output
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validation::validate_source_files("files", &self.source_files)?;
            validation::validate_required_fields("required_fields", &self.required_fields)?;
            validation::validate_positive_number("chunk_size", self.chunk_size, 1)?;
            validation::validate_delimiter("delimiter", self.delimiter)?;
            if self.mode == OutputMode::Batch {
                validation::validate_path("output", &self.output)?;
            }
            Ok(())
        }
    }

}
