pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::RulesProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "copyguard")]
#[command(about = "Replay recorded page-event traces against a copy-deterrence guard")]
pub struct CliConfig {
    #[arg(long, default_value = "./trace.jsonl")]
    pub trace: String,

    #[arg(long, default_value = "./output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "c,u,s,p")]
    pub blocked_keys: Vec<String>,

    #[arg(long, help = "Leave the native context menu unblocked")]
    pub allow_context_menu: bool,

    #[arg(long, help = "Fail when the trace was captured from a different origin")]
    pub expected_origin: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Enable system monitoring")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl RulesProvider for CliConfig {
    fn trace_path(&self) -> &str {
        &self.trace
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn blocked_keys(&self) -> &[String] {
        &self.blocked_keys
    }

    fn block_context_menu(&self) -> bool {
        !self.allow_context_menu
    }

    fn expected_origin(&self) -> Option<&str> {
        self.expected_origin.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_non_empty_string("trace", &self.trace)?;
        validation::validate_file_extension("trace", &self.trace, &["jsonl", "ndjson"])?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_key_list("blocked_keys", &self.blocked_keys)?;

        if let Some(origin) = &self.expected_origin {
            validation::validate_url("expected_origin", origin)?;
        }

        Ok(())
    }
}
