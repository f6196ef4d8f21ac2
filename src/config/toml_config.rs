use crate::core::guard::DEFAULT_BLOCKED_KEYS;
use crate::core::RulesProvider;
use crate::utils::error::{GuardError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub trace: TraceConfig,
    #[serde(default)]
    pub report: ReportConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    pub monitor: Option<MonitorConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceConfig {
    #[serde(default = "default_trace_path")]
    pub path: String,
    pub expected_origin: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyConfig {
    #[serde(default = "default_blocked_keys")]
    pub blocked_keys: Vec<String>,
    #[serde(default = "default_block_context_menu")]
    pub block_context_menu: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    pub enabled: bool,
}

fn default_trace_path() -> String {
    "./trace.jsonl".to_string()
}

fn default_output_path() -> String {
    "./output".to_string()
}

fn default_blocked_keys() -> Vec<String> {
    DEFAULT_BLOCKED_KEYS.iter().map(|k| k.to_string()).collect()
}

fn default_block_context_menu() -> bool {
    true
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            path: default_trace_path(),
            expected_origin: None,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
        }
    }
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            blocked_keys: default_blocked_keys(),
            block_context_menu: default_block_context_menu(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GuardError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| GuardError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TRACE_DIR})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("trace.path", &self.trace.path)?;
        validation::validate_file_extension("trace.path", &self.trace.path, &["jsonl", "ndjson"])?;
        validation::validate_path("report.output_path", &self.report.output_path)?;
        validation::validate_key_list("policy.blocked_keys", &self.policy.blocked_keys)?;

        if let Some(origin) = &self.trace.expected_origin {
            validation::validate_url("trace.expected_origin", origin)?;
        }

        Ok(())
    }

    /// 取得監控設定
    pub fn monitoring_enabled(&self) -> bool {
        self.monitor.as_ref().map(|m| m.enabled).unwrap_or(false)
    }
}

impl RulesProvider for TomlConfig {
    fn trace_path(&self) -> &str {
        &self.trace.path
    }

    fn output_path(&self) -> &str {
        &self.report.output_path
    }

    fn blocked_keys(&self) -> &[String] {
        &self.policy.blocked_keys
    }

    fn block_context_menu(&self) -> bool {
        self.policy.block_context_menu
    }

    fn expected_origin(&self) -> Option<&str> {
        self.trace.expected_origin.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
