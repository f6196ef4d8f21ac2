use crate::core::guard::{install_guard, GuardPolicy};
use crate::core::page::Page;
use crate::core::{EventOutcome, ReplayPipeline, ReplayReport, ReplayResult, ReplaySummary};
use crate::core::{RulesProvider, Storage, TraceRecord};
use crate::utils::error::{GuardError, Result};
use chrono::Utc;
use std::io::Write;
use url::Url;
use zip::write::{FileOptions, ZipWriter};

pub struct SuppressionPipeline<S: Storage, C: RulesProvider> {
    storage: S,
    config: C,
    policy: GuardPolicy,
}

impl<S: Storage, C: RulesProvider> SuppressionPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        let policy = GuardPolicy {
            block_context_menu: config.block_context_menu(),
            blocked_keys: config.blocked_keys().iter().cloned().collect(),
        };

        Self {
            storage,
            config,
            policy,
        }
    }

    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// 軌跡若帶 page_url 且設定了 expected_origin，兩者的來源必須一致
    fn check_origin(&self, records: &[TraceRecord]) -> Result<()> {
        let Some(expected) = self.config.expected_origin() else {
            return Ok(());
        };

        let expected_url = Url::parse(expected).map_err(|e| GuardError::ConfigError {
            message: format!("expected_origin is not a valid URL: {}", e),
        })?;

        for record in records {
            if let TraceRecord::Meta(meta) = record {
                if let Some(page_url) = &meta.page_url {
                    let page = Url::parse(page_url).map_err(|e| GuardError::ReplayError {
                        stage: "extract".to_string(),
                        details: format!("meta page_url is not a valid URL: {}", e),
                    })?;

                    if page.origin() != expected_url.origin() {
                        return Err(GuardError::ReplayError {
                            stage: "extract".to_string(),
                            details: format!(
                                "trace origin {} does not match expected origin {}",
                                page.origin().ascii_serialization(),
                                expected_url.origin().ascii_serialization()
                            ),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: RulesProvider> ReplayPipeline for SuppressionPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<TraceRecord>> {
        tracing::debug!("Reading event trace from: {}", self.config.trace_path());
        let raw = self.storage.read_file(self.config.trace_path()).await?;

        let text = String::from_utf8(raw).map_err(|e| GuardError::TraceParseError {
            line: 0,
            message: format!("trace is not valid UTF-8: {}", e),
        })?;

        // 逐行解析 JSONL，空行略過，行號從 1 起算
        let mut records = Vec::new();
        let mut meta_seen = false;

        for (index, line) in text.lines().enumerate() {
            let line_no = index + 1;
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let record: TraceRecord =
                serde_json::from_str(trimmed).map_err(|e| GuardError::TraceParseError {
                    line: line_no,
                    message: e.to_string(),
                })?;

            if let TraceRecord::Meta(meta) = &record {
                if meta_seen {
                    return Err(GuardError::TraceParseError {
                        line: line_no,
                        message: "duplicate meta record".to_string(),
                    });
                }
                meta_seen = true;

                if let Some(page_url) = &meta.page_url {
                    Url::parse(page_url).map_err(|e| GuardError::TraceParseError {
                        line: line_no,
                        message: format!("invalid page_url: {}", e),
                    })?;
                }
            }

            records.push(record);
        }

        self.check_origin(&records)?;

        tracing::debug!("Parsed {} trace records", records.len());
        Ok(records)
    }

    async fn transform(&self, records: Vec<TraceRecord>) -> Result<ReplayResult> {
        // 每次重播都是一次全新的頁面載入
        let mut page = Page::new();
        install_guard(&mut page, &self.policy);

        let mut meta = None;
        let mut outcomes = Vec::new();

        for record in records {
            match record {
                TraceRecord::Meta(m) => {
                    meta = Some(m);
                }
                other => {
                    if let Some((at_ms, event)) = other.into_event() {
                        let disposition = page.dispatch(&event);

                        if disposition.default_prevented {
                            tracing::debug!(
                                "🛡️ Suppressed {} ({})",
                                event.kind(),
                                event.describe()
                            );
                        }

                        outcomes.push(EventOutcome {
                            seq: outcomes.len(),
                            at_ms,
                            kind: event.kind(),
                            detail: event.describe(),
                            default_prevented: disposition.default_prevented,
                        });
                    }
                }
            }
        }

        // 產生 CSV 稽核列
        let csv_output = {
            let mut writer = csv::Writer::from_writer(Vec::new());
            for outcome in &outcomes {
                writer.serialize(outcome)?;
            }
            let bytes = writer
                .into_inner()
                .map_err(|e| GuardError::ReplayError {
                    stage: "transform".to_string(),
                    details: format!("CSV writer error: {}", e),
                })?;
            String::from_utf8(bytes).map_err(|e| GuardError::ReplayError {
                stage: "transform".to_string(),
                details: format!("CSV output is not valid UTF-8: {}", e),
            })?
        };

        let suppressed = outcomes
            .iter()
            .filter(|o| o.default_prevented)
            .cloned()
            .collect();

        Ok(ReplayResult {
            outcomes,
            suppressed,
            csv_output,
            meta,
        })
    }

    async fn load(&self, result: ReplayResult) -> Result<String> {
        let output_path = format!("{}/guard_report.zip", self.config.output_path());

        let report = ReplayReport {
            generated_at: Utc::now(),
            meta: result.meta.clone(),
            summary: ReplaySummary::from_outcomes(&result.outcomes),
            outcomes: result.outcomes,
        };

        tracing::debug!(
            "Creating report bundle with {} files",
            2 + usize::from(!result.suppressed.is_empty())
        );

        // 建立 ZIP 報表包
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

            zip.start_file::<_, ()>("report.csv", FileOptions::default())?;
            zip.write_all(result.csv_output.as_bytes())?;

            zip.start_file::<_, ()>("report.json", FileOptions::default())?;
            let json_data = serde_json::to_string_pretty(&report)?;
            zip.write_all(json_data.as_bytes())?;

            // 只有攔下事件時才寫 suppressed.json
            if !result.suppressed.is_empty() {
                zip.start_file::<_, ()>("suppressed.json", FileOptions::default())?;
                let json_data = serde_json::to_string_pretty(&result.suppressed)?;
                zip.write_all(json_data.as_bytes())?;
            }

            // 關閉壓縮流並取回底層 Vec<u8>
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        tracing::debug!("Writing report bundle ({} bytes) to storage", zip_data.len());
        self.storage.write_file("guard_report.zip", &zip_data).await?;

        tracing::debug!("Report bundle saved successfully");
        Ok(output_path)
    }
}
