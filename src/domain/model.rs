use crate::core::event::{EventKind, InputEvent, KeyInput, PointerInput};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 事件軌跡的中繼資料，每份軌跡最多一行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub captured_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
}

/// JSONL 軌跡的一行；kind 使用 DOM 事件名稱
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TraceRecord {
    Meta(TraceMeta),
    ContextMenu {
        at_ms: u64,
        #[serde(flatten)]
        pointer: PointerInput,
    },
    KeyDown {
        at_ms: u64,
        #[serde(flatten)]
        input: KeyInput,
    },
    KeyUp {
        at_ms: u64,
        #[serde(flatten)]
        input: KeyInput,
    },
    Click {
        at_ms: u64,
        #[serde(flatten)]
        pointer: PointerInput,
    },
}

impl TraceRecord {
    /// Meta 行回傳 None，事件行轉成可派送的事件
    pub fn into_event(self) -> Option<(u64, InputEvent)> {
        match self {
            TraceRecord::Meta(_) => None,
            TraceRecord::ContextMenu { at_ms, pointer } => {
                Some((at_ms, InputEvent::ContextMenu(pointer)))
            }
            TraceRecord::KeyDown { at_ms, input } => Some((at_ms, InputEvent::KeyDown(input))),
            TraceRecord::KeyUp { at_ms, input } => Some((at_ms, InputEvent::KeyUp(input))),
            TraceRecord::Click { at_ms, pointer } => Some((at_ms, InputEvent::Click(pointer))),
        }
    }
}

/// 稽核報表的一列：一個事件與其處置結果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventOutcome {
    pub seq: usize,
    pub at_ms: u64,
    pub kind: EventKind,
    pub detail: String,
    pub default_prevented: bool,
}

#[derive(Debug, Clone)]
pub struct ReplayResult {
    pub outcomes: Vec<EventOutcome>,
    pub suppressed: Vec<EventOutcome>,
    pub csv_output: String,
    pub meta: Option<TraceMeta>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReplaySummary {
    pub total_events: usize,
    pub suppressed: usize,
    pub context_menu_blocked: usize,
    pub shortcuts_blocked: usize,
    pub passed_through: usize,
}

impl ReplaySummary {
    pub fn from_outcomes(outcomes: &[EventOutcome]) -> Self {
        let mut summary = Self {
            total_events: outcomes.len(),
            ..Self::default()
        };

        for outcome in outcomes {
            if outcome.default_prevented {
                summary.suppressed += 1;
                match outcome.kind {
                    EventKind::ContextMenu => summary.context_menu_blocked += 1,
                    EventKind::KeyDown => summary.shortcuts_blocked += 1,
                    _ => {}
                }
            } else {
                summary.passed_through += 1;
            }
        }

        summary
    }
}

/// report.json 的完整內容
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayReport {
    pub generated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<TraceMeta>,
    pub summary: ReplaySummary,
    pub outcomes: Vec<EventOutcome>,
}
