pub mod engine;
pub mod event;
pub mod guard;
pub mod page;
pub mod pipeline;

pub use crate::domain::model::{
    EventOutcome, ReplayReport, ReplayResult, ReplaySummary, TraceMeta, TraceRecord,
};
pub use crate::domain::ports::{ReplayPipeline, RulesProvider, Storage};
pub use crate::utils::error::Result;
