use crate::domain::model::{ReplayResult, TraceRecord};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait RulesProvider: Send + Sync {
    fn trace_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn blocked_keys(&self) -> &[String];
    fn block_context_menu(&self) -> bool;
    fn expected_origin(&self) -> Option<&str>;
}

#[async_trait]
pub trait ReplayPipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<TraceRecord>>;
    async fn transform(&self, records: Vec<TraceRecord>) -> Result<ReplayResult>;
    async fn load(&self, result: ReplayResult) -> Result<String>;
}
