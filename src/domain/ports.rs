use crate::domain::model::{ComparisonOutput, EntitySpecs};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn extractor_endpoint(&self) -> &str;
    fn output_path(&self) -> &str;
    /// Pre-extracted aggregate files. When non-empty, the pipeline reads
    /// these instead of calling the extractor endpoint.
    fn entity_files(&self) -> &[String];
    fn request_timeout_secs(&self) -> u64;
    fn request_headers(&self) -> Option<&HashMap<String, String>> {
        None
    }
    fn bundle_name(&self) -> &str {
        "comparison_output.zip"
    }
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<EntitySpecs>>;
    async fn transform(&self, entities: Vec<EntitySpecs>) -> Result<ComparisonOutput>;
    async fn load(&self, output: ComparisonOutput) -> Result<String>;
}
