use crate::core::comparison::ComparisonResult;
use crate::domain::model::{ComparisonOutput, EntitySpecs};
use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
use crate::utils::error::{CompareError, Result};
use reqwest::Client;
use std::io::Write;
use std::time::Duration;
use zip::write::{FileOptions, ZipWriter};

pub struct ComparePipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    client: Client,
}

impl<S: Storage, C: ConfigProvider> ComparePipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self {
            storage,
            config,
            client: Client::new(),
        }
    }

    async fn extract_from_files(&self) -> Result<Vec<EntitySpecs>> {
        let mut entities = Vec::new();
        for path in self.config.entity_files() {
            tracing::debug!("Reading entity extraction from: {}", path);
            let bytes = self.storage.read_file(path).await?;
            let raw: serde_json::Value = serde_json::from_slice(&bytes)?;
            entities.push(EntitySpecs::from_json(&raw)?);
        }
        Ok(entities)
    }

    async fn extract_from_endpoint(&self) -> Result<Vec<EntitySpecs>> {
        let endpoint = self.config.extractor_endpoint();
        tracing::debug!("Requesting extractions from: {}", endpoint);

        let mut request = self
            .client
            .get(endpoint)
            .timeout(Duration::from_secs(self.config.request_timeout_secs()));
        if let Some(headers) = self.config.request_headers() {
            for (name, value) in headers {
                request = request.header(name.as_str(), value.as_str());
            }
        }

        let response = request.send().await?;
        tracing::debug!("Extractor response status: {}", response.status());
        if !response.status().is_success() {
            return Err(CompareError::ExtractorError {
                message: format!("extractor returned HTTP {}", response.status()),
            });
        }

        let payload: serde_json::Value = response.json().await?;
        let mut entities = Vec::new();
        match payload {
            serde_json::Value::Array(items) => {
                for item in items {
                    entities.push(EntitySpecs::from_json(&item)?);
                }
            }
            // 單一對象視為單一實體
            single @ serde_json::Value::Object(_) => {
                entities.push(EntitySpecs::from_json(&single)?);
            }
            _ => {
                return Err(CompareError::ExtractorError {
                    message: "expected a JSON array of entity aggregates".to_string(),
                });
            }
        }
        Ok(entities)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ComparePipeline<S, C> {
    async fn extract(&self) -> Result<Vec<EntitySpecs>> {
        let entities = if self.config.entity_files().is_empty() {
            self.extract_from_endpoint().await?
        } else {
            self.extract_from_files().await?
        };

        if entities.is_empty() {
            return Err(CompareError::ExtractorError {
                message: "extractor produced no entity aggregates".to_string(),
            });
        }
        if entities.len() < 2 {
            tracing::warn!("Only one entity available, comparison will be trivial");
        }

        Ok(entities)
    }

    async fn transform(&self, entities: Vec<EntitySpecs>) -> Result<ComparisonOutput> {
        tracing::debug!("Aligning specifications for {} entities", entities.len());
        let result = ComparisonResult::from_entities(&entities)?;

        for diff in result.differences.iter() {
            tracing::debug!(
                "difference: {} / {} [{}]",
                diff.category,
                diff.specification,
                diff.standardized_unit().unwrap_or_else(|| "-".to_string())
            );
        }

        Ok(ComparisonOutput {
            generated_at: chrono::Utc::now(),
            result,
        })
    }

    async fn load(&self, output: ComparisonOutput) -> Result<String> {
        let manifest = serde_json::to_string_pretty(&output)?;
        let result = &output.result;
        let files: Vec<(&str, String)> = vec![
            ("features.csv", result.features_table.to_csv()?),
            ("advantages.csv", result.advantages_table.to_csv()?),
            ("specifications.csv", result.specs_table.to_csv()?),
            ("differences.csv", result.differences_table.to_csv()?),
            ("comparison.json", manifest),
        ];

        // 打包輸出
        let zip_data = {
            let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
            for (name, content) in &files {
                zip.start_file::<_, ()>(*name, FileOptions::default())?;
                zip.write_all(content.as_bytes())?;
            }
            let cursor = zip.finish()?;
            cursor.into_inner()
        };

        let bundle_name = self.config.bundle_name();
        tracing::debug!("Writing bundle ({} bytes) to storage", zip_data.len());
        self.storage.write_file(bundle_name, &zip_data).await?;

        Ok(format!("{}/{}", self.config.output_path(), bundle_name))
    }
}
