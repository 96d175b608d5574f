use crate::core::xml_codec;
use crate::core::{ConfigProvider, ConversionOutput, Direction, Pipeline, QtyDocument, Storage};
use crate::utils::error::{BindError, Result};
use std::path::Path;

pub struct ConversionPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ConversionPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn output_file_name(&self, extension: &str) -> String {
        if let Some(name) = self.config.output_file() {
            return name.to_string();
        }
        let stem = Path::new(self.config.input_path())
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        format!("{}.{}", stem, extension)
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for ConversionPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<u8>> {
        tracing::debug!("Reading input from: {}", self.config.input_path());
        let raw = self.storage.read_file(self.config.input_path()).await?;
        tracing::debug!("Read {} bytes", raw.len());
        Ok(raw)
    }

    async fn transform(&self, raw: Vec<u8>) -> Result<ConversionOutput> {
        let direction = self.config.direction();
        let options = self.config.codec_options();

        let (content, record_count) = match direction {
            Direction::Encode => {
                let document: QtyDocument = serde_json::from_slice(&raw)?;
                let xml = xml_codec::encode_document(&document, &options)?;
                (xml, document.record_count())
            }
            Direction::Decode => {
                let text = String::from_utf8(raw).map_err(|e| {
                    BindError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e))
                })?;
                let document = xml_codec::decode_document(&text, &options)?;
                (serde_json::to_string_pretty(&document)?, document.record_count())
            }
        };

        tracing::debug!(?direction, record_count, "Transformed document");
        Ok(ConversionOutput {
            content,
            extension: direction.output_extension(),
            record_count,
        })
    }

    async fn load(&self, output: ConversionOutput) -> Result<String> {
        let file_name = self.output_file_name(output.extension);
        let output_path = Path::new(self.config.output_path())
            .join(file_name)
            .to_string_lossy()
            .into_owned();

        tracing::debug!("Writing {} bytes to {}", output.content.len(), output_path);
        self.storage
            .write_file(&output_path, output.content.as_bytes())
            .await?;

        Ok(output_path)
    }
}
