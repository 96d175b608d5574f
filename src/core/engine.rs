use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct ConversionEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ConversionEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<String> {
        let started = Instant::now();
        tracing::info!("Starting conversion...");

        // Extract
        let raw = self.pipeline.extract().await?;
        tracing::info!("📥 Read {} bytes", raw.len());

        // Transform
        let output = self.pipeline.transform(raw).await?;
        tracing::info!(
            "🔄 Converted {} record(s) to {}",
            output.record_count,
            output.extension
        );

        // Load
        let output_path = self.pipeline.load(output).await?;
        tracing::info!(
            "📁 Output saved to: {} ({:?})",
            output_path,
            started.elapsed()
        );

        Ok(output_path)
    }
}
