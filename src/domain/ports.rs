use crate::domain::model::{ConversionOutput, Direction};
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

/// 解碼時遇到未知元素的處理方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownElementPolicy {
    #[default]
    Reject,
    Ignore,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    pub root_element: String,
    pub indent: usize,
    pub xml_declaration: bool,
    pub unknown_elements: UnknownElementPolicy,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            root_element: "orderItemIdQty".to_string(),
            indent: 0,
            xml_declaration: false,
            unknown_elements: UnknownElementPolicy::Reject,
        }
    }
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_file(&self) -> Option<&str>;
    fn direction(&self) -> Direction;
    fn codec_options(&self) -> CodecOptions;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<u8>>;
    async fn transform(&self, raw: Vec<u8>) -> Result<ConversionOutput>;
    async fn load(&self, output: ConversionOutput) -> Result<String>;
}
