use crate::core::{ConfigProvider, Direction};
use crate::domain::ports::{CodecOptions, UnknownElementPolicy};
use crate::utils::error::{BindError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").unwrap());

pub const MAX_INDENT: usize = 8;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub conversion: ConversionConfig,
    pub codec: Option<CodecConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversionConfig {
    pub direction: Direction,
    pub input: String,
    pub output_path: String,
    pub output_file: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CodecConfig {
    pub root_element: Option<String>,
    pub indent: Option<usize>,
    pub xml_declaration: Option<bool>,
    pub unknown_elements: Option<UnknownElementPolicy>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(|e| BindError::ConfigError {
            message: format!("cannot read '{}': {}", path.as_ref().display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| BindError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${INPUT_DIR})，未定義的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_path("conversion.input", &self.conversion.input)?;
        validation::validate_file_extension(
            "conversion.input",
            &self.conversion.input,
            &[self.conversion.direction.input_extension()],
        )?;
        validation::validate_path("conversion.output_path", &self.conversion.output_path)?;

        if let Some(output_file) = &self.conversion.output_file {
            validation::validate_non_empty_string("conversion.output_file", output_file)?;
        }

        if let Some(codec) = &self.codec {
            if let Some(root) = &codec.root_element {
                validation::validate_element_name("codec.root_element", root)?;
            }
            if let Some(indent) = codec.indent {
                validation::validate_range("codec.indent", indent, 0, MAX_INDENT)?;
            }
        }

        Ok(())
    }

    fn codec(&self) -> CodecConfig {
        self.codec.clone().unwrap_or_default()
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.conversion.input
    }

    fn output_path(&self) -> &str {
        &self.conversion.output_path
    }

    fn output_file(&self) -> Option<&str> {
        self.conversion.output_file.as_deref()
    }

    fn direction(&self) -> Direction {
        self.conversion.direction
    }

    fn codec_options(&self) -> CodecOptions {
        let codec = self.codec();
        let defaults = CodecOptions::default();
        CodecOptions {
            root_element: codec.root_element.unwrap_or(defaults.root_element),
            indent: codec.indent.unwrap_or(defaults.indent),
            xml_declaration: codec.xml_declaration.unwrap_or(defaults.xml_declaration),
            unknown_elements: codec.unknown_elements.unwrap_or(defaults.unknown_elements),
        }
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
