pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::core::{ConfigProvider, Direction};
#[cfg(feature = "cli")]
use crate::domain::ports::{CodecOptions, UnknownElementPolicy};
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use toml_config::{CodecConfig, TomlConfig};

pub const DEFAULT_OUTPUT_PATH: &str = "./output";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "magento-qty-xml")]
#[command(about = "Convert Magento orderItemIdQty documents between JSON and XML")]
pub struct CliConfig {
    #[arg(long, help = "Input file: .json when encoding, .xml when decoding")]
    pub input: Option<String>,

    #[arg(long, value_enum, help = "Conversion direction [default: encode]")]
    pub direction: Option<Direction>,

    #[arg(long, help = "Output directory [default: ./output]")]
    pub output_path: Option<String>,

    #[arg(long, help = "Output file name, defaults to the input name with a new extension")]
    pub output_file: Option<String>,

    #[arg(long, help = "Root element of a single record [default: orderItemIdQty]")]
    pub root_element: Option<String>,

    #[arg(long, help = "Indent width for XML output, 0 for compact [default: 0]")]
    pub indent: Option<usize>,

    #[arg(long, help = "Write an XML declaration")]
    pub xml_declaration: bool,

    #[arg(long, help = "Skip unknown elements instead of failing")]
    pub ignore_unknown: bool,

    #[arg(short, long, help = "TOML configuration file; flags given here override it")]
    pub config: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or_default()
    }

    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn output_file(&self) -> Option<&str> {
        self.output_file.as_deref()
    }

    fn direction(&self) -> Direction {
        self.direction.unwrap_or(Direction::Encode)
    }

    fn codec_options(&self) -> CodecOptions {
        let defaults = CodecOptions::default();
        CodecOptions {
            root_element: self.root_element.clone().unwrap_or(defaults.root_element),
            indent: self.indent.unwrap_or(defaults.indent),
            xml_declaration: self.xml_declaration,
            unknown_elements: if self.ignore_unknown {
                UnknownElementPolicy::Ignore
            } else {
                UnknownElementPolicy::Reject
            },
        }
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        let input = validation::validate_required_field("input", &self.input)?;
        validation::validate_path("input", input)?;
        validation::validate_file_extension("input", input, &[self.direction().input_extension()])?;
        validation::validate_path("output_path", self.output_path())?;
        let options = self.codec_options();
        validation::validate_element_name("root_element", &options.root_element)?;
        validation::validate_range("indent", options.indent, 0, toml_config::MAX_INDENT)?;
        Ok(())
    }
}

#[cfg(feature = "cli")]
impl TomlConfig {
    /// 命令列旗標覆蓋 TOML 設定，只套用有指定的旗標
    pub fn apply_cli_overrides(&mut self, cli: &CliConfig) {
        if let Some(input) = &cli.input {
            self.conversion.input = input.clone();
        }
        if let Some(direction) = cli.direction {
            self.conversion.direction = direction;
        }
        if let Some(output_path) = &cli.output_path {
            self.conversion.output_path = output_path.clone();
        }
        if let Some(output_file) = &cli.output_file {
            self.conversion.output_file = Some(output_file.clone());
        }

        let codec = self.codec.get_or_insert_with(CodecConfig::default);
        if let Some(root_element) = &cli.root_element {
            codec.root_element = Some(root_element.clone());
        }
        if let Some(indent) = cli.indent {
            codec.indent = Some(indent);
        }
        if cli.ignore_unknown {
            codec.unknown_elements = Some(UnknownElementPolicy::Ignore);
        }
        if cli.xml_declaration {
            codec.xml_declaration = Some(true);
        }
    }
}
