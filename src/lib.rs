pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::{cli::LocalStorage, toml_config::TomlConfig};

pub use crate::core::{
    engine::ConversionEngine,
    pipeline::ConversionPipeline,
    xml_codec::{decode, decode_document, encode, encode_document, XmlBinding},
};
pub use crate::domain::model::{Direction, FieldBinding, OrderItemIdQty, OrderItemIdQtyArray, QtyDocument};
pub use crate::domain::ports::{CodecOptions, UnknownElementPolicy};
pub use crate::utils::error::{BindError, Result};
