pub mod engine;
pub mod lexical;
pub mod pipeline;
pub mod xml_codec;

pub use crate::domain::model::{ConversionOutput, Direction, OrderItemIdQty, OrderItemIdQtyArray, QtyDocument};
pub use crate::domain::ports::{ConfigProvider, Pipeline, Storage};
pub use crate::utils::error::Result;
