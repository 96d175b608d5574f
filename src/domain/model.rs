use serde::{Deserialize, Serialize};

/// Struct field to XML element name, in schema sequence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldBinding {
    pub field: &'static str,
    pub element: &'static str,
}

/// Magento `orderItemIdQty` complex type: an order line item and a quantity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderItemIdQty {
    pub order_item_id: i32,
    #[serde(with = "crate::core::lexical::json_double")]
    pub qty: f64,
}

impl OrderItemIdQty {
    pub const TYPE_NAME: &'static str = "orderItemIdQty";

    pub const FIELDS: [FieldBinding; 2] = [
        FieldBinding {
            field: "order_item_id",
            element: "order_item_id",
        },
        FieldBinding {
            field: "qty",
            element: "qty",
        },
    ];

    pub fn new(order_item_id: i32, qty: f64) -> Self {
        Self { order_item_id, qty }
    }

    pub fn order_item_id(&self) -> i32 {
        self.order_item_id
    }

    pub fn set_order_item_id(&mut self, order_item_id: i32) {
        self.order_item_id = order_item_id;
    }

    pub fn qty(&self) -> f64 {
        self.qty
    }

    pub fn set_qty(&mut self, qty: f64) {
        self.qty = qty;
    }
}

impl From<(i32, f64)> for OrderItemIdQty {
    fn from((order_item_id, qty): (i32, f64)) -> Self {
        Self::new(order_item_id, qty)
    }
}

/// Magento `orderItemIdQtyArray`: every entry is written as `<complexObjectArray>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderItemIdQtyArray {
    pub complex_object_array: Vec<OrderItemIdQty>,
}

impl OrderItemIdQtyArray {
    pub const TYPE_NAME: &'static str = "orderItemIdQtyArray";
    pub const ITEM_ELEMENT: &'static str = "complexObjectArray";

    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, item: OrderItemIdQty) {
        self.complex_object_array.push(item);
    }

    pub fn items(&self) -> &[OrderItemIdQty] {
        &self.complex_object_array
    }

    pub fn len(&self) -> usize {
        self.complex_object_array.len()
    }

    pub fn is_empty(&self) -> bool {
        self.complex_object_array.is_empty()
    }
}

impl FromIterator<OrderItemIdQty> for OrderItemIdQtyArray {
    fn from_iter<I: IntoIterator<Item = OrderItemIdQty>>(iter: I) -> Self {
        Self {
            complex_object_array: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for OrderItemIdQtyArray {
    type Item = OrderItemIdQty;
    type IntoIter = std::vec::IntoIter<OrderItemIdQty>;

    fn into_iter(self) -> Self::IntoIter {
        self.complex_object_array.into_iter()
    }
}

/// 轉換的單位：單筆或陣列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QtyDocument {
    Single(OrderItemIdQty),
    Array(OrderItemIdQtyArray),
}

impl QtyDocument {
    pub fn record_count(&self) -> usize {
        match self {
            QtyDocument::Single(_) => 1,
            QtyDocument::Array(array) => array.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Direction {
    /// JSON in, XML out
    Encode,
    /// XML in, JSON out
    Decode,
}

impl Direction {
    pub fn input_extension(&self) -> &'static str {
        match self {
            Direction::Encode => "json",
            Direction::Decode => "xml",
        }
    }

    pub fn output_extension(&self) -> &'static str {
        match self {
            Direction::Encode => "xml",
            Direction::Decode => "json",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ConversionOutput {
    pub content: String,
    pub extension: &'static str,
    pub record_count: usize,
}
