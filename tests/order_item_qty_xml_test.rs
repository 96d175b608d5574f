use anyhow::Result;
use magento_qty_xml::{decode, encode, CodecOptions, OrderItemIdQty, OrderItemIdQtyArray};

fn sample_values() -> Vec<(i32, f64)> {
    vec![
        (0, 0.0),
        (1042, 3.5),
        (-1, -0.0),
        (i32::MAX, f64::MAX),
        (i32::MIN, f64::MIN_POSITIVE),
        (7, 0.1 + 0.2),
        (99, 1e-300),
        (12, 123456789.123),
        (3, f64::INFINITY),
        (4, f64::NEG_INFINITY),
        (5, f64::EPSILON),
    ]
}

/// 編碼後再解碼應得到相同的欄位值
#[test]
fn test_round_trip_preserves_values() -> Result<()> {
    for (id, qty) in sample_values() {
        let original = OrderItemIdQty::new(id, qty);
        let decoded = OrderItemIdQty::from_xml(&original.to_xml()?)?;
        assert_eq!(decoded.order_item_id(), id);
        assert_eq!(decoded.qty().to_bits(), qty.to_bits(), "qty {} changed", qty);
    }
    Ok(())
}

#[test]
fn test_round_trip_nan() -> Result<()> {
    let xml = OrderItemIdQty::new(1, f64::NAN).to_xml()?;
    assert!(xml.contains("<qty>NaN</qty>"));
    assert!(OrderItemIdQty::from_xml(&xml)?.qty().is_nan());
    Ok(())
}

#[test]
fn test_order_item_id_precedes_qty() -> Result<()> {
    for (id, qty) in sample_values() {
        let xml = OrderItemIdQty::new(id, qty).to_xml()?;
        let id_at = xml.find("<order_item_id>").expect("order_item_id written");
        let qty_at = xml.find("<qty>").expect("qty written");
        assert!(id_at < qty_at, "{}", xml);
        assert!(!xml.contains('='), "no attributes expected: {}", xml);
    }
    Ok(())
}

#[test]
fn test_documented_examples() -> Result<()> {
    let mut item = OrderItemIdQty::default();
    item.set_order_item_id(1042);
    item.set_qty(3.5);
    assert_eq!(
        item.to_xml()?,
        "<orderItemIdQty><order_item_id>1042</order_item_id><qty>3.5</qty></orderItemIdQty>"
    );

    let decoded = OrderItemIdQty::from_xml(
        "<orderItemIdQty><order_item_id>7</order_item_id><qty>0.0</qty></orderItemIdQty>",
    )?;
    assert_eq!(decoded.order_item_id(), 7);
    assert_eq!(decoded.qty(), 0.0);
    Ok(())
}

#[test]
fn test_new_instance_is_zeroed() {
    let item = OrderItemIdQty::default();
    assert_eq!(item.order_item_id(), 0);
    assert_eq!(item.qty(), 0.0);
}

#[test]
fn test_fields_are_independent() {
    let mut item = OrderItemIdQty::new(10, 1.5);
    for (id, qty) in sample_values() {
        let before_qty = item.qty();
        item.set_order_item_id(id);
        assert_eq!(item.qty().to_bits(), before_qty.to_bits());

        let before_id = item.order_item_id();
        item.set_qty(qty);
        assert_eq!(item.order_item_id(), before_id);
    }
}

#[test]
fn test_array_round_trip_with_declaration() -> Result<()> {
    let options = CodecOptions {
        indent: 4,
        xml_declaration: true,
        ..CodecOptions::default()
    };
    let array: OrderItemIdQtyArray = sample_values().into_iter().map(OrderItemIdQty::from).collect();

    let xml = encode(&array, OrderItemIdQtyArray::TYPE_NAME, &options)?;
    assert_eq!(xml.matches("<complexObjectArray>").count(), array.len());

    let decoded: OrderItemIdQtyArray = decode(&xml, OrderItemIdQtyArray::TYPE_NAME, &options)?;
    assert_eq!(decoded, array);
    Ok(())
}
