//! Explicit element mapping between the binding records and their XML shape.
//!
//! Encoding always emits the schema sequence order. Decoding matches on
//! local names, so namespace prefixes used by SOAP responses are accepted.

use crate::core::lexical;
use crate::domain::model::{FieldBinding, OrderItemIdQty, OrderItemIdQtyArray, QtyDocument};
use crate::domain::ports::{CodecOptions, UnknownElementPolicy};
use crate::utils::error::{BindError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::Write;

pub trait XmlBinding: Sized {
    /// Writes the children of the element; the caller writes the element itself.
    fn write_content<W: Write>(&self, writer: &mut ElementWriter<W>) -> Result<()>;

    /// Reads children up to and including the end tag of the entered element.
    fn read_content(reader: &mut ElementReader<'_>) -> Result<Self>;
}

pub struct ElementWriter<W: Write> {
    writer: Writer<W>,
}

impl<W: Write> ElementWriter<W> {
    pub fn new(inner: W, indent: usize) -> Self {
        let writer = if indent > 0 {
            Writer::new_with_indent(inner, b' ', indent)
        } else {
            Writer::new(inner)
        };
        Self { writer }
    }

    pub fn declaration(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    pub fn start(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::Start(BytesStart::new(name)))?;
        Ok(())
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.writer.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    pub fn text_element(&mut self, name: &str, text: &str) -> Result<()> {
        self.start(name)?;
        self.writer.write_event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    pub fn element<T: XmlBinding>(&mut self, name: &str, value: &T) -> Result<()> {
        self.start(name)?;
        value.write_content(self)?;
        self.end(name)
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildElement {
    pub name: String,
    pub is_empty: bool,
}

pub struct ElementReader<'a> {
    reader: Reader<&'a [u8]>,
    policy: UnknownElementPolicy,
    // set when the entered element was self-closing
    pending_end: bool,
}

impl<'a> ElementReader<'a> {
    pub fn new(xml: &'a str, policy: UnknownElementPolicy) -> Self {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);
        Self {
            reader,
            policy,
            pending_end: false,
        }
    }

    pub fn position(&self) -> usize {
        self.reader.buffer_position()
    }

    fn violation(&self, message: impl Into<String>) -> BindError {
        BindError::schema_violation(message, self.position())
    }

    fn local_name(&self, bytes: &[u8]) -> Result<String> {
        std::str::from_utf8(bytes)
            .map(str::to_string)
            .map_err(|e| self.violation(format!("element name is not valid UTF-8: {}", e)))
    }

    fn next_event(&mut self) -> Result<Event<'a>> {
        loop {
            match self.reader.read_event()? {
                Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => continue,
                Event::Text(text) if text.iter().all(u8::is_ascii_whitespace) => continue,
                event => return Ok(event),
            }
        }
    }

    pub fn read_root(&mut self) -> Result<ChildElement> {
        match self.next_event()? {
            Event::Start(e) => Ok(ChildElement {
                name: self.local_name(e.local_name().as_ref())?,
                is_empty: false,
            }),
            Event::Empty(e) => Ok(ChildElement {
                name: self.local_name(e.local_name().as_ref())?,
                is_empty: true,
            }),
            Event::Eof => Err(self.violation("document has no root element")),
            _ => Err(self.violation("unexpected content before the root element")),
        }
    }

    /// Positions the reader inside `element` so `read_content` can consume it.
    pub fn enter(&mut self, element: &ChildElement) {
        self.pending_end = element.is_empty;
    }

    /// Next child start tag, or `None` once the enclosing element's end tag is consumed.
    pub fn next_child(&mut self) -> Result<Option<ChildElement>> {
        if self.pending_end {
            self.pending_end = false;
            return Ok(None);
        }
        match self.next_event()? {
            Event::Start(e) => Ok(Some(ChildElement {
                name: self.local_name(e.local_name().as_ref())?,
                is_empty: false,
            })),
            Event::Empty(e) => Ok(Some(ChildElement {
                name: self.local_name(e.local_name().as_ref())?,
                is_empty: true,
            })),
            Event::End(_) => Ok(None),
            Event::Text(_) | Event::CData(_) => {
                Err(self.violation("unexpected character data between elements"))
            }
            Event::Eof => Err(self.violation("unexpected end of document")),
            _ => Err(self.violation("unexpected markup between elements")),
        }
    }

    pub fn read_text(&mut self, element: &ChildElement) -> Result<String> {
        if element.is_empty {
            return Ok(String::new());
        }
        let mut text = String::new();
        loop {
            match self.next_event()? {
                Event::Text(t) => text.push_str(&t.unescape()?),
                Event::CData(c) => {
                    let bytes = c.into_inner();
                    let chunk = std::str::from_utf8(&bytes)
                        .map_err(|e| self.violation(format!("CDATA is not valid UTF-8: {}", e)))?;
                    text.push_str(chunk);
                }
                Event::End(_) => return Ok(text),
                Event::Start(e) | Event::Empty(e) => {
                    let nested = self.local_name(e.local_name().as_ref())?;
                    return Err(self.violation(format!(
                        "<{}> must contain only text, found nested <{}>",
                        element.name, nested
                    )));
                }
                Event::Eof => return Err(self.violation("unexpected end of document")),
                _ => return Err(self.violation(format!("unexpected markup inside <{}>", element.name))),
            }
        }
    }

    pub fn skip(&mut self, element: &ChildElement) -> Result<()> {
        if element.is_empty {
            return Ok(());
        }
        let mut depth = 1usize;
        while depth > 0 {
            match self.reader.read_event()? {
                Event::Start(_) => depth += 1,
                Event::End(_) => depth -= 1,
                Event::Eof => return Err(self.violation("unexpected end of document")),
                _ => {}
            }
        }
        Ok(())
    }

    pub fn unknown(&mut self, element: &ChildElement) -> Result<()> {
        match self.policy {
            UnknownElementPolicy::Reject => {
                Err(self.violation(format!("unexpected element <{}>", element.name)))
            }
            UnknownElementPolicy::Ignore => {
                tracing::debug!(element = %element.name, "skipping unknown element");
                self.skip(element)
            }
        }
    }

    /// 依照序列順序讀取一個必要欄位
    pub fn read_field<T>(
        &mut self,
        fields: &[FieldBinding],
        element: &str,
        parse: fn(&str, &str) -> Result<T>,
    ) -> Result<T> {
        loop {
            let child = match self.next_child()? {
                Some(child) => child,
                None => return Err(self.violation(format!("missing required element <{}>", element))),
            };
            if child.name == element {
                let text = self.read_text(&child)?;
                return parse(element, &text);
            }
            if fields.iter().any(|f| f.element == child.name) {
                return Err(self.violation(format!(
                    "element <{}> is out of order or repeated, expected <{}>",
                    child.name, element
                )));
            }
            self.unknown(&child)?;
        }
    }

    /// 讀完目前元素剩下的子元素
    pub fn finish(&mut self, fields: &[FieldBinding]) -> Result<()> {
        while let Some(child) = self.next_child()? {
            if fields.iter().any(|f| f.element == child.name) {
                return Err(self.violation(format!("element <{}> is repeated", child.name)));
            }
            self.unknown(&child)?;
        }
        Ok(())
    }

    pub fn expect_eof(&mut self) -> Result<()> {
        match self.next_event()? {
            Event::Eof => Ok(()),
            _ => Err(self.violation("unexpected content after the root element")),
        }
    }
}

impl XmlBinding for OrderItemIdQty {
    fn write_content<W: Write>(&self, writer: &mut ElementWriter<W>) -> Result<()> {
        let [id_field, qty_field] = Self::FIELDS;
        writer.text_element(id_field.element, &lexical::format_int(self.order_item_id))?;
        writer.text_element(qty_field.element, &lexical::format_double(self.qty))
    }

    fn read_content(reader: &mut ElementReader<'_>) -> Result<Self> {
        let [id_field, qty_field] = Self::FIELDS;
        let order_item_id = reader.read_field(&Self::FIELDS, id_field.element, lexical::parse_int)?;
        let qty = reader.read_field(&Self::FIELDS, qty_field.element, lexical::parse_double)?;
        reader.finish(&Self::FIELDS)?;
        Ok(Self { order_item_id, qty })
    }
}

impl XmlBinding for OrderItemIdQtyArray {
    fn write_content<W: Write>(&self, writer: &mut ElementWriter<W>) -> Result<()> {
        for item in self.items() {
            writer.element(Self::ITEM_ELEMENT, item)?;
        }
        Ok(())
    }

    fn read_content(reader: &mut ElementReader<'_>) -> Result<Self> {
        let mut array = Self::new();
        while let Some(child) = reader.next_child()? {
            if child.name == Self::ITEM_ELEMENT {
                reader.enter(&child);
                array.push(OrderItemIdQty::read_content(reader)?);
            } else {
                reader.unknown(&child)?;
            }
        }
        Ok(array)
    }
}

pub fn encode<T: XmlBinding>(value: &T, root: &str, options: &CodecOptions) -> Result<String> {
    let mut writer = ElementWriter::new(Vec::new(), options.indent);
    if options.xml_declaration {
        writer.declaration()?;
    }
    writer.element(root, value)?;
    let xml = String::from_utf8(writer.into_inner())
        .map_err(|e| BindError::IoError(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
    tracing::trace!(root, bytes = xml.len(), "encoded element");
    Ok(xml)
}

pub fn decode<T: XmlBinding>(xml: &str, root: &str, options: &CodecOptions) -> Result<T> {
    let mut reader = ElementReader::new(xml, options.unknown_elements);
    let element = reader.read_root()?;
    if element.name != root {
        return Err(BindError::schema_violation(
            format!("unexpected root element <{}>, expected <{}>", element.name, root),
            reader.position(),
        ));
    }
    read_document_body(&mut reader, &element)
}

fn read_document_body<T: XmlBinding>(reader: &mut ElementReader<'_>, root: &ChildElement) -> Result<T> {
    reader.enter(root);
    let value = T::read_content(reader)?;
    reader.expect_eof()?;
    Ok(value)
}

pub fn encode_document(document: &QtyDocument, options: &CodecOptions) -> Result<String> {
    match document {
        QtyDocument::Single(item) => encode(item, &options.root_element, options),
        QtyDocument::Array(array) => encode(array, OrderItemIdQtyArray::TYPE_NAME, options),
    }
}

/// The root element decides between a single record and an array.
pub fn decode_document(xml: &str, options: &CodecOptions) -> Result<QtyDocument> {
    let mut reader = ElementReader::new(xml, options.unknown_elements);
    let root = reader.read_root()?;
    tracing::debug!(root = %root.name, "decoding document");
    // 自訂的單筆根元素優先於陣列根元素
    if root.name == options.root_element {
        read_document_body(&mut reader, &root).map(QtyDocument::Single)
    } else if root.name == OrderItemIdQtyArray::TYPE_NAME {
        read_document_body(&mut reader, &root).map(QtyDocument::Array)
    } else {
        Err(BindError::schema_violation(
            format!(
                "unexpected root element <{}>, expected <{}> or <{}>",
                root.name,
                options.root_element,
                OrderItemIdQtyArray::TYPE_NAME
            ),
            reader.position(),
        ))
    }
}

impl OrderItemIdQty {
    pub fn to_xml(&self) -> Result<String> {
        encode(self, Self::TYPE_NAME, &CodecOptions::default())
    }

    pub fn from_xml(xml: &str) -> Result<Self> {
        decode(xml, Self::TYPE_NAME, &CodecOptions::default())
    }
}

impl OrderItemIdQtyArray {
    pub fn to_xml(&self) -> Result<String> {
        encode(self, Self::TYPE_NAME, &CodecOptions::default())
    }

    pub fn from_xml(xml: &str) -> Result<Self> {
        decode(xml, Self::TYPE_NAME, &CodecOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ignoring() -> CodecOptions {
        CodecOptions {
            unknown_elements: UnknownElementPolicy::Ignore,
            ..CodecOptions::default()
        }
    }

    #[test]
    fn test_encode_matches_wire_shape() {
        let xml = OrderItemIdQty::new(1042, 3.5).to_xml().unwrap();
        assert_eq!(
            xml,
            "<orderItemIdQty><order_item_id>1042</order_item_id><qty>3.5</qty></orderItemIdQty>"
        );
    }

    #[test]
    fn test_decode_example_document() {
        let item = OrderItemIdQty::from_xml(
            "<orderItemIdQty><order_item_id>7</order_item_id><qty>0.0</qty></orderItemIdQty>",
        )
        .unwrap();
        assert_eq!(item, OrderItemIdQty::new(7, 0.0));
    }

    #[test]
    fn test_encode_with_declaration_and_custom_root() {
        let options = CodecOptions {
            root_element: "complexObjectArray".to_string(),
            xml_declaration: true,
            ..CodecOptions::default()
        };
        let xml = encode(&OrderItemIdQty::new(1, 2.0), &options.root_element, &options).unwrap();
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.ends_with("<complexObjectArray><order_item_id>1</order_item_id><qty>2.0</qty></complexObjectArray>"));
    }

    #[test]
    fn test_indented_output_still_decodes() {
        let options = CodecOptions {
            indent: 2,
            ..CodecOptions::default()
        };
        let item = OrderItemIdQty::new(-3, 1e-9);
        let xml = encode(&item, OrderItemIdQty::TYPE_NAME, &options).unwrap();
        assert!(xml.contains('\n'));
        assert!(xml.contains("<qty>1e-9</qty>"));
        assert_eq!(OrderItemIdQty::from_xml(&xml).unwrap(), item);
    }

    #[test]
    fn test_decode_accepts_prefixes_attributes_and_comments() {
        let xml = r#"<?xml version="1.0"?>
            <!-- response item -->
            <ns1:orderItemIdQty xmlns:ns1="urn:Magento" xsi:type="ns1:orderItemIdQty">
                <ns1:order_item_id> 12 </ns1:order_item_id>
                <qty><![CDATA[4.25]]></qty>
            </ns1:orderItemIdQty>"#;
        assert_eq!(OrderItemIdQty::from_xml(xml).unwrap(), OrderItemIdQty::new(12, 4.25));
    }

    #[test]
    fn test_decode_rejects_out_of_order_elements() {
        let err = OrderItemIdQty::from_xml(
            "<orderItemIdQty><qty>1.0</qty><order_item_id>1</order_item_id></orderItemIdQty>",
        )
        .unwrap_err();
        assert!(matches!(err, BindError::SchemaViolation { ref message, .. } if message.contains("out of order")));
    }

    #[test]
    fn test_decode_rejects_missing_and_repeated_elements() {
        let missing = OrderItemIdQty::from_xml("<orderItemIdQty><order_item_id>1</order_item_id></orderItemIdQty>")
            .unwrap_err();
        assert!(matches!(missing, BindError::SchemaViolation { ref message, .. } if message == "missing required element <qty>"));

        let repeated = OrderItemIdQty::from_xml(
            "<orderItemIdQty><order_item_id>1</order_item_id><qty>1</qty><qty>2</qty></orderItemIdQty>",
        )
        .unwrap_err();
        assert!(matches!(repeated, BindError::SchemaViolation { ref message, .. } if message.contains("repeated")));

        let empty = OrderItemIdQty::from_xml("<orderItemIdQty/>").unwrap_err();
        assert!(matches!(empty, BindError::SchemaViolation { .. }));
    }

    #[test]
    fn test_unknown_elements_follow_policy() {
        let xml = "<orderItemIdQty><order_item_id>5</order_item_id><sku><v>x</v></sku><qty>2</qty><note/></orderItemIdQty>";

        let err = OrderItemIdQty::from_xml(xml).unwrap_err();
        assert!(matches!(err, BindError::SchemaViolation { ref message, .. } if message == "unexpected element <sku>"));

        let item: OrderItemIdQty = decode(xml, OrderItemIdQty::TYPE_NAME, &ignoring()).unwrap();
        assert_eq!(item, OrderItemIdQty::new(5, 2.0));
    }

    #[test]
    fn test_decode_rejects_nested_content_and_bad_lexical_values() {
        let nested = OrderItemIdQty::from_xml(
            "<orderItemIdQty><order_item_id><x>1</x></order_item_id><qty>1</qty></orderItemIdQty>",
        )
        .unwrap_err();
        assert!(matches!(nested, BindError::SchemaViolation { .. }));

        let bad_qty = OrderItemIdQty::from_xml(
            "<orderItemIdQty><order_item_id>1</order_item_id><qty>1,5</qty></orderItemIdQty>",
        )
        .unwrap_err();
        assert!(matches!(bad_qty, BindError::LexicalError { ref element, .. } if element == "qty"));

        let empty_id = OrderItemIdQty::from_xml(
            "<orderItemIdQty><order_item_id/><qty>1</qty></orderItemIdQty>",
        )
        .unwrap_err();
        assert!(matches!(empty_id, BindError::LexicalError { ref element, .. } if element == "order_item_id"));
    }

    #[test]
    fn test_decode_rejects_wrong_root_and_trailing_content() {
        let wrong_root = OrderItemIdQty::from_xml("<item><order_item_id>1</order_item_id><qty>1</qty></item>")
            .unwrap_err();
        assert!(matches!(wrong_root, BindError::SchemaViolation { .. }));

        let trailing = OrderItemIdQty::from_xml(
            "<orderItemIdQty><order_item_id>1</order_item_id><qty>1</qty></orderItemIdQty><extra/>",
        )
        .unwrap_err();
        assert!(matches!(trailing, BindError::SchemaViolation { ref message, .. } if message.contains("after the root")));
    }

    #[test]
    fn test_malformed_xml_is_parser_error() {
        let err = OrderItemIdQty::from_xml("<orderItemIdQty><order_item_id>1</qty></orderItemIdQty>")
            .unwrap_err();
        assert!(matches!(err, BindError::XmlError(_)));
    }

    #[test]
    fn test_array_encoding() {
        let array: OrderItemIdQtyArray = vec![OrderItemIdQty::new(1, 1.0), OrderItemIdQty::new(2, 0.5)]
            .into_iter()
            .collect();
        assert_eq!(
            array.to_xml().unwrap(),
            "<orderItemIdQtyArray>\
             <complexObjectArray><order_item_id>1</order_item_id><qty>1.0</qty></complexObjectArray>\
             <complexObjectArray><order_item_id>2</order_item_id><qty>0.5</qty></complexObjectArray>\
             </orderItemIdQtyArray>"
        );
        assert_eq!(OrderItemIdQtyArray::new().to_xml().unwrap(), "<orderItemIdQtyArray></orderItemIdQtyArray>");
    }

    #[test]
    fn test_array_decoding() {
        assert!(OrderItemIdQtyArray::from_xml("<orderItemIdQtyArray/>").unwrap().is_empty());

        let array = OrderItemIdQtyArray::from_xml(
            "<orderItemIdQtyArray>\
             <complexObjectArray><order_item_id>9</order_item_id><qty>INF</qty></complexObjectArray>\
             <complexObjectArray><order_item_id>10</order_item_id><qty>-2.5</qty></complexObjectArray>\
             </orderItemIdQtyArray>",
        )
        .unwrap();
        assert_eq!(array.items(), &[OrderItemIdQty::new(9, f64::INFINITY), OrderItemIdQty::new(10, -2.5)]);

        let err = OrderItemIdQtyArray::from_xml("<orderItemIdQtyArray><complexObjectArray/></orderItemIdQtyArray>")
            .unwrap_err();
        assert!(matches!(err, BindError::SchemaViolation { .. }));
    }

    #[test]
    fn test_decode_document_selects_variant_by_root() {
        let options = CodecOptions::default();
        let single = decode_document(
            "<orderItemIdQty><order_item_id>1</order_item_id><qty>1</qty></orderItemIdQty>",
            &options,
        )
        .unwrap();
        assert_eq!(single, QtyDocument::Single(OrderItemIdQty::new(1, 1.0)));

        let array = decode_document("<orderItemIdQtyArray></orderItemIdQtyArray>", &options).unwrap();
        assert_eq!(array, QtyDocument::Array(OrderItemIdQtyArray::new()));

        assert!(decode_document("<salesOrderEntity/>", &options).is_err());
    }

    #[test]
    fn test_configured_root_wins_over_array_root() {
        let options = CodecOptions {
            root_element: OrderItemIdQtyArray::TYPE_NAME.to_string(),
            ..CodecOptions::default()
        };
        let item = OrderItemIdQty::new(3, 1.5);
        let xml = encode_document(&QtyDocument::Single(item), &options).unwrap();
        assert!(xml.starts_with("<orderItemIdQtyArray><order_item_id>"));

        assert_eq!(decode_document(&xml, &options).unwrap(), QtyDocument::Single(item));
    }
}
