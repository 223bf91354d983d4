//! `PIDDocument` XML interchange format.

use std::fmt::Display;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::annotation::attribute_text;
use crate::error::CoreError;
use crate::types::Timestamp;

use super::{format_decimal, ExportAnnotation, ExportConnection, ExportDocument, ExportPage};

pub const XML_FORMAT_VERSION: &str = "1.0";

/// Download name for a document's XML export.
pub fn xml_filename(filename: &str) -> String {
    format!("{}_annotations.xml", crate::document::filename_stem(filename))
}

fn xml_err(e: impl Display) -> CoreError {
    CoreError::Internal(format!("XML export failed: {e}"))
}

struct XmlOut {
    writer: Writer<Vec<u8>>,
}

impl XmlOut {
    fn new() -> Self {
        Self {
            writer: Writer::new_with_indent(Vec::new(), b' ', 2),
        }
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), CoreError> {
        self.writer.write_event(event).map_err(xml_err)
    }

    fn open(&mut self, start: BytesStart<'_>) -> Result<(), CoreError> {
        self.event(Event::Start(start))
    }

    fn close(&mut self, name: &str) -> Result<(), CoreError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    fn empty(&mut self, element: BytesStart<'_>) -> Result<(), CoreError> {
        self.event(Event::Empty(element))
    }

    /// `<name>text</name>`
    fn text_element(&mut self, name: &str, text: &str) -> Result<(), CoreError> {
        self.open(BytesStart::new(name))?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    fn finish(self) -> Result<String, CoreError> {
        String::from_utf8(self.writer.into_inner()).map_err(xml_err)
    }
}

/// Render the whole document, pages sorted by number.
pub fn render_xml(doc: &ExportDocument, exported_at: Timestamp) -> Result<String, CoreError> {
    let mut out = XmlOut::new();
    out.event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("PIDDocument");
    root.push_attribute(("version", XML_FORMAT_VERSION));
    out.open(root)?;

    out.open(BytesStart::new("Metadata"))?;
    out.text_element("DocumentId", &doc.id.to_string())?;
    out.text_element("SourceFile", &doc.filename)?;
    out.text_element(
        "ExportDate",
        &exported_at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
    )?;
    out.text_element("PageCount", &doc.page_count.to_string())?;
    out.close("Metadata")?;

    for page in doc.pages_in_order() {
        write_page(&mut out, page)?;
    }

    out.close("PIDDocument")?;
    out.finish()
}

fn write_page(out: &mut XmlOut, page: &ExportPage) -> Result<(), CoreError> {
    let number = page.page_number.to_string();
    let width = page.width.map(|w| w.to_string());
    let height = page.height.map(|h| h.to_string());

    let mut elem = BytesStart::new("Page");
    elem.push_attribute(("number", number.as_str()));
    if let Some(w) = &width {
        elem.push_attribute(("width", w.as_str()));
    }
    if let Some(h) = &height {
        elem.push_attribute(("height", h.as_str()));
    }
    out.open(elem)?;

    out.open(BytesStart::new("Symbols"))?;
    for ann in &page.annotations {
        write_symbol(out, ann)?;
    }
    out.close("Symbols")?;

    out.open(BytesStart::new("Connections"))?;
    for conn in &page.connections {
        write_connection(out, conn)?;
    }
    out.close("Connections")?;

    out.close("Page")
}

fn write_symbol(out: &mut XmlOut, ann: &ExportAnnotation) -> Result<(), CoreError> {
    let id = ann.id.to_string();
    let mut elem = BytesStart::new("Symbol");
    elem.push_attribute(("id", id.as_str()));
    if let Some(symbol) = &ann.symbol {
        elem.push_attribute(("type", symbol.name.as_str()));
        elem.push_attribute(("category", symbol.category.as_str()));
    }
    out.open(elem)?;

    let (x, y) = (format_decimal(ann.bbox.x, 2), format_decimal(ann.bbox.y, 2));
    let (w, h) = (
        format_decimal(ann.bbox.width, 2),
        format_decimal(ann.bbox.height, 2),
    );
    let mut bbox = BytesStart::new("BoundingBox");
    bbox.push_attribute(("x", x.as_str()));
    bbox.push_attribute(("y", y.as_str()));
    bbox.push_attribute(("width", w.as_str()));
    bbox.push_attribute(("height", h.as_str()));
    out.empty(bbox)?;

    if let Some(tag) = ann.tag_id.as_deref().filter(|t| !t.is_empty()) {
        out.text_element("TagId", tag)?;
    }

    if let Some(attrs) = ann.attributes.as_object().filter(|o| !o.is_empty()) {
        out.open(BytesStart::new("Attributes"))?;
        for (key, value) in attrs {
            let mut attr = BytesStart::new("Attribute");
            attr.push_attribute(("key", key.as_str()));
            out.open(attr)?;
            out.event(Event::Text(BytesText::new(&attribute_text(value))))?;
            out.close("Attribute")?;
        }
        out.close("Attributes")?;
    }

    if let (source, Some(confidence)) = ann.source.to_parts() {
        let confidence = format_decimal(confidence, 3);
        let mut det = BytesStart::new("Detection");
        det.push_attribute(("source", source));
        det.push_attribute(("confidence", confidence.as_str()));
        out.empty(det)?;
    }

    out.close("Symbol")
}

fn write_connection(out: &mut XmlOut, conn: &ExportConnection) -> Result<(), CoreError> {
    let id = conn.id.to_string();
    let mut elem = BytesStart::new("Connection");
    elem.push_attribute(("id", id.as_str()));
    elem.push_attribute(("type", conn.line_type.as_str()));
    out.open(elem)?;

    let from = conn.from_annotation_id.to_string();
    let mut from_elem = BytesStart::new("From");
    from_elem.push_attribute(("symbolId", from.as_str()));
    out.empty(from_elem)?;

    let to = conn.to_annotation_id.to_string();
    let mut to_elem = BytesStart::new("To");
    to_elem.push_attribute(("symbolId", to.as_str()));
    out.empty(to_elem)?;

    if !conn.waypoints.is_empty() {
        out.open(BytesStart::new("Waypoints"))?;
        for point in &conn.waypoints {
            let (x, y) = (format_decimal(point.x, 2), format_decimal(point.y, 2));
            let mut p = BytesStart::new("Point");
            p.push_attribute(("x", x.as_str()));
            p.push_attribute(("y", y.as_str()));
            out.empty(p)?;
        }
        out.close("Waypoints")?;
    }

    out.close("Connection")
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::export::fixtures;

    fn render() -> String {
        let at = chrono::Utc.with_ymd_and_hms(2024, 6, 2, 12, 30, 0).unwrap();
        render_xml(&fixtures::document(), at).unwrap()
    }

    #[test]
    fn metadata_block() {
        let xml = render();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<PIDDocument version=\"1.0\">"));
        assert!(xml.contains("<DocumentId>1</DocumentId>"));
        assert!(xml.contains("<SourceFile>plant-area1.pdf</SourceFile>"));
        assert!(xml.contains("<ExportDate>2024-06-02T12:30:00Z</ExportDate>"));
        assert!(xml.contains("<PageCount>2</PageCount>"));
    }

    #[test]
    fn pages_in_number_order() {
        let xml = render();
        let first = xml.find("<Page number=\"1\" width=\"1000\" height=\"500\">").unwrap();
        let second = xml.find("<Page number=\"2\">").unwrap();
        assert!(first < second);
    }

    #[test]
    fn symbol_details() {
        let xml = render();
        assert!(xml.contains("<Symbol id=\"100\" type=\"Gate Valve\" category=\"Valves\">"));
        assert!(xml.contains("<BoundingBox x=\"100\" y=\"50\" width=\"200\" height=\"100\"/>"));
        assert!(xml.contains("<TagId>XV-101</TagId>"));
        assert!(xml.contains("<Attribute key=\"rating\">150</Attribute>"));
        assert!(xml.contains("<Attribute key=\"size\">2in</Attribute>"));
        assert!(xml.contains("<Detection source=\"yolo\" confidence=\"0.877\"/>"));
    }

    #[test]
    fn manual_symbol_has_no_detection() {
        let xml = render();
        let start = xml.find("<Symbol id=\"101\">").unwrap();
        let end = start + xml[start..].find("</Symbol>").unwrap();
        let block = &xml[start..end];
        assert!(block.contains("x=\"400.12\""));
        assert!(!block.contains("Detection"));
        assert!(!block.contains("Attributes"));
        assert!(!block.contains("TagId"));
    }

    #[test]
    fn connection_with_waypoints() {
        let xml = render();
        assert!(xml.contains("<Connection id=\"7\" type=\"process\">"));
        assert!(xml.contains("<From symbolId=\"100\"/>"));
        assert!(xml.contains("<To symbolId=\"101\"/>"));
        assert!(xml.contains("<Point x=\"300\" y=\"325.46\"/>"));
    }

    #[test]
    fn text_is_escaped() {
        let mut doc = fixtures::document();
        doc.filename = "A&B <rev2>.pdf".to_string();
        let xml = render_xml(&doc, chrono::Utc::now()).unwrap();
        assert!(xml.contains("<SourceFile>A&amp;B &lt;rev2&gt;.pdf</SourceFile>"));
    }

    #[test]
    fn download_name_uses_stem() {
        assert_eq!(xml_filename("plant-area1.pdf"), "plant-area1_annotations.xml");
    }
}
