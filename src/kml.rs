//! KML serialization of the document tree.
//!
//! Structured writing via `quick-xml` rather than string templating: the tree
//! builder owns the shape, this module owns the schema, and text content is
//! escaped by the writer. The emitted schema is fixed:
//!
//! ```text
//! <kml xmlns="http://www.opengis.net/kml/2.2">
//!   <Document>
//!     <Folder><name>…</name> …children…</Folder>
//!     <Placemark>
//!       <name>a.jpg</name>
//!       <description><![CDATA[<img src="images/a.jpg"/><br><br>]]></description>
//!       <styleUrl>#icon-1899-DB4436</styleUrl>
//!       <Point><coordinates>lon,lat,0</coordinates></Point>
//!     </Placemark>
//! ```
//!
//! Coordinates are longitude-then-latitude with altitude pinned at 0 —
//! viewers require exactly this order. The description's `<img>` reference is
//! the archive path the packager wrote the bytes under.

use crate::tree::{DocumentNode, Folder, Placemark};
use quick_xml::Writer;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io;

const KML_NAMESPACE: &str = "http://www.opengis.net/kml/2.2";
const PLACEMARK_STYLE: &str = "#icon-1899-DB4436";

fn emit<W: io::Write>(writer: &mut Writer<W>, event: Event) -> io::Result<()> {
    writer.write_event(event).map_err(io::Error::other)
}

/// A CDATA section cannot contain `]]>`. A filename carrying that sequence
/// would otherwise terminate the section early and leave malformed XML, so
/// the sequence is split across two adjacent sections.
fn cdata_safe(text: &str) -> String {
    text.replace("]]>", "]]]]><![CDATA[>")
}

/// Serialize a document tree to a complete KML document string.
pub fn render(root: &Folder) -> io::Result<String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(&mut writer, Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut kml = BytesStart::new("kml");
    kml.push_attribute(("xmlns", KML_NAMESPACE));
    emit(&mut writer, Event::Start(kml))?;
    emit(&mut writer, Event::Start(BytesStart::new("Document")))?;

    write_folder(&mut writer, root)?;

    emit(&mut writer, Event::End(BytesEnd::new("Document")))?;
    emit(&mut writer, Event::End(BytesEnd::new("kml")))?;

    String::from_utf8(writer.into_inner()).map_err(io::Error::other)
}

fn write_folder<W: io::Write>(writer: &mut Writer<W>, folder: &Folder) -> io::Result<()> {
    emit(writer, Event::Start(BytesStart::new("Folder")))?;
    text_element(writer, "name", &folder.name)?;
    for child in &folder.children {
        match child {
            DocumentNode::Folder(sub) => write_folder(writer, sub)?,
            DocumentNode::Placemark(mark) => write_placemark(writer, mark)?,
        }
    }
    emit(writer, Event::End(BytesEnd::new("Folder")))?;
    Ok(())
}

fn write_placemark<W: io::Write>(writer: &mut Writer<W>, mark: &Placemark) -> io::Result<()> {
    emit(writer, Event::Start(BytesStart::new("Placemark")))?;
    text_element(writer, "name", &mark.name)?;

    emit(writer, Event::Start(BytesStart::new("description")))?;
    emit(writer, Event::CData(BytesCData::new(cdata_safe(&format!(
        "<img src=\"{}\"/><br><br>",
        mark.href
    )))))?;
    emit(writer, Event::End(BytesEnd::new("description")))?;

    text_element(writer, "styleUrl", PLACEMARK_STYLE)?;

    emit(writer, Event::Start(BytesStart::new("Point")))?;
    text_element(
        writer,
        "coordinates",
        &format!("{},{},0", mark.coordinate.lon, mark.coordinate.lat),
    )?;
    emit(writer, Event::End(BytesEnd::new("Point")))?;

    emit(writer, Event::End(BytesEnd::new("Placemark")))?;
    Ok(())
}

fn text_element<W: io::Write>(writer: &mut Writer<W>, name: &str, text: &str) -> io::Result<()> {
    emit(writer, Event::Start(BytesStart::new(name)))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Coordinate;

    fn mark(name: &str, href: &str, lat: f64, lon: f64) -> DocumentNode {
        DocumentNode::Placemark(Placemark {
            name: name.to_string(),
            href: href.to_string(),
            coordinate: Coordinate { lat, lon },
        })
    }

    #[test]
    fn empty_root_renders_document_shell() {
        let xml = render(&Folder {
            name: "trip".to_string(),
            children: Vec::new(),
        })
        .unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<kml xmlns=\"http://www.opengis.net/kml/2.2\">"));
        assert!(xml.contains("<name>trip</name>"));
        assert!(xml.ends_with("</kml>"));
    }

    #[test]
    fn placemark_coordinates_are_longitude_first() {
        let xml = render(&Folder {
            name: "trip".to_string(),
            children: vec![mark("a.jpg", "images/a.jpg", 40.5, -79.25)],
        })
        .unwrap();

        assert!(xml.contains("<coordinates>-79.25,40.5,0</coordinates>"));
    }

    #[test]
    fn description_embeds_archive_reference_in_cdata() {
        let xml = render(&Folder {
            name: "trip".to_string(),
            children: vec![mark("a.jpg", "images/day2/a.jpg", 1.0, 2.0)],
        })
        .unwrap();

        assert!(xml.contains("<![CDATA[<img src=\"images/day2/a.jpg\"/><br><br>]]>"));
        assert!(xml.contains("<styleUrl>#icon-1899-DB4436</styleUrl>"));
    }

    #[test]
    fn names_are_escaped() {
        let xml = render(&Folder {
            name: "rocks & rivers".to_string(),
            children: vec![mark("<a>.jpg", "images/a.jpg", 0.0, 0.0)],
        })
        .unwrap();

        assert!(xml.contains("<name>rocks &amp; rivers</name>"));
        assert!(xml.contains("<name>&lt;a&gt;.jpg</name>"));
    }

    #[test]
    fn cdata_terminator_in_reference_is_split() {
        // "]]>" in a filename must not end the description's CDATA section.
        let xml = render(&Folder {
            name: "trip".to_string(),
            children: vec![mark("a]]>b.jpg", "images/a]]>b.jpg", 0.0, 0.0)],
        })
        .unwrap();

        assert!(xml.contains(
            "<![CDATA[<img src=\"images/a]]]]><![CDATA[>b.jpg\"/><br><br>]]>"
        ));
        // The name element is plain text and escapes normally.
        assert!(xml.contains("<name>a]]&gt;b.jpg</name>"));
    }

    #[test]
    fn nested_folders_nest_in_output() {
        let inner = Folder {
            name: "day2".to_string(),
            children: vec![mark("c.gif", "images/day2/c.gif", -40.0, 79.0)],
        };
        let xml = render(&Folder {
            name: "trip".to_string(),
            children: vec![DocumentNode::Folder(inner)],
        })
        .unwrap();

        let trip = xml.find("<name>trip</name>").unwrap();
        let day2 = xml.find("<name>day2</name>").unwrap();
        let mark_pos = xml.find("<name>c.gif</name>").unwrap();
        assert!(trip < day2 && day2 < mark_pos);
        assert_eq!(xml.matches("</Folder>").count(), 2);
    }
}
