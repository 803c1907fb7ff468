//! OOXML package assembly for WordprocessingML documents.

use crate::render::RenderError;
use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

const CONTENT_TYPES_WITH_PNG: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/settings.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.settings+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const SETTINGS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:settings xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:defaultTabStop w:val="720"/><w:characterSpacingControl w:val="doNotCompress"/><w:compat><w:compatSetting w:name="compatibilityMode" w:uri="http://schemas.microsoft.com/office/word" w:val="15"/></w:compat></w:settings>"#;

pub(crate) const STYLES_RELATIONSHIP_ID: &str = "rId1";
pub(crate) const SETTINGS_RELATIONSHIP_ID: &str = "rId2";
pub(crate) const LOGO_RELATIONSHIP_ID: &str = "rId3";
pub(crate) const LOGO_PART: &str = "word/media/logo.png";

/// Base font used by the `Normal` style and every style derived from it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct StyleDefaults {
    pub font: &'static str,
    /// Body size in half-points.
    pub size: u32,
    pub rtl: bool,
}

/// Parts that vary per document; everything else is fixed boilerplate.
pub(crate) struct DocxPackage {
    pub document: Vec<u8>,
    pub styles: StyleDefaults,
    pub logo_png: Option<Vec<u8>>,
}

impl DocxPackage {
    pub fn into_bytes(self) -> Result<Vec<u8>, RenderError> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        // fixed timestamp keeps identical inputs byte-identical
        let options = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        zip.start_file("[Content_Types].xml", options)?;
        zip.write_all(CONTENT_TYPES_WITH_PNG.as_bytes())?;

        zip.start_file("_rels/.rels", options)?;
        zip.write_all(ROOT_RELS.as_bytes())?;

        zip.start_file("word/document.xml", options)?;
        zip.write_all(&self.document)?;

        zip.start_file("word/styles.xml", options)?;
        zip.write_all(styles_xml(&self.styles).as_bytes())?;

        zip.start_file("word/settings.xml", options)?;
        zip.write_all(SETTINGS.as_bytes())?;

        zip.start_file("word/_rels/document.xml.rels", options)?;
        zip.write_all(document_rels(self.logo_png.is_some()).as_bytes())?;

        if let Some(png) = &self.logo_png {
            zip.start_file(LOGO_PART, options)?;
            zip.write_all(png)?;
        }

        Ok(zip.finish()?.into_inner())
    }
}

fn document_rels(with_logo: bool) -> String {
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    rels.push_str(&format!(
        r#"<Relationship Id="{STYLES_RELATIONSHIP_ID}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#
    ));
    rels.push_str(&format!(
        r#"<Relationship Id="{SETTINGS_RELATIONSHIP_ID}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/settings" Target="settings.xml"/>"#
    ));
    if with_logo {
        rels.push_str(&format!(
            r#"<Relationship Id="{LOGO_RELATIONSHIP_ID}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image" Target="media/logo.png"/>"#
        ));
    }
    rels.push_str("</Relationships>");
    rels
}

fn styles_xml(defaults: &StyleDefaults) -> String {
    let font = defaults.font;
    let size = defaults.size;
    let rtl = if defaults.rtl { "<w:rtl/>" } else { "" };
    let bidi = if defaults.rtl { "<w:bidi/>" } else { "" };
    let heading = |id: &str, name: &str, size: u32, color: &str| {
        format!(
            r#"<w:style w:type="paragraph" w:styleId="{id}"><w:name w:val="{name}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:qFormat/><w:pPr><w:keepNext/><w:spacing w:before="240" w:after="120"/>{bidi}</w:pPr><w:rPr><w:b/><w:bCs/><w:color w:val="{color}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/>{rtl}</w:rPr></w:style>"#
        )
    };

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="{font}" w:hAnsi="{font}" w:cs="{font}" w:eastAsia="{font}"/><w:sz w:val="{size}"/><w:szCs w:val="{size}"/><w:lang w:val="en-US" w:bidi="he-IL"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="120" w:line="264" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/><w:pPr>{bidi}</w:pPr><w:rPr>{rtl}</w:rPr></w:style>{title}{h1}{h2}<w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders><w:tblCellMar><w:left w:w="108" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar></w:tblPr></w:style></w:styles>"#,
        title = heading("Title", "Title", 40, "1F3864"),
        h1 = heading("Heading1", "heading 1", 32, "1F3864"),
        h2 = heading("Heading2", "heading 2", 26, "2E74B5"),
    )
}
