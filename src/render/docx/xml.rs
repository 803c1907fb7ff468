//! WordprocessingML body writer.
//!
//! Thin layer over `quick_xml::Writer` that knows the handful of `w:` elements
//! the renderers emit: paragraphs, runs, tables and inline pictures.

use crate::render::RenderError;
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

pub(crate) const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
pub(crate) const NS_R: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
pub(crate) const NS_WP: &str =
    "http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing";
pub(crate) const NS_A: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";
pub(crate) const NS_PIC: &str = "http://schemas.openxmlformats.org/drawingml/2006/picture";

/// A4 page width minus 1440-twip margins on each side.
pub(crate) const CONTENT_WIDTH_TWIPS: u32 = 9026;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Justify {
    Center,
}

impl Justify {
    fn as_str(self) -> &'static str {
        match self {
            Justify::Center => "center",
        }
    }
}

/// Run-level formatting.
#[derive(Debug, Clone, Default)]
pub(crate) struct RunStyle {
    pub bold: bool,
    pub rtl: bool,
    pub font: Option<&'static str>,
    pub color: Option<&'static str>,
    /// Font size in half-points.
    pub size: Option<u32>,
}

impl RunStyle {
    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }
}

/// Paragraph-level formatting.
#[derive(Debug, Clone, Default)]
pub(crate) struct ParaStyle {
    pub style_id: Option<&'static str>,
    pub bidi: bool,
    pub justify: Option<Justify>,
    pub space_after: Option<u32>,
    pub keep_next: bool,
}

impl ParaStyle {
    pub fn style(mut self, id: &'static str) -> Self {
        self.style_id = Some(id);
        self
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = Some(justify);
        self
    }

    pub fn keep_next(mut self) -> Self {
        self.keep_next = true;
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Run {
    pub text: String,
    pub style: RunStyle,
}

impl Run {
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// Table cell; `span` > 1 merges across grid columns.
#[derive(Debug, Clone)]
pub(crate) struct Cell {
    pub text: String,
    pub span: u32,
    pub shading: Option<&'static str>,
    pub run: RunStyle,
    pub justify: Option<Justify>,
}

impl Cell {
    pub fn new(text: impl Into<String>, run: RunStyle) -> Self {
        Self {
            text: text.into(),
            span: 1,
            shading: None,
            run,
            justify: None,
        }
    }

    pub fn span(mut self, span: u32) -> Self {
        self.span = span.max(1);
        self
    }

    pub fn shaded(mut self, fill: &'static str) -> Self {
        self.shading = Some(fill);
        self
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = Some(justify);
        self
    }
}

#[derive(Debug, Clone)]
pub(crate) struct Row {
    pub cells: Vec<Cell>,
    /// Repeat as header row on each page.
    pub header: bool,
}

#[derive(Debug, Clone)]
pub(crate) struct Table {
    /// Grid column widths in twips.
    pub widths: Vec<u32>,
    pub bidi_visual: bool,
    pub border_color: &'static str,
    pub rows: Vec<Row>,
    /// Paragraph direction used inside cells.
    pub cell_bidi: bool,
}

/// Inline picture already registered as a package relationship.
#[derive(Debug, Clone)]
pub(crate) struct InlinePicture {
    pub relationship_id: String,
    pub name: String,
    pub width_emu: u64,
    pub height_emu: u64,
}

/// Accumulates a `w:document` part.
pub(crate) struct DocumentWriter {
    writer: Writer<Vec<u8>>,
    drawing_ids: u32,
}

impl DocumentWriter {
    pub fn begin() -> Result<Self, RenderError> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(RenderError::xml)?;

        let mut this = Self {
            writer,
            drawing_ids: 0,
        };
        this.start(
            "w:document",
            &[
                ("xmlns:w", NS_W),
                ("xmlns:r", NS_R),
                ("xmlns:wp", NS_WP),
                ("xmlns:a", NS_A),
                ("xmlns:pic", NS_PIC),
            ],
        )?;
        this.start("w:body", &[])?;
        Ok(this)
    }

    /// Closes the body with an A4 section and returns the XML bytes.
    pub fn finish(mut self, rtl_section: bool) -> Result<Vec<u8>, RenderError> {
        self.start("w:sectPr", &[])?;
        self.empty("w:pgSz", &[("w:w", "11906"), ("w:h", "16838")])?;
        self.empty(
            "w:pgMar",
            &[
                ("w:top", "1440"),
                ("w:right", "1440"),
                ("w:bottom", "1440"),
                ("w:left", "1440"),
                ("w:header", "708"),
                ("w:footer", "708"),
                ("w:gutter", "0"),
            ],
        )?;
        if rtl_section {
            self.empty("w:bidi", &[])?;
        }
        self.end("w:sectPr")?;
        self.end("w:body")?;
        self.end("w:document")?;
        Ok(self.writer.into_inner())
    }

    pub fn paragraph(&mut self, style: &ParaStyle, runs: &[Run]) -> Result<(), RenderError> {
        self.start("w:p", &[])?;
        self.paragraph_properties(style)?;
        for run in runs {
            self.run(run)?;
        }
        self.end("w:p")
    }

    pub fn picture(&mut self, style: &ParaStyle, picture: &InlinePicture) -> Result<(), RenderError> {
        self.drawing_ids += 1;
        let doc_pr_id = self.drawing_ids.to_string();
        let cx = picture.width_emu.to_string();
        let cy = picture.height_emu.to_string();

        self.start("w:p", &[])?;
        self.paragraph_properties(style)?;
        self.start("w:r", &[])?;
        self.start("w:drawing", &[])?;
        self.start(
            "wp:inline",
            &[("distT", "0"), ("distB", "0"), ("distL", "0"), ("distR", "0")],
        )?;
        self.empty("wp:extent", &[("cx", &cx), ("cy", &cy)])?;
        self.empty("wp:docPr", &[("id", &doc_pr_id), ("name", &picture.name)])?;
        self.start("wp:cNvGraphicFramePr", &[])?;
        self.empty("a:graphicFrameLocks", &[("noChangeAspect", "1")])?;
        self.end("wp:cNvGraphicFramePr")?;
        self.start("a:graphic", &[])?;
        self.start("a:graphicData", &[("uri", NS_PIC)])?;
        self.start("pic:pic", &[])?;
        self.start("pic:nvPicPr", &[])?;
        self.empty("pic:cNvPr", &[("id", "0"), ("name", &picture.name)])?;
        self.empty("pic:cNvPicPr", &[])?;
        self.end("pic:nvPicPr")?;
        self.start("pic:blipFill", &[])?;
        self.empty("a:blip", &[("r:embed", &picture.relationship_id)])?;
        self.start("a:stretch", &[])?;
        self.empty("a:fillRect", &[])?;
        self.end("a:stretch")?;
        self.end("pic:blipFill")?;
        self.start("pic:spPr", &[])?;
        self.start("a:xfrm", &[])?;
        self.empty("a:off", &[("x", "0"), ("y", "0")])?;
        self.empty("a:ext", &[("cx", &cx), ("cy", &cy)])?;
        self.end("a:xfrm")?;
        self.start("a:prstGeom", &[("prst", "rect")])?;
        self.empty("a:avLst", &[])?;
        self.end("a:prstGeom")?;
        self.end("pic:spPr")?;
        self.end("pic:pic")?;
        self.end("a:graphicData")?;
        self.end("a:graphic")?;
        self.end("wp:inline")?;
        self.end("w:drawing")?;
        self.end("w:r")?;
        self.end("w:p")
    }

    pub fn table(&mut self, table: &Table) -> Result<(), RenderError> {
        let total: u32 = table.widths.iter().sum();
        let border = table.border_color;

        self.start("w:tbl", &[])?;
        self.start("w:tblPr", &[])?;
        self.empty("w:tblStyle", &[("w:val", "TableGrid")])?;
        if table.bidi_visual {
            self.empty("w:bidiVisual", &[])?;
        }
        self.empty("w:tblW", &[("w:w", &total.to_string()), ("w:type", "dxa")])?;
        self.start("w:tblBorders", &[])?;
        for side in ["w:top", "w:start", "w:bottom", "w:end", "w:insideH", "w:insideV"] {
            self.empty(
                side,
                &[("w:val", "single"), ("w:sz", "4"), ("w:space", "0"), ("w:color", border)],
            )?;
        }
        self.end("w:tblBorders")?;
        self.empty("w:tblLayout", &[("w:type", "fixed")])?;
        self.end("w:tblPr")?;

        self.start("w:tblGrid", &[])?;
        for width in &table.widths {
            self.empty("w:gridCol", &[("w:w", &width.to_string())])?;
        }
        self.end("w:tblGrid")?;

        for row in &table.rows {
            self.table_row(table, row)?;
        }
        self.end("w:tbl")
    }

    fn table_row(&mut self, table: &Table, row: &Row) -> Result<(), RenderError> {
        self.start("w:tr", &[])?;
        if row.header {
            self.start("w:trPr", &[])?;
            self.empty("w:tblHeader", &[])?;
            self.end("w:trPr")?;
        }

        let mut column = 0usize;
        for cell in &row.cells {
            let span = cell.span as usize;
            let width: u32 = table.widths.iter().skip(column).take(span).sum();
            column += span;

            self.start("w:tc", &[])?;
            self.start("w:tcPr", &[])?;
            self.empty("w:tcW", &[("w:w", &width.to_string()), ("w:type", "dxa")])?;
            if cell.span > 1 {
                self.empty("w:gridSpan", &[("w:val", &cell.span.to_string())])?;
            }
            if let Some(fill) = cell.shading {
                self.empty("w:shd", &[("w:val", "clear"), ("w:color", "auto"), ("w:fill", fill)])?;
            }
            self.empty("w:vAlign", &[("w:val", "center")])?;
            self.end("w:tcPr")?;

            let para = ParaStyle {
                bidi: table.cell_bidi,
                justify: cell.justify,
                space_after: Some(0),
                ..ParaStyle::default()
            };
            // a cell must hold at least one paragraph, even when blank
            self.paragraph(&para, &[Run::new(cell.text.clone(), cell.run.clone())])?;
            self.end("w:tc")?;
        }
        self.end("w:tr")
    }

    fn paragraph_properties(&mut self, style: &ParaStyle) -> Result<(), RenderError> {
        let has_props = style.style_id.is_some()
            || style.bidi
            || style.justify.is_some()
            || style.space_after.is_some()
            || style.keep_next;
        if !has_props {
            return Ok(());
        }
        self.start("w:pPr", &[])?;
        if let Some(id) = style.style_id {
            self.empty("w:pStyle", &[("w:val", id)])?;
        }
        if style.keep_next {
            self.empty("w:keepNext", &[])?;
        }
        if let Some(after) = style.space_after {
            self.empty("w:spacing", &[("w:after", &after.to_string())])?;
        }
        if style.bidi {
            self.empty("w:bidi", &[])?;
        }
        if let Some(justify) = style.justify {
            self.empty("w:jc", &[("w:val", justify.as_str())])?;
        }
        self.end("w:pPr")
    }

    fn run(&mut self, run: &Run) -> Result<(), RenderError> {
        self.start("w:r", &[])?;
        self.run_properties(&run.style)?;
        let text = sanitize_text(&run.text);
        for (idx, line) in text.split('\n').enumerate() {
            if idx > 0 {
                self.empty("w:br", &[])?;
            }
            if line.is_empty() {
                continue;
            }
            self.start("w:t", &[("xml:space", "preserve")])?;
            self.writer
                .write_event(Event::Text(BytesText::from_escaped(partial_escape(line))))
                .map_err(RenderError::xml)?;
            self.end("w:t")?;
        }
        self.end("w:r")
    }

    fn run_properties(&mut self, style: &RunStyle) -> Result<(), RenderError> {
        let has_props = style.bold
            || style.rtl
            || style.font.is_some()
            || style.color.is_some()
            || style.size.is_some();
        if !has_props {
            return Ok(());
        }
        self.start("w:rPr", &[])?;
        if let Some(font) = style.font {
            self.empty(
                "w:rFonts",
                &[("w:ascii", font), ("w:hAnsi", font), ("w:cs", font)],
            )?;
        }
        if style.bold {
            self.empty("w:b", &[])?;
            self.empty("w:bCs", &[])?;
        }
        if let Some(color) = style.color {
            self.empty("w:color", &[("w:val", color)])?;
        }
        if let Some(size) = style.size {
            let size = size.to_string();
            self.empty("w:sz", &[("w:val", &size)])?;
            self.empty("w:szCs", &[("w:val", &size)])?;
        }
        if style.rtl {
            self.empty("w:rtl", &[])?;
        }
        self.end("w:rPr")
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), RenderError> {
        let mut elem = BytesStart::new(name);
        for attr in attrs {
            elem.push_attribute(*attr);
        }
        self.writer
            .write_event(Event::Start(elem))
            .map_err(RenderError::xml)
    }

    fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), RenderError> {
        let mut elem = BytesStart::new(name);
        for attr in attrs {
            elem.push_attribute(*attr);
        }
        self.writer
            .write_event(Event::Empty(elem))
            .map_err(RenderError::xml)
    }

    fn end(&mut self, name: &str) -> Result<(), RenderError> {
        self.writer
            .write_event(Event::End(BytesEnd::new(name)))
            .map_err(RenderError::xml)
    }
}

/// Drops characters XML 1.0 cannot carry and normalizes line endings.
fn sanitize_text(text: &str) -> String {
    text.replace("\r\n", "\n")
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect()
}

/// True when `text` holds a Hebrew or Arabic letter.
pub(crate) fn contains_rtl(text: &str) -> bool {
    text.chars()
        .any(|c| matches!(c, '\u{0590}'..='\u{05FF}' | '\u{0600}'..='\u{06FF}' | '\u{FB1D}'..='\u{FDFF}'))
}
