//! Right-to-left submission questionnaire.
//!
//! Layout is fixed: logo, title, firm details, a ten-row lawyer roster, ten
//! matter blocks, a ten-row referee table and a confirmation table. Short
//! collections are padded with blank rows; long ones are cut at ten.

use super::package::{DocxPackage, LOGO_RELATIONSHIP_ID, StyleDefaults};
use super::xml::{
    CONTENT_WIDTH_TWIPS, Cell, DocumentWriter, InlinePicture, Justify, ParaStyle, Row, Run,
    RunStyle, Table,
};
use crate::render::{DocumentRenderer, RenderError};
use crate::submission::{
    FIXED_ROWS, LawyerEntry, LogoImage, RefereeEntry, SubmissionExport, SubmissionMatter,
    format_currency, format_opposing_counsel, format_referee_contact, position_label,
    practice_area_label, status_label,
};
use crate::template::OutputFormat;

const FONT: &str = "David";
const GOLD: &str = "C9A227";
const BLUE: &str = "1F4E79";
const LABEL_SHADE: &str = "F2F2F2";
const WHITE: &str = "FFFFFF";
const BORDER: &str = "7F7F7F";

const EMU_PER_PIXEL: u64 = 9525;
/// 1.5 inches.
const MAX_LOGO_WIDTH_EMU: u64 = 1_371_600;

const LABEL_WIDTH: u32 = 2800;
const ROSTER_WIDTHS: [u32; 5] = [600, 2200, 1800, 2226, 2200];

#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionDocxRenderer;

impl SubmissionDocxRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for SubmissionDocxRenderer {
    type Input = SubmissionExport;

    fn output_format(&self) -> OutputFormat {
        OutputFormat::Docx
    }

    fn render(&self, export: &SubmissionExport) -> Result<Vec<u8>, RenderError> {
        let mut writer = DocumentWriter::begin()?;

        if let Some(logo) = &export.logo {
            let picture = logo_picture(logo)?;
            writer.picture(&para().justify(Justify::Center), &picture)?;
        }

        writer.paragraph(
            &para().style("Title").justify(Justify::Center),
            &[Run::new(
                format!("{} {} - טופס הגשה", export.directory.display_name(), export.year),
                text_run(),
            )],
        )?;

        heading(&mut writer, "פרטי המשרד")?;
        writer.table(&firm_table(export))?;

        heading(&mut writer, "עורכי הדין במחלקה")?;
        writer.table(&lawyer_table(&take_fixed("lawyers", &export.lawyers)))?;

        heading(&mut writer, "תיקים נבחרים")?;
        let matters = take_fixed("matters", &export.matters);
        for (idx, matter) in matters.iter().enumerate() {
            writer.paragraph(
                &para().style("Heading2").keep_next(),
                &[Run::new(format!("תיק מס' {}", idx + 1), text_run())],
            )?;
            writer.table(&matter_table(*matter))?;
        }

        heading(&mut writer, "ממליצים")?;
        writer.table(&referee_table(&take_fixed("referees", &export.referees)))?;

        heading(&mut writer, "אישור")?;
        writer.paragraph(
            &para(),
            &[Run::new(
                "הריני לאשר כי המידע המפורט במסמך זה נכון ומדויק.",
                text_run(),
            )],
        )?;
        writer.table(&confirmation_table(export))?;

        let document = writer.finish(true)?;
        tracing::debug!(
            directory = %export.directory,
            year = export.year,
            matters = export.matters.len(),
            "submission body written"
        );

        DocxPackage {
            document,
            styles: StyleDefaults {
                font: FONT,
                size: 24,
                rtl: true,
            },
            logo_png: export.logo.as_ref().map(|logo| logo.bytes().to_vec()),
        }
        .into_bytes()
    }
}

// ============================================================================
// SECTIONS
// ============================================================================

fn firm_table(export: &SubmissionExport) -> Table {
    let firm = &export.firm;
    let header = Row {
        cells: vec![
            Cell::new("פרטי המשרד", header_run())
                .span(2)
                .shaded(GOLD)
                .justify(Justify::Center),
        ],
        header: true,
    };
    let rows = [
        ("שם המשרד", firm.name.clone()),
        ("מחלקה", firm.department.clone()),
        ("ראשי המחלקה", firm.heads_of_department.join("\n")),
        ("איש קשר", firm.contact_name.clone()),
        ("דוא\"ל", firm.contact_email.clone()),
        ("טלפון", firm.contact_phone.clone()),
        ("אתר אינטרנט", firm.website.clone()),
    ];
    label_value_table(Some(header), rows)
}

fn lawyer_table(lawyers: &[Option<&LawyerEntry>]) -> Table {
    let mut rows = vec![blue_header(&["#", "שם", "תפקיד", "תחום התמחות", "דוא\"ל"])];
    for (idx, lawyer) in lawyers.iter().enumerate() {
        let cells = match lawyer {
            Some(l) => [
                l.name.as_str(),
                position_label(&l.position),
                practice_area_label(&l.practice_area),
                l.email.as_str(),
            ],
            None => [""; 4],
        };
        rows.push(numbered_row(idx, &cells));
    }
    roster(rows)
}

fn matter_table(matter: Option<&SubmissionMatter>) -> Table {
    let values = match matter {
        Some(m) => [
            m.client_name.clone(),
            m.description.clone(),
            format_opposing_counsel(&m.opposing_counsel),
            m.deal_value
                .as_ref()
                .map(|v| format_currency(v.amount, &v.currency))
                .unwrap_or_default(),
            status_label(&m.status).to_string(),
        ],
        None => Default::default(),
    };
    let labels = [
        "שם הלקוח",
        "תיאור השירות",
        "עורכי הדין בצד שכנגד",
        "שווי העסקה",
        "סטטוס",
    ];
    label_value_table(None, labels.into_iter().zip(values))
}

fn referee_table(referees: &[Option<&RefereeEntry>]) -> Table {
    let mut rows = vec![blue_header(&["#", "שם הממליץ", "תפקיד", "חברה", "פרטי קשר"])];
    for (idx, referee) in referees.iter().enumerate() {
        let contact;
        let cells = match referee {
            Some(r) => {
                contact = format_referee_contact(r);
                [
                    r.name.as_str(),
                    r.position.as_str(),
                    r.company.as_str(),
                    contact.as_str(),
                ]
            }
            None => [""; 4],
        };
        rows.push(numbered_row(idx, &cells));
    }
    roster(rows)
}

fn confirmation_table(export: &SubmissionExport) -> Table {
    let c = &export.confirmation;
    label_value_table(
        None,
        [
            ("שם החותם", c.signatory_name.clone()),
            ("תפקיד", c.signatory_position.clone()),
            ("תאריך", c.date.clone()),
            ("חתימה", String::new()),
        ],
    )
}

// ============================================================================
// BUILDING BLOCKS
// ============================================================================

/// Pads `items` with `None` up to the fixed row count, dropping any excess.
fn take_fixed<'a, T>(section: &'static str, items: &'a [T]) -> Vec<Option<&'a T>> {
    if items.len() > FIXED_ROWS {
        tracing::warn!(
            section,
            supplied = items.len(),
            kept = FIXED_ROWS,
            "submission section truncated"
        );
    }
    (0..FIXED_ROWS).map(|idx| items.get(idx)).collect()
}

fn label_value_table<L, I>(header: Option<Row>, rows: I) -> Table
where
    L: Into<String>,
    I: IntoIterator<Item = (L, String)>,
{
    let mut all = Vec::new();
    all.extend(header);
    for (label, value) in rows {
        all.push(Row {
            cells: vec![
                Cell::new(label, text_run().bold()).shaded(LABEL_SHADE),
                Cell::new(value, text_run()),
            ],
            header: false,
        });
    }
    Table {
        widths: vec![LABEL_WIDTH, CONTENT_WIDTH_TWIPS - LABEL_WIDTH],
        bidi_visual: true,
        border_color: BORDER,
        rows: all,
        cell_bidi: true,
    }
}

fn roster(rows: Vec<Row>) -> Table {
    Table {
        widths: ROSTER_WIDTHS.to_vec(),
        bidi_visual: true,
        border_color: BORDER,
        rows,
        cell_bidi: true,
    }
}

fn blue_header(titles: &[&str]) -> Row {
    Row {
        cells: titles
            .iter()
            .map(|title| {
                Cell::new(*title, header_run())
                    .shaded(BLUE)
                    .justify(Justify::Center)
            })
            .collect(),
        header: true,
    }
}

fn numbered_row(idx: usize, cells: &[&str]) -> Row {
    let mut row = vec![Cell::new((idx + 1).to_string(), text_run()).justify(Justify::Center)];
    row.extend(cells.iter().map(|text| Cell::new(*text, text_run())));
    Row {
        cells: row,
        header: false,
    }
}

fn heading(writer: &mut DocumentWriter, text: &str) -> Result<(), RenderError> {
    writer.paragraph(
        &para().style("Heading1").keep_next(),
        &[Run::new(text, text_run())],
    )
}

fn logo_picture(logo: &LogoImage) -> Result<InlinePicture, RenderError> {
    let image = image::load_from_memory(logo.bytes())?;
    let (width_px, height_px) = (u64::from(image.width()), u64::from(image.height()));
    if width_px == 0 || height_px == 0 {
        return Err(RenderError::Other("logo image has no pixels".to_string()));
    }

    let mut width_emu = width_px * EMU_PER_PIXEL;
    let mut height_emu = height_px * EMU_PER_PIXEL;
    if width_emu > MAX_LOGO_WIDTH_EMU {
        height_emu = height_emu * MAX_LOGO_WIDTH_EMU / width_emu;
        width_emu = MAX_LOGO_WIDTH_EMU;
    }

    Ok(InlinePicture {
        relationship_id: LOGO_RELATIONSHIP_ID.to_string(),
        name: "Logo".to_string(),
        width_emu,
        height_emu: height_emu.max(1),
    })
}

fn para() -> ParaStyle {
    ParaStyle {
        bidi: true,
        ..ParaStyle::default()
    }
}

fn text_run() -> RunStyle {
    RunStyle {
        rtl: true,
        font: Some(FONT),
        ..RunStyle::default()
    }
}

fn header_run() -> RunStyle {
    RunStyle {
        color: Some(WHITE),
        ..text_run().bold()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn take_fixed_pads_and_truncates() {
        let short = take_fixed("t", &[1, 2]);
        assert_eq!(short.len(), FIXED_ROWS);
        assert_eq!(short[1], Some(&2));
        assert!(short[2..].iter().all(Option::is_none));

        let long = (0..15).collect::<Vec<_>>();
        let cut = take_fixed("t", &long);
        assert_eq!(cut.len(), FIXED_ROWS);
        assert_eq!(cut[9], Some(&9));
    }

    #[test]
    fn roster_widths_fill_the_page() {
        assert_eq!(ROSTER_WIDTHS.iter().sum::<u32>(), CONTENT_WIDTH_TWIPS);
    }

    #[test]
    fn blank_matter_still_has_five_rows() {
        let table = matter_table(None);
        assert_eq!(table.rows.len(), 5);
        assert!(table.rows.iter().all(|r| r.cells[1].text.is_empty()));
    }

    #[test]
    fn gold_header_spans_firm_table() {
        let table = firm_table(&SubmissionExport::new(
            crate::template::TemplateType::Chambers,
            2024,
        ));
        let header = &table.rows[0];
        assert_eq!(header.cells.len(), 1);
        assert_eq!(header.cells[0].span, 2);
        assert_eq!(header.cells[0].shading, Some(GOLD));
    }
}
