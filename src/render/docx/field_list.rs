use super::package::{DocxPackage, StyleDefaults};
use super::xml::{DocumentWriter, ParaStyle, Run, RunStyle, contains_rtl};
use crate::render::{DocumentRenderer, FieldDocument, RenderError};
use crate::template::OutputFormat;

/// Renders a template as a title followed by one `label: value` paragraph per field.
///
/// Blank text values are left out along with absent ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldListDocxRenderer;

impl FieldListDocxRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentRenderer for FieldListDocxRenderer {
    type Input = FieldDocument;

    fn output_format(&self) -> OutputFormat {
        OutputFormat::Docx
    }

    fn render(&self, doc: &FieldDocument) -> Result<Vec<u8>, RenderError> {
        let mut writer = DocumentWriter::begin()?;

        let title_rtl = contains_rtl(&doc.title);
        writer.paragraph(
            &ParaStyle {
                style_id: Some("Title"),
                bidi: title_rtl,
                ..ParaStyle::default()
            },
            &[Run::new(
                doc.title.clone(),
                RunStyle {
                    rtl: title_rtl,
                    ..RunStyle::default()
                },
            )],
        )?;

        let mut written = 0usize;
        for row in doc.rows.iter().filter(|row| !row.value.is_empty()) {
            let value = row.value.to_string();
            let rtl = contains_rtl(&row.label) || contains_rtl(&value);
            let base = RunStyle {
                rtl,
                ..RunStyle::default()
            };
            writer.paragraph(
                &ParaStyle {
                    bidi: rtl,
                    ..ParaStyle::default()
                },
                &[
                    Run::new(format!("{}: ", row.label), base.clone().bold()),
                    Run::new(value, base),
                ],
            )?;
            written += 1;
        }

        tracing::debug!(template_id = %doc.template_id, fields = written, "docx body written");

        DocxPackage {
            document: writer.finish(false)?,
            styles: StyleDefaults {
                font: "Calibri",
                size: 22,
                rtl: false,
            },
            logo_png: None,
        }
        .into_bytes()
    }
}
