//! Built-in directory templates and catalog-file loading.

use super::schema::{FieldType, OutputFormat, TemplateDefinition, TemplateField, TemplateType};
use crate::config::load_structured_file;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

const CURRENCIES: &[&str] = &["ILS", "USD", "EUR", "GBP"];

pub fn builtin_templates() -> Vec<TemplateDefinition> {
    vec![chambers_2024(), legal500_2024(), duns100_2024()]
}

fn chambers_2024() -> TemplateDefinition {
    TemplateDefinition::new(
        "chambers-2024",
        "Chambers and Partners 2024 Matter Submission",
        TemplateType::Chambers,
        OutputFormat::Docx,
    )
    .description("Work highlight for the Chambers Global and Europe research cycle")
    .version("2024.1")
    .field(
        TemplateField::text("title", "Matter Title")
            .required()
            .max_length(200)
            .mapped_from("title"),
    )
    .field(
        TemplateField::text("clientName", "Client Name")
            .required()
            .max_length(200)
            .mapped_from("clientName"),
    )
    .field(TemplateField::textarea("counterparties", "Other Parties").mapped_from("counterparties"))
    .field(TemplateField::new("dealValue", "Deal Value", FieldType::Number).mapped_from("dealValue.amount"))
    .field(
        TemplateField::new("currency", "Currency", FieldType::Select)
            .options(CURRENCIES.iter().copied())
            .mapped_from("dealValue.currency"),
    )
    .field(
        TemplateField::textarea("description", "Summary of the Matter")
            .max_length(2000)
            .mapped_from("synthesizedData.description"),
    )
    .field(
        TemplateField::textarea("keyAchievements", "Key Achievements")
            .max_length(1500)
            .mapped_from("synthesizedData.keyAchievements"),
    )
    .field(
        TemplateField::textarea("legalNovelty", "Legal Novelty")
            .max_length(1000)
            .mapped_from("synthesizedData.legalNovelty"),
    )
    .field(TemplateField::text("practiceAreas", "Practice Areas").mapped_from("synthesizedData.practiceAreas"))
    .field(TemplateField::text("leadPartner", "Lead Partner").mapped_from("leadPartner"))
    .field(TemplateField::textarea("teamMembers", "Team Members").mapped_from("teamMembers"))
    .field(TemplateField::new("completionDate", "Completion Date", FieldType::Date).mapped_from("completionDate"))
    .field(TemplateField::new("confidential", "Confidential", FieldType::Select).options(["Yes", "No"]))
}

fn legal500_2024() -> TemplateDefinition {
    TemplateDefinition::new(
        "legal500-2024",
        "The Legal 500 2024 Work Highlight",
        TemplateType::Legal500,
        OutputFormat::Docx,
    )
    .description("Work highlight entry for The Legal 500 EMEA submission")
    .version("2024.1")
    .field(
        TemplateField::text("title", "Matter Name")
            .required()
            .max_length(150)
            .mapped_from("title"),
    )
    .field(
        TemplateField::text("clientName", "Client")
            .required()
            .max_length(150)
            .mapped_from("clientName"),
    )
    .field(
        TemplateField::textarea("description", "Work Highlight")
            .required()
            .max_length(1500)
            .mapped_from("synthesizedData.description"),
    )
    .field(TemplateField::new("dealValue", "Value", FieldType::Number).mapped_from("dealValue.amount"))
    .field(
        TemplateField::new("currency", "Currency", FieldType::Select)
            .options(CURRENCIES.iter().copied())
            .mapped_from("dealValue.currency"),
    )
    .field(TemplateField::textarea("counterparties", "Other Firms / Parties").mapped_from("counterparties"))
    .field(TemplateField::text("leadPartner", "Lead Lawyer").mapped_from("leadPartner"))
    .field(TemplateField::textarea("teamMembers", "Other Team Members").mapped_from("teamMembers"))
    .field(TemplateField::text("practiceAreas", "Practice Area").mapped_from("synthesizedData.practiceAreas"))
    .field(TemplateField::text("clientReferee", "Client Referee").max_length(200))
}

fn duns100_2024() -> TemplateDefinition {
    TemplateDefinition::new(
        "duns100-2024",
        "Dun's 100 2024 Law Firm Ranking",
        TemplateType::Duns100,
        OutputFormat::Xlsx,
    )
    .description("Matter sheet for the Dun's 100 Israeli law firm ranking")
    .version("2024.1")
    .field(
        TemplateField::text("title", "Transaction / Case")
            .required()
            .max_length(200)
            .mapped_from("title"),
    )
    .field(
        TemplateField::text("clientName", "Client")
            .required()
            .max_length(200)
            .mapped_from("clientName"),
    )
    .field(TemplateField::text("leadPartner", "Responsible Partner").required().mapped_from("leadPartner"))
    .field(TemplateField::new("dealValue", "Amount", FieldType::Number).mapped_from("dealValue.amount"))
    .field(
        TemplateField::new("currency", "Currency", FieldType::Select)
            .options(CURRENCIES.iter().copied())
            .mapped_from("dealValue.currency"),
    )
    .field(TemplateField::text("practiceAreas", "Field of Practice").mapped_from("synthesizedData.practiceAreas"))
    .field(TemplateField::text("counterparties", "Counterparties").mapped_from("counterparties"))
    .field(
        TemplateField::textarea("description", "Description")
            .max_length(500)
            .mapped_from("synthesizedData.description"),
    )
    .field(
        TemplateField::new("rankingCategory", "Ranking Category", FieldType::Select)
            .options(["Commercial", "Litigation", "Real Estate", "Tax", "Hi-Tech"]),
    )
}

#[derive(Debug, Default, Deserialize)]
struct CatalogFile {
    #[serde(default)]
    templates: Vec<TemplateDefinition>,
}

/// Reads extra template definitions from a YAML, JSON or TOML file.
///
/// The file holds a top-level `templates` list. Definitions are returned
/// unchecked; registering them runs the schema checks.
pub fn load_catalog_file(path: &Path) -> Result<Vec<TemplateDefinition>> {
    if !path.exists() {
        anyhow::bail!("template catalog {:?} does not exist", path);
    }
    let parsed: CatalogFile = load_structured_file(path)
        .with_context(|| format!("failed to load template catalog {:?}", path))?;
    Ok(parsed.templates)
}
