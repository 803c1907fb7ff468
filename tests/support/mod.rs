#![allow(dead_code)]

use directory_export::{
    ExportEngine, FileNaming, FixedClock, TemplateRegistry,
    submission::{
        Confirmation, DealValue, FirmDetails, LawyerEntry, OpposingCounsel, RefereeEntry,
        SubmissionExport, SubmissionMatter,
    },
    template::TemplateType,
};
use serde_json::{Value, json};
use std::io::{Cursor, Read};
use std::sync::Arc;

pub const FIXED_MILLIS: i64 = 1_717_171_717_171;

/// Engine over the built-in catalog with a pinned clock.
pub fn engine() -> ExportEngine {
    engine_with(TemplateRegistry::with_builtin_templates())
}

pub fn engine_with(registry: TemplateRegistry) -> ExportEngine {
    ExportEngine::new(Arc::new(registry))
        .with_clock(Arc::new(FixedClock::new(FIXED_MILLIS)))
        .with_file_naming(FileNaming::Timestamp)
}

/// A complete matter record as supplied by the persistence layer.
pub fn matter() -> Value {
    json!({
        "title": "Acquisition of Beta Ltd. by Acme",
        "clientName": "Beta Ltd.",
        "counterparties": ["Acme Corp", "Gamma Holdings"],
        "dealValue": { "amount": 125000000, "currency": "USD" },
        "synthesizedData": {
            "description": "Advised Beta on its sale to Acme.",
            "keyAchievements": ["Closed in six weeks", "Secured regulatory approval"],
            "legalNovelty": "First cross-border merger under the new regime.",
            "practiceAreas": ["Corporate/M&A", "Competition"]
        },
        "leadPartner": "Dana Levi",
        "teamMembers": ["Noa Cohen", "Eli Mizrahi"],
        "completionDate": "2024-03-31"
    })
}

pub fn docx_part(bytes: &[u8], part: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("docx is a zip");
    let mut xml = String::new();
    archive
        .by_name(part)
        .unwrap_or_else(|_| panic!("missing part {part}"))
        .read_to_string(&mut xml)
        .expect("utf-8 part");
    xml
}

pub fn document_xml(bytes: &[u8]) -> String {
    docx_part(bytes, "word/document.xml")
}

pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::new(width, height));
    let mut cursor = Cursor::new(Vec::new());
    img.write_to(&mut cursor, image::ImageFormat::Png)
        .expect("encode png");
    cursor.into_inner()
}

pub fn submission() -> SubmissionExport {
    SubmissionExport {
        directory: TemplateType::Chambers,
        year: 2024,
        firm: FirmDetails {
            name: "Cohen, Levi & Co.".into(),
            department: "Corporate".into(),
            contact_name: "Maya Ben-David".into(),
            contact_email: "maya@cohenlevi.co.il".into(),
            contact_phone: "+972-3-555-0101".into(),
            website: "https://cohenlevi.co.il".into(),
            heads_of_department: vec!["Dana Levi".into(), "Avi Cohen".into()],
        },
        lawyers: vec![LawyerEntry {
            name: "Dana Levi".into(),
            position: "partner".into(),
            practice_area: "corporate_ma".into(),
            email: "dana@cohenlevi.co.il".into(),
        }],
        matters: vec![SubmissionMatter {
            client_name: "Beta Ltd.".into(),
            description: "Sale of Beta to Acme".into(),
            opposing_counsel: vec![OpposingCounsel {
                firm_name: "Herzog Fox".into(),
                represented_party: "Acme".into(),
                practice_area: "corporate_ma".into(),
            }],
            deal_value: Some(DealValue::new(1_234_567.0, "ILS")),
            status: "completed".into(),
        }],
        referees: vec![RefereeEntry {
            name: "Ruth Adler".into(),
            position: "General Counsel".into(),
            company: "Beta Ltd.".into(),
            email: "ruth@beta.example".into(),
            phone: "+972-52-000-0000".into(),
        }],
        confirmation: Confirmation {
            signatory_name: "Dana Levi".into(),
            signatory_position: "Managing Partner".into(),
            date: "2024-05-01".into(),
        },
        logo: None,
    }
}
