//! Input shape of the submission questionnaire.
//!
//! Every collection may be shorter or longer than the fixed table sizes; the
//! renderer pads or truncates.

use crate::template::TemplateType;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Rows in each of the lawyer, matter and referee sections.
pub const FIXED_ROWS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionExport {
    pub directory: TemplateType,
    pub year: i32,
    #[serde(default)]
    pub firm: FirmDetails,
    #[serde(default)]
    pub lawyers: Vec<LawyerEntry>,
    #[serde(default)]
    pub matters: Vec<SubmissionMatter>,
    #[serde(default)]
    pub referees: Vec<RefereeEntry>,
    #[serde(default)]
    pub confirmation: Confirmation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<LogoImage>,
}

impl SubmissionExport {
    pub fn new(directory: TemplateType, year: i32) -> Self {
        Self {
            directory,
            year,
            firm: FirmDetails::default(),
            lawyers: Vec::new(),
            matters: Vec::new(),
            referees: Vec::new(),
            confirmation: Confirmation::default(),
            logo: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FirmDetails {
    pub name: String,
    pub department: String,
    pub contact_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub website: String,
    pub heads_of_department: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LawyerEntry {
    pub name: String,
    pub position: String,
    pub practice_area: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmissionMatter {
    pub client_name: String,
    pub description: String,
    pub opposing_counsel: Vec<OpposingCounsel>,
    pub deal_value: Option<DealValue>,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealValue {
    pub amount: f64,
    pub currency: String,
}

impl DealValue {
    pub fn new(amount: f64, currency: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpposingCounsel {
    pub firm_name: String,
    pub represented_party: String,
    pub practice_area: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RefereeEntry {
    pub name: String,
    pub position: String,
    pub company: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Confirmation {
    pub signatory_name: String,
    pub signatory_position: String,
    pub date: String,
}

/// PNG bytes; base64 text on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogoImage(pub Vec<u8>);

impl LogoImage {
    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for LogoImage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(&self.0))
    }
}

impl<'de> Deserialize<'de> for LogoImage {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        // tolerate data URLs as produced by browser uploads
        let payload = text
            .split_once("base64,")
            .map(|(_, rest)| rest)
            .unwrap_or(&text);
        STANDARD
            .decode(payload.trim())
            .map(LogoImage)
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sparse_payload_fills_defaults() {
        let export: SubmissionExport = serde_json::from_value(json!({
            "directory": "chambers",
            "year": 2024,
            "firm": { "name": "Cohen & Co" },
            "matters": [{ "clientName": "Acme", "dealValue": { "amount": 10.0, "currency": "USD" } }]
        }))
        .unwrap();
        assert_eq!(export.firm.name, "Cohen & Co");
        assert!(export.lawyers.is_empty());
        assert_eq!(export.matters[0].deal_value, Some(DealValue::new(10.0, "USD")));
        assert!(export.matters[0].opposing_counsel.is_empty());
    }

    #[test]
    fn logo_accepts_plain_and_data_url_base64() {
        let plain: LogoImage = serde_json::from_value(json!("AQID")).unwrap();
        assert_eq!(plain.bytes(), [1, 2, 3]);
        let url: LogoImage = serde_json::from_value(json!("data:image/png;base64,AQID")).unwrap();
        assert_eq!(url, plain);
        assert_eq!(serde_json::to_value(&plain).unwrap(), json!("AQID"));
        assert!(serde_json::from_value::<LogoImage>(json!("%%%")).is_err());
    }
}
