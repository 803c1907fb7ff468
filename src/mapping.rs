//! Field mapping: resolved record values merged with caller overrides.

use crate::record::{FieldValue, resolve};
use crate::template::TemplateDefinition;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Caller-supplied values keyed by field name.
///
/// A `null` entry counts as "not supplied", so deserialized JSON forms can send
/// every key without forcing an override.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldOverrides(IndexMap<String, Option<FieldValue>>);

impl FieldOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) {
        self.0.insert(name.into(), Some(value.into()));
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name).and_then(Option::as_ref)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for FieldOverrides
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), Some(v.into())))
                .collect(),
        )
    }
}

/// Flat field name → value map for one generation call.
///
/// Entries follow the template's field order; absent fields have no entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct FieldValueMap(IndexMap<String, FieldValue>);

impl FieldValueMap {
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Produces the value map for `template`.
///
/// An override replaces resolution entirely; otherwise a field with a source
/// path takes the resolved value; otherwise it stays absent.
pub fn map_fields(
    template: &TemplateDefinition,
    record: &Value,
    overrides: Option<&FieldOverrides>,
) -> FieldValueMap {
    let mut values = IndexMap::with_capacity(template.fields.len());
    for field in &template.fields {
        let value = overrides
            .and_then(|o| o.get(&field.name))
            .cloned()
            .or_else(|| field.mapped_from.as_ref().and_then(|path| resolve(record, path)));
        if let Some(value) = value {
            values.insert(field.name.clone(), value);
        }
    }
    FieldValueMap(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::template::{OutputFormat, TemplateField, TemplateType};
    use serde_json::json;

    fn template() -> TemplateDefinition {
        TemplateDefinition::new("t", "T", TemplateType::Chambers, OutputFormat::Docx)
            .field(TemplateField::text("title", "Title").mapped_from("title"))
            .field(TemplateField::text("clientName", "Client").mapped_from("clientName"))
            .field(TemplateField::text("note", "Note"))
            .field(TemplateField::text("amount", "Amount").mapped_from("dealValue.amount"))
    }

    #[test]
    fn override_wins_over_resolution() {
        let record = json!({ "title": "Atlas", "clientName": "Beta" });
        let overrides = FieldOverrides::new().with("clientName", "Acme");
        let map = map_fields(&template(), &record, Some(&overrides));
        assert_eq!(map.get("clientName"), Some(&FieldValue::from("Acme")));
        assert_eq!(map.get("title"), Some(&FieldValue::from("Atlas")));
    }

    #[test]
    fn unmapped_fields_need_an_override() {
        let record = json!({ "note": "ignored without mappedFrom" });
        let map = map_fields(&template(), &record, None);
        assert!(!map.contains("note"));

        let overrides = FieldOverrides::new().with("note", "from form");
        let map = map_fields(&template(), &record, Some(&overrides));
        assert_eq!(map.get("note"), Some(&FieldValue::from("from form")));
    }

    #[test]
    fn null_overrides_fall_back_to_record() {
        let overrides: FieldOverrides =
            serde_json::from_value(json!({ "title": null, "clientName": "Acme" })).unwrap();
        let record = json!({ "title": "Atlas" });
        let map = map_fields(&template(), &record, Some(&overrides));
        assert_eq!(map.get("title"), Some(&FieldValue::from("Atlas")));
        assert_eq!(map.get("clientName"), Some(&FieldValue::from("Acme")));
    }

    #[test]
    fn absent_values_are_left_out_in_field_order() {
        let record = json!({ "clientName": "Beta", "title": "Atlas", "dealValue": null });
        let map = map_fields(&template(), &record, None);
        let names = map.iter().map(|(k, _)| k).collect::<Vec<_>>();
        assert_eq!(names, ["title", "clientName"]);
    }
}
