//! In-memory template catalog.

use super::catalog;
use super::schema::{SchemaError, TemplateDefinition};
use indexmap::IndexMap;

/// Catalog of export templates keyed by id.
///
/// Built once at start-up and then shared read-only (typically behind an
/// `Arc`); nothing in the export path mutates it.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: IndexMap<String, TemplateDefinition>,
}

impl TemplateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry preloaded with the directory templates shipped with the crate.
    pub fn with_builtin_templates() -> Self {
        let mut registry = Self::new();
        for def in catalog::builtin_templates() {
            // built-in definitions are covered by tests; a failure here is a bug
            if let Err(error) = registry.register(def) {
                tracing::error!(%error, "built-in template rejected");
            }
        }
        registry
    }

    /// Inserts `def`, replacing any template with the same id.
    ///
    /// A replaced template keeps its original position in [`Self::list`].
    /// Returns the replaced definition, if any.
    pub fn register(
        &mut self,
        def: TemplateDefinition,
    ) -> Result<Option<TemplateDefinition>, SchemaError> {
        def.check()?;
        tracing::debug!(
            template_id = %def.id,
            template_type = %def.template_type,
            format = %def.output_format,
            fields = def.fields.len(),
            "registering template"
        );
        Ok(self.templates.insert(def.id.clone(), def))
    }

    /// Registers every definition, stopping at the first schema error.
    pub fn register_all<I>(&mut self, defs: I) -> Result<(), SchemaError>
    where
        I: IntoIterator<Item = TemplateDefinition>,
    {
        for def in defs {
            self.register(def)?;
        }
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&TemplateDefinition> {
        self.templates.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.templates.contains_key(id)
    }

    /// Definitions in registration order.
    pub fn list(&self) -> impl Iterator<Item = &TemplateDefinition> {
        self.templates.values()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.templates.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
