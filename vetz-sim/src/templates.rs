//! Static per-type data ("thing templates").
//!
//! Templates are shared by every actor of a type and loaded once, from TOML:
//!
//! ```toml
//! [[template]]
//! name = "Ranger"
//! trainable = true
//! experience_values = [20, 40, 60, 80]
//! base_health = 180.0
//! health_per_level = 20.0
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use vetz_core::{ExperienceTemplate, Result, VetzError};

/// Per-type data for actors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThingTemplate {
    /// Unique template name; written to saves.
    pub name: String,
    /// Whether actors of this type gain experience.
    #[serde(default)]
    pub trainable: bool,
    /// Kill value per veterancy level. Levels past the end use the last entry.
    #[serde(default)]
    pub experience_values: Vec<i32>,
    /// Max health at level 0.
    #[serde(default = "default_base_health")]
    pub base_health: f32,
    /// Max health added per veterancy level.
    #[serde(default)]
    pub health_per_level: f32,
}

impl ThingTemplate {
    /// A template with no kill value and default health.
    #[must_use]
    pub fn new(name: impl Into<String>, trainable: bool) -> Self {
        Self {
            name: name.into(),
            trainable,
            experience_values: Vec::new(),
            base_health: default_base_health(),
            health_per_level: 0.0,
        }
    }

    /// Set the per-level kill values.
    #[must_use]
    pub fn with_experience_values(mut self, values: Vec<i32>) -> Self {
        self.experience_values = values;
        self
    }

    /// Set the health curve.
    #[must_use]
    pub fn with_health(mut self, base: f32, per_level: f32) -> Self {
        self.base_health = base;
        self.health_per_level = per_level;
        self
    }

    /// Max health of an actor of this type at `level`.
    #[must_use]
    pub fn max_health_at(&self, level: u32) -> f32 {
        #[allow(clippy::cast_precision_loss)]
        let level = level as f32;
        self.base_health + self.health_per_level * level
    }
}

impl ExperienceTemplate for ThingTemplate {
    fn experience_value(&self, level: u32) -> i32 {
        let index = usize::try_from(level).unwrap_or(usize::MAX);
        self.experience_values
            .get(index)
            .or(self.experience_values.last())
            .copied()
            .unwrap_or(0)
    }

    fn is_trainable(&self) -> bool {
        self.trainable
    }
}

fn default_base_health() -> f32 {
    100.0
}

/// All templates known to a world, by name.
#[derive(Debug, Clone, Default)]
pub struct TemplateRegistry {
    templates: BTreeMap<String, Arc<ThingTemplate>>,
}

#[derive(Deserialize)]
struct TemplateFile {
    #[serde(default)]
    template: Vec<ThingTemplate>,
}

impl TemplateRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load `[[template]]` tables from a TOML string.
    ///
    /// # Errors
    /// Returns [`VetzError::Config`] for invalid TOML or duplicate names.
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let file: TemplateFile = toml::from_str(toml_str).map_err(|e| VetzError::Config(e.to_string()))?;
        let mut registry = Self::new();
        for template in file.template {
            if registry.contains(&template.name) {
                return Err(VetzError::Config(format!("duplicate template: {}", template.name)));
            }
            registry.insert(template);
        }
        Ok(registry)
    }

    /// Load `[[template]]` tables from a TOML file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Add or replace a template.
    pub fn insert(&mut self, template: ThingTemplate) {
        self.templates.insert(template.name.clone(), Arc::new(template));
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.templates.contains_key(name)
    }

    /// A template by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<ThingTemplate>> {
        self.templates.get(name).cloned()
    }

    /// A template by name, or [`VetzError::UnknownTemplate`].
    ///
    /// # Errors
    /// Fails when `name` is not registered.
    pub fn require(&self, name: &str) -> Result<Arc<ThingTemplate>> {
        self.get(name).ok_or_else(|| VetzError::UnknownTemplate(name.to_string()))
    }

    /// Number of templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_value_clamps_to_last_level() {
        let template = ThingTemplate::new("Ranger", true).with_experience_values(vec![20, 40, 60]);
        assert_eq!(template.experience_value(0), 20);
        assert_eq!(template.experience_value(2), 60);
        assert_eq!(template.experience_value(9), 60);
        assert_eq!(ThingTemplate::new("Wall", false).experience_value(0), 0);
    }

    #[test]
    fn health_grows_per_level() {
        let template = ThingTemplate::new("Tank", true).with_health(400.0, 50.0);
        assert!((template.max_health_at(0) - 400.0).abs() < f32::EPSILON);
        assert!((template.max_health_at(3) - 550.0).abs() < f32::EPSILON);
    }

    #[test]
    fn registry_from_toml() {
        let registry = TemplateRegistry::from_toml(
            r#"
            [[template]]
            name = "Ranger"
            trainable = true
            experience_values = [20, 40]

            [[template]]
            name = "Bunker"
            "#,
        )
        .expect("valid templates");

        assert_eq!(registry.len(), 2);
        let ranger = registry.require("Ranger").expect("registered");
        assert!(ranger.is_trainable());
        let bunker = registry.require("Bunker").expect("registered");
        assert!(!bunker.is_trainable());
        assert!((bunker.base_health - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn duplicate_names_rejected() {
        let err = TemplateRegistry::from_toml("[[template]]\nname = \"A\"\n[[template]]\nname = \"A\"\n")
            .expect_err("duplicate");
        assert!(matches!(err, VetzError::Config(_)));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let err = TemplateRegistry::new().require("Ghost").expect_err("missing");
        assert!(matches!(err, VetzError::UnknownTemplate(name) if name == "Ghost"));
    }
}
