use crate::error::{GenError, GenResult};
use handlebars::Handlebars;
use serde_json::Value;

/// Turns a template and a view into source text
pub trait TemplateEngine {
    fn render(&self, template: &str, data: &Value) -> GenResult<String>;
}

/// Handlebars templates, without HTML escaping
pub struct HandlebarsEngine {
    registry: Handlebars<'static>,
}

impl HandlebarsEngine {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(handlebars::no_escape);
        Self { registry }
    }

    /// Fail on references to fields a view does not have
    pub fn strict(mut self) -> Self {
        self.registry.set_strict_mode(true);
        self
    }
}

impl Default for HandlebarsEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for HandlebarsEngine {
    fn render(&self, template: &str, data: &Value) -> GenResult<String> {
        self.registry
            .render_template(template, data)
            .map_err(|e| GenError::Template(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_render_without_escaping() {
        let engine = HandlebarsEngine::new();
        let out = engine
            .render("let x: {{type}}", &json!({ "type": "[String: Int]<T>" }))
            .unwrap();
        assert_eq!(out, "let x: [String: Int]<T>");
    }

    #[test]
    fn test_each_with_last_flags() {
        let engine = HandlebarsEngine::new();
        let data = json!([
            { "name": "a", "last": false },
            { "name": "b", "last": true }
        ]);
        let out = engine
            .render("{{#each this}}{{name}}{{#unless last}}, {{/unless}}{{/each}}", &data)
            .unwrap();
        assert_eq!(out, "a, b");
    }

    #[test]
    fn test_strict_mode_reports_missing_fields() {
        let engine = HandlebarsEngine::new().strict();
        let err = engine.render("{{missing}}", &json!({})).unwrap_err();
        assert!(matches!(err, GenError::Template(_)));
    }

    #[test]
    fn test_malformed_template() {
        let engine = HandlebarsEngine::new();
        let err = engine.render("{{#each items}}", &json!({})).unwrap_err();
        assert!(matches!(err, GenError::Template(_)));
    }
}
