//! Template rendering with Tera.

use std::error::Error as _;

use serde_yaml::Mapping;
use tera::{Context, Tera};
use tracing::debug;

use crate::error::{TemplateError, TemplateResult};

/// Renders named templates against a variable mapping.
///
/// Template names are relative paths without the template extension, for
/// example `cisco_ios/base`. Output is never HTML-escaped.
#[derive(Debug)]
pub struct TemplateRenderer {
    tera: Tera,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::empty()
    }
}

impl TemplateRenderer {
    /// Create a renderer without any templates.
    pub fn empty() -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        Self { tera }
    }

    /// Create a renderer from `(name, source)` pairs.
    ///
    /// All templates are registered together so `extends` and `include` may
    /// reference each other regardless of order.
    pub fn from_sources<I, N, S>(templates: I) -> Result<Self, tera::Error>
    where
        I: IntoIterator<Item = (N, S)>,
        N: AsRef<str>,
        S: AsRef<str>,
    {
        let mut renderer = Self::empty();
        renderer.tera.add_raw_templates(templates)?;
        Ok(renderer)
    }

    /// Check whether a template is registered.
    pub fn has_template(&self, name: &str) -> bool {
        self.tera.get_template_names().any(|n| n == name)
    }

    /// Registered template names, sorted.
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .tera
            .get_template_names()
            .map(String::from)
            .collect();
        names.sort();
        names
    }

    /// Render a template with the given variables.
    pub fn render(&self, name: &str, variables: &Mapping) -> TemplateResult<String> {
        if !self.has_template(name) {
            return Err(TemplateError::NotFound(name.to_string()));
        }

        let context =
            Context::from_serialize(variables).map_err(|e| TemplateError::InvalidContext {
                template: name.to_string(),
                message: format_tera_error(&e),
            })?;

        let rendered =
            self.tera
                .render(name, &context)
                .map_err(|e| TemplateError::RenderingFailed {
                    template: name.to_string(),
                    message: format_tera_error(&e),
                })?;

        debug!("Rendered template {} ({} bytes)", name, rendered.len());
        Ok(rendered)
    }
}

/// Flatten a Tera error and its causes into one message.
///
/// Tera reports the interesting part (missing variable, syntax error) in the
/// source chain, not in the top-level message.
pub fn format_tera_error(error: &tera::Error) -> String {
    let mut messages = vec![error.to_string()];
    let mut current = error.source();
    while let Some(err) = current {
        let message = err.to_string();
        if !message.is_empty() && !messages.contains(&message) {
            messages.push(message);
        }
        current = err.source();
    }
    messages.join(": ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(text: &str) -> Mapping {
        serde_yaml::from_str(text).unwrap()
    }

    #[test]
    fn test_render_nested_variables() {
        let renderer = TemplateRenderer::from_sources([(
            "ios/base",
            "hostname {{ hostname }}\n{% for s in ntp %}ntp server {{ s }}\n{% endfor %}mtu {{ intf.mtu }}",
        )])
        .unwrap();

        let rendered = renderer
            .render("ios/base", &vars("hostname: r1\nntp: [a, b]\nintf: {mtu: 9000}"))
            .unwrap();
        assert_eq!(rendered, "hostname r1\nntp server a\nntp server b\nmtu 9000");
    }

    #[test]
    fn test_render_does_not_escape() {
        let renderer = TemplateRenderer::from_sources([("x/base", "{{ banner }}")]).unwrap();
        let rendered = renderer.render("x/base", &vars("banner: '<authorized & only>'")).unwrap();
        assert_eq!(rendered, "<authorized & only>");
    }

    #[test]
    fn test_missing_template() {
        let renderer = TemplateRenderer::empty();
        let err = renderer.render("junos/base", &Mapping::new()).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(name) if name == "junos/base"));
    }

    #[test]
    fn test_missing_variable_reports_cause() {
        let renderer = TemplateRenderer::from_sources([("ios/base", "{{ hostname }}")]).unwrap();
        let err = renderer.render("ios/base", &Mapping::new()).unwrap_err();
        match err {
            TemplateError::RenderingFailed { template, message } => {
                assert_eq!(template, "ios/base");
                assert!(message.contains("hostname"), "unexpected message: {}", message);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_templates_reference_each_other() {
        let renderer = TemplateRenderer::from_sources([
            ("ios/base", "{% include \"common/banner\" %}hostname {{ hostname }}"),
            ("common/banner", "! managed\n"),
        ])
        .unwrap();
        assert!(renderer.has_template("common/banner"));
        assert_eq!(renderer.template_names(), vec!["common/banner", "ios/base"]);

        let rendered = renderer.render("ios/base", &vars("hostname: r1")).unwrap();
        assert_eq!(rendered, "! managed\nhostname r1");
    }
}
