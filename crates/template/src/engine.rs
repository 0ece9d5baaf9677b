//! Template engine implementation
//!
//! The engine wraps minijinja with the project templates embedded at build
//! time, so a culting binary never depends on files next to it.

use crate::context::ProjectContext;
use crate::{Result, functions, template_error};
use minijinja::Environment;

/// Embedded templates, keyed by the file they produce
const TEMPLATES: &[(&str, &str)] = &[
    ("README.md", include_str!("../templates/README.md.j2")),
    ("pyproject.toml", include_str!("../templates/pyproject.toml.j2")),
    ("__init__.py", include_str!("../templates/__init__.py.j2")),
    ("__main__.py", include_str!("../templates/__main__.py.j2")),
];

/// Template engine for rendering generated project files
pub struct TemplateEngine {
    env: Environment<'static>,
}

impl TemplateEngine {
    /// Create an engine with the built-in templates registered
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Template`] if an embedded template fails to parse.
    pub fn new() -> Result<Self> {
        let mut env = Environment::new();

        // trim_blocks: remove newlines after block tags
        // lstrip_blocks: strip leading whitespace from block lines
        // keep_trailing_newline: generated files always end with a newline
        env.set_trim_blocks(true);
        env.set_lstrip_blocks(true);
        env.set_keep_trailing_newline(true);

        env.add_filter("quote", functions::quote);
        env.add_filter("normalize", functions::normalize);
        env.add_filter("title_case", functions::title_case);

        for (name, source) in TEMPLATES {
            env.add_template(name, source)
                .map_err(|e| template_error(&e))?;
        }

        Ok(Self { env })
    }

    /// Names of the embedded templates
    pub fn names(&self) -> impl Iterator<Item = &'static str> {
        TEMPLATES.iter().map(|(name, _)| *name)
    }

    /// Render one of the embedded templates
    ///
    /// # Errors
    ///
    /// Returns error if the template is unknown or rendering fails
    pub fn render(&self, name: &str, context: &ProjectContext) -> Result<String> {
        let template = self.env.get_template(name).map_err(|e| template_error(&e))?;
        template.render(context).map_err(|e| template_error(&e))
    }

    /// Render an ad-hoc template string, naming it for error messages
    ///
    /// # Errors
    ///
    /// Returns error if template rendering fails
    pub fn render_named_str(
        &self,
        name: &str,
        template: &str,
        context: &ProjectContext,
    ) -> Result<String> {
        self.env
            .render_named_str(name, template, context)
            .map_err(|e| template_error(&e))
    }

    /// Fill the placeholders GitHub license texts use
    ///
    /// `[year]` becomes the current year and `[fullname]` the copyright holder.
    #[must_use]
    pub fn fill_license(text: &str, context: &ProjectContext) -> String {
        text.replace("[year]", &context.year.to_string())
            .replace("[fullname]", &context.copyright_holder())
    }
}
