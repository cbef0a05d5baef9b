//! Placeholder-based prompt template with strict rendering.

use tracing::trace;

use crate::errors::PromptError;

/// A static prompt template together with its declared placeholders.
///
/// Placeholders appear in the text as `{name}` and must match a declared
/// variable exactly. Rendering is strict: every declared variable needs a
/// supplied value, otherwise [`PromptError::MissingVariable`] is returned.
/// Undeclared `{...}` sequences in the text are left untouched.
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    /// Raw template text.
    pub text: &'static str,
    /// Declared placeholder names, without braces.
    pub variables: &'static [&'static str],
}

impl PromptTemplate {
    /// Creates a template from text and its declared placeholder names.
    pub const fn new(text: &'static str, variables: &'static [&'static str]) -> Self {
        Self { text, variables }
    }

    /// Renders the template against named values.
    ///
    /// `values` pairs placeholder names with their substitution text. Extra
    /// pairs that the template does not declare are ignored.
    ///
    /// # Errors
    /// Returns [`PromptError::MissingVariable`] if any declared placeholder
    /// has no matching entry in `values`.
    pub fn render(&self, values: &[(&str, &str)]) -> Result<String, PromptError> {
        trace!(
            variables = self.variables.len(),
            supplied = values.len(),
            "rendering prompt template"
        );

        let mut out = self.text.to_string();
        for var in self.variables {
            let value = values
                .iter()
                .find(|(name, _)| name == var)
                .map(|(_, v)| *v)
                .ok_or_else(|| PromptError::MissingVariable((*var).to_string()))?;
            out = out.replace(&format!("{{{var}}}"), value);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GREETING: PromptTemplate =
        PromptTemplate::new("Hello {name}, about {topic}.", &["name", "topic"]);

    #[test]
    fn renders_all_placeholders() {
        let out = GREETING
            .render(&[("name", "Ada"), ("topic", "refunds")])
            .unwrap();
        assert_eq!(out, "Hello Ada, about refunds.");
    }

    #[test]
    fn missing_variable_is_an_error() {
        let err = GREETING.render(&[("name", "Ada")]).unwrap_err();
        match err {
            PromptError::MissingVariable(v) => assert_eq!(v, "topic"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn extra_values_are_ignored() {
        let out = GREETING
            .render(&[("name", "Ada"), ("topic", "x"), ("unused", "y")])
            .unwrap();
        assert_eq!(out, "Hello Ada, about x.");
    }

    #[test]
    fn undeclared_braces_survive() {
        const T: PromptTemplate = PromptTemplate::new("{a} and {literal}", &["a"]);
        let out = T.render(&[("a", "one")]).unwrap();
        assert_eq!(out, "one and {literal}");
    }
}
