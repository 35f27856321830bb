//! Renderer trait and file-system implementation.

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use minijinja::{path_loader, Environment, ErrorKind, UndefinedBehavior};

use super::TemplateError;
use crate::command::TemplateData;

/// Turns a template identifier plus data into an HTML body.
///
/// Implementations must be safe to call from several tasks at once.
pub trait Renderer: Send + Sync + 'static {
    fn render(&self, name: &str, data: &TemplateData) -> Result<String, TemplateError>;
}

impl<R: Renderer> Renderer for Arc<R> {
    fn render(&self, name: &str, data: &TemplateData) -> Result<String, TemplateError> {
        (**self).render(name, data)
    }
}

/// Check a template identifier before it is resolved against the root.
///
/// Only relative paths made of plain segments are accepted; anything that
/// could step outside the root (`..`, absolute paths, drive prefixes,
/// backslashes) is refused.
pub fn validate_name(name: &str) -> Result<(), TemplateError> {
    let plain = !name.is_empty()
        && !name.contains(|c: char| c == '\\' || c == '\0')
        && Path::new(name)
            .components()
            .all(|component| matches!(component, Component::Normal(_)));

    if plain {
        Ok(())
    } else {
        Err(TemplateError::InvalidName(name.to_string()))
    }
}

/// Renders templates stored under a fixed root directory.
///
/// Templates are loaded lazily on first use and cached for the lifetime of
/// the renderer. Referencing a variable the data does not provide is an
/// error rather than an empty string.
pub struct FileRenderer {
    env: Environment<'static>,
}

impl FileRenderer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();

        let mut env = Environment::new();
        env.set_loader(path_loader(&root));
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        Self { env }
    }
}

impl Renderer for FileRenderer {
    fn render(&self, name: &str, data: &TemplateData) -> Result<String, TemplateError> {
        validate_name(name)?;

        let template = self.env.get_template(name).map_err(|e| match e.kind() {
            ErrorKind::TemplateNotFound => TemplateError::NotFound(name.to_string()),
            _ => TemplateError::Render {
                name: name.to_string(),
                source: e,
            },
        })?;

        template.render(data).map_err(|source| TemplateError::Render {
            name: name.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(user_name: &str) -> TemplateData {
        TemplateData {
            activation_code: "123456".into(),
            user_name: user_name.into(),
        }
    }

    fn renderer_with(files: &[(&str, &str)]) -> (tempfile::TempDir, FileRenderer) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            let path = dir.path().join(name);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).unwrap();
            }
            std::fs::write(path, content).unwrap();
        }
        let renderer = FileRenderer::new(dir.path());
        (dir, renderer)
    }

    #[test]
    fn substitutes_code_and_name() {
        let (_dir, renderer) = renderer_with(&[(
            "activation.html",
            "<p>Hi {{ UserName }}, your code is <b>{{ ActivationCode }}</b></p>",
        )]);

        let html = renderer.render("activation.html", &data("Ada")).unwrap();
        assert_eq!(html, "<p>Hi Ada, your code is <b>123456</b></p>");
    }

    #[test]
    fn escapes_values_in_html_templates() {
        let (_dir, renderer) = renderer_with(&[("activation.html", "{{ UserName }}")]);

        let html = renderer
            .render("activation.html", &data("<script>x</script>"))
            .unwrap();
        assert!(!html.contains("<script>"), "{html}");
        assert!(html.contains("&lt;script&gt;"), "{html}");
    }

    #[test]
    fn resolves_nested_names() {
        let (_dir, renderer) = renderer_with(&[("tr/reset.html", "{{ ActivationCode }}")]);

        assert_eq!(renderer.render("tr/reset.html", &data("Ada")).unwrap(), "123456");
    }

    #[test]
    fn missing_file_is_not_found() {
        let (_dir, renderer) = renderer_with(&[]);

        let err = renderer.render("missing.html", &data("Ada")).unwrap_err();
        assert!(matches!(err, TemplateError::NotFound(name) if name == "missing.html"));
    }

    #[test]
    fn syntax_and_undefined_errors_are_render_errors() {
        let (_dir, renderer) = renderer_with(&[
            ("broken.html", "{{ UserName "),
            ("typo.html", "{{ ActivationLink }}"),
        ]);

        assert!(matches!(
            renderer.render("broken.html", &data("Ada")),
            Err(TemplateError::Render { .. })
        ));
        assert!(matches!(
            renderer.render("typo.html", &data("Ada")),
            Err(TemplateError::Render { .. })
        ));
    }

    #[test]
    fn refuses_names_outside_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("secret.html"), "secret").unwrap();
        let renderer = FileRenderer::new(dir.path().join("templates"));

        for name in [
            "../secret.html",
            "a/../../secret.html",
            "/etc/passwd",
            "..\\secret.html",
            "./activation.html",
            "",
        ] {
            let err = renderer.render(name, &data("Ada")).unwrap_err();
            assert!(matches!(err, TemplateError::InvalidName(_)), "{name}: {err}");
        }
    }

    #[test]
    fn validate_name_accepts_plain_paths() {
        assert!(validate_name("activation.html").is_ok());
        assert!(validate_name("en/forgot_password.html").is_ok());
    }
}
