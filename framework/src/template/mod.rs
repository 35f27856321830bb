//! HTML email templates.
//!
//! Templates are plain files under a root directory, written in
//! [minijinja](https://docs.rs/minijinja) syntax. The worker renders them with
//! [`TemplateData`](crate::command::TemplateData), so a template refers to
//! `{{ ActivationCode }}` and `{{ UserName }}`. Values are HTML-escaped in
//! `.html` templates.

mod renderer;

pub use renderer::{validate_name, FileRenderer, Renderer};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("invalid template name: {0:?}")]
    InvalidName(String),

    #[error("template not found: {0}")]
    NotFound(String),

    #[error("failed to render {name}: {source}")]
    Render {
        name: String,
        #[source]
        source: minijinja::Error,
    },
}
