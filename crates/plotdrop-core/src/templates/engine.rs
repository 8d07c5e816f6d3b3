//! Tera-based document rendering with the script-literal filter registered.

use serde::Serialize;
use tera::{Context, Tera};

use super::filters::{JsonScript, JSON_SCRIPT};
use super::TemplateStore;
use crate::error::{RenderError, RenderResult};
use crate::model::DocumentKind;

/// Compiled document templates.
///
/// All three templates are parsed once at construction, so a broken override
/// template is reported at startup rather than on first use.
#[derive(Debug)]
pub struct TemplateEngine {
    tera: Tera,
}

impl TemplateEngine {
    /// Compile the templates resolved by a [`TemplateStore`].
    pub fn new(store: &TemplateStore) -> RenderResult<Self> {
        let mut tera = Tera::default();
        tera.register_filter(JSON_SCRIPT, JsonScript);

        for kind in DocumentKind::ALL {
            tera.add_raw_template(kind.template_name(), store.source(kind))
                .map_err(|source| RenderError::TemplateLoad { kind, source })?;
        }

        Ok(Self { tera })
    }

    /// Execute the template for `kind` with `data` as its context.
    ///
    /// `data` must serialize to a JSON object; its fields become top-level
    /// template variables.
    pub fn render<T: Serialize>(&self, kind: DocumentKind, data: &T) -> RenderResult<Vec<u8>> {
        let context = Context::from_serialize(data)
            .map_err(|source| RenderError::TemplateExecution { kind, source })?;

        self.tera
            .render(kind.template_name(), &context)
            .map(String::into_bytes)
            .map_err(|source| RenderError::TemplateExecution { kind, source })
    }
}
