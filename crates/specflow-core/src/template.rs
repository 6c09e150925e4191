use crate::error::Result;
use crate::io;
use std::path::Path;

/// What happened when a document was scaffolded from a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateOutcome {
    Rendered,
    /// Template absent; an empty document was written instead.
    Missing,
    /// Destination already existed and was left alone.
    Skipped,
}

/// Replace each `{{KEY}}` token with its value, verbatim. Unknown tokens are
/// left in place.
pub fn render(template: &str, vars: &[(&str, &str)]) -> String {
    vars.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{{{key}}}}}"), value)
    })
}

/// Render `template_path` into `dest` unless `dest` already exists.
pub fn write_from_template(
    template_path: &Path,
    dest: &Path,
    vars: &[(&str, &str)],
) -> Result<TemplateOutcome> {
    let rendered = if template_path.is_file() {
        Some(render(&std::fs::read_to_string(template_path)?, vars))
    } else {
        None
    };

    let body = rendered.as_deref().unwrap_or_default();
    if !io::write_if_missing(dest, body.as_bytes())? {
        return Ok(TemplateOutcome::Skipped);
    }

    match rendered {
        Some(_) => Ok(TemplateOutcome::Rendered),
        None => {
            tracing::warn!(
                template = %template_path.display(),
                "template not found; created empty {}",
                dest.display()
            );
            Ok(TemplateOutcome::Missing)
        }
    }
}
