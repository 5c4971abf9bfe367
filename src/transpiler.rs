use crate::dom::{parse_fragment, serialize};
use crate::error::MailforgeResult;
use crate::layout::group_layouts;
use crate::render::render_components;
use crate::sanitize::sanitize;
use tracing::{debug, warn};

/// Converts editor markup into table-based, email-safe markup.
///
/// Holds no state; one value can be shared freely between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct Transpiler;

impl Transpiler {
    pub fn new() -> Self {
        Self
    }

    /// Transpile one editor document.
    ///
    /// Empty or whitespace-only input yields an empty string. Markup the
    /// HTML parser reports problems for is rejected as a whole.
    pub fn transpile(&self, raw: &str) -> MailforgeResult<String> {
        if raw.trim().is_empty() {
            return Ok(String::new());
        }

        let mut nodes = parse_fragment(raw).inspect_err(|e| {
            warn!(error = %e, "rejecting editor document");
        })?;

        group_layouts(&mut nodes);
        render_components(&mut nodes);
        sanitize(&mut nodes);

        let clean = serialize(&nodes);
        debug!(input = raw.len(), output = clean.len(), "transpiled document");
        Ok(clean)
    }
}

/// Transpile `raw` editor markup with a default [`Transpiler`].
pub fn transpile(raw: &str) -> MailforgeResult<String> {
    Transpiler::new().transpile(raw)
}
