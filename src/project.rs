use crate::error::{MailforgeError, MailforgeResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// File extension of saved projects.
pub const PROJECT_EXTENSION: &str = "mf";

/// Save the raw, untranspiled editor markup to `path`.
///
/// `.mf` is appended when the path does not already end with it
/// (case-insensitive). Returns the path actually written.
pub fn save_project(path: impl AsRef<Path>, raw_html: &str) -> MailforgeResult<PathBuf> {
    let path = project_path(path.as_ref());
    fs::write(&path, raw_html).map_err(|e| MailforgeError::io(&path, e))?;
    debug!(path = %path.display(), bytes = raw_html.len(), "saved project");
    Ok(path)
}

/// Load the raw editor markup of a saved project, verbatim.
pub fn load_project(path: impl AsRef<Path>) -> MailforgeResult<String> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| MailforgeError::io(path, e))?;
    debug!(path = %path.display(), bytes = raw.len(), "loaded project");
    Ok(raw)
}

fn project_path(path: &Path) -> PathBuf {
    let has_extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(PROJECT_EXTENSION));
    if has_extension {
        path.to_path_buf()
    } else {
        let mut name = path.as_os_str().to_os_string();
        name.push(".");
        name.push(PROJECT_EXTENSION);
        PathBuf::from(name)
    }
}
