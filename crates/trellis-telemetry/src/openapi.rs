//! `OpenAPI` artifact persistence.

use std::path::Path;

use serde_json::Value;

use crate::error::{Result, TelemetryError};

/// Write `document` as pretty JSON to `path`, creating parent directories, and
/// return the written payload.
///
/// # Errors
///
/// Returns an error if the document cannot be serialised, the parent directory
/// cannot be created, or the file cannot be written.
pub fn persist_openapi(path: impl AsRef<Path>, document: &Value) -> Result<String> {
    let path = path.as_ref();
    let mut json = serde_json::to_string_pretty(document)
        .map_err(|source| TelemetryError::OpenApiSerialize { source })?;
    json.push('\n');

    if let Some(parent) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| TelemetryError::OpenApiCreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    std::fs::write(path, json.as_bytes()).map_err(|source| TelemetryError::OpenApiWrite {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), bytes = json.len(), "openapi document persisted");
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::error::Error;

    #[test]
    fn writes_document_into_nested_directory() -> std::result::Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("docs").join("api").join("openapi.json");

        let written = persist_openapi(&path, &json!({"openapi": "3.1.0"}))?;
        assert!(written.ends_with('\n'));
        let on_disk: Value = serde_json::from_str(&std::fs::read_to_string(&path)?)?;
        assert_eq!(on_disk["openapi"], "3.1.0");
        Ok(())
    }

    #[test]
    fn parent_that_is_a_file_reports_create_dir() -> std::result::Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "file")?;

        let result = persist_openapi(blocker.join("openapi.json"), &json!({}));
        assert!(matches!(result, Err(TelemetryError::OpenApiCreateDir { .. })));
        Ok(())
    }

    #[test]
    fn directory_target_reports_write() -> std::result::Result<(), Box<dyn Error>> {
        let dir = tempfile::tempdir()?;
        let result = persist_openapi(dir.path(), &json!({}));
        assert!(matches!(result, Err(TelemetryError::OpenApiWrite { .. })));
        Ok(())
    }
}
