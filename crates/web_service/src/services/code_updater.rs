//! Allow-listed file replacement behind `/update-code`.

use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::error::AppError;

pub struct CodeUpdater {
    writable_paths: Vec<PathBuf>,
}

/// `path` with its parent directory canonicalized. The file itself need not
/// exist yet.
async fn resolve(path: &Path) -> Option<PathBuf> {
    let file_name = path.file_name()?.to_owned();
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    Some(fs::canonicalize(parent).await.ok()?.join(file_name))
}

impl CodeUpdater {
    pub fn new(writable_paths: Vec<PathBuf>) -> Self {
        Self { writable_paths }
    }

    /// Return the resolved target if `requested` names an allow-listed file.
    pub async fn authorize(&self, requested: &str) -> Result<PathBuf, AppError> {
        let not_allowed = || AppError::PathNotAllowed(requested.to_string());
        if requested.trim().is_empty() {
            return Err(AppError::Validation("Missing 'file' in request.".to_string()));
        }

        let target = resolve(Path::new(requested))
            .await
            .ok_or_else(not_allowed)?;
        for allowed in &self.writable_paths {
            if resolve(allowed).await.as_ref() == Some(&target) {
                return Ok(target);
            }
        }

        tracing::warn!(requested, "Rejected write outside the allow-list");
        Err(not_allowed())
    }

    /// Replace `target` with `contents` via a sibling temp file and a rename,
    /// so readers never observe a partial write. An existing file keeps its
    /// permissions.
    pub async fn write(&self, target: &Path, contents: &str) -> Result<(), AppError> {
        let parent = target
            .parent()
            .ok_or_else(|| AppError::PathNotAllowed(target.display().to_string()))?;
        let file_name = target
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let tmp = parent.join(format!(".{}.{}.tmp", file_name, Uuid::new_v4()));

        let permissions = match fs::metadata(target).await {
            Ok(meta) => Some(meta.permissions()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        if let Err(e) = replace_with(&tmp, target, contents, permissions).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::info!(
            path = %target.display(),
            bytes = contents.len(),
            "File updated"
        );
        Ok(())
    }
}

async fn replace_with(
    tmp: &Path,
    target: &Path,
    contents: &str,
    permissions: Option<std::fs::Permissions>,
) -> std::io::Result<()> {
    fs::write(tmp, contents).await?;
    if let Some(permissions) = permissions {
        fs::set_permissions(tmp, permissions).await?;
    }
    fs::rename(tmp, target).await
}
