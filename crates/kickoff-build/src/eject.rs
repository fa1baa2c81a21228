use std::path::{Path, PathBuf};

/// File name the rendered Dockerfile is ejected to.
pub const DOCKERFILE: &str = "Dockerfile";

/// Writes the rendered Dockerfile into `dir` for manual customization.
///
/// An existing Dockerfile is never overwritten.
pub fn eject(dir: &Path, dockerfile_content: &str) -> Result<PathBuf, EjectError> {
    std::fs::create_dir_all(dir).map_err(|e| EjectError::CreateDir {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let dockerfile_path = dir.join(DOCKERFILE);
    if dockerfile_path.exists() {
        return Err(EjectError::AlreadyEjected(dockerfile_path));
    }

    std::fs::write(&dockerfile_path, dockerfile_content).map_err(|e| EjectError::Write {
        path: dockerfile_path.clone(),
        source: e,
    })?;

    tracing::info!(path = %dockerfile_path.display(), "Dockerfile ejected");
    Ok(dockerfile_path)
}

/// Check if `dir` already holds an ejected Dockerfile.
pub fn is_ejected(dir: &Path) -> bool {
    dir.join(DOCKERFILE).exists()
}

/// Load ejected Dockerfile content.
pub fn load_ejected_dockerfile(dir: &Path) -> Result<String, EjectError> {
    let path = dir.join(DOCKERFILE);
    std::fs::read_to_string(&path).map_err(|e| EjectError::Read { path, source: e })
}

#[derive(Debug, thiserror::Error)]
pub enum EjectError {
    #[error("failed to create directory {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Dockerfile already exists at {0}; edit it directly or delete it to re-eject")]
    AlreadyEjected(PathBuf),
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to read ejected Dockerfile at {path}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}
