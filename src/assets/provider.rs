use std::collections::HashMap;
use std::path::PathBuf;

use super::{AssetError, Resource, ResourceRequest};
use crate::scene::Mesh;

/// Source of asset bytes.
///
/// Implementors only need [`read_text`](Self::read_text); interpreting the
/// text as a mesh or generating procedural meshes is shared. Providers are
/// queried from several threads at once during startup.
pub trait ResourceProvider: Send + Sync {
    /// Read the UTF-8 file at `path`, relative to the provider's root.
    ///
    /// # Errors
    ///
    /// [`AssetError::Io`] if the file is absent or unreadable.
    fn read_text(&self, path: &str) -> Result<String, AssetError>;

    /// Resolve one request.
    ///
    /// # Errors
    ///
    /// Read failures, and [`AssetError::Parse`] for malformed meshes.
    fn fetch(&self, request: &ResourceRequest) -> Result<Resource, AssetError> {
        match request {
            ResourceRequest::Text { path, .. } => {
                self.read_text(path).map(Resource::Text)
            }
            ResourceRequest::ObjMesh { path, palette, .. } => {
                let text = self.read_text(path)?;
                Mesh::from_obj(&text, palette)
                    .map(Resource::Mesh)
                    .map_err(|e| AssetError::Parse {
                        path: path.clone(),
                        line: e.line,
                        message: e.message,
                    })
            }
            ResourceRequest::UvSphere {
                subdivisions,
                color,
                ..
            } => Ok(Resource::Mesh(Mesh::uv_sphere(*subdivisions, *color))),
        }
    }
}

/// Reads assets from a directory on disk.
#[derive(Debug, Clone)]
pub struct FileSystemProvider {
    root: PathBuf,
}

impl FileSystemProvider {
    /// Provider rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ResourceProvider for FileSystemProvider {
    fn read_text(&self, path: &str) -> Result<String, AssetError> {
        let full = self.root.join(path);
        log::debug!("reading {}", full.display());
        std::fs::read_to_string(&full)
            .map_err(|source| AssetError::Io { path: full, source })
    }
}

/// In-memory provider for tests and embedded assets.
#[derive(Debug, Clone, Default)]
pub struct MemoryProvider {
    files: HashMap<String, String>,
}

impl MemoryProvider {
    /// Empty provider.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a file, replacing any previous content at `path`.
    pub fn insert(&mut self, path: impl Into<String>, text: impl Into<String>) {
        let _ = self.files.insert(path.into(), text.into());
    }
}

impl ResourceProvider for MemoryProvider {
    fn read_text(&self, path: &str) -> Result<String, AssetError> {
        self.files.get(path).cloned().ok_or_else(|| AssetError::Io {
            path: PathBuf::from(path),
            source: std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "not in memory provider",
            ),
        })
    }
}
