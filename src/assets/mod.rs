//! Startup asset loading.
//!
//! Everything the session needs (shader sources and meshes) is described as
//! a list of [`ResourceRequest`]s. [`load_all`] issues them concurrently
//! against a [`ResourceProvider`], waits for every one, and either returns
//! the complete [`Resources`] table or the first failure.

mod provider;

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::PathBuf;

pub use provider::{FileSystemProvider, MemoryProvider, ResourceProvider};

use crate::options::{MeshOptions, Options};
use crate::scene::Mesh;

/// Resource keys of the shader sources.
pub mod keys {
    /// Shared WGSL module imported by every pass shader.
    pub const COMMON_SHADER: &str = "shader/common";
    /// Shadow cubemap generation.
    pub const SHADOWMAP_SHADER: &str = "shader/shadowmap";
    /// Ambient base pass.
    pub const AMBIENT_SHADER: &str = "shader/ambient";
    /// Per-light Phong pass.
    pub const PHONG_SHADER: &str = "shader/phong";
}

/// Errors raised while fetching or decoding startup assets.
#[derive(Debug)]
pub enum AssetError {
    /// The file could not be read.
    Io {
        /// Path as resolved by the provider.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The file was read but could not be decoded.
    Parse {
        /// Path relative to the provider root.
        path: String,
        /// 1-based line number.
        line: usize,
        /// What went wrong.
        message: String,
    },
    /// A resource key was looked up but never loaded.
    Missing(String),
    /// The fetch task for this key panicked.
    TaskPanicked(String),
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "cannot read {}: {source}", path.display())
            }
            Self::Parse {
                path,
                line,
                message,
            } => write!(f, "{path}:{line}: {message}"),
            Self::Missing(key) => write!(f, "resource {key:?} was not loaded"),
            Self::TaskPanicked(key) => {
                write!(f, "loader for {key:?} panicked")
            }
        }
    }
}

impl std::error::Error for AssetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// One thing to fetch at startup.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceRequest {
    /// A UTF-8 text file.
    Text {
        /// Lookup key in [`Resources`].
        key: String,
        /// Path relative to the provider root.
        path: String,
    },
    /// A Wavefront OBJ mesh colored through `palette`.
    ObjMesh {
        /// Lookup key in [`Resources`].
        key: String,
        /// Path relative to the provider root.
        path: String,
        /// Material name → base color.
        palette: BTreeMap<String, [f32; 3]>,
    },
    /// A generated unit UV sphere.
    UvSphere {
        /// Lookup key in [`Resources`].
        key: String,
        /// Ring count.
        subdivisions: u32,
        /// Base color.
        color: [f32; 3],
    },
}

impl ResourceRequest {
    /// Lookup key of the result.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Self::Text { key, .. }
            | Self::ObjMesh { key, .. }
            | Self::UvSphere { key, .. } => key,
        }
    }

    /// Request that produces the mesh `options` declares.
    #[must_use]
    pub fn from_mesh_options(options: &MeshOptions) -> Self {
        match options {
            MeshOptions::Obj { key, path, palette } => Self::ObjMesh {
                key: key.clone(),
                path: path.clone(),
                palette: palette.clone(),
            },
            MeshOptions::UvSphere {
                key,
                subdivisions,
                color,
            } => Self::UvSphere {
                key: key.clone(),
                subdivisions: *subdivisions,
                color: *color,
            },
        }
    }

    /// Every request a session needs: the four shader sources, then the
    /// declared meshes.
    #[must_use]
    pub fn startup_set(options: &Options) -> Vec<Self> {
        let shaders = [
            (keys::COMMON_SHADER, &options.assets.common_shader),
            (keys::SHADOWMAP_SHADER, &options.assets.shadowmap_shader),
            (keys::AMBIENT_SHADER, &options.assets.ambient_shader),
            (keys::PHONG_SHADER, &options.assets.phong_shader),
        ];
        shaders
            .into_iter()
            .map(|(key, path)| Self::Text {
                key: key.to_owned(),
                path: path.clone(),
            })
            .chain(options.scene.meshes.iter().map(Self::from_mesh_options))
            .collect()
    }
}

/// A fetched resource.
#[derive(Debug, Clone, PartialEq)]
pub enum Resource {
    /// Text file contents.
    Text(String),
    /// Decoded or generated mesh.
    Mesh(Mesh),
}

/// Loaded resources by key.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    texts: HashMap<String, String>,
    meshes: HashMap<String, Mesh>,
}

impl Resources {
    /// Store `resource` under `key`, replacing any previous entry.
    pub fn insert(&mut self, key: impl Into<String>, resource: Resource) {
        match resource {
            Resource::Text(text) => self.insert_text(key, text),
            Resource::Mesh(mesh) => self.insert_mesh(key, mesh),
        }
    }

    /// Store text under `key`.
    pub fn insert_text(&mut self, key: impl Into<String>, text: impl Into<String>) {
        let _ = self.texts.insert(key.into(), text.into());
    }

    /// Store a mesh under `key`.
    pub fn insert_mesh(&mut self, key: impl Into<String>, mesh: Mesh) {
        let _ = self.meshes.insert(key.into(), mesh);
    }

    /// Text loaded under `key`.
    #[must_use]
    pub fn text(&self, key: &str) -> Option<&str> {
        self.texts.get(key).map(String::as_str)
    }

    /// Mesh loaded under `key`.
    #[must_use]
    pub fn mesh(&self, key: &str) -> Option<&Mesh> {
        self.meshes.get(key)
    }

    /// Text under `key`, or [`AssetError::Missing`].
    ///
    /// # Errors
    ///
    /// The key was never loaded.
    pub fn require_text(&self, key: &str) -> Result<&str, AssetError> {
        self.text(key)
            .ok_or_else(|| AssetError::Missing(key.to_owned()))
    }

    /// Total number of loaded resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.texts.len() + self.meshes.len()
    }

    /// Whether nothing has been loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fetch every request concurrently, one scoped thread per request, and
/// join them all before returning.
///
/// # Errors
///
/// The first failure in request order. Nothing is returned partially.
pub fn load_all<P: ResourceProvider + ?Sized>(
    provider: &P,
    requests: &[ResourceRequest],
) -> Result<Resources, AssetError> {
    std::thread::scope(|scope| {
        let handles: Vec<_> = requests
            .iter()
            .map(|request| {
                (request.key(), scope.spawn(move || provider.fetch(request)))
            })
            .collect();

        let mut resources = Resources::default();
        let mut first_error = None;
        for (key, handle) in handles {
            let result = handle
                .join()
                .unwrap_or_else(|_| Err(AssetError::TaskPanicked(key.to_owned())));
            match result {
                Ok(resource) => {
                    log::debug!("loaded {key}");
                    resources.insert(key, resource);
                }
                Err(e) => {
                    if first_error.is_none() {
                        first_error = Some(e);
                    }
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => {
                log::info!("loaded {} resources", resources.len());
                Ok(resources)
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\nusemtl red\nf 1 2 3\n";

    fn provider() -> MemoryProvider {
        let mut provider = MemoryProvider::new();
        provider.insert("shaders/a.wgsl", "fn a() {}");
        provider.insert("meshes/tri.obj", TRIANGLE);
        provider.insert("meshes/bad.obj", "v 0 0 0\nf 1 1 9\n");
        provider
    }

    fn text(key: &str, path: &str) -> ResourceRequest {
        ResourceRequest::Text {
            key: key.into(),
            path: path.into(),
        }
    }

    #[test]
    fn loads_every_request() {
        let requests = vec![
            text("a", "shaders/a.wgsl"),
            ResourceRequest::ObjMesh {
                key: "tri".into(),
                path: "meshes/tri.obj".into(),
                palette: BTreeMap::from([("red".into(), [1.0, 0.0, 0.0])]),
            },
            ResourceRequest::UvSphere {
                key: "ball".into(),
                subdivisions: 4,
                color: [0.0, 0.0, 1.0],
            },
        ];
        let resources = load_all(&provider(), &requests).unwrap();
        assert_eq!(resources.len(), 3);
        assert_eq!(resources.text("a"), Some("fn a() {}"));
        let tri = resources.mesh("tri").unwrap();
        assert_eq!(tri.vertices[0].color, [1.0, 0.0, 0.0]);
        assert!(!resources.mesh("ball").unwrap().is_empty());
    }

    #[test]
    fn missing_file_fails_the_whole_load() {
        let requests =
            vec![text("a", "shaders/a.wgsl"), text("b", "shaders/b.wgsl")];
        let err = load_all(&provider(), &requests).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }), "{err}");
    }

    #[test]
    fn parse_errors_carry_path_and_line() {
        let requests = vec![ResourceRequest::ObjMesh {
            key: "bad".into(),
            path: "meshes/bad.obj".into(),
            palette: BTreeMap::new(),
        }];
        match load_all(&provider(), &requests).unwrap_err() {
            AssetError::Parse { path, line, .. } => {
                assert_eq!(path, "meshes/bad.obj");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn first_error_in_request_order_wins() {
        let requests = vec![text("x", "nope/x"), ResourceRequest::ObjMesh {
            key: "bad".into(),
            path: "meshes/bad.obj".into(),
            palette: BTreeMap::new(),
        }];
        let err = load_all(&provider(), &requests).unwrap_err();
        assert!(matches!(err, AssetError::Io { .. }));
    }

    #[test]
    fn startup_set_lists_shaders_then_meshes() {
        let options = Options::default();
        let requests = ResourceRequest::startup_set(&options);
        assert_eq!(requests.len(), 4 + options.scene.meshes.len());
        assert_eq!(requests[0].key(), keys::COMMON_SHADER);
        assert_eq!(requests[4].key(), "terrain");
    }

    #[test]
    fn panicking_provider_is_reported() {
        struct Panics;
        impl ResourceProvider for Panics {
            fn read_text(&self, _path: &str) -> Result<String, AssetError> {
                panic!("boom")
            }
        }
        let err = load_all(&Panics, &[text("k", "p")]).unwrap_err();
        assert!(matches!(err, AssetError::TaskPanicked(key) if key == "k"));
    }

    #[test]
    fn require_text_reports_missing_key() {
        let resources = Resources::default();
        assert!(matches!(
            resources.require_text("nope"),
            Err(AssetError::Missing(_))
        ));
    }
}
