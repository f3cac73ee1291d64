//! The route manifest: every path the front-end is served at, built once from
//! a directory of compiled assets plus a few fixed HTML documents.

use bytes::Bytes;
use hyper::Method;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod err;
pub mod kind;
pub mod scan;

use err::ManifestError;
pub use scan::AssetEntry;

pub const DOCUMENT_MIME_TYPE: &str = "text/html";

#[derive(Debug, Clone)]
pub struct ManifestConfig {
    pub asset_dir: PathBuf,
    /// Route prefix for asset files, e.g. `/assets`.
    pub asset_prefix: String,
    /// Served at `/`.
    pub index: PathBuf,
    /// Extra paths serving the index document, e.g. `/login`.
    pub index_aliases: Vec<String>,
    /// Paths serving their own document, e.g. `/add` -> `add.html`.
    pub documents: Vec<(String, PathBuf)>,
    /// Extensions skipped instead of rejected.
    pub ignored: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CachePolicy {
    NoCache,
    LongLived,
}

impl CachePolicy {
    pub fn header_value(self) -> &'static str {
        match self {
            CachePolicy::NoCache => "no-cache",
            CachePolicy::LongLived => "max-age=31536000",
        }
    }
}

#[derive(Debug)]
pub struct Document {
    pub source: PathBuf,
    pub bytes: Bytes,
}

#[derive(Debug, Clone)]
pub enum Target {
    Asset(Arc<AssetEntry>),
    Document(Arc<Document>),
}

impl Target {
    pub fn bytes(&self) -> &Bytes {
        match self {
            Target::Asset(asset) => &asset.bytes,
            Target::Document(doc) => &doc.bytes,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        match self {
            Target::Asset(asset) => asset.mime_type,
            Target::Document(_) => DOCUMENT_MIME_TYPE,
        }
    }

    pub fn is_text(&self) -> bool {
        match self {
            Target::Asset(asset) => asset.category.is_text(),
            Target::Document(_) => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RouteAlias {
    pub path: String,
    pub target: Target,
    pub cache_policy: CachePolicy,
    /// Quoted hex SHA-256 of the body.
    pub etag: String,
}

impl RouteAlias {
    fn new(path: String, target: Target, cache_policy: CachePolicy) -> Self {
        let etag = format!("\"{:x}\"", Sha256::digest(target.bytes()));
        Self {
            path,
            target,
            cache_policy,
            etag,
        }
    }
}

#[derive(Debug)]
pub struct Manifest {
    routes: Vec<RouteAlias>,
    by_path: HashMap<String, usize>,
}

impl Manifest {
    /// Build the manifest: document aliases first, then one alias per asset.
    ///
    /// Fails without producing anything on the first unknown asset type,
    /// unreadable file or duplicate path.
    pub fn build(config: &ManifestConfig) -> Result<Self, ManifestError> {
        let prefix = config.asset_prefix.trim_end_matches('/');
        if !prefix.is_empty() {
            check_path(prefix)?;
        }

        let mut documents = DocumentLoader::default();
        let mut routes = Vec::new();

        let index = documents.load(&config.index)?;
        routes.push(RouteAlias::new(
            "/".to_string(),
            Target::Document(Arc::clone(&index)),
            CachePolicy::NoCache,
        ));
        for path in &config.index_aliases {
            check_path(path)?;
            routes.push(RouteAlias::new(
                path.clone(),
                Target::Document(Arc::clone(&index)),
                CachePolicy::NoCache,
            ));
        }
        for (path, source) in &config.documents {
            check_path(path)?;
            let doc = documents.load(source)?;
            routes.push(RouteAlias::new(
                path.clone(),
                Target::Document(doc),
                CachePolicy::NoCache,
            ));
        }

        for asset in scan::scan(&config.asset_dir, &config.ignored)? {
            let path = format!("{}/{}", prefix, asset.file_name);
            routes.push(RouteAlias::new(
                path,
                Target::Asset(Arc::new(asset)),
                CachePolicy::LongLived,
            ));
        }

        Self::from_routes(routes)
    }

    fn from_routes(routes: Vec<RouteAlias>) -> Result<Self, ManifestError> {
        let mut by_path = HashMap::with_capacity(routes.len());
        for (i, route) in routes.iter().enumerate() {
            if by_path.insert(route.path.clone(), i).is_some() {
                return Err(ManifestError::DuplicateRoute {
                    path: route.path.clone(),
                });
            }
        }
        Ok(Self { routes, by_path })
    }

    pub fn routes(&self) -> &[RouteAlias] {
        &self.routes
    }

    /// Only `GET` is served; any other method misses.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<&RouteAlias> {
        if method != Method::GET {
            return None;
        }
        self.by_path.get(path).map(|&i| &self.routes[i])
    }
}

fn check_path(path: &str) -> Result<(), ManifestError> {
    if path.starts_with('/') {
        Ok(())
    } else {
        Err(ManifestError::InvalidRoutePath {
            path: path.to_string(),
        })
    }
}

/// Loads each document source once, so aliases of the same file share bytes.
#[derive(Default)]
struct DocumentLoader {
    loaded: HashMap<PathBuf, Arc<Document>>,
}

impl DocumentLoader {
    fn load(&mut self, source: &Path) -> Result<Arc<Document>, ManifestError> {
        if let Some(doc) = self.loaded.get(source) {
            return Ok(Arc::clone(doc));
        }
        let bytes = fs::read(source).map_err(ManifestError::io(source))?;
        if std::str::from_utf8(&bytes).is_err() {
            return Err(ManifestError::InvalidText {
                file_name: source.display().to_string(),
            });
        }
        log::debug!("{} -> [document {} bytes]", source.display(), bytes.len());
        let doc = Arc::new(Document {
            source: source.to_path_buf(),
            bytes: Bytes::from(bytes),
        });
        self.loaded.insert(source.to_path_buf(), Arc::clone(&doc));
        Ok(doc)
    }
}
