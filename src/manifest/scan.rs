use crate::manifest::err::ManifestError;
use crate::manifest::kind::Category;
use bytes::Bytes;
use std::fs;
use std::io;
use std::path::Path;

#[derive(Debug)]
pub struct AssetEntry {
    pub file_name: String,
    pub category: Category,
    pub mime_type: &'static str,
    pub bytes: Bytes,
}

/// Read every regular file directly inside `dir`, sorted by file name.
///
/// Sub-directories, dangling symlinks and ignored extensions are skipped. The
/// first unknown extension, or a name that can't appear verbatim in a URL
/// path, aborts the scan.
pub fn scan(dir: &Path, ignored: &[String]) -> Result<Vec<AssetEntry>, ManifestError> {
    let mut names = Vec::new();
    for entry in fs::read_dir(dir).map_err(ManifestError::io(dir))? {
        let entry = entry.map_err(ManifestError::io(dir))?;
        let path = entry.path();
        // follows symlinks, so a link to a file counts as a file
        let meta = match fs::metadata(&path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!("{} -> [skipped, dangling link]", path.display());
                continue;
            }
            Err(e) => return Err(ManifestError::io(&path)(e)),
        };
        if !meta.is_file() {
            log::debug!("{} -> [skipped, not a file]", path.display());
            continue;
        }
        let file_name = match entry.file_name().into_string() {
            Ok(name) => name,
            Err(name) => {
                return Err(ManifestError::UnknownAssetType {
                    file_name: name.to_string_lossy().into_owned(),
                })
            }
        };
        names.push(file_name);
    }
    names.sort();

    // classify everything before reading anything, so a bad name fails fast
    let mut classified = Vec::with_capacity(names.len());
    for file_name in names {
        match Category::classify(&file_name, ignored)? {
            Category::Ignored => log::debug!("{} -> [ignored]", file_name),
            _ if !is_url_safe(&file_name) => {
                return Err(ManifestError::UnroutableFileName { file_name })
            }
            category => classified.push((file_name, category)),
        }
    }

    classified
        .into_iter()
        .map(|(file_name, category)| {
            let path = dir.join(&file_name);
            let bytes = fs::read(&path).map_err(ManifestError::io(&path))?;
            if category.is_text() && std::str::from_utf8(&bytes).is_err() {
                return Err(ManifestError::InvalidText { file_name });
            }
            let mime_type = category
                .mime_type()
                .ok_or_else(|| ManifestError::UnknownAssetType {
                    file_name: file_name.clone(),
                })?;
            log::debug!("{} -> [{} {} bytes]", file_name, mime_type, bytes.len());
            Ok(AssetEntry {
                file_name,
                category,
                mime_type,
                bytes: Bytes::from(bytes),
            })
        })
        .collect()
}

/// Request paths are matched without percent-decoding, so a served name may
/// only use characters that never need escaping.
fn is_url_safe(file_name: &str) -> bool {
    file_name
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'_' | b'~'))
}
