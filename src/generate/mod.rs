use crate::err::Error;
use crate::manifest::err::ManifestError;
use crate::manifest::{Manifest, ManifestConfig};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

pub mod opt;
mod render;

pub async fn main(options: opt::Options) -> Result<(), Error> {
    let opt::Options {
        manifest,
        output,
        include_root,
    } = options;

    let mut config = ManifestConfig::from(manifest);
    if include_root.is_none() {
        make_absolute(&mut config)?;
    }

    let manifest = Manifest::build(&config)?;
    let source = render::render(&manifest, &config.asset_dir, include_root.as_deref());

    match output {
        Some(path) => {
            fs::write(&path, source).map_err(ManifestError::io(&path))?;
            log::info!(
                "Wrote {} routes to {}",
                manifest.routes().len(),
                path.display()
            );
        }
        None => io::stdout().write_all(source.as_bytes())?,
    }

    Ok(())
}

/// Without an include root, embedded paths must not depend on where the
/// generated file ends up.
fn make_absolute(config: &mut ManifestConfig) -> Result<(), ManifestError> {
    fn canonical(path: &Path) -> Result<PathBuf, ManifestError> {
        fs::canonicalize(path).map_err(ManifestError::io(path))
    }

    config.asset_dir = canonical(&config.asset_dir)?;
    config.index = canonical(&config.index)?;
    for (_, source) in &mut config.documents {
        *source = canonical(source)?;
    }
    Ok(())
}
