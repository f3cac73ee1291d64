use crate::err::Error;
use crate::manifest::{Manifest, ManifestConfig};

mod body;
pub mod opt;
mod routes;
mod server;

pub async fn main(options: opt::Options) -> Result<(), Error> {
    let opt::Options { listen, manifest } = options;

    let manifest = Manifest::build(&ManifestConfig::from(manifest))?;
    log::info!("Serving {} routes on {}", manifest.routes().len(), listen);

    server::run(listen, manifest).await?;

    Ok(())
}
