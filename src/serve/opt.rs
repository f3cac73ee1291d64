use crate::opt::ManifestArgs;
use clap::Args;
use std::net::SocketAddr;

/// Serve the manifest over HTTP, straight from memory
#[derive(Args, Debug)]
pub struct Options {
    /// Socket address to listen on
    pub listen: SocketAddr,

    #[command(flatten)]
    pub manifest: ManifestArgs,
}
