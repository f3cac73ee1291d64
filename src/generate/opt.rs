use crate::opt::ManifestArgs;
use clap::Args;
use std::path::PathBuf;

/// Render the manifest as Rust source that embeds every asset
#[derive(Args, Debug)]
pub struct Options {
    #[command(flatten)]
    pub manifest: ManifestArgs,

    /// File to write the generated source to (stdout if omitted)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(
        help = "Prefix for embedded paths (--help for more)",
        long_help = r"Prefix for embedded paths:
    - prepended to every relative asset and document path in include_str!/include_bytes!
    - include_str! resolves relative to the generated file, so this is usually a path
      from the output file's directory back to where this command runs
    - if omitted, absolute paths are embedded
Examples:
    - ../../../web"
    )]
    #[arg(long, value_name = "DIR")]
    pub include_root: Option<PathBuf>,
}
