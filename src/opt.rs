use crate::manifest::ManifestConfig;
use clap::{ArgAction, Args, Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Parser, Debug)]
#[clap(version, about)]
pub struct Options {
    /// Logging verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Generate(crate::generate::opt::Options),
    Serve(crate::serve::opt::Options),
}

/// Where the manifest comes from, shared by every subcommand.
#[derive(Args, Debug)]
pub struct ManifestArgs {
    /// Directory of compiled assets (only its direct files are read)
    pub asset_dir: PathBuf,

    /// HTML document served at /
    #[arg(long)]
    pub index: PathBuf,

    #[arg(
        help = "Extra paths serving the index document (--help for more)",
        long_help = r"Extra paths serving the index document:
    - each path responds with the same bytes as /
Examples:
    - /login
    - /setup"
    )]
    #[arg(long = "index-alias", value_name = "PATH")]
    pub index_aliases: Vec<String>,

    #[arg(
        help = "Paths serving their own document (--help for more)",
        long_help = r"Paths serving their own document, as PATH=FILE:
    - documents are served with no-cache, like the index
Examples:
    - /add=dist/add.html"
    )]
    #[arg(long = "document", value_name = "PATH=FILE", value_parser = DocumentRoute::from_str)]
    pub documents: Vec<DocumentRoute>,

    /// Route prefix for asset files
    #[arg(long, default_value = "/assets")]
    pub prefix: String,

    /// Extensions to skip instead of rejecting
    #[arg(long = "ignore", value_name = "EXT", default_value = "map")]
    pub ignored: Vec<String>,
}

impl From<ManifestArgs> for ManifestConfig {
    fn from(args: ManifestArgs) -> Self {
        let ManifestArgs {
            asset_dir,
            index,
            index_aliases,
            documents,
            prefix,
            ignored,
        } = args;
        ManifestConfig {
            asset_dir,
            asset_prefix: prefix,
            index,
            index_aliases,
            documents: documents.into_iter().map(|d| (d.path, d.file)).collect(),
            ignored: ignored
                .into_iter()
                .map(|ext| ext.trim_start_matches('.').to_string())
                .collect(),
        }
    }
}

#[derive(Clone, Debug)]
pub struct DocumentRoute {
    pub path: String,
    pub file: PathBuf,
}

impl FromStr for DocumentRoute {
    type Err = String;

    fn from_str(arg: &str) -> Result<Self, Self::Err> {
        match arg.split_once('=') {
            Some((path, file)) if path.starts_with('/') && !file.is_empty() => Ok(Self {
                path: path.to_string(),
                file: PathBuf::from(file),
            }),
            _ => Err(format!("expected PATH=FILE with PATH starting with '/', got {:?}", arg)),
        }
    }
}
