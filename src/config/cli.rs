use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueHint, builder::BoolishValueParser};

/// Command-line arguments for the cms-blocks binary.
#[derive(Debug, Parser)]
#[command(name = "cms-blocks", version, about = "Render CMS blocks by identifier")]
pub struct CliArgs {
    /// Optional path to a configuration file.
    #[arg(long = "config-file", env = "CMS_BLOCKS_CONFIG_FILE", value_name = "PATH")]
    pub config_file: Option<PathBuf>,

    #[command(flatten)]
    pub overrides: LoggingOverrides,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Render a block and print its HTML.
    Render(BlockArgs),
    /// Print the cache identities of a block.
    Identities(IdentitiesArgs),
}

#[derive(Debug, Args, Clone)]
pub struct BlockArgs {
    /// TOML catalog of stores and blocks.
    #[arg(long, value_name = "FILE", value_hint = ValueHint::FilePath)]
    pub catalog: PathBuf,

    /// Identifier of the block; when omitted nothing is rendered.
    #[arg(long, value_name = "IDENTIFIER")]
    pub identifier: Option<String>,

    /// Store to render for; defaults to the first storefront in the catalog.
    #[arg(long, value_name = "ID")]
    pub store: Option<u32>,
}

#[derive(Debug, Args, Clone)]
pub struct IdentitiesArgs {
    #[command(flatten)]
    pub block: BlockArgs,

    /// Print identities as a JSON array.
    #[arg(long, action = clap::ArgAction::SetTrue)]
    pub json: bool,
}

#[derive(Debug, Args, Default, Clone)]
pub struct LoggingOverrides {
    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}
