//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{collections::BTreeMap, path::Path, str::FromStr};

use clap::Parser;
use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::application::context::ScopeConfig;
use crate::application::filter::DirectiveFilterProvider;
use crate::domain::stores::StoreId;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "cms-blocks";
const ENV_PREFIX: &str = "CMS_BLOCKS";
const ENV_SEPARATOR: &str = "__";

mod cli;

pub use cli::{BlockArgs, CliArgs, Command, IdentitiesArgs, LoggingOverrides};

/// Fully-resolved settings after precedence resolution and validation.
#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub output: OutputSettings,
    pub template: TemplateSettings,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

/// Whether block output is suppressed, globally or per store.
#[derive(Debug, Clone, Default)]
pub struct OutputSettings {
    pub disabled: bool,
    pub disabled_stores: Vec<StoreId>,
}

impl ScopeConfig for OutputSettings {
    fn block_output_disabled(&self, store: StoreId) -> bool {
        self.disabled || self.disabled_stores.contains(&store)
    }
}

#[derive(Debug, Clone, Default)]
pub struct TemplateSettings {
    pub sanitize: bool,
    pub variables: BTreeMap<String, String>,
}

impl From<&TemplateSettings> for DirectiveFilterProvider {
    fn from(settings: &TemplateSettings) -> Self {
        let provider = DirectiveFilterProvider::new().with_variables(settings.variables.clone());
        if settings.sanitize {
            provider.with_sanitizer()
        } else {
            provider
        }
    }
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Parse CLI arguments and load settings from them.
pub fn load_with_cli() -> Result<(CliArgs, Settings), LoadError> {
    let args = CliArgs::parse();
    let settings = load(&args)?;
    Ok((args, settings))
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(cli: &CliArgs) -> Result<Settings, LoadError> {
    let mut raw = load_raw(cli.config_file.as_deref())?;
    raw.apply_logging_overrides(&cli.overrides);
    Settings::from_raw(raw)
}

fn load_raw(config_file: Option<&Path>) -> Result<RawSettings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = config_file {
        builder = builder.add_source(File::from(path).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator(ENV_SEPARATOR)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("output.disabled_stores"),
    );

    Ok(builder.build()?.try_deserialize()?)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    logging: RawLoggingSettings,
    output: RawOutputSettings,
    template: RawTemplateSettings,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawOutputSettings {
    disabled: Option<bool>,
    disabled_stores: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawTemplateSettings {
    sanitize: Option<bool>,
    variables: Option<BTreeMap<String, String>>,
}

impl RawSettings {
    fn apply_logging_overrides(&mut self, overrides: &LoggingOverrides) {
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let RawSettings {
            logging,
            output,
            template,
        } = raw;

        Ok(Self {
            logging: build_logging_settings(logging)?,
            output: build_output_settings(output),
            template: build_template_settings(template)?,
        })
    }
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::INFO,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn build_output_settings(output: RawOutputSettings) -> OutputSettings {
    let mut disabled_stores: Vec<StoreId> = output
        .disabled_stores
        .unwrap_or_default()
        .into_iter()
        .map(StoreId::new)
        .collect();
    disabled_stores.sort_unstable();
    disabled_stores.dedup();

    OutputSettings {
        disabled: output.disabled.unwrap_or(false),
        disabled_stores,
    }
}

fn build_template_settings(template: RawTemplateSettings) -> Result<TemplateSettings, LoadError> {
    let variables = template.variables.unwrap_or_default();
    if let Some(name) = variables
        .keys()
        .find(|name| name.is_empty() || name.chars().any(char::is_whitespace))
    {
        return Err(LoadError::invalid(
            "template.variables",
            format!("variable name `{name}` must be non-empty without whitespace"),
        ));
    }

    Ok(TemplateSettings {
        sanitize: template.sanitize.unwrap_or(false),
        variables,
    })
}
