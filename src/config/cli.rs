use crate::config::toml_config::TomlConfig;
use crate::config::AppConfig;
use crate::utils::error::Result;
use crate::utils::logger::LogFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "voyage-admin")]
#[command(about = "Create, list and delete voyages through the voyage REST API")]
pub struct CliConfig {
    #[arg(long, global = true, help = "API base URL, overrides the config file")]
    pub api_base: Option<String>,

    #[arg(long, global = true, help = "Path to a TOML config file")]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List voyages
    List {
        #[arg(long, help = "Expand the unit types of every voyage")]
        expand: bool,
    },
    /// List vessels
    Vessels,
    /// List unit types
    UnitTypes,
    /// Create a voyage
    Create(CreateArgs),
    /// Delete a voyage
    Delete {
        #[arg(long)]
        id: String,
    },
    /// Interactive page session
    Shell,
}

#[derive(Debug, Clone, Args)]
pub struct CreateArgs {
    #[arg(long, help = "Departure, e.g. 2024-01-01T08:00")]
    pub departure: String,

    #[arg(long, help = "Arrival, e.g. 2024-01-02T08:00")]
    pub arrival: String,

    #[arg(long)]
    pub port_of_loading: String,

    #[arg(long)]
    pub port_of_discharge: String,

    #[arg(long, help = "Vessel id")]
    pub vessel: String,

    #[arg(long = "unit-type", value_delimiter = ',', help = "Unit type ids (at least five)")]
    pub unit_types: Vec<String>,
}

impl CliConfig {
    /// 讀取 --config 指定的檔案並與命令列參數合併
    pub fn app_config(&self) -> Result<AppConfig> {
        let file = match &self.config {
            Some(path) => {
                tracing::debug!("Loading config file {}", path.display());
                Some(TomlConfig::from_file(path)?)
            }
            None => None,
        };
        AppConfig::resolve(file.as_ref(), self.api_base.as_deref())
    }
}
