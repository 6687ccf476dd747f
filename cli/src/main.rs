//! ocpi-tool: inspect and patch OCPI documents from the command line
//!
//! ```sh
//! # ETag of a charging station document
//! ocpi-tool etag station.json
//!
//! # Validate a tariff, taking the id from outside the body
//! ocpi-tool check --kind tariff --id T-12 tariff.json
//!
//! # Apply a merge-patch and print the result
//! ocpi-tool patch station.json patch.json
//!
//! # Show the effective configuration
//! ocpi-tool config
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use serde_json::{Map, Value};
use tracing::{error, info};

use ocpi_bindings::{
    default_config_path, init_tracing, patch_object, AppConfig, ChargingStation, ChargingStationId, Patchable, Tariff,
    TariffId,
};

/// Inspect, validate and merge-patch OCPI charging stations and tariffs.
#[derive(Parser, Debug)]
#[command(name = "ocpi-tool", version, about = "OCPI document inspection and merge-patch tool")]
struct Cli {
    /// Path to the configuration file (TOML).
    #[arg(short, long, env = "OCPI_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Override the log level (trace, debug, info, warn, error).
    #[arg(short, long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the ETag of a document.
    Etag(DocumentArgs),
    /// Parse a document and report whether it is valid.
    Check(DocumentArgs),
    /// Apply a JSON merge-patch and print the patched document.
    Patch {
        #[command(flatten)]
        document: DocumentArgs,
        /// File holding the merge-patch object.
        patch: PathBuf,
        /// Accept a `last_updated` that does not move forward.
        #[arg(long)]
        allow_downgrades: bool,
    },
    /// Print the effective configuration.
    Config,
}

#[derive(clap::Args, Debug)]
struct DocumentArgs {
    /// File holding the JSON document.
    file: PathBuf,
    /// What the document describes.
    #[arg(short, long, value_enum, default_value_t = Kind::Station)]
    kind: Kind,
    /// Identifier supplied out of band, as a URL path segment would.
    #[arg(long)]
    id: Option<String>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Kind {
    Station,
    Tariff,
}

enum Document {
    Station(ChargingStation),
    Tariff(Tariff),
}

impl Document {
    fn load(args: &DocumentArgs) -> Result<Self, Box<dyn std::error::Error>> {
        let json = read_json(&args.file)?;
        let document = match args.kind {
            Kind::Station => {
                let hint = args.id.as_deref().map(ChargingStationId::parse).transpose()?;
                Self::Station(ChargingStation::parse(&json, hint.as_ref())?)
            }
            Kind::Tariff => {
                let hint = args.id.as_deref().map(TariffId::parse).transpose()?;
                Self::Tariff(Tariff::parse(&json, hint.as_ref())?)
            }
        };
        Ok(document)
    }

    fn etag(&self) -> &str {
        match self {
            Self::Station(station) => station.etag(),
            Self::Tariff(tariff) => tariff.etag(),
        }
    }

    fn identifier(&self) -> String {
        match self {
            Self::Station(station) => station.identifier(),
            Self::Tariff(tariff) => tariff.identifier(),
        }
    }

    fn patched(&self, patch: &Map<String, Value>, allow_downgrades: bool) -> Result<Self, Box<dyn std::error::Error>> {
        let patched = match self {
            Self::Station(station) => Self::Station(station.apply_merge_patch(patch, allow_downgrades)?),
            Self::Tariff(tariff) => Self::Tariff(tariff.apply_merge_patch(patch, allow_downgrades)?),
        };
        Ok(patched)
    }

    fn to_json(&self) -> Map<String, Value> {
        match self {
            Self::Station(station) => station.to_json(),
            Self::Tariff(tariff) => tariff.to_json(),
        }
    }
}

fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Ok(serde_json::from_str(&text).map_err(|e| format!("{}: {}", path.display(), e))?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(default_config_path);
    let loaded = if config_path.exists() {
        Some(AppConfig::load(&config_path))
    } else {
        None
    };
    let mut config = match &loaded {
        Some(Ok(cfg)) => cfg.clone(),
        _ => AppConfig::default(),
    };
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }
    init_tracing(&config);
    match loaded {
        Some(Ok(_)) => info!("Configuration loaded from {}", config_path.display()),
        Some(Err(e)) => error!("Failed to load config from {}: {}. Using defaults.", config_path.display(), e),
        None => {}
    }

    match cli.command {
        Command::Etag(args) => {
            let document = Document::load(&args)?;
            println!("{}", document.etag());
        }
        Command::Check(args) => {
            let document = Document::load(&args)?;
            println!("{} is valid", document.identifier());
            println!("   ETag : {}", document.etag());
        }
        Command::Patch {
            document,
            patch,
            allow_downgrades,
        } => {
            let current = Document::load(&document)?;
            let patch_json = read_json(&patch)?;
            let allow_downgrades = allow_downgrades || config.patch.allow_downgrades;
            let patched = current.patched(patch_object(&patch_json)?, allow_downgrades)?;
            info!(
                id = %patched.identifier(),
                old_etag = %current.etag(),
                new_etag = %patched.etag(),
                "Patch applied"
            );
            println!("{}", serde_json::to_string_pretty(&Value::Object(patched.to_json()))?);
        }
        Command::Config => {
            println!("Config file      : {}", config_path.display());
            println!("Log level        : {}", config.logging.level);
            println!("Log format       : {}", config.logging.format);
            println!("Allow downgrades : {}", config.patch.allow_downgrades);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use serde_json::json;
    use std::io::Write;

    fn write_json(value: &Value) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", value).unwrap();
        file
    }

    fn station_args(file: &tempfile::NamedTempFile, id: Option<&str>) -> DocumentArgs {
        DocumentArgs {
            file: file.path().to_path_buf(),
            kind: Kind::Station,
            id: id.map(str::to_string),
        }
    }

    #[test]
    fn command_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_patch_subcommand() {
        let cli = Cli::try_parse_from([
            "ocpi-tool",
            "patch",
            "--kind",
            "tariff",
            "--id",
            "T-12",
            "tariff.json",
            "patch.json",
            "--allow-downgrades",
        ])
        .unwrap();
        match cli.command {
            Command::Patch {
                document,
                patch,
                allow_downgrades,
            } => {
                assert!(matches!(document.kind, Kind::Tariff));
                assert_eq!(document.id.as_deref(), Some("T-12"));
                assert_eq!(document.file, PathBuf::from("tariff.json"));
                assert_eq!(patch, PathBuf::from("patch.json"));
                assert!(allow_downgrades);
            }
            other => panic!("unexpected command {:?}", other),
        }

        assert!(Cli::try_parse_from(["ocpi-tool", "etag", "--kind", "location", "x.json"]).is_err());
    }

    #[test]
    fn loads_and_patches_a_station() {
        let file = write_json(&json!({"last_updated": "2024-01-01T00:00:00Z"}));
        let document = Document::load(&station_args(&file, Some("CS-1"))).unwrap();
        assert_eq!(document.identifier(), "CS-1");

        let patch = json!({"floor_level": "2"});
        let patched = document.patched(patch_object(&patch).unwrap(), false).unwrap();
        assert_eq!(patched.to_json()["floor_level"], json!("2"));
        assert_ne!(patched.etag(), document.etag());
    }

    #[test]
    fn conflicting_id_hint_fails_to_load() {
        let file = write_json(&json!({"id": "CS-1", "last_updated": "2024-01-01T00:00:00Z"}));
        assert!(Document::load(&station_args(&file, Some("CS-2"))).is_err());
        assert!(Document::load(&station_args(&file, Some("cs-1"))).is_ok());
    }
}
