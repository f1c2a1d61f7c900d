use clap::Parser;
use std::path::Path;
use tracing::{error, info, warn};
use volsecrets::cli::{self, Cli, Commands, ConfigAction};
use volsecrets::config::{validate_config, Config, DEFAULT_CONFIG_FILE};
use volsecrets::engine::write_spec;
use volsecrets::logging::{self, LoggingHandle};

/// Load the config, then switch logging to its level and format.
///
/// Logging is already installed at the default level so that messages from
/// loading and env overrides are not lost.
fn load_config(path: Option<&str>, logs: Option<&LoggingHandle>) -> anyhow::Result<Config> {
    let config = Config::load(path)?;
    if let Some(handle) = logs {
        if let Err(e) = handle.apply(&config.logging) {
            warn!("Failed to apply logging config: {e}");
        }
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let logs = logging::init();

    match cli.command {
        Commands::Audit(opts) => {
            let config = load_config(opts.config.as_deref(), logs.as_ref())?;
            let refs = cli::run_audit(&opts)?;
            if opts.json {
                println!("{}", serde_json::to_string_pretty(&refs)?);
            } else if !refs.is_empty() {
                println!("{}", cli::format_audit(&refs));
            }
        }
        Commands::Apply(opts) => {
            let config = load_config(opts.config.as_deref(), logs.as_ref())?;
            let (spec, report) = cli::run_apply(&opts, &config)?;

            if opts.dry_run {
                let before = spec.secrets.len() - report.resolved;
                println!("{}", cli::format_dry_run(&spec, before));
            } else if let Some(ref output) = opts.output {
                write_spec(output, &spec)?;
                info!("Wrote {}", output.display());
            } else {
                println!("{}", serde_json::to_string_pretty(&spec)?);
            }
        }
        Commands::Config(opts) => {
            if let ConfigAction::Init = opts.action {
                let path = opts.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE);
                if Path::new(path).exists() {
                    anyhow::bail!("Refusing to overwrite existing '{path}'");
                }
                Config::write_default(path)?;
                info!("Configuration file created at {path}");
                return Ok(());
            }

            let config = load_config(opts.config.as_deref(), logs.as_ref())?;
            match opts.action {
                ConfigAction::Show => {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                }
                ConfigAction::Validate => {
                    let errors = validate_config(&config);
                    if errors.is_empty() {
                        info!("Configuration is valid");
                    } else {
                        for e in &errors {
                            error!("{e}");
                        }
                        anyhow::bail!("{} configuration error(s)", errors.len());
                    }
                }
                ConfigAction::Init => unreachable!("handled above"),
            }
        }
        Commands::Version => {
            println!("volsecrets {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
