use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use futures::stream::{self, StreamExt};

use storepix_config::{
    check_output_collisions, devices, LoadOptions, LoadedConfig, Loader, Strictness,
    ValidateOptions,
};

#[derive(Parser)]
#[command(name = "storepix-config", version, about = "Check and inspect storepix config documents")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate one or more documents and report every problem found
    Check {
        /// Config documents (.js, .mjs, .cjs or .json)
        #[arg(required = true)]
        configs: Vec<PathBuf>,
        /// Report unknown keys as warnings
        #[arg(long)]
        strict: bool,
        /// Verify that `source` and `logo` images exist
        #[arg(long)]
        check_files: bool,
        /// Treat a template as single-image (no device list needed); repeatable
        #[arg(long = "exempt-template", value_name = "TEMPLATE")]
        exempt_templates: Vec<String>,
    },
    /// Print a document in normalized form
    Show {
        config: PathBuf,
        #[arg(long, value_enum, default_value_t = ShowFormat::Json)]
        format: ShowFormat,
    },
    /// List known device classes
    Devices,
}

#[derive(Clone, Copy, ValueEnum)]
enum ShowFormat {
    Json,
    Module,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let result = match cli.command {
        Commands::Check {
            configs,
            strict,
            check_files,
            exempt_templates,
        } => {
            let mut validate = ValidateOptions {
                check_references: check_files,
                ..Default::default()
            };
            if strict {
                validate.strictness = Strictness::Strict;
            }
            validate.device_exempt_templates.extend(exempt_templates);
            check(configs, LoadOptions { validate, ..Default::default() }).await
        }
        Commands::Show { config, format } => show(config, format),
        Commands::Devices => {
            list_devices();
            Ok(true)
        }
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when any document has problems
async fn check(configs: Vec<PathBuf>, options: LoadOptions) -> Result<bool> {
    log::info!("checking {} document(s)", configs.len());
    let loader = Loader::new(options);

    // Documents are independent; load them on the blocking pool.
    let results: Vec<(PathBuf, storepix_config::Result<LoadedConfig>)> = stream::iter(configs)
        .map(|path| {
            let loader = loader.clone();
            async move {
                let p = path.clone();
                let res = tokio::task::spawn_blocking(move || loader.load(&p)).await;
                (path, res)
            }
        })
        .buffered(num_cpus::get().max(1))
        .map(|(path, res)| res.map(|r| (path, r)))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<std::result::Result<_, _>>()
        .context("config loader task panicked")?;

    let mut ok = true;
    let mut loaded = Vec::new();
    for (path, result) in results {
        match result {
            Ok(l) => {
                for w in &l.warnings {
                    log::warn!("{}", w);
                }
                println!(
                    "ok: {} ({} screenshots, {} devices, fingerprint {})",
                    path.display(),
                    l.config.screenshots.len(),
                    l.config.devices.len(),
                    l.config.fingerprint()?
                );
                loaded.push(l);
            }
            Err(e) => {
                ok = false;
                println!("failed: {}", path.display());
                for err in e.into_errors() {
                    println!("  - {}", err);
                }
            }
        }
    }

    for collision in check_output_collisions(&loaded) {
        ok = false;
        println!("failed: {}", collision);
    }
    Ok(ok)
}

fn show(config: PathBuf, format: ShowFormat) -> Result<bool> {
    let loaded = Loader::default().load(&config)?;
    for w in &loaded.warnings {
        log::warn!("{}", w);
    }
    let text = match format {
        ShowFormat::Json => loaded.config.to_json_pretty()?,
        ShowFormat::Module => loaded.config.to_module_source()?,
    };
    println!("{}", text.trim_end());
    Ok(true)
}

fn list_devices() {
    for d in devices::catalog() {
        println!(
            "{:<24} {:>5}x{:<5} {:?}  {}",
            d.id, d.metrics.width, d.metrics.height, d.platform, d.description
        );
    }
}
