use anyhow::Result;
use log::LevelFilter;
use marginalia::cli;
use marginalia::config::Config;
use marginalia::context::StandardContext;
use marginalia::controller::{self, RunOptions};
use simplelog::{ColorChoice, TermLogger, TerminalMode};
use std::env;
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let binary_name = args
        .first()
        .map(|s| s.as_str())
        .unwrap_or("marginalia")
        .to_string();

    let mut options = RunOptions::default();
    let mut override_root: Option<PathBuf> = None;
    let mut verbose = false;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" | "help" => {
                cli::print_help(&binary_name);
                return Ok(());
            }
            "-V" | "--version" => {
                println!("marginalia {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "-f" | "--file" => {
                i += 1;
                match args.get(i) {
                    Some(path) => options.clippings_file = Some(PathBuf::from(path)),
                    None => {
                        eprintln!("Error: {} requires a path argument", args[i - 1]);
                        std::process::exit(2);
                    }
                }
            }
            "-r" | "--root" => {
                i += 1;
                match args.get(i) {
                    Some(path) => override_root = Some(PathBuf::from(path)),
                    None => {
                        eprintln!("Error: {} requires a path argument", args[i - 1]);
                        std::process::exit(2);
                    }
                }
            }
            "--covers" => options.fetch_covers = true,
            "--dry-run" => options.dry_run = true,
            "-v" | "--verbose" => verbose = true,
            other => {
                eprintln!("Error: unknown argument '{}'", other);
                eprintln!("Run '{} --help' for usage.", binary_name);
                std::process::exit(2);
            }
        }
        i += 1;
    }

    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    TermLogger::init(
        level,
        simplelog::Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )?;

    let ctx = StandardContext::new(override_root);

    let config = match Config::load(&ctx) {
        Ok(config) => config,
        Err(err) if Config::is_missing_config_error(&err) => {
            // First run: write a template and tell the user where it is.
            Config::default().save(&ctx)?;
            eprintln!(
                "No configuration found. A template was written to:\n    {}",
                Config::get_path_string(&ctx)?
            );
            eprintln!("Fill in notion_token and notion_database_id, then run again.");
            std::process::exit(1);
        }
        Err(err) => return Err(err),
    };

    match controller::run(&ctx, &config, &options).await {
        Ok(summary) => {
            cli::print_summary(&summary);
            Ok(())
        }
        Err(err) => {
            log::error!("Sync failed: {:#}", err);
            std::process::exit(1);
        }
    }
}
