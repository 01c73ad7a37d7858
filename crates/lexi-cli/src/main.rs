// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;

use anyhow::{Context, Result, anyhow};
use config::Config;
use lexi_app::ProfilePanel;
use lexi_store::Store;
use lexi_tui::ExitReason;
use std::env;
use std::path::PathBuf;

fn main() {
    if let Err(error) = run() {
        eprintln!("{error:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let options = parse_cli_args(env::args().skip(1), Config::default_path()?)?;
    if options.show_help {
        print_help();
        return Ok(());
    }

    if options.print_config_path {
        println!("{}", options.config_path.display());
        return Ok(());
    }

    if options.print_example {
        print!("{}", Config::example_config(&options.config_path));
        return Ok(());
    }

    let config = Config::load(&options.config_path).with_context(|| {
        format!(
            "load config {}; run `lexi --print-example-config` to generate a template",
            options.config_path.display()
        )
    })?;

    let db_path = config.db_path()?;
    if options.print_db_path {
        println!("{}", db_path.display());
        return Ok(());
    }

    let store = Store::open(&db_path).with_context(|| {
        format!(
            "open database {} -- if this path is wrong, set [storage].db_path or LEXI_DB_PATH",
            db_path.display()
        )
    })?;
    store.bootstrap()?;

    let client = build_client(&config).with_context(|| {
        format!(
            "invalid [backend] config in {}; fix url/anon_key/timeout values",
            options.config_path.display()
        )
    })?;
    if options.check_only {
        return Ok(());
    }

    let log_path = logging::init(&config)?;
    tracing::info!(
        log = %log_path.display(),
        db = %db_path.display(),
        backend = client.base_url(),
        session = client.has_session(),
        "starting lexi"
    );

    let mut panel = ProfilePanel::new(client, store);
    let reason = lexi_tui::run_app(&mut panel)?;
    tracing::info!(?reason, "lexi exited");
    if reason == ExitReason::SignedOut {
        println!("signed out");
    }
    Ok(())
}

fn build_client(config: &Config) -> Result<lexi_backend::Client> {
    let client = lexi_backend::Client::new(
        config.backend_url()?,
        config.backend_anon_key()?,
        config.backend_timeout()?,
    )?;
    Ok(match config.access_token() {
        Some(token) => client.with_access_token(token),
        None => client,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliOptions {
    config_path: PathBuf,
    print_config_path: bool,
    print_db_path: bool,
    print_example: bool,
    check_only: bool,
    show_help: bool,
}

fn parse_cli_args<I, S>(args: I, default_config_path: PathBuf) -> Result<CliOptions>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut options = CliOptions {
        config_path: default_config_path,
        print_config_path: false,
        print_db_path: false,
        print_example: false,
        check_only: false,
        show_help: false,
    };

    let mut iter = args.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_ref() {
            "--config" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow!("--config requires a file path"))?;
                options.config_path = PathBuf::from(value.as_ref());
            }
            "--print-config-path" => options.print_config_path = true,
            "--print-path" => options.print_db_path = true,
            "--print-example-config" => options.print_example = true,
            "--check" => options.check_only = true,
            "--help" | "-h" => options.show_help = true,
            unknown => {
                return Err(anyhow!(
                    "unknown argument {unknown:?}; run with --help to see supported options"
                ));
            }
        }
    }

    Ok(options)
}

fn print_help() {
    println!("lexi: profile and settings panel");
    println!("  --config <path>          Use a specific config path");
    println!("  --print-config-path      Print resolved config path");
    println!("  --print-path             Print resolved database path");
    println!("  --print-example-config   Print a config template");
    println!("  --check                  Validate config, database, and backend settings");
    println!("  --help                   Show this help");
    println!();
    println!("Environment: LEXI_CONFIG_PATH, LEXI_DB_PATH, LEXI_ACCESS_TOKEN, LEXI_LOG");
}
