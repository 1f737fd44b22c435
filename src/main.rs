// procctl: Process Spawning and Control
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Config --> Logging --> Command Dispatch
//!   Run | Ids | Signals | Options | Configs | Version
//! ```

use std::process::ExitCode;

use procctl::cli::global::GlobalOptions;
use procctl::cli::{self, Command};
use procctl::cmd::config::{run_configs_command, run_options_command};
use procctl::cmd::ids::{run_ids_command, run_signals_command};
use procctl::cmd::run::run_run_command;
use procctl::config::Config;
use procctl::config::loader::ConfigLoader;
use procctl::error::bail_out;
use procctl::logging::{FileFormat, LogConfig, LogLevel, init_logging};

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    // Version and config listing need neither config nor logging.
    match &cli.command {
        Some(Command::Version) => {
            handle_version_command();
            return ExitCode::SUCCESS;
        }
        Some(Command::Configs) => {
            run_configs_command(&build_config_loader(&cli.global).format_sources());
            return ExitCode::SUCCESS;
        }
        _ => {}
    }

    let config = match load_config(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let log_config = build_log_config(&config);
    let _log_guard = match init_logging(&log_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli, &config).await
}

fn build_log_config(config: &Config) -> LogConfig {
    let global = &config.global;
    LogConfig::builder()
        .with_console_level(global.output_log_level)
        .with_file_level(global.file_log_level)
        .maybe_with_log_file(global.log_file.clone())
        .with_file_format(if global.log_json {
            FileFormat::Json
        } else {
            FileFormat::Text
        })
        .with_timestamps(global.output_log_level >= LogLevel::DEBUG)
        .build()
}

async fn dispatch_command(cli: &cli::Cli, config: &Config) -> ExitCode {
    let result = match &cli.command {
        Some(Command::Options) => {
            run_options_command(config);
            Ok(())
        }
        Some(Command::Run(args)) => match run_run_command(args, &config.run).await {
            Ok(report) => return ExitCode::from(report.exit_code()),
            Err(e) => Err(e),
        },
        Some(Command::Ids(args)) => run_ids_command(args),
        Some(Command::Signals) => {
            run_signals_command();
            Ok(())
        }
        Some(Command::Version | Command::Configs) => Ok(()),
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(bail_out("no command specified"))
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new();
    if !global.no_default_config {
        loader = loader.add_toml_file_optional("procctl.toml");
    }
    for path in &global.configs {
        loader = loader.add_toml_file(path);
    }
    loader.with_env_prefix("PROCCTL")
}

fn load_config(global: &GlobalOptions) -> procctl::error::Result<Config> {
    build_config_loader(global)
        .apply_overrides(global.to_config_overrides())?
        .build()
}
