// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

mod config;
mod logging;
mod runtime;
#[cfg(test)]
mod test_support;

use anyhow::{Context, Result, anyhow, bail};
use checkit_app::{AppState, UiCommand};
use checkit_db::Store;
use config::Config;
use runtime::DbRuntime;
use std::env;
use std::path::{Path, PathBuf};

const USAGE: &str = "\
usage: checkit [options]

  --config <path>          read settings from <path>
  --print-config-path      show where settings are read from
  --print-path             show where lists are stored
  --print-example-config   write a starter config to stdout
  --demo                   try checkit on throwaway sample lists
  --check                  open config and database, report problems, exit
  --export                 dump stored lists as JSON
  -h, --help               this text";

fn main() {
    if let Err(error) = run() {
        log::error!("{error:#}");
        eprintln!("checkit: {error:#}");
        std::process::exit(1);
    }
}

/// What a single invocation does. Later variants win when several flags are
/// given, so `--help` always just prints help.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
enum Mode {
    #[default]
    Interactive,
    Export,
    Check,
    PrintDbPath,
    PrintExampleConfig,
    PrintConfigPath,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Invocation {
    config_path: PathBuf,
    demo: bool,
    mode: Mode,
}

fn parse_args<I, S>(args: I, config_path: PathBuf) -> Result<Invocation>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut invocation = Invocation {
        config_path,
        demo: false,
        mode: Mode::default(),
    };

    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mode = match arg.as_ref() {
            "--config" => {
                let path = args
                    .next()
                    .ok_or_else(|| anyhow!("--config needs a path to a TOML file"))?;
                invocation.config_path = PathBuf::from(path.as_ref());
                continue;
            }
            "--demo" => {
                invocation.demo = true;
                continue;
            }
            "--export" => Mode::Export,
            "--check" => Mode::Check,
            "--print-path" => Mode::PrintDbPath,
            "--print-example-config" => Mode::PrintExampleConfig,
            "--print-config-path" => Mode::PrintConfigPath,
            "--help" | "-h" => Mode::Help,
            other => bail!("unrecognized option {other:?} (see `checkit --help`)"),
        };
        invocation.mode = invocation.mode.max(mode);
    }

    Ok(invocation)
}

fn run() -> Result<()> {
    let invocation = parse_args(env::args().skip(1), Config::default_path()?)?;
    match invocation.mode {
        Mode::Help => {
            println!("checkit {}\n\n{USAGE}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        Mode::PrintConfigPath => {
            println!("{}", invocation.config_path.display());
            return Ok(());
        }
        Mode::PrintExampleConfig => {
            print!("{}", Config::example_config(&invocation.config_path));
            return Ok(());
        }
        _ => {}
    }

    let config = Config::load(&invocation.config_path).with_context(|| {
        format!(
            "bad config at {} (`checkit --print-example-config` shows a valid one)",
            invocation.config_path.display()
        )
    })?;
    let db_path = if invocation.demo {
        PathBuf::from(":memory:")
    } else {
        config.db_path()?
    };
    if invocation.mode == Mode::PrintDbPath {
        println!("{}", db_path.display());
        return Ok(());
    }

    let _logger = logging::init(
        logging::resolve_level(config.log_level())?,
        &checkit_db::data_dir()?,
    )?;
    let store = open_store(&db_path, invocation.demo)?;

    match invocation.mode {
        Mode::Check => {
            log::info!("{} looks healthy", db_path.display());
            Ok(())
        }
        Mode::Export => {
            println!("{}", store.export_json()?);
            Ok(())
        }
        _ => {
            let mut state = AppState::default();
            state.apply(UiCommand::SetTheme(config.theme()));
            let outcome = checkit_tui::run_app(&mut state, &mut DbRuntime::new(&store));
            log::info!("checkit exiting");
            outcome
        }
    }
}

fn open_store(db_path: &Path, demo: bool) -> Result<Store> {
    let store = Store::open(db_path).with_context(|| {
        format!(
            "cannot use {} for storage; point [storage].db_path or CHECKIT_DB_PATH somewhere writable",
            db_path.display()
        )
    })?;
    store.bootstrap()?;
    if demo {
        store.seed_demo_data()?;
    }
    Ok(store)
}
