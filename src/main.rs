mod action_log;
mod args;
mod config;
mod http;
mod ip;
mod update;
mod util;

use std::env;
use std::path::{Path, PathBuf};

use clap::error::ErrorKind;
use clap::Parser;
use thiserror::Error;

use args::Args;
use config::{Config, ConfigError};
use http::HttpClient;
use ip::IpVersion;
use update::{Outcome, Reconciliation, UpdateAction, UpdateError};

const CONFIG_FILE: &str = "ddnsup.json";
const LOG_FILE: &str = "ddnsup.log";
const HOME_TOKEN: &str = "$HOME";

/// Everything that can end a run early, classified into the outcome that
/// decides the exit code.
#[derive(Debug, Error)]
enum RunError {
    #[error("missing configuration file: {}", .0.display())]
    ConfigMissing(PathBuf),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("no service named {0:?} in the config file")]
    ServiceNotFound(Box<str>),

    #[error(transparent)]
    Resolve(#[from] ip::ResolveError),

    #[error(transparent)]
    Update(#[from] UpdateError),
}

impl RunError {
    fn outcome(&self) -> Outcome {
        match self {
            RunError::ServiceNotFound(_) => Outcome::ServiceNotFound,
            _ => Outcome::Error,
        }
    }
}

fn main() {
    println!("ddnsup v{}", env!("CARGO_PKG_VERSION"));

    let mut action = UpdateAction::new(util::now());

    let args = match Args::try_parse() {
        Ok(args) => args,

        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            let _ = e.print();
            return;
        }

        Err(e) => {
            action.result = Outcome::InvalidParameters;
            action.notes = first_line(&e.to_string()).into();
            let _ = e.print();

            // no --path to honor; the log line goes to the default directory
            let log_path = resolve_base_dir(HOME_TOKEN).join(LOG_FILE);
            append_best_effort(&log_path, &action);
            std::process::exit(action.exit_code());
        }
    };

    let base_dir = resolve_base_dir(args.path.as_deref().unwrap_or(HOME_TOKEN));
    let config_path = base_dir.join(CONFIG_FILE);
    let log_path = base_dir.join(LOG_FILE);

    match run(&args, &config_path, &mut action) {
        Ok(outcome) => action.result = outcome,

        Err(e) => {
            println!("[ERROR] {}", e);
            action.result = e.outcome();
            action.notes = e.to_string().into();
        }
    }

    append_best_effort(&log_path, &action);
    std::process::exit(action.exit_code());
}

/// The whole run in its fixed order: bootstrap-or-load, lookup, resolve,
/// persist the check stamp, reconcile, persist the result. Failures abort the
/// remaining steps; state persisted by an earlier step is not rolled back.
fn run(args: &Args, config_path: &Path, action: &mut UpdateAction) -> Result<Outcome, RunError> {
    if !config_path.exists() {
        if args.path.is_none() {
            println!("[INFO] Creating sample config file: {}", config_path.display());
            Config::bootstrap(config_path)?;
            return Ok(Outcome::DefaultCreated);
        }

        return Err(RunError::ConfigMissing(config_path.to_path_buf()));
    }

    println!("[INFO] Loading config file: {}", config_path.display());
    let mut config = Config::load(config_path)?;

    // stray CR/LF sneaks in when the name comes from a script
    let service = args.service.replace(['\r', '\n'], "");

    // lookup precedes any network or file write: an unknown name must leave
    // the config file untouched
    match config.find_by_name(&service) {
        Some(record) => action.name = record.name.clone(),
        None => return Err(RunError::ServiceNotFound(service.into())),
    }

    let version = if args.use_ip6 { IpVersion::V6 } else { IpVersion::V4 };

    println!(
        "[INFO] Querying the current WAN {} address via {}",
        version,
        version.echo_url()
    );
    let resolved = ip::resolve(version)?.to_string();
    println!("[INFO] WAN address: {}", resolved);
    action.wan_ip = resolved.as_str().into();

    let now = util::now();

    match config.find_by_name_mut(&service) {
        Some(record) => record.last_check = Some(now),
        None => return Err(RunError::ServiceNotFound(service.into())),
    }
    config.save(config_path)?;

    let reconciliation = match config.find_by_name_mut(&service) {
        Some(record) => update::reconcile(record, &resolved, args.force, now, &HttpClient)?,
        None => return Err(RunError::ServiceNotFound(service.into())),
    };

    let outcome = match reconciliation {
        Reconciliation::NoChange => {
            println!("[INFO] IP address unchanged.");
            Outcome::NoChange
        }

        Reconciliation::Updated { response } => {
            println!("[INFO] Provider response: {}", response);
            action.notes = response.into();
            Outcome::Updated
        }

        Reconciliation::Rejected { response } => {
            println!(
                "[WARN] Provider response carried no acknowledgement: {}",
                response
            );
            action.notes = response.into();
            Outcome::Updated
        }
    };

    config.save(config_path)?;

    Ok(outcome)
}

/// "$HOME" expands to the platform home directory; trailing separators are
/// trimmed so the file names join uniformly.
fn resolve_base_dir(path: &str) -> PathBuf {
    #[cfg(windows)]
    let resolved = {
        let home = env::var("USERPROFILE").unwrap_or_default();
        path.replace(HOME_TOKEN, &home).replace('/', "\\")
    };

    #[cfg(not(windows))]
    let resolved = {
        let home = env::var("HOME").unwrap_or_default();
        path.replace(HOME_TOKEN, &home)
    };

    #[cfg(windows)]
    let trimmed = resolved.trim_end_matches('\\');
    #[cfg(not(windows))]
    let trimmed = resolved.trim_end_matches('/');

    PathBuf::from(trimmed)
}

fn first_line(text: &str) -> &str {
    text.lines().next().unwrap_or_default().trim_end()
}

fn append_best_effort(path: &Path, action: &UpdateAction) {
    if let Err(e) = action_log::append(path, action) {
        println!("[WARN] Couldn't append to the action log: {}", e);
    }
}
