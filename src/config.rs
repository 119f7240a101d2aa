use clap::{value_parser, Arg, Command};
use std::ffi::OsString;
use std::path::PathBuf;

pub const DEFAULT_STORE: &str = "tasks_store.json";
pub const DEFAULT_LOG: &str = "tasklist.log";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Key-value store file holding the task collection.
    pub store_path: PathBuf,
    pub log_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: PathBuf::from(DEFAULT_STORE),
            log_path: PathBuf::from(DEFAULT_LOG),
        }
    }
}

fn command() -> Command {
    Command::new("tasklist")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Single-screen terminal to-do list")
        .arg(
            Arg::new("store")
                .long("store")
                .env("TASKLIST_STORE")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_STORE)
                .help("File the tasks are saved to"),
        )
        .arg(
            Arg::new("log-file")
                .long("log-file")
                .env("TASKLIST_LOG")
                .value_name("PATH")
                .value_parser(value_parser!(PathBuf))
                .default_value(DEFAULT_LOG)
                .help("Diagnostic log file (filter with RUST_LOG)"),
        )
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_matches(&command().get_matches())
    }

    pub fn try_from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        Ok(Self::from_matches(&command().try_get_matches_from(args)?))
    }

    fn from_matches(matches: &clap::ArgMatches) -> Self {
        let path = |id: &str, fallback: &str| {
            matches
                .get_one::<PathBuf>(id)
                .cloned()
                .unwrap_or_else(|| PathBuf::from(fallback))
        };
        Self {
            store_path: path("store", DEFAULT_STORE),
            log_path: path("log-file", DEFAULT_LOG),
        }
    }
}
