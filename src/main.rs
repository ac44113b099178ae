//! Pin Assist - Main entrypoint.
//!
//! Command-line host for the tracked-object dictionary. It loads the
//! configuration, initializes logging and runs one command against the
//! dictionary stored on disk.

use clap::{Parser, Subcommand, ValueEnum};
use pin_assist_lib::config::{LogConfig, PinAssistConfig};
use pin_assist_lib::data_structures::loose_dictionary::{
    LooseDictionaryConfig, LooseDictionaryError, RenameOutcome,
};
use pin_assist_lib::error::{
    ErrorContext, ErrorReporter, PinAssistError, PinAssistResult, TracingErrorReporter,
};
use pin_assist_lib::messages::MessageKind;
use pin_assist_lib::store::TrackedObjectStore;
use std::path::{Path, PathBuf};
use std::process;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command line arguments for Pin Assist.
#[derive(Parser, Debug)]
#[clap(name = "Pin Assist", version, author, about)]
struct Args {
    /// Path to configuration file
    #[clap(short, long, value_parser)]
    config: Option<PathBuf>,

    /// Command to execute
    #[clap(subcommand)]
    command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Command {
    /// Track a new object name
    Track {
        /// Object name (matched case-insensitively)
        id: String,
        /// Object type recorded for the name
        object_type: String,
        /// Ignore the object whenever this word appears in the looked-up name
        #[clap(long)]
        blacklist: Option<String>,
        /// Only match names that end with the object name
        #[clap(long)]
        exact_only: bool,
    },

    /// Change the type or match rules of a tracked object
    Modify {
        /// Object name
        id: String,
        /// New object type
        object_type: String,
        /// New blacklist word
        #[clap(long)]
        blacklist: Option<String>,
        /// Only match names that end with the object name
        #[clap(long)]
        exact_only: bool,
        /// Also rename the object
        #[clap(long, value_name = "NEW_ID")]
        rename: Option<String>,
    },

    /// Rename a tracked object
    Rename {
        /// Current object name
        id: String,
        /// New object name
        new_id: String,
    },

    /// Stop tracking an object
    Untrack {
        /// Object name
        id: String,
    },

    /// Stop tracking every object
    Clear,

    /// List tracked objects
    List {
        /// Sort by object type and save the new order
        #[clap(long)]
        sort: bool,
    },

    /// Find the tracked object a name refers to
    Find {
        /// Name to look up
        query: String,
        /// Matching strategy
        #[clap(long, value_enum, default_value_t = FindMode::Loose)]
        mode: FindMode,
        /// Only accept matches that reach the end of the name
        #[clap(long)]
        exact_only: bool,
    },

    /// Validate the configuration file
    Validate,

    /// Generate a default configuration file
    GenConfig {
        /// Path to output configuration file
        #[clap(short, long, value_parser)]
        output: PathBuf,
    },
}

/// Lookup strategies exposed by `find`.
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum FindMode {
    /// Whole name must be a tracked object
    Exact,
    /// Tracked object appears anywhere in the name, with conflict reporting
    Loose,
    /// Tracked object appears anywhere in the name
    Lite,
    /// Tracked object characters appear in order, separators allowed
    Fuzzy,
}

/// Initialize the logging system.
fn init_logging(log: &LogConfig) -> PinAssistResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if log.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.with_target(false).finish())
    };
    result.map_err(|e| PinAssistError::Custom(format!("Failed to set global tracing subscriber: {e}")))
}

/// Writes the default configuration as TOML.
fn generate_config(output: &Path) -> PinAssistResult<()> {
    let default_config = PinAssistConfig::default();

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let toml = toml::to_string_pretty(&default_config)
        .map_err(|e| PinAssistError::Custom(format!("Failed to serialize config: {e}")))?;
    std::fs::write(output, toml)?;

    info!("Default configuration written to {:?}", output);
    Ok(())
}

/// Message printed after a successful rename.
fn rename_report(id: &str, new_id: &str, outcome: &RenameOutcome<String>) -> String {
    match &outcome.conflicting_key {
        Some(other) => MessageKind::RenameWarningConflict.format(&[&new_id, other]),
        None => MessageKind::RenameSuccess.format(&[&id, &new_id]),
    }
}

/// Installs default logging for failures that happen before the config is known.
fn init_fallback_logging() {
    if let Err(e) = init_logging(&LogConfig::default()) {
        eprintln!("{e}");
    }
}

/// Runs a dictionary command against the configured store.
fn run(command: Command, config: &PinAssistConfig) -> PinAssistResult<()> {
    let store = TrackedObjectStore::new(
        &config.dictionary.store_path,
        LooseDictionaryConfig::from(&config.dictionary),
    );

    match command {
        Command::Track {
            id,
            object_type,
            blacklist,
            exact_only,
        } => {
            let mut objects = store.load()?;
            match objects.add(&id, object_type, blacklist.as_deref(), exact_only) {
                Ok(outcome) => {
                    store.save(&objects)?;
                    let kind = if outcome.conflicting {
                        MessageKind::TrackWarningConflict
                    } else {
                        MessageKind::TrackSuccess
                    };
                    println!("{}", kind.format(&[&id]));
                }
                Err(LooseDictionaryError::EmptyKey) => println!("{}", MessageKind::TrackInvalid),
                Err(LooseDictionaryError::KeyExists { .. }) => {
                    println!("{}", MessageKind::TrackFail.format(&[&id]))
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Modify {
            id,
            object_type,
            blacklist,
            exact_only,
            rename,
        } => {
            let mut objects = store.load()?;
            let mut current = id.clone();
            let mut conflict = None;

            if let Some(new_id) = rename {
                match objects.rename(&id, &new_id) {
                    Ok(outcome) => {
                        conflict = outcome.conflicting_key;
                        current = new_id;
                    }
                    Err(LooseDictionaryError::KeyNotFound { .. }) => {
                        println!("{}", MessageKind::UntrackFail.format(&[&id]));
                        return Ok(());
                    }
                    Err(LooseDictionaryError::TargetExists { .. }) => {
                        println!("{}", MessageKind::RenameFail.format(&[&id, &new_id]));
                        return Ok(());
                    }
                    Err(e) => return Err(e.into()),
                }
            }

            match objects.modify(&current, object_type, exact_only, blacklist.as_deref()) {
                Ok(()) => {
                    store.save(&objects)?;
                    match conflict {
                        Some(other) => println!(
                            "{}",
                            MessageKind::ModifyWarningConflict.format(&[&current, &other])
                        ),
                        None => println!("{}", MessageKind::ModifySuccess.format(&[&current])),
                    }
                }
                Err(LooseDictionaryError::KeyNotFound { .. }) => {
                    println!("{}", MessageKind::UntrackFail.format(&[&current]))
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Rename { id, new_id } => {
            let mut objects = store.load()?;
            match objects.rename(&id, &new_id) {
                Ok(outcome) => {
                    store.save(&objects)?;
                    println!("{}", rename_report(&id, &new_id, &outcome));
                }
                Err(LooseDictionaryError::KeyNotFound { .. }) => {
                    println!("{}", MessageKind::UntrackFail.format(&[&id]))
                }
                Err(LooseDictionaryError::TargetExists { .. }) => {
                    println!("{}", MessageKind::RenameFail.format(&[&id, &new_id]))
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Untrack { id } => {
            let mut objects = store.load()?;
            match objects.remove(&id) {
                Ok(_) => {
                    store.save(&objects)?;
                    println!("{}", MessageKind::UntrackSuccess.format(&[&id]));
                }
                Err(LooseDictionaryError::KeyNotFound { .. }) => {
                    println!("{}", MessageKind::UntrackFail.format(&[&id]))
                }
                Err(e) => return Err(e.into()),
            }
        }
        Command::Clear => {
            let mut objects = store.load()?;
            objects.clear();
            store.save(&objects)?;
            println!("{}", MessageKind::TrackedObjectsCleared);
        }
        Command::List { sort } => {
            let mut objects = store.load()?;
            if sort {
                objects.sort_by_value();
                store.save(&objects)?;
            }
            for (key, entry) in objects.iter() {
                let mut line = format!("{key}\t{}", entry.value());
                if entry.is_exact_match_only() {
                    line.push_str("\texact-only");
                }
                if let Some(word) = entry.blacklist_word() {
                    line.push_str(&format!("\tblacklist={word}"));
                }
                println!("{line}");
            }
        }
        Command::Find {
            query,
            mode,
            exact_only,
        } => {
            let objects = store.load()?;
            let message = match mode {
                FindMode::Exact => objects.lookup_exact(&query).map(|entry| {
                    MessageKind::ObjectFound.format(&[&query, &query.to_lowercase(), entry.value()])
                }),
                FindMode::Loose => objects.lookup_loose(&query, exact_only).map(|found| {
                    let kind = if found.conflicting {
                        MessageKind::ObjectFoundConflicting
                    } else {
                        MessageKind::ObjectFound
                    };
                    kind.format(&[&query, &found.key, found.value()])
                }),
                FindMode::Lite => objects
                    .lookup_loose_lite(&query)
                    .map(|object_type| MessageKind::ObjectTypeFound.format(&[&query, object_type])),
                FindMode::Fuzzy => objects
                    .lookup_fuzzy(&query, exact_only)
                    .map(|object_type| MessageKind::ObjectTypeFound.format(&[&query, object_type])),
            };
            match message {
                Some(message) => println!("{message}"),
                None => println!("{}", MessageKind::ObjectNotTracked.format(&[&query])),
            }
        }
        Command::Validate => info!("Configuration validated successfully"),
        Command::GenConfig { output } => generate_config(&output)?,
    }
    Ok(())
}

/// Main entry point for the application.
fn main() {
    let args = <Args as clap::Parser>::parse();

    // Generating a config must work even when the current one is broken.
    if let Command::GenConfig { output } = &args.command {
        init_fallback_logging();
        if let Err(e) = generate_config(output) {
            TracingErrorReporter.report(&ErrorContext::new(e, "config"));
            process::exit(1);
        }
        return;
    }

    let config = match pin_assist_lib::init(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            init_fallback_logging();
            TracingErrorReporter.report(&ErrorContext::new(e, "config"));
            process::exit(1);
        }
    };

    if let Err(e) = init_logging(&config.log) {
        eprintln!("{e}");
    }
    info!(version = pin_assist_lib::VERSION, store = ?config.dictionary.store_path, "Pin Assist starting");

    if let Err(e) = run(args.command, config) {
        let context = ErrorContext::new(e, "dictionary")
            .with_details(format!("store: {:?}", config.dictionary.store_path));
        TracingErrorReporter.report(&context);
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_report_mentions_conflict() {
        let clean = RenameOutcome::default();
        assert_eq!(
            rename_report("ore", "vein", &clean),
            "Successfully renamed 'ore' to 'vein'!"
        );

        let conflicting = RenameOutcome {
            conflicting: true,
            conflicting_key: Some("copper".to_string()),
            conflicting_value: Some("MineRock".to_string()),
        };
        let report = rename_report("ore", "copper_ore", &conflicting);
        assert_eq!(report, "Object renamed to 'copper_ore', but 'copper_ore' conflicts with copper!");
        assert!(!report.contains("modified"));
    }

    #[test]
    fn test_fallback_logging_survives_a_second_install() {
        init_fallback_logging();
        // A subscriber is already installed, so this takes the error path.
        init_fallback_logging();
        assert!(init_logging(&LogConfig::default()).is_err());
    }
}
