use std::path::PathBuf;

use clap::{Parser, Subcommand};

use m17n_cli::commands::{config_ops, name_ops, translate_ops};

#[derive(Parser)]
#[command(name = "m17ntool", about = "m17n engine diagnostics and settings tool")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the backend symbol a key event translates to
    Translate {
        /// Key name (`a`, `Return`, `F1`, `U+0DA4`, ...)
        key: String,
        /// Hardware keycode (evdev numbering)
        #[arg(long, default_value = "0")]
        keycode: u16,
        /// Comma-separated modifiers, e.g. `shift,control`
        #[arg(long, default_value = "")]
        mods: String,
        /// Re-read the key through the US layout first
        #[arg(long)]
        us_layout: bool,
        /// Output as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Decompose an engine name (`m17n:<lang>:<variant>`)
    Name {
        engine_name: String,
        #[arg(long)]
        json: bool,
    },
    /// Recover the engine from a generated class name
    Class {
        class_name: String,
        #[arg(long)]
        json: bool,
    },
    /// Per-engine configuration in a settings store
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
    /// Built-in settings file
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective configuration
    Show {
        engine_name: String,
        /// Settings store file
        #[arg(long)]
        file: PathBuf,
    },
    /// Store a value
    Set {
        engine_name: String,
        key: String,
        value: String,
        #[arg(long)]
        file: PathBuf,
    },
    /// Remove a stored value
    Unset {
        engine_name: String,
        key: String,
        #[arg(long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum SettingsAction {
    /// Print the default settings TOML
    Export,
    /// Validate a settings TOML file
    Validate {
        /// Path to the TOML file
        file: String,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Command::Translate {
            key,
            keycode,
            mods,
            us_layout,
            json,
        } => translate_ops::translate_cmd(&key, keycode, &mods, us_layout, json),
        Command::Name { engine_name, json } => name_ops::name_cmd(&engine_name, json),
        Command::Class { class_name, json } => name_ops::class_cmd(&class_name, json),
        Command::Config { action } => match action {
            ConfigAction::Show { engine_name, file } => config_ops::config_show(&engine_name, &file),
            ConfigAction::Set {
                engine_name,
                key,
                value,
                file,
            } => config_ops::config_set(&engine_name, &key, &value, &file),
            ConfigAction::Unset {
                engine_name,
                key,
                file,
            } => config_ops::config_unset(&engine_name, &key, &file),
        },
        Command::Settings { action } => match action {
            SettingsAction::Export => config_ops::settings_export(),
            SettingsAction::Validate { file } => config_ops::settings_validate(&file),
        },
    }
}
