#![forbid(unsafe_code)]

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{Level as TraceLevel, info};
use tracing_subscriber::FmtSubscriber;

use tui_startpage::config::defaults::is_builtin_widget;
use tui_startpage::preset::ids_with_duplicates;
use tui_startpage::types::Breakpoint;
use tui_startpage::{Dashboard, FileStore};

#[derive(Parser, Debug)]
#[command(name = "tui-startpage", version, about = "Manage start-page dashboard state")]
struct Cli {
    /// Storage file (defaults to the platform config directory)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print theme, widget visibility and display flags
    Show,
    /// Show or hide a widget (removes an active duplicate)
    Toggle { key: String },
    /// Add another instance of a widget type
    Add { widget_type: String },
    /// Remove a duplicated widget
    Remove { key: String },
    /// Restore layout and display options to defaults
    Reset,
    /// Print the placements for one breakpoint as JSON
    Layout { breakpoint: String },
    #[command(subcommand)]
    Theme(ThemeCommand),
    #[command(subcommand)]
    Preset(PresetCommand),
}

#[derive(Subcommand, Debug)]
enum ThemeCommand {
    List,
    Set { name: String },
    Delete { name: String },
    /// Print the resolved style variables and custom CSS
    Vars,
}

#[derive(Subcommand, Debug)]
enum PresetCommand {
    List,
    Save { name: String },
    Load { id: u64 },
    Delete { id: u64 },
    Export { id: u64, path: PathBuf },
    Import { path: PathBuf },
}

fn run(cli: Cli) -> Result<()> {
    let path = cli.store.unwrap_or_else(FileStore::default_path);
    let mut dash = Dashboard::open(FileStore::open(&path)?);
    info!(path = %path.display(), "Opened dashboard");

    match cli.command {
        Command::Show => {
            let config = dash.config();
            println!("theme: {}", config.current_theme());
            println!("reserve settings space: {}", config.reserve_settings_space());
            println!("layout locked: {}", config.layout_locked());
            println!("widgets:");
            for (key, active) in config.active_widgets() {
                println!("  [{}] {key}", if *active { "x" } else { " " });
            }
        }
        Command::Toggle { key } => {
            let active = dash.toggle_widget(&key);
            println!("{key}: {}", if active { "shown" } else { "hidden" });
        }
        Command::Add { widget_type } => {
            if !is_builtin_widget(&widget_type) {
                bail!("Unknown widget type '{widget_type}'");
            }
            println!("{}", dash.add_extra_widget(&widget_type));
        }
        Command::Remove { key } => {
            if !dash.remove_extra_widget(&key) {
                bail!("No widget named '{key}'");
            }
        }
        Command::Reset => dash.reset_layout(),
        Command::Layout { breakpoint } => {
            let Some(bp) = Breakpoint::parse(&breakpoint) else {
                bail!("Unknown breakpoint '{breakpoint}' (expected lg, md, sm, xs or xxs)");
            };
            match dash.config().layouts().get(bp) {
                Some(items) => println!("{}", serde_json::to_string_pretty(items)?),
                None => println!("[]"),
            }
        }
        Command::Theme(ThemeCommand::List) => {
            let selected = dash.config().current_theme().clone();
            for (id, theme) in dash.all_themes() {
                let marker = if id == selected { "*" } else { " " };
                println!("{marker} {id} ({})", theme.name);
            }
        }
        Command::Theme(ThemeCommand::Set { name }) => {
            if !dash.all_themes().contains_key(&name) {
                bail!("Unknown theme '{name}'");
            }
            dash.config_mut().set_current_theme(name);
        }
        Command::Theme(ThemeCommand::Delete { name }) => {
            if !dash.delete_custom_theme(&name) {
                bail!("No custom theme named '{name}'");
            }
        }
        Command::Theme(ThemeCommand::Vars) => {
            print!("{}", dash.theme_variables().to_stylesheet());
        }
        Command::Preset(PresetCommand::List) => {
            let duplicates = ids_with_duplicates(dash.presets());
            for preset in dash.presets() {
                let note = if duplicates.contains_key(&preset.id) { "  (shared id)" } else { "" };
                println!("{}  {}{note}", preset.id, preset.name);
            }
        }
        Command::Preset(PresetCommand::Save { name }) => {
            println!("{}", dash.save_preset(&name));
        }
        Command::Preset(PresetCommand::Load { id }) => {
            if !dash.load_preset_by_id(id) {
                bail!("Preset {id} is missing or has no usable data");
            }
        }
        Command::Preset(PresetCommand::Delete { id }) => {
            if dash.delete_preset(id) == 0 {
                bail!("No preset with id {id}");
            }
        }
        Command::Preset(PresetCommand::Export { id, path }) => dash.export_preset(id, &path)?,
        Command::Preset(PresetCommand::Import { path }) => {
            println!("{}", dash.import_preset(&path)?);
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    run(Cli::parse())
}
