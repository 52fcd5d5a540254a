//! Plugin management commands

use std::path::Path;

use anyhow::Result;
use clap::{Args, Subcommand};
use murmur_core::plugins::{KindSummary, PluginToggles, scan_plugin_dirs};
use murmur_core::{PluginInfo, PluginManager, PluginState};
use murmur_plugin_api::OfflineServer;

use crate::config::{ConfigLoader, MurmurConfig};

/// Plugin management arguments
#[derive(Args)]
pub struct PluginArgs {
    #[command(subcommand)]
    pub command: PluginCommands,
}

/// Plugin subcommands
#[derive(Subcommand)]
pub enum PluginCommands {
    /// List installed plugins
    List {
        /// Include disabled plugins
        #[arg(long)]
        all: bool,
    },
    /// Enable a plugin
    Enable {
        /// Plugin directory name to enable
        name: String,
    },
    /// Disable a plugin
    Disable {
        /// Plugin directory name to disable
        name: String,
    },
    /// Show plugin details
    Info {
        /// Plugin id
        id: String,
    },
    /// Show which plugins handle which events, in dispatch order
    Events {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Run plugin command
pub fn run(args: PluginArgs) -> Result<()> {
    let config = ConfigLoader::load()?;

    match args.command {
        PluginCommands::List { all } => list_plugins(&config, all),
        PluginCommands::Enable { name } => enable_plugin(&config, &name),
        PluginCommands::Disable { name } => disable_plugin(&config, &name),
        PluginCommands::Info { id } => show_plugin_info(&config, &id),
        PluginCommands::Events { json } => show_events(&config, json),
    }
}

/// Load every enabled plugin and run its startup hooks against an offline server
fn start_plugins(config: &MurmurConfig) -> Result<PluginManager> {
    let host_config = config.plugins.host_config();
    let toggles = PluginToggles::load(&host_config.toggles_path())?;
    let units = scan_plugin_dirs(&host_config, &toggles);

    let api = OfflineServer::new(config.host.name.clone(), config.host.voice_distance);
    Ok(PluginManager::start(&units, &config.host.name, &api))
}

fn list_plugins(config: &MurmurConfig, all: bool) -> Result<()> {
    let manager = start_plugins(config)?;
    let plugins = manager.list_plugins();

    let host_config = config.plugins.host_config();
    let toggles = PluginToggles::load(&host_config.toggles_path())?;
    let disabled: Vec<&str> = if all {
        toggles.disabled_units().collect()
    } else {
        Vec::new()
    };

    if plugins.is_empty() && disabled.is_empty() {
        let user_dir = config.plugins.user_dir.display();
        println!("No plugins installed");
        println!();
        println!("Plugin directory: {}", user_dir);
        println!();
        println!("To install a plugin:");
        println!("  1. Create a plugin directory: mkdir -p {}/my-plugin", user_dir);
        println!(
            "  2. Copy the plugin library: cp libmy_plugin.so {}/my-plugin/my-plugin.so",
            user_dir
        );
        println!("  3. Check it loads: murmur plugin list");
        return Ok(());
    }

    for info in &plugins {
        println!("{}", plugin_line(info));
    }
    for name in disabled {
        println!("○ {}    disabled", name);
    }

    for failure in manager.failures() {
        tracing::warn!(error = %failure, "Plugin startup problem");
    }

    Ok(())
}

fn enable_plugin(config: &MurmurConfig, name: &str) -> Result<()> {
    set_enabled(&config.plugins.host_config().toggles_path(), name, true)?;
    println!("Enabled plugin: {}", name);
    println!("Run 'murmur plugin list' to verify the plugin loads correctly.");
    Ok(())
}

fn disable_plugin(config: &MurmurConfig, name: &str) -> Result<()> {
    set_enabled(&config.plugins.host_config().toggles_path(), name, false)?;
    println!("Disabled plugin: {}", name);
    Ok(())
}

fn set_enabled(toggles_path: &Path, name: &str, enabled: bool) -> Result<()> {
    let mut toggles = PluginToggles::load(toggles_path)?;
    if enabled {
        toggles.enable(name);
    } else {
        toggles.disable(name);
    }
    toggles.save(toggles_path)?;
    Ok(())
}

fn show_plugin_info(config: &MurmurConfig, id: &str) -> Result<()> {
    let manager = start_plugins(config)?;

    let Some(info) = manager.get_plugin_info(id) else {
        println!("Plugin '{}' not found", id);
        println!();
        println!("The plugin might not be installed or enabled.");
        println!("Run 'murmur plugin list --all' to see all plugins.");
        return Ok(());
    };

    println!("Id:          {}", info.id);
    println!("Unit:        {}", info.unit);
    println!("Export:      {}", info.export);
    match &info.state {
        PluginState::Ready => println!("Status:      Ready"),
        PluginState::InitFailed { error } => {
            println!("Status:      Initialization failed ({})", error)
        }
        PluginState::RegistrationFailed { error } => {
            println!("Status:      Registration failed ({})", error)
        }
    }

    let bound: Vec<KindSummary> = manager
        .registry()
        .summary()
        .into_iter()
        .filter(|kind| kind.plugins.iter().any(|plugin| plugin == id))
        .collect();
    if !bound.is_empty() {
        println!();
        println!("Events:");
        for kind in bound {
            let count = kind.plugins.iter().filter(|plugin| *plugin == id).count();
            println!("  {} ({} handler(s))", kind.kind, count);
        }
    }

    Ok(())
}

fn show_events(config: &MurmurConfig, json: bool) -> Result<()> {
    let manager = start_plugins(config)?;
    let summary = manager.registry().summary();

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if summary.is_empty() {
        println!("No event handlers registered");
    } else {
        print!("{}", events_table(&summary));
    }

    Ok(())
}

fn plugin_line(info: &PluginInfo) -> String {
    let (status, detail) = match &info.state {
        PluginState::Ready => ("✓", String::new()),
        PluginState::InitFailed { error } => ("!", format!("    init failed: {}", error)),
        PluginState::RegistrationFailed { error } => {
            ("✗", format!("    registration failed: {}", error))
        }
    };
    format!("{} {} ({}){}", status, info.id, info.unit, detail)
}

fn events_table(summary: &[KindSummary]) -> String {
    let width = summary.iter().map(|kind| kind.kind.len()).max().unwrap_or(0);
    summary
        .iter()
        .map(|kind| {
            let marker = if kind.cancellable { "*" } else { " " };
            format!(
                "{:width$} {} {}\n",
                kind.kind,
                marker,
                kind.plugins.join(" -> "),
                width = width
            )
        })
        .collect()
}
