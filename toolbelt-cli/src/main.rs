// toolbelt-cli/src/main.rs
mod models;
mod selection;

use anyhow::{anyhow, Context, Result};
use colored::*;
use std::env;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use dialoguer::{theme::ColorfulTheme, Confirm, Input, Select};
use indicatif::{ProgressBar, ProgressStyle};

use toolbelt_core::{
    builtin_registry, ConfigDialog, Picker, Preselections, SelectedToolkit, Selection,
    ToggleOutcome, ToolInput, ToolbeltConfig, ToolkitId,
};

use crate::selection::{load_selection, save_selection};

use clap::Parser;
use tracing::{debug, error, info, warn, Level};
use tracing_subscriber::{
    fmt::{self, time::LocalTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

const CONFIG_FILENAME: &str = "Toolbelt.toml";
const LOG_FILE_NAME: &str = "toolbelt-app.log";

fn find_project_root() -> Result<PathBuf> {
    let current_dir = env::current_dir().context("Failed to get current directory")?;
    let mut current = current_dir.as_path();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() && config_path.is_file() {
            return Ok(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => {
                return Err(anyhow!(
                    "Could not find '{}' in current directory or any parent directory.",
                    CONFIG_FILENAME
                ));
            }
        }
    }
}

fn load_cli_config() -> Result<(ToolbeltConfig, PathBuf)> {
    let project_root = find_project_root()?;
    let config_path = project_root.join(CONFIG_FILENAME);
    info!("Found configuration file at: {:?}", config_path);
    let config_toml_content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read project config file: {:?}", config_path))?;
    let config = ToolbeltConfig::from_toml_str(&config_toml_content)
        .context("Failed to parse or validate configuration content")?;
    Ok((config, project_root))
}

fn print_welcome_message() {
    println!("\n{}", "Toolbelt - Toolkit Picker".cyan().bold());
    println!(
        "{}\n{}",
        "Search filters toolkits by name; an empty search shows everything.".dimmed(),
        "Type 'quit' (or 'exit') in the search to save and leave.".dimmed()
    );
    println!();
}

fn entry_label(id: ToolkitId, name: &str, description: &str, selection: &Selection) -> String {
    let marker = if selection.contains(id) {
        "✔".green().to_string()
    } else {
        " ".to_string()
    };
    format!("{} {} {}", marker, name.bold(), format!("- {}", description).dimmed())
}

/// Walk the toolkit's form, collecting a draft until it validates or the
/// user gives up. Returns None on cancel.
fn run_config_dialog(mut dialog: ConfigDialog) -> Result<Option<SelectedToolkit>> {
    let toolkit_name = dialog.toolkit().name.clone();
    println!("\n{}", format!("Configure {}", toolkit_name).bold());

    let Some(form) = dialog.form() else {
        // A configurable toolkit without a form leaves required fields
        // unfillable; refuse rather than submit something invalid.
        warn!(toolkit = %dialog.id(), "toolkit requires configuration but declares no form");
        eprintln!(
            "{} {} has required parameters but no configuration form.",
            "Error:".red(),
            toolkit_name
        );
        dialog.cancel();
        return Ok(None);
    };
    let fields = form.fields();

    loop {
        for field in &fields {
            if field.choices.is_empty() {
                let value: String = Input::with_theme(&ColorfulTheme::default())
                    .with_prompt(&field.label)
                    .allow_empty(true)
                    .interact_text()?;
                if value.trim().is_empty() {
                    dialog.clear_field(&field.name);
                } else {
                    dialog.set_field(&field.name, serde_json::json!(value.trim()));
                }
            } else {
                let Some(index) = Select::with_theme(&ColorfulTheme::default())
                    .with_prompt(&field.label)
                    .items(&field.choices)
                    .default(0)
                    .interact_opt()?
                else {
                    println!("{}", "Configuration cancelled.".dimmed());
                    dialog.cancel();
                    return Ok(None);
                };
                dialog.set_field(&field.name, serde_json::json!(field.choices[index]));
            }
        }

        if dialog.can_submit() {
            let selected = dialog
                .submit()
                .context("draft validated but submission failed")?;
            println!("{} {} enabled.", "✔".green(), toolkit_name.bold());
            return Ok(Some(selected));
        }

        // The draft stays as edited; show why and offer another pass.
        for issue in dialog.validation_issues() {
            eprintln!("  {} {}", "✘".red(), issue);
        }
        let retry = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Configuration is not valid yet. Keep editing?")
            .default(true)
            .interact()?;
        if !retry {
            dialog.cancel();
            return Ok(None);
        }
    }
}

fn apply_outcome(outcome: ToggleOutcome, selection: &mut Selection) -> Result<()> {
    match outcome {
        ToggleOutcome::Removed(id) => {
            selection.remove(id);
            println!("{} {} disabled.", "✔".yellow(), id);
        }
        ToggleOutcome::Added(toolkit) => {
            let name = toolkit.toolkit.name.clone();
            selection.add(toolkit);
            println!("{} {} enabled.", "✔".green(), name.bold());
        }
        ToggleOutcome::ConfigurationRequired(dialog) => {
            if let Some(selected) = run_config_dialog(dialog)? {
                selection.add(selected);
            }
        }
        ToggleOutcome::NotReady(id) => {
            println!("{}", format!("{} is still connecting...", id).dimmed());
        }
        ToggleOutcome::UnknownToolkit(id) => {
            warn!(toolkit = %id, "toggle requested for unregistered toolkit");
        }
    }
    Ok(())
}

/// The interactive picker loop: search, select, toggle.
fn run_interactive(
    mut picker: Picker,
    mut selection: Selection,
    project_root: &PathBuf,
) -> Result<()> {
    print_welcome_message();

    loop {
        let query: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Search toolkits")
            .allow_empty(true)
            .interact_text()?;
        let trimmed = query.trim();
        if trimmed.eq_ignore_ascii_case("quit") || trimmed.eq_ignore_ascii_case("exit") {
            break;
        }
        picker.set_query(trimmed);

        let entries = picker.filtered();
        if entries.is_empty() {
            println!("{}", "No toolkits match your search".dimmed());
            continue;
        }

        let labels: Vec<String> = entries
            .iter()
            .map(|(id, d)| entry_label(*id, &d.name, &d.description, &selection))
            .collect();

        let Some(index) = Select::with_theme(&ColorfulTheme::default())
            .with_prompt("Toggle a toolkit (Esc to search again)")
            .items(&labels)
            .default(0)
            .interact_opt()?
        else {
            continue;
        };

        let (id, _) = entries[index];
        let outcome = picker.toggle(id, &selection);
        apply_outcome(outcome, &mut selection)?;
    }

    save_selection(project_root, &selection)?;
    info!(selected = selection.len(), "saved selection on exit");
    println!("\n{}\n", "Selection saved. Exiting.".cyan());
    Ok(())
}

fn handle_list(picker: &mut Picker, selection: &Selection, filter: Option<String>) -> Result<()> {
    if let Some(filter) = filter {
        picker.set_query(filter);
    }
    let entries = picker.filtered();
    if entries.is_empty() {
        println!("{}", "No toolkits match your search".dimmed());
        return Ok(());
    }
    for (id, definition) in entries {
        println!(
            "{}  {}",
            entry_label(id, &definition.name, &definition.description, selection),
            if selection.contains(id) {
                match selection.get(id).map(|t| &t.parameters) {
                    Some(parameters) if parameters.as_object().is_some_and(|o| !o.is_empty()) => {
                        format!("{}", parameters).dimmed().to_string()
                    }
                    _ => String::new(),
                }
            } else {
                String::new()
            }
        );
    }
    Ok(())
}

fn handle_enable(picker: &Picker, selection: &mut Selection, id: &str) -> Result<()> {
    let id: ToolkitId = id
        .parse()
        .map_err(|e| anyhow!("{}. Known toolkits: image, filesystem", e))?;
    if selection.contains(id) {
        println!("{} is already enabled.", id);
        return Ok(());
    }
    apply_outcome(picker.toggle(id, selection), selection)
}

fn handle_disable(selection: &mut Selection, id: &str) -> Result<()> {
    let id: ToolkitId = id
        .parse()
        .map_err(|e| anyhow!("{}. Known toolkits: image, filesystem", e))?;
    if selection.remove(id) {
        println!("{} {} disabled.", "✔".yellow(), id);
    } else {
        println!("{} was not enabled.", id);
    }
    Ok(())
}

async fn handle_invoke(
    selection: &Selection,
    toolkit: &str,
    tool_name: &str,
    input: Option<String>,
) -> Result<()> {
    let id: ToolkitId = toolkit
        .parse()
        .map_err(|e| anyhow!("{}. Known toolkits: image, filesystem", e))?;
    let Some(selected) = selection.get(id) else {
        return Err(anyhow!(
            "Toolkit '{}' is not enabled. Enable it first with 'toolbelt enable {}'.",
            id,
            id
        ));
    };
    let Some(tool) = selected.toolkit.tools.get(tool_name) else {
        let mut available: Vec<&str> = selected.toolkit.tools.keys().map(String::as_str).collect();
        available.sort();
        return Err(anyhow!(
            "Toolkit '{}' has no tool named '{}'. Available: {}",
            id,
            tool_name,
            available.join(", ")
        ));
    };

    let input_value = match input {
        Some(raw) => serde_json::from_str(&raw).context("--input is not valid JSON")?,
        None => serde_json::Value::Null,
    };
    let tool_input = ToolInput::from_value(input_value)?;

    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")?
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "-"]),
    );
    pb.set_message(format!("Invoking {}...", tool_name));
    pb.enable_steady_tick(std::time::Duration::from_millis(100));

    let result = tool.invoke(&selected.parameters, tool_input).await;

    pb.finish_and_clear();

    match result {
        Ok(output) => {
            info!(toolkit = %id, tool = tool_name, "tool invocation succeeded");
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            error!(toolkit = %id, tool = tool_name, "tool invocation failed: {}", e);
            Err(e)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    colored::control::set_override(true);

    dotenvy::dotenv().ok();
    let cli = models::cli::Cli::parse();

    // --- Logging Setup ---
    let default_level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(default_level.into()));

    let log_dir = match dirs::cache_dir()
        .or_else(dirs::runtime_dir)
        .or_else(|| Some(env::temp_dir()))
        .map(|d| d.join("toolbelt"))
    {
        Some(dir) => dir,
        None => {
            eprintln!(
                "{}",
                "Error: Could not determine a suitable directory for log files.".red()
            );
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = fs::create_dir_all(&log_dir) {
        eprintln!(
            "{} Failed to create log directory {}: {}",
            "Error:".red(),
            log_dir.display(),
            e
        );
        return ExitCode::FAILURE;
    }
    let log_path = log_dir.join(LOG_FILE_NAME);

    let file_appender = tracing_appender::rolling::never(&log_dir, LOG_FILE_NAME);
    let (non_blocking_writer, _guard) = tracing_appender::non_blocking(file_appender);

    let time_format_desc = match time::format_description::parse(
        "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]",
    ) {
        Ok(desc) => desc,
        Err(e) => {
            eprintln!("Warning: Failed to parse time format, using default: {}", e);
            time::format_description::parse("[hour]:[minute]:[second]")
                .expect("Fallback time format failed")
        }
    };
    let local_timer = LocalTime::new(time_format_desc);

    let file_layer = fmt::layer()
        .with_writer(non_blocking_writer)
        .with_ansi(false)
        .with_target(true)
        .with_line_number(true)
        .with_timer(local_timer.clone());

    let stderr_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_timer(local_timer)
        .with_target(false)
        .with_level(true);

    if let Err(e) = tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
    {
        eprintln!("{} Failed to initialize logging: {}", "Error:".red(), e);
        return ExitCode::FAILURE;
    }
    colored::control::unset_override();

    info!(
        "Logging initialized. Level determined by RUST_LOG or -v flags (default: {}). Logging to stderr and {}",
        default_level,
        log_path.display()
    );
    // --- End Logging Setup ---

    // --- Load Config & Registry ---
    let (config, project_root) = match load_cli_config() {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            eprintln!(
                "{} Could not find or load '{}'. Ensure you are in a Toolbelt project directory.",
                "Error:".red(),
                CONFIG_FILENAME
            );
            return ExitCode::FAILURE;
        }
    };

    let registry = match builtin_registry(&config) {
        Ok(registry) => Arc::new(registry),
        Err(e) => {
            // A schema that cannot be built (e.g. an empty model catalog)
            // must stop the process, not register a permissive toolkit.
            error!("Failed to build toolkit registry: {}", e);
            eprintln!("{} Failed to build toolkit registry: {}", "Error:".red(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut selection = match load_selection(&project_root, &registry) {
        Ok(selection) => selection,
        Err(e) => {
            error!("Failed to load persisted selection: {}", e);
            eprintln!("{} Failed to load persisted selection: {}", "Error:".red(), e);
            return ExitCode::FAILURE;
        }
    };

    let mut picker = Picker::new(registry);

    // --- Pre-selections (shareable-link equivalent) ---
    if !cli.preselect.is_empty() {
        let mut pending = Preselections::new();
        for id in &cli.preselect {
            pending.mark(id.trim());
        }
        let additions = picker.apply_preselections(&mut pending, &selection);
        for toolkit in additions {
            debug!(toolkit = %toolkit.id, "pre-selected via flag");
            println!("{} {} pre-selected.", "✔".green(), toolkit.toolkit.name.bold());
            selection.add(toolkit);
        }
    }

    // --- Command Handling ---
    let result = match cli.command {
        Some(models::cli::Commands::List { filter }) => {
            handle_list(&mut picker, &selection, filter)
        }
        Some(models::cli::Commands::Enable { id }) => {
            handle_enable(&picker, &mut selection, &id)
                .and_then(|_| save_selection(&project_root, &selection))
        }
        Some(models::cli::Commands::Disable { id }) => handle_disable(&mut selection, &id)
            .and_then(|_| save_selection(&project_root, &selection)),
        Some(models::cli::Commands::Invoke {
            toolkit,
            tool,
            input,
        }) => handle_invoke(&selection, &toolkit, &tool, input).await,
        None => run_interactive(picker, selection, &project_root),
    };

    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Operation failed: {}", e);
            eprintln!("{} {}", "Error:".red(), e);
            ExitCode::FAILURE
        }
    }
}
