use std::fmt::Write as FmtWrite;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde_json::Value;
use tokio::sync::mpsc::UnboundedReceiver;

use destination_editor::{
    DestinationEditor, EditorContext, EditorError, EditorEvent, EditorOptions, EditorParams,
    PanelKey, SharedCollection, SubmitOutcome, TestConnectionOutcome,
    domain::{DestinationCatalog, presets},
    editor::{Notification, NotificationLevel},
    io::DocumentFormat,
    loader::{LoadState, load, load_destinations, load_sources},
    services::{
        ConnectionTestResult, ConnectivityCheck, FileStorage, Services, StaticConnectivityCheck,
        TcpConnectivityCheck,
    },
};

const LOG_ENV: &str = "DSTEDITOR_LOG";
const SKIPPED_PROBE: &str = "Connection test was skipped";

#[derive(Debug, Parser)]
#[command(
    name = "dsteditor",
    version,
    about = "Create, edit and check destination configurations"
)]
struct Cli {
    /// Directory holding one sub-directory of documents per project
    #[arg(long = "store", value_name = "DIR", global = true, default_value = ".dsteditor")]
    store: PathBuf,

    /// Project whose collections are read and written
    #[arg(long = "project", value_name = "ID", global = true, default_value = "default")]
    project: String,

    /// Document format of the store files
    #[arg(long = "format", value_name = "FORMAT", global = true, default_value = "json")]
    format: DocumentFormat,

    /// Log workflow details to stderr (overridden by DSTEDITOR_LOG)
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Connectivity probe timeout in milliseconds
    #[arg(long = "connect-timeout", value_name = "MS", global = true, default_value_t = 5000)]
    connect_timeout: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the destination types that can be created
    Types,
    /// List the configuration templates accepted by `save --preset`
    Presets,
    /// List stored destinations with their last connection check
    List,
    /// Create or update a destination
    Save(SaveArgs),
    /// Validate connection properties and probe the destination without saving
    Test(TargetArgs),
}

#[derive(Debug, Args)]
struct TargetArgs {
    /// Type of a new destination
    #[arg(long = "type", value_name = "TYPE", conflicts_with = "id", required_unless_present = "id")]
    kind: Option<String>,

    /// Id of an existing destination
    #[arg(long = "id", value_name = "ID")]
    id: Option<String>,

    /// Field assignment; VALUE is parsed as JSON and falls back to a string
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_assignment)]
    assignments: Vec<(String, Value)>,
}

#[derive(Debug, Args)]
struct SaveArgs {
    #[command(flatten)]
    target: TargetArgs,

    /// Configuration template applied before the field assignments
    #[arg(long = "preset", value_name = "PRESET")]
    preset: Option<String>,

    /// Save without probing the destination; the check is recorded as failed
    #[arg(long = "skip-probe")]
    skip_probe: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    setup_tracing(cli.verbose);

    let catalog = Arc::new(DestinationCatalog::builtin());
    match &cli.command {
        Command::Types => {
            for reference in catalog.iter() {
                println!("{}\t{}", reference.id, reference.display_name);
            }
            Ok(())
        }
        Command::Presets => {
            for preset in presets() {
                let table = preset.table_name.unwrap_or("-");
                println!("{}\t{}\t{table}", preset.id, preset.display_name);
            }
            Ok(())
        }
        Command::List => list(&cli).await,
        Command::Save(args) => save(&cli, catalog, args).await,
        Command::Test(args) => test(&cli, catalog, args).await,
    }
}

fn setup_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("destination_editor=debug,dsteditor=debug")
        } else {
            EnvFilter::new("destination_editor=info")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn storage(cli: &Cli) -> FileStorage {
    FileStorage::new(&cli.store).with_format(cli.format)
}

async fn list(cli: &Cli) -> Result<()> {
    let destinations = load_destinations(&storage(cli), &cli.project)
        .await
        .wrap_err("failed to load destinations")?;
    if destinations.is_empty() {
        println!("no destinations in project {}", cli.project);
    }
    for destination in destinations {
        let check = if destination.connection_test_ok {
            "connected".to_string()
        } else {
            format!(
                "failed: {}",
                destination.connection_error_message.as_deref().unwrap_or("-")
            )
        };
        println!("{}\t{}\t{check}", destination.id, destination.kind);
    }
    Ok(())
}

async fn save(cli: &Cli, catalog: Arc<DestinationCatalog>, args: &SaveArgs) -> Result<()> {
    let connectivity: Arc<dyn ConnectivityCheck> = if args.skip_probe {
        Arc::new(StaticConnectivityCheck::new(ConnectionTestResult::failed(
            SKIPPED_PROBE,
        )))
    } else {
        probe(cli, &catalog)
    };
    let (mut editor, mut events) = open_editor(cli, catalog, &args.target, connectivity).await?;

    if let Some(preset) = args.preset.as_deref() {
        editor
            .apply_preset(preset)
            .wrap_err_with(|| format!("cannot apply preset '{preset}'"))?;
    }
    apply_assignments(&mut editor, &args.target.assignments)?;

    let outcome = editor.submit().await;
    print_events(&mut events);
    match outcome {
        SubmitOutcome::Saved { .. } => {
            println!("saved {}", editor.draft().id);
            Ok(())
        }
        SubmitOutcome::ValidationFailed { panels } => Err(eyre!(
            "destination has invalid panels:\n{}",
            error_report(&editor, panels.iter().map(|(key, _)| *key))
        )),
        SubmitOutcome::Failed { message, .. } => {
            Err(eyre!("destination was not saved: {message}"))
        }
    }
}

async fn test(cli: &Cli, catalog: Arc<DestinationCatalog>, args: &TargetArgs) -> Result<()> {
    let connectivity = probe(cli, &catalog);
    let (mut editor, mut events) = open_editor(cli, catalog, args, connectivity).await?;
    apply_assignments(&mut editor, &args.assignments)?;

    let outcome = editor.test_connection().await;
    print_events(&mut events);
    match outcome {
        TestConnectionOutcome::Connected => Ok(()),
        TestConnectionOutcome::InvalidProperties { .. } => Err(eyre!(
            "connection properties are invalid:\n{}",
            error_report(&editor, [PanelKey::Config])
        )),
        TestConnectionOutcome::Failed { message } => {
            Err(eyre!("connection test failed: {message}"))
        }
    }
}

fn probe(cli: &Cli, catalog: &Arc<DestinationCatalog>) -> Arc<dyn ConnectivityCheck> {
    Arc::new(
        TcpConnectivityCheck::new(Arc::clone(catalog))
            .with_timeout(Duration::from_millis(cli.connect_timeout)),
    )
}

async fn open_editor(
    cli: &Cli,
    catalog: Arc<DestinationCatalog>,
    target: &TargetArgs,
    connectivity: Arc<dyn ConnectivityCheck>,
) -> Result<(DestinationEditor, UnboundedReceiver<EditorEvent>)> {
    let storage = Arc::new(storage(cli));
    let destinations = load_destinations(storage.as_ref(), &cli.project)
        .await
        .wrap_err("failed to load destinations")?;
    // linked sources are optional; the editor shows the load error instead
    let (sources, sources_error) = match load(load_sources(storage.as_ref(), &cli.project)).await
    {
        LoadState::Loaded(sources) => (sources, None),
        state => (Vec::new(), state.error().map(str::to_string)),
    };
    if let Some(error) = &sources_error {
        tracing::warn!(%error, "linked sources are unavailable");
    }

    let services = Services::new(storage, connectivity, cli.project.clone());
    let context = EditorContext::new(services, catalog)
        .with_destinations(SharedCollection::new(destinations))
        .with_sources(SharedCollection::new(sources))
        .with_sources_error(sources_error);
    let params = EditorParams {
        kind: target.kind.clone(),
        id: target.id.clone(),
        tab_name: None,
    };
    let options = EditorOptions::default().with_confirm_leave(false);
    let mut editor = DestinationEditor::new(context, params, options)?;
    let events = editor
        .events()
        .ok_or_else(|| eyre!("editor events are already taken"))?;
    Ok((editor, events))
}

/// Names without a panel of their own are tried as connection properties, so
/// `--set pghost=...` works like `--set _formData.pghost=...`.
fn apply_assignments(editor: &mut DestinationEditor, assignments: &[(String, Value)]) -> Result<()> {
    for (name, value) in assignments {
        let result = match editor.edit_field_by_name(name, value.clone()) {
            Err(EditorError::UnknownField(_)) if !name.starts_with('_') => {
                editor.edit_field_by_name(&format!("_formData.{name}"), value.clone())
            }
            other => other,
        };
        result.wrap_err_with(|| format!("cannot set {name}"))?;
    }
    Ok(())
}

fn print_events(events: &mut UnboundedReceiver<EditorEvent>) {
    while let Ok(event) = events.try_recv() {
        if let EditorEvent::Notify(notification) = event {
            println!("{}", render_notification(&notification));
        }
    }
}

fn render_notification(notification: &Notification) -> String {
    let level = match notification.level {
        NotificationLevel::Success => "ok",
        NotificationLevel::Info => "info",
        NotificationLevel::Warning => "warning",
        NotificationLevel::Error => "error",
    };
    format!("[{level}] {}", notification.message)
}

fn error_report(editor: &DestinationEditor, keys: impl IntoIterator<Item = PanelKey>) -> String {
    let mut body = String::new();
    for key in keys {
        let Some(panel) = editor.panel(key) else {
            continue;
        };
        let Some(form) = panel.form.as_ref() else {
            continue;
        };
        for field in form.fields().iter().filter(|field| field.has_error()) {
            let _ = writeln!(
                body,
                "  {} / {}: {}",
                panel.name,
                field.schema.display_label(),
                field.errors.join("; ")
            );
        }
    }
    body
}

fn parse_assignment(raw: &str) -> std::result::Result<(String, Value), String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("missing field name in '{raw}'"));
    }
    let value = serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
    Ok((name.to_string(), value))
}
