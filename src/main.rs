use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, Level};

use medwriter::{
    analyze, Analyzer, ChangeMonitor, ContentChanged, DraftStore, Gating, JsonFileStore,
    MonitorConfig, Panel, Presenter, Profile, RuleTable, Settings, SettingsStore, SharedText,
    TextPresenter,
};

#[derive(Parser, Debug)]
#[command(name = "medwriter")]
#[command(about = "Style suggestions for medical school application essays")]
#[command(version)]
struct Args {
    /// Settings and draft store file
    #[arg(long, global = true, default_value = medwriter::settings::DEFAULT_STORE_FILE)]
    store: PathBuf,

    /// Log level for the JSON log written to stderr
    #[arg(long, global = true, default_value = "warn")]
    log_level: Level,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scan a file once and print suggestions
    Check {
        /// Text file to scan
        file: PathBuf,

        /// Suppress near-duplicate matches the way the live editor does
        #[arg(long)]
        live: bool,

        /// Ignore the stored category toggles
        #[arg(long)]
        all_categories: bool,

        /// Print suggestions as JSON
        #[arg(long)]
        json: bool,

        /// Group cards by category
        #[arg(long)]
        grouped: bool,
    },
    /// Show or change the category toggles
    Settings {
        #[command(subcommand)]
        action: SettingsAction,
    },
    /// Live-typing session: each stdin line is appended to the draft
    Session {
        /// Group cards by category
        #[arg(long)]
        grouped: bool,
    },
}

#[derive(Subcommand, Debug)]
enum SettingsAction {
    /// Print the active settings as JSON
    Show,
    /// Write default settings unless settings already exist
    Install,
    /// Change one or more toggles
    Set {
        #[arg(long)]
        wordiness: Option<bool>,
        #[arg(long)]
        medical_terms: Option<bool>,
        #[arg(long)]
        cliches: Option<bool>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(args.log_level)
        .with_writer(std::io::stderr)
        .json()
        .init();

    info!(?args, "Parsed CLI arguments");

    let store = JsonFileStore::new(&args.store);
    match args.command {
        Command::Check { file, live, all_categories, json, grouped } => {
            check(&store, file, live, all_categories, json, grouped).await
        }
        Command::Settings { action } => settings(&store, action).await,
        Command::Session { grouped } => session(store, grouped).await,
    }
}

async fn check(
    store: &JsonFileStore,
    file: PathBuf,
    live: bool,
    all_categories: bool,
    json: bool,
    grouped: bool,
) -> Result<()> {
    let text = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let table = RuleTable::builtin()?;
    let mut profile = if live { Profile::live_typing() } else { Profile::document() };
    if all_categories {
        profile = profile.with_gating(Gating::AllCategories);
    }
    let settings = store.get().await;

    let suggestions = analyze(&text, &table, &settings, profile);
    info!("Found {} suggestions in {}", suggestions.len(), file.display());

    if json {
        println!("{}", serde_json::to_string_pretty(&suggestions)?);
    } else {
        TextPresenter::stdout()
            .grouped(grouped)
            .render(Panel::from_suggestions(&suggestions))?;
    }
    Ok(())
}

async fn settings(store: &JsonFileStore, action: SettingsAction) -> Result<()> {
    let active = match action {
        SettingsAction::Show => store.get().await,
        SettingsAction::Install => store.install().await?,
        SettingsAction::Set { wordiness, medical_terms, cliches } => {
            let current = store.get().await;
            let updated = Settings {
                wordiness: wordiness.unwrap_or(current.wordiness),
                medical_terms: medical_terms.unwrap_or(current.medical_terms),
                cliches: cliches.unwrap_or(current.cliches),
            };
            store.set(updated).await;
            store.get().await
        }
    };

    println!("{}", serde_json::to_string_pretty(&active)?);
    Ok(())
}

async fn session(store: JsonFileStore, grouped: bool) -> Result<()> {
    let table = Arc::new(RuleTable::builtin()?);
    let settings = store.get().await;

    // The textarea is always loaded; without a draft it starts empty
    let source = SharedText::loaded(store.load_draft().await.unwrap_or_default());

    let presenter = TextPresenter::stdout().grouped(grouped).with_stats(true);
    let monitor = ChangeMonitor::new(
        source.clone(),
        presenter,
        store,
        Analyzer::new(table, Profile::live_typing()),
    )
    .with_settings(settings)
    .with_config(MonitorConfig::live_typing());

    let (changes, signals) = mpsc::unbounded_channel();
    let typing = async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await? {
            source.push_line(&line);
            // The monitor only stops listening once this sender is dropped
            let _ = changes.send(ContentChanged);
        }
        Ok::<_, anyhow::Error>(())
    };

    let (stats, typed) = tokio::join!(monitor.run(signals, None), typing);
    typed.context("Failed to read from stdin")?;

    info!(?stats, "Session ended");
    Ok(())
}
