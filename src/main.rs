// conbuddy: browse, filter and like tabletop.events convention events.
// Parses the CLI, wires the store, client and session, and runs one command.

mod app;
mod cache;
mod catalog;
mod config;
mod daytime;
mod error;
mod filter;
mod tte;
mod ui;

use std::collections::BTreeSet;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use cache::{LikedEvents, LocalStore};
use catalog::{CacheReconciler, EventTypeIndex};
use config::{Config, GlobalArgs};
use error::{BuddyError, Result};
use filter::{FilterSpec, LikedState};
use tte::{Convention, TteClient};

#[derive(Parser, Debug)]
#[command(name = "conbuddy", version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a session and remember it for later runs
    Login {
        username: String,

        #[arg(long, env = "TTE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// List conventions
    Conventions {
        /// Ignore the cached copy
        #[arg(short, long)]
        refresh: bool,
    },
    /// Count a convention's events per event type
    Types {
        /// Convention id, view URI or name
        convention: String,

        #[arg(short, long)]
        refresh: bool,
    },
    /// Filter, sort and browse a convention's events
    Events {
        /// Convention id, view URI or name
        convention: String,

        #[arg(short, long)]
        refresh: bool,

        /// Name contains (case-insensitive)
        #[arg(long)]
        name: Option<String>,

        /// Event id equals (case-insensitive)
        #[arg(long)]
        id: Option<String>,

        /// Description or long description contains
        #[arg(long)]
        description: Option<String>,

        /// Hosting group contains
        #[arg(long)]
        host: Option<String>,

        /// Event type name (repeatable)
        #[arg(long = "type", value_name = "NAME")]
        type_names: Vec<String>,

        #[arg(long, value_enum, default_value_t = LikedState::Either)]
        liked: LikedState,

        /// Print the matching events instead of opening the browser
        #[arg(short, long)]
        print: bool,
    },
    /// Print links to liked events
    Likes {
        /// Convention id, view URI or name
        convention: String,

        /// Also open each link in the browser
        #[arg(short, long = "open")]
        open_browser: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match Config::from_args(&cli.global) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli.command, &config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Commands, config: &Config) -> Result<()> {
    let store = config.store();
    let api_key = config::resolve_api_key(&store, config.api_key.as_deref())?;
    let client = TteClient::new(&config.base_url, &api_key, config.timeout)?;
    tracing::debug!(cache_dir = %store.root().display(), base_url = %config.base_url, "configured");

    if let Commands::Login { username, password } = &command {
        let session = tte::create_session(&client, &store, username, password).await?;
        println!("logged in as {username} (user {})", session.user_id);
        return Ok(());
    }

    let session = tte::restore_session(&client, &store).await?;
    let reconciler = CacheReconciler::new(&client, &store, &session);

    match command {
        Commands::Login { .. } => Ok(()),
        Commands::Conventions { refresh } => list_conventions(&reconciler, refresh).await,
        Commands::Types {
            convention,
            refresh,
        } => {
            let con = resolve_convention(&reconciler, &convention, refresh).await?;
            list_types(&reconciler, &con, refresh).await
        }
        Commands::Events {
            convention,
            refresh,
            name,
            id,
            description,
            host,
            type_names,
            liked,
            print,
        } => {
            let con = resolve_convention(&reconciler, &convention, refresh).await?;
            let spec = FilterSpec {
                name,
                id,
                description,
                hosting_group: host,
                types: BTreeSet::new(),
                liked,
            };
            browse_events(&reconciler, &store, con, spec, &type_names, refresh, print).await
        }
        Commands::Likes {
            convention,
            open_browser,
        } => {
            let con = resolve_convention(&reconciler, &convention, false).await?;
            let likes = LikedEvents::load(&store, &con.view_uri)?;
            if likes.is_empty() {
                println!("no liked events for {}", con.name);
                return Ok(());
            }
            for uri in likes.iter() {
                let url = ui::list::event_url(uri);
                println!("{url}");
                if open_browser {
                    tracing::info!(url = %url, "opening");
                    if open::that(&url).is_err() {
                        tracing::warn!(url = %url, "could not open browser");
                    }
                }
            }
            Ok(())
        }
    }
}

async fn list_conventions(reconciler: &CacheReconciler<'_, TteClient>, refresh: bool) -> Result<()> {
    let fetched = reconciler.conventions(refresh).await?;
    tracing::info!(
        count = fetched.items.len(),
        cached = fetched.used_cache(),
        source = %fetched.source,
        "conventions loaded"
    );
    for con in &fetched.items {
        println!(
            "{:<38} {} - {}  {}  {}",
            con.id,
            con.start_date,
            con.end_date,
            con.name,
            ui::list::event_url(&con.view_uri)
        );
    }
    Ok(())
}

async fn list_types(
    reconciler: &CacheReconciler<'_, TteClient>,
    con: &Convention,
    refresh: bool,
) -> Result<()> {
    let events = reconciler.events(con, refresh).await?;
    let mut index = EventTypeIndex::new(refresh);
    let summary = index.summarize(reconciler, &events.items).await;
    tracing::info!(event_type_count = summary.counts.len(), "found");
    for line in summary.lines() {
        println!("{line}");
    }
    Ok(())
}

async fn browse_events(
    reconciler: &CacheReconciler<'_, TteClient>,
    store: &LocalStore,
    con: Convention,
    mut spec: FilterSpec,
    type_names: &[String],
    refresh: bool,
    print: bool,
) -> Result<()> {
    let fetched = reconciler.events(&con, refresh).await?;
    let total = fetched.items.len();
    tracing::info!(
        event_count = total,
        cached = fetched.used_cache(),
        source = %fetched.source,
        "found"
    );

    let mut index = EventTypeIndex::new(refresh);
    index.summarize(reconciler, &fetched.items).await;
    for name in type_names {
        let uris = index.uris_named(name);
        if uris.is_empty() {
            tracing::warn!(event_type = %name, "no events have this type");
        }
        spec.types.extend(uris);
    }

    let likes = LikedEvents::load(store, &con.view_uri)?;
    // Type names that resolve to no URI match no events.
    let mut events = if !type_names.is_empty() && spec.types.is_empty() {
        Vec::new()
    } else {
        let predicates = spec.predicates(&likes);
        filter::filter(fetched.items, &predicates)
    };
    daytime::sort_events(&mut events);
    tracing::info!(filtered = events.len(), total, "filtered events");

    if print {
        let width = crossterm::terminal::size()
            .map(|(w, _)| w as usize)
            .unwrap_or(80)
            .saturating_sub(14)
            .max(20);
        for event in &events {
            let type_name = index.name_of(&event.relationships.kind);
            println!(
                "{}",
                ui::list::format_event_block(event, type_name, likes.contains(&event.view_uri), width)
            );
        }
        return Ok(());
    }

    let view_uri = con.view_uri.clone();
    let mut app = App::new(
        con,
        events,
        total,
        index.names_by_uri(),
        likes,
        fetched.source.to_string(),
    );

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();
    result?;

    if app.likes_changed {
        app.likes.save(store, &view_uri)?;
        tracing::info!(liked = app.likes.len(), "likes saved");
    }
    Ok(())
}

async fn resolve_convention(
    reconciler: &CacheReconciler<'_, TteClient>,
    query: &str,
    refresh: bool,
) -> Result<Convention> {
    let conventions = reconciler.conventions(refresh).await?;
    find_convention(conventions.items, query)
}

/// Match by id, then view URI, then case-insensitive name.
fn find_convention(mut conventions: Vec<Convention>, query: &str) -> Result<Convention> {
    let query = query.trim();
    let by_id = conventions.iter().position(|c| c.id == query);
    let by_uri = || conventions.iter().position(|c| c.view_uri == query);
    let by_name = || {
        conventions
            .iter()
            .position(|c| c.name.to_lowercase() == query.to_lowercase())
    };

    match by_id.or_else(by_uri).or_else(by_name) {
        Some(i) => Ok(conventions.swap_remove(i)),
        None => Err(BuddyError::UnknownConvention(query.to_string())),
    }
}
