//! ookstats CLI - Player search from the terminal

mod cli;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use ookstats_app::{
    ActiveElement, Key, KeyPress, PlayerSearchService, QueryController, RecordingNavigator,
    SearchConfig, UiEvent,
};
use ookstats_client::{DirShardSource, HttpShardSource, ShardFetcher, ShardSource};
use ookstats_search::{AutocompleteRequest, SearchOptions};
use ookstats_store::{CacheStatus, FileStorage, PlayerCache};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::cli::{CacheAction, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("ookstats=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    match &cli.command {
        Commands::Search { query, limit, json } => {
            search(&cli, &config, query, *limit, *json).await?
        }
        Commands::Autocomplete {
            query,
            region,
            realm,
            class,
        } => {
            let mut request = AutocompleteRequest::new(query.as_str());
            request.region = *region;
            request.realm_slug = realm.clone();
            request.class_name = class.clone();
            autocomplete(&cli, &config, &request).await?
        }
        Commands::Cache { action } => cache(&config, action).await?,
        Commands::Interactive => interactive(&cli, &config).await?,
    }

    Ok(())
}

/// Environment first, then flags on top
fn resolve_config(cli: &Cli) -> Result<SearchConfig> {
    let mut config = SearchConfig::from_env()?;
    if let Some(url) = &cli.base_url {
        config.base_url = url.clone();
    }
    if let Some(dir) = &cli.cache_dir {
        config.cache_dir = dir.clone();
    }
    Ok(config)
}

fn player_cache(config: &SearchConfig) -> PlayerCache {
    PlayerCache::new(Arc::new(FileStorage::new(&config.cache_dir)))
}

fn build_service(cli: &Cli, config: &SearchConfig) -> Result<Arc<PlayerSearchService>> {
    let source: Arc<dyn ShardSource> = match &cli.shards_dir {
        Some(dir) => Arc::new(DirShardSource::new(dir)),
        None => Arc::new(HttpShardSource::with_timeouts(
            &config.base_url,
            config.connect_timeout,
            config.request_timeout,
        )?),
    };
    let fetcher = ShardFetcher::new(source).with_default_limit(config.shard_limit);
    let service = PlayerSearchService::new(player_cache(config), fetcher, SearchOptions::default())?;
    Ok(Arc::new(service))
}

async fn search(cli: &Cli, config: &SearchConfig, query: &str, limit: usize, json: bool) -> Result<()> {
    let service = build_service(cli, config)?;
    service.load().await;

    let Some(snapshot) = service.snapshot() else {
        anyhow::bail!("player index could not be loaded");
    };
    let matches = snapshot.search_with_limit(query, limit);

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }

    if matches.is_empty() {
        println!("No players found");
    }
    for (idx, hit) in matches.iter().enumerate() {
        println!(
            "{:>2}. {} [{}] {}  relevance {:.2}  {}",
            idx + 1,
            hit.record.name,
            hit.record.region.badge(),
            hit.record.realm_name,
            hit.relevance(),
            hit.record.profile_path()
        );
    }
    Ok(())
}

async fn autocomplete(cli: &Cli, config: &SearchConfig, request: &AutocompleteRequest) -> Result<()> {
    let service = build_service(cli, config)?;
    service.load().await;

    for choice in service.autocomplete(request).await {
        println!("{}", choice.name);
    }
    Ok(())
}

async fn cache(config: &SearchConfig, action: &CacheAction) -> Result<()> {
    let cache = player_cache(config);

    match action {
        CacheAction::Status => match cache.inspect().await? {
            CacheStatus::Missing => println!("No cached player list"),
            CacheStatus::Fresh { players, age } => {
                println!("Fresh: {} players, cached {} minutes ago", players, age.num_minutes())
            }
            CacheStatus::Stale { players, age } => {
                println!("Stale: {} players, cached {} hours ago", players, age.num_hours())
            }
            CacheStatus::Corrupt => println!("Corrupt entry; it will be discarded on next load"),
        },
        CacheAction::Clear => {
            cache.clear().await?;
            println!("Cleared {}", config.cache_dir.display());
        }
    }
    Ok(())
}

async fn interactive(cli: &Cli, config: &SearchConfig) -> Result<()> {
    let service = build_service(cli, config)?;
    let navigator = RecordingNavigator::new();
    let controller = QueryController::new(service, Box::new(navigator.clone()), config);
    let views = controller.subscribe_views();

    let (events, rx) = mpsc::channel(32);
    let task = tokio::spawn(controller.run(rx));
    let settle = config.debounce + Duration::from_millis(50);

    info!("Type to search; :quit to exit");
    events.send(UiEvent::Focus).await?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut navigated = 0;

    while let Some(line) = lines.next_line().await? {
        let Some(event) = parse_line(&line) else {
            break;
        };
        events.send(event).await?;
        tokio::time::sleep(settle).await;

        println!("{}", views.borrow().to_text());
        let paths = navigator.paths();
        for path in &paths[navigated..] {
            println!("-> {}", path);
        }
        navigated = paths.len();
    }

    drop(events);
    task.await?;
    Ok(())
}

/// Map one terminal line to a UI event; `None` ends the session
fn parse_line(line: &str) -> Option<UiEvent> {
    let Some(command) = line.strip_prefix(':') else {
        return Some(UiEvent::Input(line.to_string()));
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let index = parts.next().and_then(|n| n.parse().ok()).unwrap_or(0);

    let event = match name {
        "down" => UiEvent::Key(KeyPress::new(Key::ArrowDown)),
        "up" => UiEvent::Key(KeyPress::new(Key::ArrowUp)),
        "tab" => UiEvent::Key(KeyPress::new(Key::Tab)),
        "stab" => UiEvent::Key(KeyPress::new(Key::Tab).with_shift()),
        "enter" => UiEvent::Key(KeyPress::new(Key::Enter)),
        "esc" => UiEvent::Key(KeyPress::new(Key::Escape)),
        "clear" => UiEvent::ClearClicked,
        "focus" => UiEvent::Focus,
        "slash" => UiEvent::GlobalKey {
            key: KeyPress::new(Key::Char('/')),
            active: ActiveElement::Other,
        },
        "hover" => UiEvent::Hover(index),
        "click" => UiEvent::Click(index),
        "quit" | "q" => return None,
        _ => UiEvent::Input(line.to_string()),
    };
    Some(event)
}
