use super::ui::Spinner;
use crate::context::AppContext;
use crate::output::{new_table, Output};
use crate::{HistoryCommands, WatchlistCommands};
use cinelog_core::{format_date, load_movie_detail, load_tv_detail};
use cinelog_models::{MediaKey, MediaType};
use cinelog_tmdb::{get_movies_by_id_settled, get_tv_shows_by_id_settled, TmdbClient};
use color_eyre::Result;
use serde_json::json;
use std::collections::HashMap;

const ADDED_PATTERN: &str = "MMM dd, yyyy";
const WATCHED_PATTERN: &str = "MMM dd, yyyy HH:mm";

pub async fn run_watchlist(ctx: &AppContext, cmd: WatchlistCommands, output: &Output) -> Result<()> {
    match cmd {
        WatchlistCommands::List => list_watchlist(ctx, output).await,
        WatchlistCommands::Add { media_type, id } => add_to_watchlist(ctx, media_type, id, output).await,
        WatchlistCommands::Remove { media_type, id } => {
            let store = ctx.user_store()?;
            if store.remove_from_watchlist(id, media_type) {
                output.success(format!("Removed {} {} from your watchlist", media_type, id));
            } else {
                output.info(format!("{} {} is not in your watchlist", media_type, id));
            }
            Ok(())
        }
        WatchlistCommands::Clear => {
            let store = ctx.user_store()?;
            let count = store.watchlist().len();
            store.clear_watchlist();
            output.success(format!("Cleared {} watchlist item(s)", count));
            Ok(())
        }
    }
}

pub async fn run_history(ctx: &AppContext, cmd: HistoryCommands, output: &Output) -> Result<()> {
    match cmd {
        HistoryCommands::List { limit } => list_history(ctx, limit, output).await,
        HistoryCommands::Clear => {
            let store = ctx.user_store()?;
            let count = store.watch_history().len();
            store.clear_watch_history();
            output.success(format!("Cleared {} history entries", count));
            Ok(())
        }
    }
}

/// Look up display titles for stored keys. Missing or failed lookups are
/// simply left out; the listing still shows the raw ids.
async fn resolve_titles(ctx: &AppContext, keys: &[MediaKey], output: &Output) -> HashMap<MediaKey, String> {
    let catalog = match ctx.catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::debug!(operation = "resolve_titles", error = %e, "Skipping title lookup");
            return HashMap::new();
        }
    };
    if keys.is_empty() {
        return HashMap::new();
    }

    let spinner = Spinner::start("Looking up titles...", output);
    let titles = fetch_titles(&catalog, keys).await;
    spinner.finish();
    titles
}

async fn fetch_titles(catalog: &TmdbClient, keys: &[MediaKey]) -> HashMap<MediaKey, String> {
    let movie_ids: Vec<u32> = keys.iter().filter(|k| k.media_type == MediaType::Movie).map(|k| k.media_id).collect();
    let tv_ids: Vec<u32> = keys.iter().filter(|k| k.media_type == MediaType::Tv).map(|k| k.media_id).collect();

    let (movies, shows) = tokio::join!(
        get_movies_by_id_settled(catalog, &movie_ids),
        get_tv_shows_by_id_settled(catalog, &tv_ids)
    );

    let mut titles = HashMap::new();
    for (id, result) in movies {
        match result {
            Ok(movie) => {
                titles.insert(MediaKey::movie(id), movie.title);
            }
            Err(e) => tracing::warn!(operation = "resolve_titles", id, error = %e, "Movie lookup failed"),
        }
    }
    for (id, result) in shows {
        match result {
            Ok(show) => {
                titles.insert(MediaKey::tv(id), show.name);
            }
            Err(e) => tracing::warn!(operation = "resolve_titles", id, error = %e, "TV lookup failed"),
        }
    }
    titles
}

async fn list_watchlist(ctx: &AppContext, output: &Output) -> Result<()> {
    let store = ctx.user_store()?;
    let items = store.watchlist();

    if !output.is_human() {
        output.json(&json!({ "watchlist": items }));
        return Ok(());
    }

    if items.is_empty() {
        output.info("Your watchlist is empty. Add titles with 'cinelog watchlist add <movie|tv> <id>'");
        return Ok(());
    }

    let keys: Vec<MediaKey> = items.iter().map(|item| item.key()).collect();
    let titles = resolve_titles(ctx, &keys, output).await;

    let mut table = new_table(["Type", "ID", "Title", "Added"]);
    for item in &items {
        table.add_row(vec![
            item.media_type.to_string(),
            item.media_id.to_string(),
            titles.get(&item.key()).cloned().unwrap_or_else(|| "-".to_string()),
            format_date(Some(&item.added_at.to_rfc3339()), ADDED_PATTERN),
        ]);
    }
    output.table(&table);
    Ok(())
}

async fn add_to_watchlist(ctx: &AppContext, media_type: MediaType, id: u32, output: &Output) -> Result<()> {
    // Validate the id when we can reach the catalog; offline adds are still allowed
    match ctx.catalog() {
        Ok(catalog) => {
            let found = match media_type {
                MediaType::Movie => load_movie_detail(&catalog, id).await.map(|d| d.found().map(|m| m.title)),
                MediaType::Tv => load_tv_detail(&catalog, id).await.map(|d| d.found().map(|s| s.name)),
            };
            match found {
                Ok(Some(title)) => tracing::debug!(operation = "watchlist_add", id, title = %title, "Title verified"),
                Ok(None) => {
                    output.error(format!("{} {} not found, nothing added", media_type, id));
                    return Ok(());
                }
                Err(e) => output.warn(format!("Could not verify {} {}: {}", media_type, id, e)),
            }
        }
        Err(_) => output.warn("No API key configured, adding without verifying the id"),
    }

    let store = ctx.user_store()?;
    if store.add_to_watchlist(id, media_type) {
        output.success(format!("Added {} {} to your watchlist", media_type, id));
    } else {
        output.info(format!("{} {} is already in your watchlist", media_type, id));
    }
    Ok(())
}

async fn list_history(ctx: &AppContext, limit: Option<usize>, output: &Output) -> Result<()> {
    let store = ctx.user_store()?;
    let mut history = store.watch_history();
    if let Some(limit) = limit {
        history.truncate(limit);
    }

    if !output.is_human() {
        output.json(&json!({ "watch_history": history }));
        return Ok(());
    }

    if history.is_empty() {
        output.info("No watch history yet");
        return Ok(());
    }

    let keys: Vec<MediaKey> = history.iter().map(|item| item.key()).collect();
    let titles = resolve_titles(ctx, &keys, output).await;

    let mut table = new_table(["Type", "ID", "Title", "Watched", "Progress"]);
    for (item, key) in history.iter().zip(&keys) {
        table.add_row(vec![
            item.media_type.to_string(),
            item.media_id.to_string(),
            titles.get(key).cloned().unwrap_or_else(|| "-".to_string()),
            format_date(Some(&item.watched_at.to_rfc3339()), WATCHED_PATTERN),
            format!("{:.0}%", item.progress),
        ]);
    }
    output.table(&table);
    Ok(())
}
