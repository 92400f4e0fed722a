use super::ui::Spinner;
use crate::context::AppContext;
use crate::output::Output;
use crate::WatchCommands;
use cinelog_core::{load_episode, load_movie_detail, ConsumerScope, Detail, TrackerSettings, WatchSession};
use cinelog_models::{CurrentMedia, MediaType};
use cinelog_tmdb::TmdbError;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;
use std::time::Duration;

struct Request {
    media_type: MediaType,
    id: u32,
    season: u32,
    episode: u32,
    duration: Option<Duration>,
}

impl From<WatchCommands> for Request {
    fn from(cmd: WatchCommands) -> Self {
        match cmd {
            WatchCommands::Movie { id, duration } => Request {
                media_type: MediaType::Movie,
                id,
                season: 0,
                episode: 0,
                duration: duration.map(Duration::from_secs),
            },
            WatchCommands::Tv { id, season, episode, duration } => Request {
                media_type: MediaType::Tv,
                id,
                season,
                episode,
                duration: duration.map(Duration::from_secs),
            },
        }
    }
}

impl Request {
    fn fallback_media(&self) -> CurrentMedia {
        match self.media_type {
            MediaType::Movie => CurrentMedia::movie(self.id, format!("Movie {}", self.id)),
            MediaType::Tv => CurrentMedia::episode(
                self.id,
                format!("Show {} S{}E{}", self.id, self.season, self.episode),
                self.season,
                self.episode,
            ),
        }
    }
}

enum Lookup {
    Found(CurrentMedia),
    NotFound,
    Failed(TmdbError),
}

pub async fn run_watch(ctx: &AppContext, cmd: WatchCommands, output: &Output) -> Result<()> {
    let request = Request::from(cmd);
    let store = ctx.user_store()?;
    let ui = ctx.ui_store();

    // The lookup is owned by this scope; Ctrl-C while it runs drops the scope
    // and abandons the request.
    let scope = ConsumerScope::new();
    let media = match ctx.catalog() {
        Ok(catalog) => {
            let (media_type, id, season, episode) = (request.media_type, request.id, request.season, request.episode);
            let lookup = scope.spawn(async move {
                let result = match media_type {
                    MediaType::Movie => load_movie_detail(&catalog, id)
                        .await
                        .map(|d| match d {
                            Detail::Found(movie) => Some(CurrentMedia::movie(movie.id, movie.title)),
                            Detail::NotFound => None,
                        }),
                    MediaType::Tv => load_episode(&catalog, id, season, episode)
                        .await
                        .map(|d| match d {
                            Detail::Found(view) => Some(CurrentMedia::episode(
                                view.show.id,
                                format!("{} - S{}E{} - {}", view.show.name, season, episode, view.episode.name),
                                season,
                                episode,
                            )),
                            Detail::NotFound => None,
                        }),
                };
                match result {
                    Ok(Some(media)) => Lookup::Found(media),
                    Ok(None) => Lookup::NotFound,
                    Err(e) => Lookup::Failed(e),
                }
            });

            let spinner = Spinner::start("Loading title...", output);
            let outcome = tokio::select! {
                outcome = lookup.join() => outcome,
                _ = tokio::signal::ctrl_c() => {
                    scope.cancel();
                    None
                }
            };
            spinner.finish();

            match outcome {
                Some(Lookup::Found(media)) => media,
                Some(Lookup::NotFound) => {
                    output.error(format!("{} {} not found", request.media_type, request.id));
                    return Ok(());
                }
                Some(Lookup::Failed(e)) => {
                    tracing::warn!(operation = "watch", error = %e, "Title lookup failed");
                    output.warn(format!("Could not load title details: {}", e));
                    request.fallback_media()
                }
                None => {
                    output.info("Cancelled");
                    return Ok(());
                }
            }
        }
        Err(_) => request.fallback_media(),
    };

    let session = WatchSession::open(
        ui,
        store.clone(),
        &ctx.embeds(),
        media,
        TrackerSettings::from_config(&ctx.config.player),
    )
    .map_err(|e| eyre!("{}", e))?;

    if output.is_human() {
        output.success(format!("Now playing: {}", session.media().title));
        output.info(format!("Open in your browser: {}", session.embed_url()));
    } else {
        output.json(&json!({
            "type": "playing",
            "media": session.media(),
            "embed_url": session.embed_url(),
        }));
    }

    let spinner = Spinner::start("Recording watch progress (Ctrl-C to stop)...", output);
    match request.duration {
        Some(duration) => {
            tokio::select! {
                _ = tokio::time::sleep(duration) => {}
                _ = tokio::signal::ctrl_c() => {}
            }
        }
        None => {
            tokio::signal::ctrl_c()
                .await
                .map_err(|e| eyre!("Failed to listen for Ctrl-C: {}", e))?;
        }
    }
    spinner.finish();
    session.close();

    match store.history_entry(request.id, request.media_type) {
        Some(entry) => output.success(format!("Progress saved ({:.0}%)", entry.progress)),
        None => output.info("Stopped before any progress was recorded"),
    }
    Ok(())
}
