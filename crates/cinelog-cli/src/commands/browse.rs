use super::ui::Spinner;
use crate::context::AppContext;
use crate::output::{check_mark, new_table, Output};
use cinelog_core::format::DEFAULT_DATE_PATTERN;
use cinelog_core::pagination::{next_page, prev_page};
use cinelog_core::{
    format_date, format_runtime, format_vote_average, load_home, load_movie_detail, load_movies_page,
    load_tv_detail, load_tv_page, page_window, paginate, search, total_pages, truncate_string, Detail,
    ListingPage, SearchFilter, UserStore, PAGE_SIZE,
};
use cinelog_models::{MediaType, Movie, SearchHit, TvShow};
use cinelog_tmdb::TmdbError;
use color_eyre::eyre::{eyre, Report};
use color_eyre::Result;
use serde_json::json;

const OVERVIEW_LENGTH: usize = 200;
const ROW_OVERVIEW_LENGTH: usize = 60;
const CAST_SHOWN: usize = 12;
const RELATED_SHOWN: usize = 6;

fn year(date: &str) -> String {
    format_date(Some(date), "yyyy")
}

fn request_failed(what: &str, e: TmdbError) -> Report {
    tracing::error!(operation = "browse", what = what, error = %e, "Request failed");
    eyre!("Failed to load {}: {}", what, e)
}

fn movie_table<'a>(movies: impl IntoIterator<Item = &'a Movie>) -> comfy_table::Table {
    let mut table = new_table(["ID", "Title", "Year", "Rating", "Overview"]);
    for movie in movies {
        table.add_row(vec![
            movie.id.to_string(),
            movie.title.clone(),
            year(&movie.release_date),
            format_vote_average(Some(movie.vote_average)),
            truncate_string(Some(&movie.overview), ROW_OVERVIEW_LENGTH),
        ]);
    }
    table
}

fn tv_table<'a>(shows: impl IntoIterator<Item = &'a TvShow>) -> comfy_table::Table {
    let mut table = new_table(["ID", "Name", "Year", "Rating", "Overview"]);
    for show in shows {
        table.add_row(vec![
            show.id.to_string(),
            show.name.clone(),
            year(&show.first_air_date),
            format_vote_average(Some(show.vote_average)),
            truncate_string(Some(&show.overview), ROW_OVERVIEW_LENGTH),
        ]);
    }
    table
}

/// `« 2 [3] 4 5 6 »  page 3 of 9`
fn pager_line(current: u32, total: u32) -> String {
    let pages: Vec<String> = page_window(current, total)
        .map(|p| if p == current { format!("[{}]", p) } else { p.to_string() })
        .collect();
    let prev = if prev_page(current).is_some() { "«" } else { " " };
    let next = if next_page(current, total).is_some() { "»" } else { " " };
    format!("{} {} {}  page {} of {}", prev, pages.join(" "), next, current, total)
}

pub async fn run_home(ctx: &AppContext, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let spinner = Spinner::start("Loading home feed...", output);
    let feed = load_home(&catalog).await.map_err(|e| request_failed("home feed", e))?;
    spinner.finish();

    if !output.is_human() {
        let hero: Vec<_> = feed
            .hero_items()
            .iter()
            .map(|item| json!({"id": item.id(), "media_type": item.media_type(), "title": item.title()}))
            .collect();
        output.json(&json!({
            "hero": hero,
            "trending_movies": feed.trending_movies,
            "trending_tv": feed.trending_tv,
            "top_rated_movies": feed.top_rated_movies,
            "top_rated_tv": feed.top_rated_tv,
            "featured_movies": feed.featured_movies,
            "featured_tv": feed.featured_tv,
        }));
        return Ok(());
    }

    output.heading("Spotlight");
    let mut hero = new_table(["Type", "ID", "Title"]);
    for item in feed.hero_items() {
        hero.add_row(vec![item.media_type().to_string(), item.id().to_string(), item.title().to_string()]);
    }
    output.table(&hero);

    output.heading("Trending Movies");
    output.table(&movie_table(&feed.trending_movies));
    output.heading("Trending TV Shows");
    output.table(&tv_table(&feed.trending_tv));
    output.heading("Top Rated Movies");
    output.table(&movie_table(&feed.top_rated_movies));
    output.heading("Top Rated TV Shows");
    output.table(&tv_table(&feed.top_rated_tv));
    output.heading("Featured Movies");
    output.table(&movie_table(&feed.featured_movies));
    output.heading("Featured TV Shows");
    output.table(&tv_table(&feed.featured_tv));
    Ok(())
}

fn render_listing<T, F>(
    listing: &ListingPage<T>,
    page: u32,
    label: &str,
    table: F,
    output: &Output,
) -> Result<()>
where
    T: serde::Serialize,
    F: for<'a> Fn(&'a [T]) -> comfy_table::Table,
{
    let total = total_pages(listing.catalog.len(), PAGE_SIZE);
    if total > 0 && page > total {
        output.warn(format!("Page {} is out of range, there are {} pages", page, total));
        return Ok(());
    }
    let items = paginate(&listing.catalog, page, PAGE_SIZE);

    if !output.is_human() {
        output.json(&json!({
            "trending": listing.trending,
            "top_rated": listing.top_rated,
            "page": page,
            "total_pages": total,
            "results": items,
        }));
        return Ok(());
    }

    output.heading(format!("Trending {}", label));
    output.table(&table(&listing.trending[..listing.trending.len().min(5)]));
    output.heading(format!("Top Rated {}", label));
    output.table(&table(&listing.top_rated));
    output.heading(format!("All {}", label));
    output.table(&table(items));
    output.info(pager_line(page, total));
    Ok(())
}

pub async fn run_movies(ctx: &AppContext, page: u32, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let spinner = Spinner::start("Loading movies...", output);
    let listing = load_movies_page(&catalog).await.map_err(|e| request_failed("movies", e))?;
    spinner.finish();
    render_listing(&listing, page.max(1), "Movies", |items| movie_table(items), output)
}

pub async fn run_tv(ctx: &AppContext, page: u32, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let spinner = Spinner::start("Loading TV shows...", output);
    let listing = load_tv_page(&catalog).await.map_err(|e| request_failed("TV shows", e))?;
    spinner.finish();
    render_listing(&listing, page.max(1), "TV Shows", |items| tv_table(items), output)
}

fn not_found(media_type: MediaType, id: u32, output: &Output) {
    let label = match media_type {
        MediaType::Movie => "Movie",
        MediaType::Tv => "TV show",
    };
    output.warn(format!("{} {} not found", label, id));
    output.info("Try 'cinelog search <title>' to look up the right id");
}

fn library_rows(store: &UserStore, media_type: MediaType, id: u32, table: &mut comfy_table::Table) {
    table.add_row(vec!["In Watchlist".to_string(), check_mark(store.is_in_watchlist(id, media_type))]);
    if let Some(entry) = store.history_entry(id, media_type) {
        table.add_row(vec![
            "Last Watched".to_string(),
            format!(
                "{} ({:.0}%)",
                format_date(Some(&entry.watched_at.to_rfc3339()), DEFAULT_DATE_PATTERN),
                entry.progress
            ),
        ]);
    }
}

pub async fn run_show(ctx: &AppContext, media_type: MediaType, id: u32, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let store = ctx.user_store()?;
    let images = ctx.images();
    let spinner = Spinner::start(format!("Loading {} {}...", media_type, id), output);

    match media_type {
        MediaType::Movie => {
            let detail = load_movie_detail(&catalog, id).await.map_err(|e| request_failed("movie", e))?;
            spinner.finish();
            let movie = match detail {
                Detail::Found(movie) => movie,
                Detail::NotFound => {
                    not_found(media_type, id, output);
                    return Ok(());
                }
            };

            if !output.is_human() {
                output.json(&json!(movie));
                return Ok(());
            }

            let mut table = new_table([movie.title.clone(), String::new()]);
            table.add_row(vec!["Released".to_string(), format_date(Some(&movie.release_date), DEFAULT_DATE_PATTERN)]);
            table.add_row(vec!["Runtime".to_string(), format_runtime(movie.runtime)]);
            table.add_row(vec!["Rating".to_string(), format_vote_average(Some(movie.vote_average))]);
            if let Some(genres) = &movie.genres {
                let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
                table.add_row(vec!["Genres".to_string(), names.join(", ")]);
            }
            table.add_row(vec!["Overview".to_string(), truncate_string(Some(&movie.overview), OVERVIEW_LENGTH)]);
            table.add_row(vec!["Poster".to_string(), images.url(movie.poster_path.as_deref(), "w500")]);
            if let Some(trailer) = movie.videos.iter().flat_map(|v| &v.results).find(|v| v.is_youtube_trailer()) {
                table.add_row(vec!["Trailer".to_string(), format!("https://www.youtube.com/watch?v={}", trailer.key)]);
            }
            if let Some(credits) = &movie.credits {
                let cast: Vec<&str> = credits.cast.iter().take(CAST_SHOWN).map(|c| c.name.as_str()).collect();
                table.add_row(vec!["Cast".to_string(), cast.join(", ")]);
            }
            library_rows(&store, media_type, id, &mut table);
            output.table(&table);

            if let Some(similar) = movie.similar.as_ref().filter(|s| !s.results.is_empty()) {
                output.heading("More Like This");
                output.table(&movie_table(similar.results.iter().take(RELATED_SHOWN)));
            }
            if let Some(recommended) = movie.recommendations.as_ref().filter(|r| !r.results.is_empty()) {
                output.heading("Recommended");
                output.table(&movie_table(recommended.results.iter().take(RELATED_SHOWN)));
            }
        }
        MediaType::Tv => {
            let detail = load_tv_detail(&catalog, id).await.map_err(|e| request_failed("TV show", e))?;
            spinner.finish();
            let show = match detail {
                Detail::Found(show) => show,
                Detail::NotFound => {
                    not_found(media_type, id, output);
                    return Ok(());
                }
            };

            if !output.is_human() {
                output.json(&json!(show));
                return Ok(());
            }

            let mut table = new_table([show.name.clone(), String::new()]);
            table.add_row(vec!["First Aired".to_string(), format_date(Some(&show.first_air_date), DEFAULT_DATE_PATTERN)]);
            table.add_row(vec!["Rating".to_string(), format_vote_average(Some(show.vote_average))]);
            if let Some(seasons) = show.number_of_seasons {
                let episodes = show.number_of_episodes.map(|e| format!(", {} episodes", e)).unwrap_or_default();
                table.add_row(vec!["Seasons".to_string(), format!("{}{}", seasons, episodes)]);
            }
            if let Some(genres) = &show.genres {
                let names: Vec<&str> = genres.iter().map(|g| g.name.as_str()).collect();
                table.add_row(vec!["Genres".to_string(), names.join(", ")]);
            }
            table.add_row(vec!["Overview".to_string(), truncate_string(Some(&show.overview), OVERVIEW_LENGTH)]);
            table.add_row(vec!["Poster".to_string(), images.url(show.poster_path.as_deref(), "w500")]);
            if let Some(credits) = &show.credits {
                let cast: Vec<&str> = credits.cast.iter().take(CAST_SHOWN).map(|c| c.name.as_str()).collect();
                table.add_row(vec!["Cast".to_string(), cast.join(", ")]);
            }
            library_rows(&store, media_type, id, &mut table);
            output.table(&table);

            if let Some(seasons) = show.seasons.as_ref().filter(|s| !s.is_empty()) {
                output.heading("Seasons");
                let mut season_table = new_table(["#", "Name", "Episodes"]);
                for season in seasons {
                    season_table.add_row(vec![
                        season.season_number.to_string(),
                        season.name.clone(),
                        season.episode_count.to_string(),
                    ]);
                }
                output.table(&season_table);
            }
            if let Some(similar) = show.similar.as_ref().filter(|s| !s.results.is_empty()) {
                output.heading("More Like This");
                output.table(&tv_table(similar.results.iter().take(RELATED_SHOWN)));
            }
        }
    }
    Ok(())
}

pub async fn run_search(ctx: &AppContext, query: &str, page: u32, filter: SearchFilter, output: &Output) -> Result<()> {
    let catalog = ctx.catalog()?;
    let spinner = Spinner::start(format!("Searching for '{}'...", query), output);
    let results = search(&catalog, query, page).await.map_err(|e| request_failed("search results", e))?;
    spinner.finish();

    let hits = results.filtered(filter);

    if !output.is_human() {
        output.json(&json!({
            "query": results.query,
            "page": results.page,
            "total_pages": results.total_pages,
            "total_results": results.total_results,
            "results": hits,
        }));
        return Ok(());
    }

    if hits.is_empty() {
        output.warn(format!("No results found for '{}'", query.trim()));
        return Ok(());
    }

    let mut table = new_table(["Type", "ID", "Title", "Year", "Rating"]);
    for hit in hits {
        let (media_type, id, date, vote) = match hit {
            SearchHit::Movie(m) => (MediaType::Movie, m.id, m.release_date.as_str(), m.vote_average),
            SearchHit::Tv(t) => (MediaType::Tv, t.id, t.first_air_date.as_str(), t.vote_average),
            SearchHit::Person(_) | SearchHit::Unknown => continue,
        };
        table.add_row(vec![
            media_type.to_string(),
            id.to_string(),
            hit.title().unwrap_or_default().to_string(),
            year(date),
            format_vote_average(Some(vote)),
        ]);
    }
    output.table(&table);
    output.info(pager_line(results.page, results.total_pages));
    Ok(())
}
