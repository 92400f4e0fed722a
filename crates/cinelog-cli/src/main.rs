use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use cinelog_core::SearchFilter;
use cinelog_models::MediaType;
use commands::{browse, clear, config, library, watch};

mod commands;
mod context;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinelog")]
#[command(about = "cinelog - Browse movies and TV shows and keep track of what you watch")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trending, top rated and featured titles
    Home,
    /// Browse the movie catalog
    Movies {
        /// Page of the featured grid
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Browse the TV catalog
    Tv {
        /// Page of the featured grid
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Show details for one title
    Show {
        /// movie or tv
        media_type: MediaType,
        id: u32,
    },
    /// Search movies and TV shows
    Search {
        query: String,

        #[arg(long, default_value_t = 1)]
        page: u32,

        /// Restrict results to one media type
        #[arg(long = "type", value_enum, default_value = "all")]
        kind: SearchKind,
    },
    /// Manage your watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: WatchlistCommands,
    },
    /// Inspect or clear your watch history
    History {
        #[command(subcommand)]
        cmd: HistoryCommands,
    },
    /// Open the player for a title and record progress while it runs
    #[command(long_about = "Open the embedded player for a movie or episode. Watch progress is recorded periodically until you press Ctrl-C or the optional --duration elapses.")]
    Watch {
        #[command(subcommand)]
        cmd: WatchCommands,
    },
    /// Configure the API key and settings
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Clear stored data
    #[command(long_about = "Clear the persisted watchlist and history (--state), the stored API key (--credentials), or both (--all).")]
    Clear {
        /// Clear state and credentials
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Clear watchlist and watch history
        #[arg(long, action = ArgAction::SetTrue)]
        state: bool,

        /// Clear stored credentials
        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SearchKind {
    All,
    Movie,
    Tv,
}

impl From<SearchKind> for SearchFilter {
    fn from(kind: SearchKind) -> Self {
        match kind {
            SearchKind::All => SearchFilter::All,
            SearchKind::Movie => SearchFilter::Movie,
            SearchKind::Tv => SearchFilter::Tv,
        }
    }
}

#[derive(Subcommand)]
pub enum WatchlistCommands {
    /// List saved titles
    List,
    /// Save a title
    Add { media_type: MediaType, id: u32 },
    /// Remove a saved title
    Remove { media_type: MediaType, id: u32 },
    /// Remove every saved title
    Clear,
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List recently watched titles, most recent first
    List {
        /// Only show this many entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Forget the whole watch history
    Clear,
}

#[derive(Subcommand)]
pub enum WatchCommands {
    /// Play a movie
    Movie {
        id: u32,

        /// Stop after this many seconds instead of waiting for Ctrl-C
        #[arg(long)]
        duration: Option<u64>,
    },
    /// Play an episode of a TV show
    Tv {
        id: u32,

        #[arg(long, default_value_t = 1)]
        season: u32,

        #[arg(long, default_value_t = 1)]
        episode: u32,

        /// Stop after this many seconds instead of waiting for Ctrl-C
        #[arg(long)]
        duration: Option<u64>,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show current configuration (masks the API key)
    Show {
        /// Show the API key unmasked
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },
    /// Store the TMDB API key in the credentials file
    #[command(long_about = "Store the TMDB API key in the credentials file. The CINELOG_TMDB_API_KEY and TMDB_API_KEY environment variables take precedence over the stored key.")]
    ApiKey {
        /// API key (if not provided, will prompt)
        #[arg(long)]
        key: Option<String>,
    },
    /// Write a config file with default settings
    Init {
        /// Overwrite an existing config file without asking
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let ctx = context::AppContext::load()?;

    logging::init_logging(cli.verbose, cli.quiet, &ctx.config.logging)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    if let Some(warning) = &ctx.config_warning {
        tracing::warn!(operation = "config_load", warning = %warning, "Using default configuration");
    }

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Home => browse::run_home(&ctx, &output).await,
        Commands::Movies { page } => browse::run_movies(&ctx, page, &output).await,
        Commands::Tv { page } => browse::run_tv(&ctx, page, &output).await,
        Commands::Show { media_type, id } => browse::run_show(&ctx, media_type, id, &output).await,
        Commands::Search { query, page, kind } => browse::run_search(&ctx, &query, page, kind.into(), &output).await,
        Commands::Watchlist { cmd } => library::run_watchlist(&ctx, cmd, &output).await,
        Commands::History { cmd } => library::run_history(&ctx, cmd, &output).await,
        Commands::Watch { cmd } => watch::run_watch(&ctx, cmd, &output).await,
        Commands::Config { cmd } => config::run_config(&ctx, cmd, &output).await,
        Commands::Clear { all, state, credentials } => clear::run_clear(&ctx, all, state, credentials, &output).await,
    }
}
