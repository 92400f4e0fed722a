use super::prompts;
use crate::context::AppContext;
use crate::output::{mask_string, new_table, Output};
use crate::ConfigCommands;
use cinelog_config::{Config, API_KEY_ENV_VARS};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use serde_json::json;

pub async fn run_config(ctx: &AppContext, cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full } => show_config(ctx, full, output),
        ConfigCommands::ApiKey { key } => configure_api_key(ctx, key, output),
        ConfigCommands::Init { force } => init_config(ctx, force, output),
    }
}

/// Where the effective API key comes from, in resolution order
fn api_key_source(ctx: &AppContext) -> &'static str {
    let from_env = API_KEY_ENV_VARS
        .iter()
        .find(|name| std::env::var(name).map(|v| !v.trim().is_empty()).unwrap_or(false));
    if let Some(name) = from_env {
        return *name;
    }
    if ctx.credentials().get_tmdb_api_key().is_some() {
        return "credentials file";
    }
    if !ctx.config.tmdb.api_key.trim().is_empty() {
        return "config file";
    }
    "not set"
}

fn show_config(ctx: &AppContext, full: bool, output: &Output) -> Result<()> {
    let config = &ctx.config;
    let config_file = ctx.paths.config_file();
    let api_key = ctx.api_key().unwrap_or_default();
    let api_key_display = if full { api_key.clone() } else { mask_string(&api_key) };
    let state_file = ctx.paths.state_file(&config.storage.namespace);

    if let Some(warning) = &ctx.config_warning {
        output.warn(format!("Config file ignored: {}", warning));
    }

    if !output.is_human() {
        let mut value = serde_json::to_value(config).map_err(|e| eyre!("Failed to serialize config: {}", e))?;
        value["tmdb"]["api_key"] = json!(api_key_display);
        output.json(&json!({
            "config_file": config_file.display().to_string(),
            "config_file_exists": config_file.exists(),
            "api_key_source": api_key_source(ctx),
            "state_file": state_file.display().to_string(),
            "config": value,
        }));
        return Ok(());
    }

    let mut files = new_table(["Files", ""]);
    let config_label = if config_file.exists() {
        config_file.display().to_string()
    } else {
        format!("{} (not created, using defaults)", config_file.display())
    };
    files.add_row(vec!["Config".to_string(), config_label]);
    files.add_row(vec!["Credentials".to_string(), ctx.paths.credentials_file().display().to_string()]);
    files.add_row(vec!["State".to_string(), state_file.display().to_string()]);
    output.table(&files);

    let mut tmdb = new_table(["TMDB", ""]);
    tmdb.add_row(vec!["API Key".to_string(), api_key_display]);
    tmdb.add_row(vec!["API Key Source".to_string(), api_key_source(ctx).to_string()]);
    tmdb.add_row(vec!["Base URL".to_string(), config.tmdb.base_url.clone()]);
    tmdb.add_row(vec!["Image Base URL".to_string(), config.tmdb.image_base_url.clone()]);
    tmdb.add_row(vec!["Timeout".to_string(), format!("{} seconds", config.tmdb.timeout_secs)]);
    output.table(&tmdb);

    let mut player = new_table(["Player", ""]);
    player.add_row(vec!["Embed Base URL".to_string(), config.player.embed_base_url.clone()]);
    player.add_row(vec!["Progress Interval".to_string(), format!("{} seconds", config.player.progress_interval_secs)]);
    player.add_row(vec!["Recorded Progress".to_string(), format!("{:.0}%", config.player.assumed_progress)]);
    output.table(&player);

    let mut storage = new_table(["Storage", ""]);
    storage.add_row(vec!["Namespace".to_string(), config.storage.namespace.clone()]);
    storage.add_row(vec!["History Limit".to_string(), config.storage.history_limit.to_string()]);
    output.table(&storage);

    let mut logging = new_table(["Logging", ""]);
    logging.add_row(vec!["Level".to_string(), config.logging.level.clone()]);
    let json_mode = match config.logging.json {
        Some(true) => "always",
        Some(false) => "never",
        None => "when not a terminal",
    };
    logging.add_row(vec!["JSON".to_string(), json_mode.to_string()]);
    let file = config
        .logging
        .file
        .as_ref()
        .map(|f| f.display().to_string())
        .unwrap_or_else(|| "stderr".to_string());
    logging.add_row(vec!["Output".to_string(), file]);
    output.table(&logging);

    Ok(())
}

fn configure_api_key(ctx: &AppContext, key: Option<String>, output: &Output) -> Result<()> {
    let key = match key {
        Some(key) => key,
        None => prompts::prompt_password("TMDB API key")?,
    };
    let key = key.trim().to_string();
    if key.is_empty() {
        return Err(eyre!("API key cannot be empty"));
    }

    ctx.paths
        .ensure_directories()
        .map_err(|e| eyre!("Failed to create config directory: {}", e))?;

    let mut credentials = ctx.credentials();
    credentials.set_tmdb_api_key(key);
    credentials
        .save()
        .map_err(|e| eyre!("Failed to save credentials: {}", e))?;

    output.success(format!("API key saved to {}", ctx.paths.credentials_file().display()));

    if let Some(name) = API_KEY_ENV_VARS
        .iter()
        .find(|name| std::env::var(name).map(|v| !v.trim().is_empty()).unwrap_or(false))
    {
        output.warn(format!("{} is set and takes precedence over the stored key", name));
    }
    Ok(())
}

fn init_config(ctx: &AppContext, force: bool, output: &Output) -> Result<()> {
    let config_file = ctx.paths.config_file();

    if config_file.exists() && !force {
        let overwrite = prompts::prompt_yes_no(
            &format!("{} already exists. Overwrite with defaults?", config_file.display()),
            false,
        )?;
        if !overwrite {
            output.info("Keeping existing configuration");
            return Ok(());
        }
    }

    Config::default()
        .save_to_file(&config_file)
        .map_err(|e| eyre!("Failed to write {}: {}", config_file.display(), e))?;
    output.success(format!("Wrote default configuration to {}", config_file.display()));
    Ok(())
}
