use crate::context::AppContext;
use crate::output::Output;
use cinelog_core::{JsonFileStorage, StateStorage};
use color_eyre::eyre::eyre;
use color_eyre::Result;
use std::fs;

pub async fn run_clear(ctx: &AppContext, all: bool, state: bool, credentials: bool, output: &Output) -> Result<()> {
    if all {
        clear_state(ctx, output)?;
        clear_credentials(ctx, output)?;
        output.success("All stored state and credentials cleared");
        return Ok(());
    }

    let mut cleared_anything = false;

    if state {
        clear_state(ctx, output)?;
        cleared_anything = true;
    }

    if credentials {
        clear_credentials(ctx, output)?;
        cleared_anything = true;
    }

    if !cleared_anything {
        output.warn("No clear option specified. Use --state, --credentials, or --all");
        output.info("\nExample: cinelog clear --state");
    }

    Ok(())
}

fn clear_state(ctx: &AppContext, output: &Output) -> Result<()> {
    let path = ctx.paths.state_file(&ctx.config.storage.namespace);
    if !path.exists() {
        output.info("No saved watchlist or history found to clear");
        return Ok(());
    }

    JsonFileStorage::new(path.clone())
        .clear()
        .map_err(|e| eyre!("Failed to remove state file at {}: {}", path.display(), e))?;
    output.success(format!("Cleared watchlist and history: {}", path.display()));
    Ok(())
}

fn clear_credentials(ctx: &AppContext, output: &Output) -> Result<()> {
    let credentials_file = ctx.paths.credentials_file();

    if credentials_file.exists() {
        fs::remove_file(&credentials_file)
            .map_err(|e| eyre!("Failed to remove credentials file at {}: {}", credentials_file.display(), e))?;
        output.success(format!("Cleared credentials: {}", credentials_file.display()));
    } else {
        output.info("No credentials file found to clear");
    }

    Ok(())
}
