//! Configuration management commands.

use std::path::PathBuf;

use anyhow::{bail, Result};
use dialoguer::{Confirm, Input, Select};
use reel_discovery::{DiscoveryConfig, StoreBackend};

use super::{ConfigArgs, ConfigCommand};
use crate::config::{generate_default_config, mask_secret, CliConfig};
use crate::context::Context;

/// Run the config command.
pub async fn run(args: ConfigArgs, ctx: &Context) -> Result<()> {
    match args.command {
        ConfigCommand::Show => show_config(ctx),
        ConfigCommand::Get { key } => get_config(&key, ctx),
        ConfigCommand::Set { key, value } => set_config(&key, &value, ctx),
        ConfigCommand::Init { force, defaults } => init_config(force, defaults, ctx),
        ConfigCommand::Validate => validate_config(ctx),
    }
}

fn secret(value: Option<&str>) -> String {
    value.map(mask_secret).unwrap_or_else(|| "(not set)".to_string())
}

fn show_config(ctx: &Context) -> Result<()> {
    let mut effective = ctx.discovery();
    effective.catalog.api_key = effective.catalog.api_key.as_deref().map(mask_secret);
    effective.store.api_key = effective.store.api_key.as_deref().map(mask_secret);

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({
            "file": ctx.config_path.as_ref().map(|p| p.display().to_string()),
            "catalog": effective.catalog,
            "store": effective.store,
            "search": effective.search,
            "logging": ctx.config.logging,
        }));
        return Ok(());
    }

    ctx.output.header("Current Configuration");
    match &ctx.config_path {
        Some(path) => ctx.output.kv("file", &path.display().to_string()),
        None => ctx.output.kv("file", "(none, using defaults)"),
    }

    ctx.output.info("");
    ctx.output.info("[catalog]");
    ctx.output.kv("base_url", &effective.catalog.base_url);
    ctx.output.kv("api_key", &secret(effective.catalog.api_key.as_deref()));
    if let Some(timeout) = effective.catalog.timeout_ms {
        ctx.output.kv("timeout_ms", &timeout.to_string());
    }

    ctx.output.info("");
    ctx.output.info("[store]");
    ctx.output.kv("backend", effective.store.backend.as_str());
    if effective.store.backend == StoreBackend::Appwrite {
        let store = &effective.store;
        ctx.output.kv("endpoint", &store.endpoint);
        ctx.output.kv("project_id", store.project_id.as_deref().unwrap_or("(not set)"));
        ctx.output.kv("database_id", store.database_id.as_deref().unwrap_or("(not set)"));
        ctx.output.kv(
            "collection_id",
            store.collection_id.as_deref().unwrap_or("(not set)"),
        );
        ctx.output.kv("api_key", &secret(store.api_key.as_deref()));
    }

    ctx.output.info("");
    ctx.output.info("[search]");
    ctx.output.kv("debounce_ms", &effective.search.debounce_ms.to_string());
    ctx.output.kv("trending_limit", &effective.search.trending_limit.to_string());

    ctx.output.info("");
    ctx.output.info("[logging]");
    ctx.output.kv("level", ctx.config.logging.level.as_str());
    ctx.output.kv("format", ctx.config.logging.format.as_str());

    Ok(())
}

fn get_config(key: &str, ctx: &Context) -> Result<()> {
    let value = ctx.config.value(key)?;

    if ctx.output.is_json() {
        ctx.output.json(&serde_json::json!({ "key": key, "value": value }));
    } else {
        println!("{}", value);
    }

    Ok(())
}

fn set_config(key: &str, value: &str, ctx: &Context) -> Result<()> {
    let Some(path) = &ctx.config_path else {
        bail!("No config file found. Run `reel config init` to create one.");
    };

    let mut config = CliConfig::load(path)?;
    config.set(key, value)?;
    config.save(path)?;

    let shown = if key.ends_with("api_key") {
        mask_secret(value)
    } else {
        value.to_string()
    };
    ctx.output.success(&format!("Set {} = {}", key, shown));

    Ok(())
}

fn init_config(force: bool, defaults: bool, ctx: &Context) -> Result<()> {
    let config_path: PathBuf = ctx.cwd.join("reel.toml");

    if config_path.exists() && !force {
        if defaults {
            bail!(
                "Config file already exists: {}. Use --force to overwrite.",
                config_path.display()
            );
        }
        let overwrite = Confirm::new()
            .with_prompt(format!("{} exists. Overwrite?", config_path.display()))
            .default(false)
            .interact()?;
        if !overwrite {
            ctx.output.warn("Init cancelled");
            return Ok(());
        }
    }

    if defaults {
        std::fs::write(&config_path, generate_default_config())?;
        ctx.output.success(&format!("Created: {}", config_path.display()));
        return Ok(());
    }

    let mut config = CliConfig::default();

    let api_key: String = Input::new()
        .with_prompt("TMDB read access token (blank to use TMDB_API_KEY)")
        .allow_empty(true)
        .interact_text()?;
    if !api_key.trim().is_empty() {
        config.catalog.api_key = Some(api_key.trim().to_string());
    }

    let backends = ["appwrite", "memory"];
    let choice = Select::new()
        .with_prompt("Where should search counts be stored?")
        .items(&backends)
        .default(0)
        .interact()?;
    config.store.backend = backends[choice].parse()?;

    if config.store.backend == StoreBackend::Appwrite {
        config.store.endpoint = Input::new()
            .with_prompt("Appwrite endpoint")
            .default(config.store.endpoint.clone())
            .interact_text()?;
        config.store.project_id = prompt_optional("Project ID")?;
        config.store.database_id = prompt_optional("Database ID")?;
        config.store.collection_id = prompt_optional("Collection ID")?;
    }

    config.save(&config_path)?;
    ctx.output.success(&format!("Created: {}", config_path.display()));

    Ok(())
}

fn prompt_optional(prompt: &str) -> Result<Option<String>> {
    let value: String = Input::new()
        .with_prompt(format!("{} (blank to read from the environment)", prompt))
        .allow_empty(true)
        .interact_text()?;
    let value = value.trim();
    Ok((!value.is_empty()).then(|| value.to_string()))
}

/// Problems that make the configuration unusable, and ones worth a look.
fn check(config: &DiscoveryConfig, file: Option<&CliConfig>) -> (Vec<String>, Vec<String>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    if let Err(e) = config.validate() {
        errors.push(e.to_string());
    }

    if !config.catalog.base_url.starts_with("https://") {
        warnings.push(format!(
            "catalog.base_url '{}' is not https",
            config.catalog.base_url
        ));
    }
    if config.search.debounce_ms == 0 {
        warnings.push("search.debounce_ms is 0; every keystroke will search".to_string());
    }
    if let Some(file) = file {
        if file.catalog.api_key.is_some() || file.store.api_key.is_some() {
            warnings.push("API keys are stored in the config file; prefer environment variables".to_string());
        }
    }

    (errors, warnings)
}

fn validate_config(ctx: &Context) -> Result<()> {
    ctx.output.header("Validating configuration");

    let file = ctx.config_path.as_ref().map(|_| &ctx.config);
    let (errors, warnings) = check(&ctx.discovery(), file);

    if errors.is_empty() && warnings.is_empty() {
        ctx.output.success("Configuration is valid");
        return Ok(());
    }

    for error in &errors {
        ctx.output.error(&format!("Error: {}", error));
    }

    for warning in &warnings {
        ctx.output.warn(&format!("Warning: {}", warning));
    }

    if !errors.is_empty() {
        bail!("Configuration has {} error(s)", errors.len());
    }

    ctx.output.success("Configuration is valid (with warnings)");

    Ok(())
}
