/// Configuration system for heliox.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::HelioxConfig::default()`]
/// 2. **User global config** — `~/.heliox/config.toml`
/// 3. **Project local config** — `.heliox.toml` in the current working directory
/// 4. **Environment variables** — `HELIOX_*` overrides (highest precedence)
///
/// The resolved [`HelioxConfig`] is loaded once in `main` and passed down
/// explicitly; nothing reads the environment after startup.
///
/// # Usage
///
/// ```rust,ignore
/// use heliox::config;
///
/// let cfg = config::load();
/// let client = heliox::api::ApiClient::from_config(&cfg.api);
/// ```
pub mod schema;

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

pub use schema::HelioxConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved heliox configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars.
pub fn load() -> HelioxConfig {
    let mut merged = toml::Value::Table(toml::map::Map::new());

    // Layer 2: user global config (~/.heliox/config.toml)
    if let Some(global) = load_toml_file(global_config_path()) {
        merge_tables(&mut merged, global);
    }

    // Layer 3: project local config (.heliox.toml)
    if let Some(project) = load_toml_file(project_config_path()) {
        merge_tables(&mut merged, project);
    }

    // Layer 1 fills whatever the files left unset.
    let mut config: HelioxConfig = merged.try_into().unwrap_or_default();

    // Layer 4: environment variable overrides
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    config
}

/// Load a TOML config file from the given path (if it exists).
///
/// Files that fail to parse, or that the schema would reject, are ignored;
/// the remaining layers still apply.
fn load_toml_file(path: Option<PathBuf>) -> Option<toml::Value> {
    let path = path?;
    let content = fs::read_to_string(&path).ok()?;
    let value: toml::Value = toml::from_str(&content).ok()?;
    value.clone().try_into::<HelioxConfig>().ok()?;
    Some(value)
}

/// Merge `overlay` into `base` key by key. Tables merge recursively; any
/// other value in the overlay replaces the base value.
fn merge_tables(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base), toml::Value::Table(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_tables(existing, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Directory holding all heliox state: `~/.heliox/`.
pub fn state_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".heliox"))
}

/// Path to the user global config: `~/.heliox/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    state_dir().map(|dir| dir.join("config.toml"))
}

/// Path to the project local config: `.heliox.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".heliox.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `HELIOX_API_URL` — backend base address
/// - `HELIOX_API_TIMEOUT_MS` — data request timeout
/// - `HELIOX_ACCESS_CODE` — beta access code (empty value = open access)
/// - `HELIOX_LOGGING` — analytics event log (`1`/`true`/`yes`/`on`)
/// - `HELIOX_WEB_ADDR` — bind address for `heliox web`
fn apply_env_overrides(config: &mut HelioxConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("HELIOX_API_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Some(val) = var("HELIOX_API_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.api.timeout_ms = ms;
    }
    if let Some(val) = var("HELIOX_ACCESS_CODE") {
        let trimmed = val.trim();
        config.access.code = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }
    if let Some(val) = var("HELIOX_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
    if let Some(val) = var("HELIOX_WEB_ADDR")
        && !val.is_empty()
    {
        config.web.addr = val;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.heliox/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create ~/.heliox/ directory")?;
    }

    fs::write(&path, HelioxConfig::default_toml()).context("failed to write config file")?;

    Ok(path)
}

/// Set a single config key to a value in the global config file.
///
/// Supports dotted keys like `api.base_url`. Starts from the serialized
/// defaults when no file exists yet.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;

    let content = if path.exists() {
        fs::read_to_string(&path).context("failed to read config file")?
    } else {
        toml::to_string_pretty(&HelioxConfig::default())
            .context("failed to serialize default config")?
    };

    let mut root: toml::Value =
        toml::from_str(&content).context("failed to parse config as TOML value")?;
    set_toml_value(&mut root, key, value)?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;

    // Refuse to write something the loader would silently discard.
    toml::from_str::<HelioxConfig>(&output)
        .with_context(|| format!("invalid value for '{key}': {value}"))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(&path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted `section.key` path.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let (section, leaf) = key
        .split_once('.')
        .with_context(|| format!("config key must look like 'section.key', got '{key}'"))?;

    if !known_section(section) {
        anyhow::bail!("config key not found: section '{section}' in '{key}'");
    }

    let root_table = root
        .as_table_mut()
        .context("config root is not a TOML table")?;
    let table = root_table
        .entry(section.to_string())
        .or_insert_with(|| toml::Value::Table(toml::map::Map::new()))
        .as_table_mut()
        .with_context(|| format!("expected table at '{section}'"))?;

    let new_value = match table.get(leaf) {
        Some(toml::Value::Boolean(_)) => toml::Value::Boolean(is_truthy(raw_value)),
        Some(toml::Value::Integer(_)) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        Some(toml::Value::Float(_)) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        // Optional integers (e.g. `dashboard.trend_seed`) are absent by default.
        None if raw_value.parse::<i64>().is_ok() && leaf != "code" => {
            toml::Value::Integer(raw_value.parse().unwrap_or_default())
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    table.insert(leaf.to_string(), new_value);
    Ok(())
}

fn known_section(section: &str) -> bool {
    matches!(
        section,
        "api" | "access" | "dashboard" | "waitlist" | "logging" | "web"
    )
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config(config: &HelioxConfig) -> Result<String> {
    toml::to_string_pretty(config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
