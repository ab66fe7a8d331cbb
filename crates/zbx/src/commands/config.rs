//! Config command implementation.
//!
//! View and create configuration settings, and resolve the connection
//! settings used by the query commands.
//! Config file is located at ~/.config/zbx/config.toml.

use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use zabbix_api_rs::config::{AuthMode, ConnectionConfig, DEFAULT_CACHE_TTL};

use super::{CommandContext, CommandError, Result};
use crate::cli::Cli;

/// Current config file version. Increment when making breaking changes to schema.
const CONFIG_VERSION: u32 = 1;

/// Minimum secret length to apply masking (show first and last N characters).
const SECRET_MASK_MIN_LENGTH: usize = 8;

/// Number of characters to show at start/end of a masked secret.
const SECRET_MASK_VISIBLE_CHARS: usize = 4;

/// Default config file contents.
const DEFAULT_CONFIG: &str = r#"# zbx - Zabbix CLI Configuration

# Config schema version (do not modify)
version = 1

# Full URL of the API endpoint (can also use ZBX_URL env var)
# url = "https://zabbix.example.com/api_jsonrpc.php"

# API token (can also use ZBX_API_TOKEN env var)
# api_token = "your-api-token-here"

# Or user/password authentication (ZBX_USER / ZBX_PASSWORD)
# user = "Admin"
# password = "zabbix"

# Output preferences
[output]
# color = true              # Enable colors (respects NO_COLOR env)

# Inventory cache settings
[cache]
# ttl_secs = 600
"#;

/// Configuration file structure.
#[derive(Debug, Serialize, Deserialize)]
pub struct Config {
    /// Config schema version for migrations.
    /// Defaults to current version when not present in file.
    #[serde(default = "default_version")]
    pub version: u32,

    /// API endpoint URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// User name for password authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    /// Password for password authentication.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// API token.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_token: Option<String>,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
}

/// Returns the current config version (used by serde default).
fn default_version() -> u32 {
    CONFIG_VERSION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            url: None,
            user: None,
            password: None,
            api_token: None,
            output: OutputConfig::default(),
            cache: CacheConfig::default(),
        }
    }
}

/// Output configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Enable colors.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<bool>,
}

/// Cache configuration.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Lifetime of cached inventory lookups, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_secs: Option<u64>,
}

impl CacheConfig {
    /// Returns the configured TTL, or the library default.
    pub fn ttl(&self) -> Duration {
        self.ttl_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_CACHE_TTL)
    }
}

/// Gets the config directory path.
/// Uses XDG-style paths: ~/.config/zbx/ on all platforms.
fn get_config_dir() -> Result<PathBuf> {
    if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg_config).join("zbx"));
    }

    BaseDirs::new()
        .map(|dirs| dirs.home_dir().join(".config").join("zbx"))
        .ok_or_else(|| CommandError::Config("Could not determine config directory".to_string()))
}

/// Gets the config file path.
pub fn get_config_path() -> Result<PathBuf> {
    // Check for override env var first
    if let Ok(path) = env::var("ZBX_CONFIG") {
        return Ok(PathBuf::from(path));
    }

    let config_dir = get_config_dir()?;
    Ok(config_dir.join("config.toml"))
}

/// Loads the configuration from disk.
///
/// A missing file yields the default configuration.
pub fn load_config() -> Result<Config> {
    let path = get_config_path()?;

    if !path.exists() {
        return Ok(Config::default());
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| CommandError::Config(format!("Failed to read config: {}", e)))?;

    let config: Config = toml::from_str(&content)
        .map_err(|e| CommandError::Config(format!("Failed to parse config: {}", e)))?;

    migrate_config(config)
}

/// Migrates config to current version if needed.
fn migrate_config(mut config: Config) -> Result<Config> {
    if config.version > CONFIG_VERSION {
        tracing::warn!(
            version = config.version,
            supported = CONFIG_VERSION,
            "config file is newer than this zbx; unknown settings are ignored"
        );
    }
    config.version = CONFIG_VERSION;
    Ok(config)
}

/// Builds connection settings from flags/env, falling back to the config file.
///
/// An API token wins over user/password. A user given on the command line
/// also wins over a token stored in the config file.
pub fn connection_config(cli: &Cli, config: &Config) -> Result<ConnectionConfig> {
    let url = cli
        .url
        .clone()
        .or_else(|| config.url.clone())
        .ok_or_else(|| {
            CommandError::Config(
                "No Zabbix URL configured. Use --url, ZBX_URL or 'url' in the config file."
                    .to_string(),
            )
        })?;

    let auth = resolve_auth(cli, config)?;
    Ok(ConnectionConfig::new(url, auth).with_cache_ttl(config.cache.ttl()))
}

fn resolve_auth(cli: &Cli, config: &Config) -> Result<AuthMode> {
    if let Some(token) = &cli.api_token {
        return Ok(AuthMode::Token(token.clone()));
    }
    if cli.user.is_none() {
        if let Some(token) = &config.api_token {
            return Ok(AuthMode::Token(token.clone()));
        }
    }

    let user = cli.user.as_ref().or(config.user.as_ref());
    let password = cli.password.as_ref().or(config.password.as_ref());
    match (user, password) {
        (Some(user), Some(password)) => Ok(AuthMode::Password {
            user: user.clone(),
            password: password.clone(),
        }),
        (Some(user), None) => Err(CommandError::Config(format!(
            "No password configured for user '{}'. Use --password or ZBX_PASSWORD.",
            user
        ))),
        _ => Err(CommandError::Config(
            "No credentials configured. Use --api-token, or --user and --password.".to_string(),
        )),
    }
}

/// Executes the config show command.
pub fn execute_show(ctx: &CommandContext) -> Result<()> {
    let config = load_config()?;
    let path = get_config_path()?;

    if ctx.json_output {
        let masked = Config {
            password: config.password.as_deref().map(mask_secret),
            api_token: config.api_token.as_deref().map(mask_secret),
            ..config
        };
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
            "config": masked,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        use owo_colors::OwoColorize;

        let header = "Configuration";
        if ctx.use_colors {
            println!("{}\n", header.green().bold());
        } else {
            println!("{}\n", header);
        }

        println!("File: {}", path.display());
        println!("Exists: {}\n", path.exists());

        if path.exists() {
            println!("Settings:");
            if let Some(ref url) = config.url {
                println!("  url: {}", url);
            }
            if let Some(ref user) = config.user {
                println!("  user: {}", user);
            }
            if let Some(ref password) = config.password {
                println!("  password: {}", mask_secret(password));
            }
            if let Some(ref token) = config.api_token {
                println!("  api_token: {}", mask_secret(token));
            }

            println!("\n[output]");
            if let Some(color) = config.output.color {
                println!("  color: {}", color);
            }

            println!("\n[cache]");
            println!("  ttl_secs: {}", config.cache.ttl().as_secs());
        } else {
            println!("(No config file exists. Run 'zbx config init' to create one.)");
        }
    }

    Ok(())
}

/// Executes the config init command.
pub fn execute_init(ctx: &CommandContext, force: bool) -> Result<()> {
    let path = get_config_path()?;

    if path.exists() && !force {
        return Err(CommandError::Config(format!(
            "Config file already exists at {}. Use --force to overwrite.",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CommandError::Config(format!("Failed to create config directory: {}", e))
        })?;
    }

    fs::write(&path, DEFAULT_CONFIG)
        .map_err(|e| CommandError::Config(format!("Failed to write config: {}", e)))?;

    if ctx.json_output {
        let output = serde_json::json!({
            "status": "success",
            "path": path.display().to_string(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else if !ctx.quiet {
        println!("Created default config at: {}", path.display());
    }

    Ok(())
}

/// Executes the config path command.
pub fn execute_path(ctx: &CommandContext) -> Result<()> {
    let path = get_config_path()?;

    if ctx.json_output {
        let output = serde_json::json!({
            "path": path.display().to_string(),
            "exists": path.exists(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", path.display());
    }

    Ok(())
}

/// Masks a secret for display, showing only the first and last N characters.
///
/// Uses character-based (not byte-based) indexing to safely handle
/// multi-byte UTF-8 characters.
fn mask_secret(secret: &str) -> String {
    let char_count = secret.chars().count();
    if char_count > SECRET_MASK_MIN_LENGTH {
        let prefix: String = secret.chars().take(SECRET_MASK_VISIBLE_CHARS).collect();
        let suffix: String = secret
            .chars()
            .skip(char_count - SECRET_MASK_VISIBLE_CHARS)
            .collect();
        format!("{}...{}", prefix, suffix)
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serial_test::serial;
    use tempfile::TempDir;

    const ENV_KEYS: [&str; 5] = ["ZBX_URL", "ZBX_USER", "ZBX_PASSWORD", "ZBX_API_TOKEN", "ZBX_CONFIG"];

    /// Clears connection env vars for the lifetime of the guard.
    struct EnvGuard(Vec<(&'static str, Option<String>)>);

    impl EnvGuard {
        fn clean() -> Self {
            let saved = ENV_KEYS.iter().map(|k| (*k, env::var(k).ok())).collect();
            for key in ENV_KEYS {
                env::remove_var(key);
            }
            Self(saved)
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            for (key, value) in &self.0 {
                match value {
                    Some(v) => env::set_var(key, v),
                    None => env::remove_var(key),
                }
            }
        }
    }

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["zbx"];
        argv.extend_from_slice(args);
        argv.push("version");
        Cli::parse_from(argv)
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.url.is_none());
        assert!(config.api_token.is_none());
        assert!(config.output.color.is_none());
        assert_eq!(config.cache.ttl(), DEFAULT_CACHE_TTL);
    }

    #[test]
    fn test_default_config_template_parses() {
        let config: Config = toml::from_str(DEFAULT_CONFIG).unwrap();
        assert_eq!(config.version, CONFIG_VERSION);
        assert!(config.url.is_none());
        assert!(config.cache.ttl_secs.is_none());
    }

    #[test]
    fn test_config_deserialization() {
        let toml_str = r#"
version = 1
url = "https://zabbix.example.com/api_jsonrpc.php"
user = "Admin"
password = "zabbix"

[output]
color = false

[cache]
ttl_secs = 60
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(
            config.url.as_deref(),
            Some("https://zabbix.example.com/api_jsonrpc.php")
        );
        assert_eq!(config.user.as_deref(), Some("Admin"));
        assert_eq!(config.output.color, Some(false));
        assert_eq!(config.cache.ttl(), Duration::from_secs(60));
    }

    #[test]
    fn test_config_serialization_skips_unset() {
        let config = Config {
            url: Some("https://zbx.local/api_jsonrpc.php".to_string()),
            ..Default::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 1"));
        assert!(toml_str.contains("url = "));
        assert!(!toml_str.contains("api_token"));
    }

    #[test]
    fn test_migrate_config_sets_current_version() {
        let config = Config {
            version: 999,
            api_token: Some("token".to_string()),
            ..Default::default()
        };
        let migrated = migrate_config(config).unwrap();
        assert_eq!(migrated.version, CONFIG_VERSION);
        assert_eq!(migrated.api_token.as_deref(), Some("token"));
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("abcdefghijklmnop"), "abcd...mnop");
        assert_eq!(mask_secret("12345678"), "****");
        assert_eq!(mask_secret("ключ-доступа"), "ключ...тупа");
    }

    #[test]
    #[serial]
    fn test_token_flag_wins_over_config() {
        let _env = EnvGuard::clean();
        let config = Config {
            url: Some("https://file.example/api_jsonrpc.php".to_string()),
            user: Some("Admin".to_string()),
            password: Some("zabbix".to_string()),
            ..Default::default()
        };
        let cli = cli(&["--api-token", "flag-token"]);

        let conn = connection_config(&cli, &config).unwrap();
        assert_eq!(conn.url, "https://file.example/api_jsonrpc.php");
        assert_eq!(conn.auth, AuthMode::Token("flag-token".to_string()));
    }

    #[test]
    #[serial]
    fn test_flag_user_wins_over_config_token() {
        let _env = EnvGuard::clean();
        let config = Config {
            url: Some("https://file.example/api_jsonrpc.php".to_string()),
            api_token: Some("file-token".to_string()),
            password: Some("from-file".to_string()),
            ..Default::default()
        };
        let cli = cli(&["--url", "https://flag.example/api_jsonrpc.php", "--user", "ops"]);

        let conn = connection_config(&cli, &config).unwrap();
        assert_eq!(conn.url, "https://flag.example/api_jsonrpc.php");
        assert_eq!(
            conn.auth,
            AuthMode::Password {
                user: "ops".to_string(),
                password: "from-file".to_string()
            }
        );
    }

    #[test]
    #[serial]
    fn test_env_vars_are_read() {
        let _env = EnvGuard::clean();
        env::set_var("ZBX_URL", "https://env.example/api_jsonrpc.php");
        env::set_var("ZBX_API_TOKEN", "env-token");

        let conn = connection_config(&cli(&[]), &Config::default()).unwrap();
        assert_eq!(conn.url, "https://env.example/api_jsonrpc.php");
        assert_eq!(conn.auth, AuthMode::Token("env-token".to_string()));
    }

    #[test]
    #[serial]
    fn test_missing_url_or_credentials() {
        let _env = EnvGuard::clean();

        let err = connection_config(&cli(&[]), &Config::default()).unwrap_err();
        assert!(err.to_string().contains("No Zabbix URL"));

        let config = Config {
            url: Some("https://zbx.local/api_jsonrpc.php".to_string()),
            ..Default::default()
        };
        let err = connection_config(&cli(&[]), &config).unwrap_err();
        assert!(err.to_string().contains("No credentials"));

        let err = connection_config(&cli(&["--user", "ops"]), &config).unwrap_err();
        assert!(err.to_string().contains("No password configured for user 'ops'"));
    }

    #[test]
    #[serial]
    fn test_cache_ttl_is_taken_from_config() {
        let _env = EnvGuard::clean();
        let config = Config {
            url: Some("https://zbx.local/api_jsonrpc.php".to_string()),
            api_token: Some("token".to_string()),
            cache: CacheConfig { ttl_secs: Some(5) },
            ..Default::default()
        };
        let conn = connection_config(&cli(&[]), &config).unwrap();
        assert_eq!(conn.cache_ttl, Duration::from_secs(5));
    }

    #[test]
    #[serial]
    fn test_load_config_from_override_path() {
        let _env = EnvGuard::clean();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "url = \"https://zbx.local/api_jsonrpc.php\"\n").unwrap();
        env::set_var("ZBX_CONFIG", &path);

        assert_eq!(get_config_path().unwrap(), path);
        let config = load_config().unwrap();
        assert_eq!(config.url.as_deref(), Some("https://zbx.local/api_jsonrpc.php"));
    }

    #[test]
    #[serial]
    fn test_load_config_missing_file_is_default() {
        let _env = EnvGuard::clean();
        let dir = TempDir::new().unwrap();
        env::set_var("ZBX_CONFIG", dir.path().join("absent.toml"));

        let config = load_config().unwrap();
        assert!(config.url.is_none());
    }

    #[test]
    #[serial]
    fn test_load_config_reports_parse_errors() {
        let _env = EnvGuard::clean();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "url = [not toml").unwrap();
        env::set_var("ZBX_CONFIG", &path);

        let err = load_config().unwrap_err();
        assert!(matches!(err, CommandError::Config(ref m) if m.contains("Failed to parse config")));
    }

    #[test]
    #[serial]
    fn test_init_writes_template_and_refuses_overwrite() {
        let _env = EnvGuard::clean();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        env::set_var("ZBX_CONFIG", &path);
        let ctx = CommandContext {
            json_output: false,
            use_colors: false,
            quiet: true,
            verbose: false,
        };

        execute_init(&ctx, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_CONFIG);

        assert!(execute_init(&ctx, false).is_err());
        execute_init(&ctx, true).unwrap();
    }
}
