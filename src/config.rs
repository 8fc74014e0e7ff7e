//! Configuration for the outreach site core.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (OUTREACH_BACKEND_URL, OUTREACH_ANON_KEY)
//! 2. Config file (.outreach/config.yaml)
//! 3. Defaults
//!
//! Config file discovery:
//! - Searches current directory and parents for .outreach/config.yaml
//! - Falls back to ~/.outreach/config.yaml

use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::adapters::TableConfig;
use crate::browse::LIBRARY_PAGE_SIZE;
use crate::forms::{CONTACT_ACK, VOLUNTEER_ACK};
use crate::reveal::{RootMargin, DEFAULT_LAZY_MARGIN_PX};

pub const ENV_BACKEND_URL: &str = "OUTREACH_BACKEND_URL";
pub const ENV_ANON_KEY: &str = "OUTREACH_ANON_KEY";

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub library: Option<LibraryConfig>,
    #[serde(default)]
    pub questions: Option<QuestionsConfig>,
    #[serde(default)]
    pub forms: Option<FormsConfig>,
    #[serde(default)]
    pub reveal: Option<RevealConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendConfig {
    pub url: Option<String>,
    pub anon_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// Cards per display page
    pub page_size: Option<usize>,
    /// Records per backend request
    pub fetch_page_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuestionsConfig {
    pub fetch_page_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FormsConfig {
    pub contact_ack_seconds: Option<u64>,
    pub volunteer_ack_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RevealConfig {
    pub lazy_margin_px: Option<f64>,
}

/// Resolved configuration
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Backend connection (None when no URL is configured anywhere)
    pub backend: Option<TableConfig>,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
    pub library: LibrarySettings,
    pub questions: QuestionsSettings,
    pub forms: FormSettings,
    pub reveal: RevealSettings,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LibrarySettings {
    pub page_size: usize,
    pub fetch_page_size: usize,
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            page_size: LIBRARY_PAGE_SIZE,
            fetch_page_size: LIBRARY_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuestionsSettings {
    pub fetch_page_size: usize,
}

impl Default for QuestionsSettings {
    fn default() -> Self {
        Self { fetch_page_size: 100 }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormSettings {
    pub contact_ack: Duration,
    pub volunteer_ack: Duration,
}

impl Default for FormSettings {
    fn default() -> Self {
        Self {
            contact_ack: CONTACT_ACK,
            volunteer_ack: VOLUNTEER_ACK,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RevealSettings {
    pub lazy_margin_px: f64,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            lazy_margin_px: DEFAULT_LAZY_MARGIN_PX,
        }
    }
}

impl RevealSettings {
    /// Observer margin for lazy media players
    pub fn lazy_margin(&self) -> RootMargin {
        RootMargin::vertical_px(self.lazy_margin_px)
    }
}

impl ResolvedConfig {
    /// Backend settings, or an error explaining how to provide them
    pub fn require_backend(&self) -> Result<&TableConfig> {
        self.backend.as_ref().with_context(|| {
            format!(
                "No backend configured. Set {} and {} or add a backend section to .outreach/config.yaml",
                ENV_BACKEND_URL, ENV_ANON_KEY
            )
        })
    }
}

/// Find config file by searching `start` and its parents
fn find_config_file(start: &Path) -> Option<PathBuf> {
    let mut current = start.to_path_buf();

    loop {
        let config_path = current.join(".outreach").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Per-user config file, if present
fn user_config_file() -> Option<PathBuf> {
    let path = dirs::home_dir()?.join(".outreach").join("config.yaml");
    path.exists().then_some(path)
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Merge a parsed file (if any) with environment overrides
fn resolve(
    file: Option<ConfigFile>,
    config_file: Option<PathBuf>,
    env_url: Option<String>,
    env_key: Option<String>,
) -> Result<ResolvedConfig> {
    let file_backend = file.as_ref().map(|f| f.backend.clone()).unwrap_or_default();

    let url = env_url.or(file_backend.url);
    let anon_key = env_key.or(file_backend.anon_key).unwrap_or_default();
    let backend = url.map(|url| TableConfig {
        url,
        anon_key,
        timeout_seconds: file_backend.timeout_seconds.unwrap_or(10),
    });

    let Some(file) = file else {
        return Ok(ResolvedConfig {
            backend,
            config_file,
            library: LibrarySettings::default(),
            questions: QuestionsSettings::default(),
            forms: FormSettings::default(),
            reveal: RevealSettings::default(),
        });
    };

    let library = LibrarySettings {
        page_size: file
            .library
            .as_ref()
            .and_then(|l| l.page_size)
            .unwrap_or(LIBRARY_PAGE_SIZE),
        fetch_page_size: file
            .library
            .as_ref()
            .and_then(|l| l.fetch_page_size)
            .unwrap_or(LIBRARY_PAGE_SIZE),
    };

    let questions = QuestionsSettings {
        fetch_page_size: file
            .questions
            .as_ref()
            .and_then(|q| q.fetch_page_size)
            .unwrap_or(100),
    };

    let forms = FormSettings {
        contact_ack: file
            .forms
            .as_ref()
            .and_then(|f| f.contact_ack_seconds)
            .map(Duration::from_secs)
            .unwrap_or(CONTACT_ACK),
        volunteer_ack: file
            .forms
            .as_ref()
            .and_then(|f| f.volunteer_ack_seconds)
            .map(Duration::from_secs)
            .unwrap_or(VOLUNTEER_ACK),
    };

    if library.fetch_page_size == 0 {
        bail!("library.fetch_page_size must be at least 1");
    }
    if questions.fetch_page_size == 0 {
        bail!("questions.fetch_page_size must be at least 1");
    }

    let reveal = RevealSettings {
        lazy_margin_px: file
            .reveal
            .as_ref()
            .and_then(|r| r.lazy_margin_px)
            .unwrap_or(DEFAULT_LAZY_MARGIN_PX),
    };

    Ok(ResolvedConfig {
        backend,
        config_file,
        library,
        questions,
        forms,
        reveal,
    })
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    load_config_from(&cwd)
}

fn load_config_from(start: &Path) -> Result<ResolvedConfig> {
    let config_file = find_config_file(start).or_else(user_config_file);
    let file = config_file.as_deref().map(load_config_file).transpose()?;
    let source = config_file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "defaults".to_string());

    resolve(
        file,
        config_file,
        std::env::var(ENV_BACKEND_URL).ok(),
        std::env::var(ENV_ANON_KEY).ok(),
    )
    .with_context(|| format!("Invalid configuration in {}", source))
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| format!("{:#}", e)));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_config(dir: &Path, body: &str) -> PathBuf {
        let outreach_dir = dir.join(".outreach");
        std::fs::create_dir_all(&outreach_dir).unwrap();

        let config_path = outreach_dir.join("config.yaml");
        let mut file = std::fs::File::create(&config_path).unwrap();
        writeln!(file, "{}", body).unwrap();
        config_path
    }

    #[test]
    fn test_defaults_without_file() {
        let config = resolve(None, None, None, None).unwrap();

        assert!(config.backend.is_none());
        assert!(config.require_backend().is_err());
        assert_eq!(config.library, LibrarySettings::default());
        assert_eq!(config.library.page_size, 12);
        assert_eq!(config.questions.fetch_page_size, 100);
        assert_eq!(config.forms.contact_ack, Duration::from_secs(5));
        assert_eq!(config.forms.volunteer_ack, Duration::from_secs(4));
        assert_eq!(config.reveal.lazy_margin_px, 200.0);
        assert_eq!(config.reveal.lazy_margin(), RootMargin::vertical_px(200.0));
    }

    #[test]
    fn test_config_file_parsing() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(
            temp.path(),
            r#"
version: "1.0"
backend:
  url: https://demo.supabase.co
  anon_key: public-anon
  timeout_seconds: 3
library:
  page_size: 6
questions:
  fetch_page_size: 50
forms:
  contact_ack_seconds: 8
reveal:
  lazy_margin_px: 50
"#,
        );

        let file = load_config_file(&config_path).unwrap();
        assert_eq!(file.version, "1.0");

        let config = resolve(Some(file), Some(config_path), None, None).unwrap();
        let backend = config.require_backend().unwrap();
        assert_eq!(backend.url, "https://demo.supabase.co");
        assert_eq!(backend.anon_key, "public-anon");
        assert_eq!(backend.timeout_seconds, 3);
        assert_eq!(config.library.page_size, 6);
        assert_eq!(config.library.fetch_page_size, 12);
        assert_eq!(config.questions.fetch_page_size, 50);
        assert_eq!(config.forms.contact_ack, Duration::from_secs(8));
        assert_eq!(config.forms.volunteer_ack, Duration::from_secs(4));
        assert_eq!(config.reveal.lazy_margin(), RootMargin::vertical_px(50.0));
    }

    #[test]
    fn test_env_overrides_file() {
        let file: ConfigFile = serde_yaml::from_str(
            r#"
version: "1.0"
backend:
  url: https://from-file.example
  anon_key: file-key
"#,
        )
        .unwrap();

        let config = resolve(
            Some(file),
            None,
            Some("https://from-env.example".to_string()),
            None,
        )
        .unwrap();
        let backend = config.backend.unwrap();
        assert_eq!(backend.url, "https://from-env.example");
        assert_eq!(backend.anon_key, "file-key");
    }

    #[test]
    fn test_discovers_config_in_parent() {
        let temp = TempDir::new().unwrap();
        write_config(temp.path(), "version: \"1.0\"\nlibrary:\n  page_size: 9\n");
        let nested = temp.path().join("site").join("pages");
        std::fs::create_dir_all(&nested).unwrap();

        let found = find_config_file(&nested).unwrap();
        assert_eq!(found, temp.path().join(".outreach").join("config.yaml"));

        let config = load_config_from(&nested).unwrap();
        assert_eq!(config.library.page_size, 9);
    }

    #[test]
    fn test_zero_fetch_size_is_rejected() {
        let temp = TempDir::new().unwrap();
        write_config(
            temp.path(),
            "version: \"1.0\"\nquestions:\n  fetch_page_size: 0\n",
        );

        let err = load_config_from(temp.path()).unwrap_err();
        let message = format!("{:#}", err);
        assert!(message.contains("Invalid configuration"));
        assert!(message.contains("questions.fetch_page_size must be at least 1"));
    }

    #[test]
    fn test_malformed_file_reports_path() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "library: [not, a, map]");

        let err = load_config_file(&config_path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
