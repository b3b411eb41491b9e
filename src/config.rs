// ABOUTME: Configuration module for the slide-site application
// ABOUTME: Provides site layout, encryption settings and environment variable handling

use crate::site::encrypt::StaticryptOptions;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_PASSWORD_LENGTH: usize = 16;
pub const DEFAULT_REMEMBER_DAYS: u32 = 7;

/// Global configuration for the application
#[derive(Debug, Clone)]
pub struct Config {
    /// Site root; staticrypt runs here and keeps its `.staticrypt.json` salt here
    pub site_root: PathBuf,
    /// Source tree holding markdown, HTML and other files
    pub src_dir: PathBuf,
    /// Output tree served as the static site
    pub docs_dir: PathBuf,
    /// Shared stylesheets, copied into the output as `assets/`
    pub assets_dir: PathBuf,
    /// JSON password book, one password per encrypted file
    pub passwords_file: PathBuf,
    /// Directory staticrypt writes its results to
    pub staging_dir: PathBuf,
    pub password_length: usize,
    pub embed_resources: bool,
    pub staticrypt: StaticryptOptions,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            site_root: PathBuf::from("."),
            src_dir: PathBuf::from("src"),
            docs_dir: PathBuf::from("docs"),
            assets_dir: PathBuf::from("assets"),
            passwords_file: PathBuf::from("passwords.json"),
            staging_dir: PathBuf::from("encrypted"),
            password_length: DEFAULT_PASSWORD_LENGTH,
            embed_resources: true,
            staticrypt: StaticryptOptions::default(),
        }
    }
}

impl Config {
    /// Create a new configuration instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let path_var = |name: &str, default: PathBuf| {
            env::var(name)
                .ok()
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or(default)
        };

        let password_length = env::var("PASSWORD_LENGTH")
            .ok()
            .and_then(|s| s.parse::<usize>().ok())
            .filter(|len| *len > 0)
            .unwrap_or(DEFAULT_PASSWORD_LENGTH);
        let embed_resources = env::var("EMBED_RESOURCES")
            .ok()
            .map(|s| s.to_lowercase() != "false")
            .unwrap_or(true);

        let mut staticrypt = defaults.staticrypt.clone();
        if let Ok(program) = env::var("STATICRYPT_PATH") {
            if !program.is_empty() {
                staticrypt.program = program;
            }
        }
        if let Some(days) = env::var("STATICRYPT_REMEMBER_DAYS")
            .ok()
            .and_then(|s| s.parse::<u32>().ok())
        {
            staticrypt.remember_days = days;
        }

        Self {
            site_root: path_var("SITE_ROOT", defaults.site_root),
            src_dir: path_var("SITE_SRC_DIR", defaults.src_dir),
            docs_dir: path_var("SITE_DOCS_DIR", defaults.docs_dir),
            assets_dir: path_var("SITE_ASSETS_DIR", defaults.assets_dir),
            passwords_file: path_var("SITE_PASSWORDS_FILE", defaults.passwords_file),
            staging_dir: path_var("SITE_STAGING_DIR", defaults.staging_dir),
            password_length,
            embed_resources,
            staticrypt,
        }
    }

    /// Stylesheet embedded into rendered markdown pages
    pub fn markdown_css(&self) -> PathBuf {
        self.assets_dir.join("md_style.css")
    }

    /// Stylesheet embedded into the directory page
    pub fn index_css(&self) -> PathBuf {
        self.assets_dir.join("index.css")
    }

    /// Incremental build cache inside the output tree
    pub fn cache_file(&self) -> PathBuf {
        self.docs_dir.join(".build_cache")
    }

    /// Rebase every path of this configuration onto `root`
    pub fn rooted_at(mut self, root: &std::path::Path) -> Self {
        self.site_root = root.to_path_buf();
        self.src_dir = root.join(&self.src_dir);
        self.docs_dir = root.join(&self.docs_dir);
        self.assets_dir = root.join(&self.assets_dir);
        self.passwords_file = root.join(&self.passwords_file);
        self.staging_dir = root.join(&self.staging_dir);
        self
    }
}
