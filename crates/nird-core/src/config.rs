use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub const DEFAULT_THRESHOLD: f64 = 0.12;
pub const DEFAULT_BOOST: f64 = 0.18;
pub const DEFAULT_MAX_CONTEXT_CHARS: usize = 600;

pub const DEFAULT_STRONG_TERMS: &[&str] = &[
    "linux",
    "reconditionnement",
    "nird",
    "primtux",
    "tchap",
    "écologique",
    "libre",
    "inclusif",
    "durable",
    "obsolescence",
    "forge",
];

pub const DEFAULT_FALLBACK_TEXT: &str = "La démarche NIRD promeut un numérique Inclusif, Responsable et Durable dans les établissements scolaires via Linux, le reconditionnement et les logiciels libres.";
pub const DEFAULT_FALLBACK_URL: &str = "https://nird.forge.apps.education.fr/";
pub const DEFAULT_FALLBACK_TITLE: &str = "Accueil";

/// How the strong-term bonus is distributed over candidate chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoostPolicy {
    /// Every matching keyword in the question adds the bonus to every chunk.
    #[default]
    Uniform,
    /// A matching keyword only boosts chunks whose terms contain it.
    ChunkAware,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    pub dataset_path: String,
    pub raw_txt_dir: String,
    pub export_dir: String,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            dataset_path: "larousse_tokens.json".to_string(),
            raw_txt_dir: "data/txt".to_string(),
            export_dir: "data/output".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineSettings {
    pub threshold: f64,
    pub boost: f64,
    pub max_context_chars: usize,
    pub strong_terms: Vec<String>,
    /// Replaces the built-in French stopword list when set.
    pub stopwords: Option<Vec<String>>,
    pub boost_policy: BoostPolicy,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            boost: DEFAULT_BOOST,
            max_context_chars: DEFAULT_MAX_CONTEXT_CHARS,
            strong_terms: DEFAULT_STRONG_TERMS.iter().map(|s| s.to_string()).collect(),
            stopwords: None,
            boost_policy: BoostPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    pub chunk_size: usize,
    pub chunk_overlap: usize,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self { chunk_size: 500, chunk_overlap: 50 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self { host: "127.0.0.1".to_string(), port: 8000 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackSettings {
    pub text: String,
    pub source_url: String,
    pub source_title: String,
}

impl Default for FallbackSettings {
    fn default() -> Self {
        Self {
            text: DEFAULT_FALLBACK_TEXT.to_string(),
            source_url: DEFAULT_FALLBACK_URL.to_string(),
            source_title: DEFAULT_FALLBACK_TITLE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub data: DataSettings,
    pub engine: EngineSettings,
    pub chunking: ChunkingSettings,
    pub server: ServerSettings,
    pub fallback: FallbackSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<()> {
        let engine = &self.engine;
        if !(0.0..1.0).contains(&engine.threshold) {
            return Err(Error::InvalidConfig(format!(
                "engine.threshold must be in [0, 1), got {}",
                engine.threshold
            )));
        }
        if !engine.boost.is_finite() || engine.boost < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "engine.boost must be a non-negative number, got {}",
                engine.boost
            )));
        }
        if engine.max_context_chars == 0 {
            return Err(Error::InvalidConfig("engine.max_context_chars must be > 0".to_string()));
        }
        if self.chunking.chunk_size == 0 {
            return Err(Error::InvalidConfig("chunking.chunk_size must be > 0".to_string()));
        }
        if self.chunking.chunk_overlap >= self.chunking.chunk_size {
            return Err(Error::InvalidConfig(format!(
                "chunking.chunk_overlap ({}) must be smaller than chunking.chunk_size ({})",
                self.chunking.chunk_overlap, self.chunking.chunk_size
            )));
        }
        Ok(())
    }
}

pub struct Config {
    figment: Figment,
    settings: Settings,
    base_dir: PathBuf,
}

impl Config {
    /// Load from the current working directory, environment picked from `RUST_ENV`.
    pub fn load() -> anyhow::Result<Self> {
        let base = env::current_dir()?;
        Self::load_in(&base)
    }

    pub fn load_in(base_dir: &Path) -> anyhow::Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
        Self::load_for_env(base_dir, &env_name)
    }

    pub fn load_for_env(base_dir: &Path, env_name: &str) -> anyhow::Result<Self> {
        let mut figment = Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(base_dir.join("config.toml")));
        match env_name {
            "dev" | "development" => figment = figment.merge(Toml::file(base_dir.join("config.dev.toml"))),
            "prod" | "production" => figment = figment.merge(Toml::file(base_dir.join("config.prod.toml"))),
            "test" | "testing" => figment = figment.merge(Toml::file(base_dir.join("config.test.toml"))),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));

        let settings: Settings = figment
            .extract()
            .map_err(|e| anyhow::anyhow!("Failed to load configuration: {}", e))?;
        settings.validate()?;
        tracing::debug!(env = env_name, base = %base_dir.display(), "configuration loaded");

        Ok(Self { figment, settings, base_dir: base_dir.to_path_buf() })
    }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve a configured path against the directory the config was loaded from.
    pub fn resolve<S: AsRef<str>>(&self, p: S) -> PathBuf {
        resolve_with_base(&self.base_dir, p)
    }

    pub fn dataset_path(&self) -> PathBuf {
        self.resolve(&self.settings.data.dataset_path)
    }
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}

/// Resolve a possibly relative path against a given base directory after expansion.
/// If `p` is absolute, it's returned as-is; otherwise `base.join(p)` is returned.
pub fn resolve_with_base<S: AsRef<str>>(base: &Path, p: S) -> PathBuf {
    let p = expand_path(p);
    if p.is_absolute() { p } else { base.join(p) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().expect("defaults validate");
        assert_eq!(settings.engine.threshold, 0.12);
        assert_eq!(settings.engine.boost, 0.18);
        assert_eq!(settings.engine.max_context_chars, 600);
        assert_eq!(settings.engine.strong_terms.len(), DEFAULT_STRONG_TERMS.len());
        assert_eq!(settings.engine.boost_policy, BoostPolicy::Uniform);
    }

    #[test]
    fn overlap_must_be_smaller_than_chunk_size() {
        let mut settings = Settings::default();
        settings.chunking.chunk_overlap = settings.chunking.chunk_size;
        assert!(matches!(settings.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn threshold_out_of_range_is_rejected() {
        let mut settings = Settings::default();
        settings.engine.threshold = 1.5;
        assert!(settings.validate().is_err());
        settings.engine.threshold = -0.1;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn resolve_keeps_absolute_paths() {
        let base = Path::new("/srv/nird");
        assert_eq!(resolve_with_base(base, "/data/x.json"), PathBuf::from("/data/x.json"));
        assert_eq!(resolve_with_base(base, "x.json"), PathBuf::from("/srv/nird/x.json"));
    }
}
