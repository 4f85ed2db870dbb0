use serde::Deserialize;

pub const DEFAULT_DRIVER: &str = "chatgpt";
pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;
pub const DEFAULT_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AilocConfig {
    pub driver: Option<String>,
    pub source_lang: Option<String>,
    pub target_langs: Option<Vec<String>>,
    pub lang_dirs: Option<Vec<String>>,
    pub include_patterns: Option<Vec<String>>,
    pub exclude_patterns: Option<Vec<String>>,
    pub chatgpt: Option<ChatGptCfg>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ChatGptCfg {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub api_url: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl AilocConfig {
    pub fn driver(&self) -> &str {
        self.driver.as_deref().unwrap_or(DEFAULT_DRIVER)
    }

    pub fn lang_dirs(&self) -> Vec<String> {
        self.lang_dirs
            .clone()
            .unwrap_or_else(|| vec!["lang".into(), "resources/lang".into()])
    }

    pub fn include_patterns(&self) -> Vec<String> {
        self.include_patterns
            .clone()
            .unwrap_or_else(|| vec!["*.json".into(), "*.php".into()])
    }

    pub fn exclude_patterns(&self) -> Vec<String> {
        self.exclude_patterns
            .clone()
            .unwrap_or_else(|| vec!["vendor/**".into(), "node_modules/**".into()])
    }

    /// Backend credential: the config file wins, the conventional
    /// environment variable is the fallback.
    pub fn api_key(&self) -> Option<String> {
        self.chatgpt
            .as_ref()
            .and_then(|c| c.api_key.clone())
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty()))
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        source: toml::de::Error,
    },
}

/// Search order: CWD/ailoc.toml, then $HOME/.config/ailoc/ailoc.toml.
/// Earlier files win field-by-field; a missing file is not an error.
pub fn load_config() -> Result<AilocConfig, ConfigError> {
    let mut merged = AilocConfig::default();
    if let Ok(cwd) = std::env::current_dir() {
        merged = merge(merged, load_file(&cwd.join("ailoc.toml"))?);
    }
    if let Some(base) = dirs::config_dir() {
        merged = merge(merged, load_file(&base.join("ailoc").join("ailoc.toml"))?);
    }
    Ok(merged)
}

fn load_file(path: &std::path::Path) -> Result<AilocConfig, ConfigError> {
    match std::fs::read_to_string(path) {
        Ok(s) => toml::from_str(&s).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        }),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AilocConfig::default()),
        Err(source) => Err(ConfigError::Read {
            path: path.display().to_string(),
            source,
        }),
    }
}

fn merge(mut a: AilocConfig, b: AilocConfig) -> AilocConfig {
    if a.driver.is_none() {
        a.driver = b.driver;
    }
    if a.source_lang.is_none() {
        a.source_lang = b.source_lang;
    }
    if a.target_langs.is_none() {
        a.target_langs = b.target_langs;
    }
    if a.lang_dirs.is_none() {
        a.lang_dirs = b.lang_dirs;
    }
    if a.include_patterns.is_none() {
        a.include_patterns = b.include_patterns;
    }
    if a.exclude_patterns.is_none() {
        a.exclude_patterns = b.exclude_patterns;
    }
    a.chatgpt = merge_opt(a.chatgpt, b.chatgpt, merge_chatgpt);
    a
}

fn merge_opt<T: Default>(a: Option<T>, b: Option<T>, f: fn(T, T) -> T) -> Option<T> {
    match (a, b) {
        (Some(a), Some(b)) => Some(f(a, b)),
        (None, Some(b)) => Some(b),
        (Some(a), None) => Some(a),
        (None, None) => None,
    }
}

fn merge_chatgpt(mut a: ChatGptCfg, b: ChatGptCfg) -> ChatGptCfg {
    if a.api_key.is_none() {
        a.api_key = b.api_key;
    }
    if a.model.is_none() {
        a.model = b.model;
    }
    if a.temperature.is_none() {
        a.temperature = b.temperature;
    }
    if a.api_url.is_none() {
        a.api_url = b.api_url;
    }
    if a.timeout_secs.is_none() {
        a.timeout_secs = b.timeout_secs;
    }
    a
}
