use std::fmt;

use serde::Deserialize;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_ENDPOINT: &str = "OPENAI_ENDPOINT";
pub const ENV_MODEL: &str = "OPENAI_MODEL";

/// On-disk config. Keys match the JSON the mod and middleware always read;
/// anything else in the file is ignored.
#[derive(Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub openai_api_key: Option<String>,
    #[serde(default)]
    pub openai_endpoint: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
}

impl fmt::Debug for ConfigFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigFile")
            .field("openai_api_key", &redact(&self.openai_api_key))
            .field("openai_endpoint", &self.openai_endpoint)
            .field("model", &self.model)
            .finish()
    }
}

/// Values given explicitly by the embedding program (CLI flags, a settings
/// panel). They win over everything else.
#[derive(Clone, Default)]
pub struct ConfigOverrides {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub model: Option<String>,
}

/// Resolved client settings. `endpoint` and `model` are never empty;
/// `api_key` may be missing, in which case the client only answers with a
/// "not configured" notice.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_key: Option<String>,
    endpoint: String,
    model: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ClientConfig {
    /// Builds a config directly. Blank values fall back to the defaults.
    pub fn new(api_key: Option<String>, endpoint: Option<String>, model: Option<String>) -> Self {
        Self {
            api_key: non_empty(api_key),
            endpoint: non_empty(endpoint).unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            model: non_empty(model).unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    /// Per field: override, then environment, then config file, then default.
    /// Empty strings count as absent at every level.
    pub fn resolve<E>(overrides: &ConfigOverrides, env: E, file: Option<&ConfigFile>) -> Self
    where
        E: Fn(&str) -> Option<String>,
    {
        let pick = |explicit: &Option<String>, var: &str, from_file: Option<&Option<String>>| {
            non_empty(explicit.clone())
                .or_else(|| non_empty(env(var)))
                .or_else(|| from_file.and_then(|v| non_empty(v.clone())))
        };

        Self::new(
            pick(&overrides.api_key, ENV_API_KEY, file.map(|f| &f.openai_api_key)),
            pick(&overrides.endpoint, ENV_ENDPOINT, file.map(|f| &f.openai_endpoint)),
            pick(&overrides.model, ENV_MODEL, file.map(|f| &f.model)),
        )
    }

    /// [`ClientConfig::resolve`] against the process environment.
    pub fn from_process_env(overrides: &ConfigOverrides, file: Option<&ConfigFile>) -> Self {
        Self::resolve(overrides, |var| std::env::var(var).ok(), file)
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &redact(&self.api_key))
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn redact(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "<redacted>"
    } else {
        "<unset>"
    }
}
