use std::{env, str::FromStr, time::Duration};

use axum::http::HeaderValue;

use crate::provider::{ModelSelection, SpeechSettings};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} environment variable must be set")]
    Missing(&'static str),
    #[error("{name} has an invalid value: {value:?}")]
    Invalid { name: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitSettings {
    pub max_requests: usize,
    pub window: Duration,
}

impl Default for RateLimitSettings {
    fn default() -> Self {
        Self { max_requests: 100, window: Duration::from_secs(15 * 60) }
    }
}

/// Process configuration, built once at startup and handed to the server.
#[derive(Clone)]
pub struct Config {
    pub api_key: Box<str>,
    pub provider_url: Box<str>,
    pub port: u16,
    pub frontend_origin: HeaderValue,
    pub models: ModelSelection,
    pub query_max_tokens: u32,
    pub request_timeout: Duration,
    pub rate_limit: RateLimitSettings,
    pub speech: SpeechSettings,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("provider_url", &self.provider_url)
            .field("port", &self.port)
            .field("frontend_origin", &self.frontend_origin)
            .field("models", &self.models)
            .field("query_max_tokens", &self.query_max_tokens)
            .field("request_timeout", &self.request_timeout)
            .field("rate_limit", &self.rate_limit)
            .field("speech", &self.speech)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).map(|value| value.trim().to_owned()).filter(|v| !v.is_empty());

        let api_key = var("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;

        let frontend_origin = var("FRONTEND_ORIGIN").unwrap_or_else(|| "http://localhost:8080".into());
        let frontend_origin = HeaderValue::from_str(&frontend_origin)
            .map_err(|_| ConfigError::Invalid { name: "FRONTEND_ORIGIN", value: frontend_origin.clone() })?;

        let default_speech = SpeechSettings::default();
        let speed: f32 = parse(&var, "TTS_SPEED", default_speech.speed)?;
        if !(0.25..=4.0).contains(&speed) {
            return Err(ConfigError::Invalid { name: "TTS_SPEED", value: speed.to_string() });
        }

        Ok(Self {
            api_key: api_key.into(),
            provider_url: var("OPENAI_BASE_URL")
                .unwrap_or_else(|| "https://api.openai.com".into())
                .trim_end_matches('/')
                .into(),
            port: parse(&var, "PORT", 3001)?,
            frontend_origin,
            models: ModelSelection {
                text: var("TEXT_MODEL").unwrap_or_else(|| "gpt-4o-mini".into()).into(),
                vision: var("VISION_MODEL").unwrap_or_else(|| "gpt-4o".into()).into(),
            },
            query_max_tokens: parse(&var, "QUERY_MAX_TOKENS", 500)?,
            request_timeout: Duration::from_secs(parse(&var, "REQUEST_TIMEOUT_SECS", 60)?),
            rate_limit: RateLimitSettings {
                max_requests: parse(&var, "RATE_LIMIT_MAX", 100)?,
                window: Duration::from_secs(parse(&var, "RATE_LIMIT_WINDOW_SECS", 15 * 60)?),
            },
            speech: SpeechSettings {
                model: var("TTS_MODEL").map(Into::into).unwrap_or(default_speech.model),
                voice: var("TTS_VOICE").map(Into::into).unwrap_or(default_speech.voice),
                speed,
            },
        })
    }
}

fn parse<T: FromStr>(
    var: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match var(name) {
        None => Ok(default),
        Some(value) => value.parse().map_err(|_| ConfigError::Invalid { name, value }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn api_key_is_required() {
        assert!(matches!(config_from(&[]), Err(ConfigError::Missing("OPENAI_API_KEY"))));
        assert!(matches!(
            config_from(&[("OPENAI_API_KEY", "  ")]),
            Err(ConfigError::Missing("OPENAI_API_KEY"))
        ));
    }

    #[test]
    fn defaults_apply() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-test")]).unwrap();
        assert_eq!(&*config.api_key, "sk-test");
        assert_eq!(config.port, 3001);
        assert_eq!(&*config.provider_url, "https://api.openai.com");
        assert_eq!(config.rate_limit, RateLimitSettings::default());
        assert_eq!(config.query_max_tokens, 500);
        assert_eq!(config.speech, SpeechSettings::default());
        assert_eq!(&*config.models.vision, "gpt-4o");
    }

    #[test]
    fn overrides_are_parsed() {
        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-test"),
            ("PORT", "8000"),
            ("OPENAI_BASE_URL", "http://localhost:9000/"),
            ("RATE_LIMIT_MAX", "5"),
            ("REQUEST_TIMEOUT_SECS", "10"),
            ("TTS_VOICE", "shimmer"),
        ])
        .unwrap();
        assert_eq!(config.port, 8000);
        assert_eq!(&*config.provider_url, "http://localhost:9000");
        assert_eq!(config.rate_limit.max_requests, 5);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
        assert_eq!(&*config.speech.voice, "shimmer");
    }

    #[test]
    fn invalid_numbers_are_reported() {
        let result = config_from(&[("OPENAI_API_KEY", "sk-test"), ("PORT", "eighty")]);
        assert!(matches!(result, Err(ConfigError::Invalid { name: "PORT", .. })));
    }

    #[test]
    fn debug_output_hides_api_key() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-very-secret")]).unwrap();
        assert!(!format!("{config:?}").contains("sk-very-secret"));
    }
}
