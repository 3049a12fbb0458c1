use std::env;

use config::{Config, ConfigError, Environment, File};
use glob::glob;
use serde_derive::Deserialize;
use tracing::debug;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_REPO: &str = "staticaland/daggers";
pub const DEFAULT_TABLE: &str = "issues";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Github {
    pub token: String,
    pub repo: String,
}

impl Default for Github {
    fn default() -> Self {
        Self {
            token: String::new(),
            repo: DEFAULT_REPO.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct OpenAi {
    pub api_key: String,
    pub model: String,
}

impl Default for OpenAi {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Supabase {
    pub url: String,
    pub key: String,
    pub table: String,
}

impl Default for Supabase {
    fn default() -> Self {
        Self {
            url: String::new(),
            key: String::new(),
            table: DEFAULT_TABLE.to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub github: Github,
    pub openai: OpenAi,
    pub supabase: Supabase,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let cwd = match env::current_dir() {
            Ok(cwd) => cwd.display().to_string(),
            Err(_) => ".".to_string(),
        };

        debug!(
            "Looking for configuration file {cwd}/config and/or configuration files in {cwd}{}",
            "/config/"
        );

        let config = Config::builder()
            .add_source(File::with_name(&format!("{cwd}/config")).required(false))
            .add_source(
                glob(&format!("{cwd}/config/*"))
                    .unwrap()
                    .map(|path| File::from(path.unwrap()))
                    .collect::<Vec<_>>(),
            )
            .add_source(Environment::with_prefix("ISSUEBOT").separator("__"))
            .build()?;

        let mut settings: Settings = config.try_deserialize()?;
        settings.apply_env_overrides();

        Ok(settings)
    }

    // The canonical variable names win over anything the config files set.
    fn apply_env_overrides(&mut self) {
        if let Ok(token) = env::var("GITHUB_TOKEN") {
            self.github.token = token;
        }
        if let Ok(key) = env::var("OPENAI_API_KEY") {
            self.openai.api_key = key;
        }
        if let Ok(url) = env::var("SUPABASE_URL") {
            self.supabase.url = url;
        }
        if let Ok(key) = env::var("SUPABASE_KEY") {
            self.supabase.key = key;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let settings = Settings::default();

        assert!(settings.github.token.is_empty());
        assert_eq!(settings.github.repo, DEFAULT_REPO);
        assert_eq!(settings.openai.model, DEFAULT_MODEL);
        assert_eq!(settings.supabase.table, DEFAULT_TABLE);
        assert!(settings.supabase.url.is_empty());
    }

    #[test]
    fn sections_deserialize_from_partial_config() {
        let config = Config::builder()
            .add_source(File::from_str(
                r#"
                [github]
                repo = "seqre/issuebot"

                [openai]
                api_key = "sk-test"
                "#,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap();

        let settings: Settings = config.try_deserialize().unwrap();

        assert_eq!(settings.github.repo, "seqre/issuebot");
        assert_eq!(settings.openai.api_key, "sk-test");
        // untouched sections keep their defaults
        assert_eq!(settings.openai.model, DEFAULT_MODEL);
        assert_eq!(settings.supabase.table, DEFAULT_TABLE);
    }
}
