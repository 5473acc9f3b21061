//! Model presentation lookups: display names, organizations and logos.
//!
//! Each lookup is a [`ModelLookup`] so exports can swap in stub tables.
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use crate::error::{BenchError, Result};

const DEFAULT_MODEL_DATA: &str = include_str!("../data/models.json");

/// Organization reported when no heuristic matches.
pub const UNKNOWN_COMPANY: &str = "Unknown";

/// Resolve an identifier to a presentation value, if one is known.
pub trait ModelLookup {
    fn resolve(&self, identifier: &str) -> Option<String>;
}

impl<F> ModelLookup for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, identifier: &str) -> Option<String> {
        self(identifier)
    }
}

/// Display-name and logo tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PresentationConfig {
    #[serde(default)]
    pub nice_names: BTreeMap<String, String>,
    #[serde(default)]
    pub logos: BTreeMap<String, String>,
}

impl PresentationConfig {
    #[must_use]
    pub fn load_from_static() -> Self {
        serde_json::from_str(DEFAULT_MODEL_DATA).unwrap_or_default()
    }

    #[must_use]
    pub fn default_config() -> &'static Self {
        static CONFIG: OnceLock<PresentationConfig> = OnceLock::new();
        CONFIG.get_or_init(Self::load_from_static)
    }

    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into presentation tables.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Built-in tables extended (and overridden) by the tables in `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_overrides(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| BenchError::io(path, source))?;
        let overrides = Self::from_json(&text).map_err(|source| BenchError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::default_config().clone().merged(overrides))
    }

    #[must_use]
    pub fn merged(mut self, overrides: Self) -> Self {
        self.nice_names.extend(overrides.nice_names);
        self.logos.extend(overrides.logos);
        self
    }
}

/// Exact display-name table, tolerant of case, `:` separators and spaces.
#[derive(Debug, Clone, Default)]
pub struct NiceNames {
    names: BTreeMap<String, String>,
}

impl NiceNames {
    #[must_use]
    pub const fn new(names: BTreeMap<String, String>) -> Self {
        Self { names }
    }
}

impl ModelLookup for NiceNames {
    fn resolve(&self, identifier: &str) -> Option<String> {
        let key = identifier.trim();
        let lower = key.to_lowercase();
        let normalized = key.replace(':', "/").replace(' ', "").to_lowercase();
        [key, lower.as_str(), normalized.as_str()]
            .into_iter()
            .find_map(|candidate| self.names.get(candidate).cloned())
    }
}

/// Substring heuristics mapping a model id to its organization.
#[derive(Debug, Clone, Copy, Default)]
pub struct CompanyClassifier;

impl CompanyClassifier {
    fn openai_short_name() -> Option<&'static Regex> {
        static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
        PATTERN.get_or_init(|| Regex::new(r"^o\d-?").ok()).as_ref()
    }
}

impl ModelLookup for CompanyClassifier {
    fn resolve(&self, identifier: &str) -> Option<String> {
        let m = identifier.to_lowercase();
        let has = |needles: &[&str]| needles.iter().any(|needle| m.contains(needle));
        let is_openai_short = Self::openai_short_name().is_some_and(|re| re.is_match(&m));

        let company = if has(&["gpt", "openai"]) || is_openai_short {
            "OpenAI"
        } else if has(&["claude", "anthropic"]) {
            "Anthropic"
        } else if has(&["gemini", "palm", "bison", "google"]) {
            "Google"
        } else if has(&["grok", "xai"]) {
            "xAI"
        } else if has(&["llama", "meta"]) {
            "Meta"
        } else if has(&["mistral", "mixtral"]) {
            "Mistral"
        } else if has(&["qwen", "ali"]) {
            "Alibaba"
        } else if has(&["deepseek"]) {
            "DeepSeek"
        } else if has(&["reka"]) {
            "Reka"
        } else if has(&["cohere", "command"]) {
            "Cohere"
        } else if has(&["phi"]) {
            "Microsoft"
        } else {
            return None;
        };
        Some(company.to_string())
    }
}

/// Organization to logo URL.
#[derive(Debug, Clone, Default)]
pub struct LogoTable {
    logos: BTreeMap<String, String>,
}

impl LogoTable {
    #[must_use]
    pub const fn new(logos: BTreeMap<String, String>) -> Self {
        Self { logos }
    }
}

impl ModelLookup for LogoTable {
    fn resolve(&self, identifier: &str) -> Option<String> {
        self.logos
            .get(identifier)
            .filter(|url| !url.is_empty())
            .cloned()
    }
}

/// Presentation attributes attached to a model in exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelPresentation {
    pub model: String,
    pub nice_model: String,
    pub company: String,
    pub logo: String,
}

/// Combines the three lookups into a [`ModelPresentation`].
pub struct Presenter {
    names: Box<dyn ModelLookup>,
    companies: Box<dyn ModelLookup>,
    logos: Box<dyn ModelLookup>,
}

impl Presenter {
    pub fn new(
        names: impl ModelLookup + 'static,
        companies: impl ModelLookup + 'static,
        logos: impl ModelLookup + 'static,
    ) -> Self {
        Self {
            names: Box::new(names),
            companies: Box::new(companies),
            logos: Box::new(logos),
        }
    }

    #[must_use]
    pub fn from_config(config: &PresentationConfig) -> Self {
        Self::new(
            NiceNames::new(config.nice_names.clone()),
            CompanyClassifier,
            LogoTable::new(config.logos.clone()),
        )
    }

    /// Unmapped display names fall back to the raw id (warning when `warn_unmapped`);
    /// unknown organizations and logos fall back to `Unknown` and an empty string.
    #[must_use]
    pub fn present(&self, model: &str, warn_unmapped: bool) -> ModelPresentation {
        let nice_model = self.names.resolve(model).unwrap_or_else(|| {
            if warn_unmapped {
                log::warn!("No nice name for model: {model}");
            }
            model.to_string()
        });
        let company = self.companies.resolve(model).unwrap_or_else(|| {
            log::debug!("no organization heuristic matched {model}");
            UNKNOWN_COMPANY.to_string()
        });
        let logo = self.logos.resolve(&company).unwrap_or_default();
        ModelPresentation {
            model: model.to_string(),
            nice_model,
            company,
            logo,
        }
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::from_config(PresentationConfig::default_config())
    }
}
