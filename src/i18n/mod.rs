//! Internationalization: per-locale message tables for spoken responses.
//!
//! Tables are bundled at compile time from `locales/*.toml` and may be
//! overridden at startup from a directory of `<locale>.toml` files. Every
//! table is validated against [`MessageKey::ALL`] when loaded, so a missing
//! message is a startup failure rather than a per-request one. After loading
//! the store is read-only and shared freely between concurrent requests.

mod format;
mod keys;


pub use format::fill;
pub use keys::MessageKey;

use boletim_core::error::SkillError;
use rand::Rng;
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt::Display;
use std::path::Path;
use tracing::{info, warn};

/// Bundled locale tables, embedded at compile time.
const BUNDLED: &[(&str, &str)] = &[
    ("pt", include_str!("../../locales/pt.toml")),
    ("en", include_str!("../../locales/en.toml")),
];

/// A stored message: one template, or a non-empty list picked at random.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum MessageValue {
    One(String),
    Many(Vec<String>),
}

/// TOML structure of one locale file.
#[derive(Deserialize)]
struct LocaleFile {
    messages: HashMap<String, MessageValue>,
    #[serde(default)]
    facts: Vec<String>,
}

/// Messages and facts for one locale.
#[derive(Debug)]
pub struct LocaleTable {
    messages: HashMap<MessageKey, MessageValue>,
    facts: Vec<String>,
}

impl LocaleTable {
    /// Parse and validate one locale file.
    fn parse(tag: &str, content: &str) -> Result<Self, SkillError> {
        let file: LocaleFile = toml::from_str(content)
            .map_err(|e| SkillError::Config(format!("locale '{tag}': failed to parse: {e}")))?;

        let mut messages = HashMap::with_capacity(file.messages.len());
        for (name, value) in file.messages {
            let Some(key) = MessageKey::parse(&name) else {
                warn!("locale '{tag}': ignoring unknown message key {name}");
                continue;
            };
            if let MessageValue::Many(ref list) = value {
                if list.is_empty() {
                    return Err(SkillError::Config(format!(
                        "locale '{tag}': message {name} is an empty list"
                    )));
                }
            }
            messages.insert(key, value);
        }

        for key in MessageKey::ALL {
            if !messages.contains_key(&key) {
                return Err(SkillError::MessageKeyNotFound {
                    locale: tag.to_string(),
                    key: key.to_string(),
                });
            }
        }

        if file.facts.is_empty() {
            return Err(SkillError::Config(format!("locale '{tag}': facts list is empty")));
        }

        Ok(Self {
            messages,
            facts: file.facts,
        })
    }
}

/// Locale tag → table, plus the default locale used when a request's
/// locale has no table.
#[derive(Debug)]
pub struct LocaleStore {
    tables: HashMap<String, LocaleTable>,
    default_locale: String,
}

impl LocaleStore {
    /// Bundled tables, then every `<locale>.toml` in `overrides_dir`
    /// replacing (or adding) the table for that locale.
    ///
    /// Fails if any table is invalid or the default locale has no table,
    /// even after falling back to its primary subtag.
    pub fn load(default_locale: &str, overrides_dir: Option<&str>) -> Result<Self, SkillError> {
        let mut tables = HashMap::new();
        for (tag, content) in BUNDLED {
            tables.insert(tag.to_string(), LocaleTable::parse(tag, content)?);
        }

        if let Some(dir) = overrides_dir {
            load_overrides(Path::new(dir), &mut tables)?;
        }

        let mut store = Self {
            tables,
            default_locale: String::new(),
        };
        // "pt-BR" as the default resolves to the "pt" table like any request.
        store.default_locale = store.locale_for(default_locale)?.to_string();
        Ok(store)
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    /// Known locale tags, sorted.
    pub fn locales(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.tables.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Canonical table tag for a request locale: exact match first (case
    /// insensitive), then the primary language subtag ("pt-BR" → "pt").
    pub fn locale_for(&self, tag: &str) -> Result<&str, SkillError> {
        let lower = tag.trim().to_lowercase();
        let primary = lower.split(['-', '_']).next().unwrap_or_default();
        // Bound to a local so the array iterator drops before `lower`.
        let found = [lower.as_str(), primary]
            .into_iter()
            .find_map(|t| self.tables.get_key_value(t))
            .map(|(k, _)| k.as_str())
            .ok_or_else(|| SkillError::LocaleNotFound(tag.to_string()));
        found
    }

    fn table(&self, locale: &str) -> Result<&LocaleTable, SkillError> {
        let tag = self.locale_for(locale)?;
        self.tables
            .get(tag)
            .ok_or_else(|| SkillError::LocaleNotFound(locale.to_string()))
    }

    /// Resolve a message for `locale`, substituting positional `args`.
    pub fn resolve(
        &self,
        locale: &str,
        key: MessageKey,
        args: &[&dyn Display],
    ) -> Result<String, SkillError> {
        self.resolve_with(&mut rand::thread_rng(), locale, key, args)
    }

    /// Same as [`resolve`](Self::resolve) with an explicit random source.
    pub fn resolve_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        locale: &str,
        key: MessageKey,
        args: &[&dyn Display],
    ) -> Result<String, SkillError> {
        let table = self.table(locale)?;
        let value = table
            .messages
            .get(&key)
            .ok_or_else(|| SkillError::MessageKeyNotFound {
                locale: locale.to_string(),
                key: key.to_string(),
            })?;
        let template = match value {
            MessageValue::One(s) => s.as_str(),
            MessageValue::Many(list) => pick(rng, list),
        };
        Ok(fill(template, args))
    }

    /// A random fact for `locale`.
    pub fn random_fact(&self, locale: &str) -> Result<String, SkillError> {
        let table = self.table(locale)?;
        Ok(pick(&mut rand::thread_rng(), &table.facts).to_string())
    }
}

/// Uniform draw over a non-empty list (guaranteed by validation).
fn pick<'a, R: Rng + ?Sized>(rng: &mut R, list: &'a [String]) -> &'a str {
    match list.len() {
        0 => "",
        1 => &list[0],
        n => &list[rng.gen_range(0..n)],
    }
}

fn load_overrides(dir: &Path, tables: &mut HashMap<String, LocaleTable>) -> Result<(), SkillError> {
    if !dir.is_dir() {
        warn!("locales: override directory {} not found, using bundled tables", dir.display());
        return Ok(());
    }

    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().and_then(|e| e.to_str()) != Some("toml") {
            continue;
        }
        let Some(tag) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let tag = tag.to_lowercase();
        let content = std::fs::read_to_string(&path)?;
        tables.insert(tag.clone(), LocaleTable::parse(&tag, &content)?);
        info!("locales: loaded {tag} from {}", path.display());
    }
    Ok(())
}
