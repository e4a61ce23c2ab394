//! Translations loaded from embedded JSON locale tables.
//!
//! Keys are dotted paths into the locale JSON (`"home.points"`). Missing keys
//! fall back to English, then to the key itself.

use std::cell::RefCell;

use serde_json::Value;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    En,
    De,
}

impl Language {
    pub fn all() -> &'static [Language] {
        &[Language::En, Language::De]
    }

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::De => "de",
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Language::En => "English",
            Language::De => "Deutsch",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        let base = code.split(['-', '_']).next().unwrap_or(code);
        Language::all()
            .iter()
            .copied()
            .find(|l| l.code().eq_ignore_ascii_case(base))
    }

    /// Next language in the selector, wrapping around.
    pub fn next(self) -> Language {
        let all = Language::all();
        let idx = all.iter().position(|l| *l == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    fn table(self) -> &'static str {
        match self {
            Language::En => include_str!("locales/en.json"),
            Language::De => include_str!("locales/de.json"),
        }
    }
}

struct Bundle {
    lang: Language,
    translations: Value,
    fallback: Value,
}

fn parse_table(lang: Language) -> Value {
    match serde_json::from_str(lang.table()) {
        Ok(v) => v,
        Err(e) => {
            log::error!("locale table {} is invalid: {e}", lang.code());
            Value::Object(serde_json::Map::new())
        }
    }
}

fn build_bundle(lang: Language) -> Bundle {
    Bundle {
        lang,
        translations: parse_table(lang),
        fallback: parse_table(Language::En),
    }
}

thread_local! {
    static CURRENT: RefCell<Bundle> = RefCell::new(build_bundle(Language::En));
}

pub fn set_lang(lang: Language) {
    if current_lang() == lang {
        return;
    }
    log::debug!("switching language to {}", lang.code());
    CURRENT.with(|cell| cell.replace(build_bundle(lang)));
}

pub fn current_lang() -> Language {
    CURRENT.with(|c| c.borrow().lang)
}

fn lookup<'a>(obj: &'a Value, key: &str) -> Option<&'a str> {
    key.split('.')
        .try_fold(obj, |cur, k| cur.get(k))
        .and_then(Value::as_str)
}

/// Translate `key` in the current language.
pub fn t(key: &str) -> String {
    CURRENT.with(|c| {
        let bundle = c.borrow();
        lookup(&bundle.translations, key)
            .or_else(|| lookup(&bundle.fallback, key))
            .map(str::to_string)
            .unwrap_or_else(|| key.to_string())
    })
}

/// Translate `key` and substitute `{name}` placeholders.
pub fn tr(key: &str, args: &[(&str, &str)]) -> String {
    args.iter().fold(t(key), |acc, (name, value)| {
        acc.replace(&format!("{{{name}}}"), value)
    })
}
