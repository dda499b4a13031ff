//! Pattern-based PII redaction
//!
//! Free text is scanned by an ordered list of rules, each replacing every
//! non-overlapping match of one PII category with its token. Label-anchored
//! rules (`Name:`, `Phone:`, `Address:`) keep the label and replace only the
//! rest of the line.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// PII category of a detected span or a classified column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PiiFieldKind {
    Name,
    Email,
    Phone,
    Address,
    Url,
    /// PII-bearing but without a dedicated token
    None,
}

impl PiiFieldKind {
    /// Replacement token, if the kind has one
    pub fn token(&self) -> Option<&'static str> {
        match self {
            PiiFieldKind::Name => Some("<NAME>"),
            PiiFieldKind::Email => Some("<EMAIL>"),
            PiiFieldKind::Phone => Some("<PHONE>"),
            PiiFieldKind::Address => Some("<ADDRESS>"),
            PiiFieldKind::Url => Some("<URL>"),
            PiiFieldKind::None => None,
        }
    }
}

static EMAIL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}").expect("valid regex")
});

static URL: Lazy<Regex> = Lazy::new(|| Regex::new(r"https?://\S+").expect("valid regex"));

/// Build a rule matching the rest of the line after `label` and one whitespace
///
/// The separator may itself be a line break, in which case the value is the
/// following line.
fn label_pattern(label: &str) -> std::result::Result<Regex, regex::Error> {
    Regex::new(&format!(r"({}\s)[^\r\n]*", regex::escape(label)))
}

static NAME_LABEL: Lazy<Regex> = Lazy::new(|| label_pattern("Name:").expect("valid regex"));
static PHONE_LABEL: Lazy<Regex> = Lazy::new(|| label_pattern("Phone:").expect("valid regex"));
static ADDRESS_LABEL: Lazy<Regex> = Lazy::new(|| label_pattern("Address:").expect("valid regex"));

/// One detect-and-replace rule
#[derive(Debug, Clone)]
struct RedactionRule {
    pattern: Regex,
    replacement: String,
}

impl RedactionRule {
    /// Replace every match of `pattern` with the token of `kind`
    fn pattern(kind: PiiFieldKind, pattern: Regex) -> Self {
        let replacement = kind.token().unwrap_or("<PII>").to_string();
        Self { pattern, replacement }
    }

    /// Replace the captured label's value, keeping the label
    fn anchored(kind: PiiFieldKind, pattern: Regex) -> Self {
        let replacement = format!("${{1}}{}", kind.token().unwrap_or("<PII>"));
        Self { pattern, replacement }
    }

    fn apply<'t>(&self, text: &'t str) -> Cow<'t, str> {
        self.pattern.replace_all(text, self.replacement.as_str())
    }
}

/// Ordered set of redaction rules
#[derive(Debug, Clone)]
pub struct Redactor {
    rules: Vec<RedactionRule>,
}

impl Default for Redactor {
    fn default() -> Self {
        Self::new()
    }
}

impl Redactor {
    /// Redactor with the built-in rules: email, name, phone, address, URL
    pub fn new() -> Self {
        Self {
            rules: vec![
                RedactionRule::pattern(PiiFieldKind::Email, EMAIL.clone()),
                RedactionRule::anchored(PiiFieldKind::Name, NAME_LABEL.clone()),
                RedactionRule::anchored(PiiFieldKind::Phone, PHONE_LABEL.clone()),
                RedactionRule::anchored(PiiFieldKind::Address, ADDRESS_LABEL.clone()),
                RedactionRule::pattern(PiiFieldKind::Url, URL.clone()),
            ],
        }
    }

    /// Replace every PII span in `text` with its token
    pub fn redact(&self, text: &str) -> String {
        let mut current = text.to_string();
        for rule in &self.rules {
            let replaced = match rule.apply(&current) {
                Cow::Borrowed(_) => None,
                Cow::Owned(s) => Some(s),
            };
            if let Some(s) = replaced {
                current = s;
            }
        }
        current
    }

    /// Redact a value whose PII kind is already known
    ///
    /// Blank values are returned unchanged. Kinds with a token replace the
    /// whole value; kinds without one fall back to scanning.
    pub fn redact_value(&self, value: &str, kind: PiiFieldKind) -> String {
        if value.trim().is_empty() {
            return value.to_string();
        }
        match kind.token() {
            Some(token) => token.to_string(),
            None => self.redact(value),
        }
    }
}

/// Redact `text` with the built-in rules
pub fn redact(text: &str) -> String {
    static DEFAULT: Lazy<Redactor> = Lazy::new(Redactor::new);
    DEFAULT.redact(text)
}
