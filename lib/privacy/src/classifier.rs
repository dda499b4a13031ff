//! Column-name based PII classification for tabular input

use crate::redactor::PiiFieldKind;
use ahash::AHashMap;
use resumerank_core::Field;
use serde::Serialize;

const SYNONYMS: [(&str, PiiFieldKind); 11] = [
    ("name", PiiFieldKind::Name),
    ("full_name", PiiFieldKind::Name),
    ("email", PiiFieldKind::Email),
    ("e-mail", PiiFieldKind::Email),
    ("phone", PiiFieldKind::Phone),
    ("phone_number", PiiFieldKind::Phone),
    ("address", PiiFieldKind::Address),
    ("linkedin", PiiFieldKind::Url),
    ("github", PiiFieldKind::Url),
    ("website", PiiFieldKind::Url),
    ("url", PiiFieldKind::Url),
];

/// Tables with at most this many columns may be free text
const MAX_UNSTRUCTURED_COLUMNS: usize = 3;

/// A column recognized as PII-bearing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnRole {
    pub index: usize,
    pub name: String,
    pub kind: PiiFieldKind,
}

/// How PII is laid out in a table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TableStructure {
    /// One PII attribute per column
    Structured,
    /// PII embedded in free-running text
    Unstructured,
}

/// PII kind of a structured field, for fields that carry one
pub fn field_kind(field: Field) -> Option<PiiFieldKind> {
    match field {
        Field::Name => Some(PiiFieldKind::Name),
        Field::Email => Some(PiiFieldKind::Email),
        Field::Phone => Some(PiiFieldKind::Phone),
        Field::Address => Some(PiiFieldKind::Address),
        Field::Skills | Field::Experience => None,
    }
}

/// Maps column names to PII kinds by exact, case-insensitive lookup
#[derive(Debug, Clone)]
pub struct ColumnClassifier {
    synonyms: AHashMap<String, PiiFieldKind>,
}

impl Default for ColumnClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl ColumnClassifier {
    pub fn new() -> Self {
        let synonyms = SYNONYMS
            .iter()
            .map(|(name, kind)| (name.to_string(), *kind))
            .collect();
        Self { synonyms }
    }

    /// Register extra PII column names without a dedicated token
    ///
    /// Built-in synonyms keep their kind.
    pub fn with_extra_columns<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.synonyms
                .entry(name.as_ref().trim().to_lowercase())
                .or_insert(PiiFieldKind::None);
        }
        self
    }

    pub fn classify(&self, column: &str) -> Option<PiiFieldKind> {
        self.synonyms.get(&column.to_lowercase()).copied()
    }

    /// PII-bearing columns of a header, in column order
    pub fn classify_columns<S: AsRef<str>>(&self, columns: &[S]) -> Vec<ColumnRole> {
        columns
            .iter()
            .enumerate()
            .filter_map(|(index, name)| {
                self.classify(name.as_ref()).map(|kind| ColumnRole {
                    index,
                    name: name.as_ref().to_string(),
                    kind,
                })
            })
            .collect()
    }

    /// Unstructured when the table is narrow and has no PII column
    pub fn infer_structure<S: AsRef<str>>(&self, columns: &[S]) -> TableStructure {
        let narrow = columns.len() <= MAX_UNSTRUCTURED_COLUMNS;
        if narrow && self.classify_columns(columns).is_empty() {
            TableStructure::Unstructured
        } else {
            TableStructure::Structured
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_synonyms() {
        let classifier = ColumnClassifier::new();
        assert_eq!(classifier.classify("Full_Name"), Some(PiiFieldKind::Name));
        assert_eq!(classifier.classify("E-MAIL"), Some(PiiFieldKind::Email));
        assert_eq!(classifier.classify("phone_number"), Some(PiiFieldKind::Phone));
        assert_eq!(classifier.classify("GitHub"), Some(PiiFieldKind::Url));
        assert_eq!(classifier.classify("resume"), None);
        // Exact match only
        assert_eq!(classifier.classify("email_address"), None);
    }

    #[test]
    fn test_classify_columns() {
        let classifier = ColumnClassifier::new();
        let roles = classifier.classify_columns(&["id", "Email", "resume", "website"]);
        assert_eq!(
            roles,
            vec![
                ColumnRole { index: 1, name: "Email".into(), kind: PiiFieldKind::Email },
                ColumnRole { index: 3, name: "website".into(), kind: PiiFieldKind::Url },
            ]
        );
    }

    #[test]
    fn test_structure_inference() {
        let classifier = ColumnClassifier::new();
        assert_eq!(classifier.infer_structure(&["resume"]), TableStructure::Unstructured);
        assert_eq!(classifier.infer_structure(&["id", "category", "resume"]), TableStructure::Unstructured);
        assert_eq!(classifier.infer_structure(&["id", "email", "resume"]), TableStructure::Structured);
        // Wide tables are never unstructured
        assert_eq!(classifier.infer_structure(&["a", "b", "c", "d"]), TableStructure::Structured);
    }

    #[test]
    fn test_extra_columns() {
        let classifier = ColumnClassifier::new().with_extra_columns(["SSN", "email"]);
        assert_eq!(classifier.classify("ssn"), Some(PiiFieldKind::None));
        // Built-ins are not downgraded
        assert_eq!(classifier.classify("email"), Some(PiiFieldKind::Email));
        assert_eq!(classifier.infer_structure(&["ssn", "resume"]), TableStructure::Structured);
    }

    #[test]
    fn test_field_kind() {
        assert_eq!(field_kind(Field::Phone), Some(PiiFieldKind::Phone));
        assert_eq!(field_kind(Field::Skills), None);
    }
}
