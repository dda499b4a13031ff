use serde::{Deserialize, Serialize};

/// Structured field recoverable from a resume
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Name,
    Email,
    Phone,
    Address,
    Skills,
    Experience,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::Address,
        Field::Skills,
        Field::Experience,
    ];

    /// Label / column name of the field
    pub fn as_str(&self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Address => "address",
            Field::Skills => "skills",
            Field::Experience => "experience",
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields extracted from (or supplied with) one document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMap {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub skills: String,
    pub experience: String,
    pub raw_text: String,
}

impl FieldMap {
    /// Empty mapping that only carries the raw text
    pub fn with_raw_text(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
            ..Self::default()
        }
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Phone => &self.phone,
            Field::Address => &self.address,
            Field::Skills => &self.skills,
            Field::Experience => &self.experience,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::Name => &mut self.name,
            Field::Email => &mut self.email,
            Field::Phone => &mut self.phone,
            Field::Address => &mut self.address,
            Field::Skills => &mut self.skills,
            Field::Experience => &mut self.experience,
        }
    }

    /// True when no field besides the raw text is populated
    pub fn is_blank(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_empty())
    }
}

/// One candidate document of a ranking pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Position in the input collection
    pub index: usize,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldMap>,
}

impl Document {
    pub fn new(index: usize, text: impl Into<String>) -> Self {
        Self {
            index,
            text: text.into(),
            fields: None,
        }
    }

    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields = Some(fields);
        self
    }
}

/// A document paired with its similarity to the job description
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredDocument {
    pub document: Document,
    pub score: f32,
}

impl ScoredDocument {
    pub fn new(document: Document, score: f32) -> Self {
        Self { document, score }
    }

    /// Original input index
    pub fn index(&self) -> usize {
        self.document.index
    }

    pub fn text(&self) -> &str {
        &self.document.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_map_accessors() {
        let mut fields = FieldMap::with_raw_text("raw");
        assert!(fields.is_blank());

        fields.get_mut(Field::Email).push_str("jane@x.com");
        assert_eq!(fields.get(Field::Email), "jane@x.com");
        assert!(!fields.is_blank());
        assert_eq!(fields.raw_text, "raw");
    }

    #[test]
    fn test_field_names() {
        let names: Vec<_> = Field::ALL.iter().map(Field::as_str).collect();
        assert_eq!(names, vec!["name", "email", "phone", "address", "skills", "experience"]);
    }

    #[test]
    fn test_scored_document_index() {
        let scored = ScoredDocument::new(Document::new(7, "text"), 0.5);
        assert_eq!(scored.index(), 7);
        assert_eq!(scored.text(), "text");
    }
}
