//! Heuristic field extraction from free-text resumes
//!
//! Lines are scanned top to bottom. A line starting with one of the known
//! labels sets its field; `Skills:` and `Experience:` open a section that
//! collects the following unlabeled lines until another label appears.

use resumerank_core::{Field, FieldMap};

const LABELS: [(&str, Field); 6] = [
    ("name:", Field::Name),
    ("email:", Field::Email),
    ("phone:", Field::Phone),
    ("address:", Field::Address),
    ("skills:", Field::Skills),
    ("experience:", Field::Experience),
];

/// Multi-line section currently collecting text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    #[default]
    None,
    Skills,
    Experience,
}

/// Classification of a single input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// A label line with the (trimmed) remainder after the label
    Label(Field, &'a str),
    Text(&'a str),
    Blank,
}

impl<'a> Line<'a> {
    pub fn classify(raw: &'a str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Line::Blank;
        }
        for (label, field) in LABELS {
            let matches = trimmed
                .get(..label.len())
                .map_or(false, |prefix| prefix.eq_ignore_ascii_case(label));
            if matches {
                return Line::Label(field, trimmed[label.len()..].trim());
            }
        }
        Line::Text(trimmed)
    }
}

impl Section {
    /// Section that is open after reading `line`
    pub fn next(self, line: &Line<'_>) -> Section {
        match line {
            Line::Label(Field::Skills, _) => Section::Skills,
            Line::Label(Field::Experience, _) => Section::Experience,
            Line::Label(_, _) => Section::None,
            Line::Text(_) | Line::Blank => self,
        }
    }

    fn field(self) -> Option<Field> {
        match self {
            Section::None => None,
            Section::Skills => Some(Field::Skills),
            Section::Experience => Some(Field::Experience),
        }
    }
}

/// Extracts [`FieldMap`]s from unstructured resume text
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldExtractor;

impl FieldExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, text: &str) -> FieldMap {
        let mut fields = FieldMap::with_raw_text(text);
        let mut skills: Vec<&str> = Vec::new();
        let mut experience: Vec<&str> = Vec::new();
        let mut section = Section::None;

        for raw in text.lines() {
            let line = Line::classify(raw);
            section = section.next(&line);

            let (target, value) = match line {
                Line::Label(field, value) => (Some(field), value),
                Line::Text(value) => (section.field(), value),
                Line::Blank => continue,
            };

            match target {
                Some(Field::Skills) if !value.is_empty() => skills.push(value),
                Some(Field::Experience) if !value.is_empty() => experience.push(value),
                Some(Field::Skills) | Some(Field::Experience) | None => {}
                Some(field) => *fields.get_mut(field) = value.to_string(),
            }
        }

        fields.skills = skills.join(" ");
        fields.experience = experience.join(" ");
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_labeled_resume() {
        let text = "Name: Jane Doe\nEmail: jane@x.com\nPhone: 555-1234\nSkills: Python, SQL\nmore skills here";
        let fields = FieldExtractor::new().extract(text);

        assert_eq!(fields.name, "Jane Doe");
        assert_eq!(fields.email, "jane@x.com");
        assert_eq!(fields.phone, "555-1234");
        assert_eq!(fields.skills, "Python, SQL more skills here");
        assert_eq!(fields.address, "");
        assert_eq!(fields.experience, "");
        assert_eq!(fields.raw_text, text);
    }

    #[test]
    fn test_no_labels_yields_blank_fields() {
        let text = "Seasoned engineer\nloves distributed systems";
        let fields = FieldExtractor::new().extract(text);
        assert!(fields.is_blank());
        assert_eq!(fields.raw_text, text);
    }

    #[test]
    fn test_labels_are_case_insensitive_and_trimmed() {
        let fields = FieldExtractor::new().extract("   NAME:   Bob  \n  ADDRESS: 1 Main St ");
        assert_eq!(fields.name, "Bob");
        assert_eq!(fields.address, "1 Main St");
    }

    #[test]
    fn test_sections_switch_and_close() {
        let text = "Experience:\nAcme Corp 2019-2023\n\nBuilt APIs\nSkills: Rust\nGo\nName: Ann\nstray line";
        let fields = FieldExtractor::new().extract(text);
        assert_eq!(fields.experience, "Acme Corp 2019-2023 Built APIs");
        assert_eq!(fields.skills, "Rust Go");
        assert_eq!(fields.name, "Ann");
    }

    #[test]
    fn test_repeated_section_label_continues_buffer() {
        let fields = FieldExtractor::new().extract("Skills: Rust\nName: Ann\nSkills: Go");
        assert_eq!(fields.skills, "Rust Go");
    }

    #[test]
    fn test_text_before_any_section_is_discarded() {
        let fields = FieldExtractor::new().extract("Summary line\nSkills: SQL");
        assert_eq!(fields.skills, "SQL");
    }

    #[test]
    fn test_line_classification() {
        assert_eq!(Line::classify("  "), Line::Blank);
        assert_eq!(Line::classify("Email: a@b.com"), Line::Label(Field::Email, "a@b.com"));
        assert_eq!(Line::classify("emails are fun"), Line::Text("emails are fun"));
        // Multi-byte text shorter than a label must not panic
        assert_eq!(Line::classify("né"), Line::Text("né"));
    }

    #[test]
    fn test_section_transitions() {
        let skills = Line::Label(Field::Skills, "");
        let experience = Line::Label(Field::Experience, "");
        let name = Line::Label(Field::Name, "x");
        let text = Line::Text("x");

        assert_eq!(Section::None.next(&skills), Section::Skills);
        assert_eq!(Section::Skills.next(&experience), Section::Experience);
        assert_eq!(Section::Experience.next(&name), Section::None);
        assert_eq!(Section::Skills.next(&text), Section::Skills);
        assert_eq!(Section::Experience.next(&Line::Blank), Section::Experience);
        assert_eq!(Section::None.next(&text), Section::None);
    }
}
