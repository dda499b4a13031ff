//! Table anonymization
//!
//! Combines column classification, field extraction and redaction into one
//! pass over a [`Table`]. Classified PII columns get whole-value tokens;
//! every other cell is scanned for PII.

use crate::classifier::{field_kind, ColumnClassifier, ColumnRole, TableStructure};
use crate::extractor::FieldExtractor;
use crate::redactor::{PiiFieldKind, Redactor};
use resumerank_core::{Error, Field, FieldMap, PipelineConfig, Result, Table};
use serde::Serialize;
use tracing::debug;

/// What an anonymization pass did to a table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnonymizeReport {
    pub structure: TableStructure,
    /// Columns redacted by classification, including derived ones
    pub pii_columns: Vec<ColumnRole>,
    /// Field columns added by extraction from free text
    pub derived_columns: Vec<String>,
    /// Number of cells whose value changed
    pub cells_changed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Anonymizer {
    redactor: Redactor,
    classifier: ColumnClassifier,
    extractor: FieldExtractor,
}

impl Anonymizer {
    pub fn new(redactor: Redactor, classifier: ColumnClassifier) -> Self {
        Self {
            redactor,
            classifier,
            extractor: FieldExtractor::new(),
        }
    }

    /// Built-in rules plus the config's extra PII columns
    pub fn from_config(config: &PipelineConfig) -> Self {
        let classifier = ColumnClassifier::new().with_extra_columns(&config.extra_pii_columns);
        Self::new(Redactor::new(), classifier)
    }

    pub fn redactor(&self) -> &Redactor {
        &self.redactor
    }

    pub fn classifier(&self) -> &ColumnClassifier {
        &self.classifier
    }

    /// Redact `table` in place
    ///
    /// `text_column` holds the free text used for field extraction when the
    /// table turns out to be unstructured.
    pub fn anonymize(&self, table: &mut Table, text_column: usize) -> Result<AnonymizeReport> {
        if text_column >= table.column_count() {
            return Err(Error::UnknownColumn(format!("#{}", text_column)));
        }

        let structure = self.classifier.infer_structure(table.columns());
        let mut pii_columns = self.classifier.classify_columns(table.columns());
        let mut derived_columns = Vec::new();

        if structure == TableStructure::Unstructured {
            let extracted: Vec<FieldMap> = table
                .column_values(text_column)
                .iter()
                .map(|text| self.extractor.extract(text))
                .collect();

            for field in Field::ALL {
                let values: Vec<String> = extracted.iter().map(|f| f.get(field).to_string()).collect();
                let populated = values.iter().any(|v| !v.is_empty());
                if !populated || table.column_index(field.as_str()).is_some() {
                    continue;
                }

                let index = table.set_column(field.as_str(), values)?;
                derived_columns.push(field.as_str().to_string());
                if let Some(kind) = field_kind(field) {
                    pii_columns.push(ColumnRole {
                        index,
                        name: field.as_str().to_string(),
                        kind,
                    });
                }
            }
        }

        let mut kinds: Vec<Option<PiiFieldKind>> = vec![None; table.column_count()];
        for role in &pii_columns {
            kinds[role.index] = Some(role.kind);
        }

        let mut cells_changed = 0;
        for row in 0..table.len() {
            for (column, kind) in kinds.iter().enumerate() {
                let Some(cell) = table.cell_mut(row, column) else {
                    continue;
                };
                let redacted = match kind {
                    Some(kind) => self.redactor.redact_value(cell, *kind),
                    None => self.redactor.redact(cell),
                };
                if redacted != *cell {
                    *cell = redacted;
                    cells_changed += 1;
                }
            }
        }

        debug!(
            "Anonymized {} rows ({:?}): {} PII columns, {} derived columns, {} cells changed",
            table.len(),
            structure,
            pii_columns.len(),
            derived_columns.len(),
            cells_changed
        );

        Ok(AnonymizeReport {
            structure,
            pii_columns,
            derived_columns,
            cells_changed,
        })
    }
}

/// Field maps of every row, read from the table's field-named columns
pub fn fields_from_table(table: &Table, text_column: usize) -> Vec<FieldMap> {
    let field_columns: Vec<(Field, usize)> = Field::ALL
        .iter()
        .filter_map(|field| table.column_index(field.as_str()).map(|idx| (*field, idx)))
        .collect();

    (0..table.len())
        .map(|row| {
            let mut fields = FieldMap::with_raw_text(table.cell(row, text_column));
            for (field, idx) in &field_columns {
                *fields.get_mut(*field) = table.cell(row, *idx).to_string();
            }
            fields
        })
        .collect()
}
