use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ContextError, ErrorKind};

/// The record read from the JSON input file. Both fields default to the empty
/// string when they are absent, while a value of any other type is rejected.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct InputRecord {
    pub title: String,
    pub content: String,
}

impl InputRecord {
    /// Read and parse the input record from the given path.
    pub fn from_path(document_path: &Path) -> Result<InputRecord, ContextError> {
        let document_content = std::fs::read(document_path).map_err(|error| {
            ContextError::with_error(
                ErrorKind::InputRead,
                format!("Unable to read the document {:?}", document_path),
                &error,
            )
        })?;

        InputRecord::from_slice(&document_content).map_err(|error| ContextError {
            context: format!("Unable to parse the document {:?}", document_path),
            ..error
        })
    }

    /// Parse the input record from raw JSON bytes.
    pub fn from_slice(document_content: &[u8]) -> Result<InputRecord, ContextError> {
        serde_json::from_slice(document_content).map_err(|error| {
            ContextError::with_error(
                ErrorKind::InputParse,
                "Unable to parse the document",
                &error,
            )
        })
    }
}

/// One labelled line of the patient section, such as `Name: Jalpa S. Sharma`.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct PatientField {
    pub label: String,
    pub value: String,
}

impl PatientField {
    pub fn new<L: Into<String>, V: Into<String>>(label: L, value: V) -> Self {
        PatientField {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One line of the investigations table.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub test_name: String,
    pub result: String,
    pub reference_range: String,
    pub unit: String,
}

impl ResultRow {
    pub fn new(test_name: &str, result: &str, reference_range: &str, unit: &str) -> Self {
        ResultRow {
            test_name: test_name.into(),
            result: result.into(),
            reference_range: reference_range.into(),
            unit: unit.into(),
        }
    }
}

/// Everything the renderer draws on the page. The patient fields are kept as an
/// ordered list so that the same data always lays out in the same order.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReportData {
    pub lab_name: String,
    pub patient_fields: Vec<PatientField>,
    pub result_rows: Vec<ResultRow>,
    pub footer: String,
    /// Goes into the document information dictionary, never onto the page.
    pub title: String,
    /// Goes into the document information dictionary, never onto the page.
    pub subject: String,
}

pub const SAMPLE_LAB_NAME: &str = "SMART PATHOLOGY LAB";

impl ReportData {
    /// The sample complete blood count sheet.
    pub fn sample() -> Self {
        ReportData {
            lab_name: SAMPLE_LAB_NAME.into(),
            patient_fields: vec![
                PatientField::new("Name", "Jalpa S. Sharma"),
                PatientField::new("Age", "21 Years"),
                PatientField::new("Sex", "Female"),
                PatientField::new("PID", "555"),
            ],
            result_rows: vec![ResultRow::new(
                "HEMOGLOBIN",
                "12.5",
                "Low 13.0 - 17.0",
                "g/dL",
            )],
            footer: format!("Thank you for choosing {}", SAMPLE_LAB_NAME),
            title: String::new(),
            subject: String::new(),
        }
    }
}

impl From<&InputRecord> for ReportData {
    /// The page content stays the sample sheet, the record only names the document.
    fn from(record: &InputRecord) -> Self {
        ReportData {
            title: record.title.clone(),
            subject: record.content.clone(),
            ..ReportData::sample()
        }
    }
}
