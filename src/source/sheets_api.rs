//! Google Sheets import
//!
//! Pulls a cell range from a spreadsheet with an API key (no OAuth), and
//! writes it to an xlsx workbook that the deck builder can read. Rows can be
//! split by the German article of the first column so that each gender ends
//! up on its own sheet.

use std::path::Path;

use reqwest::blocking::Client;
use rust_xlsxwriter::Workbook;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_BASE_URL: &str = "https://sheets.googleapis.com";

#[derive(Error, Debug)]
pub enum SheetsApiError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Sheets API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("No data found in range")]
    NoData,

    #[error("Workbook error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),
}

pub type Result<T> = std::result::Result<T, SheetsApiError>;

/// Body of a `spreadsheets.values.get` response
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default)]
    pub range: Option<String>,
    #[serde(default)]
    pub major_dimension: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<String>>,
}

/// A header row plus data rows, all padded to the header width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl ValueTable {
    pub fn from_values(values: Vec<Vec<String>>) -> Result<Self> {
        let mut iter = values.into_iter();
        let header = iter.next().ok_or(SheetsApiError::NoData)?;
        let width = header.len();

        let rows = iter
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Ok(Self { header, rows })
    }

    /// Remove columns by header name (exact match)
    pub fn drop_columns(&mut self, names: &[String]) {
        let keep: Vec<bool> = self.header.iter().map(|h| !names.contains(h)).collect();
        let filter = |row: &mut Vec<String>| {
            let mut flags = keep.iter();
            row.retain(|_| *flags.next().unwrap_or(&true));
        };

        filter(&mut self.header);
        for row in &mut self.rows {
            filter(row);
        }
    }

    fn with_rows(&self, rows: Vec<Vec<String>>) -> Self {
        Self {
            header: self.header.clone(),
            rows,
        }
    }
}

/// Grammatical gender of a German noun, from its leading article
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Article {
    Maskulin,
    Femenin,
    Neutrum,
    Other,
}

impl Article {
    pub fn detect(word: &str) -> Self {
        if word.starts_with("der ") {
            Self::Maskulin
        } else if word.starts_with("die ") {
            Self::Femenin
        } else if word.starts_with("das ") {
            Self::Neutrum
        } else {
            Self::Other
        }
    }

    pub fn sheet_name(&self) -> &'static str {
        match self {
            Self::Maskulin => "Maskulin",
            Self::Femenin => "Femenin",
            Self::Neutrum => "Neutrum",
            Self::Other => "Other",
        }
    }
}

/// Split rows by the article of their first column.
///
/// Groups come out in Maskulin, Femenin, Neutrum, Other order; empty groups
/// are omitted.
pub fn split_by_article(table: &ValueTable) -> Vec<(String, ValueTable)> {
    [Article::Maskulin, Article::Femenin, Article::Neutrum, Article::Other]
        .iter()
        .filter_map(|article| {
            let rows: Vec<Vec<String>> = table
                .rows
                .iter()
                .filter(|row| {
                    let first = row.first().map(String::as_str).unwrap_or_default();
                    Article::detect(first) == *article
                })
                .cloned()
                .collect();

            if rows.is_empty() {
                None
            } else {
                Some((article.sheet_name().to_string(), table.with_rows(rows)))
            }
        })
        .collect()
}

/// Write named tables as sheets of one xlsx workbook, header first
pub fn write_workbook(sheets: &[(String, ValueTable)], path: &Path) -> Result<()> {
    let mut workbook = Workbook::new();

    for (name, table) in sheets {
        let worksheet = workbook.add_worksheet().set_name(name)?;
        let all_rows = std::iter::once(&table.header).chain(table.rows.iter());

        for (row_idx, row) in all_rows.enumerate() {
            for (col_idx, value) in row.iter().enumerate() {
                worksheet.write_string(row_idx as u32, col_idx as u16, value)?;
            }
        }
    }

    workbook.save(path)?;
    log::info!("Wrote {} sheets to {:?}", sheets.len(), path);
    Ok(())
}

/// Read-only client for the Sheets values endpoint
pub struct SheetsApiClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl SheetsApiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: impl Into<String>, base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.into().trim().to_string(),
        }
    }

    fn values_url(&self, spreadsheet_id: &str, range: &str) -> String {
        format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.base_url,
            urlencoding::encode(spreadsheet_id),
            urlencoding::encode(range)
        )
    }

    /// Fetch a range; the first returned row is taken as the header
    pub fn fetch_table(&self, spreadsheet_id: &str, range: &str) -> Result<ValueTable> {
        let url = self.values_url(spreadsheet_id, range);
        log::info!("Fetching {} from spreadsheet {}", range, spreadsheet_id);

        let response = self
            .client
            .get(&url)
            .query(&[("key", self.api_key.as_str())])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(SheetsApiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ValueRange = response.json()?;
        log::debug!("Received {} rows for {:?}", body.values.len(), body.range);
        ValueTable::from_values(body.values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{WordSource, WorkbookSource};
    use crate::layout::WordPair;
    use tempfile::TempDir;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|s| s.to_string()).collect()
    }

    fn sample_table() -> ValueTable {
        ValueTable::from_values(vec![
            row(&["Alemán", "Español", "Etiquetas"]),
            row(&["der Hund", "el perro", "tiere"]),
            row(&["die Katze", "el gato"]),
            row(&["laufen", "correr", "verb"]),
            row(&["der Baum", "el árbol", ""]),
        ])
        .unwrap()
    }

    #[test]
    fn test_parse_value_range() {
        let json = r#"{
            "range": "Sheet1!A1:B3",
            "majorDimension": "ROWS",
            "values": [["Alemán", "Español"], ["das Haus", "la casa"]]
        }"#;
        let body: ValueRange = serde_json::from_str(json).unwrap();
        assert_eq!(body.major_dimension.as_deref(), Some("ROWS"));
        assert_eq!(body.values.len(), 2);

        let empty: ValueRange = serde_json::from_str(r#"{"range": "A1:B2"}"#).unwrap();
        assert!(matches!(
            ValueTable::from_values(empty.values),
            Err(SheetsApiError::NoData)
        ));
    }

    #[test]
    fn test_rows_padded_to_header() {
        let table = sample_table();
        assert_eq!(table.rows[1], row(&["die Katze", "el gato", ""]));
    }

    #[test]
    fn test_drop_columns() {
        let mut table = sample_table();
        table.drop_columns(&["Etiquetas".to_string()]);

        assert_eq!(table.header, row(&["Alemán", "Español"]));
        assert!(table.rows.iter().all(|r| r.len() == 2));
    }

    #[test]
    fn test_split_by_article() {
        let groups = split_by_article(&sample_table());
        let names: Vec<&str> = groups.iter().map(|(n, _)| n.as_str()).collect();

        assert_eq!(names, vec!["Maskulin", "Femenin", "Other"]);
        assert_eq!(groups[0].1.rows.len(), 2);
        assert_eq!(groups[2].1.rows[0][0], "laufen");
    }

    #[test]
    fn test_article_detection() {
        assert_eq!(Article::detect("das Kind"), Article::Neutrum);
        assert_eq!(Article::detect("dieser"), Article::Other);
        assert_eq!(Article::detect("Der Mann"), Article::Other);
    }

    #[test]
    fn test_values_url_encodes_range() {
        let client = SheetsApiClient::with_base_url(" key\n", "http://localhost:9/");
        assert_eq!(
            client.values_url("abc", "Vokabeln!A1:B10"),
            "http://localhost:9/v4/spreadsheets/abc/values/Vokabeln%21A1%3AB10"
        );
        assert_eq!(client.api_key, "key");
    }

    #[test]
    fn test_written_workbook_is_a_word_source() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("fetched.xlsx");

        let mut table = sample_table();
        table.drop_columns(&["Etiquetas".to_string()]);
        write_workbook(&split_by_article(&table), &path).unwrap();

        let mut source = WorkbookSource::open(&path).unwrap();
        assert_eq!(source.sheet_names(), vec!["Maskulin", "Femenin", "Other"]);
        assert_eq!(
            source.read_sheet(0).unwrap(),
            vec![
                WordPair::new("der Hund", "el perro"),
                WordPair::new("der Baum", "el árbol"),
            ]
        );
    }
}
