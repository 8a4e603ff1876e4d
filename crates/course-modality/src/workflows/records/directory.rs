use std::io::Read;
use std::path::Path;

use tracing::{info, warn};

use super::domain::FacultyRecord;
use super::parser::{self, ENGLISH_NAME, KOREAN_NAME};
use super::LoadError;

/// Read-only faculty directory loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct FacultyDirectory {
    records: Vec<FacultyRecord>,
}

impl FacultyDirectory {
    pub fn new(records: Vec<FacultyRecord>) -> Self {
        Self { records }
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        parser::parse_faculty(reader).map(Self::new)
    }

    pub fn load_or_empty<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(directory) => {
                info!(path = %path.display(), rows = directory.len(), "faculty directory loaded");
                directory
            }
            Err(error) => {
                warn!(
                    path = %path.display(),
                    %error,
                    "faculty directory unavailable; starting empty"
                );
                Self::default()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[FacultyRecord] {
        &self.records
    }

    /// Exact match against either the Korean or the English name.
    pub fn find(&self, name: &str) -> Vec<&FacultyRecord> {
        self.records
            .iter()
            .filter(|record| record.korean_name == name || record.english_name == name)
            .collect()
    }

    /// Case-sensitive substring match over both names; an empty query matches everything.
    pub fn search(&self, substring: &str) -> Vec<&FacultyRecord> {
        self.records
            .iter()
            .filter(|record| {
                record.korean_name.contains(substring) || record.english_name.contains(substring)
            })
            .collect()
    }

    pub fn by_korean_name(&self, name: &str) -> Option<&FacultyRecord> {
        self.records.iter().find(|record| record.korean_name == name)
    }

    /// Left join of an uploaded list with the directory on both name columns.
    ///
    /// Every uploaded row is kept; rows without a directory match get empty `Category` and
    /// `Email` cells.
    pub fn enrich(&self, table: &UploadedTable) -> EnrichedTable {
        let mut headers = table.headers.clone();
        headers.push("Category".to_string());
        headers.push("Email".to_string());

        let mut matched = 0;
        let rows = table
            .rows
            .iter()
            .map(|row| {
                let korean = &row[table.korean_column];
                let english = &row[table.english_column];
                let hit = self.records.iter().find(|record| {
                    &record.korean_name == korean && &record.english_name == english
                });

                let mut enriched = row.clone();
                match hit {
                    Some(record) => {
                        matched += 1;
                        enriched.push(record.category.clone());
                        enriched.push(record.email.clone());
                    }
                    None => {
                        enriched.push(String::new());
                        enriched.push(String::new());
                    }
                }
                enriched
            })
            .collect();

        EnrichedTable {
            headers,
            rows,
            matched,
        }
    }
}

/// Free-form faculty list uploaded for e-mail enrichment. Only the two name columns are
/// required; every other column is carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
    korean_column: usize,
    english_column: usize,
}

impl UploadedTable {
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, LoadError> {
        let mut csv_reader = parser::csv_reader(reader);
        let header_record = csv_reader.headers()?.clone();
        let korean_column = KOREAN_NAME
            .position(&header_record)
            .ok_or(LoadError::MissingColumn {
                column: KOREAN_NAME.name,
            })?;
        let english_column = ENGLISH_NAME
            .position(&header_record)
            .ok_or(LoadError::MissingColumn {
                column: ENGLISH_NAME.name,
            })?;

        let headers: Vec<String> = header_record.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            if parser::is_blank(&record) {
                continue;
            }
            let mut row: Vec<String> = record.iter().map(str::to_string).collect();
            row.resize(headers.len(), String::new());
            rows.push(row);
        }

        Ok(Self {
            headers,
            rows,
            korean_column,
            english_column,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrichedTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub matched: usize,
}
