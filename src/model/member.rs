use crate::model::{MetricsError, Result};
use csv::StringRecord;
use std::path::Path;

#[derive(Debug, Clone, Eq, Hash, PartialEq)]
pub struct Member {
    pub name: String,
    pub login: String,
    pub email: String,
}

// Create
impl Member {
    pub fn from_csv(path: &str) -> Result<Vec<Self>> {
        if !Path::new(path).exists() {
            return Err(MetricsError::FileNotFound { path: path.into() });
        }
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_path(path)
            .map_err(|err| MetricsError::malformed_input(path, err))?;
        let records = reader
            .records()
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(|err| MetricsError::malformed_input(path, err))?;
        Self::parse(path, &records)
    }

    fn new(name: impl ToString, login: impl ToString, email: impl ToString) -> Self {
        Self {
            name: name.to_string(),
            login: login.to_string(),
            email: email.to_string(),
        }
    }
}

// Parser
impl Member {
    fn parse(path: &str, records: &[StringRecord]) -> Result<Vec<Self>> {
        let Some(first) = records.first() else {
            return Err(MetricsError::malformed_input(path, "file is empty"));
        };

        let columns = Columns::detect(first);
        let rows = if columns.has_header {
            &records[1..]
        } else {
            records
        };
        if rows.is_empty() {
            return Err(MetricsError::malformed_input(path, "no member rows"));
        }

        let mut result = Vec::with_capacity(rows.len());
        for (index, record) in rows.iter().enumerate() {
            let row_number = index + if columns.has_header { 2 } else { 1 };
            let Some(login) = columns.login(record) else {
                return Err(MetricsError::malformed_input(
                    path,
                    format!("row {} has no login", row_number),
                ));
            };
            result.push(Self::new(
                columns.name(record),
                login,
                columns.email(record),
            ));
        }
        Ok(result)
    }
}

/// Column layout of a People export. The export carries a header row naming
/// the columns; bare handle lists have no header and put the login first,
/// the display name second and the email last.
#[derive(Debug, Clone)]
struct Columns {
    has_header: bool,
    login: usize,
    name: Option<usize>,
    email: Option<usize>,
}

impl Columns {
    fn detect(first: &StringRecord) -> Self {
        let find = |wanted: &[&str]| {
            first
                .iter()
                .position(|cell| wanted.iter().any(|w| cell.trim().eq_ignore_ascii_case(w)))
        };

        match find(&["login", "username"]) {
            Some(login) => Self {
                has_header: true,
                login,
                name: find(&["name"]),
                email: find(&["email"]),
            },
            None => Self {
                has_header: false,
                login: 0,
                name: Some(1),
                email: None,
            },
        }
    }

    fn login(&self, record: &StringRecord) -> Option<String> {
        let login = record.get(self.login)?.trim();
        if login.is_empty() {
            None
        } else {
            Some(login.to_string())
        }
    }

    fn name(&self, record: &StringRecord) -> String {
        self.name
            .and_then(|index| record.get(index))
            .unwrap_or("")
            .trim()
            .to_string()
    }

    fn email(&self, record: &StringRecord) -> String {
        // Headerless exports keep the email in the trailing column.
        let index = match self.email {
            Some(index) => index,
            None if record.len() >= 3 => record.len() - 1,
            None => return String::new(),
        };
        record.get(index).unwrap_or("").trim().to_string()
    }
}
