//! CSV roster parsing
//!
//! Turns the semicolon-separated employee list into validated `Person` rows.

use std::path::Path;

use tracing::debug;

use crate::application::{ApplicationError, ApplicationResult};
use crate::config::InputConfig;
use crate::domain::Person;

/// Column positions of the three fields we read.
#[derive(Debug, Clone, Copy)]
struct Columns {
    first_name: usize,
    last_name: usize,
    supervisor: usize,
}

impl Columns {
    fn locate(headers: &csv::StringRecord, input: &InputConfig, path: &Path) -> ApplicationResult<Self> {
        let find = |column: &str| {
            headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| ApplicationError::MissingColumn {
                    path: path.to_path_buf(),
                    column: column.to_string(),
                })
        };
        Ok(Self {
            first_name: find(&input.first_name_column)?,
            last_name: find(&input.last_name_column)?,
            supervisor: find(&input.supervisor_column)?,
        })
    }
}

/// Parse roster `content` read from `path`.
///
/// The header row names the columns; any extra columns are ignored. Rows
/// may be shorter than the header, a missing supervisor cell counts as
/// blank. Line numbers in errors refer to the file, header included.
pub fn parse_roster(
    content: &str,
    path: &Path,
    input: &InputConfig,
    delimiter: u8,
) -> ApplicationResult<Vec<Person>> {
    let csv_err = |e: csv::Error| ApplicationError::Csv {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(content.as_bytes());

    let columns = Columns::locate(reader.headers().map_err(csv_err)?, input, path)?;

    let mut people = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        let line = record.position().map(|p| p.line()).unwrap_or_default();
        let person = Person::from_fields(
            line,
            record.get(columns.first_name),
            record.get(columns.last_name),
            record.get(columns.supervisor),
        )?;
        people.push(person);
    }
    debug!("parsed {} people from {}", people.len(), path.display());
    Ok(people)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DomainError;

    fn parse(content: &str) -> ApplicationResult<Vec<Person>> {
        parse_roster(content, Path::new("test.csv"), &InputConfig::default(), b';')
    }

    #[test]
    fn given_extra_columns_when_parsing_then_ignores_them() {
        let people = parse("Id;Vorname;Name;Abteilung;Vorgesetzter\n1;Anna;Muller;IT;\n2;Ben;Schmidt;IT;Anna Muller\n").unwrap();
        assert_eq!(people.len(), 2);
        assert_eq!(people[0].supervisor, None);
        assert_eq!(people[1].supervisor.as_deref(), Some("Anna Muller"));
    }

    #[test]
    fn given_missing_supervisor_column_when_parsing_then_reports_column() {
        let result = parse("Vorname;Name\nAnna;Muller\n");
        assert!(matches!(
            result,
            Err(ApplicationError::MissingColumn { column, .. }) if column == "Vorgesetzter"
        ));
    }

    #[test]
    fn given_row_without_first_name_when_parsing_then_malformed_with_line() {
        let result = parse("Vorname;Name;Vorgesetzter\nAnna;Muller;\n;Schmidt;Anna Muller\n");
        assert!(matches!(
            result,
            Err(ApplicationError::Domain(DomainError::MalformedRecord {
                line: 3,
                field: "first name"
            }))
        ));
    }

    #[test]
    fn given_short_row_when_parsing_then_supervisor_absent() {
        let people = parse("Vorname;Name;Vorgesetzter\nAnna;Muller\n").unwrap();
        assert_eq!(people[0].supervisor, None);
    }

    #[test]
    fn given_blank_lines_when_parsing_then_skips_them() {
        let people = parse("Vorname;Name;Vorgesetzter\nAnna;Muller;\n;;\nBen;Schmidt;Anna Muller\n").unwrap();
        assert_eq!(people.len(), 2);
    }
}
