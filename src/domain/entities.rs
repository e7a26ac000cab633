//! Domain entities: core data structures

use std::fmt;

use crate::domain::error::{DomainError, DomainResult};

/// One row of the organigram input: a person and their direct supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Person {
    pub first_name: String,
    pub last_name: String,
    /// Full name of the direct supervisor, `None` for top-level people
    pub supervisor: Option<String>,
}

impl Person {
    /// Validate raw field values into a `Person`.
    ///
    /// Names are trimmed. Blank first or last names are rejected with the
    /// input line so the row can be found again. A blank supervisor means
    /// the person has none.
    ///
    /// # Arguments
    /// * `line` - Line number in the source, used for error reporting
    pub fn from_fields(
        line: u64,
        first_name: Option<&str>,
        last_name: Option<&str>,
        supervisor: Option<&str>,
    ) -> DomainResult<Self> {
        let first_name = required(line, "first name", first_name)?;
        let last_name = required(line, "last name", last_name)?;
        let supervisor = supervisor
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        Ok(Self {
            first_name,
            last_name,
            supervisor,
        })
    }

    /// Identity of the person: `"<first> <last>"`.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl fmt::Display for Person {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.supervisor {
            Some(supervisor) => write!(f, "{} -> {}", supervisor, self.full_name()),
            None => write!(f, "{}", self.full_name()),
        }
    }
}

fn required(line: u64, field: &'static str, value: Option<&str>) -> DomainResult<String> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(DomainError::MalformedRecord { line, field }),
    }
}
