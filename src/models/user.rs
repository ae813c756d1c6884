use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// The only accepted date format, on the wire and in the store.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// First character must be an ASCII letter or digit.
const USERNAME_PATTERN: &str = "^[A-Za-z0-9]";

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

/// Row in the birthdays table, one per username. `username` is the key and
/// a write fully replaces the previous row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub username: String,
    #[serde(rename = "dateOfBirth")]
    pub date_of_birth: NaiveDate,
}

impl UserRecord {
    pub fn validate(&self, today: NaiveDate) -> Result<(), String> {
        if !is_valid_username(&self.username) {
            return Err("Invalid username format".to_string());
        }

        if self.date_of_birth > today {
            return Err("Date of birth must not be in the future".to_string());
        }

        Ok(())
    }
}

pub fn is_valid_username(username: &str) -> bool {
    let re = USERNAME_RE
        .get_or_init(|| Regex::new(USERNAME_PATTERN).expect("username pattern compiles"));
    re.is_match(username)
}

/// Strict parse, `YYYY-MM-DD` only. Everything else is a validation failure.
pub fn parse_birth_date(raw: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
}
