use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use log::info;
use thiserror::Error;

use crate::models::user::{self, UserRecord};
use crate::repositories::{RepoError, UserRepository};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("invalid request")]
    Validation,
    #[error("no data for user {0}")]
    NotFound(String),
    #[error("storage error: {0}")]
    Storage(#[from] RepoError),
}

/// Core service: validates input, does the single read or write against the
/// store, and renders the response message.
#[derive(Clone)]
pub struct BirthdayService {
    repo: Arc<dyn UserRepository>,
}

impl BirthdayService {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    pub async fn get_user_data(&self, username: &str) -> Result<String, ServiceError> {
        if !user::is_valid_username(username) {
            info!("Invalid username format: {}", username);
            return Err(ServiceError::Validation);
        }

        info!("Checking for {} user in the store.", username);
        let record = self
            .repo
            .get(username)
            .await?
            .ok_or_else(|| ServiceError::NotFound(username.to_string()))?;

        let today = Utc::now().naive_utc().date();
        Ok(birthday_message(&record.username, record.date_of_birth, today))
    }

    pub async fn put_user_data(&self, username: &str, raw_date: &str) -> Result<(), ServiceError> {
        let date_of_birth =
            user::parse_birth_date(raw_date).map_err(|_| ServiceError::Validation)?;

        let record = UserRecord {
            username: username.to_string(),
            date_of_birth,
        };

        let today = Utc::now().naive_utc().date();
        if let Err(reason) = record.validate(today) {
            info!("Rejecting write for {}: {}", username, reason);
            return Err(ServiceError::Validation);
        }

        info!("Inserting {}'s date of birth.", username);
        self.repo.put(&record).await?;
        Ok(())
    }
}

/// Render the body returned for a stored birth date compared against today.
pub fn birthday_message(username: &str, date_of_birth: NaiveDate, today: NaiveDate) -> String {
    let anchored = anchor_to_year(date_of_birth, today.year());

    if anchored == today {
        format!("Hello, {}! Happy birthday!", username)
    } else {
        let delta = days_until_next_birthday(anchored, today);
        format!("Hello, {}! Your birthday is in {} days.", username, delta)
    }
}

/// Replace the year of a birth date for comparison against today. Feb 29
/// clamps to Feb 28 when the target year is not a leap year.
pub fn anchor_to_year(date_of_birth: NaiveDate, year: i32) -> NaiveDate {
    date_of_birth
        .with_year(year)
        .or_else(|| NaiveDate::from_ymd_opt(year, 2, 28))
        .unwrap_or(date_of_birth)
}

/// Days from `today` to the next occurrence of the anchored birth date. When
/// this year's occurrence has already passed, the count wraps using the
/// current year's length, so it is off by one when this year and next differ
/// in leap status. Kept that way: changing it changes observable output.
pub fn days_until_next_birthday(anchored: NaiveDate, today: NaiveDate) -> i64 {
    if anchored > today {
        anchored.signed_duration_since(today).num_days()
    } else {
        days_in_year(anchored.year()) - today.signed_duration_since(anchored).num_days()
    }
}

pub fn days_in_year(year: i32) -> i64 {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}
