//! Normalisation of free-text request fields.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;

use crate::error::{AppError, AppResult};

lazy_static! {
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap();
    static ref PHONE_REGEX: Regex = Regex::new(r"^\+?[0-9][0-9 -]{6,18}[0-9]$").unwrap();
}

/// Trims the value; blank strings become `None`.
pub fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Trims the value and rejects it when blank.
pub fn required_text(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

pub fn validate_email(email: &str) -> AppResult<String> {
    let email = email.trim().to_lowercase();
    if !EMAIL_REGEX.is_match(&email) {
        return Err(AppError::validation(format!("{email} is not a valid email address")));
    }
    Ok(email)
}

pub fn validate_phone(phone: &str) -> AppResult<String> {
    let phone = required_text(phone, "Phone")?;
    if !PHONE_REGEX.is_match(&phone) {
        return Err(AppError::validation(format!("{phone} is not a valid phone number")));
    }
    Ok(phone)
}

/// Accepts `http(s)://` links; a bare host gets `https://` prepended.
pub fn normalize_url(url: &str) -> AppResult<String> {
    let url = url.trim();
    if url.is_empty() {
        return Err(AppError::validation("Link cannot be empty"));
    }
    let url = if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else if url.contains("://") {
        return Err(AppError::validation(format!("{url} is not an http(s) link")));
    } else {
        format!("https://{url}")
    };
    if url.contains(char::is_whitespace) {
        return Err(AppError::validation(format!("{url} is not a valid link")));
    }
    Ok(url)
}

/// Combines separate `YYYY-MM-DD` and `HH:MM` form fields.
pub fn parse_date_time(date: &str, time: &str, label: &str) -> AppResult<DateTime<Utc>> {
    let date = date.trim();
    let time = time.trim();
    let day = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| {
        AppError::validation(format!("{label} date {date} is not in YYYY-MM-DD format"))
    })?;
    let clock = NaiveTime::parse_from_str(time, "%H:%M").map_err(|_| {
        AppError::validation(format!("{label} time {time} is not in HH:MM format"))
    })?;
    Ok(day.and_time(clock).and_utc())
}
