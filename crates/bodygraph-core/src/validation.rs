use crate::GeoPoint;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Value out of range for field '{field}': {value}")]
    OutOfRange { field: String, value: String },

    #[error("Invalid calendar date: {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("Field '{field}' must be a finite number")]
    NonFinite { field: String },
}

pub trait Validate {
    fn validate(&self) -> Result<(), InputError>;
}

/// Numeric range checks shared by request types.
pub struct RangeValidator;

impl RangeValidator {
    pub fn check_u32(field: &str, value: u32, min: u32, max: u32) -> Result<u32, InputError> {
        if value < min || value > max {
            return Err(InputError::OutOfRange {
                field: field.to_string(),
                value: value.to_string(),
            });
        }
        Ok(value)
    }

    pub fn check_f64(field: &str, value: f64, min: f64, max: f64) -> Result<f64, InputError> {
        if !value.is_finite() {
            return Err(InputError::NonFinite {
                field: field.to_string(),
            });
        }
        if value < min || value > max {
            return Err(InputError::OutOfRange {
                field: field.to_string(),
                value: value.to_string(),
            });
        }
        Ok(value)
    }
}

/// Birth moment as entered, plus the UTC instant the caller resolved it to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthData {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub latitude: f64,
    pub longitude: f64,
    pub utc: DateTime<Utc>,
}

impl BirthData {
    pub fn location(&self) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

impl Validate for BirthData {
    fn validate(&self) -> Result<(), InputError> {
        if !(1..=9999).contains(&self.year) {
            return Err(InputError::OutOfRange {
                field: "year".to_string(),
                value: self.year.to_string(),
            });
        }
        RangeValidator::check_u32("month", self.month, 1, 12)?;
        RangeValidator::check_u32("day", self.day, 1, 31)?;
        RangeValidator::check_u32("hour", self.hour, 0, 23)?;
        RangeValidator::check_u32("minute", self.minute, 0, 59)?;
        if NaiveDate::from_ymd_opt(self.year, self.month, self.day).is_none() {
            return Err(InputError::InvalidDate {
                year: self.year,
                month: self.month,
                day: self.day,
            });
        }
        RangeValidator::check_f64("latitude", self.latitude, -90.0, 90.0)?;
        RangeValidator::check_f64("longitude", self.longitude, -180.0, 180.0)?;
        Ok(())
    }
}
