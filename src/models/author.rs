//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Full author model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_death: Option<NaiveDate>,
}

/// Create author request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateAuthor {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Update author request (full-record replace)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateAuthor {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}

/// Check the birth/death ordering rule shared by create and update payloads
pub fn check_lifespan(
    date_of_birth: Option<NaiveDate>,
    date_of_death: Option<NaiveDate>,
) -> Result<(), crate::error::AppError> {
    if let (Some(birth), Some(death)) = (date_of_birth, date_of_death) {
        if death < birth {
            return Err(crate::error::AppError::Validation(
                "date_of_death cannot be before date_of_birth".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn lifespan_accepts_missing_dates() {
        assert!(check_lifespan(None, None).is_ok());
        assert!(check_lifespan(Some(date(1920, 1, 2)), None).is_ok());
        assert!(check_lifespan(None, Some(date(1999, 3, 4))).is_ok());
    }

    #[test]
    fn lifespan_rejects_death_before_birth() {
        assert!(check_lifespan(Some(date(1950, 6, 1)), Some(date(1940, 6, 1))).is_err());
    }

    #[test]
    fn lifespan_accepts_same_day() {
        assert!(check_lifespan(Some(date(1950, 6, 1)), Some(date(1950, 6, 1))).is_ok());
    }
}
