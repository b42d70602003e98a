//! Book instance (physical copy) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Loan status of a physical copy.
/// Persisted as the single-character codes m/o/a/r.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum LoanStatus {
    #[serde(rename = "maintenance")]
    Maintenance,
    #[serde(rename = "on loan")]
    OnLoan,
    #[serde(rename = "available")]
    Available,
    #[serde(rename = "reserved")]
    Reserved,
}

impl LoanStatus {
    /// Return the storage code for this status
    pub fn as_code(&self) -> &'static str {
        match self {
            LoanStatus::Maintenance => "m",
            LoanStatus::OnLoan => "o",
            LoanStatus::Available => "a",
            LoanStatus::Reserved => "r",
        }
    }

    /// A copy can be checked out only while it sits on the shelf
    pub fn can_check_out(&self) -> bool {
        matches!(self, LoanStatus::Available)
    }

    /// A copy can be checked in only while it is out with a borrower
    pub fn can_check_in(&self) -> bool {
        matches!(self, LoanStatus::OnLoan)
    }
}

impl From<&str> for LoanStatus {
    fn from(s: &str) -> Self {
        match s {
            "m" => LoanStatus::Maintenance,
            "o" => LoanStatus::OnLoan,
            "r" => LoanStatus::Reserved,
            _ => LoanStatus::Available,
        }
    }
}

impl Default for LoanStatus {
    fn default() -> Self {
        LoanStatus::Available
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_code())
    }
}

/// Internal row structure for database queries (status as raw code)
#[derive(Debug, Clone, FromRow)]
pub struct BookInstanceRow {
    id: Uuid,
    book_id: i32,
    imprint: String,
    status: String,
    due_back: Option<NaiveDate>,
    borrower_id: Option<i32>,
    #[sqlx(default)]
    book_title: Option<String>,
    #[sqlx(default)]
    language: Option<String>,
}

impl From<BookInstanceRow> for BookInstance {
    fn from(row: BookInstanceRow) -> Self {
        BookInstance {
            id: row.id,
            book_id: row.book_id,
            imprint: row.imprint,
            status: LoanStatus::from(row.status.as_str()),
            due_back: row.due_back,
            borrower_id: row.borrower_id,
            book_title: row.book_title,
            language: row.language,
        }
    }
}

/// Full book instance model (API shape).
/// `book_title` and `language` come from the owning book when queried with JOINs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookInstance {
    pub id: Uuid,
    pub book_id: i32,
    pub imprint: String,
    pub status: LoanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_back: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub borrower_id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub book_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Create instance request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct CreateBookInstance {
    #[validate(length(max = 200, message = "Imprint must be at most 200 characters"))]
    pub imprint: String,
    #[serde(default)]
    pub status: LoanStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

/// Update instance request (full-record replace)
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct UpdateBookInstance {
    #[validate(length(max = 200, message = "Imprint must be at most 200 characters"))]
    pub imprint: String,
    pub status: LoanStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

/// Check the borrower/due-date coupling rule: due_back is set exactly when the
/// copy is on loan, and a borrower is recorded only then.
pub fn check_loan_fields(
    status: LoanStatus,
    due_back: Option<NaiveDate>,
    borrower_id: Option<i32>,
) -> Result<(), crate::error::AppError> {
    let on_loan = status == LoanStatus::OnLoan;
    if on_loan != due_back.is_some() {
        return Err(crate::error::AppError::Validation(
            "due_back must be set exactly when status is 'on loan'".to_string(),
        ));
    }
    if borrower_id.is_some() && !on_loan {
        return Err(crate::error::AppError::Validation(
            "borrower_id may only be set when status is 'on loan'".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        for status in [
            LoanStatus::Maintenance,
            LoanStatus::OnLoan,
            LoanStatus::Available,
            LoanStatus::Reserved,
        ] {
            assert_eq!(LoanStatus::from(status.as_code()), status);
        }
    }

    #[test]
    fn unknown_code_defaults_to_available() {
        assert_eq!(LoanStatus::from("x"), LoanStatus::Available);
    }

    #[test]
    fn only_available_can_be_checked_out() {
        assert!(LoanStatus::Available.can_check_out());
        assert!(!LoanStatus::OnLoan.can_check_out());
        assert!(!LoanStatus::Maintenance.can_check_out());
        assert!(!LoanStatus::Reserved.can_check_out());
    }

    #[test]
    fn only_on_loan_can_be_checked_in() {
        assert!(LoanStatus::OnLoan.can_check_in());
        assert!(!LoanStatus::Available.can_check_in());
        assert!(!LoanStatus::Maintenance.can_check_in());
        assert!(!LoanStatus::Reserved.can_check_in());
    }

    #[test]
    fn loan_fields_require_due_date_on_loan() {
        let due = NaiveDate::from_ymd_opt(2024, 1, 1);
        assert!(check_loan_fields(LoanStatus::OnLoan, due, Some(42)).is_ok());
        assert!(check_loan_fields(LoanStatus::OnLoan, None, Some(42)).is_err());
        assert!(check_loan_fields(LoanStatus::Available, due, None).is_err());
        assert!(check_loan_fields(LoanStatus::Available, None, None).is_ok());
    }

    #[test]
    fn loan_fields_reject_borrower_off_loan() {
        assert!(check_loan_fields(LoanStatus::Reserved, None, Some(42)).is_err());
        assert!(check_loan_fields(LoanStatus::Maintenance, None, None).is_ok());
    }
}
