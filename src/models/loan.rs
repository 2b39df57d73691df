//! Loan (reservation) model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Status id the server assigns to a live reservation.
pub const STATUS_ACTIVE: i32 = 1;

/// Loan record as served by the resource server, joined with user and book
/// display fields. The list endpoint serves snake_case keys while the create
/// endpoint echoes the camelCase payload back, hence the aliases.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Loan {
    pub id: i32,
    #[serde(alias = "loanDate")]
    pub loan_date: NaiveDate,
    #[serde(alias = "dueDate")]
    pub due_date: NaiveDate,
    #[serde(default, alias = "returnDate")]
    pub return_date: Option<NaiveDate>,
    #[serde(alias = "userId")]
    pub user_id: i32,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_first_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(alias = "bookId")]
    pub book_id: i32,
    #[serde(default)]
    pub book_title: Option<String>,
    #[serde(default)]
    pub book_isbn: Option<String>,
    #[serde(default = "default_status", alias = "statusId")]
    pub loan_status_id: i32,
    #[serde(default)]
    pub loan_status_name: Option<String>,
}

fn default_status() -> i32 {
    STATUS_ACTIVE
}

impl Loan {
    /// A loan is active while its return date is unset or in the future.
    pub fn is_active(&self, today: NaiveDate) -> bool {
        self.return_date.map_or(true, |date| date >= today)
    }
}

/// Write payload for POST/PUT on `/loans`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LoanPayload {
    pub loan_date: NaiveDate,
    pub due_date: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub user_id: i32,
    pub book_id: i32,
    pub status_id: i32,
}

impl LoanPayload {
    /// Payload for a fresh reservation. The server expects the return date
    /// mirrored from the due date on creation.
    pub fn new(book_id: i32, user_id: i32, loan_date: NaiveDate, due_date: NaiveDate) -> Self {
        Self {
            loan_date,
            due_date,
            return_date: Some(due_date),
            user_id,
            book_id,
            status_id: STATUS_ACTIVE,
        }
    }
}

impl From<&Loan> for LoanPayload {
    /// Reconstruct the write payload from a served record, e.g. to restore
    /// a loan deleted by a cancellation whose book update then failed.
    fn from(loan: &Loan) -> Self {
        Self {
            loan_date: loan.loan_date,
            due_date: loan.due_date,
            return_date: loan.return_date,
            user_id: loan.user_id,
            book_id: loan.book_id,
            status_id: loan.loan_status_id,
        }
    }
}
