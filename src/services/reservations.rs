//! Reservation orchestration
//!
//! Creating or cancelling a reservation takes two dependent remote
//! mutations: the loan write and a full-record book update flipping the
//! availability flag. The server offers no transaction spanning both, so
//! this service sequences them, serializes operations per book within the
//! process, and compensates the first step when the second one fails.
//! A partial-application error is reported only when the compensation
//! itself fails; that state needs manual reconciliation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::error::{ClientError, ClientResult, PartialFailure};
use crate::gateway::{self, Gateway, Resource};
use crate::models::{Book, Loan, LoanPayload};

pub struct ReservationsService {
    gateway: Arc<dyn Gateway>,
    /// Per-book serialization point. Two staff actions on the same book in
    /// this process cannot interleave their check and their two steps.
    /// Cross-process races still exist; closing them needs a conditional
    /// update on the server.
    book_locks: Mutex<HashMap<i32, Arc<Mutex<()>>>>,
}

impl ReservationsService {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            book_locks: Mutex::new(HashMap::new()),
        }
    }

    async fn lock_for(&self, book_id: i32) -> Arc<Mutex<()>> {
        let mut locks = self.book_locks.lock().await;
        locks
            .entry(book_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Evict the lock entry once no task holds or awaits it, so the map
    /// does not grow with every book ever reserved.
    async fn release_lock(&self, book_id: i32) {
        let mut locks = self.book_locks.lock().await;
        if let Some(entry) = locks.get(&book_id) {
            if Arc::strong_count(entry) == 1 {
                locks.remove(&book_id);
            }
        }
    }

    /// All reservations currently known to the server.
    pub async fn list_reservations(&self) -> ClientResult<Vec<Loan>> {
        gateway::fetch_all(self.gateway.as_ref(), Resource::Loans).await
    }

    /// Reserve a book for a user.
    ///
    /// Step A posts the loan; step B flips the book to unavailable with a
    /// full-record update echoing the state fetched moments before. If step
    /// B fails the loan is deleted again, so the caller either gets a loan
    /// and a consistent book, or an error with the prior state restored.
    pub async fn create_reservation(
        &self,
        book_id: i32,
        user_id: i32,
        loan_date: NaiveDate,
        due_date: NaiveDate,
    ) -> ClientResult<Loan> {
        let lock = self.lock_for(book_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.create_locked(book_id, user_id, loan_date, due_date)
                .await
        };
        drop(lock);
        self.release_lock(book_id).await;
        result
    }

    async fn create_locked(
        &self,
        book_id: i32,
        user_id: i32,
        loan_date: NaiveDate,
        due_date: NaiveDate,
    ) -> ClientResult<Loan> {
        // Fresh read inside the critical section: the later PUT must echo
        // every field, and the availability check must not act on a stale
        // snapshot from before a concurrent reservation landed.
        let book: Book = gateway::fetch_one(self.gateway.as_ref(), Resource::Books, book_id).await?;
        if !book.available {
            return Err(ClientError::Precondition(format!(
                "book {} is not available for reservation",
                book_id
            )));
        }
        // Resolve the update payload before mutating anything; a record
        // missing its author or genre cannot be flipped back later.
        let book_update = book.replace_payload(false)?;

        // Step A: create the loan.
        let loan: Loan = gateway::create(
            self.gateway.as_ref(),
            Resource::Loans,
            &LoanPayload::new(book_id, user_id, loan_date, due_date),
        )
        .await?;
        tracing::info!(loan_id = loan.id, book_id, user_id, "loan created");

        // Step B: mark the book unavailable.
        match gateway::update::<Value, _>(self.gateway.as_ref(), Resource::Books, book_id, &book_update)
            .await
        {
            Ok(_) => {
                tracing::info!(book_id, "book marked unavailable");
                Ok(loan)
            }
            Err(step_error) => {
                tracing::warn!(
                    loan_id = loan.id,
                    book_id,
                    error = %step_error,
                    "book update failed after loan creation; deleting loan"
                );
                match gateway::remove(self.gateway.as_ref(), Resource::Loans, loan.id).await {
                    Ok(()) => {
                        tracing::info!(loan_id = loan.id, "loan deleted, prior state restored");
                        Err(step_error)
                    }
                    Err(compensation_error) => Err(ClientError::Partial(PartialFailure {
                        operation: "create_reservation",
                        book_id,
                        orphaned_loan_id: Some(loan.id),
                        step_error: step_error.to_string(),
                        compensation_error: compensation_error.to_string(),
                    })),
                }
            }
        }
    }

    /// Cancel a reservation and release its book.
    ///
    /// Step A deletes the loan; step B flips the book back to available. If
    /// step B fails the loan is re-created from its remembered fields. A
    /// book deleted out-of-band is tolerated: the loan is removed and there
    /// is no flag left to restore.
    pub async fn cancel_reservation(&self, loan: &Loan) -> ClientResult<()> {
        let lock = self.lock_for(loan.book_id).await;
        let result = {
            let _guard = lock.lock().await;
            self.cancel_locked(loan).await
        };
        drop(lock);
        self.release_lock(loan.book_id).await;
        result
    }

    async fn cancel_locked(&self, loan: &Loan) -> ClientResult<()> {
        // The restore payload must exist before the loan is touched; an
        // un-updatable book (missing author or genre) aborts the whole
        // operation with nothing mutated.
        let book_update =
            match gateway::fetch_one::<Book>(self.gateway.as_ref(), Resource::Books, loan.book_id)
                .await
            {
                Ok(book) => Some(book.replace_payload(true)?),
                Err(err) if err.is_not_found() => None,
                Err(err) => return Err(err),
            };

        let restore = LoanPayload::from(loan);

        // Step A: delete the loan.
        gateway::remove(self.gateway.as_ref(), Resource::Loans, loan.id).await?;
        tracing::info!(loan_id = loan.id, book_id = loan.book_id, "loan deleted");

        // Step B: mark the book available again.
        let Some(book_update) = book_update else {
            tracing::warn!(
                loan_id = loan.id,
                book_id = loan.book_id,
                "book no longer exists; no availability to restore"
            );
            return Ok(());
        };

        match gateway::update::<Value, _>(
            self.gateway.as_ref(),
            Resource::Books,
            loan.book_id,
            &book_update,
        )
        .await
        {
            Ok(_) => {
                tracing::info!(book_id = loan.book_id, "book marked available");
                Ok(())
            }
            Err(step_error) => {
                tracing::warn!(
                    book_id = loan.book_id,
                    error = %step_error,
                    "book update failed after loan deletion; restoring loan"
                );
                match gateway::create::<Loan, _>(self.gateway.as_ref(), Resource::Loans, &restore)
                    .await
                {
                    Ok(restored) => {
                        tracing::info!(
                            loan_id = restored.id,
                            "loan restored, reservation still in place"
                        );
                        Err(step_error)
                    }
                    Err(compensation_error) => Err(ClientError::Partial(PartialFailure {
                        operation: "cancel_reservation",
                        book_id: loan.book_id,
                        orphaned_loan_id: None,
                        step_error: step_error.to_string(),
                        compensation_error: compensation_error.to_string(),
                    })),
                }
            }
        }
    }

    /// Edit a reservation in place (dates, user). The book keeps its
    /// reserved state, so no availability update is involved.
    pub async fn update_reservation(
        &self,
        loan_id: i32,
        payload: &LoanPayload,
    ) -> ClientResult<Loan> {
        gateway::update(self.gateway.as_ref(), Resource::Loans, loan_id, payload).await
    }
}
