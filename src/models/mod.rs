//! Wire models for the resource server and the external catalog

pub mod author;
pub mod book;
pub mod event;
pub mod external;
pub mod genre;
pub mod loan;
pub mod search;
pub mod user;

pub use author::{Author, AuthorPayload};
pub use book::{Book, BookDraft, BookPayload};
pub use event::{Event, EventPayload};
pub use external::{ExternalBookRecord, ExternalSearchResponse};
pub use genre::{Genre, GenrePayload};
pub use loan::{Loan, LoanPayload, STATUS_ACTIVE};
pub use search::SearchResult;
pub use user::{Role, User, UserPayload};
