//! Common error handling utilities for the clinic engine
//!
//! Every business operation reports failures through [`ClinicError`]. The
//! variants follow the categories a caller can act on:
//!
//! - **MissingField / Validation**: the request itself is malformed
//! - **NotFound**: a referenced patient, doctor, appointment or prescription does not exist
//! - **AlreadyExists / Conflict**: a uniqueness rule or a booked time slot blocks the write
//! - **InvalidTransition**: the appointment status forbids the requested action
//! - **Storage**: the backing store failed; the underlying error is kept as the source
//!
//! Messages are part of the observable contract (`"time slot is already booked"`,
//! `"email already registered"`, ...) and are surfaced to callers verbatim,
//! except for storage failures which transports sanitize.
//!
//! # Example
//!
//! ```rust
//! use error_common::{ClinicError, StorageContext};
//!
//! fn lookup(found: Result<Option<u32>, std::io::Error>) -> error_common::Result<u32> {
//!     found
//!         .storage_context("failed to get patient")?
//!         .ok_or(ClinicError::not_found("patient"))
//! }
//!
//! let err = lookup(Ok(None)).unwrap_err();
//! assert_eq!(err.to_string(), "patient not found");
//! ```

pub mod codes;
pub mod context;
pub mod types;

pub use context::*;
pub use types::*;
