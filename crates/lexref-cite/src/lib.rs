//! Citation grammar for Lexref.
//!
//! Converts between free-text legal citation strings and
//! [`lexref_core::citation`] types. Pure synchronous parsing and formatting;
//! the validator is the one async entry point, checking a parsed citation
//! against a [`lexref_core::store::ProvisionStore`].
//!
//! # Quick start
//!
//! ```no_run
//! use lexref_cite::parse;
//!
//! let parsed = parse("Section 3, Data Protection Act 2018");
//! assert!(parsed.is_valid());
//! ```

pub mod error;
mod format;
mod parse;
mod validate;

pub use error::{Error, Result};
pub use format::format;
pub use parse::parse;
pub use validate::validate;
