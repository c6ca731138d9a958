//! Utility Module
//!
//! # Contents
//!
//! - [`AppError`] / [`AppResult`] - application error type and result alias
//! - [`Clock`] - injectable time source
//! - time helpers (UTC-midnight normalization, month windows)
//! - logger setup

pub mod clock;
pub mod error;
pub mod logger;
pub mod result;
pub mod time;

pub use clock::{Clock, FixedClock, SharedClock, SystemClock};
pub use error::AppError;
pub use result::AppResult;
