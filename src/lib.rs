//! Attendance Sheet Library
//!
//! This library builds monthly employee attendance sheets (one row per day,
//! weekends, public holidays and vacation days marked, totals in the footer),
//! renders them to PDF, and serves or emails them over HTTP.

pub mod builder;
pub mod error;
pub mod helpers;
pub mod models;
pub mod service;

pub use builder::{AttendanceDocument, AttendanceSheetBuilder, SheetTotals};
pub use error::{Result, SheetError};
pub use service::{SheetService, SheetServiceConfig};

// Re-export key types for convenience
pub use models::period::Period;
pub use models::request::SheetRequest;
pub use models::style::{CellStyle, StyleName};
pub use models::table::{Align, Cell, CellContent, Row};
