//! Shared value parsers and patterns for Chilean customs documents.

pub mod amounts;
pub mod container;
pub mod dates;
pub mod patterns;
pub mod rut;

pub use amounts::{format_chilean_amount, parse_chilean_amount, parse_count, parse_us_amount};
pub use container::{normalize_container, verify_container};
pub use dates::{parse_date, spanish_month_to_number};
pub use rut::{expected_check_digit, normalize_rut, verify_rut};
