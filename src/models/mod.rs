pub mod period;
pub mod request;
pub mod style;
pub mod table;
