pub mod csv_handler;
pub mod time_parser;

pub use time_parser::parse_timestamp;
