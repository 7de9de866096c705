//! Command implementations.

pub mod enrich;
pub mod parse;

pub use self::enrich::execute_enrich;
pub use self::parse::execute_parse;
