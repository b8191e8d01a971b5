//! Data acquisition: the World Bank HTTP client and its response decoder.

pub mod decode;
pub mod worldbank;

pub use decode::decode_series;
pub use worldbank::{DEFAULT_BASE_URL, WorldBankClient};
