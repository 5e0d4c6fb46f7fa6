pub mod adapters;
pub mod env;
pub mod error;
pub mod libsql;
pub mod logging;
pub mod primitives;
pub mod test_utils;
