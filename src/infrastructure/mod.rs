//! Infrastructure layer: persistence and outbound HTTP clients

pub mod database;
pub mod external;
pub mod storage;
