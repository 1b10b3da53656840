pub mod datetime;
pub mod format;
pub mod storage;
