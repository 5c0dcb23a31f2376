pub mod football_data;
pub mod sporttery;
pub mod sync_log;
