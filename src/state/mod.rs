pub mod app_settings;
pub mod app_state;
pub mod messages;
pub mod storage;
