pub mod activity_types;
pub mod classify_types;
pub mod config_types;
pub mod permission_types;
pub mod screen_types;
