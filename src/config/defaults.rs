//! Default value functions for configuration.

pub fn default_database_path() -> String {
    "streamgate.db".to_string()
}

pub fn default_log_filter() -> String {
    "info".to_string()
}
