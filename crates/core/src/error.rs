#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Invalid value {value:?} for {setting} (expected one of: {expected})")]
    InvalidSetting {
        setting: &'static str,
        value: String,
        expected: &'static str,
    },

    #[error("Invalid identifier {0:?}")]
    InvalidIdentifier(String),
}
