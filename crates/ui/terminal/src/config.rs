use serde::Deserialize;

/// `[terminal]` section of the application config.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct TerminalConfig {
    /// Initial text of the file prompt.
    #[serde(default)]
    pub file_dialog_start: String,
    /// Reject paths that do not name an existing file.
    #[serde(default)]
    pub require_existing_file: bool,
}
