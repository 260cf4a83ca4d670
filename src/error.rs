use std::path::PathBuf;

/// Errors that can end a session before its first frame.
///
/// Nothing on the per-frame path returns one of these; frames treat bad or
/// missing input as "nothing happened".
#[derive(Debug)]
pub enum RevealError {
    /// Reading or writing a file failed.
    Io { path: PathBuf, source: std::io::Error },

    /// Settings file exists but is not valid JSON for `Settings`.
    SettingsParse { path: PathBuf, source: serde_json::Error },

    /// Settings parsed but describe an impossible session.
    InvalidSettings(String),

    /// A font could not be loaded.
    FontLoad(String),

    /// The particle engine could not be brought up.
    EngineLoad(String),
}

impl std::fmt::Display for RevealError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RevealError::Io { path, source } => {
                write!(f, "I/O error on {}: {}", path.display(), source)
            }
            RevealError::SettingsParse { path, source } => {
                write!(f, "Invalid settings file {}: {}", path.display(), source)
            }
            RevealError::InvalidSettings(msg) => write!(f, "Invalid settings: {}", msg),
            RevealError::FontLoad(msg) => write!(f, "Failed to load font: {}", msg),
            RevealError::EngineLoad(msg) => write!(f, "Failed to load particle engine: {}", msg),
        }
    }
}

impl std::error::Error for RevealError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RevealError::Io { source, .. } => Some(source),
            RevealError::SettingsParse { source, .. } => Some(source),
            _ => None,
        }
    }
}
