use crate::domain::{LevelTag, Severity};

/// Maps a host level tag onto the remote severity scale.
///
/// Unrecognized tags are treated as errors.
pub fn severity_for(tag: &LevelTag) -> Severity {
    match tag {
        LevelTag::Trace | LevelTag::Info => Severity::Info,
        LevelTag::Profile | LevelTag::Warning => Severity::Warning,
        LevelTag::Error | LevelTag::Other(_) => Severity::Error,
    }
}
