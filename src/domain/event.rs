use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Level tag attached to a raw log entry by the host's logging framework.
///
/// Unknown tags are preserved in `Other` so they can still be filtered on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LevelTag {
    Trace,
    Info,
    Profile,
    Warning,
    Error,
    Other(String),
}

impl LevelTag {
    pub fn as_str(&self) -> &str {
        match self {
            LevelTag::Trace => "trace",
            LevelTag::Info => "info",
            LevelTag::Profile => "profile",
            LevelTag::Warning => "warning",
            LevelTag::Error => "error",
            LevelTag::Other(tag) => tag,
        }
    }
}

impl FromStr for LevelTag {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_lowercase();
        Ok(match tag.as_str() {
            "trace" => LevelTag::Trace,
            "info" => LevelTag::Info,
            "profile" => LevelTag::Profile,
            "warning" => LevelTag::Warning,
            "error" => LevelTag::Error,
            _ => LevelTag::Other(tag),
        })
    }
}

impl From<&str> for LevelTag {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(tag) => tag,
            Err(never) => match never {},
        }
    }
}

impl fmt::Display for LevelTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured exception raised by the host application.
///
/// Required fields are optional here because hosts hand over whatever they
/// have; the normalizer drops events that are missing any of them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExceptionEvent {
    pub message: Option<String>,
    pub file: Option<String>,
    pub line: Option<u32>,
    pub trace_frames: Vec<String>,
    pub status_code: Option<String>,
}

impl ExceptionEvent {
    pub fn new(message: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            message: Some(message.into()),
            file: Some(file.into()),
            line: Some(line),
            trace_frames: Vec::new(),
            status_code: None,
        }
    }

    pub fn with_trace<I, S>(mut self, frames: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trace_frames = frames.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_status_code(mut self, status_code: impl Into<String>) -> Self {
        self.status_code = Some(status_code.into());
        self
    }
}

/// A raw, possibly multi-line, log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub text: String,
    pub level: LevelTag,
}

impl LogEvent {
    pub fn new(text: impl Into<String>, level: impl Into<LevelTag>) -> Self {
        Self {
            text: text.into(),
            level: level.into(),
        }
    }
}
