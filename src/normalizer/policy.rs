use crate::domain::SuppressReason;

pub const DEFAULT_SUPPRESSED_STATUS: &str = "404";
/// Category Yii attaches to log lines produced by a 404 `CHttpException`.
pub const DEFAULT_SUPPRESSED_MARKER: &str = "exception.CHttpException.404";

/// Rules for events that are intentionally never reported.
///
/// Both triggers are lists; an empty list turns that trigger off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuppressionPolicy {
    pub status_codes: Vec<String>,
    pub markers: Vec<String>,
}

impl Default for SuppressionPolicy {
    fn default() -> Self {
        Self {
            status_codes: vec![DEFAULT_SUPPRESSED_STATUS.to_string()],
            markers: vec![DEFAULT_SUPPRESSED_MARKER.to_string()],
        }
    }
}

impl SuppressionPolicy {
    pub fn none() -> Self {
        Self {
            status_codes: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn check_status(&self, status_code: Option<&str>) -> Option<SuppressReason> {
        let code = status_code?.trim();
        self.status_codes
            .iter()
            .find(|suppressed| suppressed.trim() == code)
            .map(|_| SuppressReason::StatusCode(code.to_string()))
    }

    pub fn check_text(&self, text: &str) -> Option<SuppressReason> {
        self.markers
            .iter()
            .filter(|marker| !marker.is_empty())
            .find(|marker| text.contains(marker.as_str()))
            .map(|marker| SuppressReason::Marker(marker.clone()))
    }
}
