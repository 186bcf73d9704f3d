/// What the user sees when an exchange fails.
///
/// Failures are always logged; the policy only decides whether the view
/// also shows them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Log only. The loading indicator clears and nothing else happens.
    #[default]
    Silent,
    /// Log, and keep the error text as a notice until dismissed.
    Surfaced,
}

impl ErrorPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorPolicy::Silent => "silent",
            ErrorPolicy::Surfaced => "surfaced",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "silent" => Some(ErrorPolicy::Silent),
            "surfaced" => Some(ErrorPolicy::Surfaced),
            _ => None,
        }
    }
}
