//! The four-way outcome of resolving a content key at a point in time.

use serde::Serialize;

/// Result of resolving a key against the store.
///
/// `Expired` and `Absent` are ordinary outcomes, not errors; only a store that
/// cannot be reached produces `BackendUnavailable`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// The record exists and has not expired. Carries the message body, which may be empty.
    Active(String),
    /// The record exists but `expires_at <= now`.
    Expired,
    /// No record with this key was ever created.
    Absent,
    /// The store could not be probed or queried.
    BackendUnavailable,
}

impl Classification {
    pub fn kind(&self) -> ClassificationKind {
        match self {
            Classification::Active(_) => ClassificationKind::Active,
            Classification::Expired => ClassificationKind::Expired,
            Classification::Absent => ClassificationKind::Absent,
            Classification::BackendUnavailable => ClassificationKind::Unavailable,
        }
    }

    pub fn payload(&self) -> Option<&str> {
        match self {
            Classification::Active(payload) => Some(payload.as_str()),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, Classification::BackendUnavailable)
    }
}

/// Payload-free discriminant, used for logging, metrics labels and API bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationKind {
    Active,
    Expired,
    Absent,
    Unavailable,
}

impl ClassificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ClassificationKind::Active => "active",
            ClassificationKind::Expired => "expired",
            ClassificationKind::Absent => "absent",
            ClassificationKind::Unavailable => "unavailable",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_still_active() {
        let classification = Classification::Active(String::new());
        assert_eq!(classification.kind(), ClassificationKind::Active);
        assert_eq!(classification.payload(), Some(""));
    }

    #[test]
    fn kind_labels_are_stable() {
        assert_eq!(Classification::Expired.kind().as_str(), "expired");
        assert_eq!(Classification::Absent.kind().as_str(), "absent");
        assert_eq!(
            Classification::BackendUnavailable.kind().as_str(),
            "unavailable"
        );
    }
}
