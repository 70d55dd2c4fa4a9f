use time::OffsetDateTime;

use super::key::ContentKey;

/// One published message as held by the store.
///
/// `expires_at` is fixed at creation. A record whose `expires_at <= now` is
/// semantically gone even while it still physically exists in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRecord {
    pub key: ContentKey,
    pub payload: String,
    pub created_at: OffsetDateTime,
    pub expires_at: OffsetDateTime,
}

impl MessageRecord {
    pub fn is_active_at(&self, now: OffsetDateTime) -> bool {
        self.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use time::{Duration, macros::datetime};

    use super::*;

    #[test]
    fn expiry_boundary_is_exclusive() {
        let expires_at = datetime!(2025-01-04 00:00 UTC);
        let record = MessageRecord {
            key: ContentKey::new("abc123"),
            payload: "hi".to_string(),
            created_at: expires_at - Duration::days(3),
            expires_at,
        };

        assert!(record.is_active_at(expires_at - Duration::seconds(1)));
        assert!(!record.is_active_at(expires_at));
        assert!(!record.is_active_at(expires_at + Duration::seconds(1)));
    }
}
