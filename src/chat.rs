use crate::entity::Sender;
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub content: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Build a message stamped with the current time and a fresh id.
    pub fn new(sender: Sender, content: impl Into<String>) -> Self {
        Self {
            id: next_message_id(),
            content: content.into(),
            sender,
            timestamp: Utc::now(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Sender::User, content)
    }

    pub fn owner(content: impl Into<String>) -> Self {
        Self::new(Sender::Owner, content)
    }
}

pub fn next_message_id() -> String {
    format!("msg_{}", Uuid::new_v4().simple())
}

/// `HH:MM` in the local time zone, as shown under each bubble.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    format_timestamp_in(timestamp, &Local)
}

pub fn format_timestamp_in<Tz: TimeZone>(timestamp: &DateTime<Utc>, zone: &Tz) -> String
where
    Tz::Offset: std::fmt::Display,
{
    timestamp.with_timezone(zone).format("%H:%M").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn message_ids_are_unique() {
        let a = ChatMessage::user("hi");
        let b = ChatMessage::user("hi");
        assert_ne!(a.id, b.id);
        assert!(a.id.starts_with("msg_"));
    }

    #[test]
    fn timestamp_has_no_seconds() {
        let ts = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 42).unwrap();
        assert_eq!(format_timestamp_in(&ts, &Utc), "07:05");

        let cet = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(format_timestamp_in(&ts, &cet), "08:05");
    }
}
