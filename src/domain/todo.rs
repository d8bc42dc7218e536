use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Seconds of 0001-01-01T00:00:00Z relative to the Unix epoch.
pub const MIN_VALID_SECONDS: i64 = -62_135_596_800;
/// Seconds of 9999-12-31T23:59:59Z relative to the Unix epoch.
pub const MAX_VALID_SECONDS: i64 = 253_402_300_799;

pub const TITLE_MAX_CHARS: usize = 200;
pub const DESCRIPTION_MAX_CHARS: usize = 1024;

/// Store-assigned primary key of a to-do record.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(transparent)]
pub struct TodoId(pub i64);

impl std::fmt::Display for TodoId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

/// Absolute point in time as carried on the wire: whole seconds since the
/// Unix epoch plus a non-negative nanosecond offset.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Timestamp {
    #[serde(default)]
    pub seconds: i64,
    #[serde(default)]
    pub nanos: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimestampError {
    #[error("timestamp: {0:?}: nanos not in range [0, 1e9)")]
    NanosOutOfRange(Timestamp),
    #[error("timestamp: {0:?}: seconds out of range [0001-01-01, 9999-12-31]")]
    SecondsOutOfRange(Timestamp),
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: i32) -> Self { Self { seconds, nanos } }

    pub fn validate(&self) -> Result<(), TimestampError> {
        if !(0..1_000_000_000).contains(&self.nanos) {
            return Err(TimestampError::NanosOutOfRange(*self));
        }
        if !(MIN_VALID_SECONDS..=MAX_VALID_SECONDS).contains(&self.seconds) {
            return Err(TimestampError::SecondsOutOfRange(*self));
        }
        Ok(())
    }

    pub fn to_datetime(&self) -> Result<DateTime<Utc>, TimestampError> {
        self.validate()?;
        // nanos is in [0, 1e9) after validation
        DateTime::from_timestamp(self.seconds, self.nanos as u32).ok_or(TimestampError::SecondsOutOfRange(*self))
    }

    pub fn from_datetime(dt: DateTime<Utc>) -> Result<Self, TimestampError> {
        let ts = Self { seconds: dt.timestamp(), nanos: dt.timestamp_subsec_nanos() as i32 };
        ts.validate()?;
        Ok(ts)
    }
}

/// Public representation of a to-do task, as exchanged with callers.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToDo {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub reminder: Option<Timestamp>,
}

/// Storage representation of a to-do task, one row of the `todos` table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToDoRow {
    pub id: TodoId,
    pub title: String,
    pub description: String,
    pub reminder: DateTime<Utc>,
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("reminder is missing")]
    MissingReminder,
    #[error("reminder: {0}")]
    Reminder(#[from] TimestampError),
}

impl ToDo {
    /// Maps the public record onto its row shape. Pure; the store is not consulted.
    pub fn to_row(&self) -> Result<ToDoRow, ConversionError> {
        let reminder = self.reminder.ok_or(ConversionError::MissingReminder)?.to_datetime()?;
        Ok(ToDoRow { id: TodoId(self.id), title: self.title.clone(), description: self.description.clone(), reminder })
    }
}

impl ToDoRow {
    pub fn to_todo(&self) -> Result<ToDo, ConversionError> {
        Ok(ToDo {
            id: self.id.0,
            title: self.title.clone(),
            description: self.description.clone(),
            reminder: Some(Timestamp::from_datetime(self.reminder)?),
        })
    }

    /// Text form of `reminder` used by the SQL backend; keeps nanosecond precision.
    pub fn reminder_text(&self) -> String { self.reminder.to_rfc3339_opts(SecondsFormat::Nanos, true) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_nanos_is_malformed() {
        let err = Timestamp::new(1, -1).validate().unwrap_err();
        assert_eq!(err, TimestampError::NanosOutOfRange(Timestamp::new(1, -1)));
    }

    #[test]
    fn nanos_at_one_second_is_malformed() {
        assert!(Timestamp::new(0, 1_000_000_000).validate().is_err());
        assert!(Timestamp::new(0, 999_999_999).validate().is_ok());
    }

    #[test]
    fn seconds_bounds() {
        assert!(Timestamp::new(MIN_VALID_SECONDS, 0).validate().is_ok());
        assert!(Timestamp::new(MAX_VALID_SECONDS, 999_999_999).validate().is_ok());
        assert!(matches!(Timestamp::new(MIN_VALID_SECONDS - 1, 0).validate(), Err(TimestampError::SecondsOutOfRange(_))));
        assert!(matches!(Timestamp::new(MAX_VALID_SECONDS + 1, 0).validate(), Err(TimestampError::SecondsOutOfRange(_))));
    }

    #[test]
    fn to_row_keeps_fields_and_precision() {
        let todo = ToDo { id: 7, title: "title".into(), description: "description".into(), reminder: Some(Timestamp::new(1_700_000_000, 123_456_789)) };
        let row = todo.to_row().unwrap();
        assert_eq!(row.id, TodoId(7));
        assert_eq!(row.reminder.timestamp(), 1_700_000_000);
        assert_eq!(row.reminder.timestamp_subsec_nanos(), 123_456_789);
        assert_eq!(row.to_todo().unwrap(), todo);
    }

    #[test]
    fn to_row_without_reminder_fails() {
        let todo = ToDo { title: "t".into(), ..Default::default() };
        assert!(matches!(todo.to_row(), Err(ConversionError::MissingReminder)));
    }

    #[test]
    fn to_todo_rejects_unrepresentable_reminder() {
        let far_future = DateTime::from_timestamp(MAX_VALID_SECONDS + 86_400, 0).unwrap();
        let row = ToDoRow { id: TodoId(1), title: String::new(), description: String::new(), reminder: far_future };
        assert!(matches!(row.to_todo(), Err(ConversionError::Reminder(TimestampError::SecondsOutOfRange(_)))));
    }

    #[test]
    fn reminder_text_round_trips_through_rfc3339() {
        let row = ToDo { id: 1, title: String::new(), description: String::new(), reminder: Some(Timestamp::new(0, 5)) }.to_row().unwrap();
        assert_eq!(row.reminder_text(), "1970-01-01T00:00:00.000000005Z");
        let parsed = DateTime::parse_from_rfc3339(&row.reminder_text()).unwrap().with_timezone(&Utc);
        assert_eq!(parsed, row.reminder);
    }
}
