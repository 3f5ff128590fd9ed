pub mod google;

use async_trait::async_trait;
use chrono::{Duration, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

use crate::errors::AppError;
use crate::models::{Attendee, CalendarEvent, EventTime, NormalizedSchedule};
use crate::services::timeparse;

const EVENT_DESCRIPTION: &str = "Created automatically from an unread email";

#[async_trait]
pub trait CalendarProvider: Send + Sync {
    /// Insert the event and return a link to it.
    async fn insert_event(&self, event: &CalendarEvent) -> Result<String, AppError>;
}

/// Turn a normalized schedule into a timezone-qualified calendar event.
/// An unparseable date or time aborts this one event. Attendees are built
/// only from participants that look like addresses; the rest are dropped.
pub fn build_event(schedule: &NormalizedSchedule, timezone: Tz) -> Result<CalendarEvent, AppError> {
    let date = timeparse::parse_date(&schedule.date)?;
    let start = timeparse::parse_time(&schedule.start_time)?;
    let end = if schedule.end_time.trim().is_empty() {
        start + Duration::minutes(30)
    } else {
        timeparse::parse_time(&schedule.end_time)?
    };

    let start_instant = localize(date.and_time(start), timezone)?;
    let end_instant = localize(date.and_time(end), timezone)?;

    let attendees = schedule
        .participants
        .iter()
        .filter(|p| p.contains('@'))
        .map(|p| Attendee { email: p.clone() })
        .collect();

    Ok(CalendarEvent {
        summary: schedule.title.clone(),
        location: schedule.location.clone(),
        description: EVENT_DESCRIPTION.to_string(),
        start: EventTime {
            date_time: start_instant,
            time_zone: timezone.name().to_string(),
        },
        end: EventTime {
            date_time: end_instant,
            time_zone: timezone.name().to_string(),
        },
        attendees,
    })
}

fn localize(naive: NaiveDateTime, timezone: Tz) -> Result<String, AppError> {
    timezone
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.to_rfc3339())
        .ok_or_else(|| {
            AppError::TimeFormat(format!("{naive} does not exist in {}", timezone.name()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;

    fn schedule() -> NormalizedSchedule {
        NormalizedSchedule {
            title: "Team Standup".to_string(),
            date: "2025-10-23".to_string(),
            start_time: "09:00".to_string(),
            end_time: "09:30".to_string(),
            location: "Zoom".to_string(),
            participants: vec![
                "alice@example.com".to_string(),
                "the catering team".to_string(),
                "bob@example.com".to_string(),
            ],
        }
    }

    #[test]
    fn test_build_event_localizes_instants() {
        let event = build_event(&schedule(), New_York).unwrap();
        // October is EDT, UTC-4
        assert_eq!(event.start.date_time, "2025-10-23T09:00:00-04:00");
        assert_eq!(event.end.date_time, "2025-10-23T09:30:00-04:00");
        assert_eq!(event.start.time_zone, "America/New_York");
        assert_eq!(event.summary, "Team Standup");
        assert_eq!(event.location, "Zoom");
    }

    #[test]
    fn test_non_address_participants_dropped() {
        let event = build_event(&schedule(), New_York).unwrap();
        let emails: Vec<&str> = event.attendees.iter().map(|a| a.email.as_str()).collect();
        assert_eq!(emails, vec!["alice@example.com", "bob@example.com"]);
    }

    #[test]
    fn test_empty_end_time_falls_back_to_half_hour() {
        let mut s = schedule();
        s.end_time = String::new();
        let event = build_event(&s, New_York).unwrap();
        assert_eq!(event.end.date_time, "2025-10-23T09:30:00-04:00");
    }

    #[test]
    fn test_twelve_hour_times_accepted() {
        let mut s = schedule();
        s.start_time = "3:00 PM".to_string();
        s.end_time = "4:15 PM".to_string();
        let event = build_event(&s, New_York).unwrap();
        assert_eq!(event.start.date_time, "2025-10-23T15:00:00-04:00");
        assert_eq!(event.end.date_time, "2025-10-23T16:15:00-04:00");
    }

    #[test]
    fn test_bad_date_aborts_event() {
        let mut s = schedule();
        s.date = "whenever".to_string();
        assert!(matches!(
            build_event(&s, New_York),
            Err(AppError::DateFormat(_))
        ));
    }

    #[test]
    fn test_bad_time_aborts_event() {
        let mut s = schedule();
        s.start_time = "after lunch".to_string();
        assert!(matches!(
            build_event(&s, New_York),
            Err(AppError::TimeFormat(_))
        ));
    }
}
