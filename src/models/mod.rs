pub mod email;
pub mod event;
pub mod schedule;

pub use email::EmailMessage;
pub use event::{Attendee, CalendarEvent, EventTime};
pub use schedule::{
    coerce_participants, ClassifiedEmail, EventSubmission, NormalizedSchedule, NO_SCHEDULE_ACTION,
};
