use chrono_tz::Tz;

use crate::cache::ScheduleCache;
use crate::config::AppConfig;
use crate::services::ai::LlmProvider;
use crate::services::calendar::CalendarProvider;
use crate::services::mail::MailProvider;

pub struct AppState {
    pub config: AppConfig,
    pub timezone: Tz,
    pub llm: Box<dyn LlmProvider>,
    pub mail: Box<dyn MailProvider>,
    pub calendar: Box<dyn CalendarProvider>,
    pub cache: ScheduleCache,
}
