//! Google Calendar side of the bot.

mod auth;
mod calendar;
mod from_google;
mod to_google;

pub use auth::access_token;
pub use calendar::{CalendarEvent, CalendarService, CalendarTime, GoogleCalendar};
