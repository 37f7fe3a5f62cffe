use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub user_id: i64,
    pub service_id: i64,
    pub provider_id: i64,
    pub date: NaiveDate,
    pub time: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewAppointment {
    pub user_id: i64,
    pub service_id: i64,
    pub provider_id: i64,
    pub date: NaiveDate,
    pub time: String,
}

/// Combines a calendar date and an "HH:MM" label into a local wall-clock instant.
pub fn starts_at(date: NaiveDate, time: &str) -> Option<NaiveDateTime> {
    NaiveTime::parse_from_str(time, TIME_FORMAT)
        .ok()
        .map(|t| date.and_time(t))
}

/// Accepts only labels in the exact form the slot generator emits.
pub fn is_slot_label(s: &str) -> bool {
    NaiveTime::parse_from_str(s, TIME_FORMAT)
        .map(|t| t.format(TIME_FORMAT).to_string() == s)
        .unwrap_or(false)
}
