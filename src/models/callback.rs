use chrono::NaiveDate;

use super::appointment::{is_slot_label, DATE_FORMAT};

/// Tagged payload attached to a selection button.
#[derive(Debug, Clone, PartialEq)]
pub enum CallbackData {
    Service(i64),
    Provider(i64),
    Day(NaiveDate),
    Time { date: NaiveDate, time: String },
    DeleteProvider(i64),
}

impl CallbackData {
    pub fn encode(&self) -> String {
        match self {
            CallbackData::Service(id) => format!("service:{id}"),
            CallbackData::Provider(id) => format!("provider:{id}"),
            CallbackData::Day(date) => format!("day:{}", date.format(DATE_FORMAT)),
            CallbackData::Time { date, time } => {
                format!("time:{}T{time}", date.format(DATE_FORMAT))
            }
            CallbackData::DeleteProvider(id) => format!("delprovider:{id}"),
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let (tag, value) = s.split_once(':')?;
        match tag {
            "service" => value.parse().ok().map(CallbackData::Service),
            "provider" => value.parse().ok().map(CallbackData::Provider),
            "day" => NaiveDate::parse_from_str(value, DATE_FORMAT)
                .ok()
                .map(CallbackData::Day),
            "time" => {
                let (date, time) = value.split_once('T')?;
                if !is_slot_label(time) {
                    return None;
                }
                let date = NaiveDate::parse_from_str(date, DATE_FORMAT).ok()?;
                Some(CallbackData::Time {
                    date,
                    time: time.to_string(),
                })
            }
            "delprovider" => value.parse().ok().map(CallbackData::DeleteProvider),
            _ => None,
        }
    }
}
