use std::collections::HashSet;

use chrono::NaiveDate;
use rusqlite::Connection;

use crate::db::queries;
use crate::services::slots::SlotGenerator;

/// Slots not present in `booked`, in generator order.
///
/// Matching is exact on the "HH:MM" label.
pub fn free_slots<I>(slots: I, booked: &[String]) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let booked: HashSet<&str> = booked.iter().map(String::as_str).collect();
    slots
        .into_iter()
        .filter(|slot| !booked.contains(slot.as_str()))
        .collect()
}

pub fn available_slots(
    conn: &Connection,
    generator: &SlotGenerator,
    date: NaiveDate,
    provider_id: i64,
) -> anyhow::Result<Vec<String>> {
    let booked = queries::get_booked_times(conn, date, provider_id)?;
    let free = free_slots(generator.iter(), &booked);

    tracing::debug!(
        %date,
        provider_id,
        booked = booked.len(),
        free = free.len(),
        "resolved availability"
    );

    Ok(free)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use crate::models::NewAppointment;

    fn labels(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_free_slots_preserves_order() {
        let slots = labels(&["09:00", "09:30", "10:00", "10:30"]);
        let booked = labels(&["10:00", "09:00"]);
        assert_eq!(free_slots(slots, &booked), labels(&["09:30", "10:30"]));
    }

    #[test]
    fn test_free_slots_empty_iff_all_booked() {
        let slots = labels(&["09:00", "09:30"]);
        assert!(free_slots(slots.clone(), &labels(&["09:30", "09:00", "12:00"])).is_empty());
        assert_eq!(free_slots(slots.clone(), &[]), slots);
    }

    #[test]
    fn test_non_canonical_labels_are_not_excluded() {
        let slots = labels(&["09:00"]);
        assert_eq!(free_slots(slots, &labels(&["9:00"])), labels(&["09:00"]));
    }

    #[test]
    fn test_available_slots_excludes_booked_time() {
        let conn = db::init_db(":memory:").unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 16).unwrap();
        queries::add_appointment(
            &conn,
            &NewAppointment {
                user_id: 1,
                service_id: 1,
                provider_id: 5,
                date,
                time: "10:00".to_string(),
            },
        )
        .unwrap();

        let generator = SlotGenerator::new(9, 18, 30);
        let free = available_slots(&conn, &generator, date, 5).unwrap();
        assert_eq!(free.len(), 17);
        assert!(!free.contains(&"10:00".to_string()));
        assert!(free.contains(&"09:30".to_string()));
        assert!(free.contains(&"10:30".to_string()));

        // Other providers are unaffected
        assert_eq!(available_slots(&conn, &generator, date, 6).unwrap().len(), 18);
    }
}
