use chrono::NaiveDate;
use rusqlite::{params, Connection, ErrorCode};

use crate::errors::BookingError;
use crate::models::appointment::DATE_FORMAT;
use crate::models::{Appointment, NewAppointment, Provider, Service};

// ── Services ──

pub fn insert_service(
    conn: &Connection,
    name: &str,
    price: i64,
    duration_minutes: i64,
) -> anyhow::Result<i64> {
    conn.execute(
        "INSERT INTO services (name, price, duration) VALUES (?1, ?2, ?3)",
        params![name, price, duration_minutes],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn get_services(conn: &Connection) -> anyhow::Result<Vec<Service>> {
    let mut stmt = conn.prepare("SELECT id, name, price, duration FROM services ORDER BY id ASC")?;
    let rows = stmt.query_map([], parse_service_row)?;

    let mut services = vec![];
    for row in rows {
        services.push(row?);
    }
    Ok(services)
}

pub fn get_service(conn: &Connection, id: i64) -> anyhow::Result<Option<Service>> {
    let result = conn.query_row(
        "SELECT id, name, price, duration FROM services WHERE id = ?1",
        params![id],
        parse_service_row,
    );

    match result {
        Ok(service) => Ok(Some(service)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn parse_service_row(row: &rusqlite::Row) -> rusqlite::Result<Service> {
    Ok(Service {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        duration_minutes: row.get(3)?,
    })
}

// ── Providers ──

pub fn insert_provider(conn: &Connection, name: &str) -> anyhow::Result<i64> {
    conn.execute("INSERT INTO providers (name) VALUES (?1)", params![name])?;
    Ok(conn.last_insert_rowid())
}

pub fn get_providers(conn: &Connection) -> anyhow::Result<Vec<Provider>> {
    let mut stmt = conn.prepare("SELECT id, name FROM providers ORDER BY id ASC")?;
    let rows = stmt.query_map([], |row| {
        Ok(Provider {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;

    let mut providers = vec![];
    for row in rows {
        providers.push(row?);
    }
    Ok(providers)
}

pub fn get_provider(conn: &Connection, id: i64) -> anyhow::Result<Option<Provider>> {
    let result = conn.query_row(
        "SELECT id, name FROM providers WHERE id = ?1",
        params![id],
        |row| {
            Ok(Provider {
                id: row.get(0)?,
                name: row.get(1)?,
            })
        },
    );

    match result {
        Ok(provider) => Ok(Some(provider)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Appointments referencing the provider are left in place.
pub fn delete_provider(conn: &Connection, id: i64) -> anyhow::Result<bool> {
    let count = conn.execute("DELETE FROM providers WHERE id = ?1", params![id])?;
    Ok(count > 0)
}

// ── Appointments ──

pub fn get_booked_times(
    conn: &Connection,
    date: NaiveDate,
    provider_id: i64,
) -> anyhow::Result<Vec<String>> {
    let date_str = date.format(DATE_FORMAT).to_string();
    let mut stmt = conn.prepare(
        "SELECT time FROM appointments WHERE date = ?1 AND provider_id = ?2 ORDER BY time ASC",
    )?;
    let rows = stmt.query_map(params![date_str, provider_id], |row| row.get::<_, String>(0))?;

    let mut times = vec![];
    for row in rows {
        times.push(row?);
    }
    Ok(times)
}

pub fn add_appointment(
    conn: &Connection,
    appointment: &NewAppointment,
) -> Result<i64, BookingError> {
    let date_str = appointment.date.format(DATE_FORMAT).to_string();

    let result = conn.execute(
        "INSERT INTO appointments (user_id, service_id, provider_id, date, time)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            appointment.user_id,
            appointment.service_id,
            appointment.provider_id,
            date_str,
            appointment.time,
        ],
    );

    match result {
        Ok(_) => Ok(conn.last_insert_rowid()),
        Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
            Err(BookingError::SlotTaken {
                date: date_str,
                time: appointment.time.clone(),
            })
        }
        Err(e) => Err(e.into()),
    }
}

pub fn get_appointment(conn: &Connection, id: i64) -> anyhow::Result<Option<Appointment>> {
    let result = conn.query_row(
        "SELECT id, user_id, service_id, provider_id, date, time FROM appointments WHERE id = ?1",
        params![id],
        |row| Ok(parse_appointment_row(row)),
    );

    match result {
        Ok(appointment) => Ok(Some(appointment?)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

pub fn get_appointments_for_provider(
    conn: &Connection,
    provider_id: i64,
) -> anyhow::Result<Vec<Appointment>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, service_id, provider_id, date, time
         FROM appointments WHERE provider_id = ?1 ORDER BY date ASC, time ASC",
    )?;
    let rows = stmt.query_map(params![provider_id], |row| Ok(parse_appointment_row(row)))?;

    let mut appointments = vec![];
    for row in rows {
        appointments.push(row??);
    }
    Ok(appointments)
}

fn parse_appointment_row(row: &rusqlite::Row) -> anyhow::Result<Appointment> {
    let date_str: String = row.get(4)?;
    let date = NaiveDate::parse_from_str(&date_str, DATE_FORMAT)
        .map_err(|e| anyhow::anyhow!("invalid appointment date {date_str:?}: {e}"))?;

    Ok(Appointment {
        id: row.get(0)?,
        user_id: row.get(1)?,
        service_id: row.get(2)?,
        provider_id: row.get(3)?,
        date,
        time: row.get(5)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;

    fn setup_db() -> Connection {
        db::init_db(":memory:").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, DATE_FORMAT).unwrap()
    }

    fn booking(provider_id: i64, day: &str, time: &str) -> NewAppointment {
        NewAppointment {
            user_id: 1001,
            service_id: 1,
            provider_id,
            date: date(day),
            time: time.to_string(),
        }
    }

    #[test]
    fn test_service_round_trip() {
        let conn = setup_db();
        let id = insert_service(&conn, "Haircut", 50000, 30).unwrap();

        let services = get_services(&conn).unwrap();
        assert_eq!(services.len(), 1);
        assert_eq!(
            services[0],
            Service {
                id,
                name: "Haircut".to_string(),
                price: 50000,
                duration_minutes: 30,
            }
        );
        assert_eq!(get_service(&conn, id).unwrap(), Some(services[0].clone()));
        assert_eq!(get_service(&conn, id + 1).unwrap(), None);
    }

    #[test]
    fn test_services_listed_in_insert_order() {
        let conn = setup_db();
        insert_service(&conn, "Haircut", 50000, 30).unwrap();
        insert_service(&conn, "Shave", 30000, 20).unwrap();

        let names: Vec<String> = get_services(&conn)
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["Haircut", "Shave"]);
    }

    #[test]
    fn test_delete_provider() {
        let conn = setup_db();
        let keep = insert_provider(&conn, "Aziz").unwrap();
        let gone = insert_provider(&conn, "Bobur").unwrap();

        assert!(delete_provider(&conn, gone).unwrap());
        assert!(!delete_provider(&conn, gone).unwrap());

        let providers = get_providers(&conn).unwrap();
        assert_eq!(providers.len(), 1);
        assert_eq!(providers[0].id, keep);
        assert!(get_provider(&conn, gone).unwrap().is_none());
    }

    #[test]
    fn test_delete_provider_keeps_appointments() {
        let conn = setup_db();
        let provider_id = insert_provider(&conn, "Aziz").unwrap();
        let appointment_id = add_appointment(&conn, &booking(provider_id, "2025-06-16", "10:00")).unwrap();

        delete_provider(&conn, provider_id).unwrap();

        let appointment = get_appointment(&conn, appointment_id).unwrap().unwrap();
        assert_eq!(appointment.provider_id, provider_id);
        assert_eq!(appointment.time, "10:00");
        assert_eq!(get_appointments_for_provider(&conn, provider_id).unwrap().len(), 1);
    }

    #[test]
    fn test_booked_times_filter_by_date_and_provider() {
        let conn = setup_db();
        add_appointment(&conn, &booking(1, "2025-06-16", "10:00")).unwrap();
        add_appointment(&conn, &booking(1, "2025-06-16", "09:30")).unwrap();
        add_appointment(&conn, &booking(2, "2025-06-16", "11:00")).unwrap();
        add_appointment(&conn, &booking(1, "2025-06-17", "12:00")).unwrap();

        let times = get_booked_times(&conn, date("2025-06-16"), 1).unwrap();
        assert_eq!(times, vec!["09:30", "10:00"]);
        assert!(get_booked_times(&conn, date("2025-06-18"), 1).unwrap().is_empty());
    }

    #[test]
    fn test_double_booking_rejected() {
        let conn = setup_db();
        add_appointment(&conn, &booking(1, "2025-06-16", "10:00")).unwrap();

        let err = add_appointment(&conn, &booking(1, "2025-06-16", "10:00")).unwrap_err();
        assert!(matches!(err, BookingError::SlotTaken { ref time, .. } if time == "10:00"));

        // Same time with another provider is fine
        assert!(add_appointment(&conn, &booking(2, "2025-06-16", "10:00")).is_ok());
    }

    #[test]
    fn test_appointment_round_trip() {
        let conn = setup_db();
        let id = add_appointment(&conn, &booking(3, "2025-06-16", "14:30")).unwrap();

        let appointment = get_appointment(&conn, id).unwrap().unwrap();
        assert_eq!(appointment.user_id, 1001);
        assert_eq!(appointment.service_id, 1);
        assert_eq!(appointment.provider_id, 3);
        assert_eq!(appointment.date, date("2025-06-16"));
        assert_eq!(appointment.time, "14:30");
        assert!(get_appointment(&conn, id + 1).unwrap().is_none());
    }
}
