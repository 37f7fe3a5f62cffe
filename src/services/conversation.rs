use std::sync::Arc;

use chrono::{Duration, Local, NaiveDate, NaiveDateTime};

use crate::db::queries;
use crate::errors::BookingError;
use crate::models::appointment::DATE_FORMAT;
use crate::models::{
    CallbackData, Command, Event, Keyboard, NewAppointment, Provider, Reply, Service, Session,
};
use crate::services::availability::available_slots;
use crate::services::reminders::schedule_reminder;
use crate::services::slots::SlotGenerator;
use crate::state::AppState;

pub const NO_SERVICES: &str = "The admin hasn't added any services yet.";
pub const NO_PROVIDERS: &str = "No masters available yet.";
pub const NO_FREE_TIME: &str = "No free time on that day ❌";
pub const START_OVER: &str = "Please start over with /start.";
pub const SLOT_TAKEN: &str = "Sorry, that time was just taken. Please choose another:";
pub const NUMBERS_ONLY: &str = "Numbers only, please!";
pub const PROVIDER_PANEL: &str = "🛠 Masters:\n(tap to delete)";
pub const PROVIDER_PANEL_EMPTY: &str = "No masters yet.";
pub const PROVIDER_DELETED: &str = "Master deleted ✅";

/// Handles one event from `user_id` at the current local time.
///
/// `Ok(None)` means the event was dropped without any response.
pub async fn handle_event(
    state: &Arc<AppState>,
    user_id: i64,
    event: Event,
) -> anyhow::Result<Option<Vec<Reply>>> {
    handle_event_at(state, user_id, event, Local::now().naive_local()).await
}

pub async fn handle_event_at(
    state: &Arc<AppState>,
    user_id: i64,
    event: Event,
    now: NaiveDateTime,
) -> anyhow::Result<Option<Vec<Reply>>> {
    if requires_admin(&event) && !state.config.is_admin(user_id) {
        tracing::debug!(user_id, "ignoring admin action from non-admin");
        return Ok(None);
    }

    let mut session = state.sessions.lock(user_id).await?;
    let current = std::mem::take(&mut *session);

    tracing::info!(user_id, state = current.as_str(), event = ?event, "processing event");

    // On error the session stays Idle, discarding any partial selection.
    let (next, replies) = dispatch(state, user_id, current, event, now)?;
    *session = next;

    Ok(Some(replies))
}

fn requires_admin(event: &Event) -> bool {
    match event {
        Event::Command(command) => command.is_admin_only(),
        Event::Select(Some(CallbackData::DeleteProvider(_))) => true,
        _ => false,
    }
}

type Transition = (Session, Vec<Reply>);

fn dispatch(
    state: &AppState,
    user_id: i64,
    session: Session,
    event: Event,
    now: NaiveDateTime,
) -> anyhow::Result<Transition> {
    match (session, event) {
        (_, Event::Command(Command::Start)) => start_booking(state),
        (_, Event::Command(Command::Cancel)) => Ok((
            Session::Idle,
            vec![Reply::text("Cancelled. Send /start to book an appointment.")],
        )),
        (_, Event::Command(Command::AddService)) => Ok((
            Session::AddServiceName,
            vec![Reply::text("Enter the new service name:")],
        )),
        (_, Event::Command(Command::AddProvider)) => Ok((
            Session::AddProviderName,
            vec![Reply::text("Enter the new master's name:")],
        )),
        (session, Event::Command(Command::ManageProviders)) => {
            let providers = state.with_db(queries::get_providers)?;
            Ok((session, vec![provider_panel(&providers, false)]))
        }

        (session, Event::Text(text)) if session.is_admin_prompt() => {
            admin_prompt(state, session, text.trim())
        }
        (session, Event::Text(_)) => Ok((
            session,
            vec![Reply::text("Send /start to book an appointment.")],
        )),

        (session, Event::Select(Some(CallbackData::DeleteProvider(id)))) => {
            delete_provider(state, session, id)
        }
        (_, Event::Select(Some(CallbackData::Service(id)))) => select_service(state, id),
        (Session::AwaitingProvider { service_id }, Event::Select(Some(CallbackData::Provider(id)))) => {
            select_provider(state, service_id, id, now)
        }
        (
            Session::AwaitingDay {
                service_id,
                provider_id,
            },
            Event::Select(Some(CallbackData::Day(date))),
        ) => select_day(state, service_id, provider_id, date, now),
        (
            Session::AwaitingTime {
                service_id,
                provider_id,
                date,
            },
            Event::Select(Some(CallbackData::Time { date: picked, time })),
        ) if picked == date => select_time(state, user_id, service_id, provider_id, date, time, now),

        (session, Event::Select(data)) => {
            tracing::warn!(user_id, state = session.as_str(), ?data, "selection out of sequence");
            Ok(start_over())
        }
    }
}

fn start_over() -> Transition {
    (Session::Idle, vec![Reply::text(START_OVER)])
}

// ── Booking flow ──

fn start_booking(state: &AppState) -> anyhow::Result<Transition> {
    let services = state.with_db(queries::get_services)?;
    if services.is_empty() {
        return Ok((Session::Idle, vec![Reply::text(NO_SERVICES)]));
    }

    let keyboard = services_keyboard(&services, &state.config.currency);
    Ok((
        Session::AwaitingService,
        vec![Reply::with_keyboard("Choose a service:", keyboard)],
    ))
}

fn select_service(state: &AppState, service_id: i64) -> anyhow::Result<Transition> {
    let (service, providers) = state.with_db(|conn| {
        Ok((
            queries::get_service(conn, service_id)?,
            queries::get_providers(conn)?,
        ))
    })?;

    if service.is_none() {
        return Ok(start_over());
    }
    if providers.is_empty() {
        return Ok((Session::Idle, vec![Reply::text(NO_PROVIDERS)]));
    }

    Ok((
        Session::AwaitingProvider { service_id },
        vec![Reply::with_keyboard(
            "Choose a master:",
            providers_keyboard(&providers),
        )],
    ))
}

fn select_provider(
    state: &AppState,
    service_id: i64,
    provider_id: i64,
    now: NaiveDateTime,
) -> anyhow::Result<Transition> {
    let provider = state.with_db(|conn| queries::get_provider(conn, provider_id))?;
    if provider.is_none() {
        return Ok(start_over());
    }

    let keyboard = days_keyboard(now.date(), state.config.booking_horizon_days);
    Ok((
        Session::AwaitingDay {
            service_id,
            provider_id,
        },
        vec![Reply::with_keyboard("Choose a day:", keyboard)],
    ))
}

fn select_day(
    state: &AppState,
    service_id: i64,
    provider_id: i64,
    date: NaiveDate,
    now: NaiveDateTime,
) -> anyhow::Result<Transition> {
    if !within_horizon(date, now.date(), state.config.booking_horizon_days) {
        return Ok(start_over());
    }

    let free = free_times(state, date, provider_id)?;
    Ok(offer_times(service_id, provider_id, date, free, "Choose a time:"))
}

fn select_time(
    state: &AppState,
    user_id: i64,
    service_id: i64,
    provider_id: i64,
    date: NaiveDate,
    time: String,
    now: NaiveDateTime,
) -> anyhow::Result<Transition> {
    let free = free_times(state, date, provider_id)?;
    if !free.contains(&time) {
        return Ok(offer_times(service_id, provider_id, date, free, SLOT_TAKEN));
    }

    let appointment = NewAppointment {
        user_id,
        service_id,
        provider_id,
        date,
        time: time.clone(),
    };

    match state.with_db(|conn| Ok(queries::add_appointment(conn, &appointment)))? {
        Ok(id) => {
            tracing::info!(
                appointment_id = id,
                user_id,
                service_id,
                provider_id,
                %date,
                time = %time,
                "appointment booked"
            );
        }
        Err(BookingError::SlotTaken { .. }) => {
            tracing::warn!(user_id, provider_id, %date, time = %time, "slot taken at insert");
            let free = free_times(state, date, provider_id)?;
            return Ok(offer_times(service_id, provider_id, date, free, SLOT_TAKEN));
        }
        Err(e) => return Err(e.into()),
    }

    if let Err(e) = schedule_reminder(
        state.scheduler.as_ref(),
        user_id,
        date,
        &time,
        state.config.reminder_lead_minutes,
        now,
    ) {
        tracing::error!(error = %e, user_id, "failed to schedule reminder");
    }

    Ok((
        Session::Idle,
        vec![Reply::text(format!(
            "✅ Appointment booked!\n{} {}",
            date.format(DATE_FORMAT),
            time
        ))],
    ))
}

fn free_times(state: &AppState, date: NaiveDate, provider_id: i64) -> anyhow::Result<Vec<String>> {
    let generator = SlotGenerator::from_config(&state.config);
    state.with_db(|conn| available_slots(conn, &generator, date, provider_id))
}

/// Never shows an empty keyboard: no free times ends the flow instead.
fn offer_times(
    service_id: i64,
    provider_id: i64,
    date: NaiveDate,
    free: Vec<String>,
    prompt: &str,
) -> Transition {
    if free.is_empty() {
        return (Session::Idle, vec![Reply::text(NO_FREE_TIME)]);
    }

    (
        Session::AwaitingTime {
            service_id,
            provider_id,
            date,
        },
        vec![Reply::with_keyboard(prompt, slots_keyboard(date, &free))],
    )
}

fn within_horizon(date: NaiveDate, today: NaiveDate, horizon_days: u32) -> bool {
    date >= today && date < today + Duration::days(i64::from(horizon_days))
}

// ── Administrator ──

fn admin_prompt(state: &AppState, session: Session, input: &str) -> anyhow::Result<Transition> {
    match session {
        Session::AddServiceName => {
            if input.is_empty() {
                return Ok((
                    Session::AddServiceName,
                    vec![Reply::text("Enter the new service name:")],
                ));
            }
            Ok((
                Session::AddServicePrice {
                    name: input.to_string(),
                },
                vec![Reply::text("Enter the price (numbers only):")],
            ))
        }
        Session::AddServicePrice { name } => match parse_number(input) {
            Some(price) => Ok((
                Session::AddServiceDuration { name, price },
                vec![Reply::text("Enter the duration (minutes):")],
            )),
            None => Ok((
                Session::AddServicePrice { name },
                vec![Reply::text(NUMBERS_ONLY)],
            )),
        },
        Session::AddServiceDuration { name, price } => match parse_number(input) {
            Some(duration) => {
                let id = state.with_db(|conn| queries::insert_service(conn, &name, price, duration))?;
                tracing::info!(service_id = id, name = %name, price, duration, "service added");
                Ok((Session::Idle, vec![Reply::text("✅ Service added!")]))
            }
            None => Ok((
                Session::AddServiceDuration { name, price },
                vec![Reply::text(NUMBERS_ONLY)],
            )),
        },
        Session::AddProviderName => {
            if input.is_empty() {
                return Ok((
                    Session::AddProviderName,
                    vec![Reply::text("Enter the new master's name:")],
                ));
            }
            let id = state.with_db(|conn| queries::insert_provider(conn, input))?;
            tracing::info!(provider_id = id, name = %input, "provider added");
            Ok((Session::Idle, vec![Reply::text("✅ Master added!")]))
        }
        other => Ok((other, vec![])),
    }
}

/// Digits only; signs, spaces and separators are rejected.
fn parse_number(input: &str) -> Option<i64> {
    if input.is_empty() || !input.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    input.parse().ok()
}

fn delete_provider(state: &AppState, session: Session, provider_id: i64) -> anyhow::Result<Transition> {
    let (deleted, providers) = state.with_db(|conn| {
        let deleted = queries::delete_provider(conn, provider_id)?;
        Ok((deleted, queries::get_providers(conn)?))
    })?;

    tracing::info!(provider_id, deleted, "provider delete requested");

    Ok((
        session,
        vec![
            provider_panel(&providers, true),
            Reply::Notify(PROVIDER_DELETED.to_string()),
        ],
    ))
}

fn provider_panel(providers: &[Provider], in_place: bool) -> Reply {
    let (text, keyboard) = if providers.is_empty() {
        (PROVIDER_PANEL_EMPTY.to_string(), None)
    } else {
        (
            PROVIDER_PANEL.to_string(),
            Some(Keyboard::single_column(providers.iter().map(|p| {
                (format!("❌ {}", p.name), CallbackData::DeleteProvider(p.id))
            }))),
        )
    };

    if in_place {
        Reply::Edit { text, keyboard }
    } else {
        Reply::Send { text, keyboard }
    }
}

// ── Keyboards ──

fn services_keyboard(services: &[Service], currency: &str) -> Keyboard {
    Keyboard::single_column(
        services
            .iter()
            .map(|s| (s.button_label(currency), CallbackData::Service(s.id))),
    )
}

fn providers_keyboard(providers: &[Provider]) -> Keyboard {
    Keyboard::single_column(
        providers
            .iter()
            .map(|p| (p.name.clone(), CallbackData::Provider(p.id))),
    )
}

fn days_keyboard(today: NaiveDate, horizon_days: u32) -> Keyboard {
    Keyboard::single_column((0..i64::from(horizon_days)).map(|offset| {
        let day = today + Duration::days(offset);
        (day.format("%d-%m").to_string(), CallbackData::Day(day))
    }))
}

fn slots_keyboard(date: NaiveDate, slots: &[String]) -> Keyboard {
    Keyboard::single_column(slots.iter().map(|s| {
        (
            s.clone(),
            CallbackData::Time {
                date,
                time: s.clone(),
            },
        )
    }))
}
