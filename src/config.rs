use std::env;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub port: u16,
    pub database_url: String,
    pub bot_token: String,
    pub admin_id: i64,
    pub api_url: String,
    pub webhook_url: Option<String>,
    pub webhook_secret: String,
    pub currency: String,
    pub work_start_hour: u32,
    pub work_end_hour: u32,
    pub slot_interval_minutes: u32,
    pub booking_horizon_days: u32,
    pub reminder_lead_minutes: i64,
}

pub const WORK_START_HOUR: u32 = 9;
pub const WORK_END_HOUR: u32 = 18;
pub const SLOT_INTERVAL_MINUTES: u32 = 30;
pub const BOOKING_HORIZON_DAYS: u32 = 7;
pub const REMINDER_LEAD_MINUTES: i64 = 60;

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(3000),
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| "appointments.db".to_string()),
            bot_token: env::var("BOT_TOKEN").unwrap_or_default(),
            admin_id: env::var("ADMIN_ID")
                .ok()
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(0),
            api_url: env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| "https://api.telegram.org".to_string()),
            webhook_url: env::var("WEBHOOK_URL").ok().filter(|v| !v.is_empty()),
            webhook_secret: env::var("WEBHOOK_SECRET").unwrap_or_default(),
            currency: env::var("CURRENCY").unwrap_or_else(|_| "so'm".to_string()),
            work_start_hour: WORK_START_HOUR,
            work_end_hour: WORK_END_HOUR,
            slot_interval_minutes: SLOT_INTERVAL_MINUTES,
            booking_horizon_days: BOOKING_HORIZON_DAYS,
            reminder_lead_minutes: REMINDER_LEAD_MINUTES,
        }
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_id != 0 && self.admin_id == user_id
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            database_url: ":memory:".to_string(),
            bot_token: String::new(),
            admin_id: 0,
            api_url: "https://api.telegram.org".to_string(),
            webhook_url: None,
            webhook_secret: String::new(),
            currency: "so'm".to_string(),
            work_start_hour: WORK_START_HOUR,
            work_end_hour: WORK_END_HOUR,
            slot_interval_minutes: SLOT_INTERVAL_MINUTES,
            booking_horizon_days: BOOKING_HORIZON_DAYS,
            reminder_lead_minutes: REMINDER_LEAD_MINUTES,
        }
    }
}
