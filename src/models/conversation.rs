use chrono::NaiveDate;

use super::{CallbackData, Keyboard};

/// Per-requester progress through the booking flow or an admin prompt.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Session {
    #[default]
    Idle,
    AwaitingService,
    AwaitingProvider {
        service_id: i64,
    },
    AwaitingDay {
        service_id: i64,
        provider_id: i64,
    },
    AwaitingTime {
        service_id: i64,
        provider_id: i64,
        date: NaiveDate,
    },
    AddServiceName,
    AddServicePrice {
        name: String,
    },
    AddServiceDuration {
        name: String,
        price: i64,
    },
    AddProviderName,
}

impl Session {
    pub fn as_str(&self) -> &'static str {
        match self {
            Session::Idle => "idle",
            Session::AwaitingService => "awaiting_service",
            Session::AwaitingProvider { .. } => "awaiting_provider",
            Session::AwaitingDay { .. } => "awaiting_day",
            Session::AwaitingTime { .. } => "awaiting_time",
            Session::AddServiceName => "add_service_name",
            Session::AddServicePrice { .. } => "add_service_price",
            Session::AddServiceDuration { .. } => "add_service_duration",
            Session::AddProviderName => "add_provider_name",
        }
    }

    pub fn is_admin_prompt(&self) -> bool {
        matches!(
            self,
            Session::AddServiceName
                | Session::AddServicePrice { .. }
                | Session::AddServiceDuration { .. }
                | Session::AddProviderName
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    AddService,
    AddProvider,
    ManageProviders,
    Cancel,
}

impl Command {
    /// Parses "/name" or "/name@botname"; anything after the first word is ignored.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let name = word.strip_prefix('/')?;
        let name = name.split('@').next().unwrap_or(name);
        match name.to_lowercase().as_str() {
            "start" => Some(Command::Start),
            "addservice" | "admin1" => Some(Command::AddService),
            "addprovider" | "admin2" => Some(Command::AddProvider),
            "providers" | "daletmas" => Some(Command::ManageProviders),
            "cancel" => Some(Command::Cancel),
            _ => None,
        }
    }

    pub fn is_admin_only(&self) -> bool {
        matches!(
            self,
            Command::AddService | Command::AddProvider | Command::ManageProviders
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Command(Command),
    Text(String),
    /// A pressed button; `None` when its payload could not be decoded.
    Select(Option<CallbackData>),
}

impl Event {
    pub fn from_text(text: &str) -> Self {
        match Command::parse(text) {
            Some(command) => Event::Command(command),
            None => Event::Text(text.to_string()),
        }
    }

    pub fn from_payload(payload: &str) -> Self {
        Event::Select(CallbackData::parse(payload))
    }
}

/// Outbound effect produced by the conversation; delivered by the update handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Send {
        text: String,
        keyboard: Option<Keyboard>,
    },
    /// Replace the message that carried the pressed button.
    Edit {
        text: String,
        keyboard: Option<Keyboard>,
    },
    /// Short acknowledgement shown by the client for a pressed button.
    Notify(String),
}

impl Reply {
    pub fn text(text: impl Into<String>) -> Self {
        Reply::Send {
            text: text.into(),
            keyboard: None,
        }
    }

    pub fn with_keyboard(text: impl Into<String>, keyboard: Keyboard) -> Self {
        Reply::Send {
            text: text.into(),
            keyboard: Some(keyboard),
        }
    }
}
