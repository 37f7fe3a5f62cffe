pub mod availability;
pub mod conversation;
pub mod messaging;
pub mod reminders;
pub mod sessions;
pub mod slots;
