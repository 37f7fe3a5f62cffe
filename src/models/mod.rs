pub mod appointment;
pub mod callback;
pub mod catalog;
pub mod conversation;
pub mod keyboard;
pub mod update;

pub use appointment::{Appointment, NewAppointment};
pub use callback::CallbackData;
pub use catalog::{Provider, Service};
pub use conversation::{Command, Event, Reply, Session};
pub use keyboard::{Button, Keyboard};
pub use update::Update;
