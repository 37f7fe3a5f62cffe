use serde::Serialize;

use super::CallbackData;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Button {
    pub label: String,
    pub payload: String,
}

/// Single-column list of selection buttons.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Keyboard {
    pub buttons: Vec<Button>,
}

impl Keyboard {
    pub fn single_column<I>(items: I) -> Self
    where
        I: IntoIterator<Item = (String, CallbackData)>,
    {
        Self {
            buttons: items
                .into_iter()
                .map(|(label, data)| Button {
                    label,
                    payload: data.encode(),
                })
                .collect(),
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.buttons.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn payloads(&self) -> Vec<&str> {
        self.buttons.iter().map(|b| b.payload.as_str()).collect()
    }
}
