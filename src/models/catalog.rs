use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub price: i64,
    pub duration_minutes: i64,
}

impl Service {
    pub fn button_label(&self, currency: &str) -> String {
        format!("{} - {} {}", self.name, self.price, currency)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Provider {
    pub id: i64,
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_label() {
        let service = Service {
            id: 1,
            name: "Haircut".to_string(),
            price: 50000,
            duration_minutes: 30,
        };
        assert_eq!(service.button_label("so'm"), "Haircut - 50000 so'm");
    }
}
