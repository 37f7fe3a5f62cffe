use crate::config::AppConfig;

/// Bookable start times for one working day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SlotGenerator {
    start_hour: u32,
    end_hour: u32,
    interval_minutes: u32,
}

impl SlotGenerator {
    pub fn new(start_hour: u32, end_hour: u32, interval_minutes: u32) -> Self {
        Self {
            start_hour,
            end_hour,
            interval_minutes,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.work_start_hour,
            config.work_end_hour,
            config.slot_interval_minutes,
        )
    }

    /// Each call starts a fresh pass over the day.
    pub fn iter(&self) -> Slots {
        Slots {
            next_minute: self.start_hour.saturating_mul(60),
            end_minute: self.end_hour.min(24) * 60,
            step: self.interval_minutes,
        }
    }

    pub fn slots(&self) -> Vec<String> {
        self.iter().collect()
    }
}

#[derive(Debug, Clone)]
pub struct Slots {
    next_minute: u32,
    end_minute: u32,
    step: u32,
}

impl Iterator for Slots {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        if self.step == 0 || self.next_minute >= self.end_minute {
            return None;
        }
        let minute = self.next_minute;
        self.next_minute = self.next_minute.saturating_add(self.step);
        Some(format!("{:02}:{:02}", minute / 60, minute % 60))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_day() {
        let slots = SlotGenerator::from_config(&AppConfig::default()).slots();
        assert_eq!(slots.len(), 18);
        assert_eq!(slots.first().map(String::as_str), Some("09:00"));
        assert_eq!(slots.last().map(String::as_str), Some("17:30"));
        assert!(slots.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_uneven_interval_has_no_overflow_slot() {
        let slots = SlotGenerator::new(9, 11, 45).slots();
        assert_eq!(slots, vec!["09:00", "09:45", "10:30"]);
    }

    #[test]
    fn test_restartable() {
        let generator = SlotGenerator::new(9, 10, 15);
        let first: Vec<String> = generator.iter().collect();
        let second: Vec<String> = generator.iter().collect();
        assert_eq!(first, second);
        assert_eq!(first, vec!["09:00", "09:15", "09:30", "09:45"]);
    }

    #[test]
    fn test_empty_window() {
        assert!(SlotGenerator::new(18, 9, 30).slots().is_empty());
        assert!(SlotGenerator::new(9, 9, 30).slots().is_empty());
    }

    #[test]
    fn test_zero_interval_yields_nothing() {
        assert!(SlotGenerator::new(9, 18, 0).slots().is_empty());
    }

    #[test]
    fn test_huge_values_do_not_overflow() {
        assert_eq!(SlotGenerator::new(9, 18, u32::MAX).slots(), vec!["09:00"]);
        assert!(SlotGenerator::new(u32::MAX, 18, 30).slots().is_empty());
    }

    #[test]
    fn test_late_window_stops_at_midnight() {
        let slots = SlotGenerator::new(23, 30, 30).slots();
        assert_eq!(slots, vec!["23:00", "23:30"]);
    }
}
