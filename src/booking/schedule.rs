use crate::database::Barber;
use chrono::{Datelike, NaiveDate, NaiveTime, Timelike, Weekday};
use tracing::warn;

pub const CLOSED_WEEKDAY: Weekday = Weekday::Sun;

pub const BOOKING_WINDOW_DAYS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftWindow {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl ShiftWindow {
    pub fn parse(value: &str) -> Option<Self> {
        let (start, end) = value.split_once('-')?;
        let start = NaiveTime::parse_from_str(start.trim(), "%H:%M").ok()?;
        let end = NaiveTime::parse_from_str(end.trim(), "%H:%M").ok()?;
        (start < end).then_some(Self { start, end })
    }

    pub fn start_minute(&self) -> u32 {
        self.start.num_seconds_from_midnight() / 60
    }

    pub fn end_minute(&self) -> u32 {
        self.end.num_seconds_from_midnight() / 60
    }
}

impl Barber {
    /// Defined shifts, morning first.
    pub fn shift_windows(&self) -> Vec<ShiftWindow> {
        [&self.morning_shift, &self.afternoon_shift]
            .into_iter()
            .flatten()
            .filter_map(|shift| {
                let window = ShiftWindow::parse(shift);
                if window.is_none() {
                    warn!(barber_id = self.id, shift = %shift, "Ignoring malformed shift");
                }
                window
            })
            .collect()
    }

    pub fn day_off_weekday(&self) -> Option<Weekday> {
        self.day_off.as_deref().and_then(parse_weekday)
    }

    pub fn works_on(&self, date: NaiveDate) -> bool {
        self.day_off_weekday() != Some(date.weekday())
    }
}

/// Weekday from the names the shop stores: Portuguese (`"Terça-feira"`,
/// `"sabado"`) or English (`"Tuesday"`, `"tue"`), case-insensitive.
pub fn parse_weekday(name: &str) -> Option<Weekday> {
    let name = name.trim().to_lowercase();
    let short = name.strip_suffix("-feira").unwrap_or(&name);
    let weekday = match short {
        "domingo" => Some(Weekday::Sun),
        "segunda" => Some(Weekday::Mon),
        "terça" | "terca" => Some(Weekday::Tue),
        "quarta" => Some(Weekday::Wed),
        "quinta" => Some(Weekday::Thu),
        "sexta" => Some(Weekday::Fri),
        "sábado" | "sabado" => Some(Weekday::Sat),
        _ => None,
    };
    weekday.or_else(|| name.parse::<Weekday>().ok())
}

pub fn candidate_dates(today: NaiveDate) -> Vec<NaiveDate> {
    today
        .iter_days()
        .filter(|date| date.weekday() != CLOSED_WEEKDAY)
        .take(BOOKING_WINDOW_DAYS)
        .collect()
}

pub fn barbers_for_date(barbers: &[Barber], date: NaiveDate) -> Vec<Barber> {
    barbers
        .iter()
        .filter(|barber| barber.works_on(date))
        .cloned()
        .collect()
}
