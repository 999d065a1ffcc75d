use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Service {
    pub id: i64,
    pub name: String,
    pub price: f64,
    pub duration_minutes: u32,
}

/// A barber as stored in the `barbers` table.
///
/// Shifts are kept in their stored `"HH:MM-HH:MM"` form and the day off as the
/// weekday name the shop typed in; both are interpreted by `booking::schedule`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Barber {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub morning_shift: Option<String>,
    #[serde(default)]
    pub afternoon_shift: Option<String>,
    #[serde(default)]
    pub day_off: Option<String>,
}
