use super::{Barber, Service};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Appointment {
    pub id: i64,
    pub customer_id: i64,
    pub service_id: i64,
    pub barber_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    #[serde(default)]
    pub customer_attended: bool,
}

#[derive(Debug, Serialize, Clone)]
pub struct NewAppointment {
    pub customer_id: i64,
    pub service_id: i64,
    pub barber_id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    pub customer_attended: bool,
}

// Appointment row with the embedded `services(*)` and `barbers(*)` resources
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppointmentDetails {
    pub id: i64,
    pub appointment_date: NaiveDate,
    pub appointment_time: String,
    #[serde(default)]
    pub customer_attended: bool,
    #[serde(rename = "services")]
    pub service: Option<Service>,
    #[serde(rename = "barbers")]
    pub barber: Option<Barber>,
}

impl AppointmentDetails {
    /// Postgres returns `time` columns as `HH:MM:SS`; the chat only shows `HH:MM`.
    pub fn time_label(&self) -> &str {
        self.appointment_time
            .get(..5)
            .unwrap_or(&self.appointment_time)
    }
}
