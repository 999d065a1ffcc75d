use super::super::types::{Appointment, AppointmentDetails, NewAppointment};
use super::DatabaseService;
use super::StoreError;
use chrono::NaiveDate;
use tracing::info;

impl DatabaseService {
    pub async fn insert_appointment(
        &self,
        appointment: &NewAppointment,
    ) -> Result<Appointment, StoreError> {
        let body = serde_json::to_string(appointment)
            .map_err(|e| StoreError::DecodeError(e.to_string()))?;
        let request = self.client.from("appointments").insert(body);

        let created: Vec<Appointment> = self.fetch_rows("appointments", request).await?;
        let appointment = created.into_iter().next().ok_or_else(|| {
            StoreError::DecodeError("No appointment returned from insert".to_string())
        })?;
        info!(
            appointment_id = appointment.id,
            barber_id = appointment.barber_id,
            date = %appointment.appointment_date,
            time = %appointment.appointment_time,
            "Appointment created"
        );
        Ok(appointment)
    }

    // Booking history, newest first, with service and barber display fields
    pub async fn get_customer_appointments(
        &self,
        customer_id: i64,
    ) -> Result<Vec<AppointmentDetails>, StoreError> {
        let request = self
            .client
            .from("appointments")
            .select("*,services(*),barbers(*)")
            .eq("customer_id", customer_id.to_string())
            .order("appointment_date.desc,appointment_time.desc");

        self.fetch_rows("appointments", request).await
    }

    pub async fn has_appointment_at(
        &self,
        barber_id: i64,
        date: NaiveDate,
        time: &str,
    ) -> Result<bool, StoreError> {
        let request = self
            .client
            .from("appointments")
            .select("id")
            .eq("barber_id", barber_id.to_string())
            .eq("appointment_date", date.format("%Y-%m-%d").to_string())
            .eq("appointment_time", time)
            .limit(1);

        let rows: Vec<serde_json::Value> = self.fetch_rows("appointments", request).await?;
        Ok(!rows.is_empty())
    }
}
