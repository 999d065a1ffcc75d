use super::errors::StoreError;
use super::types::{
    Appointment, AppointmentDetails, Barber, Customer, NewAppointment, NewCustomer, Service,
};
use super::BookingStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use postgrest::{Builder, Postgrest};
use serde::de::DeserializeOwned;
use std::env;
use tracing::{debug, error};

mod appointment;
mod catalog;
mod customer;

pub struct DatabaseService {
    pub client: Postgrest,
}

impl DatabaseService {
    pub fn new() -> Result<Self, StoreError> {
        let url = env::var("SUPABASE_URL")
            .map_err(|_| StoreError::ConnectionError("SUPABASE_URL not found".to_string()))?;
        let service_key = env::var("SUPABASE_KEY")
            .map_err(|_| StoreError::ConnectionError("SUPABASE_KEY not found".to_string()))?;

        Ok(Self::with_credentials(&url, &service_key))
    }

    pub fn with_credentials(url: &str, service_key: &str) -> Self {
        let rest_url = format!("{}/rest/v1", url.trim_end_matches('/'));
        let client = Postgrest::new(&rest_url)
            .insert_header("apikey", service_key)
            .insert_header("Authorization", format!("Bearer {}", service_key));

        Self { client }
    }

    // Executes a PostgREST request and decodes the JSON array it answers with
    async fn fetch_rows<T: DeserializeOwned>(
        &self,
        table: &str,
        request: Builder,
    ) -> Result<Vec<T>, StoreError> {
        let response = request.execute().await.map_err(|e| {
            error!(table, err = %e, "Request to store failed");
            StoreError::TransportFailure(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StoreError::TransportFailure(e.to_string()))?;
        debug!(table, status = status.as_u16(), "Store response received");

        if !status.is_success() {
            error!(table, status = status.as_u16(), body = %body, "Store rejected request");
            if status.as_u16() == 409 {
                return Err(StoreError::Conflict(body));
            }
            return Err(StoreError::StatusError {
                status: status.as_u16(),
                body,
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            error!(table, err = %e, "Could not decode store response");
            StoreError::DecodeError(e.to_string())
        })
    }
}

#[async_trait]
impl BookingStore for DatabaseService {
    async fn find_customer_by_cpf(&self, cpf: &str) -> Result<Customer, StoreError> {
        self.get_customer_by_cpf(cpf).await
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer, StoreError> {
        self.insert_customer(&customer).await
    }

    async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        self.get_services().await
    }

    async fn list_barbers(&self) -> Result<Vec<Barber>, StoreError> {
        self.get_barbers().await
    }

    async fn create_appointment(
        &self,
        appointment: NewAppointment,
    ) -> Result<Appointment, StoreError> {
        self.insert_appointment(&appointment).await
    }

    async fn customer_appointments(
        &self,
        customer_id: i64,
    ) -> Result<Vec<AppointmentDetails>, StoreError> {
        self.get_customer_appointments(customer_id).await
    }

    async fn appointment_exists(
        &self,
        barber_id: i64,
        date: NaiveDate,
        time: &str,
    ) -> Result<bool, StoreError> {
        self.has_appointment_at(barber_id, date, time).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dotenvy::dotenv;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_new_requires_supabase_env() {
        dotenv().ok();
        let saved_url = env::var("SUPABASE_URL").ok();
        env::remove_var("SUPABASE_URL");

        let result = DatabaseService::new();
        assert!(matches!(result, Err(StoreError::ConnectionError(_))));

        if let Some(url) = saved_url {
            env::set_var("SUPABASE_URL", url);
        }
    }

    #[test]
    #[serial]
    fn test_new_reads_supabase_env() {
        let saved_url = env::var("SUPABASE_URL").ok();
        let saved_key = env::var("SUPABASE_KEY").ok();
        env::set_var("SUPABASE_URL", "http://localhost:54321");
        env::set_var("SUPABASE_KEY", "test-key");

        assert!(DatabaseService::new().is_ok());

        match saved_url {
            Some(url) => env::set_var("SUPABASE_URL", url),
            None => env::remove_var("SUPABASE_URL"),
        }
        match saved_key {
            Some(key) => env::set_var("SUPABASE_KEY", key),
            None => env::remove_var("SUPABASE_KEY"),
        }
    }
}
