use async_trait::async_trait;
use chrono::NaiveDate;

mod errors;
mod memory;
mod services;
mod types;

pub use errors::StoreError;
pub use memory::MemoryStore;
pub use services::DatabaseService;
pub use types::*;

/// Persistence operations the booking flow needs from the backing store.
///
/// `NotFound` is only ever returned by `find_customer_by_cpf`; every other
/// error is a failure to talk to the store and callers pick their own policy.
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn find_customer_by_cpf(&self, cpf: &str) -> Result<Customer, StoreError>;

    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer, StoreError>;

    async fn list_services(&self) -> Result<Vec<Service>, StoreError>;

    async fn list_barbers(&self) -> Result<Vec<Barber>, StoreError>;

    async fn create_appointment(
        &self,
        appointment: NewAppointment,
    ) -> Result<Appointment, StoreError>;

    async fn customer_appointments(
        &self,
        customer_id: i64,
    ) -> Result<Vec<AppointmentDetails>, StoreError>;

    async fn appointment_exists(
        &self,
        barber_id: i64,
        date: NaiveDate,
        time: &str,
    ) -> Result<bool, StoreError>;
}
