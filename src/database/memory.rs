use super::errors::StoreError;
use super::types::{
    Appointment, AppointmentDetails, Barber, Customer, NewAppointment, NewCustomer, Service,
};
use super::BookingStore;
use async_trait::async_trait;
use chrono::NaiveDate;
use std::cmp::Reverse;
use tokio::sync::Mutex;

#[derive(Default)]
struct Tables {
    customers: Vec<Customer>,
    services: Vec<Service>,
    barbers: Vec<Barber>,
    appointments: Vec<Appointment>,
}

/// In-process store with the same semantics as the hosted tables.
///
/// Like the hosted schema it has no uniqueness constraint on
/// (barber, date, time); the booking flow's pre-write check is all there is.
#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new(services: Vec<Service>, barbers: Vec<Barber>) -> Self {
        Self {
            tables: Mutex::new(Tables {
                services,
                barbers,
                ..Default::default()
            }),
        }
    }

    // Small catalog used when running without a Supabase project
    pub fn demo() -> Self {
        let services = vec![
            Service {
                id: 1,
                name: "Haircut".to_string(),
                price: 35.0,
                duration_minutes: 30,
            },
            Service {
                id: 2,
                name: "Haircut + Beard".to_string(),
                price: 55.0,
                duration_minutes: 60,
            },
            Service {
                id: 3,
                name: "Beard".to_string(),
                price: 25.0,
                duration_minutes: 45,
            },
        ];
        let barbers = vec![
            Barber {
                id: 1,
                name: "Kendy".to_string(),
                morning_shift: Some("08:00-12:00".to_string()),
                afternoon_shift: Some("14:00-18:00".to_string()),
                day_off: Some("Segunda-feira".to_string()),
            },
            Barber {
                id: 2,
                name: "Rafael".to_string(),
                morning_shift: Some("09:00-12:00".to_string()),
                afternoon_shift: Some("13:00-19:00".to_string()),
                day_off: Some("Quarta-feira".to_string()),
            },
        ];
        Self::new(services, barbers)
    }

    pub async fn appointments(&self) -> Vec<Appointment> {
        self.tables.lock().await.appointments.clone()
    }

    pub async fn customers(&self) -> Vec<Customer> {
        self.tables.lock().await.customers.clone()
    }

    pub async fn insert_existing_customer(&self, customer: Customer) {
        self.tables.lock().await.customers.push(customer);
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn find_customer_by_cpf(&self, cpf: &str) -> Result<Customer, StoreError> {
        let tables = self.tables.lock().await;
        tables
            .customers
            .iter()
            .find(|c| c.cpf == cpf)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn create_customer(&self, customer: NewCustomer) -> Result<Customer, StoreError> {
        let mut tables = self.tables.lock().await;
        if tables.customers.iter().any(|c| c.cpf == customer.cpf) {
            return Err(StoreError::Conflict(format!(
                "customer with cpf {} already exists",
                customer.cpf
            )));
        }
        let created = Customer {
            id: tables.customers.iter().map(|c| c.id).max().unwrap_or(0) + 1,
            name: customer.name,
            cpf: customer.cpf,
            phone: Some(customer.phone),
        };
        tables.customers.push(created.clone());
        Ok(created)
    }

    async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
        let mut services = self.tables.lock().await.services.clone();
        services.sort_by_key(|s| s.id);
        Ok(services)
    }

    async fn list_barbers(&self) -> Result<Vec<Barber>, StoreError> {
        let mut barbers = self.tables.lock().await.barbers.clone();
        barbers.sort_by_key(|b| b.id);
        Ok(barbers)
    }

    async fn create_appointment(
        &self,
        appointment: NewAppointment,
    ) -> Result<Appointment, StoreError> {
        let mut tables = self.tables.lock().await;
        let created = Appointment {
            id: tables.appointments.iter().map(|a| a.id).max().unwrap_or(0) + 1,
            customer_id: appointment.customer_id,
            service_id: appointment.service_id,
            barber_id: appointment.barber_id,
            appointment_date: appointment.appointment_date,
            appointment_time: appointment.appointment_time,
            customer_attended: appointment.customer_attended,
        };
        tables.appointments.push(created.clone());
        Ok(created)
    }

    async fn customer_appointments(
        &self,
        customer_id: i64,
    ) -> Result<Vec<AppointmentDetails>, StoreError> {
        let tables = self.tables.lock().await;
        let mut details: Vec<AppointmentDetails> = tables
            .appointments
            .iter()
            .filter(|a| a.customer_id == customer_id)
            .map(|a| AppointmentDetails {
                id: a.id,
                appointment_date: a.appointment_date,
                appointment_time: a.appointment_time.clone(),
                customer_attended: a.customer_attended,
                service: tables.services.iter().find(|s| s.id == a.service_id).cloned(),
                barber: tables.barbers.iter().find(|b| b.id == a.barber_id).cloned(),
            })
            .collect();
        details.sort_by_key(|d| Reverse((d.appointment_date, d.appointment_time.clone())));
        Ok(details)
    }

    async fn appointment_exists(
        &self,
        barber_id: i64,
        date: NaiveDate,
        time: &str,
    ) -> Result<bool, StoreError> {
        let tables = self.tables.lock().await;
        Ok(tables.appointments.iter().any(|a| {
            a.barber_id == barber_id && a.appointment_date == date && a.appointment_time == time
        }))
    }
}
