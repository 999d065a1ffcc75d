mod appointment;
mod catalog;
mod customer;

pub use appointment::{Appointment, AppointmentDetails, NewAppointment};
pub use catalog::{Barber, Service};
pub use customer::{Customer, NewCustomer};
