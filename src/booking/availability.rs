use crate::database::{Barber, BookingStore, Service};
use chrono::NaiveDate;
use tracing::{debug, warn};

// Minutes since midnight -> "HH:MM"
fn slot_label(minute: u32) -> String {
    format!("{:02}:{:02}", minute / 60, minute % 60)
}

/// Every slot start the barber's shifts allow for `service`, before looking at
/// existing bookings. Morning slots come first; a slot is only generated when it
/// starts strictly before its shift ends.
pub fn candidate_slots(barber: &Barber, service: &Service) -> Vec<String> {
    let step = service.duration_minutes as usize;
    if step == 0 {
        warn!(service_id = service.id, "Service has no duration, no slots generated");
        return Vec::new();
    }

    barber
        .shift_windows()
        .iter()
        .flat_map(|window| (window.start_minute()..window.end_minute()).step_by(step))
        .map(slot_label)
        .collect()
}

/// Point-in-time check that nobody holds `slot`. A failed lookup counts as taken.
pub async fn is_slot_available(
    store: &dyn BookingStore,
    barber_id: i64,
    date: NaiveDate,
    slot: &str,
) -> bool {
    match store.appointment_exists(barber_id, date, slot).await {
        Ok(taken) => !taken,
        Err(e) => {
            warn!(barber_id, %date, slot, err = %e, "Availability check failed, treating slot as taken");
            false
        }
    }
}

pub async fn compute_slots(
    store: &dyn BookingStore,
    barber: &Barber,
    service: &Service,
    date: NaiveDate,
) -> Vec<String> {
    let mut available = Vec::new();
    for slot in candidate_slots(barber, service) {
        if is_slot_available(store, barber.id, date, &slot).await {
            available.push(slot);
        }
    }
    debug!(
        barber_id = barber.id,
        service_id = service.id,
        %date,
        count = available.len(),
        "Computed available slots"
    );
    available
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{
        Appointment, AppointmentDetails, Customer, MemoryStore, NewAppointment, NewCustomer,
        StoreError,
    };
    use async_trait::async_trait;

    fn tuesday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 20).unwrap()
    }

    fn service(minutes: u32) -> Service {
        Service {
            id: 1,
            name: "Haircut".to_string(),
            price: 35.0,
            duration_minutes: minutes,
        }
    }

    fn barber(morning: Option<&str>, afternoon: Option<&str>) -> Barber {
        Barber {
            id: 3,
            name: "Kendy".to_string(),
            morning_shift: morning.map(str::to_string),
            afternoon_shift: afternoon.map(str::to_string),
            day_off: None,
        }
    }

    fn booking(time: &str) -> NewAppointment {
        NewAppointment {
            customer_id: 1,
            service_id: 1,
            barber_id: 3,
            appointment_date: tuesday(),
            appointment_time: time.to_string(),
            customer_attended: false,
        }
    }

    #[test]
    fn test_candidate_slots_half_hour_morning() {
        let slots = candidate_slots(&barber(Some("08:00-12:00"), None), &service(30));
        assert_eq!(
            slots,
            vec!["08:00", "08:30", "09:00", "09:30", "10:00", "10:30", "11:00", "11:30"]
        );
    }

    #[test]
    fn test_candidate_slots_morning_before_afternoon() {
        let slots = candidate_slots(
            &barber(Some("08:00-10:00"), Some("14:00-16:00")),
            &service(60),
        );
        assert_eq!(slots, vec!["08:00", "09:00", "14:00", "15:00"]);
    }

    #[test]
    fn test_candidate_slots_uneven_duration_stays_inside_shift() {
        // 45 minutes doesn't divide four hours; the last start must precede 12:00
        let slots = candidate_slots(&barber(Some("08:00-12:00"), None), &service(45));
        assert_eq!(
            slots,
            vec!["08:00", "08:45", "09:30", "10:15", "11:00", "11:45"]
        );

        let slots = candidate_slots(&barber(Some("08:00-09:00"), None), &service(90));
        assert_eq!(slots, vec!["08:00"]);
    }

    #[test]
    fn test_candidate_slots_no_shift_or_no_duration() {
        assert!(candidate_slots(&barber(None, None), &service(30)).is_empty());
        assert!(candidate_slots(&barber(Some("08:00-12:00"), None), &service(0)).is_empty());
    }

    #[test]
    fn test_candidate_slots_never_leave_shift() {
        let b = barber(Some("08:00-12:00"), Some("13:30-18:00"));
        for minutes in [10, 15, 20, 25, 30, 40, 45, 50, 60, 75, 90, 120] {
            for slot in candidate_slots(&b, &service(minutes)) {
                let inside_morning = slot.as_str() >= "08:00" && slot.as_str() < "12:00";
                let inside_afternoon = slot.as_str() >= "13:30" && slot.as_str() < "18:00";
                assert!(inside_morning || inside_afternoon, "{} outside shifts", slot);
            }
        }
    }

    #[tokio::test]
    async fn test_compute_slots_skips_booked() {
        let store = MemoryStore::default();
        store.create_appointment(booking("09:00")).await.unwrap();
        store.create_appointment(booking("11:30")).await.unwrap();

        let slots = compute_slots(
            &store,
            &barber(Some("08:00-12:00"), None),
            &service(30),
            tuesday(),
        )
        .await;

        assert_eq!(
            slots,
            vec!["08:00", "08:30", "09:30", "10:00", "10:30", "11:00"]
        );

        // Bookings on another day don't matter
        let wednesday = tuesday().succ_opt().unwrap();
        let slots = compute_slots(
            &store,
            &barber(Some("08:00-12:00"), None),
            &service(30),
            wednesday,
        )
        .await;
        assert_eq!(slots.len(), 8);
    }

    // Fails the existence check for one slot only
    struct FlakyStore {
        inner: MemoryStore,
        failing_slot: &'static str,
    }

    #[async_trait]
    impl BookingStore for FlakyStore {
        async fn find_customer_by_cpf(&self, cpf: &str) -> Result<Customer, StoreError> {
            self.inner.find_customer_by_cpf(cpf).await
        }

        async fn create_customer(&self, customer: NewCustomer) -> Result<Customer, StoreError> {
            self.inner.create_customer(customer).await
        }

        async fn list_services(&self) -> Result<Vec<Service>, StoreError> {
            self.inner.list_services().await
        }

        async fn list_barbers(&self) -> Result<Vec<Barber>, StoreError> {
            self.inner.list_barbers().await
        }

        async fn create_appointment(
            &self,
            appointment: NewAppointment,
        ) -> Result<Appointment, StoreError> {
            self.inner.create_appointment(appointment).await
        }

        async fn customer_appointments(
            &self,
            customer_id: i64,
        ) -> Result<Vec<AppointmentDetails>, StoreError> {
            self.inner.customer_appointments(customer_id).await
        }

        async fn appointment_exists(
            &self,
            barber_id: i64,
            date: NaiveDate,
            time: &str,
        ) -> Result<bool, StoreError> {
            if time == self.failing_slot {
                return Err(StoreError::TransportFailure("connection reset".to_string()));
            }
            self.inner.appointment_exists(barber_id, date, time).await
        }
    }

    #[tokio::test]
    async fn test_compute_slots_excludes_slot_when_check_fails() {
        let store = FlakyStore {
            inner: MemoryStore::default(),
            failing_slot: "10:00",
        };

        let slots = compute_slots(
            &store,
            &barber(Some("08:00-12:00"), None),
            &service(60),
            tuesday(),
        )
        .await;

        assert_eq!(slots, vec!["08:00", "09:00", "11:00"]);
        assert!(!is_slot_available(&store, 3, tuesday(), "10:00").await);
        assert!(is_slot_available(&store, 3, tuesday(), "09:00").await);
    }
}
