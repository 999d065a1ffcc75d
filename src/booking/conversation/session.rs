use super::step::Step;
use crate::booking::identity::TaxId;
use crate::database::{AppointmentDetails, Barber, Service};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Author {
    Bot,
    Customer,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub author: Author,
    pub text: String,
    pub timestamp: NaiveDateTime,
}

// In-progress booking choices. Replaced through the `with_*` methods.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookingDraft {
    pub phone: String,
    pub name: Option<String>,
    pub tax_id: Option<TaxId>,
    pub customer_id: Option<i64>,
    pub registered: bool,
    pub service: Option<Service>,
    pub date: Option<NaiveDate>,
    pub barber: Option<Barber>,
    pub time: Option<String>,
}

impl BookingDraft {
    pub fn new(phone: &str) -> Self {
        Self {
            phone: phone.to_string(),
            ..Default::default()
        }
    }

    pub fn with_tax_id(self, tax_id: TaxId) -> Self {
        Self {
            tax_id: Some(tax_id),
            ..self
        }
    }

    pub fn with_name(self, name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            ..self
        }
    }

    pub fn with_customer(self, customer_id: i64, name: &str) -> Self {
        Self {
            customer_id: Some(customer_id),
            name: Some(name.to_string()),
            registered: true,
            ..self
        }
    }

    pub fn with_service(self, service: Service) -> Self {
        Self {
            service: Some(service),
            ..self
        }
    }

    pub fn with_date(self, date: NaiveDate) -> Self {
        Self {
            date: Some(date),
            ..self
        }
    }

    pub fn with_barber(self, barber: Barber) -> Self {
        Self {
            barber: Some(barber),
            ..self
        }
    }

    pub fn with_time(self, time: &str) -> Self {
        Self {
            time: Some(time.to_string()),
            ..self
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Catalog {
    pub services: Vec<Service>,
    pub barbers: Vec<Barber>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Offers {
    pub dates: Vec<NaiveDate>,
    pub barbers: Vec<Barber>,
    pub times: Vec<String>,
    pub appointments: Vec<AppointmentDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Session {
    pub id: String,
    pub step: Step,
    pub draft: BookingDraft,
    pub catalog: Catalog,
    pub offers: Offers,
    pub transcript: Vec<ChatMessage>,
}

impl Session {
    pub fn new(id: &str, phone: &str, catalog: Catalog) -> Self {
        Self {
            id: id.to_string(),
            step: Step::Greeting,
            draft: BookingDraft::new(phone),
            catalog,
            offers: Offers::default(),
            transcript: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuOption {
    Schedule,
    Appointments,
    Social,
}

/// Customer input, either typed text or a selection from the current panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Text { text: String },
    Menu { option: MenuOption },
    Service { id: i64 },
    Date { date: NaiveDate },
    Barber { id: i64 },
    Time { slot: String },
    Confirm,
    BackToMenu,
    Restart,
}

/// Options shown alongside the current step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Panel {
    None,
    Menu {
        options: Vec<MenuOption>,
    },
    Services {
        services: Vec<Service>,
    },
    Dates {
        dates: Vec<NaiveDate>,
    },
    Barbers {
        barbers: Vec<Barber>,
    },
    Times {
        slots: Vec<String>,
    },
    Summary {
        service: Option<Service>,
        barber: Option<Barber>,
        date: Option<NaiveDate>,
        time: Option<String>,
    },
    Success {
        address: String,
        maps_url: String,
    },
    Appointments {
        appointments: Vec<AppointmentDetails>,
    },
    Social {
        whatsapp: String,
        instagram: String,
        address: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Choice {
    pub label: String,
    pub event: Event,
}
