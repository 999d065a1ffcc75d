pub mod messages;
mod session;
mod step;

pub use session::{
    Author, BookingDraft, Catalog, ChatMessage, Choice, Event, MenuOption, Offers, Panel, Session,
};
pub use step::Step;

use crate::booking::availability::{compute_slots, is_slot_available};
use crate::booking::clock::Clock;
use crate::booking::identity::{first_name, is_full_name, TaxId};
use crate::booking::schedule::{barbers_for_date, candidate_dates};
use crate::configuration::ShopConfig;
use crate::database::{Barber, BookingStore, NewAppointment, NewCustomer, Service, StoreError};
use chrono::{NaiveDate, NaiveDateTime};
use messages::*;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Debug, Clone)]
pub struct Turn {
    pub session: Session,
    pub replies: Vec<ChatMessage>,
    now: NaiveDateTime,
}

impl Turn {
    fn new(session: Session, now: NaiveDateTime) -> Self {
        Self {
            session,
            replies: Vec::new(),
            now,
        }
    }

    fn say(mut self, text: impl Into<String>) -> Self {
        let message = ChatMessage {
            author: Author::Bot,
            text: text.into(),
            timestamp: self.now,
        };
        self.session.transcript.push(message.clone());
        self.replies.push(message);
        self
    }

    fn heard(mut self, text: String) -> Self {
        self.session.transcript.push(ChatMessage {
            author: Author::Customer,
            text,
            timestamp: self.now,
        });
        self
    }

    fn goto(mut self, next: Step) -> Self {
        let current = self.session.step;
        if current.can_transition_to(next) {
            debug!(session_id = %self.session.id, from = %current, to = %next, "Step transition");
            self.session.step = next;
        } else {
            error!(session_id = %self.session.id, from = %current, to = %next, "Refused step transition");
        }
        self
    }

    fn update_draft(mut self, update: impl FnOnce(BookingDraft) -> BookingDraft) -> Self {
        let draft = std::mem::take(&mut self.session.draft);
        self.session.draft = update(draft);
        self
    }

    fn offer(mut self, update: impl FnOnce(Offers) -> Offers) -> Self {
        let offers = std::mem::take(&mut self.session.offers);
        self.session.offers = update(offers);
        self
    }
}

pub struct Conversation {
    store: Arc<dyn BookingStore>,
    clock: Arc<dyn Clock>,
    shop: ShopConfig,
}

impl Conversation {
    pub fn new(store: Arc<dyn BookingStore>, clock: Arc<dyn Clock>, shop: ShopConfig) -> Self {
        Self { store, clock, shop }
    }

    pub fn shop(&self) -> &ShopConfig {
        &self.shop
    }

    pub async fn start(&self, id: &str, phone: &str) -> Turn {
        let session = Session::new(id, phone, self.load_catalog().await);
        info!(session_id = id, "Conversation started");
        self.greet(Turn::new(session, self.clock.now()))
    }

    pub async fn handle(&self, session: Session, event: Event) -> Turn {
        let echo = echo(
            &event,
            &session.catalog.services,
            &session.catalog.barbers,
            &self.shop.currency_symbol,
        );
        let mut turn = Turn::new(session, self.clock.now());
        if let Some(text) = echo {
            turn = turn.heard(text);
        }
        debug!(session_id = %turn.session.id, step = %turn.session.step, ?event, "Handling event");

        match (turn.session.step, event) {
            (_, Event::Restart) => self.restart(turn, None).await,
            (Step::IdentityVerification, Event::Text { text }) => {
                self.verify_identity(turn, &text).await
            }
            (Step::NameCapture, Event::Text { text }) => self.capture_name(turn, &text).await,
            (Step::MenuOptions, Event::Menu { option }) => self.select_menu(turn, option).await,
            (Step::ServiceSelection, Event::Service { id }) => self.select_service(turn, id),
            (Step::DateSelection, Event::Date { date }) => self.select_date(turn, date),
            (Step::BarberSelection, Event::Barber { id }) => self.select_barber(turn, id).await,
            (Step::TimeSelection, Event::Time { slot }) => self.select_time(turn, &slot),
            (Step::Summary, Event::Confirm) => self.confirm(turn).await,
            (Step::Success | Step::ViewAppointments | Step::SocialMedia, Event::BackToMenu) => {
                self.show_menu(turn)
            }
            (step, event) => {
                debug!(%step, ?event, "Event does not apply to step");
                self.reprompt(turn)
            }
        }
    }

    pub fn panel(&self, session: &Session) -> Panel {
        match session.step {
            Step::Greeting | Step::IdentityVerification | Step::NameCapture => Panel::None,
            Step::MenuOptions => Panel::Menu {
                options: vec![
                    MenuOption::Schedule,
                    MenuOption::Appointments,
                    MenuOption::Social,
                ],
            },
            Step::ServiceSelection => Panel::Services {
                services: session.catalog.services.clone(),
            },
            Step::DateSelection => Panel::Dates {
                dates: session.offers.dates.clone(),
            },
            Step::BarberSelection => Panel::Barbers {
                barbers: session.offers.barbers.clone(),
            },
            Step::TimeSelection => Panel::Times {
                slots: session.offers.times.clone(),
            },
            Step::Summary => Panel::Summary {
                service: session.draft.service.clone(),
                barber: session.draft.barber.clone(),
                date: session.draft.date,
                time: session.draft.time.clone(),
            },
            Step::Success => Panel::Success {
                address: self.shop.address.clone(),
                maps_url: self.shop.maps_url.clone(),
            },
            Step::ViewAppointments => Panel::Appointments {
                appointments: session.offers.appointments.clone(),
            },
            Step::SocialMedia => Panel::Social {
                whatsapp: self.shop.whatsapp.clone(),
                instagram: self.shop.instagram.clone(),
                address: self.shop.address.clone(),
            },
        }
    }

    // The current panel as buttons, for text-only channels
    pub fn choices(&self, session: &Session) -> Vec<Choice> {
        let currency = &self.shop.currency_symbol;
        let back_to_menu = || Choice {
            label: BACK_TO_MENU_LABEL.to_string(),
            event: Event::BackToMenu,
        };

        match self.panel(session) {
            Panel::None => Vec::new(),
            Panel::Menu { options } => options
                .into_iter()
                .map(|option| Choice {
                    label: menu_label(option).to_string(),
                    event: Event::Menu { option },
                })
                .collect(),
            Panel::Services { services } => services
                .iter()
                .map(|service| Choice {
                    label: service_label(service, currency),
                    event: Event::Service { id: service.id },
                })
                .collect(),
            Panel::Dates { dates } => dates
                .into_iter()
                .map(|date| Choice {
                    label: date_label(date),
                    event: Event::Date { date },
                })
                .collect(),
            Panel::Barbers { barbers } => barbers
                .iter()
                .map(|barber| Choice {
                    label: barber_label(barber),
                    event: Event::Barber { id: barber.id },
                })
                .collect(),
            Panel::Times { slots } => slots
                .into_iter()
                .map(|slot| Choice {
                    label: time_label(&slot),
                    event: Event::Time { slot },
                })
                .collect(),
            Panel::Summary { .. } => vec![
                Choice {
                    label: CONFIRM_LABEL.to_string(),
                    event: Event::Confirm,
                },
                Choice {
                    label: RESTART_LABEL.to_string(),
                    event: Event::Restart,
                },
            ],
            Panel::Success { .. } | Panel::Appointments { .. } | Panel::Social { .. } => {
                vec![back_to_menu()]
            }
        }
    }

    async fn load_catalog(&self) -> Catalog {
        let services = self.store.list_services().await.unwrap_or_else(|e| {
            error!(err = %e, "Could not load services");
            Vec::new()
        });
        let barbers = self.store.list_barbers().await.unwrap_or_else(|e| {
            error!(err = %e, "Could not load barbers");
            Vec::new()
        });
        Catalog { services, barbers }
    }

    fn greet(&self, turn: Turn) -> Turn {
        turn.say(welcome(&self.shop.name))
            .say(ASK_TAX_ID)
            .goto(Step::IdentityVerification)
    }

    // Drops the draft and transcript; the phone and replies so far survive
    async fn restart(&self, turn: Turn, notice: Option<&str>) -> Turn {
        let turn = match notice {
            Some(text) => turn.say(text),
            None => turn,
        };
        let Turn {
            session,
            replies,
            now,
        } = turn;
        info!(session_id = %session.id, step = %session.step, "Conversation restarted");

        let fresh = Session::new(&session.id, &session.draft.phone, self.load_catalog().await);
        self.greet(Turn {
            session: fresh,
            replies,
            now,
        })
    }

    fn reprompt(&self, turn: Turn) -> Turn {
        let prompt = match turn.session.step {
            Step::IdentityVerification => ASK_TAX_ID,
            Step::NameCapture => ASK_FULL_NAME,
            _ => PICK_AN_OPTION,
        };
        turn.say(prompt)
    }

    fn show_menu(&self, turn: Turn) -> Turn {
        turn.say(MENU_PROMPT).goto(Step::MenuOptions)
    }

    async fn verify_identity(&self, turn: Turn, text: &str) -> Turn {
        let Some(tax_id) = TaxId::parse(text) else {
            return turn.say(INVALID_TAX_ID);
        };
        let turn = turn.update_draft(|draft| draft.with_tax_id(tax_id.clone()));

        match self.store.find_customer_by_cpf(tax_id.digits()).await {
            Ok(customer) => {
                info!(session_id = %turn.session.id, customer_id = customer.id, "Returning customer identified");
                let greeting = welcome_back(first_name(&customer.name), &self.shop.name);
                let turn = turn
                    .update_draft(|draft| draft.with_customer(customer.id, &customer.name))
                    .say(greeting);
                self.show_menu(turn)
            }
            Err(StoreError::NotFound) => turn
                .say(TAX_ID_NOT_FOUND)
                .say(ASK_FULL_NAME)
                .goto(Step::NameCapture),
            Err(e) => {
                error!(session_id = %turn.session.id, err = %e, "Customer lookup failed");
                turn.say(LOOKUP_FAILED)
            }
        }
    }

    async fn capture_name(&self, turn: Turn, text: &str) -> Turn {
        let name = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if !is_full_name(&name) {
            return turn.say(INVALID_NAME);
        }
        let turn = turn.update_draft(|draft| draft.with_name(&name));

        let Some(tax_id) = turn.session.draft.tax_id.clone() else {
            warn!(session_id = %turn.session.id, "Name captured without a CPF");
            return self.restart(turn, Some(SESSION_LOST)).await;
        };
        let new_customer = NewCustomer {
            name: name.clone(),
            cpf: tax_id.digits().to_string(),
            phone: turn.session.draft.phone.clone(),
        };

        match self.store.create_customer(new_customer).await {
            Ok(customer) => {
                let turn = turn
                    .update_draft(|draft| draft.with_customer(customer.id, &customer.name))
                    .say(registered(first_name(&name)));
                self.show_menu(turn)
            }
            Err(e) => {
                error!(session_id = %turn.session.id, err = %e, "Customer registration failed");
                turn.say(REGISTRATION_FAILED).goto(Step::NameCapture)
            }
        }
    }

    async fn select_menu(&self, turn: Turn, option: MenuOption) -> Turn {
        match option {
            MenuOption::Schedule => {
                if turn.session.catalog.services.is_empty() {
                    return self.show_menu(turn.say(NO_SERVICES));
                }
                turn.say(SERVICE_PROMPT).goto(Step::ServiceSelection)
            }
            MenuOption::Appointments => {
                let Some(customer_id) = turn.session.draft.customer_id else {
                    warn!(session_id = %turn.session.id, "Appointments requested without a customer");
                    return self.restart(turn, Some(SESSION_LOST)).await;
                };
                let appointments = self
                    .store
                    .customer_appointments(customer_id)
                    .await
                    .unwrap_or_else(|e| {
                        error!(customer_id, err = %e, "Could not load appointments");
                        Vec::new()
                    });

                if appointments.is_empty() {
                    return self.show_menu(turn.say(NO_APPOINTMENTS));
                }
                turn.offer(|offers| Offers {
                    appointments,
                    ..offers
                })
                .say(APPOINTMENTS_HEADER)
                .goto(Step::ViewAppointments)
            }
            MenuOption::Social => turn.say(SOCIAL_HEADER).goto(Step::SocialMedia),
        }
    }

    fn select_service(&self, turn: Turn, id: i64) -> Turn {
        let Some(service) = turn
            .session
            .catalog
            .services
            .iter()
            .find(|s| s.id == id)
            .cloned()
        else {
            return self.reprompt(turn);
        };
        let dates = candidate_dates(self.clock.today());
        let reply = service_chosen(&service, &self.shop.currency_symbol);

        turn.update_draft(|draft| draft.with_service(service))
            .offer(|offers| Offers { dates, ..offers })
            .say(reply)
            .say(DATE_PROMPT)
            .goto(Step::DateSelection)
    }

    fn select_date(&self, turn: Turn, date: NaiveDate) -> Turn {
        if !turn.session.offers.dates.contains(&date) {
            return self.reprompt(turn);
        }
        let barbers = barbers_for_date(&turn.session.catalog.barbers, date);
        let turn = turn.update_draft(|draft| draft.with_date(date));

        if barbers.is_empty() {
            return turn.say(NO_BARBERS_ON_DATE).goto(Step::DateSelection);
        }
        turn.offer(|offers| Offers { barbers, ..offers })
            .say(BARBER_PROMPT)
            .goto(Step::BarberSelection)
    }

    async fn select_barber(&self, turn: Turn, id: i64) -> Turn {
        let Some(barber) = turn
            .session
            .offers
            .barbers
            .iter()
            .find(|b| b.id == id)
            .cloned()
        else {
            return self.reprompt(turn);
        };
        let (Some(service), Some(date)) =
            (turn.session.draft.service.clone(), turn.session.draft.date)
        else {
            warn!(session_id = %turn.session.id, "Barber chosen before service and date");
            return self.restart(turn, Some(SESSION_LOST)).await;
        };

        let times = compute_slots(self.store.as_ref(), &barber, &service, date).await;
        let turn = turn
            .say(barber_chosen(&barber))
            .update_draft(|draft| draft.with_barber(barber));

        if times.is_empty() {
            return turn.say(NO_TIMES_FOR_BARBER).goto(Step::BarberSelection);
        }
        turn.offer(|offers| Offers { times, ..offers })
            .say(TIME_PROMPT)
            .goto(Step::TimeSelection)
    }

    fn select_time(&self, turn: Turn, slot: &str) -> Turn {
        if !turn.session.offers.times.iter().any(|t| t == slot) {
            return self.reprompt(turn);
        }
        turn.update_draft(|draft| draft.with_time(slot))
            .say(SUMMARY_PROMPT)
            .goto(Step::Summary)
    }

    async fn confirm(&self, turn: Turn) -> Turn {
        let draft = turn.session.draft.clone();
        let Some(customer_id) = draft.customer_id else {
            warn!(session_id = %turn.session.id, "Confirmation without a customer");
            return self.restart(turn, Some(SESSION_LOST)).await;
        };
        let (Some(service), Some(barber), Some(date), Some(time)) =
            (draft.service, draft.barber, draft.date, draft.time)
        else {
            warn!(session_id = %turn.session.id, "Confirmation with an incomplete draft");
            return self.restart(turn, Some(SESSION_LOST)).await;
        };

        // Not atomic with the insert below: two sessions can both pass this check
        if !is_slot_available(self.store.as_ref(), barber.id, date, &time).await {
            info!(barber_id = barber.id, %date, time = %time, "Slot taken before confirmation");
            return self.slot_taken(turn, &barber, &service, date).await;
        }

        let request = NewAppointment {
            customer_id,
            service_id: service.id,
            barber_id: barber.id,
            appointment_date: date,
            appointment_time: time.clone(),
            customer_attended: false,
        };

        match self.store.create_appointment(request).await {
            Ok(appointment) => {
                info!(session_id = %turn.session.id, appointment_id = appointment.id, "Booking confirmed");
                let name = draft.name.as_deref().unwrap_or_default();
                turn.say(BOOKED)
                    .say(see_you(first_name(name), &self.shop.name, date, &time))
                    .say(VISIT_US)
                    .goto(Step::Success)
            }
            Err(StoreError::Conflict(_)) => self.slot_taken(turn, &barber, &service, date).await,
            Err(e) => {
                error!(session_id = %turn.session.id, err = %e, "Could not save appointment");
                turn.say(SAVE_FAILED).goto(Step::Summary)
            }
        }
    }

    async fn slot_taken(
        &self,
        turn: Turn,
        barber: &Barber,
        service: &Service,
        date: NaiveDate,
    ) -> Turn {
        let times = compute_slots(self.store.as_ref(), barber, service, date).await;
        let turn = turn.update_draft(|draft| BookingDraft {
            time: None,
            ..draft
        });
        if times.is_empty() {
            return turn
                .say(NO_TIMES_FOR_BARBER)
                .goto(Step::BarberSelection);
        }
        turn.offer(|offers| Offers { times, ..offers })
            .say(SLOT_TAKEN)
            .goto(Step::TimeSelection)
    }
}
