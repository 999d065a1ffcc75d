pub mod availability;
pub mod clock;
pub mod conversation;
pub mod identity;
pub mod schedule;

pub use availability::{candidate_slots, compute_slots, is_slot_available};
pub use clock::{Clock, FixedClock, ShopClock};
pub use conversation::{
    Author, BookingDraft, ChatMessage, Choice, Conversation, Event, MenuOption, Panel, Session,
    Step, Turn,
};
pub use identity::{first_name, is_full_name, TaxId};
pub use schedule::{barbers_for_date, candidate_dates, parse_weekday, ShiftWindow};
