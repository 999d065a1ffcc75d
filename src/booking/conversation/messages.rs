use super::session::{Event, MenuOption};
use crate::database::{Barber, Service};
use chrono::NaiveDate;

pub const ASK_TAX_ID: &str = "To get started, please enter your CPF (numbers only):";
pub const INVALID_TAX_ID: &str = "Please enter a valid CPF with 11 digits:";
pub const TAX_ID_NOT_FOUND: &str = "We couldn't find this CPF in our records.";
pub const LOOKUP_FAILED: &str =
    "Sorry, we couldn't check your registration right now. Please send your CPF again:";
pub const ASK_FULL_NAME: &str = "Please tell us your full name so we can register you!";
pub const INVALID_NAME: &str = "Please enter your full name (first and last name):";
pub const REGISTRATION_FAILED: &str =
    "Sorry, we had a problem saving your registration. Let's try again, please send your full name:";
pub const MENU_PROMPT: &str = "What would you like to do today?";
pub const NO_SERVICES: &str = "Sorry, there are no services available for booking right now.";
pub const SERVICE_PROMPT: &str = "Which service would you like to book?";
pub const DATE_PROMPT: &str = "Now choose a date for your appointment:";
pub const NO_BARBERS_ON_DATE: &str =
    "Sorry, no barbers are available on this date. Please choose another date.";
pub const BARBER_PROMPT: &str = "Now choose an available barber:";
pub const NO_TIMES_FOR_BARBER: &str =
    "Sorry, there are no times left with this barber on this date. Please choose another barber:";
pub const TIME_PROMPT: &str = "Now choose an available time:";
pub const SUMMARY_PROMPT: &str = "Perfect! Let's review your booking details:";
pub const SLOT_TAKEN: &str =
    "Sorry, this time is no longer available. Please choose another time:";
pub const SAVE_FAILED: &str =
    "Sorry, we couldn't save your booking right now. Please try confirming again.";
pub const BOOKED: &str = "🎉 Your appointment is booked!";
pub const VISIT_US: &str = "📍 Come visit us:";
pub const NO_APPOINTMENTS: &str =
    "You don't have any appointments yet. How about booking a haircut now?";
pub const APPOINTMENTS_HEADER: &str = "Here are your appointments:";
pub const SOCIAL_HEADER: &str = "Here are our social media channels:";
pub const SESSION_LOST: &str = "We couldn't find your details. Let's start over.";
pub const PICK_AN_OPTION: &str = "Please choose one of the options below.";

pub fn welcome(shop_name: &str) -> String {
    format!("Hello! Welcome to {}! 💈", shop_name)
}

pub fn welcome_back(first_name: &str, shop_name: &str) -> String {
    format!("Hello {}! Welcome back to {} 💈", first_name, shop_name)
}

pub fn registered(first_name: &str) -> String {
    format!(
        "Thank you {}! Your registration is complete. ✅",
        first_name
    )
}

pub fn service_chosen(service: &Service, currency: &str) -> String {
    format!(
        "Excellent choice! {} for {} 💰",
        service.name,
        price(service.price, currency)
    )
}

pub fn barber_chosen(barber: &Barber) -> String {
    format!("Great! {} is an excellent choice!", barber.name)
}

pub fn see_you(first_name: &str, shop_name: &str, date: NaiveDate, time: &str) -> String {
    format!(
        "Thanks for choosing {}, {}! We'll see you on {} at {}. See you soon! 👋",
        shop_name,
        first_name,
        date.format("%d/%m/%Y"),
        time
    )
}

pub fn price(amount: f64, currency: &str) -> String {
    format!("{} {:.2}", currency, amount)
}

// "Tuesday, October 20"
pub fn long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

pub fn menu_label(option: MenuOption) -> &'static str {
    match option {
        MenuOption::Schedule => "✂️ Book a haircut",
        MenuOption::Appointments => "📅 My appointments",
        MenuOption::Social => "📱 Social media",
    }
}

pub const CONFIRM_LABEL: &str = "✅ Confirm booking";
pub const BACK_TO_MENU_LABEL: &str = "↩️ Back to menu";
pub const RESTART_LABEL: &str = "🔄 Start over";

pub fn service_label(service: &Service, currency: &str) -> String {
    format!("{} - {}", service.name, price(service.price, currency))
}

pub fn date_label(date: NaiveDate) -> String {
    format!("📅 {}", long_date(date))
}

pub fn barber_label(barber: &Barber) -> String {
    format!("👨‍💼 {}", barber.name)
}

pub fn time_label(slot: &str) -> String {
    format!("🕐 {}", slot)
}

/// How a customer's input shows up in the transcript.
pub fn echo(
    event: &Event,
    services: &[Service],
    barbers: &[Barber],
    currency: &str,
) -> Option<String> {
    let text = match event {
        Event::Text { text } => text.trim().to_string(),
        Event::Menu { option } => menu_label(*option).to_string(),
        Event::Service { id } => services
            .iter()
            .find(|s| s.id == *id)
            .map(|s| service_label(s, currency))?,
        Event::Date { date } => date_label(*date),
        Event::Barber { id } => barbers.iter().find(|b| b.id == *id).map(barber_label)?,
        Event::Time { slot } => time_label(slot),
        Event::Confirm => CONFIRM_LABEL.to_string(),
        Event::BackToMenu => BACK_TO_MENU_LABEL.to_string(),
        Event::Restart => RESTART_LABEL.to_string(),
    };
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_and_dates() {
        assert_eq!(price(35.0, "R$"), "R$ 35.00");
        assert_eq!(price(25.5, "R$"), "R$ 25.50");

        let tuesday = NaiveDate::from_ymd_opt(2026, 10, 20).unwrap();
        assert_eq!(long_date(tuesday), "Tuesday, October 20");
        assert_eq!(
            see_you("Maria", "KendyBlack", tuesday, "09:00"),
            "Thanks for choosing KendyBlack, Maria! We'll see you on 20/10/2026 at 09:00. See you soon! 👋"
        );
    }

    #[test]
    fn test_echo_unknown_selection() {
        assert_eq!(echo(&Event::Service { id: 42 }, &[], &[], "R$"), None);
        assert_eq!(
            echo(&Event::Text { text: "  ".to_string() }, &[], &[], "R$"),
            None
        );
        assert_eq!(
            echo(&Event::Time { slot: "09:00".to_string() }, &[], &[], "R$"),
            Some("🕐 09:00".to_string())
        );
    }
}
