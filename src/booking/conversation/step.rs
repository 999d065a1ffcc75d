//! Steps of the booking conversation and the moves allowed between them.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    #[default]
    Greeting,
    IdentityVerification,
    NameCapture,
    MenuOptions,
    ServiceSelection,
    DateSelection,
    BarberSelection,
    TimeSelection,
    Summary,
    Success,
    ViewAppointments,
    SocialMedia,
}

impl Step {
    /// Check if moving from `self` to `target` is part of the flow.
    ///
    /// Self-loops are the re-prompt cases. Going back to `Greeting` is a restart
    /// and always allowed.
    pub fn can_transition_to(&self, target: Step) -> bool {
        use Step::*;
        target == Greeting
            || matches!(
                (self, target),
                (Greeting, IdentityVerification)
                    | (IdentityVerification, IdentityVerification)
                    | (IdentityVerification, NameCapture)
                    | (IdentityVerification, MenuOptions)
                    | (NameCapture, NameCapture)
                    | (NameCapture, MenuOptions)
                    | (MenuOptions, MenuOptions)
                    | (MenuOptions, ServiceSelection)
                    | (MenuOptions, ViewAppointments)
                    | (MenuOptions, SocialMedia)
                    | (ServiceSelection, DateSelection)
                    | (DateSelection, DateSelection)
                    | (DateSelection, BarberSelection)
                    | (BarberSelection, BarberSelection)
                    | (BarberSelection, TimeSelection)
                    | (TimeSelection, Summary)
                    | (Summary, Summary)
                    | (Summary, TimeSelection)
                    | (Summary, BarberSelection)
                    | (Summary, Success)
                    | (Success, MenuOptions)
                    | (ViewAppointments, MenuOptions)
                    | (SocialMedia, MenuOptions)
            )
    }

    /// Steps that read typed text instead of option selections.
    pub fn accepts_free_text(&self) -> bool {
        matches!(self, Step::IdentityVerification | Step::NameCapture)
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Greeting => "greeting",
            Self::IdentityVerification => "identity_verification",
            Self::NameCapture => "name_capture",
            Self::MenuOptions => "menu_options",
            Self::ServiceSelection => "service_selection",
            Self::DateSelection => "date_selection",
            Self::BarberSelection => "barber_selection",
            Self::TimeSelection => "time_selection",
            Self::Summary => "summary",
            Self::Success => "success",
            Self::ViewAppointments => "view_appointments",
            Self::SocialMedia => "social_media",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::Step::*;

    #[test]
    fn test_booking_path_is_allowed() {
        let path = [
            Greeting,
            IdentityVerification,
            NameCapture,
            MenuOptions,
            ServiceSelection,
            DateSelection,
            BarberSelection,
            TimeSelection,
            Summary,
            Success,
            MenuOptions,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_transition_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_skipping_steps_is_refused() {
        assert!(!IdentityVerification.can_transition_to(Summary));
        assert!(!ServiceSelection.can_transition_to(TimeSelection));
        assert!(!TimeSelection.can_transition_to(Success));
        assert!(!Success.can_transition_to(Summary));
        assert!(!SocialMedia.can_transition_to(ServiceSelection));
        assert!(!Greeting.can_transition_to(MenuOptions));
    }

    #[test]
    fn test_summary_can_fall_back() {
        assert!(Summary.can_transition_to(TimeSelection));
        assert!(Summary.can_transition_to(BarberSelection));
        assert!(!Summary.can_transition_to(DateSelection));
    }

    #[test]
    fn test_restart_always_allowed() {
        for step in [NameCapture, MenuOptions, Summary, Success, ViewAppointments] {
            assert!(step.can_transition_to(Greeting));
        }
    }

    #[test]
    fn test_free_text_steps() {
        assert!(IdentityVerification.accepts_free_text());
        assert!(NameCapture.accepts_free_text());
        assert!(!MenuOptions.accepts_free_text());
        assert!(!Summary.accepts_free_text());
    }
}
