use chrono::Utc;
use uuid::Uuid;

use guestcheck_core::status::StatusCheckCreate;
use guestcheck_core::{NewGuest, NewInvitationUnit, RowId};

/// Client name used for status checks created by the backend specs.
pub const STATUS_CLIENT_NAME: &str = "Maria e Giuseppe Rossi";

/// Origin sent with CORS preflights when none is configured.
pub const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// A status check request with a unique suffix so concurrent runs can tell
/// their records apart.
pub fn status_check_request() -> StatusCheckCreate {
    let suffix = Uuid::new_v4().simple().to_string();
    StatusCheckCreate {
        client_name: format!("{STATUS_CLIENT_NAME} ({})", &suffix[..8]),
    }
}

/// Guest data independent of the owner and unit it will be attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GuestTemplate {
    pub display_name: &'static str,
    pub surname: &'static str,
    pub group: &'static str,
    pub note: Option<&'static str>,
}

impl GuestTemplate {
    pub fn to_new_guest(&self, user_id: &str, unit_id: &RowId) -> NewGuest {
        NewGuest {
            nome_visualizzato: self.display_name.to_string(),
            cognome: Some(self.surname.to_string()),
            gruppo: Some(self.group.to_string()),
            note: self.note.map(String::from),
            confermato: Some(true),
            user_id: user_id.to_string(),
            unita_invito_id: unit_id.clone(),
        }
    }
}

/// The six confirmed guests seeded for planner testing.
pub fn confirmed_roster() -> [GuestTemplate; 6] {
    [
        GuestTemplate {
            display_name: "Marco Rossi",
            surname: "Rossi",
            group: "Famiglia dello sposo",
            note: Some("Vegetariano"),
        },
        GuestTemplate {
            display_name: "Anna Bianchi",
            surname: "Bianchi",
            group: "Famiglia della sposa",
            note: Some("Senza glutine"),
        },
        GuestTemplate {
            display_name: "Luigi Verdi",
            surname: "Verdi",
            group: "Amici dello sposo",
            note: None,
        },
        GuestTemplate {
            display_name: "Francesca Romano",
            surname: "Romano",
            group: "Amici della sposa",
            note: None,
        },
        GuestTemplate {
            display_name: "Giuseppe Marino",
            surname: "Marino",
            group: "Famiglia dello sposo",
            note: None,
        },
        GuestTemplate {
            display_name: "Silvia Bertolini",
            surname: "Bertolini",
            group: "Colleghi",
            note: Some("Intollerante al lattosio"),
        },
    ]
}

/// Insert payload for a fresh invitation unit stamped with the current time.
pub fn invitation_unit(user_id: &str, name: &str) -> NewInvitationUnit {
    NewInvitationUnit {
        user_id: user_id.to_string(),
        nome_principale: Some(name.to_string()),
        created_at: Some(Utc::now().to_rfc3339()),
    }
}
