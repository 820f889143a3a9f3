use serde::{Deserialize, Serialize};
use std::fmt;

/// Table names as exposed by the PostgREST interface.
pub const GUESTS_TABLE: &str = "invitati";
pub const INVITATION_UNITS_TABLE: &str = "unita_invito";
pub const PROFILES_TABLE: &str = "profiles";

/// Columns every guest row is expected to carry.
pub const EXPECTED_GUEST_COLUMNS: [&str; 5] =
    ["id", "nome_visualizzato", "confermato", "gruppo", "user_id"];

/// Projection used by the table planner when it loads confirmed guests.
pub const PLANNER_GUEST_COLUMNS: [&str; 8] = [
    "id",
    "nome_visualizzato",
    "cognome",
    "note",
    "gruppo",
    "confermato",
    "user_id",
    "unita_invito_id",
];

/// Primary key of a database row.
///
/// Guest and invitation-unit tables use integer keys, but nothing in the
/// protocol guarantees it, so text keys are accepted as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RowId {
    Int(i64),
    Text(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Text(id) => f.write_str(id),
        }
    }
}

/// RSVP state of a guest.
///
/// The column is declared boolean but is nullable, so three states exist in
/// practice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confirmation {
    Confirmed,
    Declined,
    Pending,
}

impl Confirmation {
    pub fn from_flag(flag: Option<bool>) -> Self {
        match flag {
            Some(true) => Self::Confirmed,
            Some(false) => Self::Declined,
            None => Self::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Confirmed => "confirmed",
            Self::Declined => "declined",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for Confirmation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Age bracket stored in `fascia_eta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeGroup {
    Adulto,
    Ragazzo,
    Bambino,
}

/// A grouping record for one invited party or household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvitationUnit {
    pub id: RowId,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub nome_principale: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Insert payload for `unita_invito`. The id is assigned by the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewInvitationUnit {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nome_principale: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

/// A guest row from `invitati`.
///
/// Every column except `id` is optional so that partial `select=`
/// projections still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guest {
    pub id: RowId,
    #[serde(default)]
    pub nome_visualizzato: String,
    #[serde(default)]
    pub nome: Option<String>,
    #[serde(default)]
    pub cognome: Option<String>,
    #[serde(default)]
    pub gruppo: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub confermato: Option<bool>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub unita_invito_id: Option<RowId>,
    #[serde(default)]
    pub is_principale: Option<bool>,
    #[serde(default)]
    pub fascia_eta: Option<AgeGroup>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Guest {
    pub fn confirmation(&self) -> Confirmation {
        Confirmation::from_flag(self.confermato)
    }

    pub fn has_name(&self) -> bool {
        !self.nome_visualizzato.trim().is_empty()
    }

    pub fn has_group(&self) -> bool {
        self.gruppo.as_deref().is_some_and(|g| !g.trim().is_empty())
    }
}

/// Insert payload for `invitati`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewGuest {
    pub nome_visualizzato: String,
    pub cognome: Option<String>,
    pub gruppo: Option<String>,
    pub note: Option<String>,
    pub confermato: Option<bool>,
    pub user_id: String,
    pub unita_invito_id: RowId,
}

/// A row from `profiles`; only `user_id` is relied upon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: String,
    #[serde(default)]
    pub id: Option<RowId>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

/// Projection of a guest row reduced to its owner, used for scoping checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserScope {
    #[serde(default)]
    pub user_id: Option<String>,
}
