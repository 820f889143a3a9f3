use serde::{Deserialize, Serialize};

use crate::model::Guest;

/// Category assigned to guests without a group label.
pub const DEFAULT_CATEGORY: &str = "Altri invitati";

/// A confirmed guest as the table planner consumes it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableGuest {
    pub id: String,
    pub name: String,
    /// Not stored in the guest table; always empty.
    pub email: String,
    pub category: String,
    pub dietary_restrictions: Option<String>,
    pub table_id: Option<String>,
    pub seat_number: Option<u32>,
    #[serde(rename = "user_id")]
    pub user_id: String,
    pub confermato: bool,
}

impl TableGuest {
    /// Map a guest row the way the planner does. The row is assumed to come
    /// from a `confermato=eq.true` query, so the flag is forced on.
    pub fn from_guest(guest: &Guest) -> Self {
        Self {
            id: guest.id.to_string(),
            name: guest.nome_visualizzato.clone(),
            email: String::new(),
            category: guest
                .gruppo
                .clone()
                .filter(|g| !g.is_empty())
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            dietary_restrictions: guest.note.clone().filter(|n| !n.is_empty()),
            table_id: None,
            seat_number: None,
            user_id: guest.user_id.clone().unwrap_or_default(),
            confermato: true,
        }
    }
}

pub fn map_guests(guests: &[Guest]) -> Vec<TableGuest> {
    guests.iter().map(TableGuest::from_guest).collect()
}

/// How many mapped guests carry a usable name and a real category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MappingQuality {
    pub total: usize,
    pub named: usize,
    pub categorized: usize,
}

impl MappingQuality {
    pub fn of(mapped: &[TableGuest]) -> Self {
        Self {
            total: mapped.len(),
            named: mapped.iter().filter(|g| !g.name.is_empty()).count(),
            categorized: mapped
                .iter()
                .filter(|g| g.category != DEFAULT_CATEGORY)
                .count(),
        }
    }
}

/// Where the planner's guest list effectively comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataSource {
    /// Confirmed guests exist and are shown.
    RealData,
    /// The query works but returns nothing, so only demo tables are visible.
    MockFallback,
    /// The query itself failed.
    Unavailable,
}

impl DataSource {
    pub fn from_confirmed_count(count: usize) -> Self {
        if count > 0 {
            Self::RealData
        } else {
            Self::MockFallback
        }
    }

    pub fn describe(&self) -> &'static str {
        match self {
            Self::RealData => "table planner receives real confirmed guests",
            Self::MockFallback => {
                "no confirmed guests in the database; the planner falls back to demo data"
            }
            Self::Unavailable => "confirmed guests could not be queried",
        }
    }
}
