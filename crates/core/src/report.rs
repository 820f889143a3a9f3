use std::collections::BTreeSet;

use serde::Serialize;

use crate::model::{Confirmation, Guest, UserScope};

/// Guests split by their tri-state confirmation flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConfirmationBreakdown {
    pub confirmed: Vec<Guest>,
    pub declined: Vec<Guest>,
    pub pending: Vec<Guest>,
}

impl ConfirmationBreakdown {
    pub fn partition(guests: impl IntoIterator<Item = Guest>) -> Self {
        let mut breakdown = Self::default();
        for guest in guests {
            match guest.confirmation() {
                Confirmation::Confirmed => breakdown.confirmed.push(guest),
                Confirmation::Declined => breakdown.declined.push(guest),
                Confirmation::Pending => breakdown.pending.push(guest),
            }
        }
        breakdown
    }

    pub fn total(&self) -> usize {
        self.confirmed.len() + self.declined.len() + self.pending.len()
    }

    pub fn counts(&self) -> ConfirmationCounts {
        ConfirmationCounts {
            confirmed: self.confirmed.len(),
            declined: self.declined.len(),
            pending: self.pending.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ConfirmationCounts {
    pub confirmed: usize,
    pub declined: usize,
    pub pending: usize,
}

/// Name/group coverage over a set of guest rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DataQuality {
    pub total: usize,
    pub with_name: usize,
    pub with_group: usize,
}

impl DataQuality {
    pub fn of(guests: &[Guest]) -> Self {
        Self {
            total: guests.len(),
            with_name: guests.iter().filter(|g| g.has_name()).count(),
            with_group: guests.iter().filter(|g| g.has_group()).count(),
        }
    }
}

/// Distinct, sorted owner ids across scoped rows. Rows without an owner are
/// skipped.
pub fn distinct_user_ids(rows: &[UserScope]) -> Vec<String> {
    rows.iter()
        .filter_map(|r| r.user_id.as_deref())
        .filter(|id| !id.is_empty())
        .map(String::from)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
