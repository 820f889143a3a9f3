use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use guestcheck_core::Guest;

/// Output format of the reporting commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines on stderr
    #[default]
    Text,
    /// One pretty-printed JSON document on stdout
    Json,
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}

/// One-line rendering of a guest row for text reports.
pub fn guest_line(guest: &Guest) -> String {
    let name = if guest.has_name() {
        guest.nome_visualizzato.as_str()
    } else {
        "(no name)"
    };
    let mut line = format!("#{} {name}", guest.id);
    if let Some(group) = guest.gruppo.as_deref().filter(|g| !g.is_empty()) {
        line.push_str(&format!(" [{group}]"));
    }
    line.push_str(&format!(" {}", guest.confirmation()));
    if let Some(user) = guest.user_id.as_deref() {
        line.push_str(&format!(" user={user}"));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;
    use guestcheck_core::RowId;

    #[test]
    fn guest_line_shows_group_and_state() {
        let guest = Guest {
            id: RowId::Int(3),
            nome_visualizzato: "Anna Bianchi".into(),
            nome: None,
            cognome: None,
            gruppo: Some("Famiglia della sposa".into()),
            note: None,
            confermato: None,
            user_id: Some("u-1".into()),
            unita_invito_id: None,
            is_principale: None,
            fascia_eta: None,
            created_at: None,
        };
        assert_eq!(
            guest_line(&guest),
            "#3 Anna Bianchi [Famiglia della sposa] pending user=u-1"
        );
    }
}
