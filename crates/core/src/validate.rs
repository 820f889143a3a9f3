use crate::model::{NewGuest, NewInvitationUnit, RowId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    #[error("missing required field: {field}")]
    MissingField { field: String },
    #[error("invalid invitation unit reference: {id}")]
    InvalidUnitReference { id: String },
    #[error("group label exceeds {max} characters")]
    GroupTooLong { max: usize },
}

const MAX_GROUP_LEN: usize = 120;

/// Validate a guest insert payload by composing independent validators.
pub fn validate_guest(guest: &NewGuest) -> Result<(), Vec<ValidationError>> {
    let validators: &[fn(&NewGuest) -> Vec<ValidationError>] = &[
        validate_guest_required_fields,
        validate_unit_reference,
        validate_group,
    ];

    let errors: Vec<ValidationError> = validators.iter().flat_map(|v| v(guest)).collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

pub fn validate_unit(unit: &NewInvitationUnit) -> Result<(), Vec<ValidationError>> {
    if unit.user_id.trim().is_empty() {
        Err(vec![ValidationError::MissingField {
            field: "user_id".to_string(),
        }])
    } else {
        Ok(())
    }
}

fn validate_guest_required_fields(guest: &NewGuest) -> Vec<ValidationError> {
    [
        ("nome_visualizzato", guest.nome_visualizzato.trim().is_empty()),
        ("user_id", guest.user_id.trim().is_empty()),
    ]
    .into_iter()
    .filter(|(_, empty)| *empty)
    .map(|(field, _)| ValidationError::MissingField {
        field: field.to_string(),
    })
    .collect()
}

fn validate_unit_reference(guest: &NewGuest) -> Vec<ValidationError> {
    let valid = match &guest.unita_invito_id {
        RowId::Int(id) => *id > 0,
        RowId::Text(id) => !id.trim().is_empty(),
    };
    if valid {
        vec![]
    } else {
        vec![ValidationError::InvalidUnitReference {
            id: guest.unita_invito_id.to_string(),
        }]
    }
}

fn validate_group(guest: &NewGuest) -> Vec<ValidationError> {
    match &guest.gruppo {
        Some(group) if group.chars().count() > MAX_GROUP_LEN => {
            vec![ValidationError::GroupTooLong { max: MAX_GROUP_LEN }]
        }
        _ => vec![],
    }
}

/// Join validation errors into a single line for reports.
pub fn describe(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
