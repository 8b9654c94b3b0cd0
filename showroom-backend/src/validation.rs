//! Field checks shared by the record layer

use showroom_shared::fields::{lookup, FieldHelp};
use showroom_shared::ShowroomError;

/// Category slug reserved for the contact page.
pub const RESERVED_URL_NAME: &str = "contact";

/// Enforces the max length recorded for `name` in `fields`, counted in characters.
pub(crate) fn check_length(
    fields: &'static [FieldHelp],
    name: &str,
    value: &str,
) -> Result<(), ShowroomError> {
    let Some(max_length) = lookup(fields, name).and_then(|field| field.max_length) else {
        return Ok(());
    };
    let length = value.chars().count();
    if length > max_length {
        return Err(ShowroomError::ValidationError(format!(
            "{name} is {length} characters long, at most {max_length} allowed"
        )));
    }
    Ok(())
}

pub(crate) fn check_required(name: &str, value: &str) -> Result<(), ShowroomError> {
    match value.trim().is_empty() {
        true => Err(ShowroomError::ValidationError(format!("{name} is required"))),
        false => Ok(()),
    }
}

/// Two lowercase ASCII letters, e.g. `de`.
pub(crate) fn check_country(value: &str) -> Result<(), ShowroomError> {
    if value.len() == 2 && value.bytes().all(|b| b.is_ascii_lowercase()) {
        return Ok(());
    }
    Err(ShowroomError::ValidationError(format!(
        "country {value:?} is not a 2-letter lowercase country code"
    )))
}

/// HTML color code in `#rrggbb` form.
pub(crate) fn check_color(name: &str, value: &str) -> Result<(), ShowroomError> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].bytes().all(|b| b.is_ascii_hexdigit());
    match valid {
        true => Ok(()),
        false => Err(ShowroomError::ValidationError(format!(
            "{name} {value:?} is not a color of the form #rrggbb"
        ))),
    }
}

/// Slug characters only, and not the reserved contact page.
pub(crate) fn check_url_name(value: &str) -> Result<(), ShowroomError> {
    check_required("url_name", value)?;
    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ShowroomError::ValidationError(format!(
            "url_name {value:?} may only contain letters, numbers, hyphens and underscores"
        )));
    }
    if value == RESERVED_URL_NAME {
        return Err(ShowroomError::ValidationError(format!(
            "url_name {RESERVED_URL_NAME:?} is reserved"
        )));
    }
    Ok(())
}
