//! Canonical roster names.

/// Which half of a roster name was absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamePart {
    First,
    Last,
}

/// Join given and family name into the canonical full name.
///
/// Each part is trimmed at its ends; internal whitespace and case are kept
/// as-is. An absent or blank part is an error: a row without a name cannot
/// be tracked.
pub fn normalize(first_name: Option<&str>, last_name: Option<&str>) -> Result<String, NamePart> {
    let first = first_name.map(str::trim).filter(|s| !s.is_empty()).ok_or(NamePart::First)?;
    let last = last_name.map(str::trim).filter(|s| !s.is_empty()).ok_or(NamePart::Last)?;
    Ok(format!("{first} {last}"))
}
