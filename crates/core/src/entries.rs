//! Memorial entry constants and validation.

use validator::ValidateUrl;

use crate::error::CoreError;
use crate::types::Date;

/// Maximum length of an entry's name.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length of the free-text cause of death and location fields.
pub const MAX_DETAIL_LENGTH: usize = 240;

/// Slug base used when a name slugifies to nothing.
pub const DEFAULT_ENTRY_SLUG: &str = "entry";

/// Fields of a new entry that need validating before insertion.
#[derive(Debug, Clone, Copy)]
pub struct EntryDraft<'a> {
    pub name: &'a str,
    pub birth_date: Date,
    pub death_date: Date,
    pub cause_of_death: Option<&'a str>,
    pub location: Option<&'a str>,
    pub primary_image_url: &'a str,
    pub primary_image_key: &'a str,
}

/// Validate a new entry, reporting the first failing field.
pub fn validate_entry(draft: &EntryDraft<'_>) -> Result<(), CoreError> {
    let name_len = draft.name.trim().chars().count();
    if name_len == 0 {
        return Err(CoreError::Validation("Name is required".into()));
    }
    if name_len > MAX_NAME_LENGTH {
        return Err(CoreError::Validation(format!(
            "Name must be at most {MAX_NAME_LENGTH} characters"
        )));
    }

    if draft.death_date < draft.birth_date {
        return Err(CoreError::Validation(
            "Date of death must be after the date of birth".into(),
        ));
    }

    for (label, value) in [
        ("Cause of death", draft.cause_of_death),
        ("Location", draft.location),
    ] {
        if value.is_some_and(|v| v.chars().count() > MAX_DETAIL_LENGTH) {
            return Err(CoreError::Validation(format!(
                "{label} must be at most {MAX_DETAIL_LENGTH} characters"
            )));
        }
    }

    if !draft.primary_image_url.validate_url() || !is_http_url(draft.primary_image_url) {
        return Err(CoreError::Validation("Profile image is required".into()));
    }
    if draft.primary_image_key.trim().is_empty() {
        return Err(CoreError::Validation("Profile image upload failed".into()));
    }

    Ok(())
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn draft() -> EntryDraft<'static> {
        EntryDraft {
            name: "Jane Doe",
            birth_date: date(1930, 4, 2),
            death_date: date(2011, 9, 17),
            cause_of_death: None,
            location: Some("Lisbon"),
            primary_image_url: "https://files.example.com/f/abc.jpg",
            primary_image_key: "abc",
        }
    }

    #[test]
    fn test_valid_entry_accepted() {
        assert!(validate_entry(&draft()).is_ok());
    }

    #[test]
    fn test_same_day_birth_and_death_accepted() {
        let d = EntryDraft {
            death_date: date(1930, 4, 2),
            ..draft()
        };
        assert!(validate_entry(&d).is_ok());
    }

    #[test]
    fn test_death_before_birth_rejected() {
        let d = EntryDraft {
            death_date: date(1929, 1, 1),
            ..draft()
        };
        let err = validate_entry(&d).unwrap_err();
        assert!(err.to_string().contains("Date of death"));
    }

    #[test]
    fn test_blank_name_rejected() {
        let d = EntryDraft {
            name: "  ",
            ..draft()
        };
        assert!(validate_entry(&d)
            .unwrap_err()
            .to_string()
            .contains("Name is required"));
    }

    #[test]
    fn test_long_location_rejected() {
        let long = "x".repeat(MAX_DETAIL_LENGTH + 1);
        let d = EntryDraft {
            location: Some(&long),
            ..draft()
        };
        assert!(validate_entry(&d).is_err());
    }

    #[test]
    fn test_image_fields_required() {
        let bad_url = EntryDraft {
            primary_image_url: "not a url",
            ..draft()
        };
        assert!(validate_entry(&bad_url).is_err());

        let ftp = EntryDraft {
            primary_image_url: "ftp://files.example.com/a.jpg",
            ..draft()
        };
        assert!(validate_entry(&ftp).is_err());

        let no_key = EntryDraft {
            primary_image_key: "",
            ..draft()
        };
        assert!(validate_entry(&no_key)
            .unwrap_err()
            .to_string()
            .contains("upload failed"));
    }
}
