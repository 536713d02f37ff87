//! Unvalidated field values collected from a record source.

use crate::error::AidError;
use crate::field::{KeyStyle, RecordField};

/// Field values gathered from a TXT string or a structured document, before
/// semantic validation.
///
/// Each logical field is stored once under its canonical name, whichever
/// spelling supplied it. Supplying both spellings, or the same key twice, is
/// rejected at insertion time.
///
/// # Examples
///
/// ```
/// use agent_aid::{RawRecord, RecordField};
///
/// let mut raw = RawRecord::new();
/// raw.insert("v", "aid1").unwrap();
/// raw.insert("u", "https://api.example.com/mcp").unwrap();
/// raw.insert("x-extension", "ignored").unwrap();
///
/// assert_eq!(raw.get(RecordField::Uri), Some("https://api.example.com/mcp"));
/// assert!(raw.insert("uri", "https://other.example.com").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRecord {
    slots: [Option<(KeyStyle, String)>; RecordField::ALL.len()],
}

impl RawRecord {
    /// Creates an empty raw record.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a `key=value` pair.
    ///
    /// Keys are matched case-insensitively; unknown keys are ignored.
    ///
    /// # Errors
    ///
    /// Returns `ERR_INVALID_TXT` if the key or value is empty, the value
    /// contains the `;` pair separator, the key was already supplied, or the
    /// other spelling of the same field was already supplied.
    pub fn insert(&mut self, key: &str, value: &str) -> Result<(), AidError> {
        let key = key.trim().to_ascii_lowercase();
        let value = value.trim();
        if key.is_empty() || value.is_empty() {
            return Err(AidError::invalid_txt(format!(
                "Empty key or value in pair: {key}={value}"
            )));
        }

        let Some((field, style)) = RecordField::lookup(&key) else {
            return Ok(());
        };
        if value.contains(';') {
            return Err(AidError::invalid_txt(format!(
                "Invalid character ';' in value for {key}"
            )));
        }

        let slot = &mut self.slots[field.index()];
        match slot {
            Some((existing, _)) if *existing == style => {
                Err(AidError::invalid_txt(format!("Duplicate key: {key}")))
            }
            Some(_) => Err(AidError::invalid_txt(format!(
                "Cannot specify both \"{}\" and \"{}\"",
                field.name(),
                field.alias().unwrap_or(field.name())
            ))),
            None => {
                *slot = Some((style, value.to_string()));
                Ok(())
            }
        }
    }

    /// Returns the value supplied for a field, under either spelling.
    #[must_use]
    pub fn get(&self, field: RecordField) -> Option<&str> {
        self.slots[field.index()]
            .as_ref()
            .map(|(_, value)| value.as_str())
    }

    /// Returns which spelling supplied a field.
    #[must_use]
    pub fn style(&self, field: RecordField) -> Option<KeyStyle> {
        self.slots[field.index()].as_ref().map(|(style, _)| *style)
    }

    /// Returns true if no known field has been supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
