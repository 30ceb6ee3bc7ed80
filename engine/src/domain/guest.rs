//! Guest aggregate: referenced by bookings, never owned by an apartment.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable guest identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestId(Uuid);

impl GuestId {
    /// Wrap an existing UUID.
    pub const fn new(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for GuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation errors raised for guest records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuestValidationError {
    /// First or last name is empty after trimming.
    EmptyName,
    /// Email address is structurally invalid.
    InvalidEmail,
}

impl fmt::Display for GuestValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "guest first and last name must not be empty"),
            Self::InvalidEmail => write!(f, "guest email address is not valid"),
        }
    }
}

impl std::error::Error for GuestValidationError {}

/// A structurally validated, lowercase-normalised email address.
///
/// Uniqueness across guests is a hard invariant enforced by the guest
/// repository; normalising case here keeps that check consistent.
///
/// # Examples
/// ```
/// use engine::domain::EmailAddress;
///
/// let email = EmailAddress::new("John.Doe@Example.com").expect("valid email");
/// assert_eq!(email.as_str(), "john.doe@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Validate and normalise an email address.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, GuestValidationError> {
        let trimmed = raw.as_ref().trim();
        let Some((local, domain)) = trimmed.split_once('@') else {
            return Err(GuestValidationError::InvalidEmail);
        };
        if local.is_empty()
            || domain.is_empty()
            || !domain.contains('.')
            || domain.starts_with('.')
            || domain.ends_with('.')
            || trimmed.chars().any(char::is_whitespace)
        {
            return Err(GuestValidationError::InvalidEmail);
        }
        Ok(Self(trimmed.to_lowercase()))
    }

    /// Borrow the normalised address.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for EmailAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for EmailAddress {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for EmailAddress {
    type Error = GuestValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<EmailAddress> for String {
    fn from(value: EmailAddress) -> Self {
        value.0
    }
}

/// Input shape for creating a guest, either directly by an administrator
/// or implicitly on a guest's first booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestDraft {
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email; unique across all guests.
    pub email: EmailAddress,
    /// Contact phone number.
    pub phone: String,
    /// Free-form administrator notes.
    pub notes: Option<String>,
}

/// A guest record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Guest {
    /// Stable identity.
    pub id: GuestId,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Contact email; unique across all guests.
    pub email: EmailAddress,
    /// Contact phone number.
    pub phone: String,
    /// Free-form administrator notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Guest {
    /// Validate a draft and mint a new guest with a random id.
    pub fn new(draft: GuestDraft) -> Result<Self, GuestValidationError> {
        let guest = Self {
            id: GuestId::random(),
            first_name: draft.first_name,
            last_name: draft.last_name,
            email: draft.email,
            phone: draft.phone,
            notes: draft.notes,
            created_at: Utc::now(),
        };
        guest.validate()?;
        Ok(guest)
    }

    /// Check record-level invariants; also invoked by persistence adapters
    /// before writes.
    pub fn validate(&self) -> Result<(), GuestValidationError> {
        if self.first_name.trim().is_empty() || self.last_name.trim().is_empty() {
            return Err(GuestValidationError::EmptyName);
        }
        Ok(())
    }

    /// Display name combining given and family name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}
