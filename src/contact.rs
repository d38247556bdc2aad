//! Contact normalization and duplicate detection.
//!
//! Emails and phone numbers are compared in a normalized form: trimmed,
//! lowercased, with whitespace, hyphens and parentheses stripped. An attendee
//! without any contact info never collides.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which contact field a collision was found on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ContactField {
    Email,
    Phone,
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Email => write!(f, "Email"),
            Self::Phone => write!(f, "Phone"),
        }
    }
}

/// Whether the colliding contact was found in the store or earlier in the
/// same submission batch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CollisionScope {
    /// Collides with a registration already persisted for this event.
    Existing,

    /// Collides with an earlier row of the same batch. Carries the 1-based
    /// row of the first occurrence.
    WithinBatch { first_row: usize },
}

/// One detected contact collision, with enough context for a user-facing
/// message naming the offending row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContactCollision {
    /// 1-based row in the submitted attendee list.
    pub row: usize,
    pub name: String,
    pub field: ContactField,
    /// The value as the user entered it, not the normalized form.
    pub value: String,
    pub scope: CollisionScope,
}

impl fmt::Display for ContactCollision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.scope {
            CollisionScope::Existing => write!(
                f,
                "Row {} ({}): {} \"{}\" is already registered for this event.",
                self.row, self.name, self.field, self.value
            ),
            CollisionScope::WithinBatch { first_row } => write!(
                f,
                "Row {} ({}): {} \"{}\" is duplicated. First occurrence at row {}.",
                self.row, self.name, self.field, self.value, first_row
            ),
        }
    }
}

/// An attendee sub-record as submitted through the form or a bulk upload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendeeDetail {
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// Normalizes a contact string for comparison: trim, lowercase, strip
/// whitespace/hyphens/parentheses. Returns [`None`] if nothing is left, so
/// empty contacts are simply skipped by the duplicate checks.
#[must_use]
pub fn normalize_contact(value: &str) -> Option<String> {
    let cleaned: String = value
        .trim()
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace() && !matches!(c, '-' | '(' | ')'))
        .collect();
    (!cleaned.is_empty()).then_some(cleaned)
}

/// The normalized emails and phones of everything already stored for an
/// event: primary contacts and attendee sub-records alike.
#[derive(Debug, Default)]
pub struct KnownContacts {
    emails: std::collections::HashSet<String>,
    phones: std::collections::HashSet<String>,
}

impl KnownContacts {
    pub fn add_email(&mut self, raw: &str) {
        if let Some(email) = normalize_contact(raw) {
            self.emails.insert(email);
        }
    }

    pub fn add_phone(&mut self, raw: &str) {
        if let Some(phone) = normalize_contact(raw) {
            self.phones.insert(phone);
        }
    }

    #[must_use]
    pub fn contains_email(&self, normalized: &str) -> bool {
        self.emails.contains(normalized)
    }

    #[must_use]
    pub fn contains_phone(&self, normalized: &str) -> bool {
        self.phones.contains(normalized)
    }
}

/// Scans a batch of attendee rows against the already-known contacts of an
/// event and against the batch itself.
///
/// First occurrence wins: a value seen before in the batch flags the later
/// row as [`CollisionScope::WithinBatch`], while a value known to the store
/// flags [`CollisionScope::Existing`]. Rows without a contact value are
/// skipped, names are never checked for uniqueness.
#[must_use]
pub fn find_collisions(attendees: &[AttendeeDetail], known: &KnownContacts) -> Vec<ContactCollision> {
    use std::collections::HashMap;

    let mut collisions = Vec::new();
    let mut seen_emails: HashMap<String, usize> = HashMap::new();
    let mut seen_phones: HashMap<String, usize> = HashMap::new();

    for (index, attendee) in attendees.iter().enumerate() {
        let row = index + 1;
        let name = if attendee.name.trim().is_empty() {
            "Unknown".to_string()
        } else {
            attendee.name.trim().to_string()
        };

        if let Some(email) = normalize_contact(&attendee.email) {
            if known.contains_email(&email) {
                collisions.push(ContactCollision {
                    row,
                    name: name.clone(),
                    field: ContactField::Email,
                    value: attendee.email.trim().to_string(),
                    scope: CollisionScope::Existing,
                });
            } else if let Some(&first_row) = seen_emails.get(&email) {
                collisions.push(ContactCollision {
                    row,
                    name: name.clone(),
                    field: ContactField::Email,
                    value: attendee.email.trim().to_string(),
                    scope: CollisionScope::WithinBatch { first_row },
                });
            } else {
                seen_emails.insert(email, row);
            }
        }

        if let Some(phone) = normalize_contact(&attendee.phone) {
            if known.contains_phone(&phone) {
                collisions.push(ContactCollision {
                    row,
                    name,
                    field: ContactField::Phone,
                    value: attendee.phone.trim().to_string(),
                    scope: CollisionScope::Existing,
                });
            } else if let Some(&first_row) = seen_phones.get(&phone) {
                collisions.push(ContactCollision {
                    row,
                    name,
                    field: ContactField::Phone,
                    value: attendee.phone.trim().to_string(),
                    scope: CollisionScope::WithinBatch { first_row },
                });
            } else {
                seen_phones.insert(phone, row);
            }
        }
    }

    collisions
}
