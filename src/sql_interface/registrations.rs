//! The registration workflow: capacity checking, duplicate-contact checking,
//! and the transactional insert.
//!
//! Both invariants (attendee sum vs. capacity, contact uniqueness per event)
//! are enforced inside the store. [`apply_registration`] re-reads the
//! registered sum within an IMMEDIATE transaction and the
//! `registration_contact` unique index backs the duplicate pre-check, so two
//! racing submissions cannot jointly overshoot capacity or register the same
//! contact twice.

use std::fmt;
use std::str::FromStr;

use rusqlite::{named_params, TransactionBehavior};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::events;
use crate::contact::{
    find_collisions, normalize_contact, AttendeeDetail, ContactCollision, ContactField,
    KnownContacts,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RegistrationType {
    Individual,
    Organization,
}

impl RegistrationType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "individual",
            Self::Organization => "organization",
        }
    }
}

impl fmt::Display for RegistrationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RegistrationType {
    type Err = UnknownRegistrationType;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        match source {
            "individual" => Ok(Self::Individual),
            "organization" => Ok(Self::Organization),
            _ => Err(UnknownRegistrationType),
        }
    }
}

#[derive(Debug, Error)]
#[error("Registration type must be \"individual\" or \"organization\"")]
pub struct UnknownRegistrationType;

/// One signup for an event, as stored.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub id: i64,
    pub event_id: i64,
    pub registration_type: RegistrationType,
    pub registrant_name: Option<String>,
    pub registrant_email: Option<String>,
    pub registrant_phone: Option<String>,
    pub organization_name: Option<String>,
    pub contact_person: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub number_of_attendees: u32,
    pub attendee_details: Vec<AttendeeDetail>,
    pub special_requirements: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub additional_notes: Option<String>,
    pub created_at: chrono::NaiveDateTime,
}

impl Registration {
    /// The displayed contact name: the registrant for individuals, the
    /// contact person for organizations.
    #[must_use]
    pub fn display_name(&self) -> &str {
        let name = match self.registration_type {
            RegistrationType::Individual => &self.registrant_name,
            RegistrationType::Organization => &self.contact_person,
        };
        name.as_deref().unwrap_or("N/A")
    }

    #[must_use]
    pub fn primary_email(&self) -> Option<&str> {
        match self.registration_type {
            RegistrationType::Individual => self.registrant_email.as_deref(),
            RegistrationType::Organization => self.contact_email.as_deref(),
        }
    }

    #[must_use]
    pub fn primary_phone(&self) -> Option<&str> {
        match self.registration_type {
            RegistrationType::Individual => self.registrant_phone.as_deref(),
            RegistrationType::Organization => self.contact_phone.as_deref(),
        }
    }
}

/// Parameters for one registration attempt.
#[derive(Clone, Debug)]
pub struct NewRegistration {
    pub event_id: i64,
    pub registration_type: RegistrationType,
    pub name: String,
    pub email: String,
    pub phone: String,

    /// Only meaningful for organization registrations.
    pub organization_name: Option<String>,
    pub contact_person: Option<String>,

    pub number_of_attendees: u32,
    pub attendee_details: Vec<AttendeeDetail>,
    pub special_requirements: Option<String>,
    pub dietary_restrictions: Option<String>,
    pub additional_notes: Option<String>,
}

/// Capacity summary for an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EventCapacity {
    /// Configured maximum, 0 meaning unlimited.
    pub total: u32,

    /// Sum of `number_of_attendees` over all registrations.
    pub registered: u32,

    /// Slots left, [`None`] if the event is unbounded.
    pub remaining: Option<u32>,
}

impl EventCapacity {
    fn compute(max_attendees: u32, registered: u32) -> Self {
        Self {
            total: max_attendees,
            registered,
            remaining: (max_attendees > 0).then(|| max_attendees.saturating_sub(registered)),
        }
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.remaining == Some(0)
    }

    /// Whether `requested` additional attendees still fit.
    #[must_use]
    pub fn admits(&self, requested: u32) -> bool {
        self.remaining.map_or(true, |remaining| requested <= remaining)
    }
}

fn collisions_message(collisions: &[ContactCollision]) -> String {
    collisions
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capacity_message(remaining: &u32) -> String {
    match *remaining {
        0 => "Sorry, this event is full. No slots available.".to_string(),
        remaining => {
            format!("Only {remaining} slot(s) available. Please reduce the number of attendees.")
        }
    }
}

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("Database or query error: {0}")]
    RusqliteError(#[from] rusqlite::Error),
    #[error("Malformed attendee details in database: {0}")]
    MalformedDetails(#[from] serde_json::Error),
    #[error("Unknown event")]
    UnknownEvent,
    #[error("Please register at least one attendee.")]
    NoAttendees,
    #[error("{}", capacity_message(.remaining))]
    CapacityExceeded { remaining: u32, requested: u32 },
    #[error("Maximum {cap} attendees allowed per organization.")]
    OrganizationCapExceeded { cap: u32 },
    #[error("{field} \"{value}\" is already registered for this event.")]
    ContactTaken { field: ContactField, value: String },
    #[error("Duplicate contact information in attendee list: {}", collisions_message(.0))]
    AttendeeCollisions(Vec<ContactCollision>),
}

/// Computes the capacity summary of an event by summing its registrations.
///
/// Transport and query failures propagate as errors instead of being folded
/// into a zeroed "event full" result, so callers can tell an unreachable
/// store from an exhausted event.
pub fn event_capacity(
    conn: &rusqlite::Connection,
    event_id: i64,
) -> Result<EventCapacity, RegisterError> {
    let event = events::get_event(conn, event_id)?.ok_or(RegisterError::UnknownEvent)?;
    let registered = registered_attendee_sum(conn, event_id)?;
    Ok(EventCapacity::compute(event.max_attendees, registered))
}

fn registered_attendee_sum(conn: &rusqlite::Connection, event_id: i64) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(SUM(number_of_attendees), 0)
        FROM registration
        WHERE event_id == :event_id",
        named_params! { ":event_id": event_id },
        |row| row.get(0),
    )
}

/// Collects the normalized contacts of everything stored for an event,
/// primary contacts and attendee sub-records alike.
fn known_contacts(
    conn: &rusqlite::Connection,
    event_id: i64,
) -> Result<KnownContacts, RegisterError> {
    let mut statement = conn.prepare(
        "SELECT registrant_email, registrant_phone, contact_email, contact_phone, attendee_details
        FROM registration
        WHERE event_id == :event_id",
    )?;
    let mut rows = statement.query(named_params! { ":event_id": event_id })?;

    let mut known = KnownContacts::default();
    while let Some(row) = rows.next()? {
        for index in [0, 2] {
            if let Some(email) = row.get::<_, Option<String>>(index)? {
                known.add_email(&email);
            }
        }
        for index in [1, 3] {
            if let Some(phone) = row.get::<_, Option<String>>(index)? {
                known.add_phone(&phone);
            }
        }
        let details: Vec<AttendeeDetail> = serde_json::from_str(&row.get::<_, String>(4)?)?;
        for attendee in details {
            known.add_email(&attendee.email);
            known.add_phone(&attendee.phone);
        }
    }
    Ok(known)
}

/// Validates and persists one registration.
///
/// Runs the whole `capacity check → duplicate check → insert` sequence inside
/// one IMMEDIATE transaction and returns the new registration ID. On any
/// failure nothing is written. The per-organization attendee cap is checked
/// when the event configures one.
///
/// An organization registration naming fewer attendee-detail rows than
/// `number_of_attendees` is accepted with a logged warning; see DESIGN.md for
/// the product decision behind that.
pub fn apply_registration(
    conn: &mut rusqlite::Connection,
    new: &NewRegistration,
) -> Result<i64, RegisterError> {
    if new.number_of_attendees == 0 {
        return Err(RegisterError::NoAttendees);
    }

    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let event = events::get_event(&tx, new.event_id)?.ok_or(RegisterError::UnknownEvent)?;
    let capacity =
        EventCapacity::compute(event.max_attendees, registered_attendee_sum(&tx, event.id)?);
    if !capacity.admits(new.number_of_attendees) {
        return Err(RegisterError::CapacityExceeded {
            // only reachable with a configured maximum
            remaining: capacity.remaining.unwrap_or(0),
            requested: new.number_of_attendees,
        });
    }

    if new.registration_type == RegistrationType::Organization {
        if let Some(cap) = event.max_attendees_per_organization {
            if new.number_of_attendees > cap {
                return Err(RegisterError::OrganizationCapExceeded { cap });
            }
        }

        let named_rows = new
            .attendee_details
            .iter()
            .filter(|attendee| !attendee.name.trim().is_empty())
            .count();
        if named_rows < new.number_of_attendees as usize {
            log::warn!(
                "Organization registration for event {} names {} of {} attendees",
                event.id,
                named_rows,
                new.number_of_attendees
            );
        }
    }

    let known = known_contacts(&tx, event.id)?;
    if let Some(email) = normalize_contact(&new.email) {
        if known.contains_email(&email) {
            return Err(RegisterError::ContactTaken {
                field: ContactField::Email,
                value: new.email.trim().to_string(),
            });
        }
    }
    if let Some(phone) = normalize_contact(&new.phone) {
        if known.contains_phone(&phone) {
            return Err(RegisterError::ContactTaken {
                field: ContactField::Phone,
                value: new.phone.trim().to_string(),
            });
        }
    }
    let collisions = find_collisions(&new.attendee_details, &known);
    if !collisions.is_empty() {
        return Err(RegisterError::AttendeeCollisions(collisions));
    }

    let is_organization = new.registration_type == RegistrationType::Organization;
    let stored_details: &[AttendeeDetail] = if is_organization {
        &new.attendee_details
    } else {
        &[]
    };
    tx.execute(
        "INSERT INTO registration (event_id, registration_type, registrant_name,
            registrant_email, registrant_phone, organization_name, contact_person,
            contact_email, contact_phone, number_of_attendees, attendee_details,
            special_requirements, dietary_restrictions, additional_notes)
        VALUES (:event_id, :type, :registrant_name, :registrant_email, :registrant_phone,
            :organization_name, :contact_person, :contact_email, :contact_phone,
            :number_of_attendees, :attendee_details, :special_requirements,
            :dietary_restrictions, :additional_notes)",
        named_params! {
            ":event_id": event.id,
            ":type": new.registration_type.as_str(),
            ":registrant_name": (!is_organization).then(|| new.name.trim()),
            ":registrant_email": (!is_organization).then(|| new.email.trim()),
            ":registrant_phone": (!is_organization).then(|| new.phone.trim()),
            ":organization_name": is_organization
                .then(|| new.organization_name.as_deref())
                .flatten(),
            ":contact_person": is_organization
                .then(|| new.contact_person.as_deref())
                .flatten(),
            ":contact_email": is_organization.then(|| new.email.trim()),
            ":contact_phone": is_organization.then(|| new.phone.trim()),
            ":number_of_attendees": new.number_of_attendees,
            ":attendee_details": serde_json::to_string(stored_details)?,
            ":special_requirements": new.special_requirements,
            ":dietary_restrictions": new.dietary_restrictions,
            ":additional_notes": new.additional_notes,
        },
    )?;
    let registration_id = tx.last_insert_rowid();

    // Backstop for the pre-check above. The unique index turns any contact
    // that slipped through into a constraint violation. Deduplicated so a
    // primary contact repeated as an attendee row reserves only one slot.
    let mut contacts: Vec<(ContactField, String)> = Vec::new();
    let mut push = |contacts: &mut Vec<(ContactField, String)>, field, raw: &str| {
        if let Some(value) = normalize_contact(raw) {
            if !contacts.iter().any(|(f, v)| *f == field && *v == value) {
                contacts.push((field, value));
            }
        }
    };
    push(&mut contacts, ContactField::Email, &new.email);
    push(&mut contacts, ContactField::Phone, &new.phone);
    if is_organization {
        for attendee in &new.attendee_details {
            push(&mut contacts, ContactField::Email, &attendee.email);
            push(&mut contacts, ContactField::Phone, &attendee.phone);
        }
    }
    for (field, value) in contacts {
        super::match_constraint_violation!(
            tx.execute(
                "INSERT INTO registration_contact (registration_id, event_id, field, value)
                VALUES (:registration_id, :event_id, :field, :value)",
                named_params! {
                    ":registration_id": registration_id,
                    ":event_id": event.id,
                    ":field": match field {
                        ContactField::Email => "email",
                        ContactField::Phone => "phone",
                    },
                    ":value": value,
                },
            ),
            RegisterError::ContactTaken {
                field,
                value: value.clone()
            }
        )?;
    }

    tx.commit()?;
    Ok(registration_id)
}

// Note: Only usable in context here, since the columns are hardcoded
#[doc(hidden)]
fn row_to_registration(row: &rusqlite::Row) -> rusqlite::Result<Registration> {
    let registration_type: String = row.get(2)?;
    let attendee_details: String = row.get(11)?;
    Ok(Registration {
        id: row.get(0)?,
        event_id: row.get(1)?,
        registration_type: registration_type
            .parse()
            .expect("Invalid registration type in database!"),
        registrant_name: row.get(3)?,
        registrant_email: row.get(4)?,
        registrant_phone: row.get(5)?,
        organization_name: row.get(6)?,
        contact_person: row.get(7)?,
        contact_email: row.get(8)?,
        contact_phone: row.get(9)?,
        number_of_attendees: row.get(10)?,
        attendee_details: serde_json::from_str(&attendee_details)
            .expect("Malformed attendee details in database!"),
        special_requirements: row.get(12)?,
        dietary_restrictions: row.get(13)?,
        additional_notes: row.get(14)?,
        created_at: row.get(15)?,
    })
}

/// Lists all registrations of an event, newest first.
pub fn search_registrations(
    conn: &rusqlite::Connection,
    event_id: i64,
) -> rusqlite::Result<Vec<Registration>> {
    let mut statement = conn.prepare(
        "SELECT registration_id, event_id, registration_type, registrant_name, registrant_email,
            registrant_phone, organization_name, contact_person, contact_email, contact_phone,
            number_of_attendees, attendee_details, special_requirements, dietary_restrictions,
            additional_notes, created_at
        FROM registration
        WHERE event_id == :event_id
        ORDER BY created_at DESC, registration_id DESC",
    )?;
    let rows = statement.query(named_params! { ":event_id": event_id })?;
    rows.mapped(row_to_registration).collect()
}

/// Deletes a registration by ID together with its contact rows.
/// **This action is irreversible.**
pub fn delete_registration(conn: &rusqlite::Connection, id: i64) -> rusqlite::Result<()> {
    conn.execute(
        "DELETE FROM registration
        WHERE registration_id == :id",
        named_params! {
            ":id": id,
        },
    )?;
    Ok(())
}
