use {
    super::{
        attendee_upload::{parse_attendee_upload, UploadError},
        contact::{
            find_collisions, normalize_contact, AttendeeDetail, CollisionScope, ContactField,
            KnownContacts,
        },
        sql_interface::{self, NewEvent, NewRegistration, RegisterError, RegistrationType},
    },
    chrono::NaiveDate,
    rusqlite::Connection,
};

/// Creates a fresh empty database with tables defined.
fn init_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    conn.execute_batch(include_str!("init_db.sql")).unwrap();
    conn
}

fn seed_event(conn: &Connection, max_attendees: u32, max_per_org: Option<u32>) -> i64 {
    sql_interface::insert_new_event(
        conn,
        &NewEvent {
            title: "Annual Mentorship Workshop".to_string(),
            date: NaiveDate::from_ymd_opt(2031, 5, 17).unwrap(),
            event_time: Some("10:00".to_string()),
            location: Some("Nairobi".to_string()),
            venue: None,
            description: None,
            contact_name: None,
            contact_email: None,
            contact_phone: None,
            image_url: None,
            registration_link: None,
            featured: false,
            max_attendees,
            max_attendees_per_organization: max_per_org,
        },
    )
    .unwrap()
}

fn individual(event_id: i64, name: &str, email: &str, phone: &str, count: u32) -> NewRegistration {
    NewRegistration {
        event_id,
        registration_type: RegistrationType::Individual,
        name: name.to_string(),
        email: email.to_string(),
        phone: phone.to_string(),
        organization_name: None,
        contact_person: None,
        number_of_attendees: count,
        attendee_details: Vec::new(),
        special_requirements: None,
        dietary_restrictions: None,
        additional_notes: None,
    }
}

fn organization(
    event_id: i64,
    org: &str,
    email: &str,
    phone: &str,
    count: u32,
    attendees: Vec<AttendeeDetail>,
) -> NewRegistration {
    NewRegistration {
        event_id,
        registration_type: RegistrationType::Organization,
        name: String::new(),
        email: email.to_string(),
        phone: phone.to_string(),
        organization_name: Some(org.to_string()),
        contact_person: Some("Jane Smith".to_string()),
        number_of_attendees: count,
        attendee_details: attendees,
        special_requirements: None,
        dietary_restrictions: None,
        additional_notes: None,
    }
}

fn attendee(name: &str, email: &str, phone: &str) -> AttendeeDetail {
    AttendeeDetail {
        name: name.to_string(),
        position: String::new(),
        email: email.to_string(),
        phone: phone.to_string(),
    }
}

fn registration_count(conn: &Connection, event_id: i64) -> usize {
    sql_interface::search_registrations(conn, event_id)
        .unwrap()
        .len()
}

#[test]
fn normalization_equates_emails() {
    assert_eq!(
        normalize_contact("John.Doe@Example.com "),
        normalize_contact("john.doe@example.com")
    );
    assert_eq!(normalize_contact(""), None);
    assert_eq!(normalize_contact("   "), None);
}

#[test]
fn normalization_equates_phones() {
    assert_eq!(
        normalize_contact("+254 712-345 (678)"),
        normalize_contact("+254712345678")
    );
    assert_eq!(
        normalize_contact("+254 712-345 (678)").unwrap(),
        "+254712345678"
    );
}

#[test]
fn batch_duplicate_is_flagged_as_within_batch() {
    let attendees = [
        attendee("Alice Beta", "alice@example.com", ""),
        attendee("Bob Echo", "ALICE@example.com", ""),
    ];

    let collisions = find_collisions(&attendees, &KnownContacts::default());
    assert_eq!(collisions.len(), 1);
    let collision = &collisions[0];
    assert_eq!(collision.row, 2);
    assert_eq!(collision.field, ContactField::Email);
    assert_eq!(collision.scope, CollisionScope::WithinBatch { first_row: 1 });
}

#[test]
fn stored_contact_wins_over_batch_flagging() {
    let mut known = KnownContacts::default();
    known.add_email("alice@example.com");

    let attendees = [
        attendee("Alice Beta", "alice@example.com", ""),
        attendee("Bob Echo", "alice@example.com", ""),
    ];

    let collisions = find_collisions(&attendees, &known);
    // both rows hit the stored contact, neither is a batch duplicate
    assert_eq!(collisions.len(), 2);
    assert!(collisions
        .iter()
        .all(|c| c.scope == CollisionScope::Existing));
}

#[test]
fn attendees_without_contact_info_never_collide() {
    let attendees = [
        attendee("Alice Beta", "", ""),
        attendee("Alice Beta", "", ""),
        attendee("Bob Echo", "", ""),
    ];

    assert!(find_collisions(&attendees, &KnownContacts::default()).is_empty());
}

#[test]
fn unlimited_capacity_stays_unbounded() {
    let mut conn = init_db();
    let event = seed_event(&conn, 0, None);

    sql_interface::apply_registration(
        &mut conn,
        &individual(event, "Alice Beta", "alice@example.com", "+254700000001", 250),
    )
    .unwrap();

    let capacity = sql_interface::event_capacity(&conn, event).unwrap();
    assert_eq!(capacity.total, 0);
    assert_eq!(capacity.registered, 250);
    assert_eq!(capacity.remaining, None);
    assert!(capacity.admits(1_000_000));
}

#[test]
fn remaining_is_max_minus_registered() {
    let mut conn = init_db();
    let event = seed_event(&conn, 10, None);

    sql_interface::apply_registration(
        &mut conn,
        &individual(event, "Alice Beta", "alice@example.com", "+254700000001", 3),
    )
    .unwrap();
    sql_interface::apply_registration(
        &mut conn,
        &individual(event, "Bob Echo", "bob@example.com", "+254700000002", 5),
    )
    .unwrap();

    let capacity = sql_interface::event_capacity(&conn, event).unwrap();
    assert_eq!(capacity.total, 10);
    assert_eq!(capacity.registered, 8);
    assert_eq!(capacity.remaining, Some(2));
    assert!(!capacity.is_full());
}

#[test]
fn overfull_event_reports_zero_remaining() {
    let mut conn = init_db();
    // cap was lowered after the fact, the sum may exceed it
    let event = seed_event(&conn, 10, None);
    sql_interface::apply_registration(
        &mut conn,
        &individual(event, "Alice Beta", "alice@example.com", "+254700000001", 10),
    )
    .unwrap();
    sql_interface::update_event(
        &conn,
        &sql_interface::UpdateEvent {
            max_attendees: 5,
            ..update_from_event(&sql_interface::get_event(&conn, event).unwrap().unwrap())
        },
    )
    .unwrap();

    let capacity = sql_interface::event_capacity(&conn, event).unwrap();
    assert_eq!(capacity.remaining, Some(0));
    assert!(capacity.is_full());
}

fn update_from_event(event: &sql_interface::Event) -> sql_interface::UpdateEvent {
    sql_interface::UpdateEvent {
        id: event.id,
        title: event.title.clone(),
        date: event.date,
        event_time: event.event_time.clone(),
        location: event.location.clone(),
        venue: event.venue.clone(),
        description: event.description.clone(),
        contact_name: event.contact_name.clone(),
        contact_email: event.contact_email.clone(),
        contact_phone: event.contact_phone.clone(),
        image_url: event.image_url.clone(),
        registration_link: event.registration_link.clone(),
        featured: event.featured,
        max_attendees: event.max_attendees,
        max_attendees_per_organization: event.max_attendees_per_organization,
    }
}

#[test]
fn capacity_overflow_aborts_before_insert() {
    let mut conn = init_db();
    let event = seed_event(&conn, 10, None);

    sql_interface::apply_registration(
        &mut conn,
        &individual(event, "Alice Beta", "alice@example.com", "+254700000001", 8),
    )
    .unwrap();
    assert_eq!(registration_count(&conn, event), 1);

    let err = sql_interface::apply_registration(
        &mut conn,
        &individual(event, "Bob Echo", "bob@example.com", "+254700000002", 3),
    )
    .unwrap_err();

    match err {
        RegisterError::CapacityExceeded {
            remaining,
            requested,
        } => {
            assert_eq!(remaining, 2);
            assert_eq!(requested, 3);
        }
        other => panic!("expected CapacityExceeded, got {other:?}"),
    }
    // the rejection message cites the exact number of free slots
    assert!(err.to_string().contains("Only 2 slot(s) available"));

    // nothing was written
    assert_eq!(registration_count(&conn, event), 1);
    let capacity = sql_interface::event_capacity(&conn, event).unwrap();
    assert_eq!(capacity.registered, 8);
}

#[test]
fn full_event_rejects_with_full_message() {
    let mut conn = init_db();
    let event = seed_event(&conn, 2, None);

    sql_interface::apply_registration(
        &mut conn,
        &individual(event, "Alice Beta", "alice@example.com", "+254700000001", 2),
    )
    .unwrap();

    let err = sql_interface::apply_registration(
        &mut conn,
        &individual(event, "Bob Echo", "bob@example.com", "+254700000002", 1),
    )
    .unwrap_err();
    assert!(err.to_string().contains("this event is full"));
}

#[test]
fn organization_cap_is_enforced() {
    let mut conn = init_db();
    let event = seed_event(&conn, 0, Some(5));

    let err = sql_interface::apply_registration(
        &mut conn,
        &organization(
            event,
            "Tumaini CBO",
            "info@tumaini.example",
            "+254700000003",
            6,
            Vec::new(),
        ),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RegisterError::OrganizationCapExceeded { cap: 5 }
    ));
    assert_eq!(registration_count(&conn, event), 0);
}

#[test]
fn duplicate_primary_email_is_rejected() {
    let mut conn = init_db();
    let event = seed_event(&conn, 0, None);

    sql_interface::apply_registration(
        &mut conn,
        &individual(event, "Alice Beta", "Alice@Example.com", "+254700000001", 1),
    )
    .unwrap();

    let err = sql_interface::apply_registration(
        &mut conn,
        &individual(
            event,
            "Someone Else",
            " alice@example.com ",
            "+254700000002",
            1,
        ),
    )
    .unwrap_err();
    match err {
        RegisterError::ContactTaken { field, .. } => assert_eq!(field, ContactField::Email),
        other => panic!("expected ContactTaken, got {other:?}"),
    }
    assert_eq!(registration_count(&conn, event), 1);
}

#[test]
fn duplicate_phone_is_detected_across_formatting() {
    let mut conn = init_db();
    let event = seed_event(&conn, 0, None);

    sql_interface::apply_registration(
        &mut conn,
        &individual(event, "Alice Beta", "alice@example.com", "+254712345678", 1),
    )
    .unwrap();

    let err = sql_interface::apply_registration(
        &mut conn,
        &individual(
            event,
            "Bob Echo",
            "bob@example.com",
            "+254 712-345 (678)",
            1,
        ),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RegisterError::ContactTaken {
            field: ContactField::Phone,
            ..
        }
    ));
}

#[test]
fn same_contact_on_another_event_is_fine() {
    let mut conn = init_db();
    let first = seed_event(&conn, 0, None);
    let second = seed_event(&conn, 0, None);

    sql_interface::apply_registration(
        &mut conn,
        &individual(first, "Alice Beta", "alice@example.com", "+254700000001", 1),
    )
    .unwrap();
    sql_interface::apply_registration(
        &mut conn,
        &individual(second, "Alice Beta", "alice@example.com", "+254700000001", 1),
    )
    .unwrap();

    assert_eq!(registration_count(&conn, first), 1);
    assert_eq!(registration_count(&conn, second), 1);
}

#[test]
fn stored_attendee_contact_blocks_new_registrant() {
    let mut conn = init_db();
    let event = seed_event(&conn, 0, None);

    sql_interface::apply_registration(
        &mut conn,
        &organization(
            event,
            "Tumaini CBO",
            "info@tumaini.example",
            "+254700000003",
            2,
            vec![
                attendee("Carol Delta", "carol@example.com", "+254700000004"),
                attendee("Dave Foxtrot", "", ""),
            ],
        ),
    )
    .unwrap();

    // the attendee's email is just as reserved as the primary contact's
    let err = sql_interface::apply_registration(
        &mut conn,
        &individual(event, "Carol Delta", "carol@example.com", "+254700000005", 1),
    )
    .unwrap_err();
    assert!(matches!(
        err,
        RegisterError::ContactTaken {
            field: ContactField::Email,
            ..
        }
    ));
}

#[test]
fn batch_collision_aborts_whole_registration() {
    let mut conn = init_db();
    let event = seed_event(&conn, 0, None);

    let err = sql_interface::apply_registration(
        &mut conn,
        &organization(
            event,
            "Tumaini CBO",
            "info@tumaini.example",
            "+254700000003",
            2,
            vec![
                attendee("Carol Delta", "carol@example.com", ""),
                attendee("Dave Foxtrot", "Carol@Example.com", ""),
            ],
        ),
    )
    .unwrap_err();

    match err {
        RegisterError::AttendeeCollisions(collisions) => {
            assert_eq!(collisions.len(), 1);
            assert_eq!(collisions[0].row, 2);
            assert_eq!(
                collisions[0].scope,
                CollisionScope::WithinBatch { first_row: 1 }
            );
        }
        other => panic!("expected AttendeeCollisions, got {other:?}"),
    }
    assert_eq!(registration_count(&conn, event), 0);
}

#[test]
fn organization_with_missing_detail_rows_still_persists() {
    let mut conn = init_db();
    let event = seed_event(&conn, 0, None);

    // two attendees announced, only one named; accepted with a warning, see
    // DESIGN.md
    sql_interface::apply_registration(
        &mut conn,
        &organization(
            event,
            "Tumaini CBO",
            "info@tumaini.example",
            "+254700000003",
            2,
            vec![attendee("Carol Delta", "carol@example.com", "")],
        ),
    )
    .unwrap();

    let registrations = sql_interface::search_registrations(&conn, event).unwrap();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].number_of_attendees, 2);
    assert_eq!(registrations[0].attendee_details.len(), 1);
}

#[test]
fn zero_attendees_is_rejected() {
    let mut conn = init_db();
    let event = seed_event(&conn, 0, None);

    let err = sql_interface::apply_registration(
        &mut conn,
        &individual(event, "Alice Beta", "alice@example.com", "+254700000001", 0),
    )
    .unwrap_err();
    assert!(matches!(err, RegisterError::NoAttendees));
}

#[test]
fn unknown_event_is_rejected() {
    let mut conn = init_db();

    let err = sql_interface::apply_registration(
        &mut conn,
        &individual(4711, "Alice Beta", "alice@example.com", "+254700000001", 1),
    )
    .unwrap_err();
    assert!(matches!(err, RegisterError::UnknownEvent));
}

#[test]
fn upload_parses_rows_and_skips_unnamed() {
    let text = "Name,Position,Email,Phone\n\
        John Doe,Manager,john@example.com,+254712345678\n\
        ,,missing@example.com,\n\
        \"Jane Smith\",Coordinator,jane@example.com,+254712345679\n";

    let attendees = parse_attendee_upload(text, 50).unwrap();
    assert_eq!(attendees.len(), 2);
    assert_eq!(attendees[0].name, "John Doe");
    assert_eq!(attendees[0].position, "Manager");
    assert_eq!(attendees[1].name, "Jane Smith");
    assert_eq!(attendees[1].phone, "+254712345679");
}

#[test]
fn upload_headers_match_by_substring() {
    let text = "Participant Name,Role,E-Mail Address,Telephone\n\
        John Doe,Manager,john@example.com,+254712345678\n";

    let attendees = parse_attendee_upload(text, 50).unwrap();
    assert_eq!(attendees[0].position, "Manager");
    assert_eq!(attendees[0].email, "john@example.com");
    assert_eq!(attendees[0].phone, "+254712345678");
}

#[test]
fn upload_without_name_column_is_an_error() {
    let text = "Position,Email,Phone\nManager,john@example.com,+254712345678\n";
    assert_eq!(
        parse_attendee_upload(text, 50),
        Err(UploadError::MissingNameColumn)
    );
}

#[test]
fn upload_row_limit_is_enforced() {
    let mut text = "Name,Email\n".to_string();
    for i in 0..4 {
        text.push_str(&format!("Person {i},person{i}@example.com\n"));
    }
    assert_eq!(
        parse_attendee_upload(&text, 3),
        Err(UploadError::TooManyRows { found: 4, limit: 3 })
    );
}

#[test]
fn empty_upload_is_an_error() {
    assert_eq!(parse_attendee_upload("", 50), Err(UploadError::Empty));
    assert_eq!(
        parse_attendee_upload("Name,Email\n", 50),
        Err(UploadError::Empty)
    );
}
