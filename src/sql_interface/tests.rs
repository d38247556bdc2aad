use {
    super::{
        self as sql_interface, EventFilter, NewArticle, NewEvent, NewMessage, NewPhoto, NewQuote,
        NewStory, NewTestimonial, NewVideo, QuoteValidationError, ReviewNewsError,
        ReviewStoryError, UpdateTestimonial,
    },
    crate::sql_interface::stories::InsertTestimonialError,
    chrono::NaiveDate,
    rusqlite::{types::Value, Connection},
};

/// Creates a fresh empty database with tables defined.
fn init_db() -> Connection {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch("PRAGMA foreign_keys = ON;").unwrap();
    conn.execute_batch(include_str!("../init_db.sql")).unwrap();
    conn
}

fn sample_event(title: &str, date: NaiveDate) -> NewEvent {
    NewEvent {
        title: title.to_string(),
        date,
        event_time: None,
        location: None,
        venue: None,
        description: None,
        contact_name: None,
        contact_email: None,
        contact_phone: None,
        image_url: None,
        registration_link: None,
        featured: false,
        max_attendees: 0,
        max_attendees_per_organization: None,
    }
}

#[test]
fn events() {
    let conn = init_db();

    let past = NaiveDate::from_ymd_opt(2009, 1, 16).unwrap();
    let future = NaiveDate::from_ymd_opt(2031, 5, 17).unwrap();
    sql_interface::insert_new_event(&conn, &sample_event("Harambee Dinner", past)).unwrap();
    let id =
        sql_interface::insert_new_event(&conn, &sample_event("Mentorship Workshop", future))
            .unwrap();

    let event = sql_interface::get_event(&conn, id).unwrap().unwrap();
    assert_eq!(event.title, "Mentorship Workshop");
    assert_eq!(event.date, future);
    assert_eq!(event.max_attendees, 0);

    let upcoming = sql_interface::list_events(&conn, &EventFilter::OnlyUpcoming).unwrap();
    assert_eq!(upcoming.len(), 1);
    assert_eq!(upcoming[0].title, "Mentorship Workshop");

    let past_events = sql_interface::list_events(&conn, &EventFilter::OnlyPast).unwrap();
    assert_eq!(past_events.len(), 1);
    assert_eq!(past_events[0].title, "Harambee Dinner");

    let all = sql_interface::list_events(&conn, &EventFilter::ListAll).unwrap();
    assert_eq!(all.len(), 2);

    let mut update = super::events::UpdateEvent {
        id: event.id,
        title: "Mentorship Workshop 2031".to_string(),
        date: event.date,
        event_time: event.event_time,
        location: event.location,
        venue: event.venue,
        description: event.description,
        contact_name: event.contact_name,
        contact_email: event.contact_email,
        contact_phone: event.contact_phone,
        image_url: event.image_url,
        registration_link: event.registration_link,
        featured: true,
        max_attendees: 50,
        max_attendees_per_organization: Some(10),
    };
    sql_interface::update_event(&conn, &update).unwrap();
    let event = sql_interface::get_event(&conn, id).unwrap().unwrap();
    assert_eq!(event.title, "Mentorship Workshop 2031");
    assert!(event.featured);
    assert_eq!(event.max_attendees, 50);
    assert_eq!(event.max_attendees_per_organization, Some(10));

    let featured = sql_interface::list_events(&conn, &EventFilter::FeaturedOnly).unwrap();
    assert_eq!(featured.len(), 1);

    update.featured = false;
    sql_interface::update_event(&conn, &update).unwrap();
    assert!(sql_interface::list_events(&conn, &EventFilter::FeaturedOnly)
        .unwrap()
        .is_empty());

    sql_interface::delete_event(&conn, id).unwrap();
    assert!(sql_interface::get_event(&conn, id).unwrap().is_none());
}

#[test]
fn deleting_an_event_cascades_to_registrations() {
    let mut conn = init_db();
    let date = NaiveDate::from_ymd_opt(2031, 5, 17).unwrap();
    let id = sql_interface::insert_new_event(&conn, &sample_event("Workshop", date)).unwrap();

    sql_interface::apply_registration(
        &mut conn,
        &super::registrations::NewRegistration {
            event_id: id,
            registration_type: super::RegistrationType::Individual,
            name: "Alice Beta".to_string(),
            email: "alice@example.com".to_string(),
            phone: "+254700000001".to_string(),
            organization_name: None,
            contact_person: None,
            number_of_attendees: 1,
            attendee_details: Vec::new(),
            special_requirements: None,
            dietary_restrictions: None,
            additional_notes: None,
        },
    )
    .unwrap();
    assert_eq!(sql_interface::search_registrations(&conn, id).unwrap().len(), 1);

    sql_interface::delete_event(&conn, id).unwrap();
    assert!(sql_interface::search_registrations(&conn, id)
        .unwrap()
        .is_empty());

    // the contact reservation is released as well
    let contacts: i64 = conn
        .query_row("SELECT COUNT(*) FROM registration_contact", [], |row| {
            row.get(0)
        })
        .unwrap();
    assert_eq!(contacts, 0);
}

#[test]
fn testimonials() {
    let conn = init_db();

    let id = sql_interface::insert_new_testimonial(
        &conn,
        &NewTestimonial {
            name: "Alice Beta".to_string(),
            role: Some("Volunteer".to_string()),
            quote: "This program changed everything for our family.".to_string(),
            tags: None,
        },
    )
    .unwrap();

    let all = sql_interface::list_testimonials(&conn).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].name, "Alice Beta");

    sql_interface::update_testimonial(
        &conn,
        &UpdateTestimonial {
            id,
            name: "Alice Beta".to_string(),
            role: Some("Community Volunteer".to_string()),
            quote: "This program changed everything for our family.".to_string(),
            tags: Some("Education".to_string()),
        },
    )
    .unwrap();
    let all = sql_interface::list_testimonials(&conn).unwrap();
    assert_eq!(all[0].role.as_deref(), Some("Community Volunteer"));

    sql_interface::delete_testimonial(&conn, id).unwrap();
    assert!(sql_interface::list_testimonials(&conn).unwrap().is_empty());
}

#[test]
fn testimonial_word_limit() {
    let conn = init_db();

    let too_long = "word ".repeat(101);
    let err = sql_interface::insert_new_testimonial(
        &conn,
        &NewTestimonial {
            name: "Alice Beta".to_string(),
            role: None,
            quote: too_long,
            tags: None,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        InsertTestimonialError::InvalidQuote(QuoteValidationError::TooLong { words: 101 })
    ));

    let err = sql_interface::insert_new_testimonial(
        &conn,
        &NewTestimonial {
            name: "Alice Beta".to_string(),
            role: None,
            quote: "   ".to_string(),
            tags: None,
        },
    )
    .unwrap_err();
    assert!(matches!(
        err,
        InsertTestimonialError::InvalidQuote(QuoteValidationError::Empty)
    ));

    // exactly at the limit is fine
    let at_limit = vec!["word"; 100].join(" ");
    sql_interface::insert_new_testimonial(
        &conn,
        &NewTestimonial {
            name: "Alice Beta".to_string(),
            role: None,
            quote: at_limit,
            tags: None,
        },
    )
    .unwrap();
}

#[test]
fn story_review_flow() {
    let mut conn = init_db();

    let story_id = sql_interface::submit_story(
        &conn,
        &NewStory {
            name: "Bob Echo".to_string(),
            role: None,
            quote: "I found my footing again thanks to the mentors.".to_string(),
            tags: None,
        },
    )
    .unwrap();

    let pending = sql_interface::list_pending_stories(&conn).unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, "pending");

    sql_interface::approve_story(&mut conn, story_id).unwrap();

    // approval publishes the story with the default role and tags filled in
    let testimonials = sql_interface::list_testimonials(&conn).unwrap();
    assert_eq!(testimonials.len(), 1);
    assert_eq!(testimonials[0].role.as_deref(), Some("Community Member"));
    assert_eq!(
        testimonials[0].tags.as_deref(),
        Some("Stories of Transformation")
    );

    // reviewed stories leave the queue and cannot be approved twice
    assert!(sql_interface::list_pending_stories(&conn).unwrap().is_empty());
    assert!(matches!(
        sql_interface::approve_story(&mut conn, story_id),
        Err(ReviewStoryError::UnknownStory)
    ));

    let rejected_id = sql_interface::submit_story(
        &conn,
        &NewStory {
            name: "Carol Delta".to_string(),
            role: None,
            quote: "Spam".to_string(),
            tags: None,
        },
    )
    .unwrap();
    sql_interface::reject_story(&conn, rejected_id).unwrap();
    assert!(sql_interface::list_pending_stories(&conn).unwrap().is_empty());
    assert_eq!(sql_interface::list_testimonials(&conn).unwrap().len(), 1);
}

#[test]
fn gallery() {
    let conn = init_db();

    let photo_id = sql_interface::insert_new_photo(
        &conn,
        &NewPhoto {
            title: "Graduation Day".to_string(),
            description: None,
            url: "/static/uploads/graduation.jpg".to_string(),
            alt: None,
        },
    )
    .unwrap();

    // alt falls back to the title when left empty
    let photos = sql_interface::list_photos(&conn).unwrap();
    assert_eq!(photos[0].alt, "Graduation Day");

    sql_interface::update_photo(
        &conn,
        &super::gallery::UpdatePhoto {
            id: photo_id,
            title: "Graduation Day".to_string(),
            description: Some("Class of 2030".to_string()),
            url: "/static/uploads/graduation.jpg".to_string(),
            alt: Some("Students celebrating".to_string()),
        },
    )
    .unwrap();
    let photos = sql_interface::list_photos(&conn).unwrap();
    assert_eq!(photos[0].alt, "Students celebrating");

    sql_interface::delete_photo(&conn, photo_id).unwrap();
    assert!(sql_interface::list_photos(&conn).unwrap().is_empty());

    let video_id = sql_interface::insert_new_video(
        &conn,
        &NewVideo {
            title: "Impact 2030".to_string(),
            description: None,
            url: "https://video.example/impact-2030".to_string(),
            thumbnail: None,
        },
    )
    .unwrap();
    assert_eq!(sql_interface::list_videos(&conn).unwrap().len(), 1);
    sql_interface::delete_video(&conn, video_id).unwrap();
    assert!(sql_interface::list_videos(&conn).unwrap().is_empty());
}

#[test]
fn news_review_flow() {
    let mut conn = init_db();

    sql_interface::insert_new_article(
        &conn,
        &NewArticle {
            title: "New Classrooms Opened".to_string(),
            content: "Three new classrooms were opened this week.".to_string(),
            image_url: None,
            link: None,
            source: None,
            author: Some("Admin".to_string()),
        },
    )
    .unwrap();

    let submission_id = sql_interface::submit_news(
        &conn,
        &NewArticle {
            title: "Community Well Completed".to_string(),
            content: "The borehole project finished ahead of schedule.".to_string(),
            image_url: None,
            link: None,
            source: Some("Community reporter".to_string()),
            author: None,
        },
    )
    .unwrap();
    assert_eq!(sql_interface::list_pending_news(&conn).unwrap().len(), 1);

    sql_interface::approve_pending_news(&mut conn, submission_id).unwrap();

    // the submission moved over into the published table
    assert!(sql_interface::list_pending_news(&conn).unwrap().is_empty());
    let news = sql_interface::list_news(&conn).unwrap();
    assert_eq!(news.len(), 2);
    assert!(news
        .iter()
        .any(|article| article.title == "Community Well Completed"));

    assert!(matches!(
        sql_interface::approve_pending_news(&mut conn, submission_id),
        Err(ReviewNewsError::UnknownSubmission)
    ));
}

#[test]
fn quotes() {
    let conn = init_db();

    let today = NaiveDate::from_ymd_opt(2031, 5, 17).unwrap();
    sql_interface::insert_new_quote(
        &conn,
        &NewQuote {
            quote_text: "Hope is the anchor of the soul.".to_string(),
            author: None,
            quote_date: None,
        },
    )
    .unwrap();
    sql_interface::insert_new_quote(
        &conn,
        &NewQuote {
            quote_text: "Alone we can do so little; together we can do so much.".to_string(),
            author: Some("Helen Keller".to_string()),
            quote_date: Some(today),
        },
    )
    .unwrap();

    // the pinned quote wins on its date
    let quote = sql_interface::quote_for(&conn, today).unwrap().unwrap();
    assert_eq!(quote.author.as_deref(), Some("Helen Keller"));

    // other days fall back to the latest unpinned quote
    let other_day = NaiveDate::from_ymd_opt(2031, 5, 18).unwrap();
    let quote = sql_interface::quote_for(&conn, other_day).unwrap().unwrap();
    assert_eq!(quote.quote_text, "Hope is the anchor of the soul.");
}

#[test]
fn contact_messages() {
    let conn = init_db();

    let id = sql_interface::insert_new_message(
        &conn,
        &NewMessage {
            name: "Alice Beta".to_string(),
            email: "alice_beta@non-existent-domain".parse().unwrap(),
            subject: Some("Volunteering".to_string()),
            message: "How can I help?".to_string(),
        },
    )
    .unwrap();

    let messages = sql_interface::list_messages(&conn).unwrap();
    assert_eq!(messages.len(), 1);
    assert!(!messages[0].is_read);
    assert!(!messages[0].is_replied);

    sql_interface::mark_message_read(&conn, id).unwrap();
    let messages = sql_interface::list_messages(&conn).unwrap();
    assert!(messages[0].is_read);
    assert!(!messages[0].is_replied);

    sql_interface::mark_message_replied(&conn, id).unwrap();
    let messages = sql_interface::list_messages(&conn).unwrap();
    assert!(messages[0].is_read);
    assert!(messages[0].is_replied);

    sql_interface::delete_message(&conn, id).unwrap();
    assert!(sql_interface::list_messages(&conn).unwrap().is_empty());
}

#[test]
fn settings() {
    let mut conn = init_db();

    let settings = sql_interface::all_settings(&mut conn).unwrap();
    assert_eq!(settings.get("registration-notice").map(String::as_str), Some(""));
    assert_eq!(
        settings.get("default-max-attendees").map(String::as_str),
        Some("0")
    );

    sql_interface::set_setting(
        &mut conn,
        "registration-notice",
        Value::Text("Bring your own chair.".to_string()),
    )
    .unwrap();
    let notice = sql_interface::get_setting(&mut conn, "registration-notice").unwrap();
    assert_eq!(
        sql_interface::stringify_value(notice),
        "Bring your own chair."
    );

    sql_interface::set_setting(&mut conn, "default-max-per-organization", Value::Integer(10))
        .unwrap();
    let cap = sql_interface::get_setting(&mut conn, "default-max-per-organization").unwrap();
    assert_eq!(cap, Value::Integer(10));
}
