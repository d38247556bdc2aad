use rocket::form::{Form, Strict};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{routes, Route};
use rocket_dyn_templates::{context, Template};

use crate::{
    server_error,
    sql_interface::{self, InsertTestimonialError, NewTestimonial, ReviewStoryError,
        UpdateTestimonial},
    HopealifeDBConn,
};

#[must_use]
pub fn routes() -> Vec<Route> {
    routes![panel, create, update, delete, approve, reject, delete_pending]
}

/// Just a shorthand for an error flash containing a redirect.
#[inline]
fn flash_error(message: &str) -> Flash<Redirect> {
    Flash::error(Redirect::to(uri!(panel)), message)
}

#[get("/admin/testimonials")]
pub async fn panel(
    conn: HopealifeDBConn,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Flash<Redirect>> {
    let testimonials = conn
        .run(|c| sql_interface::list_testimonials(c))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while listing testimonials: {err}"),
                "an error occurred while loading testimonials",
            )
        })?;

    let pending = conn
        .run(|c| sql_interface::list_pending_stories(c))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while listing pending stories: {err}"),
                "an error occurred while loading story submissions",
            )
        })?;

    Ok(Template::render(
        "admin/testimonials",
        context! {
            flash: flash.map(|flash| flash.message().to_string()),
            testimonials,
            pending,
        },
    ))
}

#[derive(Debug, FromForm)]
pub struct Create {
    name: String,
    role: String,
    quote: String,
    tags: String,
}

fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[post("/admin/testimonials/new", data = "<form>")]
pub async fn create(
    conn: HopealifeDBConn,
    form: Form<Strict<Create>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let form = form.into_inner().into_inner();
    let new = NewTestimonial {
        name: form.name,
        role: optional(form.role),
        quote: form.quote,
        tags: optional(form.tags),
    };

    match conn
        .run(move |c| sql_interface::insert_new_testimonial(c, &new))
        .await
    {
        Ok(_) => Ok(Flash::success(
            Redirect::to(uri!(panel)),
            "Testimonial added successfully!",
        )),
        Err(InsertTestimonialError::InvalidQuote(err)) => Err(flash_error(&err.to_string())),
        Err(err) => Err(server_error(
            format!("Error while inserting testimonial: {err}"),
            "an error occurred while inserting the testimonial",
        )),
    }
}

#[derive(Debug, FromForm)]
pub struct Update {
    id: i64,
    name: String,
    role: String,
    quote: String,
    tags: String,
}

#[post("/admin/testimonials/update", data = "<form>")]
pub async fn update(
    conn: HopealifeDBConn,
    form: Form<Strict<Update>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let form = form.into_inner().into_inner();
    let update = UpdateTestimonial {
        id: form.id,
        name: form.name,
        role: optional(form.role),
        quote: form.quote,
        tags: optional(form.tags),
    };

    match conn
        .run(move |c| sql_interface::update_testimonial(c, &update))
        .await
    {
        Ok(()) => Ok(Flash::success(
            Redirect::to(uri!(panel)),
            "Testimonial updated successfully!",
        )),
        Err(InsertTestimonialError::InvalidQuote(err)) => Err(flash_error(&err.to_string())),
        Err(err) => Err(server_error(
            format!("Error while updating testimonial: {err}"),
            "an error occurred while updating the testimonial",
        )),
    }
}

#[derive(FromForm)]
pub struct Delete {
    id: i64,
}

#[post("/admin/testimonials/delete", data = "<form>")]
pub async fn delete(
    conn: HopealifeDBConn,
    form: Form<Strict<Delete>>,
) -> Result<Redirect, Flash<Redirect>> {
    let id = form.id;
    conn.run(move |c| sql_interface::delete_testimonial(c, id))
        .await
        .map(|_| Redirect::to(uri!(panel)))
        .map_err(|err| {
            server_error(
                format!("Error while deleting testimonial: {err}\nTestimonial ID: {id}"),
                "an error occurred while deleting testimonial",
            )
        })
}

#[derive(FromForm)]
pub struct Review {
    id: i64,
}

#[post("/admin/stories/approve", data = "<form>")]
pub async fn approve(
    conn: HopealifeDBConn,
    form: Form<Strict<Review>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let id = form.id;
    match conn
        .run(move |c| sql_interface::approve_story(c, id))
        .await
    {
        Ok(_) => Ok(Flash::success(
            Redirect::to(uri!(panel)),
            "Story approved and published as a testimonial.",
        )),
        Err(ReviewStoryError::UnknownStory) => {
            Err(flash_error("That story is gone or already reviewed."))
        }
        Err(err) => Err(server_error(
            format!("Error while approving story {id}: {err}"),
            "an error occurred while approving the story",
        )),
    }
}

#[post("/admin/stories/reject", data = "<form>")]
pub async fn reject(
    conn: HopealifeDBConn,
    form: Form<Strict<Review>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let id = form.id;
    match conn.run(move |c| sql_interface::reject_story(c, id)).await {
        Ok(()) => Ok(Flash::success(Redirect::to(uri!(panel)), "Story rejected.")),
        Err(ReviewStoryError::UnknownStory) => {
            Err(flash_error("That story is gone or already reviewed."))
        }
        Err(err) => Err(server_error(
            format!("Error while rejecting story {id}: {err}"),
            "an error occurred while rejecting the story",
        )),
    }
}

#[post("/admin/stories/delete", data = "<form>")]
pub async fn delete_pending(
    conn: HopealifeDBConn,
    form: Form<Strict<Review>>,
) -> Result<Redirect, Flash<Redirect>> {
    let id = form.id;
    conn.run(move |c| sql_interface::delete_pending_story(c, id))
        .await
        .map(|_| Redirect::to(uri!(panel)))
        .map_err(|err| {
            server_error(
                format!("Error while deleting pending story: {err}\nStory ID: {id}"),
                "an error occurred while deleting the story submission",
            )
        })
}
