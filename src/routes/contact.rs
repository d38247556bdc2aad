//! The contact form and the public story/news submission forms.

use rocket::form::{Form, Strict};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{routes, Route, State};
use rocket_dyn_templates::{context, Template};

use crate::{
    config::Config,
    server_error,
    sql_interface::{self, InsertTestimonialError, NewArticle, NewMessage, NewStory},
    HopealifeDBConn,
};

#[must_use]
pub fn routes() -> Vec<Route> {
    routes![contact_page, send_message, submit_story, submit_news]
}

#[get("/contact")]
pub async fn contact_page(
    config: &State<Config>,
    flash: Option<FlashMessage<'_>>,
) -> Template {
    Template::render(
        "contact",
        context! {
            flash: flash.map(|flash| flash.message().to_string()),
            contact_email: config.contact_email.to_string(),
        },
    )
}

#[derive(Debug, FromForm)]
pub struct ContactForm {
    name: String,
    email: String,
    subject: String,
    message: String,
}

impl TryFrom<ContactForm> for NewMessage {
    type Error = lettre::address::AddressError;

    fn try_from(source: ContactForm) -> Result<NewMessage, Self::Error> {
        Ok(NewMessage {
            name: source.name,
            email: source.email.parse()?,
            subject: (!source.subject.trim().is_empty()).then(|| source.subject.trim().to_string()),
            message: source.message,
        })
    }
}

#[post("/contact", data = "<form>")]
pub async fn send_message(
    conn: HopealifeDBConn,
    form: Form<Strict<ContactForm>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let message: NewMessage = form
        .into_inner()
        .into_inner()
        .try_into()
        .map_err(|_| Flash::error(Redirect::to(uri!(contact_page)), "Invalid email!"))?;
    conn.run(move |c| sql_interface::insert_new_message(c, &message))
        .await
        .map(|_| {
            Flash::success(
                Redirect::to(uri!(contact_page)),
                "Thank you for your message! We will get back to you soon.",
            )
        })
        .map_err(|err| {
            server_error(
                format!("Error while inserting contact message: {err}"),
                "an error occurred while sending your message",
            )
        })
}

#[derive(Debug, FromForm)]
pub struct StoryForm {
    name: String,
    role: String,
    quote: String,
    tags: String,
}

#[post("/impact/story", data = "<form>")]
pub async fn submit_story(
    conn: HopealifeDBConn,
    form: Form<Strict<StoryForm>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let form = form.into_inner().into_inner();
    let story = NewStory {
        name: form.name,
        role: (!form.role.trim().is_empty()).then(|| form.role.trim().to_string()),
        quote: form.quote,
        tags: (!form.tags.trim().is_empty()).then(|| form.tags.trim().to_string()),
    };

    match conn
        .run(move |c| sql_interface::submit_story(c, &story))
        .await
    {
        Ok(_) => Ok(Flash::success(
            Redirect::to(uri!(crate::routes::pages::impact)),
            "Thank you for sharing your story! It will appear once reviewed.",
        )),
        Err(InsertTestimonialError::InvalidQuote(err)) => Err(Flash::error(
            Redirect::to(uri!(crate::routes::pages::impact)),
            err.to_string(),
        )),
        Err(err) => Err(server_error(
            format!("Error while inserting story submission: {err}"),
            "an error occurred while submitting your story",
        )),
    }
}

#[derive(Debug, FromForm)]
pub struct NewsSubmissionForm {
    title: String,
    content: String,
    link: String,
    source: String,
    author: String,
}

#[post("/news/submit", data = "<form>")]
pub async fn submit_news(
    conn: HopealifeDBConn,
    form: Form<Strict<NewsSubmissionForm>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let form = form.into_inner().into_inner();
    let optional = |value: String| {
        let value = value.trim().to_string();
        (!value.is_empty()).then_some(value)
    };
    let article = NewArticle {
        title: form.title,
        content: form.content,
        image_url: None,
        link: optional(form.link),
        source: optional(form.source),
        author: optional(form.author),
    };

    conn.run(move |c| sql_interface::submit_news(c, &article))
        .await
        .map(|_| {
            Flash::success(
                Redirect::to(uri!(crate::routes::pages::news)),
                "Thank you! Your news submission will appear once reviewed.",
            )
        })
        .map_err(|err| {
            server_error(
                format!("Error while inserting news submission: {err}"),
                "an error occurred while submitting the article",
            )
        })
}
