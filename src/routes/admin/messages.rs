use rocket::form::{Form, Strict};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{routes, Route};
use rocket_dyn_templates::{context, Template};
use serde::Serialize;

use crate::{
    date_helpers::format_datetime,
    server_error,
    sql_interface::{self, ContactMessage},
    HopealifeDBConn,
};

#[must_use]
pub fn routes() -> Vec<Route> {
    routes![panel, mark_read, mark_replied, delete]
}

#[get("/admin/messages")]
pub async fn panel(
    conn: HopealifeDBConn,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Flash<Redirect>> {
    #[derive(Debug, Serialize)]
    struct TemplateMessage {
        pretty_date: String,
        message: ContactMessage,
    }

    let messages = conn
        .run(|c| sql_interface::list_messages(c))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while listing contact messages: {err}"),
                "an error occurred while loading messages",
            )
        })?;

    let messages: Vec<_> = messages
        .into_iter()
        .map(|message| TemplateMessage {
            pretty_date: format_datetime(message.created_at),
            message,
        })
        .collect();

    Ok(Template::render(
        "admin/messages",
        context! {
            flash: flash.map(|flash| flash.message().to_string()),
            messages,
        },
    ))
}

#[derive(FromForm)]
pub struct Target {
    id: i64,
}

#[post("/admin/messages/read", data = "<form>")]
pub async fn mark_read(
    conn: HopealifeDBConn,
    form: Form<Strict<Target>>,
) -> Result<Redirect, Flash<Redirect>> {
    let id = form.id;
    conn.run(move |c| sql_interface::mark_message_read(c, id))
        .await
        .map(|_| Redirect::to(uri!(panel)))
        .map_err(|err| {
            server_error(
                format!("Error while marking message {id} as read: {err}"),
                "an error occurred while updating the message",
            )
        })
}

#[post("/admin/messages/replied", data = "<form>")]
pub async fn mark_replied(
    conn: HopealifeDBConn,
    form: Form<Strict<Target>>,
) -> Result<Redirect, Flash<Redirect>> {
    let id = form.id;
    conn.run(move |c| sql_interface::mark_message_replied(c, id))
        .await
        .map(|_| Redirect::to(uri!(panel)))
        .map_err(|err| {
            server_error(
                format!("Error while marking message {id} as replied: {err}"),
                "an error occurred while updating the message",
            )
        })
}

#[post("/admin/messages/delete", data = "<form>")]
pub async fn delete(
    conn: HopealifeDBConn,
    form: Form<Strict<Target>>,
) -> Result<Redirect, Flash<Redirect>> {
    let id = form.id;
    conn.run(move |c| sql_interface::delete_message(c, id))
        .await
        .map(|_| Redirect::to(uri!(panel)))
        .map_err(|err| {
            server_error(
                format!("Error while deleting message: {err}\nMessage ID: {id}"),
                "an error occurred while deleting the message",
            )
        })
}
