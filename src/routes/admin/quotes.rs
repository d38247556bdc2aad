use rocket::form::{Form, Strict};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{routes, Route};
use rocket_dyn_templates::{context, Template};

use crate::{
    date_helpers::time_to_chrono_date,
    server_error,
    sql_interface::{self, NewQuote, UpdateQuote},
    HopealifeDBConn,
};

#[must_use]
pub fn routes() -> Vec<Route> {
    routes![panel, create, update, delete]
}

#[get("/admin/quotes")]
pub async fn panel(
    conn: HopealifeDBConn,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Flash<Redirect>> {
    let quotes = conn
        .run(|c| sql_interface::list_quotes(c))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while listing quotes: {err}"),
                "an error occurred while loading quotes",
            )
        })?;

    Ok(Template::render(
        "admin/quotes",
        context! {
            flash: flash.map(|flash| flash.message().to_string()),
            quotes,
        },
    ))
}

#[derive(Debug, FromForm)]
pub struct Create {
    quote_text: String,
    author: String,
    date: Option<time::Date>,
}

#[post("/admin/quotes/new", data = "<form>")]
pub async fn create(
    conn: HopealifeDBConn,
    form: Form<Create>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let form = form.into_inner();
    let author = form.author.trim().to_string();
    let new = NewQuote {
        quote_text: form.quote_text,
        author: (!author.is_empty()).then_some(author),
        quote_date: form.date.map(time_to_chrono_date),
    };

    conn.run(move |c| sql_interface::insert_new_quote(c, &new))
        .await
        .map(|_| Flash::success(Redirect::to(uri!(panel)), "Quote saved successfully!"))
        .map_err(|err| {
            server_error(
                format!("Error while inserting quote: {err}"),
                "an error occurred while saving the quote",
            )
        })
}

#[derive(Debug, FromForm)]
pub struct Update {
    id: i64,
    quote_text: String,
    author: String,
    date: Option<time::Date>,
}

#[post("/admin/quotes/update", data = "<form>")]
pub async fn update(
    conn: HopealifeDBConn,
    form: Form<Update>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let form = form.into_inner();
    let author = form.author.trim().to_string();
    let update = UpdateQuote {
        id: form.id,
        quote_text: form.quote_text,
        author: (!author.is_empty()).then_some(author),
        quote_date: form.date.map(time_to_chrono_date),
    };

    conn.run(move |c| sql_interface::update_quote(c, &update))
        .await
        .map(|_| Flash::success(Redirect::to(uri!(panel)), "Quote updated successfully!"))
        .map_err(|err| {
            server_error(
                format!("Error while updating quote: {err}"),
                "an error occurred while updating the quote",
            )
        })
}

#[derive(FromForm)]
pub struct Delete {
    id: i64,
}

#[post("/admin/quotes/delete", data = "<form>")]
pub async fn delete(
    conn: HopealifeDBConn,
    form: Form<Strict<Delete>>,
) -> Result<Redirect, Flash<Redirect>> {
    let id = form.id;
    conn.run(move |c| sql_interface::delete_quote(c, id))
        .await
        .map(|_| Redirect::to(uri!(panel)))
        .map_err(|err| {
            server_error(
                format!("Error while deleting quote: {err}\nQuote ID: {id}"),
                "an error occurred while deleting quote",
            )
        })
}
