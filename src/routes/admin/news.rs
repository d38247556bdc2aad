use rocket::form::{Form, Strict};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{routes, Route};
use rocket_dyn_templates::{context, Template};

use crate::{
    server_error,
    sql_interface::{self, NewArticle, ReviewNewsError, UpdateArticle},
    HopealifeDBConn,
};

#[must_use]
pub fn routes() -> Vec<Route> {
    routes![panel, publish, update, delete, approve, delete_pending]
}

#[get("/admin/news")]
pub async fn panel(
    conn: HopealifeDBConn,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Flash<Redirect>> {
    let news = conn
        .run(|c| sql_interface::list_news(c))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while listing news: {err}"),
                "an error occurred while loading news",
            )
        })?;

    let pending = conn
        .run(|c| sql_interface::list_pending_news(c))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while listing pending news: {err}"),
                "an error occurred while loading news submissions",
            )
        })?;

    Ok(Template::render(
        "admin/news",
        context! {
            flash: flash.map(|flash| flash.message().to_string()),
            news,
            pending,
        },
    ))
}

fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[derive(Debug, FromForm)]
pub struct Publish {
    title: String,
    content: String,
    image_url: String,
    link: String,
    source: String,
    author: String,
}

#[post("/admin/news/new", data = "<form>")]
pub async fn publish(
    conn: HopealifeDBConn,
    form: Form<Strict<Publish>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let form = form.into_inner().into_inner();
    let article = NewArticle {
        title: form.title,
        content: form.content,
        image_url: optional(form.image_url),
        link: optional(form.link),
        source: optional(form.source),
        author: optional(form.author),
    };

    conn.run(move |c| sql_interface::insert_new_article(c, &article))
        .await
        .map(|_| Flash::success(Redirect::to(uri!(panel)), "News article published!"))
        .map_err(|err| {
            server_error(
                format!("Error while inserting news article: {err}"),
                "an error occurred while publishing the article",
            )
        })
}

#[derive(Debug, FromForm)]
pub struct Update {
    id: i64,
    title: String,
    content: String,
    image_url: String,
    link: String,
    source: String,
    author: String,
}

#[post("/admin/news/update", data = "<form>")]
pub async fn update(
    conn: HopealifeDBConn,
    form: Form<Strict<Update>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let form = form.into_inner().into_inner();
    let article = UpdateArticle {
        id: form.id,
        title: form.title,
        content: form.content,
        image_url: optional(form.image_url),
        link: optional(form.link),
        source: optional(form.source),
        author: optional(form.author),
    };

    conn.run(move |c| sql_interface::update_article(c, &article))
        .await
        .map(|_| Flash::success(Redirect::to(uri!(panel)), "News article updated!"))
        .map_err(|err| {
            server_error(
                format!("Error while updating news article: {err}"),
                "an error occurred while updating the article",
            )
        })
}

#[derive(FromForm)]
pub struct Delete {
    id: i64,
}

#[post("/admin/news/delete", data = "<form>")]
pub async fn delete(
    conn: HopealifeDBConn,
    form: Form<Strict<Delete>>,
) -> Result<Redirect, Flash<Redirect>> {
    let id = form.id;
    conn.run(move |c| sql_interface::delete_news(c, id))
        .await
        .map(|_| Redirect::to(uri!(panel)))
        .map_err(|err| {
            server_error(
                format!("Error while deleting news article: {err}\nNews ID: {id}"),
                "an error occurred while deleting the article",
            )
        })
}

#[post("/admin/news/approve", data = "<form>")]
pub async fn approve(
    conn: HopealifeDBConn,
    form: Form<Strict<Delete>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let id = form.id;
    match conn
        .run(move |c| sql_interface::approve_pending_news(c, id))
        .await
    {
        Ok(_) => Ok(Flash::success(
            Redirect::to(uri!(panel)),
            "Submission published.",
        )),
        Err(ReviewNewsError::UnknownSubmission) => Err(Flash::error(
            Redirect::to(uri!(panel)),
            "That submission is gone or already reviewed.",
        )),
        Err(err) => Err(server_error(
            format!("Error while approving news submission {id}: {err}"),
            "an error occurred while publishing the submission",
        )),
    }
}

#[post("/admin/news/pending/delete", data = "<form>")]
pub async fn delete_pending(
    conn: HopealifeDBConn,
    form: Form<Strict<Delete>>,
) -> Result<Redirect, Flash<Redirect>> {
    let id = form.id;
    conn.run(move |c| sql_interface::delete_pending_news(c, id))
        .await
        .map(|_| Redirect::to(uri!(panel)))
        .map_err(|err| {
            server_error(
                format!("Error while deleting pending news: {err}\nSubmission ID: {id}"),
                "an error occurred while deleting the submission",
            )
        })
}
