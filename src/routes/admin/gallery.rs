use rocket::form::{Form, Strict};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{routes, Route};
use rocket_dyn_templates::{context, Template};

use crate::{
    server_error,
    sql_interface::{self, NewPhoto, NewVideo, UpdatePhoto, UpdateVideo},
    HopealifeDBConn,
};

#[must_use]
pub fn routes() -> Vec<Route> {
    routes![
        panel,
        create_photo,
        update_photo,
        delete_photo,
        create_video,
        update_video,
        delete_video
    ]
}

#[get("/admin/gallery")]
pub async fn panel(
    conn: HopealifeDBConn,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Flash<Redirect>> {
    let photos = conn
        .run(|c| sql_interface::list_photos(c))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while listing photos: {err}"),
                "an error occurred while loading photos",
            )
        })?;

    let videos = conn
        .run(|c| sql_interface::list_videos(c))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while listing videos: {err}"),
                "an error occurred while loading videos",
            )
        })?;

    Ok(Template::render(
        "admin/gallery",
        context! {
            flash: flash.map(|flash| flash.message().to_string()),
            photos,
            videos,
        },
    ))
}

fn optional(value: String) -> Option<String> {
    let value = value.trim().to_string();
    (!value.is_empty()).then_some(value)
}

#[derive(Debug, FromForm)]
pub struct CreatePhoto {
    title: String,
    description: String,
    url: String,
    alt: String,
}

#[post("/admin/gallery/photos/new", data = "<form>")]
pub async fn create_photo(
    conn: HopealifeDBConn,
    form: Form<Strict<CreatePhoto>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let form = form.into_inner().into_inner();
    let new = NewPhoto {
        title: form.title,
        description: optional(form.description),
        url: form.url,
        alt: optional(form.alt),
    };

    conn.run(move |c| sql_interface::insert_new_photo(c, &new))
        .await
        .map(|_| Flash::success(Redirect::to(uri!(panel)), "Photo added successfully!"))
        .map_err(|err| {
            server_error(
                format!("Error while inserting photo: {err}"),
                "an error occurred while inserting the photo",
            )
        })
}

#[derive(Debug, FromForm)]
pub struct UpdatePhotoForm {
    id: i64,
    title: String,
    description: String,
    url: String,
    alt: String,
}

#[post("/admin/gallery/photos/update", data = "<form>")]
pub async fn update_photo(
    conn: HopealifeDBConn,
    form: Form<Strict<UpdatePhotoForm>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let form = form.into_inner().into_inner();
    let update = UpdatePhoto {
        id: form.id,
        title: form.title,
        description: optional(form.description),
        url: form.url,
        alt: optional(form.alt),
    };

    conn.run(move |c| sql_interface::update_photo(c, &update))
        .await
        .map(|_| Flash::success(Redirect::to(uri!(panel)), "Photo updated successfully!"))
        .map_err(|err| {
            server_error(
                format!("Error while updating photo: {err}"),
                "an error occurred while updating the photo",
            )
        })
}

#[derive(FromForm)]
pub struct Delete {
    id: i64,
}

#[post("/admin/gallery/photos/delete", data = "<form>")]
pub async fn delete_photo(
    conn: HopealifeDBConn,
    form: Form<Strict<Delete>>,
) -> Result<Redirect, Flash<Redirect>> {
    let id = form.id;
    conn.run(move |c| sql_interface::delete_photo(c, id))
        .await
        .map(|_| Redirect::to(uri!(panel)))
        .map_err(|err| {
            server_error(
                format!("Error while deleting photo: {err}\nPhoto ID: {id}"),
                "an error occurred while deleting photo",
            )
        })
}

#[derive(Debug, FromForm)]
pub struct CreateVideo {
    title: String,
    description: String,
    url: String,
    thumbnail: String,
}

#[post("/admin/gallery/videos/new", data = "<form>")]
pub async fn create_video(
    conn: HopealifeDBConn,
    form: Form<Strict<CreateVideo>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let form = form.into_inner().into_inner();
    let new = NewVideo {
        title: form.title,
        description: optional(form.description),
        url: form.url,
        thumbnail: optional(form.thumbnail),
    };

    conn.run(move |c| sql_interface::insert_new_video(c, &new))
        .await
        .map(|_| Flash::success(Redirect::to(uri!(panel)), "Video added successfully!"))
        .map_err(|err| {
            server_error(
                format!("Error while inserting video: {err}"),
                "an error occurred while inserting the video",
            )
        })
}

#[derive(Debug, FromForm)]
pub struct UpdateVideoForm {
    id: i64,
    title: String,
    description: String,
    url: String,
    thumbnail: String,
}

#[post("/admin/gallery/videos/update", data = "<form>")]
pub async fn update_video(
    conn: HopealifeDBConn,
    form: Form<Strict<UpdateVideoForm>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    let form = form.into_inner().into_inner();
    let update = UpdateVideo {
        id: form.id,
        title: form.title,
        description: optional(form.description),
        url: form.url,
        thumbnail: optional(form.thumbnail),
    };

    conn.run(move |c| sql_interface::update_video(c, &update))
        .await
        .map(|_| Flash::success(Redirect::to(uri!(panel)), "Video updated successfully!"))
        .map_err(|err| {
            server_error(
                format!("Error while updating video: {err}"),
                "an error occurred while updating the video",
            )
        })
}

#[post("/admin/gallery/videos/delete", data = "<form>")]
pub async fn delete_video(
    conn: HopealifeDBConn,
    form: Form<Strict<Delete>>,
) -> Result<Redirect, Flash<Redirect>> {
    let id = form.id;
    conn.run(move |c| sql_interface::delete_video(c, id))
        .await
        .map(|_| Redirect::to(uri!(panel)))
        .map_err(|err| {
            server_error(
                format!("Error while deleting video: {err}\nVideo ID: {id}"),
                "an error occurred while deleting video",
            )
        })
}
