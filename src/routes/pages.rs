//! The public content pages. These only read from the store and hand rows to
//! their templates.

use chrono::Utc;
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{routes, Route, State};
use rocket_dyn_templates::{context, Template};
use serde::Serialize;

use crate::{
    config::Config,
    date_helpers::format_date,
    server_error,
    sql_interface::{self, EventFilter},
    HopealifeDBConn,
};

#[must_use]
pub fn routes() -> Vec<Route> {
    routes![home, impact, gallery, videos, news]
}

#[get("/")]
pub async fn home(
    conn: HopealifeDBConn,
    config: &State<Config>,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Flash<Redirect>> {
    #[derive(Debug, Serialize)]
    struct TemplateEvent {
        pretty_date: String,
        event: sql_interface::Event,
    }

    let featured = conn
        .run(|c| sql_interface::list_events(c, &EventFilter::FeaturedOnly))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while listing featured events: {err}"),
                "an error occurred while loading events",
            )
        })?;

    let today = Utc::now().naive_local().date();
    let quote = conn
        .run(move |c| sql_interface::quote_for(c, today))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while fetching the daily quote: {err}"),
                "an error occurred while loading the page",
            )
        })?;

    let featured: Vec<_> = featured
        .into_iter()
        .map(|event| TemplateEvent {
            pretty_date: format_date(event.date),
            event,
        })
        .collect();

    Ok(Template::render(
        "home",
        context! {
            flash: flash.map(|flash| flash.message().to_string()),
            site_name: config.site_name.clone(),
            featured,
            quote,
        },
    ))
}

#[get("/impact")]
pub async fn impact(
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

    Ok(Template::render(
        "impact",
        context! {
            flash: flash.map(|flash| flash.message().to_string()),
            testimonials,
        },
    ))
}

#[get("/gallery")]
pub async fn gallery(conn: HopealifeDBConn) -> Result<Template, Flash<Redirect>> {
    let photos = conn.run(|c| sql_interface::list_photos(c)).await.map_err(|err| {
        server_error(
            format!("Error while listing photos: {err}"),
            "an error occurred while loading the gallery",
        )
    })?;

    Ok(Template::render(
        "gallery",
        context! {
            photos,
        },
    ))
}

#[get("/videos")]
pub async fn videos(conn: HopealifeDBConn) -> Result<Template, Flash<Redirect>> {
    let videos = conn.run(|c| sql_interface::list_videos(c)).await.map_err(|err| {
        server_error(
            format!("Error while listing videos: {err}"),
            "an error occurred while loading videos",
        )
    })?;

    Ok(Template::render(
        "videos",
        context! {
            videos,
        },
    ))
}

#[get("/news")]
pub async fn news(
    conn: HopealifeDBConn,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Flash<Redirect>> {
    #[derive(Debug, Serialize)]
    struct TemplateArticle {
        pretty_date: String,
        article: sql_interface::NewsArticle,
    }

    let news = conn.run(|c| sql_interface::list_news(c)).await.map_err(|err| {
        server_error(
            format!("Error while listing news: {err}"),
            "an error occurred while loading news",
        )
    })?;

    let news: Vec<_> = news
        .into_iter()
        .map(|article| TemplateArticle {
            pretty_date: format_date(article.published_at.date()),
            article,
        })
        .collect();

    Ok(Template::render(
        "news",
        context! {
            flash: flash.map(|flash| flash.message().to_string()),
            news,
        },
    ))
}
