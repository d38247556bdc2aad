#[macro_use]
extern crate rocket;

use rocket::fairing::AdHoc;
use rocket::fs::FileServer;
use rocket_dyn_templates::{handlebars::handlebars_helper, Template};

use hopealife_site::{config::Config, routes, HopealifeDBConn};

#[launch]
fn rocket() -> _ {
    rocket::build()
        .attach(Template::custom(|engines| {
            engines
                .handlebars
                .register_escape_fn(|input| ammonia::clean_text(input));

            handlebars_helper!(equals: |left_hand: String, right_hand: String| left_hand == right_hand);

            engines.handlebars.register_helper("equals", Box::new(equals));
        }))
        .attach(AdHoc::config::<Config>())
        .attach(HopealifeDBConn::fairing())
        .mount("/", routes())
        .mount("/static", FileServer::from("./static"))
}
