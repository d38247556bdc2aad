use rocket::form::{Form, Strict};
use rocket::request::FlashMessage;
use rocket::response::{Flash, Redirect};
use rocket::{routes, Route};
use rocket_dyn_templates::Template;
use rusqlite::types::Value;

use crate::{server_error, sql_interface, HopealifeDBConn};

#[must_use]
pub fn routes() -> Vec<Route> {
    routes![panel, set]
}

#[get("/admin/settings")]
pub async fn panel(
    conn: HopealifeDBConn,
    flash: Option<FlashMessage<'_>>,
) -> Result<Template, Flash<Redirect>> {
    let mut settings = conn
        .run(|c| sql_interface::all_settings(c))
        .await
        .map_err(|err| {
            server_error(
                format!("Error while fetching current setting values: {err}"),
                "an error occurred while loading the settings",
            )
        })?;
    settings.insert(
        "flash".to_string(),
        flash.map_or_else(String::new, |flash| flash.message().to_string()),
    );
    Ok(Template::render("admin/settings", settings))
}

#[derive(FromForm, Debug, Clone)]
pub struct Setting {
    name: String,
    value: String,
}

#[post("/admin/settings/set", data = "<update>")]
pub async fn set(
    conn: HopealifeDBConn,
    update: Form<Strict<Setting>>,
) -> Result<Flash<Redirect>, Flash<Redirect>> {
    // probably want to perform some additional validation here for new settings, but for now this is fine
    let value = match update.name.as_ref() {
        "registration-notice" => Value::Text(update.value.clone()),
        "default-max-attendees" => {
            let max = update.value.parse::<u32>().map_err(|_| {
                Flash::error(
                    Redirect::to(uri!(panel)),
                    "The number is not valid, or too large.",
                )
            })?;
            Value::Integer(i64::from(max))
        }
        "default-max-per-organization" => match update.value.len() {
            0 => Value::Null,
            _ => {
                let cap = update.value.parse::<u32>().map_err(|_| {
                    Flash::error(
                        Redirect::to(uri!(panel)),
                        "The number is not valid, or too large.",
                    )
                })?;
                Value::Integer(i64::from(cap))
            }
        },
        _ => {
            return Err(server_error(
                format!(
                    "User wanted to set setting '{}' to '{}', which isn't validated for (but may exist in the database, in that case validation + database are out of sync)",
                    update.name, update.value
                ),
                "an error occurred while applying the setting",
            ));
        }
    };
    let name = update.name.clone();

    conn.run(move |c| sql_interface::set_setting(c, name, value))
        .await
        .map_err(|err| {
            server_error(
                format!(
                    "Error while setting '{}' to '{}': {err}",
                    update.name, update.value
                ),
                "an error occurred while updating the setting",
            )
        })?;

    Ok(Flash::success(Redirect::to(uri!(panel)), "Setting applied."))
}
