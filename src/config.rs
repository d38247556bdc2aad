use rocket::serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Config {
    /// Name of the organization, shown in page titles and the site header.
    pub site_name: String,

    /// The inbox contact form submissions are addressed to. Shown on the
    /// contact page so visitors can also mail directly.
    pub contact_email: lettre::Address,

    /// Upper bound on attendee rows accepted from a bulk upload in one
    /// registration.
    pub max_upload_rows: usize,
}
