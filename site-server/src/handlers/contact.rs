//! Contact form endpoint. Submissions are logged for follow-up; there is no
//! mail delivery or persistence behind this.

use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: String,
}

pub async fn contact(Json(form): Json<ContactForm>) -> Json<ContactResponse> {
    tracing::info!(
        name = form.name.as_deref().unwrap_or("-"),
        email = form.email.as_deref().unwrap_or("-"),
        message = form.message.as_deref().unwrap_or("-"),
        "Contact form submission"
    );

    Json(ContactResponse {
        message: "¡Gracias por contactarnos! Te responderemos pronto.".to_string(),
    })
}
