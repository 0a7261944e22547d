//! Portal information handler for the form page.

use axum::{extract::State, Json};
use serde::Serialize;

use crate::data::{CERTIFICATION_OPTIONS, SERVICE_OPTIONS};
use crate::web::state::WebAppState;

/// Everything the page needs to render the form.
#[derive(Debug, Serialize)]
pub struct FormInfoResponse {
    pub company_name: String,
    pub contact_email: String,
    pub contact_phone: String,
    pub has_logo: bool,
    pub certifications: &'static [&'static str],
    pub services: &'static [&'static str],
    pub required_fields: [&'static str; 3],
}

/// Describe the form: branding, contact details and option lists.
pub async fn get_form_info(State(state): State<WebAppState>) -> Json<FormInfoResponse> {
    let config = state.config();
    Json(FormInfoResponse {
        company_name: config.portal.company_name.clone(),
        contact_email: config.portal.contact_email.clone(),
        contact_phone: config.portal.contact_phone.clone(),
        has_logo: config.logo_path().is_file(),
        certifications: CERTIFICATION_OPTIONS,
        services: SERVICE_OPTIONS,
        required_fields: ["business_name", "phone", "email"],
    })
}
