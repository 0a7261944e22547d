//! Data models for partner interest submissions

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Format of the `timestamp_utc` column.
pub const TIMESTAMP_FORMAT: &str = "%Y/%m/%d %H:%M:%S";

/// Choices offered by the certifications multi-select.
pub const CERTIFICATION_OPTIONS: &[&str] = &[
    "SBA 8(a)", "HUBZone", "WOSB", "SDVOSB", "MBE", "DBE", "Other",
];

/// Choices offered by the primary services multi-select.
pub const SERVICE_OPTIONS: &[&str] = &[
    "HVAC",
    "Janitorial",
    "Landscaping",
    "Snow removal",
    "Catering",
    "Construction",
    "Painting",
    "Lodging",
    "Other",
];

/// Column header of the backing table, in file order.
///
/// Must list the fields of [`Record`] in declaration order.
pub const COLUMNS: [&str; 26] = [
    "timestamp_utc",
    "contact_name",
    "business_name",
    "dba",
    "address",
    "website",
    "phone",
    "email",
    "naics_codes",
    "certifications",
    "certifications_other",
    "services",
    "services_other",
    "commercial_capable",
    "coverage_states_regions",
    "nationwide",
    "government_contracts",
    "commercial_projects",
    "references",
    "general_liability_limit",
    "bonding_capacity",
    "workers_comp",
    "preferred_call_date",
    "preferred_call_time",
    "notes",
    "record_id",
];

/// One stored submission: a flat row of string fields.
///
/// Columns absent from a file being read come back as empty strings, so
/// tables written before `record_id` existed still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Record {
    pub timestamp_utc: String,
    pub contact_name: String,
    pub business_name: String,
    pub dba: String,
    pub address: String,
    pub website: String,
    pub phone: String,
    pub email: String,
    pub naics_codes: String,
    pub certifications: String,
    pub certifications_other: String,
    pub services: String,
    pub services_other: String,
    pub commercial_capable: String,
    pub coverage_states_regions: String,
    pub nationwide: String,
    pub government_contracts: String,
    pub commercial_projects: String,
    pub references: String,
    pub general_liability_limit: String,
    pub bonding_capacity: String,
    pub workers_comp: String,
    pub preferred_call_date: String,
    pub preferred_call_time: String,
    pub notes: String,
    pub record_id: String,
}

impl Record {
    /// Stable identifier, if this row has a well-formed one.
    pub fn id(&self) -> Option<Uuid> {
        Uuid::parse_str(self.record_id.trim()).ok()
    }
}

/// Answer to a yes/no radio question.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum YesNo {
    #[default]
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "Yes",
            YesNo::No => "No",
        }
    }
}

/// Raw form payload as posted by the portal page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SubmissionForm {
    pub contact_name: String,
    pub business_name: String,
    pub dba: String,
    pub address: String,
    pub website: String,
    pub phone: String,
    pub email: String,
    pub naics_codes: String,
    pub certifications: Vec<String>,
    pub certifications_other: String,
    pub services: Vec<String>,
    pub services_other: String,
    pub commercial_capable: YesNo,
    pub coverage_states_regions: String,
    pub nationwide: YesNo,
    pub government_contracts: String,
    pub commercial_projects: String,
    pub references: String,
    pub general_liability_limit: String,
    pub bonding_capacity: String,
    pub workers_comp: YesNo,
    /// `YYYY-MM-DD`; defaults to the submission date.
    pub preferred_call_date: Option<String>,
    /// `HH:MM`; defaults to the submission time.
    pub preferred_call_time: Option<String>,
    pub notes: String,
}

/// A form that cannot be stored as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    /// Labels of required fields left blank.
    pub missing: Vec<&'static str>,
    /// Human readable problems with fields that were filled in.
    pub invalid: Vec<String>,
}

impl ValidationError {
    fn is_empty(&self) -> bool {
        self.missing.is_empty() && self.invalid.is_empty()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if !self.missing.is_empty() {
            parts.push(format!(
                "Please complete the following required fields: {}",
                self.missing.join(", ")
            ));
        }
        if !self.invalid.is_empty() {
            parts.push(self.invalid.join("; "));
        }
        write!(f, "{}", parts.join(". "))
    }
}

impl std::error::Error for ValidationError {}

impl SubmissionForm {
    /// Check required fields and constrained values.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut error = ValidationError::default();

        if self.business_name.trim().is_empty() {
            error.missing.push("Legal business name");
        }
        if self.phone.trim().is_empty() {
            error.missing.push("Phone");
        }
        if self.email.trim().is_empty() {
            error.missing.push("Email");
        }

        for cert in &self.certifications {
            if !CERTIFICATION_OPTIONS.contains(&cert.as_str()) {
                error.invalid.push(format!("Unknown certification: {cert}"));
            }
        }
        for service in &self.services {
            if !SERVICE_OPTIONS.contains(&service.as_str()) {
                error.invalid.push(format!("Unknown service: {service}"));
            }
        }

        if let Some(date) = non_blank(&self.preferred_call_date) {
            if NaiveDate::parse_from_str(date, "%Y-%m-%d").is_err() {
                error
                    .invalid
                    .push(format!("Preferred call date must be YYYY-MM-DD, got {date}"));
            }
        }
        if let Some(time) = non_blank(&self.preferred_call_time) {
            if NaiveTime::parse_from_str(time, "%H:%M").is_err() {
                error
                    .invalid
                    .push(format!("Preferred call time must be HH:MM, got {time}"));
            }
        }

        if error.is_empty() {
            Ok(())
        } else {
            Err(error)
        }
    }

    /// Validate and flatten into a storable row stamped at `now`.
    pub fn into_record(self, now: DateTime<Utc>) -> Result<Record, ValidationError> {
        self.validate()?;

        let preferred_call_date = non_blank(&self.preferred_call_date)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .unwrap_or_else(|| now.date_naive())
            .format("%Y-%m-%d")
            .to_string();
        let preferred_call_time = non_blank(&self.preferred_call_time)
            .and_then(|t| NaiveTime::parse_from_str(t, "%H:%M").ok())
            .unwrap_or_else(|| now.time())
            .format("%H:%M")
            .to_string();

        Ok(Record {
            timestamp_utc: now.format(TIMESTAMP_FORMAT).to_string(),
            contact_name: self.contact_name,
            business_name: self.business_name,
            dba: self.dba,
            address: self.address,
            website: self.website,
            phone: self.phone,
            email: self.email,
            naics_codes: self.naics_codes,
            certifications: self.certifications.join(", "),
            certifications_other: self.certifications_other,
            services: self.services.join(", "),
            services_other: self.services_other,
            commercial_capable: self.commercial_capable.as_str().to_string(),
            coverage_states_regions: self.coverage_states_regions,
            nationwide: self.nationwide.as_str().to_string(),
            government_contracts: self.government_contracts,
            commercial_projects: self.commercial_projects,
            references: self.references,
            general_liability_limit: self.general_liability_limit,
            bonding_capacity: self.bonding_capacity,
            workers_comp: self.workers_comp.as_str().to_string(),
            preferred_call_date,
            preferred_call_time,
            notes: self.notes,
            record_id: Uuid::new_v4().to_string(),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
