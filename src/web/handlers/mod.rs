//! HTTP request handlers for the portal web API.

pub mod admin;
pub mod portal;
pub mod submissions;
