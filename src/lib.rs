//! Alcohol Label Verification
//!
//! Compares the label metadata an applicant submits (brand name, product
//! type, alcohol content, net contents) against the same fields read from a
//! photograph of the physical label, and reports a per-field and overall
//! verdict. The matching engine lives in [`services::validation`]; the HTTP
//! surface in [`routes`] wraps it behind a multipart upload endpoint.

pub mod app_state;
pub mod config;
pub mod models;
pub mod routes;
pub mod services;
