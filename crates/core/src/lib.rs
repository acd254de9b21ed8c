//! Domain logic for the KVP site backend.
//!
//! Pure validation and formatting rules for the contact form, the event
//! registration form with its CSV export, and the hierarchical page tree.
//! This crate has no database or HTTP dependencies; persistence is reached
//! only through the [`page::PageStore`] trait.

pub mod contact;
pub mod csv_export;
pub mod error;
pub mod page;
pub mod registration;
pub mod types;
pub mod validation;
