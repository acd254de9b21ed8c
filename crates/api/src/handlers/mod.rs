//! HTTP request handlers, one module per resource.

pub mod contact;
pub mod pages;
pub mod registration;
