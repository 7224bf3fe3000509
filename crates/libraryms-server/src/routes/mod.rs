//! HTTP route handlers for `LibraryMS`.
//!
//! Routes are organized by form:
//! - `contact`: contact form relay (`POST /api/contact`)
//! - `subscribe`: newsletter footer relay (`POST /api/subscribe`)
//! - `faq`: FAQ search (`GET /api/faq`)

pub mod contact;
pub mod faq;
pub mod subscribe;
