//! Core library for `LibraryMS` site services.
//!
//! Contains the cookie consent store, the contact and subscription relay
//! payloads with their email rendering, the [`mail::Mailer`] boundary, and the
//! FAQ catalog. This crate depends on `libraryms-storage` for the storage
//! trait and knows nothing about HTTP.

pub mod consent;
pub mod contact;
pub mod error;
pub mod faq;
pub mod mail;
pub mod subscription;
