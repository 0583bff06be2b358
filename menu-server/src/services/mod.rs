//! Business logic shared by the HTTP handlers

pub mod accounts;
pub mod assembly;
pub mod library;
