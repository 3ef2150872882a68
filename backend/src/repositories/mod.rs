//! Data access layer. All SQL for the service lives here.

pub mod user_repository;
