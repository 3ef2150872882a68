//! Authentication module for managing user accounts and stateless sessions.
//!
//! This module provides the public interface for authentication-related
//! functionality such as signup, signin, token issuance, and the
//! authorization middleware that guards protected routes.

pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod service;
