//! # Tenancy Core
//!
//! Domain entities, repository ports, atomic sessions, and the
//! management-service orchestration for the tenancy backend.

pub mod atomic;
pub mod domain;
pub mod dto;
pub mod error;
pub mod repositories;
pub mod services;

pub use error::{DomainError, DomainResult, ViolationCode};
