//! Entity services and the generic orchestration base

pub mod management;
mod tenant_service;
mod user_service;

pub use management::ManagementService;
pub use tenant_service::TenantService;
pub use user_service::UserService;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tenant_service_test;
