//! Application layer services implementing business logic.
//!
//! Services consume repository traits and provide a clean API for HTTP
//! handlers, the startup bootstrap and the admin CLI.
//!
//! # Available Services
//!
//! - [`services::referral_code_service::ReferralCodeService`] - Referral code
//!   management, validation, usage tracking and default seeding

pub mod services;
