//! Repository trait definitions for the domain layer.
//!
//! Traits define the contract for data operations; implementations live in
//! `crate::infrastructure::persistence`. Mock implementations are generated
//! via `mockall` for unit tests.
//!
//! # Available Repositories
//!
//! - [`ReferralCodeRepository`] - Referral code storage and queries
//!
//! # Testing
//!
//! See integration tests in `tests/repository_referral_code.rs`.

pub mod referral_code_repository;

pub use referral_code_repository::{DEFAULT_TOP_LIMIT, ReferralCodeRepository};

#[cfg(test)]
pub use referral_code_repository::MockReferralCodeRepository;
