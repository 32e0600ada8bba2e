//! Repository implementations.
//!
//! # Repositories
//!
//! - [`PgReferralCodeRepository`] - PostgreSQL storage via SQLx
//! - [`InMemoryReferralCodeRepository`] - process-local storage, used when no
//!   database is configured

pub mod in_memory_referral_code_repository;
pub mod pg_referral_code_repository;

pub use in_memory_referral_code_repository::InMemoryReferralCodeRepository;
pub use pg_referral_code_repository::PgReferralCodeRepository;
