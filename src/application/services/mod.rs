//! Business logic services for the application layer.

pub mod referral_code_service;

pub use referral_code_service::{DEFAULT_REFERRAL_CODES, ReferralCodeService};
