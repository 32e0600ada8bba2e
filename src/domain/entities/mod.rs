//! Core domain entities.
//!
//! Entities follow the "New Type" pattern with a separate struct for creation:
//! [`NewReferralCode`] carries the caller-supplied fields, while
//! [`ReferralCode`] is the stored record with its store-assigned identity.

pub mod referral_code;

pub use referral_code::{NewReferralCode, ReferralCode, ReferralCodeStats};
