//! HTTP request handlers for API endpoints.
//!
//! Each handler module corresponds to a logical grouping of endpoints.

pub mod health;
pub mod referral_codes;

pub use health::health_handler;
pub use referral_codes::{
    activate_referral_code_handler, create_referral_code_handler,
    deactivate_referral_code_handler, delete_referral_code_handler,
    get_referral_code_by_code_handler, get_referral_code_handler, initialize_defaults_handler,
    list_active_referral_codes_handler, list_referral_codes_handler, min_usage_handler,
    search_by_owner_handler, statistics_handler, top_referral_codes_handler,
    update_referral_code_handler, use_referral_code_handler, validate_referral_code_handler,
};
