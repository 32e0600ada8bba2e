//! Shared application state injected into every handler.

use std::sync::Arc;

use crate::application::services::ReferralCodeService;
use crate::domain::repositories::ReferralCodeRepository;

/// Referral code service over whichever store the process was started with.
pub type SharedReferralCodeService = Arc<ReferralCodeService<dyn ReferralCodeRepository>>;

#[derive(Clone)]
pub struct AppState {
    pub referral_code_service: SharedReferralCodeService,
    /// Human-readable store name reported by the health check.
    pub storage: &'static str,
}

impl AppState {
    pub fn new(repository: Arc<dyn ReferralCodeRepository>, storage: &'static str) -> Self {
        Self {
            referral_code_service: Arc::new(ReferralCodeService::new(repository)),
            storage,
        }
    }
}
