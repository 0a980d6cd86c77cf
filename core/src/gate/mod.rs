//! The two policy gates around content generation.

mod authorization;
mod compliance;

pub use authorization::{
    Authorization, AuthorizationGate, REASON_NOT_OPTED_IN, REASON_NO_PERMISSION,
    REASON_SERVICE_UNAVAILABLE,
};
pub use compliance::{ComplianceGate, COMPLIANCE_MODE_KEY, DISCLAIMER};
