use std::sync::Arc;

use healthsync_core::{Access, ConsentPrompt, ConsentPolicy, SampleType};

pub struct FixedConsent {
    grant: bool,
}

impl FixedConsent {
    pub fn grant_all() -> Self {
        Self { grant: true }
    }

    pub fn deny_all() -> Self {
        Self { grant: false }
    }
}

impl ConsentPrompt for FixedConsent {
    fn ask(&self, _sample_type: SampleType, _access: Access) -> Option<bool> {
        Some(self.grant)
    }
}

/// Never decides; used where nobody can answer a prompt.
pub struct DeferredConsent;

impl ConsentPrompt for DeferredConsent {
    fn ask(&self, _sample_type: SampleType, _access: Access) -> Option<bool> {
        None
    }
}

pub fn non_interactive_consent(policy: ConsentPolicy) -> Arc<dyn ConsentPrompt> {
    match policy {
        ConsentPolicy::Grant => Arc::new(FixedConsent::grant_all()),
        ConsentPolicy::Deny => Arc::new(FixedConsent::deny_all()),
        ConsentPolicy::Prompt => Arc::new(DeferredConsent),
    }
}
