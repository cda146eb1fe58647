use async_trait::async_trait;

/// Profile fields extracted from a completed provider sign-in.
#[derive(Debug, Clone)]
pub struct ProviderProfile {
    pub name: String,
    pub email: String,
    pub photo: Option<String>,
}

/// Identity-provider popup flow. The implementation opens the provider
/// window and resolves once the user finishes or cancels; cancellation
/// surfaces as an error.
#[async_trait]
pub trait ProviderPopup {
    async fn sign_in(&self) -> anyhow::Result<ProviderProfile>;
}
