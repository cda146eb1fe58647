use std::time::Duration;

use async_trait::async_trait;
use tracing::error;

use crate::client::api::{AuthClient, ClientError};
use crate::client::form::{FieldErrors, LoginForm};
use crate::client::provider::ProviderPopup;
use crate::users::dto::{AuthMethod, LoginRequest, ProviderLoginRequest, SafeUser};

/// Destinations the screen navigates to after a successful login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
}

/// Dismissible, auto-expiring failure notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub duration: Duration,
    pub dismissible: bool,
}

impl Toast {
    pub fn error(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            duration: Duration::from_secs(5),
            dismissible: true,
        }
    }
}

/// What a submission resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Local validation failed; no request was made.
    Rejected(FieldErrors),
    Redirect(Route),
    Notify(Toast),
}

/// Remote dispatch seam between the screen and the auth API.
#[async_trait]
pub trait LoginDispatch {
    async fn login(&self, request: &LoginRequest) -> Result<SafeUser, ClientError>;
    async fn login_with_provider(
        &self,
        request: &ProviderLoginRequest,
    ) -> Result<SafeUser, ClientError>;
}

#[async_trait]
impl LoginDispatch for AuthClient {
    async fn login(&self, request: &LoginRequest) -> Result<SafeUser, ClientError> {
        AuthClient::login(self, request).await
    }

    async fn login_with_provider(
        &self,
        request: &ProviderLoginRequest,
    ) -> Result<SafeUser, ClientError> {
        AuthClient::login_with_provider(self, request).await
    }
}

/// Login screen state machine: idle, submitting, then an outcome the UI
/// acts on (redirect or toast).
pub struct LoginScreen<D> {
    dispatch: D,
    pub form: LoginForm,
    pub submitting: bool,
}

impl<D: LoginDispatch> LoginScreen<D> {
    pub fn new(dispatch: D) -> Self {
        Self {
            dispatch,
            form: LoginForm::default(),
            submitting: false,
        }
    }

    /// Validate locally, then dispatch the login action. Field errors stop
    /// the submission before any network call.
    pub async fn submit(&mut self) -> SubmitOutcome {
        let errors = self.form.validate();
        if !errors.is_empty() {
            return SubmitOutcome::Rejected(errors);
        }

        self.submitting = true;
        let result = self.dispatch.login(&self.form.to_request()).await;
        self.submitting = false;

        match result {
            Ok(_) => {
                self.form.reset();
                SubmitOutcome::Redirect(Route::Dashboard)
            }
            Err(err) => SubmitOutcome::Notify(Toast::error(err.to_string())),
        }
    }

    /// Await the provider popup, then dispatch the same login action with
    /// the `provider` method marker.
    ///
    /// A failed or cancelled popup is only logged and yields no outcome.
    /// TODO: surface popup failures as a toast instead of swallowing them.
    pub async fn sign_in_with_provider<P: ProviderPopup>(
        &mut self,
        popup: &P,
    ) -> Option<SubmitOutcome> {
        let profile = match popup.sign_in().await {
            Ok(profile) => profile,
            Err(err) => {
                error!(error = %err, "provider sign-in failed");
                return None;
            }
        };

        let request = ProviderLoginRequest {
            name: profile.name,
            email: profile.email,
            photo: profile.photo,
            auth_method: AuthMethod::Provider,
        };

        self.submitting = true;
        let result = self.dispatch.login_with_provider(&request).await;
        self.submitting = false;

        Some(match result {
            Ok(_) => SubmitOutcome::Redirect(Route::Dashboard),
            Err(err) => SubmitOutcome::Notify(Toast::error(err.to_string())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::provider::ProviderProfile;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use uuid::Uuid;

    fn sample_user() -> SafeUser {
        SafeUser {
            id: Uuid::new_v4(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            photo: None,
            phone: None,
            bio: None,
        }
    }

    /// Dispatch double that records calls and answers from a script.
    #[derive(Default)]
    struct MockDispatch {
        calls: AtomicUsize,
        fail_with: Option<(u16, String)>,
        last_provider_request: Mutex<Option<ProviderLoginRequest>>,
    }

    impl MockDispatch {
        fn failing(status: u16, message: &str) -> Self {
            Self {
                fail_with: Some((status, message.to_string())),
                ..Self::default()
            }
        }

        fn answer(&self) -> Result<SafeUser, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.fail_with {
                Some((status, message)) => Err(ClientError::Api {
                    status: *status,
                    message: message.clone(),
                }),
                None => Ok(sample_user()),
            }
        }
    }

    #[async_trait]
    impl LoginDispatch for &MockDispatch {
        async fn login(&self, _request: &LoginRequest) -> Result<SafeUser, ClientError> {
            self.answer()
        }

        async fn login_with_provider(
            &self,
            request: &ProviderLoginRequest,
        ) -> Result<SafeUser, ClientError> {
            *self.last_provider_request.lock().unwrap() = Some(ProviderLoginRequest {
                name: request.name.clone(),
                email: request.email.clone(),
                photo: request.photo.clone(),
                auth_method: request.auth_method,
            });
            self.answer()
        }
    }

    struct FixedPopup(Option<ProviderProfile>);

    #[async_trait]
    impl ProviderPopup for FixedPopup {
        async fn sign_in(&self) -> anyhow::Result<ProviderProfile> {
            self.0
                .clone()
                .ok_or_else(|| anyhow::anyhow!("popup closed by user"))
        }
    }

    #[tokio::test]
    async fn invalid_form_never_reaches_the_network() {
        let dispatch = MockDispatch::default();
        let mut screen = LoginScreen::new(&dispatch);
        screen.form.email = "not-an-email".into();
        screen.form.password = "123".into();

        let outcome = screen.submit().await;

        match outcome {
            SubmitOutcome::Rejected(errors) => {
                assert_eq!(errors.email.as_deref(), Some("Invalid email address"));
                assert_eq!(
                    errors.password.as_deref(),
                    Some("Password must be at least 6 characters")
                );
            }
            other => panic!("expected Rejected, got {other:?}"),
        }
        assert_eq!(dispatch.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn successful_submit_redirects_and_resets_the_form() {
        let dispatch = MockDispatch::default();
        let mut screen = LoginScreen::new(&dispatch);
        screen.form.email = "ada@example.com".into();
        screen.form.password = "secret1".into();

        let outcome = screen.submit().await;

        assert_eq!(outcome, SubmitOutcome::Redirect(Route::Dashboard));
        assert!(screen.form.email.is_empty());
        assert!(!screen.submitting);
        assert_eq!(dispatch.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejected_login_becomes_a_toast() {
        let dispatch = MockDispatch::failing(401, "Invalid user data");
        let mut screen = LoginScreen::new(&dispatch);
        screen.form.email = "ada@example.com".into();
        screen.form.password = "wrong-password".into();

        let outcome = screen.submit().await;

        match outcome {
            SubmitOutcome::Notify(toast) => {
                assert_eq!(toast.title, "Invalid user data");
                assert_eq!(toast.duration, Duration::from_secs(5));
                assert!(toast.dismissible);
            }
            other => panic!("expected Notify, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn cancelled_popup_is_swallowed_without_dispatch() {
        let dispatch = MockDispatch::default();
        let mut screen = LoginScreen::new(&dispatch);

        let outcome = screen.sign_in_with_provider(&FixedPopup(None)).await;

        assert!(outcome.is_none());
        assert_eq!(dispatch.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn provider_profile_dispatches_with_provider_marker() {
        let dispatch = MockDispatch::default();
        let mut screen = LoginScreen::new(&dispatch);
        let popup = FixedPopup(Some(ProviderProfile {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            photo: Some("https://example.com/ada.png".into()),
        }));

        let outcome = screen.sign_in_with_provider(&popup).await;

        assert_eq!(outcome, Some(SubmitOutcome::Redirect(Route::Dashboard)));
        let sent = dispatch.last_provider_request.lock().unwrap();
        let sent = sent.as_ref().expect("provider login dispatched");
        assert_eq!(sent.auth_method, AuthMethod::Provider);
        assert_eq!(sent.email, "ada@example.com");
    }

    #[tokio::test]
    async fn failed_provider_login_becomes_a_toast() {
        let dispatch = MockDispatch::failing(400, "Please fill in all required fields");
        let mut screen = LoginScreen::new(&dispatch);
        let popup = FixedPopup(Some(ProviderProfile {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            photo: None,
        }));

        let outcome = screen.sign_in_with_provider(&popup).await;

        match outcome {
            Some(SubmitOutcome::Notify(toast)) => {
                assert_eq!(toast.title, "Please fill in all required fields");
            }
            other => panic!("expected Notify, got {other:?}"),
        }
    }
}
