//! Account workflow: registration, login and logout

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::account::{
    AccountOutcome, FormEcho, FormErrors, FormField, LoginForm, RegistrationForm, View, ViewName,
    DASHBOARD_PATH, EMAIL_TAKEN, HOME_PATH, INCORRECT_CREDENTIALS, LOGIN_PATH,
};
use crate::domain::session::{Session, SessionUser};
use crate::domain::user::{NewUser, UserRepository};
use crate::domain::DomainError;

use super::password::PasswordHasher;

/// Drives the account pages against a user store and a password hasher
///
/// User-input failures come back as [`AccountOutcome`] re-renders. Only store
/// and hashing failures are returned as `Err`.
#[derive(Debug)]
pub struct AccountService<R: UserRepository, H: PasswordHasher> {
    repository: Arc<R>,
    hasher: Arc<H>,
}

impl<R: UserRepository, H: PasswordHasher> AccountService<R, H> {
    pub fn new(repository: Arc<R>, hasher: Arc<H>) -> Self {
        Self { repository, hasher }
    }

    /// Create an account and sign it in
    pub async fn register(
        &self,
        form: RegistrationForm,
        mut session: Session,
    ) -> Result<AccountOutcome, DomainError> {
        let form = form.normalized();

        let valid = match form.validate() {
            Ok(valid) => valid,
            Err(errors) => return Ok(rerender_registration(session, &form, errors)),
        };

        if self.repository.email_exists(valid.email).await? {
            return Ok(rerender_registration(session, &form, email_taken()));
        }

        let password_hash = self.hasher.hash(valid.password)?;

        let new_user = NewUser {
            given_name: valid.given_name.to_string(),
            family_name: valid.family_name.to_string(),
            nickname: valid.nickname.to_string(),
            email: valid.email.to_string(),
            city: valid.city.map(str::to_string),
            state: valid.state.map(str::to_string),
            password_hash,
        };

        let user = match self.repository.create(new_user).await {
            Ok(user) => user,
            Err(e) if e.is_conflict() => {
                return Ok(rerender_registration(session, &form, email_taken()));
            }
            Err(e) => return Err(e),
        };

        info!(user_id = %user.id(), "Account registered");

        session.set_user(SessionUser::from_registration(&user));
        Ok(AccountOutcome::redirect(session, HOME_PATH))
    }

    /// Check credentials and sign the user in
    pub async fn authenticate(
        &self,
        form: LoginForm,
        mut session: Session,
    ) -> Result<AccountOutcome, DomainError> {
        let form = form.normalized();

        let valid = match form.validate() {
            Ok(valid) => valid,
            Err(errors) => return Ok(rerender_login(session, &form, errors)),
        };

        let user = match self.repository.find_by_email(valid.email).await? {
            Some(user) if self.hasher.verify(valid.password, user.password_hash()) => user,
            _ => {
                warn!("Rejected login attempt");
                return Ok(rerender_login(session, &form, incorrect_credentials()));
            }
        };

        info!(user_id = %user.id(), "User logged in");

        session.set_user(SessionUser::from_login(&user));
        Ok(AccountOutcome::redirect(session, DASHBOARD_PATH))
    }

    /// Drop all session state; succeeds whether or not anyone was signed in
    pub fn logout(&self, mut session: Session) -> AccountOutcome {
        if let Some(user) = session.user() {
            info!(user_id = %user.id, "User logged out");
        }

        session.clear_all();
        AccountOutcome::redirect(session, LOGIN_PATH)
    }

    /// Number of stored accounts
    pub async fn user_count(&self) -> Result<usize, DomainError> {
        self.repository.count().await
    }
}

fn email_taken() -> FormErrors {
    FormErrors::from_iter([(FormField::Email, EMAIL_TAKEN.to_string())])
}

fn incorrect_credentials() -> FormErrors {
    FormErrors::from_iter([(FormField::Email, INCORRECT_CREDENTIALS.to_string())])
}

fn rerender_registration(
    session: Session,
    form: &RegistrationForm,
    errors: FormErrors,
) -> AccountOutcome {
    let view = View::new(ViewName::Register)
        .with_errors(errors)
        .with_user(FormEcho::from_registration(form))
        .with_current_user(session.user().cloned());

    AccountOutcome::rerender(session, view)
}

fn rerender_login(session: Session, form: &LoginForm, errors: FormErrors) -> AccountOutcome {
    let view = View::new(ViewName::Login)
        .with_errors(errors)
        .with_user(FormEcho::from_login(form))
        .with_current_user(session.user().cloned());

    AccountOutcome::rerender(session, view)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::account::{INVALID_PASSWORD, INVALID_REGISTRATION_EMAIL, PASSWORD_MISMATCH};
    use crate::domain::session::SessionChange;
    use crate::domain::user::MockUserRepository;
    use crate::infrastructure::user::Argon2Hasher;

    fn create_service() -> (
        AccountService<MockUserRepository, Argon2Hasher>,
        Arc<MockUserRepository>,
    ) {
        let repo = Arc::new(MockUserRepository::new());
        let service = AccountService::new(repo.clone(), Arc::new(Argon2Hasher::new()));
        (service, repo)
    }

    fn registration(email: &str, password: &str, confirmation: &str) -> RegistrationForm {
        RegistrationForm {
            given_name: Some("Jo".to_string()),
            family_name: Some("Lee".to_string()),
            nickname: Some(String::new()),
            email: Some(email.to_string()),
            city: Some("Portland".to_string()),
            state: Some("OR".to_string()),
            password: Some(password.to_string()),
            password_confirmation: Some(confirmation.to_string()),
        }
    }

    fn login(email: &str, password: &str) -> LoginForm {
        LoginForm {
            email: Some(email.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let (service, repo) = create_service();

        let outcome = service
            .register(
                registration("jo@example.com", "secret1", "secret1"),
                Session::anonymous(),
            )
            .await
            .unwrap();

        assert_eq!(outcome.redirect_path(), Some("/"));
        assert_eq!(outcome.session.change(), SessionChange::Established);

        let user = outcome.session.user().unwrap();
        assert_eq!(user.nickname.as_deref(), Some("Jo"));
        assert_eq!(user.family_name.as_deref(), Some("Lee"));
        assert_eq!(user.email, "jo@example.com");
        assert_eq!(user.city.as_deref(), Some("Portland"));

        let stored = repo.find_by_email("jo@example.com").await.unwrap().unwrap();
        assert_eq!(stored.nickname(), "Jo");
        assert_eq!(stored.id(), user.id);
    }

    #[tokio::test]
    async fn test_register_missing_nickname_defaults_to_given_name() {
        let (service, repo) = create_service();
        let mut form = registration("jo@example.com", "secret1", "secret1");
        form.nickname = None;

        service.register(form, Session::anonymous()).await.unwrap();

        let stored = repo.find_by_email("jo@example.com").await.unwrap().unwrap();
        assert_eq!(stored.nickname(), "Jo");
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_plaintext() {
        let (service, repo) = create_service();

        service
            .register(
                registration("jo@example.com", "secret1", "secret1"),
                Session::anonymous(),
            )
            .await
            .unwrap();

        let stored = repo.find_by_email("jo@example.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash(), "secret1");
        assert!(Argon2Hasher::new().verify("secret1", stored.password_hash()));
    }

    #[tokio::test]
    async fn test_register_short_password() {
        let (service, repo) = create_service();

        let outcome = service
            .register(
                registration("jo@example.com", "abc", "abc"),
                Session::anonymous(),
            )
            .await
            .unwrap();

        let view = outcome.view().unwrap();
        assert_eq!(view.name, ViewName::Register);
        assert_eq!(view.error(FormField::Password), Some(INVALID_PASSWORD));
        assert!(view.error(FormField::PasswordConfirmation).is_none());

        let echo = view.user.as_ref().unwrap();
        assert_eq!(echo.email.as_deref(), Some("jo@example.com"));
        assert_eq!(echo.nickname.as_deref(), Some("Jo"));

        assert_eq!(outcome.session.change(), SessionChange::Unchanged);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_accumulates_errors() {
        let (service, _) = create_service();

        let outcome = service
            .register(
                registration("not-an-email", "secret1", "secret2"),
                Session::anonymous(),
            )
            .await
            .unwrap();

        let errors = outcome.view().unwrap().errors.as_ref().unwrap();
        assert_eq!(errors.get(FormField::Email), Some(INVALID_REGISTRATION_EMAIL));
        assert_eq!(
            errors.get(FormField::PasswordConfirmation),
            Some(PASSWORD_MISMATCH)
        );
        assert_eq!(errors.len(), 2);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let (service, repo) = create_service();
        let form = registration("jo@example.com", "secret1", "secret1");

        service
            .register(form.clone(), Session::anonymous())
            .await
            .unwrap();
        let outcome = service.register(form, Session::anonymous()).await.unwrap();

        let view = outcome.view().unwrap();
        assert_eq!(view.error(FormField::Email), Some(EMAIL_TAKEN));
        assert!(!outcome.session.is_authenticated());
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_register_conflict_at_insert_reported_as_duplicate() {
        let (service, repo) = create_service();
        service
            .register(
                registration("jo@example.com", "secret1", "secret1"),
                Session::anonymous(),
            )
            .await
            .unwrap();
        repo.set_stale_reads(true).await;

        let outcome = service
            .register(
                registration("jo@example.com", "secret1", "secret1"),
                Session::anonymous(),
            )
            .await
            .unwrap();

        assert_eq!(
            outcome.view().unwrap().error(FormField::Email),
            Some(EMAIL_TAKEN)
        );
        assert_eq!(outcome.session.change(), SessionChange::Unchanged);
    }

    #[tokio::test]
    async fn test_register_store_failure_propagates() {
        let (service, repo) = create_service();
        repo.set_should_fail(true).await;

        let result = service
            .register(
                registration("jo@example.com", "secret1", "secret1"),
                Session::anonymous(),
            )
            .await;

        assert!(matches!(result, Err(DomainError::Storage { .. })));
    }

    #[tokio::test]
    async fn test_register_then_authenticate() {
        let (service, _) = create_service();
        service
            .register(
                registration("jo@example.com", "secret1", "secret1"),
                Session::anonymous(),
            )
            .await
            .unwrap();

        let outcome = service
            .authenticate(login("jo@example.com", "secret1"), Session::anonymous())
            .await
            .unwrap();

        assert_eq!(outcome.redirect_path(), Some("/dashboard"));
        let user = outcome.session.user().unwrap();
        assert_eq!(user.email, "jo@example.com");
        assert_eq!(user.given_name, "Jo");
        assert!(user.family_name.is_none());
        assert_eq!(user.state.as_deref(), Some("OR"));
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let (service, _) = create_service();

        let outcome = service
            .authenticate(login("ghost@example.com", "secret1"), Session::anonymous())
            .await
            .unwrap();

        let view = outcome.view().unwrap();
        assert_eq!(view.name, ViewName::Login);
        assert_eq!(view.error(FormField::Email), Some(INCORRECT_CREDENTIALS));
        assert!(!outcome.session.is_authenticated());
    }

    #[tokio::test]
    async fn test_unknown_email_and_wrong_password_are_identical() {
        let (service, _) = create_service();
        service
            .register(
                registration("jo@example.com", "secret1", "secret1"),
                Session::anonymous(),
            )
            .await
            .unwrap();

        let wrong_password = service
            .authenticate(login("jo@example.com", "secret2"), Session::anonymous())
            .await
            .unwrap();
        let unknown = service
            .authenticate(login("ghost@example.com", "secret2"), Session::anonymous())
            .await
            .unwrap();

        assert_eq!(
            wrong_password.view().unwrap().errors,
            unknown.view().unwrap().errors
        );
    }

    #[tokio::test]
    async fn test_authenticate_shape_errors_skip_lookup() {
        let (service, repo) = create_service();
        repo.set_should_fail(true).await;

        let outcome = service
            .authenticate(login("nope", "abc"), Session::anonymous())
            .await
            .unwrap();

        let errors = outcome.view().unwrap().errors.as_ref().unwrap();
        assert!(errors.contains(FormField::Email));
        assert!(errors.contains(FormField::Password));
    }

    #[tokio::test]
    async fn test_authenticate_echoes_email_only() {
        let (service, _) = create_service();

        let outcome = service
            .authenticate(login("ghost@example.com", "secret1"), Session::anonymous())
            .await
            .unwrap();

        let echo = outcome.view().unwrap().user.as_ref().unwrap();
        assert_eq!(echo.email.as_deref(), Some("ghost@example.com"));
        assert!(echo.given_name.is_none());
    }

    #[tokio::test]
    async fn test_logout_without_session() {
        let (service, _) = create_service();

        let outcome = service.logout(Session::anonymous());

        assert_eq!(outcome.redirect_path(), Some("/auth/login"));
        assert_eq!(outcome.session.change(), SessionChange::Cleared);
        assert!(outcome.session.user().is_none());
    }

    #[tokio::test]
    async fn test_logout_clears_user() {
        let (service, _) = create_service();
        let registered = service
            .register(
                registration("jo@example.com", "secret1", "secret1"),
                Session::anonymous(),
            )
            .await
            .unwrap();

        let outcome = service.logout(registered.session);

        assert!(!outcome.session.is_authenticated());
        assert_eq!(outcome.session.change(), SessionChange::Cleared);
    }

    #[tokio::test]
    async fn test_user_count() {
        let (service, _) = create_service();
        assert_eq!(service.user_count().await.unwrap(), 0);

        service
            .register(
                registration("jo@example.com", "secret1", "secret1"),
                Session::anonymous(),
            )
            .await
            .unwrap();

        assert_eq!(service.user_count().await.unwrap(), 1);
    }
}
