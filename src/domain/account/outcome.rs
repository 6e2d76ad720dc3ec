//! Result of an account operation

use super::view::View;
use crate::domain::session::Session;

/// How the request should be answered
#[derive(Debug, Clone, PartialEq)]
pub enum AccountResponse {
    /// Redirect to a path and stop
    Redirect(&'static str),
    /// Answer with the originating form
    Rerender(View),
}

/// The response plus the session as it stands after the operation
#[derive(Debug, Clone, PartialEq)]
pub struct AccountOutcome {
    pub session: Session,
    pub response: AccountResponse,
}

impl AccountOutcome {
    pub fn redirect(session: Session, path: &'static str) -> Self {
        Self {
            session,
            response: AccountResponse::Redirect(path),
        }
    }

    pub fn rerender(session: Session, view: View) -> Self {
        Self {
            session,
            response: AccountResponse::Rerender(view),
        }
    }

    pub fn redirect_path(&self) -> Option<&'static str> {
        match self.response {
            AccountResponse::Redirect(path) => Some(path),
            AccountResponse::Rerender(_) => None,
        }
    }

    pub fn view(&self) -> Option<&View> {
        match &self.response {
            AccountResponse::Rerender(view) => Some(view),
            AccountResponse::Redirect(_) => None,
        }
    }
}
