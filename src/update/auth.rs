use super::fail;
use crate::{
    command::{Command, Request},
    events::{Event, Response},
    model::{AppState, OperationClass},
    router::Route,
    types::unix_now,
};
use log::{debug, info};

const MIN_PASSWORD_LEN: usize = 6;

/// Handle authentication-related events
pub fn handle(event: Event, state: &mut AppState) -> Command {
    match event {
        Event::Restore(session) => {
            if session.is_expired_at(unix_now()) {
                debug!("dropping expired session");
                state.session = None;
                return Command::Done;
            }

            let access_token = session.access_token.clone();
            state.session = Some(session);
            let token = state.inflight.issue(OperationClass::Session);
            Command::Request(token, Request::GetSession { access_token })
        }

        Event::SignIn { email, password } => {
            state.auth.email = email.trim().to_string();

            if state.auth.email.is_empty() || password.is_empty() {
                state.flash_error("Please enter your email and password.");
                return Command::Render;
            }

            let token = state.inflight.issue(OperationClass::Session);
            Command::Request(
                token,
                Request::SignIn {
                    email: state.auth.email.clone(),
                    password,
                },
            )
        }

        Event::SignUp { email, password } => {
            state.auth.email = email.trim().to_string();

            if state.auth.email.is_empty() || password.is_empty() {
                state.flash_error("Please enter your email and password.");
                return Command::Render;
            }
            if password.chars().count() < MIN_PASSWORD_LEN {
                state.flash_error(format!(
                    "Password should be at least {MIN_PASSWORD_LEN} characters."
                ));
                return Command::Render;
            }

            let token = state.inflight.issue(OperationClass::Session);
            Command::Request(
                token,
                Request::SignUp {
                    email: state.auth.email.clone(),
                    password,
                },
            )
        }

        Event::SignOut => {
            // an expired token cannot be revoked remotely any more
            if state.expire_session(unix_now()) {
                state.clear_flash();
                return Command::Navigate(Route::Login);
            }

            match state.access_token() {
                Some(access_token) => {
                    let token = state.inflight.issue(OperationClass::Session);
                    Command::Request(token, Request::SignOut { access_token })
                }
                None => Command::Navigate(Route::Login),
            }
        }

        _ => unreachable!("Non-auth event passed to auth handler"),
    }
}

/// Handle responses of the identity provider
pub fn respond(response: Response, state: &mut AppState) -> Command {
    match response {
        Response::SessionChecked(Ok(user)) => {
            if let Some(session) = state.session.as_mut() {
                session.user = user;
            }
            Command::Done
        }
        Response::SessionChecked(Err(failure)) => {
            info!("stored session rejected: {}", failure.message);
            state.sign_out();
            Command::Done
        }

        Response::SignedIn(Ok(session)) => {
            state.session = Some(session);
            state.auth.email.clear();
            state.invalidate();
            Command::Navigate(Route::Songs)
        }
        Response::SignedIn(Err(failure)) => fail(state, "logging in", &failure),

        Response::SignedUp(Ok(_)) => {
            state.flash_success("Please check your email for verification link");
            Command::Navigate(Route::Login)
        }
        Response::SignedUp(Err(failure)) => fail(state, "signing up", &failure),

        Response::SignedOut(Ok(())) => {
            state.sign_out();
            Command::Navigate(Route::Login)
        }
        Response::SignedOut(Err(failure)) if failure.is_auth_rejection() => {
            info!("session already ended remotely: {}", failure.message);
            state.sign_out();
            Command::Navigate(Route::Login)
        }
        Response::SignedOut(Err(failure)) => fail(state, "signing out", &failure),

        _ => unreachable!("Non-auth response passed to auth handler"),
    }
}
