use super::{changed, fail, require_credentials};
use crate::{
    command::{Command, Request},
    events::{Event, Response},
    model::{AppState, OperationClass},
    services::ALREADY_IN_PLAYLIST,
};

pub(super) fn load(state: &mut AppState) -> Command {
    let first = !state.sunday.status.initialized;
    state.sunday.status.start_loading();

    let token = state.inflight.issue(OperationClass::LoadSunday);
    let request = Command::Request(
        token,
        Request::LoadSunday {
            credentials: state.credentials(),
            names: state.settings.sunday.clone(),
        },
    );

    if first {
        Command::Render.and(request)
    } else {
        request
    }
}

/// Handle Sunday service playlist events
pub fn handle(event: Event, state: &mut AppState) -> Command {
    let credentials = match require_credentials(state, "Please login to manage Sunday playlists.")
    {
        Ok(credentials) => credentials,
        Err(command) => return command,
    };
    let names = state.settings.sunday.clone();
    let token = state.inflight.issue(OperationClass::Membership);

    match event {
        Event::AddToService { service, song_id } => Command::Request(
            token,
            Request::AddToService {
                credentials,
                names,
                service,
                song_id,
            },
        ),

        Event::RemoveFromService { service, song_id } => Command::Request(
            token,
            Request::RemoveFromService {
                credentials,
                names,
                service,
                song_id,
            },
        ),

        _ => unreachable!("Non-Sunday event passed to Sunday handler"),
    }
}

pub fn respond(response: Response, state: &mut AppState) -> Command {
    match response {
        Response::SundayLoaded(Ok(services)) => {
            state.sunday.services = services;
            state.sunday.status.stop_loading();
            Command::Render
        }
        Response::SundayLoaded(Err(failure)) => {
            state
                .sunday
                .status
                .set_error(format!("Error loading Sunday services: {}", failure.message));
            Command::Render
        }

        Response::AddedToService {
            service,
            result: Ok(()),
        } => {
            let name = state.settings.sunday.name(service).to_string();
            state.flash_success(format!("Song added to {name}."));
            changed(state)
        }
        Response::AddedToService {
            result: Err(failure),
            ..
        } => {
            if failure.is_unique_violation() {
                state.flash_error(ALREADY_IN_PLAYLIST);
                return Command::Render;
            }
            fail(state, "adding song to Sunday playlist", &failure)
        }

        Response::RemovedFromService(Ok(())) => changed(state),
        Response::RemovedFromService(Err(failure)) => {
            fail(state, "removing song from Sunday playlist", &failure)
        }

        _ => unreachable!("Non-Sunday response passed to Sunday handler"),
    }
}
