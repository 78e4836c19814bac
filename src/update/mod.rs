mod auth;
mod playlists;
mod songs;
mod sunday;
mod ui;

use crate::{
    command::Command,
    events::{Event, Response},
    gateway::Failure,
    model::{AppState, Credentials, SESSION_EXPIRED},
    types::unix_now,
};
use log::{debug, info};

/// Main update dispatcher - routes events to domain-specific handlers
pub fn update(event: Event, state: &mut AppState) -> Command {
    match event {
        // Navigation and UI actions domain
        Event::Enter { .. }
        | Event::Reload
        | Event::RequestConfirm(_)
        | Event::Confirm
        | Event::CancelConfirm
        | Event::DismissFlash
        | Event::StaleAction => ui::handle(event, state),

        // Authentication domain
        Event::Restore(_) | Event::SignIn { .. } | Event::SignUp { .. } | Event::SignOut => {
            auth::handle(event, state)
        }

        // Songs domain
        Event::Search(_)
        | Event::ClearSearch
        | Event::PlayVideo(_)
        | Event::CloseVideo
        | Event::ShowAddSongForm
        | Event::HideAddSongForm
        | Event::SubmitSong { .. }
        | Event::EditSong(_)
        | Event::CancelEdit
        | Event::SaveSong(_)
        | Event::DeleteSong(_)
        | Event::SaveComment { .. } => songs::handle(event, state),

        // Sunday services domain
        Event::AddToService { .. } | Event::RemoveFromService { .. } => {
            sunday::handle(event, state)
        }

        // Playlists domain
        Event::OpenPlaylistPicker(_)
        | Event::ClosePlaylistPicker
        | Event::AddToPlaylist { .. }
        | Event::RemoveFromPlaylist { .. }
        | Event::NewPlaylist
        | Event::EditPlaylist(_)
        | Event::CancelPlaylistForm
        | Event::SavePlaylist(_)
        | Event::DeletePlaylist(_) => playlists::handle(event, state),

        Event::Response(token, response) => {
            if !state.inflight.settle(token) {
                debug!("ignoring superseded {:?} response", token.class);
                return Command::Done;
            }

            respond(response, state)
        }
    }
}

fn respond(response: Response, state: &mut AppState) -> Command {
    match response {
        Response::SignedIn(_)
        | Response::SignedUp(_)
        | Response::SignedOut(_)
        | Response::SessionChecked(_) => auth::respond(response, state),

        Response::SongsLoaded(_)
        | Response::SongAdded { .. }
        | Response::SongUpdated(_)
        | Response::SongDeleted(_)
        | Response::CommentSaved(_) => songs::respond(response, state),

        Response::SundayLoaded(_)
        | Response::AddedToService { .. }
        | Response::RemovedFromService(_) => sunday::respond(response, state),

        Response::PlaylistsLoaded(_)
        | Response::AddedToPlaylist(_)
        | Response::RemovedFromPlaylist(_)
        | Response::PlaylistSaved { .. }
        | Response::PlaylistDeleted(_) => playlists::respond(response, state),
    }
}

/// Flash an "Error <doing>: <message>" alert and re-render. A rejected
/// access token signs the user out instead.
fn fail(state: &mut AppState, doing: &str, failure: &Failure) -> Command {
    if failure.is_auth_rejection() && state.session.is_some() {
        info!("access token rejected while {doing}: {}", failure.message);
        state.sign_out();
        state.flash_error(SESSION_EXPIRED);
        return Command::Render;
    }

    state.flash_error(format!("Error {doing}: {}", failure.message));
    Command::Render
}

/// Remote data changed: flag every page for reload and refresh the current one
fn changed(state: &mut AppState) -> Command {
    state.invalidate();
    Command::Refresh
}

/// Mutations need a signed-in user with a live session; flash `message`
/// otherwise
fn require_credentials(state: &mut AppState, message: &str) -> Result<Credentials, Command> {
    if state.expire_session(unix_now()) {
        return Err(Command::Render);
    }

    state.credentials().ok_or_else(|| {
        state.flash_error(message);
        Command::Render
    })
}
