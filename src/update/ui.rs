use super::{playlists, songs, sunday};
use crate::{
    command::Command,
    events::Event,
    model::{AddSongView, AppState},
    router::Route,
    types::unix_now,
};

/// Handle navigation and UI-related events (messages, confirmations)
pub fn handle(event: Event, state: &mut AppState) -> Command {
    match event {
        Event::Enter {
            route,
            changed,
            by_user,
        } => enter(route, changed, by_user, state),

        Event::Reload => {
            state.clear_flash();
            state.invalidate();
            Command::Refresh
        }

        Event::RequestConfirm(confirmation) => {
            state.confirm = Some(confirmation);
            Command::Render
        }

        Event::Confirm => match state.confirm.take() {
            Some(confirmation) => super::update(Event::from(confirmation), state),
            None => Command::Render,
        },

        Event::CancelConfirm => {
            state.confirm = None;
            Command::Render
        }

        Event::DismissFlash => {
            state.clear_flash();
            Command::Render
        }

        Event::StaleAction => {
            state.flash_error("That control is no longer available. Please try again.");
            Command::Render
        }

        _ => unreachable!("Non-UI event passed to UI handler"),
    }
}

/// Entry into a route. A fresh entry by the user clears messages and
/// dialogs; data backed pages load when new to the route or stale. An
/// expired session is dropped before anything is requested with it.
fn enter(route: Route, changed: bool, by_user: bool, state: &mut AppState) -> Command {
    if changed && by_user {
        state.clear_flash();
        state.confirm = None;
    }
    state.expire_session(unix_now());
    if changed {
        state.songs.active_video = None;
        state.songs.picking_for = None;
    }

    if route.requires_session() && state.session.is_none() {
        return Command::Render;
    }

    match route {
        Route::Songs if changed || state.songs.status.needs_load() => songs::load(state),
        Route::Playlists if changed || state.playlists.status.needs_load() => {
            playlists::load(state)
        }
        Route::SundayServices if changed || state.sunday.status.needs_load() => {
            sunday::load(state)
        }
        Route::AddSong if changed => {
            state.add_song = AddSongView::default();
            Command::Render
        }
        _ => Command::Render,
    }
}
