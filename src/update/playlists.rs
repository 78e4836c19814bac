use super::{changed, fail, require_credentials};
use crate::{
    command::{Command, Request},
    events::{Event, Response},
    model::{AppState, OperationClass, PlaylistForm},
    services::ALREADY_IN_PLAYLIST,
    types::PlaylistDraft,
};

pub(super) fn load(state: &mut AppState) -> Command {
    let Some(credentials) = state.credentials() else {
        return Command::Render;
    };

    let first = !state.playlists.status.initialized;
    state.playlists.status.start_loading();

    let token = state.inflight.issue(OperationClass::LoadPlaylists);
    let request = Command::Request(token, Request::LoadPlaylists { credentials });

    if first {
        Command::Render.and(request)
    } else {
        request
    }
}

/// Handle playlist events of both the playlists page and the song picker
pub fn handle(event: Event, state: &mut AppState) -> Command {
    match event {
        Event::OpenPlaylistPicker(song_id) => {
            state.songs.picking_for = Some(song_id);
            Command::Render
        }

        Event::ClosePlaylistPicker => {
            state.songs.picking_for = None;
            Command::Render
        }

        Event::AddToPlaylist {
            playlist_id,
            song_id,
        } => {
            let credentials = match require_credentials(state, "Please login to manage playlists.")
            {
                Ok(credentials) => credentials,
                Err(command) => return command,
            };

            let token = state.inflight.issue(OperationClass::Membership);
            Command::Request(
                token,
                Request::AddToPlaylist {
                    credentials,
                    playlist_id,
                    song_id,
                },
            )
        }

        Event::RemoveFromPlaylist {
            playlist_id,
            song_id,
        } => {
            let credentials = match require_credentials(state, "Please login to manage playlists.")
            {
                Ok(credentials) => credentials,
                Err(command) => return command,
            };

            let token = state.inflight.issue(OperationClass::Membership);
            Command::Request(
                token,
                Request::RemoveFromPlaylist {
                    credentials,
                    playlist_id,
                    song_id,
                },
            )
        }

        Event::NewPlaylist => {
            state.playlists.form = Some(PlaylistForm::default());
            Command::Render
        }

        Event::EditPlaylist(id) => {
            state.playlists.form = state.playlists.playlist(&id).map(|loaded| PlaylistForm {
                editing: Some(loaded.playlist.id.clone()),
                draft: PlaylistDraft {
                    name: loaded.playlist.name.clone(),
                    description: loaded.playlist.description.clone().unwrap_or_default(),
                },
            });
            Command::Render
        }

        Event::CancelPlaylistForm => {
            state.playlists.form = None;
            Command::Render
        }

        Event::SavePlaylist(draft) => {
            let form = state.playlists.form.get_or_insert_with(PlaylistForm::default);
            form.draft = draft.clone();
            let editing = form.editing.clone();

            let credentials = match require_credentials(state, "Please login to manage playlists.")
            {
                Ok(credentials) => credentials,
                Err(command) => return command,
            };
            if let Err(message) = draft.validate() {
                state.flash_error(message);
                return Command::Render;
            }

            let token = state.inflight.issue(OperationClass::SavePlaylist);
            let request = match editing {
                Some(playlist_id) => Request::UpdatePlaylist {
                    credentials,
                    playlist_id,
                    draft,
                },
                None => Request::CreatePlaylist { credentials, draft },
            };
            Command::Request(token, request)
        }

        Event::DeletePlaylist(playlist_id) => {
            let credentials = match require_credentials(state, "Please login to manage playlists.")
            {
                Ok(credentials) => credentials,
                Err(command) => return command,
            };

            let token = state.inflight.issue(OperationClass::DeletePlaylist);
            Command::Request(
                token,
                Request::DeletePlaylist {
                    credentials,
                    playlist_id,
                },
            )
        }

        _ => unreachable!("Non-playlist event passed to playlists handler"),
    }
}

pub fn respond(response: Response, state: &mut AppState) -> Command {
    match response {
        Response::PlaylistsLoaded(Ok(playlists)) => {
            state.playlists.playlists = playlists;
            state.playlists.status.stop_loading();
            Command::Render
        }
        Response::PlaylistsLoaded(Err(failure)) => {
            state
                .playlists
                .status
                .set_error(format!("Error loading playlists: {}", failure.message));
            Command::Render
        }

        Response::AddedToPlaylist(Ok(())) => {
            state.songs.picking_for = None;
            state.flash_success("Song added to playlist successfully!");
            changed(state)
        }
        Response::AddedToPlaylist(Err(failure)) => {
            if failure.is_unique_violation() {
                state.flash_error(ALREADY_IN_PLAYLIST);
                return Command::Render;
            }
            fail(state, "adding song to playlist", &failure)
        }

        Response::RemovedFromPlaylist(Ok(())) => changed(state),
        Response::RemovedFromPlaylist(Err(failure)) => {
            fail(state, "removing song from playlist", &failure)
        }

        Response::PlaylistSaved {
            created,
            result: Ok(()),
        } => {
            state.playlists.form = None;
            state.flash_success(if created {
                "Playlist created."
            } else {
                "Playlist updated."
            });
            changed(state)
        }
        Response::PlaylistSaved {
            created,
            result: Err(failure),
        } => {
            let doing = if created {
                "creating playlist"
            } else {
                "updating playlist"
            };
            fail(state, doing, &failure)
        }

        Response::PlaylistDeleted(Ok(())) => {
            state.flash_success("Playlist deleted.");
            changed(state)
        }
        Response::PlaylistDeleted(Err(failure)) => fail(state, "deleting playlist", &failure),

        _ => unreachable!("Non-playlist response passed to playlists handler"),
    }
}
