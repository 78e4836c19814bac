use super::{changed, fail, require_credentials};
use crate::{
    command::{Command, Request},
    events::{Event, Response},
    model::{AppState, DraftOrigin, OperationClass, SongEdit, filter_songs},
    router::Route,
    types::SongDraft,
};

/// Start loading the songs page. The skeleton is rendered only before the
/// first load; later reloads keep showing the previous data.
pub(super) fn load(state: &mut AppState) -> Command {
    let first = !state.songs.status.initialized;
    state.songs.status.start_loading();

    let token = state.inflight.issue(OperationClass::LoadSongs);
    let request = Command::Request(
        token,
        Request::LoadSongsPage {
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

fn refilter(state: &mut AppState) {
    state.songs.filtered = filter_songs(
        &state.songs.all,
        &state.songs.query,
        state.settings.search_lyrics,
    );
}

/// Handle song catalog events
pub fn handle(event: Event, state: &mut AppState) -> Command {
    match event {
        Event::Search(query) => {
            state.songs.query = query;
            refilter(state);
            Command::Render
        }

        Event::ClearSearch => {
            state.songs.query.clear();
            refilter(state);
            Command::Render
        }

        Event::PlayVideo(video) => {
            state.songs.active_video = Some(video);
            Command::Render
        }

        Event::CloseVideo => {
            state.songs.active_video = None;
            Command::Render
        }

        Event::ShowAddSongForm => {
            state.songs.show_add_form = true;
            Command::Render
        }

        Event::HideAddSongForm => {
            state.songs.show_add_form = false;
            state.songs.draft = SongDraft::default();
            Command::Render
        }

        Event::SubmitSong { origin, draft } => {
            match origin {
                DraftOrigin::Inline => state.songs.draft = draft.clone(),
                DraftOrigin::Page => state.add_song.draft = draft.clone(),
            }

            let credentials = match require_credentials(state, "Please login to add songs.") {
                Ok(credentials) => credentials,
                Err(command) => return command,
            };
            if let Err(message) = draft.validate() {
                state.flash_error(message);
                return Command::Render;
            }

            let token = state.inflight.issue(OperationClass::SaveSong);
            Command::Request(
                token,
                Request::AddSong {
                    credentials,
                    origin,
                    draft,
                },
            )
        }

        Event::EditSong(id) => {
            state.songs.editing = state.songs.song(&id).map(|song| SongEdit {
                id: song.id.clone(),
                draft: SongDraft::from_song(song),
            });
            Command::Render
        }

        Event::CancelEdit => {
            state.songs.editing = None;
            Command::Render
        }

        Event::SaveSong(draft) => {
            let Some(editing) = state.songs.editing.as_mut() else {
                return Command::Render;
            };
            editing.draft = draft.clone();
            let song_id = editing.id.clone();

            let credentials = match require_credentials(state, "Please login to edit songs.") {
                Ok(credentials) => credentials,
                Err(command) => return command,
            };
            if let Err(message) = draft.validate() {
                state.flash_error(message);
                return Command::Render;
            }

            let token = state.inflight.issue(OperationClass::SaveSong);
            Command::Request(
                token,
                Request::UpdateSong {
                    credentials,
                    song_id,
                    draft,
                },
            )
        }

        Event::DeleteSong(song_id) => {
            let credentials = match require_credentials(state, "Please login to delete songs.") {
                Ok(credentials) => credentials,
                Err(command) => return command,
            };

            let token = state.inflight.issue(OperationClass::DeleteSong);
            Command::Request(
                token,
                Request::DeleteSong {
                    credentials,
                    song_id,
                },
            )
        }

        Event::SaveComment { song_id, comment } => {
            let credentials = match require_credentials(state, "Please login to add comments") {
                Ok(credentials) => credentials,
                Err(command) => return command,
            };
            if comment.trim().is_empty() {
                state.flash_error("Please enter a comment.");
                return Command::Render;
            }

            let token = state.inflight.issue(OperationClass::Comment);
            Command::Request(
                token,
                Request::SaveComment {
                    credentials,
                    song_id,
                    comment,
                },
            )
        }

        _ => unreachable!("Non-song event passed to songs handler"),
    }
}

/// Handle responses of song requests
pub fn respond(response: Response, state: &mut AppState) -> Command {
    match response {
        Response::SongsLoaded(Ok(page)) => {
            state.songs.all = page.songs;
            state.songs.services = page.services;
            state.songs.my_playlists = page.playlists;
            refilter(state);
            state.songs.status.stop_loading();
            Command::Render
        }
        Response::SongsLoaded(Err(failure)) => {
            state
                .songs
                .status
                .set_error(format!("Error loading songs: {}", failure.message));
            Command::Render
        }

        Response::SongAdded {
            origin,
            result: Ok(_),
        } => {
            state.flash_success("Song added successfully!");
            match origin {
                DraftOrigin::Inline => {
                    state.songs.show_add_form = false;
                    state.songs.draft = SongDraft::default();
                    changed(state)
                }
                DraftOrigin::Page => {
                    state.add_song.draft = SongDraft::default();
                    state.invalidate();
                    Command::Navigate(Route::Songs)
                }
            }
        }
        Response::SongAdded {
            result: Err(failure),
            ..
        } => fail(state, "adding song", &failure),

        Response::SongUpdated(Ok(())) => {
            state.songs.editing = None;
            state.flash_success("Song updated successfully!");
            changed(state)
        }
        Response::SongUpdated(Err(failure)) => fail(state, "updating song", &failure),

        Response::SongDeleted(Ok(())) => {
            state.flash_success("Song deleted.");
            changed(state)
        }
        Response::SongDeleted(Err(failure)) => fail(state, "deleting song", &failure),

        Response::CommentSaved(Ok(())) => changed(state),
        Response::CommentSaved(Err(failure)) => fail(state, "adding comment", &failure),

        _ => unreachable!("Non-song response passed to songs handler"),
    }
}
