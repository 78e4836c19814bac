use crate::{
    events::Event,
    model::{Confirmation, DraftOrigin},
    types::*,
};
use std::collections::HashMap;

/// Submitted form fields of an action post
pub type Fields = HashMap<String, String>;

/// Interactive control declared by a renderer.
///
/// Every control is bound under a key derived from the action and the entity
/// it acts on, so the same page always produces the same keys.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    SignIn,
    SignUp,
    SignOut,

    Search,
    ClearSearch,
    PlayVideo(VideoId),
    CloseVideo,
    ShowAddSong,
    HideAddSong,
    SubmitSong(DraftOrigin),
    EditSong(Id),
    CancelEdit,
    SaveSong(Id),
    DeleteSong(Id),
    Comment(Id),

    AddToService(Service, Id),
    RemoveFromService(Service, Id),

    PickPlaylist(Id),
    ClosePicker,
    AddToPlaylist { playlist_id: Id, song_id: Id },
    RemoveFromPlaylist { playlist_id: Id, song_id: Id },
    NewPlaylist,
    EditPlaylist(Id),
    CancelPlaylist,
    SavePlaylist,
    DeletePlaylist(Id),

    Confirm,
    CancelConfirm,
    DismissFlash,
    Reload,
}

impl Action {
    pub fn key(&self) -> String {
        match self {
            Action::SignIn => "sign-in".to_string(),
            Action::SignUp => "sign-up".to_string(),
            Action::SignOut => "sign-out".to_string(),
            Action::Search => "search".to_string(),
            Action::ClearSearch => "clear-search".to_string(),
            Action::PlayVideo(video) => format!("play-video:{video}"),
            Action::CloseVideo => "close-video".to_string(),
            Action::ShowAddSong => "show-add-song".to_string(),
            Action::HideAddSong => "hide-add-song".to_string(),
            Action::SubmitSong(DraftOrigin::Inline) => "submit-song:inline".to_string(),
            Action::SubmitSong(DraftOrigin::Page) => "submit-song:page".to_string(),
            Action::EditSong(id) => format!("edit-song:{id}"),
            Action::CancelEdit => "cancel-edit".to_string(),
            Action::SaveSong(id) => format!("save-song:{id}"),
            Action::DeleteSong(id) => format!("delete-song:{id}"),
            Action::Comment(id) => format!("comment:{id}"),
            Action::AddToService(service, id) => format!("add-to-sunday:{}:{id}", service.key()),
            Action::RemoveFromService(service, id) => {
                format!("remove-from-sunday:{}:{id}", service.key())
            }
            Action::PickPlaylist(id) => format!("pick-playlist:{id}"),
            Action::ClosePicker => "close-picker".to_string(),
            Action::AddToPlaylist {
                playlist_id,
                song_id,
            } => format!("add-to-playlist:{playlist_id}:{song_id}"),
            Action::RemoveFromPlaylist {
                playlist_id,
                song_id,
            } => format!("remove-song:{playlist_id}:{song_id}"),
            Action::NewPlaylist => "create-playlist".to_string(),
            Action::EditPlaylist(id) => format!("edit-playlist:{id}"),
            Action::CancelPlaylist => "cancel-playlist".to_string(),
            Action::SavePlaylist => "save-playlist".to_string(),
            Action::DeletePlaylist(id) => format!("delete-playlist:{id}"),
            Action::Confirm => "confirm".to_string(),
            Action::CancelConfirm => "cancel-confirm".to_string(),
            Action::DismissFlash => "dismiss-flash".to_string(),
            Action::Reload => "reload".to_string(),
        }
    }

    /// Turn the action into an event, reading whatever inputs it needs from
    /// the submitted form.
    pub fn into_event(self, fields: &Fields) -> Event {
        match self {
            Action::SignIn => Event::SignIn {
                email: field(fields, "email"),
                password: field(fields, "password"),
            },
            Action::SignUp => Event::SignUp {
                email: field(fields, "email"),
                password: field(fields, "password"),
            },
            Action::SignOut => Event::SignOut,
            Action::Search => Event::Search(field(fields, "query")),
            Action::ClearSearch => Event::ClearSearch,
            Action::PlayVideo(video) => Event::PlayVideo(video),
            Action::CloseVideo => Event::CloseVideo,
            Action::ShowAddSong => Event::ShowAddSongForm,
            Action::HideAddSong => Event::HideAddSongForm,
            Action::SubmitSong(origin) => Event::SubmitSong {
                origin,
                draft: song_draft(fields),
            },
            Action::EditSong(id) => Event::EditSong(id),
            Action::CancelEdit => Event::CancelEdit,
            Action::SaveSong(_) => Event::SaveSong(song_draft(fields)),
            Action::DeleteSong(song_id) => {
                Event::RequestConfirm(Confirmation::DeleteSong { song_id })
            }
            Action::Comment(song_id) => Event::SaveComment {
                song_id,
                comment: field(fields, "comment"),
            },
            Action::AddToService(service, song_id) => Event::AddToService { service, song_id },
            Action::RemoveFromService(service, song_id) => {
                Event::RequestConfirm(Confirmation::RemoveFromService { service, song_id })
            }
            Action::PickPlaylist(song_id) => Event::OpenPlaylistPicker(song_id),
            Action::ClosePicker => Event::ClosePlaylistPicker,
            Action::AddToPlaylist {
                playlist_id,
                song_id,
            } => Event::AddToPlaylist {
                playlist_id,
                song_id,
            },
            Action::RemoveFromPlaylist {
                playlist_id,
                song_id,
            } => Event::RemoveFromPlaylist {
                playlist_id,
                song_id,
            },
            Action::NewPlaylist => Event::NewPlaylist,
            Action::EditPlaylist(id) => Event::EditPlaylist(id),
            Action::CancelPlaylist => Event::CancelPlaylistForm,
            Action::SavePlaylist => Event::SavePlaylist(PlaylistDraft {
                name: field(fields, "name"),
                description: field(fields, "description"),
            }),
            Action::DeletePlaylist(playlist_id) => {
                Event::RequestConfirm(Confirmation::DeletePlaylist { playlist_id })
            }
            Action::Confirm => Event::Confirm,
            Action::CancelConfirm => Event::CancelConfirm,
            Action::DismissFlash => Event::DismissFlash,
            Action::Reload => Event::Reload,
        }
    }
}

fn field(fields: &Fields, name: &str) -> String {
    fields.get(name).cloned().unwrap_or_default()
}

fn song_draft(fields: &Fields) -> SongDraft {
    SongDraft {
        title: field(fields, "title"),
        author: field(fields, "author"),
        youtube_url: field(fields, "youtube_url"),
        lyrics: field(fields, "lyrics"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(pairs: &[(&str, &str)]) -> Fields {
        pairs
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect()
    }

    #[test]
    fn keys_are_derived_from_action_and_entity() {
        assert_eq!(
            Action::AddToService(Service::Morning, Id::from(42)).key(),
            "add-to-sunday:am:42"
        );
        assert_eq!(
            Action::RemoveFromPlaylist {
                playlist_id: Id::from(3),
                song_id: Id::from(7)
            }
            .key(),
            "remove-song:3:7"
        );
        assert_eq!(
            Action::EditSong(Id::from(5)).key(),
            Action::EditSong(Id::from(5)).key()
        );
        assert_ne!(
            Action::EditSong(Id::from(5)).key(),
            Action::EditSong(Id::from(6)).key()
        );
    }

    #[test]
    fn submit_song_reads_form_fields() {
        let event = Action::SubmitSong(DraftOrigin::Page).into_event(&fields(&[
            ("title", "Amazing Grace"),
            ("author", "J. Newton"),
            ("youtube_url", "https://youtu.be/abc12345678"),
        ]));

        assert_eq!(
            event,
            Event::SubmitSong {
                origin: DraftOrigin::Page,
                draft: SongDraft {
                    title: "Amazing Grace".to_string(),
                    author: "J. Newton".to_string(),
                    youtube_url: "https://youtu.be/abc12345678".to_string(),
                    lyrics: String::new(),
                }
            }
        );
    }

    #[test]
    fn destructive_actions_ask_first() {
        let event = Action::DeletePlaylist(Id::from(9)).into_event(&Fields::new());
        assert_eq!(
            event,
            Event::RequestConfirm(Confirmation::DeletePlaylist {
                playlist_id: Id::from(9)
            })
        );
    }

    #[test]
    fn missing_fields_become_empty() {
        assert_eq!(
            Action::Search.into_event(&Fields::new()),
            Event::Search(String::new())
        );
    }
}
