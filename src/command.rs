use crate::{
    model::{Credentials, DraftOrigin, RequestToken},
    router::Route,
    types::*,
};
use std::fmt;

/// Remote work requested by `update`, performed by the runtime
#[derive(Clone, PartialEq, Eq)]
pub enum Request {
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        email: String,
        password: String,
    },
    SignOut {
        access_token: String,
    },
    GetSession {
        access_token: String,
    },

    LoadSongsPage {
        credentials: Option<Credentials>,
        names: SundayNames,
    },
    LoadPlaylists {
        credentials: Credentials,
    },
    LoadSunday {
        credentials: Option<Credentials>,
        names: SundayNames,
    },

    AddSong {
        credentials: Credentials,
        origin: DraftOrigin,
        draft: SongDraft,
    },
    UpdateSong {
        credentials: Credentials,
        song_id: Id,
        draft: SongDraft,
    },
    DeleteSong {
        credentials: Credentials,
        song_id: Id,
    },
    SaveComment {
        credentials: Credentials,
        song_id: Id,
        comment: String,
    },

    AddToService {
        credentials: Credentials,
        names: SundayNames,
        service: Service,
        song_id: Id,
    },
    RemoveFromService {
        credentials: Credentials,
        names: SundayNames,
        service: Service,
        song_id: Id,
    },
    AddToPlaylist {
        credentials: Credentials,
        playlist_id: Id,
        song_id: Id,
    },
    RemoveFromPlaylist {
        credentials: Credentials,
        playlist_id: Id,
        song_id: Id,
    },

    CreatePlaylist {
        credentials: Credentials,
        draft: PlaylistDraft,
    },
    UpdatePlaylist {
        credentials: Credentials,
        playlist_id: Id,
        draft: PlaylistDraft,
    },
    DeletePlaylist {
        credentials: Credentials,
        playlist_id: Id,
    },
}

// Requests carry passwords and tokens, so only their kind is printed.
impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Request::SignIn { .. } => "SignIn",
            Request::SignUp { .. } => "SignUp",
            Request::SignOut { .. } => "SignOut",
            Request::GetSession { .. } => "GetSession",
            Request::LoadSongsPage { .. } => "LoadSongsPage",
            Request::LoadPlaylists { .. } => "LoadPlaylists",
            Request::LoadSunday { .. } => "LoadSunday",
            Request::AddSong { .. } => "AddSong",
            Request::UpdateSong { .. } => "UpdateSong",
            Request::DeleteSong { .. } => "DeleteSong",
            Request::SaveComment { .. } => "SaveComment",
            Request::AddToService { .. } => "AddToService",
            Request::RemoveFromService { .. } => "RemoveFromService",
            Request::AddToPlaylist { .. } => "AddToPlaylist",
            Request::RemoveFromPlaylist { .. } => "RemoveFromPlaylist",
            Request::CreatePlaylist { .. } => "CreatePlaylist",
            Request::UpdatePlaylist { .. } => "UpdatePlaylist",
            Request::DeletePlaylist { .. } => "DeletePlaylist",
        };

        f.write_str(name)
    }
}

/// Side effects returned by `update`
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Done,
    /// Content changed: re-render the current route
    Render,
    /// Re-enter the current route so that stale data is reloaded
    Refresh,
    Navigate(Route),
    Request(RequestToken, Request),
    All(Vec<Command>),
}

impl Command {
    pub fn and(self, next: Command) -> Command {
        match (self, next) {
            (Command::Done, next) => next,
            (command, Command::Done) => command,
            (Command::All(mut commands), next) => {
                commands.push(next);
                Command::All(commands)
            }
            (command, next) => Command::All(vec![command, next]),
        }
    }

    /// Flatten nested batches into the order they have to run in
    pub fn flatten(self) -> Vec<Command> {
        match self {
            Command::Done => Vec::new(),
            Command::All(commands) => commands.into_iter().flat_map(Command::flatten).collect(),
            command => vec![command],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_skips_done_and_keeps_order() {
        let command = Command::Done
            .and(Command::Render)
            .and(Command::Done)
            .and(Command::Navigate(Route::Login))
            .and(Command::Refresh);

        assert_eq!(
            command.flatten(),
            vec![
                Command::Render,
                Command::Navigate(Route::Login),
                Command::Refresh
            ]
        );
    }

    #[test]
    fn flatten_unnests_batches() {
        let command = Command::All(vec![
            Command::All(vec![Command::Render, Command::Done]),
            Command::Refresh,
        ]);

        assert_eq!(command.flatten(), vec![Command::Render, Command::Refresh]);
    }

    #[test]
    fn debug_hides_secrets() {
        let request = Request::SignIn {
            email: "leader@example.org".to_string(),
            password: "hunter22".to_string(),
        };

        assert_eq!(format!("{request:?}"), "SignIn");
    }
}
