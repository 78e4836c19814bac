use crate::{
    gateway::Failure,
    model::{Confirmation, DraftOrigin, RequestToken},
    router::Route,
    types::*,
};

/// Everything the songs page shows, fetched in one go
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongsPage {
    pub songs: Vec<Song>,
    pub services: Vec<ServiceSet>,
    pub playlists: Vec<Playlist>,
}

/// Outcome of one remote request
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Response {
    SignedIn(Result<AuthSession, Failure>),
    SignedUp(Result<User, Failure>),
    SignedOut(Result<(), Failure>),
    SessionChecked(Result<User, Failure>),

    SongsLoaded(Result<SongsPage, Failure>),
    PlaylistsLoaded(Result<Vec<LoadedPlaylist>, Failure>),
    SundayLoaded(Result<Vec<ServiceSet>, Failure>),

    SongAdded {
        origin: DraftOrigin,
        result: Result<Song, Failure>,
    },
    SongUpdated(Result<(), Failure>),
    SongDeleted(Result<(), Failure>),
    CommentSaved(Result<(), Failure>),

    AddedToService {
        service: Service,
        result: Result<(), Failure>,
    },
    RemovedFromService(Result<(), Failure>),
    AddedToPlaylist(Result<(), Failure>),
    RemovedFromPlaylist(Result<(), Failure>),

    PlaylistSaved {
        created: bool,
        result: Result<(), Failure>,
    },
    PlaylistDeleted(Result<(), Failure>),
}

/// Events that can happen in the app
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    // Navigation
    Enter {
        route: Route,
        changed: bool,
        /// The user followed a link, as opposed to a redirect after an action
        by_user: bool,
    },
    Reload,

    // Authentication
    Restore(AuthSession),
    SignIn {
        email: String,
        password: String,
    },
    SignUp {
        email: String,
        password: String,
    },
    SignOut,

    // Songs
    Search(String),
    ClearSearch,
    PlayVideo(VideoId),
    CloseVideo,
    ShowAddSongForm,
    HideAddSongForm,
    SubmitSong {
        origin: DraftOrigin,
        draft: SongDraft,
    },
    EditSong(Id),
    CancelEdit,
    SaveSong(SongDraft),
    DeleteSong(Id),
    SaveComment {
        song_id: Id,
        comment: String,
    },

    // Sunday services
    AddToService {
        service: Service,
        song_id: Id,
    },
    RemoveFromService {
        service: Service,
        song_id: Id,
    },

    // Playlists
    OpenPlaylistPicker(Id),
    ClosePlaylistPicker,
    AddToPlaylist {
        playlist_id: Id,
        song_id: Id,
    },
    RemoveFromPlaylist {
        playlist_id: Id,
        song_id: Id,
    },
    NewPlaylist,
    EditPlaylist(Id),
    CancelPlaylistForm,
    SavePlaylist(PlaylistDraft),
    DeletePlaylist(Id),

    // UI actions
    RequestConfirm(Confirmation),
    Confirm,
    CancelConfirm,
    DismissFlash,
    /// A control was used that the current page no longer shows
    StaleAction,

    // Remote responses (internal events)
    Response(RequestToken, Response),
}

impl From<Confirmation> for Event {
    fn from(confirmation: Confirmation) -> Self {
        match confirmation {
            Confirmation::DeleteSong { song_id } => Event::DeleteSong(song_id),
            Confirmation::RemoveFromService { service, song_id } => {
                Event::RemoveFromService { service, song_id }
            }
            Confirmation::DeletePlaylist { playlist_id } => Event::DeletePlaylist(playlist_id),
        }
    }
}
