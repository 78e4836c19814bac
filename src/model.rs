use crate::types::*;
use chrono::Datelike;
use std::collections::HashMap;

pub const SESSION_EXPIRED: &str = "Your session has expired. Please login again.";

/// Site wide settings that renderers and handlers read but never change
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    pub sunday: SundayNames,
    /// Whether the song search also looks into lyrics
    pub search_lyrics: bool,
    pub copyright_year: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sunday: SundayNames::default(),
            search_lyrics: false,
            copyright_year: chrono::Local::now().year(),
        }
    }
}

/// Kinds of remote work. Loads and session calls keep only their newest
/// request current; every mutation response is accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationClass {
    Session,
    LoadSongs,
    LoadPlaylists,
    LoadSunday,
    SaveSong,
    DeleteSong,
    Comment,
    Membership,
    SavePlaylist,
    DeletePlaylist,
}

impl OperationClass {
    /// Whether a newer request of this class makes older responses obsolete
    pub fn supersedes(&self) -> bool {
        matches!(
            self,
            OperationClass::Session
                | OperationClass::LoadSongs
                | OperationClass::LoadPlaylists
                | OperationClass::LoadSunday
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestToken {
    pub class: OperationClass,
    seq: u64,
}

/// Outstanding requests: the latest token per superseding class plus every
/// pending mutation
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inflight {
    next: u64,
    latest: HashMap<OperationClass, u64>,
    mutations: HashMap<u64, OperationClass>,
}

impl Inflight {
    /// Issue a new token. For superseding classes any pending request of the
    /// same class becomes obsolete.
    pub fn issue(&mut self, class: OperationClass) -> RequestToken {
        self.next += 1;
        if class.supersedes() {
            self.latest.insert(class, self.next);
        } else {
            self.mutations.insert(self.next, class);
        }
        RequestToken {
            class,
            seq: self.next,
        }
    }

    /// Accept a response. Returns `false` if the token was superseded, was
    /// already settled or was issued before a reset.
    pub fn settle(&mut self, token: RequestToken) -> bool {
        if !token.class.supersedes() {
            return self.mutations.remove(&token.seq).is_some();
        }
        if self.latest.get(&token.class) != Some(&token.seq) {
            return false;
        }

        self.latest.remove(&token.class);
        true
    }

    /// Forget every outstanding request. Sequence numbers keep counting so
    /// tokens issued before never match later ones.
    pub fn clear(&mut self) {
        self.latest.clear();
        self.mutations.clear();
    }

    pub fn is_pending(&self, class: OperationClass) -> bool {
        self.latest.contains_key(&class) || self.mutations.values().any(|pending| *pending == class)
    }
}

/// Load status shared by all data backed pages
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageStatus {
    pub loading: bool,
    pub initialized: bool,
    /// Data was changed remotely since the last load
    pub stale: bool,
    pub error: Option<String>,
}

impl PageStatus {
    /// Start a loading operation (sets loading=true, clears error)
    pub fn start_loading(&mut self) {
        self.loading = true;
        self.error = None;
    }

    /// Stop loading and mark the page as loaded
    pub fn stop_loading(&mut self) {
        self.loading = false;
        self.initialized = true;
        self.stale = false;
        self.error = None;
    }

    /// Set an error message and stop loading
    pub fn set_error(&mut self, error: String) {
        self.loading = false;
        self.initialized = true;
        self.error = Some(error);
    }

    pub fn needs_load(&self) -> bool {
        !self.initialized || self.stale
    }
}

/// Song being edited in place on the songs page
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SongEdit {
    pub id: Id,
    pub draft: SongDraft,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongsView {
    pub status: PageStatus,
    pub all: Vec<Song>,
    pub filtered: Vec<Song>,
    pub query: String,
    pub active_video: Option<VideoId>,
    pub show_add_form: bool,
    pub draft: SongDraft,
    pub editing: Option<SongEdit>,
    pub services: Vec<ServiceSet>,
    pub my_playlists: Vec<Playlist>,
    /// Song whose "add to playlist" picker is open
    pub picking_for: Option<Id>,
}

impl SongsView {
    pub fn song(&self, id: &Id) -> Option<&Song> {
        self.all.iter().find(|song| &song.id == id)
    }

    pub fn service(&self, service: Service) -> Option<&ServiceSet> {
        self.services.iter().find(|set| set.service == service)
    }
}

/// Create or edit form on the playlists page
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaylistForm {
    /// `None` while creating a new playlist
    pub editing: Option<Id>,
    pub draft: PlaylistDraft,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaylistsView {
    pub status: PageStatus,
    pub playlists: Vec<LoadedPlaylist>,
    pub form: Option<PlaylistForm>,
}

impl PlaylistsView {
    pub fn playlist(&self, id: &Id) -> Option<&LoadedPlaylist> {
        self.playlists.iter().find(|loaded| &loaded.playlist.id == id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SundayView {
    pub status: PageStatus,
    pub services: Vec<ServiceSet>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AddSongView {
    pub draft: SongDraft,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AuthView {
    pub email: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlashKind {
    Error,
    Success,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Flash {
    pub kind: FlashKind,
    pub message: String,
}

/// Destructive actions that wait for an explicit yes
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Confirmation {
    DeleteSong { song_id: Id },
    RemoveFromService { service: Service, song_id: Id },
    DeletePlaylist { playlist_id: Id },
}

impl Confirmation {
    pub fn question(&self) -> &'static str {
        match self {
            Confirmation::DeleteSong { .. } => {
                "Are you sure you want to delete this song? This cannot be undone."
            }
            Confirmation::RemoveFromService { .. } => {
                "Are you sure you want to remove this song from the Sunday playlist?"
            }
            Confirmation::DeletePlaylist { .. } => {
                "Are you sure you want to delete this playlist? This cannot be undone."
            }
        }
    }
}

/// Where a song draft was submitted from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DraftOrigin {
    /// The inline form on the songs page
    Inline,
    /// The stand-alone add-song page
    Page,
}

/// What a signed-in user needs for remote mutations
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub access_token: String,
    pub user_id: Id,
}

/// Application state of one client - the complete state all pages render from
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AppState {
    pub settings: Settings,
    pub session: Option<AuthSession>,

    // Page state
    pub songs: SongsView,
    pub playlists: PlaylistsView,
    pub sunday: SundayView,
    pub add_song: AddSongView,
    pub auth: AuthView,

    // UI state
    pub flash: Option<Flash>,
    pub confirm: Option<Confirmation>,

    pub inflight: Inflight,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            ..Default::default()
        }
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.session.as_ref().map(|session| Credentials {
            access_token: session.access_token.clone(),
            user_id: session.user.id.clone(),
        })
    }

    pub fn access_token(&self) -> Option<String> {
        self.session
            .as_ref()
            .map(|session| session.access_token.clone())
    }

    pub fn flash_error(&mut self, message: impl Into<String>) {
        self.flash = Some(Flash {
            kind: FlashKind::Error,
            message: message.into(),
        });
    }

    pub fn flash_success(&mut self, message: impl Into<String>) {
        self.flash = Some(Flash {
            kind: FlashKind::Success,
            message: message.into(),
        });
    }

    pub fn clear_flash(&mut self) {
        self.flash = None;
    }

    /// Remote data changed; every page reloads on its next entry
    pub fn invalidate(&mut self) {
        self.songs.status.stale = true;
        self.playlists.status.stale = true;
        self.sunday.status.stale = true;
    }

    /// Drop the cached session once its access token has expired.
    /// Returns `true` if the session was dropped.
    pub fn expire_session(&mut self, now: u64) -> bool {
        if !self
            .session
            .as_ref()
            .is_some_and(|session| session.is_expired_at(now))
        {
            return false;
        }

        self.sign_out();
        self.flash_error(SESSION_EXPIRED);
        true
    }

    /// Forget everything that belongs to the signed-in user. Responses to
    /// requests issued before are ignored.
    pub fn sign_out(&mut self) {
        self.session = None;
        self.inflight.clear();
        self.songs = SongsView::default();
        self.playlists = PlaylistsView::default();
        self.sunday = SundayView::default();
        self.add_song = AddSongView::default();
        self.confirm = None;
    }
}

/// Case insensitive match of `query` against title and author, plus lyrics
/// when `include_lyrics` is set. An empty query keeps every song.
pub fn filter_songs(songs: &[Song], query: &str, include_lyrics: bool) -> Vec<Song> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return songs.to_vec();
    }

    let contains = |text: Option<&str>| text.is_some_and(|text| text.to_lowercase().contains(&needle));

    songs
        .iter()
        .filter(|song| {
            contains(Some(song.title.as_str()))
                || contains(song.author.as_deref())
                || (include_lyrics && contains(song.lyrics.as_deref()))
        })
        .cloned()
        .collect()
}
