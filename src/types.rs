use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::{
    fmt,
    sync::LazyLock,
    time::{SystemTime, UNIX_EPOCH},
};

const VIDEO_ID_LEN: usize = 11;

static YOUTUBE_URL: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*").ok()
});

/// Primary key of a remote row.
///
/// The hosted store may use integer or text keys; both deserialize into the
/// same type and integer-looking keys are sent back as JSON numbers.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(String);

impl Id {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_value(&self) -> Value {
        match self.0.parse::<i64>() {
            Ok(number) => Value::from(number),
            Err(_) => Value::from(self.0.clone()),
        }
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Id {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for Id {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<i64> for Id {
    fn from(id: i64) -> Self {
        Self(id.to_string())
    }
}

impl From<&Id> for Value {
    fn from(id: &Id) -> Self {
        id.to_value()
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.0.parse::<i64>() {
            Ok(number) => serializer.serialize_i64(number),
            Err(_) => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Number(i64),
            Text(String),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Number(number) => Id::from(number),
            RawId::Text(text) => Id(text),
        })
    }
}

/// Identifier of an embeddable YouTube video.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VideoId(String);

impl VideoId {
    /// Extract the video identifier from a user supplied YouTube URL.
    ///
    /// Returns `None` unless the matched identifier is exactly 11 characters.
    pub fn from_url(url: &str) -> Option<Self> {
        let pattern = YOUTUBE_URL.as_ref()?;
        let candidate = pattern.captures(url)?.get(2)?.as_str();

        (candidate.chars().count() == VIDEO_ID_LEN).then(|| Self(candidate.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn embed_url(&self) -> String {
        format!("https://www.youtube.com/embed/{}", self.0)
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    #[serde(default)]
    pub email: Option<String>,
}

/// Identity handed out by the auth service and cached for the browser session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp in seconds
    #[serde(default)]
    pub expires_at: Option<u64>,
    pub user: User,
}

impl AuthSession {
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

pub fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Song {
    pub id: Id,
    pub title: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub lyrics: Option<String>,
    #[serde(default)]
    pub youtube_url: Option<String>,
    #[serde(default)]
    pub comments: Option<String>,
    #[serde(default)]
    pub created_by: Option<Id>,
    #[serde(default)]
    pub updated_by: Option<Id>,
}

impl Song {
    pub fn video_id(&self) -> Option<VideoId> {
        self.youtube_url.as_deref().and_then(VideoId::from_url)
    }

    pub fn author_or_unknown(&self) -> &str {
        match self.author.as_deref() {
            Some(author) if !author.trim().is_empty() => author,
            _ => "Unknown",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub user_id: Id,
}

/// Row linking one song to one playlist.
///
/// Used for both `playlist_songs` and `sunday_playlist_songs`; the latter
/// names its parent column `sunday_playlist_id`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    #[serde(alias = "sunday_playlist_id")]
    pub playlist_id: Id,
    pub song_id: Id,
    #[serde(default)]
    pub position: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SundayPlaylist {
    pub id: Id,
    pub name: String,
}

/// The two weekly services that own a Sunday playlist.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Service {
    Morning,
    Evening,
}

impl Service {
    pub const ALL: [Service; 2] = [Service::Morning, Service::Evening];

    pub fn key(&self) -> &'static str {
        match self {
            Service::Morning => "am",
            Service::Evening => "pm",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|service| service.key() == key)
    }

    pub fn short_label(&self) -> &'static str {
        match self {
            Service::Morning => "AM",
            Service::Evening => "PM",
        }
    }
}

/// Playlist names used to look up the Sunday playlists by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SundayNames {
    pub morning: String,
    pub evening: String,
}

impl SundayNames {
    pub fn name(&self, service: Service) -> &str {
        match service {
            Service::Morning => &self.morning,
            Service::Evening => &self.evening,
        }
    }
}

impl Default for SundayNames {
    fn default() -> Self {
        Self {
            morning: "Sunday AM Service".to_string(),
            evening: "Sunday PM Service".to_string(),
        }
    }
}

/// A playlist together with its songs in membership order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadedPlaylist {
    pub playlist: Playlist,
    pub songs: Vec<Song>,
}

/// A Sunday playlist together with its songs in membership order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceSet {
    pub service: Service,
    pub playlist: SundayPlaylist,
    pub songs: Vec<Song>,
}

/// User input of the add/edit song forms.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SongDraft {
    pub title: String,
    pub author: String,
    pub youtube_url: String,
    pub lyrics: String,
}

impl SongDraft {
    /// Check the required fields before anything is sent to the store.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() || self.author.trim().is_empty() {
            return Err("Please fill in Title and Author.".to_string());
        }

        Ok(())
    }

    pub fn title(&self) -> &str {
        self.title.trim()
    }

    pub fn author(&self) -> &str {
        self.author.trim()
    }

    pub fn youtube_url(&self) -> Option<&str> {
        Some(self.youtube_url.trim()).filter(|url| !url.is_empty())
    }

    pub fn lyrics(&self) -> Option<&str> {
        Some(self.lyrics.trim()).filter(|lyrics| !lyrics.is_empty())
    }

    pub fn from_song(song: &Song) -> Self {
        Self {
            title: song.title.clone(),
            author: song.author.clone().unwrap_or_default(),
            youtube_url: song.youtube_url.clone().unwrap_or_default(),
            lyrics: song.lyrics.clone().unwrap_or_default(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlaylistDraft {
    pub name: String,
    pub description: String,
}

impl PlaylistDraft {
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Please enter a playlist name.".to_string());
        }

        Ok(())
    }

    pub fn name(&self) -> &str {
        self.name.trim()
    }

    pub fn description(&self) -> Option<&str> {
        Some(self.description.trim()).filter(|description| !description.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_from_short_url() {
        let id = VideoId::from_url("https://youtu.be/abc12345678");
        assert_eq!(id.as_ref().map(VideoId::as_str), Some("abc12345678"));
    }

    #[test]
    fn video_id_from_watch_url_with_extra_parameters() {
        let id = VideoId::from_url("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s");
        assert_eq!(id.as_ref().map(VideoId::as_str), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn video_id_from_embed_url() {
        let id = VideoId::from_url("https://www.youtube.com/embed/dQw4w9WgXcQ");
        assert_eq!(
            id.map(|id| id.embed_url()),
            Some("https://www.youtube.com/embed/dQw4w9WgXcQ".to_string())
        );
    }

    #[test]
    fn video_id_rejects_wrong_length_and_garbage() {
        assert_eq!(VideoId::from_url("https://youtu.be/short"), None);
        assert_eq!(VideoId::from_url("not a url at all"), None);
        assert_eq!(VideoId::from_url(""), None);
    }

    #[test]
    fn id_accepts_numbers_and_text() {
        let ids: Vec<Id> = serde_json::from_str(r#"[42, "9f1c-uuid"]"#).unwrap();
        assert_eq!(ids, vec![Id::from(42), Id::from("9f1c-uuid")]);
        assert_eq!(serde_json::to_string(&ids).unwrap(), r#"[42,"9f1c-uuid"]"#);
    }

    #[test]
    fn membership_reads_sunday_parent_column() {
        let row = r#"{"sunday_playlist_id": 3, "song_id": 7, "position": 1}"#;
        let membership: Membership = serde_json::from_str(row).unwrap();
        assert_eq!(membership.playlist_id, Id::from(3));
        assert_eq!(membership.position, Some(1));
    }

    #[test]
    fn song_draft_requires_title_and_author() {
        let draft = SongDraft {
            title: "  ".to_string(),
            author: "J. Newton".to_string(),
            ..Default::default()
        };
        assert!(draft.validate().is_err());

        let draft = SongDraft {
            title: "Amazing Grace".to_string(),
            author: "J. Newton".to_string(),
            youtube_url: "   ".to_string(),
            ..Default::default()
        };
        assert!(draft.validate().is_ok());
        assert_eq!(draft.youtube_url(), None);
    }

    #[test]
    fn session_expiry() {
        let session = AuthSession {
            access_token: "token".to_string(),
            refresh_token: None,
            expires_at: Some(100),
            user: User {
                id: Id::from("u1"),
                email: None,
            },
        };
        assert!(!session.is_expired_at(99));
        assert!(session.is_expired_at(100));
    }
}
