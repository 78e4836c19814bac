//! Remote data gateway
//!
//! Thin contract over the hosted database/auth service. Every operation is a
//! single remote call, is attempted at most once and reports problems as a
//! [`Failure`]. Implementations never touch view state.

mod memory;
mod supabase;

pub use memory::MemoryGateway;
pub use supabase::SupabaseGateway;

use crate::types::{AuthSession, User};
#[cfg(feature = "mock")]
use mockall::automock;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use trait_variant::make;

/// Error code the store reports for a unique constraint violation
pub const UNIQUE_VIOLATION: &str = "23505";
/// Error code the store reports when row level security rejects a call
pub const PERMISSION_DENIED: &str = "42501";

/// Codes with which the store or the identity provider reject an access
/// token: expired or malformed JWTs, revoked sessions and bare 401/403 replies.
const AUTH_REJECTIONS: [&str; 6] = [
    "bad_jwt",
    "session_not_found",
    "PGRST301",
    "PGRST303",
    "401",
    "403",
];

pub type Row = serde_json::Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Collection {
    Songs,
    Playlists,
    PlaylistSongs,
    SundayPlaylists,
    SundayPlaylistSongs,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Songs => "songs",
            Collection::Playlists => "playlists",
            Collection::PlaylistSongs => "playlist_songs",
            Collection::SundayPlaylists => "sunday_playlists",
            Collection::SundayPlaylistSongs => "sunday_playlist_songs",
        }
    }

    /// Column pairs that must be unique within the collection
    pub fn unique_pair(&self) -> Option<(&'static str, &'static str)> {
        match self {
            Collection::PlaylistSongs => Some(("playlist_id", "song_id")),
            Collection::SundayPlaylistSongs => Some(("sunday_playlist_id", "song_id")),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Filter {
    Eq { column: String, value: Value },
    In { column: String, values: Vec<Value> },
}

impl Filter {
    pub fn eq(column: &str, value: impl Into<Value>) -> Self {
        Filter::Eq {
            column: column.to_string(),
            value: value.into(),
        }
    }

    pub fn any_of<V: Into<Value>>(column: &str, values: impl IntoIterator<Item = V>) -> Self {
        Filter::In {
            column: column.to_string(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Filter::Eq { column, .. } | Filter::In { column, .. } => column,
        }
    }

    /// Evaluate the filter against a row, comparing values by their text form
    /// so that `1` and `"1"` name the same key.
    pub fn matches(&self, row: &Row) -> bool {
        let Some(actual) = row.get(self.column()) else {
            return false;
        };

        match self {
            Filter::Eq { value, .. } => same_value(actual, value),
            Filter::In { values, .. } => values.iter().any(|value| same_value(actual, value)),
        }
    }
}

fn same_value(left: &Value, right: &Value) -> bool {
    value_text(left) == value_text(right)
}

pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Ordering {
    pub column: String,
    pub ascending: bool,
}

impl Ordering {
    pub fn ascending(column: &str) -> Self {
        Self {
            column: column.to_string(),
            ascending: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Query {
    pub collection: Collection,
    pub filters: Vec<Filter>,
    pub ordering: Option<Ordering>,
}

impl Query {
    pub fn new(collection: Collection) -> Self {
        Self {
            collection,
            filters: Vec::new(),
            ordering: None,
        }
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_by(mut self, ordering: Ordering) -> Self {
        self.ordering = Some(ordering);
        self
    }
}

/// Failure reported by the remote service or the transport in between.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message}")]
pub struct Failure {
    pub message: String,
    pub code: Option<String>,
}

impl Failure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: None,
        }
    }

    pub fn with_code(message: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            code: Some(code.into()),
        }
    }

    pub fn is_unique_violation(&self) -> bool {
        self.code.as_deref() == Some(UNIQUE_VIOLATION)
    }

    /// The caller's access token is no longer accepted
    pub fn is_auth_rejection(&self) -> bool {
        self.code
            .as_deref()
            .is_some_and(|code| AUTH_REJECTIONS.contains(&code))
    }
}

pub type GatewayResult<T> = Result<T, Failure>;

/// Decode remote rows into typed records.
pub fn decode_rows<T: DeserializeOwned>(collection: Collection, rows: Vec<Row>) -> GatewayResult<Vec<T>> {
    rows.into_iter()
        .map(|row| {
            serde_json::from_value(Value::Object(row)).map_err(|e| {
                Failure::new(format!("unexpected {} row: {e}", collection.as_str()))
            })
        })
        .collect()
}

/// Access to the hosted database and identity provider.
///
/// `access_token` is the signed-in user's token; `None` means the call is made
/// anonymously.
#[make(Send)]
#[cfg_attr(feature = "mock", automock)]
pub trait DataGateway {
    async fn select(&self, access_token: Option<String>, query: Query) -> GatewayResult<Vec<Row>>;
    async fn insert(
        &self,
        access_token: Option<String>,
        collection: Collection,
        record: Row,
    ) -> GatewayResult<Row>;
    async fn update(
        &self,
        access_token: Option<String>,
        collection: Collection,
        matcher: Vec<Filter>,
        patch: Row,
    ) -> GatewayResult<()>;
    async fn delete(
        &self,
        access_token: Option<String>,
        collection: Collection,
        matcher: Vec<Filter>,
    ) -> GatewayResult<()>;
    async fn sign_in(&self, email: String, password: String) -> GatewayResult<AuthSession>;
    async fn sign_up(&self, email: String, password: String) -> GatewayResult<User>;
    async fn sign_out(&self, access_token: String) -> GatewayResult<()>;
    async fn get_session(&self, access_token: String) -> GatewayResult<User>;
}
