//! Remote operations built from single gateway calls.
//!
//! Multi step operations (cascading deletes, membership pre-checks) are plain
//! sequences of calls; nothing here is transactional.

pub mod playlists;
pub mod songs;
pub mod sunday;

use crate::{
    command::Request,
    events::{Response, SongsPage},
    gateway::{Collection, DataGateway, Failure, Filter, GatewayResult, Query, Row, decode_rows},
    model::Credentials,
    types::{Id, Membership, Song},
};
use serde_json::Value;
use std::collections::HashMap;

/// Message shown when a song is added to a playlist it is already part of
pub const ALREADY_IN_PLAYLIST: &str = "This song is already in the playlist";

/// Perform a request and wrap its outcome into the matching response
pub async fn perform<G: DataGateway>(gateway: &G, request: Request) -> Response {
    match request {
        Request::SignIn { email, password } => {
            Response::SignedIn(gateway.sign_in(email, password).await)
        }
        Request::SignUp { email, password } => {
            Response::SignedUp(gateway.sign_up(email, password).await)
        }
        Request::SignOut { access_token } => {
            Response::SignedOut(gateway.sign_out(access_token).await)
        }
        Request::GetSession { access_token } => {
            Response::SessionChecked(gateway.get_session(access_token).await)
        }
        Request::LoadSongsPage { credentials, names } => {
            Response::SongsLoaded(load_songs_page(gateway, credentials, &names).await)
        }
        Request::LoadPlaylists { credentials } => {
            Response::PlaylistsLoaded(playlists::load(gateway, &credentials).await)
        }
        Request::LoadSunday { credentials, names } => {
            Response::SundayLoaded(sunday::load(gateway, token(&credentials), &names).await)
        }
        Request::AddSong {
            credentials,
            origin,
            draft,
        } => Response::SongAdded {
            origin,
            result: songs::add(gateway, &credentials, &draft).await,
        },
        Request::UpdateSong {
            credentials,
            song_id,
            draft,
        } => Response::SongUpdated(songs::update(gateway, &credentials, &song_id, &draft).await),
        Request::DeleteSong {
            credentials,
            song_id,
        } => Response::SongDeleted(songs::delete(gateway, &credentials, &song_id).await),
        Request::SaveComment {
            credentials,
            song_id,
            comment,
        } => Response::CommentSaved(
            songs::save_comment(gateway, &credentials, &song_id, &comment).await,
        ),
        Request::AddToService {
            credentials,
            names,
            service,
            song_id,
        } => Response::AddedToService {
            service,
            result: sunday::add_song(gateway, &credentials, &names, service, &song_id).await,
        },
        Request::RemoveFromService {
            credentials,
            names,
            service,
            song_id,
        } => Response::RemovedFromService(
            sunday::remove_song(gateway, &credentials, &names, service, &song_id).await,
        ),
        Request::AddToPlaylist {
            credentials,
            playlist_id,
            song_id,
        } => Response::AddedToPlaylist(
            playlists::add_song(gateway, &credentials, &playlist_id, &song_id).await,
        ),
        Request::RemoveFromPlaylist {
            credentials,
            playlist_id,
            song_id,
        } => Response::RemovedFromPlaylist(
            playlists::remove_song(gateway, &credentials, &playlist_id, &song_id).await,
        ),
        Request::CreatePlaylist { credentials, draft } => Response::PlaylistSaved {
            created: true,
            result: playlists::create(gateway, &credentials, &draft).await,
        },
        Request::UpdatePlaylist {
            credentials,
            playlist_id,
            draft,
        } => Response::PlaylistSaved {
            created: false,
            result: playlists::update(gateway, &credentials, &playlist_id, &draft).await,
        },
        Request::DeletePlaylist {
            credentials,
            playlist_id,
        } => Response::PlaylistDeleted(
            playlists::delete(gateway, &credentials, &playlist_id).await,
        ),
    }
}

async fn load_songs_page<G: DataGateway>(
    gateway: &G,
    credentials: Option<Credentials>,
    names: &crate::types::SundayNames,
) -> GatewayResult<SongsPage> {
    let songs = songs::load(gateway, token(&credentials)).await?;
    let services = sunday::load(gateway, token(&credentials), names).await?;
    let playlists = match &credentials {
        Some(credentials) => playlists::owned_by(gateway, credentials).await?,
        None => Vec::new(),
    };

    Ok(SongsPage {
        songs,
        services,
        playlists,
    })
}

pub(crate) fn token(credentials: &Option<Credentials>) -> Option<String> {
    credentials
        .as_ref()
        .map(|credentials| credentials.access_token.clone())
}

pub(crate) fn record<const N: usize>(fields: [(&str, Value); N]) -> Row {
    fields
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}

pub(crate) fn optional(text: Option<&str>) -> Value {
    text.map(Value::from).unwrap_or(Value::Null)
}

/// Memberships of the given parents, keyed by parent id, in position order
pub(crate) async fn memberships<G: DataGateway>(
    gateway: &G,
    access_token: Option<String>,
    collection: Collection,
    parent_ids: &[Id],
) -> GatewayResult<Vec<Membership>> {
    if parent_ids.is_empty() {
        return Ok(Vec::new());
    }

    let Some((parent_column, _)) = collection.unique_pair() else {
        return Err(Failure::new(format!(
            "{} is not a membership collection",
            collection.as_str()
        )));
    };

    let rows = gateway
        .select(
            access_token,
            Query::new(collection).filter(Filter::any_of(parent_column, parent_ids.iter())),
        )
        .await?;

    let mut memberships: Vec<Membership> = decode_rows(collection, rows)?;
    // rows without a position keep their insertion order after the positioned ones
    memberships.sort_by_key(|membership| membership.position.unwrap_or(i64::MAX));
    Ok(memberships)
}

/// Resolve memberships into songs grouped per parent
pub(crate) async fn songs_by_parent<G: DataGateway>(
    gateway: &G,
    access_token: Option<String>,
    memberships: &[Membership],
) -> GatewayResult<HashMap<Id, Vec<Song>>> {
    let mut grouped: HashMap<Id, Vec<Song>> = HashMap::new();
    if memberships.is_empty() {
        return Ok(grouped);
    }

    let mut song_ids: Vec<&Id> = memberships.iter().map(|m| &m.song_id).collect();
    song_ids.sort();
    song_ids.dedup();

    let rows = gateway
        .select(
            access_token,
            Query::new(Collection::Songs).filter(Filter::any_of("id", song_ids)),
        )
        .await?;
    let songs: HashMap<Id, Song> = decode_rows::<Song>(Collection::Songs, rows)?
        .into_iter()
        .map(|song| (song.id.clone(), song))
        .collect();

    for membership in memberships {
        // memberships of songs that were deleted meanwhile are skipped
        if let Some(song) = songs.get(&membership.song_id) {
            grouped
                .entry(membership.playlist_id.clone())
                .or_default()
                .push(song.clone());
        }
    }

    Ok(grouped)
}

/// Next free position within a parent, counting its current members
pub(crate) fn next_position(existing: &[Row]) -> i64 {
    existing
        .iter()
        .filter_map(|row| row.get("position").and_then(Value::as_i64))
        .max()
        .unwrap_or(0)
        .max(existing.len() as i64)
        + 1
}
