use super::{ALREADY_IN_PLAYLIST, memberships, next_position, optional, record, songs_by_parent};
use crate::{
    gateway::{
        Collection, DataGateway, Failure, Filter, GatewayResult, Ordering, Query,
        UNIQUE_VIOLATION, decode_rows,
    },
    model::Credentials,
    types::{Id, LoadedPlaylist, Playlist, PlaylistDraft},
};
use serde_json::Value;

/// Playlists of the signed-in user, ordered by name
pub async fn owned_by<G: DataGateway>(
    gateway: &G,
    credentials: &Credentials,
) -> GatewayResult<Vec<Playlist>> {
    let rows = gateway
        .select(
            Some(credentials.access_token.clone()),
            Query::new(Collection::Playlists)
                .filter(Filter::eq("user_id", &credentials.user_id))
                .order_by(Ordering::ascending("name")),
        )
        .await?;

    decode_rows(Collection::Playlists, rows)
}

/// Playlists of the signed-in user together with their songs
pub async fn load<G: DataGateway>(
    gateway: &G,
    credentials: &Credentials,
) -> GatewayResult<Vec<LoadedPlaylist>> {
    let access_token = Some(credentials.access_token.clone());
    let playlists = owned_by(gateway, credentials).await?;

    let ids: Vec<Id> = playlists.iter().map(|p| p.id.clone()).collect();
    let memberships =
        memberships(gateway, access_token.clone(), Collection::PlaylistSongs, &ids).await?;
    let mut songs = songs_by_parent(gateway, access_token, &memberships).await?;

    Ok(playlists
        .into_iter()
        .map(|playlist| LoadedPlaylist {
            songs: songs.remove(&playlist.id).unwrap_or_default(),
            playlist,
        })
        .collect())
}

/// Songs of a single playlist in membership order
pub async fn songs_of<G: DataGateway>(
    gateway: &G,
    access_token: Option<String>,
    playlist_id: &Id,
) -> GatewayResult<Vec<crate::types::Song>> {
    let ids = [playlist_id.clone()];
    let memberships =
        memberships(gateway, access_token.clone(), Collection::PlaylistSongs, &ids).await?;
    let mut songs = songs_by_parent(gateway, access_token, &memberships).await?;

    Ok(songs.remove(playlist_id).unwrap_or_default())
}

pub async fn create<G: DataGateway>(
    gateway: &G,
    credentials: &Credentials,
    draft: &PlaylistDraft,
) -> GatewayResult<()> {
    gateway
        .insert(
            Some(credentials.access_token.clone()),
            Collection::Playlists,
            record([
                ("name", Value::from(draft.name())),
                ("description", optional(draft.description())),
                ("user_id", credentials.user_id.to_value()),
            ]),
        )
        .await
        .map(|_| ())
}

pub async fn update<G: DataGateway>(
    gateway: &G,
    credentials: &Credentials,
    playlist_id: &Id,
    draft: &PlaylistDraft,
) -> GatewayResult<()> {
    gateway
        .update(
            Some(credentials.access_token.clone()),
            Collection::Playlists,
            vec![Filter::eq("id", playlist_id)],
            record([
                ("name", Value::from(draft.name())),
                ("description", optional(draft.description())),
            ]),
        )
        .await
}

/// Delete a playlist: memberships first, then the playlist itself.
///
/// The two calls are not atomic; if the second one fails the playlist
/// remains, without songs.
pub async fn delete<G: DataGateway>(
    gateway: &G,
    credentials: &Credentials,
    playlist_id: &Id,
) -> GatewayResult<()> {
    let access_token = Some(credentials.access_token.clone());

    gateway
        .delete(
            access_token.clone(),
            Collection::PlaylistSongs,
            vec![Filter::eq("playlist_id", playlist_id)],
        )
        .await?;

    gateway
        .delete(
            access_token,
            Collection::Playlists,
            vec![Filter::eq("id", playlist_id)],
        )
        .await
}

/// Add a song to a playlist unless it is already part of it.
///
/// The pre-check is best effort; a concurrent insert is still caught by the
/// store's unique constraint and reported with the same code.
pub async fn add_song<G: DataGateway>(
    gateway: &G,
    credentials: &Credentials,
    playlist_id: &Id,
    song_id: &Id,
) -> GatewayResult<()> {
    let access_token = Some(credentials.access_token.clone());

    let existing = gateway
        .select(
            access_token.clone(),
            Query::new(Collection::PlaylistSongs).filter(Filter::eq("playlist_id", playlist_id)),
        )
        .await?;

    if existing
        .iter()
        .any(|row| Filter::eq("song_id", song_id).matches(row))
    {
        return Err(Failure::with_code(ALREADY_IN_PLAYLIST, UNIQUE_VIOLATION));
    }

    gateway
        .insert(
            access_token,
            Collection::PlaylistSongs,
            record([
                ("playlist_id", playlist_id.to_value()),
                ("song_id", song_id.to_value()),
                ("position", Value::from(next_position(&existing))),
            ]),
        )
        .await
        .map(|_| ())
}

pub async fn remove_song<G: DataGateway>(
    gateway: &G,
    credentials: &Credentials,
    playlist_id: &Id,
    song_id: &Id,
) -> GatewayResult<()> {
    gateway
        .delete(
            Some(credentials.access_token.clone()),
            Collection::PlaylistSongs,
            vec![
                Filter::eq("playlist_id", playlist_id),
                Filter::eq("song_id", song_id),
            ],
        )
        .await
}
