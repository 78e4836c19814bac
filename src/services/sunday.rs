use super::{ALREADY_IN_PLAYLIST, memberships, next_position, record, songs_by_parent};
use crate::{
    gateway::{
        Collection, DataGateway, Failure, Filter, GatewayResult, Query, UNIQUE_VIOLATION,
        decode_rows,
    },
    model::Credentials,
    types::{Id, Service, ServiceSet, SundayNames, SundayPlaylist},
};
use serde_json::Value;

/// Look up the playlist of a service by its configured name
pub async fn find_playlist<G: DataGateway>(
    gateway: &G,
    access_token: Option<String>,
    names: &SundayNames,
    service: Service,
) -> GatewayResult<Option<SundayPlaylist>> {
    let rows = gateway
        .select(
            access_token,
            Query::new(Collection::SundayPlaylists).filter(Filter::eq("name", names.name(service))),
        )
        .await?;

    Ok(decode_rows::<SundayPlaylist>(Collection::SundayPlaylists, rows)?
        .into_iter()
        .next())
}

async fn require_playlist<G: DataGateway>(
    gateway: &G,
    access_token: Option<String>,
    names: &SundayNames,
    service: Service,
) -> GatewayResult<SundayPlaylist> {
    find_playlist(gateway, access_token, names, service)
        .await?
        .ok_or_else(|| Failure::new(format!("playlist \"{}\" not found", names.name(service))))
}

/// Both service playlists with their songs. A service whose playlist does not
/// exist is left out.
pub async fn load<G: DataGateway>(
    gateway: &G,
    access_token: Option<String>,
    names: &SundayNames,
) -> GatewayResult<Vec<ServiceSet>> {
    let mut found = Vec::new();
    for service in Service::ALL {
        if let Some(playlist) = find_playlist(gateway, access_token.clone(), names, service).await? {
            found.push((service, playlist));
        }
    }

    let ids: Vec<Id> = found.iter().map(|(_, playlist)| playlist.id.clone()).collect();
    let memberships = memberships(
        gateway,
        access_token.clone(),
        Collection::SundayPlaylistSongs,
        &ids,
    )
    .await?;
    let mut songs = songs_by_parent(gateway, access_token, &memberships).await?;

    Ok(found
        .into_iter()
        .map(|(service, playlist)| ServiceSet {
            service,
            songs: songs.remove(&playlist.id).unwrap_or_default(),
            playlist,
        })
        .collect())
}

pub async fn add_song<G: DataGateway>(
    gateway: &G,
    credentials: &Credentials,
    names: &SundayNames,
    service: Service,
    song_id: &Id,
) -> GatewayResult<()> {
    let access_token = Some(credentials.access_token.clone());
    let playlist = require_playlist(gateway, access_token.clone(), names, service).await?;

    let existing = gateway
        .select(
            access_token.clone(),
            Query::new(Collection::SundayPlaylistSongs)
                .filter(Filter::eq("sunday_playlist_id", &playlist.id)),
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
            Collection::SundayPlaylistSongs,
            record([
                ("sunday_playlist_id", playlist.id.to_value()),
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
    names: &SundayNames,
    service: Service,
    song_id: &Id,
) -> GatewayResult<()> {
    let access_token = Some(credentials.access_token.clone());
    let playlist = require_playlist(gateway, access_token.clone(), names, service).await?;

    gateway
        .delete(
            access_token,
            Collection::SundayPlaylistSongs,
            vec![
                Filter::eq("sunday_playlist_id", &playlist.id),
                Filter::eq("song_id", song_id),
            ],
        )
        .await
}
