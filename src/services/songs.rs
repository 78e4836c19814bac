use super::{optional, record};
use crate::{
    gateway::{
        Collection, DataGateway, Failure, Filter, GatewayResult, Ordering, Query, decode_rows,
    },
    model::Credentials,
    types::{Id, Song, SongDraft},
};
use serde_json::Value;

/// All songs ordered by title
pub async fn load<G: DataGateway>(
    gateway: &G,
    access_token: Option<String>,
) -> GatewayResult<Vec<Song>> {
    let rows = gateway
        .select(
            access_token,
            Query::new(Collection::Songs).order_by(Ordering::ascending("title")),
        )
        .await?;

    decode_rows(Collection::Songs, rows)
}

/// Insert a new song and return it with the id the store assigned
pub async fn add<G: DataGateway>(
    gateway: &G,
    credentials: &Credentials,
    draft: &SongDraft,
) -> GatewayResult<Song> {
    let row = gateway
        .insert(
            Some(credentials.access_token.clone()),
            Collection::Songs,
            record([
                ("title", Value::from(draft.title())),
                ("author", Value::from(draft.author())),
                ("youtube_url", optional(draft.youtube_url())),
                ("lyrics", optional(draft.lyrics())),
                ("created_by", credentials.user_id.to_value()),
            ]),
        )
        .await?;

    decode_rows(Collection::Songs, vec![row])?
        .pop()
        .ok_or_else(|| Failure::new("insert into songs returned no row"))
}

pub async fn update<G: DataGateway>(
    gateway: &G,
    credentials: &Credentials,
    song_id: &Id,
    draft: &SongDraft,
) -> GatewayResult<()> {
    gateway
        .update(
            Some(credentials.access_token.clone()),
            Collection::Songs,
            vec![Filter::eq("id", song_id)],
            record([
                ("title", Value::from(draft.title())),
                ("author", Value::from(draft.author())),
                ("youtube_url", optional(draft.youtube_url())),
                ("lyrics", optional(draft.lyrics())),
                ("updated_by", credentials.user_id.to_value()),
            ]),
        )
        .await
}

/// Replace the comment of a song
pub async fn save_comment<G: DataGateway>(
    gateway: &G,
    credentials: &Credentials,
    song_id: &Id,
    comment: &str,
) -> GatewayResult<()> {
    gateway
        .update(
            Some(credentials.access_token.clone()),
            Collection::Songs,
            vec![Filter::eq("id", song_id)],
            record([
                ("comments", Value::from(comment.trim())),
                ("updated_by", credentials.user_id.to_value()),
            ]),
        )
        .await
}

/// Delete a song after removing it from every playlist
pub async fn delete<G: DataGateway>(
    gateway: &G,
    credentials: &Credentials,
    song_id: &Id,
) -> GatewayResult<()> {
    let access_token = Some(credentials.access_token.clone());

    for collection in [Collection::PlaylistSongs, Collection::SundayPlaylistSongs] {
        gateway
            .delete(
                access_token.clone(),
                collection,
                vec![Filter::eq("song_id", song_id)],
            )
            .await?;
    }

    gateway
        .delete(
            access_token,
            Collection::Songs,
            vec![Filter::eq("id", song_id)],
        )
        .await
}
