use axum::extract::{Query, State};
use axum::http::{header, HeaderMap};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::AppState;
use crate::error::ApiError;
use crate::link::{bandlab_embed_url, classify, normalize, resolve_embed, Platform, ResolvedMedia};
use crate::relay::RelayError;
use crate::submission::{import_rows, Row, Song, SongStatus, Tally, Vote};

#[derive(Debug, Deserialize)]
pub struct LinkQuery {
    url: Option<String>,
}

impl LinkQuery {
    /// A blank parameter counts as missing
    fn url(&self) -> Option<&str> {
        self.url.as_deref().filter(|u| !u.trim().is_empty())
    }
}

#[derive(Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    audio_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    artist: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cover: Option<String>,
}

impl From<ResolvedMedia> for ResolveResponse {
    fn from(media: ResolvedMedia) -> Self {
        Self {
            audio_url: media.audio_url,
            id: media.embed_id,
            title: media.title,
            artist: media.artist,
            cover: media.cover_url,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmbedResponse {
    url: String,
    platform: Platform,
    embed_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    media: Option<ResolvedMedia>,
}

/// GET /api/resolve-bandlab
pub async fn resolve_bandlab(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
) -> Result<Json<ResolveResponse>, ApiError> {
    let link = query.url().ok_or(ApiError::MissingUrl)?;
    let media = state.bandlab.try_resolve(link).await?;
    Ok(Json(media.into()))
}

/// GET /api/stream-audio
pub async fn stream_audio(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
    headers: HeaderMap,
) -> Result<Response, RelayError> {
    let asset_url = query.url().ok_or(RelayError::MissingUrl)?;
    state
        .relay
        .relay(asset_url, headers.get(header::RANGE))
        .await
}

/// GET /api/embed
///
/// Everything known about a link: where it points, which platform it belongs
/// to, and the best embed for it. Unresolvable links still get the embed that
/// can be derived locally.
pub async fn embed(
    State(state): State<AppState>,
    Query(query): Query<LinkQuery>,
) -> Result<Json<EmbedResponse>, ApiError> {
    let raw = query.url().ok_or(ApiError::MissingUrl)?;
    let link = normalize(raw).unwrap_or(raw);
    let platform = classify(link);
    let mut embed_url = resolve_embed(link, platform);

    let media = match platform {
        Platform::Bandlab => Some(state.bandlab.resolve_remote(link).await),
        _ => None,
    }
    .filter(|media| !media.is_empty());

    // Remote embed id for links the local rules could not handle
    if let Some(id) = media.as_ref().and_then(|m| m.embed_id.as_deref()) {
        if embed_url == link {
            embed_url = bandlab_embed_url(id);
        }
    }

    Ok(Json(EmbedResponse {
        url: link.to_owned(),
        platform,
        embed_url,
        media,
    }))
}

/// POST /api/import
pub async fn import(Json(rows): Json<Vec<Row>>) -> Json<Vec<Song>> {
    Json(import_rows(&rows))
}

#[derive(Debug, Deserialize)]
pub struct VoteRequest {
    song: Song,
    vote: Vote,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    song: Song,
    status: SongStatus,
}

#[derive(Debug, Serialize)]
pub struct SongResponse {
    song: Song,
    tally: Tally,
}

impl From<Song> for SongResponse {
    fn from(song: Song) -> Self {
        Self {
            tally: song.tally(),
            song,
        }
    }
}

/// POST /api/vote
pub async fn vote(Json(request): Json<VoteRequest>) -> Json<SongResponse> {
    let VoteRequest { mut song, vote } = request;
    song.cast_vote(vote);
    Json(song.into())
}

/// POST /api/status
pub async fn status(Json(request): Json<StatusRequest>) -> Json<SongResponse> {
    let StatusRequest { mut song, status } = request;
    song.set_status(status);
    Json(song.into())
}
