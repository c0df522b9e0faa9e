//! Resolves BandLab post links to a playable audio asset.
//!
//! A post id is taken from the link itself or, failing that, from the app deep
//! link in the post page. The posts API then gives the mixdown file along with
//! title, artist and cover art. When there is no id or no audio, the embed id
//! advertised in the post page is used instead. Each network step runs at most
//! once per resolution and failures fall through to the next strategy.

mod api;
mod error;
mod post_id;
mod scrape;

use std::time::Duration;

use reqwest::{header, Client, RequestBuilder};
use tracing::{debug, warn};

pub use self::api::UNKNOWN_ARTIST;
pub use self::error::ResolveError;
use self::api::Post;
use self::post_id::PostId;
use crate::cache::ResolutionCache;
use crate::config::Config;
use crate::link::{find_url, normalize, ResolvedMedia};

pub struct BandlabClient {
    http: Client,
    user_agent: String,
    api_base: String,
    timeout: Duration,
    cache: ResolutionCache,
}

enum PageState {
    /// Link has no URL to fetch
    Unavailable,
    Pending,
    Loaded(String),
    Failed(ResolveError),
}

/// Post page markup, fetched on first use
struct PostPage<'a> {
    url: &'a str,
    state: PageState,
}

impl<'a> PostPage<'a> {
    fn new(url: &'a str) -> Self {
        let state = match find_url(url) {
            Some(_) => PageState::Pending,
            None => PageState::Unavailable,
        };
        Self { url, state }
    }

    async fn html(&mut self, client: &BandlabClient) -> Option<&str> {
        if let PageState::Pending = self.state {
            self.state = match client.fetch_page(self.url).await {
                Ok(html) => PageState::Loaded(html),
                Err(e) => {
                    warn!("Could not fetch post page {}: {}", self.url, e);
                    PageState::Failed(e)
                }
            };
        }
        match &self.state {
            PageState::Loaded(html) => Some(html.as_str()),
            _ => None,
        }
    }

    fn into_error(self) -> Option<ResolveError> {
        match self.state {
            PageState::Failed(e) => Some(e),
            _ => None,
        }
    }
}

impl BandlabClient {
    pub fn new(config: &Config, http: Client) -> Self {
        Self {
            http,
            user_agent: config.user_agent.clone(),
            api_base: config.bandlab.api_base.as_str().trim_end_matches('/').to_owned(),
            timeout: config.request_timeout(),
            cache: ResolutionCache::new(config.cache_ttl_secs, config.cache_max_entries),
        }
    }

    /// Resolve a link, anything that goes wrong yields an empty result
    pub async fn resolve_remote(&self, link: &str) -> ResolvedMedia {
        match self.try_resolve(link).await {
            Ok(media) => media,
            Err(e) => {
                debug!("Unresolved link {:?}: {}", link, e);
                ResolvedMedia::default()
            }
        }
    }

    /// Resolve a link, telling apart "nothing found" from "could not fetch".
    /// A successful result always has an audio URL or an embed id.
    pub async fn try_resolve(&self, link: &str) -> Result<ResolvedMedia, ResolveError> {
        let url = normalize(link).ok_or(ResolveError::NotFound)?;
        if let Some(media) = self.cache.get(url).await {
            debug!("Cached resolution for {}", url);
            return Ok(media);
        }
        let media = self.resolve_uncached(url).await?;
        self.cache.insert(url, &media).await;
        Ok(media)
    }

    async fn resolve_uncached(&self, url: &str) -> Result<ResolvedMedia, ResolveError> {
        let mut page = PostPage::new(url);

        let post_id = match post_id::from_url(url) {
            Some((strategy, id)) => {
                debug!("Post id {} from {} of {}", id, strategy, url);
                Some(id)
            }
            None => page.html(self).await.and_then(scrape::deep_link_post_id),
        };

        let mut media = ResolvedMedia::default();
        if let Some(post) = self.fetch_post(post_id.as_ref()).await {
            media.audio_url = post.audio_url();
            media.title = Some(post.title());
            media.artist = Some(post.artist());
            media.cover_url = post.cover_url();
            if media.audio_url.is_some() {
                return Ok(media);
            }
        }

        if let Some((strategy, id)) = page.html(self).await.and_then(scrape::embed_id) {
            debug!("Embed id {} from {} of {}", id, strategy, url);
            media.embed_id = Some(id);
            return Ok(media);
        }

        Err(page.into_error().unwrap_or(ResolveError::NotFound))
    }

    fn browser_get(&self, url: &str) -> RequestBuilder {
        self.http
            .get(url)
            .header(header::USER_AGENT, &self.user_agent)
            .timeout(self.timeout)
    }

    async fn fetch_page(&self, url: &str) -> Result<String, ResolveError> {
        let response = self.browser_get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ResolveError::Upstream(format!(
                "Failed to fetch: {}",
                status.as_u16()
            )));
        }
        Ok(response.text().await?)
    }

    async fn fetch_post(&self, id: Option<&PostId>) -> Option<Post> {
        let id = id?;
        let endpoint = format!("{}/posts/{}", self.api_base, id);
        let response = match self.browser_get(&endpoint).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Posts API request for {} failed: {}", id, e);
                return None;
            }
        };
        let status = response.status();
        if !status.is_success() {
            debug!("Posts API returned {} for {}", status, id);
            return None;
        }
        match response.json().await {
            Ok(post) => Some(post),
            Err(e) => {
                warn!("Unreadable posts API response for {}: {}", id, e);
                None
            }
        }
    }
}
