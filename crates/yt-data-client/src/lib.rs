mod error;
mod models;
mod pagination;

pub use error::YouTubeError;
pub use models::{Channel, Playlist, Privacy, Video};
pub use pagination::{Page, PageSource, PartialFetch, fetch_all, fetch_all_with};

use models::{ChannelResource, ListResponse, PlaylistItemResource, PlaylistResource};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

/// Production REST endpoint
pub const DEFAULT_API_ADDRESS: &str = "https://www.googleapis.com";

/// Largest page the Data API allows
const MAX_RESULTS: &str = "50";

/// Authenticated YouTube Data API v3 client
pub struct YouTubeClient {
    http: reqwest::Client,
    api_address: String,
    access_token: String,
}

impl YouTubeClient {
    pub fn new(
        api_address: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Result<Self, YouTubeError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(YouTubeError::Client)?;

        Ok(YouTubeClient {
            http,
            api_address: api_address.into().trim_end_matches('/').to_string(),
            access_token: access_token.into(),
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        resource: &str,
        query: &[(&str, &str)],
    ) -> Result<T, YouTubeError> {
        let url = format!("{}/youtube/v3/{}", self.api_address, resource);
        debug!("GET {}", url);

        let http_error = |source| YouTubeError::Http {
            resource: resource.to_string(),
            source,
        };

        let response = self
            .http
            .get(&url)
            .query(query)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(http_error)?;

        let status = response.status();
        let body = response.text().await.map_err(http_error)?;

        if !status.is_success() {
            return Err(YouTubeError::Status {
                resource: resource.to_string(),
                status,
                body,
            });
        }

        serde_json::from_str(&body).map_err(|source| YouTubeError::Decode {
            resource: resource.to_string(),
            source,
        })
    }

    /// The channel owned by the authenticated account, if it has one
    pub async fn my_channel(&self) -> Result<Option<Channel>, YouTubeError> {
        let response: ListResponse<ChannelResource> = self
            .get("channels", &[("part", "snippet"), ("mine", "true")])
            .await?;
        Ok(response.items.into_iter().next().map(Channel::from))
    }

    pub async fn playlists_page(
        &self,
        page_token: Option<&str>,
    ) -> Result<Page<Playlist>, YouTubeError> {
        let mut query = vec![
            ("part", "snippet,contentDetails,status"),
            ("mine", "true"),
            ("maxResults", MAX_RESULTS),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response: ListResponse<PlaylistResource> = self.get("playlists", &query).await?;
        Ok(Page {
            items: response.items.into_iter().map(Playlist::from).collect(),
            next_page_token: response.next_page_token,
        })
    }

    pub async fn playlist_items_page(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
    ) -> Result<Page<Video>, YouTubeError> {
        let mut query = vec![
            ("part", "snippet,contentDetails"),
            ("playlistId", playlist_id),
            ("maxResults", MAX_RESULTS),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response: ListResponse<PlaylistItemResource> =
            self.get("playlistItems", &query).await?;
        Ok(Page {
            items: response.items.into_iter().map(Video::from).collect(),
            next_page_token: response.next_page_token,
        })
    }

    /// All playlists of the authenticated account, as a [`PageSource`]
    pub fn my_playlists(&self) -> MyPlaylists<'_> {
        MyPlaylists { client: self }
    }

    /// All videos of one playlist, as a [`PageSource`]
    pub fn playlist_items<'a>(&'a self, playlist_id: &'a str) -> PlaylistItems<'a> {
        PlaylistItems {
            client: self,
            playlist_id,
        }
    }
}

pub struct MyPlaylists<'a> {
    client: &'a YouTubeClient,
}

impl PageSource for MyPlaylists<'_> {
    type Item = Playlist;
    type Error = YouTubeError;

    async fn fetch_page(
        &mut self,
        page_token: Option<&str>,
    ) -> Result<Page<Playlist>, YouTubeError> {
        self.client.playlists_page(page_token).await
    }
}

pub struct PlaylistItems<'a> {
    client: &'a YouTubeClient,
    playlist_id: &'a str,
}

impl PageSource for PlaylistItems<'_> {
    type Item = Video;
    type Error = YouTubeError;

    async fn fetch_page(&mut self, page_token: Option<&str>) -> Result<Page<Video>, YouTubeError> {
        self.client
            .playlist_items_page(self.playlist_id, page_token)
            .await
    }
}
