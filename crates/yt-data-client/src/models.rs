use serde::Deserialize;
use std::fmt;

/// Playlist visibility as reported by `status.privacyStatus`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    Public,
    Unlisted,
    Private,
    /// Anything the API adds later, kept verbatim
    #[serde(untagged)]
    Other(String),
}

impl Privacy {
    pub fn as_str(&self) -> &str {
        match self {
            Privacy::Public => "public",
            Privacy::Unlisted => "unlisted",
            Privacy::Private => "private",
            Privacy::Other(s) => s,
        }
    }
}

impl fmt::Display for Privacy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    pub id: String,
    pub title: String,
    pub privacy: Privacy,
    pub video_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub description: String,
    pub published_at: String,
    pub channel_title: String,
}

// Wire shapes, limited to the fields that are read.

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChannelResource {
    id: String,
    snippet: TitleSnippet,
}

#[derive(Debug, Deserialize)]
struct TitleSnippet {
    title: String,
}

impl From<ChannelResource> for Channel {
    fn from(resource: ChannelResource) -> Self {
        Channel {
            id: resource.id,
            title: resource.snippet.title,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistResource {
    id: String,
    snippet: TitleSnippet,
    status: PlaylistStatus,
    content_details: PlaylistContentDetails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistStatus {
    privacy_status: Privacy,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistContentDetails {
    #[serde(default)]
    item_count: u64,
}

impl From<PlaylistResource> for Playlist {
    fn from(resource: PlaylistResource) -> Self {
        Playlist {
            id: resource.id,
            title: resource.snippet.title,
            privacy: resource.status.privacy_status,
            video_count: resource.content_details.item_count,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlaylistItemResource {
    #[serde(default)]
    snippet: PlaylistItemSnippet,
    content_details: PlaylistItemContentDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemSnippet {
    title: Option<String>,
    description: Option<String>,
    published_at: Option<String>,
    // absent for deleted and private videos
    video_owner_channel_title: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemContentDetails {
    video_id: String,
}

impl From<PlaylistItemResource> for Video {
    fn from(resource: PlaylistItemResource) -> Self {
        let snippet = resource.snippet;
        Video {
            id: resource.content_details.video_id,
            title: snippet.title.unwrap_or_else(|| "Unknown Title".to_string()),
            description: snippet.description.unwrap_or_default(),
            published_at: snippet.published_at.unwrap_or_default(),
            channel_title: snippet
                .video_owner_channel_title
                .unwrap_or_else(|| "Unknown".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_privacy_parsing() {
        let parse = |s: &str| serde_json::from_str::<Privacy>(s).unwrap();
        assert_eq!(parse(r#""unlisted""#), Privacy::Unlisted);
        assert_eq!(parse(r#""public""#), Privacy::Public);
        assert_eq!(
            parse(r#""somethingNew""#),
            Privacy::Other("somethingNew".to_string())
        );
        assert_eq!(Privacy::Other("x".to_string()).to_string(), "x");
    }

    #[test]
    fn test_playlist_from_resource() {
        let json = r#"{
            "kind": "youtube#playlist",
            "id": "PL123",
            "snippet": {"title": "Road trip", "channelTitle": "me"},
            "status": {"privacyStatus": "private"},
            "contentDetails": {"itemCount": 12}
        }"#;
        let resource: PlaylistResource = serde_json::from_str(json).unwrap();
        let playlist = Playlist::from(resource);
        assert_eq!(playlist.id, "PL123");
        assert_eq!(playlist.title, "Road trip");
        assert_eq!(playlist.privacy, Privacy::Private);
        assert_eq!(playlist.video_count, 12);
    }

    #[test]
    fn test_video_defaults_for_unavailable_items() {
        let json = r#"{
            "snippet": {"title": "Deleted video", "description": "This video is unavailable."},
            "contentDetails": {"videoId": "abc"}
        }"#;
        let video = Video::from(serde_json::from_str::<PlaylistItemResource>(json).unwrap());
        assert_eq!(video.id, "abc");
        assert_eq!(video.title, "Deleted video");
        assert_eq!(video.published_at, "");
        assert_eq!(video.channel_title, "Unknown");

        let bare = r#"{"contentDetails": {"videoId": "xyz"}}"#;
        let video = Video::from(serde_json::from_str::<PlaylistItemResource>(bare).unwrap());
        assert_eq!(video.title, "Unknown Title");
        assert_eq!(video.description, "");
    }

    #[test]
    fn test_list_response_without_items() {
        let page: ListResponse<ChannelResource> =
            serde_json::from_str(r#"{"kind": "youtube#channelListResponse"}"#).unwrap();
        assert!(page.items.is_empty());
        assert!(page.next_page_token.is_none());
    }
}
