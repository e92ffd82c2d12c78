use url::Url;

use crate::entities::song::Platform;
use crate::error::{SongError, SongResult};

const SOUNDCLOUD_MARKER: &str = "soundcloud.com";
const SPOTIFY_MARKER: &str = "spotify.com";

/// A link that was recognised and carries a platform-native track id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedLink {
    pub platform: Platform,
    pub track_id: String,
}

/// Classify a link by the platform domain it mentions. SoundCloud is checked first.
pub fn classify(raw_link: &str) -> Platform {
    if raw_link.contains(SOUNDCLOUD_MARKER) {
        Platform::SoundCloud
    } else if raw_link.contains(SPOTIFY_MARKER) {
        Platform::Spotify
    } else {
        Platform::Unknown
    }
}

/// Resolve a user supplied link into its platform and track id.
pub fn resolve(raw_link: &str) -> SongResult<ResolvedLink> {
    match classify(raw_link) {
        // No API credentials are issued for SoundCloud
        Platform::SoundCloud => Err(SongError::UnsupportedProvider(
            Platform::SoundCloud.to_string(),
        )),
        Platform::Spotify => {
            let url = Url::parse(raw_link)
                .map_err(|e| SongError::MalformedLink(format!("{raw_link}: {e}")))?;
            let track_id = spotify_track_id(url.path())
                .ok_or_else(|| SongError::TrackIdNotFound(raw_link.to_string()))?;

            Ok(ResolvedLink {
                platform: Platform::Spotify,
                track_id,
            })
        }
        Platform::Unknown => Err(SongError::UnsupportedProvider(
            "unrecognised platform".to_string(),
        )),
    }
}

/// Find the segment following `track` in a Spotify path, e.g. `/intl-de/track/<id>`.
/// `Url::path` carries no query string. When `track` appears more than once the last one wins.
fn spotify_track_id(path: &str) -> Option<String> {
    let segments: Vec<&str> = path.split('/').collect();

    segments
        .windows(2)
        .rfind(|pair| pair[0] == "track")
        .map(|pair| pair[1])
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
