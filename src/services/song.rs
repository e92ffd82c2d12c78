use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};

use crate::database::{Database, NewSong};
use crate::entities::song;
use crate::error::{SongError, SongResult};
use crate::services::link;
use crate::services::metadata::MetadataFetcher;
use crate::services::token::TokenManager;

pub const DEFAULT_PAGE_SIZE: u64 = 25;
pub const MAX_PAGE_SIZE: u64 = 100;

pub struct SongHistoryPage {
    pub items: Vec<song::Model>,
    pub total_count: u64,
    pub page_size: u64,
    pub offset: u64,
}

/// Truncate a timestamp to midnight UTC of the same day
pub fn start_of_day(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Publishes new recommendations and serves the current one.
pub struct SongService {
    db: Arc<Database>,
    tokens: Arc<TokenManager>,
    metadata: Arc<MetadataFetcher>,
}

impl SongService {
    pub fn new(db: Arc<Database>, tokens: Arc<TokenManager>, metadata: Arc<MetadataFetcher>) -> Self {
        Self {
            db,
            tokens,
            metadata,
        }
    }

    /// Resolve the link, fetch its metadata and store a new recommendation.
    ///
    /// Nothing is written unless every earlier step succeeded. Repeating a call
    /// stores another history row; submissions are not deduplicated.
    #[tracing::instrument(skip(self))]
    pub async fn submit(&self, raw_link: &str) -> SongResult<song::Model> {
        let resolved = link::resolve(raw_link).inspect_err(|e| {
            tracing::debug!(error = %e, "Rejected song link");
        })?;
        tracing::debug!(platform = %resolved.platform, track_id = %resolved.track_id, "Link resolved");

        let token = self.tokens.get_valid_token().await?;

        let metadata = self
            .metadata
            .fetch_track(resolved.platform, &resolved.track_id, &token)
            .await?;

        let new_song = NewSong {
            title: metadata.title,
            artist: metadata.artist,
            image_url: metadata.image_url,
            submitted_at: start_of_day(Utc::now()),
            song_url: raw_link.to_string(),
            platform: resolved.platform,
        };

        self.db.insert_song(new_song).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to store song recommendation");
            SongError::from(e)
        })
    }

    pub async fn get_latest(&self) -> SongResult<song::Model> {
        self.db
            .latest_song()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Failed to query latest song");
                SongError::from(e)
            })?
            .ok_or(SongError::NotFound)
    }

    pub async fn history(
        &self,
        page_size: Option<u64>,
        offset: Option<u64>,
    ) -> SongResult<SongHistoryPage> {
        let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
        let offset = offset.unwrap_or(0);

        let total_count = self.db.count_songs().await?;
        let items = self.db.list_songs(offset, page_size).await?;

        Ok(SongHistoryPage {
            items,
            total_count,
            page_size,
            offset,
        })
    }
}
