use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::Serialize;

/// A stored recommendation. Rows are only ever inserted; the current pick is the highest id.
#[sea_orm::model]
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "songs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub submitted_at: DateTime<Utc>,
    pub song_url: String,
    pub platform: Platform,
}

/// The music service a link points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum Platform {
    #[sea_orm(string_value = "Spotify")]
    Spotify,
    #[sea_orm(string_value = "SoundCloud")]
    SoundCloud,
    #[sea_orm(string_value = "Unknown")]
    Unknown,
}

impl Platform {
    pub fn canonical_name(&self) -> &'static str {
        match self {
            Platform::Spotify => "Spotify",
            Platform::SoundCloud => "SoundCloud",
            Platform::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.canonical_name())
    }
}

impl ActiveModelBehavior for ActiveModel {}
