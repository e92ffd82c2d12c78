use chrono::{DateTime, Utc};
use color_eyre::{Result, eyre::Context};
use migration::MigratorTrait;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ConnectOptions, Database as SeaDatabase, DatabaseConnection,
    DbErr, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect,
};
use std::time::Duration;

use crate::entities::song::{self, Platform};

pub struct Database {
    pub conn: DatabaseConnection,
}

/// A recommendation ready to be inserted. The id is assigned by storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSong {
    pub title: String,
    pub artist: String,
    pub image_url: String,
    pub submitted_at: DateTime<Utc>,
    pub song_url: String,
    pub platform: Platform,
}

impl Database {
    /// Connect to the database at `url` and bring the schema up to date
    pub async fn open(url: &str) -> Result<Self> {
        tracing::debug!("Connecting to database");

        let mut opt = ConnectOptions::new(url.to_owned());
        opt.max_connections(20)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(8))
            .acquire_timeout(Duration::from_secs(8))
            .idle_timeout(Duration::from_secs(60))
            .sqlx_logging(false);

        let conn = SeaDatabase::connect(opt)
            .await
            .context("Failed to connect to database")?;

        let database = Database { conn };
        database.migrate().await?;

        tracing::info!("Database ready");
        Ok(database)
    }

    pub async fn migrate(&self) -> Result<()> {
        tracing::debug!("Running database migrations");
        migration::Migrator::up(&self.conn, None)
            .await
            .context("Failed to run database migrations")
    }

    pub async fn insert_song(&self, new_song: NewSong) -> Result<song::Model, DbErr> {
        let active = song::ActiveModel {
            id: ActiveValue::NotSet,
            title: ActiveValue::Set(new_song.title),
            artist: ActiveValue::Set(new_song.artist),
            image_url: ActiveValue::Set(new_song.image_url),
            submitted_at: ActiveValue::Set(new_song.submitted_at),
            song_url: ActiveValue::Set(new_song.song_url),
            platform: ActiveValue::Set(new_song.platform),
        };

        let model = active.insert(&self.conn).await?;
        tracing::info!(id = model.id, title = %model.title, "Song recommendation stored");
        Ok(model)
    }

    /// The current recommendation is the row with the highest id
    pub async fn latest_song(&self) -> Result<Option<song::Model>, DbErr> {
        song::Entity::find()
            .order_by_desc(song::Column::Id)
            .one(&self.conn)
            .await
    }

    pub async fn list_songs(&self, offset: u64, limit: u64) -> Result<Vec<song::Model>, DbErr> {
        song::Entity::find()
            .order_by_desc(song::Column::Id)
            .limit(limit)
            .offset(offset)
            .all(&self.conn)
            .await
    }

    pub async fn count_songs(&self) -> Result<u64, DbErr> {
        song::Entity::find().count(&self.conn).await
    }
}
