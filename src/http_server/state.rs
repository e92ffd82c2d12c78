use crate::services::song::SongService;

pub struct AppState {
    pub songs: SongService,
    /// Shared secret required by the write endpoint
    pub api_token: String,
}
