pub mod link;
pub mod metadata;
pub mod song;
pub mod token;
