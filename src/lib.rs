pub mod arena;
pub mod artwork;
pub mod classifier;
pub mod config;
pub mod dex;
pub mod matchup;
pub mod persist;
pub mod report_export;
pub mod round_robin;
pub mod slug;
pub mod state;
