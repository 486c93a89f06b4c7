//! Read-side computations that do not touch storage

pub mod stats;

pub use stats::CampaignStats;
