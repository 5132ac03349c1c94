pub mod crawlers;
pub mod domain;
pub mod models;
pub mod processing;
pub mod repository;

/// Fused similarity a candidate must exceed to be retained.
pub const SIMILARITY_THRESHOLD: f64 = 0.7;

/// Share of the visual score in the fused score.
pub const DEFAULT_VISUAL_WEIGHT: f64 = 0.5;

/// Longest video, in seconds, considered for matching.
pub const DEFAULT_MAX_DURATION: u32 = 20;
