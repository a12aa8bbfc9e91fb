/// External tool collaborators
pub mod download;
pub mod separation;

pub use download::DownloadService;
pub use separation::{SeparationOptions, SeparationService};
