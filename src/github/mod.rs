pub mod contribution;

pub use contribution::client;
pub use contribution::ContributionFetcher;
pub use contribution::WindowProgress;
pub use contribution::GITHUB_API_URL;
