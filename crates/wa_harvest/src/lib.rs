pub mod cli;
pub mod fetcher;
pub mod harvester;
pub mod logging;
pub mod queue;
pub mod scheduler;
pub mod sources;

pub use cli::{handle_command, HarvestArgs};
pub use fetcher::{ContentFetcher, HttpContentFetcher};
pub use harvester::Harvester;
pub use queue::{HarvestPipeline, JobHandle, JobRunner, TaskQueue};
pub use scheduler::{HarvestScheduler, SchedulerHandle, Ticker};
pub use sources::{ContentSource, SyntheticSource};

pub mod prelude {
    pub use super::sources::ContentSource;
    pub use wa_core::{Article, Error, Result};
}
