use clap::Args;
use wa_core::job::DEFAULT_MIN_READS;
use wa_core::{Category, HarvestJob, HarvestRequest, Result};

use crate::queue::TaskQueue;

#[derive(Args, Debug, Clone)]
pub struct HarvestArgs {
    /// Keywords to harvest, one search per keyword
    #[arg(required = true)]
    pub keywords: Vec<String>,
    /// Category to tag results with (tech, finance, lifestyle, education, health, entertainment or all)
    #[arg(long, default_value = "all")]
    pub category: String,
    /// Drop candidates with fewer reads than this
    #[arg(long, default_value_t = DEFAULT_MIN_READS)]
    pub min_reads: u64,
}

impl HarvestArgs {
    pub fn to_request(&self) -> Result<HarvestRequest> {
        Ok(HarvestRequest::new(
            self.keywords.clone(),
            self.category.parse::<Category>()?,
            self.min_reads,
        ))
    }
}

/// Submits the harvest and waits for it to finish.
pub async fn handle_command(args: HarvestArgs, queue: &TaskQueue) -> Result<HarvestJob> {
    let handle = queue.submit(args.to_request()?).await?;
    Ok(handle.wait().await)
}
