//! Fetch command implementation

use crate::config::Config;
use crate::poller::QuotePoller;
use clap::Args;

#[derive(Args, Debug)]
pub struct FetchArgs {
    /// Pretty-print the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl FetchArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let poller = QuotePoller::from_config(config.quote.clone())?;
        poller.poll_once().await?;

        let snapshot = poller.snapshot().await;
        let json = if self.pretty {
            serde_json::to_string_pretty(&snapshot)?
        } else {
            serde_json::to_string(&snapshot)?
        };
        println!("{}", json);

        Ok(())
    }
}
