//! Run command implementation

use crate::config::Config;
use crate::poller::{Direction, QuotePoller, QuoteSnapshot};
use clap::Args;
use std::sync::Arc;

const DISCLAIMER: &str =
    "FOR ENTERTAINMENT PURPOSES ONLY! DO NOT USE THIS TOOL AS FINANCIAL ADVICE!";

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Print each snapshot as a JSON line instead of a readout
    #[arg(long)]
    pub json: bool,
}

impl RunArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let poller = Arc::new(QuotePoller::from_config(config.quote.clone())?);
        let mut subscription = poller.subscribe();

        if !self.json {
            println!("{}", DISCLAIMER);
        }

        let handle = poller.clone().start();

        loop {
            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!("Interrupt received, stopping poller");
                    break;
                }
                snapshot = subscription.recv() => match snapshot {
                    Some(snapshot) => self.render(&snapshot)?,
                    None => break,
                },
            }
        }

        poller.unsubscribe(subscription.id);
        handle.stop().await;
        Ok(())
    }

    fn render(&self, snapshot: &QuoteSnapshot) -> anyhow::Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(snapshot)?);
        } else {
            println!("{}", format_readout(snapshot));
        }
        Ok(())
    }
}

/// One-line price readout: symbol, price, direction marker, price time
pub fn format_readout(snapshot: &QuoteSnapshot) -> String {
    let price = match snapshot.price {
        Some(p) => format!("${:.2}", p),
        None => "$--".to_string(),
    };
    let marker = match snapshot.direction {
        Direction::Up => " ▲",
        Direction::Down => " ▼",
        Direction::Flat => "",
    };
    let time = snapshot
        .price_time
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_default();

    format!("{} {}{} {}", snapshot.symbol, price, marker, time)
        .trim_end()
        .to_string()
}
