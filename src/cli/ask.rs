//! One-shot dispatch through the brain, without a socket or storage.

use crate::app::build_gateway;
use crate::brain::{Brain, ToneMode};
use crate::config::Config;
use anyhow::{anyhow, Result};

use super::args::AskCliArgs;

pub async fn handle_ask_command(args: AskCliArgs) -> Result<()> {
    let config = Config::load()?;
    let mut tone = ToneMode::parse(&args.tone)
        .ok_or_else(|| anyhow!("Unknown tone '{}': use auto, internal, client or neutral", args.tone))?;

    let brain = Brain::new(build_gateway(&config)?, &config.assistant);
    let text = args.text.join(" ");

    match brain.ask(&text, &mut tone).await? {
        Some(reply) => {
            println!("[{}] {}", reply.kind(), reply.text());
        }
        None => {
            println!(
                "(silent: not addressed to '{}' and no command matched)",
                brain.wake_word()
            );
        }
    }

    Ok(())
}
