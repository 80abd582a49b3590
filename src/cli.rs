use crate::app::SwapApp;
use crate::assets::{self, Asset, ASSETS};
use crate::panel::SwapPanel;
use crate::wallet::{KeypairWallet, Wallet};
use anyhow::Result;
use std::sync::Arc;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};

pub const HELP: &str = "\
commands:
  amount <n>      set the amount you pay (quotes after a short pause)
  from <SYMBOL>   token you pay with
  to <SYMBOL>     token you receive
  quote           quote the current inputs now
  swap            sign and send the swap for the current quote
  status          show the form
  assets          list tradable tokens
  connect         connect the configured wallet
  disconnect      disconnect the wallet
  help            show this text
  quit            exit";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    Amount(f64),
    From(&'static Asset),
    To(&'static Asset),
    Quote,
    Swap,
    Status,
    Assets,
    Connect,
    Disconnect,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),
    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),
    #[error("'{0}' is not a number")]
    BadAmount(String),
    #[error("unknown token '{0}', try 'assets'")]
    UnknownAsset(String),
}

fn asset_arg(name: &'static str, arg: Option<&str>) -> Result<&'static Asset, CommandError> {
    let symbol = arg.ok_or(CommandError::MissingArgument(name))?;
    assets::find(symbol).ok_or_else(|| CommandError::UnknownAsset(symbol.to_string()))
}

/// Parses one input line. Blank lines yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let arg = words.next();
    let command = match head.to_ascii_lowercase().as_str() {
        "amount" | "a" => {
            let raw = arg.ok_or(CommandError::MissingArgument("amount"))?;
            let amount = raw
                .parse::<f64>()
                .map_err(|_| CommandError::BadAmount(raw.to_string()))?;
            Command::Amount(amount)
        }
        "from" => Command::From(asset_arg("from", arg)?),
        "to" => Command::To(asset_arg("to", arg)?),
        "quote" => Command::Quote,
        "swap" => Command::Swap,
        "status" | "s" => Command::Status,
        "assets" => Command::Assets,
        "connect" => Command::Connect,
        "disconnect" => Command::Disconnect,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

pub fn render(panel: &SwapPanel, wallet: &dyn Wallet) -> String {
    let wallet_line = match wallet.public_key() {
        Some(pk) => format!("connected ({})", pk),
        None => "not connected".to_string(),
    };
    let action = if panel.can_swap() {
        "enabled"
    } else {
        "disabled"
    };
    format!(
        "You pay:     {} {}\nYou receive: {} {}\nwallet: {}\nstate: {} | swap {}",
        panel.from_amount(),
        panel.from_asset().symbol,
        panel.to_amount(),
        panel.to_asset().symbol,
        wallet_line,
        panel.phase(),
        action
    )
}

/// Interactive loop over stdin until `quit` or EOF.
pub async fn run(app: Arc<SwapApp>, wallet: Arc<KeypairWallet>) -> Result<()> {
    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match parse(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };
        match command {
            Command::Amount(amount) => app.set_from_amount(amount).await,
            Command::From(asset) => app.select_from(asset).await,
            Command::To(asset) => app.select_to(asset).await,
            Command::Quote => {
                app.refresh_quote().await;
                println!("{}", render(&app.snapshot().await, wallet.as_ref()));
            }
            Command::Swap => {
                let app = app.clone();
                tokio::spawn(async move {
                    match app.swap().await {
                        Ok(receipt) => println!(
                            "swap {} confirmed at {}: {}",
                            receipt.signature,
                            receipt.confirmed_at.format("%H:%M:%S"),
                            receipt.explorer_url
                        ),
                        Err(e) => println!("swap failed: {}", e),
                    }
                });
            }
            Command::Status => println!("{}", render(&app.snapshot().await, wallet.as_ref())),
            Command::Assets => {
                for asset in ASSETS.iter() {
                    println!("{:<5} {} ({} decimals)", asset.symbol, asset.mint, asset.decimals);
                }
            }
            Command::Connect => {
                if wallet.connect() {
                    log::info!("Wallet Connected!");
                } else {
                    println!("no wallet_keypair configured");
                }
            }
            Command::Disconnect => {
                wallet.disconnect();
                log::info!("Wallet disconnected");
            }
            Command::Help => println!("{}", HELP),
            Command::Quit => break,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::find;

    #[test]
    fn parses_amounts_and_tokens() {
        assert_eq!(parse("amount 1.5"), Ok(Some(Command::Amount(1.5))));
        assert_eq!(parse("  a 2 "), Ok(Some(Command::Amount(2.0))));
        assert_eq!(parse("from usdc"), Ok(Some(Command::From(find("USDC").unwrap()))));
        assert_eq!(parse("TO Wif"), Ok(Some(Command::To(find("WIF").unwrap()))));
        assert_eq!(parse("swap"), Ok(Some(Command::Swap)));
        assert_eq!(parse("exit"), Ok(Some(Command::Quit)));
    }

    #[test]
    fn blank_line_is_ignored() {
        assert_eq!(parse("   "), Ok(None));
    }

    #[test]
    fn reports_bad_input() {
        assert_eq!(parse("amount"), Err(CommandError::MissingArgument("amount")));
        assert_eq!(parse("amount ten"), Err(CommandError::BadAmount("ten".into())));
        assert_eq!(parse("from ETH"), Err(CommandError::UnknownAsset("ETH".into())));
        assert_eq!(parse("to"), Err(CommandError::MissingArgument("to")));
        assert_eq!(parse("buy"), Err(CommandError::Unknown("buy".into())));
    }

    #[test]
    fn status_shows_disabled_swap_for_same_token() {
        let mut panel = SwapPanel::new();
        panel.select_to(find("SOL").unwrap());
        let text = render(&panel, &KeypairWallet::empty());
        assert!(text.contains("wallet: not connected"));
        assert!(text.contains("swap disabled"));
    }
}
