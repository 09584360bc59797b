//! Interactive prompt for `vecinos nearby --interactive`.
//!
//! Changing the radius or confirming a specialty starts a new search right
//! away; `search` repeats the last one.

use std::io::Write as _;

use tokio::io::{AsyncBufReadExt, BufReader};
use vecinos_api::NearbyApi;

use super::NearbyScreen;

const HELP: &str = "\
commands:
  radius <km>        set the search radius (1-50) and search
  specialty <text>   filter by specialty and search
  clear              remove the specialty filter and search
  search             search again with the current settings
  show <n>           details of result n
  help               this text
  quit               leave";

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ReplCommand {
    Radius(f64),
    Specialty(String),
    Clear,
    Search,
    /// Zero-based card index.
    Show(usize),
    Help,
    Quit,
}

/// Parses one input line; `Ok(None)` for a blank line.
pub(crate) fn parse_command(line: &str) -> anyhow::Result<Option<ReplCommand>> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(w, r)| (w, r.trim()));

    let command = match word.to_ascii_lowercase().as_str() {
        "radius" | "r" => {
            let km = rest
                .parse::<f64>()
                .map_err(|_| anyhow::anyhow!("usage: radius <km>"))?;
            ReplCommand::Radius(km)
        }
        "specialty" | "s" => {
            if rest.is_empty() {
                anyhow::bail!("usage: specialty <text> (use `clear` to remove the filter)");
            }
            ReplCommand::Specialty(rest.to_owned())
        }
        "clear" => ReplCommand::Clear,
        "search" => ReplCommand::Search,
        "show" => {
            let n = rest
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| anyhow::anyhow!("usage: show <n> (n starts at 1)"))?;
            ReplCommand::Show(n - 1)
        }
        "help" | "?" => ReplCommand::Help,
        "quit" | "exit" | "q" => ReplCommand::Quit,
        other => anyhow::bail!("unknown command `{other}`; type `help`"),
    };
    Ok(Some(command))
}

pub(crate) async fn run<A: NearbyApi>(screen: &mut NearbyScreen<A>) -> anyhow::Result<()> {
    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("> ");
        std::io::stdout().flush()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                println!("{e}");
                continue;
            }
        };

        match command {
            ReplCommand::Radius(km) => match screen.controller.set_radius_km(km) {
                Ok(()) => screen.search().await,
                Err(e) => println!("{e}"),
            },
            ReplCommand::Specialty(text) => {
                screen.controller.set_specialty(&text);
                screen.search().await;
            }
            ReplCommand::Clear => {
                screen.controller.clear_specialty();
                screen.search().await;
            }
            ReplCommand::Search => screen.search().await,
            ReplCommand::Show(index) => screen.show(index),
            ReplCommand::Help => println!("{HELP}"),
            ReplCommand::Quit => break,
        }
    }
    Ok(())
}
