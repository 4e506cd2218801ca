use anyhow::{Context, Result, bail};
use sapper_core::{
    Coord, Coord2, Difficulty, GameConfig, GameSession, RevealReport, SizePreset, TickOutcome,
};
use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

use crate::render;

const HELP: &str = "\
Commands:
  r ROW COL              reveal a cell
  f ROW COL              toggle a flag
  n [SIZE] [DIFFICULTY]  new game, optionally switching presets
  p                      print the board
  d                      dump the round as JSON
  h                      show this help
  q                      quit";

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) enum Command {
    Reveal(Coord2),
    Flag(Coord2),
    New(Option<SizePreset>, Option<Difficulty>),
    Print,
    Dump,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Option<Self>> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Ok(None);
        };

        let command = match name {
            "r" | "reveal" => Self::Reveal(parse_coords(&mut words)?),
            "f" | "flag" => Self::Flag(parse_coords(&mut words)?),
            "n" | "new" => {
                let mut size = None;
                let mut difficulty = None;
                for word in words.by_ref() {
                    if let Ok(preset) = word.parse::<SizePreset>() {
                        size = Some(preset);
                    } else {
                        let parsed = word.parse::<Difficulty>();
                        difficulty = Some(parsed.with_context(|| format!("`{word}`"))?);
                    }
                }
                Self::New(size, difficulty)
            }
            "p" | "print" => Self::Print,
            "d" | "dump" => Self::Dump,
            "h" | "help" | "?" => Self::Help,
            "q" | "quit" | "exit" => Self::Quit,
            other => bail!("unknown command `{other}`, try `h`"),
        };

        if words.next().is_some() {
            bail!("too many arguments for `{name}`");
        }
        Ok(Some(command))
    }
}

fn parse_coords<'a>(words: &mut impl Iterator<Item = &'a str>) -> Result<Coord2> {
    let mut next = |axis: &str| -> Result<Coord> {
        let word = words.next().with_context(|| format!("missing {axis}"))?;
        word.parse()
            .with_context(|| format!("`{word}` is not a valid {axis}"))
    };
    Ok((next("row")?, next("column")?))
}

enum Event {
    Line(String),
    Tick,
    Closed,
}

fn spawn_input(tx: Sender<Event>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(Event::Line(line)).is_err() {
                return;
            }
        }
        let _ = tx.send(Event::Closed);
    });
}

fn spawn_ticker(tx: Sender<Event>, interval: Duration) {
    thread::spawn(move || {
        loop {
            thread::sleep(interval);
            if tx.send(Event::Tick).is_err() {
                break;
            }
        }
    });
}

/// Interactive loop. Input and the clock run on their own threads and only
/// talk to the session through this loop, so all engine calls stay serialized.
pub(crate) fn run(mut session: GameSession, tick_interval: Duration) -> Result<()> {
    let (tx, rx) = mpsc::channel();
    spawn_input(tx.clone());
    spawn_ticker(tx, tick_interval);

    println!("{HELP}\n");
    show(&session)?;

    for event in rx {
        match event {
            Event::Tick => {
                if session.tick() == TickOutcome::Expired {
                    println!("\nTime's up!");
                    show(&session)?;
                }
            }
            Event::Line(line) => match Command::parse(&line) {
                Ok(None) => {}
                Ok(Some(Command::Quit)) => break,
                Ok(Some(command)) => {
                    if let Err(err) = execute(&mut session, command) {
                        println!("{err:#}");
                    }
                }
                Err(err) => println!("{err:#}"),
            },
            Event::Closed => break,
        }
    }
    Ok(())
}

fn execute(session: &mut GameSession, command: Command) -> Result<()> {
    match command {
        Command::Reveal(coords) => {
            let report = session.reveal(coords)?;
            log_report(&report);
            if report.outcome.has_update() {
                show(session)?;
            }
        }
        Command::Flag(coords) => {
            let report = session.toggle_flag(coords)?;
            log::debug!("flag at {:?}: {:?}", coords, report);
            if report.outcome.has_update() {
                show(session)?;
            }
        }
        Command::New(size, difficulty) => {
            let config = next_config(session.config(), size, difficulty);
            session.reset(config)?;
            show(session)?;
        }
        Command::Print => show(session)?,
        Command::Dump => println!("{}", serde_json::to_string_pretty(&session.snapshot())?),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}

fn next_config(
    current: &GameConfig,
    size: Option<SizePreset>,
    difficulty: Option<Difficulty>,
) -> GameConfig {
    let mut config = *current;
    if let Some(size) = size {
        (config.rows, config.cols) = size.dimensions();
    }
    if let Some(difficulty) = difficulty {
        config.density = difficulty.density();
        config.mines = None;
    }
    config
}

fn log_report(report: &RevealReport) {
    log::debug!(
        "{:?}: {} cells changed, status {:?}",
        report.outcome,
        report.changed.len(),
        report.status
    );
    for (coords, view) in &report.changed {
        log::trace!("{:?} -> {:?}", coords, view);
    }
}

fn show(session: &GameSession) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{}", render::board(session))?;
    if let Some(message) = render::status_message(session.status()) {
        writeln!(stdout, "{message}")?;
    }
    stdout.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sapper_core::{Board, GameStatus};

    #[test]
    fn parses_commands() {
        assert_eq!(Command::parse("r 3 4").unwrap(), Some(Command::Reveal((3, 4))));
        assert_eq!(Command::parse("  flag 0 12 ").unwrap(), Some(Command::Flag((0, 12))));
        assert_eq!(Command::parse("").unwrap(), None);
        assert_eq!(Command::parse("q").unwrap(), Some(Command::Quit));
        assert_eq!(
            Command::parse("n large hard").unwrap(),
            Some(Command::New(Some(SizePreset::Large), Some(Difficulty::Hard)))
        );
        // `medium` is both a size and a difficulty, sizes win
        assert_eq!(
            Command::parse("new medium").unwrap(),
            Some(Command::New(Some(SizePreset::Medium), None))
        );
    }

    #[test]
    fn rejects_bad_commands() {
        assert!(Command::parse("r 3").is_err());
        assert!(Command::parse("r 3 x").is_err());
        assert!(Command::parse("r 3 300").is_err());
        assert!(Command::parse("f 1 2 3").is_err());
        assert!(Command::parse("jump").is_err());
        assert!(Command::parse("n tiny").is_err());
    }

    #[test]
    fn new_game_keeps_unspecified_settings() {
        let current = GameConfig::new(5, 6, 0.2).with_mines(4).with_time_budget(30);

        let config = next_config(&current, None, Some(Difficulty::Easy));
        assert_eq!(config.size(), (5, 6));
        assert_eq!(config.mines, None);
        assert_eq!(config.density, 0.1);
        assert_eq!(config.time_budget, Some(30));

        let config = next_config(&current, Some(SizePreset::Small), None);
        assert_eq!(config.size(), (10, 10));
        assert_eq!(config.mines, Some(4));
    }

    #[test]
    fn out_of_range_reveal_is_reported() {
        let board = Board::from_mine_coords(2, 2, &[(0, 0)]).unwrap();
        let mut session = GameSession::with_board(board, None);

        assert!(execute(&mut session, Command::Reveal((5, 5))).is_err());
        assert!(execute(&mut session, Command::Reveal((0, 0))).is_ok());
        assert_eq!(session.status(), GameStatus::Lost);
    }
}
