//! Line-oriented front end: renders the session after every change and turns
//! input lines into session calls. Never touches game state directly.

use std::io::{self, BufRead, Write};

use rand::Rng;
use twenty48_core::engine::Move;

use crate::ranking::RankingEntry;
use crate::session::{GameSession, Phase, SessionState, Turn};
use crate::storage::ScoreStore;

const HELP: &str = "w/a/s/d (or h/j/k/l, up/down/left/right) to move, r to restart, q to quit";

/// Drive `session` from `input` until it is exhausted or the player quits.
pub fn run<S, R, I, O>(
    session: &mut GameSession<S, R>,
    mut input: I,
    out: &mut O,
) -> io::Result<()>
where
    S: ScoreStore,
    R: Rng,
    I: BufRead,
    O: Write,
{
    writeln!(out, "Welcome to 2048!")?;
    writeln!(out, "Slide the tiles to combine them.")?;
    writeln!(out, "{HELP}")?;
    render(out, &session.state(), session.ranking())?;

    let mut line = String::new();
    loop {
        match session.phase() {
            Phase::Playing => write!(out, "> ")?,
            Phase::GameOver { qualifies: true } => write!(
                out,
                "You made the top 5! Enter your name (r to skip, q to quit): "
            )?,
            Phase::GameOver { qualifies: false } => {
                write!(out, "Game over. r to restart, q to quit: ")?
            }
        }
        out.flush()?;

        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(());
        }
        let cmd = line.trim();

        match cmd {
            "q" | "quit" => return Ok(()),
            "r" | "restart" => {
                session.reset();
                render(out, &session.state(), session.ranking())?;
                continue;
            }
            _ => {}
        }

        match session.phase() {
            Phase::GameOver { qualifies: true } => {
                if session.save_ranking(cmd).is_ok() {
                    writeln!(out, "Saved. New game!")?;
                }
            }
            Phase::GameOver { qualifies: false } => continue,
            Phase::Playing if cmd.is_empty() => continue,
            Phase::Playing => match cmd.parse::<Move>() {
                Ok(dir) => match session.apply(dir) {
                    Ok(Turn::Unchanged) => continue,
                    Ok(Turn::Moved { .. }) => {}
                    Ok(Turn::GameOver { .. }) => writeln!(out, "No moves left!")?,
                    Err(err) => writeln!(out, "{err}")?,
                },
                Err(err) => {
                    writeln!(out, "{err}")?;
                    writeln!(out, "{HELP}")?;
                    continue;
                }
            },
        }
        render(out, &session.state(), session.ranking())?;
    }
}

/// Board, scores and the ranking box.
pub fn render<O: Write>(
    out: &mut O,
    state: &SessionState,
    ranking: &[RankingEntry],
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "Score: {}    High Score: {}", state.score, state.high_score)?;
    write!(out, "{}", state.board)?;
    writeln!(out, "Ranking TOP 5")?;
    if ranking.is_empty() {
        writeln!(out, "  (empty)")?;
    }
    for (i, entry) in ranking.iter().enumerate() {
        writeln!(out, "{}. {} - {}", i + 1, entry.name, entry.score)?;
    }
    Ok(())
}
