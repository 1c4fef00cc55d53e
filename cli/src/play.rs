//! Line-based interactive loop behind `bandit play`.
//!
//! Each prompt reads one line: `F`/`L` picks left, `J`/`R` picks right and
//! `q` ends the session early. Response time runs from the prompt being
//! flushed to the line arriving.

use std::io::{self, BufRead, Write};
use std::time::Instant;

use bandit_core::Session;
use bandit_types::Arm;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    /// `q` or end of input before the last trial.
    Quit,
}

enum Input {
    Choice(Arm),
    Quit,
    Invalid,
}

fn parse_line(line: &str) -> Input {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") || line.eq_ignore_ascii_case("quit") {
        return Input::Quit;
    }
    line.parse().map_or(Input::Invalid, Input::Choice)
}

pub fn run<R: BufRead, W: Write>(
    session: &mut Session,
    mut input: R,
    out: &mut W,
    show_probabilities: bool,
) -> io::Result<Outcome> {
    writeln!(
        out,
        "Participant {} ({} session): {} trials. Press {} for left, {} for right, q to quit.",
        session.pid(),
        session.label(),
        session.n_trials(),
        Arm::Left.key(),
        Arm::Right.key(),
    )?;

    let mut line = String::new();
    while let Some(state) = session.current() {
        write!(out, "Trial {}/{}", session.trial_index() + 1, session.n_trials())?;
        if show_probabilities {
            write!(out, "  L={:.3} R={:.3}", state.left(), state.right())?;
        }
        write!(out, " > ")?;
        out.flush()?;

        let shown = Instant::now();
        let choice = loop {
            line.clear();
            if input.read_line(&mut line)? == 0 {
                return finish(session, out, Outcome::Quit);
            }
            match parse_line(&line) {
                Input::Choice(arm) => break arm,
                Input::Quit => return finish(session, out, Outcome::Quit),
                Input::Invalid => {
                    write!(
                        out,
                        "Press {} or {} (q to quit) > ",
                        Arm::Left.key(),
                        Arm::Right.key()
                    )?;
                    out.flush()?;
                }
            }
        };

        let record = session
            .respond(choice, shown.elapsed())
            .map_err(io::Error::other)?;
        if record.rewarded() {
            writeln!(out, "✓ +1")?;
        } else {
            writeln!(out, "× 0")?;
        }
    }

    finish(session, out, Outcome::Completed)
}

fn finish<W: Write>(session: &Session, out: &mut W, outcome: Outcome) -> io::Result<Outcome> {
    let done = session.records().len();
    if outcome == Outcome::Quit {
        info!(pid = %session.pid(), completed = done, "Session ended early");
    }
    writeln!(out, "Total reward: {} / {done}", session.total_reward())?;
    Ok(outcome)
}
