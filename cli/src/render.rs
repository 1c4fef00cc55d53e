//! Plain-text rendering of schedules for the terminal.

use std::io::{self, Write};

use bandit_types::{Probability, Schedule};

const BAR_WIDTH: usize = 20;

/// One row per trial with a bar per arm scaled to `[0, 1]`.
pub fn demo<W: Write>(out: &mut W, schedule: &Schedule) -> io::Result<()> {
    writeln!(out, "trial  left                          right")?;
    for (i, state) in schedule.iter().enumerate() {
        writeln!(
            out,
            "{:>5}  {:.3} {}  {:.3} {}",
            i + 1,
            state.left(),
            bar(state.left()),
            state.right(),
            bar(state.right()),
        )?;
    }
    Ok(())
}

fn bar(p: Probability) -> String {
    let filled = (p.value() * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "#".repeat(filled), ".".repeat(BAR_WIDTH - filled))
}
