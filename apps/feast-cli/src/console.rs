//! Terminal side of the notifier, confirmation and form prompts.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Result};
use feast::domain::gate::{AdminGate, GateOutcome, GateState};
use feast::domain::ports::{Notice, NoticeLevel, Notifier};

/// Prints notices the way a toast would show them.
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Success => println!("✓ {}", notice.message),
            NoticeLevel::Error => eprintln!("✗ {}", notice.message),
        }
    }
}

/// Print `prompt` and read one line. `None` at end of input.
pub fn read_line(prompt: &str) -> io::Result<Option<String>> {
    print!("{prompt}");
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

/// Ask for a form field. An empty answer keeps `current`.
pub fn ask(label: &str, current: &str) -> io::Result<String> {
    let prompt = if current.is_empty() {
        format!("{label}: ")
    } else {
        format!("{label} [{current}]: ")
    };
    let answer = read_line(&prompt)?.unwrap_or_default();
    Ok(if answer.trim().is_empty() {
        current.to_string()
    } else {
        answer.trim().to_string()
    })
}

/// Yes/no question on stdin; anything but `y`/`yes` declines.
pub fn confirm_on_stdin(prompt: &str) -> bool {
    match read_line(&format!("{prompt} [y/N] ")) {
        Ok(Some(answer)) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
        _ => false,
    }
}

/// Report a gate outcome. Returns true once unlocked.
pub fn report_gate(outcome: GateOutcome) -> bool {
    match outcome {
        GateOutcome::Unlocked => {
            println!("Admin dashboard unlocked");
            true
        }
        GateOutcome::Rejected { remaining } => {
            eprintln!("Wrong password, {remaining} attempt(s) left");
            false
        }
        GateOutcome::Blocked => {
            eprintln!("Too many failed attempts, the admin login is disabled for this session");
            false
        }
        GateOutcome::EmptyInput => {
            eprintln!("Please enter the admin password");
            false
        }
    }
}

/// Prompt for the admin password until the gate opens, blocks, or input ends.
pub fn unlock_on_stdin(gate: &mut AdminGate) -> Result<()> {
    while !gate.is_unlocked() {
        if gate.state() == GateState::Blocked {
            gate.require_unlocked()?;
        }
        let Some(password) = read_line("Admin password: ")? else {
            bail!("Admin access required");
        };
        report_gate(gate.submit(&password));
    }
    Ok(())
}
