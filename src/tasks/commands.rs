use std::io::{self, BufRead};

use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, warn};

use crate::events::{CarouselEvent, parse_command};

/// Why the command reader stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEnd {
    /// The operator typed `quit`.
    Quit,
    /// The input reached end of file.
    Eof,
    /// The carousel queue closed, so nothing is listening anymore.
    CarouselGone,
}

/// Reads operator commands line by line and posts the parsed events.
///
/// Blank lines are skipped and unknown commands are logged and dropped.
/// Blocks until the input ends, so run it on a plain thread.
pub fn forward_commands<R: BufRead>(
    input: R,
    events: &UnboundedSender<CarouselEvent>,
) -> io::Result<InputEnd> {
    for line in input.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.eq_ignore_ascii_case("quit") {
            return Ok(InputEnd::Quit);
        }
        match parse_command(trimmed) {
            Ok(parsed) => {
                debug!(command = trimmed, "operator command");
                for ev in parsed {
                    if events.send(ev).is_err() {
                        return Ok(InputEnd::CarouselGone);
                    }
                }
            }
            Err(err) => warn!("{err}"),
        }
    }
    Ok(InputEnd::Eof)
}
