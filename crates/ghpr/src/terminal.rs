use std::io::{self, IsTerminal};

/// Width used when the terminal cannot be probed
pub const DEFAULT_WIDTH: usize = 80;

/// Column count of the terminal attached to stdout, or 80.
///
/// A failed probe is not an error: piped output, a zero-width report and
/// platform errors all fall back to the default.
pub fn terminal_width() -> usize {
    let probe = if io::stdout().is_terminal() {
        crossterm::terminal::size().map(|(cols, _rows)| cols)
    } else {
        Err(io::Error::other("stdout is not a terminal"))
    };
    width_or_default(probe)
}

fn width_or_default(probe: io::Result<u16>) -> usize {
    match probe {
        Ok(cols) if cols > 0 => usize::from(cols),
        Ok(_) => DEFAULT_WIDTH,
        Err(err) => {
            tracing::debug!(error = %err, "terminal width probe failed, using {}", DEFAULT_WIDTH);
            DEFAULT_WIDTH
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probed_width_is_used() {
        assert_eq!(width_or_default(Ok(132)), 132);
    }

    #[test]
    fn failed_probe_falls_back_to_default() {
        let err = io::Error::new(io::ErrorKind::Unsupported, "no tty");
        assert_eq!(width_or_default(Err(err)), DEFAULT_WIDTH);
    }

    #[test]
    fn zero_width_falls_back_to_default() {
        assert_eq!(width_or_default(Ok(0)), 80);
    }
}
