//! Console output for user-visible messages.
//!
//! TeamCity scrapes stdout for service messages, so everything user-visible
//! goes through one [`Console`] handed down the call tree instead of a
//! global print function. Tests capture output by constructing the console
//! over a [`termcolor::Buffer`].

use termcolor::{Color, ColorSpec, WriteColor};

/// A stdout-shaped sink for diagnostic lines and service messages.
pub struct Console<'a> {
    out: &'a mut dyn WriteColor,
}

impl<'a> Console<'a> {
    /// Creates a console over any color-capable writer.
    pub fn new(out: &'a mut dyn WriteColor) -> Self {
        Self { out }
    }

    /// Writes one plain message line.
    pub fn log(&mut self, message: &str) {
        let _ = writeln!(self.out, "{message}");
    }

    /// Writes one warning line, yellow when the sink is a terminal.
    pub fn warn(&mut self, message: &str) {
        let _ = self
            .out
            .set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
        let _ = writeln!(self.out, "{message}");
        let _ = self.out.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use termcolor::Buffer;

    fn captured(write: impl FnOnce(&mut Console<'_>)) -> String {
        let mut buf = Buffer::no_color();
        let mut console = Console::new(&mut buf);
        write(&mut console);
        String::from_utf8_lossy(buf.as_slice()).into_owned()
    }

    #[test]
    fn log_writes_one_line() {
        assert_eq!(captured(|c| c.log("hello")), "hello\n");
    }

    #[test]
    fn warn_is_plain_text_without_a_terminal() {
        assert_eq!(captured(|c| c.warn("careful")), "careful\n");
    }

    #[test]
    fn lines_accumulate_in_order() {
        let out = captured(|c| {
            c.log("first");
            c.warn("second");
            c.log("third");
        });
        assert_eq!(out, "first\nsecond\nthird\n");
    }
}
