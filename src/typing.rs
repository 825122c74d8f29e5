//! Timed text reveal.
//!
//! A [`Typewriter`] cycles through a list of lines: it types a line one
//! character per tick, holds it, then either deletes it one character per
//! tick or clears it at once, and moves on to the next line. Each
//! [`tick`](Typewriter::tick) returns the text to show and how long to wait
//! before the next tick, so the caller owns the timer.

use crate::config::TypewriterConfig;
use std::time::Duration;

/// Where the typewriter is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Typing,
    /// The whole line is shown.
    Holding,
    Deleting,
}

/// What to show after one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tick {
    pub text: String,
    /// Wait before the next tick.
    pub delay: Duration,
}

/// Type / hold / delete state machine.
#[derive(Debug, Clone)]
pub struct Typewriter {
    config: TypewriterConfig,
    line: usize,
    shown: usize,
    phase: Phase,
}

impl Typewriter {
    pub fn new(config: TypewriterConfig) -> Self {
        Self {
            config,
            line: 0,
            shown: 0,
            phase: Phase::Typing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Index of the current line.
    pub fn line_index(&self) -> usize {
        self.line
    }

    /// Number of characters of the current line on screen.
    pub fn shown(&self) -> usize {
        self.shown
    }

    /// The line being typed, or `""` with no lines configured.
    pub fn current_line(&self) -> &str {
        self.config
            .lines
            .get(self.line)
            .map(String::as_str)
            .unwrap_or("")
    }

    /// The visible prefix of the current line.
    pub fn text(&self) -> String {
        self.current_line().chars().take(self.shown).collect()
    }

    /// Cursor opacity for the blinking cursor next to the text.
    pub fn cursor_opacity(&self) -> f32 {
        if self.shown % 2 == 0 {
            1.0
        } else {
            0.5
        }
    }

    /// Advance one step.
    pub fn tick(&mut self) -> Tick {
        let len = self.current_line().chars().count();
        let delay = match self.phase {
            Phase::Typing if self.shown < len => {
                self.shown += 1;
                self.config.type_delay()
            }
            Phase::Typing => {
                self.phase = Phase::Holding;
                self.config.pause()
            }
            Phase::Holding => match self.config.delete_delay() {
                Some(_) => {
                    self.phase = Phase::Deleting;
                    self.delete_step()
                }
                None => self.next_line(),
            },
            Phase::Deleting => self.delete_step(),
        };

        Tick {
            text: self.text(),
            delay,
        }
    }

    fn delete_step(&mut self) -> Duration {
        match self.config.delete_delay() {
            Some(delay) if self.shown > 0 => {
                self.shown -= 1;
                delay
            }
            _ => self.next_line(),
        }
    }

    fn next_line(&mut self) -> Duration {
        self.shown = 0;
        self.phase = Phase::Typing;
        if !self.config.lines.is_empty() {
            self.line = (self.line + 1) % self.config.lines.len();
        }
        self.config.type_delay()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(lines: &[&str], delete: Option<u64>) -> TypewriterConfig {
        TypewriterConfig {
            lines: lines.iter().map(|s| s.to_string()).collect(),
            type_delay_ms: 50,
            delete_delay_ms: delete,
            pause_ms: 2000,
        }
    }

    fn ms(ms: u64) -> Duration {
        Duration::from_millis(ms)
    }

    #[test]
    fn test_type_hold_delete_cycle() {
        let mut tw = Typewriter::new(config(&["ab", "c"], Some(25)));

        assert_eq!(tw.tick(), Tick { text: "a".into(), delay: ms(50) });
        assert_eq!(tw.tick(), Tick { text: "ab".into(), delay: ms(50) });
        assert_eq!(tw.tick(), Tick { text: "ab".into(), delay: ms(2000) });
        assert_eq!(tw.phase(), Phase::Holding);
        assert_eq!(tw.tick(), Tick { text: "a".into(), delay: ms(25) });
        assert_eq!(tw.tick(), Tick { text: "".into(), delay: ms(25) });
        assert_eq!(tw.tick(), Tick { text: "".into(), delay: ms(50) });

        assert_eq!(tw.line_index(), 1);
        assert_eq!(tw.phase(), Phase::Typing);
        assert_eq!(tw.tick().text, "c");
    }

    #[test]
    fn test_clear_without_delete() {
        let mut tw = Typewriter::new(config(&["hi", "yo"], None));
        tw.tick();
        tw.tick();
        assert_eq!(tw.tick().delay, ms(2000));

        let cleared = tw.tick();
        assert_eq!(cleared, Tick { text: "".into(), delay: ms(50) });
        assert_eq!(tw.line_index(), 1);
    }

    #[test]
    fn test_wraps_to_first_line() {
        let mut tw = Typewriter::new(config(&["x"], None));
        for _ in 0..3 {
            tw.tick();
        }
        assert_eq!(tw.line_index(), 0);
        assert_eq!(tw.tick().text, "x");
    }

    #[test]
    fn test_counts_characters_not_bytes() {
        let mut tw = Typewriter::new(config(&["アイ"], Some(25)));
        assert_eq!(tw.tick().text, "ア");
        assert_eq!(tw.tick().text, "アイ");
        assert_eq!(tw.tick().delay, ms(2000));
    }

    #[test]
    fn test_no_lines_does_not_panic() {
        let mut tw = Typewriter::new(config(&[], Some(25)));
        for _ in 0..5 {
            assert_eq!(tw.tick().text, "");
        }
    }

    #[test]
    fn test_cursor_blinks_with_parity() {
        let mut tw = Typewriter::new(config(&["abc"], None));
        assert_eq!(tw.cursor_opacity(), 1.0);
        tw.tick();
        assert_eq!(tw.cursor_opacity(), 0.5);
        tw.tick();
        assert_eq!(tw.cursor_opacity(), 1.0);
    }
}
