use folio_protocol::{Effect, Target, TimerKind};

use crate::config::TypewriterConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    /// `ch` characters of `line` are on screen.
    Typing { line: usize, ch: usize },
    /// `line` is complete, waiting for the settle delay.
    Holding { line: usize },
    /// Text was cleared, `line` starts after the clear delay.
    Clearing { line: usize },
    Done,
}

/// Effects of one step plus the delay before the next tick, if any.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub effects: Vec<Effect>,
    pub next: Option<u32>,
}

impl Step {
    fn new(effects: Vec<Effect>, next: Option<u32>) -> Self {
        Self { effects, next }
    }

    /// The timer request for the bridge, when another tick is due.
    pub fn schedule(&self) -> Option<Effect> {
        self.next.map(|delay_ms| Effect::Schedule {
            delay_ms,
            timer: TimerKind::Typewriter,
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct Timing {
    per_char: u32,
    settle: u32,
    clear: u32,
}

/// Types a fixed script one character at a time, one line after another,
/// then removes the cursor. Driven by an external tick so it can be stepped
/// deterministically; only one tick is ever outstanding.
#[derive(Debug, Clone)]
pub struct Typewriter {
    lines: Vec<Vec<char>>,
    text: Target,
    cursor: Target,
    timing: Timing,
    phase: Phase,
}

impl Typewriter {
    pub fn new(config: &TypewriterConfig, viewport_width: f64, text: Target, cursor: Target) -> Self {
        Self {
            lines: config.lines.iter().map(|l| l.chars().collect()).collect(),
            text,
            cursor,
            timing: Timing {
                per_char: config.interval_for(viewport_width),
                settle: config.settle_ms,
                clear: config.clear_ms,
            },
            phase: Phase::Idle,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn char_interval(&self) -> u32 {
        self.timing.per_char
    }

    /// Clear the text element and type the first character. Calling it again
    /// once started does nothing.
    pub fn start(&mut self) -> Step {
        if self.phase != Phase::Idle {
            return Step::new(Vec::new(), None);
        }
        let mut effects = vec![Effect::SetText {
            target: self.text.clone(),
            text: String::new(),
        }];
        if self.lines.is_empty() {
            effects.push(self.finish());
            return Step::new(effects, None);
        }
        self.phase = Phase::Typing { line: 0, ch: 0 };
        let step = self.type_char();
        effects.extend(step.effects);
        Step::new(effects, step.next)
    }

    pub fn tick(&mut self) -> Step {
        match self.phase {
            Phase::Idle | Phase::Done => Step::new(Vec::new(), None),
            Phase::Typing { .. } => self.type_char(),
            Phase::Holding { line } => {
                let next = line + 1;
                if next < self.lines.len() {
                    self.phase = Phase::Clearing { line: next };
                    Step::new(
                        vec![Effect::SetText {
                            target: self.text.clone(),
                            text: String::new(),
                        }],
                        Some(self.timing.clear),
                    )
                } else {
                    Step::new(vec![self.finish()], None)
                }
            }
            Phase::Clearing { line } => {
                self.phase = Phase::Typing { line, ch: 0 };
                self.type_char()
            }
        }
    }

    fn type_char(&mut self) -> Step {
        let Phase::Typing { line, ch } = self.phase else {
            return Step::new(Vec::new(), None);
        };
        match self.lines[line].get(ch) {
            Some(c) => {
                self.phase = Phase::Typing { line, ch: ch + 1 };
                Step::new(
                    vec![Effect::AppendText {
                        target: self.text.clone(),
                        text: c.to_string(),
                    }],
                    Some(self.timing.per_char),
                )
            }
            None => {
                self.phase = Phase::Holding { line };
                Step::new(Vec::new(), Some(self.timing.settle))
            }
        }
    }

    fn finish(&mut self) -> Effect {
        self.phase = Phase::Done;
        log::debug!("typewriter done");
        Effect::Remove {
            target: self.cursor.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(lines: &[&str]) -> TypewriterConfig {
        TypewriterConfig {
            lines: lines.iter().map(|l| (*l).to_owned()).collect(),
            ..TypewriterConfig::default()
        }
    }

    fn writer(lines: &[&str], width: f64) -> Typewriter {
        Typewriter::new(
            &script(lines),
            width,
            Target::id("typing-text"),
            Target::id("typing-cursor"),
        )
    }

    /// Run to completion, returning the visible text, whether the cursor was
    /// removed, and the total simulated time.
    fn run(tw: &mut Typewriter) -> (String, bool, u64) {
        let mut text = String::new();
        let mut removed = false;
        let mut elapsed = 0u64;
        let mut step = tw.start();
        loop {
            for effect in &step.effects {
                match effect {
                    Effect::SetText { text: t, .. } => text = t.clone(),
                    Effect::AppendText { text: t, .. } => text.push_str(t),
                    Effect::Remove { .. } => removed = true,
                    _ => {}
                }
            }
            let Some(delay) = step.next else { break };
            elapsed += u64::from(delay);
            step = tw.tick();
        }
        (text, removed, elapsed)
    }

    #[test]
    fn keeps_last_line_and_drops_cursor() {
        let mut tw = writer(&["Hi", "Bye"], 1280.0);
        let (text, removed, _) = run(&mut tw);
        assert_eq!(text, "Bye");
        assert!(removed);
        assert_eq!(tw.phase(), Phase::Done);
    }

    #[test]
    fn first_char_is_immediate() {
        let mut tw = writer(&["Hi"], 1280.0);
        let step = tw.start();
        assert_eq!(
            step.effects,
            vec![
                Effect::SetText {
                    target: Target::id("typing-text"),
                    text: String::new(),
                },
                Effect::AppendText {
                    target: Target::id("typing-text"),
                    text: "H".into(),
                },
            ]
        );
        assert_eq!(step.next, Some(40));
        assert_eq!(
            step.schedule(),
            Some(Effect::Schedule {
                delay_ms: 40,
                timer: TimerKind::Typewriter,
            })
        );
    }

    #[test]
    fn timeline_matches_delays() {
        // "Hi": 2 chars * 40, settle 600, clear 400, "Bye": 3 * 40, settle 600
        let mut tw = writer(&["Hi", "Bye"], 1280.0);
        let (_, _, elapsed) = run(&mut tw);
        assert_eq!(elapsed, 80 + 600 + 400 + 120 + 600);
    }

    #[test]
    fn narrow_viewport_types_faster() {
        assert_eq!(writer(&["x"], 639.0).char_interval(), 28);
        assert_eq!(writer(&["x"], 640.0).char_interval(), 40);
    }

    #[test]
    fn clears_between_lines() {
        let mut tw = writer(&["ab", "c"], 1280.0);
        tw.start();
        tw.tick(); // 'b'
        let hold = tw.tick();
        assert!(hold.effects.is_empty());
        assert_eq!(hold.next, Some(600));
        let clear = tw.tick();
        assert_eq!(
            clear.effects,
            vec![Effect::SetText {
                target: Target::id("typing-text"),
                text: String::new(),
            }]
        );
        assert_eq!(clear.next, Some(400));
        assert_eq!(tw.phase(), Phase::Clearing { line: 1 });
    }

    #[test]
    fn empty_script_removes_cursor_at_once() {
        let mut tw = writer(&[], 1280.0);
        let step = tw.start();
        assert_eq!(step.next, None);
        assert!(step.effects.contains(&Effect::Remove {
            target: Target::id("typing-cursor"),
        }));
    }

    #[test]
    fn empty_line_is_held_then_skipped() {
        let mut tw = writer(&["", "z"], 1280.0);
        let (text, removed, _) = run(&mut tw);
        assert_eq!(text, "z");
        assert!(removed);
    }

    #[test]
    fn multibyte_chars_are_typed_whole() {
        let mut tw = writer(&["I’m · ok"], 1280.0);
        let (text, _, _) = run(&mut tw);
        assert_eq!(text, "I’m · ok");
    }

    #[test]
    fn runs_once() {
        let mut tw = writer(&["a"], 1280.0);
        run(&mut tw);
        assert_eq!(tw.start(), Step::new(Vec::new(), None));
        assert_eq!(tw.tick(), Step::new(Vec::new(), None));
    }
}
