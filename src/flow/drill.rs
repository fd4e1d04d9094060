//! Arithmetic drill
//!
//! The screen shows one problem at a time, collects a typed answer and, after
//! the last problem, reports whether every answer was right. Problems come
//! from a `ProblemSource`; the built-in generator is seeded.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::Layout;
use super::state::Signal;
use crate::persistence::percent_correct;
use crate::platform::{InputSnapshot, Key};
use crate::render::{RenderCommand, centered_text};
use crate::settings::Theme;

/// Longest answer the entry box accepts
const MAX_ENTRY_DIGITS: usize = 3;
/// Sum every rainbow pair adds up to
const RAINBOW_TOTAL: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProblemKind {
    /// a + b = ?
    Addition,
    /// a - b = ?, with a >= b
    Subtraction,
    /// a + ? = 10
    RainbowPair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Problem {
    pub kind: ProblemKind,
    pub a: u32,
    pub b: u32,
}

impl Problem {
    pub fn addition(a: u32, b: u32) -> Self {
        Self {
            kind: ProblemKind::Addition,
            a,
            b,
        }
    }

    pub fn subtraction(a: u32, b: u32) -> Self {
        let (a, b) = if a >= b { (a, b) } else { (b, a) };
        Self {
            kind: ProblemKind::Subtraction,
            a,
            b,
        }
    }

    pub fn rainbow(a: u32) -> Self {
        let a = a.min(RAINBOW_TOTAL);
        Self {
            kind: ProblemKind::RainbowPair,
            a,
            b: RAINBOW_TOTAL - a,
        }
    }

    pub fn answer(&self) -> u32 {
        match self.kind {
            ProblemKind::Addition => self.a + self.b,
            ProblemKind::Subtraction => self.a - self.b,
            ProblemKind::RainbowPair => self.b,
        }
    }

    pub fn prompt(&self) -> String {
        match self.kind {
            ProblemKind::Addition => format!("{} + {} = ?", self.a, self.b),
            ProblemKind::Subtraction => format!("{} - {} = ?", self.a, self.b),
            ProblemKind::RainbowPair => format!("{} + ? = {}", self.a, RAINBOW_TOTAL),
        }
    }
}

/// Supplies the problems for one drill
pub trait ProblemSource {
    fn generate(&mut self, count: usize) -> Vec<Problem>;
}

/// Seeded random problems of the enabled kinds
#[derive(Debug, Clone)]
pub struct ProblemGenerator {
    rng: Pcg32,
    kinds: Vec<ProblemKind>,
    max_operand: u32,
}

impl ProblemGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            kinds: vec![
                ProblemKind::Addition,
                ProblemKind::Subtraction,
                ProblemKind::RainbowPair,
            ],
            max_operand: 10,
        }
    }

    pub fn with_kinds(mut self, kinds: Vec<ProblemKind>) -> Self {
        if !kinds.is_empty() {
            self.kinds = kinds;
        }
        self
    }

    pub fn with_max_operand(mut self, max: u32) -> Self {
        self.max_operand = max.max(1);
        self
    }
}

impl ProblemSource for ProblemGenerator {
    fn generate(&mut self, count: usize) -> Vec<Problem> {
        (0..count)
            .map(|_| {
                let kind = self.kinds[self.rng.random_range(0..self.kinds.len())];
                let a = self.rng.random_range(0..=self.max_operand);
                let b = self.rng.random_range(0..=self.max_operand);
                match kind {
                    ProblemKind::Addition => Problem::addition(a, b),
                    ProblemKind::Subtraction => Problem::subtraction(a, b),
                    ProblemKind::RainbowPair => Problem::rainbow(a.min(RAINBOW_TOTAL)),
                }
            })
            .collect()
    }
}

/// One submitted answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerResult {
    pub given: u32,
    pub correct: bool,
    pub elapsed_ms: u64,
}

/// Totals handed to the session recorder
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrillSummary {
    pub asked: u32,
    pub correct: u32,
    pub percent: f32,
    pub perfect: bool,
    pub mean_response_ms: u64,
}

pub struct DrillScreen {
    problems: Vec<Problem>,
    results: Vec<AnswerResult>,
    entry: String,
    question_started_ms: u64,
    signalled: bool,
}

impl DrillScreen {
    pub fn new(problems: Vec<Problem>, now_ms: u64) -> Self {
        log::info!("Drill started with {} problems", problems.len());
        Self {
            problems,
            results: Vec::new(),
            entry: String::new(),
            question_started_ms: now_ms,
            signalled: false,
        }
    }

    pub fn current(&self) -> Option<&Problem> {
        self.problems.get(self.results.len())
    }

    pub fn is_finished(&self) -> bool {
        self.results.len() >= self.problems.len()
    }

    pub fn results(&self) -> &[AnswerResult] {
        &self.results
    }

    pub fn summary(&self) -> DrillSummary {
        let asked = self.results.len() as u32;
        let correct = self.results.iter().filter(|r| r.correct).count() as u32;
        let mean_response_ms = if asked == 0 {
            0
        } else {
            self.results.iter().map(|r| r.elapsed_ms).sum::<u64>() / asked as u64
        };
        DrillSummary {
            asked,
            correct,
            percent: percent_correct(asked, correct),
            perfect: asked > 0 && correct == asked && self.is_finished(),
            mean_response_ms,
        }
    }

    fn submit(&mut self, now_ms: u64) {
        let Some(problem) = self.current().copied() else {
            return;
        };
        let Ok(given) = self.entry.parse::<u32>() else {
            return;
        };
        let result = AnswerResult {
            given,
            correct: given == problem.answer(),
            elapsed_ms: now_ms.saturating_sub(self.question_started_ms),
        };
        log::debug!(
            "{} -> {} ({}, {} ms)",
            problem.prompt(),
            given,
            if result.correct { "right" } else { "wrong" },
            result.elapsed_ms
        );
        self.results.push(result);
        self.entry.clear();
        self.question_started_ms = now_ms;
    }

    pub fn update(&mut self, input: &InputSnapshot, now_ms: u64) -> Option<Signal> {
        for key in &input.keys_pressed {
            if self.is_finished() {
                break;
            }
            match key {
                Key::Digit(d) if self.entry.len() < MAX_ENTRY_DIGITS => {
                    self.entry.push(char::from(b'0' + d.min(&9)));
                }
                Key::Backspace => {
                    self.entry.pop();
                }
                Key::Enter => self.submit(now_ms),
                _ => {}
            }
        }

        if self.is_finished() && !self.signalled {
            self.signalled = true;
            let summary = self.summary();
            log::info!(
                "Drill finished: {}/{} ({:.0}%)",
                summary.correct,
                summary.asked,
                summary.percent
            );
            return Some(if summary.perfect {
                Signal::DrillPerfect
            } else {
                Signal::DrillImperfect
            });
        }
        None
    }

    pub fn render(&self, layout: &Layout, theme: &Theme, out: &mut Vec<RenderCommand>) {
        let n = self.results.len();
        let Some(problem) = self.current() else {
            return;
        };
        out.push(centered_text(
            format!("Question {} of {}", n + 1, self.problems.len()),
            layout.point(Vec2::new(400.0, 90.0)),
            layout.len(28.0),
            theme.text,
        ));
        out.push(centered_text(
            problem.prompt(),
            layout.point(Vec2::new(400.0, 220.0)),
            layout.len(72.0),
            theme.text,
        ));
        let entry = if self.entry.is_empty() { "_" } else { &self.entry };
        out.push(centered_text(
            entry,
            layout.point(Vec2::new(400.0, 340.0)),
            layout.len(64.0),
            theme.accent,
        ));
        if let Some(last) = self.results.last() {
            let mark = if last.correct { "Correct!" } else { "Not quite" };
            out.push(centered_text(
                mark,
                layout.point(Vec2::new(400.0, 470.0)),
                layout.len(30.0),
                theme.text,
            ));
        }
    }
}
