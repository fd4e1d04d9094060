//! Screen tags, signals and the transition table
//!
//! `transition` is total: every (state, signal) pair maps to a `Transition`,
//! and pairs the table does not name map to `Stay`.

use crate::sim::ClockMode;

/// Which screen is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStateTag {
    Intro,
    MainMenu,
    StudentSelect,
    Options,
    Explanation,
    CreditRoll,
    GreetStudent,
    ArithmeticDrill,
    BonusGame,
}

impl GameStateTag {
    pub fn clock_mode(self) -> ClockMode {
        match self {
            GameStateTag::BonusGame => ClockMode::MiniGame,
            _ => ClockMode::Menu,
        }
    }
}

/// What a screen asks the controller to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Intro fade finished
    Timeout,
    /// Any key or click
    AnyInput,
    Start,
    Options,
    Explain,
    Credits,
    Back,
    Quit,
    /// Index into the student roster
    StudentChosen(usize),
    SlidesExhausted,
    CreditsExhausted,
    DrillImperfect,
    DrillPerfect,
    CaughtTarget,
    HitHazard,
    ManualExit,
    /// Window closed; valid from every state
    OsQuit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Stay,
    Goto(GameStateTag),
    Terminate,
}

pub fn transition(state: GameStateTag, signal: &Signal) -> Transition {
    use GameStateTag::*;
    use Transition::*;

    if *signal == Signal::OsQuit {
        return Terminate;
    }

    match (state, signal) {
        (Intro, Signal::Timeout | Signal::AnyInput) => Goto(MainMenu),

        (MainMenu, Signal::Start) => Goto(StudentSelect),
        (MainMenu, Signal::Options) => Goto(Options),
        (MainMenu, Signal::Explain) => Goto(Explanation),
        (MainMenu, Signal::Quit) => Terminate,

        (StudentSelect, Signal::StudentChosen(_)) => Goto(GreetStudent),
        (GreetStudent, Signal::AnyInput) => Goto(ArithmeticDrill),

        (ArithmeticDrill, Signal::DrillImperfect) => Goto(MainMenu),
        (ArithmeticDrill, Signal::DrillPerfect) => Goto(BonusGame),

        (BonusGame, Signal::CaughtTarget | Signal::HitHazard | Signal::ManualExit) => {
            Goto(MainMenu)
        }

        (Options, Signal::Back) => Goto(MainMenu),
        (Options, Signal::Credits) => Goto(CreditRoll),
        (Explanation, Signal::SlidesExhausted) => Goto(MainMenu),
        (CreditRoll, Signal::CreditsExhausted) => Goto(Options),

        _ => Stay,
    }
}
