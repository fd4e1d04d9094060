//! End-to-end runs of the game flow controller on a virtual clock

use std::cell::RefCell;
use std::rc::Rc;

use number_cat::flow::{Problem, ProblemSource, Screen};
use number_cat::persistence::{PersistenceError, SessionRecord, SessionRecorder};
use number_cat::platform::{InputSnapshot, Key};
use number_cat::sim::{Resolution, VirtualClock};
use number_cat::{Collaborators, GameFlowController, GameStateTag, RuntimeConfig, Signal};

/// Same ten problems every drill
struct FixedProblems;

impl ProblemSource for FixedProblems {
    fn generate(&mut self, count: usize) -> Vec<Problem> {
        (0..count as u32)
            .map(|i| Problem::addition(i, i + 1))
            .collect()
    }
}

#[derive(Default, Clone)]
struct SharedLog {
    records: Rc<RefCell<Vec<SessionRecord>>>,
}

impl SessionRecorder for SharedLog {
    fn record(&mut self, record: &SessionRecord) -> Result<(), PersistenceError> {
        self.records.borrow_mut().push(record.clone());
        Ok(())
    }
}

struct BrokenStore;

impl SessionRecorder for BrokenStore {
    fn record(&mut self, _record: &SessionRecord) -> Result<(), PersistenceError> {
        Err(PersistenceError::Unavailable("database locked".into()))
    }
}

struct Harness {
    controller: GameFlowController,
    clock: VirtualClock,
}

impl Harness {
    fn with_recorder(recorder: Box<dyn SessionRecorder>) -> Self {
        let clock = VirtualClock::new();
        let mut collab = Collaborators::headless(11);
        collab.clock = Box::new(clock.clone());
        collab.problems = Box::new(FixedProblems);
        collab.sessions = recorder;
        collab.students = vec!["Ada".into(), "Grace".into()];
        Self {
            controller: GameFlowController::new(RuntimeConfig::default(), collab),
            clock,
        }
    }

    fn new() -> Self {
        Self::with_recorder(Box::new(SharedLog::default()))
    }

    /// Advance the clock one frame and feed `input`
    fn frame(&mut self, input: InputSnapshot) -> Option<Signal> {
        self.controller.wait_for_next_tick();
        self.clock.advance(1);
        self.controller.handle_frame(&input).signal
    }

    fn state(&self) -> Option<GameStateTag> {
        self.controller.current_state()
    }

    /// Intro -> MainMenu -> StudentSelect -> GreetStudent -> ArithmeticDrill
    fn reach_drill(&mut self, student: usize) {
        self.frame(InputSnapshot::new().press(Key::Space));
        assert_eq!(self.state(), Some(GameStateTag::MainMenu));
        self.frame(InputSnapshot::new().press(Key::Enter));
        assert_eq!(self.state(), Some(GameStateTag::StudentSelect));
        let mut pick = InputSnapshot::new();
        for _ in 0..student {
            pick = pick.press(Key::Down);
        }
        self.frame(pick.press(Key::Enter));
        assert_eq!(self.state(), Some(GameStateTag::GreetStudent));
        self.frame(InputSnapshot::new().press(Key::Other));
        assert_eq!(self.state(), Some(GameStateTag::ArithmeticDrill));
    }

    /// Answer every fixed problem; `wrong` indexes get an off-by-one answer
    fn answer_drill(&mut self, wrong: &[u32]) -> Option<Signal> {
        let mut last = None;
        for i in 0..10u32 {
            let correct = i + i + 1;
            let given = if wrong.contains(&i) { correct + 1 } else { correct };
            self.clock.advance(1500);
            last = self.frame(InputSnapshot::new().type_number(given).press(Key::Enter));
        }
        last
    }
}

#[test]
fn perfect_drill_opens_bonus_round() {
    let log = SharedLog::default();
    let mut h = Harness::with_recorder(Box::new(log.clone()));
    h.reach_drill(1);

    assert_eq!(h.answer_drill(&[]), Some(Signal::DrillPerfect));
    assert_eq!(h.state(), Some(GameStateTag::BonusGame));

    let records = log.records.borrow();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].student, "Grace");
    assert_eq!(records[0].questions_asked, 10);
    assert_eq!(records[0].questions_correct, 10);
    assert_eq!(records[0].percent_correct, 100.0);
}

#[test]
fn imperfect_drill_returns_to_menu() {
    let log = SharedLog::default();
    let mut h = Harness::with_recorder(Box::new(log.clone()));
    h.reach_drill(0);

    assert_eq!(h.answer_drill(&[4]), Some(Signal::DrillImperfect));
    assert_eq!(h.state(), Some(GameStateTag::MainMenu));
    assert_eq!(log.records.borrow()[0].questions_correct, 9);
}

#[test]
fn idle_bonus_round_ends_in_hazard_loss() {
    let mut h = Harness::new();
    h.reach_drill(0);
    h.answer_drill(&[]);
    assert_eq!(h.state(), Some(GameStateTag::BonusGame));

    let mut ending = None;
    for _ in 0..5000 {
        if let Some(signal) = h.frame(InputSnapshot::new()) {
            ending = Some(signal);
            break;
        }
    }
    assert_eq!(ending, Some(Signal::HitHazard));
    assert_eq!(h.state(), Some(GameStateTag::MainMenu));
}

#[test]
fn escape_leaves_bonus_round() {
    let mut h = Harness::new();
    h.reach_drill(0);
    h.answer_drill(&[]);
    h.frame(InputSnapshot::new().hold(Key::Right));
    assert_eq!(
        h.frame(InputSnapshot::new().press(Key::Escape)),
        Some(Signal::ManualExit)
    );
    assert_eq!(h.state(), Some(GameStateTag::MainMenu));
}

#[test]
fn os_quit_terminates_from_any_state() {
    let log = SharedLog::default();
    let mut h = Harness::with_recorder(Box::new(log.clone()));
    h.reach_drill(0);
    // One right answer, then quit with the drill unfinished
    h.frame(InputSnapshot::new().type_number(1).press(Key::Enter));
    assert_eq!(h.state(), Some(GameStateTag::ArithmeticDrill));

    assert_eq!(h.frame(InputSnapshot::quit()), Some(Signal::OsQuit));
    assert_eq!(h.state(), None);
    assert!(!h.controller.is_running());
    assert!(log.records.borrow().is_empty());
}

#[test]
fn start_always_leads_to_student_select() {
    let mut h = Harness::new();
    h.frame(InputSnapshot::new().press(Key::Space));
    // Detour through Options and back
    h.frame(InputSnapshot::new().press(Key::Down).press(Key::Enter));
    assert_eq!(h.state(), Some(GameStateTag::Options));
    h.frame(InputSnapshot::new().press(Key::Escape));
    assert_eq!(h.state(), Some(GameStateTag::MainMenu));

    h.frame(InputSnapshot::new().press(Key::Enter));
    assert_eq!(h.state(), Some(GameStateTag::StudentSelect));
}

#[test]
fn failed_recording_does_not_block_play() {
    let mut h = Harness::with_recorder(Box::new(BrokenStore));
    h.reach_drill(0);
    assert_eq!(h.answer_drill(&[]), Some(Signal::DrillPerfect));
    assert_eq!(h.state(), Some(GameStateTag::BonusGame));
}

#[test]
fn unsupported_resolution_clamps_to_nearest() {
    let mut h = Harness::new();
    let applied = h
        .controller
        .request_resolution_change(Resolution::new(1910, 1070));
    assert_eq!(applied, Resolution::new(1920, 1080));
    assert_eq!(h.controller.config().resolution, Resolution::new(1920, 1080));
    assert!((h.controller.scaler().scale().value() - 1.8).abs() < 1e-5);
}

#[test]
fn resolution_change_restarts_bonus_round() {
    let mut h = Harness::new();
    h.reach_drill(0);
    h.answer_drill(&[]);
    for _ in 0..10 {
        h.frame(InputSnapshot::new());
    }
    h.controller
        .request_resolution_change(Resolution::new(1600, 900));
    match h.controller.screen() {
        Some(Screen::Bonus(bonus)) => {
            assert_eq!(bonus.game.ticks(), 0);
            assert!((bonus.game.tuning.scale.value() - 1.5).abs() < 1e-5);
        }
        _ => panic!("expected the bonus round to still be active"),
    }
}

#[test]
fn explanation_and_credits_run_out_on_their_own() {
    let mut h = Harness::new();
    h.frame(InputSnapshot::new().press(Key::Space));
    h.frame(InputSnapshot::new().press(Key::Down).press(Key::Down).press(Key::Enter));
    assert_eq!(h.state(), Some(GameStateTag::Explanation));
    for _ in 0..4 {
        h.clock.advance(4000);
        h.frame(InputSnapshot::new());
    }
    assert_eq!(h.state(), Some(GameStateTag::MainMenu));

    // Options -> Credits -> back to Options
    h.frame(InputSnapshot::new().press(Key::Down).press(Key::Enter));
    let to_credits = InputSnapshot::new()
        .press(Key::Up)
        .press(Key::Up)
        .press(Key::Enter);
    h.frame(to_credits);
    assert_eq!(h.state(), Some(GameStateTag::CreditRoll));
    for _ in 0..4 {
        h.frame(InputSnapshot::new().press(Key::Space));
    }
    assert_eq!(h.state(), Some(GameStateTag::Options));
}
