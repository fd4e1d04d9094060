//! Number Cat headless host
//!
//! Wires default collaborators around the core and plays one scripted
//! session through `handle_frame`, paced by the frame limiter. A windowed
//! host would replace the script with real input and replay the render
//! commands on its own backend.

use number_cat::audio::LogAudio;
use number_cat::flow::{
    Collaborators, GameFlowController, GameStateTag, ProblemGenerator, ProblemSource, Screen,
};
use number_cat::persistence::SessionLog;
use number_cat::platform::{InputSnapshot, Key};
use number_cat::render::NoAssets;
use number_cat::settings::RuntimeConfig;
use number_cat::sim::SystemClock;

const CONFIG_PATH: &str = "number-cat.json";
const SESSIONS_PATH: &str = "number-cat-sessions.json";
/// Give up on the bonus round after this many frames
const BONUS_FRAME_LIMIT: u64 = 60 * 30;
const MAX_FRAMES: u64 = 10_000;

/// Replays the problems the controller will ask, so the script can answer them
struct Answers {
    source: ProblemGenerator,
    pending: Vec<u32>,
}

impl Answers {
    fn next(&mut self) -> u32 {
        if self.pending.is_empty() {
            self.pending = self
                .source
                .generate(number_cat::consts::DRILL_LENGTH)
                .iter()
                .rev()
                .map(|p| p.answer())
                .collect();
        }
        self.pending.pop().unwrap_or(0)
    }
}

/// Chase the target and hop whenever grounded
fn bonus_autopilot(controller: &GameFlowController, frame: u64) -> InputSnapshot {
    let Some(Screen::Bonus(bonus)) = controller.screen() else {
        return InputSnapshot::new();
    };
    let player = bonus.game.player.rect.center().x;
    let target = bonus.game.target.rect.center().x;
    let mut input = InputSnapshot::new();
    if target > player + 4.0 {
        input = input.hold(Key::Right);
    } else if target < player - 4.0 {
        input = input.hold(Key::Left);
    }
    if frame % 20 == 0 {
        input = input.press(Key::Space);
    }
    input
}

fn main() {
    env_logger::init();
    log::info!("Number Cat (headless) starting...");

    let config = RuntimeConfig::load(CONFIG_PATH);
    let sessions = match SessionLog::open(SESSIONS_PATH) {
        Ok(history) => history,
        Err(e) => {
            log::warn!("Session history unavailable ({}), keeping it in memory", e);
            SessionLog::in_memory()
        }
    };

    let problems = ProblemGenerator::new(config.seed);
    let mut answers = Answers {
        source: problems.clone(),
        pending: Vec::new(),
    };
    let collab = Collaborators {
        assets: Box::new(NoAssets),
        audio: Box::new(LogAudio),
        sessions: Box::new(sessions),
        problems: Box::new(problems),
        students: vec!["Ada".to_string(), "Grace".to_string()],
        clock: Box::new(SystemClock::new()),
    };
    let mut controller = GameFlowController::new(config, collab);

    let mut bonus_frames = 0;
    let mut visited_menu = false;
    while controller.is_running() && controller.frame() < MAX_FRAMES {
        controller.wait_for_next_tick();
        let frame = controller.frame();
        let input = match controller.current_state() {
            Some(GameStateTag::Intro) => InputSnapshot::new().press(Key::Space),
            Some(GameStateTag::MainMenu) if visited_menu => {
                // Second visit: quit (last item)
                InputSnapshot::new().press(Key::Up).press(Key::Enter)
            }
            Some(GameStateTag::MainMenu) => {
                visited_menu = true;
                InputSnapshot::new().press(Key::Enter)
            }
            Some(GameStateTag::StudentSelect) => InputSnapshot::new().press(Key::Enter),
            Some(GameStateTag::GreetStudent) => InputSnapshot::new().press(Key::Other),
            Some(GameStateTag::ArithmeticDrill) => InputSnapshot::new()
                .type_number(answers.next())
                .press(Key::Enter),
            Some(GameStateTag::BonusGame) => {
                bonus_frames += 1;
                if bonus_frames > BONUS_FRAME_LIMIT {
                    InputSnapshot::new().press(Key::Escape)
                } else {
                    bonus_autopilot(&controller, frame)
                }
            }
            Some(_) => InputSnapshot::new().press(Key::Escape),
            None => break,
        };
        let out = controller.handle_frame(&input);
        log::trace!("Frame {}: {} commands", frame, out.commands.len());
    }

    if let Err(e) = controller.config().save(CONFIG_PATH) {
        log::warn!("Could not save config: {}", e);
    }
    log::info!("Number Cat finished after {} frames", controller.frame());
}
