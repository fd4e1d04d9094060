//! Game flow controller
//!
//! Owns the active screen and drives it one frame at a time:
//! - OS quit is checked before the screen sees the input
//! - At most one transition per frame
//! - The old screen is dropped before the next one is built
//! - Collaborators (assets, audio, sessions) are only touched on entry/exit

pub mod drill;
pub mod menu;
pub mod screens;
pub mod state;

pub use drill::{DrillScreen, DrillSummary, Problem, ProblemGenerator, ProblemKind, ProblemSource};
pub use menu::{Menu, MenuItem};
pub use screens::{ConfigChange, Response, Screen, ScreenContext};
pub use state::{GameStateTag, Signal, Transition, transition};

use glam::Vec2;

use crate::audio::{AudioManager, AudioSink, NullAudio, SoundCue};
use crate::consts::DRILL_LENGTH;
use crate::persistence::{NoRecorder, SessionId, SessionRecord, SessionRecorder};
use crate::platform::InputSnapshot;
use crate::render::{AssetCache, AssetProvider, Color, NoAssets, RenderCommand, RenderList};
use crate::settings::{RuntimeConfig, nearest_supported, next_supported};
use crate::sim::{Clock, Rect, Resolution, ResolutionScaler, ScaleFactor, SimulationClock, SystemClock};
use screens::{
    BonusScreen, GreetScreen, IntroScreen, MenuScreen, OptionsScreen, SlideShowScreen,
    StudentSelectScreen,
};

/// Name used when the host supplies no roster
const GUEST: &str = "Guest";

/// Maps reference-pixel layout to output pixels for the current resolution
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub scale: ScaleFactor,
    /// Letterbox margin
    pub offset: Vec2,
    pub reference: Resolution,
}

impl Layout {
    pub fn from_scaler(scaler: &ResolutionScaler) -> Self {
        Self {
            scale: scaler.scale(),
            offset: scaler.offset(),
            reference: scaler.reference(),
        }
    }

    #[inline]
    pub fn point(&self, p: Vec2) -> Vec2 {
        self.offset + self.scale.apply_vec(p)
    }

    #[inline]
    pub fn len(&self, v: f32) -> f32 {
        self.scale.apply(v)
    }

    pub fn rect(&self, r: &Rect) -> Rect {
        Rect::from_pos_size(self.point(r.pos), self.scale.apply_vec(r.size))
    }

    /// The scaled play area inside the letterbox
    pub fn area(&self) -> Rect {
        Rect::from_pos_size(self.offset, self.scale.apply_vec(self.reference.size()))
    }
}

/// Everything the host plugs into the core
pub struct Collaborators {
    pub assets: Box<dyn AssetProvider>,
    pub audio: Box<dyn AudioSink>,
    pub sessions: Box<dyn SessionRecorder>,
    pub problems: Box<dyn ProblemSource>,
    /// Student roster shown on the select screen
    pub students: Vec<String>,
    pub clock: Box<dyn Clock>,
}

impl Collaborators {
    /// No images, no sound, nothing recorded, wall-clock time
    pub fn headless(seed: u64) -> Self {
        Self {
            assets: Box::new(NoAssets),
            audio: Box::new(NullAudio),
            sessions: Box::new(NoRecorder),
            problems: Box::new(ProblemGenerator::new(seed)),
            students: vec![GUEST.to_string()],
            clock: Box::new(SystemClock::new()),
        }
    }
}

/// Result of one `handle_frame`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutput {
    pub commands: RenderList,
    /// Signal raised this frame, whether or not it changed state
    pub signal: Option<Signal>,
    /// False once the game has terminated
    pub running: bool,
}

/// Music for each state
fn cue_for(state: GameStateTag) -> SoundCue {
    match state {
        GameStateTag::Intro | GameStateTag::CreditRoll => SoundCue::Title,
        GameStateTag::ArithmeticDrill => SoundCue::Drill,
        GameStateTag::BonusGame => SoundCue::Bonus,
        GameStateTag::MainMenu
        | GameStateTag::StudentSelect
        | GameStateTag::Options
        | GameStateTag::Explanation
        | GameStateTag::GreetStudent => SoundCue::Menu,
    }
}

pub struct GameFlowController {
    config: RuntimeConfig,
    scaler: ResolutionScaler,
    /// `None` once terminated
    screen: Option<Screen>,
    assets: AssetCache,
    audio: AudioManager,
    sessions: Box<dyn SessionRecorder>,
    problems: Box<dyn ProblemSource>,
    students: Vec<String>,
    clock: Box<dyn Clock>,
    sim_clock: SimulationClock,
    /// Roster index from the last `StudentChosen`
    student: Option<usize>,
    session: Option<SessionId>,
    sessions_started: u64,
    bonus_rounds: u64,
}

impl GameFlowController {
    /// Start at the intro, scaled from `reference` to `active`
    pub fn initialize(
        reference: Resolution,
        active: Resolution,
        config: RuntimeConfig,
        collab: Collaborators,
    ) -> Self {
        let mut config = config.sanitize();
        let active = nearest_supported(active);
        config.resolution = active;

        let mut students = collab.students;
        if students.is_empty() {
            log::warn!("Empty student roster, adding {}", GUEST);
            students.push(GUEST.to_string());
        }

        let mut controller = Self {
            scaler: ResolutionScaler::new(reference, active),
            screen: None,
            assets: AssetCache::new(collab.assets),
            audio: AudioManager::new(collab.audio, config.music_volume),
            sessions: collab.sessions,
            problems: collab.problems,
            students,
            clock: collab.clock,
            sim_clock: SimulationClock::new(GameStateTag::Intro.clock_mode()),
            student: None,
            session: None,
            sessions_started: 0,
            bonus_rounds: 0,
            config,
        };
        controller.enter(GameStateTag::Intro);
        controller
    }

    /// Start at the configured resolution
    pub fn new(config: RuntimeConfig, collab: Collaborators) -> Self {
        let active = config.resolution;
        Self::initialize(Resolution::reference(), active, config, collab)
    }

    pub fn current_state(&self) -> Option<GameStateTag> {
        self.screen.as_ref().map(Screen::tag)
    }

    pub fn is_running(&self) -> bool {
        self.screen.is_some()
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn scaler(&self) -> &ResolutionScaler {
        &self.scaler
    }

    pub fn audio(&self) -> &AudioManager {
        &self.audio
    }

    pub fn screen(&self) -> Option<&Screen> {
        self.screen.as_ref()
    }

    /// Frames handled so far
    pub fn frame(&self) -> u64 {
        self.sim_clock.frame()
    }

    /// Block until the next frame boundary for the active state's rate
    pub fn wait_for_next_tick(&mut self) {
        self.sim_clock.wait_for_next_tick(self.clock.as_mut());
    }

    fn layout(&self) -> Layout {
        Layout::from_scaler(&self.scaler)
    }

    /// Run one frame: input, update, at most one transition, render
    pub fn handle_frame(&mut self, input: &InputSnapshot) -> FrameOutput {
        let Some(screen) = self.screen.as_mut() else {
            return FrameOutput {
                commands: Vec::new(),
                signal: None,
                running: false,
            };
        };
        self.sim_clock.advance();
        let state = screen.tag();

        let signal = if input.quit_requested {
            Some(Signal::OsQuit)
        } else {
            let ctx = ScreenContext {
                now_ms: self.clock.now_ms(),
                layout: Layout::from_scaler(&self.scaler),
                config: &self.config,
            };
            match screen.update(input, &ctx) {
                Response::Continue => None,
                Response::Signal(s) => Some(s),
                Response::Configure(change) => {
                    self.apply_config_change(change);
                    None
                }
            }
        };

        if let Some(signal) = signal {
            self.apply_signal(state, signal);
        }

        FrameOutput {
            commands: self.render(),
            signal,
            running: self.screen.is_some(),
        }
    }

    fn apply_signal(&mut self, state: GameStateTag, signal: Signal) {
        match transition(state, &signal) {
            Transition::Stay => {
                log::debug!("{:?} ignored in {:?}", signal, state);
            }
            Transition::Terminate => {
                // Discarded without exit hooks; an unfinished drill is not recorded
                self.screen = None;
                self.audio.stop();
                log::info!("Terminated from {:?} ({:?})", state, signal);
            }
            Transition::Goto(next) => {
                if let Signal::StudentChosen(index) = signal {
                    self.student = Some(index);
                }
                self.exit(signal);
                self.enter(next);
            }
        }
    }

    /// Drop the active screen, running its exit hooks
    fn exit(&mut self, signal: Signal) {
        let Some(screen) = self.screen.take() else {
            return;
        };
        match screen {
            Screen::Drill(drill) => self.record_drill(&drill),
            Screen::Bonus(_) => match signal {
                Signal::CaughtTarget => self.audio.jingle(SoundCue::Win),
                Signal::HitHazard => self.audio.jingle(SoundCue::Lose),
                _ => {}
            },
            _ => {}
        }
    }

    fn enter(&mut self, next: GameStateTag) {
        let now = self.clock.now_ms();
        self.sim_clock.set_mode(next.clock_mode());

        let screen = match next {
            GameStateTag::Intro => Screen::Intro(IntroScreen::new(now, &mut self.assets)),
            GameStateTag::MainMenu => Screen::MainMenu(MenuScreen::new()),
            GameStateTag::StudentSelect => {
                Screen::StudentSelect(StudentSelectScreen::new(&self.students))
            }
            GameStateTag::Options => Screen::Options(OptionsScreen::new(&self.config)),
            GameStateTag::Explanation => Screen::Explanation(SlideShowScreen::explanation(now)),
            GameStateTag::CreditRoll => Screen::CreditRoll(SlideShowScreen::credits(now)),
            GameStateTag::GreetStudent => {
                self.sessions_started += 1;
                let session = SessionId(self.sessions_started);
                self.session = Some(session);
                Screen::Greet(GreetScreen::new(self.student_name(), session))
            }
            GameStateTag::ArithmeticDrill => {
                let problems = self.problems.generate(DRILL_LENGTH);
                Screen::Drill(DrillScreen::new(problems, now))
            }
            GameStateTag::BonusGame => {
                let seed = self.next_bonus_seed();
                Screen::Bonus(BonusScreen::new(self.scaler.tuning(), seed, &mut self.assets))
            }
        };

        let cue = cue_for(next);
        if self.audio.current() != Some(cue) {
            self.audio.stop();
            self.audio.play(cue);
        }
        log::info!("Entered {:?}", next);
        self.screen = Some(screen);
    }

    fn student_name(&self) -> &str {
        self.student
            .and_then(|i| self.students.get(i))
            .map_or(GUEST, String::as_str)
    }

    fn next_bonus_seed(&mut self) -> u64 {
        self.bonus_rounds += 1;
        self.config.seed.wrapping_add(self.bonus_rounds)
    }

    fn record_drill(&mut self, drill: &DrillScreen) {
        let summary = drill.summary();
        let session = self.session.unwrap_or(SessionId(0));
        let record = SessionRecord::new(session, self.student_name(), summary.asked, summary.correct);
        match self.sessions.record(&record) {
            Ok(()) => log::info!(
                "Recorded {} for {}: {}/{}",
                session,
                record.student,
                record.questions_correct,
                record.questions_asked
            ),
            Err(e) => log::warn!("Could not record {}: {}", session, e),
        }
    }

    /// Switch output resolution. Unsupported requests clamp to the nearest
    /// supported one; an active bonus round restarts with the new scale.
    pub fn request_resolution_change(&mut self, requested: Resolution) -> Resolution {
        let res = nearest_supported(requested);
        if res != requested {
            log::warn!("Resolution {} unsupported, using {}", requested, res);
        }
        if self.scaler.set_active(res) {
            self.config.resolution = res;
            let tuning = self.scaler.tuning();
            if matches!(self.screen, Some(Screen::Bonus(_))) {
                let seed = self.next_bonus_seed();
                if let Some(Screen::Bonus(bonus)) = self.screen.as_mut() {
                    bonus.restart(tuning, seed);
                }
            }
            if let Some(Screen::Options(options)) = self.screen.as_mut() {
                options.refresh(&self.config);
            }
        }
        res
    }

    fn apply_config_change(&mut self, change: ConfigChange) {
        match change {
            ConfigChange::NextResolution => {
                self.request_resolution_change(next_supported(self.config.resolution));
            }
            ConfigChange::VolumeStep(delta) => {
                self.config.music_volume = (self.config.music_volume + delta).clamp(0.0, 1.0);
                self.audio.set_volume(self.config.music_volume);
                log::info!("Music volume {:.0}%", self.config.music_volume * 100.0);
            }
            ConfigChange::NextTheme => {
                self.config.theme = self.config.theme.next();
                log::info!("Theme {}", self.config.theme.as_str());
            }
        }
        if let Some(Screen::Options(options)) = self.screen.as_mut() {
            options.refresh(&self.config);
        }
    }

    fn render(&self) -> RenderList {
        let mut out = Vec::new();
        let Some(screen) = self.screen.as_ref() else {
            return out;
        };
        let layout = self.layout();
        out.push(RenderCommand::Clear(Color::BLACK));
        out.push(RenderCommand::FillRect {
            rect: layout.area(),
            color: self.config.theme().background,
        });
        let ctx = ScreenContext {
            now_ms: self.clock.now_ms(),
            layout,
            config: &self.config,
        };
        screen.render(&ctx, &mut out);
        out
    }
}
