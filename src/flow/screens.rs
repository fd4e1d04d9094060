//! One struct per game state
//!
//! Screens never change state themselves. `update` reports a `Response` and
//! the controller decides what happens next. Anything a screen owns is
//! dropped with it on exit.

use glam::Vec2;

use super::Layout;
use super::drill::DrillScreen;
use super::menu::Menu;
use super::state::{GameStateTag, Signal};
use crate::consts::{INTRO_FADE, SLIDE_FADE};
use crate::persistence::SessionId;
use crate::platform::{InputSnapshot, Key};
use crate::render::{AssetCache, Color, Drawable, RenderCommand, centered_text};
use crate::settings::{RuntimeConfig, Theme};
use crate::sim::{
    BonusGame, BonusInput, BonusOutcome, BonusSprites, FadeEffect, Rect, SpawnRules, Tuning,
};

/// Volume change per Options press
pub const VOLUME_STEP: f32 = 0.1;

/// Per-frame view of the controller handed to the active screen
pub struct ScreenContext<'a> {
    pub now_ms: u64,
    pub layout: Layout,
    pub config: &'a RuntimeConfig,
}

impl ScreenContext<'_> {
    pub fn theme(&self) -> Theme {
        self.config.theme()
    }
}

/// Settings edits requested from the Options screen
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigChange {
    NextResolution,
    VolumeStep(f32),
    NextTheme,
}

/// What a screen wants after one update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Response {
    Continue,
    Signal(Signal),
    Configure(ConfigChange),
}

impl From<Option<Signal>> for Response {
    fn from(signal: Option<Signal>) -> Self {
        signal.map_or(Response::Continue, Response::Signal)
    }
}

/// Intro: logo fades in and out, then hands over to the main menu
pub struct IntroScreen {
    fade: FadeEffect,
    logo: Drawable,
    /// Set once the hand-over signal has been sent
    done: bool,
}

impl IntroScreen {
    pub fn new(now_ms: u64, assets: &mut AssetCache) -> Self {
        Self {
            fade: FadeEffect::from_timings(INTRO_FADE, now_ms),
            logo: assets.drawable("logo", Color::rgb(255, 200, 40)),
            done: false,
        }
    }

    fn update(&mut self, input: &InputSnapshot, now_ms: u64) -> Option<Signal> {
        if self.done {
            return None;
        }
        let signal = if input.any_input() {
            Signal::AnyInput
        } else if self.fade.is_finished(now_ms) {
            Signal::Timeout
        } else {
            return None;
        };
        self.done = true;
        Some(signal)
    }

    fn render(&self, ctx: &ScreenContext, out: &mut Vec<RenderCommand>) {
        let alpha = self.fade.alpha(ctx.now_ms);
        let l = &ctx.layout;
        out.push(RenderCommand::Sprite {
            drawable: self.logo.clone(),
            rect: l.rect(&Rect::new(336.0, 160.0, 128.0, 128.0)),
            rotation_deg: 0.0,
            flip_x: false,
        });
        out.push(centered_text(
            "Number Cat",
            l.point(Vec2::new(400.0, 330.0)),
            l.len(56.0),
            ctx.theme().text.with_alpha(alpha),
        ));
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainCommand {
    Start,
    Options,
    Explain,
    Quit,
}

pub struct MenuScreen {
    menu: Menu<MainCommand>,
}

impl MenuScreen {
    pub fn new() -> Self {
        Self {
            menu: Menu::new([
                (MainCommand::Start, "Start".to_string()),
                (MainCommand::Options, "Options".to_string()),
                (MainCommand::Explain, "How to play".to_string()),
                (MainCommand::Quit, "Quit".to_string()),
            ]),
        }
    }

    fn update(&mut self, input: &InputSnapshot, layout: &Layout) -> Option<Signal> {
        if input.pressed(Key::Escape) {
            return Some(Signal::Quit);
        }
        self.menu.handle(input, layout).map(|cmd| match cmd {
            MainCommand::Start => Signal::Start,
            MainCommand::Options => Signal::Options,
            MainCommand::Explain => Signal::Explain,
            MainCommand::Quit => Signal::Quit,
        })
    }
}

impl Default for MenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

/// One button per student on the roster
pub struct StudentSelectScreen {
    menu: Menu<usize>,
}

impl StudentSelectScreen {
    pub fn new(students: &[String]) -> Self {
        Self {
            menu: Menu::new(students.iter().cloned().enumerate()),
        }
    }

    fn update(&mut self, input: &InputSnapshot, layout: &Layout) -> Option<Signal> {
        self.menu.handle(input, layout).map(Signal::StudentChosen)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionsCommand {
    Resolution,
    VolumeUp,
    VolumeDown,
    Theme,
    Credits,
    Back,
}

pub struct OptionsScreen {
    menu: Menu<OptionsCommand>,
}

impl OptionsScreen {
    pub fn new(config: &RuntimeConfig) -> Self {
        let mut screen = Self {
            menu: Menu::new([
                (OptionsCommand::Resolution, String::new()),
                (OptionsCommand::VolumeUp, "Volume up".to_string()),
                (OptionsCommand::VolumeDown, "Volume down".to_string()),
                (OptionsCommand::Theme, String::new()),
                (OptionsCommand::Credits, "Credits".to_string()),
                (OptionsCommand::Back, "Back".to_string()),
            ]),
        };
        screen.refresh(config);
        screen
    }

    /// Rewrite the labels that show current values
    pub fn refresh(&mut self, config: &RuntimeConfig) {
        self.menu
            .set_label(0, format!("Resolution: {}", config.resolution));
        self.menu
            .set_label(3, format!("Theme: {}", config.theme.as_str()));
    }

    fn update(&mut self, input: &InputSnapshot, layout: &Layout) -> Response {
        if input.pressed(Key::Escape) {
            return Response::Signal(Signal::Back);
        }
        match self.menu.handle(input, layout) {
            None => Response::Continue,
            Some(OptionsCommand::Resolution) => Response::Configure(ConfigChange::NextResolution),
            Some(OptionsCommand::VolumeUp) => {
                Response::Configure(ConfigChange::VolumeStep(VOLUME_STEP))
            }
            Some(OptionsCommand::VolumeDown) => {
                Response::Configure(ConfigChange::VolumeStep(-VOLUME_STEP))
            }
            Some(OptionsCommand::Theme) => Response::Configure(ConfigChange::NextTheme),
            Some(OptionsCommand::Credits) => Response::Signal(Signal::Credits),
            Some(OptionsCommand::Back) => Response::Signal(Signal::Back),
        }
    }

    fn render(&self, ctx: &ScreenContext, out: &mut Vec<RenderCommand>) {
        let l = &ctx.layout;
        out.push(centered_text(
            "Options",
            l.point(Vec2::new(400.0, 60.0)),
            l.len(44.0),
            ctx.theme().text,
        ));
        out.push(centered_text(
            format!("Music volume {:.0}%", ctx.config.music_volume * 100.0),
            l.point(Vec2::new(400.0, 115.0)),
            l.len(22.0),
            ctx.theme().text,
        ));
        self.menu.render(l, &ctx.theme(), out);
    }
}

const EXPLANATION: [&str; 4] = [
    "Answer ten flashcards to earn the bonus round",
    "Type the answer and press Enter",
    "Get every card right and the cat goes fishing",
    "Jump on the falling platforms to catch the tuna",
];

const CREDITS: [&str; 4] = [
    "Number Cat",
    "Design and code: the Number Cat team",
    "Artwork: the Number Cat team",
    "Thanks for playing",
];

/// Timed slides, one line at a time. Any input skips to the next slide.
pub struct SlideShowScreen {
    slides: Vec<String>,
    index: usize,
    fade: FadeEffect,
    finished: Signal,
    done: bool,
}

impl SlideShowScreen {
    pub fn new(slides: Vec<String>, finished: Signal, now_ms: u64) -> Self {
        Self {
            slides,
            index: 0,
            fade: FadeEffect::from_timings(SLIDE_FADE, now_ms),
            finished,
            done: false,
        }
    }

    pub fn explanation(now_ms: u64) -> Self {
        Self::new(
            EXPLANATION.iter().map(|s| s.to_string()).collect(),
            Signal::SlidesExhausted,
            now_ms,
        )
    }

    pub fn credits(now_ms: u64) -> Self {
        Self::new(
            CREDITS.iter().map(|s| s.to_string()).collect(),
            Signal::CreditsExhausted,
            now_ms,
        )
    }

    pub fn index(&self) -> usize {
        self.index
    }

    fn update(&mut self, input: &InputSnapshot, now_ms: u64) -> Option<Signal> {
        if self.done {
            return None;
        }
        if !input.any_input() && !self.fade.is_finished(now_ms) {
            return None;
        }
        self.index += 1;
        if self.index >= self.slides.len() {
            self.done = true;
            return Some(self.finished);
        }
        self.fade.restart(now_ms);
        None
    }

    fn render(&self, ctx: &ScreenContext, out: &mut Vec<RenderCommand>) {
        let Some(line) = self.slides.get(self.index) else {
            return;
        };
        let alpha = self.fade.alpha(ctx.now_ms);
        out.push(centered_text(
            line.clone(),
            ctx.layout.point(Vec2::new(400.0, 280.0)),
            ctx.layout.len(32.0),
            ctx.theme().text.with_alpha(alpha),
        ));
    }
}

/// "Hello, <name>!" until any input
pub struct GreetScreen {
    pub student: String,
    pub session: SessionId,
}

impl GreetScreen {
    pub fn new(student: &str, session: SessionId) -> Self {
        Self {
            student: student.to_string(),
            session,
        }
    }

    fn render(&self, ctx: &ScreenContext, out: &mut Vec<RenderCommand>) {
        let l = &ctx.layout;
        out.push(centered_text(
            format!("Hello, {}!", self.student),
            l.point(Vec2::new(400.0, 240.0)),
            l.len(48.0),
            ctx.theme().text,
        ));
        out.push(centered_text(
            "Press any key to begin",
            l.point(Vec2::new(400.0, 330.0)),
            l.len(24.0),
            ctx.theme().accent,
        ));
    }
}

/// Bonus round wrapper: input mapping, sprites and restarts
pub struct BonusScreen {
    pub game: BonusGame,
    sprites: BonusSprites,
    rules: SpawnRules,
}

impl BonusScreen {
    pub fn new(tuning: Tuning, seed: u64, assets: &mut AssetCache) -> Self {
        Self::with_rules(tuning, seed, SpawnRules::default(), assets)
    }

    pub fn with_rules(
        tuning: Tuning,
        seed: u64,
        rules: SpawnRules,
        assets: &mut AssetCache,
    ) -> Self {
        let fallback = BonusSprites::default();
        let mut resolve = |name: &str, d: &Drawable| match d {
            Drawable::Placeholder(c) => assets.drawable(name, *c),
            Drawable::Image(_) => assets.drawable(name, Color::MAGENTA),
        };
        let sprites = BonusSprites {
            player: resolve("cat", &fallback.player),
            platform: resolve("platform", &fallback.platform),
            hazard: resolve("dog", &fallback.hazard),
            target: resolve("tuna", &fallback.target),
        };
        Self {
            game: BonusGame::new(tuning, seed, rules),
            sprites,
            rules,
        }
    }

    /// Throw the current round away and start over with new tuning
    pub fn restart(&mut self, tuning: Tuning, seed: u64) {
        log::info!("Restarting bonus round after rescale");
        self.game = BonusGame::new(tuning, seed, self.rules);
    }

    fn update(&mut self, input: &InputSnapshot) -> Option<Signal> {
        if input.pressed(Key::Escape) {
            return Some(Signal::ManualExit);
        }
        let tick_input = BonusInput {
            steer: input.horizontal(),
            jump: input.pressed(Key::Space) || input.pressed(Key::Up),
        };
        self.game.tick(&tick_input).map(|outcome| match outcome {
            BonusOutcome::Caught => Signal::CaughtTarget,
            BonusOutcome::HitHazard => Signal::HitHazard,
        })
    }

    fn render(&self, ctx: &ScreenContext, out: &mut Vec<RenderCommand>) {
        self.game.render(&self.sprites, ctx.layout.offset, out);
        out.push(centered_text(
            "Catch the tuna! (Esc to leave)",
            ctx.layout.point(Vec2::new(400.0, 20.0)),
            ctx.layout.len(18.0),
            ctx.theme().text,
        ));
    }
}

/// The active state and everything it owns
pub enum Screen {
    Intro(IntroScreen),
    MainMenu(MenuScreen),
    StudentSelect(StudentSelectScreen),
    Options(OptionsScreen),
    Explanation(SlideShowScreen),
    CreditRoll(SlideShowScreen),
    Greet(GreetScreen),
    Drill(DrillScreen),
    Bonus(BonusScreen),
}

impl Screen {
    pub fn tag(&self) -> GameStateTag {
        match self {
            Screen::Intro(_) => GameStateTag::Intro,
            Screen::MainMenu(_) => GameStateTag::MainMenu,
            Screen::StudentSelect(_) => GameStateTag::StudentSelect,
            Screen::Options(_) => GameStateTag::Options,
            Screen::Explanation(_) => GameStateTag::Explanation,
            Screen::CreditRoll(_) => GameStateTag::CreditRoll,
            Screen::Greet(_) => GameStateTag::GreetStudent,
            Screen::Drill(_) => GameStateTag::ArithmeticDrill,
            Screen::Bonus(_) => GameStateTag::BonusGame,
        }
    }

    pub fn update(&mut self, input: &InputSnapshot, ctx: &ScreenContext) -> Response {
        match self {
            Screen::Intro(s) => s.update(input, ctx.now_ms).into(),
            Screen::MainMenu(s) => s.update(input, &ctx.layout).into(),
            Screen::StudentSelect(s) => s.update(input, &ctx.layout).into(),
            Screen::Options(s) => s.update(input, &ctx.layout),
            Screen::Explanation(s) | Screen::CreditRoll(s) => s.update(input, ctx.now_ms).into(),
            Screen::Greet(_) => input.any_input().then_some(Signal::AnyInput).into(),
            Screen::Drill(s) => s.update(input, ctx.now_ms).into(),
            Screen::Bonus(s) => s.update(input).into(),
        }
    }

    pub fn render(&self, ctx: &ScreenContext, out: &mut Vec<RenderCommand>) {
        let theme = ctx.theme();
        match self {
            Screen::Intro(s) => s.render(ctx, out),
            Screen::MainMenu(s) => {
                out.push(centered_text(
                    "Number Cat",
                    ctx.layout.point(Vec2::new(400.0, 70.0)),
                    ctx.layout.len(52.0),
                    theme.text,
                ));
                s.menu.render(&ctx.layout, &theme, out);
            }
            Screen::StudentSelect(s) => {
                out.push(centered_text(
                    "Who is playing?",
                    ctx.layout.point(Vec2::new(400.0, 70.0)),
                    ctx.layout.len(40.0),
                    theme.text,
                ));
                s.menu.render(&ctx.layout, &theme, out);
            }
            Screen::Options(s) => s.render(ctx, out),
            Screen::Explanation(s) | Screen::CreditRoll(s) => s.render(ctx, out),
            Screen::Greet(s) => s.render(ctx, out),
            Screen::Drill(s) => s.render(&ctx.layout, &theme, out),
            Screen::Bonus(s) => s.render(ctx, out),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::NoAssets;
    use crate::sim::{Resolution, ResolutionScaler};

    fn ctx(config: &RuntimeConfig, now_ms: u64) -> ScreenContext<'_> {
        ScreenContext {
            now_ms,
            layout: Layout::from_scaler(&ResolutionScaler::new(
                Resolution::reference(),
                config.resolution,
            )),
            config,
        }
    }

    #[test]
    fn test_intro_times_out_once() {
        let config = RuntimeConfig::default();
        let mut assets = AssetCache::new(Box::new(NoAssets));
        let mut screen = Screen::Intro(IntroScreen::new(0, &mut assets));
        let idle = InputSnapshot::new();
        assert_eq!(screen.update(&idle, &ctx(&config, 3999)), Response::Continue);
        assert_eq!(
            screen.update(&idle, &ctx(&config, 4000)),
            Response::Signal(Signal::Timeout)
        );
        assert_eq!(screen.update(&idle, &ctx(&config, 4100)), Response::Continue);
    }

    #[test]
    fn test_intro_skips_on_input() {
        let config = RuntimeConfig::default();
        let mut assets = AssetCache::new(Box::new(NoAssets));
        let mut screen = Screen::Intro(IntroScreen::new(0, &mut assets));
        assert_eq!(
            screen.update(&InputSnapshot::new().press(Key::Other), &ctx(&config, 10)),
            Response::Signal(Signal::AnyInput)
        );
    }

    #[test]
    fn test_main_menu_commands() {
        let config = RuntimeConfig::default();
        let mut screen = Screen::MainMenu(MenuScreen::new());
        let c = ctx(&config, 0);
        assert_eq!(
            screen.update(&InputSnapshot::new().press(Key::Enter), &c),
            Response::Signal(Signal::Start)
        );
        assert_eq!(
            screen.update(&InputSnapshot::new().press(Key::Up).press(Key::Enter), &c),
            Response::Signal(Signal::Quit)
        );
    }

    #[test]
    fn test_options_emit_config_changes() {
        let config = RuntimeConfig::default();
        let mut screen = OptionsScreen::new(&config);
        let l = ctx(&config, 0).layout;
        assert_eq!(
            screen.update(&InputSnapshot::new().press(Key::Enter), &l),
            Response::Configure(ConfigChange::NextResolution)
        );
        assert_eq!(
            screen.update(&InputSnapshot::new().press(Key::Down).press(Key::Down).press(Key::Enter), &l),
            Response::Configure(ConfigChange::VolumeStep(-VOLUME_STEP))
        );
        assert_eq!(
            screen.update(&InputSnapshot::new().press(Key::Escape), &l),
            Response::Signal(Signal::Back)
        );
    }

    #[test]
    fn test_options_labels_follow_config() {
        let mut config = RuntimeConfig::default();
        let mut screen = OptionsScreen::new(&config);
        config.resolution = Resolution::new(1920, 1080);
        screen.refresh(&config);
        let mut out = Vec::new();
        screen.render(&ctx(&config, 0), &mut out);
        assert!(out.iter().any(|c| matches!(
            c,
            RenderCommand::Text { text, .. } if text == "Resolution: 1920x1080"
        )));
    }

    #[test]
    fn test_slides_advance_on_timer_then_finish() {
        let mut show = SlideShowScreen::new(
            vec!["one".into(), "two".into()],
            Signal::SlidesExhausted,
            0,
        );
        let idle = InputSnapshot::new();
        let slide_ms = SLIDE_FADE.0 + SLIDE_FADE.1 + SLIDE_FADE.2;
        assert_eq!(show.update(&idle, slide_ms - 1), None);
        assert_eq!(show.update(&idle, slide_ms), None);
        assert_eq!(show.index(), 1);
        assert_eq!(
            show.update(&InputSnapshot::new().press(Key::Space), slide_ms + 5),
            Some(Signal::SlidesExhausted)
        );
        assert_eq!(show.update(&idle, slide_ms * 10), None);
    }

    #[test]
    fn test_bonus_escape_is_manual_exit() {
        let config = RuntimeConfig::default();
        let mut assets = AssetCache::new(Box::new(NoAssets));
        let mut screen = Screen::Bonus(BonusScreen::new(Tuning::default(), 1, &mut assets));
        assert_eq!(
            screen.update(&InputSnapshot::new().press(Key::Escape), &ctx(&config, 0)),
            Response::Signal(Signal::ManualExit)
        );
    }

    #[test]
    fn test_bonus_restart_uses_new_tuning() {
        let mut assets = AssetCache::new(Box::new(NoAssets));
        let mut screen = BonusScreen::new(Tuning::default(), 1, &mut assets);
        screen.update(&InputSnapshot::new().hold(Key::Right));
        assert!(screen.game.ticks() > 0);
        let big = ResolutionScaler::new(Resolution::reference(), Resolution::new(1600, 1200));
        screen.restart(big.tuning(), 2);
        assert_eq!(screen.game.ticks(), 0);
        assert_eq!(screen.game.tuning, big.tuning());
    }

    #[test]
    fn test_greet_waits_for_input() {
        let config = RuntimeConfig::default();
        let mut screen = Screen::Greet(GreetScreen::new("Ada", SessionId(1)));
        assert_eq!(screen.update(&InputSnapshot::new(), &ctx(&config, 0)), Response::Continue);
        assert_eq!(
            screen.update(&InputSnapshot::new().press(Key::Other), &ctx(&config, 0)),
            Response::Signal(Signal::AnyInput)
        );
        assert_eq!(screen.tag(), GameStateTag::GreetStudent);
    }
}
