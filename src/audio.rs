//! Audio collaborator
//!
//! The core only decides *which* cue plays and at what volume; the host's
//! `AudioSink` does the actual playback. Cues change on screen entry and exit,
//! never per tick.

/// Music and jingles, one per screen family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Intro and credits
    Title,
    /// Menus, student select, explanation
    Menu,
    /// Arithmetic drill
    Drill,
    /// Bonus round
    Bonus,
    /// Caught the tuna
    Win,
    /// Hit a hazard
    Lose,
}

impl SoundCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCue::Title => "title",
            SoundCue::Menu => "menu",
            SoundCue::Drill => "drill",
            SoundCue::Bonus => "bonus",
            SoundCue::Win => "win",
            SoundCue::Lose => "lose",
        }
    }
}

/// Host-side playback backend
pub trait AudioSink {
    fn play(&mut self, cue: SoundCue, volume: f32);
    /// Stop the music track. One-shot jingles already started keep playing.
    fn stop_music(&mut self);
    fn set_volume(&mut self, volume: f32);
}

/// Silent sink
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play(&mut self, _cue: SoundCue, _volume: f32) {}
    fn stop_music(&mut self) {}
    fn set_volume(&mut self, _volume: f32) {}
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play(&mut self, cue: SoundCue, volume: f32) {
        log::info!("[audio] play {} at {:.0}%", cue.as_str(), volume * 100.0);
    }

    fn stop_music(&mut self) {
        log::info!("[audio] stop music");
    }

    fn set_volume(&mut self, volume: f32) {
        log::info!("[audio] volume {:.0}%", volume * 100.0);
    }
}

/// Volume rules in front of a sink
pub struct AudioManager {
    sink: Box<dyn AudioSink>,
    volume: f32,
    muted: bool,
    current: Option<SoundCue>,
}

impl AudioManager {
    pub fn new(sink: Box<dyn AudioSink>, volume: f32) -> Self {
        Self {
            sink,
            volume: volume.clamp(0.0, 1.0),
            muted: false,
            current: None,
        }
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, vol: f32) {
        self.volume = vol.clamp(0.0, 1.0);
        let v = self.effective_volume();
        self.sink.set_volume(v);
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        let v = self.effective_volume();
        self.sink.set_volume(v);
    }

    fn effective_volume(&self) -> f32 {
        if self.muted { 0.0 } else { self.volume }
    }

    /// Start a cue. Silent volume skips the sink entirely.
    pub fn play(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.current = Some(cue);
        self.sink.play(cue, vol);
    }

    /// One-shot cue layered over the music; does not change `current`
    pub fn jingle(&mut self, cue: SoundCue) {
        let vol = self.effective_volume();
        if vol > 0.0 {
            self.sink.play(cue, vol);
        }
    }

    /// Stop the music; a jingle in flight is left to finish
    pub fn stop(&mut self) {
        if self.current.take().is_some() {
            self.sink.stop_music();
        }
    }

    pub fn current(&self) -> Option<SoundCue> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Default)]
    struct Recorder {
        events: Rc<RefCell<Vec<String>>>,
    }

    impl AudioSink for Recorder {
        fn play(&mut self, cue: SoundCue, volume: f32) {
            self.events
                .borrow_mut()
                .push(format!("play {} {:.1}", cue.as_str(), volume));
        }
        fn stop_music(&mut self) {
            self.events.borrow_mut().push("stop".into());
        }
        fn set_volume(&mut self, volume: f32) {
            self.events.borrow_mut().push(format!("vol {:.1}", volume));
        }
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut audio = AudioManager::new(Box::new(NullAudio), 3.0);
        assert_eq!(audio.volume(), 1.0);
        audio.set_volume(-1.0);
        assert_eq!(audio.volume(), 0.0);
    }

    #[test]
    fn test_muted_skips_playback() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut audio = AudioManager::new(
            Box::new(Recorder {
                events: events.clone(),
            }),
            0.5,
        );
        audio.set_muted(true);
        audio.play(SoundCue::Menu);
        assert_eq!(audio.current(), None);
        audio.set_muted(false);
        audio.play(SoundCue::Menu);
        audio.stop();
        audio.stop();
        assert_eq!(
            *events.borrow(),
            vec!["vol 0.0", "vol 0.5", "play menu 0.5", "stop"]
        );
    }

    #[test]
    fn test_jingle_then_music_change() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut audio = AudioManager::new(
            Box::new(Recorder {
                events: events.clone(),
            }),
            1.0,
        );
        audio.play(SoundCue::Bonus);
        audio.jingle(SoundCue::Win);
        audio.stop();
        audio.play(SoundCue::Menu);
        assert_eq!(
            *events.borrow(),
            vec!["play bonus 1.0", "play win 1.0", "stop", "play menu 1.0"]
        );
    }

    #[test]
    fn test_jingle_keeps_music_cue() {
        let mut audio = AudioManager::new(Box::new(NullAudio), 0.5);
        audio.play(SoundCue::Bonus);
        audio.jingle(SoundCue::Win);
        assert_eq!(audio.current(), Some(SoundCue::Bonus));
    }
}
