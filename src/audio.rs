//! Audio bridge
//!
//! The simulation only emits [`Cue`]s. This module maps them to sound effects,
//! applies volume settings and hands them to whatever backend plays sounds.

use crate::Settings;
use crate::sim::Cue;

/// Looping background track, started when the game boots
pub const BACKGROUND_MUSIC: &str =
    "data/music/AdhesiveWombat-NightShade-NO-COPYRIGHT-8-bit-Music.mp3";

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Level cleared
    Win,
    /// Ball lost
    Lose,
    /// Powerup collected
    PickupCoin,
    /// Ball bounced off an unbreakable block
    BlockHit,
    /// Multi-hit block damaged
    HitHurt,
}

impl SoundEffect {
    /// Asset file played for this effect
    pub fn asset_path(self) -> &'static str {
        match self {
            SoundEffect::Win => "data/sounds/win.wav",
            SoundEffect::Lose => "data/sounds/lose.wav",
            SoundEffect::PickupCoin => "data/sounds/pickupCoin.wav",
            SoundEffect::BlockHit => "data/sounds/blockhit.wav",
            SoundEffect::HitHurt => "data/sounds/hitHurt.wav",
        }
    }
}

impl From<Cue> for SoundEffect {
    fn from(cue: Cue) -> Self {
        match cue {
            Cue::Win => SoundEffect::Win,
            Cue::Lose => SoundEffect::Lose,
            Cue::Pickup => SoundEffect::PickupCoin,
            Cue::UnbreakableHit => SoundEffect::BlockHit,
            Cue::DamageHit => SoundEffect::HitHurt,
        }
    }
}

/// Something that can actually make noise
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect, volume: f32);
    /// Start `asset` looping until the sink is dropped
    fn play_music(&mut self, asset: &'static str, volume: f32);
}

/// Sink that only logs, for headless runs
#[derive(Debug, Default)]
pub struct LogSink {
    pub played: Vec<SoundEffect>,
    pub music: Option<(&'static str, f32)>,
}

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::info!("♪ {} (volume {:.2})", effect.asset_path(), volume);
        self.played.push(effect);
    }

    fn play_music(&mut self, asset: &'static str, volume: f32) {
        log::info!("Music {asset} (volume {volume:.2}, looping)");
        self.music = Some((asset, volume));
    }
}

/// Audio manager for the game
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.5,
            muted: false,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let mut audio = Self::new();
        audio.set_master_volume(settings.master_volume);
        audio.set_sfx_volume(settings.sfx_volume);
        audio.set_music_volume(settings.music_volume);
        audio.set_muted(settings.muted);
        audio
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Set music volume (0.0 - 1.0)
    pub fn set_music_volume(&mut self, vol: f32) {
        self.music_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    fn effective_music_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    /// Start the background track; no-op when silent
    pub fn start_music<S: AudioSink>(&self, sink: &mut S) {
        let vol = self.effective_music_volume();
        if vol > 0.0 {
            sink.play_music(BACKGROUND_MUSIC, vol);
        }
    }

    /// Play every cue of a frame, in emission order
    pub fn play_cues<S: AudioSink>(&self, cues: &[Cue], sink: &mut S) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        for &cue in cues {
            sink.play(cue.into(), vol);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cues_map_to_effects_in_order() {
        let audio = AudioManager::new();
        let mut sink = LogSink::default();
        audio.play_cues(&[Cue::DamageHit, Cue::Win], &mut sink);
        assert_eq!(sink.played, vec![SoundEffect::HitHurt, SoundEffect::Win]);
    }

    #[test]
    fn test_muted_plays_nothing() {
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let audio = AudioManager::from_settings(&settings);
        let mut sink = LogSink::default();
        audio.play_cues(&[Cue::Lose], &mut sink);
        assert!(sink.played.is_empty());
    }

    #[test]
    fn test_music_uses_music_volume() {
        let settings = Settings {
            master_volume: 0.5,
            music_volume: 0.4,
            ..Default::default()
        };
        let mut sink = LogSink::default();
        AudioManager::from_settings(&settings).start_music(&mut sink);
        let (asset, volume) = sink.music.unwrap();
        assert_eq!(asset, BACKGROUND_MUSIC);
        assert!((volume - 0.2).abs() < 1e-6);

        let mut sink = LogSink::default();
        let silent = Settings {
            music_volume: 0.0,
            ..Default::default()
        };
        AudioManager::from_settings(&silent).start_music(&mut sink);
        assert!(sink.music.is_none());
    }

    #[test]
    fn test_asset_paths() {
        assert_eq!(
            SoundEffect::from(Cue::Pickup).asset_path(),
            "data/sounds/pickupCoin.wav"
        );
        assert_eq!(
            SoundEffect::from(Cue::UnbreakableHit).asset_path(),
            "data/sounds/blockhit.wav"
        );
    }
}
