//! Frame-paced sprite animation

/// Cycles through `frame_count` frames, holding each for
/// `frames_to_skip + 1` game frames.
#[derive(Debug, Clone)]
pub struct SpriteAnimation {
    frame_count: usize,
    frames_to_skip: u32,
    looping: bool,
    frame_index: usize,
    frames_skipped: u32,
    last_game_frame: Option<u64>,
}

impl SpriteAnimation {
    pub fn new(frame_count: usize, frames_to_skip: u32, looping: bool) -> Self {
        Self {
            frame_count: frame_count.max(1),
            frames_to_skip,
            looping,
            frame_index: 0,
            frames_skipped: 0,
            last_game_frame: None,
        }
    }

    /// Frame to draw now
    pub fn current(&self) -> usize {
        self.frame_index
    }

    /// Step once per distinct game frame; repeated calls within the same
    /// frame (e.g. several draws) do not speed the animation up.
    pub fn advance(&mut self, game_frame: u64) -> usize {
        if self.last_game_frame == Some(game_frame) {
            return self.frame_index;
        }
        self.last_game_frame = Some(game_frame);

        if self.frames_skipped < self.frames_to_skip {
            self.frames_skipped += 1;
        } else {
            self.frames_skipped = 0;
            self.frame_index += 1;
            if self.frame_index >= self.frame_count {
                self.frame_index = if self.looping { 0 } else { self.frame_count - 1 };
            }
        }
        self.frame_index
    }
}
