//! Frame-rate independent progress through a plan animation.

use std::time::Duration;

/// Default number of flood cells revealed per second.
pub const DEFAULT_FLOOD_RATE: f32 = 600.0;

/// Default number of trajectory steps revealed per second.
pub const DEFAULT_PATH_RATE: f32 = 20.0;

/// Stage of an interactive planning session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlaybackPhase {
    /// Waiting for the user to pick a start cell.
    SelectStart,
    /// Revealing wave labels in expansion order.
    Flood,
    /// Revealing the trajectory one step at a time.
    Path,
    /// Everything is shown.
    Done,
}

/// Tracks how much of the flood and the trajectory should be visible.
///
/// Rates that are not positive and finite reveal their stage instantly.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playback {
    phase: PlaybackPhase,
    flood_rate: f32,
    path_rate: f32,
    flood_total: usize,
    path_total: usize,
    flood_progress: f32,
    path_progress: f32,
}

impl Default for Playback {
    fn default() -> Self {
        Self::new(DEFAULT_FLOOD_RATE, DEFAULT_PATH_RATE)
    }
}

impl Playback {
    /// Creates a playback waiting for a start selection.
    #[must_use]
    pub const fn new(flood_rate: f32, path_rate: f32) -> Self {
        Self {
            phase: PlaybackPhase::SelectStart,
            flood_rate,
            path_rate,
            flood_total: 0,
            path_total: 0,
            flood_progress: 0.0,
            path_progress: 0.0,
        }
    }

    /// Starts animating a plan with the provided flood and trajectory sizes.
    pub fn begin(&mut self, flood_total: usize, path_total: usize) {
        self.flood_total = flood_total;
        self.path_total = path_total;
        self.flood_progress = 0.0;
        self.path_progress = 0.0;
        self.phase = PlaybackPhase::Flood;
        self.settle();
    }

    /// Advances the animation by `elapsed` and returns the resulting phase.
    ///
    /// Time left over after one stage completes carries into the next.
    pub fn advance(&mut self, elapsed: Duration) -> PlaybackPhase {
        let mut budget = elapsed.as_secs_f32();

        while budget > 0.0 {
            match self.phase {
                PlaybackPhase::Flood => {
                    budget = spend(
                        &mut self.flood_progress,
                        self.flood_total,
                        self.flood_rate,
                        budget,
                    );
                }
                PlaybackPhase::Path => {
                    budget = spend(
                        &mut self.path_progress,
                        self.path_total,
                        self.path_rate,
                        budget,
                    );
                }
                PlaybackPhase::SelectStart | PlaybackPhase::Done => break,
            }
            self.settle();
        }

        self.phase
    }

    /// Reveals everything immediately.
    pub fn finish(&mut self) {
        if self.phase == PlaybackPhase::SelectStart {
            return;
        }
        self.flood_progress = self.flood_total as f32;
        self.path_progress = self.path_total as f32;
        self.phase = PlaybackPhase::Done;
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Number of expansion-order cells that should be drawn.
    #[must_use]
    pub fn flood_revealed(&self) -> usize {
        revealed(self.flood_progress, self.flood_total)
    }

    /// Number of trajectory steps that should be drawn.
    #[must_use]
    pub fn path_revealed(&self) -> usize {
        match self.phase {
            PlaybackPhase::SelectStart | PlaybackPhase::Flood => 0,
            PlaybackPhase::Path | PlaybackPhase::Done => revealed(self.path_progress, self.path_total),
        }
    }

    fn settle(&mut self) {
        if self.phase == PlaybackPhase::Flood && self.flood_revealed() >= self.flood_total {
            self.phase = PlaybackPhase::Path;
            // The start cell is visible as soon as the path stage begins.
            self.path_progress = self.path_progress.max(1.0_f32.min(self.path_total as f32));
        }
        if self.phase == PlaybackPhase::Path && self.path_revealed() >= self.path_total {
            self.phase = PlaybackPhase::Done;
        }
    }
}

/// Moves `progress` towards `total` and returns unused seconds.
fn spend(progress: &mut f32, total: usize, rate: f32, budget: f32) -> f32 {
    let total = total as f32;
    if !rate.is_finite() || rate <= 0.0 {
        *progress = total;
        return budget;
    }

    let remaining = (total - *progress).max(0.0);
    let needed = remaining / rate;
    if needed <= budget {
        *progress = total;
        budget - needed
    } else {
        *progress += budget * rate;
        0.0
    }
}

fn revealed(progress: f32, total: usize) -> usize {
    (progress.max(0.0).floor() as usize).min(total)
}
