/*
Step Patterns
=============

A pattern is one loop of equally spaced steps (sixteenth notes by default)
and a set of lanes. Every lane has one on/off cell per step and says what to
do when a cell is on:

  Drum { preset, velocity_scale }   trigger a drum hit at
                                    sequencer volume * velocity_scale
  Note { channel, note }            start a note, released on the next step

Lanes can be written as text grids, one character per step:

    kick   x...x...x...x...
    snare  ..x...x...x...x.
    hihat  xxxxxxxxxxxxxxxx

`x` / `X` is a hit; `.`, `-` and `_` are rests; whitespace is ignored.
*/

use crate::drums::DrumPreset;

pub const DEFAULT_STEPS: usize = 16;

/// What a lane does on a hit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LaneKind {
    Drum { preset: DrumPreset, velocity_scale: f32 },
    Note { channel: u8, note: u8 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    pub name: String,
    pub kind: LaneKind,
    hits: Vec<bool>,
}

impl Lane {
    pub fn new(name: impl Into<String>, kind: LaneKind, steps: usize) -> Self {
        Self {
            name: name.into(),
            kind,
            hits: vec![false; steps],
        }
    }

    pub fn drum(name: impl Into<String>, preset: DrumPreset, velocity_scale: f32, steps: usize) -> Self {
        Self::new(
            name,
            LaneKind::Drum {
                preset,
                velocity_scale: crate::clamp_unit(velocity_scale),
            },
            steps,
        )
    }

    pub fn note(name: impl Into<String>, channel: u8, note: u8, steps: usize) -> Self {
        Self::new(name, LaneKind::Note { channel, note }, steps)
    }

    /// Fill cells from a text grid. Missing trailing steps are rests,
    /// extra characters are ignored.
    pub fn with_grid(mut self, grid: &str) -> Self {
        let cells = parse_grid(grid);
        for (slot, hit) in self.hits.iter_mut().zip(cells.into_iter().chain(std::iter::repeat(false))) {
            *slot = hit;
        }
        self
    }

    pub fn hit(&self, step: usize) -> bool {
        self.hits.get(step).copied().unwrap_or(false)
    }

    /// Out-of-range steps are ignored.
    pub fn set(&mut self, step: usize, on: bool) {
        if let Some(cell) = self.hits.get_mut(step) {
            *cell = on;
        }
    }

    pub fn toggle(&mut self, step: usize) {
        if let Some(cell) = self.hits.get_mut(step) {
            *cell = !*cell;
        }
    }

    pub fn hits(&self) -> &[bool] {
        &self.hits
    }
}

/// Text grid to cells. Unknown characters count as rests.
pub fn parse_grid(grid: &str) -> Vec<bool> {
    grid.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| matches!(c, 'x' | 'X'))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    steps: usize,
    lanes: Vec<Lane>,
}

impl Pattern {
    /// An empty pattern. Zero steps is bumped to one.
    pub fn new(steps: usize) -> Self {
        Self {
            steps: steps.max(1),
            lanes: Vec::new(),
        }
    }

    /// Four-on-the-floor kick, backbeat snare, straight sixteenth hats.
    pub fn default_beat() -> Self {
        let steps = DEFAULT_STEPS;
        Self::new(steps)
            .with_lane(Lane::drum("kick", DrumPreset::Kick, 1.0, steps).with_grid("x...x...x...x..."))
            .with_lane(Lane::drum("snare", DrumPreset::Snare, 0.8, steps).with_grid("..x...x...x...x."))
            .with_lane(Lane::drum("hihat", DrumPreset::HiHat, 0.6, steps).with_grid("xxxxxxxxxxxxxxxx"))
    }

    /// Add a lane, resized to the pattern length.
    pub fn with_lane(mut self, lane: Lane) -> Self {
        self.add_lane(lane);
        self
    }

    pub fn add_lane(&mut self, mut lane: Lane) {
        lane.hits.resize(self.steps, false);
        self.lanes.push(lane);
    }

    pub fn remove_lane(&mut self, name: &str) -> Option<Lane> {
        let idx = self.lanes.iter().position(|l| l.name == name)?;
        Some(self.lanes.remove(idx))
    }

    pub fn lane(&self, name: &str) -> Option<&Lane> {
        self.lanes.iter().find(|l| l.name == name)
    }

    pub fn lane_mut(&mut self, name: &str) -> Option<&mut Lane> {
        self.lanes.iter_mut().find(|l| l.name == name)
    }

    pub fn lanes(&self) -> &[Lane] {
        &self.lanes
    }

    pub fn steps(&self) -> usize {
        self.steps
    }
}

impl Default for Pattern {
    fn default() -> Self {
        Self::default_beat()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on_steps(lane: &Lane) -> Vec<usize> {
        (0..lane.hits().len()).filter(|s| lane.hit(*s)).collect()
    }

    #[test]
    fn default_beat_layout() {
        let beat = Pattern::default_beat();
        assert_eq!(beat.steps(), 16);
        assert_eq!(on_steps(beat.lane("kick").unwrap()), [0, 4, 8, 12]);
        assert_eq!(on_steps(beat.lane("snare").unwrap()), [2, 6, 10, 14]);
        assert_eq!(on_steps(beat.lane("hihat").unwrap()).len(), 16);
        assert_eq!(
            beat.lane("snare").unwrap().kind,
            LaneKind::Drum {
                preset: DrumPreset::Snare,
                velocity_scale: 0.8
            }
        );
    }

    #[test]
    fn grid_parsing() {
        assert_eq!(parse_grid("x.X- _x"), [true, false, true, false, false, true]);
        let lane = Lane::note("bass", 0, 36, 4).with_grid("x.");
        assert_eq!(lane.hits(), [true, false, false, false]);
        let lane = Lane::note("bass", 0, 36, 2).with_grid("xxxx");
        assert_eq!(lane.hits(), [true, true]);
    }

    #[test]
    fn lanes_are_resized_to_pattern() {
        let pattern = Pattern::new(8).with_lane(Lane::note("lead", 1, 72, 3));
        assert_eq!(pattern.lane("lead").unwrap().hits().len(), 8);
    }

    #[test]
    fn editing_cells() {
        let mut pattern = Pattern::default_beat();
        let kick = pattern.lane_mut("kick").unwrap();
        kick.toggle(1);
        kick.set(0, false);
        kick.set(99, true);
        assert_eq!(on_steps(kick), [1, 4, 8, 12]);

        assert!(pattern.remove_lane("hihat").is_some());
        assert!(pattern.lane("hihat").is_none());
    }
}
