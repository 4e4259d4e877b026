//! Simulation events.
//!
//! The driver emits `SimStart` once, then `PreCycle`, `Cycle`, `PostCycle`
//! and `Render` once per cycle in that order, then `SimEnd` once.

/// An event emitted by the simulation driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Event {
    /// Emitted once, before the first cycle.
    SimStart,
    /// Emitted at the start of every cycle.
    PreCycle,
    /// The main per-cycle event.
    Cycle,
    /// Emitted after `Cycle`.
    PostCycle,
    /// Emitted last in every cycle; rendering is advised here.
    Render,
    /// Emitted once, after the last cycle.
    SimEnd,
}

impl Event {
    /// Number of distinct events.
    pub const COUNT: usize = 6;

    /// Every event, in emission order of one full run.
    pub const ALL: [Event; Self::COUNT] = [
        Event::SimStart,
        Event::PreCycle,
        Event::Cycle,
        Event::PostCycle,
        Event::Render,
        Event::SimEnd,
    ];

    /// The events emitted within one cycle, in order.
    pub const CYCLE_PHASES: [Event; 4] = [
        Event::PreCycle,
        Event::Cycle,
        Event::PostCycle,
        Event::Render,
    ];

    /// Dense index of this event, `0..Event::COUNT`.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Event::SimStart => 0,
            Event::PreCycle => 1,
            Event::Cycle => 2,
            Event::PostCycle => 3,
            Event::Render => 4,
            Event::SimEnd => 5,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Event::SimStart => "sim_start",
            Event::PreCycle => "pre_cycle",
            Event::Cycle => "cycle",
            Event::PostCycle => "post_cycle",
            Event::Render => "render",
            Event::SimEnd => "sim_end",
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_all_order() {
        for (i, event) in Event::ALL.iter().enumerate() {
            assert_eq!(event.index(), i);
        }
    }

    #[test]
    fn test_cycle_phases_order() {
        assert_eq!(
            Event::CYCLE_PHASES,
            [
                Event::PreCycle,
                Event::Cycle,
                Event::PostCycle,
                Event::Render
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Event::PostCycle.to_string(), "post_cycle");
    }
}
