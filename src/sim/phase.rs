//! Show phases: idle, text formation, then ambient fireworks forever

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Current phase of the show
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Dark sky before the first launch
    #[default]
    Idle,
    /// Text rocket is up and the greeting is assembling
    TextFormation,
    /// Random launches and blessings (terminal)
    Ambient,
}

/// Something the scheduler wants to happen this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// White rocket from the bottom centre, followed by the greeting glyphs
    TextRocket,
    /// Random rocket somewhere along the bottom edge
    AmbientRocket,
    /// Float one blessing phrase
    Blessing,
}

/// Tick-driven phase state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhaseScheduler {
    phase: Phase,
    /// Ticks spent in the current phase; reset on every transition
    timer: u32,
}

impl Default for PhaseScheduler {
    fn default() -> Self {
        Self {
            phase: Phase::Idle,
            timer: 0,
        }
    }
}

impl PhaseScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    /// Count one tick, apply any transition and report the cues for this tick
    pub fn advance<R: Rng>(&mut self, rng: &mut R) -> Vec<Cue> {
        let mut cues = Vec::new();
        self.timer = self.timer.saturating_add(1);

        if self.phase == Phase::Idle && self.timer > IDLE_TICKS {
            cues.push(Cue::TextRocket);
            self.enter(Phase::TextFormation);
        }

        if self.phase == Phase::TextFormation && self.timer > TEXT_FORMATION_TICKS {
            self.enter(Phase::Ambient);
        }

        if self.phase == Phase::Ambient {
            if rng.random_bool(AMBIENT_LAUNCH_CHANCE) {
                cues.push(Cue::AmbientRocket);
            }
            if rng.random_bool(BLESSING_CHANCE) {
                cues.push(Cue::Blessing);
            }
        }

        cues
    }

    fn enter(&mut self, phase: Phase) {
        log::info!("Phase {:?} -> {:?} after {} ticks", self.phase, phase, self.timer);
        self.phase = phase;
        self.timer = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_idle_to_text_on_tick_61() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut scheduler = PhaseScheduler::new();
        for _ in 0..60 {
            assert!(scheduler.advance(&mut rng).is_empty());
            assert_eq!(scheduler.phase(), Phase::Idle);
        }
        assert_eq!(scheduler.timer(), 60);

        assert_eq!(scheduler.advance(&mut rng), vec![Cue::TextRocket]);
        assert_eq!(scheduler.phase(), Phase::TextFormation);
        assert_eq!(scheduler.timer(), 0);
    }

    #[test]
    fn test_text_to_ambient_on_tick_401() {
        let mut rng = Pcg32::seed_from_u64(2);
        let mut scheduler = PhaseScheduler::new();
        for _ in 0..61 {
            scheduler.advance(&mut rng);
        }
        for _ in 0..400 {
            assert!(scheduler.advance(&mut rng).is_empty());
            assert_eq!(scheduler.phase(), Phase::TextFormation);
        }
        scheduler.advance(&mut rng);
        assert_eq!(scheduler.phase(), Phase::Ambient);
        assert_eq!(scheduler.timer(), 0);
    }

    #[test]
    fn test_ambient_is_terminal_and_busy() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut scheduler = PhaseScheduler {
            phase: Phase::Ambient,
            timer: 0,
        };
        let mut rockets = 0;
        let mut blessings = 0;
        for _ in 0..20_000 {
            for cue in scheduler.advance(&mut rng) {
                match cue {
                    Cue::AmbientRocket => rockets += 1,
                    Cue::Blessing => blessings += 1,
                    Cue::TextRocket => panic!("text rocket in ambient phase"),
                }
            }
            assert_eq!(scheduler.phase(), Phase::Ambient);
        }
        // Expected 1000 and 300
        assert!((800..1200).contains(&rockets), "rockets {}", rockets);
        assert!((200..400).contains(&blessings), "blessings {}", blessings);
    }

    #[test]
    fn test_ambient_timer_saturates() {
        let mut rng = Pcg32::seed_from_u64(4);
        let mut scheduler = PhaseScheduler {
            phase: Phase::Ambient,
            timer: u32::MAX - 1,
        };
        scheduler.advance(&mut rng);
        scheduler.advance(&mut rng);
        assert_eq!(scheduler.timer(), u32::MAX);
        assert_eq!(scheduler.phase(), Phase::Ambient);
    }
}
