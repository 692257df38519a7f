//! Walk-cycle phase shared by every avatar on screen.

#[derive(Debug, Clone)]
pub struct Animator {
    frames: u32,
    speed: u32,
    counter: u32,
    column: u32,
}

impl Animator {
    /// `frames` columns in the sheet, advancing every `speed` ticks.
    pub fn new(frames: u32, speed: u32) -> Self {
        Self {
            frames: frames.max(1),
            speed: speed.max(1),
            counter: 0,
            column: 0,
        }
    }

    pub fn tick(&mut self) {
        self.counter += 1;
        if self.counter >= self.speed {
            self.counter = 0;
            self.column = (self.column + 1) % self.frames;
        }
    }

    /// Sheet column for an avatar. Idle avatars always stand in column 0.
    pub fn column(&self, is_moving: bool) -> u32 {
        if is_moving {
            self.column
        } else {
            0
        }
    }
}

impl Default for Animator {
    fn default() -> Self {
        Self::new(4, 10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advances_every_speed_ticks_and_wraps() {
        let mut a = Animator::new(4, 10);
        let mut seen = Vec::new();
        for _ in 0..50 {
            a.tick();
            seen.push(a.column(true));
        }
        assert_eq!(seen[8], 0);
        assert_eq!(seen[9], 1);
        assert_eq!(seen[19], 2);
        assert_eq!(seen[29], 3);
        assert_eq!(seen[39], 0);
    }

    #[test]
    fn idle_is_column_zero() {
        let mut a = Animator::new(4, 1);
        a.tick();
        assert_eq!(a.column(true), 1);
        assert_eq!(a.column(false), 0);
    }

    #[test]
    fn zero_settings_are_clamped() {
        let mut a = Animator::new(0, 0);
        a.tick();
        assert_eq!(a.column(true), 0);
    }
}
