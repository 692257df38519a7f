//! Held-key state for the local avatar.

use galaxy_common::{Direction, Vec2};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
}

impl Key {
    pub fn direction(self) -> Direction {
        match self {
            Key::Up => Direction::Up,
            Key::Down => Direction::Down,
            Key::Left => Direction::Left,
            Key::Right => Direction::Right,
        }
    }

    fn is_horizontal(self) -> bool {
        matches!(self, Key::Left | Key::Right)
    }
}

/// Keys currently held, in the order they were pressed.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: Vec<Key>,
    suspended: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: Key) {
        self.held.retain(|k| *k != key);
        self.held.push(key);
    }

    pub fn release(&mut self, key: Key) {
        self.held.retain(|k| *k != key);
    }

    pub fn release_all(&mut self) {
        self.held.clear();
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// While suspended (text entry has focus) no displacement is produced.
    /// Held keys are kept so movement resumes once focus returns.
    pub fn set_suspended(&mut self, suspended: bool) {
        self.suspended = suspended;
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Per-frame displacement. Each held direction contributes `speed`
    /// along its axis; diagonals are not normalised.
    pub fn displacement(&self, speed: f64) -> Vec2 {
        if self.suspended {
            return Vec2::default();
        }
        let mut d = Vec2::default();
        for key in &self.held {
            match key {
                Key::Up => d.y -= speed,
                Key::Down => d.y += speed,
                Key::Left => d.x -= speed,
                Key::Right => d.x += speed,
            }
        }
        d
    }

    /// Facing for this frame: the most recently pressed held key whose
    /// axis still has net displacement, else `previous`.
    pub fn facing(&self, previous: Direction) -> Direction {
        let d = self.displacement(1.0);
        self.held
            .iter()
            .rev()
            .find(|key| {
                if key.is_horizontal() {
                    d.x != 0.0
                } else {
                    d.y != 0.0
                }
            })
            .map(|key| key.direction())
            .unwrap_or(previous)
    }
}
