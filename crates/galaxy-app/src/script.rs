//! Scripted input source for the headless client.
//!
//! A script is a comma-separated list of steps:
//!
//! | step | effect |
//! |---|---|
//! | `right:30`, `up+left:12` | hold the keys for that many frames |
//! | `wait:10` | idle |
//! | `typing:20` | focus the chat prompt; movement keys are ignored |
//! | `say:hello there` | send a chat message |
//! | `place:desk@120/340` | place an object |
//! | `objects` | ask the relay for the room's objects |
//! | `mute` | toggle the microphone |

use std::collections::VecDeque;

use galaxy_common::ObjectKind;
use galaxy_world::{InputState, Key};

#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Hold { keys: Vec<Key>, frames: u32 },
    Wait(u32),
    Typing(u32),
    Say(String),
    Place { kind: ObjectKind, x: f64, y: f64 },
    Objects,
    Mute,
}

/// One-shot actions the session performs on behalf of the script.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Say(String),
    Place { kind: ObjectKind, x: f64, y: f64 },
    Objects,
    Mute,
}

pub fn parse_script(src: &str) -> Result<Vec<Step>, String> {
    src.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_step)
        .collect()
}

fn parse_step(step: &str) -> Result<Step, String> {
    let (head, arg) = match step.split_once(':') {
        Some((h, a)) => (h.trim(), Some(a)),
        None => (step, None),
    };
    match (head, arg) {
        ("objects", None) => Ok(Step::Objects),
        ("mute", None) => Ok(Step::Mute),
        ("wait", Some(n)) => Ok(Step::Wait(parse_frames(n)?)),
        ("typing", Some(n)) => Ok(Step::Typing(parse_frames(n)?)),
        ("say", Some(text)) => Ok(Step::Say(text.to_string())),
        ("place", Some(arg)) => parse_place(arg),
        (keys, Some(n)) => Ok(Step::Hold {
            keys: keys.split('+').map(parse_key).collect::<Result<_, _>>()?,
            frames: parse_frames(n)?,
        }),
        (other, None) => Err(format!("step '{other}' needs an argument")),
    }
}

fn parse_frames(s: &str) -> Result<u32, String> {
    s.trim()
        .parse()
        .map_err(|_| format!("'{s}' is not a frame count"))
}

fn parse_key(s: &str) -> Result<Key, String> {
    match s.trim() {
        "up" => Ok(Key::Up),
        "down" => Ok(Key::Down),
        "left" => Ok(Key::Left),
        "right" => Ok(Key::Right),
        other => Err(format!("unknown key '{other}'")),
    }
}

fn parse_place(arg: &str) -> Result<Step, String> {
    let (kind, pos) = arg
        .split_once('@')
        .ok_or_else(|| format!("place '{arg}' must look like kind@x/y"))?;
    let (x, y) = pos
        .split_once('/')
        .ok_or_else(|| format!("place position '{pos}' must look like x/y"))?;
    let coord = |v: &str| {
        v.trim()
            .parse::<f64>()
            .map_err(|_| format!("'{v}' is not a coordinate"))
    };
    Ok(Step::Place {
        kind: kind.parse()?,
        x: coord(x)?,
        y: coord(y)?,
    })
}

enum Active {
    Hold { keys: Vec<Key>, remaining: u32 },
    Wait { remaining: u32 },
    Typing { remaining: u32 },
}

impl Active {
    fn remaining(&mut self) -> &mut u32 {
        match self {
            Active::Hold { remaining, .. }
            | Active::Wait { remaining }
            | Active::Typing { remaining } => remaining,
        }
    }
}

pub struct ScriptRunner {
    steps: VecDeque<Step>,
    active: Option<Active>,
}

impl ScriptRunner {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            active: None,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty() && self.active.is_none()
    }

    /// Advance one frame, updating held keys. Returns the one-shot actions
    /// that became due.
    pub fn advance(&mut self, input: &mut InputState) -> Vec<Action> {
        let mut actions = Vec::new();
        loop {
            if let Some(active) = self.active.as_mut() {
                let remaining = active.remaining();
                if *remaining > 0 {
                    *remaining -= 1;
                    return actions;
                }
                match active {
                    Active::Hold { keys, .. } => {
                        for key in keys.iter() {
                            input.release(*key);
                        }
                    }
                    Active::Typing { .. } => input.set_suspended(false),
                    Active::Wait { .. } => {}
                }
                self.active = None;
            }

            let Some(step) = self.steps.pop_front() else {
                return actions;
            };
            match step {
                Step::Hold { keys, frames } => {
                    for key in &keys {
                        input.press(*key);
                    }
                    self.active = Some(Active::Hold {
                        keys,
                        remaining: frames,
                    });
                }
                Step::Wait(frames) => self.active = Some(Active::Wait { remaining: frames }),
                Step::Typing(frames) => {
                    input.set_suspended(true);
                    self.active = Some(Active::Typing { remaining: frames });
                }
                Step::Say(text) => actions.push(Action::Say(text)),
                Step::Place { kind, x, y } => actions.push(Action::Place { kind, x, y }),
                Step::Objects => actions.push(Action::Objects),
                Step::Mute => actions.push(Action::Mute),
            }
        }
    }
}
