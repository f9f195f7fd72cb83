use std::str::FromStr;
use thiserror::Error;

use crate::intent::{Intent, IntentSet};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScriptError {
    #[error("step {step}: unknown intent {name:?}")]
    UnknownIntent { step: usize, name: String },
    #[error("step {step}: invalid repeat count {count:?}")]
    BadCount { step: usize, count: String },
    #[error("step {step} is empty")]
    EmptyStep { step: usize },
}

/// A run-length encoded timeline of intent sets, e.g.
/// `"right*30, up+right*5, none*10"`.
///
/// Each comma-separated step is a `+`-joined list of intents (or `none`)
/// held for `*N` frames, one frame when the count is omitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IntentScript {
    steps: Vec<(IntentSet, u32)>,
}

impl IntentScript {
    pub fn parse(text: &str) -> Result<Self, ScriptError> {
        let mut steps = Vec::new();
        let text = text.trim();
        if text.is_empty() {
            return Ok(Self { steps });
        }
        for (step, raw) in text.split(',').enumerate() {
            let raw = raw.trim();
            let (names, count) = match raw.split_once('*') {
                Some((names, count)) => {
                    let count = count.trim();
                    let n = count.parse::<u32>().map_err(|_| ScriptError::BadCount {
                        step,
                        count: count.to_string(),
                    })?;
                    (names.trim(), n)
                }
                None => (raw, 1),
            };
            if names.is_empty() {
                return Err(ScriptError::EmptyStep { step });
            }
            let mut set = IntentSet::new();
            for name in names.split('+').map(str::trim) {
                if name == "none" {
                    continue;
                }
                let intent = Intent::from_name(name).ok_or_else(|| ScriptError::UnknownIntent {
                    step,
                    name: name.to_string(),
                })?;
                set.insert(intent);
            }
            steps.push((set, count));
        }
        tracing::debug!(steps = steps.len(), "parsed intent script");
        Ok(Self { steps })
    }

    /// Total number of frames the script covers.
    pub fn frame_count(&self) -> u64 {
        self.steps.iter().map(|(_, n)| u64::from(*n)).sum()
    }

    pub fn steps(&self) -> &[(IntentSet, u32)] {
        &self.steps
    }

    pub fn player(&self) -> ScriptPlayer<'_> {
        ScriptPlayer {
            steps: &self.steps,
            step: 0,
            used: 0,
        }
    }
}

impl FromStr for IntentScript {
    type Err = ScriptError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Yields one [`IntentSet`] per frame from an [`IntentScript`].
#[derive(Debug, Clone)]
pub struct ScriptPlayer<'a> {
    steps: &'a [(IntentSet, u32)],
    step: usize,
    used: u32,
}

impl Iterator for ScriptPlayer<'_> {
    type Item = IntentSet;

    fn next(&mut self) -> Option<IntentSet> {
        loop {
            let (set, count) = *self.steps.get(self.step)?;
            if self.used < count {
                self.used += 1;
                return Some(set);
            }
            self.step += 1;
            self.used = 0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_run_length_steps() {
        let script = IntentScript::parse("right*30, up+right*5, none*10").unwrap();
        assert_eq!(script.steps().len(), 3);
        assert_eq!(script.frame_count(), 45);

        let frames: Vec<IntentSet> = script.player().collect();
        assert_eq!(frames.len(), 45);
        assert!(frames[0].contains(Intent::Right));
        assert!(!frames[0].contains(Intent::Up));
        assert!(frames[30].contains(Intent::Up) && frames[30].contains(Intent::Right));
        assert!(frames[44].is_empty());
    }

    #[test]
    fn count_defaults_to_one() {
        let script: IntentScript = "space, left".parse().unwrap();
        let frames: Vec<_> = script.player().collect();
        assert_eq!(
            frames,
            vec![
                IntentSet::new().with(Intent::Interact),
                IntentSet::new().with(Intent::Left)
            ]
        );
    }

    #[test]
    fn zero_count_steps_are_skipped() {
        let script = IntentScript::parse("left*0, down*2").unwrap();
        let frames: Vec<_> = script.player().collect();
        assert_eq!(frames.len(), 2);
        assert!(frames.iter().all(|f| f.contains(Intent::Down)));
    }

    #[test]
    fn empty_script_yields_nothing() {
        assert_eq!(IntentScript::parse("  ").unwrap().player().count(), 0);
    }

    #[test]
    fn errors_name_the_step() {
        assert_eq!(
            IntentScript::parse("left, jump*2").unwrap_err(),
            ScriptError::UnknownIntent {
                step: 1,
                name: "jump".into()
            }
        );
        assert_eq!(
            IntentScript::parse("left*x").unwrap_err(),
            ScriptError::BadCount {
                step: 0,
                count: "x".into()
            }
        );
        assert_eq!(
            IntentScript::parse("left,,right").unwrap_err(),
            ScriptError::EmptyStep { step: 1 }
        );
    }
}
