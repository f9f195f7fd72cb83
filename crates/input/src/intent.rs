use serde::{Deserialize, Serialize};

/// One discrete intent a player can hold during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    Left,
    Right,
    Up,
    Down,
    /// Open doors while playing; confirm on message screens.
    Interact,
    Quit,
}

impl Intent {
    pub const ALL: [Intent; 6] = [
        Intent::Left,
        Intent::Right,
        Intent::Up,
        Intent::Down,
        Intent::Interact,
        Intent::Quit,
    ];

    const fn bit(self) -> u8 {
        1 << self as u8
    }

    /// Parse a script token. `space` and `action` are accepted for
    /// `interact`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "left" => Some(Intent::Left),
            "right" => Some(Intent::Right),
            "up" => Some(Intent::Up),
            "down" => Some(Intent::Down),
            "interact" | "space" | "action" => Some(Intent::Interact),
            "quit" => Some(Intent::Quit),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Intent::Left => "left",
            Intent::Right => "right",
            Intent::Up => "up",
            Intent::Down => "down",
            Intent::Interact => "interact",
            Intent::Quit => "quit",
        }
    }
}

/// The intents held during one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct IntentSet(u8);

impl IntentSet {
    pub const EMPTY: Self = Self(0);

    pub fn new() -> Self {
        Self::EMPTY
    }

    pub fn with(mut self, intent: Intent) -> Self {
        self.insert(intent);
        self
    }

    pub fn insert(&mut self, intent: Intent) {
        self.0 |= intent.bit();
    }

    pub fn remove(&mut self, intent: Intent) {
        self.0 &= !intent.bit();
    }

    pub fn contains(&self, intent: Intent) -> bool {
        self.0 & intent.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Intent> + '_ {
        Intent::ALL.into_iter().filter(|i| self.contains(*i))
    }
}

impl FromIterator<Intent> for IntentSet {
    fn from_iter<T: IntoIterator<Item = Intent>>(iter: T) -> Self {
        iter.into_iter().fold(Self::EMPTY, Self::with)
    }
}

impl std::fmt::Display for IntentSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("none");
        }
        for (i, intent) in self.iter().enumerate() {
            if i > 0 {
                f.write_str("+")?;
            }
            f.write_str(intent.name())?;
        }
        Ok(())
    }
}

/// Anything that can feed the frame loop one intent set per frame.
pub trait IntentSource {
    /// Intents for the next frame, or `None` once the source is exhausted.
    fn next_intents(&mut self) -> Option<IntentSet>;
}

impl<I: Iterator<Item = IntentSet>> IntentSource for I {
    fn next_intents(&mut self) -> Option<IntentSet> {
        self.next()
    }
}
