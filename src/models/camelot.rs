use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Number of positions on the Camelot wheel
const WHEEL_SIZE: i64 = 12;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidTagError {
    #[error("Invalid camelot format: {0:?}")]
    MissingLetter(String),

    #[error("Invalid camelot number: {0:?}")]
    InvalidNumber(String),

    #[error("Camelot number must be between 1 and 12: {0}")]
    NumberOutOfRange(i64),

    #[error("Camelot letter must be A or B: {0}")]
    InvalidLetter(char),
}

/// Position on the Camelot wheel, e.g. `8A` or `11B`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CamelotKey {
    number: u8,
    letter: char,
}

/// How two compatible keys relate on the wheel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Relation {
    Same,
    RelativeSwitch,
    StepUp,
    StepDown,
}

impl Relation {
    pub fn label(self) -> &'static str {
        match self {
            Relation::Same => "Perfect",
            Relation::RelativeSwitch => "Mood shift (A\u{2194}B)",
            Relation::StepUp => "Energy boost (+1)",
            Relation::StepDown => "Energy drop (-1)",
        }
    }
}

impl CamelotKey {
    /// Classify the move from `self` to `to`; `None` means the keys clash.
    pub fn relation(&self, to: &CamelotKey) -> Option<Relation> {
        if self.number == to.number {
            return Some(if self.letter == to.letter {
                Relation::Same
            } else {
                Relation::RelativeSwitch
            });
        }
        if self.letter != to.letter {
            return None;
        }

        let clockwise = (to.number as i64 - self.number as i64).rem_euclid(WHEEL_SIZE);
        match clockwise {
            1 => Some(Relation::StepUp),
            11 => Some(Relation::StepDown),
            _ => None,
        }
    }

    pub fn mixes_with(&self, other: &CamelotKey) -> bool {
        self.relation(other).is_some()
    }
}

impl FromStr for CamelotKey {
    type Err = InvalidTagError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mut chars = raw.chars();
        let last = chars
            .next_back()
            .ok_or_else(|| InvalidTagError::MissingLetter(raw.to_string()))?;
        let number_part = chars.as_str();
        if number_part.is_empty() {
            return Err(InvalidTagError::MissingLetter(raw.to_string()));
        }

        let number: i64 = number_part
            .parse()
            .map_err(|_| InvalidTagError::InvalidNumber(number_part.to_string()))?;
        if !(1..=WHEEL_SIZE).contains(&number) {
            return Err(InvalidTagError::NumberOutOfRange(number));
        }

        let letter = last.to_ascii_uppercase();
        if letter != 'A' && letter != 'B' {
            return Err(InvalidTagError::InvalidLetter(last));
        }

        Ok(Self {
            number: number as u8,
            letter,
        })
    }
}

impl fmt::Display for CamelotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.letter)
    }
}

/// Whether two raw harmonic tags may sit next to each other in a mix.
///
/// Malformed tags never raise: either side failing to parse reports the pair
/// as not compatible.
pub fn is_compatible(a: &str, b: &str) -> bool {
    match (a.parse::<CamelotKey>(), b.parse::<CamelotKey>()) {
        (Ok(a), Ok(b)) => a.mixes_with(&b),
        _ => false,
    }
}

/// Relation between two raw tags, if both parse and they are compatible.
pub fn relation(a: &str, b: &str) -> Option<Relation> {
    let a = a.parse::<CamelotKey>().ok()?;
    let b = b.parse::<CamelotKey>().ok()?;
    a.relation(&b)
}
