use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

pub const NUMBER_COUNT: usize = 6;
pub const MIN_NUMBER: u8 = 1;
pub const MAX_NUMBER: u8 = 45;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NumberSetError {
    #[error("expected 6 numbers, got {0}")]
    WrongLength(usize),
    #[error("number {0} is outside 1..=45")]
    OutOfRange(u8),
    #[error("number {0} appears more than once")]
    Duplicate(u8),
}

/// Six distinct numbers in `1..=45`, ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct LottoNumberSet([u8; NUMBER_COUNT]);

impl LottoNumberSet {
    pub fn new(numbers: Vec<u8>) -> Result<Self, NumberSetError> {
        if numbers.len() != NUMBER_COUNT {
            return Err(NumberSetError::WrongLength(numbers.len()));
        }

        let mut seen = BTreeSet::new();
        for &number in &numbers {
            if !is_valid_number(number) {
                return Err(NumberSetError::OutOfRange(number));
            }
            if !seen.insert(number) {
                return Err(NumberSetError::Duplicate(number));
            }
        }

        Ok(Self::from_selection(&seen))
    }

    /// Caller guarantees the selection holds exactly six in-range numbers.
    pub(crate) fn from_selection(selection: &BTreeSet<u8>) -> Self {
        let mut numbers = [0u8; NUMBER_COUNT];
        for (slot, number) in numbers.iter_mut().zip(selection.iter()) {
            *slot = *number;
        }
        Self(numbers)
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    pub fn contains(&self, number: u8) -> bool {
        self.0.binary_search(&number).is_ok()
    }
}

impl TryFrom<Vec<u8>> for LottoNumberSet {
    type Error = NumberSetError;

    fn try_from(numbers: Vec<u8>) -> Result<Self, Self::Error> {
        Self::new(numbers)
    }
}

impl From<LottoNumberSet> for Vec<u8> {
    fn from(set: LottoNumberSet) -> Self {
        set.0.to_vec()
    }
}

impl fmt::Display for LottoNumberSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined = self
            .iter()
            .map(|n| n.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}", joined)
    }
}

pub fn is_valid_number(number: u8) -> bool {
    (MIN_NUMBER..=MAX_NUMBER).contains(&number)
}

/// Two-digit rendering used on the balls.
pub fn format_number(number: u8) -> String {
    format!("{:02}", number)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BallColor {
    Yellow,
    Blue,
    Red,
    Gray,
    Green,
}

impl BallColor {
    pub fn for_number(number: u8) -> Self {
        match number {
            0..=10 => BallColor::Yellow,
            11..=20 => BallColor::Blue,
            21..=30 => BallColor::Red,
            31..=40 => BallColor::Gray,
            _ => BallColor::Green,
        }
    }

    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            BallColor::Yellow => (250, 204, 21),
            BallColor::Blue => (96, 165, 250),
            BallColor::Red => (248, 113, 113),
            BallColor::Gray => (75, 85, 99),
            BallColor::Green => (74, 222, 128),
        }
    }
}
