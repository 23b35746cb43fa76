//! Fixed bijection between classifier labels and lotto numbers.
//!
//! Labels are two-letter codes: a leading symbol from `A..=I` followed by a
//! trailing symbol from `A..=E`. In lexicographic order that is
//! `AA, AB, .., AE, BA, .., IE`, and a label's number is its rank plus one.

use thiserror::Error;

pub const LEADING_SYMBOLS: [char; 9] = ['A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'I'];
pub const TRAILING_SYMBOLS: [char; 5] = ['A', 'B', 'C', 'D', 'E'];
pub const LABEL_COUNT: usize = LEADING_SYMBOLS.len() * TRAILING_SYMBOLS.len();

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LabelError {
    #[error("unrecognized label: {0:?}")]
    UnrecognizedLabel(String),
    #[error("number {0} has no label (expected 1..=45)")]
    NumberOutOfRange(u8),
}

/// All labels in rank order.
pub fn labels() -> Vec<String> {
    LEADING_SYMBOLS
        .iter()
        .flat_map(|first| {
            TRAILING_SYMBOLS
                .iter()
                .map(move |second| format!("{}{}", first, second))
        })
        .collect()
}

pub fn label_to_number(label: &str) -> Result<u8, LabelError> {
    let unrecognized = || LabelError::UnrecognizedLabel(label.to_string());

    let mut chars = label.chars();
    let (first, second) = match (chars.next(), chars.next(), chars.next()) {
        (Some(first), Some(second), None) => (first, second),
        _ => return Err(unrecognized()),
    };

    let first_index = LEADING_SYMBOLS
        .iter()
        .position(|c| *c == first)
        .ok_or_else(unrecognized)?;
    let second_index = TRAILING_SYMBOLS
        .iter()
        .position(|c| *c == second)
        .ok_or_else(unrecognized)?;

    Ok((first_index * TRAILING_SYMBOLS.len() + second_index + 1) as u8)
}

pub fn number_to_label(number: u8) -> Result<String, LabelError> {
    if number == 0 || number as usize > LABEL_COUNT {
        return Err(LabelError::NumberOutOfRange(number));
    }

    let rank = number as usize - 1;
    let first = LEADING_SYMBOLS[rank / TRAILING_SYMBOLS.len()];
    let second = TRAILING_SYMBOLS[rank % TRAILING_SYMBOLS.len()];

    Ok(format!("{}{}", first, second))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_labels_are_45_distinct_in_lexicographic_order() {
        let all = labels();

        assert_eq!(all.len(), 45);
        assert_eq!(all.iter().collect::<HashSet<_>>().len(), 45);

        let mut sorted = all.clone();
        sorted.sort();
        assert_eq!(all, sorted);

        assert_eq!(all[0], "AA");
        assert_eq!(all[4], "AE");
        assert_eq!(all[5], "BA");
        assert_eq!(all[44], "IE");
    }

    #[test]
    fn test_rank_plus_one() {
        for (rank, label) in labels().iter().enumerate() {
            assert_eq!(label_to_number(label), Ok(rank as u8 + 1));
        }
    }

    #[test]
    fn test_first_six_labels_map_to_one_through_six() {
        let numbers: Vec<u8> = ["AA", "AB", "AC", "AD", "AE", "BA"]
            .iter()
            .map(|l| label_to_number(l).unwrap())
            .collect();

        assert_eq!(numbers, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_inverse_over_whole_domain() {
        for label in labels() {
            let number = label_to_number(&label).unwrap();
            assert_eq!(number_to_label(number).unwrap(), label);
        }
        for number in 1..=45u8 {
            let label = number_to_label(number).unwrap();
            assert_eq!(label_to_number(&label).unwrap(), number);
        }
    }

    #[test]
    fn test_unrecognized_labels() {
        for bad in ["", "A", "AF", "JA", "ZZ", "aa", "AAA", "가나"] {
            assert_eq!(
                label_to_number(bad),
                Err(LabelError::UnrecognizedLabel(bad.to_string())),
                "{:?} should be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_number_out_of_range() {
        assert_eq!(number_to_label(0), Err(LabelError::NumberOutOfRange(0)));
        assert_eq!(number_to_label(46), Err(LabelError::NumberOutOfRange(46)));
    }
}
