use crate::lotto::label::label_to_number;
use crate::lotto::number_set::{is_valid_number, LottoNumberSet, MAX_NUMBER, MIN_NUMBER, NUMBER_COUNT};
use crate::scorer::interface::ClassifiedScore;
use rand::Rng;
use std::collections::BTreeSet;

/// Upper bound on random draws during backfill. Hitting it falls back to the
/// smallest unused numbers.
pub const MAX_BACKFILL_ATTEMPTS: usize = 10_000;

/// Turns a ranked classifier output into six numbers.
///
/// Labels are taken in the given order, mapped through the label bijection
/// and deduplicated. Unrecognized labels are skipped. When the ranking runs
/// out before six distinct numbers are found, the rest is drawn uniformly
/// from `1..=45` with `rng`. Never fails.
pub fn select_numbers<R: Rng + ?Sized>(scores: &[ClassifiedScore], rng: &mut R) -> LottoNumberSet {
    let mut selected = BTreeSet::new();

    for score in scores {
        if selected.len() >= NUMBER_COUNT {
            break;
        }

        if let Ok(number) = label_to_number(&score.label) {
            if is_valid_number(number) {
                selected.insert(number);
            }
        }
    }

    backfill(&mut selected, rng);

    LottoNumberSet::from_selection(&selected)
}

/// Six numbers with no classifier input at all.
pub fn random_numbers<R: Rng + ?Sized>(rng: &mut R) -> LottoNumberSet {
    select_numbers(&[], rng)
}

fn backfill<R: Rng + ?Sized>(selected: &mut BTreeSet<u8>, rng: &mut R) {
    let mut attempts = 0;
    while selected.len() < NUMBER_COUNT && attempts < MAX_BACKFILL_ATTEMPTS {
        selected.insert(rng.random_range(MIN_NUMBER..=MAX_NUMBER));
        attempts += 1;
    }

    for number in MIN_NUMBER..=MAX_NUMBER {
        if selected.len() >= NUMBER_COUNT {
            break;
        }
        selected.insert(number);
    }
}
