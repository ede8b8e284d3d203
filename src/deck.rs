//! Deck construction, shuffling, and dealing (C2).

use rand::seq::SliceRandom;
use rand::RngCore;

use crate::domain::{Card, Creature};

pub const DECK_SIZE: usize = 24;
pub const CARDS_PER_CREATURE: usize = 6;
pub const DEFAULT_HAND_SIZE: usize = 9;
pub const RESERVE_SIZE: usize = DECK_SIZE - 2 * DEFAULT_HAND_SIZE;

pub type Hand = Vec<Card>;
pub type Reserve = Vec<Card>;

/// Enumerates four creatures times six indices. Ids are `{creature}_{index}`.
pub fn build_deck() -> Vec<Card> {
    let mut deck = Vec::with_capacity(DECK_SIZE);
    for creature in Creature::ALL {
        for index in 0..CARDS_PER_CREATURE {
            deck.push(Card {
                creature,
                id: format!("{}_{}", creature.as_str(), index),
            });
        }
    }
    deck
}

/// Fisher-Yates shuffle in place with a cryptographically seeded RNG.
pub fn shuffle(deck: &mut [Card], rng: &mut impl RngCore) {
    deck.shuffle(rng);
}

/// Partitions a shuffled 24-card deck into two hands of `hand_size` and a
/// reserve of whatever remains. Order within hands is irrelevant to play.
pub fn deal(deck: Vec<Card>, hand_size: usize) -> (Hand, Hand, Reserve) {
    assert_eq!(deck.len(), DECK_SIZE, "deck must contain exactly 24 cards");
    assert!(
        hand_size * 2 <= DECK_SIZE,
        "two hands of {hand_size} cannot fit in a {DECK_SIZE}-card deck"
    );

    let mut cards = deck.into_iter();
    let hand_a: Hand = (&mut cards).take(hand_size).collect();
    let hand_b: Hand = (&mut cards).take(hand_size).collect();
    let reserve: Reserve = cards.collect();
    (hand_a, hand_b, reserve)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::BTreeMap;

    #[test]
    fn build_deck_has_24_cards_six_per_creature() {
        let deck = build_deck();
        assert_eq!(deck.len(), DECK_SIZE);

        let mut counts: BTreeMap<Creature, usize> = BTreeMap::new();
        for card in &deck {
            *counts.entry(card.creature).or_default() += 1;
        }
        for creature in Creature::ALL {
            assert_eq!(counts[&creature], CARDS_PER_CREATURE);
        }
    }

    #[test]
    fn shuffle_preserves_creature_counts() {
        let mut deck = build_deck();
        let mut rng = StdRng::seed_from_u64(42);
        shuffle(&mut deck, &mut rng);

        let mut counts: BTreeMap<Creature, usize> = BTreeMap::new();
        for card in &deck {
            *counts.entry(card.creature).or_default() += 1;
        }
        for creature in Creature::ALL {
            assert_eq!(counts[&creature], CARDS_PER_CREATURE);
        }
    }

    #[test]
    fn shuffle_is_a_permutation_not_a_regeneration() {
        let original = build_deck();
        let mut deck = original.clone();
        let mut rng = StdRng::seed_from_u64(7);
        shuffle(&mut deck, &mut rng);

        let mut sorted_original = original.clone();
        let mut sorted_shuffled = deck.clone();
        sorted_original.sort_by(|a, b| a.id.cmp(&b.id));
        sorted_shuffled.sort_by(|a, b| a.id.cmp(&b.id));
        assert_eq!(sorted_original, sorted_shuffled);
    }

    #[test]
    fn deal_partitions_into_two_hands_and_reserve() {
        let mut deck = build_deck();
        let mut rng = StdRng::seed_from_u64(1);
        shuffle(&mut deck, &mut rng);

        let (hand_a, hand_b, reserve) = deal(deck, DEFAULT_HAND_SIZE);
        assert_eq!(hand_a.len(), DEFAULT_HAND_SIZE);
        assert_eq!(hand_b.len(), DEFAULT_HAND_SIZE);
        assert_eq!(reserve.len(), RESERVE_SIZE);

        let mut all_ids: Vec<&str> = hand_a
            .iter()
            .chain(hand_b.iter())
            .chain(reserve.iter())
            .map(|c| c.id.as_str())
            .collect();
        all_ids.sort();
        all_ids.dedup();
        assert_eq!(all_ids.len(), DECK_SIZE);
    }
}
