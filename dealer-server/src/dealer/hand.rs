//! Hand Partitioner
//!
//! Deals paginated hands out of an ordered card sequence. Dealing is a pure
//! view over the deck: nothing is removed, and the same request always
//! returns the same hands.
//!
//! ```text
//! cards:   | h0 | h1 | h2 | h3 | h4 | ...
//!                 ^skip=1  ^top=2
//! result:  [ {hand: 0, cards: h1}, {hand: 1, cards: h2} ]
//! ```

use serde::Serialize;

use crate::core::card::Card;

/// Cards per hand when the caller does not say.
pub const DEFAULT_HAND_SIZE: i64 = 13;

/// Hands per page when the caller does not say.
pub const DEFAULT_PAGE_COUNT: i64 = 1;

/// Hands skipped when the caller does not say.
pub const DEFAULT_PAGE_OFFSET: i64 = 0;

/// One dealt hand. `hand` is the position within the requested page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Hand {
    /// Index within the page, starting at 0.
    pub hand: usize,
    /// Cards in deal order.
    pub cards: Vec<Card>,
}

/// Hand window validation errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DealError {
    /// Hand size was zero or negative.
    #[error("cards must be positive, got {0}")]
    InvalidHandSize(i64),

    /// Page count was zero or negative.
    #[error("$top must be positive, got {0}")]
    InvalidPageCount(i64),

    /// Page offset was negative.
    #[error("$skip must not be negative, got {0}")]
    InvalidPageOffset(i64),

    /// The window runs past the end of the deck.
    #[error("$skip, $top, and cards larger than the deck: need {requested} cards, deck has {available}")]
    Overflow {
        /// Last card index (exclusive) the window would need, saturated on overflow.
        requested: u64,
        /// Cards in the deck.
        available: usize,
    },
}

/// A validated hand window: `page_count` hands of `hand_size` cards,
/// starting after `page_offset` hands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HandWindow {
    /// Cards per hand.
    pub hand_size: i64,
    /// Number of hands to deal.
    pub page_count: i64,
    /// Number of hands to skip.
    pub page_offset: i64,
}

impl Default for HandWindow {
    fn default() -> Self {
        Self {
            hand_size: DEFAULT_HAND_SIZE,
            page_count: DEFAULT_PAGE_COUNT,
            page_offset: DEFAULT_PAGE_OFFSET,
        }
    }
}

impl HandWindow {
    /// Resolve the window to a `start..end` card range inside a deck of
    /// `available` cards.
    pub fn bounds(&self, available: usize) -> Result<(usize, usize), DealError> {
        if self.hand_size <= 0 {
            return Err(DealError::InvalidHandSize(self.hand_size));
        }
        if self.page_count <= 0 {
            return Err(DealError::InvalidPageCount(self.page_count));
        }
        if self.page_offset < 0 {
            return Err(DealError::InvalidPageOffset(self.page_offset));
        }

        // All three are non-negative here, so u64 math is exact until it overflows.
        let size = self.hand_size as u64;
        let end = (self.page_offset as u64)
            .checked_add(self.page_count as u64)
            .and_then(|hands| hands.checked_mul(size));

        match end {
            Some(end) if end <= available as u64 => {
                let start = self.page_offset as u64 * size;
                Ok((start as usize, end as usize))
            }
            _ => Err(DealError::Overflow {
                requested: end.unwrap_or(u64::MAX),
                available,
            }),
        }
    }
}

/// Deal `page_count` hands of `hand_size` cards, skipping the first
/// `page_offset` hands.
pub fn deal(
    cards: &[Card],
    hand_size: i64,
    page_count: i64,
    page_offset: i64,
) -> Result<Vec<Hand>, DealError> {
    deal_window(cards, &HandWindow { hand_size, page_count, page_offset })
}

/// Deal the hands described by `window`.
pub fn deal_window(cards: &[Card], window: &HandWindow) -> Result<Vec<Hand>, DealError> {
    let (start, end) = window.bounds(cards.len())?;

    Ok(cards[start..end]
        .chunks_exact(window.hand_size as usize)
        .enumerate()
        .map(|(hand, chunk)| Hand { hand, cards: chunk.to_vec() })
        .collect())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::rng::DeterministicRng;
    use proptest::prelude::*;

    fn shuffled(copies: usize, seed: u64) -> Vec<Card> {
        let mut cards: Vec<Card> = (0..copies).flat_map(|_| Card::full_set()).collect();
        DeterministicRng::new(seed).shuffle(&mut cards);
        cards
    }

    #[test]
    fn test_four_hands_cover_deck() {
        let cards = shuffled(1, 1);
        let hands = deal(&cards, 13, 4, 0).unwrap();

        assert_eq!(hands.len(), 4);
        for (i, hand) in hands.iter().enumerate() {
            assert_eq!(hand.hand, i);
            assert_eq!(hand.cards.len(), 13);
        }

        let flattened: Vec<Card> = hands.into_iter().flat_map(|h| h.cards).collect();
        assert_eq!(flattened, cards);
    }

    #[test]
    fn test_skip_past_end_overflows() {
        let cards = shuffled(1, 1);
        let result = deal(&cards, 13, 4, 1);
        assert_eq!(result, Err(DealError::Overflow { requested: 65, available: 52 }));
    }

    #[test]
    fn test_offset_labels_restart_at_zero() {
        let cards = shuffled(1, 2);
        let hands = deal(&cards, 5, 2, 3).unwrap();

        assert_eq!(hands[0].hand, 0);
        assert_eq!(hands[1].hand, 1);
        assert_eq!(hands[0].cards.as_slice(), &cards[15..20]);
        assert_eq!(hands[1].cards.as_slice(), &cards[20..25]);
    }

    #[test]
    fn test_defaults_deal_one_hand_of_thirteen() {
        let cards = shuffled(1, 3);
        let hands = deal_window(&cards, &HandWindow::default()).unwrap();
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].cards.as_slice(), &cards[..13]);
    }

    #[test]
    fn test_exact_fit_is_allowed() {
        let cards = shuffled(1, 4);
        assert!(deal(&cards, 26, 1, 1).is_ok());
        assert!(deal(&cards, 52, 1, 0).is_ok());
        assert!(deal(&cards, 53, 1, 0).is_err());
    }

    #[test]
    fn test_non_positive_parameters_rejected() {
        let cards = shuffled(1, 5);
        assert_eq!(deal(&cards, 0, 1, 0), Err(DealError::InvalidHandSize(0)));
        assert_eq!(deal(&cards, -3, 1, 0), Err(DealError::InvalidHandSize(-3)));
        assert_eq!(deal(&cards, 13, 0, 0), Err(DealError::InvalidPageCount(0)));
        assert_eq!(deal(&cards, 13, 1, -1), Err(DealError::InvalidPageOffset(-1)));
    }

    #[test]
    fn test_arithmetic_overflow_is_range_error() {
        let cards = shuffled(1, 6);
        let result = deal(&cards, i64::MAX, i64::MAX, i64::MAX);
        assert!(matches!(result, Err(DealError::Overflow { requested: u64::MAX, .. })));
    }

    #[test]
    fn test_empty_deck() {
        let result = deal(&[], 1, 1, 0);
        assert_eq!(result, Err(DealError::Overflow { requested: 1, available: 0 }));
    }

    #[test]
    fn test_hand_json_shape() {
        let cards = shuffled(1, 8);
        let hands = deal(&cards, 2, 1, 0).unwrap();
        let json = serde_json::to_value(&hands).unwrap();
        assert_eq!(json[0]["hand"], 0);
        assert_eq!(json[0]["cards"].as_array().unwrap().len(), 2);
        assert!(json[0]["cards"][0]["rank"].is_string());
    }

    proptest! {
        #[test]
        fn prop_deal_is_contiguous_window(
            copies in 1usize..4,
            seed in any::<u64>(),
            size in 1i64..30,
            top in 1i64..10,
            skip in 0i64..10,
        ) {
            let cards = shuffled(copies, seed);
            let fits = ((skip + top) * size) as usize <= cards.len();

            match deal(&cards, size, top, skip) {
                Ok(hands) => {
                    prop_assert!(fits);
                    prop_assert_eq!(hands.len(), top as usize);
                    let start = (skip * size) as usize;
                    let flat: Vec<Card> = hands.iter().flat_map(|h| h.cards.clone()).collect();
                    prop_assert_eq!(flat.len(), (size * top) as usize);
                    prop_assert_eq!(flat.as_slice(), &cards[start..start + flat.len()]);
                }
                Err(err) => {
                    prop_assert!(!fits);
                    let is_overflow = matches!(err, DealError::Overflow { .. });
                    prop_assert!(is_overflow);
                }
            }
        }

        #[test]
        fn prop_deal_is_repeatable(
            seed in any::<u64>(),
            size in 1i64..14,
            top in 1i64..5,
        ) {
            let cards = shuffled(1, seed);
            let first = deal(&cards, size, top, 0);
            let second = deal(&cards, size, top, 0);
            prop_assert_eq!(first, second);
            prop_assert_eq!(cards, shuffled(1, seed));
        }
    }
}
