// SPDX-FileCopyrightText: 2026 TopV1 Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Pure turn policy: when to pitch, which fallback to use.

/// Exchanges after which every reply carries the call-to-action.
pub const CTA_THRESHOLD: u32 = 3;

/// What a conversational turn sends back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The generated text on its own.
    PlainReply,
    /// The generated text plus the community pitch and its two buttons.
    CallToAction,
}

/// Decides the outcome from the exchange count read at the start of the turn.
pub fn turn_outcome(exchange_count: u32) -> TurnOutcome {
    if exchange_count >= CTA_THRESHOLD {
        TurnOutcome::CallToAction
    } else {
        TurnOutcome::PlainReply
    }
}

/// Index into the fallback replies for a given exchange count.
pub fn fallback_index(exchange_count: u32, fallback_count: usize) -> usize {
    let last = fallback_count.saturating_sub(1);
    usize::try_from(exchange_count).map_or(last, |n| n.min(last))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn threshold_boundary() {
        assert_eq!(turn_outcome(0), TurnOutcome::PlainReply);
        assert_eq!(turn_outcome(2), TurnOutcome::PlainReply);
        assert_eq!(turn_outcome(3), TurnOutcome::CallToAction);
        assert_eq!(turn_outcome(4), TurnOutcome::CallToAction);
    }

    #[test]
    fn fallback_indices_for_known_counts() {
        let picked: Vec<usize> = [0, 1, 2, 5, 100]
            .into_iter()
            .map(|n| fallback_index(n, 3))
            .collect();
        assert_eq!(picked, vec![0, 1, 2, 2, 2]);
    }

    proptest! {
        #[test]
        fn below_threshold_is_plain(count in 0u32..CTA_THRESHOLD) {
            prop_assert_eq!(turn_outcome(count), TurnOutcome::PlainReply);
        }

        #[test]
        fn at_or_above_threshold_pitches(count in CTA_THRESHOLD..=u32::MAX) {
            prop_assert_eq!(turn_outcome(count), TurnOutcome::CallToAction);
        }

        #[test]
        fn fallback_index_is_always_in_range(count in any::<u32>(), len in 1usize..10) {
            let idx = fallback_index(count, len);
            prop_assert!(idx < len);
            prop_assert_eq!(idx, (count as usize).min(len - 1));
        }
    }
}
