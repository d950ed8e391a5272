#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic deployment policy that feeds queued units onto the field.

use skirmish_core::{Command, DeckEntry, Side};

/// Pure system that deploys the lowest-index queued deck entry.
///
/// The policy does not track time; the scheduler decides when it runs.
#[derive(Clone, Copy, Debug)]
pub struct Deployment {
    max_units_on_field: usize,
}

impl Deployment {
    /// Creates a deployment policy bounded by the provided field capacity.
    #[must_use]
    pub const fn new(max_units_on_field: usize) -> Self {
        Self { max_units_on_field }
    }

    /// Emits at most one deployment command for `side`.
    ///
    /// The output buffer is cleared before populating it. Nothing is emitted when `roster_len` already reaches the capacity or
    /// when every deck entry has been deployed.
    pub fn handle(&self, side: Side, roster_len: usize, deck: &[DeckEntry], out: &mut Vec<Command>) {
        out.clear();
        if roster_len >= self.max_units_on_field {
            tracing::trace!(?side, roster_len, "field at capacity; deployment skipped");
            return;
        }

        let Some(deck_index) = deck.iter().position(|entry| !entry.is_deployed()) else {
            return;
        };

        tracing::debug!(
            ?side,
            deck_index,
            name = %deck[deck_index].definition().name,
            "deploying next deck entry"
        );
        out.push(Command::DeployUnit { side, deck_index });
    }
}
