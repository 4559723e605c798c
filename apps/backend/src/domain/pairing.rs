//! Round-numbering rule.
//!
//! A round consists of up to one guess from each player; the n-th round is
//! complete once both players have guessed in it. The ledger assigns
//! `floor(guesses_so_far / 2) + 1`, where the count is taken before the new
//! guess is inserted and is scoped to the current instance. A restart
//! starts a new instance, so numbering resets to 1.

/// Round number for the next guess, given how many guesses the current
/// instance already holds.
pub fn round_number_for(guesses_before: u64) -> i16 {
    (guesses_before / 2 + 1) as i16
}
