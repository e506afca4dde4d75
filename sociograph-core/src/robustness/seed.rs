//! Per-trial seed derivation.
//!
//! Each Monte Carlo trial seeds its own generator from the base seed and the
//! trial index, so results are identical whichever worker runs the trial.

/// SplitMix64 increment (the 64-bit golden ratio).
const TRIAL_SEED_SPACING: u64 = 0x9E37_79B9_7F4A_7C15;
const SPLITMIX_MULT_A: u64 = 0xBF58_476D_1CE4_E5B9;
const SPLITMIX_MULT_B: u64 = 0x94D0_49BB_1331_11EB;

#[inline]
pub(super) fn mix_trial_seed(base_seed: u64, trial: usize) -> u64 {
    splitmix64(base_seed ^ ((trial as u64).wrapping_add(1).wrapping_mul(TRIAL_SEED_SPACING)))
}

#[inline]
fn splitmix64(mut state: u64) -> u64 {
    state = state.wrapping_add(TRIAL_SEED_SPACING);
    state = (state ^ (state >> 30)).wrapping_mul(SPLITMIX_MULT_A);
    state = (state ^ (state >> 27)).wrapping_mul(SPLITMIX_MULT_B);
    state ^ (state >> 31)
}
