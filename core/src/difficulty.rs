//! Fixed-interval difficulty retargeting, bounded to ±1 step (spec §4.8).

use crate::block::Block;
use crate::chain::BlockIndex;
use crate::config::Config;

/// Computes the difficulty a candidate block at `candidate_index` (extending
/// `parent`) is expected to declare.
#[must_use]
pub fn expected_difficulty(candidate_index: u64, parent: &Block, index: &BlockIndex, config: &Config) -> u8 {
    let interval = config.adjustment_interval;

    if candidate_index <= interval {
        return config.default_difficulty;
    }
    if candidate_index % interval != 0 {
        return parent.difficulty;
    }

    let Some(ancestor) = index.get_ancestor(parent, candidate_index - interval) else {
        return parent.difficulty;
    };

    let elapsed = parent.timestamp - ancestor.timestamp;
    let ideal = config.target_block_time * interval as i64;

    // Compare against the true half (`elapsed < ideal / 2`) without the
    // rounding loss of integer division — matters once `ideal` is odd
    // under a non-default `target_block_time`.
    if elapsed * 2 < ideal {
        parent.difficulty.saturating_add(config.max_step)
    } else if elapsed > ideal * 2 {
        parent.difficulty.saturating_sub(config.max_step).max(1)
    } else {
        parent.difficulty
    }
}
