#![forbid(unsafe_code)]

//! Drag-and-drop reorder engine.
//!
//! A drop is a single-element move, not a swap:
//!
//! ```text
//! move_block([A, B, C, D, E], source = B, target = D)
//!
//!   remove B        [A, C, D, E]
//!   insert at 3     [A, C, D, B, E]
//!   renumber        orders 1..=5
//! ```
//!
//! Elements between the source and target positions shift by one.

use crate::block::{Block, BlockId};

/// Reassign `order = position + 1` for every block.
pub fn renumber(blocks: &mut [Block]) {
    for (block, order) in blocks.iter_mut().zip(1u32..) {
        block.order = order;
    }
}

/// Move the block with id `source` to the position occupied by `target`.
///
/// Returns `None` (nothing to commit) when either id is absent or both ids
/// resolve to the same position. If an id occurs more than once, the first
/// match wins.
#[must_use]
pub fn move_block(blocks: &[Block], source: &BlockId, target: &BlockId) -> Option<Vec<Block>> {
    let from = blocks.iter().position(|b| &b.id == source)?;
    let to = blocks.iter().position(|b| &b.id == target)?;
    if from == to {
        return None;
    }

    let mut next = blocks.to_vec();
    let moved = next.remove(from);
    next.insert(to, moved);
    renumber(&mut next);
    tracing::trace!(%source, %target, from, to, "block moved");
    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::BlockKind;

    fn blocks(ids: &[&str]) -> Vec<Block> {
        ids.iter()
            .zip(1..)
            .map(|(id, order)| Block::new(*id, BlockKind::Notes, *id, order))
            .collect()
    }

    fn order_of(blocks: &[Block]) -> Vec<&str> {
        blocks.iter().map(|b| b.id.as_str()).collect()
    }

    #[test]
    fn forward_move_shifts_intermediate_blocks_up() {
        let input = blocks(&["a", "b", "c", "d", "e"]);
        let out = move_block(&input, &"b".into(), &"d".into()).unwrap();
        assert_eq!(order_of(&out), ["a", "c", "d", "b", "e"]);
        assert_eq!(
            out.iter().map(|b| b.order).collect::<Vec<_>>(),
            [1, 2, 3, 4, 5]
        );
    }

    #[test]
    fn backward_move_shifts_intermediate_blocks_down() {
        let input = blocks(&["a", "b", "c", "d", "e"]);
        let out = move_block(&input, &"e".into(), &"b".into()).unwrap();
        assert_eq!(order_of(&out), ["a", "e", "b", "c", "d"]);
    }

    #[test]
    fn adjacent_move_is_not_a_swap_of_others() {
        let input = blocks(&["a", "b", "c"]);
        let out = move_block(&input, &"a".into(), &"b".into()).unwrap();
        assert_eq!(order_of(&out), ["b", "a", "c"]);
    }

    #[test]
    fn dropping_on_itself_is_noop() {
        let input = blocks(&["a", "b"]);
        assert!(move_block(&input, &"a".into(), &"a".into()).is_none());
    }

    #[test]
    fn unknown_ids_are_noop() {
        let input = blocks(&["a", "b"]);
        assert!(move_block(&input, &"x".into(), &"a".into()).is_none());
        assert!(move_block(&input, &"a".into(), &"x".into()).is_none());
    }

    #[test]
    fn first_match_wins_on_duplicate_ids() {
        let mut input = blocks(&["a", "b", "c"]);
        input[2].id = "a".into();
        let out = move_block(&input, &"a".into(), &"b".into()).unwrap();
        assert_eq!(out[0].id.as_str(), "b");
        assert_eq!(out[1].label, "a");
        assert_eq!(out[2].label, "c");
    }

    #[test]
    fn move_is_invertible() {
        let input = blocks(&["a", "b", "c", "d"]);
        let out = move_block(&input, &"a".into(), &"c".into()).unwrap();
        // [b, c, a, d]: "b" now occupies a's old position.
        let back = move_block(&out, &"a".into(), &"b".into()).unwrap();
        assert_eq!(back, input);
    }

    #[test]
    fn renumber_repairs_gaps() {
        let mut input = blocks(&["a", "b", "c"]);
        input[0].order = 7;
        input[2].order = 7;
        renumber(&mut input);
        assert_eq!(
            input.iter().map(|b| b.order).collect::<Vec<_>>(),
            [1, 2, 3]
        );
    }
}
