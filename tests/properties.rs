//! Ropes checked against a plain `Vec<u8>` model.

use byte_rope::Rope;
use proptest::prelude::*;

fn pieces() -> impl Strategy<Value = Vec<Vec<u8>>> {
    prop::collection::vec(prop::collection::vec(any::<u8>(), 0..8), 0..8)
}

fn build(pieces: &[Vec<u8>]) -> Rope {
    pieces
        .iter()
        .fold(Rope::new(), |acc, piece| acc + Rope::from(piece.clone()))
}

#[derive(Clone, Debug)]
enum EditOp {
    Insert { pos: usize, data: Vec<u8> },
    Delete { from: usize, len: usize },
    Split { at: usize },
}

fn arbitrary_edit_op() -> impl Strategy<Value = EditOp> {
    prop_oneof![
        (any::<usize>(), prop::collection::vec(any::<u8>(), 1..6))
            .prop_map(|(pos, data)| EditOp::Insert { pos, data }),
        (any::<usize>(), any::<usize>()).prop_map(|(from, len)| EditOp::Delete { from, len }),
        any::<usize>().prop_map(|at| EditOp::Split { at }),
    ]
}

fn apply_edit(rope: &mut Rope, model: &mut Vec<u8>, op: &EditOp) {
    let len = model.len();
    match op {
        EditOp::Insert { pos, data } => {
            let pos = pos % (len + 1);
            rope.insert(pos, data).unwrap();
            model.splice(pos..pos, data.iter().copied());
        }
        EditOp::Delete { from, len: span } => {
            if len == 0 {
                return;
            }
            let from = from % len;
            let to = from + 1 + span % (len - from);
            rope.delete(from, to).unwrap();
            model.drain(from..to);
        }
        EditOp::Split { at } => {
            // Cut and immediately rejoin; the content must not change.
            let at = at % (len + 1);
            let tail = rope.split_off(at).unwrap();
            let head = std::mem::take(rope);
            *rope = head + tail;
        }
    }
}

proptest! {
    #[test]
    fn split_then_concat_is_lossless(pieces in pieces(), seed in any::<usize>()) {
        let rope = build(&pieces);
        let model = pieces.concat();
        let at = seed % (model.len() + 1);

        let (head, tail) = rope.clone().split(at).unwrap();
        prop_assert_eq!(head.flatten().unwrap(), &model[..at]);
        prop_assert_eq!(tail.flatten().unwrap(), &model[at..]);
        prop_assert_eq!(head.len() + tail.len(), model.len());
        prop_assert_eq!(head + tail, rope);
    }

    #[test]
    fn concat_adds_lengths(a in pieces(), b in pieces()) {
        let left = build(&a);
        let right = build(&b);
        let expected = left.len() + right.len();
        prop_assert_eq!(left.concat(right).len(), expected);
    }

    #[test]
    fn insert_places_data(pieces in pieces(), seed in any::<usize>(),
                          data in prop::collection::vec(any::<u8>(), 1..10)) {
        let mut rope = build(&pieces);
        let model = pieces.concat();
        let pos = seed % (model.len() + 1);

        rope.insert(pos, &data).unwrap();
        let expected = [&model[..pos], &data[..], &model[pos..]].concat();
        prop_assert_eq!(rope.flatten().unwrap(), expected);
    }

    #[test]
    fn delete_removes_range(pieces in pieces(), a in any::<usize>(), b in any::<usize>()) {
        let mut rope = build(&pieces);
        let model = pieces.concat();
        prop_assume!(!model.is_empty());
        let from = a % model.len();
        let to = from + 1 + b % (model.len() - from);

        rope.delete(from, to).unwrap();
        let expected = [&model[..from], &model[to..]].concat();
        prop_assert_eq!(rope.flatten().unwrap(), expected);
    }

    #[test]
    fn byte_at_matches_flatten(pieces in pieces()) {
        let rope = build(&pieces);
        let flat = rope.flatten().unwrap();
        for (i, b) in flat.iter().enumerate() {
            prop_assert_eq!(rope.byte_at(i).unwrap(), *b);
        }
        prop_assert!(rope.byte_at(flat.len()).is_err());
    }

    #[test]
    fn normalize_counts_from_end(pieces in pieces(), p in 0isize..64) {
        let rope = build(&pieces);
        let len = rope.len();
        prop_assert_eq!(rope.normalize(0).unwrap(), 0);
        prop_assert_eq!(rope.normalize(p).unwrap(), p as usize);
        prop_assert_eq!(rope.normalize(-1).unwrap(), len);
        if len > 0 {
            prop_assert_eq!(rope.normalize_index(-1).unwrap(), len - 1);
        }
        prop_assert!(rope.normalize(-(len as isize) - 2).is_err());
    }

    #[test]
    fn edit_sessions_match_model(pieces in pieces(),
                                 ops in prop::collection::vec(arbitrary_edit_op(), 0..40),
                                 a in any::<usize>(), b in any::<usize>()) {
        let mut rope = build(&pieces);
        let mut model = pieces.concat();
        for op in &ops {
            apply_edit(&mut rope, &mut model, op);
            prop_assert_eq!(rope.len(), model.len());
        }
        prop_assert_eq!(rope.flatten().unwrap(), model.clone());
        prop_assert_eq!(rope.bytes().collect::<Vec<_>>(), model.clone());
        prop_assert_eq!(rope.slice(0..model.len()).unwrap(), model.clone());
        let start = a % (model.len() + 1);
        let end = start + b % (model.len() - start + 1);
        prop_assert_eq!(rope.slice(start..end).unwrap(), &model[start..end]);

        rope.compact().unwrap();
        prop_assert_eq!(rope.depth(), 0);
        prop_assert_eq!(rope.flatten().unwrap(), model);
    }

    #[test]
    fn search_matches_model(pieces in pieces(), needle in any::<u8>()) {
        let rope = build(&pieces);
        let model = pieces.concat();
        let positions: Vec<usize> = model
            .iter()
            .enumerate()
            .filter(|(_, b)| **b == needle)
            .map(|(i, _)| i)
            .collect();
        prop_assert_eq!(rope.find_byte(needle), positions.first().copied());
        prop_assert_eq!(rope.count_byte(needle), positions.len());
        prop_assert_eq!(rope.positions_of(needle), positions);
    }
}
