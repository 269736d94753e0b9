use tbst::{Order, Tree};

use std::collections::BTreeMap;

use crate::Op;

/// Applies a set of operations to a tree and to a map counting copies of each key.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same keys, with the same multiplicity, in both.
fn do_ops<K>(ops: &[Op<K>], bst: &mut Tree<K>, counts: &mut BTreeMap<K, usize>)
where
    K: Ord + Clone,
{
    for op in ops {
        match op {
            Op::Insert(k) => {
                bst.insert(k.clone());
                *counts.entry(k.clone()).or_default() += 1;
            }
            Op::Remove(k) => {
                let removed = bst.delete(k);
                match counts.get_mut(k) {
                    Some(count) => {
                        assert!(removed.as_ref() == Some(k));
                        *count -= 1;
                        if *count == 0 {
                            counts.remove(k);
                        }
                    }
                    None => assert!(removed.is_none()),
                }
            }
        }
    }
}

fn expand<K: Clone>(counts: &BTreeMap<K, usize>) -> Vec<K> {
    counts
        .iter()
        .flat_map(|(k, count)| std::iter::repeat(k.clone()).take(*count))
        .collect()
}

quickcheck::quickcheck! {
    fn fuzz_multiple_operations_i8(ops: Vec<Op<i8>>) -> bool {
        let mut tree = Tree::new();
        let mut counts = BTreeMap::new();

        do_ops(&ops, &mut tree, &mut counts);
        let expected = expand(&counts);

        tree.validate().is_ok()
            && tree.len() == expected.len()
            && tree.iter().eq(expected.iter())
            && counts.keys().all(|key| tree.search(key))
    }
}

quickcheck::quickcheck! {
    fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
        let tree: Tree<_> = xs.iter().copied().collect();

        nots.iter()
            .filter(|x| !xs.contains(x))
            .all(|x| !tree.search(x) && tree.get(x).is_none())
    }
}

quickcheck::quickcheck! {
    fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
        let mut tree: Tree<_> = xs.iter().copied().collect();
        for delete in &deletes {
            // We may have inserted the same value multiple times - delete each one.
            while tree.delete(delete).is_some() {}
        }

        let still_present: Vec<_> = xs.iter().filter(|x| !deletes.contains(x)).collect();

        deletes.iter().all(|x| !tree.search(x))
            && still_present.iter().all(|x| tree.search(x))
            && tree.validate().is_ok()
    }
}

quickcheck::quickcheck! {
    fn absent_delete_changes_nothing(xs: Vec<i8>, k: i8) -> bool {
        let mut tree: Tree<_> = xs.iter().copied().filter(|x| *x != k).collect();
        let before: Vec<_> = tree.iter().copied().collect();

        tree.delete(&k).is_none() && tree.iter().eq(before.iter())
    }
}

quickcheck::quickcheck! {
    fn neighbours_match_in_order(xs: Vec<i8>) -> bool {
        let tree: Tree<_> = xs.iter().copied().collect();
        let sorted: Vec<_> = tree.iter().copied().collect();

        // With duplicates the neighbours of the first copy are ambiguous, so only check keys
        // that occur once.
        sorted.iter().enumerate().all(|(at, key)| {
            if sorted.iter().filter(|x| *x == key).count() > 1 {
                return true;
            }
            let pred = at.checked_sub(1).map(|at| &sorted[at]);
            let succ = sorted.get(at + 1);
            tree.predecessor(key) == pred && tree.successor(key) == succ
        })
    }
}

quickcheck::quickcheck! {
    fn every_order_visits_every_key(xs: Vec<i8>) -> bool {
        let tree: Tree<_> = xs.iter().copied().collect();
        let mut sorted = xs;
        sorted.sort();

        [Order::PreOrder, Order::InOrder, Order::PostOrder]
            .into_iter()
            .all(|order| {
                let mut keys: Vec<_> = tree.traverse(order).copied().collect();
                keys.sort();
                keys == sorted
            })
    }
}

#[test]
fn driver_round_trip() {
    let mut tree = Tree::new();
    for key in [2, 4, 6, 8, 10] {
        tree.insert(key);
    }

    assert!(tree.traverse(Order::InOrder).eq(&[2, 4, 6, 8, 10]));
    assert!(tree.traverse(Order::PreOrder).eq(&[2, 4, 6, 8, 10]));
    assert!(tree.traverse(Order::PostOrder).eq(&[10, 8, 6, 4, 2]));

    assert!(!tree.search(&1));
    assert!(tree.search(&6));
    assert!(tree.search(&8));
}
