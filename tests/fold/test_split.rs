use rowlink::fold::{combine_tree, partial, sequential, Fold};

use crate::graph::strategy::{arb_partitions, arb_rows, arb_split_rows};
use crate::model::foobar::{bar_ids, foo_of, Foo, FooBar, Row, Snapshot};

use proptest::{prop_assert, prop_assert_eq, proptest};
use std::sync::Arc;

// Every foo with the sorted ids of its bars, sorted by foo: what any partitioning preserves.
fn linked_sets(foos: &[Arc<Foo>]) -> Vec<(i64, Vec<i64>)> {
    let mut linked: Vec<(i64, Vec<i64>)> = foos
        .iter()
        .map(|f| {
            let mut bars = bar_ids(f);
            bars.sort();
            (f.id, bars)
        })
        .collect();
    linked.sort();
    linked
}

// Every foo with the ids of its bars, in load order.
fn shape(foos: &[Arc<Foo>]) -> Vec<(i64, String, Vec<i64>)> {
    foos.iter()
        .map(|f| (f.id, f.name.clone(), bar_ids(f)))
        .collect()
}

proptest! {
    #[test]
    fn partitioned_fold_equals_sequential((rows, at) in arb_split_rows(30)) {
        let m = FooBar::new();
        let (head, tail) = rows.split_at(at);
        let acc = m.loader.combine(partial(&m.loader, head), partial(&m.loader, tail));
        let split = m.loader.finish(acc).unwrap();
        let whole = sequential(&m.loader, &rows).unwrap();
        prop_assert_eq!(shape(&split), shape(&whole));
    }

    #[test]
    fn combine_tree_equals_concatenation(parts in arb_partitions(6, 8)) {
        let m = FooBar::new();
        let partials = parts.iter().map(|p| partial(&m.loader, p)).collect();
        let tree = combine_tree(&m.loader, partials);
        let concatenated: Vec<Row> = parts.concat();
        let flat = partial(&m.loader, &concatenated);
        prop_assert_eq!(Snapshot::of(&m, &tree), Snapshot::of(&m, &flat));
    }

    #[test]
    fn interleaved_partitions_load_the_same_keys(rows in arb_rows(30)) {
        let m = FooBar::new();
        let (even, odd): (Vec<(usize, &Row)>, Vec<(usize, &Row)>) =
            rows.iter().enumerate().partition(|(i, _)| i % 2 == 0);
        let even = partial(&m.loader, even.into_iter().map(|(_, r)| r));
        let odd = partial(&m.loader, odd.into_iter().map(|(_, r)| r));
        let interleaved = m.loader.combine(odd, even);
        let whole = partial(&m.loader, &rows);
        prop_assert_eq!(
            Snapshot::of(&m, &interleaved).key_sets(),
            Snapshot::of(&m, &whole).key_sets()
        );
    }

    #[test]
    fn interleaved_right_associated_fold_links_like_load(rows in arb_rows(30), n in 2..5usize) {
        let m = FooBar::new();
        let mut groups: Vec<Vec<&Row>> = vec![vec![]; n];
        for (i, row) in rows.iter().enumerate() {
            groups[i % n].push(row);
        }
        // (g[n-1] ; (... ; (g[0] ; g[1]))): reversed group order, nested to the right.
        let mut partials = groups.into_iter().map(|g| partial(&m.loader, g));
        let first = partials.next().unwrap();
        let acc = partials.fold(first, |acc, next| m.loader.combine(next, acc));
        let interleaved = m.loader.finish(acc).unwrap();
        let whole = m.loader.load(&rows).unwrap();
        prop_assert_eq!(linked_sets(&interleaved), linked_sets(&whole));
    }

    #[test]
    fn loaded_bars_point_back_at_their_foo(rows in arb_rows(30)) {
        let m = FooBar::new();
        let foos = m.loader.load(&rows).unwrap();
        for foo in &foos {
            for bar in foo.bars.get().unwrap() {
                prop_assert!(Arc::ptr_eq(&foo_of(bar), foo));
            }
        }
    }
}

#[cfg(feature = "parallel")]
proptest! {
    #[test]
    fn par_load_equals_load(rows in arb_rows(200)) {
        let m = FooBar::new();
        let sequential = m.loader.load(&rows).unwrap();
        let parallel = m.loader.par_load(&rows).unwrap();
        prop_assert_eq!(shape(&parallel), shape(&sequential));
    }
}

#[test]
fn combine_tree_of_nothing_is_empty() {
    let m = FooBar::new();
    let g = combine_tree(&m.loader, vec![]);
    assert!(g.is_empty());
    assert!(m.loader.finish(g).unwrap().is_empty());
}
