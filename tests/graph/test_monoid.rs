use rowlink::fold::{partial, Monoid};
use rowlink::graph::ObjectGraph;

use super::strategy::{arb_rows, arb_split_rows};
use crate::model::foobar::{FooBar, Snapshot};

use proptest::{prop_assert, prop_assert_eq, proptest};

proptest! {
    #[test]
    fn graph_identity_left(rows in arb_rows(20)) {
        let m = FooBar::new();
        let g = partial(&m.loader, &rows);
        let expected = Snapshot::of(&m, &g);
        let res = ObjectGraph::empty().combine(g);
        prop_assert_eq!(Snapshot::of(&m, &res), expected);
    }

    #[test]
    fn graph_identity_right(rows in arb_rows(20)) {
        let m = FooBar::new();
        let g = partial(&m.loader, &rows);
        let expected = Snapshot::of(&m, &g);
        let res = g.combine(<ObjectGraph as Monoid>::empty());
        prop_assert_eq!(Snapshot::of(&m, &res), expected);
    }

    #[test]
    fn graph_combine_associative(a in arb_rows(10), b in arb_rows(10), c in arb_rows(10)) {
        let m = FooBar::new();
        let ab_c = partial(&m.loader, &a)
            .combine(partial(&m.loader, &b))
            .combine(partial(&m.loader, &c));
        let a_bc = partial(&m.loader, &a)
            .combine(partial(&m.loader, &b).combine(partial(&m.loader, &c)));
        prop_assert_eq!(Snapshot::of(&m, &ab_c), Snapshot::of(&m, &a_bc));
    }

    #[test]
    fn graph_split_invariant((rows, at) in arb_split_rows(30)) {
        let m = FooBar::new();
        let (head, tail) = rows.split_at(at);
        let whole = partial(&m.loader, &rows);
        let split = partial(&m.loader, head).combine(partial(&m.loader, tail));
        prop_assert_eq!(Snapshot::of(&m, &split), Snapshot::of(&m, &whole));
    }

    #[test]
    fn graph_repeated_rows_are_idempotent(rows in arb_rows(20)) {
        let m = FooBar::new();
        let once = partial(&m.loader, &rows);
        let twice = partial(&m.loader, rows.iter().chain(rows.iter()));
        prop_assert_eq!(Snapshot::of(&m, &twice), Snapshot::of(&m, &once));
    }

    #[test]
    fn graph_empty_iff_no_keys(rows in arb_rows(5)) {
        let m = FooBar::new();
        let g = partial(&m.loader, &rows);
        prop_assert!(g.is_empty() == rows.is_empty());
    }

    #[test]
    fn graph_keys_are_unique(rows in arb_rows(30)) {
        let m = FooBar::new();
        let g = partial(&m.loader, &rows);
        let (foos, bars, pairs) = Snapshot::of(&m, &g).key_sets();
        let mut deduped = foos.clone();
        deduped.dedup();
        prop_assert_eq!(deduped, foos);
        let mut deduped = bars.clone();
        deduped.dedup();
        prop_assert_eq!(deduped, bars);
        let mut deduped = pairs.clone();
        deduped.dedup();
        prop_assert_eq!(deduped, pairs);
    }
}

#[test]
fn first_row_wins_within_a_partition() {
    use crate::model::foobar::Row;

    let m = FooBar::new();
    let rows = [
        Row::foo_only(1).named("first"),
        Row::foo_only(1).named("second"),
    ];
    let g = partial(&m.loader, &rows);
    assert_eq!(Snapshot::of(&m, &g).foos, vec![(1, "first".to_string())]);
    assert_eq!(g.object_count(&m.foo), 1);
    assert_eq!(g.object_count(&m.bar), 0);
    assert_eq!(g.pair_count(&m.foo_bars), 0);
}
