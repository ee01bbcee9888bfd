//! Property-based tests for the array primitives.
//!
//! Programs are generated from small integer vectors, run in a fresh session,
//! and their displayed results compared against the same computation done
//! directly in Rust.

use aplite::{config::Config, error::ErrorKind, interpreter::session::Session};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn literal(value: i64) -> String {
    if value < 0 { format!("¯{}", -value) } else { value.to_string() }
}

fn vector(values: &[i64]) -> String {
    values.iter().map(|&v| literal(v)).collect::<Vec<_>>().join(" ")
}

fn echo(source: &str) -> String {
    let mut session = Session::new(Config::default()).unwrap();
    session.echo(source)
           .unwrap_or_else(|e| panic!("{source} failed: {e}"))
           .unwrap_or_default()
}

fn values() -> impl Strategy<Value = Vec<i64>> {
    prop::collection::vec(-50i64..50, 2..8)
}

proptest! {
    #[test]
    fn scalars_extend_over_vectors(scalar in -50i64..50, omega in values()) {
        let expected: Vec<i64> = omega.iter().map(|w| scalar + w).collect();
        assert_eq!(echo(&format!("{}+{}", literal(scalar), vector(&omega))), vector(&expected));

        let expected: Vec<i64> = omega.iter().map(|w| w * scalar).collect();
        assert_eq!(echo(&format!("{}×{}", vector(&omega), literal(scalar))), vector(&expected));
    }

    #[test]
    fn equal_lengths_pair_up(pairs in prop::collection::vec((-50i64..50, -50i64..50), 2..8)) {
        let (alpha, omega): (Vec<i64>, Vec<i64>) = pairs.into_iter().unzip();
        let expected: Vec<i64> = alpha.iter().zip(&omega).map(|(a, w)| a - w).collect();
        assert_eq!(echo(&format!("{}-{}", vector(&alpha), vector(&omega))), vector(&expected));
    }

    #[test]
    fn unequal_lengths_do_not_conform(alpha in values(), omega in values()) {
        prop_assume!(alpha.len() != omega.len());
        let mut session = Session::new(Config::default()).unwrap();
        let err = session.run(&format!("{}+{}", vector(&alpha), vector(&omega))).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ShapeMismatch);
    }

    #[test]
    fn reducing_one_item_returns_it(value in -50i64..50) {
        assert_eq!(echo(&format!("-/,{}", literal(value))), literal(value));
        assert_eq!(echo(&format!("{{⍺×⍵}}/,{}", literal(value))), literal(value));
    }

    #[test]
    fn reduction_folds_from_the_right(omega in values()) {
        let expected = omega.iter().rev().copied().reduce(|acc, w| w - acc).unwrap();
        assert_eq!(echo(&format!("-/{}", vector(&omega))), literal(expected));
    }

    #[test]
    fn reshape_cycles_the_source(length in 0usize..20, omega in values()) {
        let expected: Vec<i64> = omega.iter().copied().cycle().take(length).collect();
        assert_eq!(echo(&format!("{length}⍴{}", vector(&omega))), vector(&expected));
    }

    #[test]
    fn outer_product_shape_concatenates(alpha in values(), rows in 1usize..4, columns in 1usize..4) {
        let source = format!("⍴({})∘.+{rows} {columns}⍴0", vector(&alpha));
        assert_eq!(echo(&source), format!("{} {rows} {columns}", alpha.len()));
    }
}
