//! Property-based tests using proptest.
//!
//! These tests verify algebraic properties of weight application.

use proptest::prelude::*;
use regrid_weights::prelude::*;

const NY: usize = 3;
const NX: usize = 4;
const N_IN: usize = NY * NX;
const N_OUT: usize = 6;

// Strategy for random operators of shape (N_OUT, N_IN)
fn operator_strategy() -> impl Strategy<Value = WeightOperator> {
    proptest::collection::vec((0..N_OUT, 0..N_IN, -10.0f64..10.0), 0..40).prop_map(|entries| {
        let mut op = WeightOperator::new(N_OUT, N_IN);
        for (r, c, v) in entries {
            op.push(r, c, v);
        }
        op
    })
}

// Strategy for fields of shape (batch, NY, NX)
fn field_strategy(batch: usize) -> impl Strategy<Value = DenseField> {
    proptest::collection::vec(-100.0f64..100.0, batch * N_IN)
        .prop_map(move |data| DenseField::new(vec![batch, NY, NX], data).expect("length matches"))
}

fn regrid(op: &WeightOperator, data: &DenseField) -> Vec<f64> {
    apply(op, data, (NY, NX), (2, 3))
        .expect("shapes agree")
        .into_field()
        .into_vec()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn apply_is_additive(
        op in operator_strategy(),
        a in field_strategy(2),
        b in field_strategy(2),
    ) {
        let sum = a.add(&b).expect("same shape");
        let lhs = regrid(&op, &sum);
        let rhs: Vec<f64> = regrid(&op, &a)
            .iter()
            .zip(regrid(&op, &b))
            .map(|(x, y)| x + y)
            .collect();
        for (l, r) in lhs.iter().zip(&rhs) {
            prop_assert!((l - r).abs() < 1e-6 * (1.0 + r.abs()));
        }
    }

    #[test]
    fn apply_is_homogeneous(op in operator_strategy(), a in field_strategy(1), s in -5.0f64..5.0) {
        let scaled = DenseField::new(
            a.shape().to_vec(),
            a.as_slice().iter().map(|x| x * s).collect(),
        ).expect("same length");
        let lhs = regrid(&op, &scaled);
        let rhs: Vec<f64> = regrid(&op, &a).iter().map(|x| x * s).collect();
        for (l, r) in lhs.iter().zip(&rhs) {
            prop_assert!((l - r).abs() < 1e-6 * (1.0 + r.abs()));
        }
    }

    #[test]
    fn identity_returns_input(a in field_strategy(3)) {
        let out = apply(&WeightOperator::identity(N_IN), &a, (NY, NX), (NY, NX))
            .expect("shapes agree");
        prop_assert_eq!(out.field, a);
    }

    #[test]
    fn apply_matches_dense_product(op in operator_strategy(), a in field_strategy(1)) {
        let dense = op.to_dense();
        let out = regrid(&op, &a);
        for r in 0..N_OUT {
            let expected: f64 = (0..N_IN).map(|c| dense[r * N_IN + c] * a.as_slice()[c]).sum();
            prop_assert!((out[r] - expected).abs() < 1e-6 * (1.0 + expected.abs()));
        }
    }

    #[test]
    fn inject_missing_only_touches_empty_rows(op in operator_strategy()) {
        let marked = inject_missing(&op).expect("rows in range");
        let empty = op.missing_rows();
        prop_assert_eq!(marked.nnz(), op.nnz() + empty.len());
        prop_assert!(marked.missing_rows().is_empty());
        for (r, c, v) in marked.entries() {
            if empty.contains(&r) {
                prop_assert_eq!(c, 0);
                prop_assert!(v.is_nan());
            } else {
                prop_assert!(!v.is_nan());
            }
        }
    }

    #[test]
    fn combine_preserves_row_sums_and_coverage(
        op in operator_strategy(),
        groups in proptest::collection::vec(0usize..5, N_IN),
    ) {
        let merged = combine_columns(&op, &groups).expect("one group per column");
        prop_assert_eq!(merged.coverage(), op.coverage());
        for (a, b) in op.row_sums().iter().zip(merged.row_sums()) {
            prop_assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn layout_conversions_preserve_matrix(op in operator_strategy()) {
        let dense = op.to_dense();
        let via_lil = op.to_row_lists().expect("in range").into_operator().to_dense();
        prop_assert_eq!(via_lil, dense.clone());
        let via_csr = op.to_csr().expect("in range").into_operator().to_dense();
        let via_csc = op.to_csc().expect("in range").into_operator().to_dense();
        for ((d, a), b) in dense.iter().zip(&via_csr).zip(&via_csc) {
            prop_assert!((d - a).abs() < 1e-9);
            prop_assert!((d - b).abs() < 1e-9);
        }
    }
}
