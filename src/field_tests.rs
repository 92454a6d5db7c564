use super::*;

#[test]
fn test_new_rejects_wrong_length() {
    let err = DenseField::new(vec![2, 3], vec![0.0; 5]).expect_err("5 != 6");
    assert!(err.is_shape_mismatch());
    assert!(err.to_string().contains("expected 6"));
}

#[test]
fn test_overflowing_shape_rejected() {
    let err = DenseField::new(vec![usize::MAX, 2], vec![0.0; 2]).expect_err("product overflows");
    assert!(err.is_shape_mismatch());
    assert!(DenseField::zeros(vec![2, usize::MAX])
        .expect_err("product overflows")
        .is_shape_mismatch());
}

#[test]
fn test_shape_accessors() {
    let field = DenseField::zeros(vec![4, 2, 3, 5]).expect("120 elements");
    assert_eq!(field.ndim(), 4);
    assert_eq!(field.len(), 120);
    assert_eq!(field.extra_shape(), &[4, 2]);
    assert_eq!(field.spatial_shape(), Some((3, 5)));
    assert!(field.is_row_major());
}

#[test]
fn test_spatial_shape_needs_two_axes() {
    let field = DenseField::new(vec![3], vec![1.0, 2.0, 3.0]).expect("valid");
    assert_eq!(field.spatial_shape(), None);
    assert!(field.extra_shape().is_empty());
}

#[test]
fn test_get_row_major() {
    let field = DenseField::new(vec![2, 3], vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]).expect("valid");
    assert_eq!(field.get(&[0, 2]), Some(2.0));
    assert_eq!(field.get(&[1, 0]), Some(3.0));
    assert_eq!(field.get(&[2, 0]), None);
    assert_eq!(field.get(&[0]), None);
}

#[test]
fn test_get_column_major() {
    // logical [[0, 1, 2], [3, 4, 5]] stored column by column
    let field = DenseField::from_column_major(vec![2, 3], vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0])
        .expect("valid");
    assert_eq!(field.order(), MemoryOrder::ColumnMajor);
    assert_eq!(field.get(&[0, 2]), Some(2.0));
    assert_eq!(field.get(&[1, 0]), Some(3.0));
    assert_eq!(field.get(&[1, 1]), Some(4.0));
}

#[test]
fn test_to_row_major_2d() {
    let field = DenseField::from_column_major(vec![2, 3], vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0])
        .expect("valid");
    let row = field.to_row_major();
    assert!(row.is_row_major());
    assert_eq!(row.as_slice(), &[0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
}

#[test]
fn test_to_row_major_3d_preserves_every_element() {
    let shape = vec![2, 3, 4];
    let data: Vec<f64> = (0..24).map(f64::from).collect();
    let field = DenseField::from_column_major(shape.clone(), data).expect("valid");
    let row = field.to_row_major();
    for i in 0..2 {
        for j in 0..3 {
            for k in 0..4 {
                assert_eq!(row.get(&[i, j, k]), field.get(&[i, j, k]));
            }
        }
    }
    assert_eq!(row.shape(), shape.as_slice());
}

#[test]
fn test_to_row_major_is_clone_when_row_major() {
    let field = DenseField::new(vec![1, 2], vec![7.0, 8.0]).expect("valid");
    assert_eq!(field.to_row_major(), field);
}

#[test]
fn test_add_mixed_orders() {
    let a = DenseField::new(vec![2, 2], vec![1.0, 2.0, 3.0, 4.0]).expect("valid");
    let b = DenseField::from_column_major(vec![2, 2], vec![10.0, 30.0, 20.0, 40.0]).expect("valid");
    let sum = a.add(&b).expect("same shape");
    assert_eq!(sum.as_slice(), &[11.0, 22.0, 33.0, 44.0]);
}

#[test]
fn test_add_shape_mismatch() {
    let a = DenseField::zeros(vec![2, 2]).expect("valid");
    let b = DenseField::zeros(vec![4]).expect("valid");
    assert!(a.add(&b).expect_err("different shapes").is_shape_mismatch());
}

#[test]
fn test_into_vec() {
    let field = DenseField::new(vec![1, 1, 2], vec![0.5, 1.5]).expect("valid");
    assert!(!field.is_empty());
    assert_eq!(field.into_vec(), vec![0.5, 1.5]);
}
