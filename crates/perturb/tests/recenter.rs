//! Integration tests for the recentering engine.

use ndarray::{ArrayD, IxDyn};

use boreas_field::{Field, FieldCollection};
use boreas_io::read_fields;
use boreas_perturb::{PerturbError, RecenterConfig, RecenterOutput, compute_perturbations};

fn grid(shape: &[usize], values: Vec<f64>) -> ArrayD<f64> {
    ArrayD::from_shape_vec(IxDyn(shape), values).unwrap()
}

fn center_field(param: &str, level: &str, values: ArrayD<f64>) -> Field {
    Field::new(values)
        .with_mars_key("param", param)
        .with_mars_key("level", level)
        .with_mars_key("date", "20240101")
        .with_mars_key("time", "0000")
        .with_mars_key("step", "6")
        .with_mars_key("stream", "oper")
        .with_mars_key("type", "fc")
        .with_valid_datetime("2024-01-01T06:00:00")
        .with_grid("n320")
        .with_area("90/-180/-90/180")
}

fn member_field(param: &str, level: &str, number: u32, values: ArrayD<f64>) -> Field {
    // Members differ from the center only in keys the compatibility check
    // is expected to skip (stream, type, number).
    center_field(param, level, values)
        .with_mars_key("stream", "enfo")
        .with_mars_key("type", "pf")
        .with_mars_key("number", number.to_string())
}

/// Center: param "t" at levels 500 and 850; three members per level.
fn two_level_three_member_inputs() -> (FieldCollection, FieldCollection) {
    let shape = [2, 2];
    let center: FieldCollection = vec![
        center_field("t", "500", grid(&shape, vec![10.0, 10.0, 10.0, 10.0])),
        center_field("t", "850", grid(&shape, vec![20.0, 20.0, 20.0, 20.0])),
    ]
    .into();

    let mut members = FieldCollection::new();
    let level_500 = [
        vec![2.0, 4.0, 6.0, 8.0],
        vec![0.0, 0.0, 0.0, 0.0],
        vec![1.0, 2.0, 3.0, 4.0],
    ];
    let level_850 = [
        vec![21.0, 22.0, 23.0, 24.0],
        vec![19.0, 18.0, 17.0, 16.0],
        vec![20.0, 20.0, 20.0, 20.0],
    ];
    for (j, values) in level_500.into_iter().enumerate() {
        members.push(member_field("t", "500", j as u32 + 1, grid(&shape, values)));
    }
    for (j, values) in level_850.into_iter().enumerate() {
        members.push(member_field("t", "850", j as u32 + 1, grid(&shape, values)));
    }
    (members, center)
}

#[test]
fn scenario_two_levels_three_members() {
    let (members, center) = two_level_three_member_inputs();
    let output = compute_perturbations(&members, &center, &RecenterConfig::new()).unwrap();

    let handle = output.into_collection().expect("anonymous output");
    assert_eq!(handle.len(), members.len());

    // Level 500 block: c = 10, e = {[2,4,6,8], [0,0,0,0], [1,2,3,4]},
    // m = [1,2,3,4], so x_j = 10 - m + e_j.
    let block: Vec<&Field> = handle
        .fields()
        .iter()
        .filter(|f| f.metadata("level") == Some("500"))
        .collect();
    assert_eq!(block.len(), 3);
    let by_number = |n: &str| {
        block
            .iter()
            .find(|f| f.metadata("number") == Some(n))
            .unwrap()
    };
    assert_eq!(
        by_number("1").values().as_slice().unwrap(),
        &[11.0, 12.0, 13.0, 14.0]
    );
    assert_eq!(
        by_number("2").values().as_slice().unwrap(),
        &[9.0, 8.0, 7.0, 6.0]
    );
    assert_eq!(
        by_number("3").values().as_slice().unwrap(),
        &[10.0, 10.0, 10.0, 10.0]
    );
}

#[test]
fn mean_of_recentered_block_equals_center() {
    let (members, center) = two_level_three_member_inputs();
    let output = compute_perturbations(&members, &center, &RecenterConfig::new()).unwrap();
    let handle = output.into_collection().unwrap();

    for (level, expected) in [("500", 10.0), ("850", 20.0)] {
        let block: Vec<&Field> = handle
            .fields()
            .iter()
            .filter(|f| f.metadata("level") == Some(level))
            .collect();
        assert_eq!(block.len(), 3);
        let n = block.len() as f64;
        for point in 0..4 {
            let mean: f64 = block
                .iter()
                .map(|f| f.values().as_slice().unwrap()[point])
                .sum::<f64>()
                / n;
            assert!(
                (mean - expected).abs() < 1e-10,
                "level {level} point {point}: mean {mean}, expected {expected}"
            );
        }
    }
}

#[test]
fn shape_is_preserved() {
    let (members, center) = two_level_three_member_inputs();
    let output = compute_perturbations(&members, &center, &RecenterConfig::new()).unwrap();
    let handle = output.into_collection().unwrap();
    for field in &handle {
        assert_eq!(field.shape(), &[2, 2]);
    }
}

#[test]
fn output_inherits_member_metadata() {
    let (members, center) = two_level_three_member_inputs();
    let output = compute_perturbations(&members, &center, &RecenterConfig::new()).unwrap();
    let handle = output.into_collection().unwrap();
    for field in &handle {
        // Template metadata comes from the member, not the center.
        assert_eq!(field.metadata("stream"), Some("enfo"));
        assert_eq!(field.metadata("type"), Some("pf"));
        assert!(field.metadata("number").is_some());
        assert_eq!(field.valid_datetime(), Some("2024-01-01T06:00:00"));
        assert_eq!(field.grid(), "n320");
    }
}

fn clip_inputs(param: &str) -> (FieldCollection, FieldCollection) {
    let shape = [2];
    let center: FieldCollection =
        vec![center_field(param, "0", grid(&shape, vec![0.0, 0.0]))].into();
    // m = [2, 3]; x_1 = [-2, 2], x_2 = [2, -2] before clipping.
    let members: FieldCollection = vec![
        member_field(param, "0", 1, grid(&shape, vec![0.0, 5.0])),
        member_field(param, "0", 2, grid(&shape, vec![4.0, 1.0])),
    ]
    .into();
    (members, center)
}

#[test]
fn clip_variables_are_clamped_to_zero() {
    let (members, center) = clip_inputs("tp");
    let output = compute_perturbations(&members, &center, &RecenterConfig::new()).unwrap();
    let handle = output.into_collection().unwrap();
    assert_eq!(handle.len(), 2);
    for field in &handle {
        for &v in field.values().iter() {
            assert!(v >= 0.0, "clipped param produced negative value {v}");
        }
    }
    // The positive deviations survive clipping.
    let by_number = |n: &str| {
        handle
            .fields()
            .iter()
            .find(|f| f.metadata("number") == Some(n))
            .unwrap()
            .values()
            .as_slice()
            .unwrap()
            .to_vec()
    };
    assert_eq!(by_number("1"), vec![0.0, 2.0]);
    assert_eq!(by_number("2"), vec![2.0, 0.0]);
}

#[test]
fn non_clip_variables_keep_negative_values() {
    let (members, center) = clip_inputs("t");
    let output = compute_perturbations(&members, &center, &RecenterConfig::new()).unwrap();
    let handle = output.into_collection().unwrap();
    let has_negative = handle
        .fields()
        .iter()
        .flat_map(|f| f.values().iter())
        .any(|&v| v < 0.0);
    assert!(has_negative, "non-clip param should be left unclipped");
}

#[test]
fn clip_set_override_applies() {
    let (members, center) = clip_inputs("t");
    let config = RecenterConfig::new().with_clip_variables(["t"]);
    let output = compute_perturbations(&members, &center, &config).unwrap();
    let handle = output.into_collection().unwrap();
    for field in &handle {
        for &v in field.values().iter() {
            assert!(v >= 0.0);
        }
    }
}

#[test]
fn duplicate_ensemble_field_is_rejected() {
    let shape = [2];
    let center: FieldCollection = vec![
        center_field("t", "500", grid(&shape, vec![1.0, 1.0])),
        center_field("t", "850", grid(&shape, vec![2.0, 2.0])),
    ]
    .into();
    // The 500 hPa block contains number 1 twice; numbers {1, 2} elsewhere
    // keep the cardinality check satisfied (2 centers * 2 numbers = 4).
    let members: FieldCollection = vec![
        member_field("t", "500", 1, grid(&shape, vec![1.0, 2.0])),
        member_field("t", "500", 1, grid(&shape, vec![1.0, 2.0])),
        member_field("t", "850", 1, grid(&shape, vec![3.0, 4.0])),
        member_field("t", "850", 2, grid(&shape, vec![5.0, 6.0])),
    ]
    .into();

    let err = compute_perturbations(&members, &center, &RecenterConfig::new()).unwrap_err();
    match err {
        PerturbError::DuplicateField { identity } => {
            assert!(identity.contains("param=t"));
            assert!(identity.contains("number=1"));
        }
        other => panic!("expected DuplicateField, got {other:?}"),
    }
}

#[test]
fn mismatched_shape_fails_before_output() {
    let center: FieldCollection =
        vec![center_field("t", "500", grid(&[2, 2], vec![0.0; 4]))].into();
    let members: FieldCollection =
        vec![member_field("t", "500", 1, grid(&[4], vec![0.0; 4]))].into();

    let err = compute_perturbations(&members, &center, &RecenterConfig::new()).unwrap_err();
    assert!(matches!(err, PerturbError::ShapeMismatch { .. }));
}

#[test]
fn count_mismatch_is_descriptive() {
    let shape = [2];
    let center: FieldCollection = vec![
        center_field("t", "500", grid(&shape, vec![0.0; 2])),
        center_field("t", "850", grid(&shape, vec![0.0; 2])),
    ]
    .into();
    // Five members, three distinct numbers: 2 * 3 != 5.
    let members: FieldCollection = vec![
        member_field("t", "500", 1, grid(&shape, vec![0.0; 2])),
        member_field("t", "500", 2, grid(&shape, vec![0.0; 2])),
        member_field("t", "500", 3, grid(&shape, vec![0.0; 2])),
        member_field("t", "850", 1, grid(&shape, vec![0.0; 2])),
        member_field("t", "850", 2, grid(&shape, vec![0.0; 2])),
    ]
    .into();

    let err = compute_perturbations(&members, &center, &RecenterConfig::new()).unwrap_err();
    match err {
        PerturbError::CountMismatch {
            center,
            n_numbers,
            members,
        } => {
            assert_eq!((center, n_numbers, members), (2, 3, 5));
        }
        other => panic!("expected CountMismatch, got {other:?}"),
    }
}

#[test]
fn unset_member_number_fails_fast() {
    let shape = [2];
    let center: FieldCollection =
        vec![center_field("t", "500", grid(&shape, vec![0.0; 2]))].into();
    let no_number = center_field("t", "500", grid(&shape, vec![0.0; 2]))
        .with_mars_key("stream", "enfo")
        .with_mars_key("type", "pf");
    let members: FieldCollection = vec![
        member_field("t", "500", 1, grid(&shape, vec![0.0; 2])),
        no_number,
    ]
    .into();

    let err = compute_perturbations(&members, &center, &RecenterConfig::new()).unwrap_err();
    assert!(matches!(err, PerturbError::UnsetMemberNumber { count: 1 }));
}

#[test]
fn empty_inputs_are_rejected() {
    let (members, center) = two_level_three_member_inputs();
    let empty = FieldCollection::new();

    let err = compute_perturbations(&empty, &center, &RecenterConfig::new()).unwrap_err();
    assert!(matches!(
        err,
        PerturbError::EmptyInput {
            collection: "members"
        }
    ));

    let err = compute_perturbations(&members, &empty, &RecenterConfig::new()).unwrap_err();
    assert!(matches!(
        err,
        PerturbError::EmptyInput {
            collection: "center"
        }
    ));
}

#[test]
fn explicit_output_returns_path() {
    let dir = tempfile::tempdir().unwrap();
    let out_path = dir.path().join("recentered.parquet");
    let (members, center) = two_level_three_member_inputs();

    let config = RecenterConfig::new().with_output(&out_path);
    let output = compute_perturbations(&members, &center, &config).unwrap();

    match output {
        RecenterOutput::Path(p) => assert_eq!(p, out_path),
        other => panic!("expected Path output, got {other:?}"),
    }
    let fields = read_fields(&out_path).unwrap();
    assert_eq!(fields.len(), members.len());
}

#[test]
fn temp_file_lives_and_dies_with_the_handle() {
    let (members, center) = two_level_three_member_inputs();
    let output = compute_perturbations(&members, &center, &RecenterConfig::new()).unwrap();
    let handle = output.into_collection().unwrap();

    let backing = handle.backing_path().to_path_buf();
    assert!(backing.exists());

    let clone = handle.clone();
    drop(handle);
    assert!(backing.exists(), "file must survive while a clone is alive");

    drop(clone);
    assert!(!backing.exists(), "file must be deleted with the last handle");
}

#[test]
fn input_order_does_not_matter() {
    let (members, center) = two_level_three_member_inputs();

    // Feed the members in reverse; ordering inside the engine must realign.
    let reversed: FieldCollection = {
        let mut v: Vec<Field> = members.iter().cloned().collect();
        v.reverse();
        v.into()
    };

    let a = compute_perturbations(&members, &center, &RecenterConfig::new()).unwrap();
    let b = compute_perturbations(&reversed, &center, &RecenterConfig::new()).unwrap();
    let a = a.into_collection().unwrap();
    let b = b.into_collection().unwrap();

    assert_eq!(a.len(), b.len());
    for (fa, fb) in a.fields().iter().zip(b.fields().iter()) {
        assert_eq!(fa.as_mars(), fb.as_mars());
        assert_eq!(
            fa.values().as_slice().unwrap(),
            fb.values().as_slice().unwrap()
        );
    }
}
