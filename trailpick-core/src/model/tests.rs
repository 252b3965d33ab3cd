//! Unit tests for model construction.

use super::*;
use geo::Coord;
use rstest::{fixture, rstest};

const TOLERANCE: f64 = 1e-9;

fn trail(index: u32, rating: f64, rating_count: u32) -> Trail {
    Trail::new(
        format!("t{index}"),
        format!("Trail {index}"),
        Coord {
            x: -122.0,
            y: 47.0 + f64::from(index) * 0.1,
        },
    )
    .unwrap()
    .with_elevation(100.0 * f64::from(index + 1), 1000.0)
    .with_length(5.0)
    .with_rating(rating, rating_count)
}

#[fixture]
fn three_trails() -> Vec<Trail> {
    vec![trail(0, 4.0, 10), trail(1, 3.0, 20), trail(2, 5.0, 30)]
}

/// Distances of 3 miles between trails 0 and 1, 10 miles otherwise.
fn scripted_distance(a: &Trail, b: &Trail) -> f64 {
    let pair = [a.id.as_str(), b.id.as_str()];
    if pair == ["t0", "t1"] || pair == ["t1", "t0"] {
        3.0
    } else {
        10.0
    }
}

fn separated(min_separation: f64) -> ModelParameters {
    ModelParameters {
        target_count: 2,
        min_separation,
        ..ModelParameters::default()
    }
}

/// Column values for selecting `chosen`, with indicators set to the AND.
fn assignment(model: &SelectionModel, chosen: &[usize]) -> Vec<f64> {
    model
        .registry()
        .iter()
        .map(|(_, key, _)| match key {
            VariableKey::Selection(i) => f64::from(u8::from(chosen.contains(&i))),
            VariableKey::Conflict(i, j) => {
                f64::from(u8::from(chosen.contains(&i) && chosen.contains(&j)))
            }
        })
        .collect()
}

#[rstest]
fn without_separation_only_selection_variables_exist(three_trails: Vec<Trail>) {
    let params = ModelParameters {
        target_count: 2,
        ..ModelParameters::default()
    };
    let model = SelectionModel::build(&three_trails, &params).unwrap();
    assert_eq!(model.registry().len(), 3);
    assert_eq!(model.pair_count(), 0);
    assert!(model.constraints().iter().all(|c| c.pair.is_none()));
    let kinds: Vec<_> = model.constraints().iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ConstraintKind::Count,
            ConstraintKind::ElevationLower,
            ConstraintKind::ElevationUpper
        ]
    );
}

#[rstest]
fn count_constraint_has_unit_coefficient_per_trail(three_trails: Vec<Trail>) {
    let model = SelectionModel::build(&three_trails, &separated(5.0)).unwrap();
    let count = model
        .constraints()
        .iter()
        .find(|c| c.kind == ConstraintKind::Count)
        .unwrap();
    assert_eq!(count.expr.terms().len(), three_trails.len());
    assert!(count.expr.terms().iter().all(|(_, c)| *c == 1.0));
    assert_eq!(count.relation, Relation::Equal);
    assert_eq!(count.rhs, 2.0);
}

#[rstest]
fn objective_uses_mode_coefficients(three_trails: Vec<Trail>) {
    let params = ModelParameters {
        objective: ObjectiveMode::QualityEmphasis,
        ..ModelParameters::default()
    };
    let model = SelectionModel::build(&three_trails, &params).unwrap();
    let coefficients: Vec<f64> = model.objective().terms().iter().map(|(_, c)| *c).collect();
    assert_eq!(coefficients, vec![16.0, 9.0, 25.0]);
}

#[rstest]
fn elevation_bounds_are_emitted_even_when_degenerate(three_trails: Vec<Trail>) {
    let model = SelectionModel::build(&three_trails, &ModelParameters::default()).unwrap();
    let lower = model
        .constraints()
        .iter()
        .find(|c| c.kind == ConstraintKind::ElevationLower)
        .unwrap();
    let upper = model
        .constraints()
        .iter()
        .find(|c| c.kind == ConstraintKind::ElevationUpper)
        .unwrap();
    assert_eq!(lower.rhs, 0.0);
    assert!(upper.rhs.is_infinite());
    let gains: Vec<f64> = lower.expr.terms().iter().map(|(_, c)| *c).collect();
    assert_eq!(gains, vec![100.0, 200.0, 300.0]);
}

#[rstest]
#[case(2)]
#[case(3)]
#[case(6)]
fn separation_generates_four_constraints_per_pair(#[case] n: u32) {
    let trails: Vec<Trail> = (0..n).map(|i| trail(i, 4.0, 10)).collect();
    let model = SelectionModel::build(&trails, &separated(1.0)).unwrap();
    let n = usize::try_from(n).unwrap();
    let pairs = n * (n - 1) / 2;
    assert_eq!(model.pair_count(), pairs);
    assert_eq!(model.registry().len(), n + pairs);
    let pairwise = model
        .constraints()
        .iter()
        .filter(|c| c.kind.is_pairwise())
        .count();
    assert_eq!(pairwise, pairs * 4);
}

#[rstest]
fn indicators_follow_selection_variables_in_pair_order(three_trails: Vec<Trail>) {
    let model = SelectionModel::build(&three_trails, &separated(1.0)).unwrap();
    let names: Vec<&str> = model.registry().iter().map(|(_, _, name)| name).collect();
    assert_eq!(names, vec!["x_0", "x_1", "x_2", "y_0_1", "y_0_2", "y_1_2"]);
}

#[rstest]
fn selecting_close_pair_violates_separation(three_trails: Vec<Trail>) {
    let model =
        SelectionModel::build_with_distances(&three_trails, &separated(5.0), scripted_distance)
            .unwrap();
    assert_eq!(model.pair_count(), 3);

    let close = assignment(&model, &[0, 1]);
    let violated = model.violated_constraints(&close, TOLERANCE);
    assert_eq!(violated.len(), 1);
    assert!(violated.iter().all(|c| c.kind == ConstraintKind::Separation));
    assert_eq!(violated[0].pair, Some((0, 1)));

    let apart = assignment(&model, &[1, 2]);
    assert!(model.violated_constraints(&apart, TOLERANCE).is_empty());
}

#[rstest]
fn indicator_cannot_be_zero_when_both_selected(three_trails: Vec<Trail>) {
    let model =
        SelectionModel::build_with_distances(&three_trails, &separated(5.0), scripted_distance)
            .unwrap();
    let mut cheating = assignment(&model, &[0, 1]);
    let y01 = model.registry().lookup("y_0_1").unwrap();
    cheating[y01.index()] = 0.0;
    let violated = model.violated_constraints(&cheating, TOLERANCE);
    assert_eq!(violated.len(), 1);
    assert_eq!(violated[0].kind, ConstraintKind::LinkBoth);
}

#[rstest]
fn separation_row_folds_big_m_into_bound(three_trails: Vec<Trail>) {
    let model =
        SelectionModel::build_with_distances(&three_trails, &separated(5.0), scripted_distance)
            .unwrap();
    let first = model
        .constraints()
        .iter()
        .find(|c| c.kind == ConstraintKind::Separation)
        .unwrap();
    assert_eq!(first.pair, Some((0, 1)));
    assert_eq!(first.expr.terms().len(), 1);
    assert_eq!(first.expr.terms()[0].1, 3.0 - DEFAULT_BIG_M);
    assert_eq!(first.rhs, 5.0 - DEFAULT_BIG_M);
}

#[rstest]
fn rejects_big_m_below_separation(three_trails: Vec<Trail>) {
    let params = ModelParameters {
        big_m: 4.0,
        ..separated(5.0)
    };
    let err = SelectionModel::build(&three_trails, &params).unwrap_err();
    assert_eq!(
        err,
        ModelError::BigMTooSmall {
            big_m: 4.0,
            min_separation: 5.0
        }
    );
}

#[rstest]
fn small_big_m_is_ignored_without_separation(three_trails: Vec<Trail>) {
    let params = ModelParameters {
        big_m: 0.0,
        ..ModelParameters::default()
    };
    assert!(SelectionModel::build(&three_trails, &params).is_ok());
}

#[rstest]
fn rejects_catalogues_over_the_pairwise_limit(three_trails: Vec<Trail>) {
    let params = ModelParameters {
        separation_item_limit: 2,
        ..separated(5.0)
    };
    let err = SelectionModel::build(&three_trails, &params).unwrap_err();
    assert_eq!(
        err,
        ModelError::TooManyCandidates {
            eligible: 3,
            limit: 2
        }
    );
}

#[rstest]
#[case::negative_separation(ModelParameters { min_separation: -1.0, ..ModelParameters::default() })]
#[case::nan_elevation(ModelParameters {
    min_total_elevation: f64::NAN,
    ..ModelParameters::default()
})]
#[case::infinite_big_m(ModelParameters { big_m: f64::INFINITY, ..separated(1.0) })]
fn rejects_invalid_numbers(three_trails: Vec<Trail>, #[case] params: ModelParameters) {
    assert!(matches!(
        SelectionModel::build(&three_trails, &params),
        Err(ModelError::InvalidParameter { .. })
    ));
}

#[rstest]
fn oversized_target_builds_but_is_flagged(three_trails: Vec<Trail>) {
    let params = ModelParameters {
        target_count: 4,
        ..ModelParameters::default()
    };
    let model = SelectionModel::build(&three_trails, &params).unwrap();
    assert!(model.requests_more_than_eligible());
    assert_eq!(model.eligible_count(), 3);
}

#[rstest]
fn empty_catalogue_builds(#[values(0.0, 5.0)] min_separation: f64) {
    let params = ModelParameters {
        min_separation,
        ..ModelParameters::default()
    };
    let model = SelectionModel::build(&[], &params).unwrap();
    assert!(model.registry().is_empty());
    assert!(model.requests_more_than_eligible());
}
