//! Property-based tests for the wall estimate.
//!
//! Properties under test:
//! - Purchased pieces never fall below the net count, and grow with waste
//! - The mortar / cement+sand split conserves the binder volume
//! - Bag counts are the smallest integer covering volume / yield
//! - Identical inputs give bit-identical results
//! - Cost and weight totals equal the sum of their parts

use calcblock_core::calculations::estimate::{calculate, estimate, EstimateInput, JointConfig, WallSpec};
use calcblock_core::equations::masonry::{bags_required, binder_volume_m3, piece_volume_m3, wall_volume_m3};
use calcblock_core::materials::{
    BinderConfig, BinderType, CementSandMix, PieceSpec, PieceType, PremixedMortar, CEMENT_BAG_YIELD_M3,
};
use proptest::prelude::*;

const EPSILON: f64 = 1e-9;

// ===== Arbitrary Strategies =====

/// Catalog or custom piece with realistic dimensions (cm).
fn arb_piece() -> impl Strategy<Value = PieceSpec> {
    prop_oneof![
        Just(PieceSpec::default()),
        prop::sample::select(vec![PieceType::Block12, PieceType::Block20, PieceType::RedBrick])
            .prop_map(|t| PieceSpec::from_type(t).unwrap()),
        (5.0f64..60.0, 3.0f64..30.0, 5.0f64..30.0, 0.0f64..30.0, 0.0f64..100.0).prop_map(
            |(l, h, t, weight, cost)| PieceSpec::custom(l, h, t)
                .with_unit_weight(weight)
                .with_unit_cost(cost)
        ),
    ]
}

fn arb_joint() -> impl Strategy<Value = JointConfig> {
    (0.0f64..3.0, 0.0f64..=1.0).prop_map(|(j, w)| JointConfig::new(j, w))
}

fn arb_wall() -> impl Strategy<Value = WallSpec> {
    prop_oneof![
        (0.0f64..500.0).prop_map(WallSpec::area),
        (0.0f64..50.0, 0.0f64..6.0).prop_map(|(l, h)| WallSpec::dimensions(l, h)),
    ]
}

fn arb_mix() -> impl Strategy<Value = CementSandMix> {
    (0.0f64..5.0, 0.0f64..8.0, 0.0f64..500.0, 0.0f64..1000.0)
        .prop_filter("ratio parts must not both be zero", |(c, s, _, _)| c + s > 0.1)
        .prop_map(|(cement_parts, sand_parts, cement_bag_cost, sand_cost_per_m3)| CementSandMix {
            cement_parts,
            sand_parts,
            cement_bag_cost,
            sand_cost_per_m3,
        })
}

fn arb_mortar() -> impl Strategy<Value = PremixedMortar> {
    (0.005f64..0.05, 0.0f64..300.0).prop_map(|(bag_yield_m3, bag_cost)| PremixedMortar { bag_yield_m3, bag_cost })
}

fn arb_binder() -> impl Strategy<Value = BinderConfig> {
    (prop::sample::select(BinderType::ALL.to_vec()), arb_mortar(), arb_mix())
        .prop_map(|(binder_type, mortar, mix)| binder_type.config(mortar, mix))
}

fn arb_input() -> impl Strategy<Value = EstimateInput> {
    (arb_piece(), arb_joint(), arb_wall(), arb_binder()).prop_map(|(piece, joint, wall, binder)| EstimateInput {
        label: String::new(),
        piece,
        joint,
        wall,
        binder,
    })
}

proptest! {
    #[test]
    fn prop_total_pieces_cover_net_count(input in arb_input()) {
        let result = calculate(&input).unwrap();
        prop_assert!(result.total_pieces as f64 >= result.net_pieces.ceil());
    }

    #[test]
    fn prop_total_pieces_non_decreasing_in_waste(
        piece in arb_piece(),
        joint_cm in 0.0f64..3.0,
        area in 0.0f64..500.0,
        w1 in 0.0f64..=1.0,
        w2 in 0.0f64..=1.0,
    ) {
        let (low, high) = if w1 <= w2 { (w1, w2) } else { (w2, w1) };
        let wall = WallSpec::area(area);
        let binder = BinderConfig::default();
        let a = estimate(&piece, &JointConfig::new(joint_cm, low), &wall, &binder).unwrap();
        let b = estimate(&piece, &JointConfig::new(joint_cm, high), &wall, &binder).unwrap();
        prop_assert!(a.total_pieces <= b.total_pieces);

        // A waste step adding at least one whole piece must raise the count
        if (high - low) * a.net_pieces >= 1.0 + EPSILON {
            prop_assert!(a.total_pieces < b.total_pieces);
        }
    }

    #[test]
    fn prop_binder_volume_balance(input in arb_input()) {
        let result = calculate(&input).unwrap();
        let wall = wall_volume_m3(result.wall_area_m2, input.piece.thickness_cm);
        let piece = piece_volume_m3(input.piece.length_cm, input.piece.height_cm, input.piece.thickness_cm);
        prop_assert_eq!(result.binder_volume_m3, binder_volume_m3(wall, result.net_pieces, piece));
        prop_assert!(result.binder_volume_m3 >= 0.0);
    }

    #[test]
    fn prop_both_split_conserves_volume(
        piece in arb_piece(),
        joint in arb_joint(),
        wall in arb_wall(),
        mortar in arb_mortar(),
        mix in arb_mix(),
    ) {
        let binder = BinderType::Both.config(mortar, mix);
        let result = estimate(&piece, &joint, &wall, &binder).unwrap();
        let half = result.binder_volume_m3 / 2.0;

        let cement_and_sand = result.binder.cement_volume_m3 + result.binder.sand_m3;
        prop_assert!((cement_and_sand - half).abs() <= EPSILON * (1.0 + half));
        prop_assert_eq!(result.binder.mortar_bags, bags_required(half, mortar.bag_yield_m3));
    }

    #[test]
    fn prop_bag_count_is_smallest_cover(volume in 0.0f64..50.0, bag_yield in 0.001f64..1.0) {
        let bags = bags_required(volume, bag_yield);
        prop_assert!(bags as f64 >= volume / bag_yield);
        if bags > 0 {
            prop_assert!(((bags - 1) as f64) < volume / bag_yield);
        }
    }

    #[test]
    fn prop_cement_bags_cover_cement_volume(
        piece in arb_piece(),
        joint in arb_joint(),
        wall in arb_wall(),
        mix in arb_mix(),
    ) {
        let result = estimate(&piece, &joint, &wall, &BinderConfig::CementSand(mix)).unwrap();
        prop_assert_eq!(result.binder.mortar_bags, 0);
        prop_assert_eq!(
            result.binder.cement_bags,
            bags_required(result.binder.cement_volume_m3, CEMENT_BAG_YIELD_M3)
        );
    }

    #[test]
    fn prop_idempotent(input in arb_input()) {
        let a = calculate(&input).unwrap();
        let b = calculate(&input).unwrap();
        prop_assert_eq!(a, b);
        prop_assert_eq!(a.cost.total.to_bits(), b.cost.total.to_bits());
        prop_assert_eq!(a.weight.total_kg.to_bits(), b.weight.total_kg.to_bits());
    }

    #[test]
    fn prop_totals_are_sums(input in arb_input()) {
        let result = calculate(&input).unwrap();
        let cost = result.cost;
        prop_assert_eq!(cost.total, cost.pieces + cost.mortar + cost.cement + cost.sand);
        prop_assert_eq!(cost.pieces, result.total_pieces as f64 * input.piece.unit_cost);

        let weight = result.weight;
        prop_assert_eq!(weight.total_kg, weight.pieces_kg + weight.mortar_kg + weight.cement_kg + weight.sand_kg);
        prop_assert!(weight.total_kg >= 0.0);
    }

    #[test]
    fn prop_negative_area_rejected(area in -1000.0f64..-0.001) {
        let input = EstimateInput { wall: WallSpec::area(area), ..EstimateInput::default() };
        let err = calculate(&input).unwrap_err();
        prop_assert_eq!(err.error_code(), "INVALID_CONFIGURATION");
    }
}

// ===== Scenarios =====

#[test]
fn scenario_block15_ten_square_meters() {
    let input = EstimateInput {
        label: "Block 15".to_string(),
        piece: PieceSpec::custom(40.0, 20.0, 15.0),
        joint: JointConfig::with_waste_percent(1.0, 7.0),
        wall: WallSpec::area(10.0),
        binder: BinderConfig::default(),
    };
    let result = calculate(&input).unwrap();
    assert!((result.pieces_per_m2 - 11.614).abs() < 0.001);
    assert_eq!(result.total_pieces, 125);
}

#[test]
fn scenario_zero_area_is_all_zero() {
    for binder_type in BinderType::ALL {
        let input = EstimateInput {
            wall: WallSpec::area(0.0),
            binder: binder_type.config(PremixedMortar::default(), CementSandMix::default()),
            ..EstimateInput::default()
        };
        let result = calculate(&input).unwrap();
        assert_eq!(result.total_pieces, 0);
        assert_eq!(result.binder.mortar_bags, 0);
        assert_eq!(result.binder.cement_bags, 0);
        assert_eq!(result.binder.sand_m3, 0.0);
        assert_eq!(result.cost.total, 0.0);
        assert_eq!(result.weight.total_kg, 0.0);
    }
}

#[test]
fn scenario_cement_sand_one_cubic_meter() {
    // 1:4 over 1.0 m³: 0.2 m³ cement in 0.035 m³ bags, 0.8 m³ sand
    let (cement, sand) = calcblock_core::equations::ratio_split(1.0, 1.0, 4.0);
    assert!((cement - 0.2).abs() < EPSILON);
    assert!((sand - 0.8).abs() < EPSILON);
    assert_eq!(bags_required(cement, CEMENT_BAG_YIELD_M3), 6);
}
