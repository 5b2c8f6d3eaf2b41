// Copyright 2026 the Gridplot Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use chrono::NaiveDate;
use gridplot_data::{ColumnDef, DataTable, Row, Value};

use crate::{
    Dimension, DimensionRole, LinearScale, Scale, ScaleError, ScaleKind, derive_scales,
};

fn sales() -> DataTable {
    DataTable::new(
        vec![
            Row::new().with("month", "jan").with("units", 10.0).with("returns", 1.0),
            Row::new().with("month", "feb").with("units", 40.0).with("returns", 4.0),
            Row::new().with("month", "mar").with("units", 25.0).with("returns", 2.0),
            Row::new().with("month", "apr").with("units", 30.0).with("returns", 3.0),
        ],
        vec![
            ColumnDef::new("month"),
            ColumnDef::new("units"),
            ColumnDef::new("returns"),
        ],
    )
}

#[test]
fn continuous_column_derives_a_linear_scale_over_its_extent() {
    let table = sales();
    let dims = [Dimension::new(["units"], (0.0, 100.0))];
    let derived = derive_scales(&dims, &table).unwrap();
    let Scale::Linear(scale) = &derived[0].scale else {
        panic!("expected linear scale");
    };
    assert_eq!(scale.domain(), (10.0, 40.0));
    assert_eq!(derived[0].values[0][0], Some(0.0));
    assert_eq!(derived[0].values[1][0], Some(100.0));
}

#[test]
fn zero_basing_pins_the_domain_floor() {
    let table = sales();
    let dims = [Dimension::new(["units"], (0.0, 100.0)).with_zero(true)];
    let derived = derive_scales(&dims, &table).unwrap();
    let Scale::Linear(scale) = &derived[0].scale else {
        panic!("expected linear scale");
    };
    assert_eq!(scale.domain(), (0.0, 40.0));
}

#[test]
fn categorical_column_derives_a_band_scale_with_bandwidth() {
    let table = sales();
    let dims = [Dimension::new(["month"], (0.0, 100.0))];
    let derived = derive_scales(&dims, &table).unwrap();
    let Scale::Band(band) = &derived[0].scale else {
        panic!("expected band scale");
    };
    assert_eq!(band.domain().len(), 4);
    // Four bands cover the range up to padding.
    let covered = band.bandwidth() * 4.0;
    assert!(covered > 85.0 && covered <= 100.0, "bandwidth*4 ~ range");
}

#[test]
fn mixed_continuity_is_a_construction_error() {
    let table = sales();
    let dims = [Dimension::new(["month", "units"], (0.0, 100.0))];
    let err = derive_scales(&dims, &table).unwrap_err();
    assert!(matches!(err, ScaleError::MixedContinuity(_)));
    assert!(
        err.to_string()
            .contains("cannot share continuous and non continuous data"),
        "got: {err}"
    );
}

#[test]
fn unknown_column_is_a_hard_error_and_a_table_diagnostic() {
    let table = sales();
    let dims = [Dimension::new(["price"], (0.0, 100.0))];
    assert_eq!(
        derive_scales(&dims, &table),
        Err(ScaleError::UnknownColumn("price".to_owned()))
    );
    assert!(!table.diagnostics().is_empty(), "diagnostic recorded");
}

#[test]
fn stacked_domain_covers_per_row_sums() {
    let table = sales();
    let dims = [Dimension::new(["units", "returns"], (0.0, 100.0)).with_stack(true)];
    let derived = derive_scales(&dims, &table).unwrap();
    let Scale::Linear(scale) = &derived[0].scale else {
        panic!("expected linear scale");
    };
    // Largest row sum is 40 + 4.
    assert_eq!(scale.domain(), (11.0, 44.0));
    // Each row still scales its own values, one per column.
    assert_eq!(derived[0].values[0].len(), 2);
}

#[test]
fn stacking_text_is_a_hard_error() {
    let table = sales();
    let dims = [Dimension::new(["month"], (0.0, 100.0))
        .with_kind(ScaleKind::Linear)
        .with_stack(true)];
    assert_eq!(
        derive_scales(&dims, &table),
        Err(ScaleError::StackNonNumeric("month".to_owned()))
    );
}

#[test]
fn y_role_flips_into_screen_space() {
    let table = sales();
    let dims = [
        Dimension::new(["units"], (0.0, 100.0)).with_role(DimensionRole::Y),
    ];
    let derived = derive_scales(&dims, &table).unwrap();
    // Domain max (40 units) sits at the top of a 100px-tall plot.
    assert_eq!(derived[0].values[1][0], Some(0.0));
    assert_eq!(derived[0].values[0][0], Some(100.0));
}

#[test]
fn x_role_centers_band_marks() {
    let table = sales();
    let plain = derive_scales(&[Dimension::new(["month"], (0.0, 100.0))], &table).unwrap();
    let centered = derive_scales(
        &[Dimension::new(["month"], (0.0, 100.0)).with_role(DimensionRole::X)],
        &table,
    )
    .unwrap();
    let half = plain[0].scale.bandwidth() / 2.0;
    let edge = plain[0].values[0][0].unwrap();
    assert_eq!(centered[0].values[0][0], Some(edge + half));
}

#[test]
fn null_values_scale_to_none() {
    let table = DataTable::new(
        vec![
            Row::new().with("v", 1.0),
            Row::new().with("v", Value::Null),
            Row::new().with("v", 3.0),
        ],
        vec![ColumnDef::new("v")],
    );
    let derived = derive_scales(&[Dimension::new(["v"], (0.0, 10.0))], &table).unwrap();
    assert_eq!(derived[0].values[1][0], None);
}

#[test]
fn date_column_derives_a_time_scale() {
    let day = |d: u32| {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    };
    let table = DataTable::new(
        vec![
            Row::new().with("when", day(1)).with("v", 1.0),
            Row::new().with("when", day(3)).with("v", 2.0),
        ],
        vec![ColumnDef::new("when"), ColumnDef::new("v")],
    );
    assert!(table.column("when").unwrap().continuous);
    let derived = derive_scales(&[Dimension::new(["when"], (0.0, 100.0))], &table).unwrap();
    let Scale::Time(scale) = &derived[0].scale else {
        panic!("expected time scale");
    };
    assert_eq!(scale.map_time(day(2)), 50.0);
    assert_eq!(derived[0].values[0][0], Some(0.0));
    assert_eq!(derived[0].values[1][0], Some(100.0));
}

#[test]
fn update_hook_gets_the_last_word() {
    let table = sales();
    let dims = [
        Dimension::new(["units"], (0.0, 100.0)).with_update(|scale| match scale {
            Scale::Linear(s) => Scale::Linear(LinearScale::new((0.0, 50.0), s.range())),
            other => other,
        }),
    ];
    let derived = derive_scales(&dims, &table).unwrap();
    let Scale::Linear(scale) = &derived[0].scale else {
        panic!("expected linear scale");
    };
    assert_eq!(scale.domain(), (0.0, 50.0));
    assert_eq!(derived[0].values[0][0], Some(20.0));
}

#[test]
fn explicit_kind_overrides_inference() {
    let table = sales();
    let dims = [Dimension::new(["units"], (0.0, 100.0)).with_kind(ScaleKind::Band)];
    let derived = derive_scales(&dims, &table).unwrap();
    assert!(matches!(derived[0].scale, Scale::Band(_)));
}

#[test]
fn repeated_derivation_is_deterministic() {
    let table = sales();
    let dims = [Dimension::new(["units"], (0.0, 100.0))];
    let a = derive_scales(&dims, &table).unwrap();
    let b = derive_scales(&dims, &table).unwrap();
    assert_eq!(a, b);
}
