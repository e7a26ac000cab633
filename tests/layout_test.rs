//! Tests for dendrogram layout

use rstest::rstest;

use organigram::domain::{
    compute_layout, levels, Hierarchy, HierarchyBuilder, LayoutKind, LayoutOptions, Person,
};
use organigram::util::testing;

const EPS: f64 = 1e-9;

fn build(rows: &[(&str, &str, &str)]) -> Hierarchy {
    testing::init_test_setup();
    let people: Vec<Person> = rows
        .iter()
        .map(|(f, l, s)| Person::from_fields(1, Some(*f), Some(*l), Some(*s)).unwrap())
        .collect();
    HierarchyBuilder::default().build(&people).unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < EPS,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn given_root_with_two_reports_when_layout_then_level_is_centered() {
    // Arrange
    let h = build(&[
        ("Anna", "Muller", ""),
        ("Ben", "Schmidt", "Anna Muller"),
        ("Cara", "Klein", "Anna Muller"),
    ]);

    // Act
    let layout = compute_layout(&h, &LayoutOptions::default());

    // Assert
    assert_eq!(layout.kind, LayoutKind::Dendrogram);
    let anna = layout.get("Anna Muller").unwrap();
    let ben = layout.get("Ben Schmidt").unwrap();
    let cara = layout.get("Cara Klein").unwrap();
    assert_close(anna.x, 0.0);
    assert_close(anna.y, 0.0);
    assert_close(ben.x, -0.5);
    assert_close(ben.y, -2.0);
    assert_close(cara.x, 0.5);
    assert_close(cara.y, -2.0);
}

#[test]
fn given_narrow_level_below_wide_level_when_layout_then_spacing_scaled() {
    // Arrange: level 1 has 3 nodes, level 2 has 1
    let h = build(&[
        ("Anna", "Muller", ""),
        ("Ben", "Schmidt", "Anna Muller"),
        ("Cara", "Klein", "Anna Muller"),
        ("Dora", "Lang", "Anna Muller"),
        ("Emil", "Roth", "Cara Klein"),
    ]);

    // Act
    let layout = compute_layout(&h, &LayoutOptions::default());

    // Assert
    let xs: Vec<f64> = layout.level(1).iter().map(|p| p.x).collect();
    assert_eq!(xs.len(), 3);
    assert_close(xs[0], -1.0);
    assert_close(xs[1], 0.0);
    assert_close(xs[2], 1.0);
    let emil = layout.get("Emil Roth").unwrap();
    assert_eq!(emil.depth, 2);
    assert_close(emil.x, 0.0);
    assert_close(emil.y, -4.0);
}

#[rstest]
#[case(1.0)]
#[case(2.0)]
#[case(3.5)]
fn given_level_height_when_layout_then_y_is_negative_depth_times_height(#[case] height: f64) {
    // Arrange
    let h = build(&[
        ("Anna", "Muller", ""),
        ("Ben", "Schmidt", "Anna Muller"),
        ("Cara", "Klein", "Ben Schmidt"),
    ]);
    let options = LayoutOptions {
        level_height: height,
        ..Default::default()
    };

    // Act
    let layout = compute_layout(&h, &options);

    // Assert
    for p in &layout.positions {
        assert_close(p.y, -(p.depth as f64) * height);
    }
}

#[test]
fn given_mixed_tree_when_layout_then_levels_symmetric_and_ordered() {
    // Arrange
    let h = build(&[
        ("Ben", "Schmidt", "Anna Weber"),
        ("Cara", "Klein", "Otto Brandt"),
        ("Dora", "Lang", "Anna Weber"),
        ("Emil", "Roth", "Dora Lang"),
        ("Fritz", "Bauer", "Dora Lang"),
    ]);

    // Act
    let layout = compute_layout(&h, &LayoutOptions::default());

    // Assert
    let depths = levels(h.tree());
    assert_eq!(layout.positions.len(), h.len());
    for depth in depths.keys() {
        let level = layout.level(*depth);
        let sum: f64 = level.iter().map(|p| p.x).sum();
        assert_close(sum, 0.0);
        assert!(level.windows(2).all(|w| w[0].x < w[1].x));
    }
    for a in &layout.positions {
        for b in &layout.positions {
            if a.depth < b.depth {
                assert!(a.y > b.y, "{} should be above {}", a.name, b.name);
            }
        }
    }
}

#[test]
fn given_single_person_when_layout_then_force_directed_at_origin() {
    // Arrange
    let h = build(&[("Anna", "Muller", "")]);

    // Act
    let layout = compute_layout(&h, &LayoutOptions::default());

    // Assert
    assert_eq!(layout.kind, LayoutKind::ForceDirected);
    assert_eq!(layout.positions.len(), 1);
    let anna = layout.get("Anna Muller").unwrap();
    assert_eq!(anna.depth, 0);
    assert_close(anna.x, 0.0);
    assert_close(anna.y, 0.0);
}

#[test]
fn given_tree_when_computing_levels_then_breadth_first_in_row_order() {
    // Arrange
    let h = build(&[
        ("Anna", "Muller", ""),
        ("Ben", "Schmidt", "Anna Muller"),
        ("Cara", "Klein", "Ben Schmidt"),
        ("Dora", "Lang", "Anna Muller"),
    ]);

    // Act
    let levels = levels(h.tree());

    // Assert
    let names = |d: usize| {
        levels[&d]
            .iter()
            .map(|&idx| h.tree().name(idx))
            .collect::<Vec<_>>()
    };
    assert_eq!(levels.len(), 3);
    assert_eq!(names(0), vec!["Anna Muller"]);
    assert_eq!(names(1), vec!["Ben Schmidt", "Dora Lang"]);
    assert_eq!(names(2), vec!["Cara Klein"]);
}

#[test]
fn given_wide_tree_when_looking_up_positions_then_index_and_name_agree() {
    // Arrange
    let names: Vec<String> = (0..400).map(|i| format!("Report{i:03}")).collect();
    let mut rows = vec![("Anna", "Muller", "")];
    rows.extend(names.iter().map(|n| (n.as_str(), "Lang", "Anna Muller")));
    let h = build(&rows);

    // Act
    let layout = compute_layout(&h, &LayoutOptions::default());

    // Assert
    assert_eq!(layout.positions.len(), 401);
    for (idx, node) in h.tree().iter() {
        let by_index = layout.position_of(idx).unwrap();
        let by_name = layout.get(&node.data.name).unwrap();
        assert_eq!(by_index, by_name);
        assert_eq!(by_index.index, idx);
    }
    assert!(layout.get("Nobody Here").is_none());
}
