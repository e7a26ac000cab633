//! Tests for HierarchyBuilder

use std::collections::HashSet;

use rstest::{fixture, rstest};

use organigram::domain::{
    DomainError, HierarchyBuilder, HierarchyOptions, NodeKind, Person, RootFallback,
    DEFAULT_ROOT_LABEL,
};
use organigram::util::testing;

fn person(first: &str, last: &str, supervisor: &str) -> Person {
    Person::from_fields(1, Some(first), Some(last), Some(supervisor)).expect("valid person")
}

#[fixture]
fn small_team() -> Vec<Person> {
    testing::init_test_setup();
    vec![
        person("Anna", "Muller", ""),
        person("Ben", "Schmidt", "Anna Muller"),
        person("Cara", "Klein", "Anna Muller"),
    ]
}

#[rstest]
fn given_small_team_when_building_then_anna_is_root_with_two_reports(small_team: Vec<Person>) {
    // Act
    let h = HierarchyBuilder::default().build(&small_team).unwrap();

    // Assert
    assert_eq!(h.root_name(), "Anna Muller");
    assert!(!h.is_synthetic_root());
    assert!(!h.used_fallback());
    assert_eq!(h.children_of("Anna Muller"), vec!["Ben Schmidt", "Cara Klein"]);
    assert_eq!(h.parent_of("Ben Schmidt"), Some("Anna Muller"));
    assert_eq!(h.parent_of("Anna Muller"), None);
    assert_eq!(h.len(), 3);
}

#[test]
fn given_two_unlisted_supervisors_when_building_then_sentinel_joins_them() {
    // Arrange
    let people = vec![
        person("Ben", "Schmidt", "Anna Weber"),
        person("Cara", "Klein", "Otto Brandt"),
        person("Dora", "Lang", "Anna Weber"),
    ];

    // Act
    let h = HierarchyBuilder::default().build(&people).unwrap();

    // Assert
    assert_eq!(h.root_name(), DEFAULT_ROOT_LABEL);
    assert!(h.is_synthetic_root());
    assert_eq!(h.top_level(), ["Anna Weber", "Otto Brandt"]);
    assert_eq!(
        h.children_of(DEFAULT_ROOT_LABEL),
        vec!["Anna Weber", "Otto Brandt"]
    );
    assert_eq!(h.children_of("Anna Weber"), vec!["Ben Schmidt", "Dora Lang"]);
    let otto = h.get("Otto Brandt").unwrap();
    assert_eq!(
        h.tree().get_node(otto).unwrap().data.kind,
        NodeKind::Unlisted
    );
}

#[test]
fn given_single_unlisted_supervisor_when_building_then_sentinel_on_top() {
    // Arrange
    let people = vec![
        person("Ben", "Schmidt", "Anna Weber"),
        person("Cara", "Klein", "Anna Weber"),
    ];

    // Act
    let h = HierarchyBuilder::default().build(&people).unwrap();

    // Assert
    assert_eq!(h.root_name(), DEFAULT_ROOT_LABEL);
    assert!(h.is_synthetic_root());
    assert_eq!(h.top_level(), ["Anna Weber"]);
    assert_eq!(h.children_of(DEFAULT_ROOT_LABEL), vec!["Anna Weber"]);
    assert_eq!(h.children_of("Anna Weber"), vec!["Ben Schmidt", "Cara Klein"]);
    assert_eq!(h.parent_of("Anna Weber"), Some(DEFAULT_ROOT_LABEL));
}

#[test]
fn given_unlisted_supervisor_and_unsupervised_person_when_building_then_both_under_sentinel() {
    // Arrange
    let people = vec![
        person("Anna", "Muller", ""),
        person("Ben", "Schmidt", "Otto Brandt"),
    ];

    // Act
    let h = HierarchyBuilder::default().build(&people).unwrap();

    // Assert
    assert_eq!(
        h.children_of(DEFAULT_ROOT_LABEL),
        vec!["Otto Brandt", "Anna Muller"]
    );
}

#[test]
fn given_custom_root_label_when_building_then_sentinel_uses_label() {
    // Arrange
    let people = vec![person("Anna", "Muller", ""), person("Otto", "Brandt", "")];
    let builder = HierarchyBuilder::new(HierarchyOptions {
        root_label: "Company".into(),
        ..Default::default()
    });

    // Act
    let h = builder.build(&people).unwrap();

    // Assert
    assert_eq!(h.root_name(), "Company");
    assert_eq!(h.children_of("Company"), vec!["Anna Muller", "Otto Brandt"]);
}

#[test]
fn given_person_named_like_sentinel_when_synthesizing_then_collision() {
    // Arrange
    let people = vec![
        person("Schalke", "04", ""),
        person("Otto", "Brandt", ""),
    ];

    // Act
    let result = HierarchyBuilder::default().build(&people);

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::SentinelCollision(DEFAULT_ROOT_LABEL.to_string())
    );
}

#[test]
fn given_closed_loop_when_first_sorted_fallback_then_smallest_supervisor_is_root() {
    // Arrange: everybody has a listed supervisor
    let people = vec![
        person("Zoe", "Maier", "Anna Muller"),
        person("Anna", "Muller", "Zoe Maier"),
        person("Ben", "Schmidt", "Anna Muller"),
    ];

    // Act
    let h = HierarchyBuilder::default().build(&people).unwrap();

    // Assert
    assert!(h.used_fallback());
    assert_eq!(h.root_name(), "Anna Muller");
    assert_eq!(h.children_of("Anna Muller"), vec!["Zoe Maier", "Ben Schmidt"]);
    assert_eq!(h.parent_of("Anna Muller"), None);
}

#[test]
fn given_closed_loop_when_reject_fallback_then_no_top_level() {
    // Arrange
    let people = vec![
        person("Zoe", "Maier", "Anna Muller"),
        person("Anna", "Muller", "Zoe Maier"),
    ];
    let builder = HierarchyBuilder::new(HierarchyOptions {
        fallback: RootFallback::Reject,
        ..Default::default()
    });

    // Act
    let result = builder.build(&people);

    // Assert
    assert_eq!(result.unwrap_err(), DomainError::NoTopLevel);
}

#[test]
fn given_detached_cycle_when_building_then_cycle_detected() {
    // Arrange: Ben and Cara report to each other, Anna is top level
    let people = vec![
        person("Anna", "Muller", ""),
        person("Ben", "Schmidt", "Cara Klein"),
        person("Cara", "Klein", "Ben Schmidt"),
    ];

    // Act
    let result = HierarchyBuilder::default().build(&people);

    // Assert
    assert!(matches!(result, Err(DomainError::CycleDetected(_))));
}

#[test]
fn given_identical_duplicate_rows_when_building_then_collapsed() {
    // Arrange
    let people = vec![
        person("Anna", "Muller", ""),
        person("Ben", "Schmidt", "Anna Muller"),
        person("Ben", "Schmidt", "Anna Muller"),
    ];

    // Act
    let h = HierarchyBuilder::default().build(&people).unwrap();

    // Assert
    assert_eq!(h.len(), 2);
    assert_eq!(h.children_of("Anna Muller"), vec!["Ben Schmidt"]);
}

#[test]
fn given_conflicting_duplicate_rows_when_building_then_duplicate_person() {
    // Arrange
    let people = vec![
        person("Anna", "Muller", ""),
        person("Otto", "Brandt", "Anna Muller"),
        person("Ben", "Schmidt", "Anna Muller"),
        person("Ben", "Schmidt", "Otto Brandt"),
    ];

    // Act
    let result = HierarchyBuilder::default().build(&people);

    // Assert
    assert_eq!(
        result.unwrap_err(),
        DomainError::DuplicatePerson {
            name: "Ben Schmidt".into()
        }
    );
}

#[test]
fn given_no_rows_when_building_then_empty_hierarchy() {
    let result = HierarchyBuilder::default().build(&[]);
    assert_eq!(result.unwrap_err(), DomainError::EmptyHierarchy);
}

#[rstest]
#[case::single_root(vec![("Anna", "Muller", ""), ("Ben", "Schmidt", "Anna Muller")], 2)]
#[case::unlisted_boss(vec![("Ben", "Schmidt", "Anna Muller"), ("Cara", "Klein", "Ben Schmidt")], 4)]
#[case::two_roots(vec![("Anna", "Muller", ""), ("Otto", "Brandt", ""), ("Ben", "Schmidt", "Otto Brandt")], 4)]
#[case::deep_chain(vec![
    ("Anna", "Muller", ""),
    ("Ben", "Schmidt", "Anna Muller"),
    ("Cara", "Klein", "Ben Schmidt"),
    ("Dora", "Lang", "Cara Klein"),
], 4)]
fn given_valid_rows_when_building_then_every_name_once_under_single_root(
    #[case] rows: Vec<(&str, &str, &str)>,
    #[case] expected_nodes: usize,
) {
    // Arrange
    testing::init_test_setup();
    let people: Vec<Person> = rows.iter().map(|(f, l, s)| person(f, l, s)).collect();

    // Act
    let h = HierarchyBuilder::default().build(&people).unwrap();

    // Assert
    let names: Vec<&str> = h.tree().iter().map(|(_, n)| n.data.name.as_str()).collect();
    let unique: HashSet<&str> = names.iter().copied().collect();
    assert_eq!(names.len(), expected_nodes);
    assert_eq!(unique.len(), names.len());
    let roots = h
        .tree()
        .iter()
        .filter(|(_, n)| n.parent.is_none())
        .count();
    assert_eq!(roots, 1);
    for p in &people {
        assert!(h.get(&p.full_name()).is_some(), "{} missing", p.full_name());
    }
}

#[rstest]
fn given_same_rows_when_building_twice_then_identical_edges(small_team: Vec<Person>) {
    let first = HierarchyBuilder::default().build(&small_team).unwrap();
    let second = HierarchyBuilder::default().build(&small_team).unwrap();
    assert_eq!(first.edges(), second.edges());
}
