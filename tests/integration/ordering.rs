//! Integration tests for block ordering against compatibility tables

use sitesmith::catalog::builtin;
use sitesmith::ordering::{BlockOrderer, CompatibilityTable, PredecessorPolicy};

fn position(order: &[String], block_type: &str) -> usize {
    order.iter().position(|t| t == block_type).unwrap()
}

/// Every predecessor lands before the blocks that require it
#[test]
fn test_builtin_table_respects_predecessors() {
    let table = builtin::compatibility();
    let orderer = BlockOrderer::new(table.clone());
    let input = [
        "footer",
        "contact",
        "cta",
        "pricing",
        "testimonials",
        "gallery",
        "features",
        "services",
        "hero",
        "header",
    ];

    let result = orderer.order(&input);
    assert!(!result.partially_ordered);
    assert_eq!(result.order.len(), input.len());

    for block_type in &result.order {
        for requirement in table.requirements(block_type) {
            assert!(
                position(&result.order, requirement) < position(&result.order, block_type),
                "{requirement} should precede {block_type}"
            );
        }
    }
    assert_eq!(result.order.last().map(String::as_str), Some("footer"));
}

/// Duplicate block types are placed once
#[test]
fn test_duplicates_are_collapsed() {
    let orderer = BlockOrderer::new(builtin::compatibility());
    let result = orderer.order(&["hero", "header", "hero"]);
    assert_eq!(result.order, vec!["header", "hero"]);
}

/// Under the strict policy a missing predecessor stalls ordering
#[test]
fn test_strict_policy_stalls_on_missing_predecessor() {
    let orderer = BlockOrderer::new(builtin::compatibility());
    let result = orderer.order(&["hero", "cta"]);
    assert!(result.partially_ordered);
    assert_eq!(result.order, vec!["hero", "cta"]);
}

/// Missing predecessors are ignored when only present blocks count
#[test]
fn test_present_only_policy_ignores_missing_predecessors() {
    let orderer =
        BlockOrderer::new(builtin::compatibility()).with_policy(PredecessorPolicy::PresentOnly);
    let result = orderer.order(&["contact", "hero", "cta"]);
    assert!(!result.partially_ordered);
    assert_eq!(result.order, vec!["hero", "cta", "contact"]);
}

/// A cycle terminates and keeps every block
#[test]
fn test_cycle_terminates() {
    let table = CompatibilityTable::new()
        .with("header", &[])
        .with("a", &["b"])
        .with("b", &["a"]);
    let result = BlockOrderer::new(table).order(&["a", "header", "b"]);

    assert!(result.partially_ordered);
    assert_eq!(result.order, vec!["header", "a", "b"]);
}

/// Empty input gives an empty, fully ordered result
#[test]
fn test_empty_input() {
    let result = BlockOrderer::new(builtin::compatibility()).order::<&str>(&[]);
    assert!(result.order.is_empty());
    assert!(!result.partially_ordered);
}
