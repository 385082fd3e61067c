use super::*;

enum Nested {
    Leaf(u32),
    Group(Vec<Nested>),
}

fn nest(depth: usize) -> Nested {
    let mut node = Nested::Leaf(1);
    for _ in 0..depth {
        node = Nested::Group(vec![node]);
    }
    node
}

fn sum(node: &Nested) -> u64 {
    ensure_sufficient_stack(|| match node {
        Nested::Leaf(n) => u64::from(*n),
        Nested::Group(children) => children.iter().map(sum).sum::<u64>() + 1,
    })
}

fn depth(node: &Nested) -> usize {
    ensure_sufficient_stack(|| match node {
        Nested::Leaf(_) => 0,
        Nested::Group(children) => children.iter().map(depth).max().unwrap_or(0) + 1,
    })
}

/// Drop glue recurses too; tear the tree down iteratively.
fn dismantle(node: Nested) {
    let mut pending = vec![node];
    while let Some(node) = pending.pop() {
        if let Nested::Group(children) = node {
            pending.extend(children);
        }
    }
}

#[test]
fn test_shallow_tree() {
    let tree = Nested::Group(vec![Nested::Leaf(2), Nested::Leaf(3)]);
    assert_eq!(sum(&tree), 6);
}

#[test]
fn test_deeply_nested_tree() {
    let tree = nest(100_000);
    assert_eq!(depth(&tree), 100_000);
    assert_eq!(sum(&tree), 100_001);
    dismantle(tree);
}

#[test]
fn test_passes_results_through() {
    let result: Result<i32, &str> = ensure_sufficient_stack(|| Err("boom"));
    assert_eq!(result, Err("boom"));
}

#[test]
#[cfg(not(target_arch = "wasm32"))]
fn test_remaining_stack_is_reported() {
    assert!(remaining_stack().is_some());
}
