//! Dependency graph over (entity, attribute) nodes.
//!
//! A modifier's magnitude is read from its source entity, so a node that is
//! itself modified must be evaluated before any node it feeds. Cycles are a
//! fatal configuration error detected structurally before evaluation; the
//! resolver is a single-pass evaluator, not a fixpoint solver.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::catalog::AttrId;

use super::modifier::{EntityId, Modifier};

pub type AttrNode = (EntityId, AttrId);

/// Topologically order every modified node, or return the cycle.
pub fn evaluation_order(modifiers: &[Modifier]) -> Result<Vec<AttrNode>, Vec<AttrNode>> {
    let targets: BTreeSet<AttrNode> = modifiers
        .iter()
        .map(|m| (m.target, m.dst_attr))
        .collect();

    // Edges between modified nodes only: an unmodified source reads straight
    // from base attributes and cannot participate in a cycle.
    let mut dependents: BTreeMap<AttrNode, Vec<AttrNode>> = BTreeMap::new();
    let mut indegree: BTreeMap<AttrNode, usize> = targets.iter().map(|n| (*n, 0)).collect();
    let mut edges: BTreeSet<(AttrNode, AttrNode)> = BTreeSet::new();

    for modifier in modifiers {
        let source: AttrNode = (modifier.source, modifier.src_attr);
        let target: AttrNode = (modifier.target, modifier.dst_attr);
        if !targets.contains(&source) || source == target {
            // Self-referential magnitudes (source node == target node) would
            // be a cycle of length one; treat them as one below.
            if source == target && targets.contains(&source) {
                return Err(vec![source, target]);
            }
            continue;
        }
        if edges.insert((source, target)) {
            dependents.entry(source).or_default().push(target);
            *indegree.entry(target).or_default() += 1;
        }
    }

    let mut queue: VecDeque<AttrNode> = indegree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(node, _)| *node)
        .collect();
    let mut order = Vec::with_capacity(targets.len());

    while let Some(node) = queue.pop_front() {
        order.push(node);
        if let Some(children) = dependents.get(&node) {
            for child in children {
                let degree = indegree.get_mut(child).expect("child is a target node");
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(*child);
                }
            }
        }
    }

    if order.len() == targets.len() {
        return Ok(order);
    }

    // Leftover nodes all sit on or behind a cycle; walk dependency edges
    // among them until a node repeats to extract a concrete path.
    let remaining: BTreeSet<AttrNode> = targets
        .iter()
        .filter(|node| !order.contains(node))
        .copied()
        .collect();
    Err(extract_cycle(&remaining, &edges))
}

fn extract_cycle(
    remaining: &BTreeSet<AttrNode>,
    edges: &BTreeSet<(AttrNode, AttrNode)>,
) -> Vec<AttrNode> {
    let start = *remaining.iter().next().expect("cycle set is non-empty");
    let mut path = vec![start];
    let mut seen: BTreeSet<AttrNode> = BTreeSet::new();
    seen.insert(start);
    let mut current = start;

    loop {
        let next = edges
            .iter()
            .find(|(from, to)| *from == current && remaining.contains(to))
            .map(|(_, to)| *to);
        let Some(next) = next else {
            // Shouldn't happen for a true cycle; return what we walked.
            return path;
        };
        path.push(next);
        if !seen.insert(next) {
            // Trim the lead-in so the path starts at the repeated node.
            let entry = path.iter().position(|n| *n == next).unwrap_or(0);
            return path.split_off(entry);
        }
        current = next;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{AttrId, EffectId, Operation};
    use crate::fit::SlotKind;

    fn modifier(
        source: EntityId,
        src_attr: u16,
        target: EntityId,
        dst_attr: u16,
    ) -> Modifier {
        Modifier {
            effect: EffectId(0),
            source,
            src_attr: AttrId(src_attr),
            target,
            dst_attr: AttrId(dst_attr),
            op: Operation::PostMul,
            penalty_group: None,
            skill_level: None,
        }
    }

    const M0: EntityId = EntityId::Module(SlotKind::High, 0);
    const M1: EntityId = EntityId::Module(SlotKind::High, 1);

    #[test]
    fn chain_orders_source_before_dependent() {
        // skill boosts M0.50, M0.50 feeds ship.60
        let mods = vec![
            modifier(M0, 50, EntityId::Ship, 60),
            modifier(EntityId::Skill(crate::catalog::ItemId(1)), 40, M0, 50),
        ];
        let order = evaluation_order(&mods).unwrap();
        let pos_m0 = order.iter().position(|n| *n == (M0, AttrId(50))).unwrap();
        let pos_ship = order
            .iter()
            .position(|n| *n == (EntityId::Ship, AttrId(60)))
            .unwrap();
        assert!(pos_m0 < pos_ship);
    }

    #[test]
    fn two_node_cycle_is_detected() {
        let mods = vec![
            modifier(M0, 50, M1, 51),
            modifier(M1, 51, M0, 50),
        ];
        let cycle = evaluation_order(&mods).unwrap_err();
        assert!(cycle.len() >= 2);
        assert_eq!(cycle.first(), cycle.last());
    }

    #[test]
    fn self_referential_node_is_a_cycle() {
        let mods = vec![modifier(M0, 50, M0, 50)];
        assert!(evaluation_order(&mods).is_err());
    }

    #[test]
    fn independent_nodes_all_appear() {
        let mods = vec![
            modifier(M0, 50, EntityId::Ship, 60),
            modifier(M1, 50, EntityId::Ship, 61),
        ];
        let order = evaluation_order(&mods).unwrap();
        assert_eq!(order.len(), 2);
    }
}
