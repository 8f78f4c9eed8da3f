//! Module dependency graph and recursive-field analysis.
//!
//! Two graphs are built with `petgraph` from the registry:
//!
//! - The module graph has one node per module and an edge `A -> B` whenever a
//!   declaration in `A` mentions a declaration in `B`. A strongly connected
//!   component with more than one module is a cycle the generated module tree
//!   cannot express, and is fatal.
//! - The by-value type graph links a declaration to every declaration it
//!   stores inline. Any slot whose owner and target share a cyclic component
//!   must be emitted behind an owned box.

use crate::error::CycleError;
use crate::registry::TypeRegistry;
use crate::types::{DefinitionKind, QualifiedName};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, BTreeSet, HashMap, VecDeque};

/// A cross-module dependency cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleCycle {
    /// Participating modules, sorted.
    pub modules: Vec<String>,
    /// One witness reference per module edge closing the cycle.
    pub chain: Vec<String>,
}

impl From<ModuleCycle> for CycleError {
    fn from(cycle: ModuleCycle) -> Self {
        Self {
            modules: cycle.modules,
            chain: cycle.chain,
        }
    }
}

/// Directed graph of module dependencies.
#[derive(Debug, Clone, Default)]
pub struct ModuleGraph {
    graph: DiGraph<String, BTreeSet<(QualifiedName, QualifiedName)>>,
    nodes: BTreeMap<String, NodeIndex>,
}

impl ModuleGraph {
    /// Creates an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the module graph of every reference in the registry.
    #[must_use]
    pub fn from_registry(registry: &TypeRegistry) -> Self {
        let mut graph = Self::new();
        for module in registry.modules() {
            graph.add_module(module);
        }
        for definition in registry.definitions() {
            let owner = definition.name();
            for (_, reference) in definition.references() {
                reference.for_each_local(&mut |target| graph.add_dependency(owner, target));
            }
        }
        graph
    }

    /// Adds a module node if it does not exist yet.
    pub fn add_module(&mut self, module: &str) -> NodeIndex {
        if let Some(index) = self.nodes.get(module) {
            return *index;
        }
        let index = self.graph.add_node(module.to_string());
        self.nodes.insert(module.to_string(), index);
        index
    }

    /// Records that `from` references `to`.
    ///
    /// References within one module add no edge.
    pub fn add_dependency(&mut self, from: &QualifiedName, to: &QualifiedName) {
        if from.module == to.module {
            return;
        }
        let source = self.add_module(&from.module);
        let target = self.add_module(&to.module);
        let witness = (from.clone(), to.clone());
        match self.graph.find_edge(source, target) {
            Some(edge) => {
                self.graph[edge].insert(witness);
            }
            None => {
                self.graph.add_edge(source, target, BTreeSet::from([witness]));
            }
        }
    }

    /// Returns the number of modules.
    #[must_use]
    pub fn module_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns the modules `module` depends on, sorted.
    #[must_use]
    pub fn dependencies(&self, module: &str) -> Vec<&str> {
        let Some(index) = self.nodes.get(module) else {
            return Vec::new();
        };
        let mut deps: Vec<&str> = self
            .graph
            .neighbors(*index)
            .map(|n| self.graph[n].as_str())
            .collect();
        deps.sort_unstable();
        deps
    }

    /// Finds every cross-module cycle.
    ///
    /// Each strongly connected component with more than one module is
    /// reported once. The result is sorted by the smallest module name.
    #[must_use]
    pub fn cycles(&self) -> Vec<ModuleCycle> {
        let mut cycles: Vec<ModuleCycle> = tarjan_scc(&self.graph)
            .into_iter()
            .filter(|component| component.len() > 1)
            .map(|component| self.describe_cycle(&component))
            .collect();
        cycles.sort_by(|a, b| a.modules.cmp(&b.modules));
        cycles
    }

    /// Checks that the module graph is acyclic.
    ///
    /// # Errors
    /// Returns the first `CycleError` found.
    pub fn check_acyclic(&self) -> Result<(), CycleError> {
        match self.cycles().into_iter().next() {
            Some(cycle) => Err(cycle.into()),
            None => Ok(()),
        }
    }

    fn describe_cycle(&self, component: &[NodeIndex]) -> ModuleCycle {
        let members: BTreeSet<NodeIndex> = component.iter().copied().collect();
        let mut modules: Vec<String> = component.iter().map(|n| self.graph[*n].clone()).collect();
        modules.sort();

        // Shortest path from the smallest module back to itself, inside the component.
        let start = self.nodes[&modules[0]];
        let mut parent: HashMap<NodeIndex, NodeIndex> = HashMap::new();
        let mut queue = VecDeque::from([start]);
        let mut closing = None;
        while let Some(node) = queue.pop_front() {
            let mut neighbors: Vec<NodeIndex> = self
                .graph
                .neighbors(node)
                .filter(|n| members.contains(n))
                .collect();
            neighbors.sort_by(|a, b| self.graph[*a].cmp(&self.graph[*b]));
            for next in neighbors {
                if next == start {
                    closing = Some(node);
                    break;
                }
                if !parent.contains_key(&next) {
                    parent.insert(next, node);
                    queue.push_back(next);
                }
            }
            if closing.is_some() {
                break;
            }
        }

        let mut path = Vec::new();
        if let Some(last) = closing {
            let mut node = last;
            path.push(node);
            while node != start {
                node = parent[&node];
                path.push(node);
            }
            path.reverse();
            path.push(start);
        }

        let chain = path
            .windows(2)
            .filter_map(|pair| self.graph.find_edge(pair[0], pair[1]))
            .filter_map(|edge| self.graph[edge].iter().next())
            .map(|(from, to)| format!("{from} -> {to}"))
            .collect();

        ModuleCycle { modules, chain }
    }
}

/// Member slots that must be emitted behind an owned box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Indirections {
    boxed: BTreeSet<(QualifiedName, String)>,
}

impl Indirections {
    /// Analyzes the by-value type graph of a registry.
    ///
    /// A slot stores its target by value when the target is referenced
    /// directly, through `optional`, or through an external fallback. Lists,
    /// sets and maps already allocate and never need a box.
    #[must_use]
    pub fn analyze(registry: &TypeRegistry) -> Self {
        let mut graph: DiGraph<&QualifiedName, ()> = DiGraph::new();
        let mut nodes: BTreeMap<&QualifiedName, NodeIndex> = BTreeMap::new();
        for definition in registry.definitions() {
            if definition.kind() != DefinitionKind::Error {
                nodes.insert(definition.name(), graph.add_node(definition.name()));
            }
        }

        let mut slots = Vec::new();
        for definition in registry.definitions() {
            let Some(&owner) = nodes.get(definition.name()) else {
                continue;
            };
            for (member, reference) in definition.references() {
                if let Some(&target) = reference.by_value_local().and_then(|t| nodes.get(t)) {
                    graph.update_edge(owner, target, ());
                    slots.push((owner, target, definition.name(), member));
                }
            }
        }

        let mut component_of: HashMap<NodeIndex, usize> = HashMap::new();
        for (id, component) in tarjan_scc(&graph).into_iter().enumerate() {
            let cyclic = component.len() > 1
                || component
                    .first()
                    .is_some_and(|n| graph.find_edge(*n, *n).is_some());
            if cyclic {
                for node in component {
                    component_of.insert(node, id);
                }
            }
        }

        let boxed = slots
            .into_iter()
            .filter(|(owner, target, _, _)| {
                matches!(
                    (component_of.get(owner), component_of.get(target)),
                    (Some(a), Some(b)) if a == b
                )
            })
            .map(|(_, _, name, member)| (name.clone(), member.to_string()))
            .collect();

        Self { boxed }
    }

    /// Returns true if the member slot of `owner` must be boxed.
    #[must_use]
    pub fn needs_box(&self, owner: &QualifiedName, member: &str) -> bool {
        self.boxed.contains(&(owner.clone(), member.to_string()))
    }

    /// Returns true if the target of alias `owner` must be boxed.
    #[must_use]
    pub fn alias_needs_box(&self, owner: &QualifiedName) -> bool {
        self.needs_box(owner, "")
    }

    /// Returns the number of boxed slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.boxed.len()
    }

    /// Returns true if no slot needs a box.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.boxed.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{
        AliasDef, FieldDefinition, MemberDefinition, ObjectDef, PrimitiveKind, TypeDefinition,
        TypeReference, UnionDef,
    };

    fn q(module: &str, name: &str) -> QualifiedName {
        QualifiedName::new(module, name)
    }

    fn object(name: QualifiedName, fields: Vec<(&str, TypeReference)>) -> TypeDefinition {
        TypeDefinition::Object(ObjectDef {
            name,
            fields: fields
                .into_iter()
                .map(|(f, t)| FieldDefinition {
                    name: f.to_string(),
                    type_ref: t,
                    docs: None,
                    safety: None,
                })
                .collect(),
            docs: None,
        })
    }

    #[test]
    fn test_three_module_cycle() {
        let mut graph = ModuleGraph::new();
        graph.add_dependency(&q("a", "X"), &q("b", "Y"));
        graph.add_dependency(&q("b", "Y"), &q("c", "Z"));
        graph.add_dependency(&q("c", "Z"), &q("a", "X"));

        let cycles = graph.cycles();
        assert_eq!(cycles.len(), 1);
        assert_eq!(cycles[0].modules, vec!["a", "b", "c"]);
        assert_eq!(
            cycles[0].chain,
            vec!["a.X -> b.Y", "b.Y -> c.Z", "c.Z -> a.X"]
        );
        assert!(graph.check_acyclic().is_err());
    }

    #[test]
    fn test_acyclic_modules() {
        let mut graph = ModuleGraph::new();
        graph.add_dependency(&q("a", "X"), &q("b", "Y"));
        graph.add_dependency(&q("b", "Y"), &q("c", "Z"));

        assert!(graph.cycles().is_empty());
        assert!(graph.check_acyclic().is_ok());
        assert_eq!(graph.dependencies("a"), vec!["b"]);
        assert_eq!(graph.module_count(), 3);
    }

    #[test]
    fn test_intra_module_reference_is_not_a_cycle() {
        let mut graph = ModuleGraph::new();
        graph.add_dependency(&q("a", "X"), &q("a", "X"));
        graph.add_dependency(&q("a", "X"), &q("a", "Y"));
        assert!(graph.cycles().is_empty());
        assert!(graph.dependencies("a").is_empty());
    }

    #[test]
    fn test_from_registry_detects_cycle_through_list() {
        let registry = TypeRegistry::build(vec![
            object(
                q("com.one", "A"),
                vec![("b", TypeReference::List(Box::new(TypeReference::Local(q("com.two", "B")))))],
            ),
            object(
                q("com.two", "B"),
                vec![("a", TypeReference::Local(q("com.one", "A")))],
            ),
        ])
        .expect("Failed to build");

        let error = ModuleGraph::from_registry(&registry)
            .check_acyclic()
            .expect_err("should detect cycle");
        assert_eq!(error.modules, vec!["com.one", "com.two"]);
        assert_eq!(error.chain.len(), 2);
    }

    #[test]
    fn test_self_reference_boxes_by_value_slots_only() {
        let node = q("com.tree", "TreeNode");
        let registry = TypeRegistry::build(vec![object(
            node.clone(),
            vec![
                (
                    "children",
                    TypeReference::List(Box::new(TypeReference::Local(node.clone()))),
                ),
                (
                    "parent",
                    TypeReference::Optional(Box::new(TypeReference::Local(node.clone()))),
                ),
                ("label", TypeReference::Primitive(PrimitiveKind::String)),
            ],
        )])
        .expect("Failed to build");

        let indirections = Indirections::analyze(&registry);
        assert!(indirections.needs_box(&node, "parent"));
        assert!(!indirections.needs_box(&node, "children"));
        assert!(!indirections.needs_box(&node, "label"));
        assert_eq!(indirections.len(), 1);
    }

    #[test]
    fn test_mutual_recursion_through_union_and_alias() {
        let expr = q("com.calc", "Expr");
        let wrapped = q("com.calc", "Wrapped");
        let leaf = q("com.calc", "Leaf");
        let registry = TypeRegistry::build(vec![
            TypeDefinition::Union(UnionDef {
                name: expr.clone(),
                members: vec![
                    MemberDefinition {
                        tag: "negate".to_string(),
                        type_ref: TypeReference::Local(wrapped.clone()),
                        docs: None,
                    },
                    MemberDefinition {
                        tag: "leaf".to_string(),
                        type_ref: TypeReference::Local(leaf.clone()),
                        docs: None,
                    },
                ],
                docs: None,
            }),
            TypeDefinition::Alias(AliasDef {
                name: wrapped.clone(),
                target: TypeReference::Local(expr.clone()),
                docs: None,
            }),
            object(
                leaf.clone(),
                vec![("value", TypeReference::Primitive(PrimitiveKind::Integer))],
            ),
        ])
        .expect("Failed to build");

        let indirections = Indirections::analyze(&registry);
        assert!(indirections.needs_box(&expr, "negate"));
        assert!(indirections.alias_needs_box(&wrapped));
        assert!(!indirections.needs_box(&expr, "leaf"));
    }

    #[test]
    fn test_no_recursion_no_boxes() {
        let registry = TypeRegistry::build(vec![
            object(q("m", "A"), vec![("b", TypeReference::Local(q("m", "B")))]),
            object(q("m", "B"), vec![]),
        ])
        .expect("Failed to build");
        assert!(Indirections::analyze(&registry).is_empty());
    }
}
