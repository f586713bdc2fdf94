//! Type Model Linker
//!
//! Runs once over the complete Builder output:
//!
//! 1. type names are checked for uniqueness (shapes and auxiliary types)
//! 2. base shapes, shape references and `sh:class` targets are resolved
//! 3. abstract shapes collect their concrete descendants; unions are
//!    flattened to concrete leaves
//! 4. inheritance is flattened base-first, checking that overrides narrow
//! 5. by-value reference cycles are broken with `Box`
//! 6. shapes are ordered dependencies first (Tarjan SCC postorder)

use crate::error::LinkError;
use crate::model::{
    Enumeration, Primitive, PrimitiveUnion, PropertyType, ShapeKind, ShapeRef, ShapeType,
    ValueType,
};
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::{debug, debug_span, warn};

/// Supporting type generated next to the shape that declares it
#[derive(Debug, Clone, PartialEq)]
pub enum Auxiliary {
    Enumeration(Enumeration),
    PrimitiveUnion(PrimitiveUnion),
}

impl Auxiliary {
    pub fn name(&self) -> &str {
        match self {
            Auxiliary::Enumeration(e) => &e.name,
            Auxiliary::PrimitiveUnion(u) => &u.name,
        }
    }

    fn of(value: &ValueType) -> Option<Auxiliary> {
        match value {
            ValueType::Enumeration(e) => Some(Auxiliary::Enumeration(e.clone())),
            ValueType::PrimitiveUnion(u) => Some(Auxiliary::PrimitiveUnion(u.clone())),
            _ => None,
        }
    }
}

/// One emitted shape and the auxiliary types its own properties declare
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub shape: ShapeType,
    pub auxiliaries: Vec<Auxiliary>,
}

/// The linked model: every type to emit, dependencies first
#[derive(Debug, Clone, Default)]
pub struct LinkedModel {
    entries: Vec<Entry>,
    by_name: HashMap<String, usize>,
}

impl LinkedModel {
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn shapes(&self) -> impl Iterator<Item = &ShapeType> {
        self.entries.iter().map(|e| &e.shape)
    }

    pub fn shape(&self, name: &str) -> Option<&ShapeType> {
        self.by_name.get(name).map(|&i| &self.entries[i].shape)
    }

    /// Every generated type name, in emission order
    pub fn type_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        for entry in &self.entries {
            names.extend(entry.auxiliaries.iter().map(|a| a.name().to_string()));
            names.push(entry.shape.name.clone());
        }
        names
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Link the Builder output into an emittable model
pub fn link(shapes: Vec<ShapeType>) -> Result<LinkedModel, LinkError> {
    let _span = debug_span!("shapegen_link", shapes = shapes.len()).entered();
    check_type_names(&shapes)?;

    let mut linker = Linker::new(shapes);
    linker.resolve_bases()?;
    linker.collect_descendants();
    linker.resolve_references()?;
    linker.flatten_sums()?;
    linker.flatten_inheritance()?;
    linker.warn_indistinguishable_members();
    linker.box_recursive_edges();
    Ok(linker.finish())
}

fn check_type_names(shapes: &[ShapeType]) -> Result<(), LinkError> {
    let mut seen: BTreeMap<String, String> = BTreeMap::new();
    let mut claim = |name: &str, origin: String| match seen.get(name) {
        Some(first) => Err(LinkError::DuplicateTypeName {
            name: name.to_string(),
            first: first.clone(),
            second: origin,
        }),
        None => {
            seen.insert(name.to_string(), origin);
            Ok(())
        }
    };
    for shape in shapes {
        claim(&shape.name, shape.iri.clone())?;
    }
    for shape in shapes {
        for property in &shape.properties {
            if let Some(aux) = Auxiliary::of(&property.value) {
                claim(aux.name(), format!("{} property {}", shape.iri, property.name))?;
            }
        }
    }
    Ok(())
}

struct Linker {
    shapes: Vec<ShapeType>,
    by_iri: HashMap<String, usize>,
    /// Concrete descendants of each shape, in declaration order
    descendants: Vec<Vec<usize>>,
    /// Concrete leaves of each sum shape
    leaves: Vec<Vec<usize>>,
}

impl Linker {
    fn new(shapes: Vec<ShapeType>) -> Self {
        let by_iri = shapes
            .iter()
            .enumerate()
            .map(|(i, s)| (s.iri.clone(), i))
            .collect();
        let n = shapes.len();
        Self {
            shapes,
            by_iri,
            descendants: vec![Vec::new(); n],
            leaves: vec![Vec::new(); n],
        }
    }

    fn lookup(&self, referrer: &str, iri: &str) -> Result<usize, LinkError> {
        self.by_iri
            .get(iri)
            .copied()
            .ok_or_else(|| LinkError::DanglingReference {
                referrer: referrer.to_string(),
                target: iri.to_string(),
            })
    }

    fn parent(&self, i: usize) -> Option<usize> {
        self.shapes[i]
            .base
            .as_ref()
            .and_then(|b| self.by_iri.get(&b.iri).copied())
    }

    /// Ancestors, nearest first; only valid once cycles are ruled out
    fn ancestors(&self, i: usize) -> Vec<usize> {
        let mut out = Vec::new();
        let mut current = i;
        while let Some(parent) = self.parent(current) {
            out.push(parent);
            current = parent;
        }
        out
    }

    fn is_emitted(&self, i: usize) -> bool {
        self.shapes[i].kind != ShapeKind::Abstract || !self.descendants[i].is_empty()
    }

    fn shape_ref(&self, i: usize) -> ShapeRef {
        ShapeRef {
            iri: self.shapes[i].iri.clone(),
            name: Some(self.shapes[i].name.clone()),
            boxed: false,
        }
    }

    fn resolve_bases(&mut self) -> Result<(), LinkError> {
        for i in 0..self.shapes.len() {
            let Some(base) = self.shapes[i].base.clone() else {
                continue;
            };
            let target = self.lookup(&self.shapes[i].name, &base.iri)?;
            let target_shape = &self.shapes[target];
            if !(target_shape.kind.is_record() || target_shape.kind == ShapeKind::Abstract) {
                return Err(LinkError::NotARecord {
                    shape: self.shapes[i].name.clone(),
                    target: target_shape.name.clone(),
                });
            }
            let name = target_shape.name.clone();
            if let Some(base) = self.shapes[i].base.as_mut() {
                base.name = Some(name);
            }
        }

        for i in 0..self.shapes.len() {
            let mut seen = HashSet::from([i]);
            let mut current = i;
            while let Some(parent) = self.parent(current) {
                if !seen.insert(parent) {
                    return Err(LinkError::InheritanceCycle {
                        shape: self.shapes[parent].name.clone(),
                    });
                }
                current = parent;
            }
        }
        Ok(())
    }

    fn collect_descendants(&mut self) {
        for j in 0..self.shapes.len() {
            if !self.shapes[j].kind.is_record() {
                continue;
            }
            for ancestor in self.ancestors(j) {
                self.descendants[ancestor].push(j);
            }
        }
    }

    /// A reference to shape `target`; abstract shapes need concrete descendants
    fn resolve_ref(&self, referrer: &str, iri: &str) -> Result<ShapeRef, LinkError> {
        let target = self.lookup(referrer, iri)?;
        if !self.is_emitted(target) {
            return Err(LinkError::AbstractWithoutSubtypes {
                referrer: referrer.to_string(),
                shape: self.shapes[target].name.clone(),
            });
        }
        Ok(self.shape_ref(target))
    }

    /// First emitted shape declaring `class` as one of its types
    fn class_target(&self, class: &str) -> Option<usize> {
        (0..self.shapes.len())
            .find(|&i| self.is_emitted(i) && self.shapes[i].rdf_types.iter().any(|t| t == class))
    }

    fn resolve_value(&self, referrer: &str, value: &ValueType) -> Result<ValueType, LinkError> {
        Ok(match value {
            ValueType::Shape(r) => ValueType::Shape(self.resolve_ref(referrer, &r.iri)?),
            ValueType::Class(class) => match self.class_target(class) {
                Some(target) => {
                    debug!(referrer, class = %class, shape = %self.shapes[target].name, "resolved sh:class");
                    ValueType::Shape(self.shape_ref(target))
                }
                None => ValueType::Primitive(Primitive::Identifier),
            },
            other => other.clone(),
        })
    }

    fn resolve_references(&mut self) -> Result<(), LinkError> {
        for i in 0..self.shapes.len() {
            let referrer = self.shapes[i].name.clone();
            let mut properties = std::mem::take(&mut self.shapes[i].properties);
            for property in &mut properties {
                property.value = self.resolve_value(&referrer, &property.value)?;
            }
            self.shapes[i].properties = properties;
        }
        Ok(())
    }

    fn collect_leaves(
        &self,
        union: usize,
        member: usize,
        stack: &mut Vec<usize>,
        out: &mut Vec<usize>,
    ) -> Result<(), LinkError> {
        let union_name = &self.shapes[union].name;
        let push = |leaf: usize, out: &mut Vec<usize>| {
            if out.contains(&leaf) {
                return Err(LinkError::DiscriminantCollision {
                    union: union_name.clone(),
                    discriminant: self.shapes[leaf].name.clone(),
                });
            }
            out.push(leaf);
            Ok(())
        };
        match self.shapes[member].kind {
            ShapeKind::Record | ShapeKind::Interface => push(member, out),
            ShapeKind::Abstract => {
                if self.descendants[member].is_empty() {
                    return Err(LinkError::AbstractWithoutSubtypes {
                        referrer: union_name.clone(),
                        shape: self.shapes[member].name.clone(),
                    });
                }
                for &leaf in &self.descendants[member] {
                    if member != union {
                        debug!(union = %union_name, member = %self.shapes[leaf].name, "hoisted subtype into union");
                    }
                    push(leaf, out)?;
                }
                Ok(())
            }
            ShapeKind::Union => {
                if stack.contains(&member) {
                    return Err(LinkError::UnionCycle {
                        shape: union_name.clone(),
                    });
                }
                stack.push(member);
                for m in &self.shapes[member].members {
                    let target = self.lookup(&self.shapes[member].name, &m.iri)?;
                    if member != union {
                        debug!(union = %union_name, member = %self.shapes[target].name, "flattened union member");
                    }
                    self.collect_leaves(union, target, stack, out)?;
                }
                stack.pop();
                Ok(())
            }
        }
    }

    fn flatten_sums(&mut self) -> Result<(), LinkError> {
        for i in 0..self.shapes.len() {
            if !self.shapes[i].is_sum() || !self.is_emitted(i) {
                continue;
            }
            let mut leaves = Vec::new();
            self.collect_leaves(i, i, &mut Vec::new(), &mut leaves)?;
            self.shapes[i].members = leaves.iter().map(|&l| self.shape_ref(l)).collect();
            self.leaves[i] = leaves;
        }
        Ok(())
    }

    fn value_narrows(&self, child: &ValueType, parent: &ValueType) -> bool {
        match (child, parent) {
            _ if child == parent => true,
            (_, ValueType::Primitive(Primitive::Term)) => true,
            (ValueType::Shape(c), ValueType::Shape(p)) => {
                match (self.by_iri.get(&c.iri), self.by_iri.get(&p.iri)) {
                    (Some(&c), Some(&p)) => {
                        c == p || self.ancestors(c).contains(&p) || self.leaves[p].contains(&c)
                    }
                    _ => false,
                }
            }
            (ValueType::Enumeration(c), ValueType::Enumeration(p)) => c
                .members
                .iter()
                .all(|m| p.members.iter().any(|q| q.term == m.term)),
            (ValueType::Enumeration(c), ValueType::Primitive(Primitive::Identifier)) => {
                c.members.iter().all(|m| m.term.is_iri())
            }
            _ => false,
        }
    }

    fn check_override(
        &self,
        shape: &str,
        base: &str,
        inherited: &PropertyType,
        own: &PropertyType,
    ) -> Result<(), LinkError> {
        let illegal = |message: String| LinkError::IllegalOverride {
            shape: shape.to_string(),
            property: own.name.clone(),
            base: base.to_string(),
            message,
        };
        if !own.cardinality.narrows(inherited.cardinality) {
            return Err(illegal(format!(
                "cardinality {} is not within {}",
                own.cardinality, inherited.cardinality
            )));
        }
        if !self.value_narrows(&own.value, &inherited.value) {
            return Err(illegal(format!(
                "{} does not narrow {}",
                own.value.describe(),
                inherited.value.describe()
            )));
        }
        Ok(())
    }

    fn flatten_inheritance(&mut self) -> Result<(), LinkError> {
        let mut order: Vec<usize> = (0..self.shapes.len()).collect();
        order.sort_by_key(|&i| (self.ancestors(i).len(), i));

        for i in order {
            if let Some(b) = self.parent(i) {
                let name = self.shapes[i].name.clone();
                let base = &self.shapes[b];
                let mut effective = base.properties.clone();
                for own in &self.shapes[i].properties {
                    match effective.iter().position(|q| q.predicate == own.predicate) {
                        Some(k) => {
                            self.check_override(&name, &base.name, &effective[k], own)?;
                            debug!(shape = %name, property = %own.name, base = %base.name, "narrowed inherited property");
                            effective[k] = own.clone();
                        }
                        None => effective.push(own.clone()),
                    }
                }

                let mut inherited = Vec::new();
                for t in base.rdf_types.iter().chain(&base.inherited_types) {
                    if !self.shapes[i].rdf_types.contains(t) && !inherited.contains(t) {
                        inherited.push(t.clone());
                    }
                }
                debug!(
                    shape = %name,
                    base = %base.name,
                    inherited = effective.len() - self.shapes[i].properties.len(),
                    "flattened inheritance"
                );
                self.shapes[i].properties = effective;
                self.shapes[i].inherited_types = inherited;
            }

            let shape = &self.shapes[i];
            for (k, property) in shape.properties.iter().enumerate() {
                let clash = shape.properties[..k]
                    .iter()
                    .find(|q| q.name == property.name || q.field == property.field);
                if let Some(first) = clash {
                    return Err(LinkError::DuplicatePropertyName {
                        shape: shape.name.clone(),
                        name: property.name.clone(),
                        first: first.predicate.clone(),
                        second: property.predicate.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    fn warn_indistinguishable_members(&self) {
        for (i, shape) in self.shapes.iter().enumerate() {
            if shape.kind != ShapeKind::Union {
                continue;
            }
            let untyped: Vec<&str> = self.leaves[i]
                .iter()
                .filter(|&&l| self.shapes[l].check_types().is_empty())
                .map(|&l| self.shapes[l].name.as_str())
                .collect();
            if untyped.len() > 1 {
                warn!(
                    union = %shape.name,
                    members = %untyped.join(", "),
                    "union members declare no rdf:type; graph decoding takes the first member that matches"
                );
            }
        }
    }

    /// References held by value, as `(from, to, by_value)`
    fn edges(&self) -> Vec<(usize, usize, bool)> {
        let mut edges = Vec::new();
        for (i, shape) in self.shapes.iter().enumerate() {
            if shape.is_sum() {
                edges.extend(self.leaves[i].iter().map(|&l| (i, l, true)));
                continue;
            }
            for property in &shape.properties {
                if let Some(target) = property
                    .value
                    .shape_ref()
                    .and_then(|r| self.by_iri.get(&r.iri))
                {
                    edges.push((i, *target, !property.cardinality.is_many()));
                }
            }
        }
        edges
    }

    fn graph(&self, by_value_only: bool) -> DiGraph<usize, ()> {
        let mut graph = DiGraph::new();
        let nodes: Vec<NodeIndex> = (0..self.shapes.len()).map(|i| graph.add_node(i)).collect();
        for (from, to, by_value) in self.edges() {
            if by_value || !by_value_only {
                graph.add_edge(nodes[from], nodes[to], ());
            }
        }
        graph
    }

    fn box_recursive_edges(&mut self) {
        let graph = self.graph(true);
        let mut component = vec![0usize; self.shapes.len()];
        let mut cyclic = Vec::new();
        for (c, scc) in tarjan_scc(&graph).into_iter().enumerate() {
            let self_loop = scc.len() == 1 && graph.contains_edge(scc[0], scc[0]);
            cyclic.push(scc.len() > 1 || self_loop);
            for node in scc {
                component[graph[node]] = c;
            }
        }
        let recursive = |from: usize, to: usize| {
            component[from] == component[to] && cyclic[component[from]]
        };

        for i in 0..self.shapes.len() {
            let name = self.shapes[i].name.clone();
            let leaves = self.leaves[i].clone();
            let shape = &mut self.shapes[i];
            if shape.is_sum() {
                for (member, leaf) in shape.members.iter_mut().zip(leaves) {
                    if recursive(i, leaf) {
                        debug!(shape = %name, member = %member.type_name(), "boxed recursive member");
                        member.boxed = true;
                    }
                }
                continue;
            }
            for property in &mut shape.properties {
                if property.cardinality.is_many() {
                    continue;
                }
                let ValueType::Shape(r) = &mut property.value else {
                    continue;
                };
                if let Some(&target) = self.by_iri.get(&r.iri) {
                    if recursive(i, target) {
                        debug!(shape = %name, property = %property.name, "boxed recursive edge");
                        r.boxed = true;
                    }
                }
            }
        }
    }

    fn finish(self) -> LinkedModel {
        let graph = self.graph(false);
        let mut order = Vec::with_capacity(self.shapes.len());
        for scc in tarjan_scc(&graph) {
            let mut members: Vec<usize> = scc.into_iter().map(|n| graph[n]).collect();
            members.sort_unstable();
            order.extend(members);
        }

        let mut slots: Vec<Option<ShapeType>> = self.shapes.into_iter().map(Some).collect();
        let emitted: Vec<bool> = (0..slots.len())
            .map(|i| {
                slots[i]
                    .as_ref()
                    .is_some_and(|s| s.kind != ShapeKind::Abstract || !self.descendants[i].is_empty())
            })
            .collect();

        let mut model = LinkedModel::default();
        for i in order {
            if !emitted[i] {
                continue;
            }
            let Some(shape) = slots[i].take() else {
                continue;
            };
            let mut auxiliaries: Vec<Auxiliary> = Vec::new();
            for property in shape.properties.iter().filter(|p| p.declared_by == shape.name) {
                if let Some(aux) = Auxiliary::of(&property.value) {
                    if !auxiliaries.iter().any(|a| a.name() == aux.name()) {
                        auxiliaries.push(aux);
                    }
                }
            }
            model.by_name.insert(shape.name.clone(), model.entries.len());
            model.entries.push(Entry { shape, auxiliaries });
        }
        model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_shapes;
    use crate::config::ShapegenConfig;
    use crate::dsl::{NodeShape, PropertyShape, ShapesGraphBuilder};
    use crate::model::Cardinality;
    use fluree_vocab::xsd;
    use pretty_assertions::assert_eq;

    fn ex(local: &str) -> String {
        format!("http://example.org/{}", local)
    }

    fn link_shapes(shapes: Vec<NodeShape>) -> Result<LinkedModel, LinkError> {
        let mut graph = ShapesGraphBuilder::new();
        for shape in shapes {
            graph.shape(shape);
        }
        let accessor = graph.into_accessor();
        let built = build_shapes(&accessor, &ShapegenConfig::default().with_parallel(false))
            .expect("shapes build");
        link(built)
    }

    fn names(model: &LinkedModel) -> Vec<String> {
        model.shapes().map(|s| s.name.clone()).collect()
    }

    #[test]
    fn test_dangling_reference() {
        let err = link_shapes(vec![NodeShape::new(&ex("PersonShape"))
            .property(PropertyShape::new(&ex("pet")).node(&ex("PetShape")))])
        .unwrap_err();
        assert_eq!(
            err,
            LinkError::DanglingReference {
                referrer: "Person".to_string(),
                target: ex("PetShape"),
            }
        );
    }

    #[test]
    fn test_references_are_emitted_first() {
        let model = link_shapes(vec![
            NodeShape::new(&ex("PersonShape"))
                .property(PropertyShape::new(&ex("address")).node(&ex("AddressShape")).optional()),
            NodeShape::new(&ex("AddressShape"))
                .property(PropertyShape::new(&ex("street")).datatype(xsd::STRING)),
        ])
        .unwrap();
        assert_eq!(names(&model), vec!["Address", "Person"]);
        let person = model.shape("Person").unwrap();
        assert_eq!(person.properties[0].value.shape_ref().unwrap().type_name(), "Address");
    }

    #[test]
    fn test_recursive_by_value_edges_are_boxed() {
        let model = link_shapes(vec![
            NodeShape::new(&ex("NodeShape"))
                .property(PropertyShape::new(&ex("next")).node(&ex("NodeShape")).optional())
                .property(PropertyShape::new(&ex("children")).node(&ex("NodeShape"))),
            NodeShape::new(&ex("LeafShape"))
                .property(PropertyShape::new(&ex("owner")).node(&ex("NodeShape")).optional()),
        ])
        .unwrap();
        let node = model.shape("Node").unwrap();
        assert!(node.properties[0].is_boxed());
        assert!(!node.properties[1].is_boxed());
        assert!(!model.shape("Leaf").unwrap().properties[0].is_boxed());
    }

    #[test]
    fn test_mutual_recursion_is_boxed() {
        let model = link_shapes(vec![
            NodeShape::new(&ex("AShape"))
                .property(PropertyShape::new(&ex("b")).node(&ex("BShape")).optional()),
            NodeShape::new(&ex("BShape"))
                .property(PropertyShape::new(&ex("a")).node(&ex("AShape")).optional()),
        ])
        .unwrap();
        assert!(model.shape("A").unwrap().properties[0].is_boxed());
        assert!(model.shape("B").unwrap().properties[0].is_boxed());
    }

    #[test]
    fn test_inheritance_is_flattened_base_first() {
        let model = link_shapes(vec![
            NodeShape::new(&ex("CarShape"))
                .target_class(&ex("Car"))
                .sub_class_of(&ex("VehicleShape"))
                .property(PropertyShape::new(&ex("doors")).datatype(xsd::INTEGER).required())
                .property(PropertyShape::new(&ex("wheels")).datatype(xsd::INTEGER).required()),
            NodeShape::new(&ex("VehicleShape"))
                .target_class(&ex("Vehicle"))
                .abstract_shape()
                .property(PropertyShape::new(&ex("wheels")).datatype(xsd::INTEGER).optional())
                .property(PropertyShape::new(&ex("make")).datatype(xsd::STRING).optional()),
        ])
        .unwrap();
        let car = model.shape("Car").unwrap();
        let props: Vec<(&str, Cardinality, &str)> = car
            .properties
            .iter()
            .map(|p| (p.name.as_str(), p.cardinality, p.declared_by.as_str()))
            .collect();
        assert_eq!(
            props,
            vec![
                ("wheels", Cardinality::Required, "Car"),
                ("make", Cardinality::Optional, "Vehicle"),
                ("doors", Cardinality::Required, "Car"),
            ]
        );
        assert_eq!(car.inherited_types, vec![ex("Vehicle")]);
        let vehicle = model.shape("Vehicle").unwrap();
        assert_eq!(vehicle.members.iter().map(|m| m.type_name()).collect::<Vec<_>>(), vec!["Car"]);
    }

    #[test]
    fn test_widening_override_is_rejected() {
        let err = link_shapes(vec![
            NodeShape::new(&ex("BaseShape"))
                .property(PropertyShape::new(&ex("name")).datatype(xsd::STRING).required()),
            NodeShape::new(&ex("ChildShape"))
                .sub_class_of(&ex("BaseShape"))
                .property(PropertyShape::new(&ex("name")).datatype(xsd::STRING)),
        ])
        .unwrap_err();
        assert!(matches!(err, LinkError::IllegalOverride { ref property, .. } if property == "name"));
    }

    #[test]
    fn test_inheritance_cycle() {
        let err = link_shapes(vec![
            NodeShape::new(&ex("AShape")).sub_class_of(&ex("BShape")),
            NodeShape::new(&ex("BShape")).sub_class_of(&ex("AShape")),
        ])
        .unwrap_err();
        assert!(matches!(err, LinkError::InheritanceCycle { .. }));
    }

    #[test]
    fn test_nested_unions_are_flattened() {
        let model = link_shapes(vec![
            NodeShape::new(&ex("DogShape")).target_class(&ex("Dog")),
            NodeShape::new(&ex("CatShape")).target_class(&ex("Cat")),
            NodeShape::new(&ex("FishShape")).target_class(&ex("Fish")),
            NodeShape::new(&ex("MammalShape")).xone(&[&ex("DogShape"), &ex("CatShape")]),
            NodeShape::new(&ex("PetShape")).xone(&[&ex("MammalShape"), &ex("FishShape")]),
        ])
        .unwrap();
        let pet = model.shape("Pet").unwrap();
        let members: Vec<&str> = pet.members.iter().map(|m| m.type_name()).collect();
        assert_eq!(members, vec!["Dog", "Cat", "Fish"]);
    }

    #[test]
    fn test_discriminant_collision_and_union_cycle() {
        let err = link_shapes(vec![
            NodeShape::new(&ex("DogShape")),
            NodeShape::new(&ex("PetShape")).xone(&[&ex("DogShape"), &ex("DogShape")]),
        ])
        .unwrap_err();
        assert!(matches!(err, LinkError::DiscriminantCollision { .. }));

        let err = link_shapes(vec![
            NodeShape::new(&ex("AShape")).xone(&[&ex("BShape")]),
            NodeShape::new(&ex("BShape")).xone(&[&ex("AShape")]),
        ])
        .unwrap_err();
        assert!(matches!(err, LinkError::UnionCycle { .. }));
    }

    #[test]
    fn test_abstract_without_subtypes() {
        let model = link_shapes(vec![NodeShape::new(&ex("ThingShape")).abstract_shape()]).unwrap();
        assert!(model.is_empty());

        let err = link_shapes(vec![
            NodeShape::new(&ex("ThingShape")).abstract_shape(),
            NodeShape::new(&ex("BoxShape"))
                .property(PropertyShape::new(&ex("content")).node(&ex("ThingShape"))),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            LinkError::AbstractWithoutSubtypes {
                referrer: "Box".to_string(),
                shape: "Thing".to_string(),
            }
        );
    }

    #[test]
    fn test_class_resolves_to_shape_or_identifier() {
        let model = link_shapes(vec![
            NodeShape::new(&ex("PersonShape"))
                .target_class(&ex("Person"))
                .property(PropertyShape::new(&ex("knows")).class(&ex("Person")))
                .property(PropertyShape::new(&ex("worksFor")).class(&ex("Org")).optional()),
        ])
        .unwrap();
        let person = model.shape("Person").unwrap();
        assert_eq!(person.properties[0].value.shape_ref().unwrap().type_name(), "Person");
        assert_eq!(person.properties[1].value, ValueType::Primitive(Primitive::Identifier));
    }

    #[test]
    fn test_duplicate_names() {
        let err = link_shapes(vec![
            NodeShape::new("http://a.example/PersonShape"),
            NodeShape::new("http://b.example/PersonShape"),
        ])
        .unwrap_err();
        assert!(matches!(err, LinkError::DuplicateTypeName { ref name, .. } if name == "Person"));

        let err = link_shapes(vec![NodeShape::new(&ex("PersonShape"))
            .property(PropertyShape::new(&ex("name")))
            .property(PropertyShape::new("http://xmlns.com/foaf/0.1/name"))])
        .unwrap_err();
        assert!(matches!(err, LinkError::DuplicatePropertyName { .. }));
    }

    #[test]
    fn test_auxiliaries_stay_with_declaring_shape() {
        let model = link_shapes(vec![
            NodeShape::new(&ex("BaseShape"))
                .property(PropertyShape::new(&ex("status")).in_iris(&[&ex("On"), &ex("Off")]).optional()),
            NodeShape::new(&ex("ChildShape")).sub_class_of(&ex("BaseShape")),
        ])
        .unwrap();
        let aux: Vec<(String, Vec<String>)> = model
            .entries()
            .iter()
            .map(|e| {
                (
                    e.shape.name.clone(),
                    e.auxiliaries.iter().map(|a| a.name().to_string()).collect(),
                )
            })
            .collect();
        assert_eq!(
            aux,
            vec![
                ("Base".to_string(), vec!["BaseStatus".to_string()]),
                ("Child".to_string(), vec![]),
            ]
        );
        assert_eq!(model.type_names(), vec!["BaseStatus", "Base", "Child"]);
    }
}
