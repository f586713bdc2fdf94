//! Query/codec parity
//!
//! For every linked shape, the predicates its graph decoder reads
//! (transitively through nested shapes) must equal the predicates its query
//! fragment binds. Both sides are derived from the same model by different
//! emitters, so a mismatch is a generator bug caught before rendering.
//!
//! The closure visits every shape reachable from the root once. Fragments
//! splice in every shape reachable along a path that does not repeat a type,
//! which reaches the same shapes, so for any depth of at least one the
//! closure is exactly what the rendered fragment binds.

use crate::emit::{self, GraphRead, QueryRead};
use crate::error::ParityError;
use crate::link::LinkedModel;
use std::collections::{BTreeSet, HashSet};
use tracing::trace;

fn closure<R>(
    model: &LinkedModel,
    root: &str,
    reads: impl Fn(&crate::model::ShapeType) -> Vec<R>,
    predicates: impl Fn(&R) -> Vec<&str>,
    nested: impl Fn(&R) -> Option<&str>,
) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut stack = vec![root.to_string()];
    while let Some(name) = stack.pop() {
        if !seen.insert(name.clone()) {
            continue;
        }
        let Some(shape) = model.shape(&name) else {
            continue;
        };
        for read in reads(shape) {
            out.extend(predicates(&read).into_iter().map(str::to_string));
            if let Some(next) = nested(&read) {
                if !seen.contains(next) {
                    stack.push(next.to_string());
                }
            }
        }
    }
    out
}

/// Predicates read by the graph decoder of `name`, nested shapes included
pub fn codec_predicates(model: &LinkedModel, name: &str) -> BTreeSet<String> {
    closure(
        model,
        name,
        emit::graph_reads,
        GraphRead::predicates,
        GraphRead::shape,
    )
}

/// Predicates bound by the query fragment of `name`, nested shapes included
pub fn query_predicates(model: &LinkedModel, name: &str) -> BTreeSet<String> {
    closure(
        model,
        name,
        emit::query_reads,
        QueryRead::predicates,
        QueryRead::shape,
    )
}

/// Check every shape of the model
pub fn check(model: &LinkedModel) -> Result<(), ParityError> {
    for shape in model.shapes() {
        let codec = codec_predicates(model, &shape.name);
        let query = query_predicates(model, &shape.name);
        if codec != query {
            return Err(ParityError {
                shape: shape.name.clone(),
                codec_only: codec.difference(&query).cloned().collect(),
                query_only: query.difference(&codec).cloned().collect(),
            });
        }
        trace!(shape = %shape.name, predicates = codec.len(), "parity ok");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build_shapes;
    use crate::config::ShapegenConfig;
    use crate::dsl::{NodeShape, PropertyShape, ShapesGraphBuilder};
    use crate::link::link;
    use fluree_vocab::{rdf, xsd};
    use pretty_assertions::assert_eq;

    const EX: &str = "http://example.org/";

    fn ex(local: &str) -> String {
        format!("{}{}", EX, local)
    }

    fn model() -> LinkedModel {
        let mut b = ShapesGraphBuilder::new();
        b.shape(
            NodeShape::new(&ex("PersonShape"))
                .target_class(&ex("Person"))
                .property(PropertyShape::new(&ex("name")).datatype(xsd::STRING).required())
                .property(PropertyShape::new(&ex("friend")).node(&ex("PersonShape")).optional())
                .property(PropertyShape::new(&ex("pets")).node(&ex("PetShape")).ordered()),
        );
        b.shape(
            NodeShape::new(&ex("PetShape"))
                .target_class(&ex("Pet"))
                .property(PropertyShape::new(&ex("nick")).datatype(xsd::STRING).optional()),
        );
        let config = ShapegenConfig::default().with_parallel(false);
        let shapes = build_shapes(&b.into_accessor(), &config).unwrap();
        link(shapes).unwrap()
    }

    #[test]
    fn test_closures_follow_nesting() {
        let model = model();
        let codec = codec_predicates(&model, "Person");
        let expected: BTreeSet<String> = [
            rdf::TYPE.to_string(),
            rdf::FIRST.to_string(),
            rdf::REST.to_string(),
            ex("name"),
            ex("friend"),
            ex("pets"),
            ex("nick"),
        ]
        .into_iter()
        .collect();
        assert_eq!(codec, expected);
        assert_eq!(query_predicates(&model, "Person"), expected);
    }

    #[test]
    fn test_closure_reaches_the_end_of_acyclic_chains() {
        let mut b = ShapesGraphBuilder::new();
        for (level, inner) in [("Tier1", "Tier2"), ("Tier2", "Tier3"), ("Tier3", "Tier4"), ("Tier4", "Tier5")] {
            b.shape(
                NodeShape::new(&ex(&format!("{}Shape", level)))
                    .property(PropertyShape::new(&ex("inner")).node(&ex(&format!("{}Shape", inner))).required()),
            );
        }
        b.shape(
            NodeShape::new(&ex("Tier5Shape"))
                .property(PropertyShape::new(&ex("leaf")).datatype(xsd::STRING).required()),
        );
        let config = ShapegenConfig::default().with_parallel(false);
        let model = link(build_shapes(&b.into_accessor(), &config).unwrap()).unwrap();

        let expected: BTreeSet<String> = [ex("inner"), ex("leaf")].into_iter().collect();
        assert_eq!(query_predicates(&model, "Tier1"), expected);
        assert_eq!(codec_predicates(&model, "Tier1"), expected);
    }

    #[test]
    fn test_check_passes_for_generated_model() {
        assert_eq!(check(&model()), Ok(()));
    }
}
