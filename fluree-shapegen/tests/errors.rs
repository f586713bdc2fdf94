use fluree_graph_ir::Term;
use fluree_shapegen::dsl::{NodeShape, PropertyShape, ShapesGraphBuilder};
use fluree_shapegen::{
    BuildError, ConfigError, GenerateError, Generator, LinkError, ShapegenConfig,
};
use fluree_vocab::{shapegen, xsd};
use pretty_assertions::assert_eq;

const EX: &str = "http://example.org/";

fn ex(local: &str) -> String {
    format!("{}{}", EX, local)
}

fn generate(shapes: Vec<NodeShape>) -> Result<String, GenerateError> {
    let mut b = ShapesGraphBuilder::new();
    for shape in shapes {
        b.shape(shape);
    }
    Generator::new(ShapegenConfig::default().with_parallel(false))
        .generate(&b.into_accessor())
        .map(|module| module.source)
}

fn build_errors(shapes: Vec<NodeShape>) -> Vec<BuildError> {
    match generate(shapes) {
        Err(GenerateError::Build(errors)) => errors,
        other => panic!("expected build errors, got {:?}", other.map(|_| ())),
    }
}

fn link_error(shapes: Vec<NodeShape>) -> LinkError {
    match generate(shapes) {
        Err(GenerateError::Link(err)) => err,
        other => panic!("expected a link error, got {:?}", other.map(|_| ())),
    }
}

#[test]
fn test_unknown_datatype() {
    let errors = build_errors(vec![NodeShape::new(&ex("AShape"))
        .property(PropertyShape::new(&ex("p")).datatype(&ex("Celsius")))]);
    assert_eq!(
        errors,
        vec![BuildError::UnresolvableDatatype {
            shape: ex("AShape"),
            property: "p".to_string(),
            datatype: ex("Celsius"),
        }]
    );
}

#[test]
fn test_conflicting_redeclaration() {
    let errors = build_errors(vec![NodeShape::new(&ex("AShape"))
        .property(PropertyShape::new(&ex("p")).datatype(xsd::STRING))
        .property(PropertyShape::new(&ex("p")).datatype(xsd::INTEGER))]);
    assert!(matches!(
        errors.as_slice(),
        [BuildError::ConflictingValueTypes { property, .. }] if property == "p"
    ));
}

#[test]
fn test_default_on_set_is_rejected() {
    let errors = build_errors(vec![NodeShape::new(&ex("AShape")).property(
        PropertyShape::new(&ex("tags"))
            .datatype(xsd::STRING)
            .default_value(Term::string("x")),
    )]);
    assert!(matches!(errors.as_slice(), [BuildError::InvalidDefault { .. }]));
}

#[test]
fn test_union_with_properties() {
    let errors = build_errors(vec![
        NodeShape::new(&ex("AShape")),
        NodeShape::new(&ex("UShape"))
            .xone(&[&ex("AShape")])
            .property(PropertyShape::new(&ex("p")).datatype(xsd::STRING)),
    ]);
    assert_eq!(
        errors,
        vec![BuildError::UnionWithProperties { shape: ex("UShape") }]
    );
}

#[test]
fn test_union_cannot_mint() {
    let errors = build_errors(vec![
        NodeShape::new(&ex("AShape")),
        NodeShape::new(&ex("UShape"))
            .xone(&[&ex("AShape")])
            .minting(shapegen::UUID),
    ]);
    assert!(matches!(
        errors.as_slice(),
        [BuildError::InvalidIdentifierStrategy { .. }]
    ));
}

#[test]
fn test_dangling_reference_aborts_run() {
    let err = link_error(vec![NodeShape::new(&ex("AShape"))
        .property(PropertyShape::new(&ex("b")).node(&ex("MissingShape")))]);
    assert_eq!(
        err,
        LinkError::DanglingReference {
            referrer: "A".to_string(),
            target: ex("MissingShape"),
        }
    );
}

#[test]
fn test_widening_override() {
    let err = link_error(vec![
        NodeShape::new(&ex("BaseShape"))
            .property(PropertyShape::new(&ex("name")).datatype(xsd::STRING).required()),
        NodeShape::new(&ex("ChildShape"))
            .sub_class_of(&ex("BaseShape"))
            .property(PropertyShape::new(&ex("name")).datatype(xsd::STRING)),
    ]);
    assert!(matches!(err, LinkError::IllegalOverride { ref property, .. } if property == "name"));
}

#[test]
fn test_inheritance_cycle() {
    let err = link_error(vec![
        NodeShape::new(&ex("AShape")).sub_class_of(&ex("BShape")),
        NodeShape::new(&ex("BShape")).sub_class_of(&ex("AShape")),
    ]);
    assert!(matches!(err, LinkError::InheritanceCycle { .. }));
}

#[test]
fn test_duplicate_type_names() {
    let err = link_error(vec![
        NodeShape::new(&ex("one/ThingShape")),
        NodeShape::new(&ex("two/ThingShape")),
    ]);
    assert!(matches!(err, LinkError::DuplicateTypeName { ref name, .. } if name == "Thing"));
}

#[test]
fn test_config_errors() {
    let err = ShapegenConfig::from_toml_str("parallel = \"yes\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));

    let dir = tempfile::tempdir().unwrap();
    let err = ShapegenConfig::from_path(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
