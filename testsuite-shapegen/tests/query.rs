//! Query fragments against what the graph codec writes and reads

use chrono::NaiveDate;
use fluree_shapegen_runtime::{
    self as rt, FragmentContext, Identifier, Literal, QueryFragment, RuntimeSchema, Shape,
    UiMetadata,
};
use fluree_vocab::rdf;
use pretty_assertions::assert_eq;
use rt::{PatternTerm, TriplePattern};
use std::collections::{BTreeMap, BTreeSet};
use testsuite_shapegen::*;

fn graph_predicates<T: Shape>(value: &T) -> BTreeSet<String> {
    value
        .to_graph()
        .predicates()
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn fragment_predicates<T: QueryFragment>() -> BTreeSet<String> {
    T::query_fragment(&FragmentContext::root()).predicates()
}

/// Every property populated, so the encoded graph uses every predicate
fn full_person() -> Person {
    Person::new(
        None,
        "Ada".to_string(),
        vec!["Countess".to_string()],
        Some(Literal::tagged("hello", "en")),
        Identifier::named(ex("Member")),
        36,
        Some(PersonFavoriteColor::Blue),
        NaiveDate::from_ymd_opt(1815, 12, 10),
        vec![
            Pet::from(Dog::new(None, "Rex".to_string()).unwrap()),
            Pet::from(Cat::new(None, "Tom".to_string(), Some(false)).unwrap()),
        ],
    )
    .unwrap()
}

#[test]
fn test_fully_populated_graphs_use_exactly_the_fragment_predicates() {
    assert_eq!(graph_predicates(&full_person()), fragment_predicates::<Person>());

    let garage = Garage::new(
        Identifier::named(ex("garage/1")),
        vec![
            Vehicle::from(Car::new(None, 4, 5).unwrap()),
            Vehicle::from(Bike::new(None, 2, Some(true)).unwrap()),
        ],
    )
    .unwrap();
    assert_eq!(graph_predicates(&garage), fragment_predicates::<Garage>());

    let recipe = Recipe::new(None, "Tea".to_string(), vec!["boil".to_string()]).unwrap();
    assert_eq!(graph_predicates(&recipe), fragment_predicates::<Recipe>());

    let account = Account::new(None, "ann".to_string(), 1, Some("0000".to_string())).unwrap();
    assert_eq!(graph_predicates(&account), fragment_predicates::<Account>());
}

#[test]
fn test_sparse_graphs_stay_within_the_fragment() {
    let fragment = fragment_predicates::<Recipe>();
    let recipe = Recipe::new(None, "Tea".to_string(), Vec::new()).unwrap();
    assert!(graph_predicates(&recipe).is_subset(&fragment));

    let chain = Chain::new(
        None,
        "head".to_string(),
        Some(Chain::new(None, "tail".to_string(), None).unwrap()),
    )
    .unwrap();
    assert!(graph_predicates(&chain).is_subset(&fragment_predicates::<Chain>()));
}

#[test]
fn test_list_fragment_includes_cell_predicates() {
    let predicates = fragment_predicates::<Recipe>();
    for predicate in [rdf::TYPE, rdf::FIRST, rdf::REST] {
        assert!(predicates.contains(predicate), "{}", predicate);
    }
    assert!(predicates.contains(&ex("steps")));
}

#[test]
fn test_required_properties_are_not_optional() {
    let query = Example::construct_query();
    let where_clause = query.split("WHERE").nth(1).unwrap();
    let required = where_clause
        .lines()
        .find(|line| line.contains(&ex("s")))
        .unwrap();
    assert!(!required.trim_start().starts_with("OPTIONAL"));
    assert!(!where_clause.contains("OPTIONAL"), "{}", query);

    let query = Cat::construct_query();
    assert!(query.contains("OPTIONAL"), "{}", query);
}

#[test]
fn test_union_fragments_have_one_branch_per_member() {
    let query = Pet::construct_query();
    assert_eq!(query.matches("UNION").count(), 1, "{}", query);
    assert!(query.contains(&ex("Dog")));
    assert!(query.contains(&ex("Cat")));

    let query = Vehicle::construct_query();
    assert!(query.contains(&ex("seats")));
    assert!(query.contains(&ex("bell")));
}

#[test]
fn test_recursive_fragments_are_bounded() {
    let query = Chain::construct_query();
    assert!(!query.is_empty());
    let shallow = Chain::query_fragment(&FragmentContext::root().with_depth(1)).to_construct_query();
    assert!(shallow.len() < query.len());
}

fn full_tier() -> Tier1 {
    let tier5 = Tier5::new(None, "bottom".to_string()).unwrap();
    let tier4 = Tier4::new(None, tier5).unwrap();
    let tier3 = Tier3::new(None, tier4).unwrap();
    let tier2 = Tier2::new(None, tier3).unwrap();
    Tier1::new(None, tier2).unwrap()
}

#[test]
fn test_acyclic_nesting_is_expanded_to_the_leaf() {
    let predicates = fragment_predicates::<Tier1>();
    assert!(predicates.contains(&ex("leaf")), "{:?}", predicates);
    assert_eq!(graph_predicates(&full_tier()), predicates);

    let shallow = Tier1::query_fragment(&FragmentContext::root().with_depth(1)).predicates();
    assert_eq!(shallow, predicates);
    assert!(Tier1::construct_query().contains("?s_inner_inner_inner_inner_leaf"));
}

/// Predicates binding each object variable of the construct template
fn object_bindings(template: &[TriplePattern]) -> BTreeMap<String, BTreeSet<String>> {
    let mut out: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
    for triple in template {
        if let PatternTerm::Var(var) = &triple.o {
            out.entry(var.name().to_string())
                .or_default()
                .insert(triple.p.iri().to_string());
        }
    }
    out
}

fn assert_one_predicate_per_variable<T: QueryFragment>() {
    let template = T::query_fragment(&FragmentContext::root()).construct_template();
    for (var, predicates) in object_bindings(&template) {
        assert_eq!(predicates.len(), 1, "?{} bound by {:?}", var, predicates);
    }
}

#[test]
fn test_list_element_properties_do_not_share_list_variables() {
    let template = Itinerary::query_fragment(&FragmentContext::root()).construct_template();
    let bindings = object_bindings(&template);
    assert_eq!(bindings["s_stops_next"], BTreeSet::from([ex("next")]));
    assert_eq!(bindings["s_stops_cell"], BTreeSet::from([ex("cell")]));
    assert_eq!(bindings["s_stops__next"], BTreeSet::from([rdf::REST.to_string()]));
    assert_eq!(bindings["s_stops"], BTreeSet::from([rdf::FIRST.to_string()]));

    assert_one_predicate_per_variable::<Itinerary>();
    assert_one_predicate_per_variable::<Person>();
    assert_one_predicate_per_variable::<Garage>();
    assert_one_predicate_per_variable::<Recipe>();
    assert_one_predicate_per_variable::<Phrasebook>();
    assert_one_predicate_per_variable::<Chain>();
    assert_one_predicate_per_variable::<Tier1>();

    let stops = vec![
        Stop::new(None, "Lyon".to_string(), Some("Paris".to_string()), Some(1)).unwrap(),
        Stop::new(None, "Paris".to_string(), None, None).unwrap(),
    ];
    let itinerary = Itinerary::new(None, stops).unwrap();
    assert_eq!(graph_predicates(&itinerary), fragment_predicates::<Itinerary>());
}

#[test]
fn test_fragment_for_one_subject() {
    let query = Example::construct_query_for("urn:shapegen:Example:abc");
    assert!(query.contains("<urn:shapegen:Example:abc>"), "{}", query);
}

#[test]
fn test_schema_and_ui_follow_property_order() {
    let schema = Person::runtime_schema();
    let rt::Schema::Object(object) = schema else {
        panic!("expected an object schema");
    };
    let names: Vec<&str> = object.property_names().collect();
    assert_eq!(
        names,
        vec!["name", "nicknames", "motto", "role", "age", "favoriteColor", "birthDate", "pets"]
    );

    let ui = Person::ui_schema();
    let name = ui.control("name").unwrap();
    assert_eq!(name.label, "Full name");
    assert_eq!(name.scope, "#/properties/name");
    assert!(ui.control("type").unwrap().is_hidden());
    assert!(!name.is_hidden());
}

#[test]
fn test_schema_accepts_encoded_documents() {
    let person = full_person();
    let document = rt::DocumentValue::to_document(&person);
    assert_eq!(Person::runtime_schema().validate(&document), Ok(()));
}
