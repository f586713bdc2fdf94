//! Graph and document round-trips of generated types

use chrono::NaiveDate;
use fluree_shapegen_runtime::{
    self as rt, DocumentValue, GraphValue, Identifier, Literal, Shape, StructuralEquals,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use testsuite_shapegen::*;

fn assert_graph_round_trip<T: Shape>(value: &T) {
    let graph = value.to_graph();
    let focus = value.identifier().to_term();
    let decoded = T::from_graph(&graph, &focus)
        .unwrap_or_else(|err| panic!("{}\n{}", err, graph.to_ntriples()));
    assert_eq!(decoded.structural_equals(value), Ok(()));
}

fn assert_document_round_trip<T: Shape>(value: &T) {
    let document = value.to_document();
    let decoded = T::from_document(&document)
        .unwrap_or_else(|err| panic!("{}\n{}", err, document));
    assert_eq!(decoded.structural_equals(value), Ok(()));
}

fn assert_round_trips<T: Shape>(value: &T) {
    assert_graph_round_trip(value);
    assert_document_round_trip(value);
}

fn person() -> Person {
    Person::new(
        None,
        "Ada Lovelace".to_string(),
        vec!["Ada".to_string(), "Countess".to_string()],
        Some(Literal::tagged("Imagination is a discovering faculty", "en")),
        Identifier::named(ex("Member")),
        36,
        Some(PersonFavoriteColor::Green),
        NaiveDate::from_ymd_opt(1815, 12, 10),
        vec![
            Pet::from(Dog::new(None, "Rex".to_string()).unwrap()),
            Pet::from(Cat::new(None, "Tom".to_string(), Some(true)).unwrap()),
        ],
    )
    .unwrap()
}

#[test]
fn test_person_round_trips() {
    let person = person();
    assert_round_trips(&person);
}

#[test]
fn test_minimal_person_round_trips() {
    let person = Person::new(
        None,
        "Grace".to_string(),
        Vec::new(),
        None,
        Identifier::named(ex("Member")),
        0,
        None,
        None,
        Vec::new(),
    )
    .unwrap();
    assert_round_trips(&person);
}

#[test]
fn test_default_is_omitted_from_graph_and_restored() {
    let person = Person::new(
        None,
        "Grace".to_string(),
        Vec::new(),
        None,
        Identifier::named(ex("Member")),
        0,
        None,
        None,
        Vec::new(),
    )
    .unwrap();
    let graph = person.to_graph();
    let focus = person.identifier().to_term();
    assert!(!graph.has_predicate(&focus, &ex("age")));

    let decoded = Person::from_graph(&graph, &focus).unwrap();
    assert_eq!(decoded.age(), 0);

    let document = person.to_document();
    assert_eq!(document["age"], serde_json::json!(0));
}

#[test]
fn test_blank_identifiers_round_trip_through_documents() {
    let dog = Dog::new(None, "Rex".to_string()).unwrap();
    let document = dog.to_document();
    let id = document["@id"].as_str().unwrap();
    assert!(id.starts_with("_:"), "{}", id);

    let decoded = Dog::from_document(&document).unwrap();
    assert!(decoded.identifier().is_blank());
    assert_eq!(decoded.identifier(), dog.identifier());
}

#[test]
fn test_named_identifiers_are_kept() {
    let dog = Dog::new(Some(Identifier::named(ex("dog/rex"))), "Rex".to_string()).unwrap();
    assert_eq!(dog.to_document()["@id"], serde_json::json!(ex("dog/rex")));
    assert_round_trips(&dog);
}

#[test]
fn test_hierarchy_round_trips() {
    let garage = Garage::new(
        Identifier::named(ex("garage/1")),
        vec![
            Vehicle::from(Car::new(None, 4, 5).unwrap()),
            Vehicle::from(Bike::new(None, 2, Some(true)).unwrap()),
            Vehicle::from(Bike::new(None, 2, None).unwrap()),
        ],
    )
    .unwrap();
    assert_round_trips(&garage);

    let document = garage.to_document();
    let kinds: Vec<&str> = document["vehicles"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v["type"].as_str().unwrap())
        .collect();
    assert_eq!(kinds, vec!["Car", "Bike", "Bike"]);
}

#[test]
fn test_subtypes_write_inherited_types() {
    assert_eq!(Car::RDF_TYPES, &[ex("Car").as_str(), ex("Vehicle").as_str()]);
    let car = Car::new(None, 4, 5).unwrap();
    let graph = car.to_graph();
    let focus = car.identifier().to_term();
    let types: Vec<&str> = graph
        .objects(&focus, fluree_vocab::rdf::TYPE)
        .filter_map(rt::Term::as_iri)
        .collect();
    assert_eq!(types, vec![ex("Car"), ex("Vehicle")]);
    assert_eq!(car.wheels(), 4);
    assert_eq!(car.seats(), 5);
}

#[test]
fn test_closed_values_round_trip() {
    let note = Note::new(None, NoteColor::Blue, NoteKind, Some(NotePriority::High)).unwrap();
    assert_round_trips(&note);
    assert_eq!(note.to_document()["priority"], serde_json::json!("high"));
    assert_eq!(note.to_document()["kind"], serde_json::json!(ex("Memo")));

    let measurements = [
        Measurement::new(None, MeasurementValue::from(42_i64)).unwrap(),
        Measurement::new(None, MeasurementValue::from("42 kg".to_string())).unwrap(),
    ];
    for measurement in &measurements {
        assert_round_trips(measurement);
    }
    assert_eq!(measurements[0].to_document()["value"], serde_json::json!(42));
    assert_eq!(measurements[1].value().variant_name(), "String");
}

#[test]
fn test_interface_fields_are_public() {
    let point = Point::new(None, 1.5, -2.0).unwrap();
    assert_eq!((point.x, point.y), (1.5, -2.0));
    assert_round_trips(&point);
}

#[test]
fn test_recursive_shape_round_trips() {
    let tail = Chain::new(None, "tail".to_string(), None).unwrap();
    let middle = Chain::new(None, "middle".to_string(), Some(tail)).unwrap();
    let head = Chain::new(None, "head".to_string(), Some(middle)).unwrap();
    assert_round_trips(&head);
    assert_eq!(
        head.next().and_then(Chain::next).map(Chain::label),
        Some("tail")
    );
}

#[test]
fn test_date_time_round_trips() {
    let starts_at = rt::DateTime::parse_from_rfc3339("2024-03-01T09:30:00+02:00").unwrap();
    let event = Event::new(None, starts_at).unwrap();
    assert_round_trips(&event);
}

#[test]
fn test_nested_values_share_one_graph() {
    let person = person();
    let mut graph = rt::Graph::new();
    let term = person.to_term(&mut graph);
    let again = person.to_term(&mut graph);
    assert_eq!(term, again);

    let single = person.to_graph();
    assert_eq!(graph.len(), single.len());
}

fn arb_recipe() -> impl Strategy<Value = Recipe> {
    ("[a-z ]{1,12}", proptest::collection::vec("[a-z]{0,6}", 0..6))
        .prop_map(|(title, steps)| Recipe::new(None, title, steps).unwrap())
}

fn arb_account() -> impl Strategy<Value = Account> {
    ("[a-z]{1,8}", any::<i64>(), proptest::option::of("[0-9]{4}"))
        .prop_map(|(owner, balance, pin)| Account::new(None, owner, balance, pin).unwrap())
}

proptest! {
    #[test]
    fn prop_recipe_round_trips(recipe in arb_recipe()) {
        let graph = recipe.to_graph();
        let decoded = Recipe::from_graph(&graph, &recipe.identifier().to_term()).unwrap();
        prop_assert_eq!(decoded.steps(), recipe.steps());
        prop_assert_eq!(decoded.structural_equals(&recipe), Ok(()));

        let decoded = Recipe::from_document(&recipe.to_document()).unwrap();
        prop_assert_eq!(decoded.structural_equals(&recipe), Ok(()));
    }

    #[test]
    fn prop_account_round_trips(account in arb_account()) {
        let decoded = Account::from_graph(&account.to_graph(), &account.identifier().to_term()).unwrap();
        prop_assert_eq!(decoded.structural_equals(&account), Ok(()));
        prop_assert_eq!(decoded.identifier(), account.identifier());

        let decoded = Account::from_document(&account.to_document()).unwrap();
        prop_assert_eq!(decoded.structural_equals(&account), Ok(()));
    }
}
