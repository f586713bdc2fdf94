//! Compiles the fixture shapes graph into `$OUT_DIR/shapes.rs`

use fluree_graph_ir::Term;
use fluree_shapegen::dsl::{NodeShape, PropertyShape, ShapesGraphBuilder};
use fluree_shapegen::{Generator, ShapegenConfig};
use fluree_vocab::{shapegen, xsd};
use std::error::Error;
use std::path::PathBuf;

const EX: &str = "http://example.org/";

fn ex(local: &str) -> String {
    format!("{}{}", EX, local)
}

fn prop(local: &str) -> PropertyShape {
    PropertyShape::new(&ex(local))
}

fn fixture() -> ShapesGraphBuilder {
    let mut b = ShapesGraphBuilder::new();

    b.shape(
        NodeShape::new(&ex("ExampleShape"))
            .target_class(&ex("Example"))
            .minting(shapegen::SHA256)
            .property(prop("s").datatype(xsd::STRING).required()),
    );

    // Typed union members
    b.shape(
        NodeShape::new(&ex("DogShape"))
            .target_class(&ex("Dog"))
            .property(prop("name").datatype(xsd::STRING).required()),
    );
    b.shape(
        NodeShape::new(&ex("CatShape"))
            .target_class(&ex("Cat"))
            .property(prop("name").datatype(xsd::STRING).required())
            .property(prop("indoor").datatype(xsd::BOOLEAN).optional()),
    );
    b.shape(
        NodeShape::new(&ex("PetShape"))
            .description("A dog or a cat")
            .xone(&[&ex("DogShape"), &ex("CatShape")]),
    );

    b.shape(
        NodeShape::new(&ex("PersonShape"))
            .target_class(&ex("Person"))
            .minting(shapegen::UUID)
            .label("Person")
            .property(prop("name").datatype(xsd::STRING).required().label("Full name"))
            .property(prop("nicknames").datatype(xsd::STRING))
            .property(prop("motto").language_in(&["en"]).optional())
            .property(prop("role").has_value(Term::iri(ex("Member"))).required())
            .property(
                prop("age")
                    .datatype(xsd::INTEGER)
                    .optional()
                    .default_value(Term::integer(0)),
            )
            .property(
                prop("favoriteColor")
                    .in_iris(&[&ex("Red"), &ex("Green"), &ex("Blue")])
                    .optional(),
            )
            .property(prop("birthDate").datatype(xsd::DATE).optional())
            .property(prop("pets").node(&ex("PetShape"))),
    );

    // Untyped members: the graph alone cannot tell them apart
    b.shape(
        NodeShape::new(&ex("TextMarkerShape"))
            .property(prop("text").datatype(xsd::STRING).required()),
    );
    b.shape(
        NodeShape::new(&ex("NoteMarkerShape"))
            .property(prop("text").datatype(xsd::STRING).required())
            .property(prop("note").datatype(xsd::STRING).optional()),
    );
    b.shape(
        NodeShape::new(&ex("MarkerShape")).xone(&[&ex("TextMarkerShape"), &ex("NoteMarkerShape")]),
    );
    b.shape(
        NodeShape::new(&ex("ReversedMarkerShape"))
            .xone(&[&ex("NoteMarkerShape"), &ex("TextMarkerShape")]),
    );

    // Abstract hierarchy
    b.shape(
        NodeShape::new(&ex("VehicleShape"))
            .target_class(&ex("Vehicle"))
            .abstract_shape()
            .property(prop("wheels").datatype(xsd::INTEGER).required()),
    );
    b.shape(
        NodeShape::new(&ex("CarShape"))
            .target_class(&ex("Car"))
            .sub_class_of(&ex("VehicleShape"))
            .property(prop("seats").datatype(xsd::INTEGER).required()),
    );
    b.shape(
        NodeShape::new(&ex("BikeShape"))
            .target_class(&ex("Bike"))
            .sub_class_of(&ex("VehicleShape"))
            .property(prop("bell").datatype(xsd::BOOLEAN).optional()),
    );
    b.shape(
        NodeShape::new(&ex("GarageShape"))
            .target_class(&ex("Garage"))
            .iri_only()
            .property(prop("vehicles").node(&ex("VehicleShape"))),
    );

    // Closed value sets
    b.shape(
        NodeShape::new(&ex("NoteShape"))
            .target_class(&ex("Note"))
            .property(prop("color").in_iris(&[&ex("Red"), &ex("Blue")]).required())
            .property(prop("kind").in_iris(&[&ex("Memo")]).required())
            .property(
                prop("priority")
                    .in_values(vec![Term::string("low"), Term::string("high")])
                    .optional(),
            ),
    );
    b.shape(
        NodeShape::new(&ex("MeasurementShape"))
            .target_class(&ex("Measurement"))
            .property(
                prop("value")
                    .or_datatypes(&[xsd::INTEGER, xsd::STRING])
                    .required(),
            ),
    );

    b.shape(
        NodeShape::new(&ex("PointShape"))
            .target_class(&ex("Point"))
            .interface()
            .property(prop("x").datatype(xsd::DOUBLE).required())
            .property(prop("y").datatype(xsd::DOUBLE).required()),
    );

    b.shape(
        NodeShape::new(&ex("AccountShape"))
            .target_class(&ex("Account"))
            .minting(shapegen::SHA256)
            .identifier_prefix("urn:account:")
            .property(prop("owner").datatype(xsd::STRING).required().mutable())
            .property(prop("balance").datatype(xsd::INTEGER).required().mutable())
            .property(
                prop("pin")
                    .datatype(xsd::STRING)
                    .optional()
                    .visibility(shapegen::PRIVATE),
            ),
    );

    b.shape(
        NodeShape::new(&ex("TeamShape"))
            .target_class(&ex("Team"))
            .property(prop("members").datatype(xsd::STRING).min_count(1)),
    );

    b.shape(
        NodeShape::new(&ex("RecipeShape"))
            .target_class(&ex("Recipe"))
            .property(prop("title").datatype(xsd::STRING).required())
            .property(prop("steps").datatype(xsd::STRING).ordered()),
    );

    b.shape(
        NodeShape::new(&ex("EventShape"))
            .target_class(&ex("Event"))
            .property(prop("startsAt").datatype(xsd::DATE_TIME).required()),
    );

    b.shape(
        NodeShape::new(&ex("ChainShape"))
            .target_class(&ex("Chain"))
            .property(prop("label").datatype(xsd::STRING).required())
            .property(prop("next").node(&ex("ChainShape")).optional()),
    );

    b.shape(
        NodeShape::new(&ex("PhrasebookShape"))
            .target_class(&ex("Phrasebook"))
            .property(prop("phrases").language_in(&["en"]).ordered()),
    );

    // List elements whose property names shadow list plumbing
    b.shape(
        NodeShape::new(&ex("StopShape"))
            .target_class(&ex("Stop"))
            .property(prop("name").datatype(xsd::STRING).required())
            .property(prop("next").datatype(xsd::STRING).optional())
            .property(prop("cell").datatype(xsd::INTEGER).optional()),
    );
    b.shape(
        NodeShape::new(&ex("ItineraryShape"))
            .target_class(&ex("Itinerary"))
            .property(prop("stops").node(&ex("StopShape")).ordered()),
    );

    // Acyclic nesting deeper than the fragment depth
    for (level, inner) in [("Tier1", "Tier2"), ("Tier2", "Tier3"), ("Tier3", "Tier4"), ("Tier4", "Tier5")] {
        b.shape(
            NodeShape::new(&ex(&format!("{}Shape", level)))
                .target_class(&ex(level))
                .property(prop("inner").node(&ex(&format!("{}Shape", inner))).required()),
        );
    }
    b.shape(
        NodeShape::new(&ex("Tier5Shape"))
            .target_class(&ex("Tier5"))
            .property(prop("leaf").datatype(xsd::STRING).required()),
    );

    b
}

fn main() -> Result<(), Box<dyn Error>> {
    println!("cargo:rerun-if-changed=build.rs");

    let config = ShapegenConfig::default().with_header("Fixture shapes for testsuite-shapegen");
    let module = Generator::new(config).generate(&fixture().into_accessor())?;

    let out = PathBuf::from(std::env::var("OUT_DIR")?).join("shapes.rs");
    module.write_to(out)?;
    Ok(())
}
