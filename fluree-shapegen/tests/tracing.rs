//! Span and event emission of the generator pipeline

use fluree_shapegen::dsl::{NodeShape, PropertyShape, ShapesGraphBuilder};
use fluree_shapegen::{Generator, ShapegenConfig};
use fluree_vocab::xsd;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::span::{Attributes, Id};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;

const EX: &str = "http://example.org/";

fn ex(local: &str) -> String {
    format!("{}{}", EX, local)
}

#[derive(Debug, Clone)]
struct Captured {
    name: String,
    level: Level,
    fields: HashMap<String, String>,
}

#[derive(Debug, Clone, Default)]
struct Store {
    spans: Arc<Mutex<Vec<Captured>>>,
    events: Arc<Mutex<Vec<Captured>>>,
}

impl Store {
    fn span_names(&self) -> Vec<String> {
        self.spans.lock().unwrap().iter().map(|s| s.name.clone()).collect()
    }

    fn events_at(&self, level: Level) -> Vec<Captured> {
        self.events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| e.level == level)
            .cloned()
            .collect()
    }
}

struct FieldVisitor(HashMap<String, String>);

impl tracing::field::Visit for FieldVisitor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        self.0.insert(field.name().to_string(), format!("{:?}", value));
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        self.0.insert(field.name().to_string(), value.to_string());
    }
}

struct CaptureLayer(Store);

impl<S> Layer<S> for CaptureLayer
where
    S: Subscriber + for<'lookup> LookupSpan<'lookup>,
{
    fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
        let mut fields = FieldVisitor(HashMap::new());
        attrs.record(&mut fields);
        self.0.spans.lock().unwrap().push(Captured {
            name: attrs.metadata().name().to_string(),
            level: *attrs.metadata().level(),
            fields: fields.0,
        });
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let mut fields = FieldVisitor(HashMap::new());
        event.record(&mut fields);
        self.0.events.lock().unwrap().push(Captured {
            name: event.metadata().name().to_string(),
            level: *event.metadata().level(),
            fields: fields.0,
        });
    }
}

fn capture<T>(f: impl FnOnce() -> T) -> (T, Store) {
    let store = Store::default();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer(store.clone()));
    let out = tracing::subscriber::with_default(subscriber, f);
    (out, store)
}

fn untyped_union() -> ShapesGraphBuilder {
    let mut b = ShapesGraphBuilder::new();
    b.shape(
        NodeShape::new(&ex("LeftShape"))
            .property(PropertyShape::new(&ex("text")).datatype(xsd::STRING).required()),
    );
    b.shape(
        NodeShape::new(&ex("RightShape"))
            .property(PropertyShape::new(&ex("text")).datatype(xsd::STRING).required()),
    );
    b.shape(NodeShape::new(&ex("EitherShape")).xone(&[&ex("LeftShape"), &ex("RightShape")]));
    b
}

#[test]
fn test_pipeline_stages_open_spans() {
    let accessor = untyped_union().into_accessor();
    // Sequential build keeps per-shape events on the capturing thread
    let generator = Generator::new(ShapegenConfig::default().with_parallel(false));
    let (result, store) = capture(|| generator.generate(&accessor));
    result.unwrap();

    let names = store.span_names();
    for stage in ["shapegen_build", "shapegen_link", "shapegen_emit"] {
        assert!(names.iter().any(|n| n == stage), "{} missing from {:?}", stage, names);
    }
    let emit = store
        .spans
        .lock()
        .unwrap()
        .iter()
        .find(|s| s.name == "shapegen_emit")
        .cloned()
        .unwrap();
    assert_eq!(emit.level, Level::DEBUG);

    let built: Vec<String> = store
        .events_at(Level::DEBUG)
        .into_iter()
        .filter(|e| e.fields.get("message").map(String::as_str) == Some("built shape"))
        .filter_map(|e| e.fields.get("shape").cloned())
        .collect();
    assert_eq!(built.len(), 3, "{:?}", built);
}

#[test]
fn test_indistinguishable_union_members_warn() {
    let accessor = untyped_union().into_accessor();
    let generator = Generator::new(ShapegenConfig::default().with_parallel(false));
    let (result, store) = capture(|| generator.generate(&accessor));
    result.unwrap();

    let warnings = store.events_at(Level::WARN);
    assert_eq!(warnings.len(), 1, "{:?}", warnings);
    let warning = &warnings[0];
    assert_eq!(warning.fields.get("union").map(String::as_str), Some("Either"));
    assert!(warning.fields["members"].contains("Left"));
    assert!(warning.fields["members"].contains("Right"));
}

#[test]
fn test_typed_union_members_do_not_warn() {
    let mut b = ShapesGraphBuilder::new();
    for name in ["Left", "Right"] {
        b.shape(
            NodeShape::new(&ex(&format!("{}Shape", name)))
                .target_class(&ex(name))
                .property(PropertyShape::new(&ex("text")).datatype(xsd::STRING).required()),
        );
    }
    b.shape(NodeShape::new(&ex("EitherShape")).xone(&[&ex("LeftShape"), &ex("RightShape")]));
    let accessor = b.into_accessor();

    let (result, store) = capture(|| Generator::default().generate(&accessor));
    result.unwrap();
    assert!(store.events_at(Level::WARN).is_empty());
}
