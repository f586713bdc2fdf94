//! Type Model Builder: one node shape in, one [`ShapeType`] out
//!
//! Each shape is built in isolation. References to other shapes stay
//! unresolved [`ShapeRef`]s and `sh:class` targets stay [`ValueType::Class`]
//! until the Linker sees the whole set.

use crate::accessor::ShapeGraph;
use crate::config::{OverrideStrategy, ShapegenConfig};
use crate::error::BuildError;
use crate::model::naming;
use crate::model::{
    Cardinality, DefaultValue, EnumMember, Enumeration, IdentifierStrategy, Primitive,
    PrimitiveUnion, PropertyType, ShapeKind, ShapeRef, ShapeType, ValueType, Visibility,
};
use chrono::{Datelike, NaiveDate};
use fluree_graph_ir::{LiteralValue, Term};
use fluree_vocab::{rdf, rdfs, shacl, shapegen, xsd};
use rayon::prelude::*;
use tracing::debug;

/// Document keys the generated code uses itself
const RESERVED_NAMES: &[&str] = &["type", "id"];

/// Members every generated record already defines
const RESERVED_FIELDS: &[&str] = &["identifier", "new", "hash_properties", "discriminant"];

/// Shape being built, for error context
struct ShapeCx {
    iri: String,
    name: String,
}

impl ShapeCx {
    fn list_error(&self, message: impl Into<String>) -> BuildError {
        BuildError::MalformedList {
            shape: self.iri.clone(),
            message: message.into(),
        }
    }
}

/// One `sh:property` declaration before merging and cardinality inference
#[derive(Debug)]
struct Declaration {
    index: usize,
    name: String,
    predicate: String,
    min: u64,
    max: Option<u64>,
    ordered: bool,
    value: ValueType,
    default: Option<Term>,
    has_value: Option<Term>,
    language_in: Vec<String>,
    mutable: bool,
    visibility: Option<Visibility>,
    order: Option<f64>,
    label: Option<String>,
    description: Option<String>,
}

fn display_node(node: &Term) -> String {
    match node.as_iri() {
        Some(iri) => iri.to_string(),
        None => node.to_string(),
    }
}

fn lexical(term: &Term) -> Option<String> {
    term.as_literal().map(|(value, _, _)| value.lexical())
}

/// Map a datatype IRI onto the primitive set
pub fn primitive_for_datatype(datatype: &str) -> Option<Primitive> {
    if datatype == rdf::LANG_STRING {
        Some(Primitive::Literal)
    } else if xsd::is_string_like(datatype) {
        Some(Primitive::String)
    } else if xsd::is_integer_family(datatype) {
        Some(Primitive::Integer)
    } else if xsd::is_float_family(datatype) {
        Some(Primitive::Number)
    } else if datatype == xsd::BOOLEAN {
        Some(Primitive::Boolean)
    } else if datatype == xsd::DATE {
        Some(Primitive::Date)
    } else if xsd::is_date_time(datatype) {
        Some(Primitive::DateTime)
    } else {
        None
    }
}

/// Builds [`ShapeType`]s from a [`ShapeGraph`]
pub struct Builder<'a, G: ShapeGraph + ?Sized> {
    graph: &'a G,
    config: &'a ShapegenConfig,
}

impl<'a, G: ShapeGraph + ?Sized> Builder<'a, G> {
    pub fn new(graph: &'a G, config: &'a ShapegenConfig) -> Self {
        Self { graph, config }
    }

    fn values(&self, node: &Term, predicate: &str) -> Vec<Term> {
        self.graph.constraint_values(node, predicate)
    }

    fn first(&self, node: &Term, predicate: &str) -> Option<Term> {
        self.values(node, predicate).into_iter().next()
    }

    fn flag(&self, node: &Term, predicate: &str) -> bool {
        self.values(node, predicate).iter().any(|term| match term.as_literal() {
            Some((LiteralValue::Boolean(b), _, _)) => *b,
            Some((value, _, _)) => value.lexical() == "true",
            None => false,
        })
    }

    fn string(&self, node: &Term, predicate: &str) -> Option<String> {
        self.values(node, predicate).iter().find_map(lexical)
    }

    fn iris(&self, node: &Term, predicate: &str) -> Result<Vec<String>, String> {
        self.values(node, predicate)
            .iter()
            .map(|term| {
                term.as_iri()
                    .map(str::to_string)
                    .ok_or_else(|| format!("value {} is not an IRI", term))
            })
            .collect()
    }

    fn list(&self, cx: &ShapeCx, head: &Term) -> Result<Vec<Term>, BuildError> {
        self.graph
            .list_values(head)
            .map_err(|message| cx.list_error(message))
    }

    /// Build one shape; `None` when it is deactivated
    pub fn build(&self, node: &Term, index: usize) -> Result<Option<ShapeType>, BuildError> {
        let iri = display_node(node);
        if self.flag(node, shacl::DEACTIVATED) {
            debug!(shape = %iri, "skipping deactivated shape");
            return Ok(None);
        }

        let name = self.type_name(node, &iri)?;
        let cx = ShapeCx {
            iri: iri.clone(),
            name: name.clone(),
        };

        let members = self.union_members(&cx, node)?;
        let property_nodes = self.values(node, shacl::PROPERTY);
        let kind = if !members.is_empty() {
            if !property_nodes.is_empty() {
                return Err(BuildError::UnionWithProperties { shape: iri });
            }
            ShapeKind::Union
        } else if self.flag(node, shapegen::ABSTRACT) {
            ShapeKind::Abstract
        } else if self.flag(node, shapegen::INTERFACE) {
            ShapeKind::Interface
        } else {
            ShapeKind::Record
        };

        let mut rdf_types = Vec::new();
        for class in self.values(node, shacl::TARGET_CLASS) {
            if let Some(class) = class.as_iri() {
                if !rdf_types.iter().any(|t: &String| t == class) {
                    rdf_types.push(class.to_string());
                }
            }
        }
        let is_class = self
            .values(node, rdf::TYPE)
            .iter()
            .any(|t| t.as_iri() == Some(rdfs::CLASS));
        if is_class && node.is_iri() && !rdf_types.contains(&iri) {
            rdf_types.push(iri.clone());
        }

        let base = if kind == ShapeKind::Union {
            None
        } else {
            self.base(&cx, node)?
        };
        let identifier = self.identifier_strategy(&cx, node, kind)?;

        let mut declarations: Vec<Declaration> = Vec::new();
        for (position, property) in property_nodes.iter().enumerate() {
            if self.flag(property, shacl::DEACTIVATED) {
                continue;
            }
            let declaration = self.declaration(&cx, property, position)?;
            match declarations
                .iter()
                .position(|d| d.predicate == declaration.predicate)
            {
                Some(existing) => merge(&cx, &mut declarations[existing], declaration)?,
                None => declarations.push(declaration),
            }
        }
        let mut properties = declarations
            .into_iter()
            .map(|d| self.finish_property(&cx, d))
            .collect::<Result<Vec<_>, _>>()?;
        properties.sort_by(|a, b| {
            let (a_rank, a_index) = a.rank();
            let (b_rank, b_index) = b.rank();
            a_rank.total_cmp(&b_rank).then(a_index.cmp(&b_index))
        });

        let label = self
            .string(node, shacl::NAME)
            .or_else(|| self.string(node, rdfs::LABEL))
            .unwrap_or_else(|| naming::title(&name));
        let description = self
            .string(node, shacl::DESCRIPTION)
            .or_else(|| self.string(node, rdfs::COMMENT));

        debug!(
            shape = %name,
            kind = %kind,
            properties = properties.len(),
            identifier = %identifier,
            "built shape"
        );

        Ok(Some(ShapeType {
            iri,
            name,
            kind,
            base,
            identifier,
            properties,
            rdf_types,
            inherited_types: Vec::new(),
            members,
            label,
            description,
            index,
        }))
    }

    fn type_name(&self, node: &Term, iri: &str) -> Result<String, BuildError> {
        let unnamed = || BuildError::UnnamedShape {
            shape: iri.to_string(),
        };
        match self.string(node, shapegen::NAME) {
            Some(name) if naming::is_valid_type_name(&name) => Ok(name),
            Some(name) => naming::type_ident(&name).ok_or_else(unnamed),
            None if node.is_blank() => Err(unnamed()),
            None => {
                let name = naming::type_name_from_iri(iri);
                naming::type_ident(&name).ok_or_else(unnamed)
            }
        }
    }

    fn union_members(&self, cx: &ShapeCx, node: &Term) -> Result<Vec<ShapeRef>, BuildError> {
        let mut heads = self.values(node, shacl::XONE);
        heads.extend(self.values(node, shacl::OR));
        let head = match heads.as_slice() {
            [] => return Ok(Vec::new()),
            [head] => head,
            _ => return Err(cx.list_error("more than one sh:xone or sh:or list")),
        };
        let items = self.list(cx, head)?;
        if items.is_empty() {
            return Err(cx.list_error("union lists no members"));
        }
        items
            .iter()
            .map(|item| {
                item.as_iri()
                    .map(ShapeRef::new)
                    .ok_or_else(|| cx.list_error(format!("union member {} is not a shape IRI", item)))
            })
            .collect()
    }

    fn base(&self, cx: &ShapeCx, node: &Term) -> Result<Option<ShapeRef>, BuildError> {
        let bases: Vec<String> = self
            .values(node, rdfs::SUB_CLASS_OF)
            .iter()
            .filter_map(Term::as_iri)
            .filter(|iri| self.graph.shape_node(iri).is_some())
            .map(str::to_string)
            .collect();
        match bases.as_slice() {
            [] => Ok(None),
            [base] => Ok(Some(ShapeRef::new(base.clone()))),
            _ => Err(BuildError::MultipleInheritance {
                shape: cx.iri.clone(),
                bases: bases.join(", "),
            }),
        }
    }

    /// Config override, then the shape's minting directive, then `sh:in`
    /// and `sh:nodeKind`, else blank-or-named
    fn identifier_strategy(
        &self,
        cx: &ShapeCx,
        node: &Term,
        kind: ShapeKind,
    ) -> Result<IdentifierStrategy, BuildError> {
        let invalid = |message: String| BuildError::InvalidIdentifierStrategy {
            shape: cx.iri.clone(),
            message,
        };
        let directives = self
            .iris(node, shapegen::IDENTIFIER_MINTING_STRATEGY)
            .map_err(invalid)?;
        if !kind.is_record() {
            if !directives.is_empty() {
                return Err(invalid(format!("a {} shape cannot mint identifiers", kind)));
            }
            return Ok(IdentifierStrategy::BlankOrNamed);
        }

        let prefix = self
            .string(node, shapegen::IDENTIFIER_PREFIX)
            .unwrap_or_else(|| self.config.minted_prefix(&cx.name));

        if let Some(ov) = self.config.identifier_override(&cx.iri, &cx.name) {
            let prefix = ov.prefix.clone().unwrap_or(prefix);
            return Ok(match ov.strategy {
                OverrideStrategy::Explicit => IdentifierStrategy::ExplicitOnly,
                OverrideStrategy::Blank => IdentifierStrategy::BlankOrNamed,
                OverrideStrategy::Uuid => IdentifierStrategy::MintedRandom { prefix },
                OverrideStrategy::Sha256 => IdentifierStrategy::MintedContentHash { prefix },
            });
        }

        match directives.as_slice() {
            [] => {}
            [directive] if directive == shapegen::UUID => {
                return Ok(IdentifierStrategy::MintedRandom { prefix })
            }
            [directive] if directive == shapegen::SHA256 => {
                return Ok(IdentifierStrategy::MintedContentHash { prefix })
            }
            [directive] if directive == shapegen::BLANK_NODE => {
                return Ok(IdentifierStrategy::BlankOrNamed)
            }
            [directive] => return Err(invalid(format!("unknown minting strategy <{}>", directive))),
            _ => return Err(invalid("more than one minting strategy".to_string())),
        }

        if let Some(head) = self.first(node, shacl::IN) {
            let allowed = self
                .list(cx, &head)?
                .iter()
                .map(|term| {
                    term.as_iri()
                        .map(str::to_string)
                        .ok_or_else(|| invalid(format!("sh:in member {} is not an IRI", term)))
                })
                .collect::<Result<Vec<_>, _>>()?;
            if allowed.is_empty() {
                return Err(invalid("sh:in lists no identifiers".to_string()));
            }
            return Ok(IdentifierStrategy::ConstrainedEnum { allowed });
        }

        if self
            .values(node, shacl::NODE_KIND)
            .iter()
            .any(|k| k.as_iri() == Some(shacl::IRI))
        {
            return Ok(IdentifierStrategy::ExplicitOnly);
        }
        Ok(IdentifierStrategy::BlankOrNamed)
    }

    fn declaration(&self, cx: &ShapeCx, node: &Term, index: usize) -> Result<Declaration, BuildError> {
        let paths = self.values(node, shacl::PATH);
        let predicate = match paths.as_slice() {
            [path] => path.as_iri().map(str::to_string).ok_or_else(|| {
                BuildError::UnsupportedPath {
                    shape: cx.iri.clone(),
                    path: path.to_string(),
                }
            })?,
            [] => {
                return Err(BuildError::UnsupportedPath {
                    shape: cx.iri.clone(),
                    path: format!("(none on {})", node),
                })
            }
            _ => {
                return Err(BuildError::UnsupportedPath {
                    shape: cx.iri.clone(),
                    path: paths.iter().map(ToString::to_string).collect::<Vec<_>>().join(" "),
                })
            }
        };

        let stem = self
            .string(node, shapegen::NAME)
            .unwrap_or_else(|| naming::local_name(&predicate).to_string());
        let name = naming::lower_camel(&stem);
        if name.is_empty() {
            return Err(BuildError::UnsupportedPath {
                shape: cx.iri.clone(),
                path: format!("{} (no usable property name)", predicate),
            });
        }
        if RESERVED_NAMES.contains(&name.as_str())
            || RESERVED_FIELDS.contains(&naming::field_ident(&name).as_str())
        {
            return Err(BuildError::ReservedPropertyName {
                shape: cx.iri.clone(),
                name,
            });
        }

        let malformed = |message: String| BuildError::MalformedCardinality {
            shape: cx.iri.clone(),
            property: name.clone(),
            message,
        };
        let min = self.count(node, shacl::MIN_COUNT).map_err(&malformed)?.unwrap_or(0);
        let max = self.count(node, shacl::MAX_COUNT).map_err(&malformed)?;

        let directive = |message: String| BuildError::InvalidDirective {
            shape: cx.iri.clone(),
            property: name.clone(),
            message,
        };
        let visibility = match self.iris(node, shapegen::VISIBILITY).map_err(directive)?.as_slice() {
            [] => None,
            [v] if v == shapegen::PUBLIC => Some(Visibility::Public),
            [v] if v == shapegen::PROTECTED => Some(Visibility::Protected),
            [v] if v == shapegen::PRIVATE => Some(Visibility::Private),
            [v] => return Err(directive(format!("unknown visibility <{}>", v))),
            _ => return Err(directive("more than one visibility".to_string())),
        };
        let order = match self.first(node, shacl::ORDER) {
            None => None,
            Some(term) => {
                let value = term.as_literal().and_then(|(value, _, _)| {
                    value
                        .as_double()
                        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
                });
                match value {
                    Some(order) if order.is_finite() => Some(order),
                    _ => return Err(directive(format!("sh:order {} is not a number", term))),
                }
            }
        };

        let language_in = match self.first(node, shacl::LANGUAGE_IN) {
            None => Vec::new(),
            Some(head) => self.list(cx, &head)?.iter().filter_map(lexical).collect(),
        };

        let has_values = self.values(node, shacl::HAS_VALUE);
        if has_values.len() > 1 {
            return Err(BuildError::ConflictingValueTypes {
                shape: cx.iri.clone(),
                property: name,
                message: "more than one sh:hasValue".to_string(),
            });
        }
        let has_value = has_values.into_iter().next();
        let value = self.value_type(cx, node, &name, has_value.as_ref(), !language_in.is_empty())?;

        Ok(Declaration {
            index,
            predicate,
            min,
            max,
            ordered: self.flag(node, shapegen::ORDERED),
            value,
            default: self.first(node, shacl::DEFAULT_VALUE),
            has_value,
            language_in,
            mutable: self.flag(node, shapegen::MUTABLE),
            visibility,
            order,
            label: self.string(node, shacl::NAME),
            description: self.string(node, shacl::DESCRIPTION),
            name,
        })
    }

    fn count(&self, node: &Term, predicate: &str) -> Result<Option<u64>, String> {
        let values = self.values(node, predicate);
        let Some(term) = values.first() else {
            return Ok(None);
        };
        if values.iter().any(|v| v != term) {
            return Err(format!("conflicting values for <{}>", predicate));
        }
        let parsed = term.as_literal().and_then(|(value, _, _)| {
            value
                .as_integer()
                .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
        });
        match parsed {
            Some(n) if n >= 0 => Ok(Some(n as u64)),
            _ => Err(format!("{} is not a non-negative integer", term)),
        }
    }

    /// `sh:in` > `sh:node` > `sh:class` > `sh:datatype` > `sh:or` >
    /// `sh:languageIn` > `sh:nodeKind` > `sh:hasValue` > any term
    fn value_type(
        &self,
        cx: &ShapeCx,
        node: &Term,
        name: &str,
        has_value: Option<&Term>,
        language_filtered: bool,
    ) -> Result<ValueType, BuildError> {
        let conflict = |message: String| BuildError::ConflictingValueTypes {
            shape: cx.iri.clone(),
            property: name.to_string(),
            message,
        };
        let nodes = self.iris(node, shacl::NODE).map_err(|m| conflict(format!("sh:node {}", m)))?;
        let classes = self.iris(node, shacl::CLASS).map_err(|m| conflict(format!("sh:class {}", m)))?;
        let datatypes = self
            .iris(node, shacl::DATATYPE)
            .map_err(|m| conflict(format!("sh:datatype {}", m)))?;
        for (values, predicate) in [(&nodes, "sh:node"), (&classes, "sh:class"), (&datatypes, "sh:datatype")] {
            if values.len() > 1 {
                return Err(conflict(format!("more than one {}: {}", predicate, values.join(", "))));
            }
        }
        if let Some(datatype) = datatypes.first() {
            if !nodes.is_empty() || !classes.is_empty() {
                return Err(conflict(format!(
                    "sh:datatype <{}> declared together with a node reference",
                    datatype
                )));
            }
        }

        let value = if let Some(head) = self.first(node, shacl::IN) {
            ValueType::Enumeration(self.enumeration(cx, name, &head)?)
        } else if let Some(shape) = nodes.first() {
            ValueType::Shape(ShapeRef::new(shape.clone()))
        } else if let Some(class) = classes.first() {
            ValueType::Class(class.clone())
        } else if let Some(datatype) = datatypes.first() {
            ValueType::Primitive(self.datatype(cx, name, datatype)?)
        } else if let Some(head) = self.first(node, shacl::OR) {
            self.primitive_union(cx, name, &head)?
        } else if language_filtered {
            ValueType::Primitive(Primitive::Literal)
        } else if let Some(kind) = self.first(node, shacl::NODE_KIND) {
            ValueType::Primitive(node_kind_primitive(&kind))
        } else if let Some(sentinel) = has_value {
            ValueType::Primitive(term_primitive(sentinel))
        } else {
            ValueType::Primitive(Primitive::Term)
        };

        if language_filtered && !matches!(value, ValueType::Primitive(Primitive::Literal)) {
            return Err(conflict(format!(
                "sh:languageIn applies to tagged text, not {}",
                value.describe()
            )));
        }
        Ok(value)
    }

    fn datatype(&self, cx: &ShapeCx, name: &str, datatype: &str) -> Result<Primitive, BuildError> {
        primitive_for_datatype(datatype).ok_or_else(|| BuildError::UnresolvableDatatype {
            shape: cx.iri.clone(),
            property: name.to_string(),
            datatype: datatype.to_string(),
        })
    }

    fn enumeration(&self, cx: &ShapeCx, name: &str, head: &Term) -> Result<Enumeration, BuildError> {
        let items = self.list(cx, head)?;
        if items.is_empty() {
            return Err(cx.list_error(format!("sh:in of {} is empty", name)));
        }
        let mut members: Vec<EnumMember> = Vec::with_capacity(items.len());
        for (position, term) in items.into_iter().enumerate() {
            let (stem, document) = match (term.as_iri(), lexical(&term)) {
                (Some(iri), _) => (naming::local_name(iri).to_string(), iri.to_string()),
                (None, Some(lexical)) => (lexical.clone(), lexical),
                (None, None) => {
                    return Err(cx.list_error(format!("sh:in member {} is a blank node", term)))
                }
            };
            if members.iter().any(|m| m.term == term || m.document == document) {
                return Err(BuildError::DuplicateEnumerationMember {
                    shape: cx.iri.clone(),
                    property: name.to_string(),
                    member: term.to_string(),
                });
            }
            let mut variant = naming::type_ident(&stem).unwrap_or_else(|| format!("V{}", position));
            if members.iter().any(|m| m.variant == variant) {
                variant = format!("{}{}", variant, position);
            }
            members.push(EnumMember {
                variant,
                term,
                document,
            });
        }
        Ok(Enumeration {
            name: format!("{}{}", cx.name, naming::upper_camel(name)),
            members,
        })
    }

    fn primitive_union(&self, cx: &ShapeCx, name: &str, head: &Term) -> Result<ValueType, BuildError> {
        let mut members: Vec<Primitive> = Vec::new();
        for alternative in self.list(cx, head)? {
            let datatypes = self.iris(&alternative, shacl::DATATYPE).map_err(|m| {
                BuildError::ConflictingValueTypes {
                    shape: cx.iri.clone(),
                    property: name.to_string(),
                    message: format!("sh:or alternative sh:datatype {}", m),
                }
            })?;
            let primitive = match (datatypes.as_slice(), self.first(&alternative, shacl::NODE_KIND)) {
                ([datatype], _) => self.datatype(cx, name, datatype)?,
                ([], Some(kind)) => node_kind_primitive(&kind),
                _ => {
                    return Err(BuildError::ConflictingValueTypes {
                        shape: cx.iri.clone(),
                        property: name.to_string(),
                        message: format!(
                            "sh:or alternative {} must declare exactly one sh:datatype",
                            alternative
                        ),
                    })
                }
            };
            if !members.contains(&primitive) {
                members.push(primitive);
            }
        }
        match members.as_slice() {
            [] => Err(cx.list_error(format!("sh:or of {} is empty", name))),
            [only] => Ok(ValueType::Primitive(*only)),
            _ => Ok(ValueType::PrimitiveUnion(PrimitiveUnion {
                name: format!("{}{}", cx.name, naming::upper_camel(name)),
                members,
            })),
        }
    }

    fn finish_property(&self, cx: &ShapeCx, d: Declaration) -> Result<PropertyType, BuildError> {
        let malformed = |message: String| BuildError::MalformedCardinality {
            shape: cx.iri.clone(),
            property: d.name.clone(),
            message,
        };
        if let Some(max) = d.max {
            if max == 0 {
                return Err(malformed("sh:maxCount 0 admits no value".to_string()));
            }
            if d.min > max {
                return Err(malformed(format!(
                    "sh:minCount {} exceeds sh:maxCount {}",
                    d.min, max
                )));
            }
        }
        let mut cardinality = match (d.ordered, d.min, d.max) {
            (true, _, _) => Cardinality::List,
            (false, 0, Some(1)) => Cardinality::Optional,
            (false, _, Some(1)) => Cardinality::Required,
            (false, 0, _) => Cardinality::Set,
            (false, _, _) => Cardinality::NonEmptySet,
        };

        let default = match &d.default {
            None => None,
            Some(term) => {
                if cardinality.is_many() {
                    return Err(BuildError::InvalidDefault {
                        shape: cx.iri.clone(),
                        property: d.name.clone(),
                        message: format!("a {} property cannot have a default", cardinality),
                    });
                }
                cardinality = Cardinality::Required;
                Some(default_value(cx, &d.name, &d.value, term)?)
            }
        };

        Ok(PropertyType {
            field: naming::field_ident(&d.name),
            label: d.label.unwrap_or_else(|| naming::title(&d.name)),
            name: d.name,
            predicate: d.predicate,
            cardinality,
            value: d.value,
            default,
            has_value: d.has_value,
            language_in: d.language_in,
            mutable: d.mutable,
            visibility: d.visibility.unwrap_or_default(),
            order: d.order,
            index: d.index,
            description: d.description,
            declared_by: cx.name.clone(),
        })
    }
}

fn node_kind_primitive(kind: &Term) -> Primitive {
    match kind.as_iri() {
        Some(shacl::IRI) | Some(shacl::BLANK_NODE) | Some(shacl::BLANK_NODE_OR_IRI) => {
            Primitive::Identifier
        }
        Some(shacl::LITERAL) => Primitive::Literal,
        _ => Primitive::Term,
    }
}

fn term_primitive(term: &Term) -> Primitive {
    match term.as_literal() {
        None => Primitive::Identifier,
        Some((_, datatype, _)) => {
            primitive_for_datatype(datatype.as_iri()).unwrap_or(Primitive::Term)
        }
    }
}

/// Fold a repeated declaration of the same predicate into the first one
fn merge(cx: &ShapeCx, into: &mut Declaration, other: Declaration) -> Result<(), BuildError> {
    let name = into.name.clone();
    let conflict = |message: String| BuildError::ConflictingValueTypes {
        shape: cx.iri.clone(),
        property: name.clone(),
        message,
    };
    if into.ordered != other.ordered {
        return Err(BuildError::MalformedCardinality {
            shape: cx.iri.clone(),
            property: name.clone(),
            message: "declared both ordered and unordered".to_string(),
        });
    }

    let value = if into.value == other.value {
        other.value
    } else if into.value == ValueType::Primitive(Primitive::Term) {
        other.value
    } else if other.value == ValueType::Primitive(Primitive::Term) {
        into.value.clone()
    } else {
        return Err(conflict(format!(
            "{} and {}",
            into.value.describe(),
            other.value.describe()
        )));
    };

    let has_value = match (into.has_value.take(), other.has_value) {
        (Some(a), Some(b)) if a != b => {
            return Err(conflict(format!("sh:hasValue {} and {}", a, b)));
        }
        (a, b) => a.or(b),
    };
    let default = match (into.default.take(), other.default) {
        (Some(a), Some(b)) if a != b => {
            return Err(BuildError::InvalidDefault {
                shape: cx.iri.clone(),
                property: name.clone(),
                message: format!("conflicting defaults {} and {}", a, b),
            });
        }
        (a, b) => a.or(b),
    };

    into.value = value;
    into.has_value = has_value;
    into.default = default;
    into.min = into.min.max(other.min);
    into.max = match (into.max, other.max) {
        (Some(a), Some(b)) => Some(a.min(b)),
        (a, b) => a.or(b),
    };
    for language in other.language_in {
        if !into.language_in.contains(&language) {
            into.language_in.push(language);
        }
    }
    into.mutable |= other.mutable;
    into.visibility = into.visibility.or(other.visibility);
    into.order = into.order.or(other.order);
    into.label = into.label.take().or(other.label);
    into.description = into.description.take().or(other.description);
    Ok(())
}

fn default_value(
    cx: &ShapeCx,
    name: &str,
    value: &ValueType,
    term: &Term,
) -> Result<DefaultValue, BuildError> {
    let invalid = |message: String| BuildError::InvalidDefault {
        shape: cx.iri.clone(),
        property: name.to_string(),
        message,
    };
    let mismatch = || invalid(format!("{} is not a valid {}", term, value.describe()));
    let literal = term.as_literal().map(|(value, _, _)| value);
    let text = literal.map(LiteralValue::lexical);

    match value {
        ValueType::Primitive(Primitive::String) => match literal {
            Some(LiteralValue::String(s)) => Ok(DefaultValue::String(s.to_string())),
            _ => Err(mismatch()),
        },
        ValueType::Primitive(Primitive::Integer) => literal
            .and_then(|v| v.as_integer().or_else(|| v.as_str()?.trim().parse().ok()))
            .map(DefaultValue::Integer)
            .ok_or_else(mismatch),
        ValueType::Primitive(Primitive::Number) => literal
            .and_then(|v| v.as_double().or_else(|| v.as_str()?.trim().parse().ok()))
            .filter(|n: &f64| n.is_finite())
            .map(DefaultValue::Number)
            .ok_or_else(mismatch),
        ValueType::Primitive(Primitive::Boolean) => literal
            .and_then(|v| v.as_bool().or_else(|| v.as_str()?.trim().parse().ok()))
            .map(DefaultValue::Boolean)
            .ok_or_else(mismatch),
        ValueType::Primitive(Primitive::Date) => text
            .and_then(|t| NaiveDate::parse_from_str(t.trim(), "%Y-%m-%d").ok())
            .map(|d| DefaultValue::Date(d.year(), d.month(), d.day()))
            .ok_or_else(mismatch),
        ValueType::Primitive(Primitive::Identifier) => term
            .as_iri()
            .map(|iri| DefaultValue::Identifier(iri.to_string()))
            .ok_or_else(mismatch),
        ValueType::Enumeration(enumeration) => enumeration
            .members
            .iter()
            .position(|m| &m.term == term)
            .map(DefaultValue::Member)
            .ok_or_else(|| invalid(format!("{} is not a member of {}", term, enumeration.name))),
        _ => Err(BuildError::UnsupportedDefault {
            shape: cx.iri.clone(),
            property: name.to_string(),
        }),
    }
}

/// Build every node shape, in graph order, collecting all failures
pub fn build_shapes<G: ShapeGraph + ?Sized>(
    graph: &G,
    config: &ShapegenConfig,
) -> Result<Vec<ShapeType>, Vec<BuildError>> {
    let nodes = graph.node_shapes();
    let builder = Builder::new(graph, config);
    let results: Vec<Result<Option<ShapeType>, BuildError>> = if config.parallel {
        nodes
            .par_iter()
            .enumerate()
            .map(|(index, node)| builder.build(node, index))
            .collect()
    } else {
        nodes
            .iter()
            .enumerate()
            .map(|(index, node)| builder.build(node, index))
            .collect()
    };

    let mut shapes = Vec::with_capacity(results.len());
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(Some(shape)) => shapes.push(shape),
            Ok(None) => {}
            Err(err) => errors.push(err),
        }
    }
    if errors.is_empty() {
        Ok(shapes)
    } else {
        Err(errors)
    }
}
