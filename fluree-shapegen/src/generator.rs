//! Pipeline driver: build, link, parity check, emit, assemble

use crate::accessor::ShapeGraph;
use crate::assemble::assemble;
use crate::builder::build_shapes;
use crate::config::ShapegenConfig;
use crate::emit::emit_model;
use crate::error::{GenerateError, Result};
use crate::link::link;
use crate::parity;
use std::fs;
use std::path::Path;
use tracing::{debug, debug_span};

/// Rendered module plus the names of the types it defines
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedModule {
    pub source: String,
    /// Auxiliary and shape types, in emission order
    pub type_names: Vec<String>,
}

impl GeneratedModule {
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Write the module, leaving the file untouched when its contents match
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if fs::read_to_string(path).is_ok_and(|existing| existing == self.source) {
            debug!(path = %path.display(), "generated module unchanged");
            return Ok(());
        }
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, &self.source)?;
        debug!(path = %path.display(), bytes = self.source.len(), "wrote generated module");
        Ok(())
    }
}

/// Compiles a shapes graph into a Rust module
#[derive(Debug, Clone, Default)]
pub struct Generator {
    config: ShapegenConfig,
}

impl Generator {
    pub fn new(config: ShapegenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShapegenConfig {
        &self.config
    }

    pub fn generate<G: ShapeGraph + ?Sized>(&self, graph: &G) -> Result<GeneratedModule> {
        let shapes = {
            let _span = debug_span!("shapegen_build", parallel = self.config.parallel).entered();
            build_shapes(graph, &self.config).map_err(GenerateError::Build)?
        };
        let model = link(shapes)?;
        parity::check(&model)?;
        let items = emit_model(&model);
        let source = assemble(&self.config, items)?;
        debug!(
            types = model.type_names().len(),
            bytes = source.len(),
            "generated module"
        );
        Ok(GeneratedModule {
            source,
            type_names: model.type_names(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsl::{NodeShape, PropertyShape, ShapesGraphBuilder};
    use crate::error::BuildError;
    use fluree_vocab::xsd;
    use pretty_assertions::assert_eq;

    const EX: &str = "http://example.org/";

    fn ex(local: &str) -> String {
        format!("{}{}", EX, local)
    }

    #[test]
    fn test_generate_lists_types() {
        let mut b = ShapesGraphBuilder::new();
        b.shape(
            NodeShape::new(&ex("NoteShape"))
                .target_class(&ex("Note"))
                .property(
                    PropertyShape::new(&ex("color"))
                        .in_iris(&[&ex("Red"), &ex("Blue")])
                        .required(),
                ),
        );
        let module = Generator::new(ShapegenConfig::default().with_parallel(false))
            .generate(&b.into_accessor())
            .unwrap();
        assert_eq!(module.type_names, vec!["NoteColor".to_string(), "Note".to_string()]);
        assert!(module.source.contains("pub struct Note"));
        assert!(module.source.contains("pub enum NoteColor"));
    }

    #[test]
    fn test_build_errors_are_all_reported() {
        let mut b = ShapesGraphBuilder::new();
        for name in ["AShape", "BShape"] {
            b.shape(
                NodeShape::new(&ex(name)).property(
                    PropertyShape::new(&ex("p"))
                        .datatype(xsd::STRING)
                        .min_count(2)
                        .max_count(1),
                ),
            );
        }
        let err = Generator::default().generate(&b.into_accessor()).unwrap_err();
        match err {
            GenerateError::Build(errors) => {
                assert_eq!(errors.len(), 2);
                assert!(errors
                    .iter()
                    .all(|e| matches!(e, BuildError::MalformedCardinality { .. })));
            }
            other => panic!("expected build errors, got {other}"),
        }
    }

    #[test]
    fn test_write_to_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("shapes.rs");
        let module = GeneratedModule {
            source: "// empty\n".to_string(),
            type_names: Vec::new(),
        };
        module.write_to(&path).unwrap();
        module.write_to(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "// empty\n");
    }
}
