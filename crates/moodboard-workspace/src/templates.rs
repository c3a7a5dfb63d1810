//! Seed workflow templates
//!
//! Templates are read-only starting points that can be dropped onto any
//! board. Injection is strictly additive: the template content is cloned
//! with every node and edge id regenerated, group back-references and
//! edge endpoints remapped to the fresh ids, and the result merged into
//! the live graph. Nothing already on the board is touched, and the same
//! template can be injected any number of times.

use std::collections::HashMap;

use board_engine::{BoardEditor, BoardGraph, GraphBuilder, NodeId};
use serde_json::json;
use uuid::Uuid;

use crate::error::{Result, WorkspaceError};

/// A read-only seed workflow
pub struct Template {
    /// Stable template identifier
    pub id: String,
    /// Palette display name
    pub name: String,
    /// Palette description
    pub description: String,
    graph: BoardGraph,
}

impl Template {
    /// Create a template around a prebuilt graph
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        graph: BoardGraph,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            graph,
        }
    }

    /// The seed graph
    pub fn graph(&self) -> &BoardGraph {
        &self.graph
    }
}

/// Fresh ids produced by one injection, in template declaration order
#[derive(Debug, Clone)]
pub struct InjectedTemplate {
    pub node_ids: Vec<NodeId>,
    pub edge_ids: Vec<String>,
}

/// Catalog of available templates
#[derive(Default)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
}

impl TemplateLibrary {
    /// Create an empty library
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a library holding the built-in seed workflows
    pub fn with_builtins() -> Self {
        let mut library = Self::empty();
        for template in [brand_mood_board(), content_pipeline(), visual_refresh()] {
            match template {
                Ok(template) => library.add(template),
                Err(e) => log::warn!("Skipping malformed built-in template: {e}"),
            }
        }
        library
    }

    /// Add a template
    pub fn add(&mut self, template: Template) {
        self.templates.push(template);
    }

    /// All templates, in registration order
    pub fn all(&self) -> &[Template] {
        &self.templates
    }

    /// Find a template by id
    pub fn template(&self, id: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.id == id)
    }

    /// Inject a template into the live board
    ///
    /// Every node and edge id is regenerated, so repeated injections of
    /// the same template never collide. Returns the fresh ids.
    pub fn inject(
        &self,
        editor: &mut BoardEditor,
        template_id: &str,
    ) -> Result<InjectedTemplate> {
        let template = self
            .template(template_id)
            .ok_or_else(|| WorkspaceError::template_not_found(template_id))?;

        let mut id_map: HashMap<&str, NodeId> = HashMap::new();
        for node in template.graph.nodes() {
            id_map.insert(node.id.as_str(), format!("node-{}", Uuid::new_v4()));
        }

        let mut nodes = Vec::with_capacity(template.graph.node_count());
        let mut node_ids = Vec::with_capacity(template.graph.node_count());
        for node in template.graph.nodes() {
            let mut clone = node.clone();
            if let Some(fresh) = id_map.get(node.id.as_str()) {
                clone.id = fresh.clone();
            }
            // Group references are internal to the template
            clone.group_id = clone
                .group_id
                .and_then(|group_id| id_map.get(group_id.as_str()).cloned());
            node_ids.push(clone.id.clone());
            nodes.push(clone);
        }

        let mut edges = Vec::with_capacity(template.graph.edge_count());
        let mut edge_ids = Vec::with_capacity(template.graph.edge_count());
        for edge in template.graph.edges() {
            let mut clone = edge.clone();
            clone.id = format!("edge-{}", Uuid::new_v4());
            if let Some(source) = id_map.get(edge.source.as_str()) {
                clone.source = source.clone();
            }
            if let Some(target) = id_map.get(edge.target.as_str()) {
                clone.target = target.clone();
            }
            edge_ids.push(clone.id.clone());
            edges.push(clone);
        }

        editor.merge_subgraph(nodes, edges)?;
        log::info!(
            "Injected template '{}' ({} node(s), {} edge(s))",
            template_id,
            node_ids.len(),
            edge_ids.len()
        );
        Ok(InjectedTemplate { node_ids, edge_ids })
    }
}

fn brand_mood_board() -> Result<Template> {
    let graph = GraphBuilder::new()
        .add_group("palette", "Palette", 40.0, 40.0, 460.0, 220.0)
        .add_node("swatch-1", "shape", 64.0, 104.0)
        .with_size(120.0, 120.0)
        .with_setting("fill", json!("#f97316"))
        .in_group("palette")
        .add_node("swatch-2", "shape", 204.0, 104.0)
        .with_size(120.0, 120.0)
        .with_setting("fill", json!("#0ea5e9"))
        .in_group("palette")
        .add_node("swatch-3", "shape", 344.0, 104.0)
        .with_size(120.0, 120.0)
        .with_setting("fill", json!("#facc15"))
        .in_group("palette")
        .add_node("brand-note", "text", 40.0, 300.0)
        .with_size(460.0, 120.0)
        .with_data("label", json!("Drop references and keep the palette honest."))
        .build()?;
    Ok(Template::new(
        "brand-mood-board",
        "Brand mood board",
        "A palette group and a note to anchor visual direction",
        graph,
    ))
}

fn content_pipeline() -> Result<Template> {
    let graph = GraphBuilder::new()
        .add_node("kickoff", "trigger", 40.0, 120.0)
        .add_node("writer", "content-generator", 320.0, 100.0)
        .with_setting("prompt", json!("Write a short product blurb."))
        .with_setting("tone", json!("energetic"))
        .add_node("draft", "text", 620.0, 120.0)
        .with_size(320.0, 180.0)
        .add_edge("kickoff", "out", "writer", "in")
        .add_edge("writer", "out", "draft", "in")
        .build()?;
    Ok(Template::new(
        "content-pipeline",
        "Content pipeline",
        "Trigger, generator, and a text card for the result",
        graph,
    ))
}

fn visual_refresh() -> Result<Template> {
    let graph = GraphBuilder::new()
        .add_node("concepts", "image-generator", 40.0, 80.0)
        .with_setting("prompt", json!("Soft-light product shots, pastel background."))
        .with_setting("aspect", json!("16:9"))
        .add_node("finish", "image-filter", 340.0, 80.0)
        .with_setting("filter", json!("vivid"))
        .add_node("hero", "image", 640.0, 60.0)
        .with_size(320.0, 240.0)
        .add_edge("concepts", "out", "finish", "in")
        .add_edge("finish", "out", "hero", "in")
        .build()?;
    Ok(Template::new(
        "visual-refresh",
        "Visual refresh",
        "Generate, filter, and place a hero image",
        graph,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_engine::Point;

    fn make_editor() -> BoardEditor {
        BoardEditor::new(board_nodes::builtin_registry().into_shared())
    }

    fn make_library() -> TemplateLibrary {
        let graph = GraphBuilder::new()
            .add_node("seed-a", "shape", 0.0, 0.0)
            .add_node("seed-b", "text", 300.0, 0.0)
            .add_edge("seed-a", "out", "seed-b", "in")
            .build()
            .unwrap();
        let mut library = TemplateLibrary::empty();
        library.add(Template::new("two-plus-one", "Two plus one", "", graph));
        library
    }

    #[test]
    fn test_builtins_present() {
        let library = TemplateLibrary::with_builtins();

        assert_eq!(library.all().len(), 3);
        assert!(library.template("brand-mood-board").is_some());
        assert!(library.template("content-pipeline").is_some());
        assert!(library.template("visual-refresh").is_some());
        for template in library.all() {
            assert!(!template.graph().is_empty(), "{} is empty", template.id);
        }
    }

    #[test]
    fn test_unknown_template_errors() {
        let library = make_library();
        let mut editor = make_editor();

        let err = library.inject(&mut editor, "ghost").unwrap_err();

        assert!(matches!(err, WorkspaceError::TemplateNotFound(_)));
        assert!(editor.graph().is_empty());
    }

    #[test]
    fn test_injection_is_additive() {
        let library = make_library();
        let mut editor = make_editor();
        let a = editor.add_node("shape", Point::new(0.0, 0.0)).unwrap();
        let b = editor.add_node("shape", Point::new(100.0, 0.0)).unwrap();
        let c = editor.add_node("text", Point::new(200.0, 0.0)).unwrap();
        editor.add_edge(&a, "out", &b, "in").unwrap();
        editor.add_edge(&b, "out", &c, "in").unwrap();

        let injected = library.inject(&mut editor, "two-plus-one").unwrap();

        assert_eq!(editor.graph().node_count(), 5);
        assert_eq!(editor.graph().edge_count(), 3);
        // Existing content is untouched
        for id in [&a, &b, &c] {
            assert!(editor.graph().contains_node(id));
        }
        // Injected nodes carry fresh ids, not the template's internal ones
        assert_eq!(injected.node_ids.len(), 2);
        assert!(!editor.graph().contains_node("seed-a"));
        for id in &injected.node_ids {
            assert!(editor.graph().contains_node(id));
        }
    }

    #[test]
    fn test_repeat_injection_never_collides() {
        let library = make_library();
        let mut editor = make_editor();

        let first = library.inject(&mut editor, "two-plus-one").unwrap();
        let second = library.inject(&mut editor, "two-plus-one").unwrap();

        assert_eq!(editor.graph().node_count(), 4);
        assert_eq!(editor.graph().edge_count(), 2);
        assert_ne!(first.node_ids, second.node_ids);
        // The template's own seed graph is untouched
        assert!(library
            .template("two-plus-one")
            .unwrap()
            .graph()
            .contains_node("seed-a"));
    }

    #[test]
    fn test_injection_remaps_group_membership() {
        let library = TemplateLibrary::with_builtins();
        let mut editor = make_editor();

        let injected = library.inject(&mut editor, "brand-mood-board").unwrap();

        // Template order: group first, then its three members, then the note
        let group_id = &injected.node_ids[0];
        let swatch_id = &injected.node_ids[1];
        assert!(editor.graph().node(group_id).unwrap().is_group());
        assert_eq!(
            editor.graph().group_of(swatch_id),
            Some(group_id.as_str())
        );
    }
}
