//! Scene graph normalization.
//!
//! Builds a [`NodeTree`] from the visible component roots of a canvas and
//! collects every asset the later stages will need, so resources can be
//! resolved in one batch before any node is visited.

use indexmap::IndexSet;
use sprout_assets::ResourceRequest;
use sprout_core::scene::{Constraints, NodeType, PaintType, SceneNode};
use sprout_core::{CompileOptions, NodeId, NodeTree, Params};

/// Result of preprocessing a canvas.
#[derive(Debug, Clone, Default)]
pub struct Preprocessed {
    pub tree: NodeTree,
    /// Scene ids of collapsed and leaf vectors
    pub vector_ids: IndexSet<String>,
    /// Image-fill references
    pub image_refs: IndexSet<String>,
    /// Scene ids of masks consumed by a sibling
    pub mask_ids: IndexSet<String>,
    /// Ids whose component description is looked up
    pub description_ids: IndexSet<String>,
}

impl Preprocessed {
    /// Visible top-level `#` nodes in document order.
    pub fn component_roots(&self) -> &[NodeId] {
        self.tree.roots()
    }

    /// One resource batch covering every collected asset.
    pub fn resource_request(&self) -> ResourceRequest {
        ResourceRequest::new()
            .with_vectors(self.vector_ids.iter().cloned())
            .with_images(self.image_refs.iter().cloned())
            .with_masks(self.mask_ids.iter().cloned())
    }
}

/// Normalize the component roots of `canvas`.
#[tracing::instrument(skip_all, fields(canvas = %canvas.attrs.id))]
pub fn preprocess(canvas: &SceneNode, options: &CompileOptions) -> Preprocessed {
    let mut out = Preprocessed::default();

    for child in &canvas.children {
        if child.attrs.visible && child.attrs.is_component_root() {
            add_node(&mut out, child, None, options);
        }
    }

    tracing::debug!(
        nodes = out.tree.len(),
        components = out.component_roots().len(),
        vectors = out.vector_ids.len(),
        images = out.image_refs.len(),
        masks = out.mask_ids.len(),
        "Preprocessed canvas"
    );

    out
}

fn add_node(
    out: &mut Preprocessed,
    scene: &SceneNode,
    parent: Option<NodeId>,
    options: &CompileOptions,
) -> NodeId {
    let attrs = &scene.attrs;
    let mut kind = attrs.node_type;
    let mut constraints = attrs.constraints.unwrap_or_default();

    if attrs.requires_render() {
        kind = NodeType::Vector;
    }

    let visible: Vec<&SceneNode> = scene.children.iter().filter(|c| c.attrs.visible).collect();

    if !attrs.is_component_root() {
        if let Some(shared) = shared_vector_constraints(&visible) {
            kind = NodeType::Vector;
            constraints = shared;
        }
    }

    let is_vector = kind.is_vector_family();
    if is_vector {
        kind = NodeType::Vector;
    }

    let params = Params::parse(&attrs.name, &options.delimiters);
    let id = out.tree.push(attrs.clone(), kind, constraints, params, parent);

    if is_vector {
        out.vector_ids.insert(attrs.id.clone());
    }
    for paint in attrs.fills.iter().filter(|p| p.paint_type == PaintType::Image) {
        if let Some(image_ref) = &paint.image_ref {
            out.image_refs.insert(image_ref.clone());
        }
    }
    if attrs.is_component_root() || attrs.node_type == NodeType::Component {
        out.description_ids.insert(attrs.id.clone());
    }
    if let Some(component_id) = &attrs.component_id {
        out.description_ids.insert(component_id.clone());
    }

    if is_vector {
        return id;
    }

    for child in visible {
        let child_id = add_node(out, child, Some(id), options);
        if !child.attrs.is_mask {
            continue;
        }
        if let Some(target) = out.tree.previous_sibling(child_id) {
            out.tree.set_mask(target, child_id);
            out.mask_ids.insert(child.attrs.id.clone());
        }
    }

    id
}

/// Constraint pair shared by a non-empty, vectors-only child list.
fn shared_vector_constraints(children: &[&SceneNode]) -> Option<Constraints> {
    let (first, rest) = children.split_first()?;
    if !first.attrs.node_type.is_vector_family() {
        return None;
    }
    let pair = first.attrs.constraints.unwrap_or_default();
    rest.iter()
        .all(|c| {
            c.attrs.node_type.is_vector_family() && c.attrs.constraints.unwrap_or_default() == pair
        })
        .then_some(pair)
}
