//! Node traversal and markup emission.
//!
//! Each node moves through a fixed sequence: style plugins, content
//! plugins, wrapper emission, prelude, children (top, center, bottom
//! buckets), content, closers. Children are visited only after every
//! plugin of their parent has run.

use sprout_core::errors::CompileError;
use sprout_core::{NodeId, Result};
use sprout_layout::{compute_bounds, Sibling};

use crate::children::{expand_children, ChildEntry};
use crate::context::PluginContext;
use crate::state::VisitState;

/// Indenting line writer for JSX.
#[derive(Debug, Clone, Default)]
pub(crate) struct Printer {
    out: String,
    depth: usize,
}

impl Printer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Write each line of `text` at the current depth.
    pub(crate) fn line(&mut self, text: &str) {
        for line in text.lines() {
            for _ in 0..self.depth {
                self.out.push('\t');
            }
            self.out.push_str(line);
            self.out.push('\n');
        }
    }

    pub(crate) fn open(&mut self, text: &str) {
        self.line(text);
        self.depth += 1;
    }

    pub(crate) fn close(&mut self, text: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(text);
    }

    pub(crate) fn finish(self) -> String {
        self.out
    }
}

/// Visit `node_id` and everything below it.
///
/// `parent` is the node whose wrapper encloses this one; `None` makes
/// `node_id` the root of the component being built. `previous` is the
/// preceding member of the same bucket for stacked top/bottom children.
pub(crate) fn visit_node(
    cx: &mut PluginContext<'_>,
    printer: &mut Printer,
    node_id: NodeId,
    parent: Option<NodeId>,
    previous: Option<NodeId>,
    order: usize,
) -> Result<()> {
    let ctx = cx.ctx;
    let tree = ctx.tree;
    let not_found = |id: NodeId| CompileError::NodeNotFound(format!("#{}", id.0));

    let node = tree.get(node_id).ok_or_else(|| not_found(node_id))?;
    let parent_node = match parent {
        Some(id) => Some(tree.get(id).ok_or_else(|| not_found(id))?),
        None => None,
    };
    let sibling = match previous.and_then(|id| tree.get(id)) {
        Some(prev) => Sibling::After(&prev.attrs),
        None => Sibling::First,
    };
    let bounds = compute_bounds(&node.attrs, parent_node.map(|p| &p.attrs), sibling);

    let children = expand_children(tree, node_id);
    let mut state = VisitState::new(node, parent_node, bounds, order, children);
    tracing::trace!(id = %node.scene_id(), name = %node.name(), "visiting node");

    if state.is_root() {
        state.middle.set("width", "100%");
        state.middle.set("height", "100%");
    }

    for plugin in &ctx.plugins.style {
        plugin.apply(&mut state, cx)?;
    }
    for plugin in &ctx.plugins.content {
        plugin.apply(&mut state, cx)?;
    }

    if state.is_root() {
        state.outer.set("position", "relative");
        state.outer.set("width", "100%");
        state.outer.set("height", "100%");
    }

    let closers = emit_wrappers(&mut state, cx, printer);

    for fragment in &state.prelude {
        printer.line(fragment);
    }

    visit_bucket(cx, printer, node_id, &state.children.min, true)?;
    visit_bucket(cx, printer, node_id, &state.children.center, false)?;
    visit_bucket(cx, printer, node_id, &state.children.max, true)?;

    for fragment in &state.content {
        printer.line(fragment);
    }
    for _ in 0..closers {
        printer.close("</div>");
    }

    Ok(())
}

fn visit_bucket(
    cx: &mut PluginContext<'_>,
    printer: &mut Printer,
    parent: NodeId,
    bucket: &[ChildEntry],
    stacked: bool,
) -> Result<()> {
    let mut previous = None;
    for entry in bucket {
        visit_node(cx, printer, entry.id, Some(parent), previous, entry.order)?;
        if stacked {
            previous = Some(entry.id);
        }
    }
    Ok(())
}

/// Print the outer, middle and inner wrappers. Returns the number of
/// elements left open.
fn emit_wrappers(
    state: &mut VisitState<'_>,
    cx: &mut PluginContext<'_>,
    printer: &mut Printer,
) -> usize {
    if let Some(z_index) = state.middle.get("zIndex").cloned() {
        if !state.outer.is_empty() {
            state.outer.set("zIndex", z_index.clone());
        }
        if !state.inner.is_empty() {
            state.inner.set("zIndex", z_index);
        }
    }

    let middle_class = cx.scope.print_style(&state.middle);
    let outer_class = cx.scope.print_style(&state.outer);
    let inner_class = cx.scope.print_style(&state.inner);
    let mut closers = 0;

    if let Some(outer) = outer_class {
        printer.open(&format!("<div className='{outer}'>"));
        closers += 1;
    }

    let mut tag = String::from("<div");
    if !state.node_props.contains_key("id") {
        tag.push_str(&format!(" id='{}'", state.node.scene_id()));
    }
    for (key, value) in &state.node_props {
        tag.push_str(&format!(" {key}={{{value}}}"));
    }
    let classes: Vec<&str> = middle_class
        .as_deref()
        .into_iter()
        .chain(state.class_names.iter().map(String::as_str))
        .collect();
    tag.push_str(&format!(" className='{}'>", classes.join(" ")));
    printer.open(&tag);
    closers += 1;

    if let Some(inner) = inner_class {
        printer.open(&format!("<div className='{inner}'>"));
        closers += 1;
    }

    closers
}
