//! Graphviz export of a scene tree
//!
//! Used by the debugging helpers: the facade writes the active scene to a
//! `.dot` file so it can be rendered with `dot -Tsvg scene.dot > scene.svg`.

use std::collections::HashMap;
use std::io::{self, Write};
use std::rc::Rc;

use super::node::{walk, SceneRef};

/// Write `scene` as a Graphviz digraph.
///
/// Node identifiers are assigned in pre-order, so output is stable for a
/// given tree shape.
pub fn write_graph(scene: &SceneRef, out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "digraph scene {{")?;
    writeln!(out, "    node [shape=box, fontname=\"monospace\"];")?;

    // First pass: assign ids and emit node declarations.
    let mut ids: HashMap<usize, usize> = HashMap::new();
    let mut declarations: Vec<String> = Vec::new();
    walk(scene, &mut |node| {
        let id = ids.len();
        ids.insert(Rc::as_ptr(node) as usize, id);
        declarations.push(format!(
            "    n{} [label=\"{}\"];",
            id,
            node.borrow().kind().label()
        ));
    });
    for line in &declarations {
        writeln!(out, "{line}")?;
    }

    // Second pass: emit edges parent -> child.
    let mut edges: Vec<(usize, usize)> = Vec::new();
    walk(scene, &mut |node| {
        let from = ids[&(Rc::as_ptr(node) as usize)];
        for child in node.borrow().children() {
            let to = ids[&(Rc::as_ptr(child) as usize)];
            edges.push((from, to));
        }
    });
    for (from, to) in edges {
        writeln!(out, "    n{from} -> n{to};")?;
    }

    writeln!(out, "}}")
}
