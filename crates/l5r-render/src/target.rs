//! The render target capability.
//!
//! The renderer never walks a concrete tree itself. It asks the target for
//! its text nodes and hands back replacement fragments, so any host tree can
//! be rendered into by implementing [`TextRenderTarget`].

use std::fmt;

use crate::tree::{Element, Node};
use crate::{Fragment, RenderError};

/// Position of a text node: child indices from the root.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub Vec<usize>);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// A tree whose text nodes can be enumerated and replaced.
pub trait TextRenderTarget {
    /// Every text node, depth-first in document order.
    fn text_nodes(&self) -> Vec<(NodeId, String)>;

    /// Replace one text node by a sequence of fragments.
    ///
    /// Replacing a node may shift the ids of nodes that follow it, so callers
    /// apply replacements in reverse document order.
    fn replace_text(&mut self, id: &NodeId, fragments: Vec<Fragment>) -> Result<(), RenderError>;
}

impl TextRenderTarget for Element {
    fn text_nodes(&self) -> Vec<(NodeId, String)> {
        let mut nodes = Vec::new();
        let mut path = Vec::new();
        collect_text_nodes(&self.children, &mut path, &mut nodes);
        nodes
    }

    fn replace_text(&mut self, id: &NodeId, fragments: Vec<Fragment>) -> Result<(), RenderError> {
        let Some((&index, parents)) = id.0.split_last() else {
            return Err(RenderError::NotText(id.clone()));
        };

        let mut parent = self;
        for &i in parents {
            parent = match parent.children.get_mut(i) {
                Some(Node::Element(child)) => child,
                _ => return Err(RenderError::StaleNode(id.clone())),
            };
        }

        match parent.children.get(index) {
            Some(Node::Text(_)) => {}
            Some(_) => return Err(RenderError::NotText(id.clone())),
            None => return Err(RenderError::StaleNode(id.clone())),
        }

        let replacement = fragments.into_iter().map(|fragment| match fragment {
            Fragment::Text(text) => Node::Text(text),
            Fragment::Symbol(icon) => Node::Element(icon.to_element()),
        });
        parent.children.splice(index..=index, replacement);
        Ok(())
    }
}

fn collect_text_nodes(children: &[Node], path: &mut Vec<usize>, out: &mut Vec<(NodeId, String)>) {
    for (i, child) in children.iter().enumerate() {
        path.push(i);
        match child {
            Node::Text(text) => out.push((NodeId(path.clone()), text.clone())),
            Node::Element(element) => collect_text_nodes(&element.children, path, out),
            Node::Raw(_) => {}
        }
        path.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sample() -> Element {
        Element::new("div")
            .with_child(Element::new("p").with_text("one"))
            .with_child(Node::Raw("<i>raw</i>".to_owned()))
            .with_child(
                Element::new("ul").with_child(
                    Element::new("li")
                        .with_text("two")
                        .with_child(Element::new("b").with_text("three")),
                ),
            )
    }

    #[test]
    fn test_text_nodes_depth_first() {
        let nodes = sample().text_nodes();

        assert_eq!(
            nodes,
            vec![
                (NodeId(vec![0, 0]), "one".to_owned()),
                (NodeId(vec![2, 0, 0]), "two".to_owned()),
                (NodeId(vec![2, 0, 1, 0]), "three".to_owned()),
            ]
        );
    }

    #[test]
    fn test_replace_text_splices_fragments() {
        let mut root = sample();

        root.replace_text(
            &NodeId(vec![0, 0]),
            vec![Fragment::Text("a".to_owned()), Fragment::Text("b".to_owned())],
        )
        .unwrap();

        assert_eq!(root.to_html(), "<div><p>ab</p><i>raw</i><ul><li>two<b>three</b></li></ul></div>");
        assert_eq!(root.text_nodes().len(), 4);
    }

    #[test]
    fn test_replace_text_rejects_bad_ids() {
        let mut root = sample();

        assert!(matches!(
            root.replace_text(&NodeId(vec![9, 0]), Vec::new()),
            Err(RenderError::StaleNode(_))
        ));
        assert!(matches!(
            root.replace_text(&NodeId(vec![2]), Vec::new()),
            Err(RenderError::NotText(_))
        ));
        assert!(matches!(
            root.replace_text(&NodeId(Vec::new()), Vec::new()),
            Err(RenderError::NotText(_))
        ));
    }

    #[test]
    fn test_node_id_display() {
        assert_eq!(NodeId(vec![2, 0, 1]).to_string(), "2.0.1");
    }
}
