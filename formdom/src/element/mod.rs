mod node;
mod tag;

pub use node::Element;
pub use tag::Tag;

/// Find an element by ID in an element tree that has not been loaded into a
/// document yet.
pub fn find_element<'a>(root: &'a Element, id: &str) -> Option<&'a Element> {
    if root.id == id {
        return Some(root);
    }

    root.children.iter().find_map(|child| find_element(child, id))
}
