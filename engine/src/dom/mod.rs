pub mod node;
pub mod style;

pub use node::{Dom, DomNode, ElementData, Node, NodeId, NodeRef, NodeType};
pub use style::{css_url, inline_background_image, serialize_url};
