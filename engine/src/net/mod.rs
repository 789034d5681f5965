pub mod url;

pub use url::{decode_uri_component, ParsedUrl};
