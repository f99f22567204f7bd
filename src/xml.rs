//! Generic XML infrastructure: document tree, parser, writer

pub mod cursor;
pub mod model;
pub mod parser;
pub mod writer;

pub use cursor::Cursor;
pub use model::{Content, Document, Element};
pub use parser::Parser;
pub use writer::{Config as WriterConfig, Writer};
