//! Document parser implementations

mod plain_text;

pub use plain_text::PlainTextParser;
