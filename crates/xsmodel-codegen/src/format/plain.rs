use super::OutputFormat;

/// Plain serde structs: generic types, Rust identifiers on the wire.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormat;

impl OutputFormat for PlainFormat {
    fn name(&self) -> &str {
        "plain"
    }

    fn description(&self) -> &str {
        "serde structs with generic field types and no alias metadata"
    }
}
