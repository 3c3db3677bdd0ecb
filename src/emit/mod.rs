//! Emitters: trait-based output format dispatch.

pub mod json;
pub mod markdown;
pub mod text;

use crate::error::EmitError;
use crate::page::Page;
use anyhow::{anyhow, Result};

/// Writes a [`Page`] in one output format.
pub trait Emitter {
    fn emit(&self, page: &Page) -> Result<String, EmitError>;
    fn file_extension(&self) -> &str;

    /// Several pages as one output stream, separated by blank lines.
    fn emit_all(&self, pages: &[Page]) -> Result<String, EmitError> {
        let texts = pages
            .iter()
            .map(|page| self.emit(page))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(texts.join("\n"))
    }
}

/// Create an emitter for the given format name.
pub fn create_emitter(format: &str) -> Result<Box<dyn Emitter>> {
    match format {
        "text" | "txt" => Ok(Box::new(text::TextEmitter)),
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownEmitter)),
        "json" => Ok(Box::new(json::JsonEmitter)),
        _ => Err(anyhow!(
            "unknown format: {}. Use text, markdown, or json",
            format
        )),
    }
}

#[cfg(test)]
pub(crate) mod fixture {
    use crate::model::load::{load_str, Loaded};

    /// Small package with docs, links, a deprecated member and overloads.
    pub const INPUT: &str = r#"{
        "declarations": [
            {
                "name": "kotlin",
                "kind": "Package",
                "members": [
                    { "name": "Unit", "kind": "Class" },
                    { "name": "IntArray", "kind": "Class" },
                    { "name": "List", "kind": "Class" },
                    {
                        "name": "Greeter",
                        "kind": "Class",
                        "doc": "Says *hello*. See [greet].\n\n@param name who to greet\n@since 1.0",
                        "members": [
                            {
                                "name": "greet",
                                "kind": "Function",
                                "deprecated": "Use wave",
                                "details": [
                                    {
                                        "name": "name",
                                        "kind": "Parameter",
                                        "details": [{ "name": "String", "kind": "Type" }]
                                    },
                                    { "name": "Unit", "kind": "Type", "hidden_links": ["kotlin.Unit"] }
                                ]
                            }
                        ]
                    },
                    {
                        "name": "first",
                        "kind": "Function",
                        "details": [
                            { "name": "T", "kind": "TypeParameter" },
                            {
                                "name": "$receiver",
                                "kind": "Receiver",
                                "details": [{ "name": "IntArray", "kind": "Type", "links": ["kotlin.IntArray"] }]
                            },
                            { "name": "T", "kind": "Type" }
                        ]
                    },
                    {
                        "name": "first",
                        "kind": "Function",
                        "details": [
                            { "name": "T", "kind": "TypeParameter" },
                            {
                                "name": "$receiver",
                                "kind": "Receiver",
                                "details": [{ "name": "List", "kind": "Type", "links": ["kotlin.List"] }]
                            },
                            { "name": "T", "kind": "Type" }
                        ]
                    }
                ]
            }
        ]
    }"#;

    pub fn load() -> Loaded {
        load_str(INPUT).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_known_emitters() {
        assert_eq!(create_emitter("text").unwrap().file_extension(), "txt");
        assert_eq!(create_emitter("md").unwrap().file_extension(), "md");
        assert_eq!(create_emitter("json").unwrap().file_extension(), "json");
        assert!(create_emitter("html").is_err());
    }
}
