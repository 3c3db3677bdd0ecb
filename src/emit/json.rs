//! JSON emitter: structured output for tooling integration.
//!
//! Serializes the page model directly, content trees included.

use super::Emitter;
use crate::error::EmitError;
use crate::page::Page;

pub struct JsonEmitter;

impl Emitter for JsonEmitter {
    fn emit(&self, page: &Page) -> Result<String, EmitError> {
        let mut out = serde_json::to_string_pretty(page)?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }

    /// One array, so the stream stays a single JSON document.
    fn emit_all(&self, pages: &[Page]) -> Result<String, EmitError> {
        let mut out = serde_json::to_string_pretty(pages)?;
        out.push('\n');
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::fixture;
    use crate::page::{build_page, PageOptions};
    use crate::signature::java::JavaLanguageService;
    use serde_json::Value;

    #[test]
    fn page_serializes_with_entries_and_content() {
        let loaded = fixture::load();
        let page = build_page(
            loaded.graph.node(loaded.roots[0]),
            &JavaLanguageService,
            &PageOptions::default(),
        )
        .unwrap();
        let out = JsonEmitter.emit(&page).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();

        assert_eq!(value["title"], "kotlin");
        assert_eq!(value["language"], "java");
        let entries = value["entries"].as_array().unwrap();
        let greet = entries.iter().find(|e| e["title"] == "greet").unwrap();
        assert_eq!(greet["kind"], "Function");
        assert_eq!(greet["signature"]["Text"], "void greet(String name)");
        assert!(greet.get("deprecation").is_some());

        let unit = entries.iter().find(|e| e["title"] == "Unit").unwrap();
        assert!(unit.get("deprecation").is_none());

        // Java never summarizes.
        assert_eq!(value["summaries"].as_array().unwrap().len(), 0);
        assert!(value.get("anchors").is_none());
    }

    #[test]
    fn several_pages_form_one_array() {
        let loaded = fixture::load();
        let root = loaded.graph.node(loaded.roots[0]);
        let greeter = root.members()[3];
        let pages = [
            build_page(root, &JavaLanguageService, &PageOptions::default()).unwrap(),
            build_page(greeter, &JavaLanguageService, &PageOptions::default()).unwrap(),
        ];
        let out = JsonEmitter.emit_all(&pages).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();

        let pages = value.as_array().unwrap();
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0]["title"], "kotlin");
        assert_eq!(pages[1]["title"], "Greeter");
    }
}
