//! [`InputUnit`]: one source file after lexical normalisation, plus its
//! imported children.

use crate::pragma::{scan_pragmas, LineItem};
use std::path::PathBuf;

/// One source file after normalisation: its text, the parsed line items,
/// and the tree of files it imports.
///
/// `raw_text` is guaranteed (by construction via [`crate::normalize::normalize`])
/// to contain no `//`/`/* */` comments and no mid-literal line continuations;
/// string/character literal boundaries are preserved exactly.
#[derive(Debug, Clone)]
pub struct InputUnit {
    /// Absolute, canonical path of this unit's source file.
    pub path: PathBuf,
    /// Normalised text (see module docs for the invariant it upholds).
    pub raw_text: String,
    /// Ordered line items parsed from `raw_text`.
    pub items: Vec<LineItem>,
    /// Child units reached via `import` pragmas, in declaration order.
    pub imports: Vec<InputUnit>,
}

impl InputUnit {
    /// Construct a unit from its already-normalised text and parsed items.
    pub fn new(path: PathBuf, raw_text: String, items: Vec<LineItem>) -> Self {
        Self {
            path,
            raw_text,
            items,
            imports: Vec::new(),
        }
    }

    /// Pre-order iterator over this unit and every transitively imported unit.
    pub fn preorder(&self) -> impl Iterator<Item = &InputUnit> {
        PreorderIter {
            stack: vec![self],
        }
    }

    /// Render this unit's text with every `#pragma supdef` directive (and
    /// the lines of its body, for `begin`/`end` blocks) replaced by blank
    /// lines, per §6: pragma lines become empty lines so non-pragma line
    /// numbers are preserved, while plain source lines pass through verbatim.
    pub fn rendered_text(&self) -> String {
        let mut lines_out: Vec<String> = Vec::new();
        for item in &self.items {
            match item {
                LineItem::Text { text, .. } => lines_out.push(text.clone()),
                LineItem::Pragma { span_lines, .. } => {
                    for _ in 0..*span_lines {
                        lines_out.push(String::new());
                    }
                }
            }
        }
        lines_out.join("\n")
    }
}

struct PreorderIter<'a> {
    stack: Vec<&'a InputUnit>,
}

impl<'a> Iterator for PreorderIter<'a> {
    type Item = &'a InputUnit;

    fn next(&mut self) -> Option<Self::Item> {
        let unit = self.stack.pop()?;
        // Push children in reverse so they're popped in declaration order.
        for child in unit.imports.iter().rev() {
            self.stack.push(child);
        }
        Some(unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preorder_visits_self_then_children_in_order() {
        let leaf_a = InputUnit::new(PathBuf::from("a.sd"), String::new(), Vec::new());
        let leaf_b = InputUnit::new(PathBuf::from("b.sd"), String::new(), Vec::new());
        let mut root = InputUnit::new(PathBuf::from("root.sd"), String::new(), Vec::new());
        root.imports.push(leaf_a);
        root.imports.push(leaf_b);

        let names: Vec<_> = root
            .preorder()
            .map(|u| u.path.to_str().unwrap())
            .collect();
        assert_eq!(names, vec!["root.sd", "a.sd", "b.sd"]);
    }

    #[test]
    fn rendered_text_blanks_pragma_block_preserving_line_count() {
        let text = concat!(
            "before\n",
            "#pragma supdef begin GREET\n",
            "Hello, $1!\n",
            "#pragma supdef end\n",
            "GREET(world)\n",
        );
        let path = PathBuf::from("t.sd");
        let items = scan_pragmas(&path, text).unwrap();
        let unit = InputUnit::new(path, text.to_string(), items);
        let rendered = unit.rendered_text();
        assert_eq!(text.lines().count(), rendered.lines().count());
        assert_eq!(rendered.lines().next().unwrap(), "before");
        assert!(rendered.lines().nth(1).unwrap().is_empty());
        assert!(rendered.lines().nth(2).unwrap().is_empty());
        assert!(rendered.lines().nth(3).unwrap().is_empty());
        assert_eq!(rendered.lines().nth(4).unwrap(), "GREET(world)");
    }
}
