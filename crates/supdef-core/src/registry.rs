//! Macro registry (C4): name → pragma lookup across the import tree.

use crate::pragma::{LineItem, Pragma};
use crate::unit::InputUnit;
use std::collections::HashMap;

/// Maps macro names to the (Define or Runnable) pragma that defines them,
/// resolved by a pre-order traversal of the import tree: the first
/// declaration wins.
#[derive(Debug, Clone)]
pub struct MacroRegistry<'a> {
    macros: HashMap<String, &'a Pragma>,
    /// Names in first-seen order, for deterministic iteration (e.g. logging).
    order: Vec<String>,
}

impl<'a> MacroRegistry<'a> {
    /// Build a registry from a unit tree's pre-order traversal.
    ///
    /// Only `Define` and `Runnable` pragmas are registered; `Import` is not
    /// a callable macro.
    pub fn build(root: &'a InputUnit) -> Self {
        let mut macros = HashMap::new();
        let mut order = Vec::new();

        for unit in root.preorder() {
            for item in &unit.items {
                if let LineItem::Pragma { pragma, .. } = item {
                    match pragma {
                        Pragma::Define { name, .. } | Pragma::Runnable { name, .. } => {
                            if !macros.contains_key(name) {
                                macros.insert(name.clone(), pragma);
                                order.push(name.clone());
                            }
                        }
                        Pragma::Import { .. } => {}
                    }
                }
            }
        }

        Self { macros, order }
    }

    /// Look up a macro by name.
    pub fn get(&self, name: &str) -> Option<&'a Pragma> {
        self.macros.get(name).copied()
    }

    /// Whether `name` refers to a registered macro.
    pub fn contains(&self, name: &str) -> bool {
        self.macros.contains_key(name)
    }

    /// Registered names, in first-declaration order.
    pub fn names(&self) -> &[String] {
        &self.order
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pragma::scan_pragmas;
    use std::path::PathBuf;

    fn unit(text: &str) -> InputUnit {
        let path = PathBuf::from("test.sd");
        let items = scan_pragmas(&path, text).unwrap();
        InputUnit::new(path, text.to_string(), items)
    }

    #[test]
    fn registers_define_and_runnable_only() {
        let root = unit(concat!(
            "#pragma supdef import <lib.sd>\n",
            "#pragma supdef begin GREET\nHello, $1!\n#pragma supdef end\n",
            "#pragma supdef runnable trycompile begin RUN\nbody\n#pragma supdef end\n",
        ));
        let registry = MacroRegistry::build(&root);
        assert!(registry.contains("GREET"));
        assert!(registry.contains("RUN"));
        assert!(!registry.contains("lib.sd"));
        assert_eq!(registry.names(), &["GREET".to_string(), "RUN".to_string()]);
    }

    #[test]
    fn first_declaration_wins_across_import_tree() {
        let mut child = unit("#pragma supdef begin DUP\nchild\n#pragma supdef end\n");
        child.path = PathBuf::from("child.sd");
        let mut root = unit("#pragma supdef begin DUP\nroot\n#pragma supdef end\n");
        root.imports.push(child);

        let registry = MacroRegistry::build(&root);
        match registry.get("DUP").unwrap() {
            Pragma::Define { body, .. } => assert_eq!(body, "root"),
            other => panic!("unexpected pragma: {other:?}"),
        }
    }
}
