//! Per-unit cyclomatic complexity via tree-sitter.
//!
//! Walks a file's syntax tree and emits one [`ComplexityUnit`] per function
//! or method: 1 plus the number of decision points (branches, loops, case
//! arms, exception handlers, short-circuit operators) in its body. Nested
//! functions are measured as their own units, not folded into the enclosing
//! one.

use caldera_core::{CalderaError, Result};
use tree_sitter::{Node, Parser};

use crate::walker::{Language, SourceFile};

/// One measured construct and its complexity value.
///
/// # Examples
///
/// ```
/// use caldera_complexity::metrics::{ComplexityUnit, UnitKind};
///
/// let unit = ComplexityUnit {
///     name: "resolve".into(),
///     kind: UnitKind::Function,
///     line: 14,
///     complexity: 4,
/// };
/// assert!(unit.complexity >= 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComplexityUnit {
    /// Unit name (function or method name; `<anonymous>` when unnamed).
    pub name: String,
    /// What kind of construct was measured.
    pub kind: UnitKind,
    /// 1-indexed line where the unit starts.
    pub line: u32,
    /// Cyclomatic complexity; always >= 1.
    pub complexity: u32,
}

/// Classification of measured units.
///
/// # Examples
///
/// ```
/// use caldera_complexity::metrics::UnitKind;
///
/// assert_ne!(UnitKind::Function, UnitKind::Method);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnitKind {
    /// Free function.
    Function,
    /// Function nested inside a class, impl block, or module body.
    Method,
    /// Class-level construct (accepted from backends that emit them).
    Class,
}

/// A source of per-unit complexity numbers.
///
/// Any static-analysis backend that can turn file contents into a set of
/// measured units satisfies this contract.
pub trait ComplexitySource: Sync {
    /// Verify the backend can be invoked at all.
    ///
    /// # Errors
    ///
    /// Returns [`CalderaError::Complexity`] when the backend is missing a
    /// required capability; this aborts the run before any ranking.
    fn ensure_available(&self) -> Result<()>;

    /// Measure all units in `file`.
    ///
    /// A file in an unsupported language yields `Ok` with zero units. An
    /// `Err` here is a per-file failure: the caller records complexity 0,
    /// surfaces a warning, and continues.
    fn units(&self, file: &SourceFile) -> Result<Vec<ComplexityUnit>>;
}

/// Tree-sitter backed [`ComplexitySource`] covering the walker's language set.
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use caldera_complexity::metrics::{ComplexitySource, TreeSitterSource};
/// use caldera_complexity::walker::{Language, SourceFile};
///
/// let file = SourceFile {
///     path: PathBuf::from("example.rs"),
///     language: Language::Rust,
///     content: "fn f(x: i32) -> i32 { if x > 0 { x } else { -x } }".into(),
/// };
/// let units = TreeSitterSource.units(&file).unwrap();
/// assert_eq!(units.len(), 1);
/// assert_eq!(units[0].name, "f");
/// assert!(units[0].complexity >= 2);
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct TreeSitterSource;

impl ComplexitySource for TreeSitterSource {
    fn ensure_available(&self) -> Result<()> {
        let mut parser = Parser::new();
        let language = Language::Rust
            .tree_sitter_language()
            .ok_or_else(|| CalderaError::Complexity("no grammar available".into()))?;
        parser
            .set_language(&language)
            .map_err(|e| CalderaError::Complexity(format!("failed to load grammar: {e}")))?;
        Ok(())
    }

    fn units(&self, file: &SourceFile) -> Result<Vec<ComplexityUnit>> {
        let Some(ts_language) = file.language.tree_sitter_language() else {
            return Ok(Vec::new());
        };

        let mut parser = Parser::new();
        parser
            .set_language(&ts_language)
            .map_err(|e| CalderaError::Complexity(format!("failed to set language: {e}")))?;

        let Some(tree) = parser.parse(&file.content, None) else {
            return Err(CalderaError::Complexity(format!(
                "failed to parse {}",
                file.path.display()
            )));
        };

        let mut units = Vec::new();
        collect_units(
            tree.root_node(),
            file.content.as_bytes(),
            file.language,
            false,
            &mut units,
        );
        Ok(units)
    }
}

fn is_function_kind(language: Language, kind: &str) -> bool {
    match language {
        Language::Rust => kind == "function_item",
        Language::Python => kind == "function_definition",
        Language::TypeScript | Language::JavaScript => matches!(
            kind,
            "function_declaration" | "generator_function_declaration" | "method_definition"
        ),
        Language::Go => matches!(kind, "function_declaration" | "method_declaration"),
        Language::Java => matches!(kind, "method_declaration" | "constructor_declaration"),
        Language::C | Language::Cpp => kind == "function_definition",
        Language::Ruby => matches!(kind, "method" | "singleton_method"),
        Language::Php => matches!(kind, "function_definition" | "method_declaration"),
        Language::Kotlin | Language::Swift => kind == "function_declaration",
        Language::Unknown => false,
    }
}

fn is_class_kind(kind: &str) -> bool {
    matches!(
        kind,
        "class_definition"
            | "class_declaration"
            | "class_specifier"
            | "class"
            | "module"
            | "impl_item"
            | "object_declaration"
            | "interface_declaration"
    )
}

fn collect_units(
    node: Node,
    source: &[u8],
    language: Language,
    in_class: bool,
    units: &mut Vec<ComplexityUnit>,
) {
    let kind_str = node.kind();

    if node.is_named() && is_function_kind(language, kind_str) {
        let method_like = in_class || matches!(kind_str, "method_definition" | "method");
        units.push(ComplexityUnit {
            name: unit_name(&node, source),
            kind: if method_like {
                UnitKind::Method
            } else {
                UnitKind::Function
            },
            line: node.start_position().row as u32 + 1,
            complexity: 1 + count_decisions(node, source, language),
        });

        // Nested definitions become their own units.
        for i in 0..node.child_count() {
            if let Some(child) = node.child(i) {
                collect_units(child, source, language, false, units);
            }
        }
        return;
    }

    let next_in_class = in_class || (node.is_named() && is_class_kind(kind_str));
    for i in 0..node.child_count() {
        if let Some(child) = node.child(i) {
            collect_units(child, source, language, next_in_class, units);
        }
    }
}

/// Count decision points in `node`'s subtree, stopping at nested functions.
fn count_decisions(node: Node, source: &[u8], language: Language) -> u32 {
    let mut count = 0;
    for i in 0..node.child_count() {
        let Some(child) = node.child(i) else {
            continue;
        };
        if child.is_named() && is_function_kind(language, child.kind()) {
            continue;
        }
        if is_decision(&child, source) {
            count += 1;
        }
        count += count_decisions(child, source, language);
    }
    count
}

fn is_decision(node: &Node, source: &[u8]) -> bool {
    if !node.is_named() {
        return false;
    }
    match node.kind() {
        // Branching and loops.
        "if_statement" | "if_expression" | "elif_clause" | "guard_statement"
        | "while_statement" | "while_expression" | "do_statement" | "do_while_statement"
        | "repeat_while_statement" | "for_statement" | "for_expression" | "for_in_statement"
        | "foreach_statement" | "enhanced_for_statement" => true,
        // Case arms.
        "match_arm" | "when_entry" | "case_clause" | "case_statement" | "switch_case"
        | "switch_rule" | "switch_entry" | "expression_case" | "type_case"
        | "communication_case" => true,
        // Exception handlers.
        "catch_clause" | "catch_block" | "except_clause" => true,
        // Ternaries.
        "conditional_expression" | "ternary_expression" => true,
        // Ruby keyword nodes are named and carry bare kinds.
        "if" | "unless" | "elsif" | "while" | "until" | "when" | "rescue" | "conditional" => true,
        // Short-circuit operators with dedicated node kinds.
        "boolean_operator" | "conjunction_expression" | "disjunction_expression" => true,
        // Generic binary expressions: only && / || / and / or.
        "binary_expression" | "binary" => matches!(
            operator_text(node, source).as_deref(),
            Some("&&") | Some("||") | Some("and") | Some("or")
        ),
        _ => false,
    }
}

fn operator_text(node: &Node, source: &[u8]) -> Option<String> {
    if let Some(op) = node.child_by_field_name("operator") {
        return Some(node_text(&op, source));
    }
    for i in 0..node.child_count() {
        let child = node.child(i)?;
        if !child.is_named() {
            let text = node_text(&child, source);
            if matches!(text.as_str(), "&&" | "||" | "and" | "or") {
                return Some(text);
            }
        }
    }
    None
}

fn unit_name(node: &Node, source: &[u8]) -> String {
    if let Some(name) = node.child_by_field_name("name") {
        return node_text(&name, source);
    }

    // C/C++ bury the name inside the declarator chain.
    if let Some(declarator) = node.child_by_field_name("declarator") {
        if let Some(name) = find_identifier(&declarator, source) {
            return name;
        }
    }

    find_identifier(node, source).unwrap_or_else(|| "<anonymous>".into())
}

fn find_identifier(node: &Node, source: &[u8]) -> Option<String> {
    if node.kind().contains("identifier") {
        return Some(node_text(node, source));
    }
    for i in 0..node.child_count() {
        if let Some(found) = node.child(i).and_then(|c| find_identifier(&c, source)) {
            return Some(found);
        }
    }
    None
}

fn node_text(node: &Node, source: &[u8]) -> String {
    node.utf8_text(source).unwrap_or("").to_string()
}
