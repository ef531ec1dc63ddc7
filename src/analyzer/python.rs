//! Python Structural Analyzer
//!
//! Parses repaired code with tree-sitter and walks the tree once, in
//! document order, to populate `Statistics` and `Elements`. Dispatch is
//! over a closed set of node kinds with a default no-op, so unknown
//! syntax simply passes through.
//!
//! The same input always yields identical output: traversal follows
//! document order only, and records carry no wall-clock fields.

use tree_sitter::Node;

use crate::extract::repair;
use crate::types::{
    AnalysisRecord, BabelError, CallInfo, ClassInfo, ConditionalInfo, Elements, ExtractedCode,
    FunctionInfo, ImportInfo, LoopInfo, MethodInfo, Result, Statistics, VariableInfo,
};

/// Marker for expressions that are neither a bare name nor a member
/// access; resolution never fails, it degrades to this.
const UNKNOWN: &str = "<unknown>";

pub struct PythonAnalyzer;

impl PythonAnalyzer {
    pub fn new() -> Result<Self> {
        // Validate that the grammar is available up front
        let _ = create_ts_parser()?;
        Ok(Self)
    }

    /// Analyze one language's extracted code into an `AnalysisRecord`.
    ///
    /// `NoCode` for the explicit empty result; `ParseError` when the
    /// repaired code still fails the structural parse; `Parsed` with
    /// freshly computed statistics and element lists otherwise.
    pub fn analyze(&self, extracted: &ExtractedCode, lang: &str) -> AnalysisRecord {
        let Some(code) = extracted.as_code() else {
            return AnalysisRecord::NoCode;
        };

        let repaired = repair(code);

        let mut parser = match create_ts_parser() {
            Ok(parser) => parser,
            Err(e) => {
                return AnalysisRecord::ParseError {
                    message: e.to_string(),
                    code: repaired,
                };
            }
        };

        let Some(tree) = parser.parse(&repaired, None) else {
            return AnalysisRecord::ParseError {
                message: "Parser produced no tree".to_string(),
                code: repaired,
            };
        };

        let root = tree.root_node();
        if root.has_error() {
            let message = describe_first_error(root);
            tracing::debug!(lang, %message, "structural parse failed");
            return AnalysisRecord::ParseError {
                message,
                code: repaired,
            };
        }

        let mut statistics = Statistics::default();
        let mut elements = Elements::default();
        collect(root, &repaired, &mut statistics, &mut elements);

        AnalysisRecord::Parsed {
            statistics,
            elements,
        }
    }
}

fn create_ts_parser() -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| BabelError::Parse {
            message: format!("Failed to set Python language: {}", e),
        })?;
    Ok(parser)
}

/// Locate the first ERROR or MISSING node and render a one-line
/// human-readable diagnostic (1-based line numbers).
fn describe_first_error(root: Node) -> String {
    let node = first_error_node(root).unwrap_or(root);
    let pos = node.start_position();
    if node.is_missing() {
        format!(
            "Syntax error at line {}, column {}: missing {}",
            pos.row + 1,
            pos.column,
            node.kind()
        )
    } else {
        format!("Syntax error at line {}, column {}", pos.row + 1, pos.column)
    }
}

fn first_error_node(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        if let Some(found) = first_error_node(child) {
            return Some(found);
        }
    }
    // The error flag is set but no child carries it; report this node.
    Some(node)
}

// =============================================================================
// Tree Walk
// =============================================================================

fn collect(node: Node, src: &str, stats: &mut Statistics, elements: &mut Elements) {
    match node.kind() {
        "function_definition" => {
            stats.function_count += 1;
            elements.functions.push(FunctionInfo {
                name: field_text(node, "name", src),
                args: parameter_names(node, src),
                decorators: decorator_names(node, src),
                has_return: contains_return(node),
            });
        }
        "class_definition" => {
            stats.class_count += 1;
            elements.classes.push(ClassInfo {
                name: field_text(node, "name", src),
                bases: base_names(node, src),
                methods: method_infos(node, src),
            });
        }
        "import_statement" => {
            stats.import_count += 1;
            collect_plain_imports(node, src, elements);
        }
        "import_from_statement" => {
            stats.import_count += 1;
            collect_from_imports(node, src, elements);
        }
        "assignment" => {
            // Only value-bearing assignments count as bindings; a bare
            // annotation (`x: int`) binds nothing.
            if let Some(right) = node.child_by_field_name("right") {
                stats.variable_count += 1;
                if let Some(left) = node.child_by_field_name("left")
                    && left.kind() == "identifier"
                {
                    elements.variables.push(VariableInfo {
                        name: node_text(left, src),
                        value_kind: value_kind(right).to_string(),
                    });
                }
            }
        }
        "call" => {
            stats.function_call_count += 1;
            let name = node
                .child_by_field_name("function")
                .map(|f| resolve_name(f, src))
                .unwrap_or_else(|| UNKNOWN.to_string());
            let (args_count, keywords_count) = argument_counts(node);
            elements.function_calls.push(CallInfo {
                name,
                args_count,
                keywords_count,
            });
        }
        "for_statement" => {
            stats.loop_count += 1;
            elements.loops.push(LoopInfo {
                kind: "for".to_string(),
                target: node
                    .child_by_field_name("left")
                    .and_then(|left| try_resolve_name(left, src)),
            });
        }
        "while_statement" => {
            stats.loop_count += 1;
            elements.loops.push(LoopInfo {
                kind: "while".to_string(),
                target: None,
            });
        }
        "if_statement" | "elif_clause" => {
            stats.conditional_count += 1;
            elements.conditionals.push(ConditionalInfo {
                kind: "if".to_string(),
                test: node
                    .child_by_field_name("condition")
                    .map(|c| condensed_text(c, src))
                    .unwrap_or_default(),
            });
        }
        "conditional_expression" => {
            // Ternary counts toward the statistic but yields no descriptor
            stats.conditional_count += 1;
        }
        "string" => stats.string_literal_count += 1,
        "integer" | "float" => stats.numeric_literal_count += 1,
        _ => {}
    }

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        collect(child, src, stats, elements);
    }
}

// =============================================================================
// Node Helpers
// =============================================================================

/// Extract text content from a tree-sitter node.
/// Returns empty string if extraction fails (with debug logging).
fn node_text(node: Node, src: &str) -> String {
    node.utf8_text(src.as_bytes())
        .unwrap_or_else(|e| {
            tracing::debug!(
                "UTF-8 extraction failed at {}:{}: {}",
                node.start_position().row + 1,
                node.start_position().column,
                e
            );
            ""
        })
        .to_string()
}

fn field_text(node: Node, field: &str, src: &str) -> String {
    node.child_by_field_name(field)
        .map(|n| node_text(n, src))
        .unwrap_or_default()
}

/// Source rendering of an expression, collapsed to one line.
fn condensed_text(node: Node, src: &str) -> String {
    node_text(node, src)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Dotted-name resolution: identifiers resolve to themselves, member
/// accesses join recursively with `.`, everything else is unresolvable.
fn try_resolve_name(node: Node, src: &str) -> Option<String> {
    match node.kind() {
        "identifier" => Some(node_text(node, src)),
        "attribute" => {
            let object = node
                .child_by_field_name("object")
                .map(|o| resolve_name(o, src))?;
            let attr = node
                .child_by_field_name("attribute")
                .map(|a| node_text(a, src))?;
            Some(format!("{}.{}", object, attr))
        }
        _ => None,
    }
}

fn resolve_name(node: Node, src: &str) -> String {
    try_resolve_name(node, src).unwrap_or_else(|| UNKNOWN.to_string())
}

fn parameter_names(func: Node, src: &str) -> Vec<String> {
    let mut names = Vec::new();
    let Some(params) = func.child_by_field_name("parameters") else {
        return names;
    };

    let mut cursor = params.walk();
    for param in params.named_children(&mut cursor) {
        match param.kind() {
            "identifier" => names.push(node_text(param, src)),
            "typed_parameter" | "default_parameter" | "typed_default_parameter" => {
                let name = param
                    .child_by_field_name("name")
                    .or_else(|| first_named_child_of_kind(param, "identifier"));
                if let Some(name) = name {
                    names.push(node_text(name, src));
                }
            }
            // *args / **kwargs / positional-only markers are not plain
            // parameter names
            _ => {}
        }
    }

    names
}

fn first_named_child_of_kind<'a>(node: Node<'a>, kind: &str) -> Option<Node<'a>> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor).find(|c| c.kind() == kind)
}

fn decorator_names(func: Node, src: &str) -> Vec<String> {
    let Some(parent) = func.parent() else {
        return Vec::new();
    };
    if parent.kind() != "decorated_definition" {
        return Vec::new();
    }

    let mut names = Vec::new();
    let mut cursor = parent.walk();
    for child in parent.named_children(&mut cursor) {
        if child.kind() != "decorator" {
            continue;
        }
        let Some(expr) = child.named_child(0) else {
            continue;
        };
        let name = match expr.kind() {
            "call" => expr
                .child_by_field_name("function")
                .map(|f| resolve_name(f, src))
                .unwrap_or_else(|| UNKNOWN.to_string()),
            _ => resolve_name(expr, src),
        };
        names.push(name);
    }

    names
}

fn contains_return(node: Node) -> bool {
    if node.kind() == "return_statement" {
        return true;
    }
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if contains_return(child) {
            return true;
        }
    }
    false
}

fn base_names(class: Node, src: &str) -> Vec<String> {
    let mut bases = Vec::new();
    let Some(superclasses) = class.child_by_field_name("superclasses") else {
        return bases;
    };

    let mut cursor = superclasses.walk();
    for base in superclasses.named_children(&mut cursor) {
        // keyword arguments (metaclass=...) are not base classes
        if base.kind() == "keyword_argument" {
            continue;
        }
        bases.push(resolve_name(base, src));
    }

    bases
}

fn method_infos(class: Node, src: &str) -> Vec<MethodInfo> {
    let mut methods = Vec::new();
    let Some(body) = class.child_by_field_name("body") else {
        return methods;
    };

    let mut cursor = body.walk();
    for child in body.named_children(&mut cursor) {
        let func = match child.kind() {
            "function_definition" => Some(child),
            "decorated_definition" => child
                .child_by_field_name("definition")
                .filter(|d| d.kind() == "function_definition"),
            _ => None,
        };
        if let Some(func) = func {
            methods.push(MethodInfo {
                name: field_text(func, "name", src),
                args: parameter_names(func, src),
                has_return: contains_return(func),
            });
        }
    }

    methods
}

fn collect_plain_imports(node: Node, src: &str, elements: &mut Elements) {
    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        match child.kind() {
            "dotted_name" => elements.imports.push(ImportInfo {
                module: node_text(child, src),
                name: None,
                alias: None,
            }),
            "aliased_import" => elements.imports.push(ImportInfo {
                module: field_text(child, "name", src),
                name: None,
                alias: child
                    .child_by_field_name("alias")
                    .map(|a| node_text(a, src)),
            }),
            _ => {}
        }
    }
}

fn collect_from_imports(node: Node, src: &str, elements: &mut Elements) {
    let module = field_text(node, "module_name", src);
    let module_id = node.child_by_field_name("module_name").map(|m| m.id());

    let mut cursor = node.walk();
    for child in node.named_children(&mut cursor) {
        if Some(child.id()) == module_id {
            continue;
        }
        match child.kind() {
            "dotted_name" | "identifier" => elements.imports.push(ImportInfo {
                module: module.clone(),
                name: Some(node_text(child, src)),
                alias: None,
            }),
            "aliased_import" => elements.imports.push(ImportInfo {
                module: module.clone(),
                name: Some(field_text(child, "name", src)),
                alias: child
                    .child_by_field_name("alias")
                    .map(|a| node_text(a, src)),
            }),
            "wildcard_import" => elements.imports.push(ImportInfo {
                module: module.clone(),
                name: Some("*".to_string()),
                alias: None,
            }),
            _ => {}
        }
    }
}

fn argument_counts(call: Node) -> (usize, usize) {
    let Some(arguments) = call.child_by_field_name("arguments") else {
        return (0, 0);
    };
    // `f(x for x in xs)` carries a generator instead of an argument list
    if arguments.kind() != "argument_list" {
        return (1, 0);
    }

    let mut positional = 0;
    let mut keywords = 0;
    let mut cursor = arguments.walk();
    for arg in arguments.named_children(&mut cursor) {
        match arg.kind() {
            "keyword_argument" | "dictionary_splat" => keywords += 1,
            "comment" => {}
            _ => positional += 1,
        }
    }

    (positional, keywords)
}

/// Inferred value-kind tag for a variable binding's right-hand side.
fn value_kind(node: Node) -> &'static str {
    match node.kind() {
        "string" => "str",
        "integer" => "int",
        "float" => "float",
        "true" | "false" => "bool",
        "none" => "NoneType",
        "list" => "list",
        "dictionary" => "dict",
        "tuple" => "tuple",
        "call" => "function_call",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyze(code: &str) -> AnalysisRecord {
        let analyzer = PythonAnalyzer::new().unwrap();
        analyzer.analyze(&ExtractedCode::Code(code.to_string()), "en")
    }

    fn parsed(code: &str) -> (Statistics, Elements) {
        match analyze(code) {
            AnalysisRecord::Parsed {
                statistics,
                elements,
            } => (statistics, elements),
            other => panic!("expected Parsed, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_extraction_is_no_code() {
        let analyzer = PythonAnalyzer::new().unwrap();
        assert_eq!(
            analyzer.analyze(&ExtractedCode::Empty, "en"),
            AnalysisRecord::NoCode
        );
        assert_eq!(
            analyzer.analyze(&ExtractedCode::Empty, "zh-CN"),
            AnalysisRecord::NoCode
        );
    }

    #[test]
    fn test_simple_function() {
        let (stats, elements) = parsed("def add(a, b):\n    return a + b");
        assert_eq!(stats.function_count, 1);
        assert_eq!(elements.functions.len(), 1);

        let func = &elements.functions[0];
        assert_eq!(func.name, "add");
        assert_eq!(func.args, vec!["a", "b"]);
        assert!(func.decorators.is_empty());
        assert!(func.has_return);
    }

    #[test]
    fn test_function_without_return() {
        let (_, elements) = parsed("def greet(name):\n    print(name)");
        assert!(!elements.functions[0].has_return);
    }

    #[test]
    fn test_decorated_function() {
        let code = "@staticmethod\n@functools.lru_cache(maxsize=None)\ndef f():\n    return 1";
        let (stats, elements) = parsed(code);
        assert_eq!(stats.function_count, 1);
        assert_eq!(
            elements.functions[0].decorators,
            vec!["staticmethod", "functools.lru_cache"]
        );
    }

    #[test]
    fn test_class_with_bases_and_methods() {
        let code = "class Dog(Animal, abc.ABC):\n    def bark(self):\n        return 'woof'\n    def sit(self):\n        pass";
        let (stats, elements) = parsed(code);
        assert_eq!(stats.class_count, 1);

        let class = &elements.classes[0];
        assert_eq!(class.name, "Dog");
        assert_eq!(class.bases, vec!["Animal", "abc.ABC"]);
        assert_eq!(class.methods.len(), 2);
        assert_eq!(class.methods[0].name, "bark");
        assert_eq!(class.methods[0].args, vec!["self"]);
        assert!(class.methods[0].has_return);
        assert!(!class.methods[1].has_return);

        // Methods are functions too, as the walk sees every definition
        assert_eq!(stats.function_count, 2);
    }

    #[test]
    fn test_imports() {
        let code = "import os\nimport numpy as np\nfrom sys import path\nfrom json import dumps as d\nfrom os import *";
        let (stats, elements) = parsed(code);
        assert_eq!(stats.import_count, 5);
        assert_eq!(elements.imports.len(), 5);

        assert_eq!(elements.imports[0].module, "os");
        assert_eq!(elements.imports[0].name, None);

        assert_eq!(elements.imports[1].module, "numpy");
        assert_eq!(elements.imports[1].alias.as_deref(), Some("np"));

        assert_eq!(elements.imports[2].module, "sys");
        assert_eq!(elements.imports[2].name.as_deref(), Some("path"));

        assert_eq!(elements.imports[3].name.as_deref(), Some("dumps"));
        assert_eq!(elements.imports[3].alias.as_deref(), Some("d"));

        assert_eq!(elements.imports[4].name.as_deref(), Some("*"));
    }

    #[test]
    fn test_variables_and_value_kinds() {
        let code = "x = 1\nname = 'bob'\nxs = [1, 2]\nd = {}\nt = (1, 2)\nr = f(3)\nz = x + 1";
        let (stats, elements) = parsed(code);
        assert_eq!(stats.variable_count, 7);

        let kinds: Vec<&str> = elements
            .variables
            .iter()
            .map(|v| v.value_kind.as_str())
            .collect();
        assert_eq!(
            kinds,
            vec!["int", "str", "list", "dict", "tuple", "function_call", "unknown"]
        );
    }

    #[test]
    fn test_chained_assignment_counts_each_binding() {
        let (stats, _) = parsed("a = b = 1");
        assert_eq!(stats.variable_count, 2);
    }

    #[test]
    fn test_calls() {
        let code = "print('hi')\nos.path.join(a, b, sep='/')";
        let (stats, elements) = parsed(code);
        assert_eq!(stats.function_call_count, 2);

        assert_eq!(elements.function_calls[0].name, "print");
        assert_eq!(elements.function_calls[0].args_count, 1);

        let join = &elements.function_calls[1];
        assert_eq!(join.name, "os.path.join");
        assert_eq!(join.args_count, 2);
        assert_eq!(join.keywords_count, 1);
    }

    #[test]
    fn test_unresolvable_callee_is_marked_unknown() {
        let (_, elements) = parsed("(lambda x: x)(1)");
        assert_eq!(elements.function_calls[0].name, UNKNOWN);
    }

    #[test]
    fn test_loops() {
        let code = "for i in range(3):\n    pass\nwhile True:\n    break";
        let (stats, elements) = parsed(code);
        assert_eq!(stats.loop_count, 2);
        assert_eq!(elements.loops[0].kind, "for");
        assert_eq!(elements.loops[0].target.as_deref(), Some("i"));
        assert_eq!(elements.loops[1].kind, "while");
        assert_eq!(elements.loops[1].target, None);
    }

    #[test]
    fn test_tuple_loop_target_is_none() {
        let (_, elements) = parsed("for k, v in d.items():\n    pass");
        assert_eq!(elements.loops[0].target, None);
    }

    #[test]
    fn test_conditionals() {
        let code = "if x > 1:\n    pass\nelif y:\n    pass\nelse:\n    pass\nz = 1 if x else 2";
        let (stats, elements) = parsed(code);
        assert_eq!(stats.conditional_count, 3);
        // The ternary contributes no descriptor
        assert_eq!(elements.conditionals.len(), 2);
        assert_eq!(elements.conditionals[0].test, "x > 1");
        assert_eq!(elements.conditionals[1].test, "y");
    }

    #[test]
    fn test_literal_counts() {
        let code = "a = 'x'\nb = 2\nc = 3.5\nprint('y', 7)";
        let (stats, _) = parsed(code);
        assert_eq!(stats.string_literal_count, 2);
        assert_eq!(stats.numeric_literal_count, 3);
    }

    #[test]
    fn test_counts_match_element_lengths() {
        let code = "import os\n\ndef f():\n    return 1\n\nclass C:\n    def m(self):\n        pass\n\nfor i in range(2):\n    print(i)";
        let (stats, elements) = parsed(code);
        assert_eq!(stats.function_count, elements.functions.len());
        assert_eq!(stats.class_count, elements.classes.len());
        assert_eq!(stats.loop_count, elements.loops.len());
    }

    #[test]
    fn test_unclosed_call_is_parse_error() {
        match analyze("print(42") {
            AnalysisRecord::ParseError { message, code } => {
                assert!(message.starts_with("Syntax error at line 1"));
                assert_eq!(code, "print(42");
            }
            other => panic!("expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_repair_feeds_the_parser() {
        // Extra closer would break the parse without repair
        let (stats, _) = parsed("print(42))");
        assert_eq!(stats.function_call_count, 1);
    }

    #[test]
    fn test_determinism() {
        let code = "def f(a):\n    if a:\n        return [x for x in range(3)]\n    return None";
        let first = analyze(code);
        let second = analyze(code);
        assert_eq!(first, second);
    }
}
