//! Tag-directed structural extraction over a decoded syntax tree.
//!
//! Extraction is purely syntactic: declarations are recognized by node
//! tag, keywords by leaf-text membership in fixed sets, and widths by
//! bit-range arithmetic on numeric dimension leaves. Anything the walk
//! cannot resolve degrades to a safe default (width 1, type `wire`) with
//! a warning, so one malformed declaration never prevents extraction of
//! the rest of the module or file.

use crate::model::{
    AssignTarget, BlockKind, Instance, Module, NetType, Parameter, Port, PortDirection,
    ProceduralBlock, Register, RegisterKind, Signal,
};
use rtlscope_cst::{NodeId, SyntaxTree};
use rtlscope_diagnostics::code::codes;
use rtlscope_diagnostics::{Diagnostic, DiagnosticSink};
use rtlscope_source::{SourceFile, Span};
use std::collections::HashSet;

/// Node tags produced by the CST dumper for the declaration shapes the
/// extractor understands.
pub mod tags {
    /// A module declaration subtree.
    pub const MODULE_DECLARATION: &str = "kModuleDeclaration";
    /// A parameter or localparam declaration.
    pub const PARAM_DECLARATION: &str = "kParamDeclaration";
    /// Port declaration subtrees (ANSI header or standalone).
    pub const PORT_DECLARATIONS: &[&str] = &["kPortDeclaration", "kModulePortDeclaration"];
    /// A net/variable data declaration.
    pub const DATA_DECLARATION: &str = "kDataDeclaration";
    /// A module instantiation.
    pub const MODULE_INSTANTIATION: &str = "kModuleInstantiation";
    /// An `always` block.
    pub const ALWAYS_STATEMENT: &str = "kAlwaysStatement";
    /// A continuous `assign` statement.
    pub const CONTINUOUS_ASSIGN: &str = "kContinuousAssignmentStatement";
    /// Dimension subtrees that contribute the packed width.
    pub const PACKED_DIMENSION_TAGS: &[&str] = &["kPackedDimensions", "kDimensionRange"];
    /// All dimension subtrees, packed or not; their identifier leaves are
    /// never declaration names.
    pub const DIMENSION_TAGS: &[&str] = &[
        "kPackedDimensions",
        "kDimensionRange",
        "kDeclarationDimensions",
        "kUnpackedDimensions",
    ];
    /// Declared-variable children of a data declaration.
    pub const VARIABLE_TAGS: &[&str] = &[
        "kRegisterVariable",
        "kNetVariable",
        "kNetDeclarationAssignment",
        "kVariableDeclarationAssignment",
    ];
    /// Blocking, non-blocking, and net assignment subtrees.
    pub const ASSIGNMENT_TAGS: &[&str] = &[
        "kNetVariableAssignment",
        "kBlockingAssignmentStatement",
        "kNonblockingAssignmentStatement",
        "kAssignmentStatement",
    ];
}

/// Leaf tags that mark identifiers.
const IDENTIFIER_TAGS: &[&str] = &["SymbolIdentifier", "EscapedIdentifier"];

/// Parameter type keywords; anything else defaults to `integer`.
const PARAM_TYPE_KEYWORDS: &[&str] = &[
    "integer", "int", "real", "realtime", "time", "logic", "bit", "string",
];

fn is_identifier(tag: &str) -> bool {
    IDENTIFIER_TAGS.contains(&tag)
}

fn direction_of(text: &str) -> Option<PortDirection> {
    match text {
        "input" => Some(PortDirection::Input),
        "output" => Some(PortDirection::Output),
        "inout" => Some(PortDirection::Inout),
        _ => None,
    }
}

fn net_type_of(text: &str) -> Option<NetType> {
    match text {
        "wire" => Some(NetType::Wire),
        "reg" => Some(NetType::Reg),
        "logic" => Some(NetType::Logic),
        _ => None,
    }
}

/// Extracts one [`Module`] per module-declaration subtree in the tree.
///
/// Each module is independent; no state is shared across them. Modules
/// whose name cannot be located are skipped with a warning.
pub fn extract(tree: &SyntaxTree, file: &SourceFile, sink: &DiagnosticSink) -> Vec<Module> {
    let Some(root) = tree.root() else {
        return Vec::new();
    };
    let mut modules = Vec::new();
    for decl in tree.find_by_tag(root, tags::MODULE_DECLARATION) {
        if let Some(module) = extract_module(tree, file, decl, sink) {
            modules.push(module);
        }
    }
    modules
}

fn extract_module(
    tree: &SyntaxTree,
    file: &SourceFile,
    decl: NodeId,
    sink: &DiagnosticSink,
) -> Option<Module> {
    let (name, line) = match module_name(tree, file, decl) {
        Some(found) => found,
        None => {
            sink.emit(Diagnostic::warning(
                codes::DEGRADED_DECLARATION,
                "module declaration without a name identifier; skipped",
                subtree_span(tree, file, decl),
            ));
            return None;
        }
    };

    let mut module = Module {
        name,
        file: file.path.clone(),
        line,
        ports: Vec::new(),
        parameters: Vec::new(),
        signals: Vec::new(),
        registers: Vec::new(),
        instances: Vec::new(),
        blocks: Vec::new(),
        assigns: Vec::new(),
    };

    for param in collect_in_module(tree, decl, &[tags::PARAM_DECLARATION]) {
        extract_parameter(tree, file, param, sink, &mut module.parameters);
    }
    for port_decl in collect_in_module(tree, decl, tags::PORT_DECLARATIONS) {
        extract_ports(tree, file, port_decl, &mut module);
    }
    for data_decl in collect_in_module(tree, decl, &[tags::DATA_DECLARATION]) {
        extract_signals(tree, file, data_decl, &mut module);
    }
    for inst in collect_in_module(tree, decl, &[tags::MODULE_INSTANTIATION]) {
        extract_instance(tree, file, inst, sink, &mut module.instances);
    }
    for always in collect_in_module(tree, decl, &[tags::ALWAYS_STATEMENT]) {
        module.blocks.push(extract_block(tree, file, always));
    }
    for assign in collect_in_module(tree, decl, &[tags::CONTINUOUS_ASSIGN]) {
        extract_continuous_assign(tree, file, assign, &mut module.assigns);
    }

    Some(module)
}

/// Finds the module name: the first identifier leaf after the `module`
/// keyword leaf, scanning leaves left to right. The module's line is the
/// line of that identifier, not of the keyword.
fn module_name(tree: &SyntaxTree, file: &SourceFile, decl: NodeId) -> Option<(String, u32)> {
    let mut past_keyword = false;
    for leaf in tree.leaves(decl) {
        let text = tree.leaf_text(leaf)?;
        if past_keyword && is_identifier(tree.tag(leaf)) {
            let line = file.line_of(tree.leaf_start(leaf)?);
            return Some((text.to_string(), line));
        }
        if text == "module" {
            past_keyword = true;
        }
    }
    None
}

fn extract_parameter(
    tree: &SyntaxTree,
    file: &SourceFile,
    param: NodeId,
    sink: &DiagnosticSink,
    out: &mut Vec<Parameter>,
) {
    let mut name: Option<(String, u32)> = None;
    let mut param_type: Option<String> = None;
    let mut value = String::new();
    let mut seen_eq = false;

    for leaf in tree.leaves(param) {
        let text = match tree.leaf_text(leaf) {
            Some(t) => t,
            None => continue,
        };
        if seen_eq {
            value = text.to_string();
            break;
        }
        if text == "=" {
            seen_eq = true;
            continue;
        }
        if name.is_none() && param_type.is_none() && PARAM_TYPE_KEYWORDS.contains(&text) {
            param_type = Some(text.to_string());
            continue;
        }
        if name.is_none() && is_identifier(tree.tag(leaf)) {
            let line = file.line_of(tree.leaf_start(leaf).unwrap_or(0));
            name = Some((text.to_string(), line));
        }
    }

    match name {
        Some((name, line)) => out.push(Parameter {
            name,
            param_type: param_type.unwrap_or_else(|| "integer".to_string()),
            value,
            line,
        }),
        None => sink.emit(Diagnostic::warning(
            codes::DEGRADED_DECLARATION,
            "parameter declaration without a name identifier; skipped",
            subtree_span(tree, file, param),
        )),
    }
}

/// Extracts every port declared by one port-declaration subtree.
///
/// A single declaration can name several ports (`input a, b, c`); the
/// detected direction, type, and width apply to each identifier. Keyword
/// detection walks the whole subtree first, so declaration order does not
/// matter. Ports declared `reg` or `logic` (`output reg q`) additionally
/// produce a provisional register for later classification.
fn extract_ports(tree: &SyntaxTree, file: &SourceFile, decl: NodeId, module: &mut Module) {
    let mut direction = PortDirection::Input;
    let mut net_type = NetType::Wire;
    for leaf in tree.leaves(decl) {
        let Some(text) = tree.leaf_text(leaf) else {
            continue;
        };
        if let Some(d) = direction_of(text) {
            direction = d;
        } else if let Some(t) = net_type_of(text) {
            net_type = t;
        }
    }

    let (width, dim_leaves) = packed_width(tree, decl);
    for leaf in tree.leaves(decl) {
        if dim_leaves.contains(&leaf) || !is_identifier(tree.tag(leaf)) {
            continue;
        }
        let name = tree.leaf_text(leaf).unwrap_or_default().to_string();
        let line = file.line_of(tree.leaf_start(leaf).unwrap_or(0));
        if net_type.is_storage() {
            module.registers.push(Register {
                name: name.clone(),
                width,
                line,
                kind: RegisterKind::PotentialRegister,
            });
        }
        module.ports.push(Port {
            name,
            direction,
            net_type,
            width,
            line,
        });
    }
}

/// Extracts signals (and provisional registers) from a data declaration.
fn extract_signals(tree: &SyntaxTree, file: &SourceFile, decl: NodeId, module: &mut Module) {
    // Instantiations serialized inside a data declaration are handled by
    // the instance walk, not as signals.
    if tree
        .find_by_tag(decl, tags::MODULE_INSTANTIATION)
        .next()
        .is_some()
    {
        return;
    }

    let mut net_type = NetType::Wire;
    for leaf in tree.leaves(decl) {
        if let Some(t) = tree.leaf_text(leaf).and_then(net_type_of) {
            net_type = t;
            break;
        }
    }
    let (width, dim_leaves) = packed_width(tree, decl);

    // Prefer declared-variable children; fall back to every bare
    // identifier leaf when the dump has no such wrapper nodes.
    let mut names: Vec<(String, u32)> = Vec::new();
    let vars = collect_in_module(tree, decl, tags::VARIABLE_TAGS);
    if vars.is_empty() {
        for leaf in tree.leaves(decl) {
            if dim_leaves.contains(&leaf) || !is_identifier(tree.tag(leaf)) {
                continue;
            }
            let name = tree.leaf_text(leaf).unwrap_or_default().to_string();
            let line = file.line_of(tree.leaf_start(leaf).unwrap_or(0));
            names.push((name, line));
        }
    } else {
        for var in vars {
            if let Some(leaf) = first_identifier(tree, var) {
                let name = tree.leaf_text(leaf).unwrap_or_default().to_string();
                let line = file.line_of(tree.leaf_start(leaf).unwrap_or(0));
                names.push((name, line));
            }
        }
    }

    for (name, line) in names {
        if net_type.is_storage() {
            module.registers.push(Register {
                name: name.clone(),
                width,
                line,
                kind: RegisterKind::PotentialRegister,
            });
        }
        module.signals.push(Signal {
            name,
            net_type,
            width,
            line,
        });
    }
}

fn extract_instance(
    tree: &SyntaxTree,
    file: &SourceFile,
    inst: NodeId,
    sink: &DiagnosticSink,
    out: &mut Vec<Instance>,
) {
    let mut idents = tree
        .leaves(inst)
        .filter(|&l| is_identifier(tree.tag(l)));
    let (Some(type_leaf), Some(name_leaf)) = (idents.next(), idents.next()) else {
        sink.emit(Diagnostic::warning(
            codes::DEGRADED_DECLARATION,
            "instantiation without both a type and an instance name; skipped",
            subtree_span(tree, file, inst),
        ));
        return;
    };
    out.push(Instance {
        module_type: tree.leaf_text(type_leaf).unwrap_or_default().to_string(),
        name: tree.leaf_text(name_leaf).unwrap_or_default().to_string(),
        line: file.line_of(tree.leaf_start(type_leaf).unwrap_or(0)),
    });
}

/// Extracts one procedural block: sensitivity classification, clock-edge
/// flag, and the assignment targets found anywhere within it.
fn extract_block(tree: &SyntaxTree, file: &SourceFile, block: NodeId) -> ProceduralBlock {
    let has_clock_edge = tree
        .leaves(block)
        .filter_map(|l| tree.leaf_text(l))
        .any(|t| t == "posedge" || t == "negedge");
    let kind = if has_clock_edge {
        BlockKind::Sequential
    } else {
        BlockKind::Combinational
    };
    let line = tree
        .leaves(block)
        .next()
        .and_then(|l| tree.leaf_start(l))
        .map(|off| file.line_of(off))
        .unwrap_or(0);

    let mut targets = Vec::new();
    for assign in collect_in_module(tree, block, tags::ASSIGNMENT_TAGS) {
        if let Some(leaf) = first_identifier(tree, assign) {
            targets.push(AssignTarget {
                name: tree.leaf_text(leaf).unwrap_or_default().to_string(),
                line: file.line_of(tree.leaf_start(leaf).unwrap_or(0)),
            });
        }
    }

    ProceduralBlock {
        kind,
        has_clock_edge,
        line,
        targets,
    }
}

fn extract_continuous_assign(
    tree: &SyntaxTree,
    file: &SourceFile,
    assign: NodeId,
    out: &mut Vec<AssignTarget>,
) {
    let inner = collect_in_module(tree, assign, tags::ASSIGNMENT_TAGS);
    let scopes = if inner.is_empty() { vec![assign] } else { inner };
    for scope in scopes {
        if let Some(leaf) = first_identifier(tree, scope) {
            out.push(AssignTarget {
                name: tree.leaf_text(leaf).unwrap_or_default().to_string(),
                line: file.line_of(tree.leaf_start(leaf).unwrap_or(0)),
            });
        }
    }
}

/// Computes the packed width of a declaration and the set of leaf IDs that
/// belong to any dimension subtree (those identifiers are range bounds,
/// never declaration names).
///
/// Width is `|msb-lsb|+1` over the first two numeric leaves of the first
/// packed-dimension subtree; symbolic, missing, or out-of-range bounds
/// fall back to 1.
fn packed_width(tree: &SyntaxTree, decl: NodeId) -> (u32, HashSet<NodeId>) {
    let mut dim_leaves = HashSet::new();
    let mut width = 1u32;
    let mut resolved = false;

    for id in tree.descendants(decl) {
        if tree.is_leaf(id) || !tags::DIMENSION_TAGS.contains(&tree.tag(id)) {
            continue;
        }
        let packed = tags::PACKED_DIMENSION_TAGS.contains(&tree.tag(id));
        let mut bounds: Vec<i64> = Vec::new();
        let mut symbolic = false;
        for leaf in tree.leaves(id) {
            dim_leaves.insert(leaf);
            if is_identifier(tree.tag(leaf)) {
                symbolic = true;
            } else if let Some(n) = tree.leaf_text(leaf).and_then(|t| t.parse::<i64>().ok()) {
                bounds.push(n);
            }
        }
        if packed && !resolved {
            // A symbolic bound (e.g. `[WIDTH-1:0]`) cannot be evaluated
            // here; the whole range falls back to width 1, as does a
            // range whose width does not fit in u32.
            if !symbolic && bounds.len() >= 2 {
                width = bounds[0]
                    .checked_sub(bounds[1])
                    .and_then(|d| u32::try_from(d.unsigned_abs() + 1).ok())
                    .unwrap_or(1);
            }
            resolved = true;
        }
    }
    (width, dim_leaves)
}

/// Collects nodes matching any of `wanted` within `scope`, in source
/// order, without descending into nested module declarations (nested
/// modules are extracted on their own).
fn collect_in_module(tree: &SyntaxTree, scope: NodeId, wanted: &[&str]) -> Vec<NodeId> {
    let mut out = Vec::new();
    let mut stack: Vec<NodeId> = tree.children(scope).iter().rev().copied().collect();
    while let Some(id) = stack.pop() {
        if tree.is_leaf(id) {
            continue;
        }
        let tag = tree.tag(id);
        if tag == tags::MODULE_DECLARATION {
            continue;
        }
        if wanted.contains(&tag) {
            out.push(id);
            continue;
        }
        for &child in tree.children(id).iter().rev() {
            stack.push(child);
        }
    }
    out
}

fn first_identifier(tree: &SyntaxTree, scope: NodeId) -> Option<NodeId> {
    tree.leaves(scope).find(|&l| is_identifier(tree.tag(l)))
}

fn subtree_span(tree: &SyntaxTree, file: &SourceFile, scope: NodeId) -> Span {
    match tree.leaves(scope).next() {
        Some(leaf) => {
            let start = tree.leaf_start(leaf).unwrap_or(0);
            Span::new(file.id, start, start)
        }
        None => Span::DUMMY,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtlscope_source::FileId;
    use std::path::PathBuf;

    /// Test builder that locates leaf offsets in the source text, walking
    /// forward so repeated tokens get successive occurrences.
    struct Fixture {
        tree: SyntaxTree,
        file: SourceFile,
        cursor: usize,
    }

    impl Fixture {
        fn new(source: &str) -> Self {
            Self {
                tree: SyntaxTree::new(),
                file: SourceFile::new(FileId::from_raw(0), PathBuf::from("test.v"), source.into()),
                cursor: 0,
            }
        }

        fn node(&mut self, parent: Option<NodeId>, tag: &str) -> NodeId {
            self.tree.add_node(parent, tag)
        }

        fn leaf(&mut self, parent: NodeId, tag: &str, text: &str) -> NodeId {
            let at = self.file.content[self.cursor..]
                .find(text)
                .map(|i| self.cursor + i)
                .unwrap_or(self.cursor);
            self.cursor = at + text.len();
            self.tree
                .add_leaf(parent, tag, text, at as u32, (at + text.len()) as u32)
        }

        fn ident(&mut self, parent: NodeId, text: &str) -> NodeId {
            self.leaf(parent, "SymbolIdentifier", text)
        }

        fn keyword(&mut self, parent: NodeId, text: &str) -> NodeId {
            let tag = format!("\"{text}\"");
            self.leaf(parent, &tag, text)
        }

        fn extract(&self) -> (Vec<Module>, DiagnosticSink) {
            let sink = DiagnosticSink::new();
            let modules = extract(&self.tree, &self.file, &sink);
            (modules, sink)
        }
    }

    /// Builds the tree for `module dff(input clk, input d, output reg q);
    /// always @(posedge clk) q <= d; endmodule`.
    fn dff_fixture() -> Fixture {
        let src = "module dff(input clk, input d, output reg q);\n\
                   always @(posedge clk) q <= d;\n\
                   endmodule\n";
        let mut f = Fixture::new(src);
        let root = f.node(None, "kDescriptionList");
        let m = f.node(Some(root), tags::MODULE_DECLARATION);
        f.keyword(m, "module");
        f.ident(m, "dff");

        let ports = f.node(Some(m), "kPortDeclarationList");
        let p1 = f.node(Some(ports), "kPortDeclaration");
        f.keyword(p1, "input");
        f.ident(p1, "clk");
        let p2 = f.node(Some(ports), "kPortDeclaration");
        f.keyword(p2, "input");
        f.ident(p2, "d");
        let p3 = f.node(Some(ports), "kPortDeclaration");
        f.keyword(p3, "output");
        f.keyword(p3, "reg");
        f.ident(p3, "q");

        let always = f.node(Some(m), tags::ALWAYS_STATEMENT);
        f.keyword(always, "always");
        let ev = f.node(Some(always), "kEventControl");
        f.keyword(ev, "posedge");
        f.ident(ev, "clk");
        let assign = f.node(Some(always), "kNonblockingAssignmentStatement");
        f.ident(assign, "q");
        f.leaf(assign, "\"<=\"", "<=");
        f.ident(assign, "d");
        f
    }

    #[test]
    fn dff_module_extracted() {
        let (modules, sink) = dff_fixture().extract();
        assert!(sink.diagnostics().is_empty());
        assert_eq!(modules.len(), 1);

        let m = &modules[0];
        assert_eq!(m.name, "dff");
        assert_eq!(m.line, 1);
        assert_eq!(m.ports.len(), 3);

        assert_eq!(m.ports[0].name, "clk");
        assert_eq!(m.ports[0].direction, PortDirection::Input);
        assert_eq!(m.ports[0].net_type, NetType::Wire);
        assert_eq!(m.ports[2].name, "q");
        assert_eq!(m.ports[2].direction, PortDirection::Output);
        assert_eq!(m.ports[2].net_type, NetType::Reg);
        assert!(m.ports.iter().all(|p| p.width >= 1));
    }

    #[test]
    fn dff_block_is_sequential_with_target() {
        let (modules, _) = dff_fixture().extract();
        let m = &modules[0];
        assert_eq!(m.blocks.len(), 1);
        let block = &m.blocks[0];
        assert_eq!(block.kind, BlockKind::Sequential);
        assert!(block.has_clock_edge);
        assert_eq!(block.line, 2);
        assert_eq!(block.targets.len(), 1);
        assert_eq!(block.targets[0].name, "q");
    }

    #[test]
    fn grouped_port_declaration_fans_out() {
        // input wire [7:0] a, b, c — one keyword set, three ports.
        let src = "module grp(input wire [7:0] a, b, c);\nendmodule\n";
        let mut f = Fixture::new(src);
        let root = f.node(None, "kDescriptionList");
        let m = f.node(Some(root), tags::MODULE_DECLARATION);
        f.keyword(m, "module");
        f.ident(m, "grp");
        let pd = f.node(Some(m), "kPortDeclaration");
        f.keyword(pd, "input");
        f.keyword(pd, "wire");
        let dims = f.node(Some(pd), "kPackedDimensions");
        f.leaf(dims, "TK_DecNumber", "7");
        f.leaf(dims, "TK_DecNumber", "0");
        f.ident(pd, "a");
        f.ident(pd, "b");
        f.ident(pd, "c");

        let (modules, _) = f.extract();
        let ports = &modules[0].ports;
        assert_eq!(ports.len(), 3);
        for (port, name) in ports.iter().zip(["a", "b", "c"]) {
            assert_eq!(port.name, name);
            assert_eq!(port.direction, PortDirection::Input);
            assert_eq!(port.net_type, NetType::Wire);
            assert_eq!(port.width, 8);
        }
    }

    #[test]
    fn reversed_range_width() {
        let src = "module rev(output [0:7] y);\nendmodule\n";
        let mut f = Fixture::new(src);
        let root = f.node(None, "kDescriptionList");
        let m = f.node(Some(root), tags::MODULE_DECLARATION);
        f.keyword(m, "module");
        f.ident(m, "rev");
        let pd = f.node(Some(m), "kPortDeclaration");
        f.keyword(pd, "output");
        let dims = f.node(Some(pd), "kPackedDimensions");
        f.leaf(dims, "TK_DecNumber", "0");
        f.leaf(dims, "TK_DecNumber", "7");
        f.ident(pd, "y");

        let (modules, _) = f.extract();
        assert_eq!(modules[0].ports[0].width, 8);
    }

    #[test]
    fn symbolic_width_defaults_to_one() {
        // [WIDTH-1:0] — no two numeric leaves, so width degrades to 1 and
        // the bound identifier does not become a port.
        let src = "module sym(input [WIDTH-1:0] d);\nendmodule\n";
        let mut f = Fixture::new(src);
        let root = f.node(None, "kDescriptionList");
        let m = f.node(Some(root), tags::MODULE_DECLARATION);
        f.keyword(m, "module");
        f.ident(m, "sym");
        let pd = f.node(Some(m), "kPortDeclaration");
        f.keyword(pd, "input");
        let dims = f.node(Some(pd), "kPackedDimensions");
        f.ident(dims, "WIDTH");
        f.leaf(dims, "TK_DecNumber", "1");
        f.leaf(dims, "TK_DecNumber", "0");
        f.ident(pd, "d");

        let (modules, _) = f.extract();
        let ports = &modules[0].ports;
        assert_eq!(ports.len(), 1);
        assert_eq!(ports[0].name, "d");
        assert_eq!(ports[0].width, 1);
    }

    #[test]
    fn oversized_range_defaults_to_one() {
        // [4294967295:0] would need 2^32 bits; the width does not fit in
        // u32, so it degrades like a symbolic bound instead of truncating.
        let src = "module big(input [4294967295:0] d);\nendmodule\n";
        let mut f = Fixture::new(src);
        let root = f.node(None, "kDescriptionList");
        let m = f.node(Some(root), tags::MODULE_DECLARATION);
        f.keyword(m, "module");
        f.ident(m, "big");
        let pd = f.node(Some(m), "kPortDeclaration");
        f.keyword(pd, "input");
        let dims = f.node(Some(pd), "kPackedDimensions");
        f.leaf(dims, "TK_DecNumber", "4294967295");
        f.leaf(dims, "TK_DecNumber", "0");
        f.ident(pd, "d");

        let (modules, _) = f.extract();
        assert_eq!(modules[0].ports[0].width, 1);
    }

    #[test]
    fn data_declaration_yields_signal_and_register() {
        let src = "module t;\nreg [3:0] state;\nwire ready;\nendmodule\n";
        let mut f = Fixture::new(src);
        let root = f.node(None, "kDescriptionList");
        let m = f.node(Some(root), tags::MODULE_DECLARATION);
        f.keyword(m, "module");
        f.ident(m, "t");

        let d1 = f.node(Some(m), tags::DATA_DECLARATION);
        f.keyword(d1, "reg");
        let dims = f.node(Some(d1), "kPackedDimensions");
        f.leaf(dims, "TK_DecNumber", "3");
        f.leaf(dims, "TK_DecNumber", "0");
        let var = f.node(Some(d1), "kRegisterVariable");
        f.ident(var, "state");

        let d2 = f.node(Some(m), tags::DATA_DECLARATION);
        f.keyword(d2, "wire");
        let var2 = f.node(Some(d2), "kNetVariable");
        f.ident(var2, "ready");

        let (modules, _) = f.extract();
        let m = &modules[0];
        assert_eq!(m.signals.len(), 2);
        assert_eq!(m.registers.len(), 1);
        assert_eq!(m.registers[0].name, "state");
        assert_eq!(m.registers[0].width, 4);
        assert_eq!(m.registers[0].kind, RegisterKind::PotentialRegister);
        assert_eq!(m.signals[1].name, "ready");
        assert_eq!(m.signals[1].net_type, NetType::Wire);
    }

    #[test]
    fn bare_identifier_fallback_for_signals() {
        // No declared-variable wrapper nodes: every bare identifier leaf
        // becomes a signal.
        let src = "module t;\nreg a, b;\nendmodule\n";
        let mut f = Fixture::new(src);
        let root = f.node(None, "kDescriptionList");
        let m = f.node(Some(root), tags::MODULE_DECLARATION);
        f.keyword(m, "module");
        f.ident(m, "t");
        let d = f.node(Some(m), tags::DATA_DECLARATION);
        f.keyword(d, "reg");
        f.ident(d, "a");
        f.ident(d, "b");

        let (modules, _) = f.extract();
        let names: Vec<&str> = modules[0].signals.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(modules[0].registers.len(), 2);
    }

    #[test]
    fn parameter_extraction() {
        let src = "module p #(parameter WIDTH = 8, parameter real GAIN = 1.5);\nendmodule\n";
        let mut f = Fixture::new(src);
        let root = f.node(None, "kDescriptionList");
        let m = f.node(Some(root), tags::MODULE_DECLARATION);
        f.keyword(m, "module");
        f.ident(m, "p");

        let p1 = f.node(Some(m), tags::PARAM_DECLARATION);
        f.keyword(p1, "parameter");
        f.ident(p1, "WIDTH");
        f.leaf(p1, "\"=\"", "=");
        f.leaf(p1, "TK_DecNumber", "8");

        let p2 = f.node(Some(m), tags::PARAM_DECLARATION);
        f.keyword(p2, "parameter");
        f.keyword(p2, "real");
        f.ident(p2, "GAIN");
        f.leaf(p2, "\"=\"", "=");
        f.leaf(p2, "TK_RealTime", "1.5");

        let (modules, _) = f.extract();
        let params = &modules[0].parameters;
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].name, "WIDTH");
        assert_eq!(params[0].param_type, "integer");
        assert_eq!(params[0].value, "8");
        assert_eq!(params[1].name, "GAIN");
        assert_eq!(params[1].param_type, "real");
        assert_eq!(params[1].value, "1.5");
    }

    #[test]
    fn instance_extraction() {
        let src = "module top;\nsub u1(.a(x));\nendmodule\n";
        let mut f = Fixture::new(src);
        let root = f.node(None, "kDescriptionList");
        let m = f.node(Some(root), tags::MODULE_DECLARATION);
        f.keyword(m, "module");
        f.ident(m, "top");
        let inst = f.node(Some(m), tags::MODULE_INSTANTIATION);
        f.ident(inst, "sub");
        f.ident(inst, "u1");

        let (modules, sink) = f.extract();
        assert!(sink.diagnostics().is_empty());
        let instances = &modules[0].instances;
        assert_eq!(instances.len(), 1);
        assert_eq!(instances[0].module_type, "sub");
        assert_eq!(instances[0].name, "u1");
        assert_eq!(instances[0].line, 2);
    }

    #[test]
    fn instance_missing_name_degrades() {
        let src = "module top;\nsub;\nendmodule\n";
        let mut f = Fixture::new(src);
        let root = f.node(None, "kDescriptionList");
        let m = f.node(Some(root), tags::MODULE_DECLARATION);
        f.keyword(m, "module");
        f.ident(m, "top");
        let inst = f.node(Some(m), tags::MODULE_INSTANTIATION);
        f.ident(inst, "sub");

        let (modules, sink) = f.extract();
        assert!(modules[0].instances.is_empty());
        let diags = sink.diagnostics();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].code, codes::DEGRADED_DECLARATION);
        assert!(!sink.has_errors());
    }

    #[test]
    fn continuous_assign_target() {
        let src = "module t(output y, input a);\nassign y = a;\nendmodule\n";
        let mut f = Fixture::new(src);
        let root = f.node(None, "kDescriptionList");
        let m = f.node(Some(root), tags::MODULE_DECLARATION);
        f.keyword(m, "module");
        f.ident(m, "t");
        let ca = f.node(Some(m), tags::CONTINUOUS_ASSIGN);
        f.keyword(ca, "assign");
        let na = f.node(Some(ca), "kNetVariableAssignment");
        f.ident(na, "y");
        f.leaf(na, "\"=\"", "=");
        f.ident(na, "a");

        let (modules, _) = f.extract();
        assert_eq!(modules[0].assigns.len(), 1);
        assert_eq!(modules[0].assigns[0].name, "y");
        assert_eq!(modules[0].assigns[0].line, 2);
    }

    #[test]
    fn two_modules_in_one_file_independent() {
        let src = "module a(input x);\nendmodule\nmodule b(output y);\nendmodule\n";
        let mut f = Fixture::new(src);
        let root = f.node(None, "kDescriptionList");

        let m1 = f.node(Some(root), tags::MODULE_DECLARATION);
        f.keyword(m1, "module");
        f.ident(m1, "a");
        let p1 = f.node(Some(m1), "kPortDeclaration");
        f.keyword(p1, "input");
        f.ident(p1, "x");

        let m2 = f.node(Some(root), tags::MODULE_DECLARATION);
        f.keyword(m2, "module");
        f.ident(m2, "b");
        let p2 = f.node(Some(m2), "kPortDeclaration");
        f.keyword(p2, "output");
        f.ident(p2, "y");

        let (modules, _) = f.extract();
        assert_eq!(modules.len(), 2);
        assert_eq!(modules[0].name, "a");
        assert_eq!(modules[0].line, 1);
        assert_eq!(modules[1].name, "b");
        assert_eq!(modules[1].line, 3);
        assert_ne!(modules[0].line, modules[1].line);
        assert_eq!(modules[0].ports.len(), 1);
        assert_eq!(modules[1].ports.len(), 1);
    }

    #[test]
    fn module_without_name_skipped_with_warning() {
        let mut f = Fixture::new("module ;\n");
        let root = f.node(None, "kDescriptionList");
        let m = f.node(Some(root), tags::MODULE_DECLARATION);
        f.keyword(m, "module");

        let (modules, sink) = f.extract();
        assert!(modules.is_empty());
        assert_eq!(sink.diagnostics().len(), 1);
        assert!(!sink.has_errors());
    }
}
