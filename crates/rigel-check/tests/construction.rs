use pretty_assertions::assert_eq;
use rigel_check::{build_symbol_table, CheckDiagnostic};
use rigel_tree::TreeBuilder;
use rigel_types::{PrimitiveType, TypeDescriptor};

fn prim(p: PrimitiveType) -> TypeDescriptor {
    TypeDescriptor::Primitive(p)
}

#[test]
fn registers_every_class_and_nothing_else() {
    let mut builder = TreeBuilder::new();
    builder.package("edu.example");
    builder.begin_class("Breakfast");
    builder.end_class();
    builder.begin_class("Lunch");
    builder.end_class();
    let tree = builder.finish();

    let result = build_symbol_table(&tree);
    assert!(result.symbol_table.class_exists("edu.example.Breakfast"));
    assert!(result.symbol_table.class_exists("edu.example.Lunch"));
    assert!(!result.symbol_table.class_exists("edu.example.Dinner"));
    assert!(!result.symbol_table.class_exists("Breakfast"));
    assert!(result.diagnostics.is_empty());
}

#[test]
fn fields_record_name_and_declared_type() {
    let mut builder = TreeBuilder::new();
    builder.package("edu.example");
    builder.begin_class("Breakfast");
    builder.field("String", "cheese");
    builder.field("int", "num");
    builder.field("float", "fl");
    builder.end_class();
    let tree = builder.finish();

    let table = build_symbol_table(&tree).symbol_table;
    let fqn = "edu.example.Breakfast";
    assert_eq!(table.field_type(fqn, "num"), Some(&prim(PrimitiveType::Int)));
    assert_eq!(
        table.field_type(fqn, "cheese"),
        Some(&TypeDescriptor::class("String"))
    );
    assert_eq!(table.field_type(fqn, "fl"), Some(&prim(PrimitiveType::Float)));
    assert!(!table.field_exists(fqn, "bacon"));
}

#[test]
fn multi_fragment_fields_share_the_declared_type() {
    let mut builder = TreeBuilder::new();
    builder.begin_class("Pair");
    builder.field_fragments("int", &[("first", None), ("second", None)]);
    builder.end_class();
    let tree = builder.finish();

    let table = build_symbol_table(&tree).symbol_table;
    assert_eq!(table.field_type("Pair", "first"), Some(&prim(PrimitiveType::Int)));
    assert_eq!(table.field_type("Pair", "second"), Some(&prim(PrimitiveType::Int)));
}

#[test]
fn methods_record_signature_and_prescanned_locals() {
    let mut builder = TreeBuilder::new();
    builder.package("edu.example");
    builder.begin_class("Adder");
    builder.begin_method("add", "int", &[("num1", "int"), ("num2", "int")]);
    builder.local("int", "result", None);
    builder.end_method();
    builder.end_class();
    let tree = builder.finish();

    let table = build_symbol_table(&tree).symbol_table;
    let fqn = "edu.example.Adder";
    assert!(table.method_exists(fqn, "add"));
    assert!(!table.method_exists(fqn, "subtract"));
    assert_eq!(
        table.method_return_type(fqn, "add"),
        Some(&prim(PrimitiveType::Int))
    );
    assert_eq!(
        table.parameter_type(fqn, "add", "num1"),
        Some(&prim(PrimitiveType::Int))
    );
    assert_eq!(
        table.parameter_type(fqn, "add", "num2"),
        Some(&prim(PrimitiveType::Int))
    );
    assert!(!table.parameter_exists(fqn, "add", "num3"));
    assert_eq!(
        table.local_variable_type(fqn, "add", "result"),
        Some(&prim(PrimitiveType::Int))
    );
}

#[test]
fn prescan_skips_nested_blocks_and_multi_fragment_declarations() {
    let mut builder = TreeBuilder::new();
    builder.begin_class("Scopes");
    builder.begin_method("go", "void", &[]);
    builder.local("int", "visible", None);
    builder.begin_block();
    builder.local("int", "hidden", None);
    builder.end_block();
    builder.local_fragments("int", &[("pair1", None), ("pair2", None)]);
    builder.end_method();
    builder.end_class();
    let tree = builder.finish();

    let table = build_symbol_table(&tree).symbol_table;
    assert!(table.local_variable_exists("Scopes", "go", "visible"));
    assert!(!table.local_variable_exists("Scopes", "go", "hidden"));
    assert!(!table.local_variable_exists("Scopes", "go", "pair1"));
    assert!(!table.local_variable_exists("Scopes", "go", "pair2"));
}

#[test]
fn nested_classes_chain_their_qualified_names() {
    let mut builder = TreeBuilder::new();
    builder.package("edu.example");
    builder.begin_class("Outer");
    builder.begin_class("Inner");
    builder.begin_class("Innermost");
    builder.end_class();
    builder.end_class();
    builder.end_class();
    let tree = builder.finish();

    let result = build_symbol_table(&tree);
    assert!(result.symbol_table.class_exists("edu.example.Outer"));
    assert!(result.symbol_table.class_exists("edu.example.Outer.Inner"));
    assert!(result
        .symbol_table
        .class_exists("edu.example.Outer.Inner.Innermost"));
    assert_eq!(
        result.registry.resolve_qualified_name("Inner"),
        Some("edu.example.Outer.Inner")
    );
}

#[test]
fn conflicting_package_declarations_warn_and_keep_the_first() {
    let mut builder = TreeBuilder::new();
    builder.package("edu.example");
    builder.begin_class("First");
    builder.end_class();
    builder.package("org.elsewhere");
    builder.begin_class("Second");
    builder.end_class();
    let tree = builder.finish();

    let result = build_symbol_table(&tree);
    assert!(result.symbol_table.class_exists("edu.example.First"));
    // The conflicting declaration is ignored; the original package stays.
    assert!(result.symbol_table.class_exists("edu.example.Second"));
    assert!(result
        .diagnostics
        .iter()
        .any(|d| matches!(d, CheckDiagnostic::StructuralInconsistency { .. })));
}

#[test]
fn repeated_package_declarations_are_not_a_conflict() {
    let mut builder = TreeBuilder::new();
    builder.package("edu.example");
    builder.begin_class("First");
    builder.end_class();
    builder.package("edu.example");
    builder.begin_class("Second");
    builder.end_class();
    let tree = builder.finish();

    let result = build_symbol_table(&tree);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn construction_is_idempotent() {
    let mut builder = TreeBuilder::new();
    builder.package("edu.example");
    builder.begin_class("Adder");
    builder.field("int", "total");
    builder.begin_method("add", "int", &[("num1", "int"), ("num2", "int")]);
    builder.local("int", "result", None);
    builder.end_method();
    builder.end_class();
    let tree = builder.finish();

    let first = build_symbol_table(&tree);
    let second = build_symbol_table(&tree);
    assert_eq!(first.symbol_table, second.symbol_table);
    assert_eq!(first.symbol_table.dump(), second.symbol_table.dump());
}

#[test]
fn declared_type_references_validate_against_the_registry() {
    let mut builder = TreeBuilder::new();
    builder.package("edu.example");
    builder.import("java.util.List");
    builder.begin_class("Menu");
    builder.field("List", "items");
    builder.field("Menu", "next");
    builder.field("Bacon", "mystery");
    builder.end_class();
    let tree = builder.finish();

    let result = build_symbol_table(&tree);
    let fqn = "edu.example.Menu";
    assert!(result.symbol_table.valid_type_exists(fqn, "List"));
    assert!(result.symbol_table.valid_type_exists(fqn, "Menu"));
    assert!(!result.symbol_table.valid_type_exists(fqn, "Bacon"));
    // The invalid reference is a finding, not an error: the field itself is
    // still registered with its declared type.
    assert!(result.symbol_table.field_exists(fqn, "mystery"));
    assert!(result.diagnostics.iter().any(|d| matches!(
        d,
        CheckDiagnostic::InvalidTypeReference { ty, .. } if ty == "Bacon"
    )));
}

#[test]
fn nested_type_references_resolve_through_the_enclosing_chain() {
    let mut builder = TreeBuilder::new();
    builder.package("edu.example");
    builder.begin_class("Outer");
    builder.begin_class("Inner");
    builder.end_class();
    // `Inner` written without qualification from inside `Outer`.
    builder.field("Inner", "child");
    builder.end_class();
    let tree = builder.finish();

    let result = build_symbol_table(&tree);
    assert!(result
        .symbol_table
        .valid_type_exists("edu.example.Outer", "Inner"));
    assert!(result.diagnostics.is_empty());
}
