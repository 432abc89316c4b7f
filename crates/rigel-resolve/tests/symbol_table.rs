use pretty_assertions::assert_eq;
use rigel_resolve::{NameType, SymbolTable};
use rigel_types::{PrimitiveType, TypeDescriptor};

fn prim(p: PrimitiveType) -> TypeDescriptor {
    TypeDescriptor::Primitive(p)
}

fn sample_table() -> SymbolTable {
    let mut table = SymbolTable::new();
    let fqn = "edu.example.Breakfast";
    table.register_class(fqn);
    table.add_field(fqn, NameType::new("cheese", TypeDescriptor::class("String")));
    table.add_field(fqn, NameType::new("num", prim(PrimitiveType::Int)));
    table.add_field(fqn, NameType::new("fl", prim(PrimitiveType::Float)));
    table.add_method(
        fqn,
        "add",
        prim(PrimitiveType::Int),
        vec![
            NameType::new("num1", prim(PrimitiveType::Int)),
            NameType::new("num2", prim(PrimitiveType::Int)),
        ],
        vec![NameType::new("result", prim(PrimitiveType::Int))],
    );
    table.add_valid_type(fqn, "String");
    table
}

#[test]
fn field_queries_cover_declared_names_and_nothing_else() {
    let table = sample_table();
    let fqn = "edu.example.Breakfast";

    assert!(table.class_exists(fqn));
    assert!(!table.class_exists("edu.example.Lunch"));

    assert_eq!(table.field_type(fqn, "num"), Some(&prim(PrimitiveType::Int)));
    assert_eq!(
        table.field_type(fqn, "cheese"),
        Some(&TypeDescriptor::class("String"))
    );
    assert!(table.field_exists(fqn, "fl"));
    assert!(!table.field_exists(fqn, "bacon"));
    assert_eq!(table.field_type(fqn, "bacon"), None);
}

#[test]
fn method_and_parameter_queries() {
    let table = sample_table();
    let fqn = "edu.example.Breakfast";

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
    assert!(table.parameter_exists(fqn, "add", "num2"));
    assert!(!table.parameter_exists(fqn, "add", "num3"));
    assert!(table.local_variable_exists(fqn, "add", "result"));
    assert!(!table.local_variable_exists(fqn, "add", "missing"));
    // Unknown method: negative regardless of the member name.
    assert!(!table.parameter_exists(fqn, "subtract", "num1"));
    assert_eq!(table.local_variable_type(fqn, "subtract", "result"), None);
}

#[test]
fn dump_lists_every_member() {
    let table = sample_table();
    let dump = table.dump();

    for needle in [
        "edu.example.Breakfast",
        "cheese: String",
        "num: int",
        "fl: float",
        "add(num1: int, num2: int) -> int",
        "result: int",
        "valid types: [String]",
    ] {
        assert!(dump.contains(needle), "dump missing `{needle}`:\n{dump}");
    }
}

#[test]
fn dump_is_stable_across_identical_tables() {
    assert_eq!(sample_table().dump(), sample_table().dump());
}

#[test]
fn persisted_table_answers_queries_identically() {
    let table = sample_table();
    let json = serde_json::to_string(&table).expect("symbol table serializes");
    let reloaded: SymbolTable = serde_json::from_str(&json).expect("symbol table deserializes");

    assert_eq!(table, reloaded);
    let fqn = "edu.example.Breakfast";
    assert_eq!(
        reloaded.field_type(fqn, "num"),
        Some(&prim(PrimitiveType::Int))
    );
    assert!(reloaded.valid_type_exists(fqn, "String"));
    assert_eq!(table.dump(), reloaded.dump());
}
