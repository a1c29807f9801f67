//! End-to-end tests for the query pipeline.
//!
//! Each test loads a catalog from definition text, runs a query through
//! `QueryEngine` and checks the result schema and rows in order.

use raqp_core::{DataType, Value};
use raqp_query::catalog::load_catalog;
use raqp_query::parse::MAX_EXPR_DEPTH;
use raqp_query::error::{BindError, EvaluationError, QueryError};
use raqp_query::{Catalog, ErrorCategory, ExecutionContext, QueryEngine};

const COMPANY: &str = "
Employees (EID, Name, Age) = {
  E1, John, 32
  E2, Alice, 28
  E3, Bob, 29
  E4, Carol, 35
  E5, Eve, 41
}

Departments (DID, DName, EID) = {
  D1, HR, E2
  D2, IT, E1
  D3, Finance, E3
  D4, Sales, E4
}

Managers (MID, Name, Age) = {
  M1, Alice, 28
  M2, David, 40
  M3, Eve, 41
}

Contractors (CID, Name) = {
  C1, Bob
  C2, Carol
  C3, Eve
}
";

const SCHOOL: &str = "
Student (ID, Name, Age, Major) = {
  1, Alice, 20, Computer Science
  2, Bob, 22, Physics
  3, Charlie, 21, Mathematics
}

Courses (CourseID, CourseName, Professor) = {
  C101, Databases, Smith
  C102, Physics, Doe
  C103, Calculus, White
}

Enrollment (StudentID, CourseID) = {
  1, C101
  2, C102
  3, C103
}
";

fn catalog(text: &str) -> Catalog {
    load_catalog(text).unwrap()
}

fn text(s: &str) -> Value {
    Value::Text(s.into())
}

fn int(i: i64) -> Value {
    Value::Integer(i)
}

/// Runs a query and returns (column names, rows).
fn run(catalog: &Catalog, query: &str) -> (Vec<String>, Vec<Vec<Value>>) {
    let output = QueryEngine::new(catalog).execute(query).unwrap();
    let columns = output
        .relation
        .schema()
        .names()
        .into_iter()
        .map(String::from)
        .collect();
    let rows = output
        .relation
        .iter()
        .map(|row| row.values().to_vec())
        .collect();
    (columns, rows)
}

fn names(rows: &[Vec<Value>]) -> Vec<&str> {
    rows.iter().map(|row| row[0].as_str().unwrap()).collect()
}

#[test]
fn test_select_on_integers() {
    let catalog = catalog("R (a, b) = {\n 1, 2\n 3, 4\n}");
    let (columns, rows) = run(&catalog, "σ a>1 (R)");
    assert_eq!(columns, vec!["a", "b"]);
    assert_eq!(rows, vec![vec![int(3), int(4)]]);
}

#[test]
fn test_unknown_relation() {
    let catalog = catalog("R (a, b) = {\n 1, 2\n}");
    for query in ["UnknownTable", "π name (UnknownTable)"] {
        let err = QueryEngine::new(&catalog).execute(query).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Bind);
        assert_eq!(
            err,
            QueryError::Bind(BindError::UnknownRelation("UnknownTable".into())),
            "{}",
            query
        );
    }
}

#[test]
fn test_select_keyword_form() {
    let catalog = catalog(COMPANY);
    let (columns, rows) = run(&catalog, "select Age > 30 (Employees)");
    assert_eq!(columns, vec!["EID", "Name", "Age"]);
    assert_eq!(
        rows,
        vec![
            vec![text("E1"), text("John"), int(32)],
            vec![text("E4"), text("Carol"), int(35)],
            vec![text("E5"), text("Eve"), int(41)],
        ]
    );
}

#[test]
fn test_project_keeps_row_order() {
    let catalog = catalog(COMPANY);
    let (columns, rows) = run(&catalog, "project Name, Age (Employees)");
    assert_eq!(columns, vec!["Name", "Age"]);
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[1], vec![text("Alice"), int(28)]);
}

#[test]
fn test_project_does_not_deduplicate() {
    let catalog = catalog("R (a, b) = {\n 1, 1\n 1, 2\n 2, 3\n}");
    let (_, rows) = run(&catalog, "π a (R)");
    assert_eq!(rows, vec![vec![int(1)], vec![int(1)], vec![int(2)]]);
}

#[test]
fn test_natural_join() {
    let catalog = catalog(COMPANY);
    let (columns, rows) = run(&catalog, "Employees ⨝ Departments");
    assert_eq!(columns, vec!["EID", "Name", "Age", "DID", "DName"]);
    assert_eq!(
        rows,
        vec![
            vec![text("E1"), text("John"), int(32), text("D2"), text("IT")],
            vec![text("E2"), text("Alice"), int(28), text("D1"), text("HR")],
            vec![text("E3"), text("Bob"), int(29), text("D3"), text("Finance")],
            vec![text("E4"), text("Carol"), int(35), text("D4"), text("Sales")],
        ]
    );
}

#[test]
fn test_natural_join_arity() {
    let catalog = catalog(
        "Employees (id, name) = {\n 1, Ann\n 2, Ben\n}\n\
         Departments (id, dept) = {\n 1, Ops\n 3, Lab\n}",
    );
    let output = QueryEngine::new(&catalog)
        .execute("Employees ⨝ Departments")
        .unwrap();
    assert_eq!(output.relation.schema().len(), 3);
    assert_eq!(output.relation.len(), 1);
}

#[test]
fn test_natural_join_promotes_numeric_keys() {
    let catalog = catalog("A (k, x) = {\n 1, a\n 2, b\n}\nB (k, y) = {\n 2.0, c\n 1.5, d\n}");
    let (columns, rows) = run(&catalog, "A ⨝ B");
    assert_eq!(columns, vec!["k", "x", "y"]);
    assert_eq!(rows, vec![vec![int(2), text("b"), text("c")]]);
}

#[test]
fn test_theta_join_keyword_form() {
    let catalog = catalog(SCHOOL);
    let (columns, rows) = run(
        &catalog,
        "Student JOIN Student.ID = Enrollment.StudentID Enrollment",
    );
    assert_eq!(
        columns,
        vec!["ID", "Name", "Age", "Major", "StudentID", "CourseID"]
    );
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0][3], text("Computer Science"));
    assert_eq!(rows[2][5], text("C103"));
}

#[test]
fn test_theta_join_bracketed_condition() {
    let catalog = catalog(COMPANY);
    let (_, rows) = run(
        &catalog,
        "π Name, MID (Employees ⨝[Age > 30] π MID (Managers))",
    );
    // three employees over 30, each paired with every manager
    assert_eq!(rows.len(), 9);
    assert_eq!(rows[0], vec![text("John"), text("M1")]);
}

#[test]
fn test_theta_join_name_collision() {
    let catalog = catalog(COMPANY);
    let err = QueryEngine::new(&catalog)
        .execute("Employees JOIN Employees.EID = Departments.EID Departments")
        .unwrap_err();
    assert!(matches!(
        err,
        QueryError::Bind(BindError::ColumnNameCollision { .. })
    ));
}

#[test]
fn test_union_keeps_first_occurrence_order() {
    let catalog = catalog(COMPANY);
    let (columns, rows) = run(
        &catalog,
        "(project Name (select Age > 30 (Employees))) union (project Name (Managers))",
    );
    assert_eq!(columns, vec!["Name"]);
    assert_eq!(names(&rows), vec!["John", "Carol", "Eve", "Alice", "David"]);
}

#[test]
fn test_intersect() {
    let catalog = catalog(COMPANY);
    let (_, rows) = run(&catalog, "(project Name (Employees)) intersect (project Name (Managers))");
    assert_eq!(names(&rows), vec!["Alice", "Eve"]);
}

#[test]
fn test_difference_spellings() {
    let catalog = catalog(COMPANY);
    for query in [
        "(project Name (Employees)) - (project Name (Contractors))",
        "π Name (Employees) − π Name (Contractors)",
        "π Name (Employees) MINUS π Name (Contractors)",
        "π Name (Employees) diff π Name (Contractors)",
    ] {
        let (_, rows) = run(&catalog, query);
        assert_eq!(names(&rows), vec!["John", "Alice"], "query: {}", query);
    }
}

#[test]
fn test_nested_difference_of_joins() {
    let catalog = catalog(SCHOOL);
    let enrolled = "((Student JOIN Student.ID = Enrollment.StudentID Enrollment) ⨝ Courses)";
    let query = format!(
        "π Name {} − π Name (σ Professor = 'Smith' {})",
        enrolled, enrolled
    );
    let (columns, rows) = run(&catalog, &query);
    assert_eq!(columns, vec!["Name"]);
    assert_eq!(names(&rows), vec!["Bob", "Charlie"]);
}

#[test]
fn test_nested_set_operators_associate_left() {
    let catalog = catalog(COMPANY);
    let query = "
        (π Name (σ Age > 30 (Employees ⨝ Departments)))
        ∪
        ((π Name (Managers)) ∩ (π Name (Employees)))
        −
        (π Name (σ Age < 30 (Employees)))";
    let (_, rows) = run(&catalog, query);
    assert_eq!(names(&rows), vec!["John", "Carol", "Eve"]);
}

#[test]
fn test_rename_then_union() {
    let catalog = catalog(COMPANY);
    let (columns, rows) = run(
        &catalog,
        "π Name (Contractors) ∪ ρ Person→Name (π Person (ρ Name→Person (Managers)))",
    );
    assert_eq!(columns, vec!["Name"]);
    assert_eq!(names(&rows), vec!["Bob", "Carol", "Eve", "Alice", "David"]);
}

#[test]
fn test_product() {
    let catalog = catalog("R (a) = {\n 1\n 2\n}\nS (b) = {\n x\n y\n z\n}");
    let (columns, rows) = run(&catalog, "R × S");
    assert_eq!(columns, vec!["a", "b"]);
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0], vec![int(1), text("x")]);
    assert_eq!(rows[3], vec![int(2), text("x")]);
}

#[test]
fn test_select_with_connectives_and_literals() {
    let catalog = catalog(
        "P (name, score: Float, active) = {\n a, 1.5, true\n b, -2, false\n 'c d', 3, TRUE\n}",
    );
    let (_, rows) = run(&catalog, "σ[active ∧ ¬(score < 0)] (P)");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][0], text("c d"));

    let (_, rows) = run(&catalog, "σ score = -2 ∨ name = \"a\" (P)");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][1], Value::Float(-2.0));
}

#[test]
fn test_empty_result_keeps_schema() {
    let catalog = catalog(COMPANY);
    let output = QueryEngine::new(&catalog)
        .execute("select Age > 100 (Employees)")
        .unwrap();
    assert!(output.relation.is_empty());
    assert_eq!(output.relation.schema().names(), vec!["EID", "Name", "Age"]);
}

#[test]
fn test_empty_relation_with_declared_types() {
    let catalog = catalog("Employees (EID, Name, Age: Integer) = {\n}");
    let output = QueryEngine::new(&catalog)
        .execute("select Age > 30 (Employees)")
        .unwrap();
    assert!(output.relation.is_empty());
    assert_eq!(
        output.relation.schema().data_types(),
        vec![DataType::Text, DataType::Text, DataType::Integer]
    );
}

#[test]
fn test_unknown_operator_word_is_rejected() {
    let catalog = catalog(COMPANY);
    let err = QueryEngine::new(&catalog)
        .execute("invalid_operation (Employees)")
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Parse);
}

#[test]
fn test_bind_errors() {
    let catalog = catalog(COMPANY);
    let engine = QueryEngine::new(&catalog);

    let err = engine.execute("σ Salary > 1 (Employees)").unwrap_err();
    assert!(matches!(
        err,
        QueryError::Bind(BindError::UnknownColumn { ref column, .. }) if column == "Salary"
    ));

    let err = engine.execute("σ Name > 1 (Employees)").unwrap_err();
    assert!(matches!(err, QueryError::Bind(BindError::TypeMismatch { .. })));

    let err = engine.execute("Employees ∪ Contractors").unwrap_err();
    assert!(matches!(err, QueryError::Bind(BindError::SchemaMismatch { .. })));

    let err = engine.execute("Employees × Managers").unwrap_err();
    assert!(matches!(
        err,
        QueryError::Bind(BindError::ColumnNameCollision { .. })
    ));

    let err = engine.execute("π Name (Employees) ⨝ π MID (Managers)").unwrap_err();
    assert!(matches!(err, QueryError::Bind(BindError::NoJoinColumns { .. })));
}

#[test]
fn test_lex_and_parse_errors_carry_offsets() {
    let catalog = catalog(COMPANY);
    let engine = QueryEngine::new(&catalog);

    match engine.execute("σ Name = 'John (Employees)").unwrap_err() {
        QueryError::Lex(err) => assert_eq!(err.offset, 10),
        other => panic!("expected lex error, got {:?}", other),
    }
    match engine.execute("π Name (Employees").unwrap_err() {
        QueryError::Parse(err) => assert_eq!(err.found, "end of input"),
        other => panic!("expected parse error, got {:?}", other),
    }
}

#[test]
fn test_row_limit() {
    let catalog = catalog("R (a) = {\n 1\n 2\n 3\n}\nS (b) = {\n 1\n 2\n 3\n}");
    let engine =
        QueryEngine::new(&catalog).with_context(ExecutionContext::new().with_max_rows(Some(8)));

    let err = engine.execute("R × S").unwrap_err();
    assert_eq!(
        err,
        QueryError::Evaluation(EvaluationError::RowLimitExceeded {
            operator: "product",
            limit: 8,
        })
    );
    assert_eq!(
        engine.execute("σ a = b (R × S)").unwrap_err().category(),
        ErrorCategory::Evaluation
    );
    assert_eq!(engine.execute("R ⨝[a = b] S").unwrap().relation.len(), 3);

    let unbounded = QueryEngine::new(&catalog).with_context(ExecutionContext::unbounded());
    assert_eq!(unbounded.execute("R × S").unwrap().relation.len(), 9);
}

#[test]
fn test_validate_returns_schema_only() {
    let catalog = catalog(COMPANY);
    let schema = QueryEngine::new(&catalog)
        .validate("π Name, DName (Employees ⨝ Departments)")
        .unwrap();
    assert_eq!(schema.names(), vec!["Name", "DName"]);
}

#[test]
fn test_echo_is_normalized() {
    let catalog = catalog(COMPANY);
    let output = QueryEngine::new(&catalog)
        .execute("project Name (select Age>30 (Employees))")
        .unwrap();
    assert_eq!(output.query, "π Name (σ Age > 30 (Employees))");
    assert_eq!(output.name, "Employees");

    let reparsed = QueryEngine::new(&catalog).execute(&output.query).unwrap();
    assert_eq!(reparsed.query, output.query);
    assert_eq!(reparsed.relation.rows(), output.relation.rows());
}

#[test]
fn test_leaf_shares_catalog_relation() {
    let catalog = catalog(COMPANY);
    let output = QueryEngine::new(&catalog).execute("Employees").unwrap();
    let stored = catalog.get("Employees").unwrap();
    assert!(std::sync::Arc::ptr_eq(stored, &output.relation));
}

#[test]
fn test_concurrent_queries_share_catalog() {
    let catalog = std::sync::Arc::new(catalog(COMPANY));
    std::thread::scope(|scope| {
        for _ in 0..4 {
            let catalog = std::sync::Arc::clone(&catalog);
            scope.spawn(move || {
                let engine = QueryEngine::new(&catalog);
                for _ in 0..20 {
                    let out = engine.execute("π Name (Employees ⨝ Departments)").unwrap();
                    assert_eq!(out.relation.len(), 4);
                }
            });
        }
    });
}

fn repeated(head: &str, item: &str, n: usize, tail: &str) -> String {
    let mut query = String::from(head);
    for _ in 0..n {
        query.push_str(item);
    }
    query.push_str(tail);
    query
}

#[test]
fn test_deepest_queries_run_on_small_stack() {
    let catalog = catalog("R (a, b) = {\n 1, 2\n 3, 4\n}");
    let at_limit = [
        repeated("R", " ∪ R", MAX_EXPR_DEPTH - 1, ""),
        repeated("R", " − R", MAX_EXPR_DEPTH - 1, ""),
        repeated("", "σ a > 0 ", MAX_EXPR_DEPTH - 1, "R"),
        repeated("σ a > 0", " ∧ b > 0", MAX_EXPR_DEPTH - 2, " (R)"),
        repeated("σ ¬", " ¬", MAX_EXPR_DEPTH - 3, " a = 1 (R)"),
        repeated("", "π a, b ", MAX_EXPR_DEPTH - 1, "R"),
    ];
    let too_deep = [
        repeated("R", " ∪ R", MAX_EXPR_DEPTH, ""),
        repeated("R", " ∪ R", 5000, ""),
        repeated("", "σ a > 0 ", 250, "R"),
        repeated("σ a = 1", " ∧ a = 1", 100_000, " (R)"),
    ];

    std::thread::Builder::new()
        .stack_size(2 << 20)
        .spawn(move || {
            let engine = QueryEngine::new(&catalog);
            for query in &at_limit {
                let output = engine.execute(query).unwrap();
                assert!(output.relation.len() <= 2);
            }
            for query in &too_deep {
                let err = engine.execute(query).unwrap_err();
                assert_eq!(err.category(), ErrorCategory::Parse);
            }
        })
        .unwrap()
        .join()
        .unwrap();
}
