//! End-to-end tests: declared JSON schemas in, migration documents out.

use dbgen_core::prelude::*;
use pretty_assertions::assert_eq;

// =============================================================================
// Fixtures
// =============================================================================

fn current_documents() -> Vec<Table> {
    vec![Table::new("documents")
        .field(Field::new("id", FieldType::BigSerial).option(FieldOption::PrimaryKey))
        .field(Field::new("name", FieldType::Varchar).limit(200))
        .field(Field::new("release_date", FieldType::Timestamp))
        .field(Field::new("created_at", FieldType::Timestamp))
        .index(
            Index::new("index_documents_on_name")
                .field(IndexField::asc("name"))
                .unique(),
        )]
}

const TARGET_DOCUMENTS: &str = r#"[
  {
    "name": "documents",
    "fields": [
      { "name": "id", "type": "bigserial", "options": ["primary key"] },
      { "name": "name", "type": "varchar", "limit": 50, "options": ["not null"] },
      { "name": "approval", "type": "varchar", "limit": 50 },
      { "name": "created_at", "type": "timestamp", "options": ["not null"] },
      { "name": "updated_at", "type": "TIMESTAMP", "options": ["NOT NULL"] }
    ],
    "indexes": [
      {
        "name": "index_documents_on_name_approval",
        "fields": [{ "column": "name" }, { "column": "approval", "order": "ASC" }],
        "unique": true
      }
    ]
  }
]"#;

fn target_documents() -> Vec<Table> {
    serde_json::from_str(TARGET_DOCUMENTS).unwrap()
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn documents_up_migration() {
    let current = current_documents();
    let target = target_documents();
    let plan = SchemaDiff::new(&current, &target).plan();

    let up = MigrationGenerator::postgres().up(&plan, false).unwrap();
    assert_eq!(
        up,
        "BEGIN;\n\
         \n\
         DROP INDEX IF EXISTS \"index_documents_on_name\";\n\
         \n\
         ALTER TABLE IF EXISTS \"documents\"\n\
         \tADD COLUMN \"approval\" VARCHAR(50),\n\
         \tADD COLUMN \"updated_at\" TIMESTAMP NOT NULL,\n\
         \tDROP COLUMN \"release_date\",\n\
         \tALTER COLUMN \"name\" SET DATA TYPE VARCHAR(50),\n\
         \tALTER COLUMN \"name\" SET NOT NULL,\n\
         \tALTER COLUMN \"created_at\" SET NOT NULL;\n\
         \n\
         CREATE UNIQUE INDEX IF NOT EXISTS \"index_documents_on_name_approval\" \
         ON \"documents\"(\"name\" ASC, \"approval\" ASC);\n\
         \n\
         COMMIT;"
    );
}

#[test]
fn documents_down_migration() {
    let current = current_documents();
    let target = target_documents();
    let plan = SchemaDiff::new(&current, &target).plan();

    let down = MigrationGenerator::postgres().down(&plan, false).unwrap();
    assert_eq!(
        down,
        "BEGIN;\n\
         \n\
         DROP INDEX IF EXISTS \"index_documents_on_name_approval\";\n\
         \n\
         ALTER TABLE IF EXISTS \"documents\"\n\
         \tADD COLUMN \"release_date\" TIMESTAMP,\n\
         \tDROP COLUMN \"approval\",\n\
         \tDROP COLUMN \"updated_at\",\n\
         \tALTER COLUMN \"name\" SET DATA TYPE VARCHAR(200),\n\
         \tALTER COLUMN \"name\" DROP NOT NULL,\n\
         \tALTER COLUMN \"created_at\" DROP NOT NULL;\n\
         \n\
         CREATE UNIQUE INDEX IF NOT EXISTS \"index_documents_on_name\" \
         ON \"documents\"(\"name\" ASC);\n\
         \n\
         COMMIT;"
    );
}

#[test]
fn identical_schemas_produce_no_documents() {
    let target = target_documents();
    let plan = SchemaDiff::new(&target, &target_documents()).plan();
    assert!(plan.is_empty());

    let gen = MigrationGenerator::postgres();
    assert_eq!(gen.up(&plan, false), None);
    assert_eq!(gen.down(&plan, false), None);
}

#[test]
fn skip_drop_table_leaves_other_changes() {
    let mut current = current_documents();
    current.push(
        Table::new("audit_logs").field(Field::new("id", FieldType::Serial).option(FieldOption::PrimaryKey)),
    );
    let target = target_documents();
    let plan = SchemaDiff::new(&current, &target).plan();
    let gen = MigrationGenerator::postgres();

    let up = gen.up(&plan, false).unwrap();
    let down = gen.down(&plan, false).unwrap();
    assert!(up.contains("DROP TABLE IF EXISTS \"audit_logs\";"));
    assert!(down.contains("CREATE TABLE IF NOT EXISTS \"audit_logs\""));

    let skipped_up = gen.up(&plan, true).unwrap();
    let skipped_down = gen.down(&plan, true).unwrap();
    assert!(!skipped_up.contains("audit_logs"));
    assert!(!skipped_down.contains("audit_logs"));
    assert_eq!(skipped_up, up.replace("DROP TABLE IF EXISTS \"audit_logs\";\n\n", ""));
    assert_eq!(
        skipped_down.matches(';').count(),
        down.matches(';').count() - 1
    );
}

#[test]
fn reverse_diff_mirrors_forward_diff() {
    let current = current_documents();
    let target = target_documents();
    let forward = SchemaDiff::new(&current, &target).altered_table("documents").unwrap();
    let backward = SchemaDiff::new(&target, &current).altered_table("documents").unwrap();

    let names = |fields: &[Field]| {
        let mut names: Vec<String> = fields.iter().map(|f| f.name.clone()).collect();
        names.sort();
        names
    };
    assert_eq!(names(&forward.added_columns), names(&backward.dropped_columns));
    assert_eq!(names(&forward.dropped_columns), names(&backward.added_columns));

    for step in &forward.altered_columns {
        let mirror = backward
            .altered_columns
            .iter()
            .find(|c| c.name() == step.name())
            .unwrap();
        assert_eq!(mirror.field, step.previous);
        assert_eq!(mirror.previous, step.field);
        let inverted: Vec<OptionAction> =
            step.option_actions.iter().map(|a| a.inverse()).collect();
        assert_eq!(mirror.option_actions, inverted);
    }
}

#[test]
fn rollback_restores_previous_definitions() {
    let current = vec![Table::new("products")
        .field(Field::new("price", FieldType::Decimal).limit(10).scale(2).default_value(0_i64))
        .field(Field::new("title", FieldType::Text).option(FieldOption::NotNull))];
    let target = vec![Table::new("products")
        .field(Field::new("price", FieldType::Decimal).limit(12).scale(4).default_value(1.5))
        .field(Field::new("title", FieldType::Varchar).limit(80))];
    let plan = SchemaDiff::new(&current, &target).plan();

    let down = MigrationGenerator::postgres().down(&plan, false).unwrap();
    assert!(down.contains("ALTER COLUMN \"price\" SET DATA TYPE DECIMAL(10, 2)"));
    assert!(down.contains("ALTER COLUMN \"price\" SET DEFAULT 0"));
    assert!(down.contains("ALTER COLUMN \"title\" SET DATA TYPE TEXT"));
    assert!(down.contains("ALTER COLUMN \"title\" SET NOT NULL"));

    let up = MigrationGenerator::postgres().up(&plan, false).unwrap();
    assert!(up.contains("ALTER COLUMN \"price\" SET DEFAULT 1.5"));
    assert!(up.contains("ALTER COLUMN \"title\" DROP NOT NULL"));
}

#[test]
fn reshaped_index_is_one_drop_and_one_add() {
    let index = |fields: Vec<IndexField>, unique: bool| Index {
        name: "index_users_on_name_age".to_string(),
        fields,
        unique,
    };
    let current = vec![Table::new("users").index(index(
        vec![IndexField::asc("name"), IndexField::asc("age")],
        false,
    ))];
    let target = vec![Table::new("users").index(index(
        vec![IndexField::asc("age"), IndexField::desc("name")],
        true,
    ))];

    let plan = SchemaDiff::new(&current, &target).plan();
    let step = &plan.altered_tables["users"];
    assert_eq!(step.dropped_indexes, current[0].indexes);
    assert_eq!(step.added_indexes, target[0].indexes);

    let up = MigrationGenerator::postgres().up(&plan, false).unwrap();
    assert_eq!(up.matches("DROP INDEX").count(), 1);
    assert_eq!(up.matches("CREATE UNIQUE INDEX").count(), 1);
    assert!(up.find("DROP INDEX") < up.find("CREATE UNIQUE INDEX"));
}

#[test]
fn invalid_declared_type_is_rejected() {
    let err = serde_json::from_str::<Table>(
        r#"{ "name": "t", "fields": [{ "name": "c", "type": "geometry" }] }"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("invalid \"geometry\" as field type"));
}
