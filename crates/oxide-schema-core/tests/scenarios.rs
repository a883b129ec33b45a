//! End-to-end reconciliation scenarios against a fake connection.
//!
//! Each test describes the live table through canned catalog rows, runs
//! the migrator, and checks the operations, rendered SQL and reports.

mod common;

use common::{user_with_email, FakeConnection};
use oxide_schema_core::prelude::*;

// =============================================================================
// Create path
// =============================================================================

#[tokio::test]
async fn missing_table_is_created() {
    let migrator = Migrator::new(FakeConnection::new(DialectKind::Sqlite));
    let desired = migrator.desired(&user_with_email()).unwrap();

    let result = migrator.migrate(&desired, false).await.unwrap();

    assert_eq!(result.mode(), DiffMode::Create);
    assert!(result.operations().is_empty());
    assert_eq!(
        migrator.connection().executed(),
        ["create table \"user\" (\"id\" integer primary key autoincrement, \
          \"name\" varchar(255), \"email\" varchar(255))"]
    );
}

#[tokio::test]
async fn missing_mysql_table_is_created() {
    let migrator = Migrator::new(FakeConnection::new(DialectKind::MySql));
    let desired = migrator.desired(&user_with_email()).unwrap();

    let result = migrator.diff(&desired).await.unwrap();
    let sql = migrator.sql_for(&result, &desired).unwrap();

    assert_eq!(result.mode(), DiffMode::Create);
    assert_eq!(
        sql,
        ["create table `user` (`id` integer primary key auto_increment, \
          `name` varchar(255), `email` varchar(255))"]
    );
}

// =============================================================================
// Incremental changes
// =============================================================================

#[tokio::test]
async fn new_field_is_added() {
    let conn = FakeConnection::new(DialectKind::MySql).with_table(
        "user",
        &[("id", "int(11)", true), ("name", "varchar(255)", false)],
    );
    let migrator = Migrator::new(conn);
    let desired = migrator.desired(&user_with_email()).unwrap();

    let result = migrator.migrate(&desired, false).await.unwrap();

    assert_eq!(
        result.operations(),
        [MigrationOperation::AddField {
            name: "email".into(),
            native_type: NativeTypeSpec::new("varchar").size(255),
        }]
    );
    assert_eq!(
        result.report().simple(),
        "ON TABLE : user => added 1 field, altered 0 fields and dropped 0 fields"
    );
    assert_eq!(
        migrator.connection().executed(),
        ["alter table `user` add column `email` varchar(255)"]
    );
}

#[tokio::test]
async fn changed_type_is_altered() {
    let conn = FakeConnection::new(DialectKind::MySql).with_table(
        "user",
        &[("id", "int(11)", true), ("name", "varchar(255)", false)],
    );
    let migrator = Migrator::new(conn);
    let desired = migrator
        .desired(&SchemaBuilder::new("user").field("name", SemanticType::DateTime))
        .unwrap();

    let result = migrator.migrate(&desired, false).await.unwrap();

    assert_eq!(
        result.operations(),
        [MigrationOperation::AlterField {
            name: "name".into(),
            old_type: NativeTypeSpec::new("varchar").size(255),
            new_type: NativeTypeSpec::new("datetime"),
        }]
    );
    assert!(result
        .report()
        .detailed()
        .contains("name Type : varchar => datetime"));
    assert_eq!(
        migrator.connection().executed(),
        ["alter table `user` change column `name` `name` datetime"]
    );
}

#[tokio::test]
async fn sqlite_type_change_is_surfaced_not_executed() {
    let conn = FakeConnection::new(DialectKind::Sqlite).with_table(
        "user",
        &[("id", "INTEGER", true), ("name", "varchar(255)", false)],
    );
    let migrator = Migrator::new(conn);
    let desired = migrator
        .desired(&SchemaBuilder::new("user").field("name", SemanticType::DateTime))
        .unwrap();

    let result = migrator.migrate(&desired, false).await.unwrap();

    assert_eq!(result.report().altered().len(), 1);
    assert!(migrator.connection().executed().is_empty());
}

#[tokio::test]
async fn removed_field_is_dropped() {
    let conn = FakeConnection::new(DialectKind::Sqlite).with_table(
        "user",
        &[
            ("id", "integer", true),
            ("name", "varchar(255)", false),
            ("legacy_flag", "boolean", false),
        ],
    );
    let migrator = Migrator::new(conn);
    let desired = migrator
        .desired(&SchemaBuilder::new("user").field("name", SemanticType::String))
        .unwrap();

    let result = migrator.migrate(&desired, false).await.unwrap();

    assert_eq!(
        result.operations(),
        [MigrationOperation::DropField {
            name: "legacy_flag".into()
        }]
    );
    assert_eq!(
        migrator.connection().executed(),
        ["alter table \"user\" drop column \"legacy_flag\""]
    );
}

#[tokio::test]
async fn identical_schema_has_no_changes() {
    let conn = FakeConnection::new(DialectKind::Sqlite).with_table(
        "user",
        &[
            ("id", "integer", true),
            ("name", "varchar(255)", false),
            ("email", "varchar(255)", false),
        ],
    );
    let migrator = Migrator::new(conn);
    let desired = migrator.desired(&user_with_email()).unwrap();

    let result = migrator.migrate(&desired, false).await.unwrap();

    assert!(result.is_empty());
    assert!(!result.report().changed());
    assert_eq!(result.report().simple(), "ON TABLE : user => no changes");
    assert!(migrator.connection().executed().is_empty());
}

#[tokio::test]
async fn native_only_mysql_types_keep_their_names() {
    let conn = FakeConnection::new(DialectKind::MySql).with_table(
        "post",
        &[
            ("id", "int(11)", true),
            ("body", "blob", false),
            ("seen", "timestamp", false),
        ],
    );
    let migrator = Migrator::new(conn);
    let desired = migrator
        .desired(
            &SchemaBuilder::new("post")
                .field("body", SemanticType::Text)
                .field("seen", SemanticType::DateTime),
        )
        .unwrap();

    let result = migrator.migrate(&desired, true).await.unwrap();

    assert_eq!(
        result.operations(),
        [
            MigrationOperation::AlterField {
                name: "body".into(),
                old_type: NativeTypeSpec::new("blob"),
                new_type: NativeTypeSpec::new("text"),
            },
            MigrationOperation::AlterField {
                name: "seen".into(),
                old_type: NativeTypeSpec::new("timestamp"),
                new_type: NativeTypeSpec::new("datetime"),
            },
        ]
    );
    let detailed = result.report().detailed();
    assert!(detailed.contains("body Type : blob => text"));
    assert!(detailed.contains("seen Type : timestamp => datetime"));
    assert_eq!(
        migrator.sql_for(&result, &desired).unwrap(),
        ["alter table `post` change column `body` `body` text, \
          change column `seen` `seen` datetime"]
    );
}

#[tokio::test]
async fn matching_native_only_type_is_left_alone() {
    let conn = FakeConnection::new(DialectKind::MySql).with_table(
        "post",
        &[("id", "int(11)", true), ("seen", "TIMESTAMP", false)],
    );
    let profile = DialectKind::MySql
        .profile()
        .with_type(SemanticType::DateTime, NativeTypeSpec::new("timestamp"));
    let migrator = Migrator::with_profile(conn, profile).unwrap();
    let desired = migrator
        .desired(&SchemaBuilder::new("post").field("seen", SemanticType::DateTime))
        .unwrap();

    let result = migrator.migrate(&desired, false).await.unwrap();

    assert!(result.is_empty());
    assert!(migrator.connection().executed().is_empty());
}

// =============================================================================
// Dry run
// =============================================================================

#[tokio::test]
async fn dry_run_executes_nothing() {
    let conn = FakeConnection::new(DialectKind::MySql).with_table(
        "user",
        &[
            ("id", "int", true),
            ("name", "varchar(255)", false),
            ("old", "text", false),
        ],
    );
    let migrator = Migrator::new(conn);
    let desired = migrator
        .desired(
            &SchemaBuilder::new("user")
                .field("name", SemanticType::DateTime)
                .field("email", SemanticType::String)
                .field("created_dts", SemanticType::DateTime),
        )
        .unwrap();

    let result = migrator.migrate(&desired, true).await.unwrap();

    assert!(migrator.connection().executed().is_empty());
    assert_eq!(
        result.report().report(ReportFormat::Detailed),
        ReportOutput::Text(
            [
                "TABLE : user",
                "################################",
                "ADDED (2)",
                "email",
                "created_dts",
                "ALTERED (1)",
                "name Type : varchar => datetime",
                "DROPPED (1)",
                "old",
            ]
            .join("\n")
        )
    );
    assert_eq!(
        migrator.sql_for(&result, &desired).unwrap(),
        ["alter table `user` change column `name` `name` datetime, \
          add column `email` varchar(255), add column `created_dts` datetime, \
          drop column `old`"]
    );
}

// =============================================================================
// Table-level statements
// =============================================================================

#[test]
fn profile_without_default_mapping_is_rejected() {
    let profile = DialectProfile::new("bare", "id integer primary key", '"', DdlStyle::Sqlite)
        .with_type(SemanticType::String, NativeTypeSpec::new("varchar"));
    assert!(matches!(
        Migrator::with_profile(FakeConnection::new(DialectKind::Sqlite), profile),
        Err(SchemaError::UnknownSemanticType(ty)) if ty == "text"
    ));
}

#[tokio::test]
async fn drop_and_rename_tables() {
    let migrator = Migrator::new(FakeConnection::new(DialectKind::Sqlite));

    migrator.rename("user", "account").await.unwrap();
    migrator.drop("account").await.unwrap();

    assert_eq!(
        migrator.connection().executed(),
        [
            "alter table \"user\" rename to \"account\"",
            "drop table if exists \"account\"",
        ]
    );
}

#[tokio::test]
async fn custom_profile_is_used_for_rendering() {
    let profile = DialectKind::MySql
        .profile()
        .with_type(SemanticType::String, NativeTypeSpec::new("varchar").size(64));
    let migrator =
        Migrator::with_profile(FakeConnection::new(DialectKind::MySql), profile).unwrap();
    let desired = migrator
        .desired(&SchemaBuilder::new("tag").field("label", SemanticType::String))
        .unwrap();

    migrator.create(&desired).await.unwrap();

    assert_eq!(
        migrator.connection().executed(),
        ["create table `tag` (`id` integer primary key auto_increment, `label` varchar(64))"]
    );
}
