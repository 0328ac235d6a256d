//! Snapshot loading and end-to-end overview tests

use acl_overview::config::{AppConfig, OutputFormat};
use acl_overview::error::RepositoryError;
use acl_overview::overview::{OverviewBuilder, PrincipalRef};
use acl_overview::report;
use acl_overview::repository::{InMemoryRepository, RecordPath, RepositoryReader};
use std::fs;
use tempfile::tempdir;

const SITE_JSON: &str = r#"
{
  "workspaces": {
    "users": {
      "records": [
        {
          "name": "admin",
          "children": [
            {
              "name": "alice",
              "id": "u-alice",
              "children": [
                { "name": "roles", "properties": { "0": "r-editors", "1": "r-removed" } },
                { "name": "groups", "properties": { "0": "g-publishing" } }
              ]
            },
            { "name": "bob", "id": "u-bob" }
          ]
        }
      ]
    },
    "userroles": {
      "records": [
        {
          "name": "editors",
          "id": "r-editors",
          "children": [
            {
              "name": "acl_website",
              "children": [
                { "name": "0", "properties": { "path": "/", "permissions": 63 } },
                {
                  "name": "1",
                  "properties": { "path": "/private", "permissions": 63 },
                  "unreadable_properties": ["permissions"]
                }
              ]
            }
          ]
        },
        {
          "name": "publishers",
          "id": "r-publishers",
          "children": [
            {
              "name": "acl_dam",
              "children": [
                { "name": "0", "properties": { "path": "/assets", "permissions": "8" } }
              ]
            },
            {
              "name": "acl_config",
              "children": [
                { "name": "0", "properties": { "path": "/", "permissions": 0 } }
              ]
            }
          ]
        }
      ]
    },
    "usergroups": {
      "records": [
        {
          "name": "publishing",
          "id": "g-publishing",
          "children": [
            { "name": "roles", "properties": { "0": "r-publishers" } }
          ]
        }
      ]
    }
  }
}
"#;

const SITE_TOML: &str = r#"
[[workspaces.users.records]]
name = "carol"
id = "u-carol"

[[workspaces.users.records.children]]
name = "roles"
properties = { "0" = "r-viewers" }

[[workspaces.userroles.records]]
name = "viewers"
id = "r-viewers"

[[workspaces.userroles.records.children]]
name = "acl_website"

[[workspaces.userroles.records.children.children]]
name = "0"
properties = { path = "/", permissions = 8 }

[[workspaces.userroles.records.children.children]]
name = "1"
properties = { path = "/drafts", permissions = 0 }
"#;

fn write_snapshot(name: &str, content: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    (dir, path)
}

fn principal(repo: &InMemoryRepository, key: &str) -> PrincipalRef {
    repo.find("users", key).unwrap().into()
}

#[test]
fn test_load_json_snapshot() {
    let (_dir, path) = write_snapshot("site.json", SITE_JSON);
    let repo = InMemoryRepository::load(&path).unwrap();

    let alice = repo.find("users", "alice").unwrap();
    assert_eq!(alice.id, "u-alice");
    assert_eq!(alice.path, RecordPath::new("users", "/admin/alice"));

    // Document order is kept
    let roles = repo
        .property_names(&RecordPath::new("users", "/admin/alice/roles"))
        .unwrap();
    assert_eq!(roles, vec!["0", "1"]);
}

#[test]
fn test_json_snapshot_overview() {
    let (_dir, path) = write_snapshot("site.json", SITE_JSON);
    let repo = InMemoryRepository::load(&path).unwrap();
    let config = AppConfig::default();

    let overview = OverviewBuilder::from_config(&repo, &config)
        .unwrap()
        .build(&principal(&repo, "u-alice"));

    assert_eq!(
        overview.repositories().collect::<Vec<_>>(),
        vec!["website", "dam", "config"]
    );

    let website = overview.entries("website").unwrap();
    assert_eq!(website.len(), 1);
    assert_eq!(website[0].path, "/");
    assert_eq!(website[0].permission_label(), "Read/Write");

    let dam = overview.entries("dam").unwrap();
    assert_eq!(dam[0].permission_label(), "Read Only");
    assert_eq!(dam[0].role_name, "publishers");

    assert_eq!(
        overview.entries("config").unwrap()[0].permission_label(),
        "Deny Access"
    );
}

#[test]
fn test_principal_without_references() {
    let (_dir, path) = write_snapshot("site.json", SITE_JSON);
    let repo = InMemoryRepository::load(&path).unwrap();
    let config = AppConfig::default();

    let overview = OverviewBuilder::from_config(&repo, &config)
        .unwrap()
        .build(&principal(&repo, "bob"));

    assert!(overview.is_empty());
    assert_eq!(
        report::render(&overview, OutputFormat::Table).unwrap(),
        "no permissions\n"
    );
}

#[test]
fn test_configured_exclude() {
    let (_dir, path) = write_snapshot("site.json", SITE_JSON);
    let repo = InMemoryRepository::load(&path).unwrap();
    let mut config = AppConfig::default();
    config.report.exclude = vec!["^config$".to_string()];

    let overview = OverviewBuilder::from_config(&repo, &config)
        .unwrap()
        .build(&principal(&repo, "alice"));

    assert_eq!(overview.repositories().collect::<Vec<_>>(), vec!["website", "dam"]);
}

#[test]
fn test_toml_snapshot_overview() {
    let (_dir, path) = write_snapshot("site.toml", SITE_TOML);
    let repo = InMemoryRepository::load(&path).unwrap();
    let config = AppConfig::default();

    let overview = OverviewBuilder::from_config(&repo, &config)
        .unwrap()
        .build(&principal(&repo, "carol"));

    let json = report::render(&overview, OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "website": [
                { "repository": "website", "path": "/", "permission": "Read Only", "role_name": "viewers" },
                { "repository": "website", "path": "/drafts", "permission": "Deny Access", "role_name": "viewers" }
            ]
        })
    );
}

#[test]
fn test_unsupported_extension() {
    let (_dir, path) = write_snapshot("site.yaml", "workspaces: {}");
    let result = InMemoryRepository::load(&path);
    assert!(matches!(result, Err(RepositoryError::Snapshot(_))));
}

#[test]
fn test_malformed_json() {
    let (_dir, path) = write_snapshot("site.json", "{ not json");
    let result = InMemoryRepository::load(&path);
    assert!(matches!(result, Err(RepositoryError::Snapshot(_))));
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let result = InMemoryRepository::load(dir.path().join("absent.json"));
    assert!(matches!(result, Err(RepositoryError::Io(_))));
}

#[test]
fn test_duplicate_ids_rejected() {
    let content = r#"
{
  "workspaces": {
    "userroles": {
      "records": [
        { "name": "a", "id": "same" },
        { "name": "b", "id": "same" }
      ]
    }
  }
}
"#;
    let (_dir, path) = write_snapshot("site.json", content);
    assert!(InMemoryRepository::load(&path).is_err());
}
