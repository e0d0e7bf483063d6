//! CLI integration tests for jsonapi-deserialize binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cmd() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("jsonapi-deserialize"))
}

// Helper to create a temp input file
fn write_temp_file(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

const MODELS: &str = r#"{
    "article": {
        "title": {},
        "author": { "jsonApi": "hasOne", "type": "person" },
        "comments": { "jsonApi": "hasMany", "type": "comment" }
    },
    "person": {
        "name": {},
        "articles": { "jsonApi": "hasMany", "type": "article" }
    },
    "comment": { "body": {} }
}"#;

const ARTICLE: &str = r#"{
    "data": {
        "type": "articles",
        "id": "1",
        "attributes": { "title": "A" },
        "relationships": { "author": { "data": { "type": "people", "id": "9" } } }
    },
    "included": [
        { "type": "people", "id": "9", "attributes": { "name": "Bob" } }
    ]
}"#;

mod deserialize_command {
    use super::*;

    #[test]
    fn basic_deserialize() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(&dir, "models.json", MODELS);
        let document = write_temp_file(&dir, "document.json", ARTICLE);

        cmd()
            .args([
                "deserialize",
                document.to_str().unwrap(),
                "--models",
                models.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""title":"A""#))
            .stdout(predicate::str::contains(
                r#""author":{"id":"9","type":"people","name":"Bob"}"#,
            ));
    }

    #[test]
    fn deserialize_with_pretty() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(&dir, "models.json", MODELS);
        let document = write_temp_file(&dir, "document.json", ARTICLE);

        cmd()
            .args([
                "deserialize",
                document.to_str().unwrap(),
                "--models",
                models.to_str().unwrap(),
                "--pretty",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("{\n"));
    }

    #[test]
    fn deserialize_with_output_file() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(&dir, "models.json", MODELS);
        let document = write_temp_file(&dir, "document.json", ARTICLE);
        let output = dir.path().join("output.json");

        cmd()
            .args([
                "deserialize",
                document.to_str().unwrap(),
                "--models",
                models.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::is_empty());

        let content = fs::read_to_string(&output).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["author"]["name"], "Bob");
    }

    #[test]
    fn deserialize_cyclic_document() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(&dir, "models.json", MODELS);
        let document = write_temp_file(
            &dir,
            "document.json",
            r#"{
                "data": {
                    "type": "articles", "id": "1",
                    "relationships": { "author": { "data": { "type": "people", "id": "9" } } }
                },
                "included": [
                    {
                        "type": "people", "id": "9",
                        "relationships": { "articles": { "data": [{ "type": "articles", "id": "1" }] } }
                    },
                    { "type": "articles", "id": "1" }
                ]
            }"#,
        );

        cmd()
            .args([
                "deserialize",
                document.to_str().unwrap(),
                "--models",
                models.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains(
                r#""articles":[{"id":"1","type":"articles"}]"#,
            ));
    }

    #[test]
    fn unknown_attribute_warns_but_succeeds() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(&dir, "models.json", MODELS);
        let document = write_temp_file(
            &dir,
            "document.json",
            r#"{ "data": { "type": "articles", "id": "1", "attributes": { "title": "A", "subtitle": "B" } } }"#,
        );

        cmd()
            .args([
                "deserialize",
                document.to_str().unwrap(),
                "--models",
                models.to_str().unwrap(),
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("subtitle").not())
            .stderr(predicate::str::contains("attribute \"subtitle\""));
    }

    #[test]
    fn strict_fails_on_mismatch() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(&dir, "models.json", MODELS);
        let document = write_temp_file(
            &dir,
            "document.json",
            r#"{ "data": { "type": "articles", "id": "1", "attributes": { "subtitle": "B" } } }"#,
        );

        cmd()
            .args([
                "deserialize",
                document.to_str().unwrap(),
                "--models",
                models.to_str().unwrap(),
                "--strict",
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("1 schema mismatch(es)"));
    }

    #[test]
    fn share_cache_links_primary_resources() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(&dir, "models.json", MODELS);
        let document = write_temp_file(
            &dir,
            "document.json",
            r#"{
                "data": [
                    {
                        "type": "people", "id": "9",
                        "relationships": { "articles": { "data": [{ "type": "articles", "id": "1" }] } }
                    },
                    {
                        "type": "articles", "id": "1",
                        "relationships": { "author": { "data": { "type": "people", "id": "9" } } }
                    }
                ],
                "included": [{ "type": "articles", "id": "1", "attributes": { "title": "A" } }]
            }"#,
        );

        // The second primary resource is the cached article, so it carries
        // no author relationship of its own.
        cmd()
            .args([
                "deserialize",
                document.to_str().unwrap(),
                "--models",
                models.to_str().unwrap(),
                "--share-cache",
            ])
            .assert()
            .success()
            .stdout(predicate::str::contains("author").not());
    }
}

mod check_models_command {
    use super::*;

    #[test]
    fn valid_models() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(&dir, "models.json", MODELS);

        cmd()
            .args(["check-models", models.to_str().unwrap()])
            .assert()
            .success()
            .stdout(predicate::str::contains("Valid (3 models)"));
    }

    #[test]
    fn invalid_relation_kind() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(
            &dir,
            "models.json",
            r#"{ "article": { "author": { "jsonApi": "belongsTo" } } }"#,
        );

        cmd()
            .args(["check-models", models.to_str().unwrap()])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("/article/author/jsonApi"));
    }

    #[test]
    fn json_output_valid() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(&dir, "models.json", MODELS);

        cmd()
            .args(["check-models", models.to_str().unwrap(), "--json"])
            .assert()
            .success()
            .stdout(predicate::str::contains(r#""valid":true"#))
            .stdout(predicate::str::contains(r#""article""#));
    }

    #[test]
    fn json_output_invalid() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(
            &dir,
            "models.json",
            r#"{ "article": { "author": { "jsonApi": "hasOne", "filter": "x" } } }"#,
        );

        cmd()
            .args(["check-models", models.to_str().unwrap(), "--json"])
            .assert()
            .code(1)
            .stdout(predicate::str::contains(r#""valid":false"#))
            .stdout(predicate::str::contains(r#""errors""#));
    }

    #[test]
    fn json_output_file_error() {
        cmd()
            .args(["check-models", "/nonexistent/models.json", "--json"])
            .assert()
            .code(3)
            .stdout(predicate::str::contains(r#""valid":false"#))
            .stdout(predicate::str::contains("file not found"));
    }
}

mod error_handling {
    use super::*;

    #[test]
    fn document_not_found() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(&dir, "models.json", MODELS);

        cmd()
            .args([
                "deserialize",
                "/nonexistent/document.json",
                "--models",
                models.to_str().unwrap(),
            ])
            .assert()
            .code(3)
            .stderr(predicate::str::contains("file not found"));
    }

    #[test]
    fn invalid_json_document() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(&dir, "models.json", MODELS);
        let document = write_temp_file(&dir, "document.json", "{ not json");

        cmd()
            .args([
                "deserialize",
                document.to_str().unwrap(),
                "--models",
                models.to_str().unwrap(),
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON"));
    }

    #[test]
    fn malformed_document_shape() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(&dir, "models.json", MODELS);
        let document = write_temp_file(&dir, "document.json", r#"{ "data": { "id": "1" } }"#);

        cmd()
            .args([
                "deserialize",
                document.to_str().unwrap(),
                "--models",
                models.to_str().unwrap(),
            ])
            .assert()
            .code(2)
            .stderr(predicate::str::contains("invalid JSON:API document"));
    }

    #[test]
    fn missing_model_definition() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(&dir, "models.json", MODELS);
        let document = write_temp_file(
            &dir,
            "document.json",
            r#"{ "data": { "type": "robots", "id": "1" } }"#,
        );

        cmd()
            .args([
                "deserialize",
                document.to_str().unwrap(),
                "--models",
                models.to_str().unwrap(),
            ])
            .assert()
            .code(2)
            .stdout(predicate::str::is_empty())
            .stderr(predicate::str::contains("\"robot\""));
    }

    #[test]
    fn invalid_models_file() {
        let dir = TempDir::new().unwrap();
        let models = write_temp_file(&dir, "models.json", r#"{ "article": 3 }"#);
        let document = write_temp_file(&dir, "document.json", ARTICLE);

        cmd()
            .args([
                "deserialize",
                document.to_str().unwrap(),
                "--models",
                models.to_str().unwrap(),
            ])
            .assert()
            .code(1)
            .stderr(predicate::str::contains("Error loading models"));
    }
}

mod required_args {
    use super::*;

    #[test]
    fn missing_models_flag() {
        cmd()
            .args(["deserialize", "document.json"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("--models"));
    }

    #[test]
    fn missing_document_path() {
        cmd()
            .args(["deserialize", "--models", "models.json"])
            .assert()
            .failure();
    }
}

mod help_and_version {
    use super::*;

    #[test]
    fn help_flag() {
        cmd()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("Deserialize JSON:API documents"));
    }

    #[test]
    fn version_flag() {
        cmd()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("jsonapi-deserialize"));
    }

    #[test]
    fn deserialize_help() {
        cmd()
            .args(["deserialize", "--help"])
            .assert()
            .success()
            .stdout(predicate::str::contains("--share-cache"));
    }
}
