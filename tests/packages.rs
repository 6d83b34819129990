mod common;

use std::time::Duration;

use common::{bearer, logged_in_state, package_json};
use httpmock::prelude::*;
use interview_admin::{Package, PackageDraft, PackageEditor, StoreError, ValidationError};
use serde_json::json;

fn package(id: &str, name: &str) -> Package {
    serde_json::from_value(package_json(id, name)).unwrap()
}

#[tokio::test]
async fn fetch_keeps_server_order() {
    let server = MockServer::start_async().await;
    let list = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/question-package/list")
                .header("Authorization", bearer());
            then.status(200).json_body(json!([
                package_json("c", "Gamma"),
                package_json("a", "Alpha"),
                package_json("b", "Beta")
            ]));
        })
        .await;

    let state = logged_in_state(&server);
    state.packages.fetch_packages().await.unwrap();

    list.assert_async().await;
    let packages = state.packages.state().await;
    let ids: Vec<&str> = packages
        .packages
        .iter()
        .map(|package| package.id.as_str())
        .collect();
    assert_eq!(ids, ["c", "a", "b"]);
    assert!(!packages.loading);
    assert_eq!(packages.error, None);
}

#[tokio::test]
async fn failed_fetch_keeps_previous_cache() {
    let server = MockServer::start_async().await;
    let mut list = server
        .mock_async(|when, then| {
            when.method(GET).path("/question-package/list");
            then.status(200).json_body(json!([package_json("a", "Alpha")]));
        })
        .await;

    let state = logged_in_state(&server);
    state.packages.fetch_packages().await.unwrap();

    list.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/question-package/list");
            then.status(500);
        })
        .await;

    let result = state.packages.fetch_packages().await;

    assert!(matches!(result, Err(StoreError::Request(_))));
    let packages = state.packages.state().await;
    assert_eq!(packages.packages, vec![package("a", "Alpha")]);
    assert_eq!(packages.error.as_deref(), Some("Failed to fetch packages."));
    assert!(!packages.loading);
}

#[tokio::test]
async fn add_appends_server_entity_without_duplicates() {
    let server = MockServer::start_async().await;
    let mut list = server
        .mock_async(|when, then| {
            when.method(GET).path("/question-package/list");
            then.status(200).json_body(json!([package_json("a", "Alpha")]));
        })
        .await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/question-package/create")
                .header("Authorization", bearer())
                .json_body(json!({ "packageName": "P1", "questions": [] }));
            then.status(201)
                .json_body(json!({ "_id": "x", "packageName": "P1", "questions": [] }));
        })
        .await;

    let state = logged_in_state(&server);
    state.packages.fetch_packages().await.unwrap();

    let created = state
        .packages
        .add_package(&PackageDraft::new("P1", vec![]))
        .await
        .unwrap();

    create.assert_async().await;
    assert_eq!(created.id, "x");

    let packages = state.packages.state().await.packages;
    let ids: Vec<&str> = packages.iter().map(|package| package.id.as_str()).collect();
    assert_eq!(ids, ["a", "x"]);

    // A later listing that includes the new package must not duplicate it.
    list.delete_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/question-package/list");
            then.status(200).json_body(json!([
                package_json("a", "Alpha"),
                { "_id": "x", "packageName": "P1", "questions": [] }
            ]));
        })
        .await;
    state.packages.fetch_packages().await.unwrap();

    let packages = state.packages.state().await.packages;
    assert_eq!(packages.iter().filter(|package| package.id == "x").count(), 1);
    assert_eq!(packages.len(), 2);
}

#[tokio::test]
async fn update_replaces_only_matching_entry() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/question-package/list");
            then.status(200).json_body(json!([
                package_json("a", "Alpha"),
                package_json("x", "Old"),
                package_json("b", "Beta")
            ]));
        })
        .await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT).path("/question-package/update/x");
            then.status(200).json_body(package_json("x", "New"));
        })
        .await;

    let state = logged_in_state(&server);
    state.packages.fetch_packages().await.unwrap();
    let before = state.packages.state().await.packages;

    let draft = PackageDraft::from(&package("x", "New"));
    state.packages.update_package("x", &draft).await.unwrap();

    update.assert_async().await;
    let after = state.packages.state().await.packages;
    assert_eq!(after.len(), 3);
    assert_eq!(after[0], before[0]);
    assert_eq!(after[1], package("x", "New"));
    assert_eq!(after[2], before[2]);
}

#[tokio::test]
async fn delete_removes_only_matching_entry() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/question-package/list");
            then.status(200).json_body(json!([
                package_json("a", "Alpha"),
                package_json("x", "Doomed"),
                package_json("b", "Beta")
            ]));
        })
        .await;
    let delete = server
        .mock_async(|when, then| {
            when.method(DELETE)
                .path("/question-package/delete/x")
                .header("Authorization", bearer());
            then.status(200).json_body(json!({ "message": "deleted" }));
        })
        .await;

    let state = logged_in_state(&server);
    state.packages.fetch_packages().await.unwrap();

    state.packages.delete_package("x").await.unwrap();

    delete.assert_async().await;
    assert_eq!(
        state.packages.state().await.packages,
        vec![package("a", "Alpha"), package("b", "Beta")]
    );
}

#[tokio::test]
async fn failed_delete_keeps_entry_and_sets_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/question-package/list");
            then.status(200).json_body(json!([package_json("x", "Kept")]));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(DELETE).path("/question-package/delete/x");
            then.status(404);
        })
        .await;

    let state = logged_in_state(&server);
    state.packages.fetch_packages().await.unwrap();

    let result = state.packages.delete_package("x").await;

    assert!(matches!(
        result,
        Err(StoreError::Request(interview_admin::RequestError::NotFound))
    ));
    let packages = state.packages.state().await;
    assert_eq!(packages.packages.len(), 1);
    assert_eq!(packages.error.as_deref(), Some("Failed to delete package."));
}

#[tokio::test]
async fn invalid_draft_is_rejected_before_sending() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST).path("/question-package/create");
            then.status(201).json_body(package_json("x", "Never"));
        })
        .await;

    let state = logged_in_state(&server);
    let result = state.packages.add_package(&PackageDraft::new("   ", vec![])).await;

    assert!(matches!(
        result,
        Err(StoreError::Validation(ValidationError::EmptyPackageName))
    ));
    assert_eq!(create.hits_async().await, 0);
    assert_eq!(
        state.packages.state().await.error.as_deref(),
        Some("Invalid package data.")
    );
}

#[tokio::test]
async fn editor_output_is_sent_in_order() {
    let server = MockServer::start_async().await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/question-package/create")
                .json_body(json!({
                    "packageName": "Backend",
                    "questions": [
                        {
                            "questionText": "Second",
                            "question_time": { "hours": 0, "minutes": 3, "seconds": 15 }
                        },
                        {
                            "questionText": "First",
                            "question_time": { "hours": 0, "minutes": 2, "seconds": 0 }
                        }
                    ]
                }));
            then.status(201).json_body(package_json("n", "Backend"));
        })
        .await;

    let mut editor = PackageEditor::new("Backend");
    editor.add_question("First", 2, 0).unwrap();
    editor.add_question("Second", 2, 75).unwrap();
    editor.move_question(1, 0).unwrap();

    let state = logged_in_state(&server);
    state.packages.add_package(&editor.finish().unwrap()).await.unwrap();

    create.assert_async().await;
}

#[tokio::test]
async fn stale_update_response_is_discarded() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/question-package/update/x")
                .json_body(json!({ "packageName": "Slow", "questions": [] }));
            then.status(200)
                .delay(Duration::from_millis(300))
                .json_body(json!({ "_id": "x", "packageName": "Slow", "questions": [] }));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(PUT)
                .path("/question-package/update/x")
                .json_body(json!({ "packageName": "Fast", "questions": [] }));
            then.status(200)
                .json_body(json!({ "_id": "x", "packageName": "Fast", "questions": [] }));
        })
        .await;

    server
        .mock_async(|when, then| {
            when.method(GET).path("/question-package/list");
            then.status(200).json_body(json!([package_json("x", "Seed")]));
        })
        .await;

    let state = logged_in_state(&server);
    state.packages.fetch_packages().await.unwrap();
    let slow = PackageDraft::new("Slow", vec![]);
    let fast = PackageDraft::new("Fast", vec![]);

    let (first, second) = tokio::join!(
        state.packages.update_package("x", &slow),
        state.packages.update_package("x", &fast)
    );
    first.unwrap();
    second.unwrap();

    let packages = state.packages.state().await.packages;
    assert_eq!(packages.len(), 1);
    assert_eq!(packages[0].package_name, "Fast");
}

#[tokio::test]
async fn search_ignores_case() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/question-package/list");
            then.status(200).json_body(json!([
                package_json("a", "Backend Basics"),
                package_json("b", "Soft Skills")
            ]));
        })
        .await;

    let state = logged_in_state(&server);
    state.packages.fetch_packages().await.unwrap();

    let found = state.packages.search("BACKEND").await;
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, "a");
    assert_eq!(
        state.packages.package("b").await.map(|p| p.package_name),
        Some("Soft Skills".to_string())
    );
}

#[tokio::test]
async fn update_of_uncached_package_is_not_added() {
    let server = MockServer::start_async().await;
    let update = server
        .mock_async(|when, then| {
            when.method(PUT).path("/question-package/update/x");
            then.status(200).json_body(package_json("x", "Elsewhere"));
        })
        .await;

    let state = logged_in_state(&server);
    let draft = PackageDraft::from(&package("x", "Elsewhere"));

    let updated = state.packages.update_package("x", &draft).await.unwrap();

    update.assert_async().await;
    assert_eq!(updated.id, "x");
    let packages = state.packages.state().await;
    assert!(packages.packages.is_empty());
    assert_eq!(packages.error, None);
}

#[tokio::test]
async fn loading_is_set_only_while_in_flight() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/question-package/list");
            then.status(200)
                .delay(Duration::from_millis(300))
                .json_body(json!([package_json("a", "Alpha")]));
        })
        .await;

    let state = logged_in_state(&server);
    assert!(!state.packages.state().await.loading);

    let (fetched, during) = tokio::join!(state.packages.fetch_packages(), async {
        tokio::time::sleep(Duration::from_millis(100)).await;
        state.packages.state().await
    });
    fetched.unwrap();

    assert!(during.loading);
    assert!(during.packages.is_empty());
    let after = state.packages.state().await;
    assert!(!after.loading);
    assert_eq!(after.packages.len(), 1);
}
