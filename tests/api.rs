mod common;

use axum::http::StatusCode;
use serde_json::{Value, json};

use common::{TestApp, bundled_config_dir};
use dossier::catalog::load_catalog;

fn ids(documents: &Value) -> Vec<String> {
    documents
        .as_array()
        .expect("documents not an array")
        .iter()
        .map(|d| d["id"].as_str().expect("id not a string").to_string())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let (status, _) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_reference_endpoints() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/permit-types").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["error"].is_null());
    let permit_ids: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap())
        .collect();
    assert_eq!(permit_ids, vec!["carte_resident", "titre_sejour"]);
    assert_eq!(body["data"][1]["cost"], "225€");

    let (_, body) = app.get("/api/profiles").await;
    assert_eq!(body["data"][0]["id"], "common");

    let (_, body) = app.get("/api/categories").await;
    assert_eq!(body["data"]["identity"]["name_en"], "Identity Documents");

    let (_, body) = app.get("/api/important-links").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 3);

    let (_, body) = app.get("/api/metadata").await;
    assert_eq!(body["data"]["last_verified"], "2025-01-15");
}

#[tokio::test]
async fn test_profile_filter_and_progress_scenario() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/documents/titre_sejour").await;
    assert_eq!(status, StatusCode::OK);
    let common_docs = ids(&body["data"]);
    assert_eq!(common_docs.len(), 8);

    let (_, body) = app
        .get("/api/documents/titre_sejour?profiles=common,employee")
        .await;
    assert_eq!(ids(&body["data"]).len(), 10);

    let (_, body) = app.get("/api/documents/titre_sejour?all=true").await;
    assert_eq!(ids(&body["data"]).len(), 10);

    for id in &common_docs[..3] {
        let (status, body) = app.post_empty(&format!("/api/documents/{id}/complete")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["is_complete"], true);
    }

    let (status, body) = app.get("/api/progress/titre_sejour?profiles=common").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({"total": 8, "completed": 3, "remaining": 5, "percentage": 37.5})
    );

    let (_, body) = app.get("/api/progress/titre_sejour?all=true").await;
    assert_eq!(body["data"]["total"], 10);
    assert_eq!(body["data"]["completed"], 3);
    assert_eq!(body["data"]["percentage"], 30.0);
}

#[tokio::test]
async fn test_common_documents_always_listed() {
    let app = TestApp::new();

    for permit in ["titre_sejour", "carte_resident"] {
        let (_, body) = app.get(&format!("/api/documents/{permit}?all=true")).await;
        let all = ids(&body["data"]);
        let common: Vec<String> = body["data"]
            .as_array()
            .unwrap()
            .iter()
            .filter(|d| d["profiles"].as_array().unwrap().contains(&json!("common")))
            .map(|d| d["id"].as_str().unwrap().to_string())
            .collect();

        for profiles in ["student", "employee", "married,self_employed", "unknown"] {
            let (_, body) = app
                .get(&format!("/api/documents/{permit}?profiles={profiles}"))
                .await;
            let filtered = ids(&body["data"]);

            assert!(common.iter().all(|id| filtered.contains(id)));
            assert!(filtered.iter().all(|id| all.contains(id)));

            let (_, progress) = app
                .get(&format!("/api/progress/{permit}?profiles={profiles}"))
                .await;
            assert_eq!(progress["data"]["total"], filtered.len());
        }
    }
}

#[tokio::test]
async fn test_complete_then_incomplete_keeps_notes() {
    let app = TestApp::new();

    let (status, _) = app
        .post("/api/documents/ts_passport/notes", json!({"notes": "expires in 2027"}))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, body) = app.post_empty("/api/documents/ts_passport/complete").await;
    assert!(body["data"]["completed_at"].is_string());

    let (status, body) = app.post_empty("/api/documents/ts_passport/incomplete").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_complete"], false);
    assert!(body["data"]["completed_at"].is_null());
    assert_eq!(body["data"]["notes"], "expires in 2027");
}

#[tokio::test]
async fn test_unknown_document_is_not_found() {
    let app = TestApp::new();

    let (status, body) = app.post_empty("/api/documents/nope/complete").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Document not found");
    assert!(body["data"].is_null());

    let (status, _) = app.post_empty("/api/documents/nope/incomplete").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post("/api/documents/nope/notes", json!({"notes": "x"}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .post("/api/documents/nope/due-date", json!({"due_date": null}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_document_dropped_from_catalog_is_not_found() {
    let config = tempfile::TempDir::new().unwrap();
    for name in ["profiles.yaml", "carte_resident.yaml"] {
        std::fs::copy(bundled_config_dir().join(name), config.path().join(name)).unwrap();
    }
    let app = TestApp::with_catalog(load_catalog(config.path()));

    let (status, body) = app.post_empty("/api/documents/ts_passport/complete").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Document not found");

    let (status, _) = app
        .post("/api/documents/ts_passport/due-date", json!({}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.post_empty("/api/documents/cr_passport/complete").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_due_date_absent_versus_null() {
    let app = TestApp::new();
    let uri = "/api/documents/ts_photos/due-date";

    let (status, body) = app.post(uri, json!({"due_date": "2025-05-20"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["due_date"], "2025-05-20");

    let (status, body) = app.post(uri, json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["due_date"], "2025-05-20");

    let (status, body) = app.post(uri, json!({"due_date": null})).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["due_date"].is_null());
}

#[tokio::test]
async fn test_notes_empty_string_clears() {
    let app = TestApp::new();
    let uri = "/api/documents/cr_photos/notes";

    app.post(uri, json!({"notes": "photomaton near the station"})).await;
    let (_, body) = app.post(uri, json!({"notes": ""})).await;
    assert!(body["data"]["notes"].is_null());
}

#[tokio::test]
async fn test_reset_clears_permit() {
    let app = TestApp::new();

    for id in ["ts_passport", "ts_payslips"] {
        app.post_empty(&format!("/api/documents/{id}/complete")).await;
        app.post(&format!("/api/documents/{id}/notes"), json!({"notes": "ok"}))
            .await;
        app.post(
            &format!("/api/documents/{id}/due-date"),
            json!({"due_date": "2025-02-01"}),
        )
        .await;
    }
    app.post_empty("/api/documents/cr_passport/complete").await;

    let (status, body) = app.post_empty("/api/reset/titre_sejour").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["permit_type"], "titre_sejour");
    assert_eq!(body["data"]["progress"]["completed"], 0);

    let (_, body) = app.get("/api/documents/titre_sejour?all=true").await;
    for doc in body["data"].as_array().unwrap() {
        assert_eq!(doc["is_complete"], false);
        assert!(doc["notes"].is_null());
        assert!(doc["due_date"].is_null());
    }

    let (_, body) = app.get("/api/progress/carte_resident?all=true").await;
    assert_eq!(body["data"]["completed"], 1);

    let (status, _) = app.post_empty("/api/reset/visa_talent").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_permit_type_is_empty() {
    let app = TestApp::new();

    let (status, body) = app.get("/api/documents/visa_talent").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    let (status, body) = app.get("/api/progress/visa_talent").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"],
        json!({"total": 0, "completed": 0, "remaining": 0, "percentage": 0.0})
    );
}

#[tokio::test]
async fn test_settings_drive_default_filter() {
    let app = TestApp::new();

    let (_, body) = app.get("/api/user-settings").await;
    assert_eq!(body["data"]["selected_profiles"], json!(["common"]));

    let (status, body) = app
        .post("/api/user-settings/profiles", json!({"profiles": ["employee"]}))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["selected_profiles"], json!(["employee", "common"]));

    let (_, body) = app.get("/api/documents/titre_sejour").await;
    assert_eq!(ids(&body["data"]).len(), 10);

    let (_, body) = app.get("/api/progress/titre_sejour").await;
    assert_eq!(body["data"]["total"], 10);

    let (status, body) = app
        .request("PUT", "/api/user-settings/profiles", Some(json!({"profiles": []})))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["selected_profiles"], json!(["common"]));

    let (_, body) = app
        .post("/api/user-settings/profiles", json!({"profiles": null}))
        .await;
    assert_eq!(body["data"]["selected_profiles"], json!(["common"]));
}

#[tokio::test]
async fn test_settings_reject_unknown_profile() {
    let app = TestApp::new();

    let (status, body) = app
        .post("/api/user-settings/profiles", json!({"profiles": ["astronaut"]}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Unknown profiles: astronaut");

    let (_, body) = app.get("/api/user-settings").await;
    assert_eq!(body["data"]["selected_profiles"], json!(["common"]));
}
