mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{mission_id, vehicle_mission, TestApp};

#[tokio::test]
async fn test_health_check() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_employee_crud() {
    let app = TestApp::new().await;
    let id = app.add_employee(" E-300 ", "Petit", "Anne", "Ressources humaines").await;

    let (status, employee) = app.get(&format!("/api/employees/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(employee["badge_number"], "E-300");
    assert_eq!(employee["is_driver"], false);

    let (status, body) = app
        .json(
            Method::PUT,
            &format!("/api/employees/{}", id),
            json!({
                "badge_number": "E-300",
                "last_name": "Petit",
                "first_name": "Anne",
                "department": "CHAUFFEUR",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["is_driver"], true);

    let (_, drivers) = app.get("/api/drivers").await;
    assert_eq!(drivers.as_array().unwrap().len(), 1);

    let (status, _) = app.delete(&format!("/api/employees/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get(&format!("/api/employees/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_badge_is_a_conflict() {
    let app = TestApp::new().await;
    app.add_employee("E-100", "Martin", "Claire", "Comptabilité").await;

    let (status, _) = app
        .json(
            Method::POST,
            "/api/employees",
            json!({
                "badge_number": "E-100",
                "last_name": "Autre",
                "first_name": "Personne",
                "department": "Achats",
            }),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_employee_request_is_validated() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/employees",
            json!({ "badge_number": "", "last_name": "X", "first_name": "Y", "department": "Z" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Le matricule est requis");
}

#[tokio::test]
async fn test_blank_badge_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .json(
            Method::POST,
            "/api/employees",
            json!({ "badge_number": "   ", "last_name": "X", "first_name": "Y", "department": "Z" }),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Ce champ ne peut pas être vide");
    let (_, employees) = app.get("/api/employees").await;
    assert!(employees.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_referenced_employee_cannot_be_deleted() {
    let app = TestApp::new().await;
    app.seed_fleet().await;
    let (_, body) = app.create_mission(vehicle_mission("2024-06-10", "2024-06-12")).await;
    let id = mission_id(&body);

    let (_, employees) = app.get("/api/employees").await;
    for employee in employees.as_array().unwrap() {
        let (status, _) = app
            .delete(&format!("/api/employees/{}", employee["id"].as_i64().unwrap()))
            .await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    let (status, detail) = app.get(&format!("/api/missions/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["requester"]["badge_number"], "E-100");
    assert_eq!(detail["driver"]["badge_number"], "D-200");
}

#[tokio::test]
async fn test_vehicle_crud() {
    let app = TestApp::new().await;
    app.add_vehicle(7, "Peugeot", "Partner").await;

    let (status, vehicle) = app.get("/api/vehicles/7").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(vehicle["descriptor"], "Peugeot Partner");

    let (status, body) = app
        .json(Method::PUT, "/api/vehicles/7", json!({ "make": "Peugeot", "model": "Expert" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["model"], "Expert");

    let (status, _) = app
        .json(
            Method::POST,
            "/api/vehicles",
            json!({ "matricule": 7, "make": "Fiat", "model": "Doblo" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app.delete("/api/vehicles/7").await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app.get("/api/vehicles/7").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_assigned_vehicle_cannot_be_deleted() {
    let app = TestApp::new().await;
    app.seed_fleet().await;
    let (_, body) = app.create_mission(vehicle_mission("2024-06-10", "2024-06-12")).await;

    let (status, _) = app.delete("/api/vehicles/101").await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, detail) = app.get(&format!("/api/missions/{}", mission_id(&body))).await;
    assert_eq!(detail["vehicle"]["matricule"], 101);
}

#[tokio::test]
async fn test_vehicle_matricule_must_be_positive() {
    let app = TestApp::new().await;

    let (status, _) = app
        .json(Method::POST, "/api/vehicles", json!({ "matricule": 0, "make": "A", "model": "B" }))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
