mod common;

use axum::http::{Method, StatusCode};
use rstest::rstest;

use common::{common_transport_mission, mission_id, vehicle_mission, MultipartForm, TestApp};
use mission_fleet::config::ResolutionPolicy;

#[tokio::test]
async fn test_vehicle_mission_resolves_vehicle_and_driver() {
    let app = TestApp::new().await;
    app.seed_fleet().await;

    let (status, body) = app
        .create_mission(vehicle_mission("25/12/2024", "27/12/2024").pdf("trajet.pdf").image("photo.png"))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["files"].as_array().unwrap().len(), 2);

    let id = mission_id(&body);
    let (status, detail) = app.get(&format!("/api/missions/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["transport_type"], "Vehicule");
    assert_eq!(detail["vehicle"]["matricule"], 101);
    assert_eq!(detail["driver"]["last_name"], "Dupont");
    assert_eq!(detail["requester"]["badge_number"], "E-100");
    assert_eq!(detail["departure_date"], "2024-12-25");
    assert_eq!(detail["return_date"], "2024-12-27");
    assert_eq!(detail["coordinates"][0]["label"], "Coordonnées 1");
    assert_eq!(detail["images"][0]["label"], "Image 1");
}

#[tokio::test]
async fn test_common_transport_ignores_vehicle_fields() {
    let app = TestApp::new().await;
    app.seed_fleet().await;

    let (status, body) = app.create_mission(common_transport_mission("2024-03-01", "2024-03-02")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, detail) = app.get(&format!("/api/missions/{}", mission_id(&body))).await;
    assert_eq!(detail["transport_type"], "Transport en commun");
    assert!(detail["vehicle"].is_null());
    assert!(detail["driver"].is_null());
}

#[rstest]
#[case::french_format("25/12/2024")]
#[case::iso_format("2024-12-25")]
#[case::padded(" 2024-12-25 ")]
#[tokio::test]
async fn test_departure_date_formats_store_same_day(#[case] raw: &str) {
    let app = TestApp::new().await;
    app.seed_fleet().await;

    let (status, body) = app.create_mission(common_transport_mission(raw, "")).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, detail) = app.get(&format!("/api/missions/{}", mission_id(&body))).await;
    assert_eq!(detail["departure_date"], "2024-12-25");
    assert!(detail["return_date"].is_null());
}

#[tokio::test]
async fn test_unknown_vehicle_is_dropped_when_lenient() {
    let app = TestApp::new().await;
    app.seed_fleet().await;

    let form = vehicle_mission("2024-06-10", "2024-06-12");
    let form = form.text("vehicule", "Nonexistent Model");
    let (status, body) = app.create_mission(form).await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);

    let (_, detail) = app.get(&format!("/api/missions/{}", mission_id(&body))).await;
    assert!(detail["vehicle"].is_null());
    assert_eq!(detail["driver"]["first_name"], "Jean");
}

#[tokio::test]
async fn test_unknown_vehicle_fails_when_strict_and_removes_uploads() {
    let app = TestApp::with_config(|config| config.resolution_policy = ResolutionPolicy::Strict).await;
    app.seed_fleet().await;

    let form = MultipartForm::new()
        .text("matricule", "E-100")
        .text("objet", "Audit")
        .text("destination", "Lyon")
        .text("transport", "2")
        .text("vehicule", "Nonexistent Model")
        .text("chauffeur", "Dupont Jean")
        .pdf("trajet.pdf")
        .image("photo.png");
    let (status, _) = app.create_mission(form).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(app.stored_files().is_empty());
    let (_, missions) = app.get("/api/missions").await;
    assert!(missions.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_unknown_requester_rolls_back_uploads() {
    let app = TestApp::new().await;
    app.seed_fleet().await;

    let form = MultipartForm::new()
        .text("matricule", "E-999")
        .text("objet", "Audit")
        .text("destination", "Lyon")
        .text("transport", "1")
        .pdf("trajet.pdf")
        .image("a.png")
        .image("b.png");
    let (status, body) = app.create_mission(form).await;

    assert_eq!(status, StatusCode::NOT_FOUND, "{}", body);
    assert!(app.stored_files().is_empty());
}

#[tokio::test]
async fn test_driver_cannot_request_a_mission() {
    let app = TestApp::new().await;
    app.seed_fleet().await;

    let form = common_transport_mission("", "").text("matricule", "D-200");
    let (status, _) = app.create_mission(form).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_missing_requester_badge_is_a_validation_error() {
    let app = TestApp::new().await;

    let form = MultipartForm::new().text("objet", "Audit").text("transport", "1");
    let (status, body) = app.create_mission(form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_unknown_transport_flag_is_rejected() {
    let app = TestApp::new().await;
    app.seed_fleet().await;

    let form = common_transport_mission("", "").text("transport", "3");
    let (status, _) = app.create_mission(form).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_overlapping_assignments_are_accepted_without_guard() {
    let app = TestApp::new().await;
    app.seed_fleet().await;

    let (first, _) = app.create_mission(vehicle_mission("2024-06-10", "2024-06-20")).await;
    let (second, _) = app.create_mission(vehicle_mission("2024-06-15", "2024-06-25")).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CREATED);
    let (_, missions) = app.get("/api/missions").await;
    assert_eq!(missions.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_overlap_guard_rejects_double_booking() {
    let app = TestApp::with_config(|config| config.reject_overlapping_assignments = true).await;
    app.seed_fleet().await;

    let (first, body) = app.create_mission(vehicle_mission("2024-06-10", "2024-06-20")).await;
    assert_eq!(first, StatusCode::CREATED);

    let (second, _) = app
        .create_mission(vehicle_mission("2024-06-15", "2024-06-25").pdf("trajet.pdf"))
        .await;
    assert_eq!(second, StatusCode::CONFLICT);
    assert!(app.stored_files().is_empty());

    let (adjacent, _) = app.create_mission(vehicle_mission("2024-06-21", "2024-06-25")).await;
    assert_eq!(adjacent, StatusCode::CREATED);

    // Reescribir la misma misión no entra en conflicto consigo misma
    let id = mission_id(&body);
    let (status, _) = app
        .multipart(
            Method::PUT,
            &format!("/api/missions/{}", id),
            vehicle_mission("2024-06-11", "2024-06-20"),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_missions_listed_by_departure_date_descending() {
    let app = TestApp::new().await;
    app.seed_fleet().await;

    app.create_mission(common_transport_mission("2024-01-05", "")).await;
    app.create_mission(common_transport_mission("", "")).await;
    app.create_mission(common_transport_mission("2024-03-05", "")).await;

    let (status, missions) = app.get("/api/missions").await;
    assert_eq!(status, StatusCode::OK);
    let dates: Vec<_> = missions
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["departure_date"].as_str().map(str::to_string))
        .collect();
    assert_eq!(
        dates,
        vec![Some("2024-03-05".to_string()), Some("2024-01-05".to_string()), None]
    );
}

#[tokio::test]
async fn test_update_with_mismatched_id_is_rejected() {
    let app = TestApp::new().await;
    app.seed_fleet().await;

    let (_, body) = app.create_mission(common_transport_mission("", "")).await;
    let id = mission_id(&body);

    let form = common_transport_mission("", "").text("id", &(id + 1).to_string());
    let (status, _) = app.multipart(Method::PUT, &format!("/api/missions/{}", id), form).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .multipart(Method::PUT, "/api/missions/4242", common_transport_mission("", ""))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
