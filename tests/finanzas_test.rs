mod common;

use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use common::{json as parse_json, seed_user, send, test_app};

#[tokio::test]
async fn balance_aggregates_income_and_expense() {
    let (app, store) = test_app();
    let (_, session) = seed_user(&store, "ana").await;

    for (tipo, valor) in [("Ingreso", 100), ("Ingreso", 200), ("Gasto", 50)] {
        let (status, _) = send(
            &app,
            "POST",
            "/api/finanzas",
            Some(&session),
            Some(json!({ "valor": valor, "descripcion": "registro", "tipo": tipo })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, bytes) = send(&app, "GET", "/api/finanzasBalance", Some(&session), None).await;
    assert_eq!(status, StatusCode::OK);

    let balance = parse_json(&bytes);
    assert_eq!(balance["ingresos"], "300");
    assert_eq!(balance["gastos"], "50");
    assert_eq!(balance["balance"], "250");
}

#[tokio::test]
async fn create_rejects_unknown_kind() {
    let (app, store) = test_app();
    let (_, session) = seed_user(&store, "ana").await;

    let (status, bytes) = send(
        &app,
        "POST",
        "/api/finanzas",
        Some(&session),
        Some(json!({ "valor": 100, "descripcion": "registro", "tipo": "Otro" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error = parse_json(&bytes);
    assert_eq!(error["error"], "validation");
}

#[tokio::test]
async fn create_rejects_non_positive_amount() {
    let (app, store) = test_app();
    let (_, session) = seed_user(&store, "ana").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/finanzas",
        Some(&session),
        Some(json!({ "valor": 0, "descripcion": "registro", "tipo": "Ingreso" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_unknown_entry_is_not_found() {
    let (app, store) = test_app();
    let (_, session) = seed_user(&store, "ana").await;

    let uri = format!("/api/finanzas/{}", Uuid::new_v4());
    let (status, bytes) = send(&app, "GET", &uri, Some(&session), None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(parse_json(&bytes)["error"], "not_found");
}

#[tokio::test]
async fn update_and_delete_round_trip() {
    let (app, store) = test_app();
    let (_, session) = seed_user(&store, "ana").await;

    let (_, bytes) = send(
        &app,
        "POST",
        "/api/finanzas",
        Some(&session),
        Some(json!({ "valor": 100, "descripcion": "Venta", "tipo": "Ingreso" })),
    )
    .await;
    let id = parse_json(&bytes)["id"].as_str().unwrap().to_string();

    let uri = format!("/api/finanzas/{id}");
    let (status, bytes) = send(
        &app,
        "PUT",
        &uri,
        Some(&session),
        Some(json!({ "valor": 500 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated = parse_json(&bytes);
    assert_eq!(updated["valor"], "500");
    assert_eq!(updated["descripcion"], "Venta");

    let (status, _) = send(&app, "DELETE", &uri, Some(&session), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, "GET", &uri, Some(&session), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn single_record_read_expands_owner() {
    let (app, store) = test_app();
    let (user_id, session) = seed_user(&store, "ana").await;

    let (_, bytes) = send(
        &app,
        "POST",
        "/api/finanzas",
        Some(&session),
        Some(json!({ "valor": 100, "descripcion": "Venta", "tipo": "Ingreso" })),
    )
    .await;
    let id = parse_json(&bytes)["id"].as_str().unwrap().to_string();

    let (status, bytes) = send(
        &app,
        "GET",
        &format!("/api/finanzas/{id}"),
        Some(&session),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let entry = parse_json(&bytes);
    assert_eq!(entry["user"]["id"], user_id.to_string());
    assert_eq!(entry["user"]["username"], "ana");
}

#[tokio::test]
async fn entries_are_private_to_their_owner() {
    let (app, store) = test_app();
    let (_, session_a) = seed_user(&store, "ana").await;
    let (_, session_b) = seed_user(&store, "beto").await;

    let (_, bytes) = send(
        &app,
        "POST",
        "/api/finanzas",
        Some(&session_a),
        Some(json!({ "valor": 100, "descripcion": "Venta", "tipo": "Ingreso" })),
    )
    .await;
    let id = parse_json(&bytes)["id"].as_str().unwrap().to_string();
    let uri = format!("/api/finanzas/{id}");

    let (status, bytes) = send(&app, "GET", &uri, Some(&session_b), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(parse_json(&bytes)["error"], "forbidden");

    let (status, _) = send(
        &app,
        "PUT",
        &uri,
        Some(&session_b),
        Some(json!({ "valor": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&app, "DELETE", &uri, Some(&session_b), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner still sees an untouched record.
    let (status, bytes) = send(&app, "GET", &uri, Some(&session_a), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse_json(&bytes)["valor"], "100");
}

#[tokio::test]
async fn period_balance_honors_inclusive_bounds() {
    let (app, store) = test_app();
    let (_, session) = seed_user(&store, "ana").await;

    for (valor, fecha) in [(100, "2025-01-01T10:00:00Z"), (200, "2025-02-01T10:00:00Z")] {
        send(
            &app,
            "POST",
            "/api/finanzas",
            Some(&session),
            Some(json!({
                "valor": valor,
                "descripcion": "registro",
                "tipo": "Ingreso",
                "fecha": fecha,
            })),
        )
        .await;
    }

    let (status, bytes) = send(
        &app,
        "GET",
        "/api/finanzasPeriodo?fechaInicio=2025-01-01&fechaFin=2025-01-31",
        Some(&session),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let period = parse_json(&bytes);
    assert_eq!(period["ingresosPeriodo"], "100");
    assert_eq!(period["gastosPeriodo"], "0");
    assert_eq!(period["balancePeriodo"], "100");
    assert_eq!(period["registros"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn period_balance_requires_both_dates() {
    let (app, store) = test_app();
    let (_, session) = seed_user(&store, "ana").await;

    let (status, bytes) = send(
        &app,
        "GET",
        "/api/finanzasPeriodo?fechaInicio=2025-01-01",
        Some(&session),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(parse_json(&bytes)["error"], "validation");

    let (status, _) = send(&app, "GET", "/api/finanzasPeriodo", Some(&session), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn period_balance_rejects_reversed_range() {
    let (app, store) = test_app();
    let (_, session) = seed_user(&store, "ana").await;

    let (status, _) = send(
        &app,
        "GET",
        "/api/finanzasPeriodo?fechaInicio=2025-02-01&fechaFin=2025-01-01",
        Some(&session),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listing_requires_a_token() {
    let (app, _) = test_app();

    let (status, bytes) = send(&app, "GET", "/api/finanzas", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(parse_json(&bytes)["error"], "unauthorized");
}
