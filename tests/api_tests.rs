mod common;

use chrono::{Duration, Utc};
use reqwest::StatusCode;
use serde_json::json;

// ── Health ──────────────────────────────────────────────────────

#[tokio::test]
async fn health_returns_ok() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), "ok");

    common::cleanup(app).await;
}

// ── Registration & Auth ─────────────────────────────────────────

#[tokio::test]
async fn register_bootstrap_user_is_admin() {
    let app = common::spawn_app().await;

    let (body, status) = app
        .register("admin@test.com", "Admin-Passw0rd!", "Admin")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());
    assert!(body["refresh_token"].is_string());

    // First account can reach admin-only endpoints
    let token = body["access_token"].as_str().unwrap();
    let (_, status) = app.get_auth("/api/v1/admin/users", token).await;
    assert_eq!(status, StatusCode::OK);

    common::cleanup(app).await;
}

#[tokio::test]
async fn second_registration_is_not_admin() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let token = app.register_member("user@test.com", "User").await;
    let (_, status) = app.get_auth("/api/v1/admin/users", &token).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    common::cleanup(app).await;
}

#[tokio::test]
async fn register_rejects_weak_passwords() {
    let app = common::spawn_app().await;

    for password in ["short", "alllowercase1!aa", "NoSpecials12aaaa"] {
        let resp = app
            .client
            .post(app.url("/api/v1/auth/register"))
            .json(&json!({
                "email": "admin@test.com",
                "password": password,
                "name": "Admin",
                "department": "IT",
                "phone": "555-0100",
                "company_email": "admin@example.com",
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "password {password}");
    }

    common::cleanup(app).await;
}

#[tokio::test]
async fn register_rejects_foreign_company_email() {
    let app = common::spawn_app().await;

    let resp = app
        .client
        .post(app.url("/api/v1/auth/register"))
        .json(&json!({
            "email": "admin@test.com",
            "password": "Admin-Passw0rd!",
            "name": "Admin",
            "department": "IT",
            "phone": "555-0100",
            "company_email": "admin@gmail.com",
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("@example.com"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn login_valid_and_invalid_credentials() {
    let app = common::spawn_app().await;
    app.bootstrap().await;

    let (body, status) = app.login("admin@test.com", "Admin-Passw0rd!").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["access_token"].is_string());

    let (_, status) = app.login("admin@test.com", "wrong-password").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, status) = app.login("nobody@test.com", "Admin-Passw0rd!").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    common::cleanup(app).await;
}

#[tokio::test]
async fn refresh_token_rotation_and_reuse_detection() {
    let app = common::spawn_app().await;
    app.bootstrap().await;
    let (login_body, _) = app.login("admin@test.com", "Admin-Passw0rd!").await;
    let refresh = login_body["refresh_token"].as_str().unwrap();

    // First refresh succeeds and rotates
    let resp = app
        .client
        .post(app.url("/api/v1/auth/refresh"))
        .header("cookie", format!("refresh_token={refresh}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    let new_refresh = body["refresh_token"].as_str().unwrap();
    assert_ne!(new_refresh, refresh);

    // Replaying the old token revokes every session
    let resp = app
        .client
        .post(app.url("/api/v1/auth/refresh"))
        .header("cookie", format!("refresh_token={refresh}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("reuse"));

    // Including the rotated one
    let resp = app
        .client
        .post(app.url("/api/v1/auth/refresh"))
        .header("cookie", format!("refresh_token={new_refresh}"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    common::cleanup(app).await;
}

// ── Equipment ───────────────────────────────────────────────────

#[tokio::test]
async fn equipment_crud_writes_one_audit_row_per_mutation() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let equipment = app.create_equipment(&token, "SN-1001").await;
    let id = equipment["id"].as_str().unwrap();
    assert_eq!(equipment["status"], "available");
    assert_eq!(app.audit_count("Equipment", id).await, 1);

    // Read
    let (body, status) = app.get_auth(&format!("/api/v1/equipment/{id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["serial_number"], "SN-1001");

    // Update
    let (body, status) = app
        .put_auth(
            &format!("/api/v1/equipment/{id}"),
            &token,
            &json!({
                "equipment_type": "laptop",
                "brand": "Dell",
                "model": "XPS 15",
                "serial_number": "SN-1001",
                "purchase_date": "2024-01-15",
                "warranty_expiry": "2027-01-15",
                "location": "HQ - Floor 3",
                "status": "in_use",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "update failed: {body}");
    assert_eq!(body["model"], "XPS 15");
    assert_eq!(app.audit_count("Equipment", id).await, 2);

    // Delete
    let (_, status) = app.delete_auth(&format!("/api/v1/equipment/{id}"), &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.audit_count("Equipment", id).await, 3);

    let (_, status) = app.get_auth(&format!("/api/v1/equipment/{id}"), &token).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::cleanup(app).await;
}

#[tokio::test]
async fn duplicate_serial_numbers_conflict() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    app.create_equipment(&token, "SN-DUP").await;

    let (body, status) = app
        .post_auth(
            "/api/v1/equipment",
            &token,
            &json!({
                "equipment_type": "desktop",
                "brand": "HP",
                "model": "EliteDesk",
                "serial_number": "SN-DUP",
                "purchase_date": "2023-06-01",
                "location": "HQ",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT, "{body}");

    common::cleanup(app).await;
}

#[tokio::test]
async fn concurrent_creates_with_same_serial_yield_one_winner() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let payload = json!({
        "equipment_type": "monitor",
        "brand": "LG",
        "model": "27UK850",
        "serial_number": "SN-RACE",
        "purchase_date": "2024-05-01",
        "location": "HQ",
    });

    let first = app.post_auth("/api/v1/equipment", &token, &payload);
    let second = app.post_auth("/api/v1/equipment", &token, &payload);
    let ((_, s1), (_, s2)) = tokio::join!(first, second);

    let mut statuses = [s1, s2];
    statuses.sort();
    assert_eq!(statuses, [StatusCode::OK, StatusCode::CONFLICT]);

    common::cleanup(app).await;
}

#[tokio::test]
async fn non_admin_cannot_mutate_equipment() {
    let app = common::spawn_app().await;
    app.bootstrap().await;
    let member = app.register_member("user@test.com", "User").await;

    let (_, status) = app
        .post_auth(
            "/api/v1/equipment",
            &member,
            &json!({
                "equipment_type": "laptop",
                "brand": "Dell",
                "model": "XPS 13",
                "serial_number": "SN-FORBIDDEN",
                "purchase_date": "2024-01-15",
                "location": "HQ",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    common::cleanup(app).await;
}

#[tokio::test]
async fn equipment_list_filters_and_searches() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    app.create_equipment(&token, "SN-AAA").await;
    let (_, status) = app
        .post_auth(
            "/api/v1/equipment",
            &token,
            &json!({
                "equipment_type": "printer",
                "brand": "Brother",
                "model": "HL-L2350",
                "serial_number": "SN-BBB",
                "purchase_date": "2022-03-01",
                "location": "Warehouse",
                "status": "in_repair",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (body, _) = app
        .get_auth("/api/v1/equipment?status=in_repair", &token)
        .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["equipment"][0]["serial_number"], "SN-BBB");

    let (body, _) = app.get_auth("/api/v1/equipment?q=XPS", &token).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["equipment"][0]["serial_number"], "SN-AAA");

    let (body, _) = app
        .get_auth("/api/v1/equipment?type=printer&location=ware", &token)
        .await;
    assert_eq!(body["total"], 1);

    common::cleanup(app).await;
}

#[tokio::test]
async fn equipment_assignment_round_trip() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    app.register_member("tech@test.com", "Tech").await;

    let equipment = app.create_equipment(&token, "SN-ASSIGN").await;
    let id = equipment["id"].as_str().unwrap();

    let (directory, _) = app.get_auth("/api/v1/company-users", &token).await;
    let tech = directory
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "Tech")
        .unwrap();
    let tech_id = tech["id"].as_str().unwrap();

    let (body, status) = app
        .post_auth(
            &format!("/api/v1/equipment/{id}/assign"),
            &token,
            &json!({ "company_user_id": tech_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["assigned_to"], tech_id);

    // Unassign
    let (body, status) = app
        .post_auth(
            &format!("/api/v1/equipment/{id}/assign"),
            &token,
            &json!({ "company_user_id": null }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["assigned_to"].is_null());

    common::cleanup(app).await;
}

// ── Warranty buckets ────────────────────────────────────────────

#[tokio::test]
async fn warranty_report_partitions_equipment() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let today = Utc::now().date_naive();
    let cases = [
        ("SN-W-EXPIRED", Some(today - Duration::days(10))),
        ("SN-W-BOUNDARY", Some(today + Duration::days(30))),
        ("SN-W-ACTIVE", Some(today + Duration::days(31))),
        ("SN-W-NONE", None),
    ];

    for (serial, expiry) in &cases {
        let (body, status) = app
            .post_auth(
                "/api/v1/equipment",
                &token,
                &json!({
                    "equipment_type": "laptop",
                    "brand": "Dell",
                    "model": "Latitude",
                    "serial_number": serial,
                    "purchase_date": "2023-01-01",
                    "warranty_expiry": expiry.map(|d| d.to_string()),
                    "location": "HQ",
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{serial}: {body}");
    }

    let (body, status) = app
        .get_auth("/api/v1/reports/warranty-status", &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["expired"], 1);
    assert_eq!(body["expiring_soon"], 1);
    assert_eq!(body["active"], 1);
    assert_eq!(body["no_warranty"], 1);

    // No overlap and no gaps: buckets sum to the inventory size
    let total = body["expired"].as_i64().unwrap()
        + body["expiring_soon"].as_i64().unwrap()
        + body["active"].as_i64().unwrap()
        + body["no_warranty"].as_i64().unwrap();
    assert_eq!(total, 4);

    assert_eq!(
        body["critical_equipment"][0]["serial_number"],
        "SN-W-BOUNDARY"
    );

    common::cleanup(app).await;
}

// ── Maintenance ─────────────────────────────────────────────────

#[tokio::test]
async fn repair_maintenance_drives_equipment_status() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let equipment = app.create_equipment(&token, "SN-REPAIR").await;
    let equipment_id = equipment["id"].as_str().unwrap();

    let (log, status) = app
        .post_auth(
            "/api/v1/maintenance",
            &token,
            &json!({
                "equipment_id": equipment_id,
                "maintenance_type": "repair",
                "title": "Replace keyboard",
                "description": "Several keys unresponsive",
                "start_date": Utc::now().to_rfc3339(),
                "cost": "75.50",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{log}");
    let log_id = log["id"].as_str().unwrap();
    assert_eq!(app.audit_count("MaintenanceLog", log_id).await, 1);

    // Open repair takes the item out of service
    let (body, _) = app
        .get_auth(&format!("/api/v1/equipment/{equipment_id}"), &token)
        .await;
    assert_eq!(body["status"], "in_repair");

    // Complete the repair
    let (completed, status) = app
        .post_auth(
            &format!("/api/v1/maintenance/{log_id}/complete"),
            &token,
            &json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let end_date = completed["end_date"].as_str().unwrap().to_string();

    let (body, _) = app
        .get_auth(&format!("/api/v1/equipment/{equipment_id}"), &token)
        .await;
    assert_eq!(body["status"], "available");

    // Completing again is idempotent: the end date does not move
    let (completed_again, status) = app
        .post_auth(
            &format!("/api/v1/maintenance/{log_id}/complete"),
            &token,
            &json!({}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(completed_again["end_date"].as_str().unwrap(), end_date);

    common::cleanup(app).await;
}

#[tokio::test]
async fn maintenance_cost_report_aggregates_window() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let equipment = app.create_equipment(&token, "SN-COSTS").await;
    let equipment_id = equipment["id"].as_str().unwrap();

    for (title, cost) in [("Fix PSU", "100.00"), ("Clean fans", "50.00")] {
        let (_, status) = app
            .post_auth(
                "/api/v1/maintenance",
                &token,
                &json!({
                    "equipment_id": equipment_id,
                    "maintenance_type": "preventive",
                    "title": title,
                    "description": "Scheduled work",
                    "start_date": Utc::now().to_rfc3339(),
                    "end_date": Utc::now().to_rfc3339(),
                    "cost": cost,
                }),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (body, status) = app
        .get_auth("/api/v1/reports/maintenance-costs?range=last_7_days", &token)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total_maintenance"], 2);
    assert_eq!(body["total_cost"], "150.00");
    assert_eq!(body["by_type"][0]["maintenance_type"], "preventive");

    common::cleanup(app).await;
}

#[tokio::test]
async fn custom_report_range_requires_bounds() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (_, status) = app
        .get_auth("/api/v1/reports/maintenance-costs?range=custom", &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, status) = app
        .get_auth(
            "/api/v1/reports/maintenance-costs?range=custom&start=2026-01-01&end=2026-01-31",
            &token,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    common::cleanup(app).await;
}

// ── Support tickets ─────────────────────────────────────────────

#[tokio::test]
async fn ticket_lifecycle_with_transitions() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    app.register_member("tech@test.com", "Tech").await;

    let ticket = app.create_ticket(&token, "Laptop will not boot").await;
    let id = ticket["id"].as_str().unwrap();
    assert_eq!(ticket["status"], "open");
    assert_eq!(app.audit_count("SupportTicket", id).await, 1);

    let (directory, _) = app.get_auth("/api/v1/company-users", &token).await;
    let tech_id = directory
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["name"] == "Tech")
        .unwrap()["id"]
        .as_str()
        .unwrap()
        .to_string();

    // Assign moves open -> in_progress
    let (body, status) = app
        .post_auth(
            &format!("/api/v1/support-tickets/{id}/assign"),
            &token,
            &json!({ "technician_id": tech_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in_progress");
    assert_eq!(app.audit_count("SupportTicket", id).await, 2);

    // Re-assigning the same technician is a no-op (no extra audit row)
    let (body, status) = app
        .post_auth(
            &format!("/api/v1/support-tickets/{id}/assign"),
            &token,
            &json!({ "technician_id": tech_id }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "in_progress");
    assert_eq!(app.audit_count("SupportTicket", id).await, 2);

    // Unknown technician is a bad request
    let (_, status) = app
        .post_auth(
            &format!("/api/v1/support-tickets/{id}/assign"),
            &token,
            &json!({ "technician_id": uuid::Uuid::now_v7() }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Close with a resolution
    let (body, status) = app
        .post_auth(
            &format!("/api/v1/support-tickets/{id}/close"),
            &token,
            &json!({ "resolution": "Replaced the battery" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "closed");
    assert_eq!(app.audit_count("SupportTicket", id).await, 3);

    // Closing again with the same resolution is idempotent
    let (body, status) = app
        .post_auth(
            &format!("/api/v1/support-tickets/{id}/close"),
            &token,
            &json!({ "resolution": "Replaced the battery" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "closed");
    assert_eq!(app.audit_count("SupportTicket", id).await, 3);

    // A different resolution conflicts
    let (_, status) = app
        .post_auth(
            &format!("/api/v1/support-tickets/{id}/close"),
            &token,
            &json!({ "resolution": "Something else" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Assignment on a closed ticket conflicts
    let (_, status) = app
        .post_auth(
            &format!("/api/v1/support-tickets/{id}/assign"),
            &token,
            &json!({ "technician_id": tech_id }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Closed is terminal: update back to open conflicts
    let (_, status) = app
        .put_auth(
            &format!("/api/v1/support-tickets/{id}"),
            &token,
            &json!({
                "title": "Laptop will not boot",
                "description": "Something is broken",
                "priority": "high",
                "status": "open",
                "assigned_to": tech_id,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    common::cleanup(app).await;
}

#[tokio::test]
async fn ticket_list_filters_by_status_and_priority() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    app.create_ticket(&token, "First").await;
    let second = app.create_ticket(&token, "Second").await;
    let second_id = second["id"].as_str().unwrap();

    let (_, status) = app
        .post_auth(
            &format!("/api/v1/support-tickets/{second_id}/close"),
            &token,
            &json!({ "resolution": "Done" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (body, _) = app
        .get_auth("/api/v1/support-tickets?status=open", &token)
        .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["tickets"][0]["title"], "First");

    let (body, _) = app
        .get_auth("/api/v1/support-tickets?priority=high", &token)
        .await;
    assert_eq!(body["total"], 2);

    common::cleanup(app).await;
}

// ── Reports & exports ───────────────────────────────────────────

#[tokio::test]
async fn dashboard_report_counts_inventory() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    app.create_equipment(&token, "SN-DASH-1").await;
    app.create_equipment(&token, "SN-DASH-2").await;
    app.create_ticket(&token, "Dashboard ticket").await;

    let (body, status) = app.get_auth("/api/v1/reports/dashboard", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["equipment"]["total"], 2);
    assert_eq!(body["equipment"]["available"], 2);
    assert_eq!(body["tickets"]["open"], 1);
    assert_eq!(body["recent_tickets"][0]["title"], "Dashboard ticket");

    common::cleanup(app).await;
}

#[tokio::test]
async fn equipment_csv_export_contains_rows() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    app.create_equipment(&token, "SN-CSV").await;

    let resp = app
        .client
        .get(app.url("/api/v1/reports/export/equipment?format=csv"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get("content-type").unwrap().to_str().unwrap(),
        "text/csv"
    );
    let text = resp.text().await.unwrap();
    assert!(text.starts_with("Type,Brand,Model,Serial Number"));
    assert!(text.contains("SN-CSV"));

    common::cleanup(app).await;
}

#[tokio::test]
async fn equipment_xlsx_and_pdf_exports_are_well_formed() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    app.create_equipment(&token, "SN-XLSX").await;

    let resp = app
        .client
        .get(app.url("/api/v1/reports/export/equipment?format=xlsx"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.bytes().await.unwrap();
    // XLSX is a zip container
    assert_eq!(&bytes[..2], b"PK");

    let resp = app
        .client
        .get(app.url("/api/v1/reports/export/equipment?format=pdf"))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.bytes().await.unwrap();
    assert_eq!(&bytes[..5], b"%PDF-");

    common::cleanup(app).await;
}

#[tokio::test]
async fn unknown_export_format_is_rejected() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (_, status) = app
        .get_auth("/api/v1/reports/export/equipment?format=docx", &token)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    common::cleanup(app).await;
}

// ── Backups ─────────────────────────────────────────────────────

#[tokio::test]
async fn backup_create_then_list_shows_newest_first() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (created, status) = app.post_auth("/api/v1/backups", &token, &json!({})).await;
    assert_eq!(status, StatusCode::OK, "backup create failed: {created}");
    let name = created["name"].as_str().unwrap().to_string();
    assert!(name.starts_with("backup_") && name.ends_with(".zip"));

    let (listing, status) = app.get_auth("/api/v1/backups", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing[0]["name"], name.as_str());

    // Download round-trips a zip
    let resp = app
        .client
        .get(app.url(&format!("/api/v1/backups/{name}")))
        .bearer_auth(&token)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.bytes().await.unwrap();
    assert_eq!(&bytes[..2], b"PK");

    // Delete it
    let (_, status) = app
        .delete_auth(&format!("/api/v1/backups/{name}"), &token)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, status) = app
        .get_auth(&format!("/api/v1/backups/{name}"), &token)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    common::cleanup(app).await;
}

#[tokio::test]
async fn backups_require_admin() {
    let app = common::spawn_app().await;
    app.bootstrap().await;
    let member = app.register_member("user@test.com", "User").await;

    let (_, status) = app.get_auth("/api/v1/backups", &member).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, status) = app.post_auth("/api/v1/backups", &member, &json!({})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    common::cleanup(app).await;
}

// ── Profiles & audit log ────────────────────────────────────────

#[tokio::test]
async fn profile_updates_enforce_company_domain() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;

    let (body, status) = app.get_auth("/api/v1/users/me", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["department"], "IT");

    let (_, status) = app
        .put_auth(
            "/api/v1/users/me",
            &token,
            &json!({
                "department": "Facilities",
                "phone": "555-0199",
                "email": "admin@elsewhere.net",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (body, status) = app
        .put_auth(
            "/api/v1/users/me",
            &token,
            &json!({
                "department": "Facilities",
                "phone": "555-0199",
                "email": "admin2@example.com",
            }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["profile"]["department"], "Facilities");

    common::cleanup(app).await;
}

#[tokio::test]
async fn audit_log_is_admin_only_and_lists_entries() {
    let app = common::spawn_app().await;
    let token = app.bootstrap().await;
    let member = app.register_member("user@test.com", "User").await;

    app.create_equipment(&token, "SN-AUDITED").await;

    let (_, status) = app.get_auth("/api/v1/admin/audit-log", &member).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (body, status) = app.get_auth("/api/v1/admin/audit-log", &token).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["total"].as_i64().unwrap() >= 1);
    let newest = &body["entries"][0];
    assert_eq!(newest["model_name"], "Equipment");
    assert_eq!(newest["action"], "created");

    common::cleanup(app).await;
}

// ── Views ───────────────────────────────────────────────────────

#[tokio::test]
async fn view_pages_redirect_anonymous_users_to_login() {
    let app = common::spawn_app().await;

    let resp = app.client.get(app.url("/dashboard")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers().get("location").unwrap(), "/auth/login");

    let resp = app.client.get(app.url("/auth/login")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.text().await.unwrap();
    assert!(html.contains("Log in"));

    common::cleanup(app).await;
}
