mod common;

use common::TestApp;
use http::{Method, StatusCode};
use serde_json::{Value, json};
use shared::ErrorCode;
use shared::models::Role;

async fn add_dish(app: &TestApp, token: &str, name: &str, category: &str, cuisine: &str) -> Value {
    let reply = app
        .post(
            "/api/dishes",
            token,
            json!({
                "name": name,
                "description": format!("{name}, house style"),
                "dietaryTags": ["Veg"],
                "category": category,
                "cuisine": cuisine
            }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{:?}", reply.json());
    reply.json()
}

async fn seed_library(app: &TestApp, token: &str) {
    add_dish(app, token, "Paneer Tikka", "Starters", "North Indian").await;
    add_dish(app, token, "Hara Bhara Kabab", "Appetizer", "North Indian").await;
    add_dish(app, token, "Dal Makhani", "Main Course", "North Indian").await;
    add_dish(app, token, "Paneer Butter Masala", "Main Course", "North Indian").await;
    add_dish(app, token, "Thai Green Curry", "Mains", "Thai").await;
    add_dish(app, token, "Gulab Jamun", "Desserts", "North Indian").await;
    add_dish(app, token, "Garlic Naan", "Breads", "North Indian").await;
}

#[tokio::test]
async fn test_generate_three_sections_in_category_order() {
    let app = TestApp::new().await;
    let admin = app.account("boss@example.com", Role::Admin).await;
    let staff = app.account("cook@example.com", Role::Staff).await;
    seed_library(&app, &admin.access_token).await;

    let reply = app
        .post(
            "/api/menus/generate",
            &staff.access_token,
            json!({
                "eventType": "Wedding",
                "clientName": "the Patels",
                "guestCount": 120,
                "cuisines": ["Any / Mix"],
                "composition": {"appetizers": 2, "mains": 2, "desserts": 1}
            }),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{:?}", reply.json());
    let body = reply.json();
    let menu = &body["menu"];

    let sections = menu["sections"].as_array().unwrap();
    let titles: Vec<&str> = sections
        .iter()
        .map(|s| s["category"].as_str().unwrap())
        .collect();
    assert_eq!(
        titles,
        ["Appetizers & Starters", "Main Course Selection", "The Grand Finale (Desserts)"]
    );
    let counts: Vec<usize> = sections
        .iter()
        .map(|s| s["items"].as_array().unwrap().len())
        .collect();
    assert_eq!(counts, [2, 2, 1]);

    assert_eq!(menu["title"], "Classic and delightful Any / Mix Feast");
    assert!(
        menu["eventDescription"]
            .as_str()
            .unwrap()
            .contains("<b>the Patels</b>")
    );

    // Archived for the caller on generation
    let history_id = body["historyId"].as_str().unwrap();
    let reply = app
        .get(&format!("/api/history/{history_id}"), &staff.access_token)
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    let record = reply.json();
    assert_eq!(record["userId"], staff.profile.id.as_str());
    assert_eq!(record["guestCount"], 120);
    assert_eq!(record["menu"], *menu);
}

#[tokio::test]
async fn test_generate_rejects_invalid_preferences() {
    let app = TestApp::new().await;
    let staff = app.account("cook@example.com", Role::Staff).await;

    let reply = app
        .post(
            "/api/menus/generate",
            &staff.access_token,
            json!({"eventType": "Wedding", "guestCount": 0}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(
        reply.error_code(),
        Some(ErrorCode::PreferencesInvalid.code() as u64)
    );
}

#[tokio::test]
async fn test_library_requires_auth_and_admin_for_writes() {
    let app = TestApp::new().await;
    let staff = app.account("cook@example.com", Role::Staff).await;

    let reply = app.call(Method::GET, "/api/dishes", None, None).await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);

    let reply = app
        .post(
            "/api/dishes",
            &staff.access_token,
            json!({"name": "X", "category": "Mains", "cuisine": "Thai"}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = app.get("/api/dishes", &staff.access_token).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json(), json!([]));
}

#[tokio::test]
async fn test_library_listing_and_relocation() {
    let app = TestApp::new().await;
    let admin = app.account("boss@example.com", Role::Admin).await;
    let token = admin.access_token.as_str();
    seed_library(&app, token).await;

    let reply = app.get("/api/cuisines", token).await;
    assert_eq!(reply.json(), json!(["North Indian", "Thai"]));

    let reply = app.get("/api/dishes?cuisine=Thai", token).await;
    let groups = reply.json();
    assert_eq!(groups.as_array().unwrap().len(), 1);
    assert_eq!(groups[0]["bucket"], "mains");
    assert_eq!(groups[0]["dishes"][0]["name"], "Thai Green Curry");

    let reply = app.get("/api/dishes?q=PANEER", token).await;
    let names: Vec<String> = reply
        .json()
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|g| g["dishes"].as_array().unwrap().clone())
        .map(|d| d["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names.len(), 2);
    assert!(names.iter().all(|n| n.contains("Paneer")));

    let dish = add_dish(&app, token, "Mango Lassi", "Drinks", "North Indian").await;
    let id = dish["id"].as_str().unwrap();

    // Same cuisine: no relocation, other fields applied
    let reply = app
        .call(
            Method::PUT,
            &format!("/api/dishes/{id}"),
            Some(token),
            Some(json!({"cuisine": "North Indian", "description": "Sweet yoghurt"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.json()["cuisine"], "North Indian");
    assert_eq!(reply.json()["description"], "Sweet yoghurt");

    let reply = app
        .call(
            Method::PUT,
            &format!("/api/dishes/{id}"),
            Some(token),
            Some(json!({"cuisine": "Thai"})),
        )
        .await;
    assert_eq!(reply.json()["cuisine"], "Thai");

    let reply = app
        .call(
            Method::PUT,
            "/api/dishes/missing",
            Some(token),
            Some(json!({"name": "Ghost"})),
        )
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.error_code(), Some(ErrorCode::DishNotFound.code() as u64));
}

#[tokio::test]
async fn test_create_dish_requires_cuisine_and_category() {
    let app = TestApp::new().await;
    let admin = app.account("boss@example.com", Role::Admin).await;

    let reply = app
        .post(
            "/api/dishes",
            &admin.access_token,
            json!({"name": "Samosa", "category": "Starters", "cuisine": "  "}),
        )
        .await;
    assert_eq!(reply.error_code(), Some(ErrorCode::CuisineRequired.code() as u64));

    let reply = app
        .post(
            "/api/dishes",
            &admin.access_token,
            json!({"name": "Samosa", "category": "", "cuisine": "North Indian"}),
        )
        .await;
    assert_eq!(reply.error_code(), Some(ErrorCode::CategoryRequired.code() as u64));

    let reply = app
        .post(
            "/api/dishes",
            &admin.access_token,
            json!({"name": "", "category": "Starters", "cuisine": "North Indian"}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);
    assert_eq!(reply.error_code(), Some(ErrorCode::ValidationFailed.code() as u64));
}

#[tokio::test]
async fn test_sub_items_lifecycle() {
    let app = TestApp::new().await;
    let admin = app.account("boss@example.com", Role::Admin).await;
    let token = admin.access_token.as_str();
    let dish = add_dish(&app, token, "Biryani", "Main Course", "Hyderabadi").await;
    let dish_id = dish["id"].as_str().unwrap();

    let reply = app
        .post(
            &format!("/api/dishes/{dish_id}/sub-items"),
            token,
            json!({"name": "Raita", "description": "Cucumber yoghurt"}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    let sub_id = reply.json()["id"].as_str().unwrap().to_string();

    let reply = app
        .call(
            Method::PUT,
            &format!("/api/sub-items/{sub_id}"),
            Some(token),
            Some(json!({"name": "Boondi Raita"})),
        )
        .await;
    assert_eq!(reply.json()["name"], "Boondi Raita");

    let reply = app.get(&format!("/api/dishes/{dish_id}"), token).await;
    assert_eq!(reply.json()["subItems"][0]["name"], "Boondi Raita");

    let reply = app
        .post("/api/dishes/missing/sub-items", token, json!({"name": "Raita"}))
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    // Deleting the dish cascades
    let reply = app
        .call(Method::DELETE, &format!("/api/dishes/{dish_id}"), Some(token), None)
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    let reply = app
        .call(Method::DELETE, &format!("/api/sub-items/{sub_id}"), Some(token), None)
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.error_code(), Some(ErrorCode::SubItemNotFound.code() as u64));
}

#[tokio::test]
async fn test_history_round_trip_and_delete_permissions() {
    let app = TestApp::new().await;
    let admin = app.account("boss@example.com", Role::Admin).await;
    let owner = app.account("cook@example.com", Role::Staff).await;
    let other = app.account("waiter@example.com", Role::Staff).await;

    let menu = json!({
        "title": "Patel Wedding",
        "eventDescription": "A wedding curated exclusively for <b>the Patels</b>.",
        "sections": [{
            "category": "Main Course Selection",
            "items": [{
                "id": "d1",
                "name": "Dal Makhani",
                "description": "Slow-cooked black lentils",
                "dietaryTags": ["Veg"],
                "subItems": [{"name": "Jeera Rice", "description": "", "dietaryTags": []}]
            }]
        }],
        "winePairing": "A crisp Riesling",
        "chefsNotes": "Spice levels adjustable",
        "bannerUrl": "https://example.com/banner.jpg",
        "cuisineLabel": "North Indian"
    });

    let reply = app
        .post(
            "/api/history",
            &owner.access_token,
            json!({"menu": menu, "clientName": "Patel", "eventName": "Wedding", "guestCount": 200, "eventDate": "2026-12-01"}),
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK, "{:?}", reply.json());
    let id = reply.json()["id"].as_str().unwrap().to_string();
    assert_eq!(reply.json()["title"], "Patel Wedding");

    let reply = app
        .get(&format!("/api/history/{id}"), &other.access_token)
        .await;
    let stored = reply.json();
    assert_eq!(stored["menu"]["title"], menu["title"]);
    assert_eq!(stored["menu"]["sections"], menu["sections"]);
    assert_eq!(stored["menu"]["winePairing"], menu["winePairing"]);
    assert_eq!(stored["menu"]["chefsNotes"], menu["chefsNotes"]);

    let reply = app.get("/api/history", &other.access_token).await;
    assert_eq!(reply.json().as_array().unwrap().len(), 1);

    let reply = app
        .call(
            Method::DELETE,
            &format!("/api/history/{id}"),
            Some(&other.access_token),
            None,
        )
        .await;
    assert_eq!(reply.status, StatusCode::FORBIDDEN);

    let reply = app
        .call(
            Method::DELETE,
            &format!("/api/history/{id}"),
            Some(&admin.access_token),
            None,
        )
        .await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = app.get(&format!("/api/history/{id}"), &owner.access_token).await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
    assert_eq!(reply.error_code(), Some(ErrorCode::HistoryNotFound.code() as u64));
}
