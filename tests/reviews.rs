use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::http::{StatusCode, header};
use actix_web::test;
use serde_json::{Value, json};

use stayfinder::review::model::{Review, ReviewInput};
use stayfinder::session::SESSION_COOKIE;
use stayfinder::{AppState, Stores, build_app};

// Cheapest cost bcrypt accepts.
const TEST_COST: u32 = 4;

fn session_cookie<B>(res: &ServiceResponse<B>) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .map(|c| c.into_owned())
}

fn location<B>(res: &ServiceResponse<B>) -> String {
    res.headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

macro_rules! spawn_app {
    () => {{
        let stores = Stores::in_memory();
        let state = AppState::new(&stores, TEST_COST);
        let app = test::init_service(build_app(state, Key::generate(), false)).await;
        (app, stores)
    }};
}

macro_rules! sign_up {
    ($app:expr, $name:expr) => {{
        let req = test::TestRequest::post()
            .uri("/signup")
            .set_json(json!({
                "username": $name,
                "email": format!("{}@example.com", $name),
                "password": "secret123"
            }))
            .to_request();
        let res = test::call_service(&$app, req).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        session_cookie(&res).expect("signup sets the session cookie")
    }};
}

/// A listing owned by a fresh "host" user; returns its hex id.
macro_rules! hosted_listing {
    ($app:expr, $stores:expr) => {{
        let host = sign_up!($app, "host");
        let req = test::TestRequest::post()
            .uri("/listings")
            .cookie(host)
            .set_json(json!({
                "listing": {
                    "title": "Lakeside Cabin",
                    "description": "Private jetty, canoe included, no neighbours",
                    "price": 95,
                    "location": "Lake Placid",
                    "country": "USA",
                    "image": { "url": "https://example.com/lake.jpg" }
                }
            }))
            .to_request();
        let res = test::call_service(&$app, req).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        $stores.listings.find_all().await.unwrap().remove(0)
    }};
}

macro_rules! post_review {
    ($app:expr, $cookie:expr, $listing_id:expr) => {{
        let req = test::TestRequest::post()
            .uri(&format!("/listings/{}/reviews", $listing_id))
            .cookie($cookie.clone())
            .set_json(json!({ "review": { "comment": "Wonderful quiet week", "rating": 5 } }))
            .to_request();
        test::call_service(&$app, req).await
    }};
}

#[actix_web::test]
async fn review_is_attached_with_its_author() {
    let (app, stores) = spawn_app!();
    let listing = hosted_listing!(app, stores);
    let id = listing.id.to_hex();
    let guest = sign_up!(app, "guest");

    let res = post_review!(app, guest, id);
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/listings/{id}"));

    let guest_user = stores.users.find_by_username("guest").await.unwrap().unwrap();
    let stored = stores.listings.find_by_id(&listing.id).await.unwrap().unwrap();
    assert_eq!(stored.reviews.len(), 1);
    let review = stores.reviews.find_by_id(&stored.reviews[0]).await.unwrap().unwrap();
    assert_eq!(review.author, Some(guest_user.id));

    // Show resolves reviews, their authors and the owner.
    let req = test::TestRequest::get().uri(&format!("/listings/{id}")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let shown = &body["data"]["listing"];
    assert_eq!(shown["owner"]["username"], "host");
    assert_eq!(shown["reviews"][0]["author"]["username"], "guest");
    assert_eq!(shown["reviews"][0]["rating"], 5);
    assert!(shown["owner"].get("password_hash").is_none());
}

#[actix_web::test]
async fn invalid_review_is_a_bad_request() {
    let (app, stores) = spawn_app!();
    let listing = hosted_listing!(app, stores);
    let guest = sign_up!(app, "guest");

    let req = test::TestRequest::post()
        .uri(&format!("/listings/{}/reviews", listing.id.to_hex()))
        .cookie(guest)
        .set_json(json!({ "review": { "comment": "Meh", "rating": 9 } }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let stored = stores.listings.find_by_id(&listing.id).await.unwrap().unwrap();
    assert!(stored.reviews.is_empty());
}

#[actix_web::test]
async fn author_deletes_review_and_reference() {
    let (app, stores) = spawn_app!();
    let listing = hosted_listing!(app, stores);
    let id = listing.id.to_hex();
    let guest = sign_up!(app, "guest");
    post_review!(app, guest, id);
    post_review!(app, guest, id);

    let stored = stores.listings.find_by_id(&listing.id).await.unwrap().unwrap();
    let (first, second) = (stored.reviews[0], stored.reviews[1]);

    let req = test::TestRequest::delete()
        .uri(&format!("/listings/{id}/reviews/{}", first.to_hex()))
        .cookie(guest)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/listings/{id}"));

    assert!(stores.reviews.find_by_id(&first).await.unwrap().is_none());
    let stored = stores.listings.find_by_id(&listing.id).await.unwrap().unwrap();
    assert_eq!(stored.reviews, vec![second]);
}

#[actix_web::test]
async fn other_users_cannot_delete_a_review() {
    let (app, stores) = spawn_app!();
    let listing = hosted_listing!(app, stores);
    let id = listing.id.to_hex();
    let guest = sign_up!(app, "guest");
    post_review!(app, guest, id);
    let review_id = stores.listings.find_by_id(&listing.id).await.unwrap().unwrap().reviews[0];

    let stranger = sign_up!(app, "stranger");
    let req = test::TestRequest::delete()
        .uri(&format!("/listings/{id}/reviews/{}", review_id.to_hex()))
        .cookie(stranger)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/listings/{id}"));

    assert!(stores.reviews.find_by_id(&review_id).await.unwrap().is_some());
    let stored = stores.listings.find_by_id(&listing.id).await.unwrap().unwrap();
    assert_eq!(stored.reviews, vec![review_id]);
}

#[actix_web::test]
async fn review_cannot_be_deleted_through_another_listing() {
    let (app, stores) = spawn_app!();
    let lake = hosted_listing!(app, stores);
    let guest = sign_up!(app, "guest");
    let req = test::TestRequest::post()
        .uri("/listings")
        .cookie(guest.clone())
        .set_json(json!({
            "listing": {
                "title": "Harbour Loft",
                "description": "Top floor loft above the fish market, sea views",
                "price": 120,
                "location": "Brixham",
                "country": "England",
                "image": { "url": "https://example.com/loft.jpg" }
            }
        }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::SEE_OTHER);
    let loft = stores
        .listings
        .find_all()
        .await
        .unwrap()
        .into_iter()
        .find(|l| l.title == "Harbour Loft")
        .unwrap();

    post_review!(app, guest, lake.id.to_hex());
    let review_id = stores.listings.find_by_id(&lake.id).await.unwrap().unwrap().reviews[0];

    let req = test::TestRequest::delete()
        .uri(&format!(
            "/listings/{}/reviews/{}",
            loft.id.to_hex(),
            review_id.to_hex()
        ))
        .cookie(guest)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/listings/{}", loft.id.to_hex()));

    assert!(stores.reviews.find_by_id(&review_id).await.unwrap().is_some());
    let stored = stores.listings.find_by_id(&lake.id).await.unwrap().unwrap();
    assert_eq!(stored.reviews, vec![review_id]);
}

#[actix_web::test]
async fn reviews_without_an_author_cannot_be_deleted() {
    let (app, stores) = spawn_app!();
    let listing = hosted_listing!(app, stores);
    let host = stores.users.find_by_username("host").await.unwrap().unwrap();

    let mut legacy = Review::new(
        ReviewInput {
            comment: "Left before accounts existed".into(),
            rating: 4,
        },
        host.id,
    );
    legacy.author = None;
    stores.reviews.insert(&legacy).await.unwrap();
    stores.listings.push_review(&listing.id, &legacy.id).await.unwrap();

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": "host", "password": "secret123" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    let cookie = session_cookie(&res).unwrap();

    let id = listing.id.to_hex();
    let req = test::TestRequest::delete()
        .uri(&format!("/listings/{id}/reviews/{}", legacy.id.to_hex()))
        .cookie(cookie)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&res), format!("/listings/{id}"));
    assert!(stores.reviews.find_by_id(&legacy.id).await.unwrap().is_some());

    // It still shows, without an author.
    let req = test::TestRequest::get().uri(&format!("/listings/{id}")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["listing"]["reviews"][0]["author"], Value::Null);
}

#[actix_web::test]
async fn deleting_a_listing_removes_its_reviews() {
    let (app, stores) = spawn_app!();
    let listing = hosted_listing!(app, stores);
    let id = listing.id.to_hex();
    let guest = sign_up!(app, "guest");
    post_review!(app, guest, id);
    let review_id = stores.listings.find_by_id(&listing.id).await.unwrap().unwrap().reviews[0];

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": "host", "password": "secret123" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    let host = session_cookie(&res).unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/listings/{id}"))
        .cookie(host)
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(location(&res), "/listings");

    assert!(stores.reviews.find_by_id(&review_id).await.unwrap().is_none());
}

#[actix_web::test]
async fn logout_drops_the_identity() {
    let (app, stores) = spawn_app!();
    let guest = sign_up!(app, "guest");

    let req = test::TestRequest::get().uri("/logout").cookie(guest).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(location(&res), "/listings");
    let cookie = session_cookie(&res).unwrap();

    let req = test::TestRequest::post()
        .uri("/listings")
        .cookie(cookie)
        .set_json(json!({ "listing": {} }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(location(&res), "/login");
    assert!(stores.listings.find_all().await.unwrap().is_empty());
}
