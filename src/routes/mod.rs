pub mod auth;
pub mod health;
pub mod users;
pub mod visits;

use actix_web::web;

use crate::error::AppError;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    // Corps ou query illisibles => 400 JSON, comme les autres erreurs
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .app_data(
        web::PathConfig::default()
            .error_handler(|err, _req| AppError::Validation(err.to_string()).into()),
    )
    .service(health::health_check)
    .configure(auth::auth_routes)
    .configure(visits::visits_routes)
    .configure(users::users_routes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use actix_web::{http::StatusCode, test, App};
    use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
    use serde_json::{json, Value};

    use crate::config::AppConfig;
    use crate::db::connect_test_db;
    use crate::models::email_verification_tokens;
    use crate::models::users::Role;
    use crate::services::test_support::{insert_user, TEST_PASSWORD};
    use crate::utils::jwt::JwtKeys;
    use crate::utils::mailer::{LogMailer, Mailer};

    fn test_config() -> AppConfig {
        AppConfig::from_lookup(|key| match key {
            "DATABASE_URL" => Some("sqlite::memory:".to_string()),
            "JWT_SECRET" => Some("test-secret".to_string()),
            _ => None,
        })
        .unwrap()
    }

    macro_rules! test_app {
        ($db:expr) => {{
            let mailer: Arc<dyn Mailer> = Arc::new(LogMailer);
            test::init_service(
                App::new()
                    .app_data(web::Data::new($db.clone()))
                    .app_data(web::Data::new(JwtKeys::from_secret("test-secret")))
                    .app_data(web::Data::from(mailer))
                    .app_data(web::Data::new(test_config()))
                    .configure(configure_routes),
            )
            .await
        }};
    }

    fn bearer(token: &str) -> (&'static str, String) {
        ("Authorization", format!("Bearer {}", token))
    }

    fn check_in_body(email: &str, host_name: &str) -> Value {
        json!({
            "name": "Alice",
            "email": email,
            "phone": "555-0100",
            "idCardNumber": "ID-42",
            "hostName": host_name,
            "reason": "Interview"
        })
    }

    #[actix_web::test]
    async fn test_health() {
        let db = connect_test_db().await;
        let app = test_app!(db);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/health").to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["status"], "ok");
    }

    #[actix_web::test]
    async fn test_protected_routes_require_token() {
        let db = connect_test_db().await;
        let app = test_app!(db);

        let resp = test::call_service(&app, test::TestRequest::get().uri("/visits").to_request()).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = test::TestRequest::put()
            .uri("/visits/1/checkout")
            .insert_header(bearer("garbage"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].is_string());
    }

    #[actix_web::test]
    async fn test_check_in_validation_errors() {
        let db = connect_test_db().await;
        let keys = JwtKeys::from_secret("test-secret");
        let bob = insert_user(&db, "Bob", "bob@acme.com", Role::Host, Some("Acme")).await;
        let token = keys.generate_token(bob.id, Role::Host, "Bob").unwrap();
        let app = test_app!(db);

        // idCardNumber absent du JSON
        let req = test::TestRequest::post()
            .uri("/visits")
            .insert_header(bearer(&token))
            .set_json(json!({ "name": "Alice", "email": "alice@x.com", "hostName": "Bob" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        // idCardNumber vide
        let mut body = check_in_body("alice@x.com", "Bob");
        body["idCardNumber"] = json!("");
        let req = test::TestRequest::post()
            .uri("/visits")
            .insert_header(bearer(&token))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["fields"]["id_card_number"].is_array());

        // Nom et pièce d'identité composés d'espaces
        let mut body = check_in_body("alice@x.com", "Bob");
        body["name"] = json!("  ");
        body["idCardNumber"] = json!("   ");
        let req = test::TestRequest::post()
            .uri("/visits")
            .insert_header(bearer(&token))
            .set_json(body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["fields"]["name"].is_array());
        assert!(body["fields"]["id_card_number"].is_array());
    }

    #[actix_web::test]
    async fn test_role_restricted_routes() {
        let db = connect_test_db().await;
        let keys = JwtKeys::from_secret("test-secret");
        let admin = insert_user(&db, "Ann", "ann@acme.com", Role::Admin, Some("Acme")).await;
        let bob = insert_user(&db, "Bob", "bob@acme.com", Role::Host, Some("Acme")).await;
        let admin_token = keys.generate_token(admin.id, Role::Admin, "Ann").unwrap();
        let host_token = keys.generate_token(bob.id, Role::Host, "Bob").unwrap();
        let app = test_app!(db);

        for uri in ["/visits", "/users"] {
            let req = test::TestRequest::get().uri(uri).insert_header(bearer(&host_token)).to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN, "{}", uri);
        }

        let req = test::TestRequest::get().uri("/host-visits").insert_header(bearer(&admin_token)).to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::get().uri("/hosts").insert_header(bearer(&host_token)).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let hosts: Value = test::read_body_json(resp).await;
        assert_eq!(hosts, json!([{ "id": bob.id, "name": "Bob" }]));

        let req = test::TestRequest::get()
            .uri("/visits?startDate=yesterday")
            .insert_header(bearer(&admin_token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    /// Scénario complet: admin Acme crée Bob, Bob reçoit alice@x.com,
    /// doublon refusé (409), checkout, puis nouveau check-in accepté.
    #[actix_web::test]
    async fn test_end_to_end_visit_lifecycle() {
        let db = connect_test_db().await;
        let app = test_app!(db);

        // 1. Entreprise + admin
        let req = test::TestRequest::post()
            .uri("/registerCompany")
            .set_json(json!({
                "name": "Ann",
                "email": "ann@acme.com",
                "password": "hunter22",
                "companyName": "Acme"
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let admin_id = body["userId"].as_i64().unwrap() as i32;

        // 2. Vérification de l'email puis login admin
        let token = email_verification_tokens::Entity::find()
            .filter(email_verification_tokens::Column::UserId.eq(admin_id))
            .one(&db)
            .await
            .unwrap()
            .unwrap()
            .token;
        let req = test::TestRequest::get()
            .uri(&format!("/verify-email?token={}", token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "ann@acme.com", "password": "hunter22" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        let admin_token = body["token"].as_str().unwrap().to_string();
        assert_eq!(body["user"]["role"], "admin");

        // 3. L'admin crée le host Bob
        let req = test::TestRequest::post()
            .uri("/register")
            .insert_header(bearer(&admin_token))
            .set_json(json!({ "name": "Bob", "email": "bob@acme.com", "password": "hunter22" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let bob_id = body["userId"].as_i64().unwrap() as i32;
        let bob_token = JwtKeys::from_secret("test-secret").generate_token(bob_id, Role::Host, "Bob").unwrap();

        // Un second host dans Acme
        insert_user(&db, "Carol", "carol@acme.com", Role::Host, Some("Acme")).await;

        // 4. Bob reçoit alice
        let req = test::TestRequest::post()
            .uri("/visits")
            .insert_header(bearer(&bob_token))
            .set_json(check_in_body("alice@x.com", "bob"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let visit_id = body["visitId"].as_i64().unwrap();

        // 5. Doublon vers n'importe quel host Acme => 409
        let req = test::TestRequest::post()
            .uri("/visits")
            .insert_header(bearer(&admin_token))
            .set_json(check_in_body("alice@x.com", "Carol"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

        // 6. Checkout
        let req = test::TestRequest::put()
            .uri(&format!("/visits/{}/checkout", visit_id))
            .insert_header(bearer(&bob_token))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["checkOutTime"].is_string());

        // Second checkout => 404
        let req = test::TestRequest::put()
            .uri(&format!("/visits/{}/checkout", visit_id))
            .insert_header(bearer(&bob_token))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        // 7. Nouveau check-in accepté
        let req = test::TestRequest::post()
            .uri("/visits")
            .insert_header(bearer(&admin_token))
            .set_json(check_in_body("alice@x.com", "Carol"))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        // Journal admin: 2 visites, la plus récente encore active
        let req = test::TestRequest::get()
            .uri("/visits?hostName=bo")
            .insert_header(bearer(&admin_token))
            .to_request();
        let visits: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(visits.as_array().unwrap().len(), 1);
        assert_eq!(visits[0]["visitorEmail"], "alice@x.com");
        assert!(visits[0]["checkOutTime"].is_string());

        let req = test::TestRequest::get().uri("/visits").insert_header(bearer(&admin_token)).to_request();
        let visits: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(visits.as_array().unwrap().len(), 2);
        assert_eq!(visits[0]["hostName"], "Carol");
        assert!(visits[0]["checkOutTime"].is_null());

        // Bob ne voit que sa visite
        let req = test::TestRequest::get().uri("/host-visits").insert_header(bearer(&bob_token)).to_request();
        let visits: Value = test::read_body_json(test::call_service(&app, req).await).await;
        assert_eq!(visits.as_array().unwrap().len(), 1);
        assert_eq!(visits[0]["id"].as_i64().unwrap(), visit_id);

        // Le login host fonctionne une fois l'email vérifié
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "email": "carol@acme.com", "password": TEST_PASSWORD }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }
}
