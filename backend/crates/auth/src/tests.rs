//! Unit tests for Auth crate
//!
//! Use cases and routes run against an in-memory admin/customer store.

#[cfg(test)]
mod support {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::{DateTime, TimeZone, Utc};
    use kernel::id::AdminId;
    use kernel::role::Role;
    use platform::secret::{HashCost, SecretHash};
    use platform::token::{SigningKey, TokenConfig, TokenSigner};
    use uuid::Uuid;

    use crate::application::config::AuthConfig;
    use crate::domain::entity::{admin::Admin, principal::Principal};
    use crate::domain::repository::{AdminRepository, PrincipalRepository};
    use crate::domain::value_object::login_id::LoginId;
    use crate::error::AuthResult;

    pub const ADMIN_PASSWORD: &str = "saffron-kitchen-42";

    pub fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    pub fn cheap_cost() -> HashCost {
        HashCost {
            memory_kib: 64,
            iterations: 1,
            parallelism: 1,
        }
    }

    pub fn test_config() -> AuthConfig {
        AuthConfig {
            password_pepper: None,
            hash_cost: cheap_cost(),
        }
    }

    pub fn signer() -> TokenSigner {
        let key = SigningKey::new(b"test-signing-key-for-auth-0123456789".to_vec()).unwrap();
        TokenSigner::new(TokenConfig::new(key))
    }

    pub fn admin(login_id: &str, phone_number: &str, role: Role) -> Admin {
        Admin {
            admin_id: AdminId::new(),
            login_id: LoginId::parse(login_id).unwrap(),
            display_name: format!("{login_id} display"),
            phone_number: phone_number.to_string(),
            role,
            password_hash: SecretHash::create(ADMIN_PASSWORD.as_bytes(), None, &cheap_cost())
                .unwrap(),
        }
    }

    #[derive(Clone, Default)]
    pub struct InMemoryAuthRepository {
        admins: Arc<Mutex<Vec<Admin>>>,
        customers: Arc<Mutex<HashMap<Uuid, (Option<String>, String)>>>,
    }

    impl InMemoryAuthRepository {
        pub fn add_admin(&self, admin: Admin) {
            self.admins.lock().unwrap().push(admin);
        }

        pub fn add_customer(&self, display_name: Option<&str>, phone_number: &str) -> Uuid {
            let id = Uuid::new_v4();
            self.customers.lock().unwrap().insert(
                id,
                (display_name.map(str::to_string), phone_number.to_string()),
            );
            id
        }

        pub fn remove_admin(&self, admin_id: &AdminId) {
            self.admins.lock().unwrap().retain(|a| a.admin_id != *admin_id);
        }

        pub fn set_role(&self, admin_id: &AdminId, role: Role) {
            let mut admins = self.admins.lock().unwrap();
            if let Some(a) = admins.iter_mut().find(|a| a.admin_id == *admin_id) {
                a.role = role;
            }
        }

        pub fn admin_by_phone(&self, phone_number: &str) -> Admin {
            let admins = self.admins.lock().unwrap();
            admins
                .iter()
                .find(|a| a.phone_number == phone_number)
                .cloned()
                .unwrap()
        }
    }

    impl AdminRepository for InMemoryAuthRepository {
        async fn find_by_login_id(&self, login_id: &LoginId) -> AuthResult<Option<Admin>> {
            let admins = self.admins.lock().unwrap();
            Ok(admins.iter().find(|a| a.login_id == *login_id).cloned())
        }

        async fn find_by_phone_number(&self, phone_number: &str) -> AuthResult<Option<Admin>> {
            let admins = self.admins.lock().unwrap();
            Ok(admins
                .iter()
                .find(|a| a.phone_number == phone_number)
                .cloned())
        }

        async fn update_password(&self, admin_id: &AdminId, hash: &SecretHash) -> AuthResult<bool> {
            let mut admins = self.admins.lock().unwrap();
            match admins.iter_mut().find(|a| a.admin_id == *admin_id) {
                Some(a) => {
                    a.password_hash = hash.clone();
                    Ok(true)
                }
                None => Ok(false),
            }
        }
    }

    impl PrincipalRepository for InMemoryAuthRepository {
        async fn find_principal(&self, subject: Uuid, role: Role) -> AuthResult<Option<Principal>> {
            if role.is_staff() {
                let admins = self.admins.lock().unwrap();
                return Ok(admins
                    .iter()
                    .find(|a| a.admin_id.into_uuid() == subject)
                    .map(|a| Principal {
                        id: subject,
                        role: a.role,
                        display_name: Some(a.display_name.clone()),
                        phone_number: a.phone_number.clone(),
                    }));
            }

            let customers = self.customers.lock().unwrap();
            Ok(customers
                .get(&subject)
                .map(|(display_name, phone_number)| Principal {
                    id: subject,
                    role: Role::Customer,
                    display_name: display_name.clone(),
                    phone_number: phone_number.clone(),
                }))
        }
    }
}

#[cfg(test)]
mod sign_in_tests {
    use std::sync::Arc;

    use kernel::role::Role;

    use super::support::*;
    use crate::application::{AdminSignInInput, AdminSignInUseCase, AuthConfig};
    use crate::error::AuthError;

    fn use_case(repo: &InMemoryAuthRepository) -> AdminSignInUseCase<InMemoryAuthRepository> {
        AdminSignInUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(signer()),
            Arc::new(test_config()),
        )
    }

    fn input(login_id: &str, password: &str) -> AdminSignInInput {
        AdminSignInInput {
            login_id: login_id.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_sign_in_issues_token_with_admin_role() {
        let repo = InMemoryAuthRepository::default();
        let admin = admin("chef", "+919000000001", Role::Admin);
        let admin_id = admin.admin_id;
        repo.add_admin(admin);

        let output = use_case(&repo)
            .execute(input("  CHEF ", ADMIN_PASSWORD), t0())
            .await
            .unwrap();

        assert_eq!(output.admin.admin_id, admin_id);
        let claims = signer().verify(&output.token, t0()).unwrap();
        assert_eq!(claims.sub, admin_id.into_uuid());
        assert_eq!(claims.role, "admin");
    }

    #[tokio::test]
    async fn test_developer_token_carries_developer_role() {
        let repo = InMemoryAuthRepository::default();
        repo.add_admin(admin("dev", "+919000000002", Role::Developer));

        let output = use_case(&repo)
            .execute(input("dev", ADMIN_PASSWORD), t0())
            .await
            .unwrap();

        let claims = signer().verify(&output.token, t0()).unwrap();
        assert_eq!(claims.role, "developer");
    }

    #[tokio::test]
    async fn test_unknown_id_and_wrong_password_look_alike() {
        let repo = InMemoryAuthRepository::default();
        repo.add_admin(admin("chef", "+919000000001", Role::Admin));

        let unknown = use_case(&repo)
            .execute(input("nobody", ADMIN_PASSWORD), t0())
            .await
            .unwrap_err();
        let wrong = use_case(&repo)
            .execute(input("chef", "not-the-password"), t0())
            .await
            .unwrap_err();

        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert_eq!(unknown.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn test_unparseable_login_id_is_invalid_credentials() {
        let repo = InMemoryAuthRepository::default();
        repo.add_admin(admin("chef", "+919000000001", Role::Admin));

        let too_long = "c".repeat(65);
        let result = use_case(&repo).execute(input(&too_long, ADMIN_PASSWORD), t0()).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_blank_credentials_rejected() {
        let repo = InMemoryAuthRepository::default();

        for (id, password) in [("", ADMIN_PASSWORD), ("   ", ADMIN_PASSWORD), ("chef", "")] {
            let result = use_case(&repo).execute(input(id, password), t0()).await;
            assert!(matches!(result, Err(AuthError::MissingCredentials)));
        }
    }

    #[tokio::test]
    async fn test_pepper_must_match() {
        let repo = InMemoryAuthRepository::default();
        repo.add_admin(admin("chef", "+919000000001", Role::Admin));

        let peppered = AdminSignInUseCase::new(
            Arc::new(repo.clone()),
            Arc::new(signer()),
            Arc::new(AuthConfig {
                password_pepper: Some(b"kitchen-pepper".to_vec()),
                hash_cost: cheap_cost(),
            }),
        );

        let result = peppered.execute(input("chef", ADMIN_PASSWORD), t0()).await;
        assert!(matches!(result, Err(AuthError::InvalidCredentials)));
    }
}

#[cfg(test)]
mod authenticate_tests {
    use std::sync::Arc;

    use kernel::role::Role;
    use platform::token::{SigningKey, TokenConfig, TokenSigner};

    use super::support::*;
    use crate::application::AuthenticateUseCase;
    use crate::error::AuthError;

    fn use_case(repo: &InMemoryAuthRepository) -> AuthenticateUseCase<InMemoryAuthRepository> {
        AuthenticateUseCase::new(Arc::new(repo.clone()), Arc::new(signer()))
    }

    #[tokio::test]
    async fn test_customer_token_resolves_customer() {
        let repo = InMemoryAuthRepository::default();
        let customer_id = repo.add_customer(Some("Asha"), "+919876543210");
        let token = signer().sign(customer_id, "customer", t0()).unwrap().token;

        let principal = use_case(&repo).execute(&token, t0()).await.unwrap();

        assert_eq!(principal.id, customer_id);
        assert_eq!(principal.role, Role::Customer);
        assert_eq!(principal.display_name.as_deref(), Some("Asha"));
        assert_eq!(principal.phone_number, "+919876543210");
    }

    #[tokio::test]
    async fn test_staff_principal_uses_stored_role() {
        let repo = InMemoryAuthRepository::default();
        let admin = admin("chef", "+919000000001", Role::Admin);
        let admin_id = admin.admin_id;
        repo.add_admin(admin);
        let token = signer().sign(admin_id.into_uuid(), "admin", t0()).unwrap().token;

        repo.set_role(&admin_id, Role::Developer);

        let principal = use_case(&repo).execute(&token, t0()).await.unwrap();
        assert_eq!(principal.role, Role::Developer);
    }

    #[tokio::test]
    async fn test_deleted_subject_loses_access() {
        let repo = InMemoryAuthRepository::default();
        let admin = admin("chef", "+919000000001", Role::Admin);
        let admin_id = admin.admin_id;
        repo.add_admin(admin);
        let token = signer().sign(admin_id.into_uuid(), "admin", t0()).unwrap().token;

        repo.remove_admin(&admin_id);

        let result = use_case(&repo).execute(&token, t0()).await;
        assert!(matches!(result, Err(AuthError::PrincipalNotFound)));
    }

    #[tokio::test]
    async fn test_customer_token_does_not_reach_admins() {
        let repo = InMemoryAuthRepository::default();
        let admin = admin("chef", "+919000000001", Role::Admin);
        let admin_id = admin.admin_id;
        repo.add_admin(admin);
        let token = signer()
            .sign(admin_id.into_uuid(), "customer", t0())
            .unwrap()
            .token;

        let result = use_case(&repo).execute(&token, t0()).await;
        assert!(matches!(result, Err(AuthError::PrincipalNotFound)));
    }

    #[tokio::test]
    async fn test_rejected_tokens_are_unauthenticated() {
        let repo = InMemoryAuthRepository::default();
        let customer_id = repo.add_customer(None, "+919876543210");

        let expired = signer().sign(customer_id, "customer", t0()).unwrap();
        let unknown_role = signer().sign(customer_id, "chef", t0()).unwrap();
        let other_key = SigningKey::new(b"another-signing-key-for-tests-98765".to_vec())
            .map(|key| TokenSigner::new(TokenConfig::new(key)))
            .unwrap()
            .sign(customer_id, "customer", t0())
            .unwrap();

        let after_expiry = expired.expires_at + chrono::Duration::seconds(1);
        let cases = [
            ("not-a-token".to_string(), t0()),
            (expired.token.clone(), after_expiry),
            (unknown_role.token, t0()),
            (other_key.token, t0()),
        ];

        for (token, now) in cases {
            let result = use_case(&repo).execute(&token, now).await;
            assert!(matches!(result, Err(AuthError::Unauthenticated)), "{token}");
        }
    }
}

#[cfg(test)]
mod reset_password_tests {
    use std::sync::Arc;

    use kernel::role::Role;
    use platform::secret::PasswordPolicyError;

    use super::support::*;
    use crate::application::{ResetAdminPasswordInput, ResetAdminPasswordUseCase};
    use crate::domain::entity::principal::Principal;
    use crate::error::AuthError;

    fn use_case(repo: &InMemoryAuthRepository) -> ResetAdminPasswordUseCase<InMemoryAuthRepository> {
        ResetAdminPasswordUseCase::new(Arc::new(repo.clone()), Arc::new(test_config()))
    }

    fn actor(role: Role) -> Principal {
        Principal {
            id: uuid::Uuid::new_v4(),
            role,
            display_name: Some("Head office".to_string()),
            phone_number: "+919000000099".to_string(),
        }
    }

    fn input(phone_number: &str, new_password: &str) -> ResetAdminPasswordInput {
        ResetAdminPasswordInput {
            phone_number: phone_number.to_string(),
            new_password: new_password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_admin_resets_password() {
        let repo = InMemoryAuthRepository::default();
        repo.add_admin(admin("chef", "+919000000001", Role::Admin));

        use_case(&repo)
            .execute(&actor(Role::Admin), input(" +919000000001 ", "tandoori-nights-7"))
            .await
            .unwrap();

        let updated = repo.admin_by_phone("+919000000001");
        assert!(updated.verify_password(b"tandoori-nights-7", None));
        assert!(!updated.verify_password(ADMIN_PASSWORD.as_bytes(), None));
    }

    #[tokio::test]
    async fn test_only_admins_may_reset() {
        let repo = InMemoryAuthRepository::default();
        repo.add_admin(admin("chef", "+919000000001", Role::Admin));

        for role in [Role::Developer, Role::Customer] {
            let result = use_case(&repo)
                .execute(&actor(role), input("+919000000001", "tandoori-nights-7"))
                .await;
            assert!(matches!(result, Err(AuthError::InsufficientPermissions)));
        }
    }

    #[tokio::test]
    async fn test_weak_password_rejected() {
        let repo = InMemoryAuthRepository::default();
        repo.add_admin(admin("chef", "+919000000001", Role::Admin));

        let result = use_case(&repo)
            .execute(&actor(Role::Admin), input("+919000000001", "short"))
            .await;
        assert!(matches!(
            result,
            Err(AuthError::PasswordPolicy(PasswordPolicyError::TooShort { .. }))
        ));

        let result = use_case(&repo)
            .execute(&actor(Role::Admin), input("+919000000001", "password123"))
            .await;
        assert!(matches!(
            result,
            Err(AuthError::PasswordPolicy(PasswordPolicyError::CommonPattern))
        ));

        let unchanged = repo.admin_by_phone("+919000000001");
        assert!(unchanged.verify_password(ADMIN_PASSWORD.as_bytes(), None));
    }

    #[tokio::test]
    async fn test_unknown_phone_and_blank_fields() {
        let repo = InMemoryAuthRepository::default();

        let result = use_case(&repo)
            .execute(&actor(Role::Admin), input("+919000000001", "tandoori-nights-7"))
            .await;
        assert!(matches!(result, Err(AuthError::AdminNotFound)));

        let result = use_case(&repo)
            .execute(&actor(Role::Admin), input("  ", "tandoori-nights-7"))
            .await;
        assert!(matches!(result, Err(AuthError::MalformedResetRequest)));
    }
}

#[cfg(test)]
mod http_tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use chrono::Utc;
    use kernel::role::Role;
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::support::*;
    use crate::presentation::router::auth_router_generic;

    fn app(repo: &InMemoryAuthRepository) -> Router {
        auth_router_generic(repo.clone(), signer(), test_config())
    }

    async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(req).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn post_json(path: &str) -> axum::http::request::Builder {
        Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/json")
    }

    fn token_for(repo: &InMemoryAuthRepository, phone_number: &str) -> String {
        let admin = repo.admin_by_phone(phone_number);
        signer()
            .sign(admin.admin_id.into_uuid(), admin.role.code(), Utc::now())
            .unwrap()
            .token
    }

    #[tokio::test]
    async fn test_admin_login() {
        let repo = InMemoryAuthRepository::default();
        repo.add_admin(admin("chef", "+919000000001", Role::Admin));

        let body = json!({ "id": "Chef", "password": ADMIN_PASSWORD });
        let req = post_json("/admin-login")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body) = send(app(&repo), req).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert!(!body["token"].as_str().unwrap().is_empty());
        assert_eq!(
            body["user"],
            json!({
                "id": "chef",
                "role": "admin",
                "display": "chef display",
                "phoneNumber": "+919000000001"
            })
        );
    }

    #[tokio::test]
    async fn test_admin_login_failures() {
        let repo = InMemoryAuthRepository::default();
        repo.add_admin(admin("chef", "+919000000001", Role::Admin));

        let body = json!({ "id": "chef", "password": "nope-nope-nope" });
        let req = post_json("/admin-login")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body) = send(app(&repo), req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid credentials");

        let body = json!({ "id": "chef" });
        let req = post_json("/admin-login")
            .body(Body::from(body.to_string()))
            .unwrap();
        let (status, body) = send(app(&repo), req).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "ID and password required");
    }

    #[tokio::test]
    async fn test_me_requires_token() {
        let repo = InMemoryAuthRepository::default();
        let req = Request::builder().uri("/me").body(Body::empty()).unwrap();

        let (status, body) = send(app(&repo), req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn test_me_accepts_both_header_styles() {
        let repo = InMemoryAuthRepository::default();
        let customer_id = repo.add_customer(Some("Asha"), "+919876543210");
        let token = signer()
            .sign(customer_id, "customer", Utc::now())
            .unwrap()
            .token;

        let requests = [
            Request::builder()
                .uri("/me")
                .header("token", token.as_str())
                .body(Body::empty())
                .unwrap(),
            Request::builder()
                .uri("/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        ];

        for req in requests {
            let (status, body) = send(app(&repo), req).await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["user"]["id"], customer_id.to_string());
            assert_eq!(body["user"]["role"], "customer");
            assert_eq!(body["user"]["display"], "Asha");
            assert_eq!(body["user"]["phoneNumber"], "+919876543210");
        }
    }

    #[tokio::test]
    async fn test_reset_password_role_guard() {
        let repo = InMemoryAuthRepository::default();
        repo.add_admin(admin("chef", "+919000000001", Role::Admin));
        repo.add_admin(admin("dev", "+919000000002", Role::Developer));

        let reset = json!({ "phoneNumber": "+919000000002", "newPassword": "tandoori-nights-7" });

        // Unauthenticated
        let req = post_json("/admin/reset-password")
            .body(Body::from(reset.to_string()))
            .unwrap();
        let (status, _) = send(app(&repo), req).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        // Developer
        let req = post_json("/admin/reset-password")
            .header("token", token_for(&repo, "+919000000002"))
            .body(Body::from(reset.to_string()))
            .unwrap();
        let (status, body) = send(app(&repo), req).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "Insufficient permissions");

        // Admin
        let req = post_json("/admin/reset-password")
            .header(header::AUTHORIZATION, format!("Bearer {}", token_for(&repo, "+919000000001")))
            .body(Body::from(reset.to_string()))
            .unwrap();
        let (status, body) = send(app(&repo), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({ "success": true, "message": "Password reset successfully" })
        );
        assert!(repo
            .admin_by_phone("+919000000002")
            .verify_password(b"tandoori-nights-7", None));
    }
}
