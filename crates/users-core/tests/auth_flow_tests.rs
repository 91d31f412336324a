//! Registration and login flow tests

use std::sync::Arc;

use helpdesk_users_core::{
    user_store, AuthService, Error, JwtConfig, LoginRequest, PasswordConfig, RegisterRequest,
    SqliteUserStore,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use tempfile::TempDir;

const TEST_SECRET: &str = "test-signing-secret";

fn fast_password_config() -> PasswordConfig {
    PasswordConfig {
        min_length: 6,
        max_length: 128,
        // Low Argon2 costs for faster tests
        argon2_memory_cost: 4096,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
    }
}

async fn setup() -> (AuthService, SqliteUserStore, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());

    let pool = user_store::connect(&db_url).await.unwrap();
    let store = SqliteUserStore::new(pool).await.unwrap();

    let jwt = JwtConfig {
        secret: TEST_SECRET.to_string(),
        ttl_seconds: 86_400,
    };
    let auth = AuthService::new(Arc::new(store.clone()), &jwt, fast_password_config()).unwrap();

    (auth, store, temp_dir)
}

fn register_request(username: &str, email: &str, password: &str) -> RegisterRequest {
    RegisterRequest {
        username: username.to_string(),
        email: email.to_string(),
        password: password.to_string(),
    }
}

#[tokio::test]
async fn register_token_resolves_to_same_username() {
    let (auth, _store, _tmp) = setup().await;

    let outcome = auth
        .register(&register_request("alice", "alice@x.com", "secret1"))
        .await
        .unwrap();

    let header = format!("Bearer {}", outcome.token);
    let identity = auth.authenticate(Some(&header)).await.unwrap();

    assert_eq!(identity.username, "alice");
    assert_eq!(identity.user_id, outcome.user_id);
}

#[tokio::test]
async fn register_rejects_short_password() {
    let (auth, _store, _tmp) = setup().await;

    let result = auth
        .register(&register_request("alice", "alice@x.com", "five5"))
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn register_rejects_missing_fields() {
    let (auth, _store, _tmp) = setup().await;

    let result = auth
        .register(&register_request("", "alice@x.com", "secret1"))
        .await;
    assert!(matches!(result, Err(Error::Validation(_))));
}

#[tokio::test]
async fn duplicate_registration_is_conflict() {
    let (auth, store, _tmp) = setup().await;

    auth.register(&register_request("alice", "alice@x.com", "secret1"))
        .await
        .unwrap();

    // Same username, different email
    let result = auth
        .register(&register_request("alice", "other@x.com", "secret1"))
        .await;
    assert!(matches!(result, Err(Error::Conflict(_))));

    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
        .fetch_one(store.pool())
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn login_roundtrip() {
    let (auth, _store, _tmp) = setup().await;

    auth.register(&register_request("alice", "alice@x.com", "secret1"))
        .await
        .unwrap();

    let outcome = auth
        .login(&LoginRequest {
            username: "alice".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();

    assert!(!outcome.is_partner);

    let header = format!("Bearer {}", outcome.token);
    let identity = auth.authenticate(Some(&header)).await.unwrap();
    assert_eq!(identity.username, "alice");
}

#[tokio::test]
async fn login_unknown_user_is_not_found() {
    let (auth, _store, _tmp) = setup().await;

    let result = auth
        .login(&LoginRequest {
            username: "ghost".to_string(),
            password: "secret1".to_string(),
        })
        .await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn login_wrong_password_is_unauthorized() {
    let (auth, _store, _tmp) = setup().await;

    auth.register(&register_request("alice", "alice@x.com", "secret1"))
        .await
        .unwrap();

    let result = auth
        .login(&LoginRequest {
            username: "alice".to_string(),
            password: "secret2".to_string(),
        })
        .await;
    assert!(matches!(result, Err(Error::Unauthorized)));
}

#[tokio::test]
async fn expired_token_is_token_expired() {
    let (auth, _store, _tmp) = setup().await;

    auth.register(&register_request("alice", "alice@x.com", "secret1"))
        .await
        .unwrap();

    // Hand-craft a token with the right secret but an expiry in the past
    #[derive(serde::Serialize)]
    struct StaleClaims {
        username: String,
        exp: i64,
        iat: i64,
    }

    let now = chrono::Utc::now().timestamp();
    let stale = encode(
        &Header::default(),
        &StaleClaims {
            username: "alice".to_string(),
            exp: now - 3600,
            iat: now - 7200,
        },
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap();

    let header = format!("Bearer {}", stale);
    let result = auth.authenticate(Some(&header)).await;
    assert!(matches!(result, Err(Error::TokenExpired)));
}

#[tokio::test]
async fn missing_and_garbled_headers() {
    let (auth, _store, _tmp) = setup().await;

    assert!(matches!(
        auth.authenticate(None).await,
        Err(Error::Unauthorized)
    ));
    assert!(matches!(
        auth.authenticate(Some("Token abc")).await,
        Err(Error::TokenInvalid)
    ));
    assert!(matches!(
        auth.authenticate(Some("Bearer not.a.jwt")).await,
        Err(Error::TokenInvalid)
    ));
}

#[tokio::test]
async fn valid_token_for_deleted_user_is_not_found() {
    let (auth, store, _tmp) = setup().await;

    let outcome = auth
        .register(&register_request("alice", "alice@x.com", "secret1"))
        .await
        .unwrap();

    sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(outcome.user_id)
        .execute(store.pool())
        .await
        .unwrap();

    let header = format!("Bearer {}", outcome.token);
    let result = auth.authenticate(Some(&header)).await;
    assert!(matches!(result, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn is_admin_follows_storage() {
    let (auth, store, _tmp) = setup().await;

    let outcome = auth
        .register(&register_request("alice", "alice@x.com", "secret1"))
        .await
        .unwrap();
    assert!(!auth.is_admin(outcome.user_id).await.unwrap());

    sqlx::query("UPDATE users SET is_partner = 1 WHERE id = ?")
        .bind(outcome.user_id)
        .execute(store.pool())
        .await
        .unwrap();

    assert!(auth.is_admin(outcome.user_id).await.unwrap());
}
