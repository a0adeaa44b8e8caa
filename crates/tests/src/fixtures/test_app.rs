use nanoid::nanoid;
use registrovivo_api::{build_router, state::AppState};
use registrovivo_config::DatabaseSettings;
use registrovivo_db::indexes::ensure_indexes;

/// A server spawned on a random port against a throwaway database.
pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
}

/// Credentials of a user seeded through the public register endpoint.
pub struct TestUser {
    pub username: String,
    pub password: String,
}

const ID_ALPHABET: [char; 36] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
    'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

impl TestApp {
    pub async fn spawn() -> Self {
        let settings = DatabaseSettings {
            uri: std::env::var("TEST_MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            name: format!("registrovivo_test_{}", nanoid!(8, &ID_ALPHABET)),
        };

        let db = registrovivo_db::connect(&settings)
            .await
            .expect("test MongoDB must be reachable");
        ensure_indexes(&db).await.expect("index creation failed");

        let app = build_router(AppState::new(&db));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind test listener");
        let addr = listener.local_addr().expect("listener has no local addr");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("test server died");
        });

        Self {
            base_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
        }
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.post(format!("{}{}", self.base_url, path))
    }

    pub fn delete(&self, path: &str) -> reqwest::RequestBuilder {
        self.client.delete(format!("{}{}", self.base_url, path))
    }

    /// Registers a fresh user through the API and returns its credentials.
    pub async fn register_user(&self, prefix: &str) -> TestUser {
        let user = TestUser {
            username: format!("{}_{}", prefix, nanoid!(6, &ID_ALPHABET)),
            password: "secret123".to_string(),
        };

        let resp = self
            .post("/api/auth/register")
            .json(&serde_json::json!({
                "username": user.username,
                "password": user.password,
            }))
            .send()
            .await
            .expect("register request failed");
        assert_eq!(resp.status().as_u16(), 201, "seed register must succeed");

        user
    }
}
