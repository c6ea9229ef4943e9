use std::collections::HashMap;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use account_service::domain::auth::errors::MailError;
use account_service::domain::auth::models::SharePuzzleCommand;
use account_service::domain::auth::ports::MailGateway;
use account_service::domain::auth::service::AuthService;
use account_service::domain::user::errors::DirectoryError;
use account_service::domain::user::models::EmailAddress;
use account_service::domain::user::models::Group;
use account_service::domain::user::models::Identity;
use account_service::domain::user::models::UserName;
use account_service::domain::user::models::UserRecord;
use account_service::domain::user::ports::UserDirectory;
use account_service::inbound::http::router::create_router;
use account_service::outbound::sessions::InMemorySessionStore;
use async_trait::async_trait;
use auth::TokenCodec;
use tokio::sync::RwLock;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-token-signing-at-least-32-bytes";

/// Test application that spawns a real server over in-memory adapters
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub directory: Arc<InMemoryUserDirectory>,
    pub sessions: Arc<InMemorySessionStore>,
    pub mail: Arc<RecordingMailGateway>,
    pub codec: Arc<TokenCodec>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let codec = Arc::new(TokenCodec::new(TEST_SECRET));
        let directory = Arc::new(InMemoryUserDirectory::new());
        let sessions = Arc::new(InMemorySessionStore::new());
        let mail = Arc::new(RecordingMailGateway::new());

        let auth_service = Arc::new(AuthService::new(
            Arc::clone(&directory),
            Arc::clone(&sessions),
            Arc::clone(&mail),
            Arc::clone(&codec),
        ));

        let router = create_router(
            auth_service,
            Arc::clone(&directory) as Arc<dyn UserDirectory>,
            Arc::clone(&codec),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            directory,
            sessions,
            mail,
            codec,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Log in through the API and return (access token, refresh token).
    pub async fn login(&self, user_name: &str, password: &str) -> (String, String) {
        let response = self
            .post("/auth/login")
            .json(&serde_json::json!({ "user_name": user_name, "password": password }))
            .send()
            .await
            .expect("Failed to execute login request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Invalid login response");
        (
            body["data"]["token"].as_str().unwrap().to_string(),
            body["data"]["refresh_token"].as_str().unwrap().to_string(),
        )
    }
}

/// Directory backed by maps, seeded with the standard groups.
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<i64, UserRecord>>,
    groups: HashMap<i64, Group>,
    next_id: AtomicI64,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        let groups = HashMap::from([
            (
                1,
                Group {
                    id: 1,
                    name: "user".to_string(),
                    roles: vec![],
                },
            ),
            (
                2,
                Group {
                    id: 2,
                    name: "entreprise".to_string(),
                    roles: vec!["entreprise".to_string()],
                },
            ),
            (
                3,
                Group {
                    id: 3,
                    name: "admin".to_string(),
                    roles: vec!["admin".to_string(), "entreprise".to_string()],
                },
            ),
        ]);

        Self {
            users: RwLock::new(HashMap::new()),
            groups,
            next_id: AtomicI64::new(1),
        }
    }

    /// Insert a verified account directly, bypassing registration.
    pub async fn seed_user(&self, user_name: &str, password: &str, group_id: i64) -> Identity {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let identity = Identity {
            id,
            user_name: user_name.to_string(),
            group_id,
            email: format!("{user_name}@example.com"),
            email_verified: true,
        };
        let record = UserRecord {
            identity: identity.clone(),
            password_hash: auth::PasswordHasher::new()
                .hash(password)
                .expect("Failed to hash seed password"),
        };
        self.users.write().await.insert(id, record);

        identity
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_by_user_name(
        &self,
        user_name: &str,
    ) -> Result<Option<UserRecord>, DirectoryError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|record| record.identity.user_name == user_name)
            .cloned())
    }

    async fn find_identity(&self, id: i64) -> Result<Option<Identity>, DirectoryError> {
        Ok(self
            .users
            .read()
            .await
            .get(&id)
            .map(|record| record.identity.clone()))
    }

    async fn find_group(&self, group_id: i64) -> Result<Option<Group>, DirectoryError> {
        Ok(self.groups.get(&group_id).cloned())
    }

    async fn create_user(
        &self,
        user_name: &UserName,
        email: &EmailAddress,
        password_hash: String,
    ) -> Result<Identity, DirectoryError> {
        let mut users = self.users.write().await;

        if users
            .values()
            .any(|record| record.identity.user_name == user_name.as_str())
        {
            return Err(DirectoryError::UserNameTaken(
                user_name.as_str().to_string(),
            ));
        }
        if users
            .values()
            .any(|record| record.identity.email == email.as_str())
        {
            return Err(DirectoryError::EmailTaken(email.as_str().to_string()));
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let identity = Identity {
            id,
            user_name: user_name.as_str().to_string(),
            group_id: 1,
            email: email.as_str().to_string(),
            email_verified: false,
        };
        users.insert(
            id,
            UserRecord {
                identity: identity.clone(),
                password_hash,
            },
        );

        Ok(identity)
    }

    async fn mark_email_verified(&self, user_id: i64) -> Result<(), DirectoryError> {
        let mut users = self.users.write().await;
        let record = users
            .get_mut(&user_id)
            .ok_or_else(|| DirectoryError::NotFound(user_id.to_string()))?;
        record.identity.email_verified = true;

        Ok(())
    }

    async fn set_password_hash(
        &self,
        user_id: i64,
        password_hash: String,
    ) -> Result<(), DirectoryError> {
        let mut users = self.users.write().await;
        let record = users
            .get_mut(&user_id)
            .ok_or_else(|| DirectoryError::NotFound(user_id.to_string()))?;
        record.password_hash = password_hash;

        Ok(())
    }
}

/// Captured outbound mail.
#[derive(Debug, Clone)]
pub struct SentMail {
    pub to: String,
    pub template: String,
    pub token: String,
}

/// Gateway that records mail instead of delivering it.
pub struct RecordingMailGateway {
    sent: RwLock<Vec<SentMail>>,
}

impl RecordingMailGateway {
    pub fn new() -> Self {
        Self {
            sent: RwLock::new(Vec::new()),
        }
    }

    pub async fn sent(&self) -> Vec<SentMail> {
        self.sent.read().await.clone()
    }

    pub async fn last(&self) -> Option<SentMail> {
        self.sent.read().await.last().cloned()
    }
}

#[async_trait]
impl MailGateway for RecordingMailGateway {
    async fn send_account_activation(
        &self,
        identity: &Identity,
        token: &str,
    ) -> Result<(), MailError> {
        self.sent.write().await.push(SentMail {
            to: identity.email.clone(),
            template: "active".to_string(),
            token: token.to_string(),
        });
        Ok(())
    }

    async fn send_password_reset(
        &self,
        identity: &Identity,
        token: &str,
    ) -> Result<(), MailError> {
        self.sent.write().await.push(SentMail {
            to: identity.email.clone(),
            template: "forgot".to_string(),
            token: token.to_string(),
        });
        Ok(())
    }

    async fn send_puzzle_invite(
        &self,
        command: &SharePuzzleCommand,
        token: &str,
    ) -> Result<(), MailError> {
        self.sent.write().await.push(SentMail {
            to: command.recipient.as_str().to_string(),
            template: "puzzleTest".to_string(),
            token: token.to_string(),
        });
        Ok(())
    }
}
