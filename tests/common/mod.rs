#![allow(dead_code)]

use async_trait::async_trait;
use axum_test::TestServer;
use chrono::Utc;
use serde_json::{Value, json};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use shorty::application::services::{LoginIdentifier, TokenService};
use shorty::domain::click_worker::run_click_worker;
use shorty::domain::entities::{Link, LinkOwner, NewLink, NewUser, User};
use shorty::domain::repositories::{LinkRepository, UserRepository};
use shorty::error::AppError;
use shorty::routes::app_router;
use shorty::state::AppState;

pub const TEST_JWT_SECRET: &str = "test-jwt-secret";
pub const TEST_BASE_URL: &str = "http://short.test";

/// Link store kept in memory, with the same uniqueness rules as the database.
#[derive(Default)]
pub struct InMemoryLinkRepository {
    links: Mutex<Vec<Link>>,
    next_id: AtomicI64,
    unavailable: AtomicBool,
}

impl InMemoryLinkRepository {
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn all(&self) -> Vec<Link> {
        self.links.lock().unwrap().clone()
    }

    pub fn get(&self, short_code: &str) -> Option<Link> {
        self.links
            .lock()
            .unwrap()
            .iter()
            .find(|link| link.short_code == short_code)
            .cloned()
    }

    fn check_available(&self) -> Result<(), AppError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(AppError::store_failure("Database error", json!({})));
        }
        Ok(())
    }
}

#[async_trait]
impl LinkRepository for InMemoryLinkRepository {
    async fn create(&self, new_link: NewLink) -> Result<Option<Link>, AppError> {
        self.check_available()?;
        let mut links = self.links.lock().unwrap();

        if links.iter().any(|link| link.short_code == new_link.short_code) {
            return Ok(None);
        }

        let now = Utc::now();
        let link = Link {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            user_id: new_link.owner.user_id(),
            anonymous_id: new_link.owner.anonymous_id().map(str::to_string),
            short_code: new_link.short_code,
            original_url: new_link.original_url,
            clicks: 0,
            created_at: now,
            updated_at: now,
        };
        links.push(link.clone());

        Ok(Some(link))
    }

    async fn find_by_code(&self, short_code: &str) -> Result<Option<Link>, AppError> {
        self.check_available()?;
        Ok(self.get(short_code))
    }

    async fn list(&self, owner: Option<LinkOwner>) -> Result<Vec<Link>, AppError> {
        self.check_available()?;
        let mut links: Vec<Link> = self
            .links
            .lock()
            .unwrap()
            .iter()
            .filter(|link| match &owner {
                None => true,
                Some(LinkOwner::User(id)) => link.user_id == Some(*id),
                Some(LinkOwner::Anonymous(id)) => link.anonymous_id.as_deref() == Some(id.as_str()),
            })
            .cloned()
            .collect();

        links.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(links)
    }

    async fn increment_clicks(&self, short_code: &str) -> Result<u64, AppError> {
        self.check_available()?;
        let mut links = self.links.lock().unwrap();

        match links.iter_mut().find(|link| link.short_code == short_code) {
            Some(link) => {
                link.clicks += 1;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn claim_anonymous(&self, user_id: i64, anonymous_id: &str) -> Result<u64, AppError> {
        self.check_available()?;
        let mut links = self.links.lock().unwrap();
        let mut claimed = 0;

        for link in links
            .iter_mut()
            .filter(|link| link.user_id.is_none() && link.anonymous_id.as_deref() == Some(anonymous_id))
        {
            link.user_id = Some(user_id);
            link.anonymous_id = None;
            link.updated_at = Utc::now();
            claimed += 1;
        }

        Ok(claimed)
    }

    async fn health_check(&self) -> Result<(), AppError> {
        self.check_available()
    }
}

/// User store kept in memory, enforcing unique usernames and emails.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: Mutex<Vec<User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn all(&self) -> Vec<User> {
        self.users.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, new_user: NewUser) -> Result<User, AppError> {
        let mut users = self.users.lock().unwrap();

        if users.iter().any(|user| user.username == new_user.username) {
            return Err(AppError::username_taken(&new_user.username));
        }
        if users.iter().any(|user| user.email == new_user.email) {
            return Err(AppError::conflict(
                "Email already registered",
                json!({ "field": "email" }),
            ));
        }

        let now = Utc::now();
        let user = User {
            id: self.next_id.fetch_add(1, Ordering::SeqCst) + 1,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            created_at: now,
            updated_at: now,
        };
        users.push(user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|user| user.email == email)
            .cloned())
    }
}

pub struct TestApp {
    pub server: TestServer,
    pub state: AppState,
    pub links: Arc<InMemoryLinkRepository>,
    pub users: Arc<InMemoryUserRepository>,
}

pub fn create_token_service() -> TokenService {
    TokenService::new(
        TEST_JWT_SECRET,
        Duration::from_secs(15 * 60),
        Duration::from_secs(7 * 24 * 60 * 60),
    )
}

/// Builds the full router over in-memory stores, with a running click worker.
pub fn spawn_app() -> TestApp {
    spawn_app_with(LoginIdentifier::Email)
}

pub fn spawn_app_with(login_identifier: LoginIdentifier) -> TestApp {
    let links = Arc::new(InMemoryLinkRepository::default());
    let users = Arc::new(InMemoryUserRepository::default());

    let (click_tx, click_rx) = mpsc::channel(100);
    tokio::spawn(run_click_worker(click_rx, links.clone(), 4));

    let state = AppState::new(
        links.clone(),
        users.clone(),
        create_token_service(),
        click_tx,
        login_identifier,
        TEST_BASE_URL,
    );

    let server = TestServer::new(app_router(state.clone())).unwrap();

    TestApp {
        server,
        state,
        links,
        users,
    }
}

impl TestApp {
    /// Registers a user and returns the response body.
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Value {
        let response = self
            .server
            .post("/api/auth/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password,
            }))
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        response.json::<Value>()
    }

    /// Registers a user and returns its access token.
    pub async fn access_token(&self, username: &str, email: &str) -> String {
        let body = self.register(username, email, "secret1").await;
        body["access_token"].as_str().unwrap().to_string()
    }

    /// Waits until the click worker has applied `expected` clicks to `code`.
    pub async fn wait_for_clicks(&self, code: &str, expected: i64) -> i64 {
        for _ in 0..100 {
            let clicks = self.links.get(code).map(|link| link.clicks).unwrap_or(0);
            if clicks >= expected {
                return clicks;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        self.links.get(code).map(|link| link.clicks).unwrap_or(0)
    }
}
