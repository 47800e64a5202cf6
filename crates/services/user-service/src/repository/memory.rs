//! In-memory user store for development and tests.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicI64, Ordering as AtomicOrdering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::UserRepository;
use common::{AppError, AppResult};
use domain::{NewUser, PageRequest, SortDirection, SortField, User, UserStatus};

/// In-memory implementation of UserRepository.
///
/// Ids are assigned from a monotonically increasing counter starting at 1.
#[derive(Debug, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<BTreeMap<i64, User>>>,
    next_id: Arc<AtomicI64>,
}

impl Default for InMemoryUserStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(BTreeMap::new())),
            next_id: Arc::new(AtomicI64::new(1)),
        }
    }

    /// Number of stored records, of any status
    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

fn compare_text(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}

/// Absent values sort after present ones in ascending order.
fn compare_optional(a: &Option<String>, b: &Option<String>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => compare_text(a, b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

fn compare_by(field: SortField, a: &User, b: &User) -> Ordering {
    match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::Username => compare_text(&a.username, &b.username),
        SortField::Email => compare_text(&a.email, &b.email),
        SortField::FirstName => compare_optional(&a.first_name, &b.first_name),
        SortField::LastName => compare_optional(&a.last_name, &b.last_name),
        SortField::Status => compare_text(a.status.as_str(), b.status.as_str()),
        SortField::Role => compare_text(a.role.as_str(), b.role.as_str()),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

/// Sort, then cut out the requested window.
fn window(mut users: Vec<User>, page: &PageRequest) -> (Vec<User>, u64) {
    let total = users.len() as u64;

    users.sort_by(|a, b| {
        let ordering = compare_by(page.sort.field, a, b);
        let ordering = match page.sort.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        ordering.then_with(|| a.id.cmp(&b.id))
    });

    let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
    let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
    let content = users.into_iter().skip(offset).take(limit).collect();

    (content, total)
}

fn contains_ignore_case(value: &str, needle: &str) -> bool {
    value.to_lowercase().contains(needle)
}

fn matches_query(user: &User, needle: &str) -> bool {
    contains_ignore_case(&user.username, needle)
        || contains_ignore_case(&user.email, needle)
        || user
            .first_name
            .as_deref()
            .is_some_and(|name| contains_ignore_case(name, needle))
        || user
            .last_name
            .as_deref()
            .is_some_and(|name| contains_ignore_case(name, needle))
}

/// Reject a write whose username or email is held by another record.
fn check_unique<'a>(
    users: impl Iterator<Item = &'a User>,
    id: Option<i64>,
    username: &str,
    email: &str,
) -> AppResult<()> {
    let mut username_taken = false;
    let mut email_taken = false;
    for user in users.filter(|u| Some(u.id) != id) {
        username_taken |= user.username == username;
        email_taken |= user.email == email;
    }

    if username_taken {
        return Err(AppError::conflict(format!(
            "Username already exists: {}",
            username
        )));
    }
    if email_taken {
        return Err(AppError::conflict(format!("Email already exists: {}", email)));
    }
    Ok(())
}

#[async_trait]
impl UserRepository for InMemoryUserStore {
    async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.username == username).cloned())
    }

    async fn exists_by_username(&self, username: &str) -> AppResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.username == username))
    }

    async fn exists_by_email(&self, email: &str) -> AppResult<bool> {
        let users = self.users.read().await;
        Ok(users.values().any(|u| u.email == email))
    }

    async fn find_all(&self, page: &PageRequest) -> AppResult<(Vec<User>, u64)> {
        let users = self.users.read().await;
        Ok(window(users.values().cloned().collect(), page))
    }

    async fn search(
        &self,
        query: &str,
        status: UserStatus,
        page: &PageRequest,
    ) -> AppResult<(Vec<User>, u64)> {
        let needle = query.to_lowercase();
        let users = self.users.read().await;

        let matching = users
            .values()
            .filter(|u| u.status == status && matches_query(u, &needle))
            .cloned()
            .collect();

        Ok(window(matching, page))
    }

    async fn insert(&self, user: NewUser) -> AppResult<User> {
        let mut users = self.users.write().await;
        check_unique(users.values(), None, &user.username, &user.email)?;

        let id = self.next_id.fetch_add(1, AtomicOrdering::SeqCst);
        let user = user.with_id(id);
        users.insert(id, user.clone());

        Ok(user)
    }

    async fn save(&self, user: User) -> AppResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(AppError::not_found(format!(
                "User not found with id: {}",
                user.id
            )));
        }
        check_unique(users.values(), Some(user.id), &user.username, &user.email)?;

        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Sort, UserRequest};

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser::from_request(UserRequest {
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            password: Some("SecurePass123!".to_string()),
            ..Default::default()
        })
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = InMemoryUserStore::new();

        let first = store.insert(new_user("alice", "alice@example.com")).await.unwrap();
        let second = store.insert(new_user("bob", "bob@example.com")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicate_username() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("alice", "alice@example.com")).await.unwrap();

        let err = store
            .insert(new_user("alice", "other@example.com"))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict(msg) if msg == "Username already exists: alice"));
    }

    #[tokio::test]
    async fn test_save_rejects_email_of_another_user() {
        let store = InMemoryUserStore::new();
        store.insert(new_user("alice", "alice@example.com")).await.unwrap();
        let mut bob = store.insert(new_user("bob", "bob@example.com")).await.unwrap();

        bob.email = "alice@example.com".to_string();
        let err = store.save(bob).await.unwrap_err();

        assert!(matches!(err, AppError::Conflict(msg) if msg == "Email already exists: alice@example.com"));
    }

    #[tokio::test]
    async fn test_save_keeps_own_email() {
        let store = InMemoryUserStore::new();
        let mut alice = store.insert(new_user("alice", "alice@example.com")).await.unwrap();

        alice.first_name = Some("Alice".to_string());
        let saved = store.save(alice).await.unwrap();

        assert_eq!(saved.first_name.as_deref(), Some("Alice"));
    }

    #[tokio::test]
    async fn test_save_unknown_id() {
        let store = InMemoryUserStore::new();
        let ghost = new_user("ghost", "ghost@example.com").with_id(42);

        let err = store.save(ghost).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_find_all_sorts_descending_by_username() {
        let store = InMemoryUserStore::new();
        for name in ["bravo", "alpha", "charlie"] {
            store
                .insert(new_user(name, &format!("{}@example.com", name)))
                .await
                .unwrap();
        }

        let page = PageRequest::new(
            0,
            10,
            Sort::new(SortField::Username, SortDirection::Desc),
        )
        .unwrap();
        let (users, total) = store.find_all(&page).await.unwrap();

        let names: Vec<_> = users.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["charlie", "bravo", "alpha"]);
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_search_filters_status_and_ignores_case() {
        let store = InMemoryUserStore::new();
        let john = store.insert(new_user("johndoe", "john@example.com")).await.unwrap();
        let mut bob = store.insert(new_user("bobsmith", "bob@example.com")).await.unwrap();
        bob.set_status(UserStatus::Inactive);
        store.save(bob).await.unwrap();

        let (users, total) = store
            .search("JOHN", UserStatus::Active, &PageRequest::default())
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(users[0].id, john.id);

        let (users, _) = store
            .search("bob", UserStatus::Active, &PageRequest::default())
            .await
            .unwrap();
        assert!(users.is_empty());
    }
}
