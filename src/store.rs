use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use chrono::Utc;
use uuid::Uuid;

use crate::models::key::ManagedKey;
use crate::models::operation::EncryptionOperation;
use crate::models::user::User;

// The service is intentionally persistence-free: everything lives in
// process memory behind a Mutex, managed as Rocket state. A restart
// loses users, keys, and audit records.

pub struct UserStore(Mutex<HashMap<String, User>>);

impl UserStore {
    pub fn new() -> Self {
        Self(Mutex::new(HashMap::new()))
    }

    /// Inserts a user keyed by username. Returns false if the username is
    /// already taken.
    pub fn insert(&self, user: User) -> bool {
        let mut users = self.0.lock().unwrap();
        if users.contains_key(&user.username) {
            return false;
        }
        users.insert(user.username.clone(), user);
        true
    }

    pub fn find_by_username(&self, username: &str) -> Option<User> {
        self.0.lock().unwrap().get(username).cloned()
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.0
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned()
    }

    pub fn touch_login(&self, username: &str) {
        if let Some(user) = self.0.lock().unwrap().get_mut(username) {
            user.last_login = Some(Utc::now());
        }
    }
}

pub struct TokenBlacklist(Mutex<HashSet<String>>);

impl TokenBlacklist {
    pub fn new() -> Self {
        Self(Mutex::new(HashSet::new()))
    }

    pub fn insert(&self, token: &str) {
        self.0.lock().unwrap().insert(token.to_string());
    }

    pub fn contains(&self, token: &str) -> bool {
        self.0.lock().unwrap().contains(token)
    }
}

pub struct KeyStore(Mutex<HashMap<Uuid, ManagedKey>>);

impl KeyStore {
    pub fn new() -> Self {
        Self(Mutex::new(HashMap::new()))
    }

    pub fn insert(&self, key: ManagedKey) {
        self.0.lock().unwrap().insert(key.id, key);
    }

    pub fn find(&self, id: Uuid) -> Option<ManagedKey> {
        self.0.lock().unwrap().get(&id).cloned()
    }

    /// Active keys owned by `owner`, newest first.
    pub fn list_for(&self, owner: &str) -> Vec<ManagedKey> {
        let mut keys: Vec<ManagedKey> = self
            .0
            .lock()
            .unwrap()
            .values()
            .filter(|k| k.owner == owner && k.is_active)
            .cloned()
            .collect();
        keys.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        keys
    }

    /// Soft delete. Returns false if no active key with that id belongs to
    /// `owner`.
    pub fn deactivate(&self, id: Uuid, owner: &str) -> bool {
        let mut keys = self.0.lock().unwrap();
        match keys.get_mut(&id) {
            Some(key) if key.owner == owner && key.is_active => {
                key.is_active = false;
                true
            }
            _ => false,
        }
    }
}

pub struct OperationLog(Mutex<Vec<EncryptionOperation>>);

impl OperationLog {
    pub fn new() -> Self {
        Self(Mutex::new(Vec::new()))
    }

    pub fn record(&self, op: EncryptionOperation) {
        self.0.lock().unwrap().push(op);
    }

    /// Audit records owned by `owner`, newest first.
    pub fn list_for(&self, owner: &str) -> Vec<EncryptionOperation> {
        let mut ops: Vec<EncryptionOperation> = self
            .0
            .lock()
            .unwrap()
            .iter()
            .filter(|op| op.owner == owner)
            .cloned()
            .collect();
        ops.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        ops
    }
}
