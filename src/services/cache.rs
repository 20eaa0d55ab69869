use std::collections::{HashMap, HashSet};
use std::future::Future;

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use tokio::sync::RwLock;

pub const PRODUCTS_TAG: &str = "productsCache";
pub const USERS_TAG: &str = "usersCache";

/// Résultat d'une lecture: trouvé dans le cache ou chargé
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn message(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "Data is in cache.",
            CacheStatus::Miss => "Data is not in cache yet.",
        }
    }
}

#[derive(Debug)]
struct CacheEntry {
    value: Value,
    tags: HashSet<String>,
    expires_at: Option<DateTime<Utc>>,
}

impl CacheEntry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_none_or(|at| now < at)
    }
}

/// Cache clé/valeur JSON partagé entre les requêtes, invalidable par tags
///
/// Deux requêtes qui ratent la même clé en même temps chargent toutes les
/// deux; la dernière écriture gagne.
#[derive(Debug)]
pub struct TagCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
    ttl: Option<Duration>,
}

impl TagCache {
    /// `ttl_seconds == 0` : pas d'expiration
    pub fn new(ttl_seconds: u64) -> Self {
        let ttl = (ttl_seconds > 0).then(|| Duration::seconds(ttl_seconds as i64));
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Lit `key`, ou exécute `loader` et stocke le résultat avec `tags`
    /// Une erreur du loader est propagée et rien n'est stocké
    pub async fn get_or_try_insert<F, Fut, E>(
        &self,
        key: &str,
        tags: &[&str],
        loader: F,
    ) -> Result<(Value, CacheStatus), E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        let now = Utc::now();
        {
            let entries = self.entries.read().await;
            if let Some(entry) = entries.get(key).filter(|e| e.is_live(now)) {
                tracing::debug!(key, "cache hit");
                return Ok((entry.value.clone(), CacheStatus::Hit));
            }
        }

        tracing::debug!(key, "cache miss");
        let value = loader().await?;

        let entry = CacheEntry {
            value: value.clone(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
            expires_at: self.ttl.map(|ttl| Utc::now() + ttl),
        };
        self.entries.write().await.insert(key.to_string(), entry);

        Ok((value, CacheStatus::Miss))
    }

    /// Supprime toutes les entrées portant au moins un des tags
    pub async fn invalidate_tags(&self, tags: &[&str]) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !tags.iter().any(|t| entry.tags.contains(*t)));
        let removed = before - entries.len();

        if removed > 0 {
            tracing::debug!(?tags, removed, "cache invalidated");
        }
        removed
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
