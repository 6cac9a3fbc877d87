//! # In-memory document store
//!
//! One `DashMap` per collection keyed by document id. Secondary lookups
//! (slug, external id, status) are scans; at CMS scale that is cheap and it
//! keeps every write a single-document operation. Listings come back in id
//! order, which for UUID v7 is creation order.

mod comments;
mod posts;
mod taxonomy;
mod users;

use dashmap::DashMap;
use domains::{AppError, Category, Comment, Post, Region, Settings, User};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    categories: DashMap<Uuid, Category>,
    regions: DashMap<Uuid, Region>,
    posts: DashMap<Uuid, Post>,
    comments: DashMap<Uuid, Comment>,
    settings: RwLock<Option<Settings>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Clones every document matching `keep`, sorted by id.
fn collect_sorted<T, F>(map: &DashMap<Uuid, T>, keep: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    let mut entries: Vec<(Uuid, T)> = map
        .iter()
        .filter(|entry| keep(entry.value()))
        .map(|entry| (*entry.key(), entry.value().clone()))
        .collect();
    entries.sort_by_key(|(id, _)| *id);
    entries.into_iter().map(|(_, doc)| doc).collect()
}

fn find_first<T, F>(map: &DashMap<Uuid, T>, keep: F) -> Option<T>
where
    T: Clone,
    F: Fn(&T) -> bool,
{
    collect_sorted(map, keep).into_iter().next()
}

/// Replaces an existing document; missing documents are an error.
fn replace<T>(map: &DashMap<Uuid, T>, id: Uuid, doc: T, entity: &str) -> domains::Result<()> {
    match map.get_mut(&id) {
        Some(mut slot) => {
            *slot = doc;
            Ok(())
        }
        None => Err(AppError::not_found(entity)),
    }
}

fn insert_new<T>(map: &DashMap<Uuid, T>, id: Uuid, doc: T, entity: &str) -> domains::Result<()> {
    match map.entry(id) {
        dashmap::mapref::entry::Entry::Occupied(_) => {
            Err(AppError::conflict(format!("{entity} {id} already exists")))
        }
        dashmap::mapref::entry::Entry::Vacant(slot) => {
            slot.insert(doc);
            Ok(())
        }
    }
}
