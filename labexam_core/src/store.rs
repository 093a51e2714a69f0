//! Profile store: CRUD and lifecycle for exam profiles plus favorites.
//!
//! The store is an explicit object owned by the caller (one per logical
//! session) and injected into collaborators; there is no ambient global
//! state and no concurrent-writer protection.

use crate::catalog::ReferenceCatalog;
use crate::types::{ExamProfile, ProfileSummary};
use crate::{Error, Result};
use chrono::Utc;
use std::collections::{BTreeMap, BTreeSet};

/// In-memory store of exam profiles and the independent favorites set.
///
/// Profile names are unique, case-sensitive keys. Default profiles are
/// seeded from the reference catalog and cannot be deleted.
#[derive(Clone, Debug, Default)]
pub struct ProfileStore {
    profiles: BTreeMap<String, ExamProfile>,
    favorites: BTreeSet<String>,
}

impl ProfileStore {
    /// Create an empty store with no profiles seeded
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-seeded with the catalog's default profiles
    pub fn with_defaults(catalog: &ReferenceCatalog) -> Self {
        let mut store = Self::new();
        store.seed_defaults(catalog);
        store
    }

    /// Seed one default profile per checkup-profile entry in the catalog.
    ///
    /// Idempotent per store lifetime: once any profile exists, seeding
    /// never runs again. Only categories present in the catalog are
    /// included; the description comes from the catalog's default
    /// description table (empty if none).
    pub fn seed_defaults(&mut self, catalog: &ReferenceCatalog) {
        if !self.profiles.is_empty() {
            return;
        }

        let now = Utc::now();
        for (name, category_names) in &catalog.checkup_profiles {
            let mut categories = BTreeMap::new();
            for category in category_names {
                if let Some(exams) = catalog.ranges.get(category) {
                    categories.insert(category.clone(), exams.keys().cloned().collect());
                }
            }

            let description = catalog.descriptions.get(name).cloned().unwrap_or_default();
            self.profiles.insert(
                name.clone(),
                ExamProfile {
                    name: name.clone(),
                    categories,
                    description,
                    is_default: true,
                    created_at: now,
                    last_used: now,
                },
            );
            tracing::debug!("default profile loaded: {name}");
        }
    }

    /// Create a new non-default profile.
    ///
    /// Fails with [`Error::DuplicateName`] on a case-sensitive name
    /// collision; the existing record is left untouched.
    pub fn create(
        &mut self,
        name: &str,
        categories: BTreeMap<String, Vec<String>>,
        description: &str,
    ) -> Result<ExamProfile> {
        if self.profiles.contains_key(name) {
            tracing::error!("profile '{name}' already exists");
            return Err(Error::DuplicateName(name.to_string()));
        }

        let now = Utc::now();
        let profile = ExamProfile {
            name: name.to_string(),
            categories,
            description: description.to_string(),
            is_default: false,
            created_at: now,
            last_used: now,
        };

        self.profiles.insert(name.to_string(), profile.clone());
        tracing::info!("profile created: {name}");
        Ok(profile)
    }

    /// Fetch a profile for use.
    ///
    /// Every fetch counts as a use: the stored record's `last_used` is
    /// bumped before the copy is returned.
    pub fn get(&mut self, name: &str) -> Result<ExamProfile> {
        let profile = self
            .profiles
            .get_mut(name)
            .ok_or_else(|| Error::NotFound(format!("profile '{name}'")))?;
        profile.mark_used();
        Ok(profile.clone())
    }

    /// Read a profile without counting a use
    pub fn peek(&self, name: &str) -> Option<&ExamProfile> {
        self.profiles.get(name)
    }

    /// Summaries of every stored profile, in name order.
    ///
    /// A read projection: building it never mutates `last_used`.
    pub fn list(&self) -> Vec<ProfileSummary> {
        self.profiles
            .values()
            .map(|p| ProfileSummary {
                name: p.name.clone(),
                description: p.description.clone(),
                exam_count: p.exam_count(),
                category_count: p.category_count(),
                is_default: p.is_default,
                is_favorite: self.favorites.contains(&p.name),
                last_used: p.last_used,
            })
            .collect()
    }

    /// Delete a profile and its favorites entry.
    ///
    /// Default profiles are protected. Nothing changes on failure.
    pub fn delete(&mut self, name: &str) -> Result<()> {
        let profile = self
            .profiles
            .get(name)
            .ok_or_else(|| Error::NotFound(format!("profile '{name}'")))?;

        if profile.is_default {
            tracing::error!("cannot delete default profile '{name}'");
            return Err(Error::Protected(name.to_string()));
        }

        self.profiles.remove(name);
        self.favorites.remove(name);
        tracing::info!("profile deleted: {name}");
        Ok(())
    }

    /// Flip favorite membership for an existing profile.
    ///
    /// Returns the new membership state.
    pub fn toggle_favorite(&mut self, name: &str) -> Result<bool> {
        if !self.profiles.contains_key(name) {
            return Err(Error::NotFound(format!("profile '{name}'")));
        }

        if self.favorites.remove(name) {
            tracing::debug!("profile removed from favorites: {name}");
            Ok(false)
        } else {
            self.favorites.insert(name.to_string());
            tracing::debug!("profile marked as favorite: {name}");
            Ok(true)
        }
    }

    pub fn is_favorite(&self, name: &str) -> bool {
        self.favorites.contains(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Drop all profiles and favorites. A subsequent
    /// [`ProfileStore::seed_defaults`] call will seed again.
    pub fn reset(&mut self) {
        self.profiles.clear();
        self.favorites.clear();
        tracing::info!("profile store reset");
    }

    pub(crate) fn profiles(&self) -> &BTreeMap<String, ExamProfile> {
        &self.profiles
    }

    pub(crate) fn favorites(&self) -> &BTreeSet<String> {
        &self.favorites
    }

    pub(crate) fn replace(
        &mut self,
        profiles: BTreeMap<String, ExamProfile>,
        favorites: BTreeSet<String>,
    ) {
        self.profiles = profiles;
        self.favorites = favorites;
    }
}
