//! Item store: the aggregate owning all items and both checkups.
//!
//! # Responsibility
//! - Be the only mutation and query boundary for items and checkups.
//! - Persist the affected aggregate through a `BlobRepository` after every
//!   mutation, then notify subscribers.
//!
//! # Invariants
//! - In-memory state is authoritative; persistence is best-effort. Read and
//!   write failures are logged and swallowed, never surfaced to callers.
//! - Operations on unknown item ids are silent no-ops.
//! - Items keep insertion order; queries preserve it.
//! - "Now" always comes from the store's `Clock`.

use crate::clock::{Clock, SystemClock};
use crate::model::checkup::Checkup;
use crate::model::item::{
    clamp_glyph, ItemId, ItemStatus, ItemType, ItemValidationError, OwnedItem,
};
use crate::model::time_span::month_start;
use crate::repo::blob_repo::BlobRepository;
use crate::service::sample_data::sample_items;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt::{Display, Formatter};

pub const ITEMS_KEY: &str = "items";
pub const KEEP_CHECKUP_KEY: &str = "keepCheckup";
pub const GIVE_CHECKUP_KEY: &str = "giveCheckup";
pub const ONBOARDING_KEY: &str = "hasCompletedOnboarding";

/// Which of the two recurring checkups an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CheckupKind {
    /// Review kept items; unused ones move to Give.
    Keep,
    /// Review items waiting to be given away; donate or keep them.
    Give,
}

impl CheckupKind {
    pub const ALL: [CheckupKind; 2] = [CheckupKind::Keep, CheckupKind::Give];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Keep => "keep",
            Self::Give => "give",
        }
    }
}

impl Display for CheckupKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Part of the store state that changed. Delivered after persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    Items,
    Checkups,
    Onboarding,
}

pub type SubscriptionId = u64;

type Listener = Box<dyn Fn(StoreChange)>;

/// Add-item form input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItemRequest {
    pub name: String,
    /// Raw glyph input; only the first grapheme is kept.
    pub glyph: String,
    pub received_year: i32,
    /// `1..=12`.
    pub received_month: u32,
    pub item_type: ItemType,
}

/// Owner of the item collection, the Keep and Give checkups and the
/// onboarding flag.
pub struct ItemStore<R: BlobRepository> {
    repo: R,
    clock: Box<dyn Clock>,
    items: Vec<OwnedItem>,
    keep_checkup: Checkup,
    give_checkup: Checkup,
    onboarding_completed: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription_id: SubscriptionId,
}

impl<R: BlobRepository> ItemStore<R> {
    /// Loads persisted state using the wall clock.
    pub fn open(repo: R) -> Self {
        Self::open_with_clock(repo, SystemClock)
    }

    /// Loads persisted state, falling back to an empty list and default
    /// checkups for anything missing or undecodable.
    pub fn open_with_clock(repo: R, clock: impl Clock + 'static) -> Self {
        let now = clock.now();
        let items: Vec<OwnedItem> = load_blob(&repo, ITEMS_KEY).unwrap_or_default();
        let keep_checkup =
            load_blob(&repo, KEEP_CHECKUP_KEY).unwrap_or_else(|| Checkup::starting_month_of(now));
        let give_checkup =
            load_blob(&repo, GIVE_CHECKUP_KEY).unwrap_or_else(|| Checkup::starting_month_of(now));
        let onboarding_completed = load_blob(&repo, ONBOARDING_KEY).unwrap_or(false);

        info!(
            "event=store_open module=store status=ok item_count={} onboarding_completed={onboarding_completed}",
            items.len()
        );

        Self {
            repo,
            clock: Box::new(clock),
            items,
            keep_checkup,
            give_checkup,
            onboarding_completed,
            listeners: Vec::new(),
            next_subscription_id: 1,
        }
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }

    pub fn into_repo(self) -> R {
        self.repo
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Registers a listener called after every persisted mutation.
    pub fn subscribe(&mut self, listener: impl Fn(StoreChange) + 'static) -> SubscriptionId {
        let id = self.next_subscription_id;
        self.next_subscription_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns whether the subscription existed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    /// Appends a fully formed item. No validation happens here.
    pub fn add(&mut self, item: OwnedItem) {
        debug!("event=item_add module=store item_id={}", item.id);
        self.items.push(item);
        self.items_changed();
    }

    /// Builds, validates and adds an item from add-item form input.
    pub fn create_item(&mut self, request: NewItemRequest) -> Result<ItemId, ItemValidationError> {
        let received = month_start(request.received_year, request.received_month).ok_or(
            ItemValidationError::InvalidReceivedMonth {
                year: request.received_year,
                month: request.received_month,
            },
        )?;

        let item = OwnedItem::new(
            request.name.trim(),
            clamp_glyph(&request.glyph),
            received,
            request.item_type,
            self.now(),
        );
        item.validate()?;

        let id = item.id;
        self.add(item);
        Ok(id)
    }

    /// Removes every item whose id is in `ids`. Returns the number removed.
    ///
    /// The items blob is always rewritten, but subscribers hear about it only
    /// when at least one item was removed.
    pub fn delete(&mut self, ids: &HashSet<ItemId>) -> usize {
        let before = self.items.len();
        self.items.retain(|item| !ids.contains(&item.id));
        let removed = before - self.items.len();

        debug!("event=item_delete module=store requested={} removed={removed}", ids.len());
        if removed > 0 {
            self.items_changed();
        } else {
            self.save_items();
        }
        removed
    }

    /// Overwrites an item's status. Returns `false` (and does nothing) when
    /// the id is unknown.
    pub fn update_status(&mut self, id: ItemId, status: ItemStatus) -> bool {
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            debug!("event=item_status module=store status=skipped reason=not_found item_id={id}");
            return false;
        };

        debug!(
            "event=item_status module=store item_id={id} from={} to={status}",
            item.status
        );
        item.status = status;
        self.items_changed();
        true
    }

    /// Records that an item was used now. Returns `false` for unknown ids.
    pub fn mark_used(&mut self, id: ItemId) -> bool {
        let now = self.now();
        let Some(item) = self.items.iter_mut().find(|item| item.id == id) else {
            return false;
        };
        item.last_used_date = now;
        self.items_changed();
        true
    }

    /// Seeds demo items when the collection is empty. Returns how many were
    /// added; repeated calls never duplicate them.
    pub fn load_sample_data(&mut self) -> usize {
        if !self.items.is_empty() {
            return 0;
        }
        self.items = sample_items(self.now());
        info!("event=sample_data module=store status=ok item_count={}", self.items.len());
        self.items_changed();
        self.items.len()
    }

    pub fn items(&self) -> &[OwnedItem] {
        &self.items
    }

    pub fn item(&self, id: ItemId) -> Option<&OwnedItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn items_with_status(&self, status: ItemStatus) -> Vec<&OwnedItem> {
        self.filtered_items(status, None)
    }

    pub fn items_with_type(&self, item_type: ItemType) -> Vec<&OwnedItem> {
        self.items
            .iter()
            .filter(|item| item.item_type == item_type)
            .collect()
    }

    /// Status view narrowed by an optional category filter.
    pub fn filtered_items(&self, status: ItemStatus, item_type: Option<ItemType>) -> Vec<&OwnedItem> {
        self.items
            .iter()
            .filter(|item| item.status == status)
            .filter(|item| item_type.map_or(true, |wanted| item.item_type == wanted))
            .collect()
    }

    pub fn checkup(&self, kind: CheckupKind) -> &Checkup {
        match kind {
            CheckupKind::Keep => &self.keep_checkup,
            CheckupKind::Give => &self.give_checkup,
        }
    }

    fn checkup_mut(&mut self, kind: CheckupKind) -> &mut Checkup {
        match kind {
            CheckupKind::Keep => &mut self.keep_checkup,
            CheckupKind::Give => &mut self.give_checkup,
        }
    }

    /// Marks the checkup completed now.
    pub fn complete_checkup(&mut self, kind: CheckupKind) {
        let now = self.now();
        self.checkup_mut(kind).complete(now);
        info!("event=checkup_complete module=store kind={kind}");
        self.checkups_changed();
    }

    /// Changes the checkup interval (clamped to `1..=12`). Returns the stored
    /// interval.
    pub fn change_checkup_interval(&mut self, kind: CheckupKind, months: u32) -> u32 {
        let stored = self.checkup_mut(kind).set_interval(months);
        info!(
            "event=checkup_interval module=store kind={kind} requested={months} stored={stored}"
        );
        self.checkups_changed();
        stored
    }

    pub fn is_checkup_due(&self, kind: CheckupKind) -> bool {
        self.checkup(kind).is_due(self.now())
    }

    pub fn complete_keep_checkup(&mut self) {
        self.complete_checkup(CheckupKind::Keep);
    }

    pub fn complete_give_checkup(&mut self) {
        self.complete_checkup(CheckupKind::Give);
    }

    pub fn change_keep_checkup_interval(&mut self, months: u32) -> u32 {
        self.change_checkup_interval(CheckupKind::Keep, months)
    }

    pub fn change_give_checkup_interval(&mut self, months: u32) -> u32 {
        self.change_checkup_interval(CheckupKind::Give, months)
    }

    pub fn keep_checkup_interval(&self) -> u32 {
        self.keep_checkup.interval_months()
    }

    pub fn give_checkup_interval(&self) -> u32 {
        self.give_checkup.interval_months()
    }

    pub fn last_keep_checkup(&self) -> DateTime<Utc> {
        self.keep_checkup.last_checkup_date()
    }

    pub fn last_give_checkup(&self) -> DateTime<Utc> {
        self.give_checkup.last_checkup_date()
    }

    pub fn is_keep_checkup_due(&self) -> bool {
        self.is_checkup_due(CheckupKind::Keep)
    }

    pub fn is_give_checkup_due(&self) -> bool {
        self.is_checkup_due(CheckupKind::Give)
    }

    pub fn next_keep_checkup(&self) -> DateTime<Utc> {
        self.keep_checkup.next_due_date()
    }

    pub fn next_give_checkup(&self) -> DateTime<Utc> {
        self.give_checkup.next_due_date()
    }

    pub fn has_completed_onboarding(&self) -> bool {
        self.onboarding_completed
    }

    pub fn complete_onboarding(&mut self) {
        self.onboarding_completed = true;
        self.save_blob(ONBOARDING_KEY, &self.onboarding_completed);
        self.notify(StoreChange::Onboarding);
    }

    fn items_changed(&mut self) {
        self.save_items();
        self.notify(StoreChange::Items);
    }

    fn checkups_changed(&mut self) {
        self.save_blob(KEEP_CHECKUP_KEY, &self.keep_checkup);
        self.save_blob(GIVE_CHECKUP_KEY, &self.give_checkup);
        self.notify(StoreChange::Checkups);
    }

    fn save_items(&self) {
        self.save_blob(ITEMS_KEY, &self.items);
    }

    /// Failures only log.
    fn save_blob<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        let encoded = match serde_json::to_vec(value) {
            Ok(encoded) => encoded,
            Err(err) => {
                warn!("event=store_save module=store status=error key={key} reason=encode_failed error={err}");
                return;
            }
        };

        if let Err(err) = self.repo.put_blob(key, &encoded) {
            warn!("event=store_save module=store status=error key={key} reason=write_failed error={err}");
        }
    }

    fn notify(&self, change: StoreChange) {
        for (_, listener) in &self.listeners {
            listener(change);
        }
    }
}

fn load_blob<T: DeserializeOwned>(repo: &impl BlobRepository, key: &str) -> Option<T> {
    let bytes = match repo.get_blob(key) {
        Ok(Some(bytes)) => bytes,
        Ok(None) => return None,
        Err(err) => {
            warn!("event=store_load module=store status=fallback key={key} reason=read_failed error={err}");
            return None;
        }
    };

    match serde_json::from_slice(&bytes) {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("event=store_load module=store status=fallback key={key} reason=decode_failed error={err}");
            None
        }
    }
}
