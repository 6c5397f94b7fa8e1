//! SheetStore - the single owner of the character being edited
//!
//! Every operation is synchronous and ends by notifying each subscriber, in
//! subscription order, with its own copy of the resulting state. A panicking
//! subscriber is logged and skipped; the remaining subscribers still run.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use fatesheet_domain::{
    Ability, AbilityId, CharacterState, Descriptor, DescriptorId, IdGenerator, LadderType,
    MetadataPatch, SkillEntry, StateReplacement,
};

/// Callback invoked with a snapshot after every store operation.
pub type Listener = Box<dyn FnMut(CharacterState) + Send>;

/// Handle returned by [`SheetStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

pub struct SheetStore {
    state: CharacterState,
    ids: Arc<dyn IdGenerator>,
    listeners: Vec<(Subscription, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for SheetStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SheetStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SheetStore {
    pub fn new(initial: CharacterState, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            state: initial,
            ids,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &CharacterState {
        &self.state
    }

    pub fn snapshot(&self) -> CharacterState {
        self.state.clone()
    }

    pub fn id_generator(&self) -> Arc<dyn IdGenerator> {
        Arc::clone(&self.ids)
    }

    // =========================================================================
    // Subscriptions
    // =========================================================================

    pub fn subscribe(&mut self, listener: impl FnMut(CharacterState) + Send + 'static) -> Subscription {
        self.next_subscription += 1;
        let subscription = Subscription(self.next_subscription);
        self.listeners.push((subscription, Box::new(listener)));
        subscription
    }

    /// Returns false if the subscription was already removed.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(s, _)| *s != subscription);
        self.listeners.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    fn notify(&mut self) {
        for (subscription, listener) in self.listeners.iter_mut() {
            let snapshot = self.state.clone();
            let result = panic::catch_unwind(AssertUnwindSafe(|| listener(snapshot)));
            if let Err(payload) = result {
                let message = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "non-string panic payload".to_string());
                tracing::error!(
                    subscription = subscription.0,
                    panic = %message,
                    "Sheet subscriber panicked"
                );
            }
        }
    }

    /// Run a mutation and notify afterwards.
    fn mutate<T>(&mut self, f: impl FnOnce(&mut CharacterState) -> T) -> T {
        let result = f(&mut self.state);
        self.notify();
        result
    }

    // =========================================================================
    // Metadata
    // =========================================================================

    pub fn set_metadata(&mut self, patch: MetadataPatch) {
        self.mutate(|s| s.apply_metadata(patch));
    }

    /// `None` restores the default bank.
    pub fn set_skill_bank(&mut self, bank: Option<Vec<String>>) {
        self.mutate(|s| s.set_skill_bank(bank));
    }

    /// Switch the ladder frame without touching entries.
    pub fn change_ladder_type(&mut self, ladder_type: LadderType) {
        tracing::info!(ladder_type = %ladder_type, "Ladder type changed");
        self.mutate(|s| s.change_ladder_type(ladder_type));
    }

    // =========================================================================
    // Collections
    // =========================================================================

    /// Raw commit primitive for the ladder. Does not check the pyramid rule;
    /// callers validate first.
    pub fn set_skills(&mut self, skills: Vec<SkillEntry>) {
        let dropped = self.mutate(|s| s.set_skills(skills));
        if dropped > 0 {
            tracing::warn!(dropped, "Dropped malformed skill entries");
        }
    }

    pub fn set_descriptors(&mut self, descriptors: Vec<Descriptor>) {
        let dropped = self.mutate(|s| s.set_descriptors(descriptors));
        if dropped > 0 {
            tracing::warn!(dropped, "Dropped malformed descriptors");
        }
    }

    pub fn set_abilities(&mut self, abilities: Vec<Ability>) {
        let dropped = self.mutate(|s| s.set_abilities(abilities));
        if dropped > 0 {
            tracing::warn!(dropped, "Dropped malformed abilities");
        }
    }

    /// Substitute the parts present in `replacement`; the rest is kept.
    pub fn replace_state(&mut self, replacement: StateReplacement) {
        self.mutate(|s| s.replace(replacement));
    }

    /// Clear everything but the metadata.
    pub fn reset_for_new_character(&mut self) {
        tracing::info!("Sheet reset for a new character");
        self.mutate(CharacterState::reset_for_new_character);
    }

    // =========================================================================
    // Descriptors
    // =========================================================================

    pub fn update_descriptor_text(&mut self, id: &str, text: &str, mark_edited: bool) -> bool {
        self.mutate(|s| s.update_descriptor_text(id, text, mark_edited))
    }

    pub fn rename_descriptor(&mut self, id: &str, name: &str) -> bool {
        self.mutate(|s| s.rename_descriptor(id, name))
    }

    pub fn toggle_descriptor_lock(&mut self, id: &str) -> bool {
        self.mutate(|s| s.toggle_descriptor_lock(id))
    }

    pub fn remove_descriptor(&mut self, id: &str) -> bool {
        self.mutate(|s| s.remove_descriptor(id))
    }

    /// Add a user-written extra descriptor. Returns its identity, or `None`
    /// when the name is blank.
    pub fn add_descriptor(&mut self, name: &str, description: &str) -> Option<DescriptorId> {
        let id = DescriptorId::new(self.ids.next_id("aspect"));
        let mut descriptor = Descriptor::new(id.clone(), name.trim()).with_description(description);
        descriptor.user_edited = true;
        self.mutate(|s| s.add_descriptor(descriptor)).then_some(id)
    }

    // =========================================================================
    // Abilities
    // =========================================================================

    pub fn update_ability_text(&mut self, id: &str, text: &str, mark_edited: bool) -> bool {
        self.mutate(|s| s.update_ability_text(id, text, mark_edited))
    }

    pub fn rename_ability(&mut self, id: &str, name: &str) -> bool {
        self.mutate(|s| s.rename_ability(id, name))
    }

    pub fn toggle_ability_lock(&mut self, id: &str) -> bool {
        self.mutate(|s| s.toggle_ability_lock(id))
    }

    pub fn remove_ability(&mut self, id: &str) -> bool {
        self.mutate(|s| s.remove_ability(id))
    }

    /// Add a user-written ability. Returns `None` when both name and
    /// description are blank.
    pub fn add_ability(&mut self, name: &str, description: &str) -> Option<AbilityId> {
        let id = AbilityId::new(self.ids.next_id("stunt"));
        let mut ability = Ability::new(id.clone(), name.trim()).with_description(description);
        ability.user_edited = true;
        self.mutate(|s| s.add_ability(ability)).then_some(id)
    }

    // =========================================================================
    // Skills
    // =========================================================================

    pub fn toggle_skill_lock(&mut self, id: &str) -> bool {
        self.mutate(|s| s.toggle_skill_lock(id))
    }
}
