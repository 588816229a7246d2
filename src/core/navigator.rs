//! Module Navigator: navigation over the fixed module set
//!
//! Intents:
//! - open(m): HOME/OPEN/LOCKED → OPEN(m), unless m is gated and still locked
//! - challenge(m): → LOCKED(m) for a gated, locked module (its puzzle view)
//! - go_home(): → HOME, unless the home affordance is disabled
//!
//! Rejected intents leave the state untouched and report a reason code.

use std::collections::BTreeMap;
use serde::{Deserialize, Serialize};
use crate::types::{ModuleContent, ModuleId, ModuleState, Permission, PermissionKind, ReasonCode, UnlockState};

/// Result of one navigation intent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NavOutcome {
    pub state: ModuleState,
    pub changed: bool,
    pub reason: ReasonCode,
}

#[derive(Debug, Clone)]
pub struct ModuleNavigator {
    state: ModuleState,
    /// Unlock flag per gated module; modules absent here are always open
    gates: BTreeMap<ModuleId, bool>,
    permissions: BTreeMap<PermissionKind, Permission>,
    home_enabled: bool,
    /// Transitions that actually happened, oldest first
    history: Vec<(ModuleState, ModuleState)>,
}

impl Default for ModuleNavigator {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleNavigator {
    pub fn new() -> Self {
        Self {
            state: ModuleState::Home,
            gates: BTreeMap::new(),
            permissions: BTreeMap::new(),
            home_enabled: true,
            history: Vec::new(),
        }
    }

    /// Put `module` behind an unlock gate, initially locked
    pub fn gate(mut self, module: ModuleId) -> Self {
        self.gates.insert(module, false);
        self
    }

    pub fn with_gates(modules: &[ModuleId]) -> Self {
        modules.iter().fold(Self::new(), |nav, m| nav.gate(*m))
    }

    /// Feed the evaluator's unlock state into a module's gate.
    /// Ignored for modules that are not gated.
    pub fn update_gate(&mut self, module: ModuleId, unlock: &UnlockState) {
        if let Some(open) = self.gates.get_mut(&module) {
            if unlock.is_unlocked && !*open {
                log::info!("module {} unlocked", module);
            }
            *open = *open || unlock.is_unlocked;
        }
    }

    /// True when `module` may be opened
    pub fn is_available(&self, module: ModuleId) -> bool {
        self.gates.get(&module).copied().unwrap_or(true)
    }

    pub fn is_gated(&self, module: ModuleId) -> bool {
        self.gates.contains_key(&module)
    }

    pub fn open(&mut self, module: ModuleId) -> NavOutcome {
        if !self.is_available(module) {
            log::debug!("open {} rejected: still locked", module);
            return self.unchanged(ReasonCode::R004_MODULE_GATED);
        }
        self.transition(ModuleState::Open(module), ReasonCode::R004_MODULE_OPENED)
    }

    /// Show the lock puzzle for a gated module. Unlocked or ungated modules open directly.
    pub fn challenge(&mut self, module: ModuleId) -> NavOutcome {
        if self.is_available(module) {
            return self.open(module);
        }
        self.transition(ModuleState::Locked(module), ReasonCode::R004_MODULE_CHALLENGED)
    }

    pub fn go_home(&mut self) -> NavOutcome {
        if !self.home_enabled {
            log::debug!("home rejected: disabled");
            return self.unchanged(ReasonCode::R004_HOME_DISABLED);
        }
        self.transition(ModuleState::Home, ReasonCode::R004_HOME)
    }

    pub fn set_home_enabled(&mut self, enabled: bool) {
        self.home_enabled = enabled;
    }

    pub fn home_enabled(&self) -> bool {
        self.home_enabled
    }

    pub fn set_permission(&mut self, kind: PermissionKind, permission: Permission) {
        self.permissions.insert(kind, permission);
    }

    /// Last answer for `kind`; pending until the collaborator reports
    pub fn permission(&self, kind: PermissionKind) -> Permission {
        self.permissions.get(&kind).copied().unwrap_or_default()
    }

    /// Content a module shows given the permission collaborator's answers
    pub fn content(&self, module: ModuleId) -> ModuleContent {
        match module.required_permission() {
            None => ModuleContent::Live,
            Some(kind) => self.permission(kind).into(),
        }
    }

    pub fn state(&self) -> ModuleState {
        self.state
    }

    pub fn history(&self) -> &[(ModuleState, ModuleState)] {
        &self.history
    }

    /// Modules currently unlocked, for persisting progress
    pub fn unlocked_modules(&self) -> Vec<ModuleId> {
        self.gates
            .iter()
            .filter(|(_, open)| **open)
            .map(|(m, _)| *m)
            .collect()
    }

    /// Session restart: home, gates relocked, history cleared
    pub fn reset(&mut self) {
        self.state = ModuleState::Home;
        self.home_enabled = true;
        self.history.clear();
        for open in self.gates.values_mut() {
            *open = false;
        }
    }

    fn transition(&mut self, next: ModuleState, reason: ReasonCode) -> NavOutcome {
        if next == self.state {
            return self.unchanged(ReasonCode::R004_UNCHANGED);
        }
        self.history.push((self.state, next));
        self.state = next;
        NavOutcome {
            state: next,
            changed: true,
            reason,
        }
    }

    fn unchanged(&self, reason: ReasonCode) -> NavOutcome {
        NavOutcome {
            state: self.state,
            changed: false,
            reason,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unlocked() -> UnlockState {
        UnlockState {
            is_unlocked: true,
            threshold: 2.0,
        }
    }

    #[test]
    fn test_starts_home() {
        let nav = ModuleNavigator::new();
        assert_eq!(nav.state(), ModuleState::Home);
        assert!(nav.home_enabled());
    }

    #[test]
    fn test_open_ungated_module() {
        let mut nav = ModuleNavigator::new();
        let out = nav.open(ModuleId::Terminal);
        assert!(out.changed);
        assert_eq!(out.state, ModuleState::Open(ModuleId::Terminal));
        assert_eq!(out.reason, ReasonCode::R004_MODULE_OPENED);
    }

    #[test]
    fn test_gated_open_is_soft_noop() {
        let mut nav = ModuleNavigator::new().gate(ModuleId::Camera);
        let out = nav.open(ModuleId::Camera);
        assert!(!out.changed);
        assert_eq!(out.state, ModuleState::Home);
        assert_eq!(out.reason, ReasonCode::R004_MODULE_GATED);
        assert!(nav.history().is_empty());
    }

    #[test]
    fn test_is_gated() {
        let nav = ModuleNavigator::with_gates(&[ModuleId::Camera]);
        assert!(nav.is_gated(ModuleId::Camera));
        assert!(!nav.is_gated(ModuleId::Logs));
    }

    #[test]
    fn test_gate_opens_after_unlock() {
        let mut nav = ModuleNavigator::new().gate(ModuleId::Camera);
        nav.update_gate(ModuleId::Camera, &unlocked());
        assert_eq!(nav.open(ModuleId::Camera).state, ModuleState::Open(ModuleId::Camera));
        assert_eq!(nav.unlocked_modules(), vec![ModuleId::Camera]);
    }

    #[test]
    fn test_gate_does_not_relock_on_locked_state() {
        let mut nav = ModuleNavigator::new().gate(ModuleId::Camera);
        nav.update_gate(ModuleId::Camera, &unlocked());
        nav.update_gate(ModuleId::Camera, &UnlockState::locked(2.0));
        assert!(nav.is_available(ModuleId::Camera));
    }

    #[test]
    fn test_challenge_enters_locked_then_opens() {
        let mut nav = ModuleNavigator::new().gate(ModuleId::Compass);
        let out = nav.challenge(ModuleId::Compass);
        assert_eq!(out.state, ModuleState::Locked(ModuleId::Compass));
        nav.update_gate(ModuleId::Compass, &unlocked());
        let out = nav.open(ModuleId::Compass);
        assert_eq!(out.state, ModuleState::Open(ModuleId::Compass));
        assert_eq!(nav.history().len(), 2);
    }

    #[test]
    fn test_home_disabled() {
        let mut nav = ModuleNavigator::new();
        nav.open(ModuleId::Logs);
        nav.set_home_enabled(false);
        let out = nav.go_home();
        assert!(!out.changed);
        assert_eq!(out.reason, ReasonCode::R004_HOME_DISABLED);
        nav.set_home_enabled(true);
        assert_eq!(nav.go_home().state, ModuleState::Home);
    }

    #[test]
    fn test_same_state_is_unchanged() {
        let mut nav = ModuleNavigator::new();
        let out = nav.go_home();
        assert!(!out.changed);
        assert_eq!(out.reason, ReasonCode::R004_UNCHANGED);
    }

    #[test]
    fn test_content_gating() {
        let mut nav = ModuleNavigator::new();
        assert_eq!(nav.content(ModuleId::Camera), ModuleContent::AwaitingPermission);
        nav.set_permission(PermissionKind::Camera, Permission::Denied);
        assert_eq!(nav.content(ModuleId::Camera), ModuleContent::Denied);
        assert_eq!(nav.content(ModuleId::Terminal), ModuleContent::Live);
    }

    #[test]
    fn test_reset_relocks() {
        let mut nav = ModuleNavigator::with_gates(&[ModuleId::Camera]);
        nav.update_gate(ModuleId::Camera, &unlocked());
        nav.open(ModuleId::Camera);
        nav.reset();
        assert_eq!(nav.state(), ModuleState::Home);
        assert!(!nav.is_available(ModuleId::Camera));
    }
}
