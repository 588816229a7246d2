//! Device modules, navigation state and permission gating

use serde::{Deserialize, Serialize};

/// The fixed set of fake device modules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleId {
    Logs,
    Terminal,
    Camera,
    Audio,
    System,
    Compass,
}

impl ModuleId {
    pub const ALL: [ModuleId; 6] = [
        ModuleId::Logs,
        ModuleId::Terminal,
        ModuleId::Camera,
        ModuleId::Audio,
        ModuleId::System,
        ModuleId::Compass,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ModuleId::Logs => "logs",
            ModuleId::Terminal => "terminal",
            ModuleId::Camera => "camera",
            ModuleId::Audio => "audio",
            ModuleId::System => "system",
            ModuleId::Compass => "compass",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL.into_iter().find(|m| m.name().eq_ignore_ascii_case(s))
    }

    /// Device permission the module's content sits behind, if any
    pub fn required_permission(&self) -> Option<PermissionKind> {
        match self {
            ModuleId::Camera => Some(PermissionKind::Camera),
            ModuleId::Audio => Some(PermissionKind::Microphone),
            ModuleId::System | ModuleId::Compass => Some(PermissionKind::Motion),
            ModuleId::Logs | ModuleId::Terminal => None,
        }
    }
}

impl std::fmt::Display for ModuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Where the player currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "module", rename_all = "snake_case")]
pub enum ModuleState {
    #[default]
    Home,
    Open(ModuleId),
    /// Puzzle view of a gated module that is not yet unlocked
    Locked(ModuleId),
}

impl ModuleState {
    pub fn module(&self) -> Option<ModuleId> {
        match self {
            ModuleState::Home => None,
            ModuleState::Open(m) | ModuleState::Locked(m) => Some(*m),
        }
    }
}

impl std::fmt::Display for ModuleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ModuleState::Home => write!(f, "HOME"),
            ModuleState::Open(m) => write!(f, "OPEN({})", m),
            ModuleState::Locked(m) => write!(f, "LOCKED({})", m),
        }
    }
}

/// Device capability behind a permission prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionKind {
    Camera,
    Microphone,
    Motion,
}

/// Answer reported by the permission collaborator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Permission {
    Granted,
    Denied,
    #[default]
    Pending,
}

/// What a module shows given its permission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModuleContent {
    Live,
    /// Fixed denied-state view
    Denied,
    AwaitingPermission,
}

impl From<Permission> for ModuleContent {
    fn from(p: Permission) -> Self {
        match p {
            Permission::Granted => ModuleContent::Live,
            Permission::Denied => ModuleContent::Denied,
            Permission::Pending => ModuleContent::AwaitingPermission,
        }
    }
}
