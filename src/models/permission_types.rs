use crate::models::screen_types::Notice;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    Camera,
    ReadMediaImages,
    WriteMediaImages,
}

impl Permission {
    /// Text of the transient notice shown when the user refuses.
    pub fn denial_notice(&self) -> Notice {
        match self {
            Permission::Camera | Permission::ReadMediaImages => {
                Notice::short("Permission Denied!!! Try again")
            }
            Permission::WriteMediaImages => {
                Notice::long("Please give permission to download image")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionState {
    Granted,
    Denied,
}

impl PermissionState {
    pub fn is_granted(self) -> bool {
        self == PermissionState::Granted
    }
}

impl From<bool> for PermissionState {
    fn from(granted: bool) -> Self {
        if granted {
            PermissionState::Granted
        } else {
            PermissionState::Denied
        }
    }
}
