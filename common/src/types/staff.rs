use serde::{Deserialize, Serialize};
use std::fmt;

/// Staff level returned by the auth service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum StaffTier {
    /// Administrador general o de sede
    Admin,
    /// Chef o motorizado
    Trabajador,
}

impl StaffTier {
    pub fn parse(value: &str) -> Option<StaffTier> {
        match value.trim().to_lowercase().as_str() {
            "admin" => Some(StaffTier::Admin),
            "trabajador" => Some(StaffTier::Trabajador),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StaffTier::Admin => "admin",
            StaffTier::Trabajador => "trabajador",
        }
    }
}

impl fmt::Display for StaffTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Role a worker is assigned to on an order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentKind {
    Chef,
    Motorizado,
}

impl AssignmentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            AssignmentKind::Chef => "chef",
            AssignmentKind::Motorizado => "motorizado",
        }
    }

    pub fn parse(value: &str) -> Option<AssignmentKind> {
        match value.trim().to_lowercase().as_str() {
            "chef" => Some(AssignmentKind::Chef),
            "motorizado" | "rider" => Some(AssignmentKind::Motorizado),
            _ => None,
        }
    }
}

impl fmt::Display for AssignmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
