use crate::types::dtos::{LoginResponse, UserDTO};
use crate::types::staff::StaffTier;

/// Credentials and sede selection of the logged-in staff member.
///
/// Passed explicitly to the API client; nothing reads it from global state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Session {
    /// Token JWT devuelto por el login.
    pub token: Option<String>,
    /// Usuario autenticado.
    pub user: Option<UserDTO>,
    /// Sede elegida en la consola.
    pub selected_sede: String,
}

impl Session {
    pub fn anonymous(default_sede: impl Into<String>) -> Self {
        Session {
            token: None,
            user: None,
            selected_sede: default_sede.into(),
        }
    }

    /// Users bound to a sede start on it; the general admin keeps the default.
    pub fn from_login(response: &LoginResponse, default_sede: &str) -> Self {
        let selected_sede = response
            .user
            .as_ref()
            .and_then(|user| user.tenant_id_sede.clone())
            .unwrap_or_else(|| default_sede.to_string());
        Session {
            token: response.token.clone(),
            user: response.user.clone(),
            selected_sede,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.user_id.as_str())
    }

    pub fn is_admin(&self) -> bool {
        self.user
            .as_ref()
            .and_then(UserDTO::tier)
            .is_some_and(|tier| tier == StaffTier::Admin)
    }

    /// Sede the user is locked to, if any.
    pub fn fixed_sede(&self) -> Option<&str> {
        self.user.as_ref()?.tenant_id_sede.as_deref()
    }

    /// Admin of a single sede (as opposed to the general admin).
    pub fn is_sede_admin(&self) -> bool {
        self.is_admin() && self.fixed_sede().is_some()
    }

    /// Value of the `x-tenant-id` header.
    pub fn tenant_for(&self, explicit: Option<&str>) -> String {
        explicit
            .or(self.fixed_sede())
            .unwrap_or(self.selected_sede.as_str())
            .to_string()
    }

    /// `tenant_id` sent in request bodies. Always agrees with the header.
    pub fn body_tenant(&self, explicit: Option<&str>) -> String {
        self.tenant_for(explicit)
    }

    /// Returns `false` when the user is bound to another sede.
    pub fn select_sede(&mut self, sede: impl Into<String>) -> bool {
        let sede = sede.into();
        if self.fixed_sede().is_some_and(|fixed| fixed != sede) {
            return false;
        }
        self.selected_sede = sede;
        true
    }

    pub fn clear(&mut self, default_sede: &str) {
        *self = Session::anonymous(default_sede);
    }
}
