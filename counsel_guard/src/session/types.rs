use serde::{Deserialize, Serialize};

/// Role of a signed-in dashboard user.
///
/// Wire format is the integer code carried by the role cookie and the credential
/// (`1` = Admin, `2` = Counselor). Anything else decodes to `Unknown`, which the
/// session treats as signed out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Admin,
    Counselor,
    Unknown,
}

impl Role {
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Role::Admin,
            2 => Role::Counselor,
            _ => Role::Unknown,
        }
    }

    /// Decode a raw cookie value such as `"1"`.
    pub fn from_cookie_value(value: &str) -> Self {
        value
            .trim()
            .parse::<i64>()
            .map(Self::from_code)
            .unwrap_or(Role::Unknown)
    }

    /// Decode a role name as issued by the API (`"Admin"`, `"counselor"`, ...).
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "admin" => Role::Admin,
            "counselor" | "counsellor" => Role::Counselor,
            other => other.parse::<i64>().map(Self::from_code).unwrap_or(Role::Unknown),
        }
    }

    pub fn code(&self) -> Option<i64> {
        match self {
            Role::Admin => Some(1),
            Role::Counselor => Some(2),
            Role::Unknown => None,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Role::Unknown)
    }
}

/// Account state of a counselor, maintained by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CounselorStatus {
    Blocked,
    Pending,
    Active,
}

impl CounselorStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(CounselorStatus::Blocked),
            1 => Some(CounselorStatus::Pending),
            2 => Some(CounselorStatus::Active),
            _ => None,
        }
    }

    pub fn from_cookie_value(value: &str) -> Option<Self> {
        value.trim().parse::<i64>().ok().and_then(Self::from_code)
    }

    /// Decode a status name (`"Blocked"`, `"pending"`, ...) or a numeric string.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "blocked" => Some(CounselorStatus::Blocked),
            "pending" => Some(CounselorStatus::Pending),
            "active" => Some(CounselorStatus::Active),
            other => Self::from_cookie_value(other),
        }
    }

    pub fn code(&self) -> i64 {
        match self {
            CounselorStatus::Blocked => 0,
            CounselorStatus::Pending => 1,
            CounselorStatus::Active => 2,
        }
    }
}

/// Who is navigating, as far as the access policy is concerned.
///
/// Built fresh for every request from cookies, or from the hydrated client store.
/// Never persisted by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Session {
    pub role: Option<Role>,
    pub is_authenticated: bool,
    pub counselor_status: Option<CounselorStatus>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Build a session for a decoded role. Unknown roles yield an anonymous session,
    /// and a status is only kept for counselors.
    pub fn signed_in(role: Role, counselor_status: Option<CounselorStatus>) -> Self {
        match role {
            Role::Unknown => Self::anonymous(),
            Role::Admin => Self {
                role: Some(Role::Admin),
                is_authenticated: true,
                counselor_status: None,
            },
            Role::Counselor => Self {
                role: Some(Role::Counselor),
                is_authenticated: true,
                counselor_status,
            },
        }
    }

    /// The role, if the session is authenticated with a known one.
    pub fn authenticated_role(&self) -> Option<Role> {
        match self.role {
            Some(role) if self.is_authenticated && role.is_known() => Some(role),
            _ => None,
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.authenticated_role() == Some(Role::Counselor)
            && self.counselor_status == Some(CounselorStatus::Blocked)
    }
}
