use serde::{Deserialize, Serialize};

/// Staff category, which is also the token role.
///
/// The two categories are disjoint: an email is only ever looked up within
/// one of them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Teaching,
    #[serde(rename = "nonteaching")]
    NonTeaching,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Teaching => "teaching",
            StaffRole::NonTeaching => "nonteaching",
        }
    }

    /// Label used in user-facing messages.
    pub fn label(&self) -> &'static str {
        match self {
            StaffRole::Teaching => "teaching",
            StaffRole::NonTeaching => "non-teaching",
        }
    }

    /// Portals a token for this role may be scoped to.
    pub fn allowed_portals(&self) -> &'static [Portal] {
        match self {
            StaffRole::Teaching => &[Portal::FacultyInformation, Portal::LeavePortal],
            StaffRole::NonTeaching => &[Portal::LeavePortal],
        }
    }

    pub fn allows(&self, portal: Portal) -> bool {
        self.allowed_portals().contains(&portal)
    }
}

impl core::fmt::Display for StaffRole {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Front-end surface a token is scoped to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Portal {
    FacultyInformation,
    LeavePortal,
}

impl Portal {
    pub const ALL: [Portal; 2] = [Portal::FacultyInformation, Portal::LeavePortal];

    /// Exact, case-sensitive match against the wire names.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "facultyinformation" => Some(Portal::FacultyInformation),
            "leaveportal" => Some(Portal::LeavePortal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Portal::FacultyInformation => "facultyinformation",
            Portal::LeavePortal => "leaveportal",
        }
    }
}

impl core::fmt::Display for Portal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}
