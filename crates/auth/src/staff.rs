use serde::{Deserialize, Deserializer, Serialize};

/// Stored password credential.
///
/// Never serialized and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Password(String);

impl Password {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for Password {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// A staff member as held by the credential store.
///
/// Read-only from the core's perspective.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StaffRecord {
    /// Numeric row id, when the store has one.
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub emp_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    pub off_email: String,
    pub password: Password,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_superadmin: bool,
}

impl StaffRecord {
    pub fn new(off_email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            id: None,
            emp_id: None,
            name: None,
            off_email: off_email.into(),
            password: Password::new(password),
            department: None,
            is_superadmin: false,
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_emp_id(mut self, emp_id: impl Into<String>) -> Self {
        self.emp_id = Some(emp_id.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn superadmin(mut self) -> Self {
        self.is_superadmin = true;
        self
    }

    /// Drop the password, keeping everything a caller may see.
    pub fn into_profile(self) -> StaffProfile {
        StaffProfile {
            id: self.id,
            emp_id: self.emp_id,
            name: self.name,
            off_email: self.off_email,
            department: self.department,
            is_superadmin: self.is_superadmin,
        }
    }
}

/// A verified staff member without the password field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaffProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emp_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub off_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub is_superadmin: bool,
}

/// Accepts `true`/`false`, `0`/`1` or null (legacy tinyint columns).
fn flag<'de, D>(de: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    Ok(match Option::<Flag>::deserialize(de)? {
        Some(Flag::Bool(b)) => b,
        Some(Flag::Int(n)) => n != 0,
        None => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_json_has_no_password() {
        let record = StaffRecord::new("t@x.edu", "secret").with_emp_id("TCH00123");
        let json = serde_json::to_value(record.into_profile()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["off_email"], "t@x.edu");
        assert_eq!(json["emp_id"], "TCH00123");
    }

    #[test]
    fn debug_redacts_password() {
        let record = StaffRecord::new("t@x.edu", "hunter2");
        assert!(!format!("{record:?}").contains("hunter2"));
    }

    #[test]
    fn superadmin_flag_accepts_integers_and_defaults_false() {
        let r: StaffRecord = serde_json::from_str(
            r#"{"off_email":"a@x.edu","password":"p","is_superadmin":1}"#,
        )
        .unwrap();
        assert!(r.is_superadmin);

        let r: StaffRecord =
            serde_json::from_str(r#"{"off_email":"a@x.edu","password":"p"}"#).unwrap();
        assert!(!r.is_superadmin);

        let r: StaffRecord = serde_json::from_str(
            r#"{"off_email":"a@x.edu","password":"p","is_superadmin":null}"#,
        )
        .unwrap();
        assert!(!r.is_superadmin);
    }
}
