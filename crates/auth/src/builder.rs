use chrono::{DateTime, Duration, Utc};

use staffgate_core::{EmployeeId, ValidationError};

use crate::{ClaimSet, Portal, StaffProfile, StaffRole};

/// Derives the claim set for a verified staff member.
#[derive(Debug, Clone, Copy)]
pub struct ClaimBuilder {
    ttl: Duration,
}

impl ClaimBuilder {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl }
    }

    /// Build claims for `profile` logging in as `role`.
    ///
    /// Fails with [`ValidationError::InvalidPortal`] when `portal` is not
    /// allowed for the role; no claims are produced in that case.
    pub fn build(
        &self,
        profile: &StaffProfile,
        role: StaffRole,
        portal: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<ClaimSet, ValidationError> {
        let portal = resolve_portal(role, portal)?;

        let sub = match profile.id {
            Some(id) => id.to_string(),
            None => profile.off_email.clone(),
        };

        Ok(ClaimSet {
            sub,
            role,
            email: profile.off_email.clone(),
            emp_id: derive_employee_id(role, profile),
            is_superadmin: profile.is_superadmin,
            portal,
            exp: (now + self.ttl).timestamp(),
        })
    }
}

/// Validate an optional requested portal against the role.
///
/// Empty input counts as "no portal".
pub fn resolve_portal(role: StaffRole, portal: Option<&str>) -> Result<Option<Portal>, ValidationError> {
    let Some(raw) = portal.filter(|p| !p.is_empty()) else {
        return Ok(None);
    };

    match Portal::parse(raw) {
        Some(p) if role.allows(p) => Ok(Some(p)),
        _ => Err(ValidationError::InvalidPortal { staff: role.label() }),
    }
}

/// Employee id carried in the `EMP_ID` claim.
///
/// Teaching staff: the last three characters of the employee identifier.
/// Non-teaching staff: the identifier unchanged, falling back to the record id.
pub fn derive_employee_id(role: StaffRole, profile: &StaffProfile) -> Option<EmployeeId> {
    let emp_id = profile.emp_id.as_deref().filter(|s| !s.is_empty());

    match role {
        StaffRole::Teaching => {
            let emp_id = emp_id?;
            let len = emp_id.chars().count();
            EmployeeId::new(emp_id.chars().skip(len.saturating_sub(3)).collect::<String>())
        }
        StaffRole::NonTeaching => match emp_id {
            Some(e) => EmployeeId::new(e),
            None => profile.id.and_then(|id| EmployeeId::new(id.to_string())),
        },
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::StaffRecord;

    fn teaching(emp_id: &str) -> StaffProfile {
        StaffRecord::new("t@x.edu", "secret")
            .with_emp_id(emp_id)
            .into_profile()
    }

    fn builder() -> ClaimBuilder {
        ClaimBuilder::new(Duration::hours(1))
    }

    #[test]
    fn teaching_emp_id_keeps_last_three_chars() {
        let claims = builder()
            .build(&teaching("TCH00123"), StaffRole::Teaching, None, Utc::now())
            .unwrap();
        assert_eq!(claims.emp_id.unwrap().as_str(), "123");
    }

    #[test]
    fn short_teaching_ids_are_kept_whole() {
        let p = teaching("42");
        assert_eq!(
            derive_employee_id(StaffRole::Teaching, &p).unwrap().as_str(),
            "42"
        );
    }

    #[test]
    fn non_teaching_emp_id_is_unmodified() {
        let p = StaffRecord::new("n@x.edu", "p")
            .with_emp_id("NT000987")
            .into_profile();
        assert_eq!(
            derive_employee_id(StaffRole::NonTeaching, &p).unwrap().as_str(),
            "NT000987"
        );
    }

    #[test]
    fn non_teaching_falls_back_to_record_id() {
        let p = StaffRecord::new("n@x.edu", "p").with_id(55).into_profile();
        assert_eq!(
            derive_employee_id(StaffRole::NonTeaching, &p).unwrap().as_str(),
            "55"
        );
        assert!(derive_employee_id(StaffRole::Teaching, &p).is_none());
    }

    #[test]
    fn subject_prefers_record_id() {
        let p = StaffRecord::new("t@x.edu", "p").with_id(9).into_profile();
        let c = builder().build(&p, StaffRole::Teaching, None, Utc::now()).unwrap();
        assert_eq!(c.sub, "9");

        let c = builder()
            .build(&teaching("T1"), StaffRole::Teaching, None, Utc::now())
            .unwrap();
        assert_eq!(c.sub, "t@x.edu");
    }

    #[test]
    fn superadmin_and_expiry_are_set() {
        let p = StaffRecord::new("t@x.edu", "p").superadmin().into_profile();
        let now = Utc::now();
        let c = builder().build(&p, StaffRole::Teaching, None, now).unwrap();
        assert!(c.is_superadmin);
        assert_eq!(c.exp, now.timestamp() + 3600);
    }

    #[test]
    fn disallowed_portal_is_rejected_with_role_message() {
        let err = builder()
            .build(&teaching("T1"), StaffRole::Teaching, Some("payroll"), Utc::now())
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid portal for teaching staff");

        let err = resolve_portal(StaffRole::NonTeaching, Some("facultyinformation")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid portal for non-teaching staff");
    }

    #[test]
    fn empty_portal_means_none() {
        assert_eq!(resolve_portal(StaffRole::Teaching, Some("")).unwrap(), None);
    }

    proptest! {
        #[test]
        fn issued_portal_is_always_allowed_for_role(
            raw in prop_oneof![
                Just("facultyinformation".to_string()),
                Just("leaveportal".to_string()),
                "[a-z]{0,20}",
            ],
            teaching_role in any::<bool>(),
        ) {
            let role = if teaching_role { StaffRole::Teaching } else { StaffRole::NonTeaching };
            let p = StaffRecord::new("x@x.edu", "p").with_emp_id("E12345").into_profile();
            match builder().build(&p, role, Some(&raw), Utc::now()) {
                Ok(c) => {
                    if let Some(portal) = c.portal {
                        prop_assert!(role.allowed_portals().contains(&portal));
                    } else {
                        prop_assert!(raw.is_empty());
                    }
                }
                Err(e) => {
                    let is_invalid_portal = matches!(e, ValidationError::InvalidPortal { .. });
                    prop_assert!(is_invalid_portal);
                }
            }
        }

        #[test]
        fn teaching_short_id_is_suffix_of_identifier(emp_id in "[A-Z0-9]{1,16}") {
            let p = teaching(&emp_id);
            let short = derive_employee_id(StaffRole::Teaching, &p).unwrap();
            prop_assert!(emp_id.ends_with(short.as_str()));
            prop_assert_eq!(short.as_str().chars().count(), emp_id.chars().count().min(3));
        }
    }
}
