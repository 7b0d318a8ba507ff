//! Pure authorization rules.
//!
//! All functions here are synchronous and side-effect free. Inputs are
//! snapshots the caller has already loaded ([`ActorSnapshot`]) or resolved
//! ([`ScopeTarget`]); outputs are [`Access`] verdicts. Keeping the rules
//! free of I/O makes every branch unit-testable without a database.

use uuid::Uuid;

use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

/// The actor's authorization-relevant fields, loaded fresh from the
/// database for each decision so role changes apply immediately.
#[derive(Debug, Clone, PartialEq)]
pub struct ActorSnapshot {
    pub id: Uuid,
    pub role: UserRole,
    pub faculty_id: Option<Uuid>,
    pub level_id: Option<Uuid>,
    /// The single department a department admin may act within.
    pub managed_department_id: Option<Uuid>,
}

/// Classification of a post or channel scope from its raw columns.
///
/// Exactly one shape holds. A row carrying both a faculty and a level is
/// classified as Level (the level pins down the faculty through its
/// department), but creation paths reject that combination outright via
/// [`PostScope::from_input`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostScope {
    Global,
    Faculty(Uuid),
    Level(Uuid),
}

impl PostScope {
    /// Classifies stored scope columns. Level takes precedence when both
    /// are set, matching how stored rows are interpreted everywhere.
    pub fn classify(faculty_id: Option<Uuid>, level_id: Option<Uuid>) -> Self {
        match (faculty_id, level_id) {
            (_, Some(level_id)) => PostScope::Level(level_id),
            (Some(faculty_id), None) => PostScope::Faculty(faculty_id),
            (None, None) => PostScope::Global,
        }
    }

    /// Validates request input for a new post or channel. Unlike
    /// [`PostScope::classify`], supplying both a faculty and a level is an
    /// error here rather than silently resolving to Level.
    pub fn from_input(
        faculty_id: Option<Uuid>,
        level_id: Option<Uuid>,
    ) -> Result<Self, AppError> {
        match (faculty_id, level_id) {
            (Some(_), Some(_)) => Err(AppError::bad_request(
                "A post scope may target a faculty or a level, not both".to_string(),
            )),
            (None, Some(level_id)) => Ok(PostScope::Level(level_id)),
            (Some(faculty_id), None) => Ok(PostScope::Faculty(faculty_id)),
            (None, None) => Ok(PostScope::Global),
        }
    }
}

/// A scope with its referenced entities resolved against the database.
/// For Level scopes the owning department is carried along, since the
/// department-admin rules compare against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeTarget {
    Global,
    Faculty { faculty_id: Uuid },
    Level { level_id: Uuid, department_id: Uuid },
}

/// The outcome of an authorization rule. Deny carries a stable reason
/// string surfaced in the 403 response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny(&'static str),
}

impl Access {
    /// Converts a Deny into a 403 error for handler `?` chains.
    pub fn require(self) -> Result<(), AppError> {
        match self {
            Access::Allow => Ok(()),
            Access::Deny(reason) => Err(AppError::forbidden(reason.to_string())),
        }
    }
}

/// Whether `actor` may create a post or channel with the given scope.
pub fn can_create(actor: &ActorSnapshot, target: &ScopeTarget) -> Access {
    match actor.role {
        UserRole::User => Access::Deny("Users cannot create posts"),
        UserRole::Admin | UserRole::Power => Access::Allow,
        UserRole::DAdmin => {
            let ScopeTarget::Level { department_id, .. } = target else {
                return Access::Deny(
                    "Department admins may only post in a department-level scope",
                );
            };
            let Some(managed) = actor.managed_department_id else {
                return Access::Deny("No department assigned");
            };
            if *department_id != managed {
                return Access::Deny("Level not in managed department");
            }
            Access::Allow
        }
    }
}

/// Whether `actor` may view content with the given scope. Global content
/// is visible to every authenticated actor.
pub fn can_view(actor: &ActorSnapshot, target: &ScopeTarget) -> Access {
    if matches!(actor.role, UserRole::Admin | UserRole::Power) {
        return Access::Allow;
    }

    match target {
        ScopeTarget::Global => Access::Allow,
        ScopeTarget::Faculty { faculty_id } => {
            if actor.faculty_id == Some(*faculty_id) {
                Access::Allow
            } else {
                Access::Deny("Not a member of this faculty")
            }
        }
        ScopeTarget::Level {
            level_id,
            department_id,
        } => match actor.role {
            UserRole::User => {
                if actor.level_id == Some(*level_id) {
                    Access::Allow
                } else {
                    Access::Deny("Not a member of this level")
                }
            }
            UserRole::DAdmin => {
                if actor.managed_department_id == Some(*department_id) {
                    Access::Allow
                } else {
                    Access::Deny("Level outside managed department")
                }
            }
            UserRole::Admin | UserRole::Power => Access::Allow,
        },
    }
}

/// Whether `actor` may edit or delete a resource owned by
/// `resource_owner_id`. Site admins may touch anything; department admins
/// only their own; plain users nothing.
pub fn can_modify(actor: &ActorSnapshot, resource_owner_id: Uuid) -> Access {
    match actor.role {
        UserRole::Admin | UserRole::Power => Access::Allow,
        UserRole::DAdmin => {
            if actor.id == resource_owner_id {
                Access::Allow
            } else {
                Access::Deny("Can only modify own post")
            }
        }
        UserRole::User => Access::Deny("Users cannot modify posts"),
    }
}

/// Whether `requester` may promote an account currently holding
/// `target_role`. One administrative position per account: promotion is
/// only valid from the plain `user` role.
pub fn can_promote(requester_role: UserRole, target_role: UserRole) -> Access {
    if requester_role != UserRole::Power {
        return Access::Deny("Only a power admin may change roles");
    }
    if target_role != UserRole::User {
        return Access::Deny("Account already holds an administrative position");
    }
    Access::Allow
}

/// Whether `requester` may demote an account currently holding
/// `target_role`. The designated primary power admin can never be
/// demoted, so the site always retains one.
pub fn can_demote(
    requester_role: UserRole,
    target_role: UserRole,
    target_is_primary_power_admin: bool,
) -> Access {
    if requester_role != UserRole::Power {
        return Access::Deny("Only a power admin may change roles");
    }
    if target_is_primary_power_admin {
        return Access::Deny("Cannot demote the primary power admin");
    }
    if target_role == UserRole::User {
        return Access::Deny("Account holds no administrative position");
    }
    Access::Allow
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(role: UserRole) -> ActorSnapshot {
        ActorSnapshot {
            id: Uuid::new_v4(),
            role,
            faculty_id: None,
            level_id: None,
            managed_department_id: None,
        }
    }

    #[test]
    fn test_admins_create_and_view_any_scope() {
        let targets = [
            ScopeTarget::Global,
            ScopeTarget::Faculty {
                faculty_id: Uuid::new_v4(),
            },
            ScopeTarget::Level {
                level_id: Uuid::new_v4(),
                department_id: Uuid::new_v4(),
            },
        ];
        for role in [UserRole::Admin, UserRole::Power] {
            let actor = actor(role);
            for target in &targets {
                assert_eq!(can_create(&actor, target), Access::Allow);
                assert_eq!(can_view(&actor, target), Access::Allow);
            }
        }
    }

    #[test]
    fn test_plain_users_never_create() {
        let mut actor = actor(UserRole::User);
        actor.faculty_id = Some(Uuid::new_v4());
        actor.level_id = Some(Uuid::new_v4());

        let targets = [
            ScopeTarget::Global,
            ScopeTarget::Faculty {
                faculty_id: actor.faculty_id.unwrap(),
            },
            ScopeTarget::Level {
                level_id: actor.level_id.unwrap(),
                department_id: Uuid::new_v4(),
            },
        ];
        for target in &targets {
            assert_eq!(
                can_create(&actor, target),
                Access::Deny("Users cannot create posts")
            );
        }
    }

    #[test]
    fn test_d_admin_creates_only_in_managed_department() {
        let cs_department = Uuid::new_v4();
        let math_department = Uuid::new_v4();
        let mut d_admin = actor(UserRole::DAdmin);
        d_admin.managed_department_id = Some(cs_department);

        let cs_200 = ScopeTarget::Level {
            level_id: Uuid::new_v4(),
            department_id: cs_department,
        };
        assert_eq!(can_create(&d_admin, &cs_200), Access::Allow);

        let math_200 = ScopeTarget::Level {
            level_id: Uuid::new_v4(),
            department_id: math_department,
        };
        assert_eq!(
            can_create(&d_admin, &math_200),
            Access::Deny("Level not in managed department")
        );
    }

    #[test]
    fn test_d_admin_denied_outside_level_scope() {
        let mut d_admin = actor(UserRole::DAdmin);
        d_admin.managed_department_id = Some(Uuid::new_v4());

        assert_eq!(
            can_create(&d_admin, &ScopeTarget::Global),
            Access::Deny("Department admins may only post in a department-level scope")
        );
        assert_eq!(
            can_create(
                &d_admin,
                &ScopeTarget::Faculty {
                    faculty_id: Uuid::new_v4()
                }
            ),
            Access::Deny("Department admins may only post in a department-level scope")
        );
    }

    #[test]
    fn test_d_admin_without_department_denied() {
        let d_admin = actor(UserRole::DAdmin);
        let target = ScopeTarget::Level {
            level_id: Uuid::new_v4(),
            department_id: Uuid::new_v4(),
        };
        assert_eq!(
            can_create(&d_admin, &target),
            Access::Deny("No department assigned")
        );
    }

    #[test]
    fn test_global_scope_visible_to_every_role() {
        for role in [
            UserRole::User,
            UserRole::DAdmin,
            UserRole::Admin,
            UserRole::Power,
        ] {
            assert_eq!(can_view(&actor(role), &ScopeTarget::Global), Access::Allow);
        }
    }

    #[test]
    fn test_faculty_scope_requires_membership() {
        let faculty = Uuid::new_v4();
        let mut member = actor(UserRole::User);
        member.faculty_id = Some(faculty);
        let mut outsider = actor(UserRole::User);
        outsider.faculty_id = Some(Uuid::new_v4());

        let target = ScopeTarget::Faculty {
            faculty_id: faculty,
        };
        assert_eq!(can_view(&member, &target), Access::Allow);
        assert_eq!(
            can_view(&outsider, &target),
            Access::Deny("Not a member of this faculty")
        );
    }

    #[test]
    fn test_level_scope_requires_level_membership_for_users() {
        let cs_200 = Uuid::new_v4();
        let cs_300 = Uuid::new_v4();
        let department = Uuid::new_v4();
        let mut student = actor(UserRole::User);
        student.level_id = Some(cs_200);

        assert_eq!(
            can_view(&student, &ScopeTarget::Level { level_id: cs_200, department_id: department }),
            Access::Allow
        );
        assert_eq!(
            can_view(&student, &ScopeTarget::Level { level_id: cs_300, department_id: department }),
            Access::Deny("Not a member of this level")
        );
    }

    #[test]
    fn test_level_scope_follows_managed_department_for_d_admins() {
        let cs_department = Uuid::new_v4();
        let mut d_admin = actor(UserRole::DAdmin);
        d_admin.managed_department_id = Some(cs_department);

        assert_eq!(
            can_view(
                &d_admin,
                &ScopeTarget::Level {
                    level_id: Uuid::new_v4(),
                    department_id: cs_department
                }
            ),
            Access::Allow
        );
        assert_eq!(
            can_view(
                &d_admin,
                &ScopeTarget::Level {
                    level_id: Uuid::new_v4(),
                    department_id: Uuid::new_v4()
                }
            ),
            Access::Deny("Level outside managed department")
        );
    }

    #[test]
    fn test_modify_ownership_rules() {
        let owner_id = Uuid::new_v4();

        let mut owner = actor(UserRole::DAdmin);
        owner.id = owner_id;
        assert_eq!(can_modify(&owner, owner_id), Access::Allow);

        let other_d_admin = actor(UserRole::DAdmin);
        assert_eq!(
            can_modify(&other_d_admin, owner_id),
            Access::Deny("Can only modify own post")
        );

        assert_eq!(can_modify(&actor(UserRole::Admin), owner_id), Access::Allow);
        assert_eq!(can_modify(&actor(UserRole::Power), owner_id), Access::Allow);
        assert_eq!(
            can_modify(&actor(UserRole::User), owner_id),
            Access::Deny("Users cannot modify posts")
        );
    }

    #[test]
    fn test_classify_scope() {
        let faculty = Uuid::new_v4();
        let level = Uuid::new_v4();

        assert_eq!(PostScope::classify(None, None), PostScope::Global);
        assert_eq!(
            PostScope::classify(Some(faculty), None),
            PostScope::Faculty(faculty)
        );
        assert_eq!(
            PostScope::classify(None, Some(level)),
            PostScope::Level(level)
        );
        // Level wins when a stored row carries both.
        assert_eq!(
            PostScope::classify(Some(faculty), Some(level)),
            PostScope::Level(level)
        );
    }

    #[test]
    fn test_from_input_rejects_dual_scope() {
        assert!(PostScope::from_input(Some(Uuid::new_v4()), Some(Uuid::new_v4())).is_err());
        assert!(PostScope::from_input(None, None).is_ok());
        assert!(PostScope::from_input(Some(Uuid::new_v4()), None).is_ok());
        assert!(PostScope::from_input(None, Some(Uuid::new_v4())).is_ok());
    }

    #[test]
    fn test_promote_requires_power_and_plain_target() {
        assert_eq!(
            can_promote(UserRole::Power, UserRole::User),
            Access::Allow
        );
        assert_eq!(
            can_promote(UserRole::Admin, UserRole::User),
            Access::Deny("Only a power admin may change roles")
        );
        assert_eq!(
            can_promote(UserRole::Power, UserRole::Admin),
            Access::Deny("Account already holds an administrative position")
        );
        assert_eq!(
            can_promote(UserRole::Power, UserRole::DAdmin),
            Access::Deny("Account already holds an administrative position")
        );
    }

    #[test]
    fn test_demote_protects_primary_power_admin() {
        assert_eq!(
            can_demote(UserRole::Power, UserRole::Admin, false),
            Access::Allow
        );
        assert_eq!(
            can_demote(UserRole::Power, UserRole::DAdmin, false),
            Access::Allow
        );
        assert_eq!(
            can_demote(UserRole::Power, UserRole::Power, true),
            Access::Deny("Cannot demote the primary power admin")
        );
        assert_eq!(
            can_demote(UserRole::Power, UserRole::User, false),
            Access::Deny("Account holds no administrative position")
        );
        assert_eq!(
            can_demote(UserRole::Admin, UserRole::DAdmin, false),
            Access::Deny("Only a power admin may change roles")
        );
    }
}
