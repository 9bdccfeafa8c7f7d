/// Ownership-based authorization
///
/// Mutation of a post is gated to its original owner. The check compares the
/// resolved request identity against the owner reference embedded in the
/// resource at creation time. Ownership is strict 1:1 — there are no roles
/// and no partial exceptions.
///
/// Owner ids cross process boundaries as text and can arrive in different
/// representations (braced, simple, uppercase UUIDs); both sides are
/// canonicalized before comparison.
///
/// # Example
///
/// ```
/// use inkpost_shared::auth::ownership::{check_owner, OwnerRef};
/// use inkpost_shared::auth::session::{CurrentUser, Identity};
/// use uuid::Uuid;
///
/// let id = Uuid::new_v4();
/// let user = CurrentUser::Authenticated(Identity { id, username: "alice".to_string() });
/// let owner = OwnerRef { owner_id: id.to_string(), owner_username: "alice".to_string() };
///
/// assert!(check_owner(&user, &owner).is_ok());
/// assert!(check_owner(&CurrentUser::Anonymous, &owner).is_err());
/// ```

use uuid::Uuid;

use super::session::CurrentUser;

/// Error type for ownership checks
#[derive(Debug, thiserror::Error)]
pub enum OwnershipError {
    /// The identity is anonymous or does not own the resource
    #[error("Not the owner of this resource")]
    Forbidden,
}

/// Owner reference embedded in a resource at creation time
///
/// Set once when the resource is created and immutable afterwards; the guard
/// only ever reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnerRef {
    /// Owner's user id, as recorded at creation
    pub owner_id: String,

    /// Owner's username, as recorded at creation
    pub owner_username: String,
}

/// Checks that the resolved identity owns the resource.
///
/// Anonymous identities are always `Forbidden`. Authenticated identities
/// must match the recorded owner id after canonicalization.
pub fn check_owner(identity: &CurrentUser, owner: &OwnerRef) -> Result<(), OwnershipError> {
    let identity = identity.identity().ok_or(OwnershipError::Forbidden)?;

    if canonical_id(&identity.id.to_string()) == canonical_id(&owner.owner_id) {
        Ok(())
    } else {
        Err(OwnershipError::Forbidden)
    }
}

/// Canonicalizes an id for comparison.
///
/// UUID textual variants (braced, simple, urn, uppercase) normalize to the
/// hyphenated lowercase form; anything else falls back to a trimmed,
/// lowercased string.
fn canonical_id(raw: &str) -> String {
    match Uuid::parse_str(raw.trim()) {
        Ok(uuid) => uuid.as_hyphenated().to_string(),
        Err(_) => raw.trim().to_ascii_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::Identity;

    fn authenticated(id: Uuid) -> CurrentUser {
        CurrentUser::Authenticated(Identity {
            id,
            username: "alice".to_string(),
        })
    }

    #[test]
    fn test_owner_is_allowed() {
        let id = Uuid::new_v4();
        let owner = OwnerRef {
            owner_id: id.to_string(),
            owner_username: "alice".to_string(),
        };

        assert!(check_owner(&authenticated(id), &owner).is_ok());
    }

    #[test]
    fn test_non_owner_is_forbidden() {
        let owner = OwnerRef {
            owner_id: Uuid::new_v4().to_string(),
            owner_username: "bob".to_string(),
        };

        assert!(matches!(
            check_owner(&authenticated(Uuid::new_v4()), &owner),
            Err(OwnershipError::Forbidden)
        ));
    }

    #[test]
    fn test_anonymous_is_always_forbidden() {
        let owner = OwnerRef {
            owner_id: Uuid::new_v4().to_string(),
            owner_username: "bob".to_string(),
        };

        assert!(matches!(
            check_owner(&CurrentUser::Anonymous, &owner),
            Err(OwnershipError::Forbidden)
        ));
    }

    #[test]
    fn test_uuid_textual_variants_compare_equal() {
        let id = Uuid::new_v4();
        let identity = authenticated(id);

        let variants = vec![
            id.as_hyphenated().to_string(),
            id.as_simple().to_string(),
            id.as_hyphenated().to_string().to_uppercase(),
            format!("{{{}}}", id.as_hyphenated()),
            format!("  {}  ", id.as_hyphenated()),
        ];

        for variant in variants {
            let owner = OwnerRef {
                owner_id: variant.clone(),
                owner_username: "alice".to_string(),
            };
            assert!(
                check_owner(&identity, &owner).is_ok(),
                "variant '{}' should compare equal",
                variant
            );
        }
    }

    #[test]
    fn test_non_uuid_ids_compare_case_insensitively() {
        assert_eq!(canonical_id(" Legacy-ID-7 "), "legacy-id-7");
        assert_eq!(canonical_id("legacy-id-7"), "legacy-id-7");
        assert_ne!(canonical_id("legacy-id-7"), canonical_id("legacy-id-8"));
    }
}
