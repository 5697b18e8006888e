//! Scheme-path resolution and ancestor/descendant id walks.

use foldershare_access::Actor;
use foldershare_core::error::AppError;
use foldershare_core::result::AppResult;
use foldershare_core::types::{ItemId, UserId};
use foldershare_entity::item::Item;
use foldershare_entity::path::{PathScheme, SchemePath};

use crate::engine::TreeEngine;

/// What a scheme path resolves to.
#[derive(Debug, Clone)]
pub enum ResolvedPath {
    /// The path addresses a domain's root-folder list (`private:/`).
    DomainRoot {
        /// The addressed domain.
        scheme: PathScheme,
        /// The addressed user, when the path carried a `//uid` authority.
        uid: Option<UserId>,
    },
    /// The path addresses one entity.
    Item(Item),
}

impl TreeEngine {
    /// Resolve a scheme path for an actor.
    ///
    /// Malformed syntax is a `Validation` error; a well-formed path with
    /// no entity behind it is `NotFound`.
    pub async fn resolve_path(&self, actor: &Actor, input: &str) -> AppResult<ResolvedPath> {
        let path = SchemePath::parse(input)?;
        if path.is_domain_root() {
            return Ok(ResolvedPath::DomainRoot {
                scheme: path.scheme,
                uid: path.uid,
            });
        }

        let root_name = &path.segments[0];
        let root = self
            .find_domain_root(actor, path.scheme, path.uid, root_name)
            .await?
            .ok_or_else(|| AppError::not_found(format!("No entity at path '{input}'")))?;

        let mut current = root;
        for segment in &path.segments[1..] {
            current = self
                .store
                .find_child_by_name(current.id, segment)
                .await?
                .ok_or_else(|| AppError::not_found(format!("No entity at path '{input}'")))?;
        }
        Ok(ResolvedPath::Item(current))
    }

    /// Resolve a scheme path to an entity id.
    pub async fn item_id_for_path(&self, actor: &Actor, input: &str) -> AppResult<ItemId> {
        match self.resolve_path(actor, input).await? {
            ResolvedPath::Item(item) => Ok(item.id),
            ResolvedPath::DomainRoot { .. } => Err(AppError::not_found(
                "The path addresses a root-folder list, not an entity",
            )),
        }
    }

    /// Ancestor chain ids, root first, the entity itself last.
    pub async fn ancestor_ids(&self, item_id: ItemId) -> AppResult<Vec<ItemId>> {
        let ancestors = self.store.list_ancestors(item_id).await?;
        if ancestors.is_empty() {
            return Err(AppError::not_found(format!("Entity {item_id} not found")));
        }
        Ok(ancestors.into_iter().map(|a| a.id).collect())
    }

    /// Descendant ids, pre-order depth-first, children sorted by name.
    pub async fn descendant_ids(&self, item_id: ItemId) -> AppResult<Vec<ItemId>> {
        self.require_item(item_id).await?;
        let descendants = self.store.list_descendants(item_id).await?;
        Ok(descendants.into_iter().map(|d| d.id).collect())
    }

    /// The root folders visible to an actor in one domain.
    ///
    /// `private` lists the actor's (or the addressed user's) own roots;
    /// `shared` lists other users' roots granted to the actor; `public`
    /// lists roots granted to the anonymous id. The caller still runs the
    /// access evaluator per entity before exposing contents.
    pub async fn roots_in_domain(
        &self,
        actor: &Actor,
        scheme: PathScheme,
        uid: Option<UserId>,
    ) -> AppResult<Vec<Item>> {
        match scheme {
            PathScheme::Private => {
                let owner = uid.or(actor.user_id).ok_or_else(|| {
                    AppError::validation("Private paths require an authenticated user")
                })?;
                self.store.list_roots(owner).await
            }
            PathScheme::Shared => {
                let grant_id = actor.grant_id();
                let roots = self.store.list_all_roots().await?;
                Ok(roots
                    .into_iter()
                    .filter(|r| !actor.is_user(r.owner_id))
                    .filter(|r| {
                        let grants = r.grants_or_default();
                        !grants.is_disabled(grant_id) && grants.is_viewer(grant_id)
                    })
                    .collect())
            }
            PathScheme::Public => {
                let roots = self.store.list_all_roots().await?;
                Ok(roots
                    .into_iter()
                    .filter(|r| r.grants_or_default().is_viewer(UserId::ANONYMOUS))
                    .collect())
            }
        }
    }

    /// Find the root folder a path's first segment names, per domain.
    async fn find_domain_root(
        &self,
        actor: &Actor,
        scheme: PathScheme,
        uid: Option<UserId>,
        name: &str,
    ) -> AppResult<Option<Item>> {
        match scheme {
            PathScheme::Private => {
                let owner = uid.or(actor.user_id).ok_or_else(|| {
                    AppError::validation("Private paths require an authenticated user")
                })?;
                self.store.find_root_by_name(owner, name).await
            }
            PathScheme::Shared | PathScheme::Public => {
                let roots = self.roots_in_domain(actor, scheme, uid).await?;
                Ok(roots.into_iter().find(|r| r.name == name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::testutil::engine;
    use foldershare_core::error::ErrorKind;
    use foldershare_core::types::RolePermissions;
    use foldershare_entity::grants::GrantLevel;

    const OWNER: UserId = UserId(1);
    const GUEST: UserId = UserId(2);

    fn owner_actor() -> Actor {
        Actor::new(OWNER, RolePermissions::member())
    }

    #[tokio::test]
    async fn test_resolve_private_path() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let docs = engine
            .create_folder(OWNER, root.id, "docs", false)
            .await
            .unwrap();

        let actor = owner_actor();
        let id = engine
            .item_id_for_path(&actor, "private:/home/docs")
            .await
            .unwrap();
        assert_eq!(id, docs.id);

        // A bare path defaults to the private domain.
        let id = engine.item_id_for_path(&actor, "/home").await.unwrap();
        assert_eq!(id, root.id);
    }

    #[tokio::test]
    async fn test_domain_root_is_not_an_entity() {
        let (engine, _dir) = engine().await;
        let actor = owner_actor();
        match engine.resolve_path(&actor, "private:/").await.unwrap() {
            ResolvedPath::DomainRoot { scheme, .. } => assert_eq!(scheme, PathScheme::Private),
            ResolvedPath::Item(_) => panic!("domain root resolved to an entity"),
        }
        let err = engine.item_id_for_path(&actor, "private:/").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_missing_path_not_found() {
        let (engine, _dir) = engine().await;
        engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let err = engine
            .item_id_for_path(&owner_actor(), "private:/home/nope")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::NotFound);
    }

    #[tokio::test]
    async fn test_malformed_path_is_validation() {
        let (engine, _dir) = engine().await;
        let err = engine
            .item_id_for_path(&owner_actor(), "bogus:/x")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_shared_domain_lists_granted_roots() {
        let (engine, _dir) = engine().await;
        let theirs = engine
            .create_root_folder(OWNER, "theirs", false)
            .await
            .unwrap();
        engine.create_root_folder(OWNER, "hidden", false).await.unwrap();
        engine
            .add_grant(theirs.id, GUEST, GrantLevel::View)
            .await
            .unwrap();

        let guest = Actor::new(GUEST, RolePermissions::member());
        let shared = engine
            .roots_in_domain(&guest, PathScheme::Shared, None)
            .await
            .unwrap();
        assert_eq!(shared.len(), 1);
        assert_eq!(shared[0].id, theirs.id);

        let id = engine
            .item_id_for_path(&guest, "shared:/theirs")
            .await
            .unwrap();
        assert_eq!(id, theirs.id);
    }

    #[tokio::test]
    async fn test_public_domain_lists_anonymous_granted_roots() {
        let (engine, _dir) = engine().await;
        let open = engine.create_root_folder(OWNER, "open", false).await.unwrap();
        engine.create_root_folder(OWNER, "closed", false).await.unwrap();
        engine
            .add_grant(open.id, UserId::ANONYMOUS, GrantLevel::View)
            .await
            .unwrap();

        let anon = Actor::anonymous(RolePermissions::viewer());
        let public = engine
            .roots_in_domain(&anon, PathScheme::Public, None)
            .await
            .unwrap();
        assert_eq!(public.len(), 1);
        assert_eq!(public[0].id, open.id);
    }

    #[tokio::test]
    async fn test_ancestor_ids_root_first_self_last() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let a = engine.create_folder(OWNER, root.id, "a", false).await.unwrap();
        let b = engine.create_folder(OWNER, a.id, "b", false).await.unwrap();

        let ids = engine.ancestor_ids(b.id).await.unwrap();
        assert_eq!(ids, vec![root.id, a.id, b.id]);
    }

    #[tokio::test]
    async fn test_descendant_ids_preorder() {
        let (engine, _dir) = engine().await;
        let root = engine.create_root_folder(OWNER, "home", false).await.unwrap();
        let a = engine.create_folder(OWNER, root.id, "a", false).await.unwrap();
        let inner = engine.create_folder(OWNER, a.id, "inner", false).await.unwrap();
        let z = engine.create_folder(OWNER, root.id, "z", false).await.unwrap();

        let ids = engine.descendant_ids(root.id).await.unwrap();
        assert_eq!(ids, vec![a.id, inner.id, z.id]);
    }
}
