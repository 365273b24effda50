//! `SQLite` implementation of [`GroupBackend`].

use rusqlite::{Connection, Transaction, params};

use crate::models::{
    Group, GroupId, GroupListing, GroupNode, GroupSummary, OwnerId, ParentUpdate, validate_parent,
};
use crate::storage::sqlite::{
    GROUP_COLUMNS, SqliteBackend, contains_pattern, fetch_group, group_from_row, to_count,
};
use crate::tree::cascade::{CascadeOutcome, CascadePolicy, plan_cascade};
use crate::tree::walk_ancestors;
use crate::{Error, Result, current_timestamp};

use super::traits::GroupBackend;

/// Loads the `(id, parent)` pairs of every group owned by `owner`.
fn load_nodes(conn: &Connection, owner: OwnerId) -> Result<Vec<GroupNode>> {
    let mut stmt = conn
        .prepare("SELECT id, parent_group_id FROM groups WHERE user_id = ?1")
        .map_err(|e| Error::operation("load_group_nodes", e))?;
    let rows = stmt
        .query_map(params![owner.get()], |row| {
            Ok(GroupNode {
                id: GroupId::new(row.get(0)?),
                parent_group_id: row.get::<_, Option<i64>>(1)?.map(GroupId::new),
            })
        })
        .map_err(|e| Error::operation("load_group_nodes", e))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::operation("load_group_nodes", e))
}

fn count_owned(conn: &Connection, owner: OwnerId) -> Result<u64> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM groups WHERE user_id = ?1",
            params![owner.get()],
            |row| row.get(0),
        )
        .map_err(|e| Error::operation("count_groups", e))?;
    Ok(to_count(count))
}

/// Resolves a new parent for `id`, rejecting missing, foreign and descendant parents.
fn check_new_parent(
    tx: &Transaction<'_>,
    owner: OwnerId,
    id: GroupId,
    parent: GroupId,
) -> Result<()> {
    let Some(parent_group) = fetch_group(tx, owner, parent)? else {
        return Err(Error::unknown_parent(parent));
    };
    let limit = usize::try_from(count_owned(tx, owner)?).unwrap_or(usize::MAX);
    let ancestors = walk_ancestors(&parent_group, limit, |gid| fetch_group(tx, owner, gid))?;
    if ancestors.iter().any(|g| g.id == id) {
        return Err(Error::Reference {
            field: "parentGroupId",
            message: format!("group {parent} is a descendant of group {id}"),
        });
    }
    Ok(())
}

fn collect_groups(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<Group>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| Error::operation("list_groups", e))?;
    let rows = stmt
        .query_map(params, group_from_row)
        .map_err(|e| Error::operation("list_groups", e))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::operation("list_groups", e))
}

impl GroupBackend for SqliteBackend {
    fn create_group(&self, owner: OwnerId, title: &str, parent: Option<GroupId>) -> Result<Group> {
        self.write("create_group", |tx| {
            if let Some(parent_id) = parent
                && fetch_group(tx, owner, parent_id)?.is_none()
            {
                return Err(Error::unknown_parent(parent_id));
            }

            let now = current_timestamp();
            tx.execute(
                "INSERT INTO groups (title, parent_group_id, user_id, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![title, parent.map(GroupId::get), owner.get(), now],
            )
            .map_err(|e| Error::operation("create_group", e))?;

            Ok(Group {
                id: GroupId::new(tx.last_insert_rowid()),
                title: title.to_string(),
                parent_group_id: parent,
                owner_id: owner,
                created_at: now,
                updated_at: now,
            })
        })
    }

    fn get_group(&self, owner: OwnerId, id: GroupId) -> Result<Option<Group>> {
        self.read("get_group", |conn| fetch_group(conn, owner, id))
    }

    fn update_group(
        &self,
        owner: OwnerId,
        id: GroupId,
        title: &str,
        parent: ParentUpdate,
    ) -> Result<Option<Group>> {
        self.write("update_group", |tx| {
            let Some(existing) = fetch_group(tx, owner, id)? else {
                return Ok(None);
            };

            let new_parent = match parent {
                ParentUpdate::Keep => existing.parent_group_id,
                ParentUpdate::Set(new_parent) => {
                    validate_parent(id, new_parent)?;
                    if let Some(parent_id) = new_parent
                        && existing.parent_group_id != Some(parent_id)
                    {
                        check_new_parent(tx, owner, id, parent_id)?;
                    }
                    new_parent
                },
            };

            let now = current_timestamp();
            tx.execute(
                "UPDATE groups SET title = ?1, parent_group_id = ?2, updated_at = ?3
                 WHERE id = ?4 AND user_id = ?5",
                params![title, new_parent.map(GroupId::get), now, id.get(), owner.get()],
            )
            .map_err(|e| Error::operation("update_group", e))?;

            Ok(Some(Group {
                title: title.to_string(),
                parent_group_id: new_parent,
                updated_at: now,
                ..existing
            }))
        })
    }

    fn delete_group(
        &self,
        owner: OwnerId,
        id: GroupId,
        policy: CascadePolicy,
    ) -> Result<Option<CascadeOutcome>> {
        self.write("delete_group", |tx| {
            let Some(target) = fetch_group(tx, owner, id)? else {
                return Ok(None);
            };
            let nodes = load_nodes(tx, owner)?;
            let plan = plan_cascade(policy, GroupNode::from(&target), &nodes)?;

            let now = current_timestamp();
            for child in &plan.reparent {
                tx.execute(
                    "UPDATE groups SET parent_group_id = ?1, updated_at = ?2
                     WHERE id = ?3 AND user_id = ?4",
                    params![plan.new_parent.map(GroupId::get), now, child.get(), owner.get()],
                )
                .map_err(|e| Error::operation("reparent_group", e))?;
            }

            let mut outcome = CascadeOutcome {
                policy,
                deleted_groups: plan.delete.clone(),
                reparented_groups: plan.reparent.clone(),
                new_parent: plan.new_parent,
                ..CascadeOutcome::default()
            };

            for group_id in &plan.delete {
                let links = tx
                    .execute(
                        "DELETE FROM groupables WHERE group_id = ?1",
                        params![group_id.get()],
                    )
                    .map_err(|e| Error::operation("detach_group_links", e))?;
                let tags = tx
                    .execute(
                        "DELETE FROM taggables WHERE taggable_type = 'group' AND taggable_id = ?1",
                        params![group_id.get()],
                    )
                    .map_err(|e| Error::operation("detach_group_tags", e))?;
                tx.execute(
                    "DELETE FROM groups WHERE id = ?1 AND user_id = ?2",
                    params![group_id.get(), owner.get()],
                )
                .map_err(|e| Error::operation("delete_group", e))?;

                outcome.detached_links += u64::try_from(links).unwrap_or(u64::MAX);
                outcome.detached_tags += u64::try_from(tags).unwrap_or(u64::MAX);
            }

            Ok(Some(outcome))
        })
    }

    fn list_children(
        &self,
        owner: OwnerId,
        parent: Option<GroupId>,
    ) -> Result<Vec<GroupSummary>> {
        self.read("list_children", |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT g.id, g.title,
                        (SELECT COUNT(*) FROM groups c
                          WHERE c.parent_group_id = g.id AND c.user_id = g.user_id),
                        (SELECT COUNT(*) FROM groupables ga
                          WHERE ga.group_id = g.id AND ga.groupable_type = 'link')
                     FROM groups g
                     WHERE g.user_id = ?1 AND g.parent_group_id IS ?2
                     ORDER BY g.title COLLATE NOCASE, g.id",
                )
                .map_err(|e| Error::operation("list_children", e))?;
            let rows = stmt
                .query_map(params![owner.get(), parent.map(GroupId::get)], |row| {
                    Ok(GroupSummary {
                        id: GroupId::new(row.get(0)?),
                        title: row.get(1)?,
                        child_group_count: to_count(row.get(2)?),
                        link_count: to_count(row.get(3)?),
                    })
                })
                .map_err(|e| Error::operation("list_children", e))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| Error::operation("list_children", e))
        })
    }

    fn list_flat(&self, owner: OwnerId) -> Result<Vec<GroupListing>> {
        self.read("list_flat", |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT g.id, g.title, g.parent_group_id,
                        (SELECT COUNT(*) FROM groups c
                          WHERE c.parent_group_id = g.id AND c.user_id = g.user_id)
                     FROM groups g
                     WHERE g.user_id = ?1
                     ORDER BY g.title COLLATE NOCASE, g.id",
                )
                .map_err(|e| Error::operation("list_flat", e))?;
            let rows = stmt
                .query_map(params![owner.get()], |row| {
                    Ok(GroupListing {
                        id: GroupId::new(row.get(0)?),
                        title: row.get(1)?,
                        parent_group_id: row.get::<_, Option<i64>>(2)?.map(GroupId::new),
                        child_group_count: to_count(row.get(3)?),
                    })
                })
                .map_err(|e| Error::operation("list_flat", e))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| Error::operation("list_flat", e))
        })
    }

    fn list_all(&self, owner: OwnerId) -> Result<Vec<Group>> {
        self.read("list_all_groups", |conn| {
            collect_groups(
                conn,
                &format!(
                    "SELECT {GROUP_COLUMNS} FROM groups g WHERE g.user_id = ?1
                     ORDER BY g.title COLLATE NOCASE, g.id"
                ),
                params![owner.get()],
            )
        })
    }

    fn count_groups(&self, owner: OwnerId) -> Result<u64> {
        self.read("count_groups", |conn| count_owned(conn, owner))
    }

    fn search_groups(&self, owner: OwnerId, query: &str) -> Result<Vec<Group>> {
        let pattern = contains_pattern(query);
        self.read("search_groups", |conn| {
            collect_groups(
                conn,
                &format!(
                    "SELECT {GROUP_COLUMNS} FROM groups g
                     WHERE g.user_id = ?1 AND g.title LIKE ?2 ESCAPE '\\'
                     ORDER BY g.title COLLATE NOCASE, g.id"
                ),
                params![owner.get(), pattern],
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OWNER: OwnerId = OwnerId::new(1);
    const OTHER: OwnerId = OwnerId::new(2);

    fn create_test_backend() -> SqliteBackend {
        SqliteBackend::in_memory().expect("Failed to create in-memory backend")
    }

    #[test]
    fn test_create_and_get_group() {
        let backend = create_test_backend();
        let work = backend
            .create_group(OWNER, "Work", None)
            .expect("Failed to create group");
        assert!(work.is_root());

        let fetched = backend
            .get_group(OWNER, work.id)
            .expect("Failed to get group")
            .expect("Group not found");
        assert_eq!(fetched, work);

        assert!(backend.get_group(OTHER, work.id).expect("get").is_none());
    }

    #[test]
    fn test_create_with_foreign_parent_is_rejected() {
        let backend = create_test_backend();
        let foreign = backend.create_group(OTHER, "Theirs", None).expect("create");

        let result = backend.create_group(OWNER, "Mine", Some(foreign.id));
        assert!(matches!(result, Err(Error::Reference { field: "parentGroupId", .. })));

        let result = backend.create_group(OWNER, "Mine", Some(GroupId::new(999)));
        assert!(matches!(result, Err(Error::Reference { .. })));
        assert_eq!(backend.count_groups(OWNER).expect("count"), 0);
    }

    #[test]
    fn test_list_children_counts_and_order() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "work", None).expect("create");
        let _ = backend.create_group(OWNER, "Archive", None).expect("create");
        let _ = backend.create_group(OWNER, "Projects", Some(work.id)).expect("create");
        let _ = backend.create_group(OWNER, "Meetings", Some(work.id)).expect("create");
        let _ = backend.create_group(OTHER, "Alien", None).expect("create");

        let roots = backend.list_children(OWNER, None).expect("list");
        let titles: Vec<&str> = roots.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, ["Archive", "work"]);
        assert_eq!(roots[1].child_group_count, 2);
        assert_eq!(roots[1].link_count, 0);

        let children = backend.list_children(OWNER, Some(work.id)).expect("list");
        let titles: Vec<&str> = children.iter().map(|g| g.title.as_str()).collect();
        assert_eq!(titles, ["Meetings", "Projects"]);
    }

    #[test]
    fn test_update_rejects_descendant_parent() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create");
        let projects = backend.create_group(OWNER, "Projects", Some(work.id)).expect("create");
        let alpha = backend.create_group(OWNER, "Alpha", Some(projects.id)).expect("create");

        let result =
            backend.update_group(OWNER, work.id, "Work", ParentUpdate::Set(Some(alpha.id)));
        assert!(matches!(result, Err(Error::Reference { .. })));

        let unchanged = backend.get_group(OWNER, work.id).expect("get").expect("exists");
        assert!(unchanged.is_root());
    }

    #[test]
    fn test_update_self_parent_is_rejected() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create");
        let result = backend.update_group(OWNER, work.id, "Work", ParentUpdate::Set(Some(work.id)));
        assert!(matches!(result, Err(Error::SelfReference(id)) if id == work.id));
    }

    #[test]
    fn test_update_foreign_group_returns_none() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create");
        let result = backend
            .update_group(OTHER, work.id, "Stolen", ParentUpdate::Keep)
            .expect("update");
        assert!(result.is_none());
        let unchanged = backend.get_group(OWNER, work.id).expect("get").expect("exists");
        assert_eq!(unchanged.title, "Work");
    }

    #[test]
    fn test_delete_reparents_children() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create");
        let projects = backend.create_group(OWNER, "Projects", Some(work.id)).expect("create");
        let alpha = backend.create_group(OWNER, "Alpha", Some(projects.id)).expect("create");

        let outcome = backend
            .delete_group(OWNER, projects.id, CascadePolicy::Reparent)
            .expect("delete")
            .expect("exists");
        assert_eq!(outcome.deleted_groups, vec![projects.id]);
        assert_eq!(outcome.reparented_groups, vec![alpha.id]);
        assert_eq!(outcome.new_parent, Some(work.id));

        let alpha = backend.get_group(OWNER, alpha.id).expect("get").expect("exists");
        assert_eq!(alpha.parent_group_id, Some(work.id));
    }

    #[test]
    fn test_delete_cascade_removes_subtree() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create");
        let projects = backend.create_group(OWNER, "Projects", Some(work.id)).expect("create");
        let _ = backend.create_group(OWNER, "Alpha", Some(projects.id)).expect("create");

        let outcome = backend
            .delete_group(OWNER, work.id, CascadePolicy::Cascade)
            .expect("delete")
            .expect("exists");
        assert_eq!(outcome.deleted_groups.len(), 3);
        assert_eq!(outcome.deleted_groups.last(), Some(&work.id));
        assert_eq!(backend.count_groups(OWNER).expect("count"), 0);
    }

    #[test]
    fn test_delete_restrict_leaves_tree_untouched() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create");
        let _ = backend.create_group(OWNER, "Projects", Some(work.id)).expect("create");

        let result = backend.delete_group(OWNER, work.id, CascadePolicy::Restrict);
        assert!(matches!(result, Err(Error::Conflict(_))));
        assert_eq!(backend.count_groups(OWNER).expect("count"), 2);
    }

    #[test]
    fn test_delete_foreign_group_returns_none() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create");
        let result = backend
            .delete_group(OTHER, work.id, CascadePolicy::Reparent)
            .expect("delete");
        assert!(result.is_none());
        assert_eq!(backend.count_groups(OWNER).expect("count"), 1);
    }

    #[test]
    fn test_list_flat_and_search() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create");
        let _ = backend.create_group(OWNER, "Workshops", Some(work.id)).expect("create");
        let _ = backend.create_group(OWNER, "100% done", None).expect("create");

        let flat = backend.list_flat(OWNER).expect("flat");
        assert_eq!(flat.len(), 3);
        let work_entry = flat.iter().find(|g| g.id == work.id).expect("work listed");
        assert_eq!(work_entry.child_group_count, 1);

        let hits = backend.search_groups(OWNER, "work").expect("search");
        assert_eq!(hits.len(), 2);
        let hits = backend.search_groups(OWNER, "100%").expect("search");
        assert_eq!(hits.len(), 1);
        let hits = backend.search_groups(OWNER, "0% d").expect("search");
        assert_eq!(hits.len(), 1);
        assert!(backend.search_groups(OTHER, "work").expect("search").is_empty());
    }
}
