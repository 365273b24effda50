//! `SQLite` implementation of [`LinkBackend`].

use rusqlite::{Connection, params};

use crate::models::{GroupId, Link, LinkId, LinkSummary, OwnerId, Page};
use crate::storage::sqlite::{
    LINK_COLUMNS, SqliteBackend, contains_pattern, fetch_group, fetch_link, link_from_row,
    to_count,
};
use crate::{Error, Result, current_timestamp};

use super::GROUPABLE_LINK;
use super::traits::LinkBackend;

fn insert_association(conn: &Connection, group: GroupId, link: LinkId) -> Result<bool> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO groupables (group_id, groupable_type, groupable_id)
             VALUES (?1, ?2, ?3)",
            params![group.get(), GROUPABLE_LINK, link.get()],
        )
        .map_err(|e| Error::operation("attach_link", e))?;
    Ok(inserted > 0)
}

impl LinkBackend for SqliteBackend {
    fn create_link(
        &self,
        owner: OwnerId,
        title: &str,
        url: &str,
        groups: &[GroupId],
    ) -> Result<Link> {
        self.write("create_link", |tx| {
            for group in groups {
                if fetch_group(tx, owner, *group)?.is_none() {
                    return Err(Error::Reference {
                        field: "groupIds",
                        message: format!("group {group} does not exist"),
                    });
                }
            }

            let now = current_timestamp();
            tx.execute(
                "INSERT INTO links (user_id, title, url, created_at, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?4)",
                params![owner.get(), title, url, now],
            )
            .map_err(|e| Error::operation("create_link", e))?;
            let id = LinkId::new(tx.last_insert_rowid());

            for group in groups {
                insert_association(tx, *group, id)?;
            }

            Ok(Link {
                id,
                title: title.to_string(),
                url: url.to_string(),
                owner_id: owner,
                created_at: now,
            })
        })
    }

    fn get_link(&self, owner: OwnerId, id: LinkId) -> Result<Option<Link>> {
        self.read("get_link", |conn| fetch_link(conn, owner, id))
    }

    fn delete_link(&self, owner: OwnerId, id: LinkId) -> Result<bool> {
        self.write("delete_link", |tx| {
            if fetch_link(tx, owner, id)?.is_none() {
                return Ok(false);
            }
            tx.execute(
                "DELETE FROM groupables WHERE groupable_type = ?1 AND groupable_id = ?2",
                params![GROUPABLE_LINK, id.get()],
            )
            .map_err(|e| Error::operation("detach_link_groups", e))?;
            tx.execute(
                "DELETE FROM taggables WHERE taggable_type = 'link' AND taggable_id = ?1",
                params![id.get()],
            )
            .map_err(|e| Error::operation("detach_link_tags", e))?;
            tx.execute(
                "DELETE FROM links WHERE id = ?1 AND user_id = ?2",
                params![id.get(), owner.get()],
            )
            .map_err(|e| Error::operation("delete_link", e))?;
            Ok(true)
        })
    }

    fn attach_link(&self, owner: OwnerId, group: GroupId, link: LinkId) -> Result<bool> {
        self.write("attach_link", |tx| {
            if fetch_group(tx, owner, group)?.is_none() {
                return Err(Error::not_found("group", group));
            }
            if fetch_link(tx, owner, link)?.is_none() {
                return Err(Error::not_found("link", link));
            }
            insert_association(tx, group, link)
        })
    }

    fn detach_link(&self, owner: OwnerId, group: GroupId, link: LinkId) -> Result<bool> {
        self.write("detach_link", |tx| {
            if fetch_group(tx, owner, group)?.is_none() {
                return Err(Error::not_found("group", group));
            }
            let removed = tx
                .execute(
                    "DELETE FROM groupables
                     WHERE group_id = ?1 AND groupable_type = ?2 AND groupable_id = ?3",
                    params![group.get(), GROUPABLE_LINK, link.get()],
                )
                .map_err(|e| Error::operation("detach_link", e))?;
            Ok(removed > 0)
        })
    }

    fn list_group_links(
        &self,
        owner: OwnerId,
        group: GroupId,
        page: u32,
        per_page: u32,
    ) -> Result<Page<LinkSummary>> {
        let page = page.max(1);
        let offset = i64::try_from(Page::<LinkSummary>::offset(page, per_page)).unwrap_or(i64::MAX);

        self.read("list_group_links", |conn| {
            let total: i64 = conn
                .query_row(
                    "SELECT COUNT(*) FROM groupables ga
                     JOIN links l ON l.id = ga.groupable_id
                     WHERE ga.group_id = ?1 AND ga.groupable_type = ?2 AND l.user_id = ?3",
                    params![group.get(), GROUPABLE_LINK, owner.get()],
                    |row| row.get(0),
                )
                .map_err(|e| Error::operation("count_group_links", e))?;

            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {LINK_COLUMNS} FROM groupables ga
                     JOIN links l ON l.id = ga.groupable_id
                     WHERE ga.group_id = ?1 AND ga.groupable_type = ?2 AND l.user_id = ?3
                     ORDER BY l.created_at DESC, l.id DESC
                     LIMIT ?4 OFFSET ?5"
                ))
                .map_err(|e| Error::operation("list_group_links", e))?;
            let rows = stmt
                .query_map(
                    params![group.get(), GROUPABLE_LINK, owner.get(), per_page, offset],
                    link_from_row,
                )
                .map_err(|e| Error::operation("list_group_links", e))?;
            let items = rows
                .map(|row| row.map(LinkSummary::from))
                .collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| Error::operation("list_group_links", e))?;

            Ok(Page {
                items,
                page,
                per_page,
                total: to_count(total),
            })
        })
    }

    fn groups_for_link(&self, owner: OwnerId, link: LinkId) -> Result<Vec<GroupId>> {
        self.read("groups_for_link", |conn| {
            let mut stmt = conn
                .prepare(
                    "SELECT g.id FROM groupables ga
                     JOIN groups g ON g.id = ga.group_id
                     WHERE ga.groupable_type = ?1 AND ga.groupable_id = ?2 AND g.user_id = ?3
                     ORDER BY g.title COLLATE NOCASE, g.id",
                )
                .map_err(|e| Error::operation("groups_for_link", e))?;
            let rows = stmt
                .query_map(params![GROUPABLE_LINK, link.get(), owner.get()], |row| {
                    Ok(GroupId::new(row.get(0)?))
                })
                .map_err(|e| Error::operation("groups_for_link", e))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| Error::operation("groups_for_link", e))
        })
    }

    fn search_links(&self, owner: OwnerId, query: &str) -> Result<Vec<Link>> {
        let pattern = contains_pattern(query);
        self.read("search_links", |conn| {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT {LINK_COLUMNS} FROM links l
                     WHERE l.user_id = ?1
                       AND (l.title LIKE ?2 ESCAPE '\\' OR l.url LIKE ?2 ESCAPE '\\')
                     ORDER BY l.created_at DESC, l.id DESC"
                ))
                .map_err(|e| Error::operation("search_links", e))?;
            let rows = stmt
                .query_map(params![owner.get(), pattern], link_from_row)
                .map_err(|e| Error::operation("search_links", e))?;
            rows.collect::<rusqlite::Result<Vec<_>>>()
                .map_err(|e| Error::operation("search_links", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::GroupBackend;

    const OWNER: OwnerId = OwnerId::new(1);
    const OTHER: OwnerId = OwnerId::new(2);

    fn create_test_backend() -> SqliteBackend {
        SqliteBackend::in_memory().expect("Failed to create in-memory backend")
    }

    #[test]
    fn test_create_link_files_under_groups() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create group");
        let link = backend
            .create_link(OWNER, "Docs", "https://docs.rs/", &[work.id])
            .expect("create link");

        assert_eq!(backend.groups_for_link(OWNER, link.id).expect("groups"), vec![work.id]);
        let children = backend.list_children(OWNER, None).expect("list");
        assert_eq!(children[0].link_count, 1);
    }

    #[test]
    fn test_create_link_with_foreign_group_creates_nothing() {
        let backend = create_test_backend();
        let theirs = backend.create_group(OTHER, "Theirs", None).expect("create group");
        let result = backend.create_link(OWNER, "Docs", "https://docs.rs/", &[theirs.id]);
        assert!(matches!(result, Err(Error::Reference { field: "groupIds", .. })));
        assert!(backend.search_links(OWNER, "docs").expect("search").is_empty());
    }

    #[test]
    fn test_attach_is_idempotent_and_detach_keeps_link() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create group");
        let link = backend
            .create_link(OWNER, "Docs", "https://docs.rs/", &[])
            .expect("create link");

        assert!(backend.attach_link(OWNER, work.id, link.id).expect("attach"));
        assert!(!backend.attach_link(OWNER, work.id, link.id).expect("attach again"));
        assert!(backend.detach_link(OWNER, work.id, link.id).expect("detach"));
        assert!(!backend.detach_link(OWNER, work.id, link.id).expect("detach again"));
        assert!(backend.get_link(OWNER, link.id).expect("get").is_some());
    }

    #[test]
    fn test_attach_foreign_records_is_not_found() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create group");
        let link = backend
            .create_link(OTHER, "Docs", "https://docs.rs/", &[])
            .expect("create link");

        let result = backend.attach_link(OWNER, work.id, link.id);
        assert!(matches!(result, Err(Error::NotFound(_))));
        let result = backend.attach_link(OTHER, work.id, link.id);
        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_list_group_links_pages_newest_first() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create group");
        for i in 0..5 {
            backend
                .create_link(OWNER, &format!("Link {i}"), "https://example.com/", &[work.id])
                .expect("create link");
        }

        let first = backend.list_group_links(OWNER, work.id, 1, 2).expect("page 1");
        assert_eq!(first.total, 5);
        assert_eq!(first.last_page(), 3);
        assert_eq!(first.items[0].title, "Link 4");
        assert_eq!(first.items[1].title, "Link 3");

        let last = backend.list_group_links(OWNER, work.id, 3, 2).expect("page 3");
        assert_eq!(last.items.len(), 1);
        assert_eq!(last.items[0].title, "Link 0");
        assert!(!last.has_more());

        let page_zero = backend.list_group_links(OWNER, work.id, 0, 2).expect("page 0");
        assert_eq!(page_zero.page, 1);
    }

    #[test]
    fn test_delete_link_removes_associations() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create group");
        let link = backend
            .create_link(OWNER, "Docs", "https://docs.rs/", &[work.id])
            .expect("create link");

        assert!(!backend.delete_link(OTHER, link.id).expect("foreign delete"));
        assert!(backend.delete_link(OWNER, link.id).expect("delete"));
        let page = backend.list_group_links(OWNER, work.id, 1, 20).expect("list");
        assert_eq!(page.total, 0);
    }

    #[test]
    fn test_delete_group_detaches_but_keeps_links() {
        use crate::tree::cascade::CascadePolicy;

        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create group");
        let link = backend
            .create_link(OWNER, "Docs", "https://docs.rs/", &[work.id])
            .expect("create link");

        let outcome = backend
            .delete_group(OWNER, work.id, CascadePolicy::Reparent)
            .expect("delete")
            .expect("exists");
        assert_eq!(outcome.detached_links, 1);
        assert!(backend.get_link(OWNER, link.id).expect("get").is_some());
        assert!(backend.groups_for_link(OWNER, link.id).expect("groups").is_empty());
    }
}
