//! `SQLite` implementation of [`TagBackend`].

use rusqlite::{Connection, params};

use crate::models::{OwnerId, Tag, TagId, TaggableRef};
use crate::storage::sqlite::{
    SqliteBackend, TAG_COLUMNS, contains_pattern, fetch_group, fetch_link, fetch_tag,
    tag_from_row,
};
use crate::{Error, Result, current_timestamp};

use super::traits::TagBackend;

fn target_exists(conn: &Connection, owner: OwnerId, target: TaggableRef) -> Result<bool> {
    Ok(match target {
        TaggableRef::Group(id) => fetch_group(conn, owner, id)?.is_some(),
        TaggableRef::Link(id) => fetch_link(conn, owner, id)?.is_some(),
    })
}

fn collect_tags(conn: &Connection, sql: &str, params: impl rusqlite::Params) -> Result<Vec<Tag>> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| Error::operation("list_tags", e))?;
    let rows = stmt
        .query_map(params, tag_from_row)
        .map_err(|e| Error::operation("list_tags", e))?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(|e| Error::operation("list_tags", e))
}

fn upsert_tag(conn: &Connection, owner: OwnerId, name: &str) -> Result<Tag> {
    conn.execute(
        "INSERT OR IGNORE INTO tags (user_id, name, created_at) VALUES (?1, ?2, ?3)",
        params![owner.get(), name, current_timestamp()],
    )
    .map_err(|e| Error::operation("create_tag", e))?;
    conn.query_row(
        &format!("SELECT {TAG_COLUMNS} FROM tags t WHERE t.user_id = ?1 AND t.name = ?2"),
        params![owner.get(), name],
        tag_from_row,
    )
    .map_err(|e| Error::operation("find_tag", e))
}

fn insert_taggable(conn: &Connection, tag: TagId, target: TaggableRef) -> Result<bool> {
    let inserted = conn
        .execute(
            "INSERT OR IGNORE INTO taggables (tag_id, taggable_type, taggable_id)
             VALUES (?1, ?2, ?3)",
            params![tag.get(), target.type_name(), target.raw_id()],
        )
        .map_err(|e| Error::operation("insert_taggable", e))?;
    Ok(inserted > 0)
}

impl TagBackend for SqliteBackend {
    fn tag_target(&self, owner: OwnerId, name: &str, target: TaggableRef) -> Result<(Tag, bool)> {
        self.write("tag_target", |tx| {
            if !target_exists(tx, owner, target)? {
                return Err(Error::not_found(target.type_name(), target.raw_id()));
            }
            let tag = upsert_tag(tx, owner, name)?;
            let attached = insert_taggable(tx, tag.id, target)?;
            Ok((tag, attached))
        })
    }

    fn list_tags(&self, owner: OwnerId) -> Result<Vec<Tag>> {
        self.read("list_tags", |conn| {
            collect_tags(
                conn,
                &format!(
                    "SELECT {TAG_COLUMNS} FROM tags t WHERE t.user_id = ?1
                     ORDER BY t.name COLLATE NOCASE, t.id"
                ),
                params![owner.get()],
            )
        })
    }

    fn delete_tag(&self, owner: OwnerId, id: TagId) -> Result<bool> {
        self.write("delete_tag", |tx| {
            if fetch_tag(tx, owner, id)?.is_none() {
                return Ok(false);
            }
            tx.execute("DELETE FROM taggables WHERE tag_id = ?1", params![id.get()])
                .map_err(|e| Error::operation("detach_tag", e))?;
            let deleted = tx
                .execute(
                    "DELETE FROM tags WHERE id = ?1 AND user_id = ?2",
                    params![id.get(), owner.get()],
                )
                .map_err(|e| Error::operation("delete_tag", e))?;
            Ok(deleted > 0)
        })
    }

    fn detach_tag(&self, owner: OwnerId, tag: TagId, target: TaggableRef) -> Result<bool> {
        self.write("detach_tag", |tx| {
            if fetch_tag(tx, owner, tag)?.is_none() {
                return Err(Error::not_found("tag", tag));
            }
            let removed = tx
                .execute(
                    "DELETE FROM taggables
                     WHERE tag_id = ?1 AND taggable_type = ?2 AND taggable_id = ?3",
                    params![tag.get(), target.type_name(), target.raw_id()],
                )
                .map_err(|e| Error::operation("detach_tag", e))?;
            Ok(removed > 0)
        })
    }

    fn tags_for(&self, owner: OwnerId, target: TaggableRef) -> Result<Vec<Tag>> {
        self.read("tags_for", |conn| {
            collect_tags(
                conn,
                &format!(
                    "SELECT {TAG_COLUMNS} FROM taggables tg
                     JOIN tags t ON t.id = tg.tag_id
                     WHERE t.user_id = ?1 AND tg.taggable_type = ?2 AND tg.taggable_id = ?3
                     ORDER BY t.name COLLATE NOCASE, t.id"
                ),
                params![owner.get(), target.type_name(), target.raw_id()],
            )
        })
    }

    fn search_tags(&self, owner: OwnerId, query: &str) -> Result<Vec<Tag>> {
        let pattern = contains_pattern(query);
        self.read("search_tags", |conn| {
            collect_tags(
                conn,
                &format!(
                    "SELECT {TAG_COLUMNS} FROM tags t
                     WHERE t.user_id = ?1 AND t.name LIKE ?2 ESCAPE '\\'
                     ORDER BY t.name COLLATE NOCASE, t.id"
                ),
                params![owner.get(), pattern],
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::GroupId;
    use crate::storage::{GroupBackend, LinkBackend};

    const OWNER: OwnerId = OwnerId::new(1);
    const OTHER: OwnerId = OwnerId::new(2);

    fn create_test_backend() -> SqliteBackend {
        SqliteBackend::in_memory().expect("Failed to create in-memory backend")
    }

    #[test]
    fn test_tag_names_are_unique_per_owner() {
        let backend = create_test_backend();
        let mine = backend.create_group(OWNER, "Mine", None).expect("create group");
        let theirs = backend.create_group(OTHER, "Theirs", None).expect("create group");

        let (first, attached) = backend
            .tag_target(OWNER, "rust", TaggableRef::Group(mine.id))
            .expect("tag");
        assert!(attached);
        let (second, attached) = backend
            .tag_target(OWNER, "rust", TaggableRef::Group(mine.id))
            .expect("tag again");
        assert_eq!(first.id, second.id);
        assert!(!attached);

        let (other, _) = backend
            .tag_target(OTHER, "rust", TaggableRef::Group(theirs.id))
            .expect("tag theirs");
        assert_ne!(first.id, other.id);
        assert_eq!(backend.list_tags(OWNER).expect("list").len(), 1);
    }

    #[test]
    fn test_tag_and_list_tags() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create group");
        let link = backend
            .create_link(OWNER, "Docs", "https://docs.rs/", &[])
            .expect("create link");

        let (rust, _) = backend
            .tag_target(OWNER, "rust", TaggableRef::Group(work.id))
            .expect("tag");
        backend
            .tag_target(OWNER, "Docs", TaggableRef::Group(work.id))
            .expect("tag");
        backend
            .tag_target(OWNER, "rust", TaggableRef::Link(link.id))
            .expect("tag");

        let names: Vec<String> = backend
            .tags_for(OWNER, TaggableRef::Group(work.id))
            .expect("tags")
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, ["Docs", "rust"]);

        assert!(backend.detach_tag(OWNER, rust.id, TaggableRef::Link(link.id)).expect("detach"));
        assert!(!backend.detach_tag(OWNER, rust.id, TaggableRef::Link(link.id)).expect("again"));
        assert!(backend.tags_for(OWNER, TaggableRef::Link(link.id)).expect("tags").is_empty());
        assert!(matches!(
            backend.detach_tag(OTHER, rust.id, TaggableRef::Group(work.id)),
            Err(Error::NotFound(_))
        ));
    }

    #[test]
    fn test_tag_target_missing_target_writes_nothing() {
        let backend = create_test_backend();
        let theirs = backend.create_group(OTHER, "Theirs", None).expect("create group");

        let result = backend.tag_target(OWNER, "ghost", TaggableRef::Group(GroupId::new(42)));
        assert!(matches!(result, Err(Error::NotFound(_))));
        let result = backend.tag_target(OWNER, "ghost", TaggableRef::Group(theirs.id));
        assert!(matches!(result, Err(Error::NotFound(_))));
        assert!(backend.list_tags(OWNER).expect("list").is_empty());
    }

    #[test]
    fn test_delete_tag_and_search() {
        let backend = create_test_backend();
        let work = backend.create_group(OWNER, "Work", None).expect("create group");
        let (tag, _) = backend
            .tag_target(OWNER, "rustlang", TaggableRef::Group(work.id))
            .expect("tag");

        assert_eq!(backend.search_tags(OWNER, "rust").expect("search").len(), 1);
        assert!(!backend.delete_tag(OTHER, tag.id).expect("foreign delete"));
        assert!(backend.delete_tag(OWNER, tag.id).expect("delete"));
        assert!(backend.tags_for(OWNER, TaggableRef::Group(work.id)).expect("tags").is_empty());
    }
}
